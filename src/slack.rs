use serde_json::Value;

pub mod api;

pub use api::{SlackApiClient, SlackChannel, SlackUser};

pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";
pub const API_BASE_ENV: &str = "CHANNELSMITH_SLACK_API_BASE";
pub const BOT_TOKEN_ENV: &str = "SLACK_BOT_TOKEN";

/// Largest page the listing calls ask for. Only the first page is read.
pub const LIST_PAGE_LIMIT: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum SlackError {
    #[error("slack bot token is empty")]
    EmptyToken,
    #[error("slack api request to `{method}` failed: {reason}")]
    ApiRequest { method: String, reason: String },
    #[error("slack api `{method}` responded with error `{error}`")]
    ApiResponse { method: String, error: String },
    #[error("slack api `{method}` returned an unexpected payload: {source}")]
    Payload {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of a write call the service may refuse.
///
/// `Rejected` keeps the raw response body so it can be written to the error
/// log verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum SlackReply<T> {
    Accepted(T),
    Rejected(Value),
}

/// The four workspace operations a provisioning run needs.
///
/// Listing failures are fatal, so they return `SlackError` when the service
/// answers `ok: false`. Create and invite failures are recorded and skipped,
/// so the refusal comes back as `SlackReply::Rejected`.
pub trait WorkspaceApi {
    fn list_channels(&self) -> Result<Vec<SlackChannel>, SlackError>;
    fn list_users(&self) -> Result<Vec<SlackUser>, SlackError>;
    fn create_private_channel(&self, name: &str) -> Result<SlackReply<String>, SlackError>;
    fn invite_member(&self, channel_id: &str, user_id: &str) -> Result<SlackReply<()>, SlackError>;
}

impl<T: WorkspaceApi + ?Sized> WorkspaceApi for &T {
    fn list_channels(&self) -> Result<Vec<SlackChannel>, SlackError> {
        (**self).list_channels()
    }

    fn list_users(&self) -> Result<Vec<SlackUser>, SlackError> {
        (**self).list_users()
    }

    fn create_private_channel(&self, name: &str) -> Result<SlackReply<String>, SlackError> {
        (**self).create_private_channel(name)
    }

    fn invite_member(
        &self,
        channel_id: &str,
        user_id: &str,
    ) -> Result<SlackReply<()>, SlackError> {
        (**self).invite_member(channel_id, user_id)
    }
}

pub fn resolve_api_base() -> String {
    std::env::var(API_BASE_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SLACK_API_BASE.to_string())
}

pub fn token_from_env() -> Option<String> {
    std::env::var(BOT_TOKEN_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn response_ok(payload: &Value) -> bool {
    payload.get("ok").and_then(Value::as_bool).unwrap_or(false)
}

pub(crate) fn response_error(payload: &Value) -> Option<String> {
    payload
        .get("error")
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_ok_requires_literal_true() {
        assert!(response_ok(&json!({"ok": true})));
        assert!(!response_ok(&json!({"ok": false, "error": "name_taken"})));
        assert!(!response_ok(&json!({"ok": "true"})));
        assert!(!response_ok(&json!({})));
    }

    #[test]
    fn response_error_reads_error_field() {
        assert_eq!(
            response_error(&json!({"ok": false, "error": "not_in_channel"})).as_deref(),
            Some("not_in_channel")
        );
        assert_eq!(response_error(&json!({"ok": false})), None);
    }
}
