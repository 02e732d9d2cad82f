use super::{
    resolve_api_base, response_error, response_ok, SlackError, SlackReply, WorkspaceApi,
    LIST_PAGE_LIMIT,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SlackApiClient {
    api_base: String,
    bot_token: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ConversationsListData {
    #[serde(default)]
    channels: Vec<SlackChannel>,
}

#[derive(Debug, Clone, Deserialize)]
struct UsersListData {
    #[serde(default)]
    members: Vec<SlackUser>,
}

#[derive(Debug, Clone, Deserialize)]
struct ConversationsCreateData {
    channel: CreatedChannel,
}

#[derive(Debug, Clone, Deserialize)]
struct CreatedChannel {
    id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackChannel {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackUser {
    pub id: String,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

impl SlackApiClient {
    pub fn new(bot_token: String) -> Result<Self, SlackError> {
        Self::with_api_base(resolve_api_base(), bot_token)
    }

    pub fn with_api_base(api_base: String, bot_token: String) -> Result<Self, SlackError> {
        let bot_token = bot_token.trim().to_string();
        if bot_token.is_empty() {
            return Err(SlackError::EmptyToken);
        }
        Ok(Self {
            api_base,
            bot_token,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path)
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.bot_token)
    }

    fn get(&self, method: &str, query: &[(&str, String)]) -> Result<Value, SlackError> {
        let mut url = self.endpoint(method);
        if !query.is_empty() {
            let encoded = query
                .iter()
                .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url = format!("{url}?{encoded}");
        }
        debug!(method, "slack GET");

        let response = ureq::get(&url)
            .set("Authorization", &self.authorization())
            .call()
            .map_err(|e| request_error(method, e))?;

        response
            .into_json::<Value>()
            .map_err(|e| request_error(method, e))
    }

    fn post_json(&self, method: &str, body: &Value) -> Result<Value, SlackError> {
        let url = self.endpoint(method);
        debug!(method, "slack POST");

        let response = ureq::post(&url)
            .set("Authorization", &self.authorization())
            .send_json(body.clone())
            .map_err(|e| request_error(method, e))?;

        response
            .into_json::<Value>()
            .map_err(|e| request_error(method, e))
    }

    fn require_ok(method: &str, payload: &Value) -> Result<(), SlackError> {
        if response_ok(payload) {
            return Ok(());
        }
        Err(SlackError::ApiResponse {
            method: method.to_string(),
            error: response_error(payload).unwrap_or_else(|| format!("{method} failed")),
        })
    }
}

fn request_error(method: &str, err: impl std::fmt::Display) -> SlackError {
    SlackError::ApiRequest {
        method: method.to_string(),
        reason: err.to_string(),
    }
}

fn payload_error(method: &str, source: serde_json::Error) -> SlackError {
    SlackError::Payload {
        method: method.to_string(),
        source,
    }
}

impl WorkspaceApi for SlackApiClient {
    fn list_channels(&self) -> Result<Vec<SlackChannel>, SlackError> {
        let method = "conversations.list";
        let query = [
            ("exclude_archived", "true".to_string()),
            ("limit", LIST_PAGE_LIMIT.to_string()),
            ("types", "public_channel,private_channel".to_string()),
        ];
        let payload = self.get(method, &query)?;
        Self::require_ok(method, &payload)?;
        let data: ConversationsListData =
            serde_json::from_value(payload).map_err(|e| payload_error(method, e))?;
        Ok(data.channels)
    }

    fn list_users(&self) -> Result<Vec<SlackUser>, SlackError> {
        let method = "users.list";
        let query = [("limit", LIST_PAGE_LIMIT.to_string())];
        let payload = self.get(method, &query)?;
        Self::require_ok(method, &payload)?;
        let data: UsersListData =
            serde_json::from_value(payload).map_err(|e| payload_error(method, e))?;
        Ok(data.members)
    }

    fn create_private_channel(&self, name: &str) -> Result<SlackReply<String>, SlackError> {
        let payload = self.post_json(
            "conversations.create",
            &json!({
                "name": name,
                "is_private": true,
            }),
        )?;
        if !response_ok(&payload) {
            return Ok(SlackReply::Rejected(payload));
        }
        // An ok reply without a channel id cannot be invited into.
        match serde_json::from_value::<ConversationsCreateData>(payload.clone()) {
            Ok(data) => Ok(SlackReply::Accepted(data.channel.id)),
            Err(_) => Ok(SlackReply::Rejected(payload)),
        }
    }

    fn invite_member(
        &self,
        channel_id: &str,
        user_id: &str,
    ) -> Result<SlackReply<()>, SlackError> {
        let payload = self.post_json(
            "conversations.invite",
            &json!({
                "channel": channel_id,
                "users": user_id,
            }),
        )?;
        if response_ok(&payload) {
            Ok(SlackReply::Accepted(()))
        } else {
            Ok(SlackReply::Rejected(payload))
        }
    }
}
