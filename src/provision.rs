use crate::directory::ChannelDirectory;
use crate::error_log::{ErrorEntry, ErrorLog};
use crate::slack::{SlackError, SlackReply, WorkspaceApi};
use tracing::{error, info};

/// Creates `name` as a private channel and records its id.
///
/// Returns `None` when the service refuses the creation; the refusal is
/// logged with the raw response and the caller must skip the record.
pub fn provision_channel<A: WorkspaceApi + ?Sized>(
    api: &A,
    directory: &mut ChannelDirectory,
    log: &mut ErrorLog,
    name: &str,
) -> Result<Option<String>, SlackError> {
    match api.create_private_channel(name)? {
        SlackReply::Accepted(id) => {
            info!(channel = name, channel_id = %id, "created new channel");
            directory.insert(name.to_string(), id.clone());
            Ok(Some(id))
        }
        SlackReply::Rejected(response) => {
            error!(channel = name, %response, "error while creating channel");
            log.push(ErrorEntry::channel_creation(name, response));
            Ok(None)
        }
    }
}
