use crate::error_log::{ErrorEntry, ErrorLog};
use crate::slack::{SlackError, SlackReply, WorkspaceApi};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InviteSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Invites members one call at a time so a bad user only fails its own call.
pub fn invite_members<A: WorkspaceApi + ?Sized>(
    api: &A,
    log: &mut ErrorLog,
    channel_id: &str,
    member_ids: &[String],
) -> Result<InviteSummary, SlackError> {
    let mut summary = InviteSummary::default();
    for member_id in member_ids {
        match api.invite_member(channel_id, member_id)? {
            SlackReply::Accepted(()) => {
                info!(member = %member_id, channel_id, "added member to channel");
                summary.sent += 1;
            }
            SlackReply::Rejected(response) => {
                error!(member = %member_id, channel_id, %response, "error while adding member");
                log.push(ErrorEntry::invite(member_id, response));
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}
