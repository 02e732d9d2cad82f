use crate::directory::{ChannelDirectory, MemberDirectory};
use crate::error_log::{ErrorEntry, ErrorLog};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelPlan {
    Existing(String),
    Create(String),
}

/// Decides whether a record's channel must be created.
///
/// Reusing an existing channel is logged as a warning; the record still gets
/// its invites.
pub fn plan_channel(directory: &ChannelDirectory, name: &str, log: &mut ErrorLog) -> ChannelPlan {
    match directory.get(name) {
        Some(id) => {
            warn!(channel = name, "channel exists already");
            log.push(ErrorEntry::channel_exists(name));
            ChannelPlan::Existing(id.to_string())
        }
        None => ChannelPlan::Create(name.to_string()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberResolution {
    /// Ids in input order. Repeated names yield repeated ids.
    pub valid: Vec<String>,
    pub missing: Vec<String>,
}

pub fn resolve_members(
    directory: &MemberDirectory,
    names: &[String],
    log: &mut ErrorLog,
) -> MemberResolution {
    let mut resolution = MemberResolution::default();
    for name in names {
        match directory.get(name) {
            Some(id) => resolution.valid.push(id.to_string()),
            None => {
                warn!(member = %name, "member not found in team");
                log.push(ErrorEntry::member_not_found(name));
                resolution.missing.push(name.clone());
            }
        }
    }
    resolution
}
