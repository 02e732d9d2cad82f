use crate::slack::{SlackChannel, SlackError, SlackUser, WorkspaceApi};
use std::collections::BTreeMap;
use tracing::info;

/// Channel name to channel id. Grows as channels are created during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelDirectory {
    by_name: BTreeMap<String, String>,
}

impl ChannelDirectory {
    pub fn from_channels(channels: Vec<SlackChannel>) -> Self {
        let mut directory = Self::default();
        for channel in channels {
            directory.insert(channel.name, channel.id);
        }
        directory
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: String, id: String) {
        self.by_name.insert(name, id);
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Member real name to user id, built once from active accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberDirectory {
    by_name: BTreeMap<String, String>,
}

impl MemberDirectory {
    /// Skips deleted accounts and accounts without a real name.
    pub fn from_users(users: Vec<SlackUser>) -> Self {
        let by_name = users
            .into_iter()
            .filter(|user| !user.deleted)
            .filter_map(|user| user.real_name.map(|name| (name, user.id)))
            .collect();
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ChannelDirectory {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            by_name: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemberDirectory {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            by_name: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directories {
    pub channels: ChannelDirectory,
    pub members: MemberDirectory,
}

/// Reads the first page of channels, then the first page of users.
pub fn fetch_directories<A: WorkspaceApi + ?Sized>(api: &A) -> Result<Directories, SlackError> {
    let channels = ChannelDirectory::from_channels(api.list_channels()?);
    info!(count = channels.len(), "channels found");
    let members = MemberDirectory::from_users(api.list_users()?);
    info!(count = members.len(), "members found");
    Ok(Directories { channels, members })
}
