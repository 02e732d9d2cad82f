use crate::directory::{fetch_directories, Directories};
use crate::error_log::ErrorLog;
use crate::input::SelectedRecord;
use crate::invite::{invite_members, InviteSummary};
use crate::provision::provision_channel;
use crate::reconcile::{plan_channel, resolve_members, ChannelPlan};
use crate::slack::{SlackError, WorkspaceApi};
use tracing::{info, info_span, warn};

/// Where a single record ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Creation was refused; no members were resolved or invited.
    ChannelCreateFailed { channel: String },
    Done {
        channel: String,
        channel_id: String,
        created: bool,
        invites: InviteSummary,
        members_missing: usize,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub records_processed: usize,
    pub channels_created: usize,
    pub channels_reused: usize,
    pub channel_creations_failed: usize,
    pub invites_sent: usize,
    pub invites_failed: usize,
    pub members_not_found: usize,
}

impl RunReport {
    fn record(&mut self, outcome: &RecordOutcome) {
        self.records_processed += 1;
        match outcome {
            RecordOutcome::ChannelCreateFailed { .. } => self.channel_creations_failed += 1,
            RecordOutcome::Done {
                created,
                invites,
                members_missing,
                ..
            } => {
                if *created {
                    self.channels_created += 1;
                } else {
                    self.channels_reused += 1;
                }
                self.invites_sent += invites.sent;
                self.invites_failed += invites.failed;
                self.members_not_found += members_missing;
            }
        }
    }

    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("records_processed={}", self.records_processed),
            format!("channels_created={}", self.channels_created),
            format!("channels_reused={}", self.channels_reused),
            format!("channel_creations_failed={}", self.channel_creations_failed),
            format!("invites_sent={}", self.invites_sent),
            format!("invites_failed={}", self.invites_failed),
            format!("members_not_found={}", self.members_not_found),
        ]
    }
}

pub fn process_record<A: WorkspaceApi + ?Sized>(
    api: &A,
    directories: &mut Directories,
    record: SelectedRecord<'_>,
    log: &mut ErrorLog,
) -> Result<RecordOutcome, SlackError> {
    let channel = record.channel.to_string();
    let (channel_id, created) = match plan_channel(&directories.channels, &channel, log) {
        ChannelPlan::Existing(id) => (id, false),
        ChannelPlan::Create(name) => {
            match provision_channel(api, &mut directories.channels, log, &name)? {
                Some(id) => (id, true),
                None => return Ok(RecordOutcome::ChannelCreateFailed { channel }),
            }
        }
    };

    let names = record.members.member_names();
    let resolution = resolve_members(&directories.members, &names, log);
    let invites = invite_members(api, log, &channel_id, &resolution.valid)?;

    Ok(RecordOutcome::Done {
        channel,
        channel_id,
        created,
        invites,
        members_missing: resolution.missing.len(),
    })
}

fn log_outcome(outcome: &RecordOutcome) {
    match outcome {
        RecordOutcome::ChannelCreateFailed { channel } => {
            warn!(channel = %channel, "skipped record after failed channel creation");
        }
        RecordOutcome::Done {
            channel,
            channel_id,
            created,
            invites,
            members_missing,
        } => {
            info!(
                channel = %channel,
                channel_id = %channel_id,
                created,
                invites_sent = invites.sent,
                invites_failed = invites.failed,
                members_missing,
                "record done"
            );
        }
    }
}

/// Runs every record in input order against already fetched directories.
pub fn run_batch<A: WorkspaceApi + ?Sized>(
    api: &A,
    records: &[SelectedRecord<'_>],
    directories: &mut Directories,
    log: &mut ErrorLog,
) -> Result<RunReport, SlackError> {
    let mut report = RunReport::default();
    for (index, record) in records.iter().enumerate() {
        let _span = info_span!("record", index).entered();
        let outcome = process_record(api, directories, *record, log)?;
        log_outcome(&outcome);
        report.record(&outcome);
    }
    info!(
        records = report.records_processed,
        errors = log.len(),
        "finished processing records"
    );
    Ok(report)
}

/// Fetches both directories and processes every record.
pub fn execute<A: WorkspaceApi + ?Sized>(
    api: &A,
    records: &[SelectedRecord<'_>],
) -> Result<(RunReport, ErrorLog), SlackError> {
    let mut directories = fetch_directories(api)?;
    let mut log = ErrorLog::new();
    let report = run_batch(api, records, &mut directories, &mut log)?;
    Ok((report, log))
}
