use crate::error_log::{resolve_error_log_dir, ErrorLogError};
use crate::input::{load_input, normalize_input_path, select_records, InputError, RecordSelection};
use crate::run::execute;
use crate::slack::{token_from_env, SlackApiClient, SlackError, WorkspaceApi};
use chrono::Utc;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

pub mod cli;
pub mod prompts;

pub use cli::{help_text, parse_cli_args, CliCommand};
pub use prompts::{PromptError, Prompter};

const INPUT_PATH_PROMPT: &str = "Enter filepath for input file (JSON/CSV): ";
const CHANNEL_FIELD_PROMPT: &str = "Enter the field name to use for channel names: ";
const MEMBERS_FIELD_PROMPT: &str = "Enter the field name to use for member names: ";
const TOKEN_PROMPT: &str =
    "Enter Token (Find your Bot User OAuth Access Token from https://api.slack.com/apps): ";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Slack(#[from] SlackError),
    #[error(transparent)]
    ErrorLog(#[from] ErrorLogError),
}

/// Where a provisioning run sends its API calls and error log.
pub struct RunSettings {
    pub error_log_dir: PathBuf,
}

impl RunSettings {
    pub fn from_env() -> Self {
        Self {
            error_log_dir: resolve_error_log_dir(),
        }
    }
}

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();
    run_cli_with_io(args, &mut input, &mut output)
}

pub fn run_cli_with_io<R: BufRead, W: Write>(
    args: Vec<String>,
    input: &mut R,
    output: &mut W,
) -> Result<String, String> {
    match parse_cli_args(&args)? {
        CliCommand::Help => Ok(help_text()),
        CliCommand::Run { input_path } => {
            let mut prompter = Prompter::new(input, output);
            let settings = RunSettings::from_env();
            run_provisioning(input_path, &mut prompter, &settings, |token| {
                SlackApiClient::new(token)
            })
            .map_err(|e| e.to_string())
        }
    }
}

/// Loads the roster, asks for anything missing, then provisions.
///
/// `connect` builds the workspace client from the resolved token, which lets
/// callers substitute their own `WorkspaceApi`.
pub fn run_provisioning<R, W, A, F>(
    input_path: Option<String>,
    prompter: &mut Prompter<'_, R, W>,
    settings: &RunSettings,
    connect: F,
) -> Result<String, AppError>
where
    R: BufRead,
    W: Write,
    A: WorkspaceApi,
    F: FnOnce(String) -> Result<A, SlackError>,
{
    let raw_path = match input_path {
        Some(path) => path,
        None => prompter.ask(INPUT_PATH_PROMPT)?,
    };
    let path = normalize_input_path(&raw_path);
    let records = load_input(&path)?;
    prompter.say("Valid file found")?;
    let fields = records
        .first()
        .map(|record| record.field_names().join(", "))
        .unwrap_or_default();
    prompter.say(&format!("Found the following fields in input data: {fields}"))?;

    let selection = RecordSelection {
        channel_field: prompter.select_field(&records, CHANNEL_FIELD_PROMPT)?,
        members_field: prompter.select_field(&records, MEMBERS_FIELD_PROMPT)?,
    };
    let selected = select_records(&records, &selection)?;

    let token = match token_from_env() {
        Some(token) => token,
        None => prompter.ask(TOKEN_PROMPT)?,
    };
    let api = connect(token)?;

    let (report, log) = execute(&api, &selected)?;
    let log_path = log.flush(&settings.error_log_dir, Utc::now())?;

    let mut lines = report.summary_lines();
    lines.push(format!("errors_logged={}", log.len()));
    lines.push(format!("error_log={}", log_path.display()));
    Ok(lines.join("\n"))
}
