use channelsmith::app::{run_cli_with_io, run_provisioning, AppError, Prompter, RunSettings};
use channelsmith::input::InputError;
use channelsmith::slack::{
    SlackApiClient, SlackChannel, SlackError, SlackReply, SlackUser, WorkspaceApi,
};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::fs;
use std::io::Cursor;
use std::sync::Mutex;
use tempfile::tempdir;

static ENV_LOCK: Mutex<()> = Mutex::new(());

#[derive(Default)]
struct RecordingWorkspace {
    invites: RefCell<Vec<(String, String)>>,
}

impl WorkspaceApi for RecordingWorkspace {
    fn list_channels(&self) -> Result<Vec<SlackChannel>, SlackError> {
        Ok(vec![SlackChannel {
            id: "C1".to_string(),
            name: "eng".to_string(),
        }])
    }

    fn list_users(&self) -> Result<Vec<SlackUser>, SlackError> {
        Ok(vec![SlackUser {
            id: "U1".to_string(),
            real_name: Some("Alice Smith".to_string()),
            deleted: false,
        }])
    }

    fn create_private_channel(&self, name: &str) -> Result<SlackReply<String>, SlackError> {
        Ok(SlackReply::Rejected(
            json!({"ok": false, "error": "restricted_action", "name": name}),
        ))
    }

    fn invite_member(
        &self,
        channel_id: &str,
        user_id: &str,
    ) -> Result<SlackReply<()>, SlackError> {
        self.invites
            .borrow_mut()
            .push((channel_id.to_string(), user_id.to_string()));
        Ok(SlackReply::Accepted(()))
    }
}

#[test]
fn prompts_for_path_fields_and_token_then_writes_log() {
    let _env_guard = ENV_LOCK.lock().expect("env lock");
    std::env::remove_var("SLACK_BOT_TOKEN");

    let temp = tempdir().expect("tempdir");
    let input_path = temp.path().join("my roster.csv");
    fs::write(
        &input_path,
        "channel,members\neng,Alice Smith; Nobody\nsecret,Alice Smith\n",
    )
    .expect("write input");
    let escaped = input_path.display().to_string().replace(' ', "\\ ");

    let mut input = Cursor::new(format!("{escaped}\nchannels\nchannel\nmembers\nxoxb-typed\n"));
    let mut output = Vec::new();
    let seen_token = RefCell::new(String::new());
    let workspace = RecordingWorkspace::default();
    let settings = RunSettings {
        error_log_dir: temp.path().join("logs"),
    };

    let summary = {
        let mut prompter = Prompter::new(&mut input, &mut output);
        run_provisioning(None, &mut prompter, &settings, |token| {
            *seen_token.borrow_mut() = token;
            Ok(&workspace)
        })
        .expect("run")
    };

    assert_eq!(seen_token.borrow().as_str(), "xoxb-typed");
    assert_eq!(
        workspace.invites.borrow().as_slice(),
        &[("C1".to_string(), "U1".to_string())]
    );
    assert!(summary.contains("channels_reused=1"));
    assert!(summary.contains("channel_creations_failed=1"));
    assert!(summary.contains("errors_logged=3"));

    let printed = String::from_utf8(output).expect("utf8");
    assert!(printed.contains("Enter filepath for input file (JSON/CSV): "));
    assert!(printed.contains("Found the following fields in input data: channel, members"));
    assert_eq!(printed.matches("Invalid field name").count(), 1);
    assert!(printed.contains("Enter Token"));

    let log_path = fs::read_dir(temp.path().join("logs"))
        .expect("logs")
        .next()
        .expect("one log")
        .expect("entry")
        .path();
    let entries: Value =
        serde_json::from_str(&fs::read_to_string(log_path).expect("read")).expect("json");
    let kinds: Vec<&str> = entries
        .as_array()
        .expect("array")
        .iter()
        .map(|entry| entry["kind"].as_str().expect("kind"))
        .collect();
    assert_eq!(
        kinds,
        vec![
            "channel-exists-warning",
            "member-not-found",
            "channel-creation-error"
        ]
    );
    assert_eq!(entries[2]["detail"]["error"], "restricted_action");
}

#[test]
fn missing_input_file_stops_before_field_prompts() {
    let temp = tempdir().expect("tempdir");
    let mut input = Cursor::new("team\n");
    let mut output = Vec::new();
    let settings = RunSettings {
        error_log_dir: temp.path().to_path_buf(),
    };
    let mut prompter = Prompter::new(&mut input, &mut output);

    let err = run_provisioning(
        Some(temp.path().join("absent.csv").display().to_string()),
        &mut prompter,
        &settings,
        |_| Ok(RecordingWorkspace::default()),
    )
    .expect_err("missing file");

    assert!(matches!(err, AppError::Input(InputError::NotFound(_))));
    assert_eq!(fs::read_dir(temp.path()).expect("dir").count(), 0);
}

#[test]
fn record_missing_a_field_stops_before_token_and_connect() {
    let _env_guard = ENV_LOCK.lock().expect("env lock");
    std::env::remove_var("SLACK_BOT_TOKEN");

    let temp = tempdir().expect("tempdir");
    let input_path = temp.path().join("teams.json");
    fs::write(
        &input_path,
        r#"[{"team":"eng","people":"Alice"},{"team":["ops"],"people":"Bob"}]"#,
    )
    .expect("write input");
    let mut input = Cursor::new("team\npeople\nxoxb-never-read\n");
    let mut output = Vec::new();
    let settings = RunSettings {
        error_log_dir: temp.path().join("logs"),
    };
    let connected = RefCell::new(false);

    let err = {
        let mut prompter = Prompter::new(&mut input, &mut output);
        run_provisioning(
            Some(input_path.display().to_string()),
            &mut prompter,
            &settings,
            |_| {
                *connected.borrow_mut() = true;
                Ok(RecordingWorkspace::default())
            },
        )
        .expect_err("list channel name")
    };

    assert!(matches!(
        err,
        AppError::Input(InputError::ChannelNotText { index: 1, ref field }) if field == "team"
    ));
    assert!(!*connected.borrow());
    let printed = String::from_utf8(output).expect("utf8");
    assert!(!printed.contains("Enter Token"));
    assert!(!temp.path().join("logs").exists());
}

#[test]
fn blank_token_is_a_hard_stop() {
    let _env_guard = ENV_LOCK.lock().expect("env lock");
    std::env::remove_var("SLACK_BOT_TOKEN");

    let temp = tempdir().expect("tempdir");
    let input_path = temp.path().join("teams.json");
    fs::write(&input_path, r#"[{"team":"eng","people":"Alice"}]"#).expect("write input");
    let mut input = Cursor::new("team\npeople\n   \n");
    let mut output = Vec::new();
    let settings = RunSettings {
        error_log_dir: temp.path().join("logs"),
    };
    let mut prompter = Prompter::new(&mut input, &mut output);

    let err = run_provisioning(
        Some(input_path.display().to_string()),
        &mut prompter,
        &settings,
        SlackApiClient::new,
    )
    .expect_err("blank token");

    assert!(matches!(err, AppError::Slack(SlackError::EmptyToken)));
    assert!(!temp.path().join("logs").exists());
}

#[test]
fn help_flag_prints_usage_without_prompting() {
    let mut input = Cursor::new("");
    let mut output = Vec::new();
    let text = run_cli_with_io(vec!["--help".to_string()], &mut input, &mut output)
        .expect("help");
    assert!(text.starts_with("Usage: channelsmith [INPUT_FILE]"));
    assert!(output.is_empty());
}

#[test]
fn unsupported_extension_reports_error_text() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("teams.txt");
    fs::write(&path, "eng").expect("write input");
    let mut input = Cursor::new("");
    let mut output = Vec::new();

    let err = run_cli_with_io(vec![path.display().to_string()], &mut input, &mut output)
        .expect_err("unsupported");

    assert!(err.contains("unsupported input file format"));
}
