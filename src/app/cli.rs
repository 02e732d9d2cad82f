#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Help,
    Run { input_path: Option<String> },
}

pub fn parse_cli_args(args: &[String]) -> Result<CliCommand, String> {
    match args {
        [] => Ok(CliCommand::Run { input_path: None }),
        [flag] if flag == "-h" || flag == "--help" => Ok(CliCommand::Help),
        [path] => Ok(CliCommand::Run {
            input_path: Some(path.clone()),
        }),
        _ => Err(format!(
            "expected at most one input file argument, got {}\n\n{}",
            args.len(),
            help_text()
        )),
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Usage: channelsmith [INPUT_FILE]".to_string(),
        String::new(),
        "Creates missing private channels from a JSON or CSV roster and invites the listed members."
            .to_string(),
        "The input file is prompted for when omitted.".to_string(),
        String::new(),
        "Environment:".to_string(),
        "  SLACK_BOT_TOKEN                      Bot token; prompted for when unset".to_string(),
        "  CHANNELSMITH_SLACK_API_BASE          API base URL (default https://slack.com/api)"
            .to_string(),
        "  CHANNELSMITH_ERROR_LOG_DIR           Directory for errorlog_<timestamp>.json"
            .to_string(),
        "  RUST_LOG                             Log filter (default info)".to_string(),
    ]
}

pub fn help_text() -> String {
    cli_help_lines().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn no_arguments_prompts_for_input() {
        assert_eq!(
            parse_cli_args(&[]).expect("parsed"),
            CliCommand::Run { input_path: None }
        );
    }

    #[test]
    fn single_argument_is_the_input_path() {
        assert_eq!(
            parse_cli_args(&args(&["teams.csv"])).expect("parsed"),
            CliCommand::Run {
                input_path: Some("teams.csv".to_string())
            }
        );
        assert_eq!(
            parse_cli_args(&args(&["--help"])).expect("parsed"),
            CliCommand::Help
        );
    }

    #[test]
    fn extra_arguments_are_rejected() {
        let err = parse_cli_args(&args(&["a.csv", "b.csv"])).expect_err("too many");
        assert!(err.contains("at most one input file"));
        assert!(err.contains("Usage: channelsmith"));
    }
}
