use clap::Parser;
use mediadeck_app::cli::{Cli, CliCommand, LogTarget};

#[test]
fn subcommands_and_global_flags_parse() {
    let cli = Cli::try_parse_from([
        "mediadeck",
        "pause",
        "12",
        "--base-url",
        "http://nas:5000",
        "-v",
    ])
    .unwrap();
    assert_eq!(cli.command, CliCommand::Pause { id: "12".to_string() });
    assert_eq!(cli.base_url.as_deref(), Some("http://nas:5000"));
    assert!(cli.verbose);
    assert_eq!(cli.log, LogTarget::File);
}

#[test]
fn add_defaults_to_best_quality() {
    let cli = Cli::try_parse_from(["mediadeck", "add", "https://example.com/v"]).unwrap();
    assert_eq!(
        cli.command,
        CliCommand::Add {
            url: "https://example.com/v".to_string(),
            quality: "best".to_string(),
        }
    );

    let cli = Cli::try_parse_from([
        "mediadeck",
        "--log",
        "off",
        "add",
        "https://example.com/v",
        "--quality",
        "720p",
    ])
    .unwrap();
    assert_eq!(cli.log, LogTarget::Off);
    assert!(matches!(cli.command, CliCommand::Add { quality, .. } if quality == "720p"));
}

#[test]
fn clear_completed_is_kebab_case() {
    let cli = Cli::try_parse_from(["mediadeck", "clear-completed"]).unwrap();
    assert_eq!(cli.command, CliCommand::ClearCompleted);
    assert!(Cli::try_parse_from(["mediadeck"]).is_err());
}
