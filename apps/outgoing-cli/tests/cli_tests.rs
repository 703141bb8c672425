//! Command line parsing and configuration override tests

use clap::Parser;
use outgoing_cli::{Cli, Commands};
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn clear_env() {
    for name in [
        "OUTGOING_TABLE_PATH",
        "OUTGOING_ENCODING",
        "OUTGOING_LOCALE",
        "OUTGOING_LANGUAGE_FILE",
        "OUTGOING_STRICT_LOAD",
        "OUTGOING_HOST",
        "OUTGOING_PORT",
    ] {
        std::env::remove_var(name);
    }
}

#[test]
fn test_parse_list_with_limit() {
    let cli = Cli::try_parse_from(["outgoing", "list", "--limit", "5"]).unwrap();
    assert_eq!(cli.command, Commands::List { limit: Some(5) });
    assert!(!cli.verbose);
    assert!(!cli.json_logs);
}

#[test]
fn test_parse_global_flags() {
    let cli = Cli::try_parse_from([
        "outgoing",
        "-t",
        "/data/outgoing.csv",
        "-c",
        "outgoing.yaml",
        "-v",
        "--json-logs",
        "get",
        "42",
    ])
    .unwrap();
    assert_eq!(cli.table, Some(PathBuf::from("/data/outgoing.csv")));
    assert_eq!(cli.config, Some(PathBuf::from("outgoing.yaml")));
    assert!(cli.verbose);
    assert!(cli.json_logs);
    assert_eq!(cli.command, Commands::Get { id: 42 });
}

#[test]
fn test_parse_mutations() {
    let cli = Cli::try_parse_from(["outgoing", "replace", "5", "letter.json"]).unwrap();
    assert_eq!(
        cli.command,
        Commands::Replace {
            id: 5,
            file: PathBuf::from("letter.json")
        }
    );

    let cli = Cli::try_parse_from(["outgoing", "validate", "letter.json", "--replacing", "5"])
        .unwrap();
    assert_eq!(
        cli.command,
        Commands::Validate {
            file: PathBuf::from("letter.json"),
            replacing: Some(5)
        }
    );
}

#[test]
fn test_parse_rejects_negative_id() {
    assert!(Cli::try_parse_from(["outgoing", "delete", "-1"]).is_err());
    assert!(Cli::try_parse_from(["outgoing", "get", "eins"]).is_err());
}

#[test]
fn test_parse_requires_subcommand() {
    assert!(Cli::try_parse_from(["outgoing"]).is_err());
}

#[test]
#[serial]
fn test_serve_flags_override_configuration() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "host: 0.0.0.0\nport: 8080\ntable_path: /srv/outgoing.csv").unwrap();
    let config_path = file.path().to_str().unwrap().to_string();

    let cli = Cli::try_parse_from([
        "outgoing",
        "--config",
        config_path.as_str(),
        "serve",
        "--port",
        "9090",
    ])
    .unwrap();
    let config = cli.resolve_config().unwrap();
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 9090);
    assert_eq!(config.table_path, PathBuf::from("/srv/outgoing.csv"));
}

#[test]
#[serial]
fn test_table_flag_overrides_environment() {
    clear_env();
    std::env::set_var("OUTGOING_TABLE_PATH", "/env/outgoing.csv");

    let cli = Cli::try_parse_from(["outgoing", "list"]).unwrap();
    let from_env = cli.resolve_config().unwrap();

    let cli = Cli::try_parse_from(["outgoing", "--table", "/flag/outgoing.csv", "list"]).unwrap();
    let from_flag = cli.resolve_config().unwrap();
    clear_env();

    assert_eq!(from_env.table_path, PathBuf::from("/env/outgoing.csv"));
    assert_eq!(from_flag.table_path, PathBuf::from("/flag/outgoing.csv"));
}

#[test]
#[serial]
fn test_invalid_configuration_is_reported() {
    clear_env();
    std::env::set_var("OUTGOING_ENCODING", "klingon-8");
    let cli = Cli::try_parse_from(["outgoing", "list"]).unwrap();
    let result = cli.resolve_config();
    clear_env();
    assert!(result.is_err());
}
