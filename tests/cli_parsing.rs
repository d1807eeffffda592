use std::path::PathBuf;

use casimir_sweep::cli::{Cli, Commands, OutputFormat};
use casimir_sweep::domain::models::ExecutorBackend;
use clap::Parser;

#[test]
fn test_parse_run_with_overrides() {
    let cli = Cli::try_parse_from([
        "casimir-sweep",
        "run",
        "--precision",
        "1e-10",
        "--size-ratio",
        "0.1",
        "--pool-size",
        "8",
        "--nodes",
        "40",
        "--lmax",
        "120",
        "--idle-ms",
        "5",
        "--backend",
        "rayon",
        "--format",
        "table",
    ])
    .unwrap();

    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.precision, Some(1e-10));
            assert_eq!(args.size_ratio, Some(0.1));
            assert_eq!(args.pool_size, Some(8));
            assert_eq!(args.nodes, Some(40));
            assert_eq!(args.lmax, Some(120));
            assert_eq!(args.idle_ms, Some(5));
            assert_eq!(args.backend, Some(ExecutorBackend::Rayon));
            assert_eq!(args.format, OutputFormat::Table);
            assert!(!args.no_progress);
        }
        other => panic!("Wrong command: {other:?}"),
    }
    assert!(!cli.json);
}

#[test]
fn test_run_defaults_to_text() {
    let cli = Cli::try_parse_from(["casimir-sweep", "run"]).unwrap();
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.format, OutputFormat::Text);
            assert!(args.precision.is_none());
            assert!(args.backend.is_none());
        }
        other => panic!("Wrong command: {other:?}"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "casimir-sweep",
        "nodes",
        "-n",
        "12",
        "--json",
        "--config",
        "sweep.yaml",
    ])
    .unwrap();

    assert!(cli.json);
    assert_eq!(cli.config, Some(PathBuf::from("sweep.yaml")));
    match cli.command {
        Commands::Nodes(args) => assert_eq!(args.nodes, Some(12)),
        other => panic!("Wrong command: {other:?}"),
    }
}

#[test]
fn test_config_command() {
    let cli = Cli::try_parse_from(["casimir-sweep", "config"]).unwrap();
    assert!(matches!(cli.command, Commands::Config(_)));
}

#[test]
fn test_unknown_backend_is_rejected() {
    let result = Cli::try_parse_from(["casimir-sweep", "run", "--backend", "processes"]);
    assert!(result.is_err());
}

#[test]
fn test_missing_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["casimir-sweep"]).is_err());
}
