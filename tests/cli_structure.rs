use clap::Parser;
use std::path::PathBuf;

use jsc_tune::cli::{Cli, Commands};
use jsc_tune::domain::models::InitialPointGenerator;
use jsc_tune::BenchmarkKind;

#[test]
fn test_cli_help() {
    let result = Cli::try_parse_from(vec!["jsc-tune", "--help"]);
    assert!(result.is_err()); // --help causes early exit with error
}

#[test]
fn test_cli_version() {
    let result = Cli::try_parse_from(vec!["jsc-tune", "--version"]);
    assert!(result.is_err());
}

#[test]
fn test_run_short_flags() {
    let cli = Cli::try_parse_from(vec![
        "jsc-tune", "run", "-r", "bench@perf-box", "-i", "/keys/id", "-j", "/opt/jsc", "-n",
        "40", "-p", "3", "-o", "out", "-b", "mockbenchmark",
    ])
    .unwrap();

    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.remote.as_deref(), Some("bench@perf-box"));
            assert_eq!(args.ssh_id, Some(PathBuf::from("/keys/id")));
            assert_eq!(args.jsc_path.as_deref(), Some("/opt/jsc"));
            assert_eq!(args.n_calls, Some(40));
            assert_eq!(args.pre_run, Some(3));
            assert_eq!(args.output_dir, Some(PathBuf::from("out")));
            assert_eq!(args.benchmark, Some(BenchmarkKind::Mock));
        }
        other => panic!("Expected run command, got {other:?}"),
    }
}

#[test]
fn test_run_long_flags() {
    let cli = Cli::try_parse_from(vec![
        "jsc-tune",
        "run",
        "--repeats",
        "8",
        "--confidence",
        "0.05",
        "--initial-point-generator",
        "LHS",
        "--initial-points",
        "4",
        "--previous-results",
        "a-dump.json",
        "b-dump.json",
        "--seed",
        "17",
    ])
    .unwrap();

    let Commands::Run(args) = cli.command else {
        panic!("Expected run command");
    };
    assert_eq!(args.repeats, Some(8));
    assert_eq!(args.confidence, Some(0.05));
    assert_eq!(args.initial_point_generator, Some(InitialPointGenerator::Lhs));
    assert_eq!(args.initial_points, Some(4));
    assert_eq!(
        args.previous_results,
        vec![PathBuf::from("a-dump.json"), PathBuf::from("b-dump.json")]
    );
    assert_eq!(args.seed, Some(17));
}

#[test]
fn test_unknown_benchmark_rejected() {
    let result = Cli::try_parse_from(vec!["jsc-tune", "run", "-b", "Octane"]);
    assert!(result.is_err());
}

#[test]
fn test_history_requires_files() {
    assert!(Cli::try_parse_from(vec!["jsc-tune", "history"]).is_err());

    let cli = Cli::try_parse_from(vec!["jsc-tune", "history", "x-dump.json", "--json"]).unwrap();
    assert!(cli.json);
    match cli.command {
        Commands::History(args) => assert_eq!(args.files, vec![PathBuf::from("x-dump.json")]),
        other => panic!("Expected history command, got {other:?}"),
    }
}

#[test]
fn test_global_options() {
    let cli =
        Cli::try_parse_from(vec!["jsc-tune", "-vv", "--config", "/etc/tune.yaml", "benchmarks"])
            .unwrap();
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config, Some(PathBuf::from("/etc/tune.yaml")));
    assert!(matches!(cli.command, Commands::Benchmarks));
}
