//! コマンドライン引数の解析テスト

use bias_tagger::cli::{Cli, Commands};
use clap::Parser;

#[test]
fn test_review_with_limit() {
    let cli = Cli::try_parse_from(["bias-tagger", "review", "--limit", "5"]).unwrap();
    assert!(matches!(cli.command, Commands::Review { limit: Some(5) }));
    assert!(!cli.verbose);
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["bias-tagger", "stats", "--watch", "-v", "--server", "http://h:1"]).unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.server.as_deref(), Some("http://h:1"));
    match cli.command {
        Commands::Stats { watch, interval, json } => {
            assert!(watch);
            assert_eq!(interval, None);
            assert!(!json);
        }
        _ => panic!("expected stats"),
    }
}

#[test]
fn test_config_flags() {
    let cli = Cli::try_parse_from(["bias-tagger", "config", "--set-timeout", "0", "--show"]).unwrap();
    match cli.command {
        Commands::Config { set_server, set_timeout, show } => {
            assert_eq!(set_server, None);
            assert_eq!(set_timeout, Some(0));
            assert!(show);
        }
        _ => panic!("expected config"),
    }
}

#[test]
fn test_subcommand_required() {
    assert!(Cli::try_parse_from(["bias-tagger"]).is_err());
    assert!(Cli::try_parse_from(["bias-tagger", "seed"]).is_ok());
}
