//! CLI tests

use clap::{CommandFactory, Parser};

use crate::{Cli, Commands, ConfigAction, OutputFormat, TaxonomyAction};

#[test]
fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_infer_args_parsing() {
    let cli = Cli::try_parse_from([
        "skilltree", "infer", "repos.json", "-s", "core", "--source", "team", "--center", "Ada", "--ascii",
    ])
    .unwrap();

    assert_eq!(cli.format, OutputFormat::Text);
    match cli.command {
        Commands::Infer {
            input,
            sources,
            center,
            ascii,
        } => {
            assert_eq!(input.to_str(), Some("repos.json"));
            assert_eq!(sources, vec!["core", "team"]);
            assert_eq!(center.as_deref(), Some("Ada"));
            assert!(ascii);
        }
        _ => panic!("expected infer"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "skilltree", "match", "-", "--format", "json", "-q", "--taxonomy-dir", "/tmp/tax",
    ])
    .unwrap();

    assert_eq!(cli.format, OutputFormat::Json);
    assert!(cli.quiet);
    assert_eq!(cli.taxonomy_dir.as_deref().and_then(|p| p.to_str()), Some("/tmp/tax"));
    assert!(matches!(cli.command, Commands::Match { .. }));
}

#[test]
fn test_taxonomy_actions_parsing() {
    let cli = Cli::try_parse_from(["skilltree", "taxonomy", "show", "core", "-c", "database"]).unwrap();
    match cli.command {
        Commands::Taxonomy {
            action: TaxonomyAction::Show { name, category },
        } => {
            assert_eq!(name, "core");
            assert_eq!(category.as_deref(), Some("database"));
        }
        _ => panic!("expected taxonomy show"),
    }

    let cli = Cli::try_parse_from(["skilltree", "taxonomy", "check"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Taxonomy {
            action: TaxonomyAction::Check { ref names }
        } if names.is_empty()
    ));
}

#[test]
fn test_config_action_parsing() {
    let cli = Cli::try_parse_from(["skilltree", "config", "set", "layout.width", "1000"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Config {
            action: ConfigAction::Set { .. }
        }
    ));
}

#[test]
fn test_invalid_format_rejected() {
    assert!(Cli::try_parse_from(["skilltree", "taxonomy", "list", "--format", "yaml"]).is_err());
    assert!(Cli::try_parse_from(["skilltree", "infer"]).is_err());
}
