//! Config module tests

use std::path::PathBuf;

use crate::config::{Config, ProfileConfig, TaxonomyConfig};
use crate::layout::LayoutConfig;

#[test]
fn test_config_default() {
    let config = Config::default();

    // Taxonomy defaults
    assert!(config.taxonomy.dir.is_none());
    assert_eq!(config.taxonomy.default_sources, vec!["core".to_string()]);

    // Profile defaults
    assert_eq!(config.profile.center_label, "Developer");

    // Layout defaults
    assert_eq!(config.layout.max_skills_per_category, 3);
    assert_eq!(config.layout.arc_fraction, 0.7);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_get() {
    let config = Config::default();

    assert_eq!(config.get("taxonomy.default_sources").unwrap(), "core");
    assert_eq!(config.get("profile.center_label").unwrap(), "Developer");
    assert_eq!(config.get("layout.max_skills_per_category").unwrap(), "3");
    assert_eq!(config.get("layout.arc_fraction").unwrap(), "0.7");
    assert!(config.get("taxonomy.dir").unwrap().starts_with("(default"));
}

#[test]
fn test_config_get_unknown_key() {
    let config = Config::default();
    let err = config.get("llm.api_key").unwrap_err();
    assert!(err.to_string().contains("Unknown configuration key"));
}

#[test]
fn test_config_set() {
    let mut config = Config::default();

    config.set("profile.center_label", "  Octocat ").unwrap();
    assert_eq!(config.profile.center_label, "Octocat");

    config.set("taxonomy.default_sources", "core, web,,data").unwrap();
    assert_eq!(config.taxonomy.default_sources, vec!["core", "web", "data"]);

    config.set("taxonomy.dir", "/tmp/taxonomies").unwrap();
    assert_eq!(config.taxonomy.dir, Some(PathBuf::from("/tmp/taxonomies")));
    config.set("taxonomy.dir", "").unwrap();
    assert!(config.taxonomy.dir.is_none());

    config.set("layout.width", "1200").unwrap();
    assert_eq!(config.layout.width, 1200.0);

    config.set("layout.max_skills_per_category", "5").unwrap();
    assert_eq!(config.layout.max_skills_per_category, 5);
}

#[test]
fn test_config_set_rejects_invalid_values() {
    let mut config = Config::default();

    assert!(config.set("layout.width", "wide").is_err());
    assert!(config.set("layout.arc_fraction", "1.5").is_err());
    assert!(config.set("layout.max_skills_per_category", "-1").is_err());
    assert!(config.set("profile.center_label", "   ").is_err());
    assert!(config.set("taxonomy.default_sources", " , ").is_err());
    assert!(config.set("unknown.key", "value").is_err());

    // Failed sets leave the config untouched
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_list() {
    let config = Config::default();
    let entries = config.list().unwrap();

    assert_eq!(entries.len(), 11);
    assert_eq!(entries[0].0, "taxonomy.dir");
    assert!(entries.iter().any(|(k, v)| k == "profile.center_label" && v == "Developer"));
    assert!(entries.iter().all(|(k, _)| config.get(k).is_ok()));
}

#[test]
fn test_config_from_partial_toml() {
    let config = Config::from_toml(
        r#"
[profile]
center_label = "Ada"

[layout]
width = 1000.0
"#,
    )
    .unwrap();

    assert_eq!(config.profile.center_label, "Ada");
    assert_eq!(config.layout.width, 1000.0);
    assert_eq!(config.layout.ring_spacing, LayoutConfig::default().ring_spacing);
    assert_eq!(config.taxonomy, TaxonomyConfig::default());
}

#[test]
fn test_config_from_invalid_toml() {
    assert!(Config::from_toml("[layout]\narc_fraction = 0.0\n").is_err());
    assert!(Config::from_toml("[profile]\ncenter_label = 3\n").is_err());
}

#[test]
fn test_config_toml_round_trip() {
    let mut config = Config::default();
    config.taxonomy.dir = Some(PathBuf::from("/srv/taxonomies"));
    config.profile = ProfileConfig {
        center_label: "Grace".to_string(),
    };

    let text = toml::to_string_pretty(&config).unwrap();
    assert_eq!(Config::from_toml(&text).unwrap(), config);
}

#[test]
fn test_taxonomy_dir_override() {
    let mut config = Config::default();
    config.taxonomy.dir = Some(PathBuf::from("/srv/taxonomies"));
    assert_eq!(config.taxonomy_dir().unwrap(), PathBuf::from("/srv/taxonomies"));
}
