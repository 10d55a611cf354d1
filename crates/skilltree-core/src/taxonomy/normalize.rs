//! Normalization of heterogeneous taxonomy JSON
//!
//! Upstream roadmaps describe nodes with varying field names
//! (`label`, `data.label`, `title`, ...). Everything is converted into
//! [`TaxonomyEntry`] here so the rest of the crate never branches on the
//! shape of a particular source.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde_json::Value;
use tracing::{debug, warn};

use super::types::{Category, Difficulty, EntryMetadata, TaxonomyEntry, TaxonomySource};
use crate::error::{Error, Result};

/// Maximum number of generated keywords per entry
pub const MAX_GENERATED_KEYWORDS: usize = 15;

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "should", "could", "may", "might", "must", "can", "this", "that",
];

/// Rule table for categorizing free text, evaluated in order
const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (
        Category::Language,
        &[
            "javascript", "typescript", "python", "java", "go", "rust", "c++", "c#", "php", "ruby",
            "kotlin", "swift", "scala", "language",
        ],
    ),
    (
        Category::Framework,
        &[
            "react", "vue", "angular", "flask", "spring", "express", "laravel", "asp.net", "rails",
            "fastapi", "framework", "library",
        ],
    ),
    (
        Category::Database,
        &[
            "sql", "nosql", "mongodb", "postgresql", "mysql", "redis", "cassandra", "database",
            "db", "orm",
        ],
    ),
    (
        Category::Devops,
        &[
            "docker", "kubernetes", "ci/cd", "jenkins", "github actions", "gitlab ci",
            "deployment", "pipeline", "devops",
        ],
    ),
    (
        Category::Cloud,
        &["aws", "azure", "gcp", "cloud", "serverless", "lambda", "ec2"],
    ),
    (
        Category::Testing,
        &["test", "jest", "mocha", "cypress", "selenium", "junit", "testing"],
    ),
    (
        Category::Security,
        &[
            "security", "authentication", "authorization", "oauth", "jwt", "encryption", "ssl",
            "tls",
        ],
    ),
    (
        Category::Frontend,
        &["html", "css", "dom", "browser", "webpack", "vite", "frontend", "ui", "ux"],
    ),
    (
        Category::Backend,
        &["api", "rest", "graphql", "microservices", "backend", "server"],
    ),
    (
        Category::Mobile,
        &["android", "ios", "mobile", "react native", "flutter"],
    ),
    (
        Category::DataScience,
        &[
            "machine learning", "ai", "data science", "analytics", "ml", "tensorflow", "pytorch",
            "numpy", "pandas",
        ],
    ),
    (
        Category::Tools,
        &["git", "npm", "yarn", "webpack", "babel", "eslint", "tool"],
    ),
];

const ADVANCED_TERMS: &[&str] = &["kubernetes", "microservices", "system design", "architecture", "advanced"];
const INTERMEDIATE_TERMS: &[&str] = &["api", "database", "framework", "testing"];

/// Normalize a raw JSON document into a taxonomy source
pub fn normalize_source(name: &str, raw: &Value) -> Result<TaxonomySource> {
    let (nodes, edges) = raw_nodes(raw).ok_or_else(|| Error::TaxonomyParse {
        source_name: name.to_string(),
        message: "expected an object with `entries`, `nodes` or `content`, or an array".to_string(),
    })?;

    let edge_parents = edge_parents(&edges);
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(nodes.len());

    for node in &nodes {
        let Some(entry) = normalize_node(node, &edge_parents) else {
            continue;
        };
        if !seen.insert(entry.key.clone()) {
            warn!(source = %name, key = %entry.key, "Duplicate key within taxonomy source, keeping first");
            continue;
        }
        entries.push(entry);
    }

    debug!(source = %name, entries = entries.len(), "Normalized taxonomy source");
    Ok(TaxonomySource::new(name, entries))
}

/// Extract raw node objects and edges from any of the supported shapes
fn raw_nodes(raw: &Value) -> Option<(Vec<Value>, Vec<Value>)> {
    let edges = raw
        .get("edges")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    if let Some(entries) = raw.get("entries").and_then(Value::as_array) {
        return Some((entries.clone(), edges));
    }
    if let Some(nodes) = raw.get("nodes").and_then(Value::as_array) {
        return Some((nodes.clone(), edges));
    }
    if let Some(array) = raw.as_array() {
        return Some((array.clone(), edges));
    }
    if let Some(content) = raw.get("content") {
        let mut found = Vec::new();
        collect_labelled(content, &mut found);
        return Some((found, edges));
    }
    None
}

/// Depth-first collection of every object that carries a label-like field
fn collect_labelled(value: &Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| collect_labelled(item, out)),
        Value::Object(map) => {
            if ["label", "title", "name"].iter().any(|k| map.contains_key(*k)) {
                out.push(value.clone());
            }
            map.values().for_each(|v| collect_labelled(v, out));
        }
        _ => {}
    }
}

/// Map of target id -> source id, first edge wins
fn edge_parents(edges: &[Value]) -> HashMap<String, String> {
    let mut parents = HashMap::new();
    for edge in edges {
        let source = first_str(edge, &["source", "from"]);
        let target = first_str(edge, &["target", "to"]);
        if let (Some(source), Some(target)) = (source, target) {
            parents.entry(target.to_string()).or_insert_with(|| source.to_string());
        }
    }
    parents
}

fn normalize_node(node: &Value, edge_parents: &HashMap<String, String>) -> Option<TaxonomyEntry> {
    if !node.is_object() {
        return None;
    }

    let label = extract_label(node);
    let description = extract_description(node);
    let raw_id = first_str(node, &["key", "id"]).map(str::to_string);
    let key = raw_id
        .as_deref()
        .map(slugify)
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| slugify(&label));
    if key.is_empty() {
        return None;
    }

    let category = match first_str(node, &["category"]) {
        Some(explicit) => Category::from_str(explicit),
        None => categorize(&label, &description),
    };

    let keywords: BTreeSet<String> = match node.get("keywords").and_then(Value::as_array) {
        Some(list) => list
            .iter()
            .filter_map(Value::as_str)
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect(),
        None => generate_keywords(&label, &description).into_iter().collect(),
    };

    let parent_key = first_str(node, &["parent", "parentKey", "parent_key"])
        .map(slugify)
        .or_else(|| {
            raw_id
                .as_deref()
                .and_then(|id| edge_parents.get(id))
                .map(|p| slugify(p))
        })
        .filter(|p| !p.is_empty() && *p != key);

    let weight = node
        .get("weight")
        .and_then(Value::as_f64)
        .filter(|w| w.is_finite() && *w >= 0.0)
        .unwrap_or(1.0);

    let difficulty = node
        .get("metadata")
        .and_then(|m| m.get("difficulty"))
        .or_else(|| node.get("difficulty"))
        .and_then(Value::as_str)
        .map(Difficulty::from_str)
        .unwrap_or_else(|| estimate_difficulty(&label));

    let required = node
        .get("required")
        .or_else(|| node.get("metadata").and_then(|m| m.get("required")))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Some(TaxonomyEntry {
        key,
        display_name: label,
        keywords,
        category,
        parent_key,
        weight,
        metadata: EntryMetadata {
            icon: first_str(node, &["icon"]).map(str::to_string),
            description,
            difficulty,
            required,
        },
    })
}

fn first_str<'a>(value: &'a Value, fields: &[&str]) -> Option<&'a str> {
    fields
        .iter()
        .filter_map(|f| value.get(*f).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Label lookup: `label`, `data.label`, `title`, `name`, `text`, `id`
pub fn extract_label(node: &Value) -> String {
    first_str(node, &["label"])
        .or_else(|| node.get("data").and_then(|d| first_str(d, &["label"])))
        .or_else(|| first_str(node, &["title", "name", "text", "id"]))
        .unwrap_or("Unknown")
        .to_string()
}

/// Description lookup: `description`, `data.description`, `desc`, `content`
pub fn extract_description(node: &Value) -> String {
    first_str(node, &["description"])
        .or_else(|| node.get("data").and_then(|d| first_str(d, &["description"])))
        .or_else(|| first_str(node, &["desc", "content"]))
        .unwrap_or("")
        .to_string()
}

/// Lower-case slug joining alphanumeric runs with `-`
pub fn slugify(label: &str) -> String {
    label
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Rule-based category for a label and description
pub fn categorize(label: &str, description: &str) -> Category {
    let text = format!("{} {}", label, description).to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Concept)
}

/// Keywords derived from label and description text
pub fn generate_keywords(label: &str, description: &str) -> Vec<String> {
    let text = format!("{} {}", label, description).to_lowercase();
    let mut seen = HashSet::new();

    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| w.chars().count() > 2 && !STOPWORDS.contains(w))
        .filter(|w| seen.insert(w.to_string()))
        .take(MAX_GENERATED_KEYWORDS)
        .map(str::to_string)
        .collect()
}

pub fn estimate_difficulty(label: &str) -> Difficulty {
    let label = label.to_lowercase();
    if ADVANCED_TERMS.iter().any(|t| label.contains(t)) {
        Difficulty::Advanced
    } else if INTERMEDIATE_TERMS.iter().any(|t| label.contains(t)) {
        Difficulty::Intermediate
    } else {
        Difficulty::Beginner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_entries() {
        let raw = json!({
            "entries": [
                {"key": "rust", "label": "Rust", "category": "language", "keywords": ["rust", "cargo"], "weight": 1.2},
                {"key": "tokio", "label": "Tokio", "category": "framework", "keywords": ["tokio"], "parent": "rust"}
            ]
        });

        let source = normalize_source("systems", &raw).unwrap();
        assert_eq!(source.name, "systems");
        assert_eq!(source.len(), 2);

        let rust = &source.entries[0];
        assert_eq!(rust.key, "rust");
        assert_eq!(rust.display_name, "Rust");
        assert_eq!(rust.category, Category::Language);
        assert_eq!(rust.weight, 1.2);
        assert!(rust.keywords.contains("cargo"));

        assert_eq!(source.entries[1].parent_key.as_deref(), Some("rust"));
    }

    #[test]
    fn test_roadmap_nodes_with_edges() {
        let raw = json!({
            "nodes": [
                {"id": "internet", "data": {"label": "Internet", "description": "How the web works"}},
                {"id": "HTTP", "data": {"label": "HTTP"}, "type": "topic"}
            ],
            "edges": [{"source": "internet", "target": "HTTP"}]
        });

        let source = normalize_source("frontend", &raw).unwrap();
        assert_eq!(source.entries[0].display_name, "Internet");
        assert_eq!(source.entries[0].metadata.description, "How the web works");
        assert_eq!(source.entries[1].key, "http");
        assert_eq!(source.entries[1].parent_key.as_deref(), Some("internet"));
    }

    #[test]
    fn test_nested_content_is_traversed() {
        let raw = json!({
            "content": {
                "sections": [
                    {"title": "Docker", "children": [{"name": "Docker Compose"}]},
                    {"irrelevant": 3}
                ]
            }
        });

        let source = normalize_source("devops", &raw).unwrap();
        let keys: Vec<_> = source.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["docker", "docker-compose"]);
        assert_eq!(source.entries[0].category, Category::Devops);
    }

    #[test]
    fn test_unsupported_shape() {
        let err = normalize_source("bad", &json!("just a string")).unwrap_err();
        assert_eq!(err.code(), "E002");
    }

    #[test]
    fn test_duplicate_keys_keep_first() {
        let raw = json!([
            {"key": "go", "label": "Go", "category": "language"},
            {"key": "go", "label": "Golang", "category": "language"}
        ]);
        let source = normalize_source("langs", &raw).unwrap();
        assert_eq!(source.len(), 1);
        assert_eq!(source.entries[0].display_name, "Go");
    }

    #[test]
    fn test_self_parent_is_dropped() {
        let raw = json!([{"key": "sql", "label": "SQL", "parent": "SQL"}]);
        let source = normalize_source("db", &raw).unwrap();
        assert_eq!(source.entries[0].parent_key, None);
    }

    #[test]
    fn test_extract_label_fallbacks() {
        assert_eq!(extract_label(&json!({"label": "A", "title": "B"})), "A");
        assert_eq!(extract_label(&json!({"data": {"label": "C"}, "title": "B"})), "C");
        assert_eq!(extract_label(&json!({"text": "T"})), "T");
        assert_eq!(extract_label(&json!({})), "Unknown");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Node.js & Express"), "node-js-express");
        assert_eq!(slugify("  --C++-- "), "c");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_categorize_rules_in_order() {
        assert_eq!(categorize("TypeScript", ""), Category::Language);
        assert_eq!(categorize("Redis", "in-memory store"), Category::Database);
        assert_eq!(categorize("Kubernetes", ""), Category::Devops);
        assert_eq!(categorize("Jest", ""), Category::Testing);
        assert_eq!(categorize("Pandas", ""), Category::DataScience);
        assert_eq!(categorize("Big O", ""), Category::Concept);
    }

    #[test]
    fn test_generate_keywords() {
        let keywords = generate_keywords("Docker Compose", "Define and run multi-container apps with Docker");
        assert_eq!(keywords[0], "docker");
        assert_eq!(keywords[1], "compose");
        assert!(!keywords.contains(&"and".to_string()));
        assert!(!keywords.contains(&"with".to_string()));
        assert!(keywords.contains(&"container".to_string()));
        assert_eq!(keywords.iter().filter(|k| *k == "docker").count(), 1);
    }

    #[test]
    fn test_generate_keywords_is_capped() {
        let text = (0..40).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        assert_eq!(generate_keywords(&text, "").len(), MAX_GENERATED_KEYWORDS);
    }

    #[test]
    fn test_estimate_difficulty() {
        assert_eq!(estimate_difficulty("Kubernetes Operators"), Difficulty::Advanced);
        assert_eq!(estimate_difficulty("REST API"), Difficulty::Intermediate);
        assert_eq!(estimate_difficulty("HTML"), Difficulty::Beginner);
    }

    #[test]
    fn test_invalid_weight_defaults_to_one() {
        let raw = json!([{"key": "x", "label": "X", "weight": -2.0}]);
        let source = normalize_source("w", &raw).unwrap();
        assert_eq!(source.entries[0].weight, 1.0);
    }
}
