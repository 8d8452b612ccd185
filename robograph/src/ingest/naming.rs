// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Identifier casing and file-name pattern generation

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static WORD_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid word boundary pattern"));
static CASE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid case boundary pattern"));

/// Prefix used by node file patterns
pub const NODE_PREFIX: &str = "node";
/// Prefix used by relationship file patterns
pub const REL_PREFIX: &str = "rel";

/// `FactDimension` -> `fact_dimension`, `HTTPServer` -> `http_server`
///
/// Names that are already upper snake case (`ENTITY_HAS_REPORT`) are only
/// lowercased.
pub fn to_snake_case(name: &str) -> String {
    let split = WORD_BOUNDARY.replace_all(name, "${1}_${2}");
    let split = CASE_BOUNDARY.replace_all(&split, "${1}_${2}");
    split.to_lowercase()
}

/// File name patterns accepted for a table
///
/// The snake-case name, its prefixed form, a trailing-underscore form and the
/// form with every underscore removed.
pub fn file_patterns(name: &str, prefix: &str) -> BTreeSet<String> {
    let snake = to_snake_case(name);
    let mut patterns = BTreeSet::new();
    patterns.insert(format!("{}_{}", prefix, snake));
    patterns.insert(format!("{}_", snake));
    patterns.insert(snake.replace('_', ""));
    patterns.insert(snake);
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("Entity"), "entity");
        assert_eq!(to_snake_case("FactDimension"), "fact_dimension");
        assert_eq!(to_snake_case("LineItem"), "line_item");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("ENTITY_HAS_REPORT"), "entity_has_report");
        assert_eq!(to_snake_case("Element2Label"), "element2_label");
    }

    #[test]
    fn test_file_patterns() {
        let patterns = file_patterns("FactDimension", NODE_PREFIX);
        let expected: BTreeSet<String> = [
            "fact_dimension",
            "node_fact_dimension",
            "fact_dimension_",
            "factdimension",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(patterns, expected);

        let rel = file_patterns("REPORT_HAS_FACT", REL_PREFIX);
        assert!(rel.contains("rel_report_has_fact"));
        assert!(rel.contains("reporthasfact"));
    }

    #[test]
    fn test_single_word_patterns_collapse() {
        let patterns = file_patterns("Unit", NODE_PREFIX);
        assert_eq!(patterns.len(), 3);
        assert!(patterns.contains("unit"));
        assert!(patterns.contains("unit_"));
        assert!(patterns.contains("node_unit"));
    }
}
