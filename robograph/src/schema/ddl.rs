// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// DDL rendering shared by the schema model and the ingestion engine
//
// Every statement carries IF NOT EXISTS so re-running composition against an
// initialized store never recreates a table.

/// Identifiers that collide with storage keywords and must be quoted
pub const RESERVED_KEYWORDS: &[&str] = &["order", "group", "select", "from", "where", "having", "to"];

pub fn is_reserved_keyword(identifier: &str) -> bool {
    RESERVED_KEYWORDS
        .iter()
        .any(|kw| kw.eq_ignore_ascii_case(identifier))
}

/// Backtick-quote an identifier when it collides with a reserved keyword
pub fn quote_identifier(identifier: &str) -> String {
    if is_reserved_keyword(identifier) {
        format!("`{}`", identifier)
    } else {
        identifier.to_string()
    }
}

/// `CREATE NODE TABLE IF NOT EXISTS name(col TYPE, ..., PRIMARY KEY(pk, ...))`
pub fn render_node_table<S: AsRef<str>>(
    table: &str,
    columns: &[(S, String)],
    primary_keys: &[S],
) -> String {
    let mut parts: Vec<String> = columns
        .iter()
        .map(|(name, type_name)| format!("{} {}", quote_identifier(name.as_ref()), type_name))
        .collect();

    let keys: Vec<String> = primary_keys
        .iter()
        .map(|k| quote_identifier(k.as_ref()))
        .collect();
    parts.push(format!("PRIMARY KEY({})", keys.join(", ")));

    format!(
        "CREATE NODE TABLE IF NOT EXISTS {}({})",
        quote_identifier(table),
        parts.join(", ")
    )
}

/// `CREATE REL TABLE IF NOT EXISTS name(FROM a TO b[, FROM c TO d], col TYPE, ...)`
pub fn render_rel_table<S: AsRef<str>>(
    table: &str,
    endpoints: &[(String, String)],
    columns: &[(S, String)],
) -> String {
    let mut parts: Vec<String> = endpoints
        .iter()
        .map(|(from, to)| format!("FROM {} TO {}", quote_identifier(from), quote_identifier(to)))
        .collect();

    parts.extend(
        columns
            .iter()
            .map(|(name, type_name)| format!("{} {}", quote_identifier(name.as_ref()), type_name)),
    );

    format!(
        "CREATE REL TABLE IF NOT EXISTS {}({})",
        quote_identifier(table),
        parts.join(", ")
    )
}
