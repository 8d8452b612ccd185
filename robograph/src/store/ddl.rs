// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Reader for the table DDL dialect the store accepts
//
//   CREATE NODE TABLE [IF NOT EXISTS] name(col TYPE, ..., PRIMARY KEY(k, ...))
//   CREATE REL TABLE [IF NOT EXISTS] name(FROM a TO b[, FROM c TO d], col TYPE, ...)
//
// Identifiers may be backtick-quoted. Types are kept as written, including
// parenthesized arguments and list suffixes.

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, tag_no_case, take_while, take_while1},
    character::complete::{char, multispace0, multispace1, satisfy},
    combinator::{all_consuming, map, opt, recognize, value},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use super::{StoreError, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableDeclKind {
    Node,
    Rel,
}

/// A parsed `CREATE ... TABLE` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDecl {
    pub kind: TableDeclKind,
    pub name: String,
    pub if_not_exists: bool,
    /// `(name, type)` in declaration order
    pub columns: Vec<(String, String)>,
    pub primary_keys: Vec<String>,
    /// `(from, to)` node table pairs; empty for node tables
    pub endpoints: Vec<(String, String)>,
}

impl TableDecl {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn column_type(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, type_name)| type_name.as_str())
    }
}

enum Element {
    Column(String, String),
    PrimaryKey(Vec<String>),
    Endpoint(String, String),
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn bare_identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
            take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        )),
        String::from,
    )(input)
}

fn quoted_identifier(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('`'), take_while1(|c: char| c != '`'), char('`')),
        String::from,
    )(input)
}

fn identifier(input: &str) -> IResult<&str, String> {
    alt((quoted_identifier, bare_identifier))(input)
}

fn paren_group(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('('),
        many0(alt((is_not("()"), paren_group))),
        char(')'),
    ))(input)
}

fn type_spelling(input: &str) -> IResult<&str, String> {
    map(
        recognize(tuple((
            take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
            opt(preceded(multispace0, paren_group)),
            many0(preceded(multispace0, tag("[]"))),
        ))),
        String::from,
    )(input)
}

fn primary_key(input: &str) -> IResult<&str, Element> {
    map(
        preceded(
            tuple((
                tag_no_case("PRIMARY"),
                multispace1,
                tag_no_case("KEY"),
                multispace0,
            )),
            delimited(
                char('('),
                separated_list1(char(','), ws(identifier)),
                char(')'),
            ),
        ),
        Element::PrimaryKey,
    )(input)
}

fn endpoint(input: &str) -> IResult<&str, Element> {
    map(
        tuple((
            tag_no_case("FROM"),
            multispace1,
            identifier,
            multispace1,
            tag_no_case("TO"),
            multispace1,
            identifier,
        )),
        |(_, _, from, _, _, _, to)| Element::Endpoint(from, to),
    )(input)
}

fn column(input: &str) -> IResult<&str, Element> {
    map(
        tuple((identifier, multispace1, type_spelling)),
        |(name, _, type_name)| Element::Column(name, type_name),
    )(input)
}

fn element(input: &str) -> IResult<&str, Element> {
    alt((primary_key, endpoint, column))(input)
}

type Statement = (TableDeclKind, bool, String, Vec<Element>);

fn statement(input: &str) -> IResult<&str, Statement> {
    map(
        tuple((
            preceded(multispace0, tag_no_case("CREATE")),
            preceded(
                multispace1,
                alt((
                    value(TableDeclKind::Node, tag_no_case("NODE")),
                    value(TableDeclKind::Rel, tag_no_case("REL")),
                )),
            ),
            preceded(multispace1, tag_no_case("TABLE")),
            opt(preceded(
                multispace1,
                tuple((
                    tag_no_case("IF"),
                    multispace1,
                    tag_no_case("NOT"),
                    multispace1,
                    tag_no_case("EXISTS"),
                )),
            )),
            preceded(multispace1, identifier),
            preceded(
                multispace0,
                delimited(
                    char('('),
                    separated_list1(char(','), ws(element)),
                    char(')'),
                ),
            ),
            tuple((multispace0, opt(char(';')), multispace0)),
        )),
        |(_, kind, _, if_not_exists, name, elements, _)| {
            (kind, if_not_exists.is_some(), name, elements)
        },
    )(input)
}

/// Parse one table declaration
pub fn parse_statement(text: &str) -> StoreResult<TableDecl> {
    let (_, (kind, if_not_exists, name, elements)) = all_consuming(statement)(text)
        .map_err(|e| StoreError::Parse(format!("{}: {}", text.trim(), e)))?;

    let mut decl = TableDecl {
        kind,
        name,
        if_not_exists,
        columns: Vec::new(),
        primary_keys: Vec::new(),
        endpoints: Vec::new(),
    };

    let mut primary_key_clauses = 0;
    for element in elements {
        match element {
            Element::Column(name, type_name) => decl.columns.push((name, type_name)),
            Element::PrimaryKey(keys) => {
                primary_key_clauses += 1;
                decl.primary_keys = keys;
            }
            Element::Endpoint(from, to) => decl.endpoints.push((from, to)),
        }
    }

    match decl.kind {
        TableDeclKind::Node => {
            if primary_key_clauses != 1 {
                return Err(StoreError::Parse(format!(
                    "Node table '{}' needs exactly one PRIMARY KEY clause",
                    decl.name
                )));
            }
            if !decl.endpoints.is_empty() {
                return Err(StoreError::Parse(format!(
                    "Node table '{}' cannot declare FROM/TO endpoints",
                    decl.name
                )));
            }
            if let Some(missing) = decl
                .primary_keys
                .iter()
                .find(|k| decl.column_type(k).is_none())
            {
                return Err(StoreError::Parse(format!(
                    "Primary key '{}' of '{}' is not a declared column",
                    missing, decl.name
                )));
            }
        }
        TableDeclKind::Rel => {
            if decl.endpoints.is_empty() {
                return Err(StoreError::Parse(format!(
                    "Relationship table '{}' needs at least one FROM/TO pair",
                    decl.name
                )));
            }
            if primary_key_clauses > 0 {
                return Err(StoreError::Parse(format!(
                    "Relationship table '{}' cannot declare a primary key",
                    decl.name
                )));
            }
        }
    }

    Ok(decl)
}

/// Parse a `;`-separated script of table declarations
pub fn parse_script(script: &str) -> StoreResult<Vec<TableDecl>> {
    script
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_statement)
        .collect()
}
