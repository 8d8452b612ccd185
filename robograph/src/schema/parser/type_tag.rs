// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Parser for property type spellings (STRING, INT64[], MAP(STRING, DOUBLE), DECIMAL(18, 2))

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map, map_res},
    multi::many0,
    sequence::{delimited, preceded, separated_pair, terminated, tuple},
    IResult,
};

use crate::schema::types::TypeTag;
use crate::schema::{SchemaError, SchemaResult};

/// Syntax tree produced before resolving words against the supported tags
#[derive(Debug, Clone, PartialEq)]
enum RawType {
    Word(String),
    Decimal(u8, u8),
    Map(Box<RawType>, Box<RawType>),
    List(Box<RawType>),
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn parse_word(input: &str) -> IResult<&str, RawType> {
    map(
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        |word: &str| RawType::Word(word.to_string()),
    )(input)
}

fn parse_u8(input: &str) -> IResult<&str, u8> {
    map_res(digit1, |digits: &str| digits.parse::<u8>())(input)
}

fn parse_decimal(input: &str) -> IResult<&str, RawType> {
    map(
        preceded(
            tag_no_case("DECIMAL"),
            delimited(
                ws(char('(')),
                separated_pair(ws(parse_u8), char(','), ws(parse_u8)),
                ws(char(')')),
            ),
        ),
        |(precision, scale)| RawType::Decimal(precision, scale),
    )(input)
}

fn parse_map(input: &str) -> IResult<&str, RawType> {
    map(
        preceded(
            tag_no_case("MAP"),
            delimited(
                ws(char('(')),
                separated_pair(ws(parse_raw_type), char(','), ws(parse_raw_type)),
                ws(char(')')),
            ),
        ),
        |(key, value)| RawType::Map(Box::new(key), Box::new(value)),
    )(input)
}

fn parse_raw_type(input: &str) -> IResult<&str, RawType> {
    map(
        tuple((
            alt((parse_decimal, parse_map, parse_word)),
            many0(preceded(multispace0, tag("[]"))),
        )),
        |(base, suffixes)| {
            suffixes
                .into_iter()
                .fold(base, |inner, _| RawType::List(Box::new(inner)))
        },
    )(input)
}

fn resolve_word(word: &str) -> Option<TypeTag> {
    let tag = match word.to_ascii_uppercase().as_str() {
        "STRING" | "STR" | "TEXT" | "VARCHAR" => TypeTag::String,
        "INT8" | "TINYINT" => TypeTag::Int8,
        "INT16" | "SMALLINT" => TypeTag::Int16,
        "INT32" | "INT" | "INTEGER" => TypeTag::Int32,
        "INT64" | "BIGINT" | "LONG" => TypeTag::Int64,
        "UINT8" => TypeTag::UInt8,
        "UINT16" => TypeTag::UInt16,
        "UINT32" => TypeTag::UInt32,
        "UINT64" => TypeTag::UInt64,
        "FLOAT" | "FLOAT32" | "REAL" => TypeTag::Float,
        "DOUBLE" | "FLOAT64" => TypeTag::Double,
        "DECIMAL" | "NUMERIC" => TypeTag::Decimal {
            precision: 18,
            scale: 2,
        },
        "BOOLEAN" | "BOOL" => TypeTag::Boolean,
        "DATE" => TypeTag::Date,
        "TIMESTAMP" | "DATETIME" => TypeTag::Timestamp,
        "INTERVAL" => TypeTag::Interval,
        "BLOB" | "BYTES" => TypeTag::Blob,
        "UUID" => TypeTag::Uuid,
        _ => return None,
    };
    Some(tag)
}

fn resolve(raw: RawType) -> Option<TypeTag> {
    match raw {
        RawType::Word(word) => resolve_word(&word),
        RawType::Decimal(precision, scale) if scale <= precision && precision > 0 => {
            Some(TypeTag::Decimal { precision, scale })
        }
        RawType::Decimal(_, _) => None,
        RawType::Map(key, value) => Some(TypeTag::Map(
            Box::new(resolve(*key)?),
            Box::new(resolve(*value)?),
        )),
        RawType::List(inner) => Some(TypeTag::List(Box::new(resolve(*inner)?))),
    }
}

/// Parse a type spelling into a [`TypeTag`]
pub fn parse_type_tag(spelling: &str) -> SchemaResult<TypeTag> {
    let unsupported = || SchemaError::UnsupportedType {
        property: String::new(),
        type_name: spelling.to_string(),
    };

    let (_, raw) = all_consuming(terminated(ws(parse_raw_type), multispace0))(spelling)
        .map_err(|_| unsupported())?;

    resolve(raw).ok_or_else(unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_spellings_are_case_insensitive() {
        assert_eq!(parse_type_tag("string").unwrap(), TypeTag::String);
        assert_eq!(parse_type_tag("Int64").unwrap(), TypeTag::Int64);
        assert_eq!(parse_type_tag(" DOUBLE ").unwrap(), TypeTag::Double);
        assert_eq!(parse_type_tag("bool").unwrap(), TypeTag::Boolean);
        assert_eq!(parse_type_tag("datetime").unwrap(), TypeTag::Timestamp);
        assert_eq!(parse_type_tag("INT").unwrap(), TypeTag::Int32);
    }

    #[test]
    fn test_composite_types() {
        assert_eq!(
            parse_type_tag("STRING[]").unwrap(),
            TypeTag::List(Box::new(TypeTag::String))
        );
        assert_eq!(
            parse_type_tag("int64[][]").unwrap(),
            TypeTag::List(Box::new(TypeTag::List(Box::new(TypeTag::Int64))))
        );
        assert_eq!(
            parse_type_tag("MAP(STRING, DOUBLE)").unwrap(),
            TypeTag::Map(Box::new(TypeTag::String), Box::new(TypeTag::Double))
        );
        assert_eq!(
            parse_type_tag("decimal(18, 4)").unwrap(),
            TypeTag::Decimal {
                precision: 18,
                scale: 4
            }
        );
    }

    #[test]
    fn test_display_round_trips() {
        for spelling in ["STRING", "INT64[]", "MAP(STRING, INT32[])", "DECIMAL(10, 2)"] {
            assert_eq!(parse_type_tag(spelling).unwrap().to_string(), spelling);
        }
    }

    #[test]
    fn test_unsupported_types_are_rejected() {
        for spelling in ["VARIANT", "", "MAP(STRING)", "DECIMAL(2, 5)", "STRING[", "INT 64"] {
            match parse_type_tag(spelling) {
                Err(SchemaError::UnsupportedType { type_name, .. }) => {
                    assert_eq!(type_name, spelling)
                }
                other => panic!("expected unsupported type for {:?}, got {:?}", spelling, other),
            }
        }
    }
}
