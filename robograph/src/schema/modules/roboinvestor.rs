// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// RoboInvestor extension: portfolios, securities and positions

use super::{pk, prop, text};
use crate::schema::registry::SchemaModule;
use crate::schema::types::{Node, Relationship, SchemaVersion, TypeTag};

pub const NAME: &str = "roboinvestor";

pub fn module() -> SchemaModule {
    SchemaModule::new(NAME)
        .with_version(SchemaVersion::new(1, 0, 0))
        .with_description("Portfolio and investment tracking")
        .with_nodes(nodes())
        .with_relationships(relationships())
}

fn nodes() -> Vec<Node> {
    vec![
        Node::new(
            "Portfolio",
            vec![
                pk("identifier"),
                text("name"),
                text("strategy"),
                text("base_currency"),
                prop("inception_date", TypeTag::Date),
            ],
        ),
        Node::new(
            "Security",
            vec![
                pk("identifier"),
                text("ticker"),
                text("name"),
                text("security_type"),
                text("exchange"),
                text("cusip"),
                text("isin"),
            ],
        ),
        Node::new(
            "Position",
            vec![
                pk("identifier"),
                prop("quantity", TypeTag::Double),
                prop("cost_basis", TypeTag::Double),
                prop("market_value", TypeTag::Double),
                prop("as_of_date", TypeTag::Date),
            ],
        ),
        Node::new(
            "Trade",
            vec![
                pk("identifier"),
                text("side"),
                prop("quantity", TypeTag::Double),
                prop("price", TypeTag::Double),
                prop("executed_at", TypeTag::Timestamp),
            ],
        ),
        Node::new(
            "Contact",
            vec![
                pk("identifier"),
                text("name"),
                text("email"),
                text("firm"),
                text("role"),
            ],
        )
        .with_description("Advisor or broker contact"),
    ]
}

fn relationships() -> Vec<Relationship> {
    vec![
        Relationship::new("PORTFOLIO_HAS_POSITION", "Portfolio", "Position"),
        Relationship::new("POSITION_HOLDS_SECURITY", "Position", "Security"),
        Relationship::new("PORTFOLIO_HAS_TRADE", "Portfolio", "Trade"),
        Relationship::new("TRADE_OF_SECURITY", "Trade", "Security"),
        Relationship::new("SECURITY_ISSUED_BY", "Security", "Entity"),
        Relationship::new("PORTFOLIO_HAS_ADVISOR", "Portfolio", "Contact"),
        Relationship::new("ENTITY_OWNS_PORTFOLIO", "Entity", "Portfolio")
            .with_properties(vec![prop("ownership_pct", TypeTag::Double)]),
    ]
}
