// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// RoboLedger extension: general ledger, transactions and counterparties

use super::{pk, prop, text};
use crate::schema::registry::SchemaModule;
use crate::schema::types::{Node, Relationship, SchemaVersion, TypeTag};

pub const NAME: &str = "roboledger";

pub fn module() -> SchemaModule {
    SchemaModule::new(NAME)
        .with_version(SchemaVersion::new(1, 0, 0))
        .with_description("General ledger accounting")
        .with_nodes(nodes())
        .with_relationships(relationships())
}

fn nodes() -> Vec<Node> {
    vec![
        Node::new(
            "Account",
            vec![
                pk("identifier"),
                text("name"),
                text("number"),
                text("classification"),
                text("sub_classification"),
                text("balance_type"),
                text("currency"),
                prop("is_active", TypeTag::Boolean),
                prop("depth", TypeTag::Int32),
            ],
        ),
        Node::new(
            "Transaction",
            vec![
                pk("identifier"),
                text("number"),
                text("type"),
                prop("date", TypeTag::Date),
                prop("amount", TypeTag::Double),
                text("currency"),
                text("memo"),
                text("reference"),
                prop("posted_at", TypeTag::Timestamp),
            ],
        ),
        Node::new(
            "LineItem",
            vec![
                pk("identifier"),
                text("description"),
                prop("debit_amount", TypeTag::Double),
                prop("credit_amount", TypeTag::Double),
                prop("line_order", TypeTag::Int32),
            ],
        ),
        Node::new(
            "Contact",
            vec![
                pk("identifier"),
                text("name"),
                text("email"),
                text("phone"),
                text("type"),
            ],
        )
        .with_description("Vendor or customer counterparty"),
        Node::new(
            "Process",
            vec![
                pk("identifier"),
                text("name"),
                text("status"),
                prop("started_at", TypeTag::Timestamp),
                prop("completed_at", TypeTag::Timestamp),
            ],
        ),
    ]
}

fn relationships() -> Vec<Relationship> {
    vec![
        Relationship::new("ENTITY_HAS_ACCOUNT", "Entity", "Account"),
        Relationship::new("ENTITY_HAS_TRANSACTION", "Entity", "Transaction"),
        Relationship::new("TRANSACTION_HAS_LINE_ITEM", "Transaction", "LineItem"),
        Relationship::new("LINE_ITEM_RELATES_TO_ACCOUNT", "LineItem", "Account"),
        Relationship::new("TRANSACTION_HAS_CONTACT", "Transaction", "Contact"),
        Relationship::new("ACCOUNT_HAS_PARENT", "Account", "Account"),
        Relationship::new("ACCOUNT_MAPS_TO_ELEMENT", "Account", "Element")
            .with_properties(vec![prop("confidence", TypeTag::Double)]),
        Relationship::new("PROCESS_PRODUCED_REPORT", "Process", "Report"),
    ]
}
