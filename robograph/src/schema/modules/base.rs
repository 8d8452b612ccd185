// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Base schema: entities, filings and XBRL facts present in every tenant graph

use super::{pk, prop, text};
use crate::schema::registry::SchemaModule;
use crate::schema::types::{Node, Relationship, SchemaVersion, TypeTag};

pub const NAME: &str = "base";

pub fn module() -> SchemaModule {
    SchemaModule::new(NAME)
        .with_version(SchemaVersion::new(1, 0, 0))
        .with_description("Shared entities, filings and XBRL facts")
        .with_nodes(nodes())
        .with_relationships(relationships())
}

fn nodes() -> Vec<Node> {
    vec![
        Node::new(
            "Entity",
            vec![
                pk("identifier"),
                text("cik"),
                text("ticker"),
                text("name"),
                text("legal_name"),
                text("sic"),
                text("sic_description"),
                text("state_of_incorporation"),
                text("fiscal_year_end"),
                text("website"),
                text("category"),
                prop("is_parent", TypeTag::Boolean),
                prop("created_at", TypeTag::Timestamp),
                prop("updated_at", TypeTag::Timestamp),
            ],
        )
        .with_description("A reporting organization"),
        Node::new(
            "Report",
            vec![
                pk("identifier"),
                text("name"),
                text("accession_number"),
                text("form"),
                prop("filing_date", TypeTag::Date),
                prop("report_date", TypeTag::Date),
                prop("acceptance_date", TypeTag::Timestamp),
                text("period_end_date"),
                text("fiscal_period"),
                prop("fiscal_year", TypeTag::Int32),
                text("source_url"),
                text("processed_status"),
                prop("is_amendment", TypeTag::Boolean),
            ],
        )
        .with_description("A single filing or report"),
        Node::new(
            "Fact",
            vec![
                pk("identifier"),
                text("uri"),
                text("value"),
                prop("numeric_value", TypeTag::Double),
                text("fact_type"),
                prop("decimals", TypeTag::Int32),
                text("context_ref"),
                prop("is_nil", TypeTag::Boolean),
            ],
        ),
        Node::new(
            "Element",
            vec![
                pk("identifier"),
                text("uri"),
                text("qname"),
                text("name"),
                text("period_type"),
                text("balance"),
                text("item_type"),
                prop("is_abstract", TypeTag::Boolean),
                prop("is_numeric", TypeTag::Boolean),
            ],
        ),
        Node::new(
            "Period",
            vec![
                pk("identifier"),
                text("uri"),
                prop("start_date", TypeTag::Date),
                prop("end_date", TypeTag::Date),
                prop("instant_date", TypeTag::Date),
                text("period_type"),
                prop("fiscal_year", TypeTag::Int32),
                text("fiscal_quarter"),
            ],
        ),
        Node::new(
            "Unit",
            vec![pk("identifier"), text("uri"), text("measure"), text("value")],
        ),
        Node::new(
            "FactDimension",
            vec![
                pk("identifier"),
                text("axis_uri"),
                text("member_uri"),
                text("type"),
                prop("is_explicit", TypeTag::Boolean),
                prop("is_typed", TypeTag::Boolean),
            ],
        ),
        Node::new(
            "Label",
            vec![pk("identifier"), text("value"), text("type"), text("language")],
        ),
        Node::new(
            "Taxonomy",
            vec![
                pk("identifier"),
                text("uri"),
                text("name"),
                text("version"),
                text("namespace"),
            ],
        ),
        Node::new(
            "Structure",
            vec![
                pk("identifier"),
                text("uri"),
                text("network_uri"),
                text("type"),
                text("name"),
                text("definition"),
            ],
        ),
        Node::new(
            "Association",
            vec![
                pk("identifier"),
                text("arcrole"),
                prop("order_value", TypeTag::Double),
                prop("weight", TypeTag::Double),
                text("preferred_label"),
            ],
        ),
    ]
}

fn relationships() -> Vec<Relationship> {
    vec![
        Relationship::new("ENTITY_HAS_REPORT", "Entity", "Report")
            .with_properties(vec![text("filing_context")]),
        Relationship::new("REPORT_HAS_FACT", "Report", "Fact"),
        Relationship::new("REPORT_USES_TAXONOMY", "Report", "Taxonomy"),
        Relationship::new("FACT_HAS_ELEMENT", "Fact", "Element"),
        Relationship::new("FACT_HAS_PERIOD", "Fact", "Period"),
        Relationship::new("FACT_HAS_UNIT", "Fact", "Unit"),
        Relationship::new("FACT_HAS_DIMENSION", "Fact", "FactDimension"),
        Relationship::new("FACT_HAS_ENTITY", "Fact", "Entity"),
        Relationship::new("FACT_DIMENSION_AXIS_ELEMENT", "FactDimension", "Element"),
        Relationship::new("FACT_DIMENSION_MEMBER_ELEMENT", "FactDimension", "Element"),
        Relationship::new("ELEMENT_HAS_LABEL", "Element", "Label"),
        Relationship::new("TAXONOMY_HAS_STRUCTURE", "Taxonomy", "Structure"),
        Relationship::new("STRUCTURE_HAS_ASSOCIATION", "Structure", "Association"),
        Relationship::new("ASSOCIATION_HAS_FROM_ELEMENT", "Association", "Element"),
        Relationship::new("ASSOCIATION_HAS_TO_ELEMENT", "Association", "Element"),
    ]
}
