// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Built-in schema modules shipped with the platform

pub mod base;
pub mod roboinvestor;
pub mod roboledger;

use super::registry::ExtensionRegistry;
use super::types::{Property, TypeTag};

/// Register every built-in base schema and extension
pub fn register_builtin_modules(registry: &mut ExtensionRegistry) {
    registry.register_base(base::NAME, base::module);
    registry.register_extension(roboledger::NAME, roboledger::module);
    registry.register_extension(roboinvestor::NAME, roboinvestor::module);
}

fn pk(name: &str) -> Property {
    Property::primary_key(name, TypeTag::String)
}

fn prop(name: &str, type_tag: TypeTag) -> Property {
    Property::new(name, type_tag)
}

fn text(name: &str) -> Property {
    Property::new(name, TypeTag::String)
}
