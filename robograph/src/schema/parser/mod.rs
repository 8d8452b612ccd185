// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Schema parser module for type spellings and tenant-authored schema documents

pub mod custom;
pub mod type_tag;
