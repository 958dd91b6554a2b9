// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The verification layer: document validation and runtime contracts.
//!
//! Two complementary approaches to catching bugs:
//!
//! 1. **Document validation** (`validate_tag_document`) reports what is wrong
//!    with the input: conflicting aliases, cycles, dangling parents. The index
//!    tolerates all of these; validation makes them visible.
//!
//! 2. **Runtime contracts** that panic in debug builds when the engine's own
//!    guarantees are violated. Zero-cost in release, but catch bugs during
//!    development.
//!
//! Use both. Validation catches bad data. The contracts catch bad code.

mod types;
pub mod contracts;

pub use types::*;
