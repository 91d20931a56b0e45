// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic Types for XTypes introspection
//!
//! Runtime type descriptions and values read without compile-time type
//! knowledge.
//!
//! # Features
//!
//! - **TypeDescriptor**: Runtime type graph (primitives, aggregates, collections, aliases)
//! - **DynamicData**: Member-id keyed value container with typed access
//! - **Loans**: Scoped, exclusive views of nested members
//! - **Builder API**: Fluent interface for building type descriptors
//!
//! # Example
//!
//! ```rust
//! use hdds_introspect::dynamic::{DynamicData, TypeDescriptorBuilder};
//! use hdds_introspect::TypeKind;
//! use std::sync::Arc;
//!
//! let descriptor = Arc::new(
//!     TypeDescriptorBuilder::new("SensorReading")
//!         .field("sensor_id", TypeKind::TK_UINT32)
//!         .field("temperature", TypeKind::TK_FLOAT64)
//!         .build(),
//! );
//!
//! let mut data = DynamicData::new(&descriptor)?;
//! data.set_uint32_value(0, 42)?;
//! data.set_float64_value(1, 23.5)?;
//!
//! assert_eq!(data.get_float64_value(1)?, 23.5);
//! # Ok::<(), hdds_introspect::IntrospectError>(())
//! ```

mod builder;
mod dynamic_data;
mod loan;
mod type_descriptor;
mod value;

pub use builder::{BitmaskBuilder, EnumBuilder, TypeDescriptorBuilder, UnionBuilder};
pub use dynamic_data::DynamicData;
pub(crate) use dynamic_data::bitmask_storage_kind;
pub use loan::{LoanStats, LoanedData};
pub use type_descriptor::{MemberDescriptor, MemberId, TypeDescriptor};
pub use value::ScalarValue;

#[cfg(test)]
mod tests;
