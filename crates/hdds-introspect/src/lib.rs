// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! HDDS Introspect
//!
//! Runtime type introspection for dynamically described DDS data:
//! - JSON encoding of a [`DynamicData`] value (OMG and eProsima dialects)
//! - IDL schema text from a [`TypeDescriptor`] graph
//!
//! # Quick Start
//!
//! ```rust
//! use hdds_introspect::dynamic::{DynamicData, TypeDescriptorBuilder};
//! use hdds_introspect::{generate_idl_schema, json_serialize, DynamicDataJsonFormat, TypeKind};
//! use std::sync::Arc;
//!
//! let desc = Arc::new(
//!     TypeDescriptorBuilder::new("S")
//!         .field("index", TypeKind::TK_UINT32)
//!         .string_field("message")
//!         .build(),
//! );
//!
//! let mut data = DynamicData::new(&desc)?;
//! data.set_uint32_value(0, 7)?;
//! data.set_value(1, "hi")?;
//!
//! assert_eq!(
//!     json_serialize(&data, DynamicDataJsonFormat::Eprosima)?,
//!     r#"{"index":7,"message":"hi"}"#
//! );
//! assert_eq!(
//!     generate_idl_schema(&desc)?,
//!     "struct S {\n    unsigned long index;\n    string message;\n};\n"
//! );
//! # Ok::<(), hdds_introspect::IntrospectError>(())
//! ```
//!
//! # Dialects
//!
//! | Kind | OMG | eProsima |
//! |------|-----|----------|
//! | enum | name | `{name, value}` |
//! | bitmask | number | `{value, binary, active}` |
//! | everything else | same | same |

pub mod dynamic;
pub mod error;
pub mod idl;
pub mod json;
pub mod type_kind;

pub use dynamic::{DynamicData, LoanedData, MemberDescriptor, MemberId, TypeDescriptor};
pub use error::{IntrospectError, LoanFailure, Result};
pub use idl::generate_idl_schema;
pub use json::{
    json_serialize, json_serialize_to_writer, json_serialize_value, json_serialize_with,
    DynamicDataJsonFormat, JsonOptions,
};
pub use type_kind::TypeKind;
