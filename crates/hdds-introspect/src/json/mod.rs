// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON serialization of DynamicData.
//!
//! The value is walked member by member using its type graph. Two dialects
//! are supported; they differ only in how enums and bitmasks are rendered:
//!
//! | Kind    | `Omg`          | `Eprosima`                                   |
//! |---------|----------------|----------------------------------------------|
//! | enum    | `"GREEN"`      | `{"name": "GREEN", "value": 1}`              |
//! | bitmask | `5`            | `{"value": 5, "binary": "00000101", "active": [..]}` |
//!
//! Object keys are emitted in sorted order.

mod member;

use crate::dynamic::DynamicData;
use crate::error::{IntrospectError, Result};
use crate::type_kind::TypeKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// JSON dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DynamicDataJsonFormat {
    /// Enums as names, bitmasks as numbers.
    Omg,
    /// Enums and bitmasks as descriptive objects.
    #[default]
    Eprosima,
}

impl DynamicDataJsonFormat {
    /// Lowercase dialect name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Omg => "omg",
            Self::Eprosima => "eprosima",
        }
    }
}

impl fmt::Display for DynamicDataJsonFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DynamicDataJsonFormat {
    type Err = IntrospectError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("omg") {
            Ok(Self::Omg)
        } else if s.eq_ignore_ascii_case("eprosima") {
            Ok(Self::Eprosima)
        } else {
            Err(IntrospectError::UnknownFormat(s.to_string()))
        }
    }
}

/// Serialization options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonOptions {
    /// Output dialect.
    pub format: DynamicDataJsonFormat,
    /// Indented output instead of compact.
    pub pretty: bool,
}

impl JsonOptions {
    /// Compact output in the given dialect.
    pub fn new(format: DynamicDataJsonFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    /// Toggle indented output.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Serialize a structure value to compact JSON text.
pub fn json_serialize(data: &DynamicData, format: DynamicDataJsonFormat) -> Result<String> {
    json_serialize_with(data, &JsonOptions::new(format))
}

/// Serialize a structure value to JSON text using `options`.
pub fn json_serialize_with(data: &DynamicData, options: &JsonOptions) -> Result<String> {
    let value = json_serialize_value(data, options.format)?;
    let text = if options.pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    };
    Ok(text?)
}

/// Serialize a structure value as compact JSON into `writer`.
///
/// Nothing is written if the traversal fails.
pub fn json_serialize_to_writer<W: Write>(
    data: &DynamicData,
    writer: W,
    format: DynamicDataJsonFormat,
) -> Result<()> {
    let value = json_serialize_value(data, format)?;
    serde_json::to_writer(writer, &value)?;
    Ok(())
}

/// Serialize a structure value to a `serde_json::Value` tree.
pub fn json_serialize_value(data: &DynamicData, format: DynamicDataJsonFormat) -> Result<Value> {
    let root = data.enclosing_type();
    if root.kind != TypeKind::TK_STRUCTURE {
        log::warn!(
            "[json] cannot serialize '{}': top-level kind {} is not a structure",
            root.name,
            root.kind
        );
        return Err(IntrospectError::UnsupportedRoot(root.kind));
    }

    let mut output = Value::Object(Map::new());
    member::serialize_members(data, &mut output, format).map_err(|e| {
        log::warn!("[json] serializing '{}' failed: {}", root.name, e);
        e
    })?;
    Ok(output)
}
