// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Recursive member walk.
//!
//! Each aggregate or collection member is loaned from its parent for the
//! duration of its subtree and always returned before the walk moves on,
//! including when the subtree fails.

use super::DynamicDataJsonFormat;
use crate::dynamic::{bitmask_storage_kind, DynamicData, LoanedData, MemberId, TypeDescriptor};
use crate::error::{IntrospectError, Result};
use crate::type_kind::TypeKind;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Serialize every member of an aggregate value into `output`, in id order.
pub(super) fn serialize_members(
    data: &DynamicData,
    output: &mut Value,
    format: DynamicDataJsonFormat,
) -> Result<()> {
    for member in data.enclosing_type().members_by_id() {
        serialize_member(data, member.id, &member.type_desc, &member.name, output, format)?;
    }
    Ok(())
}

/// Serialize one member of `data`. `key` is ignored when `output` is an
/// array.
fn serialize_member(
    data: &DynamicData,
    member_id: MemberId,
    member_type: &Arc<TypeDescriptor>,
    key: &str,
    output: &mut Value,
    format: DynamicDataJsonFormat,
) -> Result<()> {
    let resolved = member_type.resolve_alias()?;
    dispatch_member(data, member_id, &resolved, key, output, format).map_err(|e| {
        log::debug!(
            "[json] member '{}' (id {}, {}) failed: {}",
            key,
            member_id,
            resolved.kind,
            e
        );
        e
    })
}

fn dispatch_member(
    data: &DynamicData,
    member_id: MemberId,
    member_type: &TypeDescriptor,
    key: &str,
    output: &mut Value,
    format: DynamicDataJsonFormat,
) -> Result<()> {
    match member_type.kind {
        TypeKind::TK_BOOLEAN
        | TypeKind::TK_BYTE
        | TypeKind::TK_INT8
        | TypeKind::TK_INT16
        | TypeKind::TK_INT32
        | TypeKind::TK_INT64
        | TypeKind::TK_UINT8
        | TypeKind::TK_UINT16
        | TypeKind::TK_UINT32
        | TypeKind::TK_UINT64
        | TypeKind::TK_FLOAT32
        | TypeKind::TK_FLOAT64
        | TypeKind::TK_FLOAT128
        | TypeKind::TK_CHAR8
        | TypeKind::TK_CHAR16
        | TypeKind::TK_STRING8
        | TypeKind::TK_STRING16
        | TypeKind::TK_ENUM
        | TypeKind::TK_BITMASK => {
            let value = basic_value(data, member_id, member_type, format)?;
            json_insert(key, value, output);
        }
        TypeKind::TK_STRUCTURE | TypeKind::TK_BITSET => {
            let nested = data.loan_value(member_id)?;
            let mut object = Value::Object(Map::new());
            let result = serialize_members(&nested, &mut object, format);
            finish_loan(data, nested, result)?;
            json_insert(key, object, output);
        }
        TypeKind::TK_UNION => {
            let nested = data.loan_value(member_id)?;
            let mut object = Value::Object(Map::new());
            let result = serialize_union(&nested, &mut object, format);
            finish_loan(data, nested, result)?;
            json_insert(key, object, output);
        }
        TypeKind::TK_SEQUENCE => {
            let nested = data.loan_value(member_id)?;
            let mut items = Value::Array(Vec::new());
            let result = serialize_sequence(&nested, &mut items, format);
            finish_loan(data, nested, result)?;
            json_insert(key, items, output);
        }
        TypeKind::TK_ARRAY => {
            let nested = data.loan_value(member_id)?;
            let mut items = Value::Array(Vec::new());
            let result = serialize_array_member(&nested, &mut items, format);
            finish_loan(data, nested, result)?;
            json_insert(key, items, output);
        }
        TypeKind::TK_MAP => {
            let nested = data.loan_value(member_id)?;
            let mut object = Value::Object(Map::new());
            let result = serialize_map(&nested, &mut object, format);
            finish_loan(data, nested, result)?;
            json_insert(key, object, output);
        }
        TypeKind::TK_ALIAS => return Err(IntrospectError::UnexpectedAlias),
        TypeKind::TK_NONE => return Err(IntrospectError::UnsupportedKind(member_type.kind)),
    }
    Ok(())
}

/// Return `loan` to `parent`. An error from the subtree takes priority over
/// an error from the return itself.
fn finish_loan(parent: &DynamicData, loan: LoanedData<'_>, result: Result<()>) -> Result<()> {
    let returned = parent.return_loaned_value(loan);
    match result {
        Err(e) => {
            if let Err(ret) = returned {
                log::debug!("[json] returning loan after failure also failed: {}", ret);
            }
            Err(e)
        }
        Ok(()) => returned,
    }
}

fn serialize_union(
    data: &DynamicData,
    output: &mut Value,
    format: DynamicDataJsonFormat,
) -> Result<()> {
    let selected = data.selected_union_member()?;
    let member = data.get_descriptor(selected)?;
    serialize_member(data, selected, &member.type_desc, &member.name, output, format)
}

fn serialize_sequence(
    data: &DynamicData,
    output: &mut Value,
    format: DynamicDataJsonFormat,
) -> Result<()> {
    let element = data.enclosing_type().element()?;
    for index in 0..data.item_count() {
        let id = data.member_id_at_index(index)?;
        serialize_member(data, id, element, "", output, format)?;
    }
    Ok(())
}

fn serialize_array_member(
    data: &DynamicData,
    output: &mut Value,
    format: DynamicDataJsonFormat,
) -> Result<()> {
    let array = data.enclosing_type();
    let element = array.element()?;
    let mut index = 0;
    serialize_array(data, element, &array.bound, &mut index, output, format)
}

/// One nesting level per dimension; elements are read in row-major order.
fn serialize_array(
    data: &DynamicData,
    element: &Arc<TypeDescriptor>,
    dimensions: &[u32],
    index: &mut usize,
    output: &mut Value,
    format: DynamicDataJsonFormat,
) -> Result<()> {
    let Some((&len, inner)) = dimensions.split_first() else {
        return Ok(());
    };
    for _ in 0..len {
        if inner.is_empty() {
            let id = data.member_id_at_index(*index)?;
            *index += 1;
            serialize_member(data, id, element, "", output, format)?;
        } else {
            let mut row = Value::Array(Vec::new());
            serialize_array(data, element, inner, index, &mut row, format)?;
            json_insert("", row, output);
        }
    }
    Ok(())
}

/// Entries are keyed by their member id; key values are not reachable
/// through DynamicData.
fn serialize_map(data: &DynamicData, output: &mut Value, format: DynamicDataJsonFormat) -> Result<()> {
    let value_type = data.enclosing_type().element()?;
    for index in 0..data.item_count() {
        let id = data.member_id_at_index(index)?;
        serialize_member(data, id, value_type, &id.to_string(), output, format)?;
    }
    Ok(())
}

fn basic_value(
    data: &DynamicData,
    member_id: MemberId,
    member_type: &TypeDescriptor,
    format: DynamicDataJsonFormat,
) -> Result<Value> {
    let value = match member_type.kind {
        TypeKind::TK_BOOLEAN => Value::Bool(data.get_boolean_value(member_id)?),
        TypeKind::TK_BYTE => Value::from(data.get_byte_value(member_id)?),
        TypeKind::TK_INT8 => Value::from(data.get_int8_value(member_id)?),
        TypeKind::TK_INT16 => Value::from(data.get_int16_value(member_id)?),
        TypeKind::TK_INT32 => Value::from(data.get_int32_value(member_id)?),
        TypeKind::TK_INT64 => Value::from(data.get_int64_value(member_id)?),
        TypeKind::TK_UINT8 => Value::from(data.get_uint8_value(member_id)?),
        TypeKind::TK_UINT16 => Value::from(data.get_uint16_value(member_id)?),
        TypeKind::TK_UINT32 => Value::from(data.get_uint32_value(member_id)?),
        TypeKind::TK_UINT64 => Value::from(data.get_uint64_value(member_id)?),
        TypeKind::TK_FLOAT32 => Value::from(data.get_float32_value(member_id)?),
        TypeKind::TK_FLOAT64 => Value::from(data.get_float64_value(member_id)?),
        TypeKind::TK_FLOAT128 => Value::from(data.get_float128_value(member_id)?),
        TypeKind::TK_CHAR8 => Value::String(char::from(data.get_char8_value(member_id)?).to_string()),
        TypeKind::TK_CHAR16 => {
            Value::String(String::from_utf16_lossy(&[data.get_char16_value(member_id)?]))
        }
        TypeKind::TK_STRING8 => Value::String(data.get_string_value(member_id)?),
        TypeKind::TK_STRING16 => {
            Value::String(String::from_utf16_lossy(&data.get_wstring_value(member_id)?))
        }
        TypeKind::TK_ENUM => enum_value(data, member_id, member_type, format)?,
        TypeKind::TK_BITMASK => bitmask_value(data, member_id, member_type, format)?,
        TypeKind::TK_NONE
        | TypeKind::TK_ALIAS
        | TypeKind::TK_STRUCTURE
        | TypeKind::TK_UNION
        | TypeKind::TK_BITSET
        | TypeKind::TK_SEQUENCE
        | TypeKind::TK_ARRAY
        | TypeKind::TK_MAP => return Err(IntrospectError::UnsupportedKind(member_type.kind)),
    };
    Ok(value)
}

/// Enumerator lookup by numeric value, matched against each enumerator's
/// default-value literal.
fn enum_value(
    data: &DynamicData,
    member_id: MemberId,
    enum_type: &TypeDescriptor,
    format: DynamicDataJsonFormat,
) -> Result<Value> {
    let value = data.get_int32_value(member_id)?;
    let literal = value.to_string();
    let name = enum_type
        .members
        .iter()
        .find(|m| m.default_value == literal)
        .map(|m| m.name.as_str())
        .ok_or_else(|| IntrospectError::EnumValueNotFound {
            type_name: enum_type.name.clone(),
            value,
        })?;

    Ok(match format {
        DynamicDataJsonFormat::Omg => Value::String(name.to_owned()),
        DynamicDataJsonFormat::Eprosima => json!({ "name": name, "value": value }),
    })
}

fn bitmask_value(
    data: &DynamicData,
    member_id: MemberId,
    bitmask_type: &TypeDescriptor,
    format: DynamicDataJsonFormat,
) -> Result<Value> {
    let (value, width) = match bitmask_storage_kind(bitmask_type)? {
        TypeKind::TK_UINT8 => (u64::from(data.get_uint8_value(member_id)?), 8),
        TypeKind::TK_UINT16 => (u64::from(data.get_uint16_value(member_id)?), 16),
        TypeKind::TK_UINT32 => (u64::from(data.get_uint32_value(member_id)?), 32),
        TypeKind::TK_UINT64 => (data.get_uint64_value(member_id)?, 64),
        other => return Err(IntrospectError::UnsupportedKind(other)),
    };

    match format {
        DynamicDataJsonFormat::Omg => Ok(Value::from(value)),
        DynamicDataJsonFormat::Eprosima => {
            let active: Vec<&str> = bitmask_type
                .members_by_id()
                .into_iter()
                .filter(|flag| {
                    1u64.checked_shl(flag.id)
                        .is_some_and(|bit| value & bit != 0)
                })
                .map(|flag| flag.name.as_str())
                .collect();
            Ok(json!({
                "value": value,
                "binary": format!("{:0width$b}", value, width = width),
                "active": active,
            }))
        }
    }
}

/// Push onto arrays, insert by key otherwise.
fn json_insert(key: &str, value: Value, output: &mut Value) {
    match output {
        Value::Array(items) => items.push(value),
        Value::Object(map) => {
            map.insert(key.to_owned(), value);
        }
        other => {
            let mut map = Map::new();
            map.insert(key.to_owned(), value);
            *other = Value::Object(map);
        }
    }
}
