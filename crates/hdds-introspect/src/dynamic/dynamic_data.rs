// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DynamicData container for runtime data access.
//!
//! Every value is stored under a [`MemberId`]: struct and union members by
//! their declared id, sequence and array elements by index, map entries by
//! entry id. Aggregate and collection members are nested `DynamicData`
//! reached through [`DynamicData::loan_value`].

use crate::dynamic::loan::{LoanStats, LoanedData};
use crate::dynamic::{MemberDescriptor, MemberId, ScalarValue, TypeDescriptor};
use crate::error::{IntrospectError, LoanFailure, Result};
use crate::type_kind::TypeKind;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Deepest nesting `DynamicData::new` will default-initialise.
const MAX_NESTING_DEPTH: usize = 128;

/// Largest array (total elements over all dimensions) a value may hold.
const MAX_ARRAY_ELEMENTS: usize = 1 << 20;

#[derive(Debug)]
enum Slot {
    Scalar(ScalarValue),
    Complex(Box<DynamicData>),
}

#[derive(Debug, Default)]
struct LoanBook {
    outstanding: BTreeSet<MemberId>,
    stats: LoanStats,
}

/// Dynamic data container with runtime type checking.
#[derive(Debug)]
pub struct DynamicData {
    /// Enclosing type, aliases already resolved.
    descriptor: Arc<TypeDescriptor>,
    slots: BTreeMap<MemberId, Slot>,
    /// Active union member.
    selected: Option<MemberId>,
    loans: Mutex<LoanBook>,
}

impl DynamicData {
    /// Create new DynamicData with default values.
    ///
    /// `descriptor` may be an alias; it is resolved to the enclosing type,
    /// which must be an aggregate or collection.
    pub fn new(descriptor: &Arc<TypeDescriptor>) -> Result<Self> {
        Self::with_depth(descriptor, 0)
    }

    fn with_depth(descriptor: &Arc<TypeDescriptor>, depth: usize) -> Result<Self> {
        if depth > MAX_NESTING_DEPTH {
            return Err(IntrospectError::BrokenTypeGraph(format!(
                "'{}' nests deeper than {} levels",
                descriptor.name, MAX_NESTING_DEPTH
            )));
        }
        let descriptor = descriptor.resolve_alias()?;
        let mut data = Self {
            descriptor: Arc::clone(&descriptor),
            slots: BTreeMap::new(),
            selected: None,
            loans: Mutex::new(LoanBook::default()),
        };

        match descriptor.kind {
            TypeKind::TK_STRUCTURE | TypeKind::TK_BITSET => {
                for member in &descriptor.members {
                    if let Some(slot) = default_slot(&member.type_desc, depth)? {
                        data.slots.insert(member.id, slot);
                    }
                }
            }
            TypeKind::TK_UNION => {
                let first = descriptor
                    .members
                    .iter()
                    .find(|m| !m.is_default_case())
                    .or_else(|| descriptor.members.first());
                if let Some(member) = first {
                    if let Some(slot) = default_slot(&member.type_desc, depth)? {
                        data.slots.insert(member.id, slot);
                    }
                    data.selected = Some(member.id);
                }
            }
            TypeKind::TK_ARRAY => {
                let element = descriptor.element()?;
                if element.resolve_alias()?.kind == TypeKind::TK_NONE {
                    return Err(IntrospectError::UnsupportedKind(TypeKind::TK_NONE));
                }
                for index in 0..array_len(&descriptor)? {
                    if let Some(slot) = default_slot(element, depth)? {
                        data.slots.insert(index_id(index)?, slot);
                    }
                }
            }
            TypeKind::TK_SEQUENCE | TypeKind::TK_MAP => {}
            TypeKind::TK_NONE
            | TypeKind::TK_BOOLEAN
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
            | TypeKind::TK_BITMASK
            | TypeKind::TK_ALIAS => {
                return Err(IntrospectError::UnsupportedKind(descriptor.kind));
            }
        }
        Ok(data)
    }

    /// Enclosing (alias-resolved) type of this value.
    pub fn enclosing_type(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// Get the type name.
    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    /// Descriptor of an aggregate member.
    pub fn get_descriptor(&self, member_id: MemberId) -> Result<&MemberDescriptor> {
        self.descriptor
            .member(member_id)
            .ok_or(IntrospectError::NoSuchMember(member_id))
    }

    /// Number of stored items: elements for collections, entries for maps,
    /// members for aggregates.
    pub fn item_count(&self) -> usize {
        self.slots.len()
    }

    /// Id of the item at `index`, in ascending id order.
    pub fn member_id_at_index(&self, index: usize) -> Result<MemberId> {
        self.slots
            .keys()
            .nth(index)
            .copied()
            .ok_or(IntrospectError::IndexOutOfBounds {
                index,
                count: self.slots.len(),
            })
    }

    /// Active member of a union value.
    pub fn selected_union_member(&self) -> Result<MemberId> {
        if self.descriptor.kind != TypeKind::TK_UNION {
            return Err(IntrospectError::UnsupportedKind(self.descriptor.kind));
        }
        self.selected.ok_or_else(|| {
            IntrospectError::BrokenTypeGraph(format!(
                "union '{}' has no selectable member",
                self.descriptor.name
            ))
        })
    }

    /// Read a scalar member, checking its stored kind against `kind`.
    pub fn get_scalar(&self, member_id: MemberId, kind: TypeKind) -> Result<ScalarValue> {
        self.scalar(member_id, kind).cloned()
    }

    fn scalar(&self, member_id: MemberId, kind: TypeKind) -> Result<&ScalarValue> {
        match self.slots.get(&member_id) {
            None => Err(IntrospectError::NoSuchMember(member_id)),
            Some(Slot::Complex(nested)) => Err(IntrospectError::TypeMismatch {
                member_id,
                requested: kind,
                stored: nested.descriptor.kind,
            }),
            Some(Slot::Scalar(value)) if value.kind() == kind => Ok(value),
            Some(Slot::Scalar(value)) => Err(IntrospectError::TypeMismatch {
                member_id,
                requested: kind,
                stored: value.kind(),
            }),
        }
    }

    /// Store a scalar value. The value's kind must match the storage kind of
    /// the member's type (enums store `Int32`, bitmasks their bound width).
    ///
    /// Setting a union member selects it; setting the next index of a
    /// sequence appends.
    pub fn set_value(&mut self, member_id: MemberId, value: impl Into<ScalarValue>) -> Result<()> {
        let value = value.into();
        let member_type = self.member_type(member_id)?.resolve_alias()?;
        let expected = storage_kind(&member_type)?;
        if expected != Some(value.kind()) {
            return Err(IntrospectError::TypeMismatch {
                member_id,
                requested: value.kind(),
                stored: expected.unwrap_or(member_type.kind),
            });
        }
        self.insert_slot(member_id, Slot::Scalar(value))
    }

    /// Install a nested aggregate or collection value. Its type must be
    /// structurally identical to the member's type.
    pub fn set_complex_value(&mut self, member_id: MemberId, value: DynamicData) -> Result<()> {
        let member_type = self.member_type(member_id)?.resolve_alias()?;
        let actual = &value.descriptor;
        if !member_type.kind.is_loanable() || !member_type.is_same_type(actual) {
            return Err(IntrospectError::TypeMismatch {
                member_id,
                requested: actual.kind,
                stored: member_type.kind,
            });
        }
        self.insert_slot(member_id, Slot::Complex(Box::new(value)))
    }

    /// Mutable access to a nested aggregate or collection value.
    pub fn complex_value_mut(&mut self, member_id: MemberId) -> Result<&mut DynamicData> {
        match self.slots.get_mut(&member_id) {
            Some(Slot::Complex(nested)) => Ok(nested),
            Some(Slot::Scalar(_)) => Err(IntrospectError::LoanFailed {
                member_id,
                reason: LoanFailure::NotLoanable,
            }),
            None => Err(IntrospectError::NoSuchMember(member_id)),
        }
    }

    /// Make `member_id` the active member of a union, default-initialised.
    pub fn select_union_member(&mut self, member_id: MemberId) -> Result<()> {
        if self.descriptor.kind != TypeKind::TK_UNION {
            return Err(IntrospectError::UnsupportedKind(self.descriptor.kind));
        }
        if self.selected == Some(member_id) {
            return Ok(());
        }
        let member_type = self.member_type(member_id)?;
        match default_slot(&member_type, 0)? {
            Some(slot) => self.insert_slot(member_id, slot),
            None => {
                self.slots.clear();
                self.selected = Some(member_id);
                Ok(())
            }
        }
    }

    /// Borrow a nested aggregate or collection member.
    ///
    /// At most one loan per member may be outstanding.
    pub fn loan_value(&self, member_id: MemberId) -> Result<LoanedData<'_>> {
        let nested = match self.slots.get(&member_id) {
            Some(Slot::Complex(nested)) => nested,
            Some(Slot::Scalar(_)) => {
                return Err(IntrospectError::LoanFailed {
                    member_id,
                    reason: LoanFailure::NotLoanable,
                })
            }
            None => return Err(IntrospectError::NoSuchMember(member_id)),
        };

        let mut book = self.loans.lock();
        if !book.outstanding.insert(member_id) {
            return Err(IntrospectError::LoanFailed {
                member_id,
                reason: LoanFailure::AlreadyLoaned,
            });
        }
        book.stats.issued += 1;
        Ok(LoanedData::new(self, member_id, nested))
    }

    /// Return a loan taken from this value.
    pub fn return_loaned_value(&self, mut loan: LoanedData<'_>) -> Result<()> {
        if !loan.is_loaned_from(self) {
            // Dropping `loan` still releases it on its real parent.
            return Err(IntrospectError::LoanFailed {
                member_id: loan.member_id(),
                reason: LoanFailure::ForeignLoan,
            });
        }
        loan.release()
    }

    pub(crate) fn release_loan(&self, member_id: MemberId) -> Result<()> {
        let mut book = self.loans.lock();
        if !book.outstanding.remove(&member_id) {
            return Err(IntrospectError::LoanFailed {
                member_id,
                reason: LoanFailure::NotLoaned,
            });
        }
        book.stats.returned += 1;
        Ok(())
    }

    /// Loans currently outstanding on direct members.
    pub fn outstanding_loans(&self) -> usize {
        self.loans.lock().outstanding.len()
    }

    /// Loan counters of direct members.
    pub fn loan_stats(&self) -> LoanStats {
        self.loans.lock().stats
    }

    /// Loan counters summed over this value and every nested value.
    pub fn loan_stats_recursive(&self) -> LoanStats {
        let mut total = self.loan_stats();
        for slot in self.slots.values() {
            if let Slot::Complex(nested) = slot {
                let inner = nested.loan_stats_recursive();
                total.issued += inner.issued;
                total.returned += inner.returned;
            }
        }
        total
    }

    fn member_type(&self, member_id: MemberId) -> Result<Arc<TypeDescriptor>> {
        let desc = &self.descriptor;
        match desc.kind {
            TypeKind::TK_STRUCTURE | TypeKind::TK_BITSET | TypeKind::TK_UNION => desc
                .member(member_id)
                .map(|m| Arc::clone(&m.type_desc))
                .ok_or(IntrospectError::NoSuchMember(member_id)),
            TypeKind::TK_SEQUENCE => {
                if member_id as usize > self.slots.len() {
                    return Err(IntrospectError::NoSuchMember(member_id));
                }
                desc.element().cloned()
            }
            TypeKind::TK_ARRAY => {
                if member_id as usize >= array_len(desc)? {
                    return Err(IntrospectError::NoSuchMember(member_id));
                }
                desc.element().cloned()
            }
            TypeKind::TK_MAP => desc.element().cloned(),
            TypeKind::TK_NONE
            | TypeKind::TK_BOOLEAN
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
            | TypeKind::TK_BITMASK
            | TypeKind::TK_ALIAS => Err(IntrospectError::UnsupportedKind(desc.kind)),
        }
    }

    fn insert_slot(&mut self, member_id: MemberId, slot: Slot) -> Result<()> {
        match self.descriptor.kind {
            TypeKind::TK_UNION => {
                self.slots.clear();
                self.selected = Some(member_id);
            }
            TypeKind::TK_SEQUENCE | TypeKind::TK_MAP => {
                let bound = self.descriptor.first_bound().unwrap_or(0);
                if bound > 0
                    && !self.slots.contains_key(&member_id)
                    && self.slots.len() >= bound as usize
                {
                    return Err(IntrospectError::CapacityExceeded { bound });
                }
            }
            _ => {}
        }
        self.slots.insert(member_id, slot);
        Ok(())
    }
}

/// Storage kind for a resolved member type: `None` for members stored as
/// nested `DynamicData`.
pub(crate) fn storage_kind(member_type: &TypeDescriptor) -> Result<Option<TypeKind>> {
    let kind = member_type.kind;
    match kind {
        TypeKind::TK_ENUM => Ok(Some(TypeKind::TK_INT32)),
        TypeKind::TK_BITMASK => bitmask_storage_kind(member_type).map(Some),
        TypeKind::TK_STRUCTURE
        | TypeKind::TK_BITSET
        | TypeKind::TK_UNION
        | TypeKind::TK_SEQUENCE
        | TypeKind::TK_ARRAY
        | TypeKind::TK_MAP => Ok(None),
        TypeKind::TK_ALIAS => Err(IntrospectError::UnexpectedAlias),
        TypeKind::TK_NONE => Err(IntrospectError::UnsupportedKind(kind)),
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
        | TypeKind::TK_STRING16 => Ok(Some(kind)),
    }
}

/// Unsigned width holding a bitmask: bound <= 8 -> 8 bits, <= 16 -> 16,
/// <= 32 -> 32, else 64.
pub(crate) fn bitmask_storage_kind(bitmask: &TypeDescriptor) -> Result<TypeKind> {
    let bound = bitmask.first_bound().ok_or_else(|| {
        IntrospectError::BrokenTypeGraph(format!("bitmask '{}' has no bound", bitmask.name))
    })?;
    Ok(match bound {
        0..=8 => TypeKind::TK_UINT8,
        9..=16 => TypeKind::TK_UINT16,
        17..=32 => TypeKind::TK_UINT32,
        _ => TypeKind::TK_UINT64,
    })
}

/// Total element count of an array (product of its dimensions), at most
/// `MAX_ARRAY_ELEMENTS`.
pub(crate) fn array_len(array: &TypeDescriptor) -> Result<usize> {
    if array.bound.is_empty() {
        return Err(IntrospectError::BrokenTypeGraph(format!(
            "array '{}' has no dimensions",
            array.name
        )));
    }
    array
        .bound
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim as usize))
        .filter(|&len| len <= MAX_ARRAY_ELEMENTS)
        .ok_or(IntrospectError::CapacityExceeded {
            bound: MAX_ARRAY_ELEMENTS as u32,
        })
}

fn index_id(index: usize) -> Result<MemberId> {
    MemberId::try_from(index).map_err(|_| IntrospectError::IndexOutOfBounds {
        index,
        count: MemberId::MAX as usize,
    })
}

/// Default storage for a member of type `member_type`; `None` for `TK_NONE`.
fn default_slot(member_type: &Arc<TypeDescriptor>, depth: usize) -> Result<Option<Slot>> {
    let resolved = member_type.resolve_alias()?;
    if resolved.kind.is_loanable() {
        let nested = DynamicData::with_depth(&resolved, depth + 1)?;
        return Ok(Some(Slot::Complex(Box::new(nested))));
    }
    if resolved.kind == TypeKind::TK_NONE {
        return Ok(None);
    }
    if resolved.kind == TypeKind::TK_ENUM {
        let first = resolved
            .members
            .first()
            .and_then(|m| m.default_value.parse::<i32>().ok())
            .unwrap_or(0);
        return Ok(Some(Slot::Scalar(ScalarValue::Int32(first))));
    }
    let value = storage_kind(&resolved)?
        .and_then(ScalarValue::default_for)
        .ok_or(IntrospectError::UnsupportedKind(resolved.kind))?;
    Ok(Some(Slot::Scalar(value)))
}

macro_rules! typed_getter {
    ($(#[$doc:meta])* $name:ident, $kind:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(&self, member_id: MemberId) -> Result<$ty> {
            match self.get_scalar(member_id, TypeKind::$kind)? {
                ScalarValue::$variant(v) => Ok(v),
                other => Err(IntrospectError::TypeMismatch {
                    member_id,
                    requested: TypeKind::$kind,
                    stored: other.kind(),
                }),
            }
        }
    };
}

impl DynamicData {
    typed_getter!(get_boolean_value, TK_BOOLEAN, Boolean, bool);
    typed_getter!(get_byte_value, TK_BYTE, Byte, u8);
    typed_getter!(get_int8_value, TK_INT8, Int8, i8);
    typed_getter!(get_int16_value, TK_INT16, Int16, i16);
    typed_getter!(
        /// Also reads enum members, which store their numeric value.
        get_int32_value,
        TK_INT32,
        Int32,
        i32
    );
    typed_getter!(get_int64_value, TK_INT64, Int64, i64);
    typed_getter!(get_uint8_value, TK_UINT8, UInt8, u8);
    typed_getter!(get_uint16_value, TK_UINT16, UInt16, u16);
    typed_getter!(get_uint32_value, TK_UINT32, UInt32, u32);
    typed_getter!(get_uint64_value, TK_UINT64, UInt64, u64);
    typed_getter!(get_float32_value, TK_FLOAT32, Float32, f32);
    typed_getter!(get_float64_value, TK_FLOAT64, Float64, f64);
    typed_getter!(get_float128_value, TK_FLOAT128, Float128, f64);
    typed_getter!(get_char8_value, TK_CHAR8, Char8, u8);
    typed_getter!(get_char16_value, TK_CHAR16, Char16, u16);
    typed_getter!(get_string_value, TK_STRING8, String8, String);
    typed_getter!(
        /// UTF-16 code units of a wide string member.
        get_wstring_value,
        TK_STRING16,
        String16,
        Vec<u16>
    );
}

macro_rules! typed_setter {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(&mut self, member_id: MemberId, value: $ty) -> Result<()> {
            self.set_value(member_id, ScalarValue::$variant(value))
        }
    };
}

impl DynamicData {
    typed_setter!(set_boolean_value, Boolean, bool);
    typed_setter!(set_byte_value, Byte, u8);
    typed_setter!(set_int8_value, Int8, i8);
    typed_setter!(set_int16_value, Int16, i16);
    typed_setter!(
        /// Also writes enum members, which store their numeric value.
        set_int32_value,
        Int32,
        i32
    );
    typed_setter!(set_int64_value, Int64, i64);
    typed_setter!(set_uint8_value, UInt8, u8);
    typed_setter!(set_uint16_value, UInt16, u16);
    typed_setter!(set_uint32_value, UInt32, u32);
    typed_setter!(set_uint64_value, UInt64, u64);
    typed_setter!(set_float32_value, Float32, f32);
    typed_setter!(set_float64_value, Float64, f64);
    typed_setter!(set_float128_value, Float128, f64);
    typed_setter!(set_char8_value, Char8, u8);
    typed_setter!(set_char16_value, Char16, u16);
    typed_setter!(set_string_value, String8, String);

    /// Store UTF-8 text into a wide string member.
    pub fn set_wstring_value(&mut self, member_id: MemberId, value: &str) -> Result<()> {
        self.set_value(member_id, ScalarValue::wstring(value))
    }
}
