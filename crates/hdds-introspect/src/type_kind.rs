// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TypeKind constants per OMG DDS-XTypes v1.3 specification
//!
//! Section 7.2.2: TypeKind enumeration. Both traversal engines dispatch on
//! this enum with exhaustive matches, so adding a kind is a compile error at
//! every dispatch site.

use std::fmt;

/// TypeKind identifies primitive and constructed types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(non_camel_case_types)]
pub enum TypeKind {
    // --- Primitive types (0x00-0x0F) ---
    /// No type (void, invalid)
    TK_NONE = 0x00,

    /// Boolean (1 byte)
    TK_BOOLEAN = 0x01,

    /// Opaque 8-bit value (octet)
    TK_BYTE = 0x02,

    /// Signed 16-bit integer
    TK_INT16 = 0x03,

    /// Signed 32-bit integer
    TK_INT32 = 0x04,

    /// Signed 64-bit integer
    TK_INT64 = 0x05,

    /// Unsigned 16-bit integer
    TK_UINT16 = 0x06,

    /// Unsigned 32-bit integer
    TK_UINT32 = 0x07,

    /// Unsigned 64-bit integer
    TK_UINT64 = 0x08,

    /// 32-bit IEEE floating point
    TK_FLOAT32 = 0x09,

    /// 64-bit IEEE floating point
    TK_FLOAT64 = 0x0A,

    /// 128-bit floating point (long double)
    TK_FLOAT128 = 0x0B,

    /// Signed 8-bit integer
    TK_INT8 = 0x0C,

    /// Unsigned 8-bit integer
    TK_UINT8 = 0x0D,

    /// Single character (8-bit)
    TK_CHAR8 = 0x10,

    /// Wide character (16-bit, UTF-16)
    TK_CHAR16 = 0x11,

    // --- String types ---
    /// 8-bit character string (unbounded or bounded)
    TK_STRING8 = 0x20,

    /// 16-bit character string (unbounded or bounded, UTF-16)
    TK_STRING16 = 0x21,

    // --- Constructed/Collection types ---
    /// Type alias (typedef)
    TK_ALIAS = 0x30,

    /// Enumeration
    TK_ENUM = 0x31,

    /// Bitmask
    TK_BITMASK = 0x32,

    /// Structure (struct)
    TK_STRUCTURE = 0x40,

    /// Union (discriminated union)
    TK_UNION = 0x41,

    /// Bitset (IDL 4.2 bitfield struct)
    TK_BITSET = 0x42,

    /// Sequence (bounded or unbounded)
    TK_SEQUENCE = 0x50,

    /// Array (fixed-size, multi-dimensional)
    TK_ARRAY = 0x51,

    /// Map (key-value collection)
    TK_MAP = 0x52,
}

impl TypeKind {
    /// Returns true if this is a primitive type
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            TypeKind::TK_BOOLEAN
                | TypeKind::TK_BYTE
                | TypeKind::TK_INT16
                | TypeKind::TK_INT32
                | TypeKind::TK_INT64
                | TypeKind::TK_UINT16
                | TypeKind::TK_UINT32
                | TypeKind::TK_UINT64
                | TypeKind::TK_FLOAT32
                | TypeKind::TK_FLOAT64
                | TypeKind::TK_FLOAT128
                | TypeKind::TK_INT8
                | TypeKind::TK_UINT8
                | TypeKind::TK_CHAR8
                | TypeKind::TK_CHAR16
        )
    }

    /// Returns true if this is a string type
    pub const fn is_string(self) -> bool {
        matches!(self, TypeKind::TK_STRING8 | TypeKind::TK_STRING16)
    }

    /// Returns true if this is a collection type (sequence, array, map)
    pub const fn is_collection(self) -> bool {
        matches!(
            self,
            TypeKind::TK_SEQUENCE | TypeKind::TK_ARRAY | TypeKind::TK_MAP
        )
    }

    /// Returns true if values of this kind are stored as nested `DynamicData`
    /// and therefore accessed through a loan.
    pub const fn is_loanable(self) -> bool {
        matches!(
            self,
            TypeKind::TK_STRUCTURE | TypeKind::TK_BITSET | TypeKind::TK_UNION
        ) || self.is_collection()
    }

    /// Fixed IDL keyword for primitive and string kinds.
    ///
    /// Bounds are not part of the keyword; callers append them.
    pub const fn idl_keyword(self) -> Option<&'static str> {
        match self {
            TypeKind::TK_BOOLEAN => Some("boolean"),
            TypeKind::TK_BYTE => Some("octet"),
            TypeKind::TK_INT8 => Some("int8"),
            TypeKind::TK_INT16 => Some("short"),
            TypeKind::TK_INT32 => Some("long"),
            TypeKind::TK_INT64 => Some("long long"),
            TypeKind::TK_UINT8 => Some("uint8"),
            TypeKind::TK_UINT16 => Some("unsigned short"),
            TypeKind::TK_UINT32 => Some("unsigned long"),
            TypeKind::TK_UINT64 => Some("unsigned long long"),
            TypeKind::TK_FLOAT32 => Some("float"),
            TypeKind::TK_FLOAT64 => Some("double"),
            TypeKind::TK_FLOAT128 => Some("long double"),
            TypeKind::TK_CHAR8 => Some("char"),
            TypeKind::TK_CHAR16 => Some("wchar"),
            TypeKind::TK_STRING8 => Some("string"),
            TypeKind::TK_STRING16 => Some("wstring"),
            TypeKind::TK_NONE
            | TypeKind::TK_ALIAS
            | TypeKind::TK_ENUM
            | TypeKind::TK_BITMASK
            | TypeKind::TK_STRUCTURE
            | TypeKind::TK_UNION
            | TypeKind::TK_BITSET
            | TypeKind::TK_SEQUENCE
            | TypeKind::TK_ARRAY
            | TypeKind::TK_MAP => None,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
