// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scalar value storage.

use crate::type_kind::TypeKind;

/// Stored representation of a primitive, string, enum or bitmask member.
///
/// Enums are stored as `Int32`; bitmasks as the unsigned width selected by
/// their bound.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Boolean(bool),
    Byte(u8),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    /// Long double, carried at `f64` precision.
    Float128(f64),
    Char8(u8),
    /// One UTF-16 code unit.
    Char16(u16),
    String8(String),
    /// UTF-16 code units.
    String16(Vec<u16>),
}

impl ScalarValue {
    /// Kind of the stored representation.
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Boolean(_) => TypeKind::TK_BOOLEAN,
            Self::Byte(_) => TypeKind::TK_BYTE,
            Self::Int8(_) => TypeKind::TK_INT8,
            Self::Int16(_) => TypeKind::TK_INT16,
            Self::Int32(_) => TypeKind::TK_INT32,
            Self::Int64(_) => TypeKind::TK_INT64,
            Self::UInt8(_) => TypeKind::TK_UINT8,
            Self::UInt16(_) => TypeKind::TK_UINT16,
            Self::UInt32(_) => TypeKind::TK_UINT32,
            Self::UInt64(_) => TypeKind::TK_UINT64,
            Self::Float32(_) => TypeKind::TK_FLOAT32,
            Self::Float64(_) => TypeKind::TK_FLOAT64,
            Self::Float128(_) => TypeKind::TK_FLOAT128,
            Self::Char8(_) => TypeKind::TK_CHAR8,
            Self::Char16(_) => TypeKind::TK_CHAR16,
            Self::String8(_) => TypeKind::TK_STRING8,
            Self::String16(_) => TypeKind::TK_STRING16,
        }
    }

    /// Zero value for a storage kind. `None` for kinds that are not stored
    /// as scalars.
    pub fn default_for(kind: TypeKind) -> Option<Self> {
        let value = match kind {
            TypeKind::TK_BOOLEAN => Self::Boolean(false),
            TypeKind::TK_BYTE => Self::Byte(0),
            TypeKind::TK_INT8 => Self::Int8(0),
            TypeKind::TK_INT16 => Self::Int16(0),
            TypeKind::TK_INT32 => Self::Int32(0),
            TypeKind::TK_INT64 => Self::Int64(0),
            TypeKind::TK_UINT8 => Self::UInt8(0),
            TypeKind::TK_UINT16 => Self::UInt16(0),
            TypeKind::TK_UINT32 => Self::UInt32(0),
            TypeKind::TK_UINT64 => Self::UInt64(0),
            TypeKind::TK_FLOAT32 => Self::Float32(0.0),
            TypeKind::TK_FLOAT64 => Self::Float64(0.0),
            TypeKind::TK_FLOAT128 => Self::Float128(0.0),
            TypeKind::TK_CHAR8 => Self::Char8(0),
            TypeKind::TK_CHAR16 => Self::Char16(0),
            TypeKind::TK_STRING8 => Self::String8(String::new()),
            TypeKind::TK_STRING16 => Self::String16(Vec::new()),
            TypeKind::TK_NONE
            | TypeKind::TK_ALIAS
            | TypeKind::TK_ENUM
            | TypeKind::TK_BITMASK
            | TypeKind::TK_STRUCTURE
            | TypeKind::TK_UNION
            | TypeKind::TK_BITSET
            | TypeKind::TK_SEQUENCE
            | TypeKind::TK_ARRAY
            | TypeKind::TK_MAP => return None,
        };
        Some(value)
    }

    /// Wide string from UTF-8 text.
    pub fn wstring(text: &str) -> Self {
        Self::String16(text.encode_utf16().collect())
    }

    /// Wide character from a `char` in the Basic Multilingual Plane.
    ///
    /// Characters outside the BMP keep only their leading surrogate.
    pub fn wchar(c: char) -> Self {
        let mut units = [0u16; 2];
        Self::Char16(c.encode_utf16(&mut units)[0])
    }

    /// Text form of character and string values, transcoded to UTF-8.
    ///
    /// Unpaired surrogates are replaced with U+FFFD.
    pub fn to_utf8(&self) -> Option<String> {
        match self {
            Self::Char8(c) => Some(char::from(*c).to_string()),
            Self::Char16(c) => Some(String::from_utf16_lossy(&[*c])),
            Self::String8(s) => Some(s.clone()),
            Self::String16(units) => Some(String::from_utf16_lossy(units)),
            _ => None,
        }
    }
}

macro_rules! impl_from_scalar {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for ScalarValue {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        }
    };
}

impl_from_scalar!(bool, Boolean);
impl_from_scalar!(i8, Int8);
impl_from_scalar!(i16, Int16);
impl_from_scalar!(i32, Int32);
impl_from_scalar!(i64, Int64);
impl_from_scalar!(u8, UInt8);
impl_from_scalar!(u16, UInt16);
impl_from_scalar!(u32, UInt32);
impl_from_scalar!(u64, UInt64);
impl_from_scalar!(f32, Float32);
impl_from_scalar!(f64, Float64);
impl_from_scalar!(String, String8);

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        Self::String8(v.to_string())
    }
}
