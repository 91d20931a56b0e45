// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for dynamic data access, JSON serialization and IDL generation.

use crate::dynamic::MemberId;
use crate::type_kind::TypeKind;
use std::fmt;
use thiserror::Error;

/// Why a loan could not be taken or returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanFailure {
    /// The member already has an outstanding loan.
    AlreadyLoaned,
    /// The member is stored as a scalar; only aggregates and collections loan.
    NotLoanable,
    /// A return was attempted for a member that has no outstanding loan.
    NotLoaned,
    /// The loan was taken from a different parent.
    ForeignLoan,
}

impl fmt::Display for LoanFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::AlreadyLoaned => "member is already loaned",
            Self::NotLoanable => "member is not an aggregate or collection",
            Self::NotLoaned => "member has no outstanding loan",
            Self::ForeignLoan => "loan belongs to another value",
        };
        f.write_str(reason)
    }
}

/// Introspection failure modes.
#[derive(Debug, Error)]
pub enum IntrospectError {
    #[error("no member with id {0}")]
    NoSuchMember(MemberId),

    #[error("type mismatch on member {member_id}: requested {requested}, stored {stored}")]
    TypeMismatch {
        member_id: MemberId,
        requested: TypeKind,
        stored: TypeKind,
    },

    #[error("loan on member {member_id} failed: {reason}")]
    LoanFailed {
        member_id: MemberId,
        reason: LoanFailure,
    },

    #[error("unexpected TK_ALIAS reached member dispatch")]
    UnexpectedAlias,

    #[error("unsupported member kind {0}")]
    UnsupportedKind(TypeKind),

    #[error("unsupported root type kind {0}")]
    UnsupportedRoot(TypeKind),

    #[error("type '{name}' of kind {kind} cannot be expressed in IDL")]
    UnsupportedForSchema { kind: TypeKind, name: String },

    #[error("enum '{type_name}' has no enumerator with value {value}")]
    EnumValueNotFound { type_name: String, value: i32 },

    #[error("broken type graph: {0}")]
    BrokenTypeGraph(String),

    #[error("index {index} out of bounds ({count} items)")]
    IndexOutOfBounds { index: usize, count: usize },

    #[error("collection bound {bound} exceeded")]
    CapacityExceeded { bound: u32 },

    #[error("unknown JSON format '{0}' (expected 'omg' or 'eprosima')")]
    UnknownFormat(String),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IntrospectError>;
