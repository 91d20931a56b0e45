// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scoped loans of nested members.
//!
//! A [`LoanedData`] is an exclusive read view of one aggregate or collection
//! member of its parent. Returning it through
//! [`DynamicData::return_loaned_value`] reports bookkeeping errors; dropping
//! it releases the loan silently, so no error path can leak one.

use crate::dynamic::{DynamicData, MemberId};
use crate::error::Result;
use std::fmt;
use std::ops::Deref;

/// Loan counters of a single [`DynamicData`] (direct members only).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoanStats {
    /// Successful `loan_value` calls.
    pub issued: usize,
    /// Loans released, explicitly or on drop.
    pub returned: usize,
}

impl LoanStats {
    /// True when every issued loan has been returned.
    pub fn is_balanced(&self) -> bool {
        self.issued == self.returned
    }
}

/// Exclusive view of a loaned member.
pub struct LoanedData<'a> {
    parent: &'a DynamicData,
    member_id: MemberId,
    data: &'a DynamicData,
    released: bool,
}

impl<'a> LoanedData<'a> {
    pub(crate) fn new(parent: &'a DynamicData, member_id: MemberId, data: &'a DynamicData) -> Self {
        Self {
            parent,
            member_id,
            data,
            released: false,
        }
    }

    /// Id of the loaned member within its parent.
    pub fn member_id(&self) -> MemberId {
        self.member_id
    }

    pub(crate) fn is_loaned_from(&self, parent: &DynamicData) -> bool {
        std::ptr::eq(self.parent, parent)
    }

    pub(crate) fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.parent.release_loan(self.member_id)
    }
}

impl Deref for LoanedData<'_> {
    type Target = DynamicData;

    fn deref(&self) -> &DynamicData {
        self.data
    }
}

impl Drop for LoanedData<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::debug!("[dynamic] releasing loan of member {} failed: {}", self.member_id, e);
        }
    }
}

impl fmt::Debug for LoanedData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoanedData")
            .field("member_id", &self.member_id)
            .field("type_name", &self.data.type_name())
            .field("released", &self.released)
            .finish()
    }
}
