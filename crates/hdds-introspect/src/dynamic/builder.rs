// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for TypeDescriptor.

use crate::dynamic::{MemberDescriptor, MemberId, TypeDescriptor};
use crate::type_kind::TypeKind;
use std::sync::Arc;

/// Builder for structure and bitset types.
///
/// Member ids are assigned in declaration order starting at 0 unless given
/// explicitly.
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    kind: TypeKind,
    name: String,
    members: Vec<MemberDescriptor>,
    next_id: MemberId,
}

impl TypeDescriptorBuilder {
    /// Create a new builder for a struct type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::TK_STRUCTURE,
            name: name.into(),
            members: Vec::new(),
            next_id: 0,
        }
    }

    /// Create a new builder for a bitset type.
    pub fn bitset(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::TK_BITSET,
            ..Self::new(name)
        }
    }

    /// Add a primitive field.
    pub fn field(self, name: impl Into<String>, kind: TypeKind) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::primitive(kind)))
    }

    /// Add a field with a type descriptor.
    pub fn field_with_type(self, name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        let id = self.next_id;
        self.field_with_id(name, type_desc, id)
    }

    /// Add a field with explicit ID.
    pub fn field_with_id(
        mut self,
        name: impl Into<String>,
        type_desc: Arc<TypeDescriptor>,
        id: MemberId,
    ) -> Self {
        self.members.push(MemberDescriptor::new(id, name, type_desc));
        self.next_id = id.saturating_add(1);
        self
    }

    /// Add a string field.
    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::string(None)))
    }

    /// Add a sequence field.
    pub fn sequence_field(self, name: impl Into<String>, element_kind: TypeKind, bound: u32) -> Self {
        let element_type = Arc::new(TypeDescriptor::primitive(element_kind));
        self.field_with_type(name, Arc::new(TypeDescriptor::sequence(element_type, bound)))
    }

    /// Add an array field.
    pub fn array_field(
        self,
        name: impl Into<String>,
        element_kind: TypeKind,
        dimensions: Vec<u32>,
    ) -> Self {
        let element_type = Arc::new(TypeDescriptor::primitive(element_kind));
        self.field_with_type(name, Arc::new(TypeDescriptor::array(element_type, dimensions)))
    }

    /// Build the TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        let mut desc = TypeDescriptor::new(self.kind, self.name);
        desc.members = self.members;
        desc
    }
}

/// Builder for enum types.
///
/// Each enumerator's numeric value is kept as its default-value literal.
#[derive(Debug)]
pub struct EnumBuilder {
    name: String,
    members: Vec<MemberDescriptor>,
    next_value: i32,
}

impl EnumBuilder {
    /// Create a new enum builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            next_value: 0,
        }
    }

    /// Add a variant with auto-incrementing value.
    pub fn variant(self, name: impl Into<String>) -> Self {
        let value = self.next_value;
        self.variant_value(name, value)
    }

    /// Add a variant with explicit value.
    pub fn variant_value(mut self, name: impl Into<String>, value: i32) -> Self {
        let id = self.members.len() as MemberId;
        let literal_type = Arc::new(TypeDescriptor::primitive(TypeKind::TK_INT32));
        self.members
            .push(MemberDescriptor::new(id, name, literal_type).with_default(value.to_string()));
        self.next_value = value.wrapping_add(1);
        self
    }

    /// Build the TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        let mut desc = TypeDescriptor::new(TypeKind::TK_ENUM, self.name);
        desc.bound = vec![32];
        desc.members = self.members;
        desc
    }
}

/// Builder for bitmask types. Flag ids are bit positions.
#[derive(Debug)]
pub struct BitmaskBuilder {
    name: String,
    bit_bound: u32,
    members: Vec<MemberDescriptor>,
}

impl BitmaskBuilder {
    /// Create a bitmask of `bit_bound` bits.
    pub fn new(name: impl Into<String>, bit_bound: u32) -> Self {
        Self {
            name: name.into(),
            bit_bound,
            members: Vec::new(),
        }
    }

    /// Add a flag at bit `position`.
    pub fn flag(mut self, name: impl Into<String>, position: u32) -> Self {
        let flag_type = Arc::new(TypeDescriptor::primitive(TypeKind::TK_BOOLEAN));
        self.members
            .push(MemberDescriptor::new(position, name, flag_type));
        self
    }

    /// Build the TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        let mut desc = TypeDescriptor::new(TypeKind::TK_BITMASK, self.name);
        desc.bound = vec![self.bit_bound];
        desc.members = self.members;
        desc
    }
}

/// Builder for union types.
#[derive(Debug)]
pub struct UnionBuilder {
    name: String,
    discriminator: Arc<TypeDescriptor>,
    members: Vec<MemberDescriptor>,
}

impl UnionBuilder {
    /// Create a new union builder with discriminator type.
    pub fn new(name: impl Into<String>, discriminator: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            discriminator,
            members: Vec::new(),
        }
    }

    /// Create with `long` discriminator.
    pub fn with_i32_discriminator(name: impl Into<String>) -> Self {
        Self::new(name, Arc::new(TypeDescriptor::primitive(TypeKind::TK_INT32)))
    }

    /// Add a case with single label.
    pub fn case(self, name: impl Into<String>, label: i32, type_desc: Arc<TypeDescriptor>) -> Self {
        self.case_labels(name, vec![label], type_desc)
    }

    /// Add a case with multiple labels.
    pub fn case_labels(
        mut self,
        name: impl Into<String>,
        labels: Vec<i32>,
        type_desc: Arc<TypeDescriptor>,
    ) -> Self {
        let id = self.members.len() as MemberId;
        self.members
            .push(MemberDescriptor::new(id, name, type_desc).with_labels(labels));
        self
    }

    /// Add a primitive case.
    pub fn primitive_case(self, name: impl Into<String>, label: i32, kind: TypeKind) -> Self {
        self.case(name, label, Arc::new(TypeDescriptor::primitive(kind)))
    }

    /// Add the default case (a member without labels).
    pub fn default_case(self, name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        self.case_labels(name, Vec::new(), type_desc)
    }

    /// Build the TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        let mut desc = TypeDescriptor::new(TypeKind::TK_UNION, self.name);
        desc.discriminator_type = Some(self.discriminator);
        desc.members = self.members;
        desc
    }
}
