// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime type information.
//!
//! A [`TypeDescriptor`] graph is built once by a type builder and shared
//! read-only (through `Arc`) by every value and serializer that uses it.

use crate::error::{IntrospectError, Result};
use crate::type_kind::TypeKind;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Deepest structural comparison in [`TypeDescriptor::is_same_type`].
const MAX_COMPARE_DEPTH: usize = 128;

/// Stable numeric key of a member; doubles as the bit position for bitmask
/// flags and as the element index for sequences and arrays.
pub type MemberId = u32;

/// A complete type descriptor.
pub struct TypeDescriptor {
    /// Type kind.
    pub kind: TypeKind,
    /// Type name (emitted for structures, enums and unions).
    pub name: String,
    /// Contained type of arrays, sequences and maps (map value type).
    pub element_type: Option<Arc<TypeDescriptor>>,
    /// Map key type.
    pub key_element_type: Option<Arc<TypeDescriptor>>,
    /// One entry per array dimension, or a single bound for strings,
    /// sequences, maps and bitmasks. `0` means unbounded.
    pub bound: Vec<u32>,
    /// Union discriminator type.
    pub discriminator_type: Option<Arc<TypeDescriptor>>,
    /// Members in declaration order.
    pub members: Vec<MemberDescriptor>,
    /// Alias target, set exactly once.
    base_type: OnceLock<Arc<TypeDescriptor>>,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            element_type: None,
            key_element_type: None,
            bound: Vec::new(),
            discriminator_type: None,
            members: Vec::new(),
            base_type: OnceLock::new(),
        }
    }

    /// Create a primitive type descriptor, named after its IDL keyword.
    pub fn primitive(kind: TypeKind) -> Self {
        Self::new(kind, kind.idl_keyword().unwrap_or_default())
    }

    /// 8-bit string, optionally bounded.
    pub fn string(max_length: Option<u32>) -> Self {
        let mut desc = Self::primitive(TypeKind::TK_STRING8);
        desc.bound = max_length.into_iter().collect();
        desc
    }

    /// 16-bit (wide) string, optionally bounded.
    pub fn wstring(max_length: Option<u32>) -> Self {
        let mut desc = Self::primitive(TypeKind::TK_STRING16);
        desc.bound = max_length.into_iter().collect();
        desc
    }

    /// Sequence of `element_type`; a bound of `0` means unbounded.
    pub fn sequence(element_type: Arc<TypeDescriptor>, bound: u32) -> Self {
        let mut desc = Self::new(TypeKind::TK_SEQUENCE, "");
        desc.element_type = Some(element_type);
        desc.bound = vec![bound];
        desc
    }

    /// Array of `element_type` with one entry per dimension.
    pub fn array(element_type: Arc<TypeDescriptor>, dimensions: Vec<u32>) -> Self {
        let mut desc = Self::new(TypeKind::TK_ARRAY, "");
        desc.element_type = Some(element_type);
        desc.bound = dimensions;
        desc
    }

    /// Map from `key_type` to `value_type`; a bound of `0` means unbounded.
    pub fn map(key_type: Arc<TypeDescriptor>, value_type: Arc<TypeDescriptor>, bound: u32) -> Self {
        let mut desc = Self::new(TypeKind::TK_MAP, "");
        desc.key_element_type = Some(key_type);
        desc.element_type = Some(value_type);
        desc.bound = vec![bound];
        desc
    }

    /// Alias (typedef) of `base`.
    pub fn alias(name: impl Into<String>, base: Arc<TypeDescriptor>) -> Self {
        let desc = Self::new(TypeKind::TK_ALIAS, name);
        let _ = desc.base_type.set(base);
        desc
    }

    /// Alias whose target is bound later with [`bind_alias_target`].
    ///
    /// Needed to describe recursive graphs.
    ///
    /// [`bind_alias_target`]: Self::bind_alias_target
    pub fn forward_alias(name: impl Into<String>) -> Self {
        Self::new(TypeKind::TK_ALIAS, name)
    }

    /// Bind the target of a forward-declared alias. Fails if this is not an
    /// alias or the target is already set.
    pub fn bind_alias_target(&self, base: Arc<TypeDescriptor>) -> Result<()> {
        if self.kind != TypeKind::TK_ALIAS {
            return Err(IntrospectError::BrokenTypeGraph(format!(
                "'{}' is {} and cannot take an alias target",
                self.name, self.kind
            )));
        }
        self.base_type.set(base).map_err(|_| {
            IntrospectError::BrokenTypeGraph(format!("alias '{}' is already bound", self.name))
        })
    }

    /// Alias target, if this is a bound alias.
    pub fn base_type(&self) -> Option<&Arc<TypeDescriptor>> {
        self.base_type.get()
    }

    /// Follow zero or more alias hops to the enclosing (non-alias) type.
    pub fn resolve_alias(self: &Arc<Self>) -> Result<Arc<TypeDescriptor>> {
        let mut visited: Vec<*const TypeDescriptor> = Vec::new();
        let mut current = Arc::clone(self);
        while current.kind == TypeKind::TK_ALIAS {
            if visited.contains(&Arc::as_ptr(&current)) {
                return Err(IntrospectError::BrokenTypeGraph(format!(
                    "alias cycle through '{}'",
                    current.name
                )));
            }
            visited.push(Arc::as_ptr(&current));
            let next = current.base_type().cloned().ok_or_else(|| {
                IntrospectError::BrokenTypeGraph(format!(
                    "alias '{}' has no base type",
                    current.name
                ))
            })?;
            current = next;
        }
        Ok(current)
    }

    /// Element type, or `BrokenTypeGraph` when missing.
    pub fn element(&self) -> Result<&Arc<TypeDescriptor>> {
        self.element_type
            .as_ref()
            .ok_or_else(|| self.missing("element type"))
    }

    /// Map key type, or `BrokenTypeGraph` when missing.
    pub fn key_element(&self) -> Result<&Arc<TypeDescriptor>> {
        self.key_element_type
            .as_ref()
            .ok_or_else(|| self.missing("key element type"))
    }

    /// Union discriminator type, or `BrokenTypeGraph` when missing.
    pub fn discriminator(&self) -> Result<&Arc<TypeDescriptor>> {
        self.discriminator_type
            .as_ref()
            .ok_or_else(|| self.missing("discriminator type"))
    }

    /// First bound entry (string, sequence, map and bitmask bound).
    pub fn first_bound(&self) -> Option<u32> {
        self.bound.first().copied()
    }

    /// Get member by id.
    pub fn member(&self, id: MemberId) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Get member by name.
    pub fn member_by_name(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Members ordered by id.
    pub fn members_by_id(&self) -> Vec<&MemberDescriptor> {
        let mut members: Vec<_> = self.members.iter().collect();
        members.sort_by_key(|m| m.id);
        members
    }

    /// Structural type equality through aliases: kind, name, bounds, element,
    /// key and discriminator types, and every member (id, name, labels, type).
    ///
    /// Graphs that stay distinct past 128 levels compare unequal.
    pub fn is_same_type(self: &Arc<Self>, other: &Arc<TypeDescriptor>) -> bool {
        same_type(self, other, 0)
    }

    fn missing(&self, what: &str) -> IntrospectError {
        IntrospectError::BrokenTypeGraph(format!(
            "{} '{}' has no {}",
            self.kind, self.name, what
        ))
    }
}

fn same_type(a: &Arc<TypeDescriptor>, b: &Arc<TypeDescriptor>, depth: usize) -> bool {
    if Arc::ptr_eq(a, b) {
        return true;
    }
    if depth > MAX_COMPARE_DEPTH {
        return false;
    }
    let (Ok(a), Ok(b)) = (a.resolve_alias(), b.resolve_alias()) else {
        return false;
    };
    if Arc::ptr_eq(&a, &b) {
        return true;
    }
    a.kind == b.kind
        && a.name == b.name
        && a.bound == b.bound
        && same_optional(&a.element_type, &b.element_type, depth)
        && same_optional(&a.key_element_type, &b.key_element_type, depth)
        && same_optional(&a.discriminator_type, &b.discriminator_type, depth)
        && a.members.len() == b.members.len()
        && a.members.iter().zip(&b.members).all(|(x, y)| {
            x.id == y.id
                && x.name == y.name
                && x.labels == y.labels
                && same_type(&x.type_desc, &y.type_desc, depth + 1)
        })
}

fn same_optional(
    a: &Option<Arc<TypeDescriptor>>,
    b: &Option<Arc<TypeDescriptor>>,
    depth: usize,
) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => same_type(a, b, depth + 1),
        (None, None) => true,
        _ => false,
    }
}

// Manual impl: alias targets may point back into the graph, so only their
// name is printed.
impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("element_type", &self.element_type)
            .field("key_element_type", &self.key_element_type)
            .field("bound", &self.bound)
            .field("discriminator_type", &self.discriminator_type)
            .field("members", &self.members)
            .field("base_type", &self.base_type().map(|b| b.name.as_str()))
            .finish()
    }
}

/// Member descriptor for struct, union, enum, bitmask and bitset members.
#[derive(Debug, Clone)]
pub struct MemberDescriptor {
    /// Member ID (bit position for bitmask flags).
    pub id: MemberId,
    /// Member name.
    pub name: String,
    /// Member type.
    pub type_desc: Arc<TypeDescriptor>,
    /// Default value literal. For enumerators, the numeric value as text.
    pub default_value: String,
    /// Union case labels. Empty marks the default case.
    pub labels: Vec<i32>,
}

impl MemberDescriptor {
    /// Create a new member descriptor.
    pub fn new(id: MemberId, name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            id,
            name: name.into(),
            type_desc,
            default_value: String::new(),
            labels: Vec::new(),
        }
    }

    /// Set default value.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = default.into();
        self
    }

    /// Set union case labels.
    pub fn with_labels(mut self, labels: Vec<i32>) -> Self {
        self.labels = labels;
        self
    }

    /// True for union members without case labels.
    pub fn is_default_case(&self) -> bool {
        self.labels.is_empty()
    }
}
