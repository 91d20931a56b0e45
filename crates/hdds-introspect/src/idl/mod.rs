// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! IDL schema generation from a type graph.
//!
//! Generation runs in two passes:
//!
//! 1. [`build_type_tree`] walks the type graph into a [`TreeNode`] tree.
//!    Structure members are visited in alphabetical order; collections get
//!    one branch per contained type.
//! 2. [`render_schema`] flattens the tree in pre-order and writes every
//!    `struct`, `enum` and `union` the first time its name is seen, then
//!    appends the root definition.
//!
//! The root is always appended last, even if a self-referential graph
//! already emitted it as a dependency.
//!
//! Bitsets and bitmasks have no IDL rendering here and fail with
//! [`IntrospectError::UnsupportedForSchema`].

mod tree;

pub use tree::TreeNode;

use crate::dynamic::{MemberDescriptor, TypeDescriptor};
use crate::error::{IntrospectError, Result};
use crate::type_kind::TypeKind;
use std::collections::HashSet;
use std::fmt::Write;
use std::sync::Arc;

/// Member name of the root node.
pub const PARENT_MEMBER: &str = "PARENT";
/// Member name of the element branch of arrays, sequences and maps.
pub const CONTAINER_MEMBER: &str = "CONTAINER_MEMBER";
/// Member name of the key branch of maps.
pub const CONTAINER_KEY: &str = "CONTAINER_KEY";
/// Member name of the discriminator branch of unions.
pub const DISCRIMINATOR_MEMBER: &str = "DISCRIMINATOR";

const TAB: &str = "    ";
const TYPE_CLOSURE: &str = "};\n";

/// Deepest anonymous collection nesting rendered in a type name.
const MAX_NAME_DEPTH: usize = 128;

/// Per-node payload of the type tree.
#[derive(Debug, Clone)]
pub struct TypeNodeInfo {
    /// Name of the member this node was reached through.
    pub member_name: String,
    /// Rendered IDL type name.
    pub type_kind_name: String,
    /// Alias-resolved type of the node.
    pub dynamic_type: Arc<TypeDescriptor>,
}

/// Generate IDL text for `dynamic_type` and every named type it references.
///
/// The root must be a structure, enum or union (aliases are resolved first).
pub fn generate_idl_schema(dynamic_type: &Arc<TypeDescriptor>) -> Result<String> {
    let result = dynamic_type
        .resolve_alias()
        .and_then(|root| {
            check_root(&root)?;
            build_type_tree(&root, PARENT_MEMBER)
        })
        .and_then(|tree| render_schema(&tree));

    result.map_err(|e| {
        log::warn!(
            "[idl] generating schema for '{}' failed: {}",
            dynamic_type.name,
            e
        );
        e
    })
}

/// Build the type tree rooted at `dynamic_type`.
///
/// A structure or union already present on the path from the root is added
/// as a leaf, so recursive graphs terminate.
pub fn build_type_tree(
    dynamic_type: &Arc<TypeDescriptor>,
    member_name: &str,
) -> Result<TreeNode<TypeNodeInfo>> {
    let mut ancestors = Vec::new();
    build_node(dynamic_type, member_name, &mut ancestors)
}

fn build_node(
    dynamic_type: &Arc<TypeDescriptor>,
    member_name: &str,
    ancestors: &mut Vec<*const TypeDescriptor>,
) -> Result<TreeNode<TypeNodeInfo>> {
    let resolved = dynamic_type.resolve_alias()?;
    let mut node = TreeNode::new(TypeNodeInfo {
        member_name: member_name.to_owned(),
        type_kind_name: type_kind_to_str(&resolved)?,
        dynamic_type: Arc::clone(&resolved),
    });

    let id = Arc::as_ptr(&resolved);
    if ancestors.contains(&id) {
        log::debug!("[idl] '{}' recurses into itself, not expanded", resolved.name);
        return Ok(node);
    }
    ancestors.push(id);

    match resolved.kind {
        TypeKind::TK_STRUCTURE => {
            for member in sorted_by_name(resolved.members.iter()) {
                node.add_branch(build_node(&member.type_desc, &member.name, ancestors)?);
            }
        }
        TypeKind::TK_UNION => {
            node.add_branch(build_node(
                resolved.discriminator()?,
                DISCRIMINATOR_MEMBER,
                ancestors,
            )?);
            let cases = resolved.members.iter().filter(|m| !m.is_default_case());
            for member in sorted_by_name(cases) {
                node.add_branch(build_node(&member.type_desc, &member.name, ancestors)?);
            }
        }
        TypeKind::TK_ARRAY | TypeKind::TK_SEQUENCE => {
            node.add_branch(build_node(resolved.element()?, CONTAINER_MEMBER, ancestors)?);
        }
        TypeKind::TK_MAP => {
            node.add_branch(build_node(resolved.key_element()?, CONTAINER_KEY, ancestors)?);
            node.add_branch(build_node(resolved.element()?, CONTAINER_MEMBER, ancestors)?);
        }
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
        | TypeKind::TK_ALIAS
        | TypeKind::TK_ENUM
        | TypeKind::TK_BITMASK
        | TypeKind::TK_BITSET => {}
    }

    ancestors.pop();
    Ok(node)
}

fn sorted_by_name<'a>(
    members: impl Iterator<Item = &'a MemberDescriptor>,
) -> Vec<&'a MemberDescriptor> {
    let mut members: Vec<_> = members.collect();
    members.sort_by(|a, b| a.name.cmp(&b.name));
    members
}

/// Render a type tree as IDL text: dependencies first (first occurrence of
/// each name wins), each followed by a blank line, then the root.
pub fn render_schema(root: &TreeNode<TypeNodeInfo>) -> Result<String> {
    check_root(&root.info.dynamic_type)?;

    let mut out = String::new();
    let mut types_written: HashSet<&str> = HashSet::new();

    for node in root.all_nodes() {
        let info = &node.info;
        if types_written.contains(info.type_kind_name.as_str()) {
            continue;
        }
        if write_definition(&mut out, &info.dynamic_type)? {
            out.push('\n');
            types_written.insert(info.type_kind_name.as_str());
        }
    }

    write_definition(&mut out, &root.info.dynamic_type)?;
    Ok(out)
}

/// Roots must be definable types.
fn check_root(root: &TypeDescriptor) -> Result<()> {
    match root.kind {
        TypeKind::TK_STRUCTURE | TypeKind::TK_ENUM | TypeKind::TK_UNION => Ok(()),
        TypeKind::TK_NONE | TypeKind::TK_BITMASK | TypeKind::TK_BITSET => {
            Err(unsupported_for_schema(root))
        }
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
        | TypeKind::TK_ALIAS
        | TypeKind::TK_SEQUENCE
        | TypeKind::TK_ARRAY
        | TypeKind::TK_MAP => Err(IntrospectError::UnsupportedRoot(root.kind)),
    }
}

fn unsupported_for_schema(desc: &TypeDescriptor) -> IntrospectError {
    IntrospectError::UnsupportedForSchema {
        kind: desc.kind,
        name: desc.name.clone(),
    }
}

/// Append the definition of a struct, enum or union. Returns `false` for
/// kinds that have no standalone definition.
fn write_definition(out: &mut String, desc: &TypeDescriptor) -> Result<bool> {
    match desc.kind {
        TypeKind::TK_STRUCTURE => struct_to_str(out, desc)?,
        TypeKind::TK_ENUM => enum_to_str(out, desc),
        TypeKind::TK_UNION => union_to_str(out, desc)?,
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
        | TypeKind::TK_ALIAS
        | TypeKind::TK_BITMASK
        | TypeKind::TK_BITSET
        | TypeKind::TK_SEQUENCE
        | TypeKind::TK_ARRAY
        | TypeKind::TK_MAP => return Ok(false),
    }
    log::debug!("[idl] wrote {} '{}'", desc.kind, desc.name);
    Ok(true)
}

/// Fields in declaration order.
fn struct_to_str(out: &mut String, desc: &TypeDescriptor) -> Result<()> {
    let _ = writeln!(out, "struct {} {{", desc.name);
    for member in &desc.members {
        let _ = writeln!(out, "{}{};", TAB, declarator(member)?);
    }
    out.push_str(TYPE_CLOSURE);
    Ok(())
}

fn enum_to_str(out: &mut String, desc: &TypeDescriptor) {
    let _ = writeln!(out, "enum {} {{", desc.name);
    for (index, member) in desc.members_by_id().into_iter().enumerate() {
        if index > 0 {
            out.push_str(",\n");
        }
        let _ = write!(out, "{}{}", TAB, member.name);
    }
    out.push('\n');
    out.push_str(TYPE_CLOSURE);
}

/// Default-case members (no labels) are not written.
fn union_to_str(out: &mut String, desc: &TypeDescriptor) -> Result<()> {
    let _ = writeln!(
        out,
        "union {} switch ({}) {{",
        desc.name,
        type_kind_to_str(desc.discriminator()?)?
    );
    for member in desc.members_by_id() {
        if member.is_default_case() {
            continue;
        }
        out.push_str(TAB);
        for (index, label) in member.labels.iter().enumerate() {
            if index > 0 {
                out.push(' ');
            }
            let _ = write!(out, "case {}:", label);
        }
        let _ = writeln!(out, "\n{}{}{};", TAB, TAB, declarator(member)?);
    }
    out.push_str(TYPE_CLOSURE);
    Ok(())
}

/// `<type> <name>`, with array dimensions after the name.
fn declarator(member: &MemberDescriptor) -> Result<String> {
    let member_type = member.type_desc.resolve_alias()?;
    if member_type.kind == TypeKind::TK_ARRAY {
        let (element, dims) = array_parts(&member_type, 0)?;
        Ok(format!("{} {}{}", element, member.name, dims))
    } else {
        Ok(format!("{} {}", type_kind_to_str(&member_type)?, member.name))
    }
}

/// IDL name of a type: keyword for primitives, declared name for
/// structures, enums and unions, template syntax for collections.
pub fn type_kind_to_str(dynamic_type: &Arc<TypeDescriptor>) -> Result<String> {
    kind_name(dynamic_type, 0)
}

fn kind_name(dynamic_type: &Arc<TypeDescriptor>, depth: usize) -> Result<String> {
    if depth > MAX_NAME_DEPTH {
        return Err(IntrospectError::BrokenTypeGraph(format!(
            "type name of '{}' nests deeper than {} levels",
            dynamic_type.name, MAX_NAME_DEPTH
        )));
    }
    let desc = dynamic_type.resolve_alias()?;
    let name = match desc.kind {
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
        | TypeKind::TK_CHAR16 => keyword(&desc)?.to_owned(),
        TypeKind::TK_STRING8 | TypeKind::TK_STRING16 => match desc.first_bound() {
            Some(bound) if bound > 0 => format!("{}<{}>", keyword(&desc)?, bound),
            _ => keyword(&desc)?.to_owned(),
        },
        TypeKind::TK_ARRAY => {
            let (element, dims) = array_parts(&desc, depth)?;
            format!("{}{}", element, dims)
        }
        TypeKind::TK_SEQUENCE => {
            let element = kind_name(desc.element()?, depth + 1)?;
            match desc.first_bound() {
                Some(bound) if bound > 0 => format!("sequence<{}, {}>", element, bound),
                _ => format!("sequence<{}>", element),
            }
        }
        TypeKind::TK_MAP => {
            let key = kind_name(desc.key_element()?, depth + 1)?;
            let value = kind_name(desc.element()?, depth + 1)?;
            match desc.first_bound() {
                Some(bound) if bound > 0 => format!("map<{}, {}, {}>", key, value, bound),
                _ => format!("map<{}, {}>", key, value),
            }
        }
        TypeKind::TK_STRUCTURE | TypeKind::TK_ENUM | TypeKind::TK_UNION => desc.name.clone(),
        TypeKind::TK_BITSET | TypeKind::TK_BITMASK | TypeKind::TK_NONE => {
            return Err(unsupported_for_schema(&desc));
        }
        TypeKind::TK_ALIAS => return Err(IntrospectError::UnexpectedAlias),
    };
    Ok(name)
}

fn keyword(desc: &TypeDescriptor) -> Result<&'static str> {
    desc.kind
        .idl_keyword()
        .ok_or(IntrospectError::UnsupportedKind(desc.kind))
}

/// Innermost element name and the `[d0][d1]...` suffix of an array,
/// flattening arrays of arrays.
fn array_parts(array: &TypeDescriptor, depth: usize) -> Result<(String, String)> {
    let mut dims = String::new();
    for dim in &array.bound {
        let _ = write!(dims, "[{}]", dim);
    }
    let element = array.element()?.resolve_alias()?;
    if element.kind == TypeKind::TK_ARRAY {
        if depth > MAX_NAME_DEPTH {
            return Err(IntrospectError::BrokenTypeGraph(format!(
                "array '{}' nests deeper than {} levels",
                array.name, MAX_NAME_DEPTH
            )));
        }
        let (inner, inner_dims) = array_parts(&element, depth + 1)?;
        Ok((inner, dims + &inner_dims))
    } else {
        Ok((kind_name(&element, depth + 1)?, dims))
    }
}
