// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tests for DynamicData access and the loan protocol.

use super::*;
use crate::error::{IntrospectError, LoanFailure};
use crate::type_kind::TypeKind;
use std::sync::Arc;

fn vector3_type() -> Arc<TypeDescriptor> {
    Arc::new(
        TypeDescriptorBuilder::new("Vector3")
            .field("x", TypeKind::TK_FLOAT64)
            .field("y", TypeKind::TK_FLOAT64)
            .field("z", TypeKind::TK_FLOAT64)
            .build(),
    )
}

fn pose_type() -> Arc<TypeDescriptor> {
    Arc::new(
        TypeDescriptorBuilder::new("Pose")
            .field_with_type("position", vector3_type())
            .field_with_type("orientation", vector3_type())
            .field("frame", TypeKind::TK_UINT32)
            .build(),
    )
}

#[test]
fn test_new_struct_has_defaults() {
    let data = DynamicData::new(&pose_type()).expect("new");

    assert_eq!(data.type_name(), "Pose");
    assert_eq!(data.item_count(), 3);
    assert_eq!(data.get_uint32_value(2).expect("frame"), 0);

    let position = data.loan_value(0).expect("loan");
    assert_eq!(position.get_float64_value(0).expect("x"), 0.0);
    data.return_loaned_value(position).expect("return");
}

#[test]
fn test_scalar_kind_checks() {
    let mut data = DynamicData::new(&pose_type()).expect("new");

    data.set_uint32_value(2, 9).expect("set frame");
    assert_eq!(data.get_uint32_value(2).expect("get"), 9);

    assert!(matches!(
        data.set_int32_value(2, 9),
        Err(IntrospectError::TypeMismatch { member_id: 2, .. })
    ));
    assert!(matches!(
        data.get_int64_value(2),
        Err(IntrospectError::TypeMismatch { .. })
    ));
    assert!(matches!(
        data.get_uint32_value(42),
        Err(IntrospectError::NoSuchMember(42))
    ));
    // Complex member read as a scalar.
    assert!(matches!(
        data.get_float64_value(0),
        Err(IntrospectError::TypeMismatch {
            stored: TypeKind::TK_STRUCTURE,
            ..
        })
    ));
}

#[test]
fn test_complex_value_mut_edits_in_place() {
    let mut data = DynamicData::new(&pose_type()).expect("new");
    data.complex_value_mut(1)
        .expect("orientation")
        .set_float64_value(2, 1.0)
        .expect("set z");

    let orientation = data.loan_value(1).expect("loan");
    assert_eq!(orientation.get_float64_value(2).expect("z"), 1.0);
    drop(orientation);

    assert!(matches!(
        data.complex_value_mut(2),
        Err(IntrospectError::LoanFailed {
            reason: LoanFailure::NotLoanable,
            ..
        })
    ));
}

#[test]
fn test_set_complex_value_checks_type() {
    let mut data = DynamicData::new(&pose_type()).expect("new");
    let mut position = DynamicData::new(&vector3_type()).expect("new");
    position.set_float64_value(0, 4.0).expect("x");
    data.set_complex_value(0, position).expect("install");

    let other = Arc::new(TypeDescriptorBuilder::new("Other").build());
    let wrong = DynamicData::new(&other).expect("new");
    assert!(matches!(
        data.set_complex_value(0, wrong),
        Err(IntrospectError::TypeMismatch { .. })
    ));
}

#[test]
fn test_set_complex_value_checks_element_type() {
    let holder = Arc::new(
        TypeDescriptorBuilder::new("Holder")
            .field_with_type(
                "names",
                Arc::new(TypeDescriptor::sequence(Arc::new(TypeDescriptor::string(None)), 0)),
            )
            .build(),
    );
    let mut data = DynamicData::new(&holder).expect("new");

    let longs = Arc::new(TypeDescriptor::sequence(
        Arc::new(TypeDescriptor::primitive(TypeKind::TK_INT32)),
        0,
    ));
    let mut wrong = DynamicData::new(&longs).expect("new");
    wrong.set_int32_value(0, 5).expect("append");
    assert!(matches!(
        data.set_complex_value(0, wrong),
        Err(IntrospectError::TypeMismatch { member_id: 0, .. })
    ));

    let bounded = Arc::new(TypeDescriptor::sequence(Arc::new(TypeDescriptor::string(None)), 4));
    assert!(matches!(
        data.set_complex_value(0, DynamicData::new(&bounded).expect("new")),
        Err(IntrospectError::TypeMismatch { .. })
    ));

    let strings = Arc::new(TypeDescriptor::sequence(Arc::new(TypeDescriptor::string(None)), 0));
    let mut names = DynamicData::new(&strings).expect("new");
    names.set_string_value(0, "a".to_string()).expect("append");
    data.set_complex_value(0, names).expect("same shape accepted");
    assert_eq!(data.loan_value(0).expect("loan").item_count(), 1);
}

#[test]
fn test_double_loan_rejected() {
    let data = DynamicData::new(&pose_type()).expect("new");

    let first = data.loan_value(0).expect("first loan");
    assert!(matches!(
        data.loan_value(0),
        Err(IntrospectError::LoanFailed {
            member_id: 0,
            reason: LoanFailure::AlreadyLoaned
        })
    ));
    // A different member is independent.
    let other = data.loan_value(1).expect("other member");
    assert_eq!(data.outstanding_loans(), 2);

    data.return_loaned_value(first).expect("return first");
    data.return_loaned_value(other).expect("return other");
    assert_eq!(data.outstanding_loans(), 0);

    let again = data.loan_value(0).expect("loan after return");
    drop(again);
    assert_eq!(
        data.loan_stats(),
        LoanStats {
            issued: 3,
            returned: 3
        }
    );
}

#[test]
fn test_scalar_member_not_loanable() {
    let data = DynamicData::new(&pose_type()).expect("new");
    assert!(matches!(
        data.loan_value(2),
        Err(IntrospectError::LoanFailed {
            reason: LoanFailure::NotLoanable,
            ..
        })
    ));
    assert!(matches!(
        data.loan_value(99),
        Err(IntrospectError::NoSuchMember(99))
    ));
    assert_eq!(data.loan_stats().issued, 0);
}

#[test]
fn test_foreign_loan_rejected_but_released() {
    let a = DynamicData::new(&pose_type()).expect("new");
    let b = DynamicData::new(&pose_type()).expect("new");

    let loan = a.loan_value(0).expect("loan");
    assert!(matches!(
        b.return_loaned_value(loan),
        Err(IntrospectError::LoanFailed {
            reason: LoanFailure::ForeignLoan,
            ..
        })
    ));
    assert_eq!(a.outstanding_loans(), 0);
    assert!(a.loan_stats().is_balanced());
    assert_eq!(b.loan_stats().issued, 0);
}

#[test]
fn test_nested_loans_balance() {
    let outer = Arc::new(
        TypeDescriptorBuilder::new("Outer")
            .field_with_type("pose", pose_type())
            .build(),
    );
    let data = DynamicData::new(&outer).expect("new");
    {
        let pose = data.loan_value(0).expect("pose");
        let position = pose.loan_value(0).expect("position");
        assert_eq!(position.type_name(), "Vector3");
        assert_eq!(data.loan_stats_recursive().issued, 2);
    }
    let stats = data.loan_stats_recursive();
    assert_eq!(stats.issued, 2);
    assert!(stats.is_balanced());
}

#[test]
fn test_sequence_append_and_bound() {
    let seq = Arc::new(TypeDescriptor::sequence(
        Arc::new(TypeDescriptor::primitive(TypeKind::TK_INT16)),
        2,
    ));
    let mut data = DynamicData::new(&seq).expect("new");
    assert_eq!(data.item_count(), 0);

    data.set_int16_value(0, 10).expect("append 0");
    data.set_int16_value(1, 20).expect("append 1");
    data.set_int16_value(0, 11).expect("overwrite 0");
    assert_eq!(data.item_count(), 2);
    assert_eq!(data.member_id_at_index(1).expect("index"), 1);

    assert!(matches!(
        data.set_int16_value(2, 30),
        Err(IntrospectError::CapacityExceeded { bound: 2 })
    ));
    assert!(matches!(
        data.member_id_at_index(5),
        Err(IntrospectError::IndexOutOfBounds { index: 5, count: 2 })
    ));
}

#[test]
fn test_sequence_rejects_gaps() {
    let seq = Arc::new(TypeDescriptor::sequence(
        Arc::new(TypeDescriptor::string(None)),
        0,
    ));
    let mut data = DynamicData::new(&seq).expect("new");
    assert!(matches!(
        data.set_value(3, "gap"),
        Err(IntrospectError::NoSuchMember(3))
    ));
}

#[test]
fn test_array_is_preallocated() {
    let arr = Arc::new(TypeDescriptor::array(
        Arc::new(TypeDescriptor::primitive(TypeKind::TK_INT32)),
        vec![2, 3],
    ));
    let mut data = DynamicData::new(&arr).expect("new");
    assert_eq!(data.item_count(), 6);
    data.set_int32_value(5, 7).expect("last element");
    assert!(matches!(
        data.set_int32_value(6, 7),
        Err(IntrospectError::NoSuchMember(6))
    ));
}

#[test]
fn test_array_of_none_rejected() {
    let arr = Arc::new(TypeDescriptor::array(
        Arc::new(TypeDescriptor::new(TypeKind::TK_NONE, "")),
        vec![2],
    ));
    assert!(matches!(
        DynamicData::new(&arr),
        Err(IntrospectError::UnsupportedKind(TypeKind::TK_NONE))
    ));
}

#[test]
fn test_oversized_array_rejected() {
    let element = Arc::new(TypeDescriptor::primitive(TypeKind::TK_UINT8));
    for dims in [vec![u32::MAX], vec![65536, 65536]] {
        let arr = Arc::new(TypeDescriptor::array(element.clone(), dims));
        assert!(matches!(
            DynamicData::new(&arr),
            Err(IntrospectError::CapacityExceeded { .. })
        ));
    }
}

#[test]
fn test_union_selection() {
    let union_type = Arc::new(
        UnionBuilder::with_i32_discriminator("Value")
            .default_case("raw", Arc::new(TypeDescriptor::string(None)))
            .primitive_case("int_val", 1, TypeKind::TK_INT32)
            .case("point", 2, vector3_type())
            .build(),
    );
    let mut data = DynamicData::new(&union_type).expect("new");

    // First labeled case is active initially.
    assert_eq!(data.selected_union_member().expect("selected"), 1);

    data.select_union_member(2).expect("select point");
    assert_eq!(data.selected_union_member().expect("selected"), 2);
    assert_eq!(data.item_count(), 1);
    assert!(data.loan_value(2).is_ok());

    data.set_value(0, "bytes").expect("set raw");
    assert_eq!(data.selected_union_member().expect("selected"), 0);
    assert!(matches!(
        data.get_int32_value(1),
        Err(IntrospectError::NoSuchMember(1))
    ));

    let plain = DynamicData::new(&vector3_type()).expect("new");
    assert!(matches!(
        plain.selected_union_member(),
        Err(IntrospectError::UnsupportedKind(TypeKind::TK_STRUCTURE))
    ));
}

#[test]
fn test_enum_member_defaults_to_first_enumerator() {
    let color = Arc::new(
        EnumBuilder::new("Color")
            .variant_value("RED", 3)
            .variant("GREEN")
            .build(),
    );
    let desc = Arc::new(
        TypeDescriptorBuilder::new("Pixel")
            .field_with_type("color", color)
            .build(),
    );
    let mut data = DynamicData::new(&desc).expect("new");
    assert_eq!(data.get_int32_value(0).expect("color"), 3);
    data.set_int32_value(0, 4).expect("set");
    assert_eq!(data.get_int32_value(0).expect("color"), 4);
}

#[test]
fn test_bitmask_stored_at_bound_width() {
    let small = Arc::new(BitmaskBuilder::new("Small", 5).flag("A", 0).build());
    let large = Arc::new(BitmaskBuilder::new("Large", 40).flag("B", 39).build());
    let desc = Arc::new(
        TypeDescriptorBuilder::new("Flags")
            .field_with_type("small", small)
            .field_with_type("large", large)
            .build(),
    );
    let mut data = DynamicData::new(&desc).expect("new");
    data.set_uint8_value(0, 0b1).expect("u8 storage");
    data.set_uint64_value(1, 1 << 39).expect("u64 storage");
    assert!(data.set_uint32_value(0, 1).is_err());
}

#[test]
fn test_alias_member_resolved() {
    let meters = Arc::new(TypeDescriptor::alias(
        "Meters",
        Arc::new(TypeDescriptor::primitive(TypeKind::TK_FLOAT32)),
    ));
    let pos = Arc::new(TypeDescriptor::alias("PoseAlias", pose_type()));
    let desc = Arc::new(
        TypeDescriptorBuilder::new("Measured")
            .field_with_type("distance", meters)
            .field_with_type("pose", pos)
            .build(),
    );
    let mut data = DynamicData::new(&desc).expect("new");
    data.set_float32_value(0, 1.5).expect("alias of float");

    let pose = data.loan_value(1).expect("loan");
    assert_eq!(pose.enclosing_type().kind, TypeKind::TK_STRUCTURE);
    assert_eq!(pose.type_name(), "Pose");
}

#[test]
fn test_wide_text_members() {
    let desc = Arc::new(
        TypeDescriptorBuilder::new("Text")
            .field_with_type("w", Arc::new(TypeDescriptor::wstring(None)))
            .field("c", TypeKind::TK_CHAR16)
            .build(),
    );
    let mut data = DynamicData::new(&desc).expect("new");
    data.set_wstring_value(0, "héllo").expect("wstring");
    data.set_char16_value(1, 0x00E9).expect("wchar");

    let units = data.get_wstring_value(0).expect("get");
    assert_eq!(String::from_utf16_lossy(&units), "héllo");
    assert_eq!(data.get_char16_value(1).expect("get"), 0x00E9);
}

#[test]
fn test_primitive_root_rejected() {
    let long = Arc::new(TypeDescriptor::primitive(TypeKind::TK_INT32));
    assert!(matches!(
        DynamicData::new(&long),
        Err(IntrospectError::UnsupportedKind(TypeKind::TK_INT32))
    ));
}

#[test]
fn test_unbounded_recursion_stops() {
    let alias = Arc::new(TypeDescriptor::forward_alias("NodeRef"));
    let node = Arc::new(
        TypeDescriptorBuilder::new("Node")
            .field_with_type("next", alias.clone())
            .build(),
    );
    alias.bind_alias_target(node.clone()).expect("bind");

    assert!(matches!(
        DynamicData::new(&node),
        Err(IntrospectError::BrokenTypeGraph(_))
    ));
}

#[test]
fn test_recursion_through_sequence_is_finite() {
    let alias = Arc::new(TypeDescriptor::forward_alias("TreeRef"));
    let tree = Arc::new(
        TypeDescriptorBuilder::new("Tree")
            .field("value", TypeKind::TK_INT32)
            .field_with_type("children", Arc::new(TypeDescriptor::sequence(alias.clone(), 0)))
            .build(),
    );
    alias.bind_alias_target(tree.clone()).expect("bind");

    let mut root = DynamicData::new(&tree).expect("new");
    let mut leaf = DynamicData::new(&tree).expect("leaf");
    leaf.set_int32_value(0, 5).expect("value");
    root.complex_value_mut(1)
        .expect("children")
        .set_complex_value(0, leaf)
        .expect("append child");

    let children = root.loan_value(1).expect("loan");
    assert_eq!(children.item_count(), 1);
}

#[test]
fn test_dynamic_data_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DynamicData>();
    assert_send_sync::<TypeDescriptor>();
}
