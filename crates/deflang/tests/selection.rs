// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Value selectors and UI strings on nested values.

mod common;

use common::{default_value, schema};
use deflang::{ErrorClass, InitializerList, Kind, SelectorStep, ValueSelector};
use serde_json::json;

fn populated(s: &common::Schema) -> deflang::Value {
    let mut t = default_value(&s.telemetry);
    t.deserialize(&json!({
        "track": [
            {"position": [1.0, 2.0, 3.0], "quality": 1},
            {"position": [4.0, 5.0, 6.0], "quality": 2, "label": "second"},
        ],
        "last": {"position": [7.0, 8.0, 9.0], "quality": 3},
        "reading": {"type": "string", "value": "ok"},
    }))
    .expect("deserialize");
    t
}

#[test]
fn test_select_through_arrays_and_optionals() {
    let s = schema();
    let t = populated(&s);

    let label = t
        .select(&ValueSelector::parse("track[1].label").expect("parse"))
        .expect("select");
    assert_eq!(label.as_str().expect("str"), "second");

    // Set optionals are transparent.
    let quality = t
        .select(&ValueSelector::new().member("last").member("quality"))
        .expect("select");
    assert_eq!(quality.as_int().expect("int"), 3);

    assert!(t.select(&ValueSelector::new()).expect("self").is_equal(&t).expect("equal"));
}

#[test]
fn test_select_variant_alternative() {
    let s = schema();
    let t = populated(&s);

    let text = t
        .select(&ValueSelector::new().member("reading").variant_as(&s.string))
        .expect("string alternative");
    assert_eq!(text.as_str().expect("str"), "ok");

    let err = t
        .select(&ValueSelector::new().member("reading").variant_as(&s.float))
        .expect_err("inactive alternative");
    assert_eq!(err.class(), ErrorClass::Data);
}

#[test]
fn test_select_errors() {
    let s = schema();
    let mut t = populated(&s);

    for text in ["track[2]", "altitude", "mode.x", "track.label", "reading[0]"] {
        let selector = ValueSelector::parse(text).expect("parse");
        let err = t.select(&selector).expect_err(text);
        assert_eq!(err.class(), ErrorClass::Data, "{}", text);
    }

    t.member_by_name_mut("last")
        .expect("last")
        .set(deflang::Literal::Null)
        .expect("clear");
    assert!(t
        .select(&ValueSelector::parse("last.quality").expect("parse"))
        .is_err());
}

#[test]
fn test_selected_member_keeps_its_type() {
    let s = schema();
    let mut p = default_value(&s.point);
    let mut text = s.string.create_value();
    text.construct(&InitializerList::single("oops")).expect("text");
    let x = ValueSelector::from(["x"]);

    let mut selected = p.select_mut(&x).expect("x");
    assert!(selected.copy_assign(&text).expect_err("string into int32").is_incompatible());
    assert!(selected.set("oops").is_err());
    assert!(selected.deserialize(&json!("oops")).is_err());
    selected.set(5).expect("int32");

    assert_eq!(p.select(&x).expect("x").value_type(), &s.int32);
    let doc = p.serialize().expect("serialize");
    assert_eq!(doc, json!({"x": 5, "y": 0}));

    // The parent still round-trips through a fresh value of its type.
    let mut fresh = default_value(&s.point);
    fresh.deserialize(&doc).expect("deserialize");
    assert!(fresh.is_equal(&p).expect("equal"));
}

#[test]
fn test_select_kind() {
    let s = schema();
    let mut t = populated(&s);
    let selector = ValueSelector::parse("track[0].position").expect("parse");

    assert!(t.select_kind(&selector, Kind::Real).is_ok());
    assert!(t.select_kind(&selector, Kind::Integral).is_err());

    t.select_kind_mut(&selector, Kind::Real)
        .expect("select")
        .parse_from_ui_string("0.5, 0.25, 0")
        .expect("parse");
    assert_eq!(
        t.select(&selector).expect("select").get_ui_string().expect("ui"),
        "0.5, 0.25, 0"
    );
}

#[test]
fn test_ui_strings_on_members() {
    let s = schema();
    let mut t = populated(&s);

    let mut mode = t.member_by_name_mut("mode").expect("mode");
    assert_eq!(mode.get_ui_string().expect("ui"), "Idle");
    mode.parse_from_ui_string("FLYING").expect("parse");
    assert_eq!(mode.get_ui_string().expect("ui"), "FLYING");

    let mut quality = t
        .select_mut(&ValueSelector::parse("track[0].quality").expect("parse"))
        .expect("select");
    quality.parse_from_ui_string("5").expect("in range");
    assert!(quality.parse_from_ui_string("6").is_err());
    assert!(quality.parse_from_ui_string("-1").is_err());
    assert_eq!(quality.get_ui_string().expect("ui"), "5");

    let err = t.get_ui_string().expect_err("struct");
    assert_eq!(err.class(), ErrorClass::Data);
}

#[test]
fn test_selector_display_round_trip() {
    let s = schema();
    let selector = ValueSelector::from(vec![
        SelectorStep::Member("track".into()),
        SelectorStep::Index(3),
        SelectorStep::Member("position".into()),
    ]);
    let text = selector.to_string();
    assert_eq!(text, "track[3].position");
    assert_eq!(text.parse::<ValueSelector>().expect("parse"), selector);

    let variant = ValueSelector::new().member("reading").variant_as(&s.mode);
    assert_eq!(variant.to_string(), "reading<nav::Mode>");
}
