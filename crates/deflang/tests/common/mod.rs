// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared schema for integration tests.
//!
//! ```text
//! nav::Mode      enum { IDLE ("Idle"), ARMED, FLYING }, default IDLE
//! nav::Point     struct { x: int32, y: int32 }
//! nav::Fix       struct { position: vec3d, quality: uint8 [0, 5], label: string = "gps" }
//! nav::Track     array<nav::Fix>
//! nav::MaybeFix  optional<nav::Fix>
//! nav::Reading   variant<float, string, nav::Mode>
//! nav::Telemetry struct { mode: Mode, track: Track, last: MaybeFix, reading: Reading }
//! ```

#![allow(dead_code)]

use deflang::config::{ATTR_MAX, ATTR_MIN};
use deflang::{
    Attribute, EnumItem, InitializerList, MemberDef, Namespace, ScopeId, Type, TypeRef,
};

pub struct Schema {
    pub ns: Namespace,
    pub nav: ScopeId,
    pub int32: TypeRef,
    pub float: TypeRef,
    pub string: TypeRef,
    pub mode: TypeRef,
    pub point: TypeRef,
    pub fix: TypeRef,
    pub track: TypeRef,
    pub maybe_fix: TypeRef,
    pub reading: TypeRef,
    pub telemetry: TypeRef,
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn builtin(ns: &Namespace, name: &str) -> TypeRef {
    ns.find_type(name).expect("builtin type")
}

pub fn schema() -> Schema {
    init_logging();
    let mut ns = Namespace::with_builtins();
    let nav = ns.add_scope(Namespace::ROOT, "nav").expect("nav scope");

    let int32 = builtin(&ns, "int32");
    let uint8 = builtin(&ns, "uint8");
    let float = builtin(&ns, "float");
    let string = builtin(&ns, "string");
    let vec3d = builtin(&ns, "vec3d");

    let mut mode = Type::enumeration("Mode");
    mode.add_item(EnumItem::new("IDLE", 0).with_ui_name("Idle"))
        .expect("IDLE");
    mode.add_item(EnumItem::new("ARMED", 1)).expect("ARMED");
    mode.add_item(EnumItem::new("FLYING", 2)).expect("FLYING");
    mode.set_default_item("IDLE").expect("default item");
    let mode = ns.add_type(nav, mode).expect("Mode");

    let mut point = Type::structure("Point");
    point.add_member_def(MemberDef::new("x", &int32)).expect("x");
    point.add_member_def(MemberDef::new("y", &int32)).expect("y");
    let point = ns.add_type(nav, point).expect("Point");

    let mut quality = uint8.clone_named("Quality");
    quality
        .add_attribute(Attribute::literal(ATTR_MIN, 0))
        .expect("min");
    quality
        .add_attribute(Attribute::literal(ATTR_MAX, 5))
        .expect("max");
    let quality = ns.add_type(nav, quality).expect("Quality");

    let mut label = string.create_value();
    label
        .construct(&InitializerList::single("gps"))
        .expect("label default");

    let mut fix = Type::structure("Fix");
    fix.add_member_def(MemberDef::new("position", &vec3d))
        .expect("position");
    fix.add_member_def(MemberDef::new("quality", &quality))
        .expect("quality");
    fix.add_member_def(MemberDef::with_default("label", &string, label).expect("label"))
        .expect("label");
    let fix = ns.add_type(nav, fix).expect("Fix");

    let mut track = Type::array("Track");
    track.init(&[(&fix).into()]).expect("Track<Fix>");
    let track = ns.add_type(nav, track).expect("Track");

    let mut maybe_fix = Type::optional("MaybeFix");
    maybe_fix.init(&[(&fix).into()]).expect("MaybeFix<Fix>");
    let maybe_fix = ns.add_type(nav, maybe_fix).expect("MaybeFix");

    let mut reading = Type::variant("Reading");
    reading
        .init(&[(&float).into(), (&string).into(), (&mode).into()])
        .expect("Reading<float, string, Mode>");
    let reading = ns.add_type(nav, reading).expect("Reading");

    let mut telemetry = Type::structure("Telemetry");
    telemetry
        .add_member_def(MemberDef::new("mode", &mode))
        .expect("mode");
    telemetry
        .add_member_def(MemberDef::new("track", &track))
        .expect("track");
    telemetry
        .add_member_def(MemberDef::new("last", &maybe_fix))
        .expect("last");
    telemetry
        .add_member_def(MemberDef::new("reading", &reading))
        .expect("reading");
    let telemetry = ns.add_type(nav, telemetry).expect("Telemetry");

    Schema {
        ns,
        nav,
        int32,
        float,
        string,
        mode,
        point,
        fix,
        track,
        maybe_fix,
        reading,
        telemetry,
    }
}

/// Default-constructed value of `ty`.
pub fn default_value(ty: &TypeRef) -> deflang::Value {
    let mut v = ty.create_value();
    v.construct_default().expect("default construct");
    v
}
