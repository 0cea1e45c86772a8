// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Type definition, template instantiation and namespace registration.

mod common;

use common::{default_value, schema};
use deflang::config::{ATTR_MAX, ATTR_MIN, ATTR_NATIVE_TYPE, ATTR_UI_NAME};
use deflang::{
    Attribute, EnumItem, ErrorClass, InitializerList, Kind, Literal, MemberDef, Namespace,
    SymbolPath, TemplateArgument, Type, TypeKind,
};

#[test]
fn test_builtins() {
    let ns = Namespace::with_builtins();
    for name in ["bool", "string", "int8", "uint64", "float", "double", "vec2s16", "vec4u8", "vec3f", "vec4d"] {
        assert!(ns.find_type(name).is_some(), "{}", name);
    }
    assert_eq!(ns.type_count(), 2 + 4 * 10);

    let vec3f = ns.find_type("vec3f").expect("vec3f");
    assert_eq!(vec3f.tag(), Kind::Real);
    assert_eq!(vec3f.components(), Some(3));
    assert!(ns.find_type("vec5f").is_none());
}

#[test]
fn test_scopes_and_resolution() {
    let mut s = schema();
    let inner = s.ns.add_scope(s.nav, "sensors").expect("scope");
    assert_eq!(
        s.ns.scope_path(inner).expect("path").to_string(),
        "nav::sensors"
    );
    assert_eq!(s.ns.scope_parent(inner), Some(s.nav));

    // Lookup walks outward from the scope.
    let point = s.ns.resolve_type(inner, "Point").expect("outer type");
    assert_eq!(point, s.point);
    assert!(s.ns.resolve_type(inner, "int32").is_some());
    assert!(s.ns.resolve_type(inner, "nav::Mode").is_some());
    assert!(s.ns.resolve_type(Namespace::ROOT, "Point").is_none());
    assert_eq!(
        s.ns.find_type(SymbolPath::parse("nav::Fix")).expect("Fix"),
        s.fix
    );

    // Names are unique within a scope, scopes and types alike.
    let err = s.ns.add_type(s.nav, Type::structure("Point")).expect_err("duplicate");
    assert_eq!(err.class(), ErrorClass::Schema);
    assert!(s.ns.add_type(s.nav, Type::structure("sensors")).is_err());
    assert!(s.ns.add_type(inner, Type::structure("Point")).is_ok());

    let names: Vec<String> = s.ns.scope_types(inner).map(|t| t.name().to_string()).collect();
    assert_eq!(names, ["Point"]);
}

#[test]
fn test_registered_types_get_ids_and_paths() {
    let s = schema();
    let id = s.fix.id().expect("id");
    assert_eq!(s.ns.type_by_id(id).expect("by id"), &s.fix);
    assert_eq!(s.fix.qualified_path().to_string(), "nav::Fix");
    assert_eq!(
        s.fix.member_def(1).expect("quality").qualified_path().to_string(),
        "nav::Fix::quality"
    );
}

#[test]
fn test_invalid_names() {
    let mut ns = Namespace::new();
    for name in ["", "a::b", "a.b", "x[0]", "two words"] {
        assert!(ns.add_type(Namespace::ROOT, Type::bool(name)).is_err(), "{:?}", name);
    }
    assert!(ns.add_scope(Namespace::ROOT, "a b").is_err());
}

#[test]
fn test_template_instantiation_rules() {
    let s = schema();

    let mut opt = Type::optional("Opt");
    assert!(opt.init(&[]).is_err());
    assert!(opt.init(&[(&s.int32).into(), (&s.float).into()]).is_err());
    assert!(opt.init(&[TemplateArgument::from(Literal::Int(3))]).is_err());
    opt.init(&[(&s.int32).into()]).expect("init");
    assert!(opt.init(&[(&s.int32).into()]).is_err());
    assert_eq!(opt.inner_type_count(), 1);

    let mut var = Type::variant("Var");
    assert!(var.init(&[(&s.int32).into()]).is_err());
    assert!(var.init(&[(&s.int32).into(), (&s.int32).into()]).is_err());
    var.init(&[(&s.int32).into(), (&s.string).into()]).expect("init");
    assert_eq!(var.find_inner_type_idx(&s.string), Some(1));

    let mut plain = Type::structure("Plain");
    assert!(plain.init(&[(&s.int32).into()]).is_err());

    let mut ns = Namespace::with_builtins();
    let err = ns
        .add_type(Namespace::ROOT, Type::array("Unbound"))
        .expect_err("uninstantiated template");
    assert_eq!(err.class(), ErrorClass::Schema);
}

#[test]
fn test_struct_definition_rules() {
    let s = schema();

    let mut clash = Type::structure("Clash");
    clash.add_member_def(MemberDef::new("x", &s.int32)).expect("x");
    assert!(clash.add_member_def(MemberDef::new("x", &s.float)).is_err());
    assert!(clash.set_base(&s.point).is_err());
    assert_eq!(clash.member_def_count(), 1);

    let mut derived = Type::structure("Derived");
    assert!(derived.set_base(&s.int32).is_err());
    derived.set_base(&s.point).expect("base");
    assert!(derived.set_base(&s.point).is_err());
    assert!(derived.add_member_def(MemberDef::new("y", &s.int32)).is_err());
    derived.add_member_def(MemberDef::new("z", &s.int32)).expect("z");
    assert_eq!(derived.member_def_count(), 3);
    assert_eq!(derived.find_member_def_idx_by_name("z"), Some(2));

    let unconstructed = s.int32.create_value();
    assert!(MemberDef::with_default("w", &s.int32, unconstructed).is_err());
    let wrong = default_value(&s.float);
    assert!(MemberDef::with_default("w", &s.int32, wrong).is_err());
}

#[test]
fn test_enum_definition_rules() {
    let mut e = Type::enumeration("Level");
    assert!(e.set_default_item("LOW").is_err());
    e.add_item(EnumItem::new("LOW", 0)).expect("LOW");
    assert!(e.add_item(EnumItem::new("LOW", 1)).is_err());
    e.add_item(EnumItem::new("HIGH", 10).with_ui_name("High"))
        .expect("HIGH");
    let e = e.seal().expect("seal");

    // Without a default item the enum cannot be default-constructed.
    let mut v = e.create_value();
    assert_eq!(
        v.construct_default().expect_err("no default").class(),
        ErrorClass::Data
    );
    v.construct(&InitializerList::single(e.enum_item("HIGH").expect("HIGH")))
        .expect("construct");
    assert_eq!(v.enum_item().expect("item").item().expect("def").value(), 10);

    assert!(Type::enumeration("Empty").seal().is_err());
}

#[test]
fn test_attributes() {
    let s = schema();
    let mut angle = s.float.clone_named("Angle");
    angle
        .add_attribute(Attribute::literal(ATTR_UI_NAME, "Heading angle"))
        .expect("ui name");
    angle
        .add_attribute(Attribute::literal(ATTR_NATIVE_TYPE, "f32"))
        .expect("native type");
    angle.add_attribute(Attribute::literal(ATTR_MIN, -180.0)).expect("min");
    assert!(angle.add_attribute(Attribute::literal(ATTR_MAX, -200.0)).is_err());
    angle.add_attribute(Attribute::literal(ATTR_MAX, 180.0)).expect("max");
    assert!(angle.add_attribute(Attribute::literal(ATTR_MAX, 90.0)).is_err());
    assert!(s
        .mode
        .clone_named("M")
        .add_attribute(Attribute::literal(ATTR_MIN, 0))
        .is_err());

    assert_eq!(angle.ui_name(), "Heading angle");
    assert_eq!(angle.native_type().as_deref(), Some("f32"));
    assert_eq!(angle.real_range(), Some((-180.0, 180.0)));

    let angle = angle.seal().expect("seal");
    let alias = angle.alias("Bearing").seal().expect("alias");
    assert!(alias.native_type().is_none());
    assert_eq!(alias.aliased_type(), Some(&angle));

    let mut v = default_value(&alias);
    assert!(v.set(181.0).is_err());
    v.set(-180).expect("integer literal into real");
    assert_eq!(v.as_real().expect("real"), -180.0);
}

#[test]
fn test_alias_is_sealed_structurally() {
    let s = schema();
    let mut alias = s.point.alias("PointAlias");
    assert!(alias.add_member_def(MemberDef::new("z", &s.int32)).is_err());
    assert!(matches!(alias.kind(), TypeKind::Struct(_)));
    assert_eq!(alias.member_def_count(), 2);
    assert!(alias.seal().expect("seal").is_compatible(&s.point));
}
