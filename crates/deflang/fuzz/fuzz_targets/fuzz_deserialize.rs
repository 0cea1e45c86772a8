// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use deflang::{EnumItem, InitializerList, MemberDef, Namespace, Type, TypeRef};
use libfuzzer_sys::fuzz_target;

fn telemetry() -> TypeRef {
    let mut ns = Namespace::with_builtins();
    let find = |name: &str| ns.find_type(name).expect("builtin");
    let (uint8, vec3d, float, string) = (find("uint8"), find("vec3d"), find("float"), find("string"));

    let mut mode = Type::enumeration("Mode");
    mode.add_item(EnumItem::new("IDLE", 0)).expect("IDLE");
    mode.add_item(EnumItem::new("ARMED", 1)).expect("ARMED");
    mode.set_default_item("IDLE").expect("default");
    let mode = ns.add_type(Namespace::ROOT, mode).expect("Mode");

    let mut fix = Type::structure("Fix");
    fix.add_member_def(MemberDef::new("position", &vec3d)).expect("position");
    fix.add_member_def(MemberDef::new("quality", &uint8)).expect("quality");
    let fix = ns.add_type(Namespace::ROOT, fix).expect("Fix");

    let mut track = Type::array("Track");
    track.init(&[(&fix).into()]).expect("Track");
    let track = ns.add_type(Namespace::ROOT, track).expect("Track");

    let mut last = Type::optional("MaybeFix");
    last.init(&[(&fix).into()]).expect("MaybeFix");
    let last = ns.add_type(Namespace::ROOT, last).expect("MaybeFix");

    let mut reading = Type::variant("Reading");
    reading
        .init(&[(&float).into(), (&string).into(), (&mode).into()])
        .expect("Reading");
    let reading = ns.add_type(Namespace::ROOT, reading).expect("Reading");

    let mut telemetry = Type::structure("Telemetry");
    telemetry.add_member_def(MemberDef::new("mode", &mode)).expect("mode");
    telemetry.add_member_def(MemberDef::new("track", &track)).expect("track");
    telemetry.add_member_def(MemberDef::new("last", &last)).expect("last");
    telemetry.add_member_def(MemberDef::new("reading", &reading)).expect("reading");
    ns.add_type(Namespace::ROOT, telemetry).expect("Telemetry")
}

fuzz_target!(|data: &[u8]| {
    let Ok(doc) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    let ty = telemetry();
    let mut value = ty.create_value();
    value.construct(&InitializerList::new()).expect("construct");
    let before = value.serialize().expect("serialize");

    match value.deserialize(&doc) {
        // Accepted documents must re-encode to something that decodes to an equal value.
        Ok(()) => {
            let encoded = value.serialize().expect("serialize");
            let mut again = ty.create_value();
            again.construct(&InitializerList::new()).expect("construct");
            again.deserialize(&encoded).expect("re-decode");
            assert!(again.is_equal(&value).expect("equal"));
        }
        Err(_) => assert_eq!(value.serialize().expect("serialize"), before),
    }
});
