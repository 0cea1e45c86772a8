// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use deflang::{InitializerList, Namespace};
use libfuzzer_sys::fuzz_target;

const TYPES: [&str; 6] = ["bool", "int8", "uint64", "vec3s16", "vec2f", "string"];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };

    let ns = Namespace::with_builtins();
    let name = TYPES[usize::from(selector) % TYPES.len()];
    let mut value = ns.find_type(name).expect("builtin").create_value();
    value.construct(&InitializerList::new()).expect("construct");

    if value.parse_from_ui_string(text).is_ok() {
        let shown = value.get_ui_string().expect("ui string");
        let before = value.try_clone().expect("clone");
        value.parse_from_ui_string(&shown).expect("re-parse");
        assert!(value.is_equal(&before).expect("equal"));
    }
});
