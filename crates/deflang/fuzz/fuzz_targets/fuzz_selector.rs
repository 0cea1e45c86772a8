// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use deflang::ValueSelector;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(selector) = ValueSelector::parse(text) {
            // Display output parses back to the same steps.
            let shown = selector.to_string();
            let again = ValueSelector::parse(&shown).expect("re-parse");
            assert_eq!(again, selector);
        }
    }
});
