// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Engine configuration - single source of truth for names and policies.
//!
//! # Architecture
//!
//! - **Static**: compile-time constants (separators, attribute vocabulary,
//!   document keys, built-in type names)
//! - **Dynamic**: the process-wide [`ContractPolicy`], swapped atomically
//!
//! # Example
//!
//! ```
//! use deflang::config::{self, ContractPolicy};
//!
//! // Hosts that prefer errors over panics in debug builds:
//! config::set_contract_policy(ContractPolicy::Report);
//! assert_eq!(config::contract_policy(), ContractPolicy::Report);
//! ```

use std::sync::atomic::{AtomicU8, Ordering};

// =======================================================================
// Symbols
// =======================================================================

/// Separator between segments of a qualified symbol path (`ns::Type::member`).
pub const PATH_SEPARATOR: &str = "::";

/// Characters that may not appear in a symbol name.
///
/// `:` would clash with [`PATH_SEPARATOR`]; `.`, `[` and `]` are selector syntax.
pub const RESERVED_NAME_CHARS: &[char] = &[':', '.', '[', ']'];

// =======================================================================
// Attribute vocabulary
// =======================================================================

/// Human readable name shown by front-ends. Accepted by every type kind.
pub const ATTR_UI_NAME: &str = "ui_name";

/// Name of the host-side native type a schema type maps to.
pub const ATTR_NATIVE_TYPE: &str = "native_type";

/// Lower bound of numeric types (inclusive).
pub const ATTR_MIN: &str = "min";

/// Upper bound of numeric types (inclusive).
pub const ATTR_MAX: &str = "max";

/// Number of decimals used when rendering real numbers as UI strings.
pub const ATTR_DECIMALS: &str = "decimals";

/// Largest accepted value of the `decimals` attribute.
pub const MAX_DECIMALS: i128 = 17;

// =======================================================================
// Types
// =======================================================================

/// Maximum number of components of a numeric vector type (`vec4*`).
pub const MAX_COMPONENTS: usize = 4;

/// Name of the built-in boolean type.
pub const BUILTIN_BOOL: &str = "bool";

/// Name of the built-in string type.
pub const BUILTIN_STRING: &str = "string";

/// Prefix of the built-in numeric vector types (`vec2s8`, `vec3f`, ...).
pub const BUILTIN_VEC_PREFIX: &str = "vec";

// =======================================================================
// Documents and UI strings
// =======================================================================

/// Key holding the active alternative of a serialized variant.
pub const VARIANT_TYPE_KEY: &str = "type";

/// Key holding the inner value of a serialized variant.
pub const VARIANT_VALUE_KEY: &str = "value";

/// Separator between the components of a numeric vector UI string.
pub const UI_LIST_SEPARATOR: char = ',';

// =======================================================================
// Contract violations
// =======================================================================

/// What the engine does when a caller violates the value protocol
/// (e.g. assigning into an unconstructed value).
///
/// The violation is always logged and always yields an error; the policy only
/// decides whether the process panics first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractPolicy {
    /// Panic after logging. Default in debug builds.
    Panic,
    /// Log and return the error. Default in release builds.
    Report,
}

impl Default for ContractPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Panic
        } else {
            Self::Report
        }
    }
}

const POLICY_UNSET: u8 = 0;
const POLICY_PANIC: u8 = 1;
const POLICY_REPORT: u8 = 2;

static CONTRACT_POLICY: AtomicU8 = AtomicU8::new(POLICY_UNSET);

/// Current contract violation policy.
pub fn contract_policy() -> ContractPolicy {
    match CONTRACT_POLICY.load(Ordering::Relaxed) {
        POLICY_PANIC => ContractPolicy::Panic,
        POLICY_REPORT => ContractPolicy::Report,
        _ => ContractPolicy::default(),
    }
}

/// Replace the process-wide contract violation policy.
pub fn set_contract_policy(policy: ContractPolicy) {
    let raw = match policy {
        ContractPolicy::Panic => POLICY_PANIC,
        ContractPolicy::Report => POLICY_REPORT,
    };
    CONTRACT_POLICY.store(raw, Ordering::Relaxed);
}
