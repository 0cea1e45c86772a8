// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types shared by the schema builder and the value protocol.
//!
//! Three classes of failure exist:
//!
//! - **schema**: raised while defining types, members and attributes
//! - **state**: value protocol misuse (a caller bug, see [`ContractPolicy`])
//! - **data**: bad initializers, incompatible operands, malformed documents
//!
//! Every error names the qualified path of the offending symbol.
//!
//! [`ContractPolicy`]: crate::config::ContractPolicy

use std::fmt;

use crate::config::{self, ContractPolicy};

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Definition-time failure; the object being built is unchanged.
    Schema,
    /// Protocol misuse by the caller.
    State,
    /// Recoverable failure caused by external data or operands.
    Data,
}

/// Protocol rule broken by a state error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateViolation {
    /// The value is not constructed yet.
    Unconstructed,
    /// The value was constructed already.
    AlreadyConstructed,
    /// The other operand is not constructed.
    UnconstructedOperand,
}

impl fmt::Display for StateViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconstructed => write!(f, "value is not constructed"),
            Self::AlreadyConstructed => write!(f, "value is already constructed"),
            Self::UnconstructedOperand => write!(f, "operand value is not constructed"),
        }
    }
}

/// Engine error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Invalid schema definition.
    #[error("schema error in '{symbol}': {reason}")]
    Schema { symbol: String, reason: String },

    /// Operation invoked in the wrong construction state.
    #[error("contract violation on '{symbol}': {violation}")]
    State {
        symbol: String,
        violation: StateViolation,
    },

    /// Operand or initializer of an incompatible type.
    #[error("cannot initialize a '{expected}' with a '{found}'")]
    Incompatible { expected: String, found: String },

    /// Malformed initializer, document or selection.
    #[error("'{symbol}': {reason}")]
    Data { symbol: String, reason: String },

    /// Operation not available for this kind of value.
    #[error("'{symbol}' does not support {operation}")]
    NotSupported {
        symbol: String,
        operation: &'static str,
    },
}

impl Error {
    pub(crate) fn schema(symbol: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::Schema {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn data(symbol: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::Data {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn incompatible(expected: impl fmt::Display, found: impl fmt::Display) -> Self {
        Self::Incompatible {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub(crate) fn not_supported(symbol: impl fmt::Display, operation: &'static str) -> Self {
        Self::NotSupported {
            symbol: symbol.to_string(),
            operation,
        }
    }

    /// Report a protocol violation.
    ///
    /// Always logged; panics when the contract policy is [`ContractPolicy::Panic`].
    pub(crate) fn violation(symbol: impl fmt::Display, violation: StateViolation) -> Self {
        let err = Self::State {
            symbol: symbol.to_string(),
            violation,
        };
        log::error!("[deflang] {}", err);
        if config::contract_policy() == ContractPolicy::Panic {
            panic!("{}", err);
        }
        err
    }

    /// Attach the member an error was raised under.
    pub(crate) fn in_member(self, member: impl fmt::Display) -> Self {
        match self {
            Self::Data { symbol, reason } => Self::Data {
                symbol,
                reason: format!("{} (in member '{}')", reason, member),
            },
            other => other,
        }
    }

    /// Classify the error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Schema { .. } => ErrorClass::Schema,
            Self::State { .. } => ErrorClass::State,
            Self::Incompatible { .. } | Self::Data { .. } | Self::NotSupported { .. } => {
                ErrorClass::Data
            }
        }
    }

    /// True for type-incompatibility errors.
    pub fn is_incompatible(&self) -> bool {
        matches!(self, Self::Incompatible { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert_eq!(Error::schema("a", "x").class(), ErrorClass::Schema);
        assert_eq!(Error::data("a", "x").class(), ErrorClass::Data);
        assert_eq!(Error::incompatible("a", "b").class(), ErrorClass::Data);
        assert_eq!(Error::not_supported("a", "x").class(), ErrorClass::Data);
    }

    #[test]
    fn test_display_names_symbol() {
        let err = Error::data("sensors::Imu", "bad document");
        assert_eq!(err.to_string(), "'sensors::Imu': bad document");

        let err = Error::incompatible("Color", "Shape::CIRCLE");
        assert_eq!(
            err.to_string(),
            "cannot initialize a 'Color' with a 'Shape::CIRCLE'"
        );
    }

    #[test]
    fn test_member_context_only_on_data_errors() {
        let err = Error::data("int32", "out of range").in_member("Point::x");
        assert_eq!(
            err.to_string(),
            "'int32': out of range (in member 'Point::x')"
        );

        let err = Error::schema("Point", "dup").in_member("Point::x");
        assert_eq!(err, Error::schema("Point", "dup"));
    }

    #[test]
    fn test_violation_report_policy() {
        config::set_contract_policy(ContractPolicy::Report);
        let err = Error::violation("Point", StateViolation::Unconstructed);
        assert_eq!(err.class(), ErrorClass::State);
        assert_eq!(
            err.to_string(),
            "contract violation on 'Point': value is not constructed"
        );
    }
}
