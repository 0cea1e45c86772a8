// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Numeric kinds (integral and real scalars and vectors).

use crate::config::BUILTIN_VEC_PREFIX;

/// Integral component kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
}

impl IntKind {
    pub const ALL: [IntKind; 8] = [
        Self::I8,
        Self::U8,
        Self::I16,
        Self::U16,
        Self::I32,
        Self::U32,
        Self::I64,
        Self::U64,
    ];

    /// Inclusive value range.
    // @audit-ok: Simple pattern matching - bounds table
    pub fn bounds(self) -> (i128, i128) {
        match self {
            Self::I8 => (i128::from(i8::MIN), i128::from(i8::MAX)),
            Self::U8 => (0, i128::from(u8::MAX)),
            Self::I16 => (i128::from(i16::MIN), i128::from(i16::MAX)),
            Self::U16 => (0, i128::from(u16::MAX)),
            Self::I32 => (i128::from(i32::MIN), i128::from(i32::MAX)),
            Self::U32 => (0, i128::from(u32::MAX)),
            Self::I64 => (i128::from(i64::MIN), i128::from(i64::MAX)),
            Self::U64 => (0, i128::from(u64::MAX)),
        }
    }

    pub fn contains(self, value: i128) -> bool {
        let (min, max) = self.bounds();
        (min..=max).contains(&value)
    }

    /// Name of the built-in scalar type.
    pub fn name(self) -> &'static str {
        match self {
            Self::I8 => "int8",
            Self::U8 => "uint8",
            Self::I16 => "int16",
            Self::U16 => "uint16",
            Self::I32 => "int32",
            Self::U32 => "uint32",
            Self::I64 => "int64",
            Self::U64 => "uint64",
        }
    }

    /// Suffix used by the built-in vector types (`vec3s16`).
    pub fn vec_suffix(self) -> &'static str {
        match self {
            Self::I8 => "s8",
            Self::U8 => "u8",
            Self::I16 => "s16",
            Self::U16 => "u16",
            Self::I32 => "s32",
            Self::U32 => "u32",
            Self::I64 => "s64",
            Self::U64 => "u64",
        }
    }
}

/// Real component kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RealKind {
    F32,
    F64,
}

impl RealKind {
    pub const ALL: [RealKind; 2] = [Self::F32, Self::F64];

    pub fn name(self) -> &'static str {
        match self {
            Self::F32 => "float",
            Self::F64 => "double",
        }
    }

    pub fn vec_suffix(self) -> &'static str {
        match self {
            Self::F32 => "f",
            Self::F64 => "d",
        }
    }

    /// Round a value to the precision of the kind.
    #[allow(clippy::cast_possible_truncation)]
    pub fn quantize(self, value: f64) -> f64 {
        match self {
            Self::F32 => f64::from(value as f32),
            Self::F64 => value,
        }
    }

    /// Largest finite magnitude.
    pub fn max_magnitude(self) -> f64 {
        match self {
            Self::F32 => f64::from(f32::MAX),
            Self::F64 => f64::MAX,
        }
    }
}

/// Name of a built-in numeric type with `components` components.
pub(crate) fn builtin_name(scalar: &str, suffix: &str, components: usize) -> String {
    if components == 1 {
        scalar.to_string()
    } else {
        format!("{}{}{}", BUILTIN_VEC_PREFIX, components, suffix)
    }
}
