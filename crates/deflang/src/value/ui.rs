// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Single-line UI strings for scalar-like values.
//!
//! | Kind | Form |
//! |------|------|
//! | bool | `true` / `false` |
//! | integral, real | number; vectors as `1, 2, 3` |
//! | string | the string itself |
//! | enum | item UI name (parsing also accepts the item name) |
//!
//! Composite values have no UI string.

use crate::config::UI_LIST_SEPARATOR;
use crate::error::{Error, Result};
use crate::initializer::Literal;
use crate::types::{RealKind, TypeKind};

use super::payload::Payload;
use super::stage;
use super::Value;

const OPERATION: &str = "ui strings";

#[allow(clippy::cast_possible_truncation)]
fn format_real(v: f64, kind: RealKind, decimals: Option<usize>) -> String {
    match (decimals, kind) {
        (Some(d), _) => format!("{:.*}", d, v),
        (None, RealKind::F32) => (v as f32).to_string(),
        (None, RealKind::F64) => v.to_string(),
    }
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts
        .collect::<Vec<_>>()
        .join(&format!("{} ", UI_LIST_SEPARATOR))
}

impl Value {
    /// Render the value as a UI string.
    pub fn get_ui_string(&self) -> Result<String> {
        let ty = self.value_type();
        match (self.constructed_payload()?, ty.kind()) {
            (Payload::Bool(v), _) => Ok(v.to_string()),
            (Payload::Int(v), _) => Ok(join(v.iter().map(ToString::to_string))),
            (Payload::Real(v), TypeKind::Real { kind, .. }) => {
                let decimals = ty.decimals();
                Ok(join(v.iter().map(|x| format_real(*x, *kind, decimals))))
            }
            (Payload::String(v), _) => Ok(v.clone()),
            (Payload::Enum(index), TypeKind::Enum(def)) => def
                .item(*index)
                .map(|item| item.ui_name().to_string())
                .ok_or_else(|| Error::data(ty.qualified_path(), "enum item index out of range")),
            _ => Err(Error::not_supported(ty.qualified_path(), OPERATION)),
        }
    }

    /// Assign the value from a UI string. Notifies once if the value changed.
    pub fn parse_from_ui_string(&mut self, text: &str) -> Result<()> {
        self.constructed_payload()?;
        let ty = self.value_type();
        let path = ty.qualified_path();

        let staged = match ty.kind() {
            TypeKind::Bool => match text.trim().to_ascii_lowercase().as_str() {
                "true" => Payload::Bool(true),
                "false" => Payload::Bool(false),
                other => {
                    return Err(Error::data(path, format!("'{}' is not a boolean", other)));
                }
            },
            TypeKind::Integral { components, .. } => {
                let parts = split_components(text, *components, |part| {
                    part.parse::<i128>()
                        .map(Literal::Int)
                        .map_err(|_| Error::data(path, format!("'{}' is not an integer", part)))
                })?;
                stage::from_literal(ty, &parts)?
            }
            TypeKind::Real { components, .. } => {
                let parts = split_components(text, *components, |part| {
                    part.parse::<f64>()
                        .map(Literal::Real)
                        .map_err(|_| Error::data(path, format!("'{}' is not a number", part)))
                })?;
                stage::from_literal(ty, &parts)?
            }
            TypeKind::String => Payload::String(text.to_string()),
            TypeKind::Enum(def) => def
                .find_item_idx_by_any_name(text.trim())
                .map(Payload::Enum)
                .ok_or_else(|| Error::data(path, format!("unknown enum item '{}'", text.trim())))?,
            _ => return Err(Error::not_supported(path, OPERATION)),
        };

        self.apply(staged);
        Ok(())
    }
}

/// Split `text` into `components` literals (a scalar literal when 1).
fn split_components(
    text: &str,
    components: usize,
    parse: impl Fn(&str) -> Result<Literal>,
) -> Result<Literal> {
    let parts = text
        .split(UI_LIST_SEPARATOR)
        .map(|part| parse(part.trim()))
        .collect::<Result<Vec<_>>>()?;
    match parts.len() {
        1 if components == 1 => Ok(parts.into_iter().next().unwrap_or(Literal::Null)),
        _ => Ok(Literal::List(parts)),
    }
}
