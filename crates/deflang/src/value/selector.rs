// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Paths into nested values.
//!
//! A [`ValueSelector`] is a list of steps: member name (structs), index
//! (arrays) or variant alternative. Set optionals are stepped through
//! transparently. The textual form is `member.member[index]`; variant steps
//! print as `<Type>` and have no parsed form.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::types::{Kind, TypeRef};

use super::payload::Payload;
use super::{Value, ValueMut};

/// One step of a [`ValueSelector`].
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorStep {
    Member(String),
    Index(usize),
    /// The active alternative of a variant, which must be of this type.
    VariantAs(TypeRef),
}

/// Path from a value to one of its descendants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSelector {
    steps: Vec<SelectorStep>,
}

impl ValueSelector {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn member(mut self, name: impl Into<String>) -> Self {
        self.steps.push(SelectorStep::Member(name.into()));
        self
    }

    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.steps.push(SelectorStep::Index(index));
        self
    }

    #[must_use]
    pub fn variant_as(mut self, ty: &TypeRef) -> Self {
        self.steps.push(SelectorStep::VariantAs(ty.clone()));
        self
    }

    pub fn push(&mut self, step: SelectorStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[SelectorStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Parse `a.b[2].c`.
    pub fn parse(text: &str) -> Result<Self> {
        let bad = |reason: &str| Error::data(text, format!("invalid selector: {}", reason));
        let mut selector = Self::new();
        let mut rest = text.trim();

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('[') {
                let end = after.find(']').ok_or_else(|| bad("missing ']'"))?;
                let index = after[..end]
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| bad("index is not an unsigned integer"))?;
                selector.steps.push(SelectorStep::Index(index));
                rest = &after[end + 1..];
            } else {
                let body = if selector.steps.is_empty() {
                    rest
                } else {
                    rest.strip_prefix('.').ok_or_else(|| bad("expected '.' or '['"))?
                };
                let end = body.find(['.', '[']).unwrap_or(body.len());
                let name = body[..end].trim();
                if name.is_empty() {
                    return Err(bad("empty member name"));
                }
                selector.steps.push(SelectorStep::Member(name.to_string()));
                rest = &body[end..];
            }
        }
        Ok(selector)
    }
}

impl FromStr for ValueSelector {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Self::parse(text)
    }
}

impl fmt::Display for ValueSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                SelectorStep::Member(name) if i == 0 => write!(f, "{}", name)?,
                SelectorStep::Member(name) => write!(f, ".{}", name)?,
                SelectorStep::Index(index) => write!(f, "[{}]", index)?,
                SelectorStep::VariantAs(ty) => write!(f, "<{}>", ty.qualified_path())?,
            }
        }
        Ok(())
    }
}

impl<const N: usize> From<[&str; N]> for ValueSelector {
    fn from(members: [&str; N]) -> Self {
        Self {
            steps: members
                .iter()
                .map(|m| SelectorStep::Member((*m).to_string()))
                .collect(),
        }
    }
}

impl From<Vec<SelectorStep>> for ValueSelector {
    fn from(steps: Vec<SelectorStep>) -> Self {
        Self { steps }
    }
}

fn mismatch(value: &Value, step: &SelectorStep, reason: impl fmt::Display) -> Error {
    Error::data(
        value.value_type().qualified_path(),
        format!("cannot select {:?}: {}", step, reason),
    )
}

fn step<'a>(value: &'a Value, step: &SelectorStep) -> Result<&'a Value> {
    match (value.constructed_payload()?, step) {
        (Payload::Optional(Some(inner)), _) => self::step(inner, step),
        (Payload::Optional(None), _) => Err(mismatch(value, step, "optional is empty")),
        (Payload::Struct(members), SelectorStep::Member(name)) => value
            .value_type()
            .find_member_def_idx_by_name(name)
            .and_then(|idx| members.get(idx))
            .ok_or_else(|| mismatch(value, step, format!("no member '{}'", name))),
        (Payload::Array(elements), SelectorStep::Index(index)) => elements
            .get(*index)
            .ok_or_else(|| mismatch(value, step, format!("length is {}", elements.len()))),
        (Payload::Variant(_, inner), SelectorStep::VariantAs(ty)) => {
            if inner.value_type().is_compatible(ty) {
                Ok(&**inner)
            } else {
                Err(mismatch(
                    value,
                    step,
                    format!("active alternative is '{}'", inner.value_type().qualified_path()),
                ))
            }
        }
        _ => Err(mismatch(value, step, format!("value is a {}", value.kind()))),
    }
}

fn step_mut<'a>(value: &'a mut Value, step: &SelectorStep) -> Result<&'a mut Value> {
    // Validated on the shared path; the mutable walk below cannot fail.
    self::step(value, step)?;

    let Value { ty, payload, .. } = value;
    let unreachable = || Error::data(ty.qualified_path(), "selection changed while stepping");
    match (payload, step) {
        (Some(Payload::Optional(Some(inner))), _) => step_mut(inner, step),
        (Some(Payload::Struct(members)), SelectorStep::Member(name)) => ty
            .find_member_def_idx_by_name(name)
            .and_then(|idx| members.get_mut(idx))
            .ok_or_else(unreachable),
        (Some(Payload::Array(elements)), SelectorStep::Index(index)) => {
            elements.get_mut(*index).ok_or_else(unreachable)
        }
        (Some(Payload::Variant(_, inner)), SelectorStep::VariantAs(_)) => Ok(&mut **inner),
        _ => Err(unreachable()),
    }
}

impl Value {
    /// Descendant addressed by `selector` (`self` for an empty selector).
    pub fn select(&self, selector: &ValueSelector) -> Result<&Value> {
        let mut current = self;
        for s in selector.steps() {
            current = step(current, s)?;
        }
        Ok(current)
    }

    /// Mutable descendant addressed by `selector`.
    ///
    /// Mutations through the returned handle notify the descendant's
    /// observers and those of every value on the path.
    pub fn select_mut(&mut self, selector: &ValueSelector) -> Result<ValueMut<'_>> {
        self.select_slot(selector).map(ValueMut::new)
    }

    fn select_slot(&mut self, selector: &ValueSelector) -> Result<&mut Value> {
        let mut current = self;
        for s in selector.steps() {
            current = step_mut(current, s)?;
        }
        Ok(current)
    }

    /// Like [`Value::select`], also checking the kind of the result.
    pub fn select_kind(&self, selector: &ValueSelector, kind: Kind) -> Result<&Value> {
        let found = self.select(selector)?;
        check_kind(found, selector, kind)?;
        Ok(found)
    }

    /// Like [`Value::select_mut`], also checking the kind of the result.
    pub fn select_kind_mut(&mut self, selector: &ValueSelector, kind: Kind) -> Result<ValueMut<'_>> {
        let found = self.select_slot(selector)?;
        check_kind(found, selector, kind)?;
        Ok(ValueMut::new(found))
    }
}

fn check_kind(found: &Value, selector: &ValueSelector, kind: Kind) -> Result<()> {
    if found.kind() == kind {
        Ok(())
    } else {
        Err(Error::data(
            found.value_type().qualified_path(),
            format!("'{}' selects a {}, expected a {}", selector, found.kind(), kind),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let sel = ValueSelector::parse("gps.fixes[2].lat").expect("parse");
        assert_eq!(
            sel.steps(),
            [
                SelectorStep::Member("gps".into()),
                SelectorStep::Member("fixes".into()),
                SelectorStep::Index(2),
                SelectorStep::Member("lat".into()),
            ]
        );
        assert_eq!(sel.to_string(), "gps.fixes[2].lat");
        assert_eq!("[0][1]".parse::<ValueSelector>().expect("indices").steps().len(), 2);
        assert_eq!(ValueSelector::from(["a", "b"]).to_string(), "a.b");
        assert!(ValueSelector::parse("").expect("empty").is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert!(ValueSelector::parse("a..b").is_err());
        assert!(ValueSelector::parse("a[x]").is_err());
        assert!(ValueSelector::parse("a[1").is_err());
        assert!(ValueSelector::parse("a[1]b").is_err());
        assert!(ValueSelector::parse(".a").is_err());
    }
}
