// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Named metadata attached to types.
//!
//! Attributes are validated by the owning type (see
//! [`Type::validate_attribute`](crate::Type::validate_attribute)) before they
//! are stored; the container itself only keeps them in declaration order.

use crate::initializer::Literal;
use crate::symbol::SymbolPath;

/// Payload of an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Literal(Literal),
    /// Unquoted reference to a symbol (`native_type = math::vec3f`).
    Symbol(SymbolPath),
}

/// A named attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    name: String,
    value: AttributeValue,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Attribute carrying a literal.
    pub fn literal(name: impl Into<String>, literal: impl Into<Literal>) -> Self {
        Self::new(name, AttributeValue::Literal(literal.into()))
    }

    /// Attribute referencing a symbol.
    pub fn symbol(name: impl Into<String>, path: impl Into<SymbolPath>) -> Self {
        Self::new(name, AttributeValue::Symbol(path.into()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match &self.value {
            AttributeValue::Literal(lit) => Some(lit),
            AttributeValue::Symbol(_) => None,
        }
    }

    /// String payload, when the attribute is a string literal.
    pub fn as_str(&self) -> Option<&str> {
        self.as_literal().and_then(Literal::as_str)
    }
}

/// Ordered set of attributes with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeContainer {
    attributes: Vec<Attribute>,
}

impl AttributeContainer {
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    /// Store an already validated attribute. Fails on duplicate names.
    pub(crate) fn insert(&mut self, attribute: Attribute) -> Result<(), String> {
        if self.contains(&attribute.name) {
            return Err(format!("attribute '{}' is already set", attribute.name));
        }
        self.attributes.push(attribute);
        Ok(())
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Attribute> {
        let idx = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_payloads() {
        let ui = Attribute::literal("ui_name", "Rate");
        assert_eq!(ui.name(), "ui_name");
        assert_eq!(ui.as_str(), Some("Rate"));

        let native = Attribute::symbol("native_type", "math::vec3f");
        assert_eq!(native.as_literal(), None);
        assert_eq!(
            native.value(),
            &AttributeValue::Symbol(SymbolPath::parse("math::vec3f"))
        );
    }

    #[test]
    fn test_container_unique_names() {
        let mut attrs = AttributeContainer::default();
        attrs.insert(Attribute::literal("min", 0)).expect("insert min");
        assert!(attrs.insert(Attribute::literal("min", 1)).is_err());
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("min").and_then(Attribute::as_literal), Some(&Literal::Int(0)));

        assert!(attrs.remove("min").is_some());
        assert!(attrs.is_empty());
    }
}
