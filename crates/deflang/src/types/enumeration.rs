// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Enumeration items.

use std::fmt;

use crate::symbol::SymbolPath;
use crate::types::{TypeKind, TypeRef};

/// One item of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumItem {
    name: String,
    value: i64,
    ui_name: Option<String>,
}

impl EnumItem {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            ui_name: None,
        }
    }

    /// Set the name shown by front-ends.
    #[must_use]
    pub fn with_ui_name(mut self, ui_name: impl Into<String>) -> Self {
        self.ui_name = Some(ui_name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Integral value of the item.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// UI name, falling back to the item name.
    pub fn ui_name(&self) -> &str {
        self.ui_name.as_deref().unwrap_or(&self.name)
    }
}

/// Items of an enumeration type plus its optional default item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumDef {
    items: Vec<EnumItem>,
    default_item: Option<usize>,
}

impl EnumDef {
    pub(crate) fn add_item(&mut self, item: EnumItem) -> Result<usize, String> {
        if self.find_item_idx(&item.name).is_some() {
            return Err(format!("enum item '{}' is already declared", item.name));
        }
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    pub(crate) fn set_default_item(&mut self, name: &str) -> Result<(), String> {
        let idx = self
            .find_item_idx(name)
            .ok_or_else(|| format!("unknown enum item '{}'", name))?;
        self.default_item = Some(idx);
        Ok(())
    }

    pub fn items(&self) -> &[EnumItem] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn item(&self, index: usize) -> Option<&EnumItem> {
        self.items.get(index)
    }

    pub fn find_item_idx(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|i| i.name == name)
    }

    /// Lookup by name first, then by UI name.
    pub fn find_item_idx_by_any_name(&self, text: &str) -> Option<usize> {
        self.find_item_idx(text)
            .or_else(|| self.items.iter().position(|i| i.ui_name() == text))
    }

    pub fn default_item(&self) -> Option<usize> {
        self.default_item
    }
}

/// Reference to an item of a sealed enumeration type.
///
/// Used as an initializer: a value of enum type `E` only accepts items whose
/// enumeration is `E` (or an alias of it).
#[derive(Clone)]
pub struct EnumItemRef {
    enum_type: TypeRef,
    index: usize,
}

impl EnumItemRef {
    /// Reference the item `name` of `enum_type`.
    pub fn new(enum_type: &TypeRef, name: &str) -> Option<Self> {
        let index = enum_type.enum_def()?.find_item_idx(name)?;
        Some(Self {
            enum_type: enum_type.clone(),
            index,
        })
    }

    pub(crate) fn from_index(enum_type: &TypeRef, index: usize) -> Self {
        Self {
            enum_type: enum_type.clone(),
            index,
        }
    }

    pub fn enum_type(&self) -> &TypeRef {
        &self.enum_type
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn item(&self) -> Option<&EnumItem> {
        match self.enum_type.kind() {
            TypeKind::Enum(def) => def.item(self.index),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        self.item().map_or("", EnumItem::name)
    }

    pub fn qualified_path(&self) -> SymbolPath {
        self.enum_type.qualified_path().join(self.name())
    }
}

impl fmt::Debug for EnumItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EnumItemRef")
            .field(&self.qualified_path().to_string())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_def_items() {
        let mut def = EnumDef::default();
        assert_eq!(def.add_item(EnumItem::new("RED", 0)), Ok(0));
        assert_eq!(
            def.add_item(EnumItem::new("GREEN", 1).with_ui_name("Green")),
            Ok(1)
        );
        assert!(def.add_item(EnumItem::new("RED", 2)).is_err());
        assert_eq!(def.item_count(), 2);

        assert_eq!(def.find_item_idx("GREEN"), Some(1));
        assert_eq!(def.find_item_idx_by_any_name("Green"), Some(1));
        assert_eq!(def.item(0).map(EnumItem::ui_name), Some("RED"));
    }

    #[test]
    fn test_enum_def_default() {
        let mut def = EnumDef::default();
        def.add_item(EnumItem::new("A", 0)).expect("add A");
        assert_eq!(def.default_item(), None);
        assert!(def.set_default_item("B").is_err());
        def.set_default_item("A").expect("default A");
        assert_eq!(def.default_item(), Some(0));
    }
}
