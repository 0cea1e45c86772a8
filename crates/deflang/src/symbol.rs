// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Named nodes of the schema namespace.
//!
//! Every type, member and enum item is a [`Symbol`]. A symbol knows its
//! enclosing scope through a non-owning [`ScopeId`] and caches its qualified
//! [`SymbolPath`], which is recomputed whenever the symbol is attached to a
//! new parent.

use std::fmt;

use crate::config::{PATH_SEPARATOR, RESERVED_NAME_CHARS};
use crate::namespace::ScopeId;

/// Qualified path of a symbol (`sensors::Imu::rate`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolPath {
    segments: Vec<String>,
}

impl SymbolPath {
    /// Empty path (the root scope).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `::`-separated path. Empty segments are skipped.
    pub fn parse(text: &str) -> Self {
        Self {
            segments: text
                .split(PATH_SEPARATOR)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Path with `name` appended.
    pub fn join(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    /// Path of the enclosing symbol, if any.
    pub fn parent(&self) -> Option<Self> {
        let (_, head) = self.segments.split_last()?;
        Some(Self {
            segments: head.to_vec(),
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for SymbolPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(PATH_SEPARATOR))
    }
}

impl From<&str> for SymbolPath {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

/// A named node with a back-reference to its enclosing scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    name: String,
    parent: Option<ScopeId>,
    path: SymbolPath,
}

impl Symbol {
    /// Detached symbol; its qualified path is just its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let path = SymbolPath::new().join(&name);
        Self {
            name,
            parent: None,
            path,
        }
    }

    pub(crate) fn root() -> Self {
        Self {
            name: String::new(),
            parent: None,
            path: SymbolPath::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enclosing scope, when registered in a namespace.
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn qualified_path(&self) -> &SymbolPath {
        &self.path
    }

    /// Re-parent the symbol under `parent_path`.
    pub(crate) fn attach(&mut self, parent: Option<ScopeId>, parent_path: &SymbolPath) {
        self.parent = parent;
        self.path = parent_path.join(&self.name);
    }
}

/// Check that `name` can be used for a symbol.
pub(crate) fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("symbol names cannot be empty".to_string());
    }
    if let Some(c) = name
        .chars()
        .find(|c| c.is_whitespace() || RESERVED_NAME_CHARS.contains(c))
    {
        return Err(format!("symbol name '{}' contains invalid character '{}'", name, c));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_parse_and_display() {
        let path = SymbolPath::parse("sensors::imu::Sample");
        assert_eq!(path.len(), 3);
        assert_eq!(path.last(), Some("Sample"));
        assert_eq!(path.to_string(), "sensors::imu::Sample");
        assert_eq!(SymbolPath::parse("::a::::b").segments(), ["a", "b"]);
    }

    #[test]
    fn test_path_parent() {
        let path = SymbolPath::parse("a::b");
        assert_eq!(path.parent(), Some(SymbolPath::parse("a")));
        assert_eq!(SymbolPath::new().parent(), None);
    }

    #[test]
    fn test_symbol_attach() {
        let mut symbol = Symbol::new("rate");
        assert_eq!(symbol.qualified_path().to_string(), "rate");

        symbol.attach(None, &SymbolPath::parse("sensors::Imu"));
        assert_eq!(symbol.qualified_path().to_string(), "sensors::Imu::rate");
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("vec3f").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("a b").is_err());
        assert!(validate_name("a::b").is_err());
        assert!(validate_name("a.b").is_err());
        assert!(validate_name("a[0]").is_err());
    }
}
