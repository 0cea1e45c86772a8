// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Initializers used to construct and assign values.
//!
//! An [`InitializerList`] is an ordered, optionally named, sequence of
//! [`Initializer`]s. It is built by the host (or a schema parser) for a single
//! `construct`/`assign` call and discarded afterwards.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::{EnumItemRef, TypeRef};
use crate::value::Value;

/// Untyped literal, converted to the target type during construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Empty optional.
    Null,
    Bool(bool),
    Int(i128),
    Real(f64),
    String(String),
    /// Vector components, array elements or positional struct members.
    List(Vec<Literal>),
}

impl Literal {
    /// Short name of the literal kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Real(_) => "real",
            Self::String(_) => "string",
            Self::List(_) => "list",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value of an integer or real literal.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Real(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert a parsed document into a literal.
    ///
    /// Objects have no literal form and yield `None`.
    pub fn from_document(doc: &serde_json::Value) -> Option<Self> {
        use serde_json::Value as Doc;

        match doc {
            Doc::Null => Some(Self::Null),
            Doc::Bool(b) => Some(Self::Bool(*b)),
            Doc::Number(n) => n
                .as_i64()
                .map(|v| Self::Int(i128::from(v)))
                .or_else(|| n.as_u64().map(|v| Self::Int(i128::from(v))))
                .or_else(|| n.as_f64().map(Self::Real)),
            Doc::String(s) => Some(Self::String(s.clone())),
            Doc::Array(items) => items
                .iter()
                .map(Self::from_document)
                .collect::<Option<Vec<_>>>()
                .map(Self::List),
            Doc::Object(_) => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Real(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "\"{}\"", v),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

macro_rules! impl_literal_from {
    ($($ty:ty => $variant:ident as $conv:ty),* $(,)?) => {
        $(
            impl From<$ty> for Literal {
                fn from(v: $ty) -> Self {
                    Self::$variant(<$conv>::from(v))
                }
            }

            impl From<$ty> for Initializer {
                fn from(v: $ty) -> Self {
                    Self::Literal(Literal::from(v))
                }
            }
        )*
    };
}

impl_literal_from!(
    bool => Bool as bool,
    i8 => Int as i128,
    u8 => Int as i128,
    i16 => Int as i128,
    u16 => Int as i128,
    i32 => Int as i128,
    u32 => Int as i128,
    i64 => Int as i128,
    u64 => Int as i128,
    i128 => Int as i128,
    f32 => Real as f64,
    f64 => Real as f64,
    String => String as String,
);

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<&str> for Initializer {
    fn from(v: &str) -> Self {
        Self::Literal(Literal::from(v))
    }
}

impl<T: Into<Literal>> From<Vec<T>> for Literal {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Literal>> From<Vec<T>> for Initializer {
    fn from(v: Vec<T>) -> Self {
        Self::Literal(Literal::from(v))
    }
}

/// A typed producer of values.
///
/// Expressions are evaluated once, when the initializer is consumed.
pub trait Expression: fmt::Debug + Send + Sync {
    /// Type of the produced value.
    fn result_type(&self) -> TypeRef;

    /// Produce a constructed value of [`Expression::result_type`].
    fn evaluate(&self) -> Result<Value>;
}

/// Expression yielding a copy of a fixed value.
#[derive(Debug)]
pub struct ConstantExpression {
    value: Value,
}

impl ConstantExpression {
    /// Wrap a constructed value.
    pub fn new(value: Value) -> Result<Self> {
        if !value.is_constructed() {
            return Err(Error::data(
                value.value_type().qualified_path(),
                "constant expressions need a constructed value",
            ));
        }
        Ok(Self { value })
    }
}

impl Expression for ConstantExpression {
    fn result_type(&self) -> TypeRef {
        self.value.value_type().clone()
    }

    fn evaluate(&self) -> Result<Value> {
        self.value.try_clone()
    }
}

/// One construction/assignment input.
#[derive(Debug)]
pub enum Initializer {
    Literal(Literal),
    /// Typed value, copied into the target.
    Value(Value),
    EnumItem(EnumItemRef),
    Expression(Arc<dyn Expression>),
    /// Nested list for composite targets.
    List(InitializerList),
}

impl Initializer {
    /// Human readable description, for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Literal(lit) => format!("{} literal {}", lit.kind_name(), lit),
            Self::Value(v) => format!("value of '{}'", v.value_type().qualified_path()),
            Self::EnumItem(item) => format!("enum item '{}'", item.qualified_path()),
            Self::Expression(e) => format!("expression of '{}'", e.result_type().qualified_path()),
            Self::List(list) => format!("initializer list of {} entries", list.len()),
        }
    }
}

impl From<Literal> for Initializer {
    fn from(v: Literal) -> Self {
        Self::Literal(v)
    }
}

impl From<Value> for Initializer {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

impl From<EnumItemRef> for Initializer {
    fn from(v: EnumItemRef) -> Self {
        Self::EnumItem(v)
    }
}

impl From<InitializerList> for Initializer {
    fn from(v: InitializerList) -> Self {
        Self::List(v)
    }
}

/// Initializer with an optional member name.
#[derive(Debug)]
pub struct InitializerEntry {
    name: Option<String>,
    initializer: Initializer,
}

impl InitializerEntry {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn initializer(&self) -> &Initializer {
        &self.initializer
    }
}

/// Ordered list of initializers.
#[derive(Debug, Default)]
pub struct InitializerList {
    entries: Vec<InitializerEntry>,
}

impl InitializerList {
    /// Empty list: requests default construction.
    pub fn new() -> Self {
        Self::default()
    }

    /// List with a single positional initializer.
    pub fn single(initializer: impl Into<Initializer>) -> Self {
        Self::new().with(initializer)
    }

    /// Append a positional initializer (builder style).
    #[must_use]
    pub fn with(mut self, initializer: impl Into<Initializer>) -> Self {
        self.push(initializer);
        self
    }

    /// Append a named initializer (builder style).
    #[must_use]
    pub fn with_named(mut self, name: impl Into<String>, initializer: impl Into<Initializer>) -> Self {
        self.push_named(name, initializer);
        self
    }

    pub fn push(&mut self, initializer: impl Into<Initializer>) {
        self.entries.push(InitializerEntry {
            name: None,
            initializer: initializer.into(),
        });
    }

    pub fn push_named(&mut self, name: impl Into<String>, initializer: impl Into<Initializer>) {
        self.entries.push(InitializerEntry {
            name: Some(name.into()),
            initializer: initializer.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Initializer> {
        self.entries.get(index).map(|e| &e.initializer)
    }

    pub fn entries(&self) -> &[InitializerEntry] {
        &self.entries
    }

    /// True when any entry carries a member name.
    pub fn has_names(&self) -> bool {
        self.entries.iter().any(|e| e.name.is_some())
    }
}

impl From<Vec<Initializer>> for InitializerList {
    fn from(initializers: Vec<Initializer>) -> Self {
        initializers.into_iter().collect()
    }
}

impl FromIterator<Initializer> for InitializerList {
    fn from_iter<I: IntoIterator<Item = Initializer>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|initializer| InitializerEntry {
                    name: None,
                    initializer,
                })
                .collect(),
        }
    }
}
