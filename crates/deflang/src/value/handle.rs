// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mutable access to values nested in a tree.
//!
//! Children are handed out as [`ValueMut`] rather than `&mut Value`: the
//! handle only exposes the checked mutators, so a child can never be swapped
//! for a value of another type or an unconstructed one.
//!
//! ```compile_fail
//! use deflang::{InitializerList, MemberDef, Namespace, Type, ValueSelector};
//!
//! let mut ns = Namespace::with_builtins();
//! let int32 = ns.find_type("int32").expect("int32");
//! let mut point = Type::structure("Point");
//! point.add_member_def(MemberDef::new("x", &int32)).expect("x");
//! let point = ns.add_type(Namespace::ROOT, point).expect("Point");
//!
//! let mut p = point.create_value();
//! p.construct(&InitializerList::new()).expect("default");
//! let other = ns.find_type("string").expect("string").create_value();
//! *p.select_mut(&ValueSelector::from(["x"])).expect("x") = other;
//! ```

use std::ops::Deref;

use crate::codec::Document;
use crate::error::Result;
use crate::initializer::{InitializerList, Literal};
use crate::types::Kind;

use super::selector::ValueSelector;
use super::Value;

/// Exclusive handle on a constructed value inside a value tree.
///
/// Reads go through [`Deref`]; writes are limited to the assignment protocol,
/// so the value keeps its type and notifications reach every ancestor.
#[derive(Debug)]
pub struct ValueMut<'a> {
    value: &'a mut Value,
}

impl<'a> ValueMut<'a> {
    pub(crate) fn new(value: &'a mut Value) -> Self {
        Self { value }
    }

    /// Shorter-lived handle on the same value.
    pub fn reborrow(&mut self) -> ValueMut<'_> {
        ValueMut::new(self.value)
    }

    // ---- protocol ----

    pub fn assign(&mut self, list: &InitializerList) -> Result<()> {
        self.value.assign(list)
    }

    pub fn copy_assign(&mut self, other: &Value) -> Result<()> {
        self.value.copy_assign(other)
    }

    pub fn set(&mut self, literal: impl Into<Literal>) -> Result<()> {
        self.value.set(literal)
    }

    pub fn deserialize(&mut self, doc: &Document) -> Result<()> {
        self.value.deserialize(doc)
    }

    pub fn parse_from_ui_string(&mut self, text: &str) -> Result<()> {
        self.value.parse_from_ui_string(text)
    }

    pub fn push_default(&mut self) -> Result<usize> {
        self.value.push_default()
    }

    pub fn insert_default(&mut self, index: usize) -> Result<()> {
        self.value.insert_default(index)
    }

    pub fn remove(&mut self, index: usize) -> Result<()> {
        self.value.remove(index)
    }

    pub fn set_active_alternative(&mut self, index: usize) -> Result<()> {
        self.value.set_active_alternative(index)
    }

    // ---- navigation ----

    pub fn member_mut(self, index: usize) -> Result<ValueMut<'a>> {
        self.value.member_mut(index)
    }

    pub fn member_by_name_mut(self, name: &str) -> Result<ValueMut<'a>> {
        self.value.member_by_name_mut(name)
    }

    pub fn optional_value_mut(self) -> Result<Option<ValueMut<'a>>> {
        self.value.optional_value_mut()
    }

    pub fn variant_value_mut(self) -> Result<ValueMut<'a>> {
        self.value.variant_value_mut()
    }

    pub fn element_mut(self, index: usize) -> Result<ValueMut<'a>> {
        self.value.element_mut(index)
    }

    pub fn select_mut(self, selector: &ValueSelector) -> Result<ValueMut<'a>> {
        self.value.select_mut(selector)
    }

    pub fn select_kind_mut(self, selector: &ValueSelector, kind: Kind) -> Result<ValueMut<'a>> {
        self.value.select_kind_mut(selector, kind)
    }
}

impl Deref for ValueMut<'_> {
    type Target = Value;

    fn deref(&self) -> &Value {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IntKind, MemberDef, Type, TypeRef};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn pair() -> (TypeRef, TypeRef) {
        let int32 = Type::integral("int32", IntKind::I32, 1).seal().expect("int32");
        let mut pair = Type::structure("Pair");
        pair.add_member_def(MemberDef::new("a", &int32)).expect("a");
        pair.add_member_def(MemberDef::new("b", &int32)).expect("b");
        (int32, pair.seal().expect("Pair"))
    }

    #[test]
    fn test_reborrow_keeps_handle_usable() {
        let (_, pair) = pair();
        let mut p = pair.create_value();
        p.construct_default().expect("default");
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        p.subscribe(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });

        let mut a = p.member_by_name_mut("a").expect("a");
        a.reborrow().set(1).expect("first");
        a.set(2).expect("second");
        assert_eq!(a.as_int().expect("int"), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_handle_rejects_foreign_values() {
        let (_, pair) = pair();
        let text = Type::string("text").seal().expect("text");
        let mut other = text.create_value();
        other.construct(&InitializerList::single("oops")).expect("text");

        let mut p = pair.create_value();
        p.construct_default().expect("default");
        let err = p
            .member_mut(0)
            .expect("a")
            .copy_assign(&other)
            .expect_err("foreign type");
        assert!(err.is_incompatible());
        assert_eq!(p.member(0).expect("a").kind(), Kind::Integral);
    }
}
