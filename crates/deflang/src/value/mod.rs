// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed values and the construction / assignment protocol.
//!
//! A [`Value`] starts unconstructed. It becomes constructed exactly once,
//! through [`Value::construct`] or [`Value::copy_construct`], and from then on
//! can only be mutated in place ([`Value::assign`], [`Value::copy_assign`],
//! [`Value::deserialize`], selection, UI strings and the kind-specific
//! mutators). Every mutation first stages the new content off to the side, so
//! a failed call leaves the value untouched.
//!
//! Observers registered with [`Value::subscribe`] are called once per
//! mutation that actually changes the value, then the observers of every
//! enclosing value are called once as well.
//!
//! ```
//! use deflang::{InitializerList, Namespace};
//!
//! let ns = Namespace::with_builtins();
//! let mut v = ns.find_type("vec3f").expect("vec3f").create_value();
//! v.construct(&InitializerList::new().with(1.0).with(2.0).with(3.0))
//!     .expect("construct");
//! assert_eq!(v.as_reals().expect("reals"), [1.0, 2.0, 3.0]);
//! ```

mod handle;
pub(crate) mod payload;
pub mod selector;
mod signal;
pub(crate) mod stage;
pub mod ui;

pub use handle::ValueMut;
pub use selector::{SelectorStep, ValueSelector};
pub use signal::ObserverId;

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result, StateViolation};
use crate::initializer::{InitializerList, Literal};
use crate::types::{EnumItemRef, Kind, TypeKind, TypeRef};

use payload::Payload;
use signal::Signal;

/// Instance of a sealed type.
pub struct Value {
    ty: TypeRef,
    payload: Option<Payload>,
    signal: Arc<Signal>,
}

impl Value {
    /// Unconstructed value of `ty`.
    pub(crate) fn new(ty: &TypeRef) -> Self {
        Self {
            ty: ty.clone(),
            payload: None,
            signal: Arc::new(Signal::default()),
        }
    }

    /// Constructed value wrapping a staged payload.
    pub(crate) fn from_payload(ty: TypeRef, payload: Payload) -> Self {
        let signal = Arc::new(Signal::default());
        payload::link_children(&payload, &signal);
        Self {
            ty,
            payload: Some(payload),
            signal,
        }
    }

    /// Detached deep copy, constructed or not. Observers are not copied.
    pub(crate) fn duplicate(&self) -> Self {
        match &self.payload {
            Some(payload) => Self::from_payload(self.ty.clone(), payload.duplicate()),
            None => Self::new(&self.ty),
        }
    }

    pub fn value_type(&self) -> &TypeRef {
        &self.ty
    }

    pub fn kind(&self) -> Kind {
        self.ty.tag()
    }

    pub fn is_constructed(&self) -> bool {
        self.payload.is_some()
    }

    // ---- protocol ----

    /// Construct from an initializer list; an empty list default-constructs.
    pub fn construct(&mut self, list: &InitializerList) -> Result<()> {
        self.ensure_unconstructed()?;
        let staged = stage::from_list(&self.ty, list)?;
        self.install(staged);
        Ok(())
    }

    /// Construct with the type's default.
    pub fn construct_default(&mut self) -> Result<()> {
        self.construct(&InitializerList::new())
    }

    /// Construct as a copy of a constructed value of a compatible type.
    pub fn copy_construct(&mut self, other: &Value) -> Result<()> {
        self.ensure_unconstructed()?;
        let staged = self.stage_copy(other)?;
        self.install(staged);
        Ok(())
    }

    /// Replace the content with a copy of `other`.
    pub fn copy_assign(&mut self, other: &Value) -> Result<()> {
        self.ensure_constructed()?;
        let staged = self.stage_copy(other)?;
        self.apply(staged);
        Ok(())
    }

    /// Replace the content from an initializer list.
    ///
    /// A variant keeps its active alternative when that alternative accepts
    /// the list.
    pub fn assign(&mut self, list: &InitializerList) -> Result<()> {
        let staged = stage::reassign(&self.ty, self.constructed_payload()?, list)?;
        self.apply(staged);
        Ok(())
    }

    /// Assign a single literal.
    pub fn set(&mut self, literal: impl Into<Literal>) -> Result<()> {
        self.assign(&InitializerList::single(literal.into()))
    }

    /// Structural equality with a constructed value of a compatible type.
    pub fn is_equal(&self, other: &Value) -> Result<bool> {
        let payload = self.constructed_payload()?;
        let Some(other_payload) = &other.payload else {
            return Err(Error::violation(
                other.ty.qualified_path(),
                StateViolation::UnconstructedOperand,
            ));
        };
        if !self.ty.is_compatible(&other.ty) {
            return Err(Error::incompatible(self.ty.qualified_path(), other.ty.qualified_path()));
        }
        Ok(payload.equals(other_payload))
    }

    /// Fresh constructed copy. Observers are not copied.
    pub fn try_clone(&self) -> Result<Value> {
        self.constructed_payload()?;
        Ok(self.duplicate())
    }

    // ---- observers ----

    /// Call `callback` after every mutation that changes this value or one of
    /// its children.
    ///
    /// Callbacks run on the mutating thread and must not mutate or subscribe
    /// to the same value tree.
    pub fn subscribe(&self, callback: impl FnMut() + Send + 'static) -> ObserverId {
        self.signal.subscribe(Box::new(callback))
    }

    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.signal.unsubscribe(id)
    }

    // ---- scalar accessors ----

    pub fn as_bool(&self) -> Result<bool> {
        match self.constructed_payload()? {
            Payload::Bool(v) => Ok(*v),
            _ => Err(self.unsupported("as_bool")),
        }
    }

    /// Value of an integral scalar.
    pub fn as_int(&self) -> Result<i128> {
        match self.constructed_payload()? {
            Payload::Int(v) if v.len() == 1 => Ok(v[0]),
            _ => Err(self.unsupported("as_int")),
        }
    }

    /// Components of an integral scalar or vector.
    pub fn as_ints(&self) -> Result<&[i128]> {
        match self.constructed_payload()? {
            Payload::Int(v) => Ok(v),
            _ => Err(self.unsupported("as_ints")),
        }
    }

    /// Value of a real scalar.
    pub fn as_real(&self) -> Result<f64> {
        match self.constructed_payload()? {
            Payload::Real(v) if v.len() == 1 => Ok(v[0]),
            _ => Err(self.unsupported("as_real")),
        }
    }

    /// Components of a real scalar or vector.
    pub fn as_reals(&self) -> Result<&[f64]> {
        match self.constructed_payload()? {
            Payload::Real(v) => Ok(v),
            _ => Err(self.unsupported("as_reals")),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self.constructed_payload()? {
            Payload::String(v) => Ok(v),
            _ => Err(self.unsupported("as_str")),
        }
    }

    /// Current item of an enum value.
    pub fn enum_item(&self) -> Result<EnumItemRef> {
        let Payload::Enum(index) = self.constructed_payload()? else {
            return Err(self.unsupported("enum_item"));
        };
        Ok(EnumItemRef::from_index(&self.ty, *index))
    }

    // ---- struct accessors ----

    pub fn member_count(&self) -> Result<usize> {
        match self.constructed_payload()? {
            Payload::Struct(members) => Ok(members.len()),
            _ => Err(self.unsupported("members")),
        }
    }

    pub fn member(&self, index: usize) -> Result<&Value> {
        let Payload::Struct(members) = self.constructed_payload()? else {
            return Err(self.unsupported("members"));
        };
        members
            .get(index)
            .ok_or_else(|| Error::data(self.ty.qualified_path(), format!("no member at index {}", index)))
    }

    pub fn member_mut(&mut self, index: usize) -> Result<ValueMut<'_>> {
        self.member_slot(index).map(ValueMut::new)
    }

    fn member_slot(&mut self, index: usize) -> Result<&mut Value> {
        let Self { ty, payload, .. } = self;
        match payload {
            Some(Payload::Struct(members)) => members.get_mut(index).ok_or_else(|| {
                Error::data(ty.qualified_path(), format!("no member at index {}", index))
            }),
            Some(_) => Err(Error::not_supported(ty.qualified_path(), "members")),
            None => Err(unconstructed(ty)),
        }
    }

    pub fn member_by_name(&self, name: &str) -> Result<&Value> {
        let index = self.member_index(name)?;
        self.member(index)
    }

    pub fn member_by_name_mut(&mut self, name: &str) -> Result<ValueMut<'_>> {
        let index = self.member_index(name)?;
        self.member_mut(index)
    }

    fn member_index(&self, name: &str) -> Result<usize> {
        if self.ty.tag() != Kind::Struct {
            return Err(self.unsupported("members"));
        }
        self.ty
            .find_member_def_idx_by_name(name)
            .ok_or_else(|| Error::data(self.ty.qualified_path(), format!("no member '{}'", name)))
    }

    // ---- optional accessors ----

    /// Inner value of an optional, `None` when empty.
    pub fn optional_value(&self) -> Result<Option<&Value>> {
        match self.constructed_payload()? {
            Payload::Optional(inner) => Ok(inner.as_deref()),
            _ => Err(self.unsupported("optional_value")),
        }
    }

    pub fn optional_value_mut(&mut self) -> Result<Option<ValueMut<'_>>> {
        let Self { ty, payload, .. } = self;
        match payload {
            Some(Payload::Optional(inner)) => Ok(inner.as_deref_mut().map(ValueMut::new)),
            Some(_) => Err(Error::not_supported(ty.qualified_path(), "optional_value")),
            None => Err(unconstructed(ty)),
        }
    }

    // ---- variant accessors ----

    /// Index of the active alternative.
    pub fn variant_index(&self) -> Result<usize> {
        match self.constructed_payload()? {
            Payload::Variant(index, _) => Ok(*index),
            _ => Err(self.unsupported("variant_index")),
        }
    }

    /// Value of the active alternative.
    pub fn variant_value(&self) -> Result<&Value> {
        match self.constructed_payload()? {
            Payload::Variant(_, inner) => Ok(&**inner),
            _ => Err(self.unsupported("variant_value")),
        }
    }

    pub fn variant_value_mut(&mut self) -> Result<ValueMut<'_>> {
        let Self { ty, payload, .. } = self;
        match payload {
            Some(Payload::Variant(_, inner)) => Ok(ValueMut::new(&mut **inner)),
            Some(_) => Err(Error::not_supported(ty.qualified_path(), "variant_value")),
            None => Err(unconstructed(ty)),
        }
    }

    /// Switch to the alternative at `index`, default-constructed.
    ///
    /// No-op when the alternative is already active.
    pub fn set_active_alternative(&mut self, index: usize) -> Result<()> {
        let current = match self.constructed_payload()? {
            Payload::Variant(current, _) => *current,
            _ => return Err(self.unsupported("set_active_alternative")),
        };
        if current == index {
            return Ok(());
        }
        let alternative = self.ty.inner_type(index).ok_or_else(|| {
            Error::data(
                self.ty.qualified_path(),
                format!("no alternative at index {}", index),
            )
        })?;
        let staged = Payload::Variant(
            index,
            Box::new(Value::from_payload(
                alternative.clone(),
                stage::default_payload(alternative)?,
            )),
        );
        self.apply(staged);
        Ok(())
    }

    // ---- array accessors ----

    pub fn array_len(&self) -> Result<usize> {
        Ok(self.elements()?.len())
    }

    pub fn elements(&self) -> Result<&[Value]> {
        match self.constructed_payload()? {
            Payload::Array(values) => Ok(values),
            _ => Err(self.unsupported("elements")),
        }
    }

    pub fn element(&self, index: usize) -> Result<&Value> {
        self.elements()?.get(index).ok_or_else(|| self.out_of_range(index))
    }

    pub fn element_mut(&mut self, index: usize) -> Result<ValueMut<'_>> {
        let Self { ty, payload, .. } = self;
        match payload {
            Some(Payload::Array(values)) => {
                let len = values.len();
                values
                    .get_mut(index)
                    .map(ValueMut::new)
                    .ok_or_else(|| out_of_range(ty, index, len))
            }
            Some(_) => Err(Error::not_supported(ty.qualified_path(), "elements")),
            None => Err(unconstructed(ty)),
        }
    }

    /// Append a default element; returns its index.
    pub fn push_default(&mut self) -> Result<usize> {
        let len = self.array_len()?;
        self.insert_default(len)?;
        Ok(len)
    }

    /// Insert a default element at `index` (`index <= len`).
    pub fn insert_default(&mut self, index: usize) -> Result<()> {
        if index > self.array_len()? {
            return Err(self.out_of_range(index));
        }
        let element = self.element_type("insert_default")?;
        let fresh = Value::from_payload(element.clone(), stage::default_payload(&element)?);
        fresh.signal.set_parent(&self.signal);
        if let Some(Payload::Array(values)) = &mut self.payload {
            values.insert(index, fresh);
        }
        log::trace!("[deflang] '{}': inserted element {}", self.ty.qualified_path(), index);
        self.signal.emit();
        Ok(())
    }

    /// Remove the element at `index`.
    pub fn remove(&mut self, index: usize) -> Result<()> {
        if index >= self.array_len()? {
            return Err(self.out_of_range(index));
        }
        if let Some(Payload::Array(values)) = &mut self.payload {
            values.remove(index);
        }
        log::trace!("[deflang] '{}': removed element {}", self.ty.qualified_path(), index);
        self.signal.emit();
        Ok(())
    }

    fn element_type(&self, operation: &'static str) -> Result<TypeRef> {
        match self.ty.kind() {
            TypeKind::Array(Some(element)) => Ok(element.clone()),
            _ => Err(self.unsupported(operation)),
        }
    }

    fn out_of_range(&self, index: usize) -> Error {
        let len = match &self.payload {
            Some(Payload::Array(values)) => values.len(),
            _ => 0,
        };
        out_of_range(&self.ty, index, len)
    }

    // ---- internals ----

    fn stage_copy(&self, other: &Value) -> Result<Payload> {
        let Some(payload) = &other.payload else {
            return Err(Error::violation(
                other.ty.qualified_path(),
                StateViolation::UnconstructedOperand,
            ));
        };
        if !self.ty.is_compatible(&other.ty) {
            return Err(Error::incompatible(self.ty.qualified_path(), other.ty.qualified_path()));
        }
        Ok(payload.duplicate())
    }

    fn install(&mut self, staged: Payload) {
        payload::link_children(&staged, &self.signal);
        self.payload = Some(staged);
        log::trace!("[deflang] constructed '{}'", self.ty.qualified_path());
    }

    /// Merge a staged payload into the constructed payload and notify once on change.
    pub(crate) fn apply(&mut self, staged: Payload) -> bool {
        let changed = match &mut self.payload {
            Some(current) => payload::merge(current, staged, &self.signal),
            None => {
                self.install(staged);
                true
            }
        };
        if changed {
            log::trace!("[deflang] '{}' changed", self.ty.qualified_path());
            self.signal.emit();
        }
        changed
    }

    fn ensure_unconstructed(&self) -> Result<()> {
        if self.payload.is_some() {
            return Err(Error::violation(
                self.ty.qualified_path(),
                StateViolation::AlreadyConstructed,
            ));
        }
        Ok(())
    }

    fn ensure_constructed(&self) -> Result<()> {
        self.constructed_payload().map(|_| ())
    }

    pub(crate) fn constructed_payload(&self) -> Result<&Payload> {
        self.payload.as_ref().ok_or_else(|| unconstructed(&self.ty))
    }

    fn unsupported(&self, operation: &'static str) -> Error {
        Error::not_supported(self.ty.qualified_path(), operation)
    }
}

fn unconstructed(ty: &TypeRef) -> Error {
    Error::violation(ty.qualified_path(), StateViolation::Unconstructed)
}

fn out_of_range(ty: &TypeRef, index: usize, len: usize) -> Error {
    Error::data(
        ty.qualified_path(),
        format!("index {} is out of range (length {})", index, len),
    )
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type", &self.ty.qualified_path().to_string())
            .field("payload", &self.payload)
            .finish()
    }
}
