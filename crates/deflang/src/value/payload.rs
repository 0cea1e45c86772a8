// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value payloads: deep copy, structural equality and in-place merging.

use std::slice;
use std::sync::Arc;

use super::signal::Signal;
use super::Value;

/// Kind-specific content of a constructed value.
#[derive(Debug)]
pub(crate) enum Payload {
    Bool(bool),
    /// Integral components.
    Int(Vec<i128>),
    /// Real components, already quantized to the component kind.
    Real(Vec<f64>),
    String(String),
    /// Index of the enum item.
    Enum(usize),
    Optional(Option<Box<Value>>),
    /// Active alternative index and its value.
    Variant(usize, Box<Value>),
    /// Member values, base members first.
    Struct(Vec<Value>),
    Array(Vec<Value>),
}

impl Payload {
    /// Direct children of a composite payload.
    pub(crate) fn children(&self) -> &[Value] {
        match self {
            Self::Optional(Some(inner)) | Self::Variant(_, inner) => slice::from_ref(&**inner),
            Self::Struct(values) | Self::Array(values) => values,
            _ => &[],
        }
    }

    /// Deep copy. Children get fresh signals without observers.
    pub(crate) fn duplicate(&self) -> Self {
        match self {
            Self::Bool(v) => Self::Bool(*v),
            Self::Int(v) => Self::Int(v.clone()),
            Self::Real(v) => Self::Real(v.clone()),
            Self::String(v) => Self::String(v.clone()),
            Self::Enum(v) => Self::Enum(*v),
            Self::Optional(v) => Self::Optional(v.as_ref().map(|inner| Box::new(inner.duplicate()))),
            Self::Variant(idx, inner) => Self::Variant(*idx, Box::new(inner.duplicate())),
            Self::Struct(values) => Self::Struct(values.iter().map(Value::duplicate).collect()),
            Self::Array(values) => Self::Array(values.iter().map(Value::duplicate).collect()),
        }
    }

    /// Structural equality.
    pub(crate) fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::Optional(a), Self::Optional(b)) => match (a, b) {
                (Some(a), Some(b)) => value_equals(a, b),
                (None, None) => true,
                _ => false,
            },
            (Self::Variant(ai, a), Self::Variant(bi, b)) => ai == bi && value_equals(a, b),
            (Self::Struct(a), Self::Struct(b)) | (Self::Array(a), Self::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(a, b)| value_equals(a, b))
            }
            _ => false,
        }
    }
}

fn value_equals(a: &Value, b: &Value) -> bool {
    match (&a.payload, &b.payload) {
        (Some(a), Some(b)) => a.equals(b),
        (None, None) => true,
        _ => false,
    }
}

/// Link the children of `payload` to `parent`.
pub(crate) fn link_children(payload: &Payload, parent: &Arc<Signal>) {
    for child in payload.children() {
        child.signal.set_parent(parent);
    }
}

fn adopt(child: Value, parent: &Arc<Signal>) -> Value {
    child.signal.set_parent(parent);
    child
}

fn replace_if_ne<T: PartialEq>(current: &mut T, staged: T) -> bool {
    if *current == staged {
        false
    } else {
        *current = staged;
        true
    }
}

/// Merge `staged` into `current` in place.
///
/// Existing children keep their identity (and observers); children whose
/// payload changed are notified locally. Returns true when anything changed.
pub(crate) fn merge(current: &mut Payload, staged: Payload, signal: &Arc<Signal>) -> bool {
    match (current, staged) {
        (Payload::Bool(a), Payload::Bool(b)) => replace_if_ne(a, b),
        (Payload::Int(a), Payload::Int(b)) => replace_if_ne(a, b),
        (Payload::Real(a), Payload::Real(b)) => replace_if_ne(a, b),
        (Payload::String(a), Payload::String(b)) => replace_if_ne(a, b),
        (Payload::Enum(a), Payload::Enum(b)) => replace_if_ne(a, b),
        (Payload::Optional(slot), Payload::Optional(staged)) => match (slot, staged) {
            (Some(cur), Some(new)) => merge_child(cur, *new),
            (None, None) => false,
            (slot, new) => {
                *slot = new.map(|v| Box::new(adopt(*v, signal)));
                true
            }
        },
        (Payload::Variant(idx, cur), Payload::Variant(new_idx, new)) => {
            if *idx == new_idx {
                merge_child(cur, *new)
            } else {
                *idx = new_idx;
                **cur = adopt(*new, signal);
                true
            }
        }
        (Payload::Struct(cur), Payload::Struct(new)) => {
            let mut changed = false;
            for (c, n) in cur.iter_mut().zip(new) {
                changed |= merge_child(c, n);
            }
            changed
        }
        (Payload::Array(cur), Payload::Array(new)) => {
            let mut changed = cur.len() != new.len();
            cur.truncate(new.len());
            for (i, n) in new.into_iter().enumerate() {
                match cur.get_mut(i) {
                    Some(c) => changed |= merge_child(c, n),
                    None => cur.push(adopt(n, signal)),
                }
            }
            changed
        }
        (slot, staged) => {
            link_children(&staged, signal);
            *slot = staged;
            true
        }
    }
}

fn merge_child(child: &mut Value, staged: Value) -> bool {
    let Some(staged) = staged.payload else {
        return false;
    };
    let changed = match &mut child.payload {
        Some(current) => merge(current, staged, &child.signal),
        None => {
            link_children(&staged, &child.signal);
            child.payload = Some(staged);
            true
        }
    };
    if changed {
        child.signal.emit_local();
    }
    changed
}
