// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Staging of payloads from initializers.
//!
//! Everything here builds a detached [`Payload`] and never touches the value
//! being constructed or assigned, so a failure leaves the target unchanged.

use crate::error::{Error, Result, StateViolation};
use crate::initializer::{Initializer, InitializerList, Literal};
use crate::types::{EnumItemRef, MemberDef, RealKind, TypeKind, TypeRef};

use super::payload::Payload;
use super::Value;

/// One input of a composite: an initializer, or a literal nested in a list literal.
#[derive(Clone, Copy)]
enum Source<'a> {
    Init(&'a Initializer),
    Literal(&'a Literal),
}

fn from_source(ty: &TypeRef, source: Source<'_>) -> Result<Payload> {
    match source {
        Source::Init(init) => from_initializer(ty, init),
        Source::Literal(lit) => from_literal(ty, lit),
    }
}

fn child(ty: &TypeRef, payload: Payload) -> Value {
    Value::from_payload(ty.clone(), payload)
}

fn not_instantiated(ty: &TypeRef) -> Error {
    Error::schema(ty.qualified_path(), "template is not instantiated")
}

// ============================================================================
// Defaults
// ============================================================================

/// Default payload of `ty`.
pub(crate) fn default_payload(ty: &TypeRef) -> Result<Payload> {
    match ty.kind() {
        TypeKind::Bool => Ok(Payload::Bool(false)),
        TypeKind::Integral { components, .. } => {
            let (min, max) = ty.int_range().unwrap_or((0, 0));
            let v = if (min..=max).contains(&0) { 0 } else { min };
            Ok(Payload::Int(vec![v; *components]))
        }
        TypeKind::Real { kind, components } => {
            let (min, max) = ty.real_range().unwrap_or((0.0, 0.0));
            let v = if (min..=max).contains(&0.0) {
                0.0
            } else {
                kind.quantize(min)
            };
            Ok(Payload::Real(vec![v; *components]))
        }
        TypeKind::String => Ok(Payload::String(String::new())),
        TypeKind::Enum(def) => def
            .default_item()
            .map(Payload::Enum)
            .ok_or_else(|| Error::data(ty.qualified_path(), "enum has no default item")),
        TypeKind::Optional(_) => Ok(Payload::Optional(None)),
        TypeKind::Variant(alternatives) => {
            let first = alternatives
                .as_ref()
                .and_then(|alts| alts.first())
                .ok_or_else(|| not_instantiated(ty))?;
            Ok(Payload::Variant(0, Box::new(child(first, default_payload(first)?))))
        }
        TypeKind::Struct(_) => from_members(ty, Vec::new()),
        TypeKind::Array(_) => Ok(Payload::Array(Vec::new())),
    }
}

/// Default value of a struct member.
pub(crate) fn member_default(def: &MemberDef) -> Result<Value> {
    match def.default_value() {
        Some(value) => Ok(value.duplicate()),
        None => Ok(child(def.member_type(), default_payload(def.member_type())?)),
    }
}

// ============================================================================
// Initializer lists
// ============================================================================

/// Stage a payload of `ty` from an initializer list (empty: default).
pub(crate) fn from_list(ty: &TypeRef, list: &InitializerList) -> Result<Payload> {
    let entries = list.entries();
    if entries.is_empty() {
        return default_payload(ty);
    }
    if let [entry] = entries {
        if entry.name().is_none() && initializes_whole(ty, entry.initializer()) {
            return from_initializer(ty, entry.initializer());
        }
    }

    let path = ty.qualified_path();
    match ty.kind() {
        TypeKind::Integral { components, .. } | TypeKind::Real { components, .. }
            if *components == entries.len() && !list.has_names() =>
        {
            let literals = entries
                .iter()
                .map(|e| match e.initializer() {
                    Initializer::Literal(lit) => Ok(lit.clone()),
                    other => Err(Error::incompatible(path, other.describe())),
                })
                .collect::<Result<Vec<_>>>()?;
            from_literal(ty, &Literal::List(literals))
        }
        TypeKind::Optional(Some(inner)) => Ok(Payload::Optional(Some(Box::new(child(
            inner,
            from_list(inner, list)?,
        ))))),
        TypeKind::Variant(Some(alternatives)) => alternatives
            .iter()
            .enumerate()
            .find_map(|(i, alt)| {
                from_list(alt, list)
                    .ok()
                    .map(|payload| Payload::Variant(i, Box::new(child(alt, payload))))
            })
            .ok_or_else(|| {
                Error::data(path, format!("no alternative accepts a list of {} initializers", entries.len()))
            }),
        TypeKind::Struct(_) => from_members(
            ty,
            entries
                .iter()
                .map(|e| (e.name(), Source::Init(e.initializer())))
                .collect(),
        ),
        TypeKind::Array(Some(element)) if !list.has_names() => {
            from_elements(element, entries.iter().map(|e| Source::Init(e.initializer())))
        }
        _ => Err(Error::data(
            path,
            format!("expected a single initializer, got {}", entries.len()),
        )),
    }
}

/// Stage `list` as the new content of a value of `ty` currently holding `current`.
///
/// A variant keeps its active alternative when that alternative accepts the
/// list; otherwise the first accepting alternative wins, as in [`from_list`].
pub(crate) fn reassign(ty: &TypeRef, current: &Payload, list: &InitializerList) -> Result<Payload> {
    if let (TypeKind::Variant(Some(alternatives)), Payload::Variant(active, _)) = (ty.kind(), current) {
        if let Some(alt) = alternatives.get(*active) {
            if let Ok(payload) = from_list(alt, list) {
                return Ok(Payload::Variant(*active, Box::new(child(alt, payload))));
            }
        }
    }
    from_list(ty, list)
}

/// True when a lone initializer stands for the whole value of `ty` rather
/// than for its first member or element.
fn initializes_whole(ty: &TypeRef, init: &Initializer) -> bool {
    match ty.kind() {
        TypeKind::Struct(_) | TypeKind::Array(_) => match init {
            Initializer::Literal(Literal::List(_)) | Initializer::List(_) => true,
            Initializer::Value(v) => v.value_type().is_compatible(ty),
            Initializer::Expression(e) => e.result_type().is_compatible(ty),
            Initializer::Literal(_) | Initializer::EnumItem(_) => false,
        },
        _ => true,
    }
}

/// Stage a payload of `ty` from a single initializer.
pub(crate) fn from_initializer(ty: &TypeRef, init: &Initializer) -> Result<Payload> {
    match init {
        Initializer::Literal(lit) => from_literal(ty, lit),
        Initializer::Value(value) => from_value(ty, value),
        Initializer::EnumItem(item) => from_enum_item(ty, item),
        Initializer::Expression(expr) => from_value(ty, &expr.evaluate()?),
        Initializer::List(list) => from_list(ty, list),
    }
}

// ============================================================================
// Typed operands
// ============================================================================

/// Copy the payload of a constructed `value` into a payload of `ty`.
///
/// Optionals wrap a compatible inner value; variants select the alternative
/// compatible with the value's type.
pub(crate) fn from_value(ty: &TypeRef, value: &Value) -> Result<Payload> {
    let Some(payload) = &value.payload else {
        return Err(Error::violation(
            value.value_type().qualified_path(),
            StateViolation::UnconstructedOperand,
        ));
    };
    if value.value_type().is_compatible(ty) {
        return Ok(payload.duplicate());
    }
    match ty.kind() {
        TypeKind::Optional(Some(inner)) if value.value_type().is_compatible(inner) => {
            Ok(Payload::Optional(Some(Box::new(child(inner, payload.duplicate())))))
        }
        TypeKind::Variant(Some(alternatives)) => match ty.find_inner_type_idx(value.value_type()) {
            Some(idx) => Ok(Payload::Variant(
                idx,
                Box::new(child(&alternatives[idx], payload.duplicate())),
            )),
            None => Err(Error::incompatible(ty.qualified_path(), value.value_type().qualified_path())),
        },
        _ => Err(Error::incompatible(ty.qualified_path(), value.value_type().qualified_path())),
    }
}

fn from_enum_item(ty: &TypeRef, item: &EnumItemRef) -> Result<Payload> {
    match ty.kind() {
        TypeKind::Enum(_) if item.enum_type().is_compatible(ty) => Ok(Payload::Enum(item.index())),
        TypeKind::Optional(Some(inner)) if item.enum_type().is_compatible(inner) => Ok(
            Payload::Optional(Some(Box::new(child(inner, Payload::Enum(item.index()))))),
        ),
        TypeKind::Variant(Some(alternatives)) => match ty.find_inner_type_idx(item.enum_type()) {
            Some(idx) => Ok(Payload::Variant(
                idx,
                Box::new(child(&alternatives[idx], Payload::Enum(item.index()))),
            )),
            None => Err(Error::incompatible(ty.qualified_path(), item.qualified_path())),
        },
        _ => Err(Error::incompatible(ty.qualified_path(), item.qualified_path())),
    }
}

// ============================================================================
// Literals
// ============================================================================

/// Stage a payload of `ty` from a literal, range-checking numbers.
pub(crate) fn from_literal(ty: &TypeRef, lit: &Literal) -> Result<Payload> {
    let path = ty.qualified_path();
    match (ty.kind(), lit) {
        (TypeKind::Bool, Literal::Bool(v)) => Ok(Payload::Bool(*v)),
        (TypeKind::Integral { components, .. }, _) => {
            components_of(ty, *components, lit, |l| int_component(ty, l)).map(Payload::Int)
        }
        (TypeKind::Real { kind, components }, _) => {
            components_of(ty, *components, lit, |l| real_component(ty, *kind, l)).map(Payload::Real)
        }
        (TypeKind::String, Literal::String(v)) => Ok(Payload::String(v.clone())),
        (TypeKind::Optional(_), Literal::Null) => Ok(Payload::Optional(None)),
        (TypeKind::Optional(Some(inner)), _) => Ok(Payload::Optional(Some(Box::new(child(
            inner,
            from_literal(inner, lit)?,
        ))))),
        (TypeKind::Variant(Some(alternatives)), _) => alternatives
            .iter()
            .enumerate()
            .find_map(|(i, alt)| {
                from_literal(alt, lit)
                    .ok()
                    .map(|payload| Payload::Variant(i, Box::new(child(alt, payload))))
            })
            .ok_or_else(|| Error::data(path, format!("no alternative accepts {} literal {}", lit.kind_name(), lit))),
        (TypeKind::Struct(_), Literal::List(items)) => from_members(
            ty,
            items.iter().map(|l| (None, Source::Literal(l))).collect(),
        ),
        (TypeKind::Array(Some(element)), Literal::List(items)) => {
            from_elements(element, items.iter().map(Source::Literal))
        }
        (TypeKind::Enum(_), _) => Err(Error::data(
            path,
            format!("enum values need an enum item, not {} literal {}", lit.kind_name(), lit),
        )),
        _ => Err(Error::incompatible(path, format!("{} literal", lit.kind_name()))),
    }
}

fn components_of<T>(
    ty: &TypeRef,
    components: usize,
    lit: &Literal,
    component: impl Fn(&Literal) -> Result<T>,
) -> Result<Vec<T>> {
    if components == 1 {
        return Ok(vec![component(lit)?]);
    }
    match lit {
        Literal::List(items) if items.len() == components => items.iter().map(component).collect(),
        _ => Err(Error::data(
            ty.qualified_path(),
            format!("expected a list of {} components, got {}", components, lit),
        )),
    }
}

fn int_component(ty: &TypeRef, lit: &Literal) -> Result<i128> {
    let Literal::Int(v) = lit else {
        return Err(Error::incompatible(
            ty.qualified_path(),
            format!("{} literal", lit.kind_name()),
        ));
    };
    let (min, max) = ty.int_range().unwrap_or((i128::MIN, i128::MAX));
    if (min..=max).contains(v) {
        Ok(*v)
    } else {
        Err(Error::data(
            ty.qualified_path(),
            format!("value {} is out of range [{}, {}]", v, min, max),
        ))
    }
}

fn real_component(ty: &TypeRef, kind: RealKind, lit: &Literal) -> Result<f64> {
    let v = lit.as_real().ok_or_else(|| {
        Error::incompatible(ty.qualified_path(), format!("{} literal", lit.kind_name()))
    })?;
    if !v.is_finite() {
        return Err(Error::data(ty.qualified_path(), format!("value {} is not finite", v)));
    }
    let (min, max) = ty.real_range().unwrap_or((f64::MIN, f64::MAX));
    if v < min || v > max {
        return Err(Error::data(
            ty.qualified_path(),
            format!("value {} is out of range [{}, {}]", v, min, max),
        ));
    }
    Ok(kind.quantize(v))
}

// ============================================================================
// Composites
// ============================================================================

/// Struct payload from positional and named sources; omitted members take
/// their defaults.
fn from_members(ty: &TypeRef, sources: Vec<(Option<&str>, Source<'_>)>) -> Result<Payload> {
    let path = ty.qualified_path();
    let defs = ty.all_member_defs();
    let mut slots: Vec<Option<Source<'_>>> = vec![None; defs.len()];
    let mut cursor = 0;

    for (name, source) in sources {
        let idx = match name {
            Some(name) => defs
                .iter()
                .position(|d| d.name() == name)
                .ok_or_else(|| Error::data(path, format!("unknown member '{}'", name)))?,
            None => cursor,
        };
        let Some(slot) = slots.get_mut(idx) else {
            return Err(Error::data(
                path,
                format!("too many initializers for {} member(s)", defs.len()),
            ));
        };
        if slot.is_some() {
            return Err(Error::data(
                path,
                format!("member '{}' is initialized twice", defs[idx].name()),
            ));
        }
        *slot = Some(source);
        cursor = idx + 1;
    }

    defs.iter()
        .zip(slots)
        .map(|(def, slot)| {
            let value = match slot {
                Some(source) => {
                    from_source(def.member_type(), source).map(|p| child(def.member_type(), p))
                }
                None => member_default(def),
            };
            value.map_err(|e| e.in_member(def.qualified_path()))
        })
        .collect::<Result<Vec<_>>>()
        .map(Payload::Struct)
}

fn from_elements<'a>(element: &TypeRef, sources: impl Iterator<Item = Source<'a>>) -> Result<Payload> {
    sources
        .enumerate()
        .map(|(i, source)| {
            from_source(element, source)
                .map(|p| child(element, p))
                .map_err(|e| e.in_member(format!("[{}]", i)))
        })
        .collect::<Result<Vec<_>>>()
        .map(Payload::Array)
}
