// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema types.
//!
//! A [`Type`] is mutable while it is being defined (attributes, members, enum
//! items, template arguments). Sealing it, either through
//! [`Namespace::add_type`](crate::Namespace::add_type) or [`Type::seal`],
//! validates the definition and turns it into a shared, immutable [`TypeRef`].
//!
//! # Example
//!
//! ```
//! use deflang::{MemberDef, Namespace, Type};
//!
//! let mut ns = Namespace::with_builtins();
//! let int32 = ns.find_type("int32").expect("builtin");
//!
//! let mut point = Type::structure("Point");
//! point.add_member_def(MemberDef::new("x", &int32)).expect("x");
//! point.add_member_def(MemberDef::new("y", &int32)).expect("y");
//! let point = ns.add_type(Namespace::ROOT, point).expect("register");
//!
//! assert_eq!(point.member_def_count(), 2);
//! assert_eq!(int32.int_range(), Some((i128::from(i32::MIN), i128::from(i32::MAX))));
//! ```

pub mod enumeration;
pub mod member;
pub mod numeric;

pub use enumeration::{EnumDef, EnumItem, EnumItemRef};
pub use member::{MemberDef, MemberDefContainer, StructDef};
pub use numeric::{IntKind, RealKind};

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::attribute::{Attribute, AttributeContainer, AttributeValue};
use crate::config::{
    ATTR_DECIMALS, ATTR_MAX, ATTR_MIN, ATTR_NATIVE_TYPE, ATTR_UI_NAME, MAX_COMPONENTS, MAX_DECIMALS,
};
use crate::error::{Error, Result};
use crate::initializer::Literal;
use crate::namespace::{ScopeId, TypeId};
use crate::symbol::{self, Symbol, SymbolPath};
use crate::value::Value;

// ============================================================================
// Kinds
// ============================================================================

/// Kind-specific definition of a type.
///
/// Template slots (`Optional`, `Variant`, `Array`) are `None` until
/// [`Type::init`] succeeds.
#[derive(Debug, Clone)]
pub enum TypeKind {
    Bool,
    Integral { kind: IntKind, components: usize },
    Real { kind: RealKind, components: usize },
    String,
    Enum(EnumDef),
    Optional(Option<TypeRef>),
    Variant(Option<Vec<TypeRef>>),
    Struct(StructDef),
    /// Dynamic-length sequence.
    Array(Option<TypeRef>),
}

/// Payload-free tag of a [`TypeKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Integral,
    Real,
    String,
    Enum,
    Optional,
    Variant,
    Struct,
    Array,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Integral => "integral",
            Self::Real => "real",
            Self::String => "string",
            Self::Enum => "enum",
            Self::Optional => "optional",
            Self::Variant => "variant",
            Self::Struct => "struct",
            Self::Array => "array",
        };
        f.write_str(name)
    }
}

impl TypeKind {
    pub fn tag(&self) -> Kind {
        match self {
            Self::Bool => Kind::Bool,
            Self::Integral { .. } => Kind::Integral,
            Self::Real { .. } => Kind::Real,
            Self::String => Kind::String,
            Self::Enum(_) => Kind::Enum,
            Self::Optional(_) => Kind::Optional,
            Self::Variant(_) => Kind::Variant,
            Self::Struct(_) => Kind::Struct,
            Self::Array(_) => Kind::Array,
        }
    }

    /// True for template kinds (`Optional`, `Variant`, `Array`).
    pub fn is_template(&self) -> bool {
        matches!(self, Self::Optional(_) | Self::Variant(_) | Self::Array(_))
    }
}

/// Argument passed to [`Type::init`].
#[derive(Debug, Clone)]
pub enum TemplateArgument {
    Type(TypeRef),
    Literal(Literal),
}

impl From<TypeRef> for TemplateArgument {
    fn from(ty: TypeRef) -> Self {
        Self::Type(ty)
    }
}

impl From<&TypeRef> for TemplateArgument {
    fn from(ty: &TypeRef) -> Self {
        Self::Type(ty.clone())
    }
}

impl From<Literal> for TemplateArgument {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}

// ============================================================================
// Type
// ============================================================================

/// A schema type under definition, or the content of a sealed [`TypeRef`].
#[derive(Debug)]
pub struct Type {
    symbol: Symbol,
    id: Option<TypeId>,
    kind: TypeKind,
    attributes: AttributeContainer,
    aliased: Option<TypeRef>,
}

impl Type {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            symbol: Symbol::new(name),
            id: None,
            kind,
            attributes: AttributeContainer::default(),
            aliased: None,
        }
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Bool)
    }

    /// Integral scalar (`components == 1`) or vector type.
    pub fn integral(name: impl Into<String>, kind: IntKind, components: usize) -> Self {
        Self::new(name, TypeKind::Integral { kind, components })
    }

    /// Real scalar (`components == 1`) or vector type.
    pub fn real(name: impl Into<String>, kind: RealKind, components: usize) -> Self {
        Self::new(name, TypeKind::Real { kind, components })
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::String)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Enum(EnumDef::default()))
    }

    /// `Optional<T>` template; call [`Type::init`] before sealing.
    pub fn optional(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Optional(None))
    }

    /// `Variant<T1..Tn>` template; call [`Type::init`] before sealing.
    pub fn variant(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Variant(None))
    }

    pub fn structure(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Struct(StructDef::default()))
    }

    /// `Array<T>` template; call [`Type::init`] before sealing.
    pub fn array(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Array(None))
    }

    // ---- identity ----

    pub fn name(&self) -> &str {
        self.symbol.name()
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn qualified_path(&self) -> &SymbolPath {
        self.symbol.qualified_path()
    }

    /// Arena id, once registered in a namespace.
    pub fn id(&self) -> Option<TypeId> {
        self.id
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn tag(&self) -> Kind {
        self.kind.tag()
    }

    /// Source type, when this type is an alias.
    pub fn aliased_type(&self) -> Option<&TypeRef> {
        self.aliased.as_ref()
    }

    // ---- attributes ----

    pub fn attributes(&self) -> &AttributeContainer {
        &self.attributes
    }

    /// Name shown by front-ends: the `ui_name` attribute or the type name.
    pub fn ui_name(&self) -> &str {
        self.attributes
            .get(ATTR_UI_NAME)
            .and_then(Attribute::as_str)
            .unwrap_or_else(|| self.name())
    }

    /// Host-side type name from the `native_type` attribute.
    pub fn native_type(&self) -> Option<String> {
        self.attributes
            .get(ATTR_NATIVE_TYPE)
            .map(|attr| match attr.value() {
                AttributeValue::Literal(Literal::String(s)) => s.clone(),
                AttributeValue::Literal(other) => other.to_string(),
                AttributeValue::Symbol(path) => path.to_string(),
            })
    }

    /// Check an attribute against the vocabulary of this kind of type.
    pub fn validate_attribute(&self, attribute: &Attribute) -> Result<()> {
        let fail = |reason: String| Err(Error::schema(self.qualified_path(), reason));
        let literal = attribute.as_literal();

        match attribute.name() {
            ATTR_UI_NAME => match literal {
                Some(Literal::String(_)) => Ok(()),
                _ => fail(format!("attribute '{}' expects a string", ATTR_UI_NAME)),
            },
            ATTR_NATIVE_TYPE => match attribute.value() {
                AttributeValue::Literal(Literal::String(_)) | AttributeValue::Symbol(_) => Ok(()),
                AttributeValue::Literal(_) => fail(format!(
                    "attribute '{}' expects a string or a symbol",
                    ATTR_NATIVE_TYPE
                )),
            },
            name @ (ATTR_MIN | ATTR_MAX) => match (&self.kind, literal) {
                (TypeKind::Integral { kind, .. }, Some(Literal::Int(v))) => {
                    if kind.contains(*v) {
                        Ok(())
                    } else {
                        fail(format!(
                            "attribute '{}' value {} is out of the range of {}",
                            name,
                            v,
                            kind.name()
                        ))
                    }
                }
                (TypeKind::Integral { .. }, _) => {
                    fail(format!("attribute '{}' expects an integer", name))
                }
                (TypeKind::Real { .. }, Some(lit @ (Literal::Int(_) | Literal::Real(_)))) => {
                    match lit.as_real() {
                        Some(v) if v.is_finite() => Ok(()),
                        _ => fail(format!("attribute '{}' must be finite", name)),
                    }
                }
                (TypeKind::Real { .. }, _) => fail(format!("attribute '{}' expects a number", name)),
                _ => fail(format!("unknown attribute '{}' for {} type", name, self.tag())),
            },
            ATTR_DECIMALS => match (&self.kind, literal) {
                (TypeKind::Real { .. }, Some(Literal::Int(v))) if (0..=MAX_DECIMALS).contains(v) => {
                    Ok(())
                }
                (TypeKind::Real { .. }, _) => fail(format!(
                    "attribute '{}' expects an integer in 0..={}",
                    ATTR_DECIMALS, MAX_DECIMALS
                )),
                _ => fail(format!(
                    "unknown attribute '{}' for {} type",
                    ATTR_DECIMALS,
                    self.tag()
                )),
            },
            other => fail(format!("unknown attribute '{}' for {} type", other, self.tag())),
        }
    }

    /// Validate and store an attribute. The attribute set is unchanged on error.
    pub fn add_attribute(&mut self, attribute: Attribute) -> Result<()> {
        self.validate_attribute(&attribute)?;
        if self.attributes.contains(attribute.name()) {
            return Err(Error::schema(
                self.qualified_path(),
                format!("attribute '{}' is already set", attribute.name()),
            ));
        }
        self.check_range_with(&attribute)?;
        self.attributes
            .insert(attribute)
            .map_err(|reason| Error::schema(self.qualified_path(), reason))
    }

    fn check_range_with(&self, attribute: &Attribute) -> Result<()> {
        let (min, max) = match attribute.name() {
            ATTR_MIN => (attribute.as_literal(), self.attr_literal(ATTR_MAX)),
            ATTR_MAX => (self.attr_literal(ATTR_MIN), attribute.as_literal()),
            _ => return Ok(()),
        };
        let (Some(min), Some(max)) = (min, max) else {
            return Ok(());
        };
        let ordered = match self.kind {
            TypeKind::Integral { .. } => min.as_int() <= max.as_int(),
            _ => min.as_real() <= max.as_real(),
        };
        if ordered {
            Ok(())
        } else {
            Err(Error::schema(
                self.qualified_path(),
                format!("'{}' ({}) is greater than '{}' ({})", ATTR_MIN, min, ATTR_MAX, max),
            ))
        }
    }

    fn attr_literal(&self, name: &str) -> Option<&Literal> {
        self.attributes.get(name).and_then(Attribute::as_literal)
    }

    // ---- numeric ----

    /// Number of components of numeric types.
    pub fn components(&self) -> Option<usize> {
        match self.kind {
            TypeKind::Integral { components, .. } | TypeKind::Real { components, .. } => {
                Some(components)
            }
            _ => None,
        }
    }

    /// Effective inclusive range of integral types (`min`/`max` or the kind's bounds).
    pub fn int_range(&self) -> Option<(i128, i128)> {
        let TypeKind::Integral { kind, .. } = self.kind else {
            return None;
        };
        let (lo, hi) = kind.bounds();
        Some((
            self.attr_literal(ATTR_MIN).and_then(Literal::as_int).unwrap_or(lo),
            self.attr_literal(ATTR_MAX).and_then(Literal::as_int).unwrap_or(hi),
        ))
    }

    /// Effective inclusive range of real types.
    pub fn real_range(&self) -> Option<(f64, f64)> {
        let TypeKind::Real { kind, .. } = self.kind else {
            return None;
        };
        let limit = kind.max_magnitude();
        Some((
            self.attr_literal(ATTR_MIN).and_then(Literal::as_real).unwrap_or(-limit),
            self.attr_literal(ATTR_MAX).and_then(Literal::as_real).unwrap_or(limit),
        ))
    }

    /// Decimals used by UI strings of real types.
    pub fn decimals(&self) -> Option<usize> {
        self.attr_literal(ATTR_DECIMALS)
            .and_then(Literal::as_int)
            .and_then(|v| usize::try_from(v).ok())
    }

    // ---- templates ----

    /// Instantiate a template with its arguments. Callable once.
    pub fn init(&mut self, arguments: &[TemplateArgument]) -> Result<()> {
        self.ensure_not_alias("instantiate")?;
        let path = self.symbol.qualified_path().clone();
        if !self.kind.is_template() {
            return Err(Error::schema(&path, format!("{} type is not a template", self.tag())));
        }
        if self.inner_type_count() > 0 {
            return Err(Error::schema(&path, "template is already instantiated"));
        }

        let mut types = arguments
            .iter()
            .enumerate()
            .map(|(i, arg)| match arg {
                TemplateArgument::Type(ty) => Ok(ty.clone()),
                TemplateArgument::Literal(lit) => Err(Error::schema(
                    &path,
                    format!("argument {}: expected type, got {} literal", i, lit.kind_name()),
                )),
            })
            .collect::<Result<Vec<_>>>()?;
        let count = types.len();

        match &mut self.kind {
            TypeKind::Optional(slot) | TypeKind::Array(slot) => {
                if count != 1 {
                    return Err(Error::schema(
                        &path,
                        format!("expected exactly one type argument, got {}", count),
                    ));
                }
                *slot = types.pop();
            }
            TypeKind::Variant(slot) => {
                if count < 2 {
                    return Err(Error::schema(
                        &path,
                        format!("variants need more than one type argument, got {}", count),
                    ));
                }
                for (i, ty) in types.iter().enumerate() {
                    if types[..i].iter().any(|prev| prev.is_compatible(ty)) {
                        return Err(Error::schema(
                            &path,
                            format!("duplicate alternative '{}'", ty.qualified_path()),
                        ));
                    }
                }
                *slot = Some(types);
            }
            _ => {}
        }

        log::debug!("[deflang] instantiated template '{}' with {} argument(s)", path, count);
        Ok(())
    }

    /// Number of template arguments (0 for non-templates and uninstantiated templates).
    pub fn inner_type_count(&self) -> usize {
        match &self.kind {
            TypeKind::Optional(slot) | TypeKind::Array(slot) => usize::from(slot.is_some()),
            TypeKind::Variant(slot) => slot.as_ref().map_or(0, Vec::len),
            _ => 0,
        }
    }

    pub fn inner_type(&self, index: usize) -> Option<&TypeRef> {
        match &self.kind {
            TypeKind::Optional(slot) | TypeKind::Array(slot) => {
                slot.as_ref().filter(|_| index == 0)
            }
            TypeKind::Variant(slot) => slot.as_ref().and_then(|types| types.get(index)),
            _ => None,
        }
    }

    /// Index of the template argument compatible with `ty`.
    pub fn find_inner_type_idx(&self, ty: &TypeRef) -> Option<usize> {
        (0..self.inner_type_count()).find(|&i| self.inner_type(i).is_some_and(|t| t.is_compatible(ty)))
    }

    // ---- enums ----

    pub fn enum_def(&self) -> Option<&EnumDef> {
        match &self.kind {
            TypeKind::Enum(def) => Some(def),
            _ => None,
        }
    }

    pub fn add_item(&mut self, item: EnumItem) -> Result<()> {
        self.ensure_not_alias("add items to")?;
        let path = self.symbol.qualified_path().clone();
        symbol::validate_name(item.name()).map_err(|reason| Error::schema(&path, reason))?;
        match &mut self.kind {
            TypeKind::Enum(def) => def
                .add_item(item)
                .map(|_| ())
                .map_err(|reason| Error::schema(&path, reason)),
            _ => Err(Error::schema(&path, "only enum types have items")),
        }
    }

    pub fn set_default_item(&mut self, name: &str) -> Result<()> {
        self.ensure_not_alias("set the default item of")?;
        let path = self.symbol.qualified_path().clone();
        match &mut self.kind {
            TypeKind::Enum(def) => def
                .set_default_item(name)
                .map_err(|reason| Error::schema(&path, reason)),
            _ => Err(Error::schema(&path, "only enum types have items")),
        }
    }

    // ---- structs ----

    pub fn struct_def(&self) -> Option<&StructDef> {
        match &self.kind {
            TypeKind::Struct(def) => Some(def),
            _ => None,
        }
    }

    /// Declare a member. Names are unique across the base struct and this struct.
    pub fn add_member_def(&mut self, mut member: MemberDef) -> Result<()> {
        self.ensure_not_alias("add members to")?;
        let path = self.symbol.qualified_path().clone();
        symbol::validate_name(member.name()).map_err(|reason| Error::schema(&path, reason))?;
        member.attach(&path);
        match &mut self.kind {
            TypeKind::Struct(def) => def
                .add_member_def(member)
                .map_err(|reason| Error::schema(&path, reason)),
            _ => Err(Error::schema(&path, "only struct types have members")),
        }
    }

    /// Inherit the members of `base`, which must be a struct.
    pub fn set_base(&mut self, base: &TypeRef) -> Result<()> {
        self.ensure_not_alias("set the base of")?;
        let path = self.symbol.qualified_path().clone();
        match &mut self.kind {
            TypeKind::Struct(def) => def
                .set_base(base.clone())
                .map_err(|reason| Error::schema(&path, reason)),
            _ => Err(Error::schema(&path, "only struct types have a base")),
        }
    }

    /// Member count, base members included.
    pub fn member_def_count(&self) -> usize {
        self.struct_def().map_or(0, StructDef::member_def_count)
    }

    pub fn member_def(&self, index: usize) -> Option<&MemberDef> {
        self.struct_def()?.member_def(index)
    }

    pub fn find_member_def_idx_by_name(&self, name: &str) -> Option<usize> {
        self.struct_def()?.find_member_def_idx_by_name(name)
    }

    pub fn find_member_def_by_name(&self, name: &str) -> Option<&MemberDef> {
        self.struct_def()?.find_member_def_by_name(name)
    }

    /// All members in construction order, base members first.
    pub fn all_member_defs(&self) -> Vec<&MemberDef> {
        self.struct_def().map(StructDef::all_member_defs).unwrap_or_default()
    }

    // ---- sealing ----

    /// Validate the definition and seal it into an anonymous [`TypeRef`].
    pub fn seal(self) -> Result<TypeRef> {
        self.validate()?;
        Ok(TypeRef::from_type(self))
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let path = self.qualified_path();
        symbol::validate_name(self.name()).map_err(|reason| Error::schema(path, reason))?;

        if let Some(components) = self.components() {
            if !(1..=MAX_COMPONENTS).contains(&components) {
                return Err(Error::schema(
                    path,
                    format!("component count {} is outside 1..={}", components, MAX_COMPONENTS),
                ));
            }
        }
        if self.kind.is_template() && self.inner_type_count() == 0 {
            return Err(Error::schema(path, "template is not instantiated"));
        }
        if self.enum_def().is_some_and(|def| def.item_count() == 0) {
            return Err(Error::schema(path, "enum has no items"));
        }
        Ok(())
    }

    pub(crate) fn attach(&mut self, scope: ScopeId, scope_path: &SymbolPath, id: TypeId) {
        self.symbol.attach(Some(scope), scope_path);
        self.id = Some(id);
        self.relink_members();
    }

    /// Point own member symbols at this type's current path.
    fn relink_members(&mut self) {
        let path = self.symbol.qualified_path().clone();
        if let TypeKind::Struct(def) = &mut self.kind {
            def.attach_members(&path);
        }
    }

    fn ensure_not_alias(&self, action: &str) -> Result<()> {
        match &self.aliased {
            Some(source) => Err(Error::schema(
                self.qualified_path(),
                format!("cannot {} an alias of '{}'", action, source.qualified_path()),
            )),
            None => Ok(()),
        }
    }
}

// ============================================================================
// TypeRef
// ============================================================================

/// Sealed, shared handle to a [`Type`].
///
/// Equality is type compatibility: two handles are equal when they resolve,
/// through aliases, to the same sealed type.
#[derive(Clone)]
pub struct TypeRef(Arc<Type>);

impl TypeRef {
    pub(crate) fn from_type(ty: Type) -> Self {
        Self(Arc::new(ty))
    }

    /// True when both handles point to the same sealed type (aliases not unwrapped).
    pub fn ptr_eq(&self, other: &TypeRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Innermost source type of an alias chain, or `self`.
    pub fn resolved(&self) -> &TypeRef {
        let mut ty = self;
        while let Some(source) = &ty.0.aliased {
            ty = source;
        }
        ty
    }

    /// Alias-unwrapped identity.
    pub fn is_compatible(&self, other: &TypeRef) -> bool {
        self.resolved().ptr_eq(other.resolved())
    }

    /// Unconstructed value of this type.
    pub fn create_value(&self) -> Value {
        Value::new(self)
    }

    /// Reference to the enum item `name`.
    pub fn enum_item(&self, name: &str) -> Option<EnumItemRef> {
        EnumItemRef::new(self, name)
    }

    /// Structurally identical, independent type named `name`.
    ///
    /// The clone is not compatible with `self`; template arguments still refer
    /// to the same argument types.
    pub fn clone_named(&self, name: impl Into<String>) -> Type {
        let source = self.resolved();
        let mut clone = Type {
            symbol: Symbol::new(name),
            id: None,
            kind: source.kind.clone(),
            attributes: self.attributes.clone(),
            aliased: None,
        };
        clone.relink_members();
        clone
    }

    /// Name-distinct type behaving exactly like `self`. Drops `native_type`.
    pub fn alias(&self, name: impl Into<String>) -> Type {
        let mut attributes = self.attributes.clone();
        attributes.remove(ATTR_NATIVE_TYPE);
        let mut alias = Type {
            symbol: Symbol::new(name),
            id: None,
            kind: self.kind.clone(),
            attributes,
            aliased: Some(self.clone()),
        };
        alias.relink_members();
        alias
    }
}

impl Deref for TypeRef {
    type Target = Type;

    fn deref(&self) -> &Type {
        &self.0
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.is_compatible(other)
    }
}

impl Eq for TypeRef {}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.qualified_path())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_path())
    }
}
