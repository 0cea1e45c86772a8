// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Arena of scopes and registered types.
//!
//! Scopes and types are addressed by stable indices ([`ScopeId`],
//! [`TypeId`]); symbols only keep the id of their enclosing scope. Names are
//! unique among the siblings of a scope, scopes and types included.
//!
//! # Example
//!
//! ```
//! use deflang::{Namespace, Type};
//!
//! let mut ns = Namespace::with_builtins();
//! let sensors = ns.add_scope(Namespace::ROOT, "sensors").expect("scope");
//! let flag = ns.add_type(sensors, Type::bool("Enabled")).expect("type");
//!
//! assert_eq!(flag.qualified_path().to_string(), "sensors::Enabled");
//! assert!(ns.resolve_type(sensors, "uint8").is_some());
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::config::{BUILTIN_BOOL, BUILTIN_STRING, MAX_COMPONENTS};
use crate::error::{Error, Result};
use crate::symbol::{self, Symbol, SymbolPath};
use crate::types::numeric::builtin_name;
use crate::types::{IntKind, RealKind, Type, TypeRef};

/// Index of a scope in a [`Namespace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

/// Index of a registered type in a [`Namespace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
struct Scope {
    symbol: Symbol,
    scopes: Vec<ScopeId>,
    types: Vec<TypeId>,
}

#[derive(Debug, Clone, Copy)]
enum Entry {
    Scope(ScopeId),
    Type(TypeId),
}

/// Owner of every registered type.
#[derive(Debug)]
pub struct Namespace {
    scopes: Vec<Scope>,
    types: Vec<TypeRef>,
    index: HashMap<SymbolPath, Entry>,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

impl Namespace {
    /// The unnamed root scope.
    pub const ROOT: ScopeId = ScopeId(0);

    /// Namespace with an empty root scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                symbol: Symbol::root(),
                scopes: Vec::new(),
                types: Vec::new(),
            }],
            types: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Namespace holding the built-in types in its root scope.
    pub fn with_builtins() -> Self {
        let mut ns = Self::new();
        ns.register(Self::ROOT, Type::bool(BUILTIN_BOOL));
        ns.register(Self::ROOT, Type::string(BUILTIN_STRING));
        for components in 1..=MAX_COMPONENTS {
            for kind in IntKind::ALL {
                let name = builtin_name(kind.name(), kind.vec_suffix(), components);
                ns.register(Self::ROOT, Type::integral(name, kind, components));
            }
            for kind in RealKind::ALL {
                let name = builtin_name(kind.name(), kind.vec_suffix(), components);
                ns.register(Self::ROOT, Type::real(name, kind, components));
            }
        }
        log::debug!("[deflang] registered {} builtin types", ns.type_count());
        ns
    }

    /// Create a child scope of `parent`.
    pub fn add_scope(&mut self, parent: ScopeId, name: &str) -> Result<ScopeId> {
        let parent_path = self.checked_scope_path(parent)?.clone();
        let path = self.checked_free_path(&parent_path, name)?;

        let id = ScopeId(self.next_index(self.scopes.len())?);
        let mut sym = Symbol::new(name);
        sym.attach(Some(parent), &parent_path);
        self.scopes.push(Scope {
            symbol: sym,
            scopes: Vec::new(),
            types: Vec::new(),
        });
        self.scopes[parent.index()].scopes.push(id);
        self.index.insert(path, Entry::Scope(id));
        Ok(id)
    }

    /// Register and seal `ty` in `scope`.
    ///
    /// The namespace is unchanged when the name is taken or the type is invalid.
    pub fn add_type(&mut self, scope: ScopeId, mut ty: Type) -> Result<TypeRef> {
        let scope_path = self.checked_scope_path(scope)?.clone();
        self.checked_free_path(&scope_path, ty.name())?;

        let id = TypeId(self.next_index(self.types.len())?);
        ty.attach(scope, &scope_path, id);
        ty.validate()?;
        Ok(self.insert(scope, ty))
    }

    /// Registered type at the qualified `path`.
    pub fn find_type(&self, path: impl Into<SymbolPath>) -> Option<TypeRef> {
        match self.index.get(&path.into())? {
            Entry::Type(id) => self.type_by_id(*id).cloned(),
            Entry::Scope(_) => None,
        }
    }

    /// Scope at the qualified `path`; the empty path is the root.
    pub fn find_scope(&self, path: impl Into<SymbolPath>) -> Option<ScopeId> {
        let path = path.into();
        if path.is_empty() {
            return Some(Self::ROOT);
        }
        match self.index.get(&path)? {
            Entry::Scope(id) => Some(*id),
            Entry::Type(_) => None,
        }
    }

    /// Resolve a (possibly qualified) type name as seen from `scope`.
    ///
    /// Searches `scope` first, then its enclosing scopes up to the root.
    pub fn resolve_type(&self, scope: ScopeId, name: &str) -> Option<TypeRef> {
        let relative = SymbolPath::parse(name);
        let mut base = self.scope_path(scope)?.clone();
        loop {
            let candidate = relative
                .segments()
                .iter()
                .fold(base.clone(), |path, segment| path.join(segment));
            if let Some(found) = self.find_type(candidate) {
                return Some(found);
            }
            base = base.parent()?;
        }
    }

    pub fn type_by_id(&self, id: TypeId) -> Option<&TypeRef> {
        self.types.get(id.index())
    }

    pub fn scope_path(&self, id: ScopeId) -> Option<&SymbolPath> {
        self.scopes.get(id.index()).map(|s| s.symbol.qualified_path())
    }

    /// Enclosing scope of `id` (`None` for the root).
    pub fn scope_parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes.get(id.index())?.symbol.parent()
    }

    /// Types registered directly in `scope`, in registration order.
    pub fn scope_types(&self, scope: ScopeId) -> impl Iterator<Item = &TypeRef> {
        self.scopes
            .get(scope.index())
            .into_iter()
            .flat_map(|s| s.types.iter())
            .filter_map(|id| self.type_by_id(*id))
    }

    /// All registered types, in registration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeRef> {
        self.types.iter()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    // ---- internals ----

    fn register(&mut self, scope: ScopeId, mut ty: Type) -> TypeRef {
        let scope_path = self.scopes[scope.index()].symbol.qualified_path().clone();
        let id = TypeId(self.types.len() as u32);
        ty.attach(scope, &scope_path, id);
        self.insert(scope, ty)
    }

    fn insert(&mut self, scope: ScopeId, ty: Type) -> TypeRef {
        let id = ty.id();
        let path = ty.qualified_path().clone();
        let sealed = TypeRef::from_type(ty);
        if let Some(id) = id {
            self.scopes[scope.index()].types.push(id);
            self.index.insert(path.clone(), Entry::Type(id));
        }
        self.types.push(sealed.clone());
        log::debug!("[deflang] registered type '{}' ({})", path, sealed.tag());
        sealed
    }

    fn checked_scope_path(&self, scope: ScopeId) -> Result<&SymbolPath> {
        self.scope_path(scope)
            .ok_or_else(|| Error::schema(format!("scope #{}", scope.0), "unknown scope"))
    }

    fn checked_free_path(&self, parent: &SymbolPath, name: &str) -> Result<SymbolPath> {
        let path = parent.join(name);
        symbol::validate_name(name).map_err(|reason| Error::schema(&path, reason))?;
        if self.index.contains_key(&path) {
            return Err(Error::schema(&path, "name is already declared in this scope"));
        }
        Ok(path)
    }

    fn next_index(&self, len: usize) -> Result<u32> {
        u32::try_from(len).map_err(|_| Error::schema("namespace", "too many entries"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kind;

    #[test]
    fn test_builtins() {
        let ns = Namespace::with_builtins();
        // bool, string, then 10 numeric kinds for each of the 4 component counts
        assert_eq!(ns.type_count(), 2 + 10 * 4);

        for name in ["bool", "int8", "uint64", "float", "double", "string", "vec2s8", "vec3f", "vec4d", "vec4u64"] {
            assert!(ns.find_type(name).is_some(), "missing builtin {}", name);
        }
        let vec3f = ns.find_type("vec3f").expect("vec3f");
        assert_eq!(vec3f.tag(), Kind::Real);
        assert_eq!(vec3f.components(), Some(3));
        assert!(ns.find_type("vec1f").is_none());
    }

    #[test]
    fn test_scopes_and_lookup() {
        let mut ns = Namespace::with_builtins();
        let outer = ns.add_scope(Namespace::ROOT, "outer").expect("outer");
        let inner = ns.add_scope(outer, "inner").expect("inner");
        assert_eq!(ns.scope_path(inner).map(ToString::to_string), Some("outer::inner".into()));
        assert_eq!(ns.scope_parent(inner), Some(outer));
        assert_eq!(ns.scope_parent(Namespace::ROOT), None);

        let t = ns.add_type(outer, Type::bool("Flag")).expect("Flag");
        assert_eq!(t.qualified_path().to_string(), "outer::Flag");
        assert_eq!(t.symbol().parent(), Some(outer));

        assert!(ns.find_type("outer::Flag").is_some_and(|f| f.ptr_eq(&t)));
        assert!(ns.resolve_type(inner, "Flag").is_some_and(|f| f.ptr_eq(&t)));
        assert!(ns.resolve_type(inner, "outer::Flag").is_some());
        assert!(ns.resolve_type(inner, "int32").is_some());
        assert!(ns.resolve_type(Namespace::ROOT, "Flag").is_none());
        assert!(ns.find_type("outer").is_none());
        assert_eq!(ns.find_scope("outer::inner"), Some(inner));
        assert_eq!(ns.find_scope(""), Some(Namespace::ROOT));
        assert_eq!(ns.find_scope("outer::Flag"), None);
        assert_eq!(ns.find_scope("missing"), None);

        let id = t.id().expect("registered");
        assert!(ns.type_by_id(id).is_some_and(|f| f.ptr_eq(&t)));
        assert_eq!(ns.scope_types(outer).count(), 1);
    }

    #[test]
    fn test_duplicate_names_leave_namespace_unchanged() {
        let mut ns = Namespace::new();
        let scope = ns.add_scope(Namespace::ROOT, "a").expect("a");
        ns.add_type(scope, Type::bool("B")).expect("B");

        assert!(ns.add_type(scope, Type::string("B")).is_err());
        assert!(ns.add_scope(scope, "B").is_err());
        assert!(ns.add_type(Namespace::ROOT, Type::bool("a")).is_err());
        assert!(ns.add_type(scope, Type::array("Pending")).is_err());
        assert!(ns.add_scope(Namespace::ROOT, "bad name").is_err());
        assert_eq!(ns.type_count(), 1);
        assert!(ns.find_type("a::Pending").is_none());
    }

    #[test]
    fn test_registration_relinks_members() {
        let mut ns = Namespace::with_builtins();
        let int32 = ns.find_type("int32").expect("int32");
        let scope = ns.add_scope(Namespace::ROOT, "geo").expect("geo");

        let mut point = Type::structure("Point");
        point
            .add_member_def(crate::types::MemberDef::new("x", &int32))
            .expect("x");
        let point = ns.add_type(scope, point).expect("Point");

        assert_eq!(
            point.member_def(0).map(|m| m.qualified_path().to_string()),
            Some("geo::Point::x".into())
        );
    }
}
