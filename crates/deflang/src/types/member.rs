// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct member definitions.

use std::fmt;

use crate::error::{Error, Result};
use crate::symbol::{Symbol, SymbolPath};
use crate::types::TypeRef;
use crate::value::Value;

/// A named field of a struct type.
pub struct MemberDef {
    symbol: Symbol,
    ty: TypeRef,
    default_value: Option<Value>,
}

impl MemberDef {
    /// Member defaulting to its type's default value.
    pub fn new(name: impl Into<String>, ty: &TypeRef) -> Self {
        Self {
            symbol: Symbol::new(name),
            ty: ty.clone(),
            default_value: None,
        }
    }

    /// Member with an explicit default value.
    ///
    /// The default must be constructed and of a type compatible with `ty`.
    pub fn with_default(name: impl Into<String>, ty: &TypeRef, default_value: Value) -> Result<Self> {
        let symbol = Symbol::new(name);
        if !default_value.is_constructed() {
            return Err(Error::schema(
                symbol.qualified_path(),
                "default value is not constructed",
            ));
        }
        if !default_value.value_type().is_compatible(ty) {
            return Err(Error::schema(
                symbol.qualified_path(),
                format!(
                    "default value of type '{}' does not match member type '{}'",
                    default_value.value_type().qualified_path(),
                    ty.qualified_path()
                ),
            ));
        }
        Ok(Self {
            symbol,
            ty: ty.clone(),
            default_value: Some(default_value),
        })
    }

    pub fn name(&self) -> &str {
        self.symbol.name()
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn qualified_path(&self) -> &SymbolPath {
        self.symbol.qualified_path()
    }

    pub fn member_type(&self) -> &TypeRef {
        &self.ty
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub(crate) fn attach(&mut self, owner: &SymbolPath) {
        self.symbol.attach(None, owner);
    }
}

impl Clone for MemberDef {
    fn clone(&self) -> Self {
        Self {
            symbol: self.symbol.clone(),
            ty: self.ty.clone(),
            default_value: self.default_value.as_ref().map(Value::duplicate),
        }
    }
}

impl fmt::Debug for MemberDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDef")
            .field("name", &self.symbol.name())
            .field("type", &self.ty.qualified_path().to_string())
            .field("has_default", &self.default_value.is_some())
            .finish()
    }
}

/// Ordered member definitions with unique names.
#[derive(Debug, Clone, Default)]
pub struct MemberDefContainer {
    defs: Vec<MemberDef>,
}

impl MemberDefContainer {
    pub fn member_def_count(&self) -> usize {
        self.defs.len()
    }

    pub fn member_def(&self, index: usize) -> Option<&MemberDef> {
        self.defs.get(index)
    }

    pub fn find_member_def_idx_by_name(&self, name: &str) -> Option<usize> {
        self.defs.iter().position(|d| d.name() == name)
    }

    pub fn find_member_def_by_name(&self, name: &str) -> Option<&MemberDef> {
        self.defs.iter().find(|d| d.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemberDef> {
        self.defs.iter()
    }

    pub(crate) fn add_member_def(&mut self, def: MemberDef) -> Result<(), String> {
        if self.find_member_def_idx_by_name(def.name()).is_some() {
            return Err(format!("member '{}' is already declared", def.name()));
        }
        self.defs.push(def);
        Ok(())
    }

    pub(crate) fn attach_all(&mut self, owner: &SymbolPath) {
        for def in &mut self.defs {
            def.attach(owner);
        }
    }
}

/// Struct layout: optional base struct followed by the struct's own members.
#[derive(Debug, Clone, Default)]
pub struct StructDef {
    base: Option<TypeRef>,
    members: MemberDefContainer,
}

impl StructDef {
    pub fn base(&self) -> Option<&TypeRef> {
        self.base.as_ref()
    }

    /// Members declared on this struct, excluding the base.
    pub fn own_members(&self) -> &MemberDefContainer {
        &self.members
    }

    /// All members, base members first.
    pub fn all_member_defs(&self) -> Vec<&MemberDef> {
        let mut defs = self
            .base
            .as_ref()
            .and_then(|b| b.struct_def())
            .map(StructDef::all_member_defs)
            .unwrap_or_default();
        defs.extend(self.members.iter());
        defs
    }

    pub fn member_def_count(&self) -> usize {
        self.base
            .as_ref()
            .and_then(|b| b.struct_def())
            .map_or(0, StructDef::member_def_count)
            + self.members.member_def_count()
    }

    pub fn member_def(&self, index: usize) -> Option<&MemberDef> {
        self.all_member_defs().get(index).copied()
    }

    pub fn find_member_def_idx_by_name(&self, name: &str) -> Option<usize> {
        self.all_member_defs().iter().position(|d| d.name() == name)
    }

    pub fn find_member_def_by_name(&self, name: &str) -> Option<&MemberDef> {
        self.all_member_defs().into_iter().find(|d| d.name() == name)
    }

    pub(crate) fn set_base(&mut self, base: TypeRef) -> Result<(), String> {
        if self.base.is_some() {
            return Err("base struct is already set".to_string());
        }
        let Some(base_def) = base.struct_def() else {
            return Err(format!(
                "base '{}' is not a struct",
                base.qualified_path()
            ));
        };
        if let Some(clash) = self
            .members
            .iter()
            .find(|d| base_def.find_member_def_idx_by_name(d.name()).is_some())
        {
            return Err(format!(
                "member '{}' is already declared by base '{}'",
                clash.name(),
                base.qualified_path()
            ));
        }
        self.base = Some(base);
        Ok(())
    }

    pub(crate) fn add_member_def(&mut self, def: MemberDef) -> Result<(), String> {
        if let Some(base) = &self.base {
            if base
                .struct_def()
                .and_then(|b| b.find_member_def_idx_by_name(def.name()))
                .is_some()
            {
                return Err(format!(
                    "member '{}' is already declared by base '{}'",
                    def.name(),
                    base.qualified_path()
                ));
            }
        }
        self.members.add_member_def(def)
    }

    pub(crate) fn attach_members(&mut self, owner: &SymbolPath) {
        self.members.attach_all(owner);
    }
}
