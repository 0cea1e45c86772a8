// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # deflang
//!
//! Runtime type and value reflection engine for configuration and telemetry
//! schemas.
//!
//! A host defines named types (booleans, integral and real scalars and
//! vectors, strings, enums, optionals, variants, structs and arrays),
//! registers them in a [`Namespace`], then creates [`Value`]s from them.
//! Values follow a strict construct-once / assign-in-place protocol, compare
//! structurally, serialize to and from [`serde_json::Value`] documents, and
//! can be navigated with [`ValueSelector`]s.
//!
//! ## Quick start
//!
//! ```
//! use deflang::{InitializerList, MemberDef, Namespace, Type, ValueSelector};
//! use serde_json::json;
//!
//! let mut ns = Namespace::with_builtins();
//! let int32 = ns.find_type("int32").expect("builtin");
//!
//! let mut point = Type::structure("Point");
//! point.add_member_def(MemberDef::new("x", &int32)).expect("x");
//! point.add_member_def(MemberDef::new("y", &int32)).expect("y");
//! let point = ns.add_type(Namespace::ROOT, point).expect("register");
//!
//! let mut p = point.create_value();
//! p.construct(&InitializerList::new()).expect("default");
//! assert_eq!(p.serialize().expect("serialize"), json!({"x": 0, "y": 0}));
//!
//! p.select_mut(&ValueSelector::from(["x"]))
//!     .expect("select")
//!     .set(5)
//!     .expect("assign");
//! assert_eq!(p.serialize().expect("serialize"), json!({"x": 5, "y": 0}));
//! ```
//!
//! ## Modules
//!
//! - [`types`] - type definitions, templates and attributes
//! - [`namespace`] - arena of scopes and registered types
//! - [`value`] - values, selection, UI strings and change notification
//! - [`codec`] - document encoding
//! - [`config`] - constants and the contract violation policy

pub mod attribute;
pub mod codec;
pub mod config;
pub mod error;
pub mod initializer;
pub mod namespace;
pub mod symbol;
pub mod types;
pub mod value;

pub use attribute::{Attribute, AttributeContainer, AttributeValue};
pub use codec::Document;
pub use config::ContractPolicy;
pub use error::{Error, ErrorClass, Result, StateViolation};
pub use initializer::{
    ConstantExpression, Expression, Initializer, InitializerEntry, InitializerList, Literal,
};
pub use namespace::{Namespace, ScopeId, TypeId};
pub use symbol::{Symbol, SymbolPath};
pub use types::{
    EnumDef, EnumItem, EnumItemRef, IntKind, Kind, MemberDef, MemberDefContainer, RealKind,
    StructDef, TemplateArgument, Type, TypeKind, TypeRef,
};
pub use value::{ObserverId, SelectorStep, Value, ValueMut, ValueSelector};
