// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value <-> document codec.
//!
//! Documents are [`serde_json::Value`] trees:
//!
//! | Kind | Encoding |
//! |------|----------|
//! | bool | `true` / `false` |
//! | integral, real | number; vectors as arrays of numbers |
//! | string | string |
//! | enum | item name |
//! | optional | `null` or the inner encoding |
//! | variant | `{"type": "<alternative path>", "value": <inner>}` |
//! | struct | object keyed by member name, in declaration order |
//! | array | array |
//!
//! Deserialization stages the whole document before touching the value, so a
//! malformed document leaves the value unchanged. Unknown struct fields are
//! ignored and absent ones take the member default.
//!
//! A variant's `"type"` is matched against each alternative's qualified path,
//! then its plain name, then the path of the type it aliases.

use serde_json::{Map, Number};

use crate::config::{VARIANT_TYPE_KEY, VARIANT_VALUE_KEY};
use crate::error::{Error, Result};
use crate::initializer::Literal;
use crate::types::{TypeKind, TypeRef};
use crate::value::payload::Payload;
use crate::value::{stage, Value};

/// Document tree produced and consumed by the codec.
pub type Document = serde_json::Value;

impl Value {
    /// Encode the value as a document.
    pub fn serialize(&self) -> Result<Document> {
        encode(self)
    }

    /// Replace the value with the content of `doc`.
    ///
    /// Notifies once if the value changed.
    pub fn deserialize(&mut self, doc: &Document) -> Result<()> {
        self.constructed_payload()?;
        let staged = decode(self.value_type(), doc)?;
        self.apply(staged);
        Ok(())
    }
}

// ============================================================================
// Encoding
// ============================================================================

fn encode(value: &Value) -> Result<Document> {
    let ty = value.value_type();
    let path = ty.qualified_path();
    let doc = match value.constructed_payload()? {
        Payload::Bool(v) => Document::Bool(*v),
        Payload::Int(v) => components(v, |x| encode_int(ty, *x))?,
        Payload::Real(v) => components(v, |x| {
            Number::from_f64(*x)
                .map(Document::Number)
                .ok_or_else(|| Error::data(path, format!("{} cannot be encoded", x)))
        })?,
        Payload::String(v) => Document::String(v.clone()),
        Payload::Enum(index) => Document::String(
            ty.enum_def()
                .and_then(|def| def.item(*index))
                .map(|item| item.name().to_string())
                .ok_or_else(|| Error::data(path, "enum item index out of range"))?,
        ),
        Payload::Optional(inner) => match inner {
            Some(inner) => encode(inner)?,
            None => Document::Null,
        },
        Payload::Variant(index, inner) => {
            let alternative = ty
                .inner_type(*index)
                .ok_or_else(|| Error::data(path, "variant index out of range"))?;
            let mut map = Map::new();
            map.insert(
                VARIANT_TYPE_KEY.to_string(),
                Document::String(alternative.qualified_path().to_string()),
            );
            map.insert(VARIANT_VALUE_KEY.to_string(), encode(inner)?);
            Document::Object(map)
        }
        Payload::Struct(members) => {
            let mut map = Map::new();
            for (def, member) in ty.all_member_defs().into_iter().zip(members) {
                let doc = encode(member).map_err(|e| e.in_member(def.qualified_path()))?;
                map.insert(def.name().to_string(), doc);
            }
            Document::Object(map)
        }
        Payload::Array(elements) => Document::Array(
            elements
                .iter()
                .enumerate()
                .map(|(i, e)| encode(e).map_err(|err| err.in_member(format!("[{}]", i))))
                .collect::<Result<Vec<_>>>()?,
        ),
    };
    Ok(doc)
}

/// Scalar for one component, array otherwise.
fn components<T>(values: &[T], encode: impl Fn(&T) -> Result<Document>) -> Result<Document> {
    match values {
        [single] => encode(single),
        _ => values
            .iter()
            .map(encode)
            .collect::<Result<Vec<_>>>()
            .map(Document::Array),
    }
}

fn encode_int(ty: &TypeRef, v: i128) -> Result<Document> {
    if let Ok(v) = i64::try_from(v) {
        return Ok(Document::Number(v.into()));
    }
    u64::try_from(v)
        .map(|v| Document::Number(v.into()))
        .map_err(|_| Error::data(ty.qualified_path(), format!("{} cannot be encoded", v)))
}

// ============================================================================
// Decoding
// ============================================================================

fn expected(ty: &TypeRef, what: &str, doc: &Document) -> Error {
    Error::data(
        ty.qualified_path(),
        format!("expected {}, got {}", what, describe(doc)),
    )
}

fn describe(doc: &Document) -> &'static str {
    match doc {
        Document::Null => "null",
        Document::Bool(_) => "a boolean",
        Document::Number(_) => "a number",
        Document::String(_) => "a string",
        Document::Array(_) => "an array",
        Document::Object(_) => "an object",
    }
}

fn decode_child(ty: &TypeRef, doc: &Document) -> Result<Value> {
    Ok(Value::from_payload(ty.clone(), decode(ty, doc)?))
}

fn decode(ty: &TypeRef, doc: &Document) -> Result<Payload> {
    match ty.kind() {
        TypeKind::Bool | TypeKind::Integral { .. } | TypeKind::Real { .. } | TypeKind::String => {
            let literal = match doc {
                Document::Null | Document::Object(_) => None,
                _ => Literal::from_document(doc),
            };
            let literal = literal.ok_or_else(|| expected(ty, "a scalar", doc))?;
            stage::from_literal(ty, &literal)
        }
        TypeKind::Enum(def) => {
            let name = doc.as_str().ok_or_else(|| expected(ty, "an enum item name", doc))?;
            def.find_item_idx(name)
                .map(Payload::Enum)
                .ok_or_else(|| Error::data(ty.qualified_path(), format!("unknown enum item '{}'", name)))
        }
        TypeKind::Optional(inner) => match (doc, inner) {
            (Document::Null, _) => Ok(Payload::Optional(None)),
            (_, Some(inner)) => Ok(Payload::Optional(Some(Box::new(decode_child(inner, doc)?)))),
            (_, None) => Err(Error::schema(ty.qualified_path(), "template is not instantiated")),
        },
        TypeKind::Variant(alternatives) => {
            let map = doc.as_object().ok_or_else(|| expected(ty, "an object", doc))?;
            let type_name = map
                .get(VARIANT_TYPE_KEY)
                .and_then(Document::as_str)
                .ok_or_else(|| {
                    Error::data(ty.qualified_path(), format!("missing '{}' key", VARIANT_TYPE_KEY))
                })?;
            let inner = map.get(VARIANT_VALUE_KEY).ok_or_else(|| {
                Error::data(ty.qualified_path(), format!("missing '{}' key", VARIANT_VALUE_KEY))
            })?;
            let (index, alternative) = alternatives
                .iter()
                .flatten()
                .enumerate()
                .find(|(_, alt)| alt.qualified_path().to_string() == type_name)
                .or_else(|| {
                    alternatives
                        .iter()
                        .flatten()
                        .enumerate()
                        .find(|(_, alt)| alt.name() == type_name)
                })
                .or_else(|| {
                    alternatives
                        .iter()
                        .flatten()
                        .enumerate()
                        .find(|(_, alt)| alt.resolved().qualified_path().to_string() == type_name)
                })
                .ok_or_else(|| {
                    Error::data(ty.qualified_path(), format!("no alternative named '{}'", type_name))
                })?;
            Ok(Payload::Variant(index, Box::new(decode_child(alternative, inner)?)))
        }
        TypeKind::Struct(_) => {
            let map = doc.as_object().ok_or_else(|| expected(ty, "an object", doc))?;
            let defs = ty.all_member_defs();
            for key in map.keys() {
                if !defs.iter().any(|d| d.name() == key) {
                    log::debug!("[deflang] '{}': ignoring unknown field '{}'", ty.qualified_path(), key);
                }
            }
            defs.iter()
                .map(|def| {
                    let value = match map.get(def.name()) {
                        Some(field) => decode_child(def.member_type(), field),
                        None => stage::member_default(def),
                    };
                    value.map_err(|e| e.in_member(def.qualified_path()))
                })
                .collect::<Result<Vec<_>>>()
                .map(Payload::Struct)
        }
        TypeKind::Array(element) => {
            let items = doc.as_array().ok_or_else(|| expected(ty, "an array", doc))?;
            let element = element
                .as_ref()
                .ok_or_else(|| Error::schema(ty.qualified_path(), "template is not instantiated"))?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    decode_child(element, item).map_err(|e| e.in_member(format!("[{}]", i)))
                })
                .collect::<Result<Vec<_>>>()
                .map(Payload::Array)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initializer::InitializerList;
    use crate::types::{EnumItem, IntKind, MemberDef, RealKind, Type};
    use serde_json::json;

    #[test]
    fn test_scalars() {
        let t = Type::integral("uint64", IntKind::U64, 1).seal().expect("uint64");
        let mut v = t.create_value();
        v.construct(&InitializerList::single(u64::MAX)).expect("construct");
        assert_eq!(v.serialize().expect("serialize"), json!(u64::MAX));

        assert!(v.deserialize(&json!(-1)).is_err());
        assert!(v.deserialize(&json!("1")).is_err());
        v.deserialize(&json!(7)).expect("deserialize");
        assert_eq!(v.as_int().expect("int"), 7);

        let r = Type::real("vec2d", RealKind::F64, 2).seal().expect("vec2d");
        let mut w = r.create_value();
        w.construct_default().expect("default");
        w.deserialize(&json!([1.5, 2])).expect("deserialize");
        assert_eq!(w.serialize().expect("serialize"), json!([1.5, 2.0]));
    }

    #[test]
    fn test_struct_unknown_and_missing_fields() {
        let int32 = Type::integral("int32", IntKind::I32, 1).seal().expect("int32");
        let mut point = Type::structure("Point");
        point.add_member_def(MemberDef::new("x", &int32)).expect("x");
        point.add_member_def(MemberDef::new("y", &int32)).expect("y");
        let point = point.seal().expect("Point");

        let mut p = point.create_value();
        p.construct(&InitializerList::new().with(1).with(2)).expect("construct");
        p.deserialize(&json!({"y": 5, "z": 9})).expect("deserialize");
        assert_eq!(p.serialize().expect("serialize"), json!({"x": 0, "y": 5}));

        let err = p.deserialize(&json!({"x": "one"})).expect_err("bad field");
        assert!(err.is_incompatible());
        assert_eq!(p.serialize().expect("serialize"), json!({"x": 0, "y": 5}));
    }

    #[test]
    fn test_enum_and_variant() {
        let mut color = Type::enumeration("Color");
        color.add_item(EnumItem::new("RED", 0)).expect("RED");
        color.add_item(EnumItem::new("BLUE", 1)).expect("BLUE");
        color.set_default_item("RED").expect("default");
        let color = color.seal().expect("Color");
        let text = Type::string("string").seal().expect("string");

        let mut var = Type::variant("ColorOrText");
        var.init(&[(&color).into(), (&text).into()]).expect("init");
        let var = var.seal().expect("var");

        let mut v = var.create_value();
        v.construct_default().expect("default");
        assert_eq!(
            v.serialize().expect("serialize"),
            json!({"type": "Color", "value": "RED"})
        );
        v.deserialize(&json!({"type": "string", "value": "hi"})).expect("by name");
        assert_eq!(v.variant_index().expect("index"), 1);
        assert!(v.deserialize(&json!({"type": "Color", "value": "GREEN"})).is_err());
        assert!(v.deserialize(&json!({"type": "float", "value": 1.0})).is_err());
        assert!(v.deserialize(&json!({"value": "hi"})).is_err());
        assert_eq!(v.variant_index().expect("index"), 1);
    }
}
