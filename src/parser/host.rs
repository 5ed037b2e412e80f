//! Ingestion of arbitrary host values through serde.
//!
//! [`HostSerializer`] turns anything implementing `Serialize` into a [`Node`]:
//! decoded JSON/YAML documents, plain Rust collections and derived structs.
//! Strings are scanned for placeholders unless they arrive wrapped as a
//! literal by [`Node`]'s own `Serialize` impl, which is what makes parsing an
//! existing node a pass-through.
//!
//! The serializer is human readable, so addresses, UUIDs and timestamps arrive
//! as their string form. Only the payload of a concatenation is serialized in
//! fragment mode, which reports itself as not human readable so the node hands
//! over its fragments instead of its rendered source.
//!
//! In verbatim mode numbers the value model cannot hold (fractions, integers
//! beyond 64 signed bits) are kept as their decimal text.

use im::OrdMap;
use serde::ser::{self, Impossible, Serialize};

use super::expression::parse_expression;
use crate::errors::ParseError;
use crate::node::{Node, CONCATENATION_TOKEN, EXPRESSION_TOKEN, LITERAL_TOKEN};

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct HostSerializer {
    /// Take strings as they are instead of scanning them.
    verbatim: bool,
    /// Collecting the fragments of a concatenation.
    fragments: bool,
}

impl HostSerializer {
    /// A serializer that never scans strings.
    pub(crate) fn verbatim() -> Self {
        Self {
            verbatim: true,
            fragments: false,
        }
    }

    fn scanning() -> Self {
        Self::default()
    }

    /// The serializer handed to elements and fields.
    fn nested(self) -> Self {
        Self {
            fragments: false,
            ..self
        }
    }

    fn text(self, value: &str) -> Result<Node, ParseError> {
        if self.verbatim {
            Ok(Node::String(value.to_string()))
        } else {
            parse_expression(value)
        }
    }

    fn int<T>(self, value: T) -> Result<Node, ParseError>
    where
        T: TryInto<i64> + std::fmt::Display + Copy,
    {
        match value.try_into() {
            Ok(int) => Ok(Node::Int(int)),
            Err(_) if self.verbatim => Ok(Node::String(value.to_string())),
            Err(_) => Err(ParseError::Unsupported {
                message: format!("integer {value} does not fit in 64 signed bits"),
            }),
        }
    }
}

impl ser::Serializer for HostSerializer {
    type Ok = Node;
    type Error = ParseError;

    type SerializeSeq = SerializeArray;
    type SerializeTuple = SerializeArray;
    type SerializeTupleStruct = SerializeArray;
    type SerializeTupleVariant = SerializeVariant<SerializeArray>;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeVariant<SerializeMap>;

    fn is_human_readable(&self) -> bool {
        !self.fragments
    }

    fn serialize_bool(self, v: bool) -> Result<Node, ParseError> {
        Ok(Node::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Node, ParseError> {
        Ok(Node::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Node, ParseError> {
        Ok(Node::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Node, ParseError> {
        Ok(Node::Int(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Node, ParseError> {
        Ok(Node::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Node, ParseError> {
        self.int(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Node, ParseError> {
        Ok(Node::Int(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Node, ParseError> {
        Ok(Node::Int(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Node, ParseError> {
        Ok(Node::Int(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Node, ParseError> {
        self.int(v)
    }

    fn serialize_u128(self, v: u128) -> Result<Node, ParseError> {
        self.int(v)
    }

    fn serialize_f32(self, v: f32) -> Result<Node, ParseError> {
        if self.verbatim && v.fract() != 0.0 {
            return Ok(Node::String(v.to_string()));
        }
        self.serialize_f64(v.into())
    }

    fn serialize_f64(self, v: f64) -> Result<Node, ParseError> {
        // i64::MAX as f64 rounds up to 2^63, which does not fit.
        if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
            Ok(Node::Int(v as i64))
        } else if self.verbatim {
            Ok(Node::String(v.to_string()))
        } else {
            Err(ParseError::Unsupported {
                message: format!("number {v} has no integer representation"),
            })
        }
    }

    fn serialize_char(self, v: char) -> Result<Node, ParseError> {
        self.text(v.encode_utf8(&mut [0; 4]))
    }

    fn serialize_str(self, v: &str) -> Result<Node, ParseError> {
        self.text(v)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Node, ParseError> {
        Ok(Node::Array(v.iter().map(|b| Node::Int((*b).into())).collect()))
    }

    fn serialize_none(self) -> Result<Node, ParseError> {
        Ok(Node::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Node, ParseError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Node, ParseError> {
        Ok(Node::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Node, ParseError> {
        Ok(Node::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node, ParseError> {
        Ok(Node::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Node, ParseError> {
        match name {
            LITERAL_TOKEN => value.serialize(HostSerializer::verbatim()),
            EXPRESSION_TOKEN => value.serialize(HostSerializer::scanning()),
            CONCATENATION_TOKEN => {
                let collector = HostSerializer {
                    fragments: true,
                    ..HostSerializer::scanning()
                };
                match value.serialize(collector)? {
                    Node::Array(fragments) => Ok(Node::concatenation(fragments)),
                    other => Ok(other),
                }
            }
            _ => value.serialize(self),
        }
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node, ParseError> {
        let payload = value.serialize(self.nested())?;
        Ok(Node::Map(OrdMap::unit(variant.to_string(), payload)))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeArray, ParseError> {
        Ok(SerializeArray {
            host: self.nested(),
            items: Vec::with_capacity(len.unwrap_or_default()),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeArray, ParseError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeArray, ParseError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVariant<SerializeArray>, ParseError> {
        Ok(SerializeVariant {
            variant,
            inner: self.serialize_seq(Some(len))?,
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap, ParseError> {
        Ok(SerializeMap {
            host: self.nested(),
            entries: OrdMap::new(),
            pending_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap, ParseError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVariant<SerializeMap>, ParseError> {
        Ok(SerializeVariant {
            variant,
            inner: self.serialize_map(Some(len))?,
        })
    }
}

// ============================================================================
// COMPOUND SERIALIZERS
// ============================================================================

pub(crate) struct SerializeArray {
    host: HostSerializer,
    items: Vec<Node>,
}

impl ser::SerializeSeq for SerializeArray {
    type Ok = Node;
    type Error = ParseError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ParseError> {
        self.items.push(value.serialize(self.host)?);
        Ok(())
    }

    fn end(self) -> Result<Node, ParseError> {
        Ok(Node::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeArray {
    type Ok = Node;
    type Error = ParseError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ParseError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Node, ParseError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeArray {
    type Ok = Node;
    type Error = ParseError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ParseError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Node, ParseError> {
        ser::SerializeSeq::end(self)
    }
}

pub(crate) struct SerializeMap {
    host: HostSerializer,
    entries: OrdMap<String, Node>,
    pending_key: Option<String>,
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Node;
    type Error = ParseError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), ParseError> {
        self.pending_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ParseError> {
        let key = self.pending_key.take().ok_or_else(|| ParseError::Unsupported {
            message: "map value without a key".to_string(),
        })?;
        self.entries.insert(key, value.serialize(self.host)?);
        Ok(())
    }

    fn end(self) -> Result<Node, ParseError> {
        Ok(Node::Map(self.entries))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Node;
    type Error = ParseError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), ParseError> {
        self.entries.insert(key.to_string(), value.serialize(self.host)?);
        Ok(())
    }

    fn end(self) -> Result<Node, ParseError> {
        Ok(Node::Map(self.entries))
    }
}

/// Payload of a tuple or struct enum variant, wrapped as `{variant: payload}`.
pub(crate) struct SerializeVariant<S> {
    variant: &'static str,
    inner: S,
}

impl SerializeVariant<SerializeArray> {
    fn finish(self) -> Result<Node, ParseError> {
        let payload = ser::SerializeSeq::end(self.inner)?;
        Ok(Node::Map(OrdMap::unit(self.variant.to_string(), payload)))
    }
}

impl ser::SerializeTupleVariant for SerializeVariant<SerializeArray> {
    type Ok = Node;
    type Error = ParseError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ParseError> {
        ser::SerializeSeq::serialize_element(&mut self.inner, value)
    }

    fn end(self) -> Result<Node, ParseError> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for SerializeVariant<SerializeMap> {
    type Ok = Node;
    type Error = ParseError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), ParseError> {
        ser::SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> Result<Node, ParseError> {
        let payload = ser::SerializeStruct::end(self.inner)?;
        Ok(Node::Map(OrdMap::unit(self.variant.to_string(), payload)))
    }
}

// ============================================================================
// MAP KEYS
// ============================================================================

/// Stringifies scalar map keys. Keys are never scanned for placeholders.
struct KeySerializer;

impl KeySerializer {
    fn unsupported(kind: &str) -> ParseError {
        ParseError::Unsupported {
            message: format!("{kind} cannot be used as a map key"),
        }
    }
}

impl ser::Serializer for KeySerializer {
    type Ok = String;
    type Error = ParseError;

    type SerializeSeq = Impossible<String, ParseError>;
    type SerializeTuple = Impossible<String, ParseError>;
    type SerializeTupleStruct = Impossible<String, ParseError>;
    type SerializeTupleVariant = Impossible<String, ParseError>;
    type SerializeMap = Impossible<String, ParseError>;
    type SerializeStruct = Impossible<String, ParseError>;
    type SerializeStructVariant = Impossible<String, ParseError>;

    fn serialize_bool(self, v: bool) -> Result<String, ParseError> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String, ParseError> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String, ParseError> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String, ParseError> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String, ParseError> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String, ParseError> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String, ParseError> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String, ParseError> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String, ParseError> {
        Ok(v.to_string())
    }

    fn serialize_f32(self, v: f32) -> Result<String, ParseError> {
        Ok(v.to_string())
    }

    fn serialize_f64(self, v: f64) -> Result<String, ParseError> {
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<String, ParseError> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String, ParseError> {
        Ok(v.to_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String, ParseError> {
        Err(Self::unsupported("a byte string"))
    }

    fn serialize_none(self) -> Result<String, ParseError> {
        Err(Self::unsupported("null"))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<String, ParseError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String, ParseError> {
        Err(Self::unsupported("null"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<String, ParseError> {
        Ok(name.to_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String, ParseError> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String, ParseError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, ParseError> {
        Err(Self::unsupported("an enum with data"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, ParseError> {
        Err(Self::unsupported("a sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, ParseError> {
        Err(Self::unsupported("a tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, ParseError> {
        Err(Self::unsupported("a tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, ParseError> {
        Err(Self::unsupported("an enum with data"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, ParseError> {
        Err(Self::unsupported("a map"))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, ParseError> {
        Err(Self::unsupported("a struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, ParseError> {
        Err(Self::unsupported("an enum with data"))
    }
}
