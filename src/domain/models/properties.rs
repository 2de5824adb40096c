//! Annotation request properties
//!
//! The server takes its pipeline configuration as a single `properties` query
//! parameter. Values are strings, booleans, or integers; `Properties` keeps
//! them typed and renders them through one canonical serializer (a JSON
//! object with sorted keys).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Property key selecting the request body format
pub const INPUT_FORMAT: &str = "inputFormat";
/// Property key selecting the response body format
pub const OUTPUT_FORMAT: &str = "outputFormat";
/// Property key listing the annotators to run, comma separated
pub const ANNOTATORS: &str = "annotators";
/// Property key naming the server-side serializer
pub const SERIALIZER: &str = "serializer";

/// Serializer that produces length-delimited protobuf documents
pub const PROTOBUF_SERIALIZER: &str = "edu.stanford.nlp.pipeline.ProtobufAnnotationSerializer";

/// A single property value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

/// Unsupported `inputFormat` value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unrecognized inputFormat {0}")]
pub struct UnknownInputFormat(pub String);

/// Body format of an annotation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// UTF-8 text
    Text,
    /// A length-delimited serialized document
    Serialized,
}

impl InputFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Serialized => "serialized",
        }
    }

    /// `content-type` header sent with a body of this format
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Text => "text/plain; charset=utf-8",
            Self::Serialized => "application/x-protobuf",
        }
    }
}

impl FromStr for InputFormat {
    type Err = UnknownInputFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "serialized" => Ok(Self::Serialized),
            other => Err(UnknownInputFormat(other.to_string())),
        }
    }
}

/// Property mapping sent with every annotation request.
///
/// Keys are unique and insertion order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, PropertyValue>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property, returning the previous value for the key
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overlay `other` on top of `self`; keys in `other` win
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Resolve the request body format. A missing key means text.
    pub fn input_format(&self) -> Result<InputFormat, UnknownInputFormat> {
        match self.get(INPUT_FORMAT) {
            None => Ok(InputFormat::Text),
            Some(PropertyValue::Str(s)) => s.parse(),
            Some(other) => Err(UnknownInputFormat(other.to_string())),
        }
    }

    /// Canonical wire form for the `properties` query parameter
    pub fn to_query_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<PropertyValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
