//! Metadata vocabulary: verbs, binding kinds, access modes and declared type descriptors.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Options,
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Options => "OPTIONS",
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OPTIONS" => Ok(Verb::Options),
            "GET" => Ok(Verb::Get),
            "POST" => Ok(Verb::Post),
            "PUT" => Ok(Verb::Put),
            "PATCH" => Ok(Verb::Patch),
            "DELETE" => Ok(Verb::Delete),
            _ => Err(format!("unknown request method: {}", s)),
        }
    }
}

/// Where a handler parameter is read from at request time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingKind {
    PathParam,
    /// Whole query object.
    Query,
    QueryParam,
    /// Whole body.
    Body,
    BodyParam,
    /// Whole header map.
    Headers,
    HeaderParam,
    Request,
    Response,
}

impl BindingKind {
    /// Aggregate bindings take a whole structured object rather than one named field.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, BindingKind::Query | BindingKind::Body | BindingKind::Headers)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessMode {
    Read,
    Write,
}

/// A metadata value given either once or as a list (`path: "/a"` or `path: ["/a", "/b"]`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(v) => std::slice::from_ref(v),
            OneOrMany::Many(v) => v.as_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl<T: Clone> OneOrMany<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }
}

impl From<&str> for OneOrMany<String> {
    fn from(s: &str) -> Self {
        OneOrMany::One(s.to_string())
    }
}

impl From<Vec<&str>> for OneOrMany<String> {
    fn from(v: Vec<&str>) -> Self {
        OneOrMany::Many(v.into_iter().map(String::from).collect())
    }
}

impl From<Verb> for OneOrMany<Verb> {
    fn from(v: Verb) -> Self {
        OneOrMany::One(v)
    }
}

impl From<Vec<Verb>> for OneOrMany<Verb> {
    fn from(v: Vec<Verb>) -> Self {
        OneOrMany::Many(v)
    }
}

/// One declared property of a structured type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// None means visible on read and accepted on write.
    #[serde(default, rename = "dynamicAccessMode", skip_serializing_if = "Option::is_none")]
    pub access: Option<Vec<AccessMode>>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        PropertyDescriptor {
            name: name.into(),
            type_name: type_name.into(),
            access: None,
        }
    }

    pub fn with_access(mut self, modes: &[AccessMode]) -> Self {
        self.access = Some(modes.to_vec());
        self
    }

    /// GET keeps READ fields, POST/PUT keep WRITE fields; undeclared access is always kept.
    pub fn visible_for(&self, verb: Verb) -> bool {
        let Some(modes) = &self.access else {
            return true;
        };
        match verb {
            Verb::Get => modes.contains(&AccessMode::Read),
            Verb::Post | Verb::Put => modes.contains(&AccessMode::Write),
            _ => true,
        }
    }
}

/// A declared type: scalar when it has no properties, structured otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
}

impl TypeDescriptor {
    pub fn scalar(name: impl Into<String>) -> Self {
        TypeDescriptor {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn structured(name: impl Into<String>, properties: Vec<PropertyDescriptor>) -> Self {
        TypeDescriptor {
            name: name.into(),
            properties,
        }
    }

    pub fn string() -> Self {
        Self::scalar("String")
    }

    pub fn number() -> Self {
        Self::scalar("Number")
    }

    pub fn boolean() -> Self {
        Self::scalar("Boolean")
    }

    pub fn object() -> Self {
        Self::scalar("Object")
    }

    pub fn is_structured(&self) -> bool {
        !self.properties.is_empty()
    }
}

/// Factory producing a concrete type; resolved eagerly at boot.
pub type TypeFactory = fn() -> TypeDescriptor;

/// A data-model type eligible for CRUD synthesis.
pub trait Model {
    fn descriptor() -> TypeDescriptor;
}

/// Either a concrete type or a textual generic marker such as `Array<Order>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
    Concrete(TypeDescriptor),
    Marker(String),
}

impl TypeRef {
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Concrete(t) => &t.name,
            TypeRef::Marker(s) => s,
        }
    }

    pub fn array_of(model: &str) -> Self {
        TypeRef::Marker(format!("Array<{}>", model))
    }
}

impl From<TypeDescriptor> for TypeRef {
    fn from(t: TypeDescriptor) -> Self {
        TypeRef::Concrete(t)
    }
}

impl From<&str> for TypeRef {
    fn from(s: &str) -> Self {
        TypeRef::Marker(s.to_string())
    }
}

/// Split `Name<Inner>` into ("Name", "Inner"). Returns None for plain names.
pub fn generic_parts(marker: &str) -> Option<(&str, &str)> {
    let open = marker.find('<')?;
    let inner = marker[open + 1..].strip_suffix('>')?;
    let outer = &marker[..open];
    if outer.is_empty() || inner.is_empty() {
        return None;
    }
    Some((outer, inner))
}

/// Name -> type lookup populated once at startup.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    by_name: HashMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry {
            by_name: HashMap::new(),
        }
    }

    pub fn register(&mut self, ty: TypeDescriptor) {
        self.by_name.insert(ty.name.clone(), ty);
    }

    pub fn register_model<M: Model>(&mut self) {
        self.register(M::descriptor());
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.by_name.get(name)
    }

    /// Look up a type name, unwrapping one level of `Name<Inner>`.
    pub fn lookup(&self, name: &str) -> Option<&TypeDescriptor> {
        match generic_parts(name) {
            Some((_, inner)) => self.by_name.get(inner),
            None => self.by_name.get(name),
        }
    }

    /// Concrete references resolve to themselves; markers go through `lookup`.
    pub fn resolve<'a>(&'a self, r: &'a TypeRef) -> Option<&'a TypeDescriptor> {
        match r {
            TypeRef::Concrete(t) => Some(t),
            TypeRef::Marker(s) => self.lookup(s),
        }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
