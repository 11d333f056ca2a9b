//! Entities stored in the metadata [`Registry`](crate::registry::Registry).
//!
//! Everything here is plain data. Wire-level type strings (`"#/Widget[]"`,
//! `"number"`) are parsed into [`TypeRef`] as soon as they enter the crate, so
//! the registry and the compiler never inspect raw strings.

use crate::paths;
use indexmap::IndexMap;
use std::fmt;

/// Prefix marking a type string as a reference to a shared schema.
pub const REFERENCE_PREFIX: &str = "#/";
/// Suffix marking a type string as an array of the preceding type.
pub const ARRAY_SUFFIX: &str = "[]";

/// Structured form of a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Literal scalar type name passed through to the document (`string`, `number`, ...)
    Scalar(String),
    /// Named response type, emitted as `#/definitions/<name>`
    Reference(String),
    /// Array of the inner type
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// Parse the wire syntax: trailing `[]` wraps in an array, a leading `#/`
    /// names a shared schema, anything else is a scalar.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(inner) = raw.strip_suffix(ARRAY_SUFFIX) {
            return TypeRef::Array(Box::new(TypeRef::parse(inner)));
        }
        if let Some(name) = raw.strip_prefix(REFERENCE_PREFIX) {
            return TypeRef::Reference(name.to_string());
        }
        if raw.is_empty() {
            return TypeRef::string();
        }
        TypeRef::Scalar(raw.to_string())
    }

    pub fn scalar(name: &str) -> Self {
        TypeRef::Scalar(name.to_string())
    }

    pub fn reference(name: &str) -> Self {
        TypeRef::Reference(name.to_string())
    }

    pub fn array(inner: TypeRef) -> Self {
        TypeRef::Array(Box::new(inner))
    }

    /// The default type of undeclared parameters and responses
    pub fn string() -> Self {
        TypeRef::scalar("string")
    }

    pub fn object() -> Self {
        TypeRef::scalar("object")
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeRef::Array(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, TypeRef::Reference(_))
    }

    /// Wrap in an array unless already one.
    pub fn into_array(self) -> Self {
        if self.is_array() {
            self
        } else {
            TypeRef::array(self)
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Scalar(name) => write!(f, "{}", name),
            TypeRef::Reference(name) => write!(f, "{}{}", REFERENCE_PREFIX, name),
            TypeRef::Array(inner) => write!(f, "{}{}", inner, ARRAY_SUFFIX),
        }
    }
}

/// HTTP methods an endpoint may be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Match an attribute or method name case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "patch" => Some(HttpMethod::Patch),
            "delete" => Some(HttpMethod::Delete),
            _ => None,
        }
    }

    /// Lowercase name, as used for path item keys
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
        }
    }

    /// Status code of the response synthesized for endpoints that declare none
    pub fn default_status(&self) -> u16 {
        match self {
            HttpMethod::Get => 200,
            HttpMethod::Post => 201,
            HttpMethod::Put | HttpMethod::Patch | HttpMethod::Delete => 204,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    /// Token in the URL path (`/users/:id`)
    Path,
    Query,
    Body,
    Header,
}

impl ParameterLocation {
    /// Value of the `in` field of a Swagger parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Body => "body",
            ParameterLocation::Header => "header",
        }
    }

    /// Whether parameters at this location are required when not stated
    pub fn required_by_default(&self) -> bool {
        matches!(self, ParameterLocation::Path)
    }
}

/// A stored parameter with every field resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub type_ref: TypeRef,
    pub required: bool,
    pub description: Option<String>,
}

/// A parameter declaration. Fields left `None` were not declared and do not
/// overwrite stored values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterSpec {
    pub name: String,
    pub type_ref: Option<TypeRef>,
    pub required: Option<bool>,
    pub description: Option<String>,
}

impl ParameterSpec {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, type_ref: TypeRef) -> Self {
        self.type_ref = Some(type_ref);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Build a fresh parameter, defaulting undeclared fields for `location`
    pub fn to_parameter(&self, location: ParameterLocation) -> Parameter {
        Parameter {
            name: self.name.clone(),
            type_ref: self.type_ref.clone().unwrap_or_else(TypeRef::string),
            required: location.required_by_default()
                || self.required.unwrap_or(false),
            description: self.description.clone(),
        }
    }

    /// Take the declared fields of a later declaration of the same parameter
    pub fn overlay(&mut self, later: ParameterSpec) {
        if later.type_ref.is_some() {
            self.type_ref = later.type_ref;
        }
        if later.required.is_some() {
            self.required = later.required;
        }
        if later.description.is_some() {
            self.description = later.description;
        }
    }

    /// Overwrite the declared fields of an existing parameter
    pub fn merge_into(&self, parameter: &mut Parameter, location: ParameterLocation) {
        if let Some(type_ref) = &self.type_ref {
            parameter.type_ref = type_ref.clone();
        }
        if let Some(required) = self.required {
            parameter.required = required;
        }
        if let Some(description) = &self.description {
            parameter.description = Some(description.clone());
        }
        if location.required_by_default() {
            parameter.required = true;
        }
    }
}

/// One parameter or an ordered batch of them, as produced by a single annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterDecl {
    Single(ParameterSpec),
    Batch(Vec<ParameterSpec>),
}

impl ParameterDecl {
    pub fn into_specs(self) -> Vec<ParameterSpec> {
        match self {
            ParameterDecl::Single(spec) => vec![spec],
            ParameterDecl::Batch(specs) => specs,
        }
    }
}

/// A declared response of an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub response_type: TypeRef,
    pub description: String,
}

impl Response {
    pub fn new(status: u16, response_type: TypeRef, description: &str) -> Self {
        Self {
            status,
            response_type,
            description: description.to_string(),
        }
    }

    pub fn is_array(&self) -> bool {
        self.response_type.is_array()
    }
}

/// Shape of a named response type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseTypeKind {
    Object,
    Array,
}

/// A named schema fragment shared across endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseType {
    pub name: String,
    pub scheme: Vec<(String, TypeRef)>,
    pub kind: ResponseTypeKind,
}

/// Route fields of an endpoint declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDecl {
    pub method: HttpMethod,
    pub path: String,
    pub description: String,
}

/// One operation on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub name: String,
    pub path: String,
    pub method: HttpMethod,
    pub description: String,
    pub url_params: IndexMap<String, Parameter>,
    pub query: IndexMap<String, Parameter>,
    pub body: IndexMap<String, Parameter>,
    pub header: IndexMap<String, Parameter>,
    pub body_type: Option<TypeRef>,
    pub responses: IndexMap<u16, Response>,
    /// Path parameters declared explicitly, merged over the inferred ones
    pub declared_path_params: IndexMap<String, ParameterSpec>,
}

impl Endpoint {
    /// Create an endpoint, extracting path parameters from `path`
    pub fn new(name: &str, decl: EndpointDecl) -> Self {
        let mut endpoint = Self {
            name: name.to_string(),
            path: String::new(),
            method: decl.method,
            description: String::new(),
            url_params: IndexMap::new(),
            query: IndexMap::new(),
            body: IndexMap::new(),
            header: IndexMap::new(),
            body_type: None,
            responses: IndexMap::new(),
            declared_path_params: IndexMap::new(),
        };
        endpoint.apply_route(decl);
        endpoint
    }

    /// Replace method, path and description, then re-derive path parameters
    /// from the new path.
    pub fn apply_route(&mut self, decl: EndpointDecl) {
        self.path = paths::normalize_path(&decl.path);
        self.method = decl.method;
        self.description = decl.description;
        let path = self.path.clone();
        self.rebuild_url_params(&path);
    }

    /// Record an explicit path parameter declaration
    pub fn declare_path_param(&mut self, spec: ParameterSpec) {
        match self.declared_path_params.get_mut(&spec.name) {
            Some(existing) => existing.overlay(spec),
            None => {
                self.declared_path_params.insert(spec.name.clone(), spec);
            }
        }
    }

    /// Rebuild `url_params` from the tokens of `path`. Declared fields win,
    /// inferred tokens fill the gaps, and declared parameters missing from the
    /// path are kept after the inferred ones.
    pub fn rebuild_url_params(&mut self, path: &str) {
        let mut url_params = IndexMap::new();
        for token in paths::params_from_path(path) {
            let mut parameter = ParameterSpec::named(&token).to_parameter(ParameterLocation::Path);
            if let Some(declared) = self.declared_path_params.get(&token) {
                declared.merge_into(&mut parameter, ParameterLocation::Path);
            }
            url_params.insert(token, parameter);
        }
        for (name, declared) in &self.declared_path_params {
            if !url_params.contains_key(name) {
                url_params.insert(name.clone(), declared.to_parameter(ParameterLocation::Path));
            }
        }
        self.url_params = url_params;
    }

    /// Parameter group for a location
    pub fn params(&self, location: ParameterLocation) -> &IndexMap<String, Parameter> {
        match location {
            ParameterLocation::Path => &self.url_params,
            ParameterLocation::Query => &self.query,
            ParameterLocation::Body => &self.body,
            ParameterLocation::Header => &self.header,
        }
    }

    pub fn params_mut(&mut self, location: ParameterLocation) -> &mut IndexMap<String, Parameter> {
        match location {
            ParameterLocation::Path => &mut self.url_params,
            ParameterLocation::Query => &mut self.query,
            ParameterLocation::Body => &mut self.body,
            ParameterLocation::Header => &mut self.header,
        }
    }
}

/// Class-level declaration merged into a node. `None` fields keep the stored value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeDecl {
    pub name: String,
    pub path: Option<String>,
    pub related_to: Option<String>,
    pub combiner: Option<String>,
    pub is_abstract: bool,
    pub extends: Option<String>,
}

impl NodeDecl {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: Some(path.to_string()),
            ..Default::default()
        }
    }

    pub fn abstract_node(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_abstract: true,
            ..Default::default()
        }
    }

    pub fn related_to(mut self, parent: &str) -> Self {
        self.related_to = Some(parent.to_string());
        self
    }

    pub fn combiner(mut self, combiner: &str) -> Self {
        self.combiner = Some(combiner.to_string());
        self
    }

    pub fn extends(mut self, parent: &str) -> Self {
        self.extends = Some(parent.to_string());
        self
    }
}

/// Metadata of one route type.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub path: String,
    /// Node whose resolved path prefixes this one
    pub related_to: Option<String>,
    /// Segment placed between the ancestor path and this node's path
    pub combiner: Option<String>,
    pub is_abstract: bool,
    /// Node whose endpoints this one inherits
    pub extends: Option<String>,
    pub endpoints: IndexMap<String, Endpoint>,
}

impl Node {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: "/".to_string(),
            related_to: None,
            combiner: None,
            is_abstract: false,
            extends: None,
            endpoints: IndexMap::new(),
        }
    }

    /// Merge the scalar fields of a declaration; endpoints are never touched
    pub fn apply(&mut self, decl: NodeDecl) {
        if let Some(path) = decl.path {
            self.path = paths::normalize_path(&path);
        }
        if decl.related_to.is_some() {
            self.related_to = decl.related_to;
        }
        if decl.combiner.is_some() {
            self.combiner = decl.combiner;
        }
        if decl.extends.is_some() {
            self.extends = decl.extends;
        }
        self.is_abstract = decl.is_abstract;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalar() {
        assert_eq!(TypeRef::parse("number"), TypeRef::scalar("number"));
        assert_eq!(TypeRef::parse(""), TypeRef::string());
    }

    #[test]
    fn test_parse_reference_and_array() {
        assert_eq!(TypeRef::parse("#/Widget"), TypeRef::reference("Widget"));
        assert_eq!(
            TypeRef::parse("#/Widget[]"),
            TypeRef::array(TypeRef::reference("Widget"))
        );
        assert_eq!(
            TypeRef::parse("string[][]"),
            TypeRef::array(TypeRef::array(TypeRef::string()))
        );
    }

    #[test]
    fn test_display_matches_wire_syntax() {
        assert_eq!(TypeRef::parse("#/Widget[]").to_string(), "#/Widget[]");
        assert_eq!(TypeRef::parse("boolean").to_string(), "boolean");
    }

    #[test]
    fn test_into_array_is_idempotent() {
        let once = TypeRef::string().into_array();
        assert_eq!(once.clone().into_array(), once);
    }

    #[test]
    fn test_default_status() {
        assert_eq!(HttpMethod::Get.default_status(), 200);
        assert_eq!(HttpMethod::Post.default_status(), 201);
        assert_eq!(HttpMethod::Put.default_status(), 204);
        assert_eq!(HttpMethod::Patch.default_status(), 204);
        assert_eq!(HttpMethod::Delete.default_status(), 204);
    }

    #[test]
    fn test_parameter_defaults_by_location() {
        let spec = ParameterSpec::named("id");
        let path = spec.to_parameter(ParameterLocation::Path);
        assert!(path.required);
        assert_eq!(path.type_ref, TypeRef::string());

        let query = spec.to_parameter(ParameterLocation::Query);
        assert!(!query.required);
    }

    #[test]
    fn test_merge_keeps_undeclared_fields() {
        let mut param = ParameterSpec::named("page")
            .with_type(TypeRef::scalar("number"))
            .with_required(true)
            .to_parameter(ParameterLocation::Query);

        ParameterSpec::named("page")
            .with_description("page index")
            .merge_into(&mut param, ParameterLocation::Query);

        assert_eq!(param.type_ref, TypeRef::scalar("number"));
        assert!(param.required);
        assert_eq!(param.description.as_deref(), Some("page index"));
    }

    #[test]
    fn test_endpoint_extracts_path_tokens() {
        let endpoint = Endpoint::new(
            "show",
            EndpointDecl {
                method: HttpMethod::Get,
                path: "/:id/comments/:commentId/".to_string(),
                description: String::new(),
            },
        );
        assert_eq!(endpoint.path, "/:id/comments/:commentId");
        let names: Vec<_> = endpoint.url_params.keys().cloned().collect();
        assert_eq!(names, vec!["id", "commentId"]);
        assert!(endpoint.url_params["id"].required);
    }

    #[test]
    fn test_rebuild_prefers_declared_fields() {
        let mut endpoint = Endpoint::new(
            "show",
            EndpointDecl {
                method: HttpMethod::Get,
                path: "/:id".to_string(),
                description: String::new(),
            },
        );
        endpoint.declare_path_param(ParameterSpec::named("id").with_type(TypeRef::scalar("number")));
        endpoint.declare_path_param(ParameterSpec::named("id").with_description("row id"));
        endpoint.declare_path_param(ParameterSpec::named("format"));
        endpoint.rebuild_url_params("/users/:userId/:id");

        let names: Vec<_> = endpoint.url_params.keys().cloned().collect();
        assert_eq!(names, vec!["userId", "id", "format"]);
        let id = &endpoint.url_params["id"];
        assert_eq!(id.type_ref, TypeRef::scalar("number"));
        assert_eq!(id.description.as_deref(), Some("row id"));
        assert!(id.required);
        assert_eq!(endpoint.url_params["userId"].type_ref, TypeRef::string());
    }

    #[test]
    fn test_node_apply_keeps_endpoints() {
        let mut node = Node::new("Users");
        node.endpoints.insert(
            "list".to_string(),
            Endpoint::new(
                "list",
                EndpointDecl {
                    method: HttpMethod::Get,
                    path: "/".to_string(),
                    description: String::new(),
                },
            ),
        );
        node.apply(NodeDecl::new("Users", "users/").related_to("Api"));
        assert_eq!(node.path, "/users");
        assert_eq!(node.related_to.as_deref(), Some("Api"));
        assert_eq!(node.endpoints.len(), 1);
    }
}
