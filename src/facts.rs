//! Structured declarations handed to the registry by annotation adapters.
//!
//! A [`Fact`] carries exactly what one annotation states, with type strings
//! still in their wire form. [`apply_facts`] parses those strings into
//! [`TypeRef`]s and feeds the registry in phase order (nodes, then endpoints,
//! then endpoint details) so that facts may arrive in any order;
//! [`build_registry`] additionally runs the resolution pass.

use crate::error::Result;
use crate::model::{
    EndpointDecl, HttpMethod, NodeDecl, ParameterDecl, ParameterLocation, Response,
    ResponseTypeKind, TypeRef, REFERENCE_PREFIX,
};
use crate::registry::Registry;
use log::debug;

/// Member-level declaration of an endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointFact {
    pub node: String,
    pub endpoint: String,
    pub method: HttpMethod,
    pub path: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterFact {
    pub node: String,
    pub endpoint: String,
    pub location: ParameterLocation,
    pub decl: ParameterDecl,
}

/// Body shape declaration
#[derive(Debug, Clone, PartialEq)]
pub enum BodyDecl {
    /// Wrap the current body type in an array
    Array,
    /// Set the body type from a wire type string
    Type(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyFact {
    pub node: String,
    pub endpoint: String,
    pub body: BodyDecl,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFact {
    pub node: String,
    pub endpoint: String,
    pub status: u16,
    /// Wire type string; a trailing `[]` implies `is_array`
    pub response_type: String,
    pub is_array: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseTypeFact {
    pub name: String,
    pub scheme: Vec<(String, String)>,
    pub is_array: bool,
}

/// One declaration emitted by an annotation adapter
#[derive(Debug, Clone, PartialEq)]
pub enum Fact {
    /// Class-level declaration of a route type
    Node(NodeDecl),
    Endpoint(EndpointFact),
    Parameter(ParameterFact),
    Body(BodyFact),
    Response(ResponseFact),
    ResponseType(ResponseTypeFact),
}

impl Fact {
    /// Application phase: facts of a lower phase are applied first
    fn phase(&self) -> u8 {
        match self {
            Fact::Node(_) | Fact::ResponseType(_) => 0,
            Fact::Endpoint(_) => 1,
            Fact::Parameter(_) | Fact::Body(_) | Fact::Response(_) => 2,
        }
    }
}

/// Apply facts to the registry. Within a phase, facts keep their relative order.
pub fn apply_facts(registry: &mut Registry, mut facts: Vec<Fact>) {
    debug!("Applying {} facts", facts.len());
    facts.sort_by_key(Fact::phase);

    for fact in facts {
        match fact {
            Fact::Node(node) => registry.upsert_node(node),
            Fact::Endpoint(endpoint) => registry.upsert_endpoint(
                &endpoint.node,
                &endpoint.endpoint,
                EndpointDecl {
                    method: endpoint.method,
                    path: endpoint.path,
                    description: endpoint.description,
                },
            ),
            Fact::Parameter(parameter) => apply_parameter(registry, parameter),
            Fact::Body(body) => match body.body {
                BodyDecl::Array => registry.mark_body_as_array(&body.node, &body.endpoint),
                BodyDecl::Type(raw) => {
                    registry.set_body_type(&body.node, &body.endpoint, TypeRef::parse(&raw))
                }
            },
            Fact::Response(response) => {
                let mut response_type = TypeRef::parse(&response.response_type);
                if response.is_array {
                    response_type = response_type.into_array();
                }
                registry.upsert_response(
                    &response.node,
                    &response.endpoint,
                    Response {
                        status: response.status,
                        response_type,
                        description: response.description,
                    },
                );
            }
            Fact::ResponseType(response_type) => {
                let kind = if response_type.is_array {
                    ResponseTypeKind::Array
                } else {
                    ResponseTypeKind::Object
                };
                let scheme = response_type
                    .scheme
                    .iter()
                    .map(|(name, raw)| (name.clone(), TypeRef::parse(raw)))
                    .collect();
                registry.create_response_type(&response_type.name, scheme, kind);
            }
        }
    }
}

/// A single body declaration naming a shared schema (`#/Entity`, or
/// `#/Entity[]` for a list) declares the body type rather than a body field.
fn apply_parameter(registry: &mut Registry, fact: ParameterFact) {
    if fact.location == ParameterLocation::Body {
        if let ParameterDecl::Single(spec) = &fact.decl {
            if spec.name.trim().starts_with(REFERENCE_PREFIX) {
                registry.set_body_type(&fact.node, &fact.endpoint, TypeRef::parse(&spec.name));
                return;
            }
        }
    }
    registry.declare_parameters(&fact.node, &fact.endpoint, fact.location, fact.decl);
}

/// Collect facts into a fresh registry and resolve it.
///
/// # Arguments
///
/// * `facts` - Declarations in any order, typically from a [`FactExtractor`](crate::extractor::FactExtractor)
///
/// # Errors
///
/// Returns [`Error::InheritanceCycle`](crate::error::Error::InheritanceCycle)
/// if `extends` relations loop.
pub fn build_registry(facts: Vec<Fact>) -> Result<Registry> {
    let mut registry = Registry::new();
    apply_facts(&mut registry, facts);
    registry.resolve()?;
    Ok(registry)
}
