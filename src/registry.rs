//! The metadata graph.
//!
//! A [`Registry`] accumulates nodes, endpoints, parameters, responses and
//! response types as annotation facts arrive, in whatever order they arrive.
//! Once everything is collected, [`Registry::resolve`] runs the structural
//! pass: endpoint inheritance over `extends` (parent first, cycles rejected)
//! and path parameter reconciliation against each node's full path. The
//! resolved registry is then handed, read-only, to the
//! [`DocumentCompiler`](crate::compiler::DocumentCompiler).

use crate::error::{Error, Result};
use crate::model::{
    Endpoint, EndpointDecl, Node, NodeDecl, ParameterDecl, ParameterLocation, ParameterSpec,
    Response, ResponseType, ResponseTypeKind, TypeRef,
};
use crate::paths;
use indexmap::IndexMap;
use log::{debug, warn};
use std::collections::HashSet;

/// Store of every node, endpoint and response type declared during one build.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    nodes: IndexMap<String, Node>,
    types: IndexMap<String, ResponseType>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes in order of first declaration
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Response types in order of first registration
    pub fn response_types(&self) -> impl Iterator<Item = &ResponseType> {
        self.types.values()
    }

    /// Look up a response type by the name it was registered under
    pub fn find_response_type(&self, name: &str) -> Option<&ResponseType> {
        self.types.get(name)
    }

    /// Total number of endpoints across all nodes
    pub fn endpoint_count(&self) -> usize {
        self.nodes.values().map(|node| node.endpoints.len()).sum()
    }

    /// Insert a node, or merge the declared scalar fields into an existing one.
    /// The endpoints of an existing node are left alone.
    pub fn upsert_node(&mut self, decl: NodeDecl) {
        debug!("Upserting node: {}", decl.name);
        let name = decl.name.clone();
        self.nodes
            .entry(name.clone())
            .or_insert_with(|| Node::new(&name))
            .apply(decl);
    }

    /// Look up a node by name.
    ///
    /// # Arguments
    ///
    /// * `name` - The route type name, without any module path
    ///
    /// # Returns
    ///
    /// The node, or `None` if nothing declared it
    pub fn find_node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Look up an endpoint by node and method name.
    ///
    /// # Returns
    ///
    /// The endpoint, or `None` if either the node or the endpoint is unknown
    pub fn find_endpoint_by_name(&self, node_name: &str, endpoint_name: &str) -> Option<&Endpoint> {
        self.nodes.get(node_name)?.endpoints.get(endpoint_name)
    }

    fn endpoint_mut(&mut self, node_name: &str, endpoint_name: &str) -> Option<&mut Endpoint> {
        let endpoint = self
            .nodes
            .get_mut(node_name)
            .and_then(|node| node.endpoints.get_mut(endpoint_name));
        if endpoint.is_none() {
            debug!("No endpoint {}::{}, ignoring declaration", node_name, endpoint_name);
        }
        endpoint
    }

    /// Insert an endpoint, or replace the route fields (method, path,
    /// description) of an existing one. Does nothing if the node is unknown.
    pub fn upsert_endpoint(&mut self, node_name: &str, endpoint_name: &str, decl: EndpointDecl) {
        let Some(node) = self.nodes.get_mut(node_name) else {
            debug!("No node {}, ignoring endpoint {}", node_name, endpoint_name);
            return;
        };

        debug!("Upserting endpoint: {} {}::{}", decl.method, node_name, endpoint_name);
        match node.endpoints.get_mut(endpoint_name) {
            Some(endpoint) => endpoint.apply_route(decl),
            None => {
                node.endpoints
                    .insert(endpoint_name.to_string(), Endpoint::new(endpoint_name, decl));
            }
        }
    }

    /// Append an endpoint without checking for an existing one of the same name.
    pub fn add_endpoint(&mut self, node_name: &str, endpoint: Endpoint) {
        match self.nodes.get_mut(node_name) {
            Some(node) => {
                node.endpoints.insert(endpoint.name.clone(), endpoint);
            }
            None => debug!("No node {}, ignoring endpoint {}", node_name, endpoint.name),
        }
    }

    /// Add or replace one parameter. A replaced parameter keeps its position
    /// and only the declared fields change.
    pub fn upsert_param(
        &mut self,
        node_name: &str,
        endpoint_name: &str,
        location: ParameterLocation,
        spec: ParameterSpec,
    ) {
        let Some(endpoint) = self.endpoint_mut(node_name, endpoint_name) else {
            return;
        };

        debug!(
            "Upserting {} parameter {} on {}::{}",
            location.as_str(),
            spec.name,
            node_name,
            endpoint_name
        );

        if location == ParameterLocation::Path {
            endpoint.declare_path_param(spec);
            let path = endpoint.path.clone();
            endpoint.rebuild_url_params(&path);
            return;
        }

        let group = endpoint.params_mut(location);
        match group.get_mut(&spec.name) {
            Some(existing) => spec.merge_into(existing, location),
            None => {
                group.insert(spec.name.clone(), spec.to_parameter(location));
            }
        }
    }

    /// Declare a path parameter. Declared fields are kept across later
    /// reconciliations with the full path.
    pub fn upsert_url_param(&mut self, node_name: &str, endpoint_name: &str, spec: ParameterSpec) {
        self.upsert_param(node_name, endpoint_name, ParameterLocation::Path, spec);
    }

    pub fn upsert_query_param(&mut self, node_name: &str, endpoint_name: &str, spec: ParameterSpec) {
        self.upsert_param(node_name, endpoint_name, ParameterLocation::Query, spec);
    }

    pub fn upsert_body_param(&mut self, node_name: &str, endpoint_name: &str, spec: ParameterSpec) {
        self.upsert_param(node_name, endpoint_name, ParameterLocation::Body, spec);
    }

    pub fn upsert_header_param(&mut self, node_name: &str, endpoint_name: &str, spec: ParameterSpec) {
        self.upsert_param(node_name, endpoint_name, ParameterLocation::Header, spec);
    }

    /// Apply a single or batch declaration through [`Registry::upsert_param`]
    pub fn declare_parameters(
        &mut self,
        node_name: &str,
        endpoint_name: &str,
        location: ParameterLocation,
        decl: ParameterDecl,
    ) {
        for spec in decl.into_specs() {
            self.upsert_param(node_name, endpoint_name, location, spec);
        }
    }

    /// Set the body type, replacing any earlier one. Declared body fields are
    /// kept.
    pub fn set_body_type(&mut self, node_name: &str, endpoint_name: &str, body_type: TypeRef) {
        if let Some(endpoint) = self.endpoint_mut(node_name, endpoint_name) {
            endpoint.body_type = Some(body_type);
        }
    }

    /// Turn the body into an array of its current type (`object` if unset)
    pub fn mark_body_as_array(&mut self, node_name: &str, endpoint_name: &str) {
        if let Some(endpoint) = self.endpoint_mut(node_name, endpoint_name) {
            let current = endpoint.body_type.take().unwrap_or_else(TypeRef::object);
            endpoint.body_type = Some(current.into_array());
        }
    }

    /// Register a named response type, replacing any previous one of that name
    pub fn create_response_type(
        &mut self,
        name: &str,
        scheme: Vec<(String, TypeRef)>,
        kind: ResponseTypeKind,
    ) {
        debug!("Registering response type {} ({:?})", name, kind);
        self.types.insert(
            name.to_string(),
            ResponseType {
                name: name.to_string(),
                scheme,
                kind,
            },
        );
    }

    /// Insert a response, replacing any earlier one with the same status
    pub fn upsert_response(&mut self, node_name: &str, endpoint_name: &str, response: Response) {
        if let Some(endpoint) = self.endpoint_mut(node_name, endpoint_name) {
            endpoint.responses.insert(response.status, response);
        }
    }

    /// Full path of a node: the `related_to` chain joined root first, with each
    /// link's combiner between ancestor and child. Unknown ancestors contribute
    /// nothing and an unknown node resolves to `/`.
    ///
    /// # Arguments
    ///
    /// * `node_name` - The node whose path to compose
    ///
    /// # Returns
    ///
    /// The normalised path, e.g. `/users/:userId/posts`. A `related_to` loop
    /// is logged and the walk stops where it closes.
    pub fn get_node_full_path(&self, node_name: &str) -> String {
        let mut chain: Vec<&Node> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = self.nodes.get(node_name);

        while let Some(node) = current {
            if !visited.insert(node.name.as_str()) {
                warn!("Path composition of {} loops at {}", node_name, node.name);
                break;
            }
            chain.push(node);
            current = node
                .related_to
                .as_deref()
                .and_then(|parent| self.nodes.get(parent));
        }

        let mut fragments: Vec<&str> = Vec::new();
        for (depth, node) in chain.iter().rev().enumerate() {
            if depth > 0 {
                if let Some(combiner) = &node.combiner {
                    fragments.push(combiner);
                }
            }
            fragments.push(&node.path);
        }

        paths::join_paths(&fragments)
    }

    /// Re-derive an endpoint's path parameters from the node's full path plus
    /// the endpoint path.
    pub fn set_url_param_from_full_path(&mut self, node_name: &str, endpoint_name: &str) {
        let base = self.get_node_full_path(node_name);
        if let Some(endpoint) = self.endpoint_mut(node_name, endpoint_name) {
            let full_path = paths::join_paths(&[&base, &endpoint.path]);
            endpoint.rebuild_url_params(&full_path);
        }
    }

    /// Copy into `child` every endpoint of `parent` that `child` does not
    /// define itself. Returns the number of copied endpoints.
    pub fn inherit_endpoints(&mut self, child: &str, parent: &str) -> usize {
        if self.find_node_by_name(child).is_none() {
            return 0;
        }
        let Some(parent_node) = self.find_node_by_name(parent) else {
            return 0;
        };

        let inherited: Vec<Endpoint> = parent_node.endpoints.values().cloned().collect();
        let mut copied = 0;
        for endpoint in inherited {
            if self.find_endpoint_by_name(child, &endpoint.name).is_some() {
                debug!("{}::{} overrides {}::{}", child, endpoint.name, parent, endpoint.name);
                continue;
            }
            self.add_endpoint(child, endpoint);
            copied += 1;
        }
        copied
    }

    /// Resolve structural relations once every fact has been collected.
    ///
    /// Endpoints are propagated along `extends` from the root of each
    /// inheritance chain downward, so the result does not depend on the order
    /// declarations arrived in. Afterwards every endpoint's path parameters
    /// are reconciled with its full path. Running it again changes nothing.
    ///
    /// A `related_to` loop is logged and left in place; full paths along it
    /// stop where the loop closes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InheritanceCycle`] if `extends` links form a loop.
    pub fn resolve(&mut self) -> Result<()> {
        if let Err(chain) = self.link_order(|node| node.related_to.as_deref()) {
            warn!("related_to links loop: {}", chain.join(" -> "));
        }
        let order = self
            .link_order(|node| node.extends.as_deref())
            .map_err(|chain| Error::InheritanceCycle { chain })?;

        for name in &order {
            let Some(parent) = self.nodes.get(name).and_then(|node| node.extends.clone()) else {
                continue;
            };
            if !self.nodes.contains_key(&parent) {
                warn!("{} extends unknown route type {}, skipping inheritance", name, parent);
                continue;
            }
            let copied = self.inherit_endpoints(name, &parent);
            debug!("{} inherited {} endpoints from {}", name, copied, parent);
        }

        let targets: Vec<(String, String)> = self
            .nodes
            .values()
            .flat_map(|node| {
                node.endpoints
                    .keys()
                    .map(move |endpoint| (node.name.clone(), endpoint.clone()))
            })
            .collect();
        for (node_name, endpoint_name) in targets {
            self.set_url_param_from_full_path(&node_name, &endpoint_name);
        }

        debug!(
            "Resolved {} nodes with {} endpoints",
            self.nodes.len(),
            self.endpoint_count()
        );
        Ok(())
    }

    /// Order node names so that every node comes after the node `link` points
    /// to. Links to unknown nodes are ignored. On a loop, returns the names
    /// along it, first name repeated at the end.
    fn link_order<'a, F>(&'a self, link: F) -> std::result::Result<Vec<String>, Vec<String>>
    where
        F: Fn(&'a Node) -> Option<&'a str>,
    {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut done: HashSet<&str> = HashSet::new();

        for start in self.nodes.keys() {
            let mut chain: Vec<&str> = Vec::new();
            let mut current = Some(start.as_str());

            while let Some(name) = current {
                if done.contains(name) {
                    break;
                }
                if let Some(position) = chain.iter().position(|seen| *seen == name) {
                    let mut cycle: Vec<String> =
                        chain[position..].iter().map(|seen| seen.to_string()).collect();
                    cycle.push(name.to_string());
                    return Err(cycle);
                }
                chain.push(name);
                current = self
                    .nodes
                    .get(name)
                    .and_then(&link)
                    .filter(|next| self.nodes.contains_key(*next));
            }

            for name in chain.into_iter().rev() {
                done.insert(name);
                order.push(name.to_string());
            }
        }

        Ok(order)
    }
}
