use crate::model::{
    Endpoint, HttpMethod, Node, Parameter, ParameterLocation, ResponseType, ResponseTypeKind,
    TypeRef,
};
use crate::paths;
use crate::project::ProjectMetadata;
use crate::registry::Registry;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Swagger version written to every document
pub const SWAGGER_VERSION: &str = "2.0";

/// Compiles a resolved [`Registry`] into a Swagger 2.0 document.
///
/// The compiler keeps no state between calls; compiling the same registry
/// twice yields equal documents.
pub struct DocumentCompiler {
    project: ProjectMetadata,
}

/// Complete Swagger 2.0 document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwaggerDocument {
    pub swagger: String,
    pub info: Info,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(rename = "basePath", skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produces: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumes: Option<Vec<String>>,
    /// Templated path -> operations on that path
    pub paths: IndexMap<String, PathItem>,
    /// Response type name -> schema
    pub definitions: IndexMap<String, Schema>,
}

/// Swagger Info object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
}

/// Swagger PathItem object - all operations for a single path
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
}

impl PathItem {
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
        }
    }

    fn set_operation(&mut self, method: HttpMethod, operation: Operation) {
        let slot = match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Delete => &mut self.delete,
        };
        *slot = Some(operation);
    }
}

/// Swagger Operation object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "operationId")]
    pub operation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produces: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<OperationParameter>>,
    /// Status code -> response
    pub responses: IndexMap<String, ResponseObject>,
}

/// Swagger Parameter object. Body parameters carry a `schema`, the others a
/// `type` (and `items` for arrays).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationParameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// Swagger Response object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseObject {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// Swagger Schema object, restricted to what the compiler emits
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl Schema {
    pub fn of_type(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Default::default()
        }
    }

    /// `$ref` into the document's definitions
    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(definition_ref(name)),
            ..Default::default()
        }
    }

    pub fn array_of(items: Schema) -> Self {
        Self {
            schema_type: Some("array".to_string()),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    pub fn from_type_ref(type_ref: &TypeRef) -> Self {
        match type_ref {
            TypeRef::Scalar(name) => Schema::of_type(name),
            TypeRef::Reference(name) => Schema::reference(name),
            TypeRef::Array(inner) => Schema::array_of(Schema::from_type_ref(inner)),
        }
    }
}

/// Rewrite a response type name into a definitions reference
pub fn definition_ref(name: &str) -> String {
    format!("#/definitions/{}", name)
}

impl DocumentCompiler {
    /// Creates a compiler that writes `project` into every document header.
    pub fn new(project: ProjectMetadata) -> Self {
        debug!("Initializing DocumentCompiler for {}", project.name);
        Self { project }
    }

    /// Build the document from a registry snapshot.
    ///
    /// Abstract nodes are skipped. Endpoints whose full paths template to the
    /// same string share a path item. Path parameters are re-derived from
    /// each endpoint's full path, so `related_to` prefixes are covered even
    /// when the registry was never resolved. Inherited endpoints still need
    /// [`Registry::resolve`] to have run.
    ///
    /// # Arguments
    ///
    /// * `registry` - The registry to read; it is left untouched
    ///
    /// # Returns
    ///
    /// The complete document, ready for the serializer
    pub fn compile(&self, registry: &Registry) -> SwaggerDocument {
        debug!("Compiling Swagger document");

        let mut paths: IndexMap<String, PathItem> = IndexMap::new();
        for node in registry.nodes().filter(|node| !node.is_abstract) {
            let base = registry.get_node_full_path(&node.name);
            for endpoint in node.endpoints.values() {
                let full_path = paths::join_paths(&[&base, &endpoint.path]);
                let template = paths::to_template(&full_path);
                debug!("Adding operation: {} {}", endpoint.method, template);

                let mut endpoint = endpoint.clone();
                endpoint.rebuild_url_params(&full_path);
                let operation = self.compile_operation(node, &endpoint);
                paths
                    .entry(template)
                    .or_default()
                    .set_operation(endpoint.method, operation);
            }
        }

        let definitions = registry
            .response_types()
            .map(|response_type| {
                (
                    response_type.name.clone(),
                    Self::compile_definition(response_type),
                )
            })
            .collect();

        let settings = &self.project.settings;
        SwaggerDocument {
            swagger: SWAGGER_VERSION.to_string(),
            info: self.info(),
            host: settings.host.clone(),
            base_path: settings.base_path.clone(),
            schemes: settings.schemes.clone(),
            produces: settings.produces.clone(),
            consumes: settings.consumes.clone(),
            paths,
            definitions,
        }
    }

    fn info(&self) -> Info {
        Info {
            title: self.project.name.clone(),
            version: self.project.version.clone(),
            description: self.project.description.clone(),
            license: self
                .project
                .license
                .as_ref()
                .map(|name| License { name: name.clone() }),
            contact: self
                .project
                .author
                .as_ref()
                .map(|name| Contact { name: name.clone() }),
        }
    }

    fn compile_operation(&self, node: &Node, endpoint: &Endpoint) -> Operation {
        let operation_id = camel_case(&format!("{} {}", node.name, endpoint.name));

        let mut parameters: Vec<OperationParameter> = endpoint
            .query
            .values()
            .map(|param| Self::compile_parameter(param, ParameterLocation::Query))
            .chain(
                endpoint
                    .url_params
                    .values()
                    .map(|param| Self::compile_parameter(param, ParameterLocation::Path)),
            )
            .collect();

        if !endpoint.body.is_empty() || endpoint.body_type.is_some() {
            parameters.push(Self::compile_body_parameter(endpoint, &operation_id));
        }

        parameters.extend(
            endpoint
                .header
                .values()
                .map(|param| Self::compile_parameter(param, ParameterLocation::Header)),
        );

        let responses = if endpoint.responses.is_empty() {
            Self::default_responses(endpoint.method)
        } else {
            endpoint
                .responses
                .values()
                .map(|response| {
                    (
                        response.status.to_string(),
                        ResponseObject {
                            description: response.description.clone(),
                            schema: Some(Schema::from_type_ref(&response.response_type)),
                        },
                    )
                })
                .collect()
        };

        Operation {
            description: Some(endpoint.description.clone()).filter(|text| !text.is_empty()),
            operation_id,
            produces: self.project.settings.produces.clone(),
            parameters: Some(parameters).filter(|params| !params.is_empty()),
            responses,
        }
    }

    /// Non-body parameter: a plain `type`, with `items` for arrays. Swagger
    /// does not allow `$ref` here, so references degrade to `string`.
    fn compile_parameter(param: &Parameter, location: ParameterLocation) -> OperationParameter {
        let (param_type, items) = match &param.type_ref {
            TypeRef::Scalar(name) => (name.clone(), None),
            TypeRef::Array(inner) => (
                "array".to_string(),
                Some(Box::new(Schema::from_type_ref(inner))),
            ),
            TypeRef::Reference(name) => {
                debug!("{} parameter {} references #/{}, emitting string", location.as_str(), param.name, name);
                ("string".to_string(), None)
            }
        };

        OperationParameter {
            name: param.name.clone(),
            location: location.as_str().to_string(),
            description: param.description.clone(),
            required: Some(param.required),
            param_type: Some(param_type),
            items,
            schema: None,
        }
    }

    /// The single synthesized body parameter, embedding every declared body
    /// field as a property.
    fn compile_body_parameter(endpoint: &Endpoint, operation_id: &str) -> OperationParameter {
        let properties: Option<IndexMap<String, Schema>> = Some(
            endpoint
                .body
                .values()
                .map(|param| (param.name.clone(), Schema::from_type_ref(&param.type_ref)))
                .collect(),
        )
        .filter(|properties: &IndexMap<String, Schema>| !properties.is_empty());

        let required: Option<Vec<String>> = Some(
            endpoint
                .body
                .values()
                .filter(|param| param.required)
                .map(|param| param.name.clone())
                .collect(),
        )
        .filter(|required: &Vec<String>| !required.is_empty());

        let schema = match &endpoint.body_type {
            Some(TypeRef::Reference(name)) => {
                if properties.is_some() {
                    debug!("Body of {} is #/{}, ignoring declared body fields", operation_id, name);
                }
                Schema::reference(name)
            }
            Some(TypeRef::Array(inner)) => {
                let items = if properties.is_some() {
                    Schema {
                        properties,
                        required,
                        ..Default::default()
                    }
                } else {
                    Schema::from_type_ref(inner)
                };
                Schema::array_of(items)
            }
            Some(TypeRef::Scalar(name)) => Schema {
                schema_type: Some(name.clone()),
                properties,
                required,
                ..Default::default()
            },
            None => Schema {
                schema_type: Some("object".to_string()),
                properties,
                required,
                ..Default::default()
            },
        };

        OperationParameter {
            name: format!("{}Body", operation_id),
            location: ParameterLocation::Body.as_str().to_string(),
            description: None,
            required: None,
            param_type: None,
            items: None,
            schema: Some(schema),
        }
    }

    /// Single generic response keyed by the method's conventional status
    fn default_responses(method: HttpMethod) -> IndexMap<String, ResponseObject> {
        let mut responses = IndexMap::new();
        responses.insert(
            method.default_status().to_string(),
            ResponseObject {
                description: "OK".to_string(),
                schema: Some(Schema::of_type("string")),
            },
        );
        responses
    }

    /// Object types emit `properties` directly; array types wrap them in an
    /// `items` object that carries no `type` of its own.
    fn compile_definition(response_type: &ResponseType) -> Schema {
        let properties: IndexMap<String, Schema> = response_type
            .scheme
            .iter()
            .map(|(name, type_ref)| (name.clone(), Schema::from_type_ref(type_ref)))
            .collect();

        match response_type.kind {
            ResponseTypeKind::Object => Schema {
                schema_type: Some("object".to_string()),
                properties: Some(properties),
                ..Default::default()
            },
            ResponseTypeKind::Array => Schema::array_of(Schema {
                properties: Some(properties),
                ..Default::default()
            }),
        }
    }
}

/// Camel-case words split on non-alphanumerics and case boundaries:
/// `"UserController get_by_id"` becomes `"userControllerGetById"`.
pub fn camel_case(input: &str) -> String {
    split_words(input)
        .iter()
        .enumerate()
        .map(|(index, word)| {
            let lower = word.to_lowercase();
            if index == 0 {
                return lower;
            }
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    for chunk in input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|chunk| !chunk.is_empty())
    {
        let chars: Vec<char> = chunk.chars().collect();
        let mut current = String::new();
        for (index, &c) in chars.iter().enumerate() {
            if index > 0 && c.is_uppercase() {
                let previous = chars[index - 1];
                let next_is_lower = chars.get(index + 1).is_some_and(|next| next.is_lowercase());
                if previous.is_lowercase()
                    || previous.is_ascii_digit()
                    || (previous.is_uppercase() && next_is_lower)
                {
                    words.push(std::mem::take(&mut current));
                }
            }
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current);
        }
    }
    words
}
