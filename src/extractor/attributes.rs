use crate::extractor::FactExtractor;
use crate::facts::{
    BodyDecl, BodyFact, EndpointFact, Fact, ParameterFact, ResponseFact, ResponseTypeFact,
};
use crate::model::{HttpMethod, NodeDecl, ParameterDecl, ParameterLocation, ParameterSpec, TypeRef};
use crate::parser::ParsedFile;
use log::{debug, warn};
use std::path::Path;
use syn::punctuated::Punctuated;
use syn::visit::Visit;
use syn::{
    Attribute, Expr, ExprLit, Fields, GenericArgument, ImplItem, ImplItemFn, ItemImpl, ItemStruct,
    Lit, Meta, PathArguments, PathSegment, Token, Type,
};

/// Reads route declarations written as attributes on structs and their
/// inherent or trait impl methods.
///
/// ```ignore
/// #[base_url("/widgets")]
/// #[extends(CrudRouter)]
/// struct Widgets;
///
/// impl Widgets {
///     #[get("/:id", "Fetch one widget")]
///     #[param("id", "number")]
///     #[response(200, "#/Widget")]
///     fn show() {}
/// }
/// ```
///
/// Attributes are matched on the last segment of their path, so
/// `#[swagger::get(..)]` is read like `#[get(..)]`. Malformed attributes are
/// reported as warnings and skipped.
pub struct AttributeExtractor;

impl FactExtractor for AttributeExtractor {
    fn extract_facts(&self, parsed_files: &[ParsedFile]) -> Vec<Fact> {
        let mut facts = Vec::new();

        for parsed_file in parsed_files {
            let mut visitor = AttributeVisitor::new(&parsed_file.path);
            visitor.visit_file(&parsed_file.syntax_tree);
            debug!(
                "Extracted {} facts from {}",
                visitor.facts.len(),
                parsed_file.path.display()
            );
            facts.extend(visitor.facts);
        }

        facts
    }
}

struct AttributeVisitor<'a> {
    path: &'a Path,
    facts: Vec<Fact>,
}

impl<'a> AttributeVisitor<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            facts: Vec::new(),
        }
    }

    fn report(&self, attr_name: &str, error: &syn::Error) {
        warn!(
            "{}: ignoring malformed #[{}]: {}",
            self.path.display(),
            attr_name,
            error
        );
    }

    /// Struct-level attributes fold into a single node declaration
    fn collect_struct(&mut self, item: &ItemStruct) {
        let name = item.ident.to_string();
        let mut decl = NodeDecl {
            name: name.clone(),
            ..Default::default()
        };
        let mut declares_node = false;

        for attr in &item.attrs {
            let Some(attr_name) = attribute_name(attr) else {
                continue;
            };
            let result = match attr_name.as_str() {
                "base_url" => parse_base_url(attr, &mut decl),
                "abstract_router" => {
                    decl.is_abstract = true;
                    Ok(())
                }
                "extends" => parse_extends(attr, &mut decl),
                "response_type" => match parse_response_type(attr, item) {
                    Ok(fact) => {
                        self.facts.push(Fact::ResponseType(fact));
                        continue;
                    }
                    Err(e) => Err(e),
                },
                _ => continue,
            };

            match result {
                Ok(()) => declares_node = true,
                Err(e) => self.report(&attr_name, &e),
            }
        }

        if declares_node {
            debug!("Found route type {}", name);
            self.facts.push(Fact::Node(decl));
        }
    }

    fn collect_method(&mut self, node: &str, method: &ImplItemFn) {
        let endpoint = method.sig.ident.to_string();

        for attr in &method.attrs {
            let Some(attr_name) = attribute_name(attr) else {
                continue;
            };
            let fact = if let Some(http_method) = HttpMethod::from_name(&attr_name) {
                parse_endpoint(attr, http_method).map(|(path, description)| {
                    Fact::Endpoint(EndpointFact {
                        node: node.to_string(),
                        endpoint: endpoint.clone(),
                        method: http_method,
                        path,
                        description,
                    })
                })
            } else if let Some(location) = parameter_location(&attr_name) {
                parse_parameter_decl(attr).map(|decl| {
                    Fact::Parameter(ParameterFact {
                        node: node.to_string(),
                        endpoint: endpoint.clone(),
                        location,
                        decl,
                    })
                })
            } else if let Some(body) = body_decl(&attr_name) {
                Ok(Fact::Body(BodyFact {
                    node: node.to_string(),
                    endpoint: endpoint.clone(),
                    body,
                }))
            } else if attr_name == "response" {
                parse_response(attr, node, &endpoint).map(Fact::Response)
            } else {
                continue;
            };

            match fact {
                Ok(fact) => self.facts.push(fact),
                Err(e) => self.report(&attr_name, &e),
            }
        }
    }
}

impl<'ast, 'a> Visit<'ast> for AttributeVisitor<'a> {
    fn visit_item_struct(&mut self, node: &'ast ItemStruct) {
        self.collect_struct(node);
        syn::visit::visit_item_struct(self, node);
    }

    fn visit_item_impl(&mut self, node: &'ast ItemImpl) {
        if let Some(node_name) = self_type_name(&node.self_ty) {
            for item in &node.items {
                if let ImplItem::Fn(method) = item {
                    self.collect_method(&node_name, method);
                }
            }
        }
        syn::visit::visit_item_impl(self, node);
    }
}

fn attribute_name(attr: &Attribute) -> Option<String> {
    attr.path()
        .segments
        .last()
        .map(|segment| segment.ident.to_string())
}

fn attribute_args(attr: &Attribute) -> syn::Result<Vec<Expr>> {
    match &attr.meta {
        Meta::Path(_) => Ok(Vec::new()),
        Meta::List(_) => Ok(attr
            .parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)?
            .into_iter()
            .collect()),
        Meta::NameValue(meta) => Err(syn::Error::new_spanned(meta, "expected a list of arguments")),
    }
}

fn string_literal(expr: &Expr) -> syn::Result<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(value),
            ..
        }) => Ok(value.value()),
        _ => Err(syn::Error::new_spanned(expr, "expected a string literal")),
    }
}

fn bool_literal(expr: &Expr) -> syn::Result<bool> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Bool(value),
            ..
        }) => Ok(value.value),
        _ => Err(syn::Error::new_spanned(expr, "expected `true` or `false`")),
    }
}

fn status_literal(expr: &Expr) -> syn::Result<u16> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(value),
            ..
        }) => value.base10_parse(),
        _ => Err(syn::Error::new_spanned(expr, "expected a status code")),
    }
}

/// A type named either as a path (`Parent`, `routes::Parent`) or a string
fn type_name(expr: &Expr) -> syn::Result<String> {
    match expr {
        Expr::Path(expr_path) => expr_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .ok_or_else(|| syn::Error::new_spanned(expr, "expected a type name")),
        _ => string_literal(expr),
    }
}

/// Split `key = value`
fn assignment(expr: &Expr) -> syn::Result<(String, &Expr)> {
    if let Expr::Assign(assign) = expr {
        if let Expr::Path(key) = assign.left.as_ref() {
            if let Some(ident) = key.path.get_ident() {
                return Ok((ident.to_string(), assign.right.as_ref()));
            }
        }
    }
    Err(syn::Error::new_spanned(expr, "expected `name = value`"))
}

fn at_most(args: &[Expr], max: usize) -> syn::Result<()> {
    match args.get(max) {
        Some(extra) => Err(syn::Error::new_spanned(extra, "unexpected argument")),
        None => Ok(()),
    }
}

/// `#[base_url("/path", related_to = Parent, combiner = ":id")]`
fn parse_base_url(attr: &Attribute, decl: &mut NodeDecl) -> syn::Result<()> {
    let args = attribute_args(attr)?;
    let mut path = None;
    let mut related_to = None;
    let mut combiner = None;

    for arg in &args {
        if let Expr::Assign(_) = arg {
            let (key, value) = assignment(arg)?;
            match key.as_str() {
                "related_to" => related_to = Some(type_name(value)?),
                "combiner" => combiner = Some(string_literal(value)?),
                _ => return Err(syn::Error::new_spanned(arg, format!("unknown argument `{}`", key))),
            }
        } else if path.is_none() {
            path = Some(string_literal(arg)?);
        } else {
            return Err(syn::Error::new_spanned(arg, "unexpected argument"));
        }
    }

    let path = path.ok_or_else(|| syn::Error::new_spanned(attr, "expected a base path"))?;
    decl.path = Some(path);
    if related_to.is_some() {
        decl.related_to = related_to;
    }
    if combiner.is_some() {
        decl.combiner = combiner;
    }
    Ok(())
}

/// `#[extends(Parent)]`
fn parse_extends(attr: &Attribute, decl: &mut NodeDecl) -> syn::Result<()> {
    let args = attribute_args(attr)?;
    let parent = args
        .first()
        .ok_or_else(|| syn::Error::new_spanned(attr, "expected a parent route type"))?;
    at_most(&args, 1)?;
    decl.extends = Some(type_name(parent)?);
    Ok(())
}

/// `#[response_type]` or `#[response_type(array, name = "Widgets")]`
fn parse_response_type(attr: &Attribute, item: &ItemStruct) -> syn::Result<ResponseTypeFact> {
    let mut name = item.ident.to_string();
    let mut is_array = false;

    for arg in attribute_args(attr)? {
        match &arg {
            Expr::Path(flag) if flag.path.is_ident("array") => is_array = true,
            Expr::Assign(_) => {
                let (key, value) = assignment(&arg)?;
                if key != "name" {
                    return Err(syn::Error::new_spanned(&arg, format!("unknown argument `{}`", key)));
                }
                name = string_literal(value)?;
            }
            _ => return Err(syn::Error::new_spanned(&arg, "expected `array` or `name = \"..\"`")),
        }
    }

    let mut scheme = Vec::new();
    if let Fields::Named(fields) = &item.fields {
        for field in &fields.named {
            let Some(ident) = &field.ident else {
                continue;
            };
            let mut wire = wire_type(&field.ty);
            for field_attr in &field.attrs {
                if attribute_name(field_attr).as_deref() == Some("api_type") {
                    let args = attribute_args(field_attr)?;
                    let declared = args
                        .first()
                        .ok_or_else(|| syn::Error::new_spanned(field_attr, "expected a type string"))?;
                    wire = string_literal(declared)?;
                }
            }
            scheme.push((ident.to_string(), wire));
        }
    }

    Ok(ResponseTypeFact {
        name,
        scheme,
        is_array,
    })
}

/// `#[get]`, `#[get("/path")]` or `#[get("/path", "description")]`
fn parse_endpoint(attr: &Attribute, method: HttpMethod) -> syn::Result<(String, String)> {
    let args = attribute_args(attr)?;
    let path = match args.first() {
        Some(path) => string_literal(path)?,
        None => String::new(),
    };
    let description = match args.get(1) {
        Some(description) => string_literal(description)?,
        None => String::new(),
    };
    at_most(&args, 2)?;
    debug!("Found {} {}", method, path);
    Ok((path, description))
}

fn parameter_location(attr_name: &str) -> Option<ParameterLocation> {
    match attr_name {
        "param" => Some(ParameterLocation::Path),
        "query" => Some(ParameterLocation::Query),
        "body" => Some(ParameterLocation::Body),
        "header" => Some(ParameterLocation::Header),
        _ => None,
    }
}

/// Single `("name", "type", required, "description")` with trailing parts
/// optional, or batch `(name = "type", other = "type")`. A batch may carry
/// `required = true` anywhere in the list; it applies to every entry.
fn parse_parameter_decl(attr: &Attribute) -> syn::Result<ParameterDecl> {
    let args = attribute_args(attr)?;
    let first = args
        .first()
        .ok_or_else(|| syn::Error::new_spanned(attr, "expected a parameter declaration"))?;

    if let Expr::Assign(_) = first {
        let mut required = None;
        let mut specs = Vec::with_capacity(args.len());
        for arg in &args {
            let (name, value) = assignment(arg)?;
            if name == "required" {
                if let Ok(flag) = bool_literal(value) {
                    required = Some(flag);
                    continue;
                }
            }
            let type_ref = TypeRef::parse(&string_literal(value)?);
            specs.push(ParameterSpec::named(&name).with_type(type_ref));
        }
        if let Some(required) = required {
            specs = specs
                .into_iter()
                .map(|spec| spec.with_required(required))
                .collect();
        }
        return Ok(ParameterDecl::Batch(specs));
    }

    let mut spec = ParameterSpec::named(&string_literal(first)?);
    if let Some(type_arg) = args.get(1) {
        spec = spec.with_type(TypeRef::parse(&string_literal(type_arg)?));
    }
    if let Some(required) = args.get(2) {
        spec = spec.with_required(bool_literal(required)?);
    }
    if let Some(description) = args.get(3) {
        spec = spec.with_description(&string_literal(description)?);
    }
    at_most(&args, 4)?;
    Ok(ParameterDecl::Single(spec))
}

fn body_decl(attr_name: &str) -> Option<BodyDecl> {
    match attr_name {
        "body_is_array" => Some(BodyDecl::Array),
        "body_is_object" => Some(BodyDecl::Type("object".to_string())),
        "body_is_string" => Some(BodyDecl::Type("string".to_string())),
        "body_is_number" => Some(BodyDecl::Type("number".to_string())),
        _ => None,
    }
}

/// `#[response(status, "type", is_array, "description")]`. The description
/// defaults to `OK`.
fn parse_response(attr: &Attribute, node: &str, endpoint: &str) -> syn::Result<ResponseFact> {
    let args = attribute_args(attr)?;
    let status = args
        .first()
        .ok_or_else(|| syn::Error::new_spanned(attr, "expected a status code"))
        .and_then(status_literal)?;
    let response_type = match args.get(1) {
        Some(response_type) => string_literal(response_type)?,
        None => String::new(),
    };
    let is_array = match args.get(2) {
        Some(is_array) => bool_literal(is_array)?,
        None => false,
    };
    let description = match args.get(3) {
        Some(description) => string_literal(description)?,
        None => "OK".to_string(),
    };
    at_most(&args, 4)?;

    Ok(ResponseFact {
        node: node.to_string(),
        endpoint: endpoint.to_string(),
        status,
        response_type,
        is_array,
        description,
    })
}

fn self_type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

/// Wire type string for a field's Rust type
fn wire_type(ty: &Type) -> String {
    match ty {
        Type::Reference(reference) => wire_type(&reference.elem),
        Type::Paren(paren) => wire_type(&paren.elem),
        Type::Group(group) => wire_type(&group.elem),
        Type::Array(array) => format!("{}[]", wire_type(&array.elem)),
        Type::Slice(slice) => format!("{}[]", wire_type(&slice.elem)),
        Type::Path(type_path) => match type_path.path.segments.last() {
            Some(segment) => segment_wire_type(segment),
            None => "object".to_string(),
        },
        _ => "object".to_string(),
    }
}

fn segment_wire_type(segment: &PathSegment) -> String {
    let ident = segment.ident.to_string();
    match ident.as_str() {
        "String" | "str" | "char" => "string".to_string(),
        "bool" => "boolean".to_string(),
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
        | "u128" | "usize" | "f32" | "f64" => "number".to_string(),
        "Option" | "Box" | "Rc" | "Arc" => first_type_argument(segment)
            .map(wire_type)
            .unwrap_or_else(|| "object".to_string()),
        "Vec" | "VecDeque" | "HashSet" | "BTreeSet" => {
            let items = first_type_argument(segment)
                .map(wire_type)
                .unwrap_or_else(|| "object".to_string());
            format!("{}[]", items)
        }
        "HashMap" | "BTreeMap" => "object".to_string(),
        _ => format!("#/{}", ident),
    }
}

fn first_type_argument(segment: &PathSegment) -> Option<&Type> {
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn parse_code(code: &str) -> ParsedFile {
        ParsedFile::from_source(&PathBuf::from("routes.rs"), code).unwrap()
    }

    fn extract(code: &str) -> Vec<Fact> {
        AttributeExtractor.extract_facts(&[parse_code(code)])
    }

    fn single(facts: &[Fact]) -> &Fact {
        assert_eq!(facts.len(), 1, "expected one fact, got {:?}", facts);
        &facts[0]
    }

    #[test]
    fn test_base_url_with_relation() {
        let facts = extract(
            r#"
            #[base_url("/posts", related_to = Users, combiner = ":userId")]
            struct Posts;
            "#,
        );
        assert_eq!(
            single(&facts),
            &Fact::Node(NodeDecl::new("Posts", "/posts").related_to("Users").combiner(":userId"))
        );
    }

    #[test]
    fn test_struct_attributes_fold_into_one_node() {
        let facts = extract(
            r#"
            #[abstract_router]
            #[extends(routes::BaseRouter)]
            pub struct CrudRouter;
            "#,
        );
        assert_eq!(
            single(&facts),
            &Fact::Node(NodeDecl::abstract_node("CrudRouter").extends("BaseRouter"))
        );
    }

    #[test]
    fn test_plain_struct_is_not_a_node() {
        assert!(extract("#[derive(Debug)] struct Plain { id: u32 }").is_empty());
    }

    #[test]
    fn test_endpoint_attributes() {
        let facts = extract(
            r#"
            impl Widgets {
                #[get("/:id", "Fetch one widget")]
                fn show(&self) {}

                #[swagger::delete("/:id")]
                fn destroy(&self) {}

                #[post]
                fn create(&self) {}

                fn helper(&self) {}
            }
            "#,
        );
        assert_eq!(
            facts,
            vec![
                Fact::Endpoint(EndpointFact {
                    node: "Widgets".to_string(),
                    endpoint: "show".to_string(),
                    method: HttpMethod::Get,
                    path: "/:id".to_string(),
                    description: "Fetch one widget".to_string(),
                }),
                Fact::Endpoint(EndpointFact {
                    node: "Widgets".to_string(),
                    endpoint: "destroy".to_string(),
                    method: HttpMethod::Delete,
                    path: "/:id".to_string(),
                    description: String::new(),
                }),
                Fact::Endpoint(EndpointFact {
                    node: "Widgets".to_string(),
                    endpoint: "create".to_string(),
                    method: HttpMethod::Post,
                    path: String::new(),
                    description: String::new(),
                }),
            ]
        );
    }

    #[test]
    fn test_single_and_batch_parameters() {
        let facts = extract(
            r#"
            impl Widgets {
                #[param("id", "number")]
                #[query("verbose", "boolean", true, "Include details")]
                #[body(name = "string", tags = "string[]")]
                fn update(&self) {}
            }
            "#,
        );
        let decls: Vec<_> = facts
            .iter()
            .map(|fact| match fact {
                Fact::Parameter(parameter) => (parameter.location, parameter.decl.clone()),
                other => panic!("unexpected fact {:?}", other),
            })
            .collect();

        assert_eq!(
            decls,
            vec![
                (
                    ParameterLocation::Path,
                    ParameterDecl::Single(ParameterSpec::named("id").with_type(TypeRef::scalar("number")))
                ),
                (
                    ParameterLocation::Query,
                    ParameterDecl::Single(
                        ParameterSpec::named("verbose")
                            .with_type(TypeRef::scalar("boolean"))
                            .with_required(true)
                            .with_description("Include details")
                    )
                ),
                (
                    ParameterLocation::Body,
                    ParameterDecl::Batch(vec![
                        ParameterSpec::named("name").with_type(TypeRef::string()),
                        ParameterSpec::named("tags").with_type(TypeRef::array(TypeRef::string())),
                    ])
                ),
            ]
        );
    }

    #[test]
    fn test_body_kind_and_response() {
        let facts = extract(
            r##"
            impl Widgets {
                #[body_is_number]
                #[body_is_array]
                #[response(200, "#/Widget", true, "All widgets")]
                fn bulk(&self) {}
            }
            "##,
        );
        assert_eq!(
            facts,
            vec![
                Fact::Body(BodyFact {
                    node: "Widgets".to_string(),
                    endpoint: "bulk".to_string(),
                    body: BodyDecl::Type("number".to_string()),
                }),
                Fact::Body(BodyFact {
                    node: "Widgets".to_string(),
                    endpoint: "bulk".to_string(),
                    body: BodyDecl::Array,
                }),
                Fact::Response(ResponseFact {
                    node: "Widgets".to_string(),
                    endpoint: "bulk".to_string(),
                    status: 200,
                    response_type: "#/Widget".to_string(),
                    is_array: true,
                    description: "All widgets".to_string(),
                }),
            ]
        );
    }

    #[test]
    fn test_batch_parameters_with_required_flag() {
        let facts = extract(
            r#"
            impl Widgets {
                #[header(required = true, x_request_id = "string", x_trace = "number")]
                #[query(page = "number", required = false)]
                fn index(&self) {}
            }
            "#,
        );
        let decls: Vec<_> = facts
            .iter()
            .map(|fact| match fact {
                Fact::Parameter(parameter) => parameter.decl.clone(),
                other => panic!("unexpected fact {:?}", other),
            })
            .collect();

        assert_eq!(
            decls,
            vec![
                ParameterDecl::Batch(vec![
                    ParameterSpec::named("x_request_id")
                        .with_type(TypeRef::string())
                        .with_required(true),
                    ParameterSpec::named("x_trace")
                        .with_type(TypeRef::scalar("number"))
                        .with_required(true),
                ]),
                ParameterDecl::Batch(vec![ParameterSpec::named("page")
                    .with_type(TypeRef::scalar("number"))
                    .with_required(false)]),
            ]
        );
    }

    #[test]
    fn test_batch_parameter_named_required_keeps_type() {
        let facts = extract(
            r#"
            impl Widgets {
                #[body(required = "boolean")]
                fn toggle(&self) {}
            }
            "#,
        );
        match single(&facts) {
            Fact::Parameter(parameter) => assert_eq!(
                parameter.decl,
                ParameterDecl::Batch(vec![
                    ParameterSpec::named("required").with_type(TypeRef::scalar("boolean"))
                ])
            ),
            other => panic!("unexpected fact {:?}", other),
        }
    }

    #[test]
    fn test_response_description_defaults_to_ok() {
        let facts = extract(
            r##"
            impl Widgets {
                #[response(200, "#/Widget")]
                fn show(&self) {}
            }
            "##,
        );
        assert_eq!(
            single(&facts),
            &Fact::Response(ResponseFact {
                node: "Widgets".to_string(),
                endpoint: "show".to_string(),
                status: 200,
                response_type: "#/Widget".to_string(),
                is_array: false,
                description: "OK".to_string(),
            })
        );
    }

    #[test]
    fn test_response_type_fields() {
        let facts = extract(
            r##"
            #[response_type]
            struct Widget {
                id: u64,
                name: String,
                label: Option<&'static str>,
                active: bool,
                tags: Vec<String>,
                owner: Box<User>,
                #[api_type("#/Price")]
                price: f64,
            }
            "##,
        );
        let expected = ResponseTypeFact {
            name: "Widget".to_string(),
            scheme: vec![
                ("id".to_string(), "number".to_string()),
                ("name".to_string(), "string".to_string()),
                ("label".to_string(), "string".to_string()),
                ("active".to_string(), "boolean".to_string()),
                ("tags".to_string(), "string[]".to_string()),
                ("owner".to_string(), "#/User".to_string()),
                ("price".to_string(), "#/Price".to_string()),
            ],
            is_array: false,
        };
        assert_eq!(single(&facts), &Fact::ResponseType(expected));
    }

    #[test]
    fn test_array_response_type_with_name() {
        let facts = extract(
            r#"
            #[response_type(array, name = "WidgetList")]
            struct WidgetRow { id: u32 }
            "#,
        );
        match single(&facts) {
            Fact::ResponseType(fact) => {
                assert_eq!(fact.name, "WidgetList");
                assert!(fact.is_array);
            }
            other => panic!("unexpected fact {:?}", other),
        }
    }

    #[test]
    fn test_malformed_attributes_are_skipped() {
        let facts = extract(
            r#"
            #[base_url(42)]
            struct Broken;

            impl Broken {
                #[get(42)]
                fn show(&self) {}

                #[response("ok")]
                fn list(&self) {}

                #[param]
                fn find(&self) {}

                #[get("/ok")]
                fn fine(&self) {}
            }
            "#,
        );
        match single(&facts) {
            Fact::Endpoint(endpoint) => assert_eq!(endpoint.endpoint, "fine"),
            other => panic!("unexpected fact {:?}", other),
        }
    }

    #[test]
    fn test_nested_modules_are_visited() {
        let facts = extract(
            r#"
            mod api {
                #[base_url("/nested")]
                pub struct Nested;
            }
            "#,
        );
        assert_eq!(single(&facts), &Fact::Node(NodeDecl::new("Nested", "/nested")));
    }

    #[test]
    fn test_facts_from_several_files_keep_file_order() {
        let first = parse_code(r#"#[base_url("/a")] struct A;"#);
        let second = parse_code(r#"#[base_url("/b")] struct B;"#);
        let facts = AttributeExtractor.extract_facts(&[first, second]);
        assert_eq!(
            facts,
            vec![
                Fact::Node(NodeDecl::new("A", "/a")),
                Fact::Node(NodeDecl::new("B", "/b")),
            ]
        );
    }
}
