//! Rendering of normalized documents in every supported [`Format`].

use super::descriptor::{FilterSpec, ResourceDescriptor, RANGE_OPERATORS};
use super::error::ApiError;
use super::format::Format;
use super::normalizer::{Attribute, Document};
use crate::filter::SearchStrategy;
use resource_actor::Page;
use serde_json::{json, Map, Value};

/// One page of a collection, ready to render.
pub struct CollectionView<'a> {
    pub descriptor: &'a ResourceDescriptor,
    pub members: Vec<Document>,
    pub total_items: usize,
    pub page: usize,
    pub items_per_page: usize,
    pub last_page: usize,
    /// Decoded query of the request, reused to build navigation links.
    pub query: &'a [(String, String)],
}

impl<'a> CollectionView<'a> {
    pub fn new<T>(
        descriptor: &'a ResourceDescriptor,
        page: &Page<T>,
        members: Vec<Document>,
        query: &'a [(String, String)],
    ) -> Self {
        Self {
            descriptor,
            members,
            total_items: page.total_items,
            page: page.page,
            items_per_page: page.items_per_page,
            last_page: page.last_page(),
            query,
        }
    }

    /// Collection IRI for `page`, keeping every other query parameter.
    pub fn page_iri(&self, page: usize) -> String {
        let mut pairs: Vec<(&str, String)> = self
            .query
            .iter()
            .filter(|(key, _)| key != "page")
            .map(|(key, value)| (key.as_str(), value.clone()))
            .collect();
        pairs.push(("page", page.to_string()));
        let path = self.descriptor.collection_path;
        match serde_urlencoded::to_string(&pairs) {
            Ok(query) => format!("{path}?{query}"),
            Err(_) => format!("{path}?page={page}"),
        }
    }

    fn is_paginated(&self) -> bool {
        self.last_page > 1
    }
}

pub fn encode_item(
    format: Format,
    descriptor: &ResourceDescriptor,
    doc: &Document,
) -> Result<String, ApiError> {
    match format {
        Format::JsonLd => {
            let mut object = Map::new();
            object.insert("@context".into(), json!(descriptor.context_iri()));
            object.extend(jsonld_object(doc));
            Ok(Value::Object(object).to_string())
        }
        Format::Json => Ok(Value::Object(json_object(doc)).to_string()),
        Format::JsonHal => Ok(Value::Object(hal_object(doc)).to_string()),
        Format::Csv => encode_csv(std::slice::from_ref(doc)),
        Format::Html => Ok(encode_html(
            descriptor.short_name,
            std::slice::from_ref(doc),
        )),
    }
}

pub fn encode_collection(format: Format, view: &CollectionView<'_>) -> Result<String, ApiError> {
    match format {
        Format::JsonLd => Ok(jsonld_collection(view).to_string()),
        Format::Json => Ok(Value::Array(
            view.members
                .iter()
                .map(|doc| Value::Object(json_object(doc)))
                .collect(),
        )
        .to_string()),
        Format::JsonHal => Ok(hal_collection(view).to_string()),
        Format::Csv => encode_csv(&view.members),
        Format::Html => Ok(encode_html(view.descriptor.short_name, &view.members)),
    }
}

// --- JSON-LD ---

fn jsonld_object(doc: &Document) -> Map<String, Value> {
    let mut object = Map::new();
    object.insert("@id".into(), json!(doc.iri));
    object.insert("@type".into(), json!(doc.type_name));
    for (name, attribute) in &doc.attributes {
        let value = match attribute {
            Attribute::Embedded(inner) => Value::Object(jsonld_object(inner)),
            other => plain_value(other),
        };
        object.insert((*name).into(), value);
    }
    object
}

fn jsonld_collection(view: &CollectionView<'_>) -> Value {
    let descriptor = view.descriptor;
    let mut object = Map::new();
    object.insert("@context".into(), json!(descriptor.context_iri()));
    object.insert("@id".into(), json!(descriptor.collection_path));
    object.insert("@type".into(), json!("hydra:Collection"));
    object.insert(
        "hydra:member".into(),
        Value::Array(
            view.members
                .iter()
                .map(|doc| Value::Object(jsonld_object(doc)))
                .collect(),
        ),
    );
    object.insert("hydra:totalItems".into(), json!(view.total_items));

    if view.is_paginated() {
        let mut nav = Map::new();
        nav.insert("@id".into(), json!(view.page_iri(view.page)));
        nav.insert("@type".into(), json!("hydra:PartialCollectionView"));
        nav.insert("hydra:first".into(), json!(view.page_iri(1)));
        nav.insert("hydra:last".into(), json!(view.page_iri(view.last_page)));
        if view.page > 1 {
            nav.insert("hydra:previous".into(), json!(view.page_iri(view.page - 1)));
        }
        if view.page < view.last_page {
            nav.insert("hydra:next".into(), json!(view.page_iri(view.page + 1)));
        }
        object.insert("hydra:view".into(), Value::Object(nav));
    }

    let variables = search_variables(&descriptor.filters);
    if !variables.is_empty() {
        let names: Vec<&str> = variables.iter().map(|(v, _)| v.as_str()).collect();
        let template = format!("{}{{?{}}}", descriptor.collection_path, names.join(","));
        object.insert(
            "hydra:search".into(),
            json!({
                "@type": "hydra:IriTemplate",
                "hydra:template": template,
                "hydra:variableRepresentation": "BasicRepresentation",
                "hydra:mapping": variables
                    .iter()
                    .map(|(variable, property)| json!({
                        "@type": "IriTemplateMapping",
                        "variable": variable,
                        "property": property,
                        "required": false,
                    }))
                    .collect::<Vec<_>>(),
            }),
        );
    }
    Value::Object(object)
}

/// `(variable, property)` pairs advertised in `hydra:search`.
fn search_variables(filters: &[FilterSpec]) -> Vec<(String, Option<&'static str>)> {
    let mut variables = Vec::new();
    for filter in filters {
        match *filter {
            FilterSpec::Search { property, strategy } => {
                variables.push((property.to_string(), Some(property)));
                if strategy == SearchStrategy::Exact {
                    variables.push((format!("{property}[]"), Some(property)));
                }
            }
            FilterSpec::Reference { property, .. } => {
                variables.push((property.to_string(), Some(property)));
                variables.push((format!("{property}[]"), Some(property)));
            }
            FilterSpec::Boolean { property } => {
                variables.push((property.to_string(), Some(property)));
            }
            FilterSpec::Range { property } => {
                for operator in RANGE_OPERATORS {
                    variables.push((format!("{property}[{operator}]"), Some(property)));
                }
            }
            FilterSpec::Property { parameter } => {
                variables.push((format!("{parameter}[]"), None));
            }
        }
    }
    variables
}

// --- Plain JSON ---

fn plain_value(attribute: &Attribute) -> Value {
    match attribute {
        Attribute::Value(value) => value.clone(),
        Attribute::Link(iri) => json!(iri),
        Attribute::Links(iris) => json!(iris),
        Attribute::Embedded(inner) => Value::Object(json_object(inner)),
    }
}

fn json_object(doc: &Document) -> Map<String, Value> {
    doc.attributes
        .iter()
        .map(|(name, attribute)| ((*name).to_string(), plain_value(attribute)))
        .collect()
}

// --- HAL ---

fn href(iri: &str) -> Value {
    json!({ "href": iri })
}

fn hal_object(doc: &Document) -> Map<String, Value> {
    let mut links = Map::new();
    links.insert("self".into(), href(&doc.iri));
    let mut embedded = Map::new();
    let mut object = Map::new();

    for (name, attribute) in &doc.attributes {
        match attribute {
            Attribute::Value(value) => {
                object.insert((*name).into(), value.clone());
            }
            Attribute::Link(Some(iri)) => {
                links.insert((*name).into(), href(iri));
            }
            Attribute::Link(None) => {}
            Attribute::Links(iris) => {
                links.insert(
                    (*name).into(),
                    Value::Array(iris.iter().map(|iri| href(iri)).collect()),
                );
            }
            Attribute::Embedded(inner) => {
                links.insert((*name).into(), href(&inner.iri));
                embedded.insert((*name).into(), Value::Object(hal_object(inner)));
            }
        }
    }

    let mut out = Map::new();
    out.insert("_links".into(), Value::Object(links));
    if !embedded.is_empty() {
        out.insert("_embedded".into(), Value::Object(embedded));
    }
    out.extend(object);
    out
}

fn hal_collection(view: &CollectionView<'_>) -> Value {
    let mut links = Map::new();
    links.insert("self".into(), href(&view.page_iri(view.page)));
    if view.is_paginated() {
        links.insert("first".into(), href(&view.page_iri(1)));
        links.insert("last".into(), href(&view.page_iri(view.last_page)));
        if view.page > 1 {
            links.insert("prev".into(), href(&view.page_iri(view.page - 1)));
        }
        if view.page < view.last_page {
            links.insert("next".into(), href(&view.page_iri(view.page + 1)));
        }
    }
    links.insert(
        "item".into(),
        Value::Array(view.members.iter().map(|doc| href(&doc.iri)).collect()),
    );

    json!({
        "_links": links,
        "totalItems": view.total_items,
        "itemsPerPage": view.items_per_page,
        "_embedded": {
            "item": view.members
                .iter()
                .map(|doc| Value::Object(hal_object(doc)))
                .collect::<Vec<_>>(),
        },
    })
}

// --- Tabular (CSV, HTML) ---

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Flattens a document into `(column, cell)` pairs; embedded fields become `owner.username`.
fn flatten(doc: &Document, prefix: &str, out: &mut Vec<(String, String)>) {
    for (name, attribute) in &doc.attributes {
        let column = format!("{prefix}{name}");
        match attribute {
            Attribute::Value(value) => out.push((column, cell(value))),
            Attribute::Link(iri) => out.push((column, iri.clone().unwrap_or_default())),
            Attribute::Links(iris) => out.push((column, iris.join(","))),
            Attribute::Embedded(inner) => flatten(inner, &format!("{column}."), out),
        }
    }
}

fn rows(docs: &[Document]) -> (Vec<String>, Vec<Vec<String>>) {
    let mut header: Vec<String> = Vec::new();
    let mut flattened = Vec::with_capacity(docs.len());
    for doc in docs {
        let mut cells = Vec::new();
        flatten(doc, "", &mut cells);
        for (column, _) in &cells {
            if !header.contains(column) {
                header.push(column.clone());
            }
        }
        flattened.push(cells);
    }
    let rows = flattened
        .into_iter()
        .map(|cells| {
            header
                .iter()
                .map(|column| {
                    cells
                        .iter()
                        .find(|(c, _)| c == column)
                        .map(|(_, v)| v.clone())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();
    (header, rows)
}

/// Header row plus one row per document. An empty collection renders as an empty body.
fn encode_csv(docs: &[Document]) -> Result<String, ApiError> {
    let (header, rows) = rows(docs);
    let mut writer = csv::WriterBuilder::new().from_writer(vec![]);
    if !header.is_empty() {
        writer.write_record(&header)?;
    }
    for row in rows {
        writer.write_record(&row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ApiError::Internal(e.to_string()))
}

fn encode_html(title: &str, docs: &[Document]) -> String {
    let (header, rows) = rows(docs);
    let escape = |s: &str| html_escape::encode_text(s).into_owned();

    let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n</head>\n<body>\n", escape(title)));
    html.push_str(&format!("<h1>{}</h1>\n<table>\n<thead>\n<tr>", escape(title)));
    for column in &header {
        html.push_str(&format!("<th>{}</th>", escape(column)));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in rows {
        html.push_str("<tr>");
        for value in row {
            html.push_str(&format!("<td>{}</td>", escape(&value)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::descriptor::cheese_listing_descriptor;
    use resource_actor::PageRequest;

    fn doc(id: u32, title: &str) -> Document {
        Document {
            iri: format!("/api/cheeses/{id}"),
            type_name: "cheeses",
            attributes: vec![
                ("title", Attribute::Value(json!(title))),
                ("price", Attribute::Value(json!(500))),
                ("owner", Attribute::Link(Some("/api/users/1".into()))),
            ],
        }
    }

    fn embedded_doc() -> Document {
        let mut d = doc(1, "Brie");
        d.attributes[2] = (
            "owner",
            Attribute::Embedded(Box::new(Document {
                iri: "/api/users/1".into(),
                type_name: "User",
                attributes: vec![("username", Attribute::Value(json!("ryan")))],
            })),
        );
        d
    }

    fn parse(body: &str) -> Value {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn jsonld_item() {
        let body = encode_item(
            Format::JsonLd,
            &cheese_listing_descriptor(),
            &doc(1, "Brie"),
        )
        .unwrap();
        let value = parse(&body);
        assert_eq!(value["@context"], "/api/contexts/cheeses");
        assert_eq!(value["@id"], "/api/cheeses/1");
        assert_eq!(value["@type"], "cheeses");
        assert_eq!(value["owner"], "/api/users/1");
    }

    #[test]
    fn jsonld_embedded_owner() {
        let body = encode_item(
            Format::JsonLd,
            &cheese_listing_descriptor(),
            &embedded_doc(),
        )
        .unwrap();
        let value = parse(&body);
        assert_eq!(value["owner"]["@id"], "/api/users/1");
        assert_eq!(value["owner"]["username"], "ryan");
    }

    #[test]
    fn hal_item_links_and_embeds() {
        let body = encode_item(
            Format::JsonHal,
            &cheese_listing_descriptor(),
            &embedded_doc(),
        )
        .unwrap();
        let value = parse(&body);
        assert_eq!(value["_links"]["self"]["href"], "/api/cheeses/1");
        assert_eq!(value["_links"]["owner"]["href"], "/api/users/1");
        assert_eq!(value["_embedded"]["owner"]["username"], "ryan");
        assert_eq!(value["title"], "Brie");
    }

    #[test]
    fn plain_json_has_no_metadata() {
        let body =
            encode_item(Format::Json, &cheese_listing_descriptor(), &doc(1, "Brie")).unwrap();
        let value = parse(&body);
        assert!(value.get("@id").is_none());
        assert_eq!(value["price"], 500);
    }

    #[test]
    fn csv_flattens_embedded_fields() {
        let body = encode_item(Format::Csv, &cheese_listing_descriptor(), &embedded_doc()).unwrap();
        assert_eq!(body, "title,price,owner.username\nBrie,500,ryan\n");
    }

    #[test]
    fn html_escapes_cells() {
        let body = encode_item(
            Format::Html,
            &cheese_listing_descriptor(),
            &doc(1, "<b>Brie</b> & co"),
        )
        .unwrap();
        assert!(body.contains("<td>&lt;b&gt;Brie&lt;/b&gt; &amp; co</td>"));
        assert!(body.contains("<th>title</th>"));
    }

    #[test]
    fn collection_view_links_keep_filters() {
        let descriptor = cheese_listing_descriptor();
        let page = Page::slice((1..=25).collect::<Vec<u32>>(), PageRequest::new(2, 10));
        let query = vec![
            ("isPublished".to_string(), "true".to_string()),
            ("page".to_string(), "2".to_string()),
        ];
        let members = page.items.iter().map(|id| doc(*id, "x")).collect();
        let view = CollectionView::new(&descriptor, &page, members, &query);
        let value = parse(&encode_collection(Format::JsonLd, &view).unwrap());

        assert_eq!(value["hydra:totalItems"], 25);
        assert_eq!(value["hydra:member"].as_array().unwrap().len(), 10);
        assert_eq!(value["hydra:view"]["@id"], "/api/cheeses?isPublished=true&page=2");
        assert_eq!(value["hydra:view"]["hydra:last"], "/api/cheeses?isPublished=true&page=3");
        assert_eq!(value["hydra:view"]["hydra:previous"], "/api/cheeses?isPublished=true&page=1");
        assert_eq!(value["hydra:view"]["hydra:next"], "/api/cheeses?isPublished=true&page=3");
        assert_eq!(value["hydra:search"]["@type"], "hydra:IriTemplate");
    }

    #[test]
    fn single_page_collection_has_no_view() {
        let descriptor = cheese_listing_descriptor();
        let page = Page::slice(vec![1u32], PageRequest::new(1, 10));
        let view = CollectionView::new(&descriptor, &page, vec![doc(1, "Brie")], &[]);
        let value = parse(&encode_collection(Format::JsonLd, &view).unwrap());
        assert!(value.get("hydra:view").is_none());

        let hal = parse(&encode_collection(Format::JsonHal, &view).unwrap());
        assert_eq!(hal["totalItems"], 1);
        assert_eq!(hal["_embedded"]["item"][0]["title"], "Brie");
    }

    #[test]
    fn empty_csv_collection_is_empty() {
        let descriptor = cheese_listing_descriptor();
        let page: Page<u32> = Page::slice(Vec::new(), PageRequest::new(1, 10));
        let view = CollectionView::new(&descriptor, &page, Vec::new(), &[]);
        assert_eq!(encode_collection(Format::Csv, &view).unwrap(), "");
    }
}
