//! Model rendering
//!
//! The schema is flattened into one view per struct (the resource itself
//! plus every nested block, depth first) and rendered through a single
//! tera template.

use crate::error::{CodegenError, Result};
use crate::schema::{FieldSchema, FieldType, ResourceSchema};
use serde::Serialize;
use std::path::Path;
use tera::{Context, Tera};
use tracing::{debug, info};

const TEMPLATE_NAME: &str = "model.rs";
const TEMPLATE: &str = include_str!("../templates/model.rs.tera");

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use", "where", "while",
];

#[derive(Debug, Serialize)]
struct StructView {
    name: String,
    doc: Option<String>,
    fields: Vec<FieldView>,
}

#[derive(Debug, Serialize)]
struct FieldView {
    ident: String,
    rust_type: String,
    optional: bool,
    docs: Vec<String>,
}

/// Render Rust model structs for `schema`.
pub fn generate_models(schema: &ResourceSchema) -> Result<String> {
    schema.validate()?;

    let root = format!("{}Model", pascal_case(&schema.resource));
    let mut structs = Vec::new();
    collect_struct(&root, schema.description.clone(), &schema.fields, &mut structs);
    let uses_map = uses_map(&schema.fields);

    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)
        .map_err(|e| CodegenError::Template(error_detail(&e)))?;

    let mut context = Context::new();
    context.insert("resource", &schema.resource);
    context.insert("structs", &structs);
    context.insert("uses_map", &uses_map);

    let rendered = tera
        .render(TEMPLATE_NAME, &context)
        .map_err(|e| CodegenError::Template(error_detail(&e)))?;

    info!(resource = %schema.resource, structs = structs.len(), "generated models");
    Ok(format!("{}\n", rendered.trim_end()))
}

/// Load a schema file, render it and write the result to `output`.
pub fn generate_file(schema_path: &Path, output: &Path) -> Result<()> {
    let schema = ResourceSchema::load(schema_path)?;
    let code = generate_models(&schema)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, code)?;
    debug!(output = %output.display(), "wrote models");
    Ok(())
}

fn collect_struct(name: &str, doc: Option<String>, fields: &[FieldSchema], out: &mut Vec<StructView>) {
    let prefix = name.trim_end_matches("Model");
    let mut nested = Vec::new();

    let views = fields
        .iter()
        .map(|field| {
            let element = if field.kind == FieldType::Block {
                let block = format!("{prefix}{}Model", pascal_case(&field.name));
                nested.push((block.clone(), field));
                block
            } else {
                String::new()
            };
            field_view(field, &element)
        })
        .collect();

    out.push(StructView {
        name: name.to_string(),
        doc,
        fields: views,
    });

    for (block, field) in nested {
        collect_struct(&block, field.description.clone(), &field.fields, out);
    }
}

fn field_view(field: &FieldSchema, block_struct: &str) -> FieldView {
    let base = match field.kind {
        FieldType::List | FieldType::Set => format!("Vec<{}>", scalar(field.elem)),
        FieldType::Map => format!("BTreeMap<String, {}>", scalar(field.elem)),
        FieldType::Block => format!("Vec<{block_struct}>"),
        scalar_kind => scalar(Some(scalar_kind)).to_string(),
    };

    let optional = !field.required;
    let rust_type = if optional { format!("Option<{base}>") } else { base };

    let mut docs: Vec<String> = field
        .description
        .as_deref()
        .map(|d| d.lines().map(str::to_string).collect())
        .unwrap_or_default();
    docs.push(presence(field));

    FieldView {
        ident: ident(&field.name),
        rust_type,
        optional,
        docs,
    }
}

fn scalar(kind: Option<FieldType>) -> &'static str {
    match kind {
        Some(FieldType::Bool) => "bool",
        Some(FieldType::Int) => "i64",
        Some(FieldType::Float) => "f64",
        _ => "String",
    }
}

fn presence(field: &FieldSchema) -> String {
    let mut flags = Vec::new();
    if field.required {
        flags.push("Required");
    }
    if field.optional {
        flags.push("Optional");
    }
    if field.computed {
        flags.push("Computed");
    }
    let mut line = format!("{}.", flags.join(", "));
    if field.kind == FieldType::Set {
        line.push_str(" Unordered.");
    }
    if field.force_new {
        line.push_str(" Changing this forces a new resource.");
    }
    line
}

fn uses_map(fields: &[FieldSchema]) -> bool {
    fields
        .iter()
        .any(|f| f.kind == FieldType::Map || uses_map(&f.fields))
}

fn ident(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

pub(crate) fn pascal_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn error_detail(e: &tera::Error) -> String {
    use std::error::Error;

    let mut details = vec![e.to_string()];
    let mut source = e.source();
    while let Some(err) = source {
        details.push(err.to_string());
        source = err.source();
    }
    details.join(" | ")
}
