//! Schema command.

use anyhow::Result;
use comfy_table::Cell;
use edmpath::edm::{SchemaType, StructuredKind};
use edmpath::{EdmModel, SchemaGraph};
use serde::Serialize;

use crate::output::{self, Format};
use crate::{OutputFormat, SampleModel};

#[derive(Serialize)]
struct TypeOutput {
    name: String,
    kind: &'static str,
    base: Option<String>,
    key: Vec<String>,
    open: bool,
    properties: usize,
    navigation_properties: usize,
}

#[derive(Serialize)]
struct SourceOutput {
    name: String,
    kind: &'static str,
    entity_type: String,
}

#[derive(Serialize)]
struct OperationOutput {
    name: String,
    kind: &'static str,
    binding: Option<String>,
    parameters: Vec<String>,
    returns: Option<String>,
    composable: bool,
}

#[derive(Serialize)]
struct ImportOutput {
    name: String,
    kind: &'static str,
    operation: String,
    entity_set: Option<String>,
}

/// Everything a route can address in a model.
#[derive(Serialize)]
struct SchemaOutput {
    namespace: String,
    container: String,
    types: Vec<TypeOutput>,
    sources: Vec<SourceOutput>,
    operations: Vec<OperationOutput>,
    imports: Vec<ImportOutput>,
}

fn describe(model: &EdmModel) -> SchemaOutput {
    let types = model
        .types()
        .map(|(_, ty)| match ty {
            SchemaType::Structured(st) => TypeOutput {
                name: st.qualified_name.clone(),
                kind: match st.kind {
                    StructuredKind::Entity => "entity",
                    StructuredKind::Complex => "complex",
                },
                base: st
                    .base
                    .map(|b| model.schema_type(b).qualified_name().to_string()),
                key: st.key.to_vec(),
                open: st.is_open,
                properties: st.properties.len(),
                navigation_properties: st.navigation_properties.len(),
            },
            SchemaType::Enum(en) => TypeOutput {
                name: en.qualified_name.clone(),
                kind: if en.is_flags { "flags" } else { "enum" },
                base: None,
                key: Vec::new(),
                open: false,
                properties: en.members.len(),
                navigation_properties: 0,
            },
        })
        .collect();

    let entity_type = |id| model.schema_type(id).qualified_name().to_string();
    let sources = model
        .entity_sets()
        .map(|(_, set)| SourceOutput {
            name: set.name.clone(),
            kind: "entity set",
            entity_type: entity_type(set.entity_type),
        })
        .chain(model.singletons().map(|(_, single)| SourceOutput {
            name: single.name.clone(),
            kind: "singleton",
            entity_type: entity_type(single.entity_type),
        }))
        .collect();

    let operations = model
        .operations()
        .map(|(_, op)| OperationOutput {
            name: op.qualified_name.clone(),
            kind: op.kind.as_str(),
            binding: op.binding_parameter().map(|p| model.type_name(&p.type_ref)),
            parameters: op
                .call_parameters()
                .iter()
                .map(|p| {
                    let optional = if p.optional { "?" } else { "" };
                    format!("{}{}: {}", p.name, optional, model.type_name(&p.type_ref))
                })
                .collect(),
            returns: op.return_type.as_ref().map(|t| model.type_name(t)),
            composable: op.is_composable,
        })
        .collect();

    let imports = model
        .operation_imports()
        .map(|(_, import)| ImportOutput {
            name: import.name.clone(),
            kind: import.kind.as_str(),
            operation: model.operation(import.operation).qualified_name.clone(),
            entity_set: import
                .entity_set
                .map(|id| model.entity_set(id).name.clone()),
        })
        .collect();

    SchemaOutput {
        namespace: model.namespace().to_string(),
        container: model.container_name().to_string(),
        types,
        sources,
        operations,
        imports,
    }
}

/// Runs the schema command.
pub fn run(model: SampleModel, format: OutputFormat, quiet: bool) -> Result<()> {
    let model = super::load_model(model)?;
    let schema = describe(&model);

    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(&schema, quiet)?,
        Format::Table => {
            if quiet {
                return Ok(());
            }
            println!("Namespace: {}", schema.namespace);
            println!("Container: {}", schema.container);
            println!();

            let mut table = output::create_table();
            output::add_header(
                &mut table,
                &["Type", "Kind", "Base", "Key", "Open", "Members", "Navigations"],
            );
            for ty in &schema.types {
                table.add_row(vec![
                    Cell::new(&ty.name),
                    Cell::new(ty.kind),
                    Cell::new(output::or_dash(ty.base.as_deref())),
                    Cell::new(ty.key.join(", ")),
                    Cell::new(if ty.open { "yes" } else { "" }),
                    Cell::new(ty.properties),
                    Cell::new(ty.navigation_properties),
                ]);
            }
            println!("{table}");

            let mut table = output::create_table();
            output::add_header(&mut table, &["Source", "Kind", "Entity Type"]);
            for source in &schema.sources {
                table.add_row(vec![
                    Cell::new(&source.name),
                    Cell::new(source.kind),
                    Cell::new(&source.entity_type),
                ]);
            }
            println!("{table}");

            let mut table = output::create_table();
            output::add_header(
                &mut table,
                &["Operation", "Kind", "Binding", "Parameters", "Returns"],
            );
            for op in &schema.operations {
                let returns = match (&op.returns, op.composable) {
                    (Some(t), true) => format!("{t} (composable)"),
                    (Some(t), false) => t.clone(),
                    (None, _) => "-".to_string(),
                };
                table.add_row(vec![
                    Cell::new(&op.name),
                    Cell::new(op.kind),
                    Cell::new(output::or_dash(op.binding.as_deref())),
                    Cell::new(op.parameters.join(", ")),
                    Cell::new(returns),
                ]);
            }
            println!("{table}");

            if !schema.imports.is_empty() {
                let mut table = output::create_table();
                output::add_header(&mut table, &["Import", "Kind", "Operation", "Entity Set"]);
                for import in &schema.imports {
                    table.add_row(vec![
                        Cell::new(&import.name),
                        Cell::new(import.kind),
                        Cell::new(&import.operation),
                        Cell::new(output::or_dash(import.entity_set.as_deref())),
                    ]);
                }
                println!("{table}");
            }
        }
    }

    Ok(())
}
