//! Translate command.

use std::sync::Arc;

use anyhow::Result;
use comfy_table::Cell;
use edmpath::{Config, RequestInfo, RouteTable, RouteValues};
use serde::Serialize;

use crate::output::{self, Format};
use crate::{OutputFormat, SampleModel};

/// One translated segment.
#[derive(Serialize)]
struct SegmentOutput {
    kind: &'static str,
    text: String,
    edm_type: Option<String>,
    navigation_source: Option<String>,
}

/// A translated path.
#[derive(Serialize)]
struct TranslateOutput {
    pattern: String,
    path: String,
    edm_type: Option<String>,
    navigation_source: Option<String>,
    terminal: Option<&'static str>,
    segments: Vec<SegmentOutput>,
}

/// Runs the translate command.
pub fn run(
    pattern: &str,
    values: Vec<(String, String)>,
    method: &str,
    model: SampleModel,
    config: Config,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let routes = RouteTable::new(Arc::new(super::load_model(model)?)).with_config(config);
    let values: RouteValues = values.into_iter().collect();
    let request = RequestInfo::new(method, format!("/{pattern}"));

    let path = routes.translate(pattern, request, values)?;
    let graph = routes.model();

    let segments = path
        .iter()
        .map(|segment| SegmentOutput {
            kind: segment.kind().label(),
            text: segment.to_string(),
            edm_type: segment.edm_type().map(|t| graph.type_name(t)),
            navigation_source: segment
                .navigation_source()
                .map(|s| graph.navigation_source_name(s).to_string()),
        })
        .collect();

    let result = TranslateOutput {
        pattern: pattern.to_string(),
        path: path.to_string(),
        edm_type: path.edm_type().map(|t| graph.type_name(t)),
        navigation_source: path
            .navigation_source()
            .map(|s| graph.navigation_source_name(s).to_string()),
        terminal: path.terminal().map(|t| t.as_str()),
        segments,
    };

    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(&result, quiet)?,
        Format::Table => {
            if quiet {
                return Ok(());
            }
            let mut table = output::create_table();
            output::add_header(&mut table, &["#", "Kind", "Segment", "Type", "Source"]);
            for (i, segment) in result.segments.iter().enumerate() {
                table.add_row(vec![
                    Cell::new(i),
                    Cell::new(segment.kind),
                    Cell::new(&segment.text),
                    Cell::new(output::or_dash(segment.edm_type.as_deref())),
                    Cell::new(output::or_dash(segment.navigation_source.as_deref())),
                ]);
            }
            println!("{table}");
            println!("Path: {}", result.path);
            println!("Type: {}", output::or_dash(result.edm_type.as_deref()));
            if let Some(terminal) = result.terminal {
                println!("Terminal: {terminal}");
            }
        }
    }

    Ok(())
}
