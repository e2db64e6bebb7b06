//! Template command.

use anyhow::Result;
use comfy_table::Cell;
use edmpath::{Config, compile};
use serde::Serialize;

use crate::OutputFormat;
use crate::output::{self, Format};

/// One candidate of a slot.
#[derive(Serialize)]
struct AlternativeOutput {
    rank: u8,
    kinds: Vec<&'static str>,
    text: String,
}

/// All candidates for one URL segment.
#[derive(Serialize)]
struct SlotOutput {
    index: usize,
    alternatives: Vec<AlternativeOutput>,
}

/// Runs the template command.
pub fn run(pattern: &str, config: &Config, format: OutputFormat, quiet: bool) -> Result<()> {
    let template = compile(pattern, config)?;

    let slots: Vec<SlotOutput> = template
        .slots()
        .iter()
        .enumerate()
        .map(|(index, slot)| SlotOutput {
            index,
            alternatives: slot
                .alternatives()
                .iter()
                .map(|alt| AlternativeOutput {
                    rank: alt.rank(),
                    kinds: alt.templates().iter().map(|t| t.label()).collect(),
                    text: alt.to_string(),
                })
                .collect(),
        })
        .collect();

    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(&slots, quiet)?,
        Format::Table => {
            if quiet {
                return Ok(());
            }
            let mut table = output::create_table();
            output::add_header(&mut table, &["Slot", "Rank", "Kind", "Template"]);
            for slot in &slots {
                for alt in &slot.alternatives {
                    table.add_row(vec![
                        Cell::new(slot.index),
                        Cell::new(alt.rank),
                        Cell::new(alt.kinds.join(" + ")),
                        Cell::new(&alt.text),
                    ]);
                }
            }
            println!("{table}");
            println!("{} slots", slots.len());
        }
    }

    Ok(())
}
