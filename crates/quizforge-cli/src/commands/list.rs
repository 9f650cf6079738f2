//! The `quizforge list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizforge_core::render::{list_view, ListView};

pub fn execute(config: Option<PathBuf>, store: Option<PathBuf>, json: bool) -> Result<()> {
    let store = super::open_store(config, store)?;
    let view = list_view(store.list());

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    match view {
        ListView::Empty { heading, hint } => {
            println!("{heading}");
            println!("{hint}");
        }
        ListView::Cards { cards } => {
            let mut table = Table::new();
            table.set_header(vec!["Id", "Title", "Description", "Details"]);
            for card in &cards {
                table.add_row(vec![
                    Cell::new(card.id),
                    Cell::new(&card.title),
                    Cell::new(&card.description),
                    Cell::new(&card.meta),
                ]);
            }
            println!("{table}");
        }
    }

    Ok(())
}
