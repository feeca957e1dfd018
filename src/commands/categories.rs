use anyhow::Result;

use crate::alerts::catalog::{AlertCatalog, IncidentCategory};
use crate::output::table::{CategoryRow, SuggestionRow};
use crate::output::{categories_table, suggestions_table};

pub fn handle_categories_command(category: Option<String>, json_output: bool) -> Result<()> {
    let catalog = AlertCatalog::new();

    match category {
        Some(name) => {
            let category = IncidentCategory::parse_lossy(&name);
            let suggestions = catalog.candidates(category);

            if json_output {
                let rows: Vec<SuggestionRow> =
                    suggestions.iter().map(SuggestionRow::from_suggestion).collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                if !catalog.has_own_list(category) {
                    println!(
                        "No dedicated suggestions for '{category}', showing the {} fallback pool:",
                        IncidentCategory::fallback()
                    );
                }
                println!("{}", suggestions_table(suggestions));
            }
        }
        None => {
            if json_output {
                let rows: Vec<CategoryRow> = IncidentCategory::ALL
                    .iter()
                    .map(|&c| CategoryRow::from_category(&catalog, c))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{}", categories_table(&catalog));
            }
        }
    }

    Ok(())
}
