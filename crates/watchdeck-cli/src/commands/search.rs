use crate::output::Output;
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

pub async fn run_search(query: &str, output: &Output) -> Result<()> {
    let client = super::tmdb_client()?;
    let results = client
        .search(query)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Search failed: {}", e))?;

    match output.format() {
        crate::output::OutputFormat::Human => {
            if results.is_empty() {
                output.info(format!("No results for \"{}\".", query));
                return Ok(());
            }

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["Id", "Title", "Release date"]);

            for record in &results {
                table.add_row(vec![
                    record.id.to_string(),
                    record.title.clone().unwrap_or_default(),
                    record.release_date.clone().unwrap_or_default(),
                ]);
            }

            println!("{table}");
        }
        _ => {
            let value = serde_json::to_value(&results)?;
            output.json(&value);
        }
    }

    Ok(())
}
