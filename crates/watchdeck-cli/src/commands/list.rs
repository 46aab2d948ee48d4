use crate::output::Output;
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

pub fn run_list(watched_only: bool, favourites_only: bool, output: &Output) -> Result<()> {
    let store = super::profile_store()?;
    let profile = super::load_profile(&store)?;

    let entries: Vec<_> = profile
        .watchlist
        .iter()
        .filter(|entry| !watched_only || entry.movie.watched)
        .filter(|entry| !favourites_only || entry.movie.favourite)
        .collect();

    match output.format() {
        crate::output::OutputFormat::Human => {
            if entries.is_empty() {
                output.info("The collection is empty.");
                return Ok(());
            }

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["Id", "Title", "Year", "Watched", "Favourite"]);

            for entry in &entries {
                let movie = &entry.movie;
                table.add_row(vec![
                    movie.id.clone(),
                    movie.title.clone().unwrap_or_default(),
                    movie.release_year().unwrap_or("").to_string(),
                    if movie.watched { "✓" } else { "" }.to_string(),
                    if movie.favourite { "★" } else { "" }.to_string(),
                ]);
            }

            println!("{table}");
            output.info(format!(
                "{} movie{} tracked.",
                entries.len(),
                if entries.len() == 1 { "" } else { "s" }
            ));
        }
        _ => {
            let value = serde_json::to_value(&entries)?;
            output.json(&value);
        }
    }

    Ok(())
}
