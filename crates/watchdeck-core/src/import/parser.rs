use tracing::{debug, info};

use crate::import::ImportError;

/// Shape of the raw import input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    /// CSV-like text: a header line naming the columns, then one movie per
    /// line. Cells are separated by commas or semicolons.
    Tabular,
    /// A flat comma-separated list of ids.
    IdList,
}

/// One usable line of import input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    pub id: String,
    pub watched: bool,
    pub favourite: bool,
}

/// Parse raw import text into rows, preserving input order. Rows without an
/// identifier are dropped here; everything else is the reconciler's problem.
pub fn parse_rows(input: &str, format: ImportFormat) -> Result<Vec<ImportRow>, ImportError> {
    match format {
        ImportFormat::Tabular => parse_tabular(input),
        ImportFormat::IdList => Ok(parse_id_list(input)),
    }
}

// Cells may be separated by either delimiter, even within one line.
fn split_cells(line: &str) -> Vec<&str> {
    line.split([',', ';']).map(|cell| strip_quotes(cell.trim())).collect()
}

// Removes a leading and a trailing double quote independently, so exports
// with unbalanced quoting still yield the bare cell value.
fn strip_quotes(cell: &str) -> &str {
    let cell = cell.strip_prefix('"').unwrap_or(cell);
    cell.strip_suffix('"').unwrap_or(cell)
}

fn flag_cell(cells: &[&str], index: Option<usize>) -> bool {
    index
        .and_then(|i| cells.get(i).copied())
        .map(|cell| cell == "1")
        .unwrap_or(false)
}

fn parse_tabular(input: &str) -> Result<Vec<ImportRow>, ImportError> {
    let mut lines = input.lines();

    let headers: Vec<String> = lines
        .next()
        .unwrap_or("")
        .split([',', ';'])
        .map(|header| header.trim().to_lowercase())
        .collect();

    let id_index = headers
        .iter()
        .position(|h| h == "id" || h == "the movie database id")
        .ok_or(ImportError::MissingIdColumn)?;
    let watched_index = headers.iter().position(|h| h == "watched");
    let favourite_index = headers.iter().position(|h| h == "favourite");

    let mut rows = Vec::new();
    let mut line_count = 0;
    for line in lines {
        line_count += 1;
        let cells = split_cells(line.trim());

        let id = cells.get(id_index).copied().unwrap_or("");
        if id.is_empty() {
            debug!(line = line_count, "Skipping line with empty id cell");
            continue;
        }

        rows.push(ImportRow {
            id: id.to_string(),
            watched: flag_cell(&cells, watched_index),
            favourite: flag_cell(&cells, favourite_index),
        });
    }

    info!("Parsed {} data lines, {} usable rows", line_count, rows.len());
    Ok(rows)
}

fn parse_id_list(input: &str) -> Vec<ImportRow> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| ImportRow {
            id: token.to_string(),
            watched: false,
            favourite: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tabular_basic() {
        let input = "id,watched,favourite\n680,1,0\n11,0,1\n";
        let rows = parse_rows(input, ImportFormat::Tabular).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ImportRow { id: "680".to_string(), watched: true, favourite: false });
        assert_eq!(rows[1], ImportRow { id: "11".to_string(), watched: false, favourite: true });
    }

    #[test]
    fn test_parse_tabular_header_aliases_and_case() {
        let input = "The Movie Database Id;Watched\n680;1\n";
        let rows = parse_rows(input, ImportFormat::Tabular).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "680");
        assert!(rows[0].watched);
        assert!(!rows[0].favourite);
    }

    #[test]
    fn test_parse_tabular_missing_id_column() {
        let input = "title,watched\nPulp Fiction,1\n";
        let result = parse_rows(input, ImportFormat::Tabular);
        assert!(matches!(result, Err(ImportError::MissingIdColumn)));
    }

    #[test]
    fn test_parse_tabular_skips_empty_id_cells() {
        let input = "id,watched\n680,1\n,1\n\n11,0\n";
        let rows = parse_rows(input, ImportFormat::Tabular).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "680");
        assert_eq!(rows[1].id, "11");
    }

    #[test]
    fn test_parse_tabular_strips_quotes_and_whitespace() {
        let input = "id, title\n\"680\", \"Pulp Fiction\"\n  11 , Star Wars\n";
        let rows = parse_rows(input, ImportFormat::Tabular).unwrap();

        assert_eq!(rows[0].id, "680");
        assert_eq!(rows[1].id, "11");
    }

    #[test]
    fn test_parse_tabular_missing_flag_columns_default_false() {
        let input = "id\n680\n";
        let rows = parse_rows(input, ImportFormat::Tabular).unwrap();
        assert!(!rows[0].watched);
        assert!(!rows[0].favourite);
    }

    #[test]
    fn test_parse_id_list() {
        let rows = parse_rows("680, 11,, 550 ,", ImportFormat::IdList).unwrap();

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["680", "11", "550"]);
        assert!(rows.iter().all(|r| !r.watched && !r.favourite));
    }

    #[test]
    fn test_parse_id_list_empty_input() {
        let rows = parse_rows("  ", ImportFormat::IdList).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_tabular_empty_input_is_missing_column() {
        let result = parse_rows("", ImportFormat::Tabular);
        assert!(matches!(result, Err(ImportError::MissingIdColumn)));
    }
}
