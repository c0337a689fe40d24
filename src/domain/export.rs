use crate::domain::market_data::{Asset, AssetSnapshot};
use crate::domain::selection::SelectionSet;

pub const EXPORT_FILE_NAME: &str = "crypto-comparison.csv";
pub const EXPORT_MIME_TYPE: &str = "text/csv";

const HEADER: [&str; 5] = ["Name", "Symbol", "Price", "24h Change", "Market Cap"];

/// Downloadable comparison table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub content: String,
    pub row_count: usize,
}

/// Builds the comparison CSV.
///
/// Rows follow snapshot order, not selection or display order. Selected ids
/// missing from the snapshot are skipped.
pub fn export_comparison(selection: &SelectionSet, snapshot: &AssetSnapshot) -> ExportArtifact {
    let rows: Vec<String> = snapshot
        .assets()
        .iter()
        .filter(|asset| selection.contains(&asset.id))
        .map(csv_row)
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(HEADER.join(","));
    lines.extend(rows.iter().cloned());

    ExportArtifact {
        file_name: EXPORT_FILE_NAME.to_string(),
        mime_type: EXPORT_MIME_TYPE.to_string(),
        content: lines.join("\n"),
        row_count: rows.len(),
    }
}

fn csv_row(asset: &Asset) -> String {
    [
        escape_field(&asset.name),
        escape_field(&asset.display_symbol()),
        asset.current_price.value().to_string(),
        asset.price_change_24h.value().to_string(),
        asset.market_cap.value().to_string(),
    ]
    .join(",")
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
