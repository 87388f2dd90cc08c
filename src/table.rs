//! Tabular rendering
//!
//! Result types describe themselves as a header row followed by data rows;
//! [`render`] lays that out for a terminal.

use comfy_table::{presets::UTF8_HORIZONTAL_ONLY, Attribute, Cell, ContentArrangement};

/// A result that can be shown as a table.
///
/// The first row is the header; every following row has the same width.
pub trait Table {
    fn table(&self) -> Vec<Vec<String>>;
}

/// Render a result for a terminal of the given width
pub fn render<T: Table + ?Sized>(result: &T, width: u16) -> String {
    let mut rows = result.table().into_iter();

    let mut table = comfy_table::Table::new();
    table
        .load_preset(UTF8_HORIZONTAL_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(width);

    if let Some(header) = rows.next() {
        table.set_header(
            header
                .into_iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    }
    for row in rows {
        table.add_row(row);
    }

    table.to_string()
}
