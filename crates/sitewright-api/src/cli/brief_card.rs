//! Brief card: the table shown before the user confirms a build.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};

use sitewright_types::brief::{Brief, BriefField};

/// Render the brief as a two-column table. Missing required fields are
/// flagged, missing optional ones are dimmed.
pub fn render(brief: &Brief) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Field").fg(Color::White),
        Cell::new("Value").fg(Color::White),
    ]);

    for field in BriefField::ALL {
        let value = match brief.get(field) {
            Some(v) => Cell::new(v).fg(Color::Cyan),
            None if field.is_required() => Cell::new("missing").fg(Color::Red),
            None => Cell::new("-").fg(Color::DarkGrey),
        };
        table.add_row(vec![Cell::new(field.label()), value]);
    }
    table
}
