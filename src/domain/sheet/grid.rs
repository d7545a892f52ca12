//! Page geometry: which cells to fetch.

/// First sheet row holding data; row 1 is the header.
pub const FIRST_DATA_ROW: usize = 2;

/// Title of the page that documents the sheet and never becomes a section.
pub const README_SHEET: &str = "README";

/// Spreadsheet column letters for a 1-based column number.
///
/// Bijective base 26: 1 is `A`, 26 is `Z`, 27 is `AA`. Zero yields an
/// empty string.
pub fn column_letter(mut column: u32) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let remainder = (column - 1) % 26;
        letters.push(char::from(b'A' + remainder as u8));
        column = (column - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// A1-notation range covering every data row of a page.
///
/// Starts at `A2` and ends at the last used column and row reported in the
/// page's grid properties.
pub fn data_range(row_count: u32, column_count: u32) -> String {
    format!(
        "A{}:{}{}",
        FIRST_DATA_ROW,
        column_letter(column_count.max(1)),
        row_count.max(FIRST_DATA_ROW as u32)
    )
}
