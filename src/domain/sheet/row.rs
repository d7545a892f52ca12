//! Sheet rows and their classification.
//!
//! Columns are fixed: A holds the question number, B the question text,
//! C the answer letter and D the option text. Anything right of D is ignored.

/// Column index of the question number.
pub const NUMBER_COLUMN: usize = 0;
/// Column index of the question text.
pub const QUESTION_COLUMN: usize = 1;
/// Column index of the answer letter.
pub const ANSWER_COLUMN: usize = 2;
/// Column index of the option text.
pub const OPTION_COLUMN: usize = 3;

/// One row of cells as returned by the spreadsheet provider.
///
/// Providers trim trailing empty cells, so rows may be shorter than four
/// columns; missing cells read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
    cells: Vec<String>,
}

impl SheetRow {
    /// Creates a row from its cell values, left to right.
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the cell at `index`, or `""` past the end of the row.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn number(&self) -> &str {
        self.cell(NUMBER_COLUMN)
    }

    pub fn question(&self) -> &str {
        self.cell(QUESTION_COLUMN)
    }

    pub fn answer(&self) -> &str {
        self.cell(ANSWER_COLUMN)
    }

    pub fn option(&self) -> &str {
        self.cell(OPTION_COLUMN)
    }

    /// Classifies the row.
    pub fn classify(&self) -> RowKind<'_> {
        let number = self.number();
        let question = self.question();
        let answer = self.answer();
        let option = self.option();

        match (
            number.is_empty(),
            question.is_empty(),
            answer.is_empty(),
            option.is_empty(),
        ) {
            (true, true, true, false) => RowKind::ContinuationOption { option },
            (false, false, false, false) => RowKind::ItemHeader {
                number,
                question,
                answer,
                option,
            },
            _ => RowKind::Malformed,
        }
    }
}

/// What a row contributes to the item being accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind<'a> {
    /// Only the option cell is filled: another choice for the current item.
    ContinuationOption { option: &'a str },

    /// All four cells are filled: starts a new item with its first choice.
    ItemHeader {
        number: &'a str,
        question: &'a str,
        answer: &'a str,
        option: &'a str,
    },

    /// Any other combination of filled and empty cells.
    Malformed,
}
