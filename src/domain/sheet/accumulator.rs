//! Row accumulator - groups a flat row stream into questions.
//!
//! A question starts at a row with every cell filled (its first option lives
//! on the same row) and continues through the option-only rows below it. The
//! accumulator is a two-state machine:
//!
//! | State        | Item header              | Continuation option | Malformed |
//! |--------------|--------------------------|---------------------|-----------|
//! | Empty        | start item               | error (orphan)      | error     |
//! | Accumulating | flush item, start next   | append option       | error     |
//!
//! End of input flushes whatever item is pending.

use super::answer::{answer_position, resolve_choices};
use super::grid::FIRST_DATA_ROW;
use super::row::{RowKind, SheetRow};
use super::SheetFormatError;
use crate::domain::assessment::ItemDraft;

/// Question being built from consecutive rows.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingItem {
    /// Sheet row of the header, for error reporting.
    row: usize,
    number: String,
    question: String,
    answer: String,
    options: Vec<String>,
}

impl PendingItem {
    fn into_item(self) -> Result<ItemDraft, SheetFormatError> {
        let order: i32 = self
            .number
            .parse()
            .map_err(|_| SheetFormatError::InvalidItemNumber {
                row: self.row,
                number: self.number.clone(),
            })?;

        let choice_count = self.options.len();
        let choices = answer_position(&self.answer)
            .and_then(|position| resolve_choices(self.options, position))
            .ok_or_else(|| SheetFormatError::AnswerOutOfRange {
                row: self.row,
                number: order,
                answer: self.answer.clone(),
                choices: choice_count,
            })?;

        Ok(ItemDraft {
            content: self.question,
            order,
            choices,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum State {
    #[default]
    Empty,
    Accumulating(PendingItem),
}

/// Explicit accumulator state, owned by whoever scans a page.
#[derive(Debug, Clone, Default)]
pub struct RowAccumulator {
    state: State,
}

impl RowAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a question is pending.
    pub fn is_accumulating(&self) -> bool {
        matches!(self.state, State::Accumulating(_))
    }

    /// Feeds one row; `sheet_row` is its 1-based row number in the sheet.
    ///
    /// Returns the previous question when this row starts a new one.
    pub fn push(
        &mut self,
        row: &SheetRow,
        sheet_row: usize,
    ) -> Result<Option<ItemDraft>, SheetFormatError> {
        match row.classify() {
            RowKind::ContinuationOption { option } => match &mut self.state {
                State::Accumulating(pending) => {
                    pending.options.push(option.to_string());
                    Ok(None)
                }
                State::Empty => Err(SheetFormatError::OrphanOption {
                    row: sheet_row,
                    option: option.to_string(),
                }),
            },
            RowKind::ItemHeader {
                number,
                question,
                answer,
                option,
            } => {
                let next = PendingItem {
                    row: sheet_row,
                    number: number.to_string(),
                    question: question.to_string(),
                    answer: answer.to_string(),
                    options: vec![option.to_string()],
                };
                match std::mem::replace(&mut self.state, State::Accumulating(next)) {
                    State::Accumulating(previous) => previous.into_item().map(Some),
                    State::Empty => Ok(None),
                }
            }
            RowKind::Malformed => Err(SheetFormatError::MalformedRow {
                row: sheet_row,
                number: row.number().to_string(),
                question: row.question().to_string(),
                answer: row.answer().to_string(),
                option: row.option().to_string(),
            }),
        }
    }

    /// Flushes the pending question at end of input.
    pub fn finish(self) -> Result<Option<ItemDraft>, SheetFormatError> {
        match self.state {
            State::Accumulating(pending) => pending.into_item().map(Some),
            State::Empty => Ok(None),
        }
    }
}

/// Lazy scan of a page's rows into questions.
///
/// Yields each question as soon as the row after it is seen and the last one
/// at end of input. After the first error the scan is exhausted.
pub struct ItemScan<I> {
    rows: I,
    accumulator: Option<RowAccumulator>,
    next_row: usize,
}

impl<I> ItemScan<I>
where
    I: Iterator<Item = SheetRow>,
{
    /// Scans data rows starting at the sheet's first data row.
    pub fn new(rows: I) -> Self {
        Self {
            rows,
            accumulator: Some(RowAccumulator::new()),
            next_row: FIRST_DATA_ROW,
        }
    }
}

impl<I> Iterator for ItemScan<I>
where
    I: Iterator<Item = SheetRow>,
{
    type Item = Result<ItemDraft, SheetFormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        let accumulator = self.accumulator.as_mut()?;

        for row in self.rows.by_ref() {
            let sheet_row = self.next_row;
            self.next_row += 1;

            match accumulator.push(&row, sheet_row) {
                Ok(Some(item)) => return Some(Ok(item)),
                Ok(None) => {}
                Err(e) => {
                    self.accumulator = None;
                    return Some(Err(e));
                }
            }
        }

        self.accumulator.take()?.finish().transpose()
    }
}

/// Scans all rows, stopping at the first format error.
pub fn scan_items<I>(rows: I) -> Result<Vec<ItemDraft>, SheetFormatError>
where
    I: IntoIterator<Item = SheetRow>,
{
    ItemScan::new(rows.into_iter()).collect()
}
