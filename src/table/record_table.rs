//! Stateless record table.
//!
//! Renders one row per record and routes row actions to a caller-supplied
//! [`RowActions`] implementation. Rows are addressed by their 1-based
//! position, matching the numbers shown in the first column.

use thiserror::Error;

use crate::domain::{FieldDefinition, Record, RecordId};

use super::renderer::{Alignment, Table, TableColumn};

pub const ACTIONS_LABEL: &str = "edit | delete";

/// Action controls available on every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Delete,
}

/// Callbacks invoked when a row action fires.
pub trait RowActions {
    type Output;

    fn on_edit(&mut self, record: &Record) -> Self::Output;
    fn on_delete(&mut self, id: &RecordId) -> Self::Output;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("row {row} does not exist (table has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },
    #[error("row {0} has no identifier yet")]
    MissingId(usize),
}

pub struct RecordTable<'a> {
    fields: &'a [FieldDefinition],
    records: &'a [Record],
    plain: bool,
    max_cell_width: Option<usize>,
}

impl<'a> RecordTable<'a> {
    pub fn new(fields: &'a [FieldDefinition], records: &'a [Record]) -> Self {
        Self {
            fields,
            records,
            plain: false,
            max_cell_width: None,
        }
    }

    pub fn plain(mut self, plain: bool) -> Self {
        self.plain = plain;
        self
    }

    pub fn max_cell_width(mut self, width: Option<usize>) -> Self {
        self.max_cell_width = width;
        self
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn render(&self) -> String {
        let mut columns = Vec::with_capacity(self.fields.len() + 2);
        columns.push(TableColumn::new("#").aligned(Alignment::Right));
        for field in self.fields {
            columns.push(TableColumn::new(field.label.clone()).max_width(self.max_cell_width));
        }
        columns.push(TableColumn::new("Actions").aligned(Alignment::Right));

        let rows = self
            .records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let mut row = Vec::with_capacity(columns.len());
                row.push((idx + 1).to_string());
                row.extend(self.fields.iter().map(|field| record.text(&field.name)));
                row.push(ACTIONS_LABEL.to_string());
                row
            })
            .collect();

        Table {
            columns,
            rows,
            padding: 1,
            plain: self.plain,
        }
        .render()
    }

    /// Fires `action` for the record shown at 1-based position `row`.
    pub fn trigger<H: RowActions>(
        &self,
        row: usize,
        action: RowAction,
        handler: &mut H,
    ) -> Result<H::Output, TableError> {
        let record = row
            .checked_sub(1)
            .and_then(|idx| self.records.get(idx))
            .ok_or(TableError::RowOutOfRange {
                row,
                rows: self.records.len(),
            })?;

        match action {
            RowAction::Edit => Ok(handler.on_edit(record)),
            RowAction::Delete => {
                let id = record.id.as_ref().ok_or(TableError::MissingId(row))?;
                Ok(handler.on_delete(id))
            }
        }
    }
}
