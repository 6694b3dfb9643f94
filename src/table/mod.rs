//! Plain-text table rendering and the record table component.

pub mod record_table;
pub mod renderer;

pub use record_table::{RecordTable, RowAction, RowActions, TableError};
pub use renderer::{Alignment, Table, TableColumn};
