//! Plain data types shared by the form, the table, and the page controller.

pub mod field;
pub mod record;

pub use field::{FieldDefinition, FieldType};
pub use record::{Draft, Record, RecordId};
