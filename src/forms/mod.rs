//! Field validation and the record form state machine.

pub mod record_form;
pub mod validation;

pub use record_form::{FormError, FormMode, FormState, RecordForm, SubmitRejection};
pub use validation::{validate, ErrorSet};
