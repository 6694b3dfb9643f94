#![doc(test(attr(deny(warnings))))]

//! User Admin provides the pieces of a small user-management screen: field
//! validation, a record form state machine, a record table, a REST client for
//! the users collection, and the page controller that ties them together.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod forms;
pub mod table;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("User Admin tracing initialized.");
    });
}
