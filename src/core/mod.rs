pub mod services;
pub mod store;
pub mod users_page;
pub mod utils;
