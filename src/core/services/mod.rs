pub mod user_service;

pub use user_service::{HttpUserService, UserApi};

pub use crate::errors::NetworkError;

pub type ServiceResult<T> = Result<T, NetworkError>;
