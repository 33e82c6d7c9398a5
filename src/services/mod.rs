pub mod categories;
pub mod errors;
pub mod gated_write;

pub use errors::{ServiceError, ServiceResult};
