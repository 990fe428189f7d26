pub mod errors;

pub use errors::{ApiError, ClientError, ClientResult};
