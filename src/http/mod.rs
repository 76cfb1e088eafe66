//! HTTP/1.1 request execution.
//!
//! - [`transaction`]: one request/response exchange, cookie jar included
//! - [`streamfactory`]: per-request connections
//! - [`requestbody`] / [`responsebody`]: body encoding and line-wise reading

pub mod requestbody;
pub mod response;
pub mod responsebody;
pub mod streamfactory;
pub mod transaction;

// Re-exports for convenience
pub use requestbody::RequestBody;
pub use response::HttpResponse;
pub use responsebody::{LineMode, ResponseBody};
