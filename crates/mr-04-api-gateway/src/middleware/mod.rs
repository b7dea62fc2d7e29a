//! Middleware stack for the API Gateway.
//!
//! Layer order: Request → BodyLimit → HTTP trace → RequestSpan → Handler

pub mod tracing;

pub use self::tracing::{RequestSpanLayer, REQUEST_ID_HEADER};
