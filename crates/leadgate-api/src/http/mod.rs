//! REST API: router, handlers, extractors, and the envelope format.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
