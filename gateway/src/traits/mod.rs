//!
//! Traits Module
//!
//! Seams between the kiosk workflows and the remote visitor-log service.
//!
//! - [`log_gateway`]: Defines the [`VisitorLogGateway`](log_gateway::VisitorLogGateway)
//!   trait over the service's remote operations.
//!
//! Implement these traits to run the workflows against a different transport
//! or an in-memory double in tests.

pub mod log_gateway;
