//! # Gateway Library
//!
//! Thin client for the remote visitor-log service. The service is the sole
//! system of record for office and department visits; this crate exposes its
//! operations behind the [`VisitorLogGateway`] trait so workflow code can run
//! against the HTTP implementation or an in-memory double.
//!
//! ## Key Concepts
//! - **Office log**: top-level record of a visitor's presence in an office.
//! - **Department log**: nested record of a visit to one department desk,
//!   keyed by `(strId, strDeptLogIn)` under an open office log.
//! - **Image tokens**: visitor ID/face photos are stored under filenames
//!   derived from the office login timestamp; see [`images`].

pub mod error;
pub mod http;
pub mod images;
pub mod traits;
pub mod types;

pub use error::GatewayError;
pub use http::HttpVisitorLogGateway;
pub use traits::log_gateway::VisitorLogGateway;
pub use types::{DepartmentCloseAck, DepartmentLog, ImagePair, OfficeLog};
