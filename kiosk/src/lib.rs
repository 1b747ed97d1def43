//! # Kiosk Library
//!
//! Core sign-in/sign-out reconciliation for a visitor-management kiosk.
//! A scanned or typed ticket code is checked against the remote visitor-log
//! service and routed into exactly one workflow: record a department visit,
//! sign the visitor out of the department, or transfer the visitor from
//! another office with a cascading close/reopen.
//!
//! ## Key Concepts
//! - **Classifier**: pure projection of the fetched office/department logs
//!   into one of five scan classifications.
//! - **TransferReconciler**: the ordered close/open cascade that moves a
//!   visitor between offices, including best-effort photo migration.
//! - **VisitorSession**: the per-device state machine the presentation
//!   layer drives through four trigger methods.

pub mod classifier;
pub mod error;
pub mod session;
pub mod transfer;

pub use classifier::{ScanClassification, TargetDepartment, classify};
pub use error::KioskError;
pub use session::{SessionState, SignOutOutcome, VisitPurposeForm, VisitorSession};
pub use transfer::{TransferCandidate, TransferReconciler, TransferStep};
