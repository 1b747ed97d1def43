use gateway::GatewayError;
use thiserror::Error;

use crate::transfer::TransferStep;

/// Represents all error types a scan workflow can surface to the
/// presentation layer.
///
/// Classification and validation errors are resolved locally without any
/// remote call; gateway errors propagate from whichever workflow step
/// failed. A transfer failure names the step reached, since earlier steps
/// of the cascade are already committed on the service and may need manual
/// reconciliation.
#[derive(Debug, Error)]
pub enum KioskError {
    /// No office log matches the scanned ticket.
    #[error("no visitor log matches ticket '{0}'")]
    TicketNotFound(String),

    /// The visitor's office log is already closed.
    #[error("visitor is already signed out")]
    AlreadySignedOut,

    /// Input rejected before any remote call (empty purpose, malformed
    /// sign-out target, blank ticket).
    #[error("{0}")]
    Validation(String),

    /// A trigger fired in a state that does not accept it, including scans
    /// arriving while a previous scan is still being processed.
    #[error("'{action}' is not available in the current state")]
    InvalidState { action: &'static str },

    /// A remote call failed outside the transfer cascade.
    #[error("failed to process ticket: {0}")]
    Gateway(#[from] GatewayError),

    /// The transfer cascade aborted mid-sequence. Completed steps are not
    /// rolled back.
    #[error("failed to transfer visitor (stopped at {step}): {source}")]
    Transfer {
        step: TransferStep,
        source: GatewayError,
    },
}
