//!
//! # VisitorLogGateway Trait
//!
//! The remote operations the kiosk workflows need from the visitor-log
//! service. Every call maps to one bounded request; none of the mutations
//! are transactional with each other, and the gateway never retries.
//! Callers decide recovery.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::GatewayError;
use crate::types::{DepartmentCloseAck, DepartmentLog, ImagePair, OfficeLog};

#[async_trait]
pub trait VisitorLogGateway: Send + Sync {
    /// Fetches the visitor's most recent office log for the current date.
    /// `None` when no record matches the ticket.
    async fn fetch_office_log(&self, ticket: &str) -> Result<Option<OfficeLog>, GatewayError>;

    /// Fetches the visitor's most recent department log for the current
    /// date. `None` when the visitor never reached a department desk.
    async fn fetch_department_log(
        &self,
        ticket: &str,
    ) -> Result<Option<DepartmentLog>, GatewayError>;

    /// Reports whether the ID and face photos exist under `token`.
    async fn fetch_image_pair(&self, token: &str) -> Result<ImagePair, GatewayError>;

    /// Opens a department visit under `office_log`, which must still be
    /// open on the service side.
    async fn create_department_log(
        &self,
        office_log: &OfficeLog,
        department_id: i64,
        reason: &str,
        user_id: i64,
    ) -> Result<(), GatewayError>;

    /// Closes the department log keyed by `(str_id, str_dept_log_in)`.
    /// An already closed log is reported through the ack, not as an error.
    async fn close_department_log(
        &self,
        str_id: &str,
        str_dept_log_in: &str,
        closed_at: NaiveDateTime,
        user_id: i64,
    ) -> Result<DepartmentCloseAck, GatewayError>;

    /// Closes the office log keyed by `(str_id, str_log_in)`.
    /// `mark_returned` tags the closure as caused by a transfer rather than
    /// a manual sign-out.
    async fn close_office_log(
        &self,
        str_id: &str,
        str_log_in: &str,
        closed_at: NaiveDateTime,
        mark_returned: bool,
    ) -> Result<(), GatewayError>;

    /// System-initiated office close, used when a transfer finds no
    /// department log to cascade from. Distinct from [`close_office_log`]:
    /// the closure is recorded under the service's `sysLogOut` field.
    ///
    /// [`close_office_log`]: VisitorLogGateway::close_office_log
    async fn sign_out_office_log(
        &self,
        str_id: &str,
        str_log_in: &str,
        closed_at: NaiveDateTime,
    ) -> Result<(), GatewayError>;

    /// Opens a new office log for the same visitor/ticket under
    /// `new_office_id`, carrying forward the visitor, service and
    /// special-service fields of `previous`.
    async fn open_office_log(
        &self,
        previous: &OfficeLog,
        new_office_id: i64,
        opened_at: NaiveDateTime,
        user_id: i64,
    ) -> Result<(), GatewayError>;

    /// Copies a stored photo under a new filename. Best-effort: callers
    /// must not let a failure here block the surrounding workflow.
    async fn duplicate_image(
        &self,
        filename: &str,
        new_filename: &str,
    ) -> Result<(), GatewayError>;
}
