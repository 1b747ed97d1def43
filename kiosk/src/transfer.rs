//! Cross-office transfer cascade.
//!
//! Moving a visitor from a stale office/department into the kiosk's office
//! takes up to three remote mutations with a hard ordering: department-level
//! closes before office-level closes, and the new office open after every
//! close, so the service never holds a department log under a closed office
//! or two open office logs for one visitor. There is no rollback: a step
//! that fails leaves the earlier mutations committed, and the error records
//! how far the cascade got.

use chrono::NaiveDateTime;
use log::{error, info};

use gateway::GatewayError;
use gateway::images::migrate_photo;
use gateway::traits::log_gateway::VisitorLogGateway;
use gateway::types::{DepartmentLog, OfficeLog, format_wire_timestamp};

use crate::classifier::TargetDepartment;
use crate::error::KioskError;

/// The stale records a cross-office scan carries into the cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferCandidate {
    pub office_log: OfficeLog,
    pub department_log: Option<DepartmentLog>,
}

/// How far the cascade got before failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStep {
    CloseDepartment,
    CloseOffice,
    OpenOffice,
}

impl std::fmt::Display for TransferStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransferStep::CloseDepartment => "department close",
            TransferStep::CloseOffice => "office close",
            TransferStep::OpenOffice => "office open",
        };
        f.write_str(name)
    }
}

pub struct TransferReconciler<'a> {
    gateway: &'a dyn VisitorLogGateway,
}

impl<'a> TransferReconciler<'a> {
    pub fn new(gateway: &'a dyn VisitorLogGateway) -> Self {
        Self { gateway }
    }

    /// Runs the cascade for `candidate` and returns the visitor's new open
    /// office log.
    ///
    /// - Stale department log still open: close it, close the stale office
    ///   log marked `returned`, open the new office log.
    /// - Stale department log already closed: close the stale office log
    ///   marked `returned`, open the new office log.
    /// - No department log at all: system-initiated office sign-out, then
    ///   open the new office log.
    ///
    /// Photo migration runs last and never fails the transfer.
    pub async fn run(
        &self,
        candidate: &TransferCandidate,
        target: &TargetDepartment,
        now: NaiveDateTime,
        user_id: i64,
    ) -> Result<OfficeLog, KioskError> {
        let stale = &candidate.office_log;

        match &candidate.department_log {
            Some(dept) if dept.is_open() => {
                // An already-closed ack here just means the cascade's work
                // was done remotely; either way the office close may follow.
                self.gateway
                    .close_department_log(&dept.str_id, &dept.str_dept_log_in, now, user_id)
                    .await
                    .map_err(|e| abort(stale, TransferStep::CloseDepartment, e))?;
                self.gateway
                    .close_office_log(&stale.str_id, &stale.str_log_in, now, true)
                    .await
                    .map_err(|e| abort(stale, TransferStep::CloseOffice, e))?;
            }
            Some(_) => {
                self.gateway
                    .close_office_log(&stale.str_id, &stale.str_log_in, now, true)
                    .await
                    .map_err(|e| abort(stale, TransferStep::CloseOffice, e))?;
            }
            None => {
                self.gateway
                    .sign_out_office_log(&stale.str_id, &stale.str_log_in, now)
                    .await
                    .map_err(|e| abort(stale, TransferStep::CloseOffice, e))?;
            }
        }

        self.gateway
            .open_office_log(stale, target.office_id, now, user_id)
            .await
            .map_err(|e| abort(stale, TransferStep::OpenOffice, e))?;

        migrate_photo(self.gateway, stale.log_in, now).await;

        info!(
            "transferred ticket {} from office {} to office {}",
            stale.str_id, stale.office_id, target.office_id
        );

        Ok(reopened_log(stale, target.office_id, now))
    }
}

fn abort(stale: &OfficeLog, step: TransferStep, source: GatewayError) -> KioskError {
    error!(
        "transfer of ticket {} aborted at {}: {}",
        stale.str_id, step, source
    );
    KioskError::Transfer { step, source }
}

/// The new office log as the service now holds it: same ticket and visitor,
/// fresh login under the new office. The open endpoint only acknowledges
/// with a message, so the record is reconstructed locally.
fn reopened_log(previous: &OfficeLog, new_office_id: i64, opened_at: NaiveDateTime) -> OfficeLog {
    OfficeLog {
        id: previous.id,
        str_id: previous.str_id.clone(),
        log_in: opened_at,
        str_log_in: format_wire_timestamp(opened_at),
        log_out: None,
        log_date: opened_at.date(),
        visitor_id: previous.visitor_id,
        office_id: new_office_id,
        service_id: previous.service_id,
        spec_service: previous.spec_service.clone(),
        returned: false,
    }
}
