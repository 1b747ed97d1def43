//! Per-device scan session.
//!
//! [`VisitorSession`] owns the state of one scan lifecycle:
//! `Idle -> {RecordVisit | ConfirmTransfer | SignOut} -> Idle`. The
//! transient classifying phase lives inside [`VisitorSession::submit_scan`],
//! whose `&mut self` receiver also gates concurrent input: a scan arriving
//! while another trigger is mid-flight cannot be dispatched, and one
//! arriving outside `Idle` is rejected with
//! [`KioskError::InvalidState`].

use chrono::{Local, NaiveDateTime};
use log::warn;
use serde::Deserialize;
use validator::Validate;

use gateway::images::token_from_timestamp;
use gateway::traits::log_gateway::VisitorLogGateway;
use gateway::types::{DepartmentCloseAck, DepartmentLog, ImagePair, OfficeLog};

use crate::classifier::{ScanClassification, TargetDepartment, classify};
use crate::error::KioskError;
use crate::transfer::{TransferCandidate, TransferReconciler};

/// Purpose-of-visit entry, validated before any remote call is made.
#[derive(Debug, Deserialize, Validate)]
pub struct VisitPurposeForm {
    #[validate(length(min = 1, message = "Purpose of visit is required"))]
    pub reason: String,
}

/// What the presentation layer should be showing.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Waiting for a decoded ticket.
    Idle,
    /// Detail-entry step: operator must supply a purpose of visit.
    RecordVisit {
        office_log: OfficeLog,
        /// Existence flags for the visitor's photos, when they could be
        /// loaded.
        images: Option<ImagePair>,
    },
    /// Operator must confirm or cancel a cross-office transfer.
    ConfirmTransfer { candidate: TransferCandidate },
    /// Operator must confirm a department-level sign-out.
    SignOut {
        office_log: OfficeLog,
        department_log: DepartmentLog,
    },
}

/// Distinguishes the sign-out confirmations the UI words differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutOutcome {
    SignedOut,
    /// The service reported the department log already closed; shown as
    /// "Visitor Already Logged Out" rather than an error.
    AlreadyClosed,
}

pub struct VisitorSession<G: VisitorLogGateway> {
    gateway: G,
    target: TargetDepartment,
    user_id: i64,
    ticket: Option<String>,
    state: SessionState,
}

impl<G: VisitorLogGateway> VisitorSession<G> {
    pub fn new(gateway: G, target: TargetDepartment, user_id: i64) -> Self {
        Self {
            gateway,
            target,
            user_id,
            ticket: None,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The ticket of the scan currently being handled, for re-rendering by
    /// camera and manual-entry adapters.
    pub fn last_ticket(&self) -> Option<&str> {
        self.ticket.as_deref()
    }

    /// Handles a decoded ticket: fetches the visitor's logs, classifies
    /// them, and moves to the matching workflow state. Only accepted while
    /// `Idle`; read failures leave the session `Idle`.
    pub async fn submit_scan(&mut self, ticket: &str) -> Result<&SessionState, KioskError> {
        if self.state != SessionState::Idle {
            return Err(KioskError::InvalidState { action: "scan" });
        }

        let ticket = ticket.trim();
        if ticket.is_empty() {
            return Err(KioskError::Validation("Ticket code is required".into()));
        }

        let office_log = self.gateway.fetch_office_log(ticket).await?;
        let department_log = self.gateway.fetch_department_log(ticket).await?;

        match classify(office_log, department_log, &self.target) {
            ScanClassification::NotFound => Err(KioskError::TicketNotFound(ticket.to_owned())),
            ScanClassification::AlreadyLoggedOut { .. } => Err(KioskError::AlreadySignedOut),
            ScanClassification::SameOfficeActive { office_log } => {
                let images = self.fetch_images(office_log.log_in).await;
                self.ticket = Some(ticket.to_owned());
                self.state = SessionState::RecordVisit { office_log, images };
                Ok(&self.state)
            }
            ScanClassification::SameOfficeSignOut {
                office_log,
                department_log,
            } => {
                self.ticket = Some(ticket.to_owned());
                self.state = SessionState::SignOut {
                    office_log,
                    department_log,
                };
                Ok(&self.state)
            }
            ScanClassification::CrossOfficeTransfer {
                office_log,
                department_log,
            } => {
                self.ticket = Some(ticket.to_owned());
                self.state = SessionState::ConfirmTransfer {
                    candidate: TransferCandidate {
                        office_log,
                        department_log,
                    },
                };
                Ok(&self.state)
            }
        }
    }

    /// Submits the purpose of visit and opens the department log. An empty
    /// or whitespace-only purpose is rejected without a remote call and the
    /// session stays in `RecordVisit` for re-entry; otherwise the session
    /// returns to `Idle`, successful or not.
    pub async fn submit_visit_purpose(&mut self, text: &str) -> Result<(), KioskError> {
        let SessionState::RecordVisit { office_log, .. } = &self.state else {
            return Err(KioskError::InvalidState {
                action: "record visit",
            });
        };

        let form = VisitPurposeForm {
            reason: text.trim().to_owned(),
        };
        if let Err(errors) = form.validate() {
            return Err(KioskError::Validation(common::format_validation_errors(
                &errors,
            )));
        }

        let result = self
            .gateway
            .create_department_log(office_log, self.target.department_id, &form.reason, self.user_id)
            .await;
        self.reset();
        result.map_err(KioskError::from)
    }

    /// Confirms or cancels a pending transfer. Cancel discards the stale
    /// candidates. Confirm runs the cascade and, on success, seeds
    /// `RecordVisit` with the visitor's new office log; on failure the
    /// session returns to `Idle` with the remote side left as far as the
    /// cascade got.
    pub async fn confirm_transfer(&mut self, accept: bool) -> Result<&SessionState, KioskError> {
        let candidate = match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::ConfirmTransfer { candidate } => candidate,
            other => {
                self.state = other;
                return Err(KioskError::InvalidState { action: "transfer" });
            }
        };

        if !accept {
            self.reset();
            return Ok(&self.state);
        }

        let now = Local::now().naive_local();
        let reconciler = TransferReconciler::new(&self.gateway);
        match reconciler.run(&candidate, &self.target, now, self.user_id).await {
            Ok(new_log) => {
                let images = self.fetch_images(new_log.log_in).await;
                self.state = SessionState::RecordVisit {
                    office_log: new_log,
                    images,
                };
                Ok(&self.state)
            }
            Err(err) => {
                self.reset();
                Err(err)
            }
        }
    }

    /// Confirms the department-level sign-out. A fetch result missing its
    /// record keys is rejected before any remote call; the already-closed
    /// service response is a normal outcome, not an error.
    pub async fn confirm_sign_out(&mut self) -> Result<SignOutOutcome, KioskError> {
        let SessionState::SignOut { department_log, .. } = &self.state else {
            return Err(KioskError::InvalidState { action: "sign out" });
        };

        if department_log.str_id.trim().is_empty()
            || department_log.str_dept_log_in.trim().is_empty()
        {
            self.reset();
            return Err(KioskError::Validation(
                "Sign-out record is incomplete; please scan again".into(),
            ));
        }

        let now = Local::now().naive_local();
        let ack = self
            .gateway
            .close_department_log(
                &department_log.str_id,
                &department_log.str_dept_log_in,
                now,
                self.user_id,
            )
            .await;
        self.reset();

        match ack? {
            DepartmentCloseAck::Closed => Ok(SignOutOutcome::SignedOut),
            DepartmentCloseAck::AlreadyClosed => Ok(SignOutOutcome::AlreadyClosed),
        }
    }

    fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.ticket = None;
    }

    async fn fetch_images(&self, login: NaiveDateTime) -> Option<ImagePair> {
        let token = token_from_timestamp(login);
        match self.gateway.fetch_image_pair(&token).await {
            Ok(pair) => Some(pair),
            Err(err) => {
                warn!("could not load visitor images for {}: {}", token, err);
                None
            }
        }
    }
}
