#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use std::sync::{Arc, Mutex, MutexGuard};

use gateway::GatewayError;
use gateway::traits::log_gateway::VisitorLogGateway;
use gateway::types::{
    DepartmentCloseAck, DepartmentLog, ImagePair, OfficeLog, format_wire_timestamp,
};
use kiosk::TargetDepartment;

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

pub fn office_log(ticket: &str, office_id: i64, log_in: &str, log_out: Option<&str>) -> OfficeLog {
    OfficeLog {
        id: 1,
        str_id: ticket.into(),
        log_in: ts(log_in),
        str_log_in: log_in.into(),
        log_out: log_out.map(ts),
        log_date: ts(log_in).date(),
        visitor_id: 7,
        office_id,
        service_id: 3,
        spec_service: None,
        returned: false,
    }
}

pub fn department_log(
    ticket: &str,
    dept_id: i64,
    dept_log_in: &str,
    dept_log_out: Option<&str>,
) -> DepartmentLog {
    DepartmentLog {
        id: 1,
        str_id: ticket.into(),
        dept_log_in: ts(dept_log_in),
        str_dept_log_in: dept_log_in.into(),
        dept_log_out: dept_log_out.map(ts),
        dept_id,
        reason: Some("Meeting".into()),
    }
}

pub fn target(office_id: i64) -> TargetDepartment {
    TargetDepartment {
        department_id: 12,
        office_id,
        name: "Records".into(),
    }
}

/// One remote operation as the mock observed it, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchOfficeLog(String),
    FetchDepartmentLog(String),
    FetchImagePair(String),
    CreateDepartmentLog { dept_id: i64, reason: String },
    CloseDepartmentLog { str_id: String, str_dept_log_in: String },
    CloseOfficeLog { str_id: String, returned: bool },
    SignOutOfficeLog { str_id: String },
    OpenOfficeLog { office_id: i64 },
    DuplicateImage { from: String, to: String },
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Call::FetchOfficeLog(_) | Call::FetchDepartmentLog(_) | Call::FetchImagePair(_)
        )
    }
}

/// Simulated remote state plus failure switches for individual operations.
#[derive(Default)]
pub struct MockState {
    pub office_logs: Vec<OfficeLog>,
    pub department_logs: Vec<DepartmentLog>,
    pub image_pair: Option<ImagePair>,
    pub calls: Vec<Call>,
    pub fail_fetch_office: bool,
    pub fail_fetch_images: bool,
    pub fail_create_department: bool,
    pub fail_close_department: bool,
    pub fail_close_office: bool,
    pub fail_open_office: bool,
    pub fail_duplicate_image: bool,
}

impl MockState {
    pub fn open_office_logs(&self, ticket: &str) -> usize {
        self.office_logs
            .iter()
            .filter(|log| log.str_id == ticket && log.is_open())
            .count()
    }

    pub fn mutations(&self) -> Vec<&Call> {
        self.calls.iter().filter(|c| c.is_mutation()).collect()
    }

    /// Position of the first call matching `pred`, for ordering assertions.
    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls.iter().position(pred)
    }
}

fn service_down() -> GatewayError {
    GatewayError::UnexpectedStatus {
        endpoint: "mock",
        status: 500,
    }
}

/// Scripted in-memory stand-in for the visitor-log service. Clones share
/// state, so tests keep a handle while the session owns another.
#[derive(Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl VisitorLogGateway for MockGateway {
    async fn fetch_office_log(&self, ticket: &str) -> Result<Option<OfficeLog>, GatewayError> {
        let mut state = self.state();
        state.calls.push(Call::FetchOfficeLog(ticket.into()));
        if state.fail_fetch_office {
            return Err(service_down());
        }
        Ok(state
            .office_logs
            .iter()
            .filter(|log| log.str_id == ticket)
            .max_by_key(|log| log.log_in)
            .cloned())
    }

    async fn fetch_department_log(
        &self,
        ticket: &str,
    ) -> Result<Option<DepartmentLog>, GatewayError> {
        let mut state = self.state();
        state.calls.push(Call::FetchDepartmentLog(ticket.into()));
        Ok(state
            .department_logs
            .iter()
            .filter(|log| log.str_id == ticket)
            .max_by_key(|log| log.dept_log_in)
            .cloned())
    }

    async fn fetch_image_pair(&self, token: &str) -> Result<ImagePair, GatewayError> {
        let mut state = self.state();
        state.calls.push(Call::FetchImagePair(token.into()));
        if state.fail_fetch_images {
            return Err(service_down());
        }
        Ok(state.image_pair.unwrap_or(ImagePair {
            id_exists: false,
            photo_exists: false,
        }))
    }

    async fn create_department_log(
        &self,
        office_log: &OfficeLog,
        department_id: i64,
        reason: &str,
        _user_id: i64,
    ) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.calls.push(Call::CreateDepartmentLog {
            dept_id: department_id,
            reason: reason.into(),
        });
        if state.fail_create_department {
            return Err(service_down());
        }

        let parent_open = state
            .office_logs
            .iter()
            .any(|log| log.str_id == office_log.str_id && log.is_open());
        if !parent_open {
            return Err(GatewayError::Service {
                code: 1,
                message: "office log is not open".into(),
            });
        }

        let now = Local::now().naive_local();
        let id = state.department_logs.len() as i64 + 1;
        state.department_logs.push(DepartmentLog {
            id,
            str_id: office_log.str_id.clone(),
            dept_log_in: now,
            str_dept_log_in: format_wire_timestamp(now),
            dept_log_out: None,
            dept_id: department_id,
            reason: Some(reason.into()),
        });
        Ok(())
    }

    async fn close_department_log(
        &self,
        str_id: &str,
        str_dept_log_in: &str,
        closed_at: NaiveDateTime,
        _user_id: i64,
    ) -> Result<DepartmentCloseAck, GatewayError> {
        let mut state = self.state();
        state.calls.push(Call::CloseDepartmentLog {
            str_id: str_id.into(),
            str_dept_log_in: str_dept_log_in.into(),
        });
        if state.fail_close_department {
            return Err(service_down());
        }

        let log = state
            .department_logs
            .iter_mut()
            .find(|log| log.str_id == str_id && log.str_dept_log_in == str_dept_log_in);
        match log {
            Some(log) if log.is_open() => {
                log.dept_log_out = Some(closed_at);
                Ok(DepartmentCloseAck::Closed)
            }
            Some(_) => Ok(DepartmentCloseAck::AlreadyClosed),
            None => Err(GatewayError::Service {
                code: 3,
                message: "department log not found".into(),
            }),
        }
    }

    async fn close_office_log(
        &self,
        str_id: &str,
        str_log_in: &str,
        closed_at: NaiveDateTime,
        mark_returned: bool,
    ) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.calls.push(Call::CloseOfficeLog {
            str_id: str_id.into(),
            returned: mark_returned,
        });
        if state.fail_close_office {
            return Err(service_down());
        }

        let log = state
            .office_logs
            .iter_mut()
            .find(|log| log.str_id == str_id && log.str_log_in == str_log_in && log.is_open())
            .ok_or(GatewayError::Service {
                code: 3,
                message: "office log not found".into(),
            })?;
        log.log_out = Some(closed_at);
        log.returned = mark_returned;
        Ok(())
    }

    async fn sign_out_office_log(
        &self,
        str_id: &str,
        str_log_in: &str,
        closed_at: NaiveDateTime,
    ) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.calls.push(Call::SignOutOfficeLog {
            str_id: str_id.into(),
        });
        if state.fail_close_office {
            return Err(service_down());
        }

        let log = state
            .office_logs
            .iter_mut()
            .find(|log| log.str_id == str_id && log.str_log_in == str_log_in && log.is_open())
            .ok_or(GatewayError::Service {
                code: 3,
                message: "office log not found".into(),
            })?;
        log.log_out = Some(closed_at);
        log.returned = true;
        Ok(())
    }

    async fn open_office_log(
        &self,
        previous: &OfficeLog,
        new_office_id: i64,
        opened_at: NaiveDateTime,
        _user_id: i64,
    ) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.calls.push(Call::OpenOfficeLog {
            office_id: new_office_id,
        });
        if state.fail_open_office {
            return Err(service_down());
        }

        let id = state.office_logs.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        state.office_logs.push(OfficeLog {
            id,
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
        });
        Ok(())
    }

    async fn duplicate_image(
        &self,
        filename: &str,
        new_filename: &str,
    ) -> Result<(), GatewayError> {
        let mut state = self.state();
        state.calls.push(Call::DuplicateImage {
            from: filename.into(),
            to: new_filename.into(),
        });
        if state.fail_duplicate_image {
            return Err(service_down());
        }
        Ok(())
    }
}
