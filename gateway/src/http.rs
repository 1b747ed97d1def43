//! HTTP implementation of [`VisitorLogGateway`] over the visitor-log
//! service's JSON API. One bounded request per operation; the timeout comes
//! from [`common::config::Config`] when built via [`HttpVisitorLogGateway::from_config`].

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use common::config::Config;

use crate::error::GatewayError;
use crate::traits::log_gateway::VisitorLogGateway;
use crate::types::{
    DepartmentCloseAck, DepartmentLog, ImagePair, OfficeLog, format_wire_timestamp,
};

/// Service error code meaning the department log was already closed.
pub const DEPT_ALREADY_CLOSED_CODE: i32 = 2;

pub struct HttpVisitorLogGateway {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceAck {
    #[serde(default)]
    error_code: i32,
    #[serde(default)]
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDepartmentLogRequest {
    log: DepartmentLogCreate,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DepartmentLogCreate {
    id: i64,
    str_id: String,
    log_in: String,
    dept_log_in: String,
    visitor_id: i64,
    dept_id: i64,
    reason: String,
    user_dept_log_in_id: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CloseDepartmentLogRequest {
    str_id: String,
    str_dept_log_in: String,
    dept_log_out: String,
    user_dept_log_out_id: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CloseOfficeLogRequest {
    str_id: String,
    str_log_in: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_out: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sys_log_out: Option<String>,
    returned: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OpenOfficeLogRequest {
    id: i64,
    str_id: String,
    log_in: String,
    log_in_date: String,
    visitor_id: i64,
    office_id: i64,
    service_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    spec_service: Option<String>,
    returned: bool,
    user_log_in_id: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DuplicateImageRequest {
    filename: String,
    new_filename: String,
}

impl HttpVisitorLogGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Builds a gateway from the initialized runtime [`Config`].
    pub fn from_config() -> Result<Self, GatewayError> {
        let config = Config::get();
        Self::new(
            config.visitor_log_base_url(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch a single current-day record; the service applies the same-day
    /// filter and answers 404 when nothing matches.
    async fn fetch_current<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        ticket: &str,
    ) -> Result<Option<T>, GatewayError> {
        let response = self
            .client
            .get(self.url(path))
            .query(&[("strId", ticket)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        check_status(endpoint, &response)?;
        decode(endpoint, response).await.map(Some)
    }
}

fn check_status(endpoint: &'static str, response: &reqwest::Response) -> Result<(), GatewayError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(GatewayError::UnexpectedStatus {
            endpoint,
            status: response.status().as_u16(),
        })
    }
}

async fn decode<T: DeserializeOwned>(
    endpoint: &'static str,
    response: reqwest::Response,
) -> Result<T, GatewayError> {
    let body = response.text().await?;
    serde_json::from_str::<T>(&body).map_err(|e| GatewayError::Decode {
        endpoint,
        detail: format!("error decoding response body: {}. Full response: {}", e, body),
    })
}

fn require_ok(ack: ServiceAck) -> Result<(), GatewayError> {
    if ack.error_code == 0 {
        Ok(())
    } else {
        Err(GatewayError::Service {
            code: ack.error_code,
            message: ack.message,
        })
    }
}

fn department_close_ack(ack: ServiceAck) -> Result<DepartmentCloseAck, GatewayError> {
    match ack.error_code {
        0 => Ok(DepartmentCloseAck::Closed),
        DEPT_ALREADY_CLOSED_CODE => Ok(DepartmentCloseAck::AlreadyClosed),
        code => Err(GatewayError::Service {
            code,
            message: ack.message,
        }),
    }
}

#[async_trait]
impl VisitorLogGateway for HttpVisitorLogGateway {
    async fn fetch_office_log(&self, ticket: &str) -> Result<Option<OfficeLog>, GatewayError> {
        self.fetch_current("office-log read", "/office-logs/current", ticket)
            .await
    }

    async fn fetch_department_log(
        &self,
        ticket: &str,
    ) -> Result<Option<DepartmentLog>, GatewayError> {
        self.fetch_current("department-log read", "/department-logs/current", ticket)
            .await
    }

    async fn fetch_image_pair(&self, token: &str) -> Result<ImagePair, GatewayError> {
        let endpoint = "image read";
        let response = self
            .client
            .get(self.url(&format!("/visitor-images/{}", token)))
            .send()
            .await?;
        check_status(endpoint, &response)?;
        decode(endpoint, response).await
    }

    async fn create_department_log(
        &self,
        office_log: &OfficeLog,
        department_id: i64,
        reason: &str,
        user_id: i64,
    ) -> Result<(), GatewayError> {
        let endpoint = "department-log create";
        let now = Local::now().naive_local();
        let body = CreateDepartmentLogRequest {
            log: DepartmentLogCreate {
                id: office_log.id,
                str_id: office_log.str_id.clone(),
                log_in: office_log.str_log_in.clone(),
                dept_log_in: format_wire_timestamp(now),
                visitor_id: office_log.visitor_id,
                dept_id: department_id,
                reason: reason.to_owned(),
                user_dept_log_in_id: user_id,
            },
        };

        let response = self
            .client
            .post(self.url("/department-logs"))
            .json(&body)
            .send()
            .await?;
        check_status(endpoint, &response)?;
        require_ok(decode(endpoint, response).await?)
    }

    async fn close_department_log(
        &self,
        str_id: &str,
        str_dept_log_in: &str,
        closed_at: NaiveDateTime,
        user_id: i64,
    ) -> Result<DepartmentCloseAck, GatewayError> {
        let endpoint = "department-log close";
        let body = CloseDepartmentLogRequest {
            str_id: str_id.to_owned(),
            str_dept_log_in: str_dept_log_in.to_owned(),
            dept_log_out: format_wire_timestamp(closed_at),
            user_dept_log_out_id: user_id,
        };

        let response = self
            .client
            .put(self.url("/department-logs/close"))
            .json(&body)
            .send()
            .await?;
        check_status(endpoint, &response)?;
        department_close_ack(decode(endpoint, response).await?)
    }

    async fn close_office_log(
        &self,
        str_id: &str,
        str_log_in: &str,
        closed_at: NaiveDateTime,
        mark_returned: bool,
    ) -> Result<(), GatewayError> {
        let endpoint = "office-log close";
        let body = CloseOfficeLogRequest {
            str_id: str_id.to_owned(),
            str_log_in: str_log_in.to_owned(),
            log_out: Some(format_wire_timestamp(closed_at)),
            sys_log_out: None,
            returned: mark_returned,
        };

        let response = self
            .client
            .put(self.url("/office-logs/close"))
            .json(&body)
            .send()
            .await?;
        check_status(endpoint, &response)
    }

    async fn sign_out_office_log(
        &self,
        str_id: &str,
        str_log_in: &str,
        closed_at: NaiveDateTime,
    ) -> Result<(), GatewayError> {
        let endpoint = "office-log sign-out";
        let body = CloseOfficeLogRequest {
            str_id: str_id.to_owned(),
            str_log_in: str_log_in.to_owned(),
            log_out: None,
            sys_log_out: Some(format_wire_timestamp(closed_at)),
            returned: true,
        };

        let response = self
            .client
            .put(self.url("/office-logs/close"))
            .json(&body)
            .send()
            .await?;
        check_status(endpoint, &response)
    }

    async fn open_office_log(
        &self,
        previous: &OfficeLog,
        new_office_id: i64,
        opened_at: NaiveDateTime,
        user_id: i64,
    ) -> Result<(), GatewayError> {
        let endpoint = "office-log open";
        let body = OpenOfficeLogRequest {
            id: previous.id,
            str_id: previous.str_id.clone(),
            log_in: format_wire_timestamp(opened_at),
            log_in_date: opened_at.date().format("%Y-%m-%d").to_string(),
            visitor_id: previous.visitor_id,
            office_id: new_office_id,
            service_id: previous.service_id,
            spec_service: previous.spec_service.clone(),
            returned: false,
            user_log_in_id: user_id,
        };

        let response = self
            .client
            .post(self.url("/office-logs"))
            .json(&body)
            .send()
            .await?;
        check_status(endpoint, &response)
    }

    async fn duplicate_image(
        &self,
        filename: &str,
        new_filename: &str,
    ) -> Result<(), GatewayError> {
        let endpoint = "image duplicate";
        let body = DuplicateImageRequest {
            filename: filename.to_owned(),
            new_filename: new_filename.to_owned(),
        };

        let response = self
            .client
            .post(self.url("/visitor-images/duplicate"))
            .json(&body)
            .send()
            .await?;
        check_status(endpoint, &response)
    }
}
