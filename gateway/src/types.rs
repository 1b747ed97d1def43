//! # Types Module
//!
//! Wire-level records exchanged with the visitor-log service. Field names
//! follow the service's camelCase JSON; timestamps travel as
//! `"%Y-%m-%d %H:%M:%S"` strings, with `strLogIn` / `strDeptLogIn` carrying
//! the canonical string form the service uses as part of its record keys.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Timestamp format used by the visitor-log service.
pub const WIRE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a timestamp in the service's canonical string form.
pub fn format_wire_timestamp(ts: NaiveDateTime) -> String {
    ts.format(WIRE_TIMESTAMP_FORMAT).to_string()
}

pub(crate) mod wire_ts {
    use super::WIRE_TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&ts.format(WIRE_TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(de)?;
        NaiveDateTime::parse_from_str(&raw, WIRE_TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

pub(crate) mod wire_ts_opt {
    use super::WIRE_TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &Option<NaiveDateTime>, ser: S) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => ser.serialize_str(&ts.format(WIRE_TIMESTAMP_FORMAT).to_string()),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(de)? {
            None => Ok(None),
            Some(raw) if raw.is_empty() => Ok(None),
            Some(raw) => NaiveDateTime::parse_from_str(&raw, WIRE_TIMESTAMP_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// One office-level visit. `log_out == None` means the visitor is currently
/// signed into this office; the service keeps at most one such record per
/// visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeLog {
    pub id: i64,
    /// Ticket code, stable across the office and department logs of a visit.
    pub str_id: String,
    #[serde(with = "wire_ts")]
    pub log_in: NaiveDateTime,
    /// Canonical string form of `log_in`; part of the service's record key.
    pub str_log_in: String,
    #[serde(with = "wire_ts_opt", default)]
    pub log_out: Option<NaiveDateTime>,
    pub log_date: NaiveDate,
    pub visitor_id: i64,
    pub office_id: i64,
    pub service_id: i64,
    #[serde(default)]
    pub spec_service: Option<String>,
    /// True when the log was closed by an automatic transfer rather than a
    /// manual sign-out. Downstream reporting relies on the distinction.
    pub returned: bool,
}

impl OfficeLog {
    #[inline]
    pub fn is_open(&self) -> bool {
        self.log_out.is_none()
    }
}

/// One department-level visit nested in an office visit, keyed by
/// `(str_id, str_dept_log_in)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentLog {
    pub id: i64,
    pub str_id: String,
    #[serde(with = "wire_ts")]
    pub dept_log_in: NaiveDateTime,
    pub str_dept_log_in: String,
    #[serde(with = "wire_ts_opt", default)]
    pub dept_log_out: Option<NaiveDateTime>,
    pub dept_id: i64,
    #[serde(default)]
    pub reason: Option<String>,
}

impl DepartmentLog {
    #[inline]
    pub fn is_open(&self) -> bool {
        self.dept_log_out.is_none()
    }
}

/// Existence flags for a visitor's ID photo and face photo under one
/// timestamp-derived filename token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePair {
    pub id_exists: bool,
    pub photo_exists: bool,
}

/// Outcome of closing a department log. The service reports an already
/// closed log through an error code, but callers treat it as a normal
/// outcome, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartmentCloseAck {
    Closed,
    AlreadyClosed,
}
