//! Verification report retrieval and decoding.
//!
//! Report records come from an external endpoint keyed by literal bilingual
//! field labels; those labels are part of the wire contract and must be
//! preserved character-for-character. The raw result/closure strings are
//! categorical by a single recognized literal each: they are inspected
//! exactly once here and decoded into two-variant enums, so nothing
//! downstream ever re-reads the raw strings.

use crate::error::ApiError;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};

/// The one raw string that counts as an acceptable result. Anything else,
/// including a typo or different casing, is not acceptable.
pub const ACCEPTABLE_LITERAL: &str = "ACEPTABLE 可接受";

/// The one raw string that counts as a closed report.
pub const CLOSED_LITERAL: &str = "CERRADO";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationResult {
    Acceptable,
    NotAcceptable,
}

impl VerificationResult {
    fn from_raw(raw: &str) -> Self {
        if raw == ACCEPTABLE_LITERAL {
            VerificationResult::Acceptable
        } else {
            VerificationResult::NotAcceptable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureState {
    Closed,
    Pending,
}

impl ClosureState {
    fn from_raw(raw: &str) -> Self {
        if raw == CLOSED_LITERAL {
            ClosureState::Closed
        } else {
            ClosureState::Pending
        }
    }
}

/// Wire shape of a report record. Field labels are bilingual literals owned
/// by the external endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReport {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Fecha de verificación 验证日期", default)]
    pub verification_date: String,
    #[serde(rename = "Centro de trabajo 地点", default)]
    pub work_center: String,
    #[serde(rename = "Proceso/tarea verificada 流程/任务已验证", default)]
    pub task: String,
    #[serde(rename = "Resultado Final 底線", default)]
    pub result: String,
    #[serde(rename = "Estado del cierre", default)]
    pub closure_status: String,
    #[serde(rename = "Link_PDF 連結_PDF", default)]
    pub pdf_link: String,
}

/// Decoded report used by the rest of the system.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: String,
    /// Raw date field, kept for display.
    pub verification_date_raw: String,
    /// Parsed verification date; `None` when the raw field is malformed.
    pub verification_date: Option<NaiveDate>,
    pub work_center: String,
    pub task: String,
    pub result: VerificationResult,
    pub closure: ClosureState,
    pub pdf_link: String,
}

impl AsRef<Report> for Report {
    fn as_ref(&self) -> &Report {
        self
    }
}

impl From<RawReport> for Report {
    fn from(raw: RawReport) -> Self {
        Report {
            verification_date: parse_verification_date(&raw.verification_date),
            verification_date_raw: raw.verification_date,
            result: VerificationResult::from_raw(&raw.result),
            closure: ClosureState::from_raw(&raw.closure_status),
            id: raw.id,
            work_center: raw.work_center,
            task: raw.task,
            pdf_link: raw.pdf_link,
        }
    }
}

/// Parse the day/month/year date embedded as the first space-delimited token
/// of the date field (e.g. `"15/03/2026 10:30"`).
///
/// Malformed input degrades to `None`; it never panics.
pub fn parse_verification_date(raw: &str) -> Option<NaiveDate> {
    let token = raw.split_whitespace().next()?;
    let mut parts = token.split('/');
    let day: u32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Response envelope of the reports endpoint.
#[derive(Debug, Deserialize)]
struct ReportsEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<Vec<RawReport>>,
    #[serde(default)]
    message: Option<String>,
}

/// Client for the external reports endpoint.
#[derive(Debug, Clone)]
pub struct ReportClient {
    http: reqwest::Client,
    endpoint: Option<String>,
}

impl ReportClient {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Fetch all report records.
    ///
    /// An unconfigured endpoint yields an empty list, not an error. A
    /// transport failure (host unreachable) is distinguished from a
    /// structured error response.
    pub async fn fetch_reports(&self) -> Result<Vec<Report>, ApiError> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            warn!("Reports endpoint not configured, returning empty list");
            return Ok(Vec::new());
        };

        let response = self
            .http
            .get(endpoint)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|_| ApiError::EndpointUnreachable)?;

        if !response.status().is_success() {
            return Err(ApiError::ReportsApi(format!("HTTP {}", response.status())));
        }

        let envelope: ReportsEnvelope = response
            .json()
            .await
            .map_err(|e| ApiError::Backend(format!("malformed reports response: {}", e)))?;

        if !envelope.success {
            return Err(ApiError::ReportsApi(
                envelope
                    .message
                    .unwrap_or_else(|| "Error en API de reportes".to_string()),
            ));
        }

        let reports: Vec<Report> = envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Report::from)
            .collect();

        info!("Fetched {} reports", reports.len());
        Ok(reports)
    }
}
