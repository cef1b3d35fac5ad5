//! Export-report status decoders.

use serde_json::Value;

use crate::error::{KervielError, Result};
use crate::json::Fields;
use crate::models::ReportFormat;

/// Status of one requested ledger/trades export report.
#[derive(Debug, Clone)]
pub struct ReportStatus {
    pub id: String,
    pub descr: String,
    /// Defaults to `CSV` when the API omits the field.
    pub format: ReportFormat,
    /// Report source: `"trades"` or `"ledgers"`.
    pub report: String,
    pub subtype: Option<String>,
    /// Processing state (e.g., `"Queued"`, `"Processed"`).
    pub status: String,
    /// Comma-separated list of exported fields (`"all"` for everything).
    pub fields: String,
    pub createdtm: i64,
    pub starttm: i64,
    pub completedtm: i64,
    pub datastart: i64,
    pub dataend: i64,
    pub asset: String,
}

impl ReportStatus {
    /// Decodes one report-status object.
    pub fn decode(obj: &Value) -> Result<Self> {
        Ok(Self {
            id: obj.req_str("id")?.to_string(),
            descr: obj.str_or("descr", "").to_string(),
            format: obj.enum_or_absent("format", ReportFormat::from_wire, ReportFormat::Csv)?,
            report: obj.req_str("report")?.to_string(),
            subtype: obj
                .opt_str("subtype")
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            status: obj.str_or("status", "").to_string(),
            fields: obj.str_or("fields", "all").to_string(),
            createdtm: obj.i64_or("createdtm", -1),
            starttm: obj.i64_or("starttm", -1),
            completedtm: obj.i64_or("completedtm", -1),
            datastart: obj.i64_or("datastart", -1),
            dataend: obj.i64_or("dataend", -1),
            asset: obj.str_or("asset", "all").to_string(),
        })
    }

    /// Decodes the `result` payload of an export-status response (a list).
    pub fn decode_page(result: &Value) -> Result<Vec<Self>> {
        let arr = result
            .as_array()
            .ok_or_else(|| KervielError::missing("result"))?;
        arr.iter().map(Self::decode).collect()
    }
}
