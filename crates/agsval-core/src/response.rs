//! Structured response bodies for reports.

use serde::{Deserialize, Serialize};

use crate::domain::{Classification, OutcomeKind};
use crate::patterns;

/// Metadata and verdict extracted from a validation report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub filename: Option<String>,
    pub filesize: Option<String>,
    pub checker: Option<String>,
    pub dictionary: Option<String>,
    pub time: Option<String>,
    pub result: Option<String>,
}

impl Validation {
    /// Read header fields (`Key: \t value`) and the verdict from a report.
    pub fn from_report(report: &str) -> Self {
        let mut validation = Self::default();

        for line in report.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim().to_string();
            match key.trim() {
                "File Name" => validation.filename.get_or_insert(value),
                "File Size" => validation.filesize.get_or_insert(value),
                "Checker" => validation.checker.get_or_insert(value),
                "Dictionary" => validation.dictionary.get_or_insert(value),
                "Time (UTC)" => validation.time.get_or_insert(value),
                _ => continue,
            };
        }

        validation.result = report_verdict(report);
        validation
    }
}

fn report_verdict(report: &str) -> Option<String> {
    if report.contains(patterns::ALL_CHECKS_PASSED) {
        return Some(patterns::ALL_CHECKS_PASSED.to_string());
    }
    report
        .lines()
        .find(|line| patterns::error_count(line).is_some() || line.starts_with("ERROR:"))
        .map(|line| line.trim_end().to_string())
}

/// Detail of one error in an [`ErrorResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub error: String,
    #[serde(rename = "propName", skip_serializing_if = "Option::is_none")]
    pub prop_name: Option<String>,
    pub desc: String,
}

/// Fields shared by every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimalResponse {
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "self")]
    pub self_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    #[serde(flatten)]
    pub base: MinimalResponse,
    pub data: Vec<Validation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(flatten)]
    pub base: MinimalResponse,
    pub errors: Vec<ErrorDetail>,
}

impl ValidationResponse {
    /// Successful response carrying one validation per report.
    pub fn from_reports<'a>(
        self_ref: impl Into<String>,
        reports: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let data: Vec<Validation> = reports.into_iter().map(Validation::from_report).collect();
        Self {
            base: MinimalResponse {
                msg: format!("{} file(s) validated", data.len()),
                kind: "success".to_string(),
                self_ref: self_ref.into(),
            },
            data,
        }
    }
}

impl ErrorResponse {
    pub fn new(self_ref: impl Into<String>, msg: impl Into<String>, errors: Vec<ErrorDetail>) -> Self {
        Self {
            base: MinimalResponse {
                msg: msg.into(),
                kind: "error".to_string(),
                self_ref: self_ref.into(),
            },
            errors,
        }
    }

    /// Error response describing a failed classification.
    pub fn from_classification(self_ref: impl Into<String>, classification: &Classification) -> Self {
        let desc = classification.message.trim_end().to_string();
        Self::new(
            self_ref,
            "Processing failed",
            vec![ErrorDetail {
                error: classification.kind.to_string(),
                prop_name: None,
                desc,
            }],
        )
    }
}

/// Minimal response for a classification that did not fail.
pub fn success_response(self_ref: impl Into<String>, classification: &Classification) -> MinimalResponse {
    let msg = match classification.kind {
        OutcomeKind::Converted => classification.message.clone(),
        _ => "Processing succeeded".to_string(),
    };
    MinimalResponse {
        msg,
        kind: "success".to_string(),
        self_ref: self_ref.into(),
    }
}
