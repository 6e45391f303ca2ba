//! Decoding of the assistant endpoint's JSON reply body.
//!
//! Only the fields that carry displayable text are read; the rest of the body
//! (classification, model metrics) is ignored.

use serde::Deserialize;

use crate::error::Result;

pub const NO_RESPONSE: &str = "No response from API.";

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Reply {
    pub diagnosis: Option<String>,
    pub response: Option<String>,
    pub error: Option<String>,
    pub detail: Option<Detail>,
}

/// Error detail as sent by the backend: a message, a list of validation
/// issues, or any other JSON value.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Detail {
    Message(String),
    Issues(Vec<Issue>),
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Issue {
    pub msg: Option<String>,
}

impl Reply {
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// The text to segment and display. Empty fields are skipped.
    pub fn into_text(self) -> String {
        if let Some(diagnosis) = self.diagnosis.filter(|s| !s.is_empty()) {
            return diagnosis;
        }
        if let Some(response) = self.response.filter(|s| !s.is_empty()) {
            return response;
        }
        if let Some(error) = self.error.filter(|s| !s.is_empty()) {
            log::warn!("assistant reported an error");
            return format!("Error: {error}");
        }
        match self.detail.filter(|d| !d.is_blank()) {
            Some(detail) => {
                log::warn!("assistant rejected the request");
                format!("Error: {}", detail.message())
            }
            None => NO_RESPONSE.to_string(),
        }
    }
}

impl Detail {
    fn is_blank(&self) -> bool {
        match self {
            Detail::Message(msg) => msg.is_empty(),
            Detail::Issues(_) => false,
            Detail::Other(value) => {
                value.is_null() || value.as_bool() == Some(false) || value.as_f64() == Some(0.0)
            }
        }
    }

    fn message(&self) -> String {
        match self {
            Detail::Message(msg) => msg.clone(),
            Detail::Issues(issues) => issues
                .iter()
                .map(|i| i.msg.as_deref().unwrap_or(""))
                .collect::<Vec<_>>()
                .join(" "),
            Detail::Other(value) => value.to_string(),
        }
    }
}
