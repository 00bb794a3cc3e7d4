//! Lead and form submission payloads.
//!
//! These are write-only from the client's point of view: the backend assigns
//! identity and timestamps, and the client only cares about the HTTP status
//! of the submission.

use serde::{Deserialize, Serialize};

/// Payload for `POST /contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
}

/// Payload for `POST /exchange-leads` (old-gold exchange programme).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeLead {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub gold_type: String,
    pub approximate_weight: String,
}

/// Payload for `POST /appointments` (in-store visit booking).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub name: String,
    pub phone: String,
    pub city: String,
    pub preferred_store: String,
    pub date: String,
    pub time: String,
    pub purpose: String,
}
