//! Shape and phone-format checks for single and bulk send requests.

use crate::domain::model::{EntryError, MessageRequest};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

pub const DEFAULT_MAX_BATCH: usize = 1000;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[0-9]{10,15}$").expect("phone pattern is valid"));

pub const INVALID_OBJECT: &str = "Invalid message object";
pub const INVALID_TO: &str = "Missing or invalid \"to\" field";
pub const INVALID_MESSAGE: &str = "Missing or invalid \"message\" field";
pub const INVALID_PHONE: &str = "Invalid phone number format";
pub const INVALID_PHONE_TO: &str = "Invalid phone number format for \"to\"";

/// `+` followed by 10 to 15 ASCII digits, nothing else.
pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// Whole-batch rejection. Nothing from a rejected batch is dispatched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchRejection {
    #[error("Missing or invalid \"messages\" array")]
    NotAnArray,

    #[error("Messages array cannot be empty")]
    Empty,

    #[error("Maximum {max} messages per request")]
    TooLarge { max: usize },

    #[error("All messages invalid")]
    AllInvalid(Vec<EntryError>),
}

/// Accepted entries in batch order, plus per-index errors for the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchValidation {
    pub accepted: Vec<MessageRequest>,
    pub errors: Vec<EntryError>,
}

fn non_empty_str<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Validates one bulk entry. Checks run in a fixed order and the first failure wins.
pub fn validate_entry(entry: &Value) -> Result<MessageRequest, &'static str> {
    // arrays are let through and fail on the `to` lookup
    if !(entry.is_object() || entry.is_array()) {
        return Err(INVALID_OBJECT);
    }
    let to = non_empty_str(entry, "to").ok_or(INVALID_TO)?;
    let message = non_empty_str(entry, "message").ok_or(INVALID_MESSAGE)?;
    if !is_valid_phone(to) {
        return Err(INVALID_PHONE);
    }

    Ok(MessageRequest {
        to: to.to_string(),
        message: message.to_string(),
    })
}

/// Validates the body of a single-send request.
pub fn validate_single(body: &Value) -> Result<MessageRequest, &'static str> {
    let to = non_empty_str(body, "to").ok_or(INVALID_TO)?;
    let message = non_empty_str(body, "message").ok_or(INVALID_MESSAGE)?;
    if !is_valid_phone(to) {
        return Err(INVALID_PHONE_TO);
    }

    Ok(MessageRequest {
        to: to.to_string(),
        message: message.to_string(),
    })
}

/// Validates the `messages` field of a bulk request.
pub fn validate_batch(
    messages: Option<&Value>,
    max_entries: usize,
) -> Result<BatchValidation, BatchRejection> {
    let entries = messages
        .and_then(Value::as_array)
        .ok_or(BatchRejection::NotAnArray)?;

    if entries.is_empty() {
        return Err(BatchRejection::Empty);
    }
    if entries.len() > max_entries {
        return Err(BatchRejection::TooLarge { max: max_entries });
    }

    let mut result = BatchValidation::default();
    for (index, entry) in entries.iter().enumerate() {
        match validate_entry(entry) {
            Ok(request) => result.accepted.push(request),
            Err(reason) => result.errors.push(EntryError {
                index,
                error: reason.to_string(),
            }),
        }
    }

    if result.accepted.is_empty() {
        return Err(BatchRejection::AllInvalid(result.errors));
    }

    Ok(result)
}
