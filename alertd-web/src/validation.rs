use alertd_core::{NewAlert, Severity, MAX_MESSAGE_LEN};
use serde::{Deserialize, Serialize};

/// Maximum allowed length for alert titles
const MAX_TITLE_LENGTH: usize = 255;
/// Maximum allowed length for target service identifiers
const MAX_TARGET_SERVICE_LENGTH: usize = 255;

/// Body of `POST /api/alerts`. Fields left out of the JSON arrive empty and
/// are reported by validation; unknown fields are ignored.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAlertRequest {
    pub title: String,
    pub message: String,
    pub severity: String,
    pub target_service: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    TitleEmpty,
    TitleTooLong(usize),
    MessageTooLong(usize),
    SeverityInvalid(String),
    TargetServiceEmpty,
    TargetServiceTooLong(usize),
}

impl ValidationError {
    pub fn to_message(&self) -> String {
        match self {
            ValidationError::TitleEmpty => "Title cannot be empty".to_string(),
            ValidationError::TitleTooLong(len) => {
                format!("Title too long: {} characters (max {})", len, MAX_TITLE_LENGTH)
            }
            ValidationError::MessageTooLong(len) => {
                format!("Message too long: {} characters (max {})", len, MAX_MESSAGE_LEN)
            }
            ValidationError::SeverityInvalid(severity) => {
                let allowed: Vec<&str> = Severity::ALL.iter().map(|s| s.as_str()).collect();
                format!("Severity '{}' invalid. Allowed: {}", severity, allowed.join(", "))
            }
            ValidationError::TargetServiceEmpty => "Target service cannot be empty".to_string(),
            ValidationError::TargetServiceTooLong(len) => {
                format!(
                    "Target service too long: {} characters (max {})",
                    len, MAX_TARGET_SERVICE_LENGTH
                )
            }
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

pub struct Validator;

impl Validator {
    /// Blank titles are rejected; the title itself is never rewritten.
    pub fn validate_title(title: &str) -> ValidationResult<()> {
        if title.trim().is_empty() {
            return Err(ValidationError::TitleEmpty);
        }
        let len = title.chars().count();
        if len > MAX_TITLE_LENGTH {
            return Err(ValidationError::TitleTooLong(len));
        }
        Ok(())
    }

    pub fn validate_message(message: &str) -> ValidationResult<()> {
        let len = message.chars().count();
        if len > MAX_MESSAGE_LEN {
            return Err(ValidationError::MessageTooLong(len));
        }
        Ok(())
    }

    /// Exact, case-sensitive: `critical` is rejected.
    pub fn parse_severity(severity: &str) -> ValidationResult<Severity> {
        severity
            .parse()
            .map_err(|_| ValidationError::SeverityInvalid(severity.to_string()))
    }

    pub fn validate_target_service(target: &str) -> ValidationResult<()> {
        if target.trim().is_empty() {
            return Err(ValidationError::TargetServiceEmpty);
        }
        let len = target.chars().count();
        if len > MAX_TARGET_SERVICE_LENGTH {
            return Err(ValidationError::TargetServiceTooLong(len));
        }
        Ok(())
    }

    /// Check an alert creation request. Accepted fields are passed on
    /// exactly as sent.
    pub fn validate_create_request(request: &CreateAlertRequest) -> ValidationResult<NewAlert> {
        Self::validate_title(&request.title)?;
        Self::validate_message(&request.message)?;
        let severity = Self::parse_severity(&request.severity)?;
        Self::validate_target_service(&request.target_service)?;

        Ok(NewAlert::new(
            request.title.clone(),
            request.message.clone(),
            severity,
            request.target_service.clone(),
        ))
    }
}
