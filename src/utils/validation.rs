use crate::utils::error::{ReportError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Billing region codes are short alphanumeric codes such as `MA` or `NSW`.
pub fn validate_region_code(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;

    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Region code may only contain ASCII letters, digits and '-'".to_string(),
        });
    }
    Ok(())
}

/// The prefix becomes part of a download filename, so it must not escape the
/// output directory or break the Content-Disposition header.
pub fn validate_filename_prefix(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;

    let forbidden = ['/', '\\', '"', ';', '\r', '\n', '\0'];
    if value.contains(forbidden.as_slice()) || value.starts_with('.') {
        return Err(ReportError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Filename prefix must be a plain file name fragment".to_string(),
        });
    }
    Ok(())
}
