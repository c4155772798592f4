use crate::utils::error::{DeployError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> DeployError {
    DeployError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// SSM 參數名稱: 必須是以 `/` 開頭的階層式路徑
pub fn validate_parameter_name(field_name: &str, name: &str) -> Result<()> {
    validate_non_empty_string(field_name, name)?;

    if !name.starts_with('/') {
        return Err(invalid(
            field_name,
            name,
            "Parameter name must be a hierarchical path starting with '/'",
        ));
    }

    if name.ends_with('/') || name.contains("//") {
        return Err(invalid(
            field_name,
            name,
            "Parameter name contains an empty path segment",
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '.' | '-'))
    {
        return Err(invalid(
            field_name,
            name,
            "Parameter name can only contain letters, numbers, '/', '_', '.', and '-'",
        ));
    }

    Ok(())
}

pub fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(invalid(
            field_name,
            region,
            "AWS region can only contain lowercase letters, numbers, and hyphens",
        ));
    }

    Ok(())
}

pub fn validate_hosted_zone_id(field_name: &str, zone_id: &str) -> Result<()> {
    validate_non_empty_string(field_name, zone_id)?;

    let id = zone_id.strip_prefix("/hostedzone/").unwrap_or(zone_id);
    if !id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err(invalid(
            field_name,
            zone_id,
            "Hosted zone id can only contain uppercase letters and numbers",
        ));
    }

    Ok(())
}

pub fn validate_domain_name(field_name: &str, domain: &str) -> Result<()> {
    validate_non_empty_string(field_name, domain)?;

    let domain = domain.strip_suffix('.').unwrap_or(domain);
    if domain.len() > 253 {
        return Err(invalid(
            field_name,
            domain,
            "Domain name cannot exceed 253 characters",
        ));
    }

    for label in domain.split('.') {
        // 憑證允許最左邊使用萬用字元
        if label == "*" {
            continue;
        }
        if label.is_empty() || label.len() > 63 {
            return Err(invalid(
                field_name,
                domain,
                "Each domain label must be between 1 and 63 characters",
            ));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid(
                field_name,
                domain,
                "Domain labels cannot start or end with a hyphen",
            ));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(invalid(
                field_name,
                domain,
                "Domain labels can only contain letters, numbers, and hyphens",
            ));
        }
    }

    Ok(())
}
