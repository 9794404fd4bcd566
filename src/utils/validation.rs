use crate::utils::error::{PackagerError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(PackagerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PackagerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(PackagerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| PackagerError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PackagerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN 不滿足任何比較，也會在這裡被擋下
    if !(value >= min && value <= max) {
        return Err(PackagerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(PackagerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Unsupported value. Valid values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

/// 檢查識別碼不重複，回傳第一個重複的值
pub fn validate_unique_ids<'a, I>(field_name: &str, ids: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(PackagerError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: id.to_string(),
                reason: "Identifier is defined more than once".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output.path", "./proposals").is_ok());
        assert!(validate_path("output.path", "").is_err());
        assert!(validate_path("output.path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("services.duration_days", 5, 1).is_ok());
        assert!(validate_positive_number("services.duration_days", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range_rejects_nan() {
        assert!(validate_range("services.margin", 0.4, 0.0, 1.0).is_ok());
        assert!(validate_range("services.margin", 1.5, 0.0, 1.0).is_err());
        assert!(validate_range("services.margin", f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_validate_unique_ids() {
        assert!(validate_unique_ids("services.id", ["a", "b"]).is_ok());
        let err = validate_unique_ids("services.id", ["a", "b", "a"]).unwrap_err();
        assert!(err.to_string().contains("'a'"));
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(3.0);
        assert_eq!(*validate_required_field("x", &present).unwrap(), 3.0);
        let missing: Option<f64> = None;
        assert!(matches!(
            validate_required_field("x", &missing),
            Err(PackagerError::MissingConfigError { .. })
        ));
    }
}
