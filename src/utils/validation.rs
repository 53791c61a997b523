use crate::utils::error::{EtlError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(EtlError::Validation {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(EtlError::Validation {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(EtlError::Validation {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// Relative references are resolved against the base, so it has to end in a
/// slash or the last path segment gets replaced.
pub fn validate_base_url(field_name: &str, url_str: &str) -> Result<()> {
    validate_url(field_name, url_str)?;
    if !url_str.ends_with('/') {
        return Err(EtlError::Validation {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "Base URL must end with '/'".to_string(),
        });
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::Validation {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::Validation {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty<T>(field_name: &str, items: &[T]) -> Result<()> {
    if items.is_empty() {
        return Err(EtlError::Validation {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one entry is required".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("base_url", "https://example.com").is_ok());
        assert!(validate_url("base_url", "http://example.com").is_ok());
        assert!(validate_url("base_url", "").is_err());
        assert!(validate_url("base_url", "invalid-url").is_err());
        assert!(validate_url("base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_base_url_requires_trailing_slash() {
        assert!(validate_base_url("base_url", "https://www.sportdata.org/wkf/set-online/").is_ok());
        assert!(validate_base_url("base_url", "https://www.sportdata.org/wkf/set-online").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output_path", "./output").is_ok());
        assert!(validate_path("output_path", "").is_err());
        assert!(validate_path("output_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_non_empty() {
        assert!(validate_non_empty::<String>("series", &[]).is_err());
        assert!(validate_non_empty("series", &["premier-league.txt"]).is_ok());
    }
}
