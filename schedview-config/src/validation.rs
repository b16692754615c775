//! Configuration validation traits and utilities

use crate::error::{ConfigError, ConfigResult};

/// A configuration domain that can check its own values
pub trait Validatable {
    fn validate(&self) -> ConfigResult<()>;

    /// Name used as the `domain` of validation errors
    fn domain_name(&self) -> &'static str;

    fn validation_error(&self, message: impl Into<String>) -> ConfigError {
        domain_error(self.domain_name(), message.into())
    }
}

fn domain_error(domain: &str, message: String) -> ConfigError {
    ConfigError::DomainError {
        domain: domain.to_string(),
        message,
    }
}

pub fn validate_required_string(value: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(domain_error(domain, format!("{} cannot be empty", field_name)));
    }
    Ok(())
}

/// Value must be strictly greater than the type's zero
pub fn validate_positive<T>(value: T, field_name: &str, domain: &str) -> ConfigResult<()>
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value <= T::default() {
        return Err(domain_error(
            domain,
            format!("{} must be greater than 0, got {}", field_name, value),
        ));
    }
    Ok(())
}

pub fn validate_url(url: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    parse_url(url, field_name, domain).map(|_| ())
}

/// Like [`validate_url`], restricted to the http and https schemes
pub fn validate_http_url(url: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    let parsed = parse_url(url, field_name, domain)?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(domain_error(
            domain,
            format!("{} scheme '{}' not supported (only http/https)", field_name, scheme),
        )),
    }
}

fn parse_url(url: &str, field_name: &str, domain: &str) -> ConfigResult<url::Url> {
    if url.is_empty() {
        return Err(domain_error(domain, format!("{} cannot be empty", field_name)));
    }
    url::Url::parse(url)
        .map_err(|e| domain_error(domain, format!("{} has invalid URL format: {}", field_name, e)))
}

/// Header names are RFC 7230 tokens
pub fn validate_header_name(name: &str, domain: &str) -> ConfigResult<()> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b));

    if !valid {
        return Err(domain_error(domain, format!("invalid header name '{}'", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_http_url() {
        assert!(validate_http_url("http://localhost:3000/graphql", "url", "endpoint").is_ok());
        assert!(validate_http_url("https://dagit.example.com/graphql", "url", "endpoint").is_ok());
        assert!(validate_http_url("ftp://example.com", "url", "endpoint").is_err());
        assert!(validate_http_url("not a url", "url", "endpoint").is_err());
        assert!(validate_http_url("", "url", "endpoint").is_err());
    }

    #[test]
    fn test_validate_header_name() {
        assert!(validate_header_name("X-Dagster-Token", "endpoint").is_ok());
        assert!(validate_header_name("bad header", "endpoint").is_err());
        assert!(validate_header_name("", "endpoint").is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(1u64, "timeout", "http").is_ok());
        let err = validate_positive(0u64, "timeout", "http").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Domain configuration error in http: timeout must be greater than 0, got 0"
        );
    }
}
