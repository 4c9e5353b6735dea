// models/validation.rs - field constraint checks shared by every request type
//
// Messages and error types follow the shape clients already parse:
// `{"loc": ["body", field], "msg": ..., "type": ...}`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FieldError;

pub static SIMPLE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([2-9]\d{3})-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").unwrap());

pub static SIMPLE_DATE_POSSIBLE_PAST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([2-9]\d{3}|19\d{2})-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").unwrap());

pub static SIMPLE_TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[01]\d|2[0-3]):[0-5]\d:[0-5]\d$").unwrap());

pub static MONTH_PER_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(1[0-2]|0?[1-9])/(3[01]|[12][0-9]|0?[1-9])$").unwrap());

pub static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").unwrap());

pub static IATA_AIRPORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]{3}$").unwrap());

pub static IATA_AIRLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]{2}$").unwrap());

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$").unwrap());

/// Implemented by request bodies and query strings that carry field constraints.
pub trait Validate {
    fn validate(&self, v: &mut Validator);
}

/// Collects field errors; nested structs push a path prefix.
#[derive(Debug, Default)]
pub struct Validator {
    prefix: Vec<String>,
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn path(&self, field: &str) -> String {
        let mut parts = self.prefix.clone();
        parts.push(field.to_string());
        parts.join(".")
    }

    pub fn push(&mut self, field: &str, msg: impl Into<String>, kind: &str) {
        let path = self.path(field);
        self.errors.push(FieldError::new(&path, msg, kind));
    }

    pub fn str_len(&mut self, field: &str, value: &str, min: usize, max: Option<usize>) {
        let len = value.chars().count();
        if len < min {
            let unit = if min == 1 { "character" } else { "characters" };
            self.push(field, format!("String should have at least {} {}", min, unit), "string_too_short");
        } else if let Some(max) = max {
            if len > max {
                let unit = if max == 1 { "character" } else { "characters" };
                self.push(field, format!("String should have at most {} {}", max, unit), "string_too_long");
            }
        }
    }

    pub fn opt_str_len(&mut self, field: &str, value: Option<&str>, min: usize, max: Option<usize>) {
        if let Some(value) = value {
            self.str_len(field, value, min, max);
        }
    }

    pub fn pattern(&mut self, field: &str, value: &str, re: &Regex) {
        if !re.is_match(value) {
            self.push(
                field,
                format!("String should match pattern '{}'", re.as_str()),
                "string_pattern_mismatch",
            );
        }
    }

    pub fn opt_pattern(&mut self, field: &str, value: Option<&str>, re: &Regex) {
        if let Some(value) = value {
            self.pattern(field, value, re);
        }
    }

    pub fn at_least(&mut self, field: &str, value: f64, min: f64) {
        if value < min {
            self.push(field, format!("Input should be greater than or equal to {}", min), "greater_than_equal");
        }
    }

    pub fn at_most(&mut self, field: &str, value: f64, max: f64) {
        if value > max {
            self.push(field, format!("Input should be less than or equal to {}", max), "less_than_equal");
        }
    }

    pub fn between(&mut self, field: &str, value: f64, min: f64, max: f64) {
        self.at_least(field, value, min);
        self.at_most(field, value, max);
    }

    pub fn greater_than(&mut self, field: &str, value: f64, bound: f64) {
        if value <= bound {
            self.push(field, format!("Input should be greater than {}", bound), "greater_than");
        }
    }

    /// Absolute http(s) URL with a host.
    pub fn http_url(&mut self, field: &str, value: &str) {
        let valid = url::Url::parse(value)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some_and(|h| !h.is_empty()))
            .unwrap_or(false);
        if !valid {
            self.push(field, "Input should be a valid URL", "url_parsing");
        }
    }

    pub fn opt_http_url(&mut self, field: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.http_url(field, value);
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if !EMAIL.is_match(value.trim()) {
            self.push(field, "value is not a valid email address", "value_error");
        }
    }

    pub fn nested<T: Validate>(&mut self, field: &str, value: &T) {
        self.prefix.push(field.to_string());
        value.validate(self);
        self.prefix.pop();
    }

    pub fn each<T: Validate>(&mut self, field: &str, values: &[T]) {
        for (i, value) in values.iter().enumerate() {
            self.prefix.push(field.to_string());
            self.prefix.push(i.to_string());
            value.validate(self);
            self.prefix.pop();
            self.prefix.pop();
        }
    }

    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Runs `Validate` on a value and returns its errors.
pub fn validate<T: Validate>(value: &T) -> Result<(), Vec<FieldError>> {
    let mut v = Validator::new();
    value.validate(&mut v);
    v.finish()
}

/// Maps a serde_json decoding failure to a field error.
pub fn from_serde_error(err: &serde_json::Error) -> FieldError {
    let text = err.to_string();
    if let Some(rest) = text.strip_prefix("missing field `") {
        if let Some(field) = rest.split('`').next() {
            return FieldError::new(field, "Field required", "missing");
        }
    }
    let kind = if text.starts_with("unknown variant") { "enum" } else { "value_error" };
    FieldError::new("", text, kind)
}

/// `flight_number` -> `flightNumber`, camelCase input is returned unchanged.
pub fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_patterns() {
        assert!(SIMPLE_DATE.is_match("2024-02-29"));
        assert!(!SIMPLE_DATE.is_match("1999-01-01"));
        assert!(SIMPLE_DATE_POSSIBLE_PAST.is_match("1999-01-01"));
        assert!(!SIMPLE_DATE_POSSIBLE_PAST.is_match("1899-01-01"));
        assert!(!SIMPLE_DATE.is_match("2024-13-01"));
        assert!(!SIMPLE_DATE.is_match("2024-1-01"));
    }

    #[test]
    fn time_and_birthday_patterns() {
        assert!(SIMPLE_TIME.is_match("23:59:59"));
        assert!(!SIMPLE_TIME.is_match("24:00:00"));
        assert!(!SIMPLE_TIME.is_match("12:00"));
        assert!(MONTH_PER_DAY.is_match("12/31"));
        assert!(MONTH_PER_DAY.is_match("1/5"));
        assert!(!MONTH_PER_DAY.is_match("13/01"));
        assert!(!MONTH_PER_DAY.is_match("2024-01-01"));
        assert!(YEAR.is_match("2024"));
        assert!(!YEAR.is_match("24"));
    }

    #[test]
    fn length_messages() {
        let mut v = Validator::new();
        v.str_len("name", "", 1, Some(100));
        v.str_len("note", &"x".repeat(101), 0, Some(100));
        v.str_len("ok", "fine", 1, Some(100));
        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].msg, "String should have at least 1 character");
        assert_eq!(errors[0].loc, vec!["body", "name"]);
        assert_eq!(errors[1].kind, "string_too_long");
    }

    #[test]
    fn numeric_bounds() {
        let mut v = Validator::new();
        v.between("lat", 90.5, -90.0, 90.0);
        v.between("lng", -180.0, -180.0, 180.0);
        v.greater_than("distance", 0.0, 0.0);
        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].msg, "Input should be less than or equal to 90");
        assert_eq!(errors[1].msg, "Input should be greater than 0");
    }

    #[test]
    fn urls() {
        let mut v = Validator::new();
        v.http_url("a", "https://example.com/icon.png");
        v.http_url("b", "ftp://example.com");
        v.http_url("c", "not a url");
        let errors = v.finish().unwrap_err();
        assert_eq!(errors.iter().map(|e| e.loc[1].as_str()).collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn emails() {
        let mut v = Validator::new();
        v.email("email", "someone@example.com");
        v.email("email", " Someone@Example.COM ");
        v.email("email", "someone@localhost");
        v.email("email", "not-an-email");
        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind, "value_error");
    }

    #[test]
    fn missing_field_from_serde() {
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Body {
            name: String,
        }
        let err = serde_json::from_str::<Body>("{}").unwrap_err();
        let field = from_serde_error(&err);
        assert_eq!(field.loc, vec!["body", "name"]);
        assert_eq!(field.msg, "Field required");
        assert_eq!(field.kind, "missing");
    }

    #[test]
    fn camel_case_keys() {
        assert_eq!(to_camel_case("flight_number"), "flightNumber");
        assert_eq!(to_camel_case("flightNumber"), "flightNumber");
        assert_eq!(to_camel_case("is_planned"), "isPlanned");
        assert_eq!(to_camel_case("id"), "id");
    }
}
