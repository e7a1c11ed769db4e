use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::{parse_object, text, Rejection};

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid username regex"));

const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 12;

/// Registration payload after validation. `username` is already lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
}

/// Full replacement of the mutable profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountUpdate {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub fn decode_new_account(body: &[u8]) -> Result<NewAccount, Rejection> {
    let map = parse_object(body)?;
    let (mut first_name, mut last_name, mut username, mut password) = (None, None, None, None);
    for (key, value) in &map {
        match key.as_str() {
            "first_name" => first_name = Some(text("first_name", value)?),
            "last_name" => last_name = Some(text("last_name", value)?),
            "username" => username = Some(normalize_username(value)?),
            "password" => password = Some(password_field(value)?),
            other => return Err(Rejection::UnknownField(other.to_string())),
        }
    }
    Ok(NewAccount {
        first_name: first_name.ok_or(Rejection::MissingField("first_name"))?,
        last_name: last_name.ok_or(Rejection::MissingField("last_name"))?,
        username: username.ok_or(Rejection::MissingField("username"))?,
        password: password.ok_or(Rejection::MissingField("password"))?,
    })
}

pub fn decode_account_update(body: &[u8]) -> Result<AccountUpdate, Rejection> {
    let map = parse_object(body)?;
    let (mut first_name, mut last_name, mut password) = (None, None, None);
    for (key, value) in &map {
        match key.as_str() {
            "first_name" => first_name = Some(text("first_name", value)?),
            "last_name" => last_name = Some(text("last_name", value)?),
            "password" => password = Some(password_field(value)?),
            other => return Err(Rejection::UnknownField(other.to_string())),
        }
    }
    Ok(AccountUpdate {
        first_name: first_name.ok_or(Rejection::MissingField("first_name"))?,
        last_name: last_name.ok_or(Rejection::MissingField("last_name"))?,
        password: password.ok_or(Rejection::MissingField("password"))?,
    })
}

/// Lowercase, then require `local@domain.tld` with no whitespace.
pub fn normalize_username_str(raw: &str) -> Result<String, Rejection> {
    let lowered = raw.to_lowercase();
    if USERNAME_RE.is_match(&lowered) {
        Ok(lowered)
    } else {
        Err(Rejection::InvalidField { field: "username", reason: "must be an email address" })
    }
}

fn normalize_username(value: &Value) -> Result<String, Rejection> {
    match value {
        Value::String(s) => normalize_username_str(s),
        _ => Err(Rejection::InvalidField { field: "username", reason: "must be a string" }),
    }
}

fn password_field(value: &Value) -> Result<String, Rejection> {
    let Value::String(s) = value else {
        return Err(Rejection::InvalidField { field: "password", reason: "must be a string" });
    };
    let len = s.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return Err(Rejection::InvalidField { field: "password", reason: "must be 8 to 12 characters" });
    }
    Ok(s.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_lowercases_username() {
        let body = br#"{"first_name":"Foo","last_name":"Bar","username":"Foo@Example.com","password":"secret123"}"#;
        let acct = decode_new_account(body).unwrap();
        assert_eq!(acct.username, "foo@example.com");
        assert_eq!(acct.first_name, "Foo");
    }

    #[test]
    fn unknown_field_rejected_even_when_rest_is_valid() {
        let body = br#"{"first_name":"Foo","last_name":"Bar","username":"foo@example.com","password":"secret123","id":3}"#;
        assert_eq!(decode_new_account(body), Err(Rejection::UnknownField("id".into())));
    }

    #[test]
    fn malformed_usernames_rejected() {
        for bad in ["plain", "a@b", "a b@c.de", "@c.de", "a@.de x"] {
            assert!(normalize_username_str(bad).is_err(), "{bad}");
        }
        assert_eq!(normalize_username_str("A.B@Sub.Example.ORG").unwrap(), "a.b@sub.example.org");
    }

    #[test]
    fn password_length_bounds() {
        let mk = |pw: &str| format!(r#"{{"first_name":"a","last_name":"b","password":"{pw}"}}"#);
        assert!(decode_account_update(mk("1234567").as_bytes()).is_err());
        assert!(decode_account_update(mk("12345678").as_bytes()).is_ok());
        assert!(decode_account_update(mk("123456789012").as_bytes()).is_ok());
        assert!(decode_account_update(mk("1234567890123").as_bytes()).is_err());
    }

    #[test]
    fn update_rejects_username_and_requires_all_fields() {
        let body = br#"{"first_name":"a","last_name":"b","password":"secret123","username":"x@y.zz"}"#;
        assert_eq!(decode_account_update(body), Err(Rejection::UnknownField("username".into())));
        let body = br#"{"first_name":"a","password":"secret123"}"#;
        assert_eq!(decode_account_update(body), Err(Rejection::MissingField("last_name")));
    }

    #[test]
    fn blank_names_rejected() {
        let body = br#"{"first_name":"  ","last_name":"b","password":"secret123"}"#;
        assert!(matches!(decode_account_update(body), Err(Rejection::InvalidField { field: "first_name", .. })));
    }
}
