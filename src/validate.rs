use crate::{access_code::AccessCodeRegistry, gate_session::SessionContext};
use email_address::EmailAddress;
use serde_json::{Map, Value};
use std::{collections::BTreeMap, fmt, str::FromStr};

///Hidden form field a legitimate client never fills. Only the concierge
///request form carries it; the application form's `company` field is real.
const HONEYPOT_FIELD: &str = "company";

const DEFAULT_MAX_LEN: usize = 300;
const LONG_TEXT_MAX_LEN: usize = 2000;
const EMAIL_MAX_LEN: usize = 254;
const PHONE_MAX_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionType {
    Rsvp,
    ConciergeRequest,
    Application,
}

impl SubmissionType {
    ///Collection name used by the record store.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Rsvp => "rsvps",
            Self::ConciergeRequest => "requests",
            Self::Application => "applications",
        }
    }
}

impl fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Rsvp => "RSVP",
                Self::ConciergeRequest => "concierge request",
                Self::Application => "membership application",
            }
        )
    }
}

///User-correctable or bot-triggered refusal. Distinct from Error: a
///Rejection is a normal outcome handled at the boundary, never logged
///as a failure of the service itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    MissingFields(Vec<String>),
    InvalidCode,
    InvalidEmail,
    ///honeypot tripped; the boundary must answer with a generic 400
    Rejected,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields(fields) => write!(f, "missing required fields: {}", fields.join(", ")),
            Self::InvalidCode => write!(f, "invalid access code"),
            Self::InvalidEmail => write!(f, "invalid email"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

///Fully normalized submission, ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecord {
    pub kind: SubmissionType,
    pub fields: BTreeMap<String, String>,
}

impl ValidatedRecord {
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    ///None when the field is absent or normalized to empty; used by the
    ///relational backend for nullable columns.
    pub fn optional_field(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
    }
}

enum FieldKind {
    Text,
    LongText,
    Email,
    Phone,
    Number,
}

struct FieldSpec {
    name: &'static str,
    kind: FieldKind,
}

const RSVP_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "code", kind: FieldKind::Text },
    FieldSpec { name: "firstName", kind: FieldKind::Text },
    FieldSpec { name: "lastName", kind: FieldKind::Text },
    FieldSpec { name: "plusOne", kind: FieldKind::Text },
    FieldSpec { name: "guestName", kind: FieldKind::Text },
    FieldSpec { name: "notify", kind: FieldKind::Text },
    FieldSpec { name: "email", kind: FieldKind::Email },
    FieldSpec { name: "phone", kind: FieldKind::Phone },
    FieldSpec { name: "diet", kind: FieldKind::Text },
    FieldSpec { name: "notes", kind: FieldKind::LongText },
];

const REQUEST_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "fullName", kind: FieldKind::Text },
    FieldSpec { name: "email", kind: FieldKind::Email },
    FieldSpec { name: "phone", kind: FieldKind::Phone },
    FieldSpec { name: "typeOfRequest", kind: FieldKind::Text },
    FieldSpec { name: "date", kind: FieldKind::Text },
    FieldSpec { name: "time", kind: FieldKind::Text },
    FieldSpec { name: "partySize", kind: FieldKind::Number },
    FieldSpec { name: "neighborhood", kind: FieldKind::Text },
    FieldSpec { name: "budget", kind: FieldKind::Text },
    FieldSpec { name: "details", kind: FieldKind::LongText },
];

const APPLICATION_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "fullName", kind: FieldKind::Text },
    FieldSpec { name: "dob", kind: FieldKind::Text },
    FieldSpec { name: "email", kind: FieldKind::Email },
    FieldSpec { name: "phone", kind: FieldKind::Phone },
    FieldSpec { name: "address", kind: FieldKind::Text },
    FieldSpec { name: "city", kind: FieldKind::Text },
    FieldSpec { name: "state", kind: FieldKind::Text },
    FieldSpec { name: "country", kind: FieldKind::Text },
    FieldSpec { name: "company", kind: FieldKind::Text },
    FieldSpec { name: "industry", kind: FieldKind::Text },
    FieldSpec { name: "role", kind: FieldKind::Text },
    FieldSpec { name: "bio", kind: FieldKind::LongText },
    FieldSpec { name: "socials", kind: FieldKind::LongText },
    FieldSpec { name: "headshotKey", kind: FieldKind::Text },
];

const RSVP_REQUIRED: &[&str] = &["firstName", "lastName", "notify", "plusOne"];
const REQUEST_REQUIRED: &[&str] = &["fullName", "email", "typeOfRequest"];
const APPLICATION_REQUIRED: &[&str] = &[
    "fullName", "dob", "email", "phone", "address", "city", "state", "country", "company",
    "industry", "role", "bio",
];

fn field_specs(kind: SubmissionType) -> &'static [FieldSpec] {
    match kind {
        SubmissionType::Rsvp => RSVP_FIELDS,
        SubmissionType::ConciergeRequest => REQUEST_FIELDS,
        SubmissionType::Application => APPLICATION_FIELDS,
    }
}

fn required_fields(kind: SubmissionType) -> &'static [&'static str] {
    match kind {
        SubmissionType::Rsvp => RSVP_REQUIRED,
        SubmissionType::ConciergeRequest => REQUEST_REQUIRED,
        SubmissionType::Application => APPLICATION_REQUIRED,
    }
}

///Normalize, trap bots, and enforce per-type required fields and formats.
///The RSVP access code may come from the submission itself or fall back to
///the code recorded on the gate session.
pub fn validate(
    kind: SubmissionType,
    raw: &Map<String, Value>,
    codes: &AccessCodeRegistry,
    session: &SessionContext,
) -> Result<ValidatedRecord, Rejection> {
    if kind == SubmissionType::ConciergeRequest && !raw_text(raw, HONEYPOT_FIELD).is_empty() {
        return Err(Rejection::Rejected);
    }

    let mut fields: BTreeMap<String, String> = BTreeMap::new();
    for spec in field_specs(kind) {
        let value = raw_text(raw, spec.name);
        let normalized = match spec.kind {
            FieldKind::Text => truncate(value, DEFAULT_MAX_LEN),
            FieldKind::LongText => truncate(value, LONG_TEXT_MAX_LEN),
            FieldKind::Email => truncate(value, EMAIL_MAX_LEN),
            FieldKind::Phone => truncate(normalize_phone(&value), PHONE_MAX_LEN),
            FieldKind::Number => normalize_number(&value),
        };
        fields.insert(spec.name.to_string(), normalized);
    }

    if kind == SubmissionType::Rsvp {
        let code = match fields.get("code").filter(|code| !code.is_empty()) {
            Some(code) => code.to_owned(),
            None => session.valid_code.to_owned().unwrap_or_default(),
        };
        if !codes.is_valid(&code) {
            return Err(Rejection::InvalidCode);
        }
        fields.insert("code".to_string(), AccessCodeRegistry::normalize(&code));
    }

    let missing: Vec<String> = required_fields(kind)
        .iter()
        .filter(|name| fields.get(**name).map(String::is_empty).unwrap_or(true))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Rejection::MissingFields(missing));
    }

    for spec in field_specs(kind) {
        if matches!(spec.kind, FieldKind::Email) {
            let value = fields.get(spec.name).map(String::as_str).unwrap_or("");
            if !value.is_empty() && EmailAddress::from_str(value).is_err() {
                return Err(Rejection::InvalidEmail);
            }
        }
    }

    Ok(ValidatedRecord { kind, fields })
}

///Missing, null, or non-scalar values normalize to the empty string.
fn raw_text(raw: &Map<String, Value>, key: &str) -> String {
    match raw.get(key) {
        Some(Value::String(value)) => value.trim().to_string(),
        Some(Value::Number(value)) => value.to_string(),
        Some(Value::Bool(value)) => value.to_string(),
        _ => String::new(),
    }
}

///Digits plus an optional leading `+`.
fn normalize_phone(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    for (index, character) in raw.chars().enumerate() {
        if character.is_ascii_digit() || (index == 0 && character == '+') {
            normalized.push(character);
        }
    }
    normalized
}

///Integer parse with a safe fallback to empty.
fn normalize_number(raw: &str) -> String {
    match raw.parse::<i64>() {
        Ok(value) => value.to_string(),
        Err(_) => String::new(),
    }
}

fn truncate(mut value: String, max_len: usize) -> String {
    if value.chars().count() > max_len {
        value = value.chars().take(max_len).collect();
    }
    value
}
