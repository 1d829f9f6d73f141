//! Field-level validation of create and update payloads.
//!
//! Both entry points accept a raw JSON value, collect every violation
//! instead of stopping at the first one, and produce a normalized payload
//! (strings trimmed, numeric strings parsed) on success.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::item::ItemType;
use crate::payload::{ItemDraft, ItemPatch};

/// Maximum length of `name`, in characters.
pub const NAME_MAX_LEN: usize = 100;
/// Maximum length of `description`, in characters.
pub const DESCRIPTION_MAX_LEN: usize = 1000;
/// Maximum length of `location`, in characters.
pub const LOCATION_MAX_LEN: usize = 200;
/// Maximum length of `contact_info`, in characters.
pub const CONTACT_INFO_MAX_LEN: usize = 200;

const KNOWN_KEYS: [&str; 8] = [
    "type",
    "name",
    "description",
    "location",
    "latitude",
    "longitude",
    "image_url",
    "contact_info",
];

/// Server-controlled keys a client may echo back; they are accepted and dropped.
const IGNORED_KEYS: [&str; 2] = ["id", "date_reported"];

static URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s]+$").expect("uri pattern is valid")
});

/// Every rule a payload violated, one message per violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {}", .0.join("; "))]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    /// Build from a list of messages.
    pub fn new(messages: Vec<String>) -> Self {
        Self(messages)
    }

    /// A single violation.
    pub fn single(message: impl Into<String>) -> Self {
        Self(vec![message.into()])
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn into_messages(self) -> Vec<String> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `true` if any message mentions `field` in its quoted form.
    pub fn mentions(&self, field: &str) -> bool {
        let quoted = format!("\"{field}\"");
        self.0.iter().any(|m| m.contains(&quoted))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Create,
    Update,
}

struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
    mode: Mode,
    errors: Vec<String>,
}

impl<'a> FieldReader<'a> {
    fn new(fields: &'a Map<String, Value>, mode: Mode) -> Self {
        Self {
            fields,
            mode,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, key: &str, rule: &str) {
        self.errors.push(format!("\"{key}\" {rule}"));
    }

    fn missing(&mut self, key: &str) {
        if self.mode == Mode::Create {
            self.fail(key, "is required");
        }
    }

    fn item_type(&mut self) -> Option<ItemType> {
        let value = self.fields.get("type");
        match value {
            None => {
                self.missing("type");
                None
            }
            Some(Value::String(s)) => match s.trim().parse() {
                Ok(item_type) => Some(item_type),
                Err(_) => {
                    self.fail("type", "must be one of [lost, found]");
                    None
                }
            },
            Some(_) => {
                self.fail("type", "must be one of [lost, found]");
                None
            }
        }
    }

    fn text(&mut self, key: &str, max_len: usize) -> Option<String> {
        match self.fields.get(key) {
            None => {
                self.missing(key);
                None
            }
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    self.fail(key, "is not allowed to be empty");
                    None
                } else if trimmed.chars().count() > max_len {
                    self.fail(
                        key,
                        &format!("length must be less than or equal to {max_len} characters long"),
                    );
                    None
                } else {
                    Some(trimmed.to_owned())
                }
            }
            Some(_) => {
                self.fail(key, "must be a string");
                None
            }
        }
    }

    fn number(&mut self, key: &str, min: f64, max: f64) -> Option<f64> {
        let parsed = match self.fields.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        };
        let Some(value) = parsed else {
            self.fail(key, "must be a number");
            return None;
        };
        if value < min {
            self.fail(key, &format!("must be greater than or equal to {min}"));
            None
        } else if value > max {
            self.fail(key, &format!("must be less than or equal to {max}"));
            None
        } else {
            Some(value)
        }
    }

    fn image_url(&mut self) -> Option<String> {
        match self.fields.get("image_url")? {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    // An empty URL on create means "no image".
                    if self.mode == Mode::Update {
                        self.fail("image_url", "is not allowed to be empty");
                    }
                    None
                } else if URI_RE.is_match(trimmed) {
                    Some(trimmed.to_owned())
                } else {
                    self.fail("image_url", "must be a valid uri");
                    None
                }
            }
            _ => {
                self.fail("image_url", "must be a string");
                None
            }
        }
    }

    fn reject_unknown_keys(&mut self) {
        let unknown: Vec<&String> = self
            .fields
            .keys()
            .filter(|k| !KNOWN_KEYS.contains(&k.as_str()) && !IGNORED_KEYS.contains(&k.as_str()))
            .collect();
        for key in unknown {
            self.fail(key, "is not allowed");
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

fn as_object(input: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    input
        .as_object()
        .ok_or_else(|| ValidationErrors::single("\"value\" must be of type object"))
}

/// Validate a creation payload.
///
/// `type`, `name`, `description`, `location` and `contact_info` are
/// required. `latitude`, `longitude` and `image_url` are optional, and an
/// empty `image_url` is treated as absent.
pub fn validate_create(input: &Value) -> Result<ItemDraft, ValidationErrors> {
    let fields = as_object(input)?;
    let mut reader = FieldReader::new(fields, Mode::Create);

    let item_type = reader.item_type();
    let name = reader.text("name", NAME_MAX_LEN);
    let description = reader.text("description", DESCRIPTION_MAX_LEN);
    let location = reader.text("location", LOCATION_MAX_LEN);
    let latitude = reader.number("latitude", -90.0, 90.0);
    let longitude = reader.number("longitude", -180.0, 180.0);
    let image_url = reader.image_url();
    let contact_info = reader.text("contact_info", CONTACT_INFO_MAX_LEN);
    reader.reject_unknown_keys();
    reader.finish()?;

    match (item_type, name, description, location, contact_info) {
        (Some(item_type), Some(name), Some(description), Some(location), Some(contact_info)) => {
            Ok(ItemDraft {
                item_type,
                name,
                description,
                location,
                latitude,
                longitude,
                image_url,
                contact_info,
            })
        }
        _ => Err(ValidationErrors::single("\"value\" is missing required fields")),
    }
}

/// Validate a partial update. Every field is optional; present fields obey
/// the same rules as on create, except that `image_url` may not be empty.
pub fn validate_update(input: &Value) -> Result<ItemPatch, ValidationErrors> {
    let fields = as_object(input)?;
    let mut reader = FieldReader::new(fields, Mode::Update);

    let patch = ItemPatch {
        item_type: reader.item_type(),
        name: reader.text("name", NAME_MAX_LEN),
        description: reader.text("description", DESCRIPTION_MAX_LEN),
        location: reader.text("location", LOCATION_MAX_LEN),
        latitude: reader.number("latitude", -90.0, 90.0),
        longitude: reader.number("longitude", -180.0, 180.0),
        image_url: reader.image_url(),
        contact_info: reader.text("contact_info", CONTACT_INFO_MAX_LEN),
    };
    reader.reject_unknown_keys();
    reader.finish()?;
    Ok(patch)
}

fn blank_after_markup(errors: &mut Vec<String>, key: &str, value: Option<&str>) {
    if value.is_some_and(str::is_empty) {
        errors.push(format!("\"{key}\" must contain text after removing markup"));
    }
}

/// Re-check a sanitized draft: required text that consisted only of markup
/// is empty now and must be rejected.
pub fn check_sanitized_draft(draft: &ItemDraft) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    blank_after_markup(&mut errors, "name", Some(&draft.name));
    blank_after_markup(&mut errors, "description", Some(&draft.description));
    blank_after_markup(&mut errors, "location", Some(&draft.location));
    blank_after_markup(&mut errors, "contact_info", Some(&draft.contact_info));
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

/// Same as [`check_sanitized_draft`] for the fields present in a patch.
pub fn check_sanitized_patch(patch: &ItemPatch) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    blank_after_markup(&mut errors, "name", patch.name.as_deref());
    blank_after_markup(&mut errors, "description", patch.description.as_deref());
    blank_after_markup(&mut errors, "location", patch.location.as_deref());
    blank_after_markup(&mut errors, "image_url", patch.image_url.as_deref());
    blank_after_markup(&mut errors, "contact_info", patch.contact_info.as_deref());
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}
