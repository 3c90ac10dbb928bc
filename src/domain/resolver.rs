// src/domain/resolver.rs
//
// Turns loosely shaped field blobs (stored JSON, imported rows, submitted
// forms) into a complete, typed record variant.
//
// Category inference is a best-effort fallback for untagged input. Keep it
// here, in one place, so a schema version tag can replace it later.

use crate::domain::calculator::parse_number;
use crate::domain::fields::{self, FieldKind, COMMUNITY_ONLY};
use crate::domain::record::{
    display_timestamp, is_valid_id, value_text, Category, CommunityListing, FieldMap, FormData,
    GeneralProperty, IdAllocator, Record,
};
use chrono::{DateTime, Local};
use serde_json::Value;
use tracing::{debug, warn};

/// Guesses the category from the fields themselves: any populated
/// community-only field means a community listing, anything else is general.
pub fn infer_category(fields: &FieldMap) -> Category {
    let has_community_field = COMMUNITY_ONLY
        .iter()
        .any(|id| fields.get(*id).is_some_and(|v| !value_text(v).trim().is_empty()));

    if has_community_field {
        Category::Community
    } else {
        Category::General
    }
}

/// Uses the explicit tag when it is recognisable, otherwise falls back to
/// [`infer_category`].
pub fn resolve_category(tag: Option<&str>, fields: &FieldMap) -> Category {
    if let Some(category) = tag.and_then(Category::from_tag) {
        return category;
    }
    let inferred = infer_category(fields);
    match tag {
        Some(t) if !t.trim().is_empty() => {
            warn!(tag = t, inferred = inferred.as_str(), "unknown category tag, inferring")
        }
        _ => debug!(inferred = inferred.as_str(), "no category tag, inferring"),
    }
    inferred
}

/// Coerces every known form field to the JSON type its variant expects and
/// drops envelope and unknown keys. Derived numbers that do not parse become
/// `null`; everything else becomes a string.
pub fn normalize_fields(fields: &FieldMap) -> FieldMap {
    let mut out = FieldMap::new();
    for (key, value) in fields {
        let Some(def) = fields::field(key) else {
            continue;
        };
        let normalized = match def.kind {
            FieldKind::Envelope => continue,
            FieldKind::Derived => derived_value(value),
            FieldKind::Text | FieldKind::Numeric | FieldKind::Rating => {
                Value::String(value_text(value))
            }
        };
        out.insert(key.clone(), normalized);
    }
    out
}

fn derived_value(value: &Value) -> Value {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    };
    number
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Builds the full variant for `category`: missing fields take their zero
/// value, present fields overlay them, fields of the other variant are dropped.
pub fn build_form(category: Category, fields: &FieldMap) -> FormData {
    let value = Value::Object(normalize_fields(fields));
    match category {
        Category::General => FormData::General(
            serde_json::from_value::<GeneralProperty>(value).unwrap_or_else(|e| {
                warn!(error = %e, "could not read general fields, using empty form");
                GeneralProperty::default()
            }),
        ),
        Category::Community => FormData::Community(
            serde_json::from_value::<CommunityListing>(value).unwrap_or_else(|e| {
                warn!(error = %e, "could not read community fields, using empty form");
                CommunityListing::default()
            }),
        ),
    }
}

/// Reads an id written as a JSON number or a numeric string.
pub fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Rebuilds a record from its stored JSON shape, tolerating the older shapes:
/// string ids, a `type` tag instead of `objectCategory`, missing fields.
///
/// Returns `None` only when `value` is not an object at all.
pub fn record_from_value(
    value: &Value,
    ids: &mut IdAllocator,
    now: DateTime<Local>,
) -> Option<Record> {
    let obj = value.as_object()?;

    let id = match obj.get("id").and_then(parse_id).filter(|id| is_valid_id(*id)) {
        Some(id) => {
            ids.observe(id);
            id
        }
        None => {
            let id = ids.next();
            debug!(id, "stored record without a usable id, assigned a new one");
            id
        }
    };

    let timestamp = obj
        .get("timestamp")
        .map(value_text)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| display_timestamp(now));

    let empty = FieldMap::new();
    let form_fields = obj
        .get("formData")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let tag = obj
        .get(fields::CATEGORY)
        .or_else(|| obj.get("type"))
        .and_then(Value::as_str);
    let category = resolve_category(tag, form_fields);

    Some(Record {
        id,
        timestamp,
        form: build_form(category, form_fields),
    })
}
