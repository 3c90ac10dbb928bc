// src/domain/record.rs

use crate::domain::calculator;
use crate::domain::fields;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::warn;

pub type FieldMap = Map<String, Value>;

/// Which entry form produced a record. Fixed for the lifetime of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    Community,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Community => "community",
        }
    }

    /// Label used in the CSV category column and in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Category::General => "一般物件",
            Category::Community => "指定社區",
        }
    }

    /// Accepts the internal tag, the display label, and the tag used by the
    /// first storage format (`designated`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "general" | "一般物件" => Some(Category::General),
            "community" | "designated" | "指定社區" => Some(Category::Community),
            _ => None,
        }
    }
}

/// A property observed on the market, as typed into the general form.
///
/// Everything except the four derived numbers is kept exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneralProperty {
    pub property_name: String,
    pub area: String,
    pub district: String,
    pub other_district: String,
    pub source: String,
    pub other_source: String,
    #[serde(rename = "type")]
    pub house_type: String,
    pub car_park_type: String,
    pub car_park_floor: String,
    pub layout_rooms: String,
    pub layout_living_rooms: String,
    pub layout_bathrooms: String,
    #[serde(rename = "hasPXMart")]
    pub has_px_mart: String,
    pub address: String,
    pub floor: String,
    pub total_ping: String,
    pub main_building_ping: String,
    pub accessory_building_ping: String,
    pub car_park_ping: String,
    pub total_amount: String,
    pub car_park_price: String,
    pub building_age: String,
    pub mrt_station: String,
    pub mrt_distance: String,
    pub notes: String,
    #[serde(rename = "rating_採光")]
    pub rating_lighting: String,
    #[serde(rename = "rating_生活機能")]
    pub rating_amenities: String,
    #[serde(rename = "rating_交通")]
    pub rating_transport: String,
    #[serde(rename = "rating_價格滿意度")]
    pub rating_price: String,
    #[serde(rename = "rating_未來發展潛力")]
    pub rating_potential: String,

    pub unit_price: Option<f64>,
    pub indoor_usable_ping: Option<f64>,
    pub public_area_ratio: Option<f64>,
    pub total_rating: Option<f64>,
}

impl GeneralProperty {
    pub fn ratings(&self) -> [&str; 5] {
        [
            self.rating_lighting.as_str(),
            self.rating_amenities.as_str(),
            self.rating_transport.as_str(),
            self.rating_price.as_str(),
            self.rating_potential.as_str(),
        ]
    }

    /// Overwrites the derived numbers with values computed from the raw inputs.
    pub fn recompute_derived(&mut self) {
        self.unit_price = calculator::unit_price(
            &self.total_amount,
            &self.total_ping,
            &self.car_park_price,
            &self.car_park_ping,
        );
        self.indoor_usable_ping =
            calculator::indoor_usable_area(&self.main_building_ping, &self.accessory_building_ping);
        self.public_area_ratio = calculator::public_area_ratio(
            &self.total_ping,
            &self.main_building_ping,
            &self.accessory_building_ping,
            &self.car_park_ping,
        );
        self.total_rating = Some(f64::from(calculator::total_rating(self.ratings())));
    }
}

/// A community the user wants to watch, with the reason it was picked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommunityListing {
    pub area: String,
    pub district: String,
    pub community_name: String,
    pub address: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormData {
    General(GeneralProperty),
    Community(CommunityListing),
}

impl FormData {
    pub fn category(&self) -> Category {
        match self {
            FormData::General(_) => Category::General,
            FormData::Community(_) => Category::Community,
        }
    }

    /// The form as an identifier-keyed map.
    pub fn to_field_map(&self) -> FieldMap {
        let value = match self {
            FormData::General(g) => serde_json::to_value(g),
            FormData::Community(c) => serde_json::to_value(c),
        };
        match value {
            Ok(Value::Object(map)) => map,
            _ => FieldMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: i64,
    pub timestamp: String,
    pub form: FormData,
}

impl Record {
    pub fn category(&self) -> Category {
        self.form.category()
    }

    pub fn recompute_derived(&mut self) {
        match &mut self.form {
            FormData::General(g) => g.recompute_derived(),
            FormData::Community(_) => {}
        }
    }

    /// Headline for the record list.
    pub fn title(&self) -> &str {
        match &self.form {
            FormData::General(g) => &g.property_name,
            FormData::Community(c) => &c.community_name,
        }
    }

    /// Every dictionary field rendered as text, keyed by identifier. Fields
    /// that belong to the other variant come back empty.
    pub fn field_texts(&self) -> Vec<(&'static fields::FieldDef, String)> {
        let form = self.form.to_field_map();
        fields::FIELDS
            .iter()
            .map(|def| {
                let text = match def.id {
                    fields::ID => self.id.to_string(),
                    fields::TIMESTAMP => self.timestamp.clone(),
                    fields::CATEGORY => self.category().label().to_string(),
                    id => form.get(id).map(value_text).unwrap_or_default(),
                };
                (def, text)
            })
            .collect()
    }
}

/// Persisted shape: `{ id, timestamp, objectCategory, formData }`.
impl Serialize for Record {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Stored<'a> {
            id: i64,
            timestamp: &'a str,
            object_category: Category,
            form_data: &'a FormData,
        }

        Stored {
            id: self.id,
            timestamp: &self.timestamp,
            object_category: self.category(),
            form_data: &self.form,
        }
        .serialize(serializer)
    }
}

/// Renders a stored JSON value the way it appears in a cell.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) => format_number(f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Shortest decimal form: `50`, `27.5`.
pub fn format_number(n: f64) -> String {
    format!("{n}")
}

/// `YYYY/MM/DD HH:MM:SS`, 24-hour local time.
pub fn display_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y/%m/%d %H:%M:%S").to_string()
}

/// Largest id accepted from stored or imported data: 9999-12-31T23:59:59.999Z
/// in epoch milliseconds.
pub const MAX_RECORD_ID: i64 = 253_402_300_799_999;

/// Whether an id read from a file or the store can be kept as-is.
pub fn is_valid_id(id: i64) -> bool {
    (1..=MAX_RECORD_ID).contains(&id)
}

/// Issues record ids from the wall clock in milliseconds, never repeating and
/// never going backwards within one process.
#[derive(Debug, Default)]
pub struct IdAllocator {
    last: i64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure future ids are greater than `id`. Ids outside the valid
    /// range are ignored.
    pub fn observe(&mut self, id: i64) {
        if is_valid_id(id) {
            self.last = self.last.max(id);
        }
    }

    pub fn next(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last.saturating_add(1));
        self.last
    }
}

/// Gives every record whose id is invalid or already used earlier in
/// `records` a fresh id. Returns how many were re-keyed.
pub fn rekey_duplicates(records: &mut [Record], ids: &mut IdAllocator) -> usize {
    for r in records.iter() {
        ids.observe(r.id);
    }

    let mut taken = HashSet::with_capacity(records.len());
    let mut rekeyed = 0;
    for record in records.iter_mut() {
        if !is_valid_id(record.id) || !taken.insert(record.id) {
            let fresh = ids.next();
            warn!(old = record.id, new = fresh, "duplicate or invalid record id, re-keyed");
            record.id = fresh;
            taken.insert(fresh);
            rekeyed += 1;
        }
    }
    rekeyed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_general() -> GeneralProperty {
        GeneralProperty {
            property_name: "河岸大樓".into(),
            total_amount: "2000".into(),
            total_ping: "40".into(),
            main_building_ping: "25".into(),
            accessory_building_ping: "5".into(),
            rating_lighting: "4".into(),
            rating_transport: "5".into(),
            ..Default::default()
        }
    }

    #[test]
    fn recompute_fills_all_derived_fields() {
        let mut g = sample_general();
        g.recompute_derived();
        assert_eq!(g.unit_price, Some(50.0));
        assert_eq!(g.indoor_usable_ping, Some(30.0));
        assert_eq!(g.public_area_ratio, Some(25.0));
        assert_eq!(g.total_rating, Some(9.0));
    }

    #[test]
    fn serializes_in_the_stored_shape() {
        let record = Record {
            id: 42,
            timestamp: "2025/01/02 03:04:05".into(),
            form: FormData::Community(CommunityListing {
                community_name: "Oak Gardens".into(),
                ..Default::default()
            }),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 42);
        assert_eq!(value["objectCategory"], "community");
        assert_eq!(value["formData"]["communityName"], "Oak Gardens");
        assert!(value["formData"].get("propertyName").is_none());
    }

    #[test]
    fn general_form_keeps_original_keys() {
        let map = FormData::General(sample_general()).to_field_map();
        assert_eq!(map["rating_採光"], "4");
        assert_eq!(map["hasPXMart"], "");
        assert_eq!(map["type"], "");
        assert!(map["unitPrice"].is_null());
        for key in map.keys() {
            assert!(fields::field(key).is_some(), "{key} missing from dictionary");
        }
    }

    #[test]
    fn field_texts_blank_the_other_variant() {
        let mut g = sample_general();
        g.recompute_derived();
        let record = Record {
            id: 7,
            timestamp: "t".into(),
            form: FormData::General(g),
        };
        let texts = record.field_texts();
        let get = |id: &str| {
            texts
                .iter()
                .find(|(d, _)| d.id == id)
                .map(|(_, t)| t.clone())
                .unwrap()
        };
        assert_eq!(get("id"), "7");
        assert_eq!(get("objectCategory"), "一般物件");
        assert_eq!(get("unitPrice"), "50");
        assert_eq!(get("communityName"), "");
        assert_eq!(texts.len(), fields::FIELDS.len());
    }

    #[test]
    fn category_tags_cover_all_spellings() {
        assert_eq!(Category::from_tag("一般物件"), Some(Category::General));
        assert_eq!(Category::from_tag("designated"), Some(Category::Community));
        assert_eq!(Category::from_tag("??"), None);
    }

    #[test]
    fn allocator_never_repeats() {
        let mut ids = IdAllocator::new();
        ids.observe(MAX_RECORD_ID - 10);
        let a = ids.next();
        let b = ids.next();
        assert!(a > MAX_RECORD_ID - 10);
        assert!(b > a);
    }

    #[test]
    fn allocator_ignores_out_of_range_ids() {
        let mut ids = IdAllocator::new();
        ids.observe(i64::MAX);
        ids.observe(-5);
        let a = ids.next();
        let b = ids.next();
        assert!(is_valid_id(a));
        assert!(b > a);
    }

    #[test]
    fn allocator_saturates_instead_of_overflowing() {
        let mut ids = IdAllocator { last: i64::MAX };
        assert_eq!(ids.next(), i64::MAX);
    }

    #[test]
    fn duplicate_and_invalid_ids_are_rekeyed() {
        let record = |id: i64| Record {
            id,
            timestamp: "t".into(),
            form: FormData::Community(CommunityListing::default()),
        };
        let mut records = vec![record(9), record(9), record(i64::MAX), record(4)];
        let mut ids = IdAllocator::new();

        assert_eq!(rekey_duplicates(&mut records, &mut ids), 2);
        assert_eq!(records[0].id, 9);
        assert_eq!(records[3].id, 4);
        let unique: HashSet<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(unique.len(), 4);
        assert!(records.iter().all(|r| is_valid_id(r.id)));
    }
}
