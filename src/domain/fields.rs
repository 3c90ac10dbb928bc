// src/domain/fields.rs

use std::collections::HashMap;
use std::sync::LazyLock;

/// How a field is stored and coerced when it crosses the CSV boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Record metadata (`id`, `timestamp`, `objectCategory`).
    Envelope,
    Text,
    /// Raw numeric input kept as text (areas, prices, age, distance).
    Numeric,
    /// A 1-5 score kept as text.
    Rating,
    /// Calculated number; never trusted from input.
    Derived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn def(id: &'static str, label: &'static str, kind: FieldKind) -> FieldDef {
    FieldDef { id, label, kind }
}

pub const ID: &str = "id";
pub const TIMESTAMP: &str = "timestamp";
pub const CATEGORY: &str = "objectCategory";

/// Every exported column, in export order.
pub static FIELDS: [FieldDef; 39] = [
    def(ID, "ID", FieldKind::Envelope),
    def(TIMESTAMP, "時間", FieldKind::Envelope),
    def(CATEGORY, "物件類別", FieldKind::Envelope),
    def("propertyName", "物件名稱", FieldKind::Text),
    def("area", "主要都市", FieldKind::Text),
    def("district", "行政區", FieldKind::Text),
    def("otherDistrict", "其他行政區", FieldKind::Text),
    def("source", "物件來源", FieldKind::Text),
    def("otherSource", "其他來源", FieldKind::Text),
    def("type", "房屋種類", FieldKind::Text),
    def("carParkType", "車位形式", FieldKind::Text),
    def("carParkFloor", "車位樓層", FieldKind::Text),
    def("layoutRooms", "房間數", FieldKind::Text),
    def("layoutLivingRooms", "客餐廳數", FieldKind::Text),
    def("layoutBathrooms", "衛浴數", FieldKind::Text),
    def("hasPXMart", "附近是否有全聯", FieldKind::Text),
    def("address", "地址", FieldKind::Text),
    def("floor", "樓層", FieldKind::Text),
    def("totalPing", "權狀坪數", FieldKind::Numeric),
    def("mainBuildingPing", "主建物(坪)", FieldKind::Numeric),
    def("accessoryBuildingPing", "附屬建物(坪)", FieldKind::Numeric),
    def("carParkPing", "車位(坪)", FieldKind::Numeric),
    def("totalAmount", "總價(萬)", FieldKind::Numeric),
    def("carParkPrice", "車位價格(萬)", FieldKind::Numeric),
    def("buildingAge", "屋齡", FieldKind::Numeric),
    def("mrtStation", "附近的捷運站", FieldKind::Text),
    def("mrtDistance", "距離捷運站幾公尺", FieldKind::Numeric),
    def("notes", "備註", FieldKind::Text),
    def("rating_採光", "採光", FieldKind::Rating),
    def("rating_生活機能", "生活機能", FieldKind::Rating),
    def("rating_交通", "交通", FieldKind::Rating),
    def("rating_價格滿意度", "價格滿意度", FieldKind::Rating),
    def("rating_未來發展潛力", "未來發展潛力", FieldKind::Rating),
    def("unitPrice", "單坪價格(萬)", FieldKind::Derived),
    def("indoorUsablePing", "室內可用坪數", FieldKind::Derived),
    def("publicAreaRatio", "公設比", FieldKind::Derived),
    def("totalRating", "物件評分", FieldKind::Derived),
    def("communityName", "社區名稱", FieldKind::Text),
    def("reason", "獲選的原因", FieldKind::Text),
];

/// Fields rendered in the record summary line and therefore left out of the
/// full field listing.
pub const DETAIL_EXCLUDED: [&str; 5] = [ID, TIMESTAMP, CATEGORY, "propertyName", "communityName"];

/// Fields that only a community listing carries. Used to guess the category
/// of untagged input.
pub const COMMUNITY_ONLY: [&str; 2] = ["communityName", "reason"];

static BY_ID: LazyLock<HashMap<&'static str, &'static FieldDef>> =
    LazyLock::new(|| FIELDS.iter().map(|f| (f.id, f)).collect());

// Built from the forward table so the two directions cannot drift.
static BY_LABEL: LazyLock<HashMap<&'static str, &'static FieldDef>> =
    LazyLock::new(|| FIELDS.iter().map(|f| (f.label, f)).collect());

pub fn field(id: &str) -> Option<&'static FieldDef> {
    BY_ID.get(id).copied()
}

pub fn label_for(id: &str) -> Option<&'static str> {
    field(id).map(|f| f.label)
}

/// Reverse lookup from an external column name.
pub fn by_label(label: &str) -> Option<&'static FieldDef> {
    BY_LABEL.get(label).copied()
}

pub fn ordered_labels() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().map(|f| f.label)
}

pub fn is_detail_excluded(id: &str) -> bool {
    DETAIL_EXCLUDED.contains(&id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn mapping_is_bijective() {
        let ids: HashSet<_> = FIELDS.iter().map(|f| f.id).collect();
        let labels: HashSet<_> = FIELDS.iter().map(|f| f.label).collect();
        assert_eq!(ids.len(), FIELDS.len());
        assert_eq!(labels.len(), FIELDS.len());
    }

    #[test]
    fn reverse_lookup_matches_forward() {
        for f in &FIELDS {
            assert_eq!(by_label(f.label).map(|d| d.id), Some(f.id));
            assert_eq!(label_for(f.id), Some(f.label));
        }
        assert!(by_label("不存在").is_none());
    }

    #[test]
    fn envelope_leads_the_header_order() {
        let first: Vec<_> = ordered_labels().take(3).collect();
        assert_eq!(first, vec!["ID", "時間", "物件類別"]);
    }

    #[test]
    fn excluded_and_community_fields_are_known() {
        for id in DETAIL_EXCLUDED.iter().chain(COMMUNITY_ONLY.iter()) {
            assert!(field(id).is_some(), "unknown field {id}");
        }
    }
}
