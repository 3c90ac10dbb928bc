// src/domain/catalog.rs
// Fixed option lists offered by the entry forms.

pub const AREAS: &[(&str, &[&str])] = &[
    (
        "台北市",
        &[
            "北投區", "士林區", "大同區", "中山區", "松山區", "內湖區", "文山區", "中正區",
            "大安區", "信義區", "萬華區", "南港區",
        ],
    ),
    (
        "新北市",
        &[
            "板橋區", "三重區", "中和區", "永和區", "新莊區", "新店區", "樹林區", "鶯歌區",
            "三峽區", "淡水區", "汐止區", "瑞芳區", "土城區", "蘆洲區", "五股區", "泰山區",
            "林口區", "深坑區", "石碇區", "坪林區", "三芝區", "石門區", "八里區", "平溪區",
            "雙溪區", "貢寮區", "金山區", "萬里區", "烏來區",
        ],
    ),
];

pub const HOUSE_TYPES: &[&str] = &["預售屋", "新成屋", "中古屋"];

pub const SOURCES: &[&str] = &["591", "樂屋網", "信義房屋", "永慶房屋", "朋友介紹", "其他"];

pub const CAR_PARK_TYPES: &[&str] = &["無", "坡道平面", "坡道機械", "升降平面", "升降機械"];

pub const YES_NO: &[&str] = &["是", "否"];

/// Rating form field id and the label shown beside it.
pub const RATING_CATEGORIES: &[(&str, &str)] = &[
    ("rating_採光", "採光"),
    ("rating_生活機能", "生活機能"),
    ("rating_交通", "交通"),
    ("rating_價格滿意度", "價格滿意度"),
    ("rating_未來發展潛力", "未來發展潛力"),
];

pub fn districts_for(area: &str) -> &'static [&'static str] {
    AREAS
        .iter()
        .find(|(name, _)| *name == area)
        .map(|(_, districts)| *districts)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fields;

    #[test]
    fn districts_follow_their_area() {
        assert!(districts_for("台北市").contains(&"大安區"));
        assert!(districts_for("新北市").contains(&"板橋區"));
        assert!(districts_for("高雄市").is_empty());
    }

    #[test]
    fn rating_fields_are_in_the_dictionary() {
        for (id, label) in RATING_CATEGORIES {
            assert_eq!(fields::label_for(id), Some(*label));
        }
    }
}
