// templates/pages/record_form.rs

use crate::domain::catalog::{
    districts_for, AREAS, CAR_PARK_TYPES, HOUSE_TYPES, RATING_CATEGORIES, SOURCES, YES_NO,
};
use crate::domain::record::{value_text, Category, FormData, Record};
use crate::templates::components::form_fields::{
    district_select, number_input, rating_select, select, text_input, textarea,
};
use crate::templates::components::{card, number_or_dash};
use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Entry form for a new record (`existing == None`) or an edit.
pub fn record_form_page(category: Category, existing: Option<&Record>) -> Markup {
    let values = existing
        .map(|r| r.form.to_field_map())
        .unwrap_or_default();
    let v = |id: &str| values.get(id).map(value_text).unwrap_or_default();

    let action = match existing {
        Some(r) => format!("/records/{}", r.id),
        None => format!("/records?category={}", category.as_str()),
    };
    let heading = format!(
        "買房便利通 - {}{}",
        category.label(),
        if existing.is_some() { " (編輯)" } else { "" }
    );

    desktop_layout(
        category.label(),
        html! {
            h1 { (heading) }
            form method="post" action=(action) {
                @match category {
                    Category::General => (general_fields(&v)),
                    Category::Community => (community_fields(&v)),
                }
                div class="actions" style="margin-top: 1rem;" {
                    button type="submit" { "儲存" }
                    a href="/" { "取消" }
                }
            }
            @if let Some(FormData::General(g)) = existing.map(|r| &r.form) {
                (card("計算結果", html! {
                    div class="grid" {
                        p { "單坪價格(萬): " (number_or_dash(g.unit_price)) }
                        p { "室內可用坪數: " (number_or_dash(g.indoor_usable_ping)) }
                        p { "公設比(%): " (number_or_dash(g.public_area_ratio)) }
                        p { "物件評分: " (number_or_dash(g.total_rating)) }
                    }
                }))
            }
        },
    )
}

fn area_and_district(v: &dyn Fn(&str) -> String) -> Markup {
    let area = v("area");
    // Offer only the picked area's districts once an area is known.
    let areas: Vec<(&str, &[&str])> = if districts_for(&area).is_empty() {
        AREAS.to_vec()
    } else {
        AREAS.iter().copied().filter(|(a, _)| *a == area).collect()
    };
    let names: Vec<&str> = AREAS.iter().map(|(a, _)| *a).collect();

    html! {
        (select("area", &names, &area))
        (district_select(&areas, &v("district")))
    }
}

fn general_fields(v: &dyn Fn(&str) -> String) -> Markup {
    html! {
        div class="grid" {
            (text_input("propertyName", &v("propertyName")))
            (area_and_district(v))
            (text_input("otherDistrict", &v("otherDistrict")))
            (select("source", SOURCES, &v("source")))
            (text_input("otherSource", &v("otherSource")))
            (select("type", HOUSE_TYPES, &v("type")))
            (select("carParkType", CAR_PARK_TYPES, &v("carParkType")))
            (text_input("carParkFloor", &v("carParkFloor")))
            (number_input("layoutRooms", &v("layoutRooms")))
            (number_input("layoutLivingRooms", &v("layoutLivingRooms")))
            (number_input("layoutBathrooms", &v("layoutBathrooms")))
            (select("hasPXMart", YES_NO, &v("hasPXMart")))
            (text_input("address", &v("address")))
            (text_input("floor", &v("floor")))
            (number_input("totalPing", &v("totalPing")))
            (number_input("mainBuildingPing", &v("mainBuildingPing")))
            (number_input("accessoryBuildingPing", &v("accessoryBuildingPing")))
            (number_input("carParkPing", &v("carParkPing")))
            (number_input("totalAmount", &v("totalAmount")))
            (number_input("carParkPrice", &v("carParkPrice")))
            (number_input("buildingAge", &v("buildingAge")))
            (text_input("mrtStation", &v("mrtStation")))
            (number_input("mrtDistance", &v("mrtDistance")))
        }
        h3 { "評分" }
        div class="grid" {
            @for &(id, label) in RATING_CATEGORIES {
                (rating_select(id, label, &v(id)))
            }
        }
        (textarea("notes", &v("notes")))
    }
}

fn community_fields(v: &dyn Fn(&str) -> String) -> Markup {
    html! {
        div class="grid" {
            (area_and_district(v))
            (text_input("communityName", &v("communityName")))
            (text_input("address", &v("address")))
        }
        (textarea("reason", &v("reason")))
    }
}
