use crate::domain::fields;
use maud::{html, Markup};

fn label(id: &str) -> &str {
    fields::label_for(id).unwrap_or(id)
}

pub fn text_input(id: &str, value: &str) -> Markup {
    html! {
        div {
            label for=(id) { (label(id)) }
            input type="text" id=(id) name=(id) value=(value);
        }
    }
}

pub fn number_input(id: &str, value: &str) -> Markup {
    html! {
        div {
            label for=(id) { (label(id)) }
            input type="number" step="0.01" id=(id) name=(id) value=(value);
        }
    }
}

pub fn textarea(id: &str, value: &str) -> Markup {
    html! {
        div {
            label for=(id) { (label(id)) }
            textarea id=(id) name=(id) rows="3" { (value) }
        }
    }
}

pub fn select(id: &str, options: &[&str], value: &str) -> Markup {
    html! {
        div {
            label for=(id) { (label(id)) }
            select id=(id) name=(id) {
                option value="" selected[value.is_empty()] { "請選擇" }
                @for opt in options {
                    option value=(opt) selected[*opt == value] { (opt) }
                }
            }
        }
    }
}

/// District picker grouped by area.
pub fn district_select(areas: &[(&str, &[&str])], value: &str) -> Markup {
    html! {
        div {
            label for="district" { (label("district")) }
            select id="district" name="district" {
                option value="" selected[value.is_empty()] { "請選擇" }
                @for (area, districts) in areas {
                    optgroup label=(area) {
                        @for d in districts.iter() {
                            option value=(d) selected[*d == value] { (d) }
                        }
                    }
                }
            }
        }
    }
}

/// A 1-5 score; `label_text` is the rating category name.
pub fn rating_select(id: &str, label_text: &str, value: &str) -> Markup {
    html! {
        div {
            label for=(id) { (label_text) }
            select id=(id) name=(id) {
                option value="" selected[value.is_empty()] { "-" }
                @for score in ["1", "2", "3", "4", "5"] {
                    option value=(score) selected[score == value] { (score) }
                }
            }
        }
    }
}
