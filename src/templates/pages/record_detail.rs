use crate::domain::fields;
use crate::domain::record::Record;
use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Full field listing. Summary fields are left out; so are fields that
/// belong to the other category.
pub fn record_detail_page(record: &Record) -> Markup {
    let own_fields = record.form.to_field_map();
    let rows: Vec<_> = record
        .field_texts()
        .into_iter()
        .filter(|(def, _)| !fields::is_detail_excluded(def.id) && own_fields.contains_key(def.id))
        .collect();

    desktop_layout(
        record.category().label(),
        html! {
            h1 { (record.category().label()) ": " (record.title()) }
            p class="muted" { "ID " (record.id) " · " (record.timestamp) }
            table {
                tbody {
                    @for (def, text) in &rows {
                        tr {
                            th style="text-align: left; padding-right: 1rem;" { (def.label) }
                            td style="white-space: pre-wrap;" { (text) }
                        }
                    }
                }
            }
            div class="actions" style="margin-top: 1rem;" {
                a href=(format!("/records/{}/edit", record.id)) { "編輯" }
                a href="/" { "返回" }
            }
        },
    )
}
