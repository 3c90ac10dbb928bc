use crate::domain::record::{format_number, FormData, Record};
use maud::{html, Markup};

/// One line per record in the list: the headline fields only.
pub fn record_summary(record: &Record) -> Markup {
    html! {
        article class="card" {
            div class="actions" {
                strong { (record.category().label()) }
                span {
                    @if record.title().is_empty() { "(未命名)" } @else { (record.title()) }
                }
                span class="muted" { (record.timestamp) }
            }
            @match &record.form {
                FormData::General(g) => p {
                    (g.area) " " (g.district) " " (g.address)
                    " · 單坪價格(萬): " (number_or_dash(g.unit_price))
                    " · 物件評分: " (number_or_dash(g.total_rating))
                },
                FormData::Community(c) => p {
                    (c.area) " " (c.district) " " (c.address)
                },
            }
            div class="actions" {
                a href=(format!("/records/{}", record.id)) { "詳細" }
                a href=(format!("/records/{}/edit", record.id)) { "編輯" }
                form method="post" action=(format!("/records/{}/delete", record.id))
                    onsubmit="return confirm('確定要刪除這筆記錄嗎？');"
                {
                    button type="submit" { "刪除" }
                }
            }
        }
    }
}

pub fn number_or_dash(n: Option<f64>) -> String {
    n.map(format_number).unwrap_or_else(|| "-".to_string())
}
