// templates/pages/home.rs

use crate::domain::record::{Category, Record};
use crate::templates::{
    components::{card, record_summary},
    desktop_layout,
};
use maud::{html, Markup, PreEscaped};

pub fn home_page(records: &[Record]) -> Markup {
    let communities = records
        .iter()
        .filter(|r| r.category() == Category::Community)
        .count();

    desktop_layout(
        "記錄",
        html! {
            h1 { "房產記錄" }
            p class="muted" {
                "共 " (records.len()) " 筆 (一般物件 " (records.len() - communities)
                ", 指定社區 " (communities) ")"
            }

            (card("新增", html! {
                div class="actions" {
                    a href="/records/new?category=community" { "是 (指定社區)" }
                    a href="/records/new?category=general" { "否 (一般物件)" }
                }
            }))

            (card("匯出 / 匯入", html! {
                div class="actions" {
                    a href="/export/csv" { "匯出 CSV" }
                    a href="/export/xlsx" { "匯出 Excel" }
                    a href="/export/json" { "匯出備份 (JSON)" }
                }
                div class="grid" style="margin-top: 1rem;" {
                    div {
                        label for="csv-file" { "匯入 CSV (附加)" }
                        input id="csv-file" type="file" accept=".csv,text/csv"
                            onchange="uploadFile(this, '/import/csv', false)";
                    }
                    div {
                        label for="json-file" { "匯入備份 (取代全部)" }
                        input id="json-file" type="file" accept=".json,application/json"
                            onchange="uploadFile(this, '/import/json?confirm=yes', true)";
                    }
                }
            }))

            @if records.is_empty() {
                p { "目前沒有記錄。" }
            } @else {
                @for record in records.iter().rev() {
                    (record_summary(record))
                }
            }

            script { (PreEscaped(UPLOAD_SCRIPT)) }
        },
    )
}

// Reads the picked file and posts its text; the server answers with a page.
const UPLOAD_SCRIPT: &str = r#"
async function uploadFile(input, url, replaces) {
  const file = input.files[0];
  if (!file) return;
  const text = await file.text();
  if (replaces) {
    let message = "您確定要匯入此資料嗎？這將會覆蓋您當前所有房產記錄。";
    try {
      const data = JSON.parse(text);
      if (data && data.exportedAt) {
        const when = new Date(data.exportedAt).toLocaleString("zh-TW", { hour12: false });
        message = "您確定要匯入此資料嗎？\n\n此備份建立於：" + when + "\n\n這將會覆蓋您當前所有房產記錄。";
      }
    } catch (_) {}
    if (!window.confirm(message)) {
      input.value = "";
      return;
    }
  }
  const resp = await fetch(url, { method: "POST", body: text });
  document.open();
  document.write(await resp.text());
  document.close();
}
"#;
