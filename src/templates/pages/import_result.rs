use crate::spreadsheets::SkippedRow;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct ImportSummary {
    pub imported: usize,
    pub skipped: Vec<SkippedRow>,
    pub rekeyed: usize,
    /// True when the import replaced every record instead of appending.
    pub replaced: bool,
}

pub fn import_result_page(summary: &ImportSummary) -> Markup {
    desktop_layout(
        "匯入結果",
        html! {
            h1 { "匯入結果" }
            p {
                @if summary.replaced {
                    "資料已成功匯入！目前共 " strong { (summary.imported) } " 筆記錄。"
                } @else {
                    "已新增 " strong { (summary.imported) } " 筆記錄。"
                }
            }
            @if summary.rekeyed > 0 {
                p class="muted" { (summary.rekeyed) " 筆記錄的 ID 已存在，已改用新的 ID。" }
            }
            @if !summary.skipped.is_empty() {
                h3 { "略過的資料列" }
                ul {
                    @for row in &summary.skipped {
                        li { "第 " (row.line) " 行: 欄位數 " (row.found) ", 應為 " (row.expected) }
                    }
                }
            }
            a href="/" { "返回記錄" }
        },
    )
}
