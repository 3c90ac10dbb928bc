use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="zh-Hant" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | 買房便利通" }
                style { (STYLE) }
            }
            body {
                header class="topbar" {
                    h3 { a href="/" { "買房便利通" } }
                    nav {
                        ul {
                            li { a href="/" { "記錄" } }
                            li { a href="/records/new?category=general" { "一般物件" } }
                            li { a href="/records/new?category=community" { "指定社區" } }
                        }
                    }
                }
                main class="container" {
                    (content)
                }
            }
        }
    }
}

const STYLE: &str = "
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; }
.topbar { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
.topbar ul { display: flex; gap: 1rem; list-style: none; margin: 0; }
.container { max-width: 960px; margin: 1.5rem auto; padding: 0 1rem; }
.card { border: 1px solid #e5e7eb; border-radius: 8px; padding: 1rem; margin-bottom: 1rem; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 0.75rem; }
.muted { color: #6b7280; font-size: 0.9rem; }
label { display: block; font-weight: 600; margin-bottom: 0.25rem; }
input, select, textarea { width: 100%; padding: 0.4rem; box-sizing: border-box; }
.actions { display: flex; gap: 0.5rem; flex-wrap: wrap; align-items: center; }
";
