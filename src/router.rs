use crate::domain::record::{Category, FieldMap};
use crate::domain::resolver::build_form;
use crate::errors::{ResultResp, ServerError};
use crate::responses::{download_response, html_response, redirect};
use crate::spreadsheets::{
    export_backup, export_csv, export_xlsx, import_csv, parse_backup, ImportError,
};
use crate::state::AppState;
use crate::templates::pages::{
    home_page, import_result_page, record_detail_page, record_form_page, ImportSummary,
};
use astra::Request;
use chrono::Local;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, info};

pub fn handle(mut req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();
    let query = parse_query(&req);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    debug!(%method, %path, "request");

    match (method.as_str(), segments.as_slice()) {
        ("GET", []) => {
            let records = state.ledger()?.records().to_vec();
            html_response(home_page(&records))
        }

        // Records
        ("GET", ["records", "new"]) => {
            let category = category_param(&query)?;
            html_response(record_form_page(category, None))
        }
        ("POST", ["records"]) => {
            let category = category_param(&query)?;
            let fields = read_form(&mut req)?;
            let form = build_form(category, &fields);
            state.mutate(|ledger| Ok(ledger.create(form).id))?;
            redirect("/")
        }
        ("GET", ["records", id]) => {
            let id = parse_id(id)?;
            let ledger = state.ledger()?;
            let record = ledger.get(id).ok_or(ServerError::NotFound)?;
            html_response(record_detail_page(record))
        }
        ("GET", ["records", id, "edit"]) => {
            let id = parse_id(id)?;
            let ledger = state.ledger()?;
            let record = ledger.get(id).ok_or(ServerError::NotFound)?;
            html_response(record_form_page(record.category(), Some(record)))
        }
        ("POST", ["records", id]) => {
            let id = parse_id(id)?;
            let fields = read_form(&mut req)?;
            state.mutate(|ledger| {
                // The category of an existing record never changes.
                let category = ledger
                    .get(id)
                    .map(|r| r.category())
                    .ok_or(ServerError::NotFound)?;
                ledger.replace(id, build_form(category, &fields))?;
                Ok(())
            })?;
            redirect(&format!("/records/{id}"))
        }
        ("POST", ["records", id, "delete"]) => {
            let id = parse_id(id)?;
            state.mutate(|ledger| ledger.delete(id))?;
            redirect("/")
        }

        // Export
        ("GET", ["export", format]) => {
            let records = state.ledger()?.records().to_vec();
            let now = Local::now();
            let file = match *format {
                "csv" => export_csv(&records, now)?,
                "json" => export_backup(&records, now)?,
                "xlsx" => export_xlsx(&records, now)?,
                _ => return Err(ServerError::NotFound),
            };
            download_response(file)
        }

        // Import
        ("POST", ["import", "csv"]) => {
            let text = read_text(&mut req)?;
            let summary = state.mutate(|ledger| {
                let outcome = import_csv(&text, ledger.ids(), Local::now())?;
                let imported = outcome.records.len();
                let rekeyed = ledger.append_imported(outcome.records);
                Ok(ImportSummary {
                    imported,
                    skipped: outcome.skipped,
                    rekeyed,
                    replaced: false,
                })
            })?;
            html_response(import_result_page(&summary))
        }
        ("POST", ["import", "json"]) => {
            if query.get("confirm").map(String::as_str) != Some("yes") {
                return Err(ServerError::BadRequest(
                    "匯入備份會覆蓋所有記錄，請先確認。".to_string(),
                ));
            }
            let text = read_text(&mut req)?;
            let summary = state.mutate(|ledger| {
                let backup = parse_backup(&text, ledger.ids(), Local::now())?;
                let imported = backup.records.len();
                info!(
                    exported_at = backup.exported_at.as_deref().unwrap_or("unknown"),
                    records = imported,
                    "restoring backup"
                );
                let rekeyed = ledger.replace_all(backup.records);
                Ok(ImportSummary {
                    imported,
                    skipped: Vec::new(),
                    rekeyed,
                    replaced: true,
                })
            })?;
            html_response(import_result_page(&summary))
        }

        _ => Err(ServerError::NotFound),
    }
}

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse()
        .map_err(|_| ServerError::BadRequest(format!("invalid record id: {raw}")))
}

fn category_param(query: &HashMap<String, String>) -> Result<Category, ServerError> {
    query
        .get("category")
        .and_then(|c| Category::from_tag(c))
        .ok_or_else(|| ServerError::BadRequest("category must be general or community".into()))
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn read_body(req: &mut Request) -> Result<Vec<u8>, ServerError> {
    let mut bytes = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut bytes)
        .map_err(|e| ServerError::BadRequest(format!("could not read request body: {e}")))?;
    Ok(bytes)
}

/// An uploaded file's contents. Anything that is not UTF-8 text fails the
/// whole import.
fn read_text(req: &mut Request) -> Result<String, ServerError> {
    let bytes = read_body(req)?;
    String::from_utf8(bytes).map_err(|e| ImportError::Unparseable(e.to_string()).into())
}

/// An `application/x-www-form-urlencoded` body as an identifier-keyed map.
fn read_form(req: &mut Request) -> Result<FieldMap, ServerError> {
    let bytes = read_body(req)?;
    Ok(url::form_urlencoded::parse(&bytes)
        .into_owned()
        .map(|(k, v)| (k, Value::String(v)))
        .collect())
}
