use crate::codec::{decode, DecodedRow};
use crate::domain::calculator::parse_number;
use crate::domain::fields::{self, FieldKind};
use crate::domain::record::{display_timestamp, is_valid_id, FieldMap, IdAllocator, Record};
use crate::domain::resolver::{build_form, resolve_category};
use crate::spreadsheets::ImportError;
use chrono::{DateTime, Local};
use serde_json::Value;
use tracing::{debug, info, warn};

/// A data row left out of the import because its shape did not match the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: usize,
    pub expected: usize,
    pub found: usize,
}

#[derive(Debug, Default)]
pub struct ImportOutcome {
    /// New records, in file order. The caller merges them into the store.
    pub records: Vec<Record>,
    pub skipped: Vec<SkippedRow>,
}

/// Parses exported CSV text into records.
///
/// Rows with the wrong number of fields are skipped and reported; a bad
/// value in a single cell only blanks that cell. Derived numbers found in the
/// file are carried as-is and must be recomputed before the next save.
pub fn import_csv(
    text: &str,
    ids: &mut IdAllocator,
    now: DateTime<Local>,
) -> Result<ImportOutcome, ImportError> {
    let table = decode(text)?;
    let mut outcome = ImportOutcome::default();

    for row in &table.rows {
        if row.fields.len() != table.headers.len() {
            warn!(
                line = row.line,
                expected = table.headers.len(),
                found = row.fields.len(),
                "skipping malformed row"
            );
            outcome.skipped.push(SkippedRow {
                line: row.line,
                expected: table.headers.len(),
                found: row.fields.len(),
            });
            continue;
        }
        outcome
            .records
            .push(record_from_row(&table.headers, row, ids, now));
    }

    info!(
        imported = outcome.records.len(),
        skipped = outcome.skipped.len(),
        "parsed CSV import"
    );
    Ok(outcome)
}

fn record_from_row(
    headers: &[String],
    row: &DecodedRow,
    ids: &mut IdAllocator,
    now: DateTime<Local>,
) -> Record {
    let mut id = None;
    let mut timestamp = None;
    let mut tag = None;
    let mut form_fields = FieldMap::new();

    for (header, value) in headers.iter().zip(&row.fields) {
        let Some(def) = fields::by_label(header) else {
            continue;
        };
        match (def.id, def.kind) {
            (fields::ID, _) => {
                id = value.trim().parse::<i64>().ok().filter(|id| is_valid_id(*id))
            }
            (fields::TIMESTAMP, _) => timestamp = Some(value.clone()).filter(|t| !t.trim().is_empty()),
            (fields::CATEGORY, _) => tag = Some(value.as_str()),
            (key, kind) => {
                form_fields.insert(key.to_string(), coerce(kind, value, row.line, key));
            }
        }
    }

    let id = match id {
        Some(id) => {
            ids.observe(id);
            id
        }
        None => ids.next(),
    };
    let category = resolve_category(tag, &form_fields);

    Record {
        id,
        timestamp: timestamp.unwrap_or_else(|| display_timestamp(now)),
        form: build_form(category, &form_fields),
    }
}

fn coerce(kind: FieldKind, value: &str, line: usize, key: &str) -> Value {
    match kind {
        FieldKind::Numeric => match parse_number(value) {
            Some(_) => Value::String(value.to_string()),
            None => {
                if !value.trim().is_empty() {
                    debug!(line, field = key, value, "dropping non-numeric value");
                }
                Value::String(String::new())
            }
        },
        FieldKind::Derived => parse_number(value)
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        FieldKind::Text | FieldKind::Rating | FieldKind::Envelope => Value::String(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{Category, CommunityListing, FormData, GeneralProperty};
    use crate::spreadsheets::export_csv;

    fn general(name: &str) -> GeneralProperty {
        GeneralProperty {
            property_name: name.into(),
            area: "台北市".into(),
            district: "大安區".into(),
            total_amount: "2000".into(),
            total_ping: "40".into(),
            main_building_ping: "25".into(),
            accessory_building_ping: "5".into(),
            notes: "He said \"Hi\", then left\n第二行".into(),
            rating_lighting: "4".into(),
            rating_potential: "5".into(),
            ..Default::default()
        }
    }

    #[test]
    fn round_trip_preserves_records() {
        let mut g = general("河岸大樓");
        g.recompute_derived();
        let original = vec![
            Record {
                id: 1_715_000_000_000,
                timestamp: "2025/05/06 12:00:00".into(),
                form: FormData::General(g),
            },
            Record {
                id: 1_715_000_000_001,
                timestamp: "2025/05/06 12:01:00".into(),
                form: FormData::Community(CommunityListing {
                    area: "新北市".into(),
                    district: "板橋區".into(),
                    community_name: "Oak Gardens".into(),
                    address: "文化路一段".into(),
                    reason: "近捷運, \"安靜\"".into(),
                }),
            },
        ];

        let file = export_csv(&original, Local::now()).unwrap();
        let text = String::from_utf8(file.bytes).unwrap();
        let mut ids = IdAllocator::new();
        let outcome = import_csv(&text, &mut ids, Local::now()).unwrap();

        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.records, original);
    }

    #[test]
    fn end_to_end_derived_values_survive() {
        let mut ids = IdAllocator::new();
        let record = Record {
            id: ids.next(),
            timestamp: display_timestamp(Local::now()),
            form: FormData::General(general("A")),
        };
        let text = crate::spreadsheets::export_csv::csv_text(&[record]);
        let mut imported = import_csv(&text, &mut ids, Local::now()).unwrap().records;
        imported[0].recompute_derived();

        let FormData::General(g) = &imported[0].form else {
            panic!("expected general record");
        };
        assert_eq!(g.unit_price, Some(50.0));
        assert_eq!(g.indoor_usable_ping, Some(30.0));
        assert_eq!(g.public_area_ratio, Some(25.0));
        assert_eq!(g.total_rating, Some(9.0));
    }

    #[test]
    fn malformed_row_is_skipped_without_losing_others() {
        let text = "物件名稱,地址,總價(萬),權狀坪數,備註\n\
                    A,路一,1000,50,ok\n\
                    B,路二,900\n\
                    C,路三,800,40,fine";
        let mut ids = IdAllocator::new();
        let outcome = import_csv(text, &mut ids, Local::now()).unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(
            outcome.skipped,
            vec![SkippedRow { line: 3, expected: 5, found: 3 }]
        );
        assert_eq!(outcome.records[0].title(), "A");
        assert_eq!(outcome.records[1].title(), "C");
        assert_ne!(outcome.records[0].id, outcome.records[1].id);
        assert!(!outcome.records[0].timestamp.is_empty());
    }

    #[test]
    fn category_is_inferred_without_a_category_column() {
        let text = "社區名稱,地址\nOak Gardens,路一\n,路二";
        let mut ids = IdAllocator::new();
        let records = import_csv(text, &mut ids, Local::now()).unwrap().records;
        assert_eq!(records[0].category(), Category::Community);
        assert_eq!(records[1].category(), Category::General);
    }

    #[test]
    fn cells_are_coerced_by_kind() {
        let text = "ID,物件類別,權狀坪數,屋齡,單坪價格(萬),採光,未知欄位\n\
                    abc,一般物件,四十,12,n/a,3,x";
        let mut ids = IdAllocator::new();
        let records = import_csv(text, &mut ids, Local::now()).unwrap().records;
        let FormData::General(g) = &records[0].form else {
            panic!("expected general record");
        };
        assert_eq!(g.total_ping, "");
        assert_eq!(g.building_age, "12");
        assert_eq!(g.unit_price, None);
        assert_eq!(g.rating_lighting, "3");
        assert!(records[0].id > 0);
    }

    #[test]
    fn oversized_id_is_replaced_and_later_ids_still_allocate() {
        let text = "ID,物件名稱\n9223372036854775807,A\n,B";
        let mut ids = IdAllocator::new();
        let records = import_csv(text, &mut ids, Local::now()).unwrap().records;
        assert_eq!(records.len(), 2);
        assert_ne!(records[0].id, i64::MAX);
        assert!(records[1].id > records[0].id);
        assert!(ids.next() > records[1].id);
    }

    #[test]
    fn huge_rating_does_not_break_recompute() {
        let text = "物件類別,採光,交通\n一般物件,4294967295,1";
        let mut ids = IdAllocator::new();
        let mut records = import_csv(text, &mut ids, Local::now()).unwrap().records;
        records[0].recompute_derived();
        let FormData::General(g) = &records[0].form else {
            panic!("expected general record");
        };
        assert_eq!(g.rating_lighting, "4294967295");
        assert_eq!(g.total_rating, Some(1.0));
    }

    #[test]
    fn numeric_text_is_kept_byte_for_byte() {
        let original = Record {
            id: 3,
            timestamp: "2025/01/01 00:00:00".into(),
            form: FormData::General(GeneralProperty {
                total_ping: " 40 ".into(),
                total_amount: "2000".into(),
                ..Default::default()
            }),
        };
        let text = crate::spreadsheets::export_csv::csv_text(&[original]);
        let mut ids = IdAllocator::new();
        let records = import_csv(&text, &mut ids, Local::now()).unwrap().records;
        let FormData::General(g) = &records[0].form else {
            panic!("expected general record");
        };
        assert_eq!(g.total_ping, " 40 ");
        assert_eq!(g.unit_price, Some(50.0));
    }

    #[test]
    fn empty_file_fails_whole_import() {
        let mut ids = IdAllocator::new();
        assert!(matches!(
            import_csv("\u{feff}\n\n", &mut ids, Local::now()),
            Err(ImportError::Codec(_))
        ));
    }
}
