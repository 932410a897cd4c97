// Tests for the sheet boundary: cell conversion and the SQLite sheet.
// Run with: cargo test --lib store::tests

#[cfg(test)]
mod conversion_tests {
    use crate::schedule::{generate_month, EpisodeId, EpisodeStatus, PublishDate};
    use crate::store::{
        episode_from_record, episodes_from_records, normalize_columns, table_from_episodes,
        Record, SheetTable, COL_SCRIPT, SHEET_COLUMNS, SHEET_COL_SCRIPT,
    };
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 15).unwrap()
    }

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("record must be an object"),
        }
    }

    #[test]
    fn test_record_with_prefixed_id() {
        let r = record(json!({
            "No": "#48",
            "公開予定日": "12/2",
            "曜日": "月",
            "タイトル": "猫の話",
            "ステータス": "撮影済",
            "台本メモ": "赤：にゃー",
        }));
        let e = episode_from_record(&r, today());
        assert_eq!(e.id, EpisodeId::Canonical(48));
        assert_eq!(e.date, PublishDate::Day(NaiveDate::from_ymd_opt(2024, 12, 2).unwrap()));
        assert_eq!(e.title, "猫の話");
        assert_eq!(e.status, EpisodeStatus::Filmed);
        assert_eq!(e.script, "赤：にゃー");
    }

    #[test]
    fn test_record_with_numeric_id_and_sheet_script_name() {
        let r = normalize_columns(record(json!({
            "No": 3,
            "公開予定日": "1/6",
            "台本": "青：やあ",
        })));
        assert!(r.contains_key(COL_SCRIPT));
        assert!(!r.contains_key(SHEET_COL_SCRIPT));

        let e = episode_from_record(&r, today());
        assert_eq!(e.id, EpisodeId::Bare(3));
        assert_eq!(e.date.day(), NaiveDate::from_ymd_opt(2025, 1, 6));
        assert_eq!(e.title, "");
        assert_eq!(e.status, EpisodeStatus::Unstarted);
        assert_eq!(e.script, "青：やあ");
    }

    #[test]
    fn test_internal_script_name_wins_over_sheet_name() {
        let r = normalize_columns(record(json!({
            "台本": "old",
            "台本メモ": "new",
        })));
        assert_eq!(r.get(COL_SCRIPT), Some(&json!("new")));
    }

    #[test]
    fn test_whole_float_id_is_bare() {
        let e = episode_from_record(&record(json!({ "No": 48.0 })), today());
        assert_eq!(e.id, EpisodeId::Bare(48));
        assert_eq!(e.id.value(), 48);

        let e = episode_from_record(&record(json!({ "No": 48.5 })), today());
        assert_eq!(e.id, EpisodeId::Malformed("48.5".to_string()));
    }

    #[test]
    fn test_malformed_cells_fall_back() {
        let r = record(json!({
            "No": -4,
            "公開予定日": "そのうち",
            "曜日": "?",
            "タイトル": 12.5,
            "ステータス": "完了",
        }));
        let e = episode_from_record(&r, today());
        assert_eq!(e.id, EpisodeId::Malformed("-4".to_string()));
        assert_eq!(e.date.day(), None);
        assert_eq!(e.weekday_label(), "?");
        assert_eq!(e.title, "12.5");
        assert_eq!(e.status, EpisodeStatus::Unstarted);
        assert_eq!(e.script, "");
    }

    #[test]
    fn test_table_uses_fixed_column_order() {
        let mut episodes = generate_month(2024, 12, 48);
        episodes.truncate(1);
        episodes[0].title = "初回".to_string();
        episodes[0].script = "赤：やあ".to_string();

        let table = table_from_episodes(&episodes);
        assert_eq!(table.header, SHEET_COLUMNS.map(String::from).to_vec());
        assert_eq!(table.header[5], "台本");
        assert_eq!(
            table.rows[0],
            vec![
                json!("#48"),
                json!("12/2"),
                json!("月"),
                json!("初回"),
                json!("未"),
                json!("赤：やあ"),
            ]
        );
    }

    #[test]
    fn test_bare_id_written_as_number() {
        let mut episodes = generate_month(2024, 12, 1);
        episodes.truncate(1);
        episodes[0].id = EpisodeId::Bare(7);
        let table = table_from_episodes(&episodes);
        assert_eq!(table.rows[0][0], json!(7));
    }

    #[test]
    fn test_table_round_trips_through_records() {
        let episodes = generate_month(2025, 1, 62);
        let table = table_from_episodes(&episodes);
        let back = episodes_from_records(table.records(), today());
        assert_eq!(back, episodes);
    }

    #[test]
    fn test_short_rows_padded() {
        let table = SheetTable {
            header: vec!["No".into(), "タイトル".into()],
            rows: vec![vec![json!("#1")]],
        };
        let records = table.records();
        assert_eq!(records[0].get("タイトル"), Some(&json!("")));
    }
}

#[cfg(test)]
mod sqlite_tests {
    use crate::schedule::generate_month;
    use crate::store::{table_from_episodes, SheetStore, SheetTable, SqliteSheet};
    use serde_json::json;
    use tempfile::TempDir;

    fn setup_test_sheet() -> (SqliteSheet, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("sheet.db");
        let sheet = SqliteSheet::new(&db_path).unwrap();
        (sheet, temp_dir)
    }

    #[test]
    fn test_empty_sheet_loads_none() {
        let (sheet, _temp) = setup_test_sheet();
        assert!(sheet.load().unwrap().is_none());
        assert!(sheet.read_table().unwrap().is_none());
        assert!(sheet.last_saved().unwrap().is_none());
    }

    #[test]
    fn test_header_only_sheet_loads_none() {
        let (mut sheet, _temp) = setup_test_sheet();
        sheet
            .save(&SheetTable {
                header: vec!["No".into()],
                rows: Vec::new(),
            })
            .unwrap();
        assert!(sheet.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_preserves_cells() {
        let (mut sheet, _temp) = setup_test_sheet();
        let table = table_from_episodes(&generate_month(2024, 12, 48));
        sheet.save(&table).unwrap();

        assert_eq!(sheet.read_table().unwrap(), Some(table.clone()));
        let records = sheet.load().unwrap().unwrap();
        assert_eq!(records.len(), 22);
        assert_eq!(records[0].get("No"), Some(&json!("#48")));
        assert_eq!(records[0].get("台本"), Some(&json!("")));
        assert!(sheet.last_saved().unwrap().is_some());
    }

    #[test]
    fn test_save_replaces_whole_sheet() {
        let (mut sheet, _temp) = setup_test_sheet();
        sheet
            .save(&table_from_episodes(&generate_month(2024, 12, 48)))
            .unwrap();

        let smaller = SheetTable {
            header: vec!["No".into(), "タイトル".into()],
            rows: vec![vec![json!(1), json!("only")]],
        };
        sheet.save(&smaller).unwrap();

        assert_eq!(sheet.read_table().unwrap(), Some(smaller));
    }

    #[test]
    fn test_numbers_and_strings_keep_their_type() {
        let (mut sheet, _temp) = setup_test_sheet();
        let table = SheetTable {
            header: vec!["No".into()],
            rows: vec![vec![json!(5)], vec![json!("5")], vec![json!(null)]],
        };
        sheet.save(&table).unwrap();
        let loaded = sheet.read_table().unwrap().unwrap();
        assert_eq!(loaded.rows, table.rows);
    }

    #[test]
    fn test_sheet_persists_across_connections() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("sheet.db");
        let table = table_from_episodes(&generate_month(2025, 2, 93));
        {
            let mut sheet = SqliteSheet::new(&db_path).unwrap();
            sheet.save(&table).unwrap();
        }
        let reopened = SqliteSheet::new(&db_path).unwrap();
        assert_eq!(reopened.read_table().unwrap(), Some(table));
    }

    #[test]
    fn test_unicode_and_multiline_cells() {
        let (mut sheet, _temp) = setup_test_sheet();
        let table = SheetTable {
            header: vec!["台本".into()],
            rows: vec![vec![json!("赤：「こんにちは！」\n\n青：\"quoted\" 🎬")]],
        };
        sheet.save(&table).unwrap();
        assert_eq!(sheet.read_table().unwrap(), Some(table));
    }
}
