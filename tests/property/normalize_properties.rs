use equipstat::{normalize, Differ, DiffStatus, RequiredColumns, Table, Value};
use proptest::prelude::*;

const HEADER: [&str; 5] = [" Equipment Name", "Type ", "Flowrate", " Pressure ", "Temperature"];

fn cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Missing),
        (-1.0e6f64..1.0e6).prop_map(Value::Number),
        "[0-9]{1,3}(\\.[0-9]{1,3})?".prop_map(Value::Text),
        "[a-z ]{0,4}".prop_map(Value::Text),
    ]
}

fn row() -> impl Strategy<Value = Vec<Value>> {
    (
        prop_oneof![
            " ?[A-D][0-9]? ?".prop_map(Value::Text),
            "0?[0-9](\\.0)?".prop_map(Value::Text),
            Just(Value::Missing),
        ],
        prop_oneof![Just("Pump"), Just("Valve"), Just("")].prop_map(Value::from),
        prop::collection::vec(cell(), 0..4),
    )
        .prop_map(|(name, kind, mut numbers)| {
            let mut cells = vec![name, kind];
            cells.append(&mut numbers);
            cells
        })
}

fn table() -> impl Strategy<Value = Table> {
    prop::collection::vec(row(), 0..20).prop_map(|rows| {
        Table::new(HEADER.iter().map(|h| h.to_string()).collect(), rows)
    })
}

proptest! {
    #[test]
    fn normalize_is_idempotent(t in table()) {
        let columns = RequiredColumns::default();
        let once = normalize(&t, &columns);
        let twice = normalize(&once, &columns);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalized_rows_match_header_width(t in table()) {
        let norm = normalize(&t, &RequiredColumns::default());
        prop_assert_eq!(norm.len(), t.len());
        for r in &norm.rows {
            prop_assert_eq!(r.len(), norm.columns.len());
        }
    }

    #[test]
    fn report_rows_match_summary(a in table(), b in table()) {
        let report = Differ::default().diff(&a, &b).unwrap();
        prop_assert_eq!(report.rows.len(), report.summary.total());

        let names: Vec<&str> = report.rows.iter().map(|r| r.equipment_name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(names, sorted);
    }

    #[test]
    fn self_diff_is_all_same(t in table()) {
        let report = Differ::default().diff(&t, &t).unwrap();
        prop_assert_eq!(report.summary.only_in_a, 0);
        prop_assert_eq!(report.summary.only_in_b, 0);
        prop_assert!(report.rows.iter().all(|r| r.status == DiffStatus::Same));
    }

    #[test]
    fn total_count_counts_every_row(t in table()) {
        let stats = equipstat::analyze(&t, None, None).unwrap();
        prop_assert_eq!(stats.total_count, t.len());
        prop_assert_eq!(stats.type_distribution.values().sum::<usize>(), t.len());
    }
}
