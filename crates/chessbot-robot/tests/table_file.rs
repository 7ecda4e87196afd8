use chessbot_robot::{PlacementError, PlacementParams, PlacementTable, DEFAULT_HOME};
use std::io::Write;

fn full_table() -> String {
    let mut csv = String::from("Col,Row,Pick,Place\n");
    for (fi, file) in "abcdefgh".chars().enumerate() {
        for rank in 1..=8 {
            let x = 0.20 + 0.05 * fi as f32;
            let y = -0.175 + 0.05 * (rank - 1) as f32;
            csv.push_str(&format!(
                "{file},{rank},[{x:.3}; {y:.3}; 0.020],[{x:.3}; {y:.3}; 0.035]\n"
            ));
        }
    }
    csv
}

#[test]
fn loads_full_table_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(full_table().as_bytes()).unwrap();

    let table = PlacementTable::from_csv_path(file.path()).unwrap();
    assert_eq!(table.len(), 64);
    assert_eq!(table.home(), DEFAULT_HOME);

    let plan = table.plan_uci("e2e4").unwrap();
    assert_eq!(plan.mv.to_string(), "e2e4");
    assert_eq!(plan.pick(), "[0.400; -0.125; 0.020]");
    assert_eq!(plan.place(), "[0.400; -0.025; 0.035]");
    assert_eq!(plan.waypoints[0], plan.waypoints[1]);
    assert_eq!(plan.waypoints[3], plan.waypoints[4]);
    assert_eq!(plan.waypoints[2], DEFAULT_HOME);
    assert_eq!(plan.waypoints[5], DEFAULT_HOME);
}

#[test]
fn promotion_suffix_is_ignored_for_lookup() {
    let table = PlacementTable::from_reader(full_table().as_bytes()).unwrap();
    let plan = table.plan_uci("a7a8q").unwrap();
    assert_eq!(plan.mv.promotion, Some('q'));
    assert!(plan.place().ends_with("0.035]"));
}

#[test]
fn missing_file_is_table_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = PlacementTable::from_csv_path(dir.path().join("placement.csv")).unwrap_err();
    assert!(matches!(err, PlacementError::TableNotFound { .. }));
}

#[test]
fn params_select_table_and_home() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(full_table().as_bytes()).unwrap();

    assert!(PlacementTable::from_params(&PlacementParams::default())
        .unwrap()
        .is_none());

    let params: PlacementParams = serde_json::from_value(serde_json::json!({
        "table": file.path(),
        "home": "[0.5; 0; 0.5]",
    }))
    .unwrap();
    let table = PlacementTable::from_params(&params).unwrap().unwrap();
    assert_eq!(table.plan_uci("b1c3").unwrap().home(), "[0.5; 0; 0.5]");
}
