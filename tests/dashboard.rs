//! End-to-end checks through the public API: load a survey file from disk,
//! normalize headers, summarize, correlate, and route a full view.

use std::io::Write;
use std::path::PathBuf;

use eatery_dash::data::error::DataError;
use eatery_dash::data::loader::{load_file, TableCache};
use eatery_dash::data::stats;
use eatery_dash::data::view::{self, Payload, ViewKind};

fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn load_summarize_correlate() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "survey.csv",
        "Staff per Shift,Daily Customers\n2,10\n4,20\n6,30\n",
    );

    let table = load_file(&path).unwrap();
    assert_eq!(
        table.column_names(),
        vec!["Staff_per_Shift", "Daily_Customers"]
    );

    let summary = stats::five_number_summary(&table, "Staff_per_Shift").unwrap();
    assert_eq!(
        (summary.min, summary.q1, summary.median, summary.q3, summary.max),
        (2.0, 3.0, 4.0, 5.0, 6.0)
    );

    // staff and customers are perfectly correlated in this fixture
    let matrix = stats::correlation(&table);
    assert_eq!(matrix.columns, vec!["Staff_per_Shift", "Daily_Customers"]);
    for i in 0..2 {
        for j in 0..2 {
            assert!((matrix.get(i, j).unwrap() - 1.0).abs() < 1e-12);
        }
    }
}

#[test]
fn view_request_interface() {
    assert!(matches!(
        ViewKind::from_name("Nonexistent"),
        Err(DataError::UnknownView(_))
    ));

    // every declared view resolves its own identifier
    for view in ViewKind::ALL {
        assert_eq!(ViewKind::from_name(view.name()).unwrap(), view);
    }

    // empty request falls back to the full default set
    let defaults = view::resolve(ViewKind::FactorsComparison, &[]);
    assert_eq!(defaults.len(), ViewKind::FactorsComparison.routes().len());
}

#[test]
fn operational_scale_view_runs_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        &dir,
        "survey.csv",
        "Opening Hours,Staff per Shift,Peak Hours,Day Influence,Occasion Impact\n\
         8-12 hours,2,\"Lunch, Dinner\",Fridays=Spike in sales,Eid\n\
         12-16 hours,4,Dinner,Weekends=Higher footfall,\"Eid, Ramadan\"\n\
         8-12 hours,6,Lunch,Fridays=Spike in sales,Weddings\n",
    );

    let mut cache = TableCache::new();
    let table = cache.get_or_load(&path).unwrap();
    let payloads = view::view_payloads(&table, ViewKind::OperationalScale, &[]).unwrap();
    assert_eq!(payloads.len(), 5);

    // Peak_Hours is exploded on ',' -> Dinner appears twice, Lunch twice
    let peak = payloads
        .iter()
        .find_map(|p| match p {
            Payload::Frequency { column, counts, .. } if column == "Peak_Hours" => Some(counts),
            _ => None,
        })
        .unwrap();
    let total: u64 = peak.iter().map(|(_, c)| c).sum();
    assert_eq!(total, 4);
    assert!(peak.contains(&("Dinner".to_string(), 2)));
    assert!(peak.contains(&("Lunch".to_string(), 2)));

    // Day_Influence uses the '=' prefix override: the day keys are counted,
    // the answer halves never appear
    let day = payloads
        .iter()
        .find_map(|p| match p {
            Payload::Frequency { column, counts, .. } if column == "Day_Influence" => Some(counts),
            _ => None,
        })
        .unwrap();
    assert_eq!(
        day,
        &vec![("Fridays".to_string(), 2), ("Weekends".to_string(), 1)]
    );
    let day_total: u64 = day.iter().map(|(_, c)| c).sum();
    assert_eq!(day_total as usize, table.len());

    // a requested subset keeps only (and orders by) the request
    let subset = view::view_payloads(
        &table,
        ViewKind::OperationalScale,
        &["Staff_per_Shift".to_string(), "Opening_Hours".to_string()],
    )
    .unwrap();
    assert_eq!(subset.len(), 2);
    assert!(matches!(&subset[0], Payload::Distribution { column, .. } if column == "Staff_per_Shift"));
    assert!(matches!(&subset[1], Payload::Frequency { column, .. } if column == "Opening_Hours"));
}

#[test]
fn missing_route_column_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(&dir, "tiny.csv", "Unrelated\nvalue\n");
    let table = load_file(&path).unwrap();

    let err = view::view_payloads(&table, ViewKind::WasteManagement, &[]).unwrap_err();
    assert!(matches!(err, DataError::UnknownColumn(_)));
}
