//! Simulation output flowing unchanged into the CSV export.

use mixsim_core::{catalog, overrides, SimulationInput};
use mixsim_engine::{simulate, summarize_by_channel};
use mixsim_reporting::{to_csv, SimulationReport};

const BENCHMARKS: &str = "Channel,CPM,CTR,CVR\n\
                          YouTube,12.0,0.015,0.08\n\
                          Instagram,8.0,0.012,0.04\n";

const PERSONAS: &str = "Segment,Message,Channel,Lift\n\
                        Tech Moms,Switch and Save,YouTube,1.3\n";

fn uploaded_input() -> SimulationInput {
    let mut lifts = catalog::lift_table();
    lifts.merge(overrides::parse_lift_csv(PERSONAS.as_bytes()).unwrap());
    let channels = catalog::channels();

    SimulationInput::new(
        &catalog::segments(),
        &catalog::messages(),
        &channels,
        catalog::DEFAULT_TOTAL_BUDGET,
    )
    .with_split(catalog::even_split(&channels))
    .with_lifts(lifts)
    .with_benchmarks(overrides::parse_benchmark_csv(BENCHMARKS.as_bytes()).unwrap())
}

#[test]
fn export_preserves_emission_order() {
    let results = simulate(&uploaded_input());
    let csv = String::from_utf8(to_csv(&results).unwrap()).unwrap();

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), results.len());

    for (record, result) in rows.iter().zip(&results) {
        assert_eq!(&record[0], result.segment);
        assert_eq!(&record[1], result.message);
        assert_eq!(&record[2], result.channel);
        assert_eq!(record[6].parse::<u64>().unwrap(), result.conversions);
    }
}

#[test]
fn export_row_for_uploaded_benchmark() {
    let results = simulate(&uploaded_input());
    let csv = String::from_utf8(to_csv(&results).unwrap()).unwrap();

    // 100 000 split three ways, YouTube at CPM 12, CTR 0.015, CVR 0.08, lift 1.3
    let first = csv.lines().nth(1).unwrap();
    assert_eq!(
        first,
        "Tech Moms,Switch and Save,YouTube,33333,2777777,41666,4333,7.69,13.00"
    );
}

#[test]
fn report_carries_rows_and_summary() {
    let input = uploaded_input();
    let results = simulate(&input);
    let summary = summarize_by_channel(&results);
    let report = SimulationReport::new(&input, results, summary);

    assert_eq!(report.results.len(), 27);
    assert_eq!(report.summary.len(), 3);
    assert_eq!(report.channels, catalog::channels());

    let json = report.to_json().unwrap();
    assert!(json.contains("\"run_id\""));
    assert!(json.contains("\"Podcast\""));
}
