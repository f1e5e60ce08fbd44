use std::sync::Arc;

use EventLens::config::DashboardConfig;
use EventLens::dashboard::{locate_row, Dashboard};
use EventLens::data_model::{EventType, FilterState, ProcessedEvent, SortColumn};
use EventLens::loader::parse_dataset;
use EventLens::pipeline::writers::{BaseWriter, CsvWriter};

const HEADER: &str =
    "Date,first_event_date,Type,title,description,Event name,event_locations,avg_goldstein_score,SOURCEURL";

// Helper to build a dashboard straight from CSV body lines
fn dashboard_from(lines: &[&str]) -> Dashboard {
    let csv = format!("{}\n{}\n", HEADER, lines.join("\n"));
    let config = DashboardConfig::default();
    let dataset = parse_dataset(&csv, &config).expect("CSV should parse");
    Dashboard::new(dataset, Arc::new(config))
}

fn ids(events: &[ProcessedEvent]) -> Vec<usize> {
    events.iter().map(|e| e.row_id).collect()
}

#[test]
fn test_port_deal_scenario() {
    let dashboard = dashboard_from(&[
        "2025-06-01,2025-06-01,ECON,Port deal,,,GH|NI,4.2,https://a.example",
        "2025-06-05,2025-06-05,SEC,N/A,,,GH,,https://b.example",
    ]);
    let state = FilterState::new();
    let view = dashboard.view(&state);

    // The placeholder title drops row 2 from every view.
    assert_eq!(ids(&view.events), vec![0]);
    assert_eq!(view.timeline.len(), 1);

    assert_eq!(view.type_counts.get(EventType::Econ), 1);
    assert_eq!(view.type_counts.get(EventType::Sec), 0);
    assert_eq!(view.type_counts.get(EventType::Dip), 0);
    assert_eq!(view.type_counts.get(EventType::Info), 0);

    assert_eq!(view.locations.len(), 2);
    for stats in &view.locations {
        assert!(stats.location == "GH" || stats.location == "NI");
        assert_eq!(stats.total, 1);
        assert_eq!(stats.count(EventType::Econ), 1);
        assert_eq!(stats.avg_goldstein, 4.2);
    }

    assert_eq!(ids(&dashboard.displayed(&state.with_search("port"))), vec![0]);
    let none = dashboard.view(&state.with_search("xyz"));
    assert!(none.is_empty());
    assert_eq!(none.type_counts.total(), 1);
}

#[test]
fn test_week_bucketing_selects_same_week() {
    // 2025-06-10 is a Tuesday and 2025-06-12 the Thursday after; the week starts Sunday 2025-06-08.
    let dashboard = dashboard_from(&[
        "2025-06-10,2025-06-10,ECON,Tuesday event,,,GH,,",
        "2025-06-12,2025-06-12,SEC,Thursday event,,,GH,,",
        "2025-06-15,2025-06-15,DIP,Next week,,,GH,,",
        "2025-06-14,not a date,INFO,Bad first date,,,GH,,",
    ]);
    let state = FilterState::new().toggle_week("2025-06-08");
    assert_eq!(ids(&dashboard.displayed(&state)), vec![0, 1]);

    // Selecting the same week again clears it.
    let cleared = state.toggle_week("2025-06-08");
    assert_eq!(dashboard.displayed(&cleared).len(), 4);
}

#[test]
fn test_zero_scores_are_excluded_from_average() {
    let dashboard = dashboard_from(&[
        "2025-06-01,2025-06-01,ECON,A,,,GH,0,",
        "2025-06-01,2025-06-01,ECON,B,,,GH,3,",
        "2025-06-01,2025-06-01,SEC,C,,,GH,-3,",
        "2025-06-01,2025-06-01,SEC,D,,,ML,,",
        "2025-06-01,2025-06-01,DIP,E,,,ML,n/a,",
    ]);
    let locations = dashboard.locations(&FilterState::new());
    let gh = locations.iter().find(|l| l.location == "GH").unwrap();
    let ml = locations.iter().find(|l| l.location == "ML").unwrap();
    assert_eq!(gh.total, 3);
    assert_eq!(gh.avg_goldstein, 0.0);
    assert_eq!(ml.total, 2);
    assert_eq!(ml.avg_goldstein, 0.0);
}

#[test]
fn test_country_filter_is_exact_element_match() {
    let dashboard = dashboard_from(&[
        "2025-06-01,2025-06-01,ECON,Exports,,,INFO|US,,",
        "2025-06-01,2025-06-01,ECON,Trade,,,IN,,",
    ]);
    let state = FilterState::new().toggle_country("IN");
    assert_eq!(ids(&dashboard.displayed(&state)), vec![1]);
}

#[test]
fn test_location_totals_match_membership_for_every_filter() {
    let dashboard = dashboard_from(&[
        "2025-06-01,2025-06-01,ECON,A,,,GH|NI,1,",
        "2025-06-02,2025-06-02,SEC,B,,,NI,2,",
        "2025-06-03,2025-06-03,OTHER,C,,,NI|ML,3,",
        "2025-06-09,2025-06-09,DIP,D,,,ML,,",
        "2025-06-10,2025-06-10,INFO,,,,GH,,",
    ]);
    let states = [
        FilterState::new(),
        FilterState::new().toggle_type("ECON"),
        FilterState::new().toggle_country("NI"),
        FilterState::new().toggle_week("2025-06-08"),
        FilterState::new().toggle_type("OTHER").toggle_country("ML"),
    ];
    for state in &states {
        let filtered = dashboard.cross_filtered(state);
        let histogram = dashboard.type_counts(state);
        assert!(histogram.total() <= filtered.len());

        for stats in dashboard.locations(state) {
            assert_eq!(stats.total, stats.counts.total());
            let known_members = filtered
                .iter()
                .filter(|e| e.locations.contains(&stats.location) && e.known_type().is_some())
                .count();
            assert_eq!(stats.total, known_members);
        }

        // Filtering keeps input order.
        let filtered_ids = ids(&filtered);
        let mut sorted = filtered_ids.clone();
        sorted.sort_unstable();
        assert_eq!(filtered_ids, sorted);
    }
}

#[test]
fn test_sort_stability_and_highlight_lookup() {
    let dashboard = dashboard_from(&[
        "2025-06-02,2025-06-02,ECON,Same day one,,,GH,,",
        "2025-06-01,2025-06-01,SEC,Earlier,,,GH,,",
        "2025-06-02,2025-06-02,DIP,Same day two,,,GH,,",
        "garbage,2025-06-03,INFO,Undated,,,GH,,",
    ]);
    let asc = FilterState::new().sort_by(SortColumn::Date);
    assert_eq!(ids(&dashboard.displayed(&asc)), vec![3, 1, 0, 2]);

    let desc = asc.sort_by(SortColumn::Date);
    let displayed = dashboard.displayed(&desc);
    assert_eq!(ids(&displayed), vec![0, 2, 1, 3]);

    let point = &dashboard.timeline(&desc)[1];
    assert_eq!(locate_row(&displayed, point.row_id), Some(2));
}

#[test]
fn test_export_round_trips_displayed_rows() {
    let dashboard = dashboard_from(&[
        "2025-06-01,2025-06-01,ECON,\"Port deal, phase 2\",,,GH|NI,4.2,https://a.example",
        "2025-06-02,2025-06-02,SEC,Border,,,NI,,https://b.example",
    ]);
    let state = FilterState::new().toggle_country("GH");
    let rows = dashboard.export_rows(&state);

    let mut writer = CsvWriter::from_writer(Vec::new(), dashboard.export_headers()).unwrap();
    writer.write_rows(&rows).unwrap();
    let bytes = writer.into_inner().unwrap();
    let text = String::from_utf8(bytes).unwrap();

    let reloaded = parse_dataset(&text, &DashboardConfig::default()).unwrap();
    assert_eq!(reloaded.len(), 1);
    let event = &reloaded.events()[0].event;
    assert_eq!(event.title, "Port deal, phase 2");
    assert_eq!(event.source_url, "https://a.example");
    assert_eq!(event.goldstein_score, "4.2");
}
