use std::env;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use stop_frequency::feed::{ArchiveSource, Feed, FeedSource};
use stop_frequency::output::write_results;
use stop_frequency::params::RunParameters;
use stop_frequency::pipeline::{CountStrategy, FrequencyReport, Tier};
use stop_frequency::render::render_map;
use stop_frequency::stats::RunSummary;
use stop_frequency::{FrequencyError, compute_frequencies};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample_feed")
}

fn sample_feed() -> Feed {
    Feed::load(&FeedSource::Directory(fixture_dir())).expect("Failed to load fixture feed")
}

fn run(feed: &Feed, date: &str, start: &str, end: &str) -> FrequencyReport {
    let params = RunParameters::parse(date, start, end).unwrap();
    feed.compute(&params, CountStrategy::Sequential)
}

fn count(report: &FrequencyReport, stop_id: &str) -> usize {
    report.result.get(stop_id).unwrap().count
}

#[test]
fn test_fixture_tables_loaded() {
    let feed = sample_feed();
    assert_eq!(feed.trips.len(), 7);
    assert_eq!(feed.stop_visits.len(), 16);
    assert_eq!(feed.stops.len(), 5);
    assert_eq!(feed.weekly_patterns.as_ref().unwrap().len(), 3);
    assert_eq!(feed.exceptions.as_ref().unwrap().len(), 2);
    assert!(feed.has_frequencies);
}

#[test]
fn test_friday_daytime_window() {
    let feed = sample_feed();
    let report = run(&feed, "2023-10-13", "06:00:00", "21:00:00");

    assert_eq!(report.active_services, 1);
    assert_eq!(report.eligible_trips, 3);
    assert_eq!(report.visits_counted, 6);
    assert_eq!(count(&report, "S1"), 2);
    assert_eq!(count(&report, "S2"), 2);
    assert_eq!(count(&report, "S3"), 1);
    assert_eq!(count(&report, "S4"), 1);
    assert_eq!(count(&report, "N1"), 0);
    assert_eq!(report.result.get("N1").unwrap().tier, Tier::Black);
    assert_eq!(report.result.tier_count(Tier::DarkRed), 4);
}

#[test]
fn test_one_hour_window_excludes_end() {
    let feed = sample_feed();
    let report = run(&feed, "20231013", "06:00:00", "07:00:00");

    assert_eq!(count(&report, "S1"), 1);
    let s1 = report.result.get("S1").unwrap();
    assert_eq!(s1.frequency, 1.0);
    assert_eq!(s1.tier, Tier::Red);
    assert_eq!(report.result.get("S4").unwrap().tier, Tier::Black);
}

#[test]
fn test_late_night_window_belongs_to_service_day() {
    let feed = sample_feed();
    let report = run(&feed, "2023-10-13", "24:00:00", "27:00:00");

    assert_eq!(count(&report, "S1"), 1);
    assert_eq!(count(&report, "S2"), 1);
    assert_eq!(count(&report, "S3"), 1);
    assert_eq!(count(&report, "S4"), 0);
}

#[test]
fn test_holiday_exceptions() {
    let feed = sample_feed();
    let report = run(&feed, "2023-12-25", "06:00:00", "21:00:00");

    assert_eq!(report.active_services, 1);
    assert_eq!(count(&report, "S1"), 0);
    assert_eq!(count(&report, "S4"), 1);
}

#[test]
fn test_saturday_and_out_of_range_service() {
    let feed = sample_feed();
    let saturday = run(&feed, "2023-10-14", "00:00:00", "30:00:00");
    assert_eq!(saturday.visits_counted, 2);

    // Only OLD runs on Fridays in 2022, and the GHOST trip never runs.
    let old = run(&feed, "2022-10-14", "00:00:00", "30:00:00");
    assert_eq!(old.active_services, 1);
    assert_eq!(count(&old, "S1"), 1);
    assert_eq!(old.visits_counted, 1);
}

#[test]
fn test_parallel_counting_matches() {
    let feed = sample_feed();
    let params = RunParameters::parse("2023-10-13", "00:00:00", "30:00:00").unwrap();
    let sequential = feed.compute(&params, CountStrategy::Sequential);
    let parallel = feed.compute(&params, CountStrategy::Parallel);

    assert_eq!(sequential.result, parallel.result);
    let total: usize = sequential.result.iter().map(|(_, s)| s.count).sum();
    assert_eq!(total, sequential.visits_counted);
    assert_eq!(total, 10);
}

#[test]
fn test_compute_frequencies_entry_point() {
    let feed = sample_feed();
    let params = RunParameters::parse("2023-10-13", "06:00:00", "21:00:00").unwrap();
    let result = compute_frequencies(
        params.date,
        &params.window,
        &feed.trips,
        &feed.stop_visits,
        &feed.stops,
        feed.weekly_patterns.as_deref(),
        feed.exceptions.as_deref(),
    );
    assert_eq!(result, run(&feed, "2023-10-13", "06:00:00", "21:00:00").result);
}

#[test]
fn test_zipped_feed_matches_directory() {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for entry in fs::read_dir(fixture_dir()).unwrap() {
        let path = entry.unwrap().path();
        let name = format!(
            "sample_feed/{}",
            path.file_name().unwrap().to_str().unwrap()
        );
        zip.start_file(name, zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(&fs::read(&path).unwrap()).unwrap();
    }
    let bytes = zip.finish().unwrap().into_inner();

    let zip_path = env::temp_dir().join("stop_frequency_test_sample_feed.zip");
    fs::write(&zip_path, &bytes).unwrap();
    assert_eq!(
        FeedSource::from_arg(zip_path.to_str().unwrap()),
        FeedSource::Archive(zip_path.clone())
    );
    let from_zip = Feed::load(&FeedSource::Archive(zip_path.clone())).unwrap();
    fs::remove_file(&zip_path).unwrap();

    let mut in_memory = ArchiveSource::new(Cursor::new(bytes), "memory").unwrap();
    let from_memory = Feed::from_tables(&mut in_memory).unwrap();

    let expected = run(&sample_feed(), "2023-10-13", "06:00:00", "21:00:00").result;
    assert_eq!(run(&from_zip, "2023-10-13", "06:00:00", "21:00:00").result, expected);
    assert_eq!(run(&from_memory, "2023-10-13", "06:00:00", "21:00:00").result, expected);
}

#[test]
fn test_feed_without_calendars_is_all_black() {
    let dir = env::temp_dir().join("stop_frequency_test_no_calendars");
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    for table in ["trips.txt", "stop_times.txt", "stops.txt"] {
        fs::copy(fixture_dir().join(table), dir.join(table)).unwrap();
    }

    let feed = Feed::load(&FeedSource::Directory(dir.clone())).unwrap();
    let report = run(&feed, "2023-10-13", "06:00:00", "21:00:00");
    assert_eq!(report.active_services, 0);
    assert_eq!(report.result.tier_count(Tier::Black), 5);

    fs::remove_file(dir.join("stops.txt")).unwrap();
    let err = Feed::load(&FeedSource::Directory(dir.clone())).unwrap_err();
    assert_eq!(
        err.downcast_ref::<FrequencyError>(),
        Some(&FrequencyError::MissingTable("stops.txt"))
    );

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_outputs_written() {
    let feed = sample_feed();
    let params = RunParameters::parse("2023-10-13", "06:00:00", "21:00:00").unwrap();
    let report = feed.compute(&params, CountStrategy::Sequential);

    let dir = env::temp_dir().join("stop_frequency_test_outputs");
    let _ = fs::remove_dir_all(&dir);
    let map = dir.join("Output/map.html");
    let csv = dir.join("stops.csv");

    let drawn = render_map(&map, &feed, &report.result, &params).unwrap();
    assert_eq!(drawn, 4);
    write_results(&csv, &feed, &report.result).unwrap();
    let rows = fs::read_to_string(&csv).unwrap();
    assert_eq!(rows.lines().count(), 6);
    assert!(rows.contains("S1,Central Station,42.3601,-71.0589,2,"));

    let summary = RunSummary::from_report(&params, &feed, &report);
    assert_eq!(summary.dark_red, 4);
    assert_eq!(summary.black, 1);
    assert!(summary.has_frequencies);
    assert_eq!(summary.served_pct(), 80.0);

    fs::remove_dir_all(&dir).unwrap();
}
