use chrono::{NaiveDate, TimeZone, Utc};
use std::cmp::Ordering;
use supportctl::dates::{
    compare_timestamps, date_range, format_date, format_date_time, format_time, parse_timestamp,
    relative_time_at, smart_date_on, DateRange, Period,
};
use supportctl::text::{file_extension, format_file_size, process_chat_text};

#[test]
fn test_response_block_wins() {
    let raw = "<thinking>look up cumin</thinking><response>\n  We have cumin in stock.  \n</response>";
    assert_eq!(process_chat_text(raw), "We have cumin in stock.");
}

#[test]
fn test_thinking_blocks_are_stripped() {
    let raw = "<thinking>internal\nnotes</thinking>Sure, here you go.";
    assert_eq!(process_chat_text(raw), "Sure, here you go.");
}

#[test]
fn test_escapes_are_decoded() {
    assert_eq!(process_chat_text(r"Line one\nLine two"), "Line one\nLine two");
    assert_eq!(process_chat_text(r#"Say \"hi\""#), "Say \"hi\"");
    assert_eq!(process_chat_text(r"caf\u00e9"), "café");
    assert_eq!(process_chat_text(r"C:\\new"), r"C:\new");
    assert_eq!(process_chat_text(""), "");
    assert_eq!(process_chat_text("plain"), "plain");
}

#[test]
fn test_file_helpers() {
    assert_eq!(file_extension("cid-1/docs/FAQ.PDF"), "pdf");
    assert_eq!(file_extension("archive.tar.gz"), "gz");
    assert_eq!(file_extension("v1.2/README"), "");

    assert_eq!(format_file_size(0), "0 Bytes");
    assert_eq!(format_file_size(512), "512 Bytes");
    assert_eq!(format_file_size(1536), "1.5 KB");
    assert_eq!(format_file_size(2 * 1024 * 1024), "2 MB");
    assert_eq!(format_file_size(1_288_490_189), "1.2 GB");
}

#[test]
fn test_parse_accepts_common_server_formats() {
    assert!(parse_timestamp("2024-01-01T10:00:00Z").is_some());
    assert!(parse_timestamp("2024-01-01T10:00:00.123456").is_some());
    assert!(parse_timestamp("2024-01-01 10:00:00").is_some());
    assert!(parse_timestamp("2024-01-01").is_some());
    assert!(parse_timestamp("yesterday").is_none());
    assert!(parse_timestamp("").is_none());
}

#[test]
fn test_compare_uses_instants() {
    assert_eq!(
        compare_timestamps("2024-01-01T12:00:00+02:00", "2024-01-01T11:00:00Z"),
        Ordering::Less
    );
    assert_eq!(
        compare_timestamps("2024-01-01T10:00:00Z", "2024-01-01T10:00:00"),
        Ordering::Equal
    );
}

#[test]
fn test_formatting() {
    assert_eq!(format_date("2024-03-05T14:07:00Z"), "Mar 05, 2024");
    assert_eq!(format_time("2024-03-05T14:07:00Z"), "14:07");
    assert_eq!(format_date_time("2024-03-05T14:07:00Z"), "Mar 05, 2024 14:07");
    assert_eq!(format_date("not a date"), "");
}

#[test]
fn test_smart_date() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    assert_eq!(smart_date_on("2024-03-05T08:00:00Z", today), "Today");
    assert_eq!(smart_date_on("2024-03-04T23:00:00Z", today), "Yesterday");
    assert_eq!(smart_date_on("2024-02-29T08:00:00Z", today), "Feb 29, 2024");
}

#[test]
fn test_relative_time() {
    let now = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
    assert_eq!(relative_time_at("2024-03-05T11:59:30Z", now), "less than a minute ago");
    assert_eq!(relative_time_at("2024-03-05T11:59:00Z", now), "1 minute ago");
    assert_eq!(relative_time_at("2024-03-05T09:00:00Z", now), "3 hours ago");
    assert_eq!(relative_time_at("2024-03-07T12:00:00Z", now), "in 2 days");
    assert_eq!(relative_time_at("2023-12-01T12:00:00Z", now), "3 months ago");
    assert_eq!(relative_time_at("2022-01-01T12:00:00Z", now), "2 years ago");
}

#[test]
fn test_date_ranges() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let range = |start: &str, end: &str| DateRange {
        start: start.to_string(),
        end: end.to_string(),
    };

    assert_eq!(date_range(Period::Today, today), range("2024-03-05", "2024-03-05"));
    assert_eq!(date_range(Period::Yesterday, today), range("2024-03-04", "2024-03-04"));
    assert_eq!(date_range(Period::Week, today), range("2024-02-27", "2024-03-05"));
    assert_eq!(date_range(Period::Month, today), range("2024-02-04", "2024-03-05"));

    assert_eq!("WEEK".parse::<Period>().unwrap(), Period::Week);
    assert!("fortnight".parse::<Period>().is_err());
}
