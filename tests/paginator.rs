mod common;

use binapi::data::{fetch_many, page_plan};
use binapi::models::Interval;
use binapi::ErrorKind;
use common::{assert_strictly_ascending, FakeHistory, MINUTE_MS};

fn plan(limit: u32, cap: u32) -> Vec<u32> {
    page_plan(limit, cap).collect()
}

#[test]
fn plan_puts_partial_page_first() {
    assert_eq!(plan(4000, 1500), vec![1000, 1500, 1500]);
    assert_eq!(plan(3000, 1500), vec![1500, 1500]);
    assert_eq!(plan(1500, 1500), vec![1500]);
    assert_eq!(plan(7, 1500), vec![7]);
    assert!(plan(0, 1500).is_empty());
    assert!(plan(10, 0).is_empty());
}

#[test]
fn plan_for_huge_limit_is_lazy() {
    let mut pages = page_plan(u32::MAX, 1);
    assert_eq!(pages.size_hint(), (u32::MAX as usize, Some(u32::MAX as usize)));
    assert_eq!(pages.next(), Some(1));
    assert_eq!(pages.next(), Some(1));

    let mut pages = page_plan(u32::MAX, 1500);
    assert_eq!(pages.next(), Some(u32::MAX % 1500));
    assert_eq!(pages.size_hint().0, u32::MAX.div_ceil(1500) as usize - 1);
}

#[test]
fn large_request_is_split_into_pages() {
    let source = FakeHistory::new(1500, 5000);
    let series = fetch_many(&source, "BTCUSDT", Interval::Minute1, 4000, None).expect("fetch");

    assert_eq!(series.len(), 4000);
    assert_strictly_ascending(&series);
    assert_eq!(series.last().expect("last").open_time, source.latest());
    assert_eq!(
        series.first().expect("first").open_time,
        source.latest() - 3999 * MINUTE_MS
    );

    let calls = source.calls();
    let sizes: Vec<u32> = calls.iter().map(|(limit, _)| *limit).collect();
    assert_eq!(sizes, vec![1000, 1500, 1500]);
    assert_eq!(calls[0].1, None);
    assert_eq!(calls[1].1, Some(source.latest() - 999 * MINUTE_MS - 1));
}

#[test]
fn exact_multiple_of_cap_has_no_duplicates() {
    let source = FakeHistory::new(1500, 5000);
    let series = fetch_many(&source, "BTCUSDT", Interval::Minute1, 3000, None).expect("fetch");
    assert_eq!(source.calls().len(), 2);
    assert_eq!(series.len(), 3000);
    assert_strictly_ascending(&series);
}

#[test]
fn small_request_is_one_page_with_given_end_time() {
    let source = FakeHistory::new(1500, 5000);
    let end_time = source.latest() - 100 * MINUTE_MS;
    let series =
        fetch_many(&source, "BTCUSDT", Interval::Minute1, 1200, Some(end_time)).expect("fetch");
    assert_eq!(source.calls(), vec![(1200, Some(end_time))]);
    assert_eq!(series.len(), 1200);
    assert_eq!(series.last().expect("last").open_time, end_time);
}

#[test]
fn end_time_anchors_every_page() {
    let source = FakeHistory::new(100, 1000);
    let end_time = source.latest() - 500 * MINUTE_MS;
    let series =
        fetch_many(&source, "BTCUSDT", Interval::Minute1, 250, Some(end_time)).expect("fetch");
    assert_eq!(series.len(), 250);
    assert_eq!(series.last().expect("last").open_time, end_time);
    assert!(series.iter().all(|candle| candle.open_time <= end_time));
    assert_strictly_ascending(&series);
}

#[test]
fn short_history_returns_what_exists() {
    let source = FakeHistory::new(1500, 2000);
    let series = fetch_many(&source, "BTCUSDT", Interval::Minute1, 4000, None).expect("fetch");
    assert_eq!(series.len(), 2000);
    assert_strictly_ascending(&series);
    assert_eq!(source.calls().len(), 3);
}

#[test]
fn empty_history_stops_after_first_page() {
    let source = FakeHistory::new(1500, 0);
    let series = fetch_many(&source, "BTCUSDT", Interval::Minute1, 4000, None).expect("fetch");
    assert!(series.is_empty());
    assert_eq!(source.calls().len(), 1);
}

#[test]
fn zero_limit_makes_no_request() {
    let source = FakeHistory::new(1500, 10);
    let series = fetch_many(&source, "BTCUSDT", Interval::Minute1, 0, None).expect("fetch");
    assert!(series.is_empty());
    assert!(source.calls().is_empty());
}

#[test]
fn overlapping_pages_are_deduplicated() {
    let mut source = FakeHistory::new(100, 1000);
    source.sloppy_end_time = true;
    let series = fetch_many(&source, "BTCUSDT", Interval::Minute1, 300, None).expect("fetch");
    assert_strictly_ascending(&series);
    assert_eq!(series.last().expect("last").open_time, source.latest());
}

#[test]
fn failed_page_fails_the_whole_call() {
    let mut source = FakeHistory::new(1500, 5000);
    source.fail_on_call = Some(2);
    let err = fetch_many(&source, "BTCUSDT", Interval::Minute1, 4000, None).expect_err("error");
    assert_eq!(err.kind, ErrorKind::Transport { status: Some(503) });
    assert_eq!(source.calls().len(), 2);
}
