//! Render wait against changing page snapshots

use composable_html::{HtmlSource, NoopLoader, RenderWait, WaitOutcome, wait_for_content};
use composable_testkit::MemoryPageSource;
use composable_testkit::fixtures::{LOADING_PAGE, page_with_body};
use composable_testkit::location;
use std::time::Duration;

fn quick_wait() -> RenderWait {
    RenderWait {
        timeout: Duration::from_millis(300),
        interval: Duration::from_millis(100),
    }
}

#[tokio::test(start_paused = true)]
async fn test_ready_once_content_renders() {
    let rendered = page_with_body("<p>Welcome</p>");
    let source = MemoryPageSource::with_frames(
        vec![LOADING_PAGE.to_string(), LOADING_PAGE.to_string(), rendered],
        location("/"),
    );

    let outcome = wait_for_content(&source, quick_wait()).await;

    assert_eq!(outcome, WaitOutcome::Ready);
    assert_eq!(source.snapshot_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_times_out_on_loading_page() {
    let source = HtmlSource::new(LOADING_PAGE, location("/"), NoopLoader);
    let outcome = wait_for_content(&source, quick_wait()).await;
    assert_eq!(outcome, WaitOutcome::TimedOut);
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_failure_ends_wait() {
    let source = MemoryPageSource::new(LOADING_PAGE, location("/"));
    source.set_failing(true);

    let outcome = wait_for_content(&source, quick_wait()).await;

    assert_eq!(outcome, WaitOutcome::Ready);
    assert_eq!(source.snapshot_count(), 1);
}
