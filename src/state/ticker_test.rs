use super::*;
use std::sync::{Arc, Mutex};

fn recorder() -> (Arc<Mutex<Vec<u8>>>, impl FnMut(u8) -> bool + Send + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    (seen, move |step| {
        sink.lock().unwrap().push(step);
        true
    })
}

const INTERVAL: Duration = Duration::from_millis(800);

// =============================================================
// catalogue
// =============================================================

#[test]
fn catalogue_has_four_numbered_steps() {
    assert_eq!(THINKING_STEPS.len(), usize::from(TOTAL_STEPS));
    for (i, step) in THINKING_STEPS.iter().enumerate() {
        assert_eq!(usize::from(step.number), i + 1);
    }
    assert_eq!(thinking_step(2).map(|s| s.title), Some("Searching Knowledge Base"));
}

#[test]
fn thinking_step_out_of_range_is_none() {
    assert!(thinking_step(0).is_none());
    assert!(thinking_step(5).is_none());
}

#[test]
fn progress_percent_quarters() {
    assert_eq!(progress_percent(0), 0);
    assert_eq!(progress_percent(1), 25);
    assert_eq!(progress_percent(3), 75);
    assert_eq!(progress_percent(4), 100);
    assert_eq!(progress_percent(9), 100);
}

// =============================================================
// ticking
// =============================================================

#[tokio::test(start_paused = true)]
async fn emits_first_step_immediately() {
    let (seen, on_step) = recorder();
    let _ticker = ProgressTicker::start(INTERVAL, on_step);
    assert_eq!(*seen.lock().unwrap(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn emits_one_step_per_interval_up_to_four() {
    let (seen, on_step) = recorder();
    let ticker = ProgressTicker::start(INTERVAL, on_step);

    tokio::time::sleep(INTERVAL + Duration::from_millis(10)).await;
    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);

    tokio::time::sleep(INTERVAL * 10).await;
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
    assert!(ticker.is_finished());
}

#[tokio::test(start_paused = true)]
async fn cancel_suppresses_pending_steps() {
    let (seen, on_step) = recorder();
    let ticker = ProgressTicker::start(INTERVAL, on_step);

    tokio::time::sleep(INTERVAL + Duration::from_millis(10)).await;
    ticker.cancel();
    tokio::time::sleep(INTERVAL * 10).await;

    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn drop_cancels() {
    let (seen, on_step) = recorder();
    drop(ProgressTicker::start(INTERVAL, on_step));
    tokio::time::sleep(INTERVAL * 10).await;
    assert_eq!(*seen.lock().unwrap(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn refused_step_stops_ticker() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let ticker = ProgressTicker::start(INTERVAL, move |step| {
        sink.lock().unwrap().push(step);
        step < 2
    });

    tokio::time::sleep(INTERVAL * 10).await;
    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    assert!(ticker.is_finished());
}

#[tokio::test]
async fn refused_first_step_spawns_nothing() {
    let ticker = ProgressTicker::start(INTERVAL, |_| false);
    assert!(ticker.is_finished());
}
