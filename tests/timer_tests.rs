use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use broadside::session::BattleTimer;
use broadside::GameEvent;
use tokio::sync::mpsc;

#[tokio::test]
async fn test_timer_counts_ticks_from_the_start_value() {
    let elapsed = Arc::new(AtomicU64::new(40));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let timer = BattleTimer::start(Arc::clone(&elapsed), Duration::from_millis(20), tx);

    for expected in 41..=43 {
        assert_eq!(rx.recv().await, Some(GameEvent::TimerTick(expected)));
    }
    timer.shutdown().await;
    assert!(elapsed.load(Ordering::SeqCst) >= 43);
}

#[tokio::test]
async fn test_timer_stops_ticking_after_stop() {
    let elapsed = Arc::new(AtomicU64::new(0));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let timer = BattleTimer::start(Arc::clone(&elapsed), Duration::from_millis(10), tx);

    assert_eq!(rx.recv().await, Some(GameEvent::TimerTick(1)));
    timer.stop();
    assert!(timer.is_stopped());
    tokio::time::sleep(Duration::from_millis(30)).await;
    let stopped_at = elapsed.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(elapsed.load(Ordering::SeqCst), stopped_at);
    timer.shutdown().await;
}

#[tokio::test]
async fn test_stop_flag_clone_stops_the_timer() {
    let elapsed = Arc::new(AtomicU64::new(0));
    let (tx, _rx) = mpsc::unbounded_channel();
    let timer = BattleTimer::start(Arc::clone(&elapsed), Duration::from_millis(10), tx);
    let flag = timer.stop_flag();
    flag.raise();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(elapsed.load(Ordering::SeqCst), 0);
    assert!(timer.is_stopped());
}
