use std::time::Duration;

use mediadeck_engine::{Backoff, ClientConfig, PollSettings};

#[test]
fn penalty_doubles_up_to_ceiling() {
    let mut backoff = Backoff::new(Duration::from_secs(1), Duration::from_secs(10));
    assert_eq!(backoff.penalty(), Duration::ZERO);

    let penalties: Vec<u64> = (0..6)
        .map(|_| backoff.record_failure().as_secs())
        .collect();
    assert_eq!(penalties, vec![1, 2, 4, 8, 10, 10]);
    assert_eq!(backoff.failures(), 6);
}

#[test]
fn success_resets_penalty() {
    let mut backoff = Backoff::new(Duration::from_millis(250), Duration::from_secs(2));
    backoff.record_failure();
    backoff.record_failure();
    assert_eq!(backoff.penalty(), Duration::from_millis(500));

    backoff.reset();
    assert_eq!(backoff.penalty(), Duration::ZERO);
    assert_eq!(backoff.record_failure(), Duration::from_millis(250));
}

#[test]
fn long_failure_streak_does_not_overflow() {
    let mut backoff = Backoff::new(Duration::from_secs(1), Duration::from_secs(10));
    for _ in 0..200 {
        backoff.record_failure();
    }
    assert_eq!(backoff.penalty(), Duration::from_secs(10));
}

#[test]
fn default_pacing_matches_web_client() {
    let settings = PollSettings::from(&ClientConfig::default());
    assert_eq!(settings.full_refresh_interval, Duration::from_secs(30));
    assert_eq!(settings.progress_interval, Duration::from_secs(3));
    assert_eq!(ClientConfig::default().optimistic_window, Duration::from_secs(15));
}
