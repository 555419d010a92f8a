use std::time::{Duration, Instant};

use uuid::Uuid;

use super::*;

fn limiter(per_user: usize, global: usize) -> RateLimiter {
    let mut rl = RateLimiter::new();
    rl.config = RateLimitConfig {
        per_user_limit: per_user,
        per_user_window: Duration::from_secs(60),
        global_limit: global,
        global_window: Duration::from_secs(60),
    };
    rl
}

#[test]
fn allows_requests_under_the_limit() {
    let rl = limiter(3, 100);
    let user = Uuid::new_v4();
    let now = Instant::now();
    for i in 0..3 {
        assert!(rl.check_and_record_at(user, now + Duration::from_secs(i)).is_ok());
    }
}

#[test]
fn per_user_limit_blocks_fourth_request() {
    let rl = limiter(3, 100);
    let user = Uuid::new_v4();
    let now = Instant::now();
    for _ in 0..3 {
        rl.check_and_record_at(user, now).unwrap();
    }
    let err = rl.check_and_record_at(user, now).unwrap_err();
    assert!(matches!(err, RateLimitError::PerUserExceeded { limit: 3, .. }));
}

#[test]
fn per_user_limit_is_per_user() {
    let rl = limiter(1, 100);
    let now = Instant::now();
    rl.check_and_record_at(Uuid::new_v4(), now).unwrap();
    assert!(rl.check_and_record_at(Uuid::new_v4(), now).is_ok());
}

#[test]
fn global_limit_spans_users() {
    let rl = limiter(100, 2);
    let now = Instant::now();
    rl.check_and_record_at(Uuid::new_v4(), now).unwrap();
    rl.check_and_record_at(Uuid::new_v4(), now).unwrap();
    let err = rl.check_and_record_at(Uuid::new_v4(), now).unwrap_err();
    assert!(matches!(err, RateLimitError::GlobalExceeded { limit: 2, .. }));
}

#[test]
fn window_expiry_frees_capacity() {
    let rl = limiter(1, 100);
    let user = Uuid::new_v4();
    let now = Instant::now();
    rl.check_and_record_at(user, now).unwrap();
    assert!(rl.check_and_record_at(user, now).is_err());
    // Just past the 60s window the old entry is pruned.
    assert!(rl.check_and_record_at(user, now + Duration::from_secs(61)).is_ok());
}

#[test]
fn rejected_requests_are_not_recorded() {
    let rl = limiter(1, 100);
    let user = Uuid::new_v4();
    let now = Instant::now();
    rl.check_and_record_at(user, now).unwrap();
    let _ = rl.check_and_record_at(user, now);
    let _ = rl.check_and_record_at(user, now);
    // One expiry frees exactly one slot — the failures above left no trace.
    assert!(rl.check_and_record_at(user, now + Duration::from_secs(61)).is_ok());
}
