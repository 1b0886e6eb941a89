use chrono::Utc;

/// Seconds since epoch with sub-second precision.
pub fn now_f64() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

pub fn now_i64() -> i64 {
    Utc::now().timestamp()
}

/// Whole seconds left until `expires_at`, clamped at zero.
pub fn seconds_until(expires_at: f64, now: f64) -> u64 {
    let remaining = (expires_at - now).floor();
    if remaining <= 0.0 {
        0
    } else {
        remaining as u64
    }
}
