use std::time::{SystemTime, UNIX_EPOCH};

/// Whole seconds since the UNIX epoch; 0 if the system clock is before it.
pub fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
