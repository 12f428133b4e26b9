use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicI32, Ordering};

/// A simple counter which is initialized at 0 and wraps through the full
/// i32 space. Uniqueness only has to hold across the in-flight window,
/// which is orders of magnitude smaller than 2^32.
static MESSAGE_ID_COUNTER: Lazy<AtomicI32> = Lazy::new(|| AtomicI32::new(0));

#[inline]
pub fn next_message_id() -> i32 {
    MESSAGE_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}
