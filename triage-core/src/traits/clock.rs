//! Monotonic time source

/// Millisecond clock
///
/// Counts from an arbitrary origin (usually boot) and wraps after about
/// 49 days; consumers compare readings with wrapping arithmetic.
pub trait Clock {
    fn now_ms(&self) -> u32;
}
