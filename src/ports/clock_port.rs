//! Wall-clock access port, used by the timestamp parser's fallback.

pub trait Clock {
    /// Current time as epoch seconds.
    fn now_epoch_seconds(&self) -> i64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_epoch_seconds(&self) -> i64 {
        (**self).now_epoch_seconds()
    }
}
