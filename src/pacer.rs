/// Menu screens advance at this fixed interval.
pub const MENU_INTERVAL_MS: u64 = 10;

/// True when more than `interval_ms` has elapsed since the last accepted tick.
pub fn should_tick(now_ms: u64, last_accepted_ms: u64, interval_ms: u64) -> bool {
    now_ms.saturating_sub(last_accepted_ms) > interval_ms
}

/// Fixed-timestep gate. A late frame yields a single tick, never a burst of
/// catch-up ticks.
#[derive(Debug, Default)]
pub struct FramePacer {
    last_accepted_ms: u64,
}

impl FramePacer {
    pub fn new(now_ms: u64) -> Self {
        Self { last_accepted_ms: now_ms }
    }

    /// Records `now_ms` as the last tick and returns true if a tick is due.
    pub fn try_tick(&mut self, now_ms: u64, interval_ms: u64) -> bool {
        if !should_tick(now_ms, self.last_accepted_ms, interval_ms) {
            return false;
        }
        self.last_accepted_ms = now_ms;
        true
    }
}
