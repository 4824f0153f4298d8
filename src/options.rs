use crate::settings::Settings;

/// Length of the display's resolution list.
pub const RESOLUTION_COUNT: usize = 5;
pub const SPEED_MIN: u16 = 10;
pub const SPEED_MAX: u16 = 500;

/// A single edit to the pending options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Resolution(usize),
    Fullscreen(bool),
    SoftFilter(bool),
    Speed(u16),
}

/// Committed options plus a pending copy that the Options screen edits.
/// Nothing reaches `committed` until `apply`.
#[derive(Debug, Clone, Default)]
pub struct OptionsStore {
    committed: Settings,
    pending: Settings,
}

impl OptionsStore {
    pub fn new(committed: Settings) -> Self {
        let committed = committed.clamped();
        Self { committed, pending: committed }
    }

    pub fn committed(&self) -> &Settings {
        &self.committed
    }

    pub fn pending(&self) -> &Settings {
        &self.pending
    }

    pub fn enter(&mut self) {
        self.pending = self.committed;
    }

    pub fn stage(&mut self, setting: Setting) {
        match setting {
            Setting::Resolution(index) => self.pending.resolution = index.min(RESOLUTION_COUNT - 1),
            Setting::Fullscreen(on) => self.pending.fullscreen = on,
            Setting::SoftFilter(on) => self.pending.soft_filter = on,
            Setting::Speed(speed) => self.pending.speed = speed.clamp(SPEED_MIN, SPEED_MAX),
        }
    }

    pub fn apply(&mut self) -> Settings {
        self.committed = self.pending;
        log::info!("Applied options: {:?}", self.committed);
        self.committed
    }

    pub fn discard(&mut self) {
        if self.pending != self.committed {
            log::debug!("Discarded pending options: {:?}", self.pending);
        }
        self.pending = self.committed;
    }
}
