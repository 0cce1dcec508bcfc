use tracing::debug;

use crate::timer::model::{Preset, TargetTime, TargetTimeError};

/// Session-scoped selection driving every derived display value.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct TimerState {
    target: TargetTime,
}

impl TimerState {
    pub fn new(target: TargetTime) -> Self {
        Self { target }
    }

    pub fn target(&self) -> TargetTime {
        self.target
    }

    pub fn set_target(&mut self, target: TargetTime) {
        if target != self.target {
            debug!(from = %self.target, to = %target, "target changed");
        }
        self.target = target;
    }

    pub fn set_hour(&mut self, hour: u32) -> Result<(), TargetTimeError> {
        let target = self.target.with_hour(hour)?;
        self.set_target(target);
        Ok(())
    }

    pub fn set_minute(&mut self, minute: u32) -> Result<(), TargetTimeError> {
        let target = self.target.with_minute(minute)?;
        self.set_target(target);
        Ok(())
    }

    pub fn apply_preset(&mut self, preset: &Preset) {
        self.set_target(preset.target);
    }

    pub fn active_preset<'a>(&self, presets: &'a [Preset]) -> Option<&'a Preset> {
        presets.iter().find(|preset| preset.target == self.target)
    }
}
