use log::debug;
use std::time::{Duration, Instant};

use crate::models::ActiveTab;

/// Top-level UI state: which tab is showing and which theme is in effect.
#[derive(Debug, Clone, Default)]
pub struct Shell {
    active_tab: ActiveTab,
    system_dark: bool,
    theme_override: Option<bool>, // set once the user toggles the theme
}

impl Shell {
    pub fn new(system_dark: bool) -> Self {
        Self {
            system_dark,
            ..Self::default()
        }
    }

    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }

    pub fn select_tab(&mut self, tab: ActiveTab) {
        self.active_tab = tab;
    }

    pub fn is_dark(&self) -> bool {
        self.theme_override.unwrap_or(self.system_dark)
    }

    pub fn toggle_theme(&mut self) {
        self.theme_override = Some(!self.is_dark());
    }

    pub fn set_system_dark(&mut self, dark: bool) {
        self.system_dark = dark;
    }

    pub fn has_override(&self) -> bool {
        self.theme_override.is_some()
    }
}

/// Polls the operating system color-scheme preference at a fixed interval.
pub struct SystemThemeWatcher {
    interval: Duration,
    last_check: Option<Instant>,
    detect: fn() -> Option<bool>,
}

impl SystemThemeWatcher {
    pub fn new(interval: Duration) -> Self {
        Self::with_detector(interval, detect_system_dark)
    }

    pub fn with_detector(interval: Duration, detect: fn() -> Option<bool>) -> Self {
        Self {
            interval,
            last_check: None,
            detect,
        }
    }

    /// Returns the detected preference when a check is due and detection succeeds.
    pub fn poll(&mut self, now: Instant) -> Option<bool> {
        let due = match self.last_check {
            None => true,
            Some(last) => now.duration_since(last) >= self.interval,
        };
        if !due {
            return None;
        }
        self.last_check = Some(now);
        (self.detect)()
    }
}

pub fn detect_system_dark() -> Option<bool> {
    match dark_light::detect() {
        Ok(dark_light::Mode::Dark) => Some(true),
        Ok(dark_light::Mode::Light) => Some(false),
        Ok(dark_light::Mode::Unspecified) => None,
        Err(e) => {
            debug!("event=theme_detect module=shell status=error error={:?}", e);
            None
        }
    }
}
