use portfolio_protocol::ThemeMode;
use tracing::debug;

/// Icon on the theme toggle button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeIcon {
    Sun,
    Moon,
}

/// Theme selection plus whether the client has mounted.
///
/// Until mount the stored preference is unknown, so the toggle renders the
/// light-mode icon to match the server markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeState {
    mode: ThemeMode,
    mounted: bool,
}

impl ThemeState {
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            mode,
            mounted: false,
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn mount(&mut self) {
        self.mounted = true;
    }

    pub fn toggle(&mut self) -> ThemeMode {
        self.mode = self.mode.flipped();
        debug!(mode = self.mode.class_name(), "theme toggled");
        self.mode
    }

    pub fn icon(&self) -> ThemeIcon {
        if self.mounted && self.mode == ThemeMode::Dark {
            ThemeIcon::Sun
        } else {
            ThemeIcon::Moon
        }
    }
}
