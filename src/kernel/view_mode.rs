use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Edit,
    #[default]
    Split,
    Preview,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Edit, ViewMode::Split, ViewMode::Preview];

    /// Split -> Preview -> Edit -> Split
    pub fn successor(self) -> Self {
        match self {
            ViewMode::Split => ViewMode::Preview,
            ViewMode::Preview => ViewMode::Edit,
            ViewMode::Edit => ViewMode::Split,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewMode::Edit => "edit",
            ViewMode::Split => "split",
            ViewMode::Preview => "preview",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewModeController {
    mode: ViewMode,
}

impl ViewModeController {
    pub fn new(mode: ViewMode) -> Self {
        Self { mode }
    }

    pub fn current(&self) -> ViewMode {
        self.mode
    }

    pub fn set(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn next(&mut self) -> ViewMode {
        self.mode = self.mode.successor();
        self.mode
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/view_mode.rs"]
mod tests;
