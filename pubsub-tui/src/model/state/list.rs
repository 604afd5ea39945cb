//! Pieces shared by the list regions

/// Sub-mode of the Topics and Subscriptions regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMode {
    #[default]
    Normal,
    Filter,
    Create,
    ConfirmDelete,
}

impl ListMode {
    /// Whether keystrokes go to a text input.
    pub fn takes_text(self) -> bool {
        matches!(self, Self::Filter | Self::Create)
    }
}

/// One-line status shown at the bottom of a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionStatus {
    pub text: String,
    pub is_error: bool,
}

impl RegionStatus {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

pub(crate) fn step_up(cursor: &mut usize) {
    *cursor = cursor.saturating_sub(1);
}

pub(crate) fn step_down(cursor: &mut usize, len: usize) {
    if *cursor + 1 < len {
        *cursor += 1;
    }
}

/// Keeps a cursor inside a list of `len` items.
pub(crate) fn clamp(cursor: &mut usize, len: usize) {
    *cursor = (*cursor).min(len.saturating_sub(1));
}
