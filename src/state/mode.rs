use crate::storage::{load_string_from_storage, save_string_to_storage, MODE_KEY};
use std::str::FromStr;
use strum::{Display, EnumString};

/// Interaction gate for the whole board surface.
///
/// `Edit` exposes drag, resize, selection, typing, and the action menu.
/// `Scroll` withdraws all note-level pointer handling so gestures fall
/// through to native panning. The choice is device-local state, never
/// written to the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum BoardMode {
    #[default]
    Edit,
    Scroll,
}

impl BoardMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Edit)
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Edit => Self::Scroll,
            Self::Scroll => Self::Edit,
        }
    }
}

pub(crate) fn load_mode() -> BoardMode {
    load_string_from_storage(MODE_KEY)
        .and_then(|v| BoardMode::from_str(&v).ok())
        .unwrap_or_default()
}

pub(crate) fn save_mode(mode: BoardMode) {
    save_string_to_storage(MODE_KEY, &mode.to_string());
}
