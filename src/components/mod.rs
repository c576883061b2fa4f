pub mod ui;

mod action_sheet;
mod board_surface;
mod board_tabs;
mod color_picker;
mod note_card;

pub(crate) use action_sheet::ActionSheet;
pub(crate) use board_surface::BoardSurface;
pub(crate) use board_tabs::BoardTabs;
