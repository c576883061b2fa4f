mod mode;
mod note_store;
mod note_sync;

pub(crate) use mode::{save_mode, BoardMode};
pub(crate) use note_store::NoteStore;
pub(crate) use note_sync::{NoteSyncController, SlotField};

use crate::api::ApiClient;
use crate::geometry::{BoardContext, Gesture, PointerSession};
use crate::models::Board;
use crate::richtext::table::CellRef;
use crate::storage::load_last_board_id;
use leptos::prelude::*;

#[derive(Clone)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// Loaded from backend.
    pub boards: RwSignal<Vec<Board>>,
    pub boards_loading: RwSignal<bool>,
    pub boards_error: RwSignal<Option<String>>,

    /// Board selection; restored from localStorage, validated against the
    /// loaded board list.
    pub current_board_id: RwSignal<Option<i64>>,

    /// Notes for the selected board, plus selection and z-order state.
    pub store: NoteStore,

    /// Edit-vs-scroll interaction gate, device-local.
    pub mode: RwSignal<BoardMode>,

    /// At most one pointer gesture is in flight at a time.
    pub gesture: RwSignal<Gesture>,

    /// Where the next created/pasted note lands.
    pub pointer_session: RwSignal<PointerSession>,

    /// Table cell the cursor was last in; drives the table commands.
    pub focused_cell: RwSignal<Option<CellRef>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            api_client: RwSignal::new(ApiClient::from_env()),
            boards: RwSignal::new(vec![]),
            boards_loading: RwSignal::new(false),
            boards_error: RwSignal::new(None),
            current_board_id: RwSignal::new(load_last_board_id()),
            store: NoteStore::new(),
            mode: RwSignal::new(mode::load_mode()),
            gesture: RwSignal::new(Gesture::Idle),
            pointer_session: RwSignal::new(PointerSession::default()),
            focused_cell: RwSignal::new(None),
        }
    }

    pub fn current_board(&self) -> Option<Board> {
        let id = self.current_board_id.get()?;
        self.boards.get().into_iter().find(|b| b.id == id)
    }

    /// Snap settings of the selected board, read at gesture end.
    pub fn board_context(&self) -> BoardContext {
        let snap_enabled = self
            .current_board_id
            .get_untracked()
            .and_then(|id| {
                self.boards
                    .with_untracked(|bs| bs.iter().find(|b| b.id == id).map(|b| b.snapping))
            })
            .unwrap_or(true);

        BoardContext {
            snap_enabled,
            ..BoardContext::default()
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);

/// Page-level actions the chrome components call back into.
#[derive(Clone, Copy)]
pub(crate) struct BoardUiActions {
    pub select_board: Callback<i64>,
    pub create_board: Callback<()>,
    pub rename_board: Callback<i64>,
    pub delete_board: Callback<i64>,
    pub duplicate_board: Callback<i64>,
    pub set_board_color: Callback<String>,
    pub toggle_snap: Callback<()>,
    pub toggle_mode: Callback<()>,
    pub add_note: Callback<()>,
    pub copy_note: Callback<()>,
    pub paste_note: Callback<()>,
    pub delete_note: Callback<()>,
}
