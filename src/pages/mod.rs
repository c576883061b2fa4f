use crate::api::{BoardPatch, CreateNoteRequest};
use crate::components::ui::{Alert, AlertDescription, Spinner};
use crate::components::{ActionSheet, BoardSurface, BoardTabs};
use crate::models::{
    Board, ClipboardNote, Note, NotePatch, DEFAULT_NOTE_COLOR, DEFAULT_NOTE_HEIGHT,
    DEFAULT_NOTE_WIDTH,
};
use crate::richtext::{doc_from_content, doc_is_empty};
use crate::state::{save_mode, AppContext, BoardUiActions, NoteSyncController};
use crate::storage::{load_clipboard_note, save_clipboard_note, save_last_board_id};
use crate::util::next_board_name;
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use wasm_bindgen::JsCast;

/// The single page: board tabs, the note surface, and the action sheet
/// for the active note.
#[component]
pub fn BoardPage() -> impl IntoView {
    let app = expect_context::<AppContext>();
    let sync = expect_context::<NoteSyncController>();

    let api_client = app.0.api_client;
    let boards = app.0.boards;
    let boards_loading = app.0.boards_loading;
    let boards_error = app.0.boards_error;
    let current_board_id = app.0.current_board_id;
    let store = app.0.store;
    let mode = app.0.mode;
    let pointer_session = app.0.pointer_session;
    let focused_cell = app.0.focused_cell;

    // Switching boards drops any in-flight debounced saves for the old
    // one, then replaces the note set wholesale.
    let do_select = {
        let sync = sync.clone();
        move |id: i64| {
            current_board_id.set(Some(id));
            save_last_board_id(id);
            sync.cancel_all();
            store.load(vec![]);
            let api_client = api_client.get_untracked();
            spawn_local(async move {
                match api_client.list_notes(id).await {
                    Ok(notes) => {
                        // The user may have clicked away while this was in flight.
                        if current_board_id.get_untracked() == Some(id) {
                            store.load(notes);
                        }
                    }
                    Err(e) => boards_error.set(Some(format!("Failed to load notes: {e}"))),
                }
            });
        }
    };

    {
        let do_select = do_select.clone();
        Effect::new(move |_| {
            let do_select = do_select.clone();
            let api_client = api_client.get_untracked();
            boards_loading.set(true);
            spawn_local(async move {
                match api_client.list_boards().await {
                    Ok(loaded) => {
                        // Reopen the last-used board when it still exists.
                        let stored = current_board_id.get_untracked();
                        let id = stored
                            .filter(|id| loaded.iter().any(|b| b.id == *id))
                            .or_else(|| loaded.first().map(|b| b.id));
                        boards.set(loaded);
                        boards_error.set(None);
                        if let Some(id) = id {
                            do_select(id);
                        }
                    }
                    Err(e) => boards_error.set(Some(format!("Failed to load boards: {e}"))),
                }
                boards_loading.set(false);
            });
        });
    }

    let create_board = {
        let do_select = do_select.clone();
        move |_: ()| {
            let default_name = next_board_name(boards.with_untracked(|b| b.len()));
            let Ok(Some(name)) = window().prompt_with_message_and_default("Board name", &default_name)
            else {
                return;
            };
            let name = name.trim().to_string();
            if name.is_empty() {
                return;
            }
            let do_select = do_select.clone();
            let api_client = api_client.get_untracked();
            spawn_local(async move {
                match api_client.create_board(&name).await {
                    Ok(created) => {
                        boards.update(|bs| {
                            bs.push(Board {
                                id: created.id,
                                name: created.name,
                                background_color: None,
                                snapping: true,
                            })
                        });
                        do_select(created.id);
                    }
                    Err(e) => boards_error.set(Some(format!("Failed to create board: {e}"))),
                }
            });
        }
    };

    let rename_board = move |id: i64| {
        let Some(current) =
            boards.with_untracked(|bs| bs.iter().find(|b| b.id == id).map(|b| b.name.clone()))
        else {
            return;
        };
        let Ok(Some(name)) = window().prompt_with_message_and_default("Board name", &current) else {
            return;
        };
        let name = name.trim().to_string();
        if name.is_empty() || name == current {
            return;
        }
        boards.update(|bs| {
            if let Some(b) = bs.iter_mut().find(|b| b.id == id) {
                b.name = name.clone();
            }
        });
        let api_client = api_client.get_untracked();
        spawn_local(async move {
            let patch = BoardPatch {
                name: Some(name),
                ..BoardPatch::default()
            };
            if let Err(e) = api_client.patch_board(id, &patch).await {
                leptos::logging::error!("board {id} rename failed: {e}");
            }
        });
    };

    let delete_board = {
        let do_select = do_select.clone();
        move |id: i64| {
            if !matches!(window().confirm_with_message("Delete this board?"), Ok(true)) {
                return;
            }
            let do_select = do_select.clone();
            let api_client = api_client.get_untracked();
            spawn_local(async move {
                // The backend refuses to delete the last remaining board.
                if let Err(e) = api_client.delete_board(id).await {
                    boards_error.set(Some(format!("Failed to delete board: {e}")));
                    return;
                }
                boards.update(|bs| bs.retain(|b| b.id != id));
                if current_board_id.get_untracked() == Some(id) {
                    match boards.with_untracked(|bs| bs.first().map(|b| b.id)) {
                        Some(next) => do_select(next),
                        None => {
                            current_board_id.set(None);
                            store.load(vec![]);
                        }
                    }
                }
            });
        }
    };

    let duplicate_board = {
        let do_select = do_select.clone();
        move |id: i64| {
            let source = boards.with_untracked(|bs| bs.iter().find(|b| b.id == id).cloned());
            let do_select = do_select.clone();
            let api_client = api_client.get_untracked();
            spawn_local(async move {
                match api_client.duplicate_board(id).await {
                    Ok(created) => {
                        boards.update(|bs| {
                            bs.push(Board {
                                id: created.id,
                                name: created.name,
                                background_color: source
                                    .as_ref()
                                    .and_then(|b| b.background_color.clone()),
                                snapping: source.as_ref().map(|b| b.snapping).unwrap_or(true),
                            })
                        });
                        do_select(created.id);
                    }
                    Err(e) => boards_error.set(Some(format!("Failed to duplicate board: {e}"))),
                }
            });
        }
    };

    let set_board_color = move |hex: String| {
        let Some(id) = current_board_id.get_untracked() else {
            return;
        };
        boards.update(|bs| {
            if let Some(b) = bs.iter_mut().find(|b| b.id == id) {
                b.background_color = Some(hex.clone());
            }
        });
        let api_client = api_client.get_untracked();
        spawn_local(async move {
            let patch = BoardPatch {
                background_color: Some(hex),
                ..BoardPatch::default()
            };
            if let Err(e) = api_client.patch_board(id, &patch).await {
                leptos::logging::error!("board {id} color change failed: {e}");
            }
        });
    };

    let toggle_snap = move |_: ()| {
        let Some(id) = current_board_id.get_untracked() else {
            return;
        };
        let Some(snapping) =
            boards.with_untracked(|bs| bs.iter().find(|b| b.id == id).map(|b| b.snapping))
        else {
            return;
        };
        let snapping = !snapping;
        boards.update(|bs| {
            if let Some(b) = bs.iter_mut().find(|b| b.id == id) {
                b.snapping = snapping;
            }
        });
        let api_client = api_client.get_untracked();
        spawn_local(async move {
            let patch = BoardPatch {
                snapping: Some(snapping),
                ..BoardPatch::default()
            };
            if let Err(e) = api_client.patch_board(id, &patch).await {
                leptos::logging::error!("board {id} snap toggle failed: {e}");
            }
        });
    };

    // Scroll mode is device-local and drops the selection so no note
    // chrome lingers over an inert surface.
    let toggle_mode = move |_: ()| {
        let next = mode.get_untracked().toggled();
        mode.set(next);
        save_mode(next);
        store.clear_active();
        focused_cell.set(None);
    };

    let spawn_create_note = {
        let sync = sync.clone();
        move |req: CreateNoteRequest| {
            let sync = sync.clone();
            let api_client = api_client.get_untracked();
            spawn_local(async move {
                match api_client.create_note(&req).await {
                    Ok(created) => {
                        store.insert(Note {
                            id: created.id,
                            x: req.x,
                            y: req.y,
                            width: req.width,
                            height: req.height,
                            color: req.color,
                            content: req.content,
                            z_index: 1,
                            is_spacer: false,
                        });
                        if let Some(z) = store.activate(created.id) {
                            sync.save_now(created.id, NotePatch::z_index(z));
                        }
                    }
                    Err(e) => boards_error.set(Some(format!("Failed to create note: {e}"))),
                }
            });
        }
    };

    let add_note = {
        let spawn_create_note = spawn_create_note.clone();
        move |_: ()| {
            let Some(board_id) = current_board_id.get_untracked() else {
                return;
            };
            let at = pointer_session.with_untracked(|s| s.last_click);
            spawn_create_note(CreateNoteRequest {
                board_id,
                x: at.x,
                y: at.y,
                width: DEFAULT_NOTE_WIDTH,
                height: DEFAULT_NOTE_HEIGHT,
                color: DEFAULT_NOTE_COLOR.to_string(),
                content: String::new(),
            });
        }
    };

    let copy_note = move |_: ()| {
        let Some(id) = store.active().get_untracked() else {
            return;
        };
        let Some(note) = store.snapshot(id) else {
            return;
        };
        save_clipboard_note(&ClipboardNote {
            width: note.width,
            height: note.height,
            color: note.color,
            content: note.content,
        });
    };

    let paste_note = {
        let spawn_create_note = spawn_create_note.clone();
        move |_: ()| {
            let Some(board_id) = current_board_id.get_untracked() else {
                return;
            };
            let Some(clip) = load_clipboard_note() else {
                return;
            };
            let at = pointer_session.with_untracked(|s| s.last_click);
            spawn_create_note(CreateNoteRequest {
                board_id,
                x: at.x,
                y: at.y,
                width: clip.width,
                height: clip.height,
                color: clip.color,
                content: clip.content,
            });
        }
    };

    let delete_note = {
        let sync = sync.clone();
        move |_: ()| {
            let Some(id) = store.active().get_untracked() else {
                return;
            };
            let Some(note) = store.snapshot(id) else {
                return;
            };
            // Only ask when there is content to lose.
            if !doc_is_empty(&doc_from_content(&note.content))
                && !matches!(window().confirm_with_message("Delete this note?"), Ok(true))
            {
                return;
            }
            sync.cancel_for_note(id);
            store.remove(id);
            let api_client = api_client.get_untracked();
            spawn_local(async move {
                if let Err(e) = api_client.delete_note(id).await {
                    leptos::logging::error!("note {id} delete failed: {e}");
                }
            });
        }
    };

    let actions = BoardUiActions {
        select_board: Callback::new(do_select.clone()),
        create_board: Callback::new(create_board),
        rename_board: Callback::new(rename_board),
        delete_board: Callback::new(delete_board),
        duplicate_board: Callback::new(duplicate_board),
        set_board_color: Callback::new(set_board_color),
        toggle_snap: Callback::new(toggle_snap),
        toggle_mode: Callback::new(toggle_mode),
        add_note: Callback::new(add_note.clone()),
        copy_note: Callback::new(copy_note),
        paste_note: Callback::new(paste_note.clone()),
        delete_note: Callback::new(delete_note.clone()),
    };
    provide_context(actions);

    let keydown_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        if is_editable_target(&ev) {
            return;
        }
        let key = ev.key();
        if key == "Escape" {
            store.clear_active();
            focused_cell.set(None);
            return;
        }
        if !mode.get_untracked().is_edit() {
            return;
        }
        let modifier = ev.ctrl_key() || ev.meta_key();
        match key.as_str() {
            "n" | "N" if modifier => {
                ev.prevent_default();
                add_note(());
            }
            "c" | "C" if modifier => copy_note(()),
            "v" | "V" if modifier => paste_note(()),
            "Delete" | "Backspace" => delete_note(()),
            _ => {}
        }
    });
    on_cleanup(move || keydown_handle.remove());

    view! {
        <div class="flex h-screen flex-col bg-zinc-100">
            <BoardTabs />

            <Show when=move || boards_error.get().is_some()>
                {move || {
                    boards_error
                        .get()
                        .map(|e| {
                            view! {
                                <Alert class="m-2">
                                    <AlertDescription class="text-xs">{e}</AlertDescription>
                                </Alert>
                            }
                        })
                }}
            </Show>

            <Show
                when=move || !boards_loading.get()
                fallback=|| {
                    view! {
                        <div class="flex grow items-center justify-center">
                            <Spinner />
                        </div>
                    }
                }
            >
                <BoardSurface />
            </Show>

            <ActionSheet />
        </div>
    }
}

/// Shortcuts must not fire while the user is typing into a field or a
/// contenteditable note body.
fn is_editable_target(ev: &web_sys::KeyboardEvent) -> bool {
    let Some(el) = ev
        .target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok())
    else {
        return false;
    };
    let tag = el.tag_name();
    tag == "INPUT" || tag == "TEXTAREA" || el.is_content_editable()
}
