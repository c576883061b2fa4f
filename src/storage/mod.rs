use crate::models::ClipboardNote;
use serde::{Deserialize, Serialize};

pub(crate) const LAST_BOARD_KEY: &str = "corkboard_last_board_id";
pub(crate) const MODE_KEY: &str = "corkboard_mode";
pub(crate) const CLIPBOARD_NOTE_KEY: &str = "corkboard_clipboard_note";

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(key, &json);
        }
    }
}

pub(crate) fn load_string_from_storage(key: &str) -> Option<String> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(key).ok().flatten())
}

pub(crate) fn save_string_to_storage(key: &str, value: &str) {
    if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.set_item(key, value);
    }
}

pub(crate) fn load_last_board_id() -> Option<i64> {
    load_string_from_storage(LAST_BOARD_KEY).and_then(|v| v.parse().ok())
}

pub(crate) fn save_last_board_id(id: i64) {
    save_string_to_storage(LAST_BOARD_KEY, &id.to_string());
}

pub(crate) fn load_clipboard_note() -> Option<ClipboardNote> {
    load_json_from_storage(CLIPBOARD_NOTE_KEY)
}

pub(crate) fn save_clipboard_note(note: &ClipboardNote) {
    save_json_to_storage(CLIPBOARD_NOTE_KEY, note);
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_clipboard_note_storage_roundtrip() {
        let clip = ClipboardNote {
            width: 220.0,
            height: 90.0,
            color: "#FFE3E3".to_string(),
            content: "copied".to_string(),
        };
        save_clipboard_note(&clip);
        let loaded = load_clipboard_note().expect("clipboard note should load back");
        assert_eq!(loaded, clip);
    }

    #[wasm_bindgen_test]
    fn test_last_board_id_roundtrip() {
        save_last_board_id(42);
        assert_eq!(load_last_board_id(), Some(42));
    }
}
