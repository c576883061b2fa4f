use crate::models::{NoteId, NotePatch, SPACER_NOTE_ID};
use crate::state::AppContext;
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wasm_bindgen::JsCast;

/// Debounce window for high-frequency fields (typing).
pub(crate) const AUTOSAVE_DEBOUNCE_MS: i32 = 600;

/// Field class a debounce timer coalesces on. Content and typing-driven
/// height are tracked separately so a late height measurement cannot
/// resurrect an already-flushed content burst.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum SlotField {
    Content,
    Height,
}

/// Debounce key: one pending write per field class per note.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SaveSlot {
    pub note_id: NoteId,
    pub field: SlotField,
}

impl SaveSlot {
    pub fn content(note_id: NoteId) -> Self {
        Self {
            note_id,
            field: SlotField::Content,
        }
    }

    pub fn height(note_id: NoteId) -> Self {
        Self {
            note_id,
            field: SlotField::Height,
        }
    }
}

/// Coalescing buffer behind the debounce timers. Scheduling into an
/// occupied slot merges the new patch over the old one, so a burst of N
/// edits flushes as a single write carrying the latest value.
#[derive(Default)]
pub(crate) struct PendingSaves {
    pending: HashMap<SaveSlot, NotePatch>,
}

impl PendingSaves {
    pub fn schedule(&mut self, slot: SaveSlot, patch: NotePatch) {
        self.pending.entry(slot).or_default().merge(patch);
    }

    pub fn take(&mut self, slot: SaveSlot) -> Option<NotePatch> {
        self.pending.remove(&slot)
    }

    /// Fold every pending patch for a note into one, emptying its slots.
    pub fn take_for_note(&mut self, note_id: NoteId) -> NotePatch {
        let mut folded = NotePatch::default();
        for slot in self.slots_for_note(note_id) {
            if let Some(patch) = self.pending.remove(&slot) {
                folded.merge(patch);
            }
        }
        folded
    }

    pub fn slots_for_note(&self, note_id: NoteId) -> Vec<SaveSlot> {
        self.pending
            .keys()
            .filter(|s| s.note_id == note_id)
            .copied()
            .collect()
    }

    pub fn clear_all(&mut self) -> Vec<SaveSlot> {
        self.pending.drain().map(|(slot, _)| slot).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Optimistic write-back to the board backend.
///
/// Local state is always updated first (by the caller, through the note
/// store); this controller only ships patches. High-frequency fields are
/// debounced per slot; terminal events (gesture end, blur, color pick,
/// z-order bump) go out immediately and absorb whatever was pending for
/// the note. Failures are logged and dropped: no retry, no rollback, the
/// remote copy stays stale until the next successful write.
#[derive(Clone)]
pub(crate) struct NoteSyncController {
    app_state: AppContext,

    pending: Arc<Mutex<PendingSaves>>,

    /// Per-slot debounce timers.
    debounce_ms: i32,
    timers: Arc<Mutex<HashMap<SaveSlot, i32>>>,

    /// Keep the pagehide listener alive for the app lifetime.
    _pagehide_handle: StoredValue<Option<WindowListenerHandle>>,
}

impl NoteSyncController {
    pub fn new(app_state: AppContext) -> Self {
        let s = Self {
            app_state,
            pending: Arc::new(Mutex::new(PendingSaves::default())),
            debounce_ms: AUTOSAVE_DEBOUNCE_MS,
            timers: Arc::new(Mutex::new(HashMap::new())),
            _pagehide_handle: StoredValue::new(None),
        };

        // Best-effort flush when the page goes away mid-burst.
        let s2 = s.clone();
        let pagehide =
            window_event_listener(ev::pagehide, move |_ev: web_sys::PageTransitionEvent| {
                s2.flush_all();
            });
        s._pagehide_handle.set_value(Some(pagehide));

        s
    }

    /// Debounced save for a high-frequency field. Each call replaces the
    /// pending value and resets the slot's timer.
    pub fn save_debounced(&self, note_id: NoteId, field: SlotField, patch: NotePatch) {
        if note_id == SPACER_NOTE_ID || patch.is_empty() {
            return;
        }

        let slot = SaveSlot { note_id, field };
        if let Ok(mut pending) = self.pending.lock() {
            pending.schedule(slot, patch);
        }
        self.schedule_timer(slot);
    }

    /// Immediate save for terminal events. Pending debounced patches for
    /// the same note are folded in underneath so the flush carries the
    /// whole picture, with the immediate values winning.
    pub fn save_now(&self, note_id: NoteId, patch: NotePatch) {
        if note_id == SPACER_NOTE_ID {
            return;
        }

        let mut folded = NotePatch::default();
        if let Ok(mut pending) = self.pending.lock() {
            folded = pending.take_for_note(note_id);
        }
        self.clear_timers_for_note(note_id);
        folded.merge(patch);

        if folded.is_empty() {
            return;
        }
        self.send(note_id, folded);
    }

    /// Drop pending work for one note (delete path).
    pub fn cancel_for_note(&self, note_id: NoteId) {
        if let Ok(mut pending) = self.pending.lock() {
            let _ = pending.take_for_note(note_id);
        }
        self.clear_timers_for_note(note_id);
    }

    /// Drop everything (board switch).
    pub fn cancel_all(&self) {
        if let Ok(mut pending) = self.pending.lock() {
            let _ = pending.clear_all();
        }
        let Some(win) = web_sys::window() else {
            return;
        };
        if let Ok(mut timers) = self.timers.lock() {
            for (_, tid) in timers.drain() {
                win.clear_timeout_with_handle(tid);
            }
        }
    }

    fn schedule_timer(&self, slot: SaveSlot) {
        let Some(win) = web_sys::window() else {
            return;
        };

        if let Ok(mut timers) = self.timers.lock() {
            if let Some(tid) = timers.remove(&slot) {
                win.clear_timeout_with_handle(tid);
            }
        }

        let s2 = self.clone();
        let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
            s2.flush_slot(slot);
        });

        let tid = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                self.debounce_ms,
            )
            .unwrap_or(0);

        if let Ok(mut timers) = self.timers.lock() {
            timers.insert(slot, tid);
        }
    }

    fn clear_timers_for_note(&self, note_id: NoteId) {
        let Some(win) = web_sys::window() else {
            return;
        };
        if let Ok(mut timers) = self.timers.lock() {
            timers.retain(|slot, tid| {
                if slot.note_id == note_id {
                    win.clear_timeout_with_handle(*tid);
                    false
                } else {
                    true
                }
            });
        }
    }

    fn flush_slot(&self, slot: SaveSlot) {
        if let Ok(mut timers) = self.timers.lock() {
            timers.remove(&slot);
        }
        let patch = match self.pending.lock() {
            Ok(mut pending) => pending.take(slot),
            Err(_) => None,
        };
        if let Some(patch) = patch {
            self.send(slot.note_id, patch);
        }
    }

    fn flush_all(&self) {
        let slots: Vec<SaveSlot> = match self.pending.lock() {
            Ok(pending) => pending.pending.keys().copied().collect(),
            Err(_) => vec![],
        };
        for slot in slots {
            self.flush_slot(slot);
        }
    }

    /// Fire-and-forget, log-and-drop. Background saves never surface to
    /// the user and the optimistic local state is not rolled back.
    fn send(&self, note_id: NoteId, patch: NotePatch) {
        let api_client = self.app_state.0.api_client.get_untracked();
        spawn_local(async move {
            if let Err(e) = api_client.patch_note(note_id, &patch).await {
                leptos::logging::error!("note {note_id} save failed: {e}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_coalesces_to_latest_value() {
        let mut pending = PendingSaves::default();
        let slot = SaveSlot::content(1);

        for i in 0..10 {
            pending.schedule(slot, NotePatch::content(format!("v{i}")));
        }

        assert_eq!(pending.len(), 1);
        let patch = pending.take(slot).expect("one pending write");
        assert_eq!(patch.content.as_deref(), Some("v9"));
        assert_eq!(pending.take(slot), None);
    }

    #[test]
    fn test_slots_are_independent_per_note_and_field() {
        let mut pending = PendingSaves::default();
        pending.schedule(SaveSlot::content(1), NotePatch::content("a".to_string()));
        pending.schedule(SaveSlot::height(1), NotePatch::height(40.0));
        pending.schedule(SaveSlot::content(2), NotePatch::content("b".to_string()));

        assert_eq!(pending.len(), 3);
        let p1 = pending.take(SaveSlot::content(1)).expect("content slot");
        assert_eq!(p1.height, None);
        assert_eq!(pending.len(), 2);
    }

    #[test]
    fn test_take_for_note_folds_all_fields() {
        let mut pending = PendingSaves::default();
        pending.schedule(SaveSlot::content(1), NotePatch::content("text".to_string()));
        pending.schedule(SaveSlot::height(1), NotePatch::height(64.0));
        pending.schedule(SaveSlot::content(2), NotePatch::content("other".to_string()));

        let folded = pending.take_for_note(1);
        assert_eq!(folded.content.as_deref(), Some("text"));
        assert_eq!(folded.height, Some(64.0));

        // Note 2 is untouched.
        assert_eq!(pending.len(), 1);
        assert!(pending.slots_for_note(1).is_empty());
    }

    #[test]
    fn test_terminal_patch_wins_over_pending() {
        let mut pending = PendingSaves::default();
        pending.schedule(SaveSlot::content(1), NotePatch::content("stale".to_string()));

        // save_now folds pending underneath the immediate patch.
        let mut folded = pending.take_for_note(1);
        folded.merge(NotePatch::content("final".to_string()));
        assert_eq!(folded.content.as_deref(), Some("final"));
    }

    #[test]
    fn test_clear_all_reports_cleared_slots() {
        let mut pending = PendingSaves::default();
        pending.schedule(SaveSlot::content(1), NotePatch::content("a".to_string()));
        pending.schedule(SaveSlot::height(2), NotePatch::height(30.0));

        let mut slots = pending.clear_all();
        slots.sort_by_key(|s| s.note_id);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].note_id, 1);
        assert_eq!(pending.len(), 0);
    }
}
