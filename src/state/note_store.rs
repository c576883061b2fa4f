use crate::models::{Note, NoteId, NotePatch, SPACER_NOTE_ID};
use leptos::prelude::*;

/// Authoritative in-memory note set for the loaded board.
///
/// All note access goes through the store so its invariants hold globally:
/// ids are unique, the z-order high-water mark only increases, at most one
/// note is active, and the spacer sentinel can never get in.
#[derive(Clone, Copy)]
pub(crate) struct NoteStore {
    notes: RwSignal<Vec<RwSignal<Note>>>,

    /// Z-order high-water mark. Reset only by a full board load, from the
    /// maximum z-index in the freshly loaded set.
    z_high_water: RwSignal<i64>,

    active: RwSignal<Option<NoteId>>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self {
            notes: RwSignal::new(vec![]),
            z_high_water: RwSignal::new(1),
            active: RwSignal::new(None),
        }
    }

    /// Replace the whole set on board switch. Clears selection and
    /// re-seeds the z-order mark.
    pub fn load(&self, notes: Vec<Note>) {
        let notes: Vec<Note> = notes
            .into_iter()
            .filter(|n| !n.is_spacer && n.id != SPACER_NOTE_ID)
            .collect();

        let max_z = notes.iter().map(|n| n.z_index).max().unwrap_or(1);
        self.z_high_water.set(max_z.max(1));
        self.active.set(None);
        self.notes
            .set(notes.into_iter().map(RwSignal::new).collect());
    }

    /// Reactive handle list for rendering.
    pub fn entries(&self) -> Vec<RwSignal<Note>> {
        self.notes.get()
    }

    pub fn get(&self, id: NoteId) -> Option<RwSignal<Note>> {
        self.notes
            .with_untracked(|notes| notes.iter().find(|n| n.with_untracked(|n| n.id) == id).copied())
    }

    pub fn snapshot(&self, id: NoteId) -> Option<Note> {
        self.get(id).map(|sig| sig.get_untracked())
    }

    pub fn insert(&self, note: Note) {
        if note.is_spacer || note.id == SPACER_NOTE_ID || self.get(note.id).is_some() {
            return;
        }
        if note.z_index > self.z_high_water.get_untracked() {
            self.z_high_water.set(note.z_index);
        }
        self.notes.update(|notes| notes.push(RwSignal::new(note)));
    }

    /// Optimistic partial update; returns false for unknown ids.
    pub fn upsert_local(&self, id: NoteId, patch: &NotePatch) -> bool {
        let Some(sig) = self.get(id) else {
            return false;
        };
        sig.update(|n| patch.apply_to(n));
        true
    }

    pub fn remove(&self, id: NoteId) {
        self.notes
            .update(|notes| notes.retain(|n| n.with_untracked(|n| n.id) != id));
        if self.active.get_untracked() == Some(id) {
            self.active.set(None);
        }
    }

    pub fn active(&self) -> RwSignal<Option<NoteId>> {
        self.active
    }

    pub fn clear_active(&self) {
        if self.active.get_untracked().is_some() {
            self.active.set(None);
        }
    }

    /// Bump the note above everything else; returns the new z-index for
    /// persistence, or None for unknown/spacer ids.
    pub fn bring_to_front(&self, id: NoteId) -> Option<i64> {
        let sig = self.get(id)?;
        let z = self.z_high_water.get_untracked() + 1;
        self.z_high_water.set(z);
        sig.update(|n| n.z_index = z);
        Some(z)
    }

    /// Select the note and raise it. Activation always reassigns the
    /// highest z-index in the set.
    pub fn activate(&self, id: NoteId) -> Option<i64> {
        if id == SPACER_NOTE_ID {
            return None;
        }
        let z = self.bring_to_front(id)?;
        self.active.set(Some(id));
        Some(z)
    }

    pub fn len(&self) -> usize {
        self.notes.with_untracked(|n| n.len())
    }
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: NoteId, z: i64) -> Note {
        Note {
            id,
            x: 50.0,
            y: 50.0,
            width: 220.0,
            height: 15.0,
            color: "#FFF59D".to_string(),
            content: String::new(),
            z_index: z,
            is_spacer: false,
        }
    }

    #[test]
    fn test_load_seeds_mark_from_max_z() {
        let store = NoteStore::new();
        store.load(vec![note(1, 4), note(2, 9), note(3, 2)]);

        let z = store.activate(1).expect("known note");
        assert_eq!(z, 10);
        assert_eq!(store.snapshot(1).map(|n| n.z_index), Some(10));
    }

    #[test]
    fn test_load_filters_spacer_and_clears_selection() {
        let store = NoteStore::new();
        store.load(vec![note(1, 1)]);
        store.activate(1);

        store.load(vec![note(2, 1), Note::spacer()]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.active().get_untracked(), None);
        assert!(store.get(SPACER_NOTE_ID).is_none());
    }

    #[test]
    fn test_activation_order_is_transitive() {
        let store = NoteStore::new();
        store.load(vec![note(1, 1), note(2, 1), note(3, 1)]);

        // Activate in order 2, 3, 1, 2; later activations always win.
        store.activate(2);
        store.activate(3);
        store.activate(1);
        store.activate(2);

        let z = |id| store.snapshot(id).map(|n| n.z_index).unwrap();
        assert!(z(2) > z(1));
        assert!(z(1) > z(3));
        assert!(z(3) > 1);
        assert_eq!(store.active().get_untracked(), Some(2));
    }

    #[test]
    fn test_activation_of_unknown_or_spacer_is_none() {
        let store = NoteStore::new();
        store.load(vec![note(1, 1)]);
        assert_eq!(store.activate(99), None);
        assert_eq!(store.activate(SPACER_NOTE_ID), None);
        assert_eq!(store.active().get_untracked(), None);
    }

    #[test]
    fn test_upsert_local_merges_partial_fields() {
        let store = NoteStore::new();
        store.load(vec![note(1, 1)]);

        assert!(store.upsert_local(1, &NotePatch::position(80.0, 120.0)));
        assert!(store.upsert_local(1, &NotePatch::color("#B5EBEB".to_string())));

        let n = store.snapshot(1).expect("note");
        assert_eq!((n.x, n.y), (80.0, 120.0));
        assert_eq!(n.color, "#B5EBEB");
        assert_eq!(n.width, 220.0);

        assert!(!store.upsert_local(99, &NotePatch::height(50.0)));
    }

    #[test]
    fn test_remove_clears_active_selection() {
        let store = NoteStore::new();
        store.load(vec![note(1, 1), note(2, 2)]);
        store.activate(1);
        store.remove(1);
        assert_eq!(store.active().get_untracked(), None);
        assert_eq!(store.len(), 1);

        // Removing an inactive note leaves selection alone.
        store.activate(2);
        store.remove(99);
        assert_eq!(store.active().get_untracked(), Some(2));
    }

    #[test]
    fn test_insert_advances_mark_past_preloaded_z() {
        let store = NoteStore::new();
        store.load(vec![note(1, 3)]);
        store.insert(note(2, 12));

        assert_eq!(store.activate(1), Some(13));
    }

    #[test]
    fn test_insert_rejects_spacer_and_duplicates() {
        let store = NoteStore::new();
        store.load(vec![note(1, 1)]);
        store.insert(Note::spacer());
        store.insert(note(1, 5));
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot(1).map(|n| n.z_index), Some(1));
    }
}
