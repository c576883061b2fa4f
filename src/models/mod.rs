use serde::{Deserialize, Serialize};

pub(crate) type NoteId = i64;

/// The backend assigns ids starting at 1, so 0 is safe for the
/// non-persisted spacer that pads out the scrollable surface.
pub(crate) const SPACER_NOTE_ID: NoteId = 0;

pub(crate) const DEFAULT_NOTE_WIDTH: f64 = 220.0;
pub(crate) const DEFAULT_NOTE_HEIGHT: f64 = 15.0;
pub(crate) const DEFAULT_NOTE_COLOR: &str = "#FFF59D";
pub(crate) const DEFAULT_BOARD_COLOR: &str = "#FFFFFF";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Board {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default = "default_true")]
    pub snapping: bool,
}

fn default_true() -> bool {
    true
}

impl Board {
    pub fn background(&self) -> String {
        self.background_color
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BOARD_COLOR.to_string())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Note {
    pub id: NoteId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,

    /// Opaque on the wire; locally a JSON-serialized block document
    /// (see `richtext`). Legacy plain-text content is tolerated.
    pub content: String,

    pub z_index: i64,

    /// Spacer sentinel. Never serialized, never persisted, never interactive.
    #[serde(skip)]
    pub is_spacer: bool,
}

impl Note {
    /// Invisible 1x1 note far past the content so the surface stays scrollable.
    pub fn spacer() -> Self {
        Self {
            id: SPACER_NOTE_ID,
            x: 2000.0,
            y: 2000.0,
            width: 1.0,
            height: 1.0,
            color: "transparent".to_string(),
            content: String::new(),
            z_index: 0,
            is_spacer: true,
        }
    }
}

/// Sparse note update. Only the populated fields hit the wire, so a
/// geometry patch never clobbers a content write racing alongside it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
}

impl NotePatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn content(content: String) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    pub fn height(height: f64) -> Self {
        Self {
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn color(color: String) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    pub fn z_index(z: i64) -> Self {
        Self {
            z_index: Some(z),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Lay `other` over `self`; later values win per field.
    pub fn merge(&mut self, other: Self) {
        if other.x.is_some() {
            self.x = other.x;
        }
        if other.y.is_some() {
            self.y = other.y;
        }
        if other.width.is_some() {
            self.width = other.width;
        }
        if other.height.is_some() {
            self.height = other.height;
        }
        if other.color.is_some() {
            self.color = other.color;
        }
        if other.content.is_some() {
            self.content = other.content;
        }
        if other.z_index.is_some() {
            self.z_index = other.z_index;
        }
    }

    /// Optimistic local application, mirrors what the backend will do.
    pub fn apply_to(&self, note: &mut Note) {
        if let Some(x) = self.x {
            note.x = x;
        }
        if let Some(y) = self.y {
            note.y = y;
        }
        if let Some(w) = self.width {
            note.width = w;
        }
        if let Some(h) = self.height {
            note.height = h;
        }
        if let Some(c) = &self.color {
            note.color = c.clone();
        }
        if let Some(c) = &self.content {
            note.content = c.clone();
        }
        if let Some(z) = self.z_index {
            note.z_index = z;
        }
    }
}

/// Device-local copy slot for note copy/paste; survives board switches.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct ClipboardNote {
    pub width: f64,
    pub height: f64,
    pub color: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_deserializes_from_backend_shape() {
        let json = r##"{
            "id": 7,
            "content": "hello",
            "x": 50.0,
            "y": 60.5,
            "width": 220,
            "height": 150,
            "color": "#FFF59D",
            "z_index": 3
        }"##;
        let n: Note = serde_json::from_str(json).expect("note should parse");
        assert_eq!(n.id, 7);
        assert_eq!(n.y, 60.5);
        assert_eq!(n.z_index, 3);
        assert!(!n.is_spacer);
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = NotePatch::position(40.0, 80.0);
        let v = serde_json::to_value(&patch).expect("should serialize");
        let obj = v.as_object().expect("object");
        assert_eq!(obj.len(), 2);
        assert_eq!(v["x"], 40.0);
        assert_eq!(v["y"], 80.0);
    }

    #[test]
    fn test_patch_merge_latest_value_wins() {
        let mut a = NotePatch::content("first".to_string());
        a.merge(NotePatch::content("second".to_string()));
        a.merge(NotePatch::height(99.0));
        assert_eq!(a.content.as_deref(), Some("second"));
        assert_eq!(a.height, Some(99.0));
        assert!(a.x.is_none());
    }

    #[test]
    fn test_patch_apply_to_leaves_other_fields() {
        let mut n = Note::spacer();
        n.is_spacer = false;
        NotePatch::position(12.0, 34.0).apply_to(&mut n);
        assert_eq!((n.x, n.y), (12.0, 34.0));
        assert_eq!(n.width, 1.0);
        assert_eq!(n.color, "transparent");
    }

    #[test]
    fn test_board_background_fallback() {
        let b = Board {
            id: 1,
            name: "b".to_string(),
            background_color: None,
            snapping: true,
        };
        assert_eq!(b.background(), DEFAULT_BOARD_COLOR);

        let b2 = Board {
            background_color: Some("#E6F6FF".to_string()),
            ..b
        };
        assert_eq!(b2.background(), "#E6F6FF");
    }

    #[test]
    fn test_board_snapping_defaults_on() {
        let b: Board = serde_json::from_str(r#"{"id":1,"name":"b"}"#).expect("board");
        assert!(b.snapping);
    }
}
