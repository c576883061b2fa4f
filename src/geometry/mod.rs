use crate::models::NoteId;

/// Grid pitch in CSS pixels; also the snap activation radius.
pub(crate) const SNAP_GRID_SIZE: f64 = 20.0;

/// Resize can never pinch a note below this width.
pub(crate) const MIN_NOTE_WIDTH: f64 = 40.0;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub(crate) struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Per-board settings read at gesture end, owned by the board record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BoardContext {
    pub snap_enabled: bool,
    pub grid_size: f64,
}

impl Default for BoardContext {
    fn default() -> Self {
        Self {
            snap_enabled: true,
            grid_size: SNAP_GRID_SIZE,
        }
    }
}

/// Notes may hang off the bottom/right of the board, but the top-left
/// corner stays inside it.
pub(crate) fn clamp_origin(p: Point) -> Point {
    Point::new(p.x.max(0.0), p.y.max(0.0))
}

fn snap_axis(v: f64, grid: f64, radius: f64) -> f64 {
    if grid <= 0.0 {
        return v;
    }
    let snapped = (v / grid).round() * grid;
    if (v - snapped).abs() <= radius {
        snapped
    } else {
        v
    }
}

/// Quantize the top-left corner to the grid. The activation radius equals
/// the grid pitch, so with the default settings every release snaps.
pub(crate) fn snap_point(p: Point, ctx: &BoardContext) -> Point {
    if !ctx.snap_enabled {
        return p;
    }
    Point::new(
        snap_axis(p.x, ctx.grid_size, ctx.grid_size),
        snap_axis(p.y, ctx.grid_size, ctx.grid_size),
    )
}

/// Final position for a completed drag: clamp first, then snap.
pub(crate) fn resolve_drag_end(origin: Point, delta: Point, ctx: &BoardContext) -> Point {
    snap_point(clamp_origin(origin.offset(delta.x, delta.y)), ctx)
}

/// Final width for a completed right-edge resize.
pub(crate) fn resolve_resize_end(start_width: f64, dx: f64, ctx: &BoardContext) -> f64 {
    let w = (start_width + dx).max(MIN_NOTE_WIDTH);
    if ctx.snap_enabled {
        snap_axis(w, ctx.grid_size, ctx.grid_size).max(MIN_NOTE_WIDTH)
    } else {
        w
    }
}

/// Where on the board the next note lands. Owned here rather than as an
/// ambient global so tests can build fresh sessions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PointerSession {
    pub last_click: Point,
}

impl Default for PointerSession {
    fn default() -> Self {
        Self {
            last_click: Point::new(100.0, 100.0),
        }
    }
}

impl PointerSession {
    pub fn record_click(&mut self, p: Point) {
        self.last_click = clamp_origin(p);
    }
}

/// Exclusive in-flight pointer gesture. The rendered note tracks the
/// accumulated delta continuously; nothing is written anywhere until the
/// gesture finishes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Gesture {
    Idle,
    Drag {
        id: NoteId,
        origin: Point,
        delta: Point,
    },
    Resize {
        id: NoteId,
        start_width: f64,
        dx: f64,
    },
}

/// Committed outcome of a finished gesture, ready for store + sync.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum GestureEnd {
    Moved { id: NoteId, position: Point },
    Resized { id: NoteId, width: f64 },
}

impl Gesture {
    pub fn begin_drag(id: NoteId, origin: Point) -> Self {
        Self::Drag {
            id,
            origin,
            delta: Point::default(),
        }
    }

    pub fn begin_resize(id: NoteId, start_width: f64) -> Self {
        Self::Resize {
            id,
            start_width,
            dx: 0.0,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Accumulate pointer movement into the in-flight gesture.
    pub fn track(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Idle => {}
            Self::Drag { delta, .. } => {
                delta.x += dx;
                delta.y += dy;
            }
            Self::Resize { dx: acc, .. } => *acc += dx,
        }
    }

    /// Rendered offset from the note's stored position while dragging.
    pub fn drag_offset(&self, note_id: NoteId) -> Option<Point> {
        match self {
            Self::Drag { id, delta, .. } if *id == note_id => Some(*delta),
            _ => None,
        }
    }

    /// Rendered width override while resizing.
    pub fn resize_width(&self, note_id: NoteId) -> Option<f64> {
        match self {
            Self::Resize { id, start_width, dx } if *id == note_id => {
                Some((start_width + dx).max(MIN_NOTE_WIDTH))
            }
            _ => None,
        }
    }

    /// Resolve against board settings and reset to idle.
    pub fn finish(&mut self, ctx: &BoardContext) -> Option<GestureEnd> {
        let out = match *self {
            Self::Idle => None,
            Self::Drag { id, origin, delta } => Some(GestureEnd::Moved {
                id,
                position: resolve_drag_end(origin, delta, ctx),
            }),
            Self::Resize { id, start_width, dx } => Some(GestureEnd::Resized {
                id,
                width: resolve_resize_end(start_width, dx, ctx),
            }),
        };
        *self = Self::Idle;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapping() -> BoardContext {
        BoardContext::default()
    }

    fn free() -> BoardContext {
        BoardContext {
            snap_enabled: false,
            grid_size: SNAP_GRID_SIZE,
        }
    }

    #[test]
    fn test_clamp_only_top_left() {
        assert_eq!(clamp_origin(Point::new(-5.0, 3.0)), Point::new(0.0, 3.0));
        assert_eq!(
            clamp_origin(Point::new(4000.0, 9000.0)),
            Point::new(4000.0, 9000.0)
        );
    }

    #[test]
    fn test_snap_round_trip_grid_20() {
        // Drag from (13,7) by (9,9) with gridSize=20 must land on multiples of 20.
        let end = resolve_drag_end(Point::new(13.0, 7.0), Point::new(9.0, 9.0), &snapping());
        assert_eq!(end.x % 20.0, 0.0);
        assert_eq!(end.y % 20.0, 0.0);
        assert_eq!(end, Point::new(20.0, 20.0));
    }

    #[test]
    fn test_snap_disabled_keeps_exact_position() {
        let end = resolve_drag_end(Point::new(13.0, 7.0), Point::new(9.0, 9.0), &free());
        assert_eq!(end, Point::new(22.0, 16.0));
    }

    #[test]
    fn test_snap_idempotent() {
        let once = snap_point(Point::new(31.0, 49.0), &snapping());
        let twice = snap_point(once, &snapping());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_drag_final_position_ignores_intermediate_moves() {
        let mut g = Gesture::begin_drag(9, Point::new(13.0, 7.0));
        // Many intermediate moves; only the accumulated total matters.
        g.track(100.0, 100.0);
        g.track(-100.0, -100.0);
        g.track(4.0, 5.0);
        g.track(5.0, 4.0);
        let end = g.finish(&snapping());
        assert_eq!(
            end,
            Some(GestureEnd::Moved {
                id: 9,
                position: Point::new(20.0, 20.0),
            })
        );
        assert!(g.is_idle());
    }

    #[test]
    fn test_drag_past_origin_clamps_before_snap() {
        let mut g = Gesture::begin_drag(1, Point::new(5.0, 5.0));
        g.track(-50.0, -3.0);
        let end = g.finish(&free());
        assert_eq!(
            end,
            Some(GestureEnd::Moved {
                id: 1,
                position: Point::new(0.0, 2.0),
            })
        );
    }

    #[test]
    fn test_resize_respects_min_width() {
        let mut g = Gesture::begin_resize(2, 220.0);
        g.track(-500.0, 0.0);
        let end = g.finish(&free());
        assert_eq!(
            end,
            Some(GestureEnd::Resized {
                id: 2,
                width: MIN_NOTE_WIDTH,
            })
        );
    }

    #[test]
    fn test_resize_snaps_width() {
        let mut g = Gesture::begin_resize(2, 220.0);
        g.track(13.0, 0.0);
        let end = g.finish(&snapping());
        assert_eq!(end, Some(GestureEnd::Resized { id: 2, width: 240.0 }));
    }

    #[test]
    fn test_drag_offset_only_for_dragged_note() {
        let mut g = Gesture::begin_drag(3, Point::default());
        g.track(7.0, 8.0);
        assert_eq!(g.drag_offset(3), Some(Point::new(7.0, 8.0)));
        assert_eq!(g.drag_offset(4), None);
        assert_eq!(g.resize_width(3), None);
    }

    #[test]
    fn test_idle_finish_is_none() {
        let mut g = Gesture::Idle;
        assert_eq!(g.finish(&snapping()), None);
    }

    #[test]
    fn test_pointer_session_clamps_clicks() {
        let mut s = PointerSession::default();
        assert_eq!(s.last_click, Point::new(100.0, 100.0));
        s.record_click(Point::new(-4.0, 250.0));
        assert_eq!(s.last_click, Point::new(0.0, 250.0));
    }
}
