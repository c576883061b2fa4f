//! Grow-only height fitting for note content.
//!
//! Pasted content can embed media that finishes loading well after the
//! first render, so a content change triggers a short schedule of delayed
//! re-measurements instead of a single one. Only the final pass persists
//! the height; the earlier ones are visual so bursts of typing do not
//! flood the write path.

/// Vertical chrome around the content region (padding + borders).
pub(crate) const NOTE_VERTICAL_CHROME: f64 = 16.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AutofitPass {
    pub delay_ms: i32,
    pub persist: bool,
}

/// Re-measure immediately, after media has had a moment to load, and once
/// more for slow embeds.
pub(crate) fn passes() -> [AutofitPass; 3] {
    [
        AutofitPass {
            delay_ms: 0,
            persist: false,
        },
        AutofitPass {
            delay_ms: 1_000,
            persist: false,
        },
        AutofitPass {
            delay_ms: 5_000,
            persist: true,
        },
    ]
}

/// Height the note needs for `content_height` of rendered content.
pub(crate) fn required_height(content_height: f64) -> f64 {
    (content_height + NOTE_VERTICAL_CHROME).round()
}

/// Grow-only fit: `Some(new_height)` when the content no longer fits,
/// `None` when the current height already accommodates it. Shrinking is
/// reserved for explicit resize.
pub(crate) fn fit_height(content_height: f64, current_height: f64) -> Option<f64> {
    let needed = required_height(content_height);
    if needed > current_height {
        Some(needed)
    } else {
        None
    }
}
