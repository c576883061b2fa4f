/// CSS pixel length, rounded the way the backend stores geometry.
pub(crate) fn px(v: f64) -> String {
    format!("{}px", v.round() as i64)
}

/// Default name for a freshly created board: "Board 1", "Board 2", ...
pub(crate) fn next_board_name(existing: usize) -> String {
    format!("Board {}", existing + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_rounds_to_whole_pixels() {
        assert_eq!(px(12.0), "12px");
        assert_eq!(px(12.6), "13px");
        assert_eq!(px(-0.2), "0px");
    }

    #[test]
    fn test_next_board_name() {
        assert_eq!(next_board_name(0), "Board 1");
        assert_eq!(next_board_name(3), "Board 4");
    }
}
