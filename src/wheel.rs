use std::f64::consts::TAU;

use itertools::Itertools;

use crate::selection;

/// Turns raw newline-delimited text into an entry list: each line is trimmed
/// and blank lines are dropped. Order and duplicates are preserved.
pub fn parse_entries(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Inverse of [`parse_entries`] for seeding an editor buffer.
pub fn format_entries(entries: &[String]) -> String {
    entries.iter().join("\n")
}

/// Geometry and contents of one wheel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WheelState {
    entries: Vec<String>,
    slice_width: Option<f64>,
    rotation_angle: f64,
}

impl WheelState {
    pub fn new(entries: Vec<String>) -> Self {
        let mut state = Self::default();
        state.set_entries(entries);
        state
    }

    /// Replaces the entries and recomputes the slice width. The rotation angle
    /// is kept so the wheel does not jump on edits.
    pub fn set_entries(&mut self, entries: Vec<String>) {
        self.slice_width = if entries.is_empty() {
            None
        } else {
            Some(TAU / entries.len() as f64)
        };
        self.entries = entries;
    }

    pub fn advance_angle(&mut self, delta: f64) {
        self.rotation_angle += delta;
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Angular width of one slice in radians, `None` while the wheel is empty.
    pub fn slice_width(&self) -> Option<f64> {
        self.slice_width
    }

    pub fn rotation_angle(&self) -> f64 {
        self.rotation_angle
    }

    /// Absolute start angle of slice `index` as drawn (clockwise, screen space).
    pub fn slice_start(&self, index: usize) -> Option<f64> {
        self.slice_width
            .map(|width| self.rotation_angle + index as f64 * width)
    }

    /// Index of the slice currently under the pointer.
    pub fn selected_index(&self) -> Option<usize> {
        let width = self.slice_width?;
        selection::resolve(self.rotation_angle, width, self.entries.len())
    }

    pub fn selected_entry(&self) -> Option<&str> {
        self.selected_index()
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn names() -> Vec<String> {
        vec!["Alice", "Bob", "Charlie", "Diana"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_entries_trims_and_drops_blank_lines() {
        let parsed = parse_entries("  Alice \n\n\t\nBob\r\n   \nBob\n");
        assert_eq!(parsed, vec!["Alice", "Bob", "Bob"]);
    }

    #[test]
    fn test_parse_entries_empty_input() {
        assert!(parse_entries("").is_empty());
        assert!(parse_entries("\n  \n").is_empty());
    }

    #[test]
    fn test_format_entries_round_trips_parsed_lists() {
        let entries = names();
        assert_eq!(parse_entries(&format_entries(&entries)), entries);
    }

    #[test]
    fn test_slice_width_covers_circle() {
        for n in 1..50 {
            let entries = (0..n).map(|i| i.to_string()).collect();
            let state = WheelState::new(entries);
            let width = state.slice_width().unwrap();
            assert!((width * n as f64 - TAU).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_wheel_has_no_geometry() {
        let state = WheelState::new(vec![]);
        assert!(state.is_empty());
        assert_eq!(state.slice_width(), None);
        assert_eq!(state.slice_start(0), None);
        assert_eq!(state.selected_entry(), None);
    }

    #[test]
    fn test_angle_survives_entry_edits() {
        let mut state = WheelState::new(names());
        state.advance_angle(1.25);
        state.advance_angle(0.5);
        state.set_entries(vec!["Zed".into()]);
        assert!((state.rotation_angle() - 1.75).abs() < 1e-12);
        state.set_entries(vec![]);
        assert!((state.rotation_angle() - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_angle_is_unbounded() {
        let mut state = WheelState::new(names());
        for _ in 0..100 {
            state.advance_angle(TAU);
        }
        assert!(state.rotation_angle() > 600.0);
    }

    #[test]
    fn test_four_names_at_rest_selects_diana() {
        let state = WheelState::new(names());
        assert_eq!(state.slice_width(), Some(FRAC_PI_2));
        assert_eq!(state.selected_entry(), Some("Diana"));
    }

    #[test]
    fn test_slice_start_offsets_by_rotation() {
        let mut state = WheelState::new(names());
        state.advance_angle(0.3);
        let start = state.slice_start(2).unwrap();
        assert!((start - (0.3 + 2.0 * FRAC_PI_2)).abs() < 1e-12);
    }
}
