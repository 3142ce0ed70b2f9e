use glam::Vec3;
use shared::ObjectId;

/// How an object is tinted in the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    None,
    /// Selected, but not the most recent pick
    Secondary,
    /// The most recently selected object
    Primary,
}

/// Object selection (supports multi-select)
#[derive(Debug, Default)]
pub struct SelectionSet {
    /// Selected object IDs (in order of selection, no duplicates)
    selected: Vec<ObjectId>,
}

impl SelectionSet {
    /// Primary (most recently selected) object
    pub fn primary(&self) -> Option<&ObjectId> {
        self.selected.last()
    }

    /// All selected objects
    pub fn all(&self) -> &[ObjectId] {
        &self.selected
    }

    /// Check if an object is selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Append an object; returns false if it was already selected
    pub fn push(&mut self, id: ObjectId) -> bool {
        if self.is_selected(&id) {
            return false;
        }
        self.selected.push(id);
        true
    }

    /// Remove an object; returns false if it was not selected
    pub fn remove(&mut self, id: &str) -> bool {
        match self.selected.iter().position(|s| s == id) {
            Some(pos) => {
                self.selected.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Toggle selection (Ctrl+click behavior); returns true if now selected
    pub fn toggle(&mut self, id: ObjectId) -> bool {
        if self.remove(&id) {
            false
        } else {
            self.selected.push(id);
            true
        }
    }

    /// Clear all selection
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Number of selected objects
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn highlight(&self, id: &str) -> Highlight {
        match self.primary() {
            Some(primary) if primary == id => Highlight::Primary,
            _ if self.is_selected(id) => Highlight::Secondary,
            _ => Highlight::None,
        }
    }

    /// Middle of the axis-aligned box spanned by the selected positions.
    ///
    /// This is `(min + max) / 2` per axis, not the mean of the positions.
    /// Objects the lookup cannot place are skipped; `None` if nothing remains.
    pub fn bounds_center(&self, position_of: impl Fn(&str) -> Option<Vec3>) -> Option<Vec3> {
        let mut bounds: Option<(Vec3, Vec3)> = None;
        for p in self.selected.iter().filter_map(|id| position_of(id)) {
            bounds = Some(match bounds {
                None => (p, p),
                Some((min, max)) => (min.min(p), max.max(p)),
            });
        }
        bounds.map(|(min, max)| (min + max) * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_empty() {
        let s = SelectionSet::default();
        assert!(s.primary().is_none());
        assert!(s.all().is_empty());
        assert_eq!(s.count(), 0);
    }

    #[test]
    fn test_push_rejects_duplicates() {
        let mut s = SelectionSet::default();
        assert!(s.push("a".to_string()));
        assert!(!s.push("a".to_string()));
        assert_eq!(s.count(), 1);
    }

    #[test]
    fn test_primary_returns_last() {
        let mut s = SelectionSet::default();
        s.push("a".to_string());
        s.push("b".to_string());
        s.push("c".to_string());
        assert_eq!(s.primary(), Some(&"c".to_string()));
    }

    #[test]
    fn test_toggle_add_and_remove() {
        let mut s = SelectionSet::default();
        s.push("a".to_string());
        assert!(s.toggle("b".to_string()));
        assert_eq!(s.count(), 2);
        assert!(!s.toggle("a".to_string()));
        assert_eq!(s.all(), &["b".to_string()]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut s = SelectionSet::default();
        s.push("a".to_string());
        assert!(!s.remove("zz"));
        assert_eq!(s.count(), 1);
    }

    #[test]
    fn test_all_preserves_order() {
        let mut s = SelectionSet::default();
        s.push("a".to_string());
        s.toggle("b".to_string());
        s.toggle("c".to_string());
        assert_eq!(s.all(), &["a".to_string(), "b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_highlight_primary_vs_secondary() {
        let mut s = SelectionSet::default();
        s.push("a".to_string());
        s.push("b".to_string());
        assert_eq!(s.highlight("b"), Highlight::Primary);
        assert_eq!(s.highlight("a"), Highlight::Secondary);
        assert_eq!(s.highlight("c"), Highlight::None);
    }

    #[test]
    fn test_bounds_center_is_box_midpoint() {
        let mut s = SelectionSet::default();
        s.push("a".to_string());
        s.push("b".to_string());
        s.push("c".to_string());
        let center = s
            .bounds_center(|id| match id {
                "a" => Some(Vec3::new(0.0, 0.0, 0.0)),
                "b" => Some(Vec3::new(1.0, 0.0, 0.0)),
                "c" => Some(Vec3::new(10.0, 4.0, -2.0)),
                _ => None,
            })
            .unwrap();
        // Mean would be x = 11/3; the box midpoint is 5.
        assert_eq!(center, Vec3::new(5.0, 2.0, -1.0));
    }

    #[test]
    fn test_bounds_center_empty() {
        let s = SelectionSet::default();
        assert!(s.bounds_center(|_| Some(Vec3::ONE)).is_none());
    }

    #[test]
    fn test_clear() {
        let mut s = SelectionSet::default();
        s.push("a".to_string());
        s.toggle("b".to_string());
        s.clear();
        assert!(s.is_empty());
        assert!(s.primary().is_none());
    }
}
