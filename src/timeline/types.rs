//! Value types shared by the interpolator and its consumers

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::{ChromalineError, Result};

/// A pool image: a unique path and its resolved average color
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub path: String,
    pub color: Color,
}

impl Candidate {
    pub fn new(path: impl Into<String>, color: Color) -> Self {
        Self {
            path: path.into(),
            color,
        }
    }
}

/// An image pinned by the caller at a fixed timeline position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub position: usize,
    pub candidate: Candidate,
}

impl Anchor {
    pub fn new(position: usize, candidate: Candidate) -> Self {
        Self {
            position,
            candidate,
        }
    }

    pub fn path(&self) -> &str {
        &self.candidate.path
    }

    pub fn color(&self) -> Color {
        self.candidate.color
    }
}

/// Paths that may no longer be selected during one interpolation run.
///
/// Only grows: there is no way to remove a path once inserted.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    paths: HashSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude a path. Returns `false` if it was already excluded.
    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        self.paths.insert(path.into())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: Into<String>> Extend<S> for ExclusionSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.paths.extend(iter.into_iter().map(Into::into));
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// What ended up at a timeline position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// The caller's pinned image, untouched
    Anchor(Candidate),
    /// The pool image closest to the gradient color `target`
    Fill { candidate: Candidate, target: Color },
    /// No unused image was left to approximate `target`
    Exhausted { target: Color },
}

/// One position of an [`Assignment`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub position: usize,
    pub placement: Placement,
}

impl Slot {
    pub fn candidate(&self) -> Option<&Candidate> {
        match &self.placement {
            Placement::Anchor(candidate) | Placement::Fill { candidate, .. } => Some(candidate),
            Placement::Exhausted { .. } => None,
        }
    }

    pub fn path(&self) -> Option<&str> {
        self.candidate().map(|c| c.path.as_str())
    }

    /// Color of the image placed here, if any
    pub fn color(&self) -> Option<Color> {
        self.candidate().map(|c| c.color)
    }

    /// Color this position was aiming for. Anchors aim for their own color.
    pub fn target(&self) -> Color {
        match &self.placement {
            Placement::Anchor(candidate) => candidate.color,
            Placement::Fill { target, .. } | Placement::Exhausted { target } => *target,
        }
    }

    pub fn is_anchor(&self) -> bool {
        matches!(self.placement, Placement::Anchor(_))
    }

    pub fn is_filled(&self) -> bool {
        !matches!(self.placement, Placement::Exhausted { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self.placement {
            Placement::Anchor(_) => "anchor",
            Placement::Fill { .. } => "fill",
            Placement::Exhausted { .. } => "exhausted",
        }
    }
}

/// The ordered result of one interpolation run.
///
/// Covers every position from the first anchor to the last, one slot each, in
/// ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    slots: Vec<Slot>,
}

impl Assignment {
    pub(crate) fn new(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn first_position(&self) -> Option<usize> {
        self.slots.first().map(|s| s.position)
    }

    pub fn last_position(&self) -> Option<usize> {
        self.slots.last().map(|s| s.position)
    }

    /// Slot at a timeline position
    pub fn get(&self, position: usize) -> Option<&Slot> {
        let first = self.first_position()?;
        position
            .checked_sub(first)
            .and_then(|index| self.slots.get(index))
    }

    /// Paths of all placed images, in position order
    pub fn paths(&self) -> Vec<&str> {
        self.slots.iter().filter_map(Slot::path).collect()
    }

    /// Positions left empty because the pool ran out
    pub fn unfilled_positions(&self) -> Vec<usize> {
        self.slots
            .iter()
            .filter(|s| !s.is_filled())
            .map(|s| s.position)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Slot::is_filled)
    }

    /// Turn any unfilled position into a `PoolExhausted` error.
    pub fn into_complete(self) -> Result<Self> {
        let positions = self.unfilled_positions();
        if positions.is_empty() {
            Ok(self)
        } else {
            Err(ChromalineError::PoolExhausted { positions })
        }
    }
}

impl<'a> IntoIterator for &'a Assignment {
    type Item = &'a Slot;
    type IntoIter = std::slice::Iter<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(path: &str, hex: &str) -> Candidate {
        Candidate::new(path, Color::parse(hex).unwrap())
    }

    fn sample() -> Assignment {
        let target = Color::parse("#808080").unwrap();
        Assignment::new(vec![
            Slot {
                position: 4,
                placement: Placement::Anchor(candidate("a.jpg", "#000000")),
            },
            Slot {
                position: 5,
                placement: Placement::Fill {
                    candidate: candidate("b.jpg", "#7f7f7f"),
                    target,
                },
            },
            Slot {
                position: 6,
                placement: Placement::Exhausted { target },
            },
            Slot {
                position: 7,
                placement: Placement::Anchor(candidate("c.jpg", "#ffffff")),
            },
        ])
    }

    #[test]
    fn test_exclusion_set_only_grows() {
        let mut excluded: ExclusionSet = ["a.jpg"].into_iter().collect();
        assert!(excluded.contains("a.jpg"));
        assert!(!excluded.insert("a.jpg"));
        assert!(excluded.insert("b.jpg"));
        assert_eq!(excluded.len(), 2);
        assert!(!excluded.contains("c.jpg"));
    }

    #[test]
    fn test_slot_accessors() {
        let assignment = sample();
        let fill = assignment.get(5).unwrap();
        assert_eq!(fill.kind(), "fill");
        assert_eq!(fill.path(), Some("b.jpg"));
        assert_eq!(fill.target().to_hex(), "#808080");
        assert_eq!(fill.color().unwrap().to_hex(), "#7f7f7f");

        let anchor = assignment.get(4).unwrap();
        assert!(anchor.is_anchor());
        assert_eq!(anchor.target().to_hex(), "#000000");

        let empty = assignment.get(6).unwrap();
        assert!(!empty.is_filled());
        assert_eq!(empty.path(), None);
    }

    #[test]
    fn test_assignment_lookup_by_position() {
        let assignment = sample();
        assert_eq!(assignment.first_position(), Some(4));
        assert_eq!(assignment.last_position(), Some(7));
        assert!(assignment.get(3).is_none());
        assert!(assignment.get(8).is_none());
        assert_eq!(assignment.get(7).unwrap().path(), Some("c.jpg"));
    }

    #[test]
    fn test_assignment_paths_skip_unfilled() {
        assert_eq!(sample().paths(), vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn test_into_complete_reports_unfilled_positions() {
        let assignment = sample();
        assert!(!assignment.is_complete());
        assert_eq!(assignment.unfilled_positions(), vec![6]);

        match assignment.into_complete() {
            Err(ChromalineError::PoolExhausted { positions }) => assert_eq!(positions, vec![6]),
            other => panic!("expected PoolExhausted, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_assignment() {
        let assignment = Assignment::default();
        assert!(assignment.is_empty());
        assert!(assignment.get(0).is_none());
        assert!(assignment.is_complete());
    }
}
