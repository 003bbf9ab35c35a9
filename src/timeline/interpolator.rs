//! Greedy gradient matching between anchors

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::types::{Anchor, Assignment, Candidate, ExclusionSet, Placement, Slot};
use crate::color::{delta_e, Color, GradientSpace};
use crate::{ChromalineError, Result};

/// What to do when the pool runs out before every position is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExhaustionPolicy {
    /// Return the assignment with `Exhausted` slots at the unfilled positions
    #[default]
    Partial,
    /// Fail the whole run with `PoolExhausted`
    Abort,
}

impl fmt::Display for ExhaustionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExhaustionPolicy::Partial => f.write_str("partial"),
            ExhaustionPolicy::Abort => f.write_str("abort"),
        }
    }
}

impl FromStr for ExhaustionPolicy {
    type Err = ChromalineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "partial" => Ok(ExhaustionPolicy::Partial),
            "abort" => Ok(ExhaustionPolicy::Abort),
            other => Err(ChromalineError::ConfigError(format!(
                "Unknown exhaustion policy '{}' (expected partial or abort)",
                other
            ))),
        }
    }
}

/// Fills the gaps between anchors with the pool images closest to a
/// perceptual gradient.
///
/// The interpolator itself is stateless configuration: every call to
/// [`interpolate`](Interpolator::interpolate) starts from a fresh
/// [`ExclusionSet`], so the same inputs always give the same assignment.
#[derive(Debug, Clone, Default)]
pub struct Interpolator {
    space: GradientSpace,
    policy: ExhaustionPolicy,
    exclude: Vec<String>,
}

impl Interpolator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color space the gradient between two anchors is built in
    pub fn with_space(mut self, space: GradientSpace) -> Self {
        self.space = space;
        self
    }

    pub fn with_policy(mut self, policy: ExhaustionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Paths that must never be used as fills, on top of the anchors' own.
    pub fn with_exclusions<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn space(&self) -> GradientSpace {
        self.space
    }

    pub fn policy(&self) -> ExhaustionPolicy {
        self.policy
    }

    /// Build the assignment for `anchors` from `pool`.
    ///
    /// Anchors may come in any order. Every anchor must reference an image in
    /// the pool, and no two anchors may share a position or an image. All of
    /// this is checked before any position is filled.
    ///
    /// # Errors
    ///
    /// - `InsufficientAnchors` if fewer than two anchors are given
    /// - `DuplicatePosition` / `DuplicateAnchorPath` for clashing anchors
    /// - `UnknownAnchor` if an anchor path is missing from the pool
    /// - `PoolExhausted` under [`ExhaustionPolicy::Abort`] when some position
    ///   could not be filled
    pub fn interpolate(&self, anchors: &[Anchor], pool: &[Candidate]) -> Result<Assignment> {
        let anchors = validate_anchors(anchors, pool)?;

        let mut excluded: ExclusionSet = anchors
            .iter()
            .map(|a| a.path())
            .chain(self.exclude.iter().map(String::as_str))
            .collect();

        let first = anchors[0].position;
        let last = anchors[anchors.len() - 1].position;
        let mut slots = Vec::with_capacity(last - first + 1);

        for pair in anchors.windows(2) {
            let (prev, cur) = (pair[0], pair[1]);
            let span = cur.position - prev.position;
            let steps = self.space.steps(prev.color(), cur.color(), span)?;

            debug!(
                from = prev.position,
                to = cur.position,
                start = %prev.color(),
                end = %cur.color(),
                space = %self.space,
                "Interpolating segment"
            );

            slots.push(Slot {
                position: prev.position,
                placement: Placement::Anchor(prev.candidate.clone()),
            });

            for (offset, target) in steps.into_iter().enumerate().skip(1) {
                let position = prev.position + offset;
                let placement = match find_nearest(target, pool, &excluded) {
                    Some(candidate) => {
                        debug!(position, target = %target, path = %candidate.path, "Filled position");
                        excluded.insert(candidate.path.as_str());
                        Placement::Fill {
                            candidate: candidate.clone(),
                            target,
                        }
                    }
                    None => {
                        warn!(position, target = %target, "No unused image left for position");
                        Placement::Exhausted { target }
                    }
                };
                slots.push(Slot {
                    position,
                    placement,
                });
            }
        }

        let latest = anchors[anchors.len() - 1];
        slots.push(Slot {
            position: latest.position,
            placement: Placement::Anchor(latest.candidate.clone()),
        });

        let assignment = Assignment::new(slots);
        let unfilled = assignment.unfilled_positions();
        info!(
            positions = assignment.len(),
            anchors = anchors.len(),
            unfilled = unfilled.len(),
            "Interpolated timeline"
        );

        match self.policy {
            ExhaustionPolicy::Partial => Ok(assignment),
            ExhaustionPolicy::Abort => assignment.into_complete(),
        }
    }
}

/// Interpolate with the default settings: L\*a\*b\* gradients, partial
/// assignments on exhaustion, no extra exclusions.
pub fn interpolate(anchors: &[Anchor], pool: &[Candidate]) -> Result<Assignment> {
    Interpolator::default().interpolate(anchors, pool)
}

/// The pool candidate closest to `target`, skipping excluded paths.
///
/// Only a strictly smaller distance replaces the current best, so on ties the
/// candidate that comes first in the pool wins. `None` when every candidate is
/// excluded.
pub fn find_nearest<'a>(
    target: Color,
    pool: &'a [Candidate],
    excluded: &ExclusionSet,
) -> Option<&'a Candidate> {
    let reference = target.to_perceptual();
    let mut nearest: Option<(&Candidate, f64)> = None;

    for candidate in pool.iter().filter(|c| !excluded.contains(&c.path)) {
        let d = delta_e(&reference, &candidate.color.to_perceptual());
        match nearest {
            Some((_, minimum)) if d >= minimum => {}
            _ => nearest = Some((candidate, d)),
        }
    }

    nearest.map(|(candidate, _)| candidate)
}

/// Sort anchors by position and reject anything that would break the
/// one-image-per-position guarantees. Touches nothing on failure.
fn validate_anchors<'a>(anchors: &'a [Anchor], pool: &[Candidate]) -> Result<Vec<&'a Anchor>> {
    if anchors.len() < 2 {
        return Err(ChromalineError::InsufficientAnchors(anchors.len()));
    }

    let mut sorted: Vec<&Anchor> = anchors.iter().collect();
    sorted.sort_by_key(|a| a.position);

    if let Some(pair) = sorted.windows(2).find(|p| p[0].position == p[1].position) {
        return Err(ChromalineError::DuplicatePosition(pair[0].position));
    }

    let mut pinned = HashSet::new();
    for anchor in &sorted {
        if !pinned.insert(anchor.path()) {
            return Err(ChromalineError::DuplicateAnchorPath(anchor.path().to_string()));
        }
    }

    let known: HashSet<&str> = pool.iter().map(|c| c.path.as_str()).collect();
    if let Some(missing) = sorted.iter().find(|a| !known.contains(a.path())) {
        return Err(ChromalineError::UnknownAnchor(missing.path().to_string()));
    }

    Ok(sorted)
}
