//! Timeline files
//!
//! A timeline file describes one complete run: where the pool lives, which
//! images are pinned where, which images are banned, and how to render the
//! result. Everything except the pool and the anchors has a default.
//!
//! ```json
//! {
//!   "pool": "pool.json",
//!   "anchors": [
//!     { "position": 0, "path": "./images/DSCF9369.jpg" },
//!     { "position": 10, "path": "./images/DSCF9435.jpg" }
//!   ],
//!   "exclude": ["./images/AAA036.jpg"],
//!   "space": "lch",
//!   "on_exhausted": "partial",
//!   "columns": 3
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::color::GradientSpace;
use crate::layout::{GridLayout, DEFAULT_CELL_SIZE, DEFAULT_COLUMNS};
use crate::pool::{find_candidate, load_pool};
use crate::timeline::{Anchor, Candidate, ExhaustionPolicy, Interpolator};
use crate::{ChromalineError, Result};

/// An anchor as written in a timeline file: a position and an image path
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnchorSpec {
    pub position: usize,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimelineConfig {
    /// Pool file; relative paths resolve against the timeline file's directory
    pub pool: PathBuf,
    pub anchors: Vec<AnchorSpec>,
    /// Images that must not be used as fills
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub space: GradientSpace,
    #[serde(default)]
    pub on_exhausted: ExhaustionPolicy,
    #[serde(default = "default_columns")]
    pub columns: usize,
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,
}

fn default_columns() -> usize {
    DEFAULT_COLUMNS
}

fn default_cell_size() -> u32 {
    DEFAULT_CELL_SIZE
}

impl TimelineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            ChromalineError::ConfigError(format!("Invalid timeline file: {}", e))
        })
    }

    /// Read a timeline file, resolving a relative `pool` against its directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_json(&content)?;

        if config.pool.is_relative() {
            if let Some(dir) = path.parent() {
                config.pool = dir.join(&config.pool);
            }
        }

        Ok(config)
    }

    pub fn load_pool(&self) -> Result<Vec<Candidate>> {
        load_pool(&self.pool)
    }

    /// Resolve every anchor path against `pool`.
    ///
    /// Fails with `UnknownAnchor` for a path the pool doesn't contain.
    pub fn anchors(&self, pool: &[Candidate]) -> Result<Vec<Anchor>> {
        resolve_anchors(&self.anchors, pool)
    }

    pub fn interpolator(&self) -> Interpolator {
        Interpolator::new()
            .with_space(self.space)
            .with_policy(self.on_exhausted)
            .with_exclusions(self.exclude.iter().cloned())
    }

    pub fn layout(&self) -> Result<GridLayout> {
        GridLayout::new(self.columns, self.cell_size)
    }
}

/// Resolve anchor specs against `pool`.
///
/// The checks that need no pool (anchor count, shared positions, an image
/// pinned twice) run first and in the interpolator's order, so an anchor that
/// is both misplaced and missing reports the same error either way.
pub fn resolve_anchors(specs: &[AnchorSpec], pool: &[Candidate]) -> Result<Vec<Anchor>> {
    if specs.len() < 2 {
        return Err(ChromalineError::InsufficientAnchors(specs.len()));
    }

    let mut sorted: Vec<&AnchorSpec> = specs.iter().collect();
    sorted.sort_by_key(|spec| spec.position);
    if let Some(pair) = sorted.windows(2).find(|p| p[0].position == p[1].position) {
        return Err(ChromalineError::DuplicatePosition(pair[0].position));
    }

    let mut pinned = HashSet::new();
    if let Some(spec) = sorted.iter().find(|spec| !pinned.insert(spec.path.as_str())) {
        return Err(ChromalineError::DuplicateAnchorPath(spec.path.clone()));
    }

    specs
        .iter()
        .map(|spec| {
            find_candidate(pool, &spec.path)
                .map(|c| Anchor::new(spec.position, c.clone()))
                .ok_or_else(|| ChromalineError::UnknownAnchor(spec.path.clone()))
        })
        .collect()
}

impl std::str::FromStr for AnchorSpec {
    type Err = ChromalineError;

    /// Parse the command-line form `POSITION=PATH`.
    fn from_str(s: &str) -> Result<Self> {
        let (position, path) = s.split_once('=').ok_or_else(|| {
            ChromalineError::ConfigError(format!(
                "Anchor '{}' should look like POSITION=PATH",
                s
            ))
        })?;

        let position = position.trim().parse::<usize>().map_err(|e| {
            ChromalineError::ConfigError(format!("Invalid anchor position '{}': {}", position, e))
        })?;

        let path = path.trim();
        if path.is_empty() {
            return Err(ChromalineError::ConfigError(format!(
                "Anchor '{}' has no image path",
                s
            )));
        }

        Ok(AnchorSpec {
            position,
            path: path.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    fn spec(position: usize, path: &str) -> AnchorSpec {
        AnchorSpec {
            position,
            path: path.to_string(),
        }
    }

    fn pool() -> Vec<Candidate> {
        vec![
            Candidate::new("a.jpg", Color::parse("#000000").unwrap()),
            Candidate::new("b.jpg", Color::parse("#ffffff").unwrap()),
        ]
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = TimelineConfig::from_json(
            r#"{"pool": "pool.json", "anchors": [{"position": 0, "path": "a.jpg"}]}"#,
        )
        .unwrap();

        assert_eq!(config.pool, PathBuf::from("pool.json"));
        assert!(config.exclude.is_empty());
        assert_eq!(config.space, GradientSpace::Lch);
        assert_eq!(config.on_exhausted, ExhaustionPolicy::Partial);
        assert_eq!(config.columns, 3);
        assert_eq!(config.cell_size, 50);
    }

    #[test]
    fn test_full_config() {
        let config = TimelineConfig::from_json(
            r#"{
                "pool": "/data/pool.json",
                "anchors": [{"position": 0, "path": "a.jpg"}, {"position": 4, "path": "b.jpg"}],
                "exclude": ["c.jpg"],
                "space": "oklab",
                "on_exhausted": "abort",
                "columns": 5,
                "cell_size": 20
            }"#,
        )
        .unwrap();

        let interpolator = config.interpolator();
        assert_eq!(interpolator.space(), GradientSpace::Oklab);
        assert_eq!(interpolator.policy(), ExhaustionPolicy::Abort);
        assert_eq!(config.layout().unwrap().columns(), 5);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result = TimelineConfig::from_json(r#"{"pool": "p.json", "anchors": [], "colums": 4}"#);
        assert!(matches!(result, Err(ChromalineError::ConfigError(_))));
    }

    #[test]
    fn test_bad_space_is_rejected() {
        let result =
            TimelineConfig::from_json(r#"{"pool": "p.json", "anchors": [], "space": "hsv"}"#);
        assert!(matches!(result, Err(ChromalineError::ConfigError(_))));
    }

    #[test]
    fn test_resolve_anchors() {
        let specs = vec![
            AnchorSpec {
                position: 9,
                path: "b.jpg".to_string(),
            },
            AnchorSpec {
                position: 0,
                path: "a.jpg".to_string(),
            },
        ];
        let anchors = resolve_anchors(&specs, &pool()).unwrap();
        assert_eq!(anchors[0].position, 9);
        assert_eq!(anchors[0].path(), "b.jpg");
        assert_eq!(anchors[1].color(), Color::parse("#000000").unwrap());

        let missing = vec![spec(0, "a.jpg"), spec(1, "zzz.jpg")];
        assert!(matches!(
            resolve_anchors(&missing, &pool()),
            Err(ChromalineError::UnknownAnchor(p)) if p == "zzz.jpg"
        ));
    }

    #[test]
    fn test_resolve_anchors_checks_positions_before_pool() {
        let shared = vec![spec(3, "a.jpg"), spec(3, "missing.jpg")];
        assert!(matches!(
            resolve_anchors(&shared, &pool()),
            Err(ChromalineError::DuplicatePosition(3))
        ));

        let pinned_twice = vec![spec(0, "missing.jpg"), spec(4, "missing.jpg")];
        assert!(matches!(
            resolve_anchors(&pinned_twice, &pool()),
            Err(ChromalineError::DuplicateAnchorPath(p)) if p == "missing.jpg"
        ));

        assert!(matches!(
            resolve_anchors(&[spec(0, "missing.jpg")], &pool()),
            Err(ChromalineError::InsufficientAnchors(1))
        ));
    }

    #[test]
    fn test_anchor_spec_from_str() {
        let spec: AnchorSpec = "10=./images/DSCF9435.jpg".parse().unwrap();
        assert_eq!(spec.position, 10);
        assert_eq!(spec.path, "./images/DSCF9435.jpg");

        assert!("./images/a.jpg".parse::<AnchorSpec>().is_err());
        assert!("-1=a.jpg".parse::<AnchorSpec>().is_err());
        assert!("3=".parse::<AnchorSpec>().is_err());
    }

    #[test]
    fn test_from_file_resolves_relative_pool() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("pool.json"),
            r##"[{"path": "a.jpg", "color": "#000000"}, {"path": "b.jpg", "color": "#ffffff"}]"##,
        )
        .unwrap();
        let timeline = dir.path().join("timeline.json");
        fs::write(
            &timeline,
            r#"{"pool": "pool.json", "anchors": [{"position": 0, "path": "a.jpg"}, {"position": 1, "path": "b.jpg"}]}"#,
        )
        .unwrap();

        let config = TimelineConfig::from_file(&timeline).unwrap();
        assert_eq!(config.pool, dir.path().join("pool.json"));

        let pool = config.load_pool().unwrap();
        let anchors = config.anchors(&pool).unwrap();
        let assignment = config.interpolator().interpolate(&anchors, &pool).unwrap();
        assert_eq!(assignment.paths(), vec!["a.jpg", "b.jpg"]);
    }
}
