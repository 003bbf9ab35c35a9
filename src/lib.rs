/*!
# chromaline - perceptual mosaic timelines

chromaline arranges a pool of images into a timeline. A few images are pinned
("anchored") at fixed positions, and every position between two anchors is
filled with the unused pool image whose average color is closest to a smooth
perceptual gradient between the anchor colors.

## Example

```rust
use chromaline::{interpolate, Anchor, Candidate, Color};

let black = Candidate::new("black.jpg", Color::parse("#000000").unwrap());
let white = Candidate::new("white.jpg", Color::parse("#ffffff").unwrap());
let grey = Candidate::new("grey.jpg", Color::parse("#777777").unwrap());
let pool = vec![black.clone(), grey, white.clone()];

let anchors = vec![Anchor::new(0, black), Anchor::new(2, white)];
let assignment = interpolate(&anchors, &pool).unwrap();

assert_eq!(assignment.len(), 3);
assert_eq!(assignment.paths(), vec!["black.jpg", "grey.jpg", "white.jpg"]);
```

## Architecture

- [`color`] - hex parsing, CIE L\*a\*b\* conversion, ΔE 1976 distance, gradients
- [`timeline`] - anchors, exclusion set and the greedy gradient interpolator
- [`pool`] - pool files, image manifests and color resolution
- [`config`] - timeline files describing a complete run
- [`layout`] - grid placement of timeline positions
- [`writer`] - JSON and text renderers for assignments
*/

pub mod color;
pub mod config;
pub mod layout;
pub mod pool;
pub mod timeline;
pub mod writer;

pub use color::{distance, gradient_steps, Color, GradientSpace};
pub use timeline::{
    find_nearest, interpolate, Anchor, Assignment, Candidate, ExclusionSet, ExhaustionPolicy,
    Interpolator, Placement, Slot,
};

/// Crate version, as reported by the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Main error type for chromaline operations
#[derive(Debug, thiserror::Error)]
pub enum ChromalineError {
    #[error("Invalid color format: {0}")]
    InvalidColorFormat(String),

    #[error("Invalid gradient range: {0} steps requested, at least 1 is required")]
    InvalidRange(usize),

    #[error("At least two anchors are required, got {0}")]
    InsufficientAnchors(usize),

    #[error("More than one anchor is pinned at position {0}")]
    DuplicatePosition(usize),

    #[error("Image '{0}' is pinned by more than one anchor")]
    DuplicateAnchorPath(String),

    #[error("Anchor image '{0}' is not in the candidate pool")]
    UnknownAnchor(String),

    #[error("Candidate pool exhausted, no image left for positions {positions:?}")]
    PoolExhausted { positions: Vec<usize> },

    #[error("Writer error: {0}")]
    WriterError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChromalineError>;
