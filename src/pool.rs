//! Candidate pool loading
//!
//! The interpolator only ever sees a fully resolved pool: every candidate
//! already carries its average color. Getting there is a two step affair that
//! lives outside the engine:
//!
//! 1. A scanner ([`scan_directory`]) writes a manifest, a flat JSON array of
//!    image file names. [`parse_manifest`] turns it into image paths.
//! 2. A color sampler works out each image's average color. Whatever does the
//!    sampling is exposed through the [`ColorSource`] trait, and
//!    [`resolve_pool`] only returns once every path has been asked.
//!
//! Pools that were resolved earlier are stored as JSON arrays of
//! `{"path": ..., "color": "#rrggbb"}` objects and read with [`load_pool`].
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use chromaline::pool::{parse_manifest, resolve_pool};
//! use chromaline::Color;
//!
//! let paths = parse_manifest(r#"["a.jpg", "notes.txt", "b.png"]"#, "./images/").unwrap();
//! assert_eq!(paths, vec!["./images/a.jpg", "./images/b.png"]);
//!
//! let mut colors = HashMap::new();
//! colors.insert("./images/a.jpg".to_string(), Color::parse("#123456").unwrap());
//!
//! // b.png has no color yet and is left out
//! let pool = resolve_pool(&paths, &colors);
//! assert_eq!(pool.len(), 1);
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::color::Color;
use crate::timeline::Candidate;
use crate::{ChromalineError, Result};

/// Prefix joined onto manifest file names when none is given
pub const DEFAULT_IMAGE_PREFIX: &str = "./images/";

/// File extensions the scanner treats as images
const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png"];

/// Provides the average color of an image.
///
/// Implementations wrap whatever sampled the images. `None` means the color is
/// not known (the image failed to decode, or was never sampled).
pub trait ColorSource {
    fn color_of(&self, path: &str) -> Option<Color>;
}

impl ColorSource for HashMap<String, Color> {
    fn color_of(&self, path: &str) -> Option<Color> {
        self.get(path).copied()
    }
}

impl<F> ColorSource for F
where
    F: Fn(&str) -> Option<Color>,
{
    fn color_of(&self, path: &str) -> Option<Color> {
        self(path)
    }
}

/// Build the pool from `paths`, in the same order, asking `source` for each
/// color.
///
/// Paths without a color, and repeats of a path already in the pool, are
/// skipped with a warning rather than failing the whole pool.
pub fn resolve_pool<S: ColorSource + ?Sized>(paths: &[String], source: &S) -> Vec<Candidate> {
    let mut pool = Vec::with_capacity(paths.len());
    let mut seen = HashSet::new();

    for path in paths {
        if !seen.insert(path.as_str()) {
            warn!(path = %path, "Image listed more than once, keeping the first");
            continue;
        }
        match source.color_of(path) {
            Some(color) => pool.push(Candidate::new(path.clone(), color)),
            None => warn!(path = %path, "No average color for image, leaving it out of the pool"),
        }
    }

    info!(
        resolved = pool.len(),
        skipped = paths.len() - pool.len(),
        "Resolved candidate pool"
    );
    pool
}

/// Image paths listed in a manifest.
///
/// The manifest is a JSON array of file names. Names without a lowercase image
/// extension (`.jpeg`, `.jpg`, `.png`) are dropped; the rest are joined onto
/// `prefix` in manifest order.
pub fn parse_manifest(json: &str, prefix: &str) -> Result<Vec<String>> {
    let names: Vec<String> = serde_json::from_str(json)?;

    Ok(names
        .into_iter()
        .filter(|name| is_image(name))
        .map(|name| format!("{}{}", prefix, name))
        .collect())
}

pub fn load_manifest(path: impl AsRef<Path>, prefix: &str) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    parse_manifest(&content, prefix)
}

/// List the image file names in `dir`, sorted by name.
///
/// This is the manifest the pool is built from. The extension filter is the
/// one [`parse_manifest`] applies, so `DSCF0001.JPG` is not an image.
pub fn scan_directory(dir: impl AsRef<Path>) -> Result<Vec<String>> {
    let dir = dir.as_ref();
    let mut names = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) if is_image(&name) => names.push(name),
            Ok(_) => {}
            Err(name) => warn!(name = ?name, "Skipping file with a non UTF-8 name"),
        }
    }

    names.sort();
    info!(dir = %dir.display(), images = names.len(), "Scanned image directory");
    Ok(names)
}

/// Serialize file names as a manifest, the format [`parse_manifest`] reads.
pub fn manifest_to_json(names: &[String]) -> Result<String> {
    Ok(serde_json::to_string(names)?)
}

/// Extensions match case-sensitively: `.PNG` is not an image.
fn is_image(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Parse a resolved pool: a JSON array of `{"path", "color"}` objects.
///
/// Colors must be hex triplets. A path listed twice is a `ConfigError`, since
/// paths are the key the exclusion set works on.
pub fn parse_pool(json: &str) -> Result<Vec<Candidate>> {
    let pool: Vec<Candidate> = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    for candidate in &pool {
        if !seen.insert(candidate.path.as_str()) {
            return Err(ChromalineError::ConfigError(format!(
                "Image '{}' appears more than once in the pool",
                candidate.path
            )));
        }
    }

    Ok(pool)
}

pub fn load_pool(path: impl AsRef<Path>) -> Result<Vec<Candidate>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let pool = parse_pool(&content)?;
    info!(path = %path.display(), candidates = pool.len(), "Loaded candidate pool");
    Ok(pool)
}

/// Serialize a pool in the format [`parse_pool`] reads.
pub fn pool_to_json(pool: &[Candidate]) -> Result<String> {
    Ok(serde_json::to_string_pretty(pool)?)
}

/// Look a candidate up by path.
pub fn find_candidate<'a>(pool: &'a [Candidate], path: &str) -> Option<&'a Candidate> {
    pool.iter().find(|c| c.path == path)
}
