// Theme loader backed by Xcursor files on disk

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use xcursor::parser::{Image, parse_xcursor};

use super::{DecodedCursor, DecodedFrame, ThemeLoader};
use crate::config::{Config, env_search_paths};

#[derive(Debug, Clone)]
pub struct XcursorLoader {
    search_paths: Vec<PathBuf>,
}

impl XcursorLoader {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    pub fn from_env() -> Self {
        Self::new(env_search_paths())
    }

    pub fn from_config(config: &Config) -> Self {
        if config.search_paths.is_empty() {
            Self::from_env()
        } else {
            Self::new(config.search_paths.clone())
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Every file under `<search path>/<theme>/cursors/`, in search path order.
    fn cursor_files(&self, theme: &str) -> Vec<(String, PathBuf)> {
        let mut files = Vec::new();
        if theme.is_empty() || theme.contains('/') {
            return files;
        }

        for dir in &self.search_paths {
            let cursors_dir = dir.join(theme).join("cursors");
            if !cursors_dir.is_dir() {
                continue;
            }

            // Following links resolves alias symlinks to the file they name.
            for entry in WalkDir::new(&cursors_dir)
                .min_depth(1)
                .max_depth(1)
                .follow_links(true)
                .sort_by_file_name()
            {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("Skipping entry in {}: {}", cursors_dir.display(), e);
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                if let Some(name) = entry.file_name().to_str() {
                    files.push((name.to_string(), entry.path().to_path_buf()));
                }
            }
        }

        debug!("Found {} cursor files for theme {}", files.len(), theme);
        files
    }
}

impl ThemeLoader for XcursorLoader {
    type Cursors = XcursorCursors;

    fn load_theme(&self, name: &str, size: u32) -> XcursorCursors {
        XcursorCursors {
            files: self.cursor_files(name).into_iter(),
            size,
        }
    }
}

/// Lazily parses one cursor file per step.
pub struct XcursorCursors {
    files: std::vec::IntoIter<(String, PathBuf)>,
    size: u32,
}

impl Iterator for XcursorCursors {
    type Item = DecodedCursor;

    fn next(&mut self) -> Option<DecodedCursor> {
        for (name, path) in self.files.by_ref() {
            match load_cursor_file(name, &path, self.size) {
                Ok(cursor) => return Some(cursor),
                Err(e) => warn!("Skipping cursor {}: {:#}", path.display(), e),
            }
        }
        None
    }
}

fn load_cursor_file(name: String, path: &Path, size: u32) -> Result<DecodedCursor> {
    let data = fs::read(path).context("Failed to read cursor file")?;
    let images = parse_xcursor(&data).context("Failed to parse X11 cursor file")?;
    let frames = nearest_frames(size, images);
    if frames.is_empty() {
        bail!("no images in cursor file");
    }
    Ok(DecodedCursor { name, frames })
}

/// Frames of the nominal size closest to `size`, in file order.
fn nearest_frames(size: u32, images: Vec<Image>) -> Vec<DecodedFrame> {
    let Some(nominal) = images
        .iter()
        .map(|image| image.size)
        .min_by_key(|nominal| nominal.abs_diff(size))
    else {
        return Vec::new();
    };

    images
        .into_iter()
        .filter(|image| image.size == nominal)
        .map(|image| DecodedFrame {
            width: image.width,
            height: image.height,
            hotspot_x: image.xhot,
            hotspot_y: image.yhot,
            delay_ms: image.delay,
            pixels: image.pixels_rgba,
        })
        .collect()
}
