use log::{debug, info, warn};

use super::cursor::{Cursor, CursorImage};
use crate::config::{Config, DEFAULT_THEME};
use crate::error::{CursorError, Result};
use crate::loader::{DecodedCursor, ThemeLoader, XcursorLoader, fallback};
use crate::shm::pool::MAX_POOL_SIZE;
use crate::shm::{BYTES_PER_PIXEL, ShmPool, ShmProtocol};

/// A cursor theme loaded into memory shared with the compositor.
pub struct CursorTheme<S: ShmProtocol> {
    name: String,
    size: u32,
    cursors: Vec<Cursor<S>>,
    pool: ShmPool<S>,
}

impl<S: ShmProtocol> CursorTheme<S> {
    /// Load `name` (or `"default"`) from the Xcursor search path.
    ///
    /// Falls back to the built-in cursors when the theme provides none.
    pub fn load(name: Option<&str>, size: u32, shm: S) -> Result<Self> {
        Self::load_with(name, size, shm, &XcursorLoader::from_env())
    }

    pub fn from_config(config: &Config, shm: S) -> Result<Self> {
        Self::load_with(
            config.theme.as_deref(),
            config.scaled_size(),
            shm,
            &XcursorLoader::from_config(config),
        )
    }

    /// Build a theme from whatever `loader` produces.
    ///
    /// Only a failure to create the pool fails the load. Cursors that cannot be
    /// stored are logged and left out.
    pub fn load_with<L: ThemeLoader>(
        name: Option<&str>,
        size: u32,
        shm: S,
        loader: &L,
    ) -> Result<Self> {
        let name = name.unwrap_or(DEFAULT_THEME);
        let guess = (size as usize)
            .saturating_mul(size as usize)
            .saturating_mul(BYTES_PER_PIXEL)
            .min(MAX_POOL_SIZE);

        let mut theme = Self {
            name: name.to_string(),
            size,
            cursors: Vec::new(),
            pool: ShmPool::new(shm, guess)?,
        };

        for cursor in loader.load_theme(name, size) {
            theme.add(&cursor);
        }

        if theme.cursors.is_empty() {
            info!("Theme {} has no cursors, using built-in cursors", name);
            theme.name = DEFAULT_THEME.to_string();
            for cursor in fallback::cursors() {
                theme.add(cursor);
            }
        }

        debug!(
            "Loaded {} cursors for theme {} into {} bytes",
            theme.cursors.len(),
            theme.name,
            theme.pool.used()
        );
        Ok(theme)
    }

    fn add(&mut self, decoded: &DecodedCursor) -> bool {
        if self.get_cursor(&decoded.name).is_some() {
            debug!("Ignoring duplicate cursor {}", decoded.name);
            return false;
        }

        match Cursor::build(&mut self.pool, &decoded.name, &decoded.frames) {
            Ok(cursor) => {
                self.cursors.push(cursor);
                true
            }
            Err(e) => {
                warn!("Dropping cursor {}: {}", decoded.name, e);
                false
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    /// Cursors in the order they were loaded.
    pub fn cursors(&self) -> impl Iterator<Item = &Cursor<S>> {
        self.cursors.iter()
    }

    pub fn get_cursor(&self, name: &str) -> Option<&Cursor<S>> {
        self.cursors.iter().find(|cursor| cursor.name() == name)
    }

    pub fn cursor(&self, name: &str) -> Result<&Cursor<S>> {
        self.get_cursor(name)
            .ok_or_else(|| CursorError::NotFound(name.to_string()))
    }

    /// The pixels of `image`, as the compositor will read them.
    pub fn pixels(&self, image: &CursorImage<S>) -> Option<&[u8]> {
        self.pool.bytes(image.allocation())
    }

    pub fn pool(&self) -> &ShmPool<S> {
        &self.pool
    }
}

impl<S: ShmProtocol> Drop for CursorTheme<S> {
    fn drop(&mut self) {
        // Buffers go before the pool they were created from.
        self.cursors.clear();
    }
}
