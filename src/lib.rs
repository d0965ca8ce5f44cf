//! Cursor themes for display-server clients.
//!
//! A [`CursorTheme`] loads every cursor of a theme at one pixel size into a single
//! shared-memory pool and hands out presentable buffers through an embedder-supplied
//! [`ShmProtocol`]. [`Cursor::frame`] picks the animation frame for an elapsed time.

pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod shm;

pub use config::Config;
pub use error::{CursorError, Result};
pub use loader::{DecodedCursor, DecodedFrame, ThemeLoader, XcursorLoader};
pub use model::{Cursor, CursorImage, CursorTheme, FrameAndDuration};
pub use shm::{Allocation, ShmFormat, ShmPool, ShmProtocol};
