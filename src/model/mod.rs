pub mod cursor;
pub mod frame;
pub mod theme;


pub use cursor::{Cursor, CursorImage};
pub use frame::FrameAndDuration;
pub use theme::CursorTheme;
