// Sources of decoded cursor images that themes are built from

pub mod fallback;
pub mod xcursor_loader;

pub use xcursor_loader::XcursorLoader;

/// One decoded animation frame in premultiplied ARGB8888 (B, G, R, A bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    pub width: u32,
    pub height: u32,
    pub hotspot_x: u32,
    pub hotspot_y: u32,
    pub delay_ms: u32,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCursor {
    pub name: String,
    pub frames: Vec<DecodedFrame>,
}

/// Produces the cursors of a theme for a given pixel size.
///
/// The sequence may be empty and may report the same name more than once; the
/// theme keeps the first cursor of each name.
pub trait ThemeLoader {
    type Cursors: Iterator<Item = DecodedCursor>;

    fn load_theme(&self, name: &str, size: u32) -> Self::Cursors;
}
