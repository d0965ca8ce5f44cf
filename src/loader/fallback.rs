// Built-in cursors used when no theme provides any

use byteorder::{ByteOrder, LittleEndian};
use std::sync::LazyLock;

use super::{DecodedCursor, DecodedFrame, ThemeLoader};
use crate::shm::BYTES_PER_PIXEL;

const BLACK: u32 = 0xff00_0000;
const WHITE: u32 = 0xffff_ffff;
const CLEAR: u32 = 0x0000_0000;

struct Bitmap {
    art: &'static [&'static str],
    hotspot: (u32, u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transform {
    Identity,
    FlipX,
    FlipY,
    FlipXY,
    Transpose,
    TransposeFlipY,
}

impl Transform {
    fn swaps_axes(self) -> bool {
        matches!(self, Transform::Transpose | Transform::TransposeFlipY)
    }

    /// Where source pixel `(x, y)` of a `w`x`h` bitmap lands.
    fn apply(self, x: u32, y: u32, w: u32, h: u32) -> (u32, u32) {
        match self {
            Transform::Identity => (x, y),
            Transform::FlipX => (w - 1 - x, y),
            Transform::FlipY => (x, h - 1 - y),
            Transform::FlipXY => (w - 1 - x, h - 1 - y),
            Transform::Transpose => (y, x),
            Transform::TransposeFlipY => (y, w - 1 - x),
        }
    }
}

const LEFT_PTR: Bitmap = Bitmap {
    art: &[
        "#...........",
        "##..........",
        "#o#.........",
        "#oo#........",
        "#ooo#.......",
        "#oooo#......",
        "#ooooo#.....",
        "#oooooo#....",
        "#ooooooo#...",
        "#oooooooo#..",
        "#ooooooooo#.",
        "#oooooo#####",
        "#ooo#oo#....",
        "#oo##oo#....",
        "#o#..#oo#...",
        "##...#oo#...",
        "#.....#oo#..",
        "......#oo#..",
        ".......##...",
    ],
    hotspot: (0, 0),
};

#[rustfmt::skip]
const XTERM: Bitmap = Bitmap {
    art: &[
        "###.###",
        "#oo#oo#",
        "###o###",
        "..#o#..",
        "..#o#..",
        "..#o#..",
        "..#o#..",
        "..#o#..",
        "..#o#..",
        "..#o#..",
        "..#o#..",
        "..#o#..",
        "..#o#..",
        "###o###",
        "#oo#oo#",
        "###.###",
    ],
    hotspot: (3, 8),
};

const HAND1: Bitmap = Bitmap {
    art: &[
        ".....##.........",
        "....#oo#........",
        "....#oo#........",
        "....#oo#........",
        "....#oo###......",
        "....#oo#oo###...",
        "..###oo#oo#oo##.",
        ".#oo#oooooo#oo#.",
        ".#ooooooooooooo#",
        "..#oooooooooooo#",
        "..#ooooooooooo#.",
        "...#oooooooooo#.",
        "...#ooooooooo#..",
        "....#oooooooo#..",
        "....#oooooooo#..",
        "....##########..",
    ],
    hotspot: (5, 0),
};

const GRABBING: Bitmap = Bitmap {
    art: &[
        "................",
        "................",
        "................",
        "....##.##.##....",
        "...#oo#oo#oo##..",
        "...#oo#oo#oo#o#.",
        ".###oooooooooo#.",
        "#oo#oooooooooo#.",
        "#ooooooooooooo#.",
        ".#oooooooooooo#.",
        ".#ooooooooooo#..",
        "..#oooooooooo#..",
        "...#oooooooo#...",
        "...#oooooooo#...",
        "...##########...",
        "................",
    ],
    hotspot: (8, 8),
};

const WATCH: Bitmap = Bitmap {
    art: &[
        ".....######.....",
        ".....#oooo#.....",
        "....########....",
        "...#oooooooo#...",
        "..#ooooo#oooo#..",
        ".#oooooo#ooooo#.",
        ".#oooooo#ooooo#.",
        ".#oooooo#ooooo#.",
        ".#oooooo####oo#.",
        ".#oooooooooooo#.",
        "..#oooooooooo#..",
        "...#oooooooo#...",
        "....########....",
        ".....#oooo#.....",
        ".....######.....",
        "................",
    ],
    hotspot: (8, 8),
};

const SIDE: Bitmap = Bitmap {
    art: &[
        "................",
        "................",
        "................",
        "#...............",
        "#....#..........",
        "#...##..........",
        "#..#o#..........",
        "#.#oo#########..",
        "##ooooooooooo#..",
        "#.#oo#########..",
        "#..#o#..........",
        "#...##..........",
        "#....#..........",
        "#...............",
        "................",
        "................",
    ],
    hotspot: (0, 8),
};

const CORNER: Bitmap = Bitmap {
    art: &[
        "##########......",
        "#...............",
        "#.#######.......",
        "#.#ooooo#.......",
        "#.#oooo#........",
        "#.#ooooo#.......",
        "#.#oo#ooo#......",
        "#.#o#.#ooo#.....",
        "#.##...#ooo#....",
        "#.......#ooo#...",
        "#........#ooo#..",
        "..........#oo#..",
        "...........##...",
        "................",
        "................",
        "................",
    ],
    hotspot: (0, 0),
};

const ENTRIES: &[(&str, &Bitmap, Transform)] = &[
    ("left_ptr", &LEFT_PTR, Transform::Identity),
    ("xterm", &XTERM, Transform::Identity),
    ("hand1", &HAND1, Transform::Identity),
    ("grabbing", &GRABBING, Transform::Identity),
    ("watch", &WATCH, Transform::Identity),
    ("left_side", &SIDE, Transform::Identity),
    ("right_side", &SIDE, Transform::FlipX),
    ("top_side", &SIDE, Transform::Transpose),
    ("bottom_side", &SIDE, Transform::TransposeFlipY),
    ("top_left_corner", &CORNER, Transform::Identity),
    ("top_right_corner", &CORNER, Transform::FlipX),
    ("bottom_left_corner", &CORNER, Transform::FlipY),
    ("bottom_right_corner", &CORNER, Transform::FlipXY),
];

static CURSORS: LazyLock<Vec<DecodedCursor>> = LazyLock::new(|| {
    ENTRIES
        .iter()
        .map(|(name, bitmap, transform)| DecodedCursor {
            name: name.to_string(),
            frames: vec![rasterize(bitmap, *transform)],
        })
        .collect()
});

/// The built-in cursors, rasterized on first use.
pub fn cursors() -> &'static [DecodedCursor] {
    &CURSORS
}

fn rasterize(bitmap: &Bitmap, transform: Transform) -> DecodedFrame {
    let src_h = bitmap.art.len() as u32;
    let src_w = bitmap.art.first().map_or(0, |row| row.len()) as u32;
    let (width, height) = if transform.swaps_axes() {
        (src_h, src_w)
    } else {
        (src_w, src_h)
    };

    let mut pixels = vec![0u8; (width * height) as usize * BYTES_PER_PIXEL];
    for (y, row) in bitmap.art.iter().enumerate() {
        for (x, cell) in row.bytes().enumerate() {
            let argb = match cell {
                b'#' => BLACK,
                b'o' => WHITE,
                _ => CLEAR,
            };
            let (dx, dy) = transform.apply(x as u32, y as u32, src_w, src_h);
            let at = (dy * width + dx) as usize * BYTES_PER_PIXEL;
            LittleEndian::write_u32(&mut pixels[at..at + BYTES_PER_PIXEL], argb);
        }
    }

    let (hotspot_x, hotspot_y) = transform.apply(bitmap.hotspot.0, bitmap.hotspot.1, src_w, src_h);
    DecodedFrame {
        width,
        height,
        hotspot_x,
        hotspot_y,
        delay_ms: 0,
        pixels,
    }
}

/// A [`ThemeLoader`] that ignores the requested theme and yields the built-in set.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLoader;

impl ThemeLoader for BuiltinLoader {
    type Cursors = std::iter::Cloned<std::slice::Iter<'static, DecodedCursor>>;

    fn load_theme(&self, _name: &str, _size: u32) -> Self::Cursors {
        cursors().iter().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn find(name: &str) -> &'static DecodedCursor {
        cursors().iter().find(|c| c.name == name).unwrap()
    }

    fn pixel(frame: &DecodedFrame, x: u32, y: u32) -> u32 {
        let at = (y * frame.width + x) as usize * BYTES_PER_PIXEL;
        LittleEndian::read_u32(&frame.pixels[at..at + BYTES_PER_PIXEL])
    }

    #[test]
    fn test_bitmaps_are_rectangular() {
        for (name, bitmap, _) in ENTRIES {
            let width = bitmap.art[0].len();
            for row in bitmap.art {
                assert_eq!(row.len(), width, "ragged row in {}", name);
            }
        }
    }

    #[test]
    fn test_every_entry_is_a_valid_single_frame() {
        let mut names = HashSet::new();
        for cursor in cursors() {
            assert!(names.insert(cursor.name.clone()));
            assert_eq!(cursor.frames.len(), 1);
            let frame = &cursor.frames[0];
            assert!(frame.width > 0 && frame.height > 0);
            assert_eq!(
                frame.pixels.len(),
                (frame.width * frame.height) as usize * BYTES_PER_PIXEL
            );
            assert!(frame.hotspot_x < frame.width);
            assert!(frame.hotspot_y < frame.height);
            assert_eq!(frame.delay_ms, 0);
        }
        assert_eq!(names.len(), ENTRIES.len());
    }

    #[test]
    fn test_left_ptr_pixels() {
        let frame = &find("left_ptr").frames[0];
        assert_eq!((frame.width, frame.height), (12, 19));
        assert_eq!(pixel(frame, 0, 0), BLACK);
        assert_eq!(pixel(frame, 1, 2), WHITE);
        assert_eq!(pixel(frame, 11, 0), CLEAR);
        // Little-endian ARGB: blue, green, red, alpha.
        assert_eq!(&frame.pixels[0..4], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_derived_edges_follow_their_transform() {
        let left = &find("left_side").frames[0];
        let right = &find("right_side").frames[0];
        let top = &find("top_side").frames[0];
        let bottom = &find("bottom_side").frames[0];

        assert_eq!((right.hotspot_x, right.hotspot_y), (15, 8));
        assert_eq!((top.hotspot_x, top.hotspot_y), (8, 0));
        assert_eq!((bottom.hotspot_x, bottom.hotspot_y), (8, 15));

        assert_eq!(pixel(left, 2, 8), pixel(right, 13, 8));
        assert_eq!(pixel(left, 2, 8), pixel(top, 8, 2));
        assert_eq!(pixel(left, 2, 8), pixel(bottom, 8, 13));
    }

    #[test]
    fn test_derived_corners_follow_their_transform() {
        let corner = |name| {
            let frame = &find(name).frames[0];
            (frame.hotspot_x, frame.hotspot_y)
        };
        assert_eq!(corner("top_left_corner"), (0, 0));
        assert_eq!(corner("top_right_corner"), (15, 0));
        assert_eq!(corner("bottom_left_corner"), (0, 15));
        assert_eq!(corner("bottom_right_corner"), (15, 15));
    }

    #[test]
    fn test_builtin_loader_ignores_theme_name() {
        let count = BuiltinLoader.load_theme("does-not-exist", 48).count();
        assert_eq!(count, cursors().len());
    }
}
