use std::cell::OnceCell;
use std::ops::Index;
use std::rc::Rc;

use super::frame::{self, FrameAndDuration};
use crate::error::{CursorError, Result};
use crate::loader::DecodedFrame;
use crate::shm::pool::{MAX_POOL_SIZE, SharedPool};
use crate::shm::{Allocation, BYTES_PER_PIXEL, ShmPool, ShmProtocol};

/// One frame of a cursor, stored in its theme's shm pool.
pub struct CursorImage<S: ShmProtocol> {
    width: u32,
    height: u32,
    hotspot_x: u32,
    hotspot_y: u32,
    delay: u32,
    allocation: Allocation,
    pool: Rc<SharedPool<S>>,
    buffer: OnceCell<S::Buffer>,
}

impl<S: ShmProtocol> CursorImage<S> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn hotspot(&self) -> (u32, u32) {
        (self.hotspot_x, self.hotspot_y)
    }

    /// Display time of this frame in milliseconds.
    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn allocation(&self) -> Allocation {
        self.allocation
    }

    /// The buffer presenting this image, created on first use.
    ///
    /// The image owns the buffer and releases it when dropped; do not destroy it.
    pub fn buffer(&self) -> &S::Buffer {
        self.buffer.get_or_init(|| {
            self.pool
                .create_buffer(self.allocation, self.width as i32, self.height as i32)
        })
    }

    pub fn has_buffer(&self) -> bool {
        self.buffer.get().is_some()
    }
}

impl<S: ShmProtocol> Drop for CursorImage<S> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.get() {
            self.pool.destroy_buffer(buffer);
        }
    }
}

/// A named cursor; several images when animated.
pub struct Cursor<S: ShmProtocol> {
    name: String,
    images: Vec<CursorImage<S>>,
    total_delay: u32,
}

impl<S: ShmProtocol> Cursor<S> {
    /// Copy every frame into `pool` and wrap the allocations.
    ///
    /// Nothing is returned on failure, but bytes already taken from the pool
    /// stay taken.
    pub(crate) fn build(
        pool: &mut ShmPool<S>,
        name: &str,
        frames: &[DecodedFrame],
    ) -> Result<Self> {
        if name.is_empty() {
            return Err(CursorError::malformed(name, "empty name"));
        }
        if frames.is_empty() {
            return Err(CursorError::malformed(name, "no frames"));
        }

        let mut images = Vec::with_capacity(frames.len());
        let mut total_delay = 0u32;
        for frame in frames {
            let len = frame_len(name, frame)?;
            let allocation = pool.allocate(len)?;
            pool.bytes_mut(allocation)
                .ok_or_else(|| CursorError::malformed(name, "allocation outside the pool"))?
                .copy_from_slice(&frame.pixels);

            total_delay = total_delay.saturating_add(frame.delay_ms);
            images.push(CursorImage {
                width: frame.width,
                height: frame.height,
                hotspot_x: frame.hotspot_x,
                hotspot_y: frame.hotspot_y,
                delay: frame.delay_ms,
                allocation,
                pool: pool.shared().clone(),
                buffer: OnceCell::new(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            images,
            total_delay,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn images(&self) -> &[CursorImage<S>] {
        &self.images
    }

    pub fn image(&self, index: usize) -> Option<&CursorImage<S>> {
        self.images.get(index)
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Length of one animation loop in milliseconds; `0` for static cursors.
    pub fn total_delay(&self) -> u32 {
        self.total_delay
    }

    /// Index of the image to show `elapsed_ms` after the animation started.
    pub fn frame(&self, elapsed_ms: u32) -> usize {
        self.frame_and_duration(elapsed_ms).frame_index
    }

    /// Like [`Cursor::frame`], plus how long that image stays up.
    pub fn frame_and_duration(&self, elapsed_ms: u32) -> FrameAndDuration {
        frame::select(
            self.images.iter().map(|image| image.delay),
            self.total_delay,
            elapsed_ms,
        )
    }
}

impl<S: ShmProtocol> Index<usize> for Cursor<S> {
    type Output = CursorImage<S>;

    fn index(&self, index: usize) -> &CursorImage<S> {
        &self.images[index]
    }
}

fn frame_len(name: &str, frame: &DecodedFrame) -> Result<usize> {
    if frame.width == 0 || frame.height == 0 {
        return Err(CursorError::malformed(
            name,
            format!("empty {}x{} frame", frame.width, frame.height),
        ));
    }

    let max_width = i32::MAX as u32 / BYTES_PER_PIXEL as u32;
    let len = (frame.width as usize)
        .checked_mul(frame.height as usize)
        .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
        .filter(|&len| frame.width <= max_width && len <= MAX_POOL_SIZE)
        .ok_or_else(|| {
            CursorError::malformed(
                name,
                format!("{}x{} frame is too large", frame.width, frame.height),
            )
        })?;

    if frame.pixels.len() != len {
        return Err(CursorError::malformed(
            name,
            format!(
                "{}x{} frame has {} bytes of pixels, expected {}",
                frame.width,
                frame.height,
                frame.pixels.len(),
                len
            ),
        ));
    }
    Ok(len)
}
