// Shared-memory protocol seam and the pool allocator built on it

mod memfd;
pub mod pool;

#[cfg(test)]
pub(crate) mod testing;

use std::io;
use std::os::fd::BorrowedFd;

pub use pool::{Allocation, ShmPool};

/// Bytes per pixel of [`ShmFormat::Argb8888`].
pub const BYTES_PER_PIXEL: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShmFormat {
    /// 32-bit premultiplied ARGB, little-endian (B, G, R, A in memory).
    Argb8888,
}

/// Requests the cursor code needs from the compositor's shared-memory global.
///
/// Implementations wrap whatever protocol binding the embedder uses. Handles are
/// opaque to this crate; it only stores them and hands them back.
pub trait ShmProtocol {
    type Pool;
    type Buffer;

    /// Fails when the compositor connection cannot take the pool, for example
    /// because it is gone.
    fn create_pool(&self, fd: BorrowedFd<'_>, size: i32) -> io::Result<Self::Pool>;

    fn resize_pool(&self, pool: &Self::Pool, size: i32);

    fn create_buffer(
        &self,
        pool: &Self::Pool,
        offset: i32,
        width: i32,
        height: i32,
        stride: i32,
        format: ShmFormat,
    ) -> Self::Buffer;

    fn destroy_pool(&self, pool: &Self::Pool);

    fn destroy_buffer(&self, buffer: &Self::Buffer);
}
