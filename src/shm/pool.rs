// Growable bump allocator over a shared memory file

use log::{debug, warn};
use memmap2::MmapMut;
use std::fs::File;
use std::io;
use std::os::fd::AsFd;
use std::rc::Rc;

use super::memfd::create_anonymous_file;
use super::{BYTES_PER_PIXEL, ShmFormat, ShmProtocol};
use crate::error::{CursorError, Result};

/// Largest pool the protocol can describe; sizes and offsets travel as `i32`.
pub const MAX_POOL_SIZE: usize = i32::MAX as usize;

/// A byte range handed out by [`ShmPool::allocate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    offset: usize,
    len: usize,
}

impl Allocation {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    pub fn overlaps(&self, other: &Allocation) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }
}

/// The protocol-side half of a pool. Cursor images keep it alive so they can
/// create and release their buffers; the handle is destroyed with the last clone.
pub(crate) struct SharedPool<S: ShmProtocol> {
    shm: S,
    handle: S::Pool,
}

impl<S: ShmProtocol> SharedPool<S> {
    pub(crate) fn create_buffer(
        &self,
        allocation: Allocation,
        width: i32,
        height: i32,
    ) -> S::Buffer {
        self.shm.create_buffer(
            &self.handle,
            allocation.offset as i32,
            width,
            height,
            width * BYTES_PER_PIXEL as i32,
            ShmFormat::Argb8888,
        )
    }

    pub(crate) fn destroy_buffer(&self, buffer: &S::Buffer) {
        self.shm.destroy_buffer(buffer);
    }
}

impl<S: ShmProtocol> Drop for SharedPool<S> {
    fn drop(&mut self) {
        self.shm.destroy_pool(&self.handle);
    }
}

pub struct ShmPool<S: ShmProtocol> {
    // Declaration order is teardown order: unmap, release the handle, close the fd.
    mmap: MmapMut,
    shared: Rc<SharedPool<S>>,
    file: File,
    capacity: usize,
    used: usize,
}

impl<S: ShmProtocol> ShmPool<S> {
    pub fn new(shm: S, capacity: usize) -> Result<Self> {
        let capacity = capacity.max(BYTES_PER_PIXEL);
        if capacity > MAX_POOL_SIZE {
            return Err(CursorError::ResourceCreationFailure(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("initial pool size {} exceeds {}", capacity, MAX_POOL_SIZE),
            )));
        }

        let file = create_anonymous_file()
            .map_err(CursorError::ResourceCreationFailure)?;
        file.set_len(capacity as u64)
            .map_err(CursorError::ResourceCreationFailure)?;
        let mmap = unsafe { MmapMut::map_mut(&file) }
            .map_err(CursorError::ResourceCreationFailure)?;

        let handle = shm
            .create_pool(file.as_fd(), capacity as i32)
            .map_err(CursorError::ResourceCreationFailure)?;
        debug!("Created shm pool of {} bytes", capacity);

        Ok(Self {
            mmap,
            shared: Rc::new(SharedPool { shm, handle }),
            file,
            capacity,
            used: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.used
    }

    /// Reserve `size` bytes, growing the pool when they do not fit.
    ///
    /// Growing remaps the region, so no view obtained before this call may be
    /// used afterwards. On failure the pool is left exactly as it was. Empty
    /// allocations are refused.
    pub fn allocate(&mut self, size: usize) -> Result<Allocation> {
        if size == 0 {
            return Err(CursorError::AllocationFailure {
                requested: 0,
                capacity: self.capacity,
                source: io::Error::new(io::ErrorKind::InvalidInput, "zero-sized allocation"),
            });
        }
        let fits = self
            .used
            .checked_add(size)
            .is_some_and(|end| end <= self.capacity);
        if !fits {
            self.grow(size)?;
        }

        let allocation = Allocation {
            offset: self.used,
            len: size,
        };
        self.used += size;
        Ok(allocation)
    }

    fn grow(&mut self, size: usize) -> Result<()> {
        let failure = |capacity, source| CursorError::AllocationFailure {
            requested: size,
            capacity,
            source,
        };

        if self.used.saturating_add(size) > MAX_POOL_SIZE {
            return Err(failure(
                self.capacity,
                io::Error::new(
                    io::ErrorKind::OutOfMemory,
                    format!("pool cannot exceed {} bytes", MAX_POOL_SIZE),
                ),
            ));
        }

        let doubled = self.capacity.saturating_mul(2).saturating_add(size);
        let needed = self.capacity.saturating_add(size);
        let new_capacity = doubled.max(needed).min(MAX_POOL_SIZE);

        let mmap = extend_mapping(&self.file, self.capacity, new_capacity)
            .map_err(|e| failure(self.capacity, e))?;

        self.shared
            .shm
            .resize_pool(&self.shared.handle, new_capacity as i32);
        self.mmap = mmap;
        debug!("Grew shm pool from {} to {} bytes", self.capacity, new_capacity);
        self.capacity = new_capacity;
        Ok(())
    }

    pub fn bytes(&self, allocation: Allocation) -> Option<&[u8]> {
        if allocation.end() > self.used {
            return None;
        }
        Some(&self.mmap[allocation.offset..allocation.end()])
    }

    pub fn bytes_mut(&mut self, allocation: Allocation) -> Option<&mut [u8]> {
        if allocation.end() > self.used {
            return None;
        }
        Some(&mut self.mmap[allocation.offset..allocation.end()])
    }

    pub(crate) fn shared(&self) -> &Rc<SharedPool<S>> {
        &self.shared
    }
}

/// Resize `file` to `new_len` and map all of it.
///
/// If the mapping fails the file is cut back to `old_len`, the size the current
/// mapping and the compositor's pool still describe.
fn extend_mapping(file: &File, old_len: usize, new_len: usize) -> io::Result<MmapMut> {
    file.set_len(new_len as u64)?;
    match unsafe { MmapMut::map_mut(file) } {
        Ok(mmap) => Ok(mmap),
        Err(e) => {
            if let Err(truncate) = file.set_len(old_len as u64) {
                warn!("Could not shrink shm file back to {} bytes: {}", old_len, truncate);
            }
            Err(e)
        }
    }
}

impl<S: ShmProtocol> Drop for ShmPool<S> {
    fn drop(&mut self) {
        debug!("Destroying shm pool ({} of {} bytes used)", self.used, self.capacity);
    }
}
