// In-process ShmProtocol that records every request, for tests

use std::cell::{Cell, RefCell};
use std::io;
use std::os::fd::BorrowedFd;
use std::rc::Rc;

use super::{ShmFormat, ShmProtocol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ShmRequest {
    CreatePool {
        id: u32,
        size: i32,
    },
    ResizePool {
        id: u32,
        size: i32,
    },
    CreateBuffer {
        id: u32,
        pool: u32,
        offset: i32,
        width: i32,
        height: i32,
        stride: i32,
    },
    DestroyPool {
        id: u32,
    },
    DestroyBuffer {
        id: u32,
    },
}

#[derive(Clone, Default)]
pub(crate) struct RecordingShm {
    requests: Rc<RefCell<Vec<ShmRequest>>>,
    last_id: Rc<Cell<u32>>,
    refuse_pools: bool,
}

impl RecordingShm {
    /// A service whose `create_pool` always fails.
    pub(crate) fn refusing_pools() -> Self {
        Self {
            refuse_pools: true,
            ..Self::default()
        }
    }

    pub(crate) fn requests(&self) -> Vec<ShmRequest> {
        self.requests.borrow().clone()
    }

    pub(crate) fn count(&self, pred: impl Fn(&ShmRequest) -> bool) -> usize {
        self.requests.borrow().iter().filter(|r| pred(r)).count()
    }

    fn next_id(&self) -> u32 {
        let id = self.last_id.get() + 1;
        self.last_id.set(id);
        id
    }

    fn record(&self, request: ShmRequest) {
        self.requests.borrow_mut().push(request);
    }
}

impl ShmProtocol for RecordingShm {
    type Pool = u32;
    type Buffer = u32;

    fn create_pool(&self, _fd: BorrowedFd<'_>, size: i32) -> io::Result<u32> {
        if self.refuse_pools {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "connection closed"));
        }
        let id = self.next_id();
        self.record(ShmRequest::CreatePool { id, size });
        Ok(id)
    }

    fn resize_pool(&self, pool: &u32, size: i32) {
        self.record(ShmRequest::ResizePool { id: *pool, size });
    }

    fn create_buffer(
        &self,
        pool: &u32,
        offset: i32,
        width: i32,
        height: i32,
        stride: i32,
        format: ShmFormat,
    ) -> u32 {
        assert_eq!(format, ShmFormat::Argb8888);
        let id = self.next_id();
        self.record(ShmRequest::CreateBuffer {
            id,
            pool: *pool,
            offset,
            width,
            height,
            stride,
        });
        id
    }

    fn destroy_pool(&self, pool: &u32) {
        self.record(ShmRequest::DestroyPool { id: *pool });
    }

    fn destroy_buffer(&self, buffer: &u32) {
        self.record(ShmRequest::DestroyBuffer { id: *buffer });
    }
}

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
