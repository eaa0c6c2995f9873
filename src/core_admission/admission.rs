use crate::core_error::FtpError;
use log::{debug, trace};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Server-wide gate bounding how many sessions hold a data channel at once.
///
/// Only LIST, RETR and STOR take a slot. Waiters block on the semaphore
/// instead of polling, and are served in arrival order.
#[derive(Debug)]
pub struct Admission {
    slots: Arc<Semaphore>,
    capacity: usize,
}

/// One held data-channel slot. Dropping it hands the slot back, whatever the
/// exit path of the transfer that owned it.
#[derive(Debug)]
pub struct TransferSlot {
    _permit: OwnedSemaphorePermit,
}

impl Admission {
    pub fn new(max_clients: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(max_clients)),
            capacity: max_clients,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots currently free.
    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    /// Waits until a slot is free and takes it.
    ///
    /// Fails only once the gate has been closed for shutdown.
    pub async fn acquire(&self) -> Result<TransferSlot, FtpError> {
        if self.slots.available_permits() == 0 {
            debug!(
                "All {} data channel slots busy, waiting for a release",
                self.capacity
            );
        }
        let permit = Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .map_err(|_| FtpError::ShuttingDown)?;
        trace!("Data channel slot acquired ({} left)", self.available());
        Ok(TransferSlot { _permit: permit })
    }

    /// Wakes every waiter with an error and refuses further acquisitions.
    pub fn close(&self) {
        self.slots.close();
    }
}
