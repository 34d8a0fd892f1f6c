//! Per-operation transfer state and the machine that guards it.

pub mod save;

use std::future::Future;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::common::{ErrorKind, TransferError};

/// Client-side view of one protocol operation.
///
/// Terminal states hold what the caller needs: the payload on success, the
/// error classification on failure. The raw transport error never lands
/// here; it is logged where it happens.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferState<P> {
    Idle,
    InProgress,
    Succeeded(P),
    Failed(ErrorKind),
}

/// Serializes one operation kind (register or redeem) so a single request
/// of that kind is in flight at a time.
///
/// Terminal states are not sticky: a new drive re-arms through `Idle`. A
/// drive attempted while one is in flight is ignored and the in-flight
/// operation stays authoritative.
pub struct TransferMachine<P> {
    state: Arc<RwLock<TransferState<P>>>,
}

impl<P: Clone> TransferMachine<P> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(TransferState::Idle)),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> TransferState<P> {
        self.read().clone()
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(*self.read(), TransferState::InProgress)
    }

    /// Runs one protocol operation through the machine.
    ///
    /// Returns `false` without polling `op` (so without any network
    /// traffic) when an operation of this kind is already in flight.
    /// Otherwise awaits the operation and settles into `Succeeded` or
    /// `Failed` before returning `true`.
    pub async fn drive<F>(&self, op: F) -> bool
    where
        F: Future<Output = Result<P, TransferError>>,
    {
        if !self.begin() {
            return false;
        }

        match op.await {
            Ok(payload) => self.settle(Ok(payload)),
            Err(err) => self.settle(Err(err.kind())),
        }
        true
    }

    /// Claims the machine for a new operation.
    fn begin(&self) -> bool {
        let mut state = self.write();
        match *state {
            TransferState::InProgress => {
                tracing::warn!("transfer already in flight, ignoring duplicate request");
                false
            }
            _ => {
                *state = TransferState::InProgress;
                true
            }
        }
    }

    /// Settles the in-flight operation. Only legal from `InProgress`, so an
    /// operation can never terminate the machine twice.
    fn settle(&self, outcome: Result<P, ErrorKind>) {
        let mut state = self.write();
        if !matches!(*state, TransferState::InProgress) {
            tracing::error!("settle without an in-flight transfer, dropping outcome");
            return;
        }
        *state = match outcome {
            Ok(payload) => TransferState::Succeeded(payload),
            Err(kind) => {
                tracing::warn!(?kind, "transfer failed");
                TransferState::Failed(kind)
            }
        };
    }

    fn read(&self) -> RwLockReadGuard<'_, TransferState<P>> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("transfer state lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, TransferState<P>> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("transfer state lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl<P: Clone> Default for TransferMachine<P> {
    fn default() -> Self {
        Self::new()
    }
}

// Handles are shared with whatever renders the state; shallow copy only.
impl<P> Clone for TransferMachine<P> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}
