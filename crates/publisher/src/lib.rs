//! # Publisher
//!
//! Holds the one canonical `VehicleSnapshot` shared by the generator and all
//! exposure adapters.
//!
//! - `publish` replaces the held value wholesale under a mutex
//! - `read` copies it out under the same mutex
//!
//! The lock is held only for the copy. Computing the next state and
//! serializing the snapshot both happen outside the critical section, so a
//! reader waits at most for one copy-in.

use std::sync::{Mutex, MutexGuard, PoisonError};

use contracts::VehicleSnapshot;
use tracing::trace;

/// Snapshot together with the publish sequence that produced it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stamped {
    /// Number of `publish` calls so far (0 = initial value, never published)
    pub sequence: u64,
    pub snapshot: VehicleSnapshot,
}

/// Thread-safe holder of the latest snapshot
///
/// Share it as `Arc<SnapshotPublisher>`; every instance is independent.
#[derive(Debug, Default)]
pub struct SnapshotPublisher {
    slot: Mutex<Stamped>,
}

impl SnapshotPublisher {
    /// Create a publisher seeded with `initial` (sequence 0)
    pub fn new(initial: VehicleSnapshot) -> Self {
        Self {
            slot: Mutex::new(Stamped {
                sequence: 0,
                snapshot: initial,
            }),
        }
    }

    /// Replace the held snapshot, returning the new sequence number
    pub fn publish(&self, snapshot: VehicleSnapshot) -> u64 {
        let sequence = {
            let mut slot = self.lock();
            slot.sequence += 1;
            slot.snapshot = snapshot;
            slot.sequence
        };
        trace!(sequence, "snapshot published");
        sequence
    }

    /// Copy of the most recently published snapshot
    pub fn read(&self) -> VehicleSnapshot {
        self.lock().snapshot
    }

    /// Copy of the snapshot and its sequence, taken atomically
    pub fn read_stamped(&self) -> Stamped {
        *self.lock()
    }

    /// Number of snapshots published so far
    pub fn sequence(&self) -> u64 {
        self.lock().sequence
    }

    // A panic elsewhere cannot leave a half-written value: the slot is only
    // ever assigned whole.
    fn lock(&self) -> MutexGuard<'_, Stamped> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
