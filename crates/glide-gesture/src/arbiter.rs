//! Claimant lock shared by the surfaces of one UI root.
//!
//! At most one surface tracks a gesture at a time. A surface claims the lock
//! on Pressed and releases it when its sequence ends or it is detached. A
//! second surface pressing while the lock is held is declined silently.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Identity of a gesture-handling surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

impl SurfaceId {
    /// Allocate a new unique surface ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct GestureArbiter {
    holder: Cell<Option<SurfaceId>>,
}

thread_local! {
    static SHARED: Rc<GestureArbiter> = Rc::new(GestureArbiter::new());
}

impl GestureArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arbiter shared by every surface on this thread, for applications
    /// with a single UI root.
    pub fn shared() -> Rc<GestureArbiter> {
        SHARED.with(Rc::clone)
    }

    /// Claim the lock. Succeeds when it is free or already held by `surface`.
    pub fn try_claim(&self, surface: SurfaceId) -> bool {
        match self.holder.get() {
            None => {
                self.holder.set(Some(surface));
                true
            }
            Some(holder) if holder == surface => true,
            Some(holder) => {
                debug!(surface = surface.0, holder = holder.0, "gesture lock contended");
                false
            }
        }
    }

    /// Release the lock if `surface` holds it.
    pub fn release(&self, surface: SurfaceId) -> bool {
        if self.holder.get() == Some(surface) {
            self.holder.set(None);
            true
        } else {
            false
        }
    }

    pub fn holder(&self) -> Option<SurfaceId> {
        self.holder.get()
    }

    pub fn is_held_by(&self, surface: SurfaceId) -> bool {
        self.holder.get() == Some(surface)
    }

    pub fn is_free(&self) -> bool {
        self.holder.get().is_none()
    }
}
