//! Cooperative cancellation contexts.
//!
//! Conditional loops call [`ExecCtx::poll`] once per step, before advancing
//! their cursors. `Break` ends the loop; what led to it is the context's own
//! business.

use std::cell::Cell;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

pub trait ExecCtx<Id: ?Sized> {
    fn poll(&self, site: &Id) -> ControlFlow<()>;
}

impl<C, Id> ExecCtx<Id> for &C
where
    C: ExecCtx<Id> + ?Sized,
    Id: ?Sized,
{
    #[inline]
    fn poll(&self, site: &Id) -> ControlFlow<()> {
        (**self).poll(site)
    }
}

/// Never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl<Id: ?Sized> ExecCtx<Id> for Unbounded {
    #[inline]
    fn poll(&self, _site: &Id) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// A poll budget. Every granted poll burns one unit; once the budget is spent
/// every further poll breaks.
#[derive(Debug)]
pub struct Fuel {
    limit: u64,
    granted: Cell<u64>,
    polls: Cell<u64>,
}

impl Fuel {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            granted: Cell::new(0),
            polls: Cell::new(0),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(u64::MAX)
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Total number of polls observed, including refused ones.
    pub fn polls(&self) -> u64 {
        self.polls.get()
    }

    pub fn remaining(&self) -> u64 {
        self.limit - self.granted.get()
    }

    /// True once a poll has been refused.
    pub fn is_exhausted(&self) -> bool {
        self.polls.get() > self.granted.get()
    }
}

impl<Id: ?Sized> ExecCtx<Id> for Fuel {
    fn poll(&self, _site: &Id) -> ControlFlow<()> {
        self.polls.set(self.polls.get().saturating_add(1));
        let granted = self.granted.get();
        if granted < self.limit {
            self.granted.set(granted + 1);
            return ControlFlow::Continue(());
        }
        if self.polls.get() == granted + 1 {
            debug!(limit = self.limit, "fuel exhausted");
        }
        ControlFlow::Break(())
    }
}

/// A shared cancellation request. Clones observe the same flag, so a controller
/// may hold one clone while the loop polls another.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl<Id: ?Sized> ExecCtx<Id> for CancelFlag {
    #[inline]
    fn poll(&self, _site: &Id) -> ControlFlow<()> {
        if self.is_cancelled() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}
