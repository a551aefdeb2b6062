//! Per-step policies for the lock-step driver.
//!
//! The driver owns cursors and the step counter; a policy decides what one
//! step tuple turns into. Map, FilterMap and TakeWhile-Map come in an
//! infallible flavour and a `Try*` flavour whose closures return `Result`.

use std::ops::ControlFlow;

use crate::closure::{Predicate, Transform};
use crate::ctx::ExecCtx;

/// Outcome of applying a policy to one step tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<O> {
    /// Yield and keep going.
    Emit(O),
    /// Yield nothing for this tuple; advance again.
    Skip,
    /// Stop for good without yielding.
    Halt,
    /// Stop for good, then yield this last value.
    Fail(O),
}

pub trait Policy<T> {
    type Output;

    /// True when every step tuple yields exactly one output.
    const EXACT: bool = false;

    /// Called before every advance attempt.
    #[inline]
    fn poll(&mut self) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn apply(&mut self, index: u64, item: T) -> Step<Self::Output>;
}

#[derive(Debug, Clone)]
pub struct Map<F> {
    transform: F,
}

impl<F> Map<F> {
    pub fn new(transform: F) -> Self {
        Self { transform }
    }
}

impl<T, F> Policy<T> for Map<F>
where
    F: Transform<T>,
{
    type Output = F::Output;

    const EXACT: bool = true;

    #[inline]
    fn apply(&mut self, index: u64, item: T) -> Step<Self::Output> {
        Step::Emit(self.transform.call(index, item))
    }
}

/// Keeps the tuples the predicate accepts. Polls `ctx` with `site` before
/// every advance attempt.
#[derive(Debug, Clone)]
pub struct FilterMap<P, F, C, Id> {
    predicate: P,
    transform: F,
    ctx: C,
    site: Id,
}

impl<P, F, C, Id> FilterMap<P, F, C, Id> {
    pub fn new(predicate: P, transform: F, ctx: C, site: Id) -> Self {
        Self {
            predicate,
            transform,
            ctx,
            site,
        }
    }
}

impl<T, P, F, C, Id> Policy<T> for FilterMap<P, F, C, Id>
where
    P: Predicate<T, bool>,
    F: Transform<T>,
    C: ExecCtx<Id>,
{
    type Output = F::Output;

    #[inline]
    fn poll(&mut self) -> ControlFlow<()> {
        self.ctx.poll(&self.site)
    }

    fn apply(&mut self, index: u64, item: T) -> Step<Self::Output> {
        if self.predicate.test(index, &item) {
            Step::Emit(self.transform.call(index, item))
        } else {
            Step::Skip
        }
    }
}

/// Yields while the predicate holds. Does not poll a cancellation context.
#[derive(Debug, Clone)]
pub struct TakeWhileMap<P, F> {
    predicate: P,
    transform: F,
}

impl<P, F> TakeWhileMap<P, F> {
    pub fn new(predicate: P, transform: F) -> Self {
        Self {
            predicate,
            transform,
        }
    }
}

impl<T, P, F> Policy<T> for TakeWhileMap<P, F>
where
    P: Predicate<T, bool>,
    F: Transform<T>,
{
    type Output = F::Output;

    fn apply(&mut self, index: u64, item: T) -> Step<Self::Output> {
        if self.predicate.test(index, &item) {
            Step::Emit(self.transform.call(index, item))
        } else {
            Step::Halt
        }
    }
}

#[derive(Debug, Clone)]
pub struct TryMap<F> {
    transform: F,
}

impl<F> TryMap<F> {
    pub fn new(transform: F) -> Self {
        Self { transform }
    }
}

impl<T, O, E, F> Policy<T> for TryMap<F>
where
    F: Transform<T, Output = Result<O, E>>,
{
    type Output = Result<O, E>;

    fn apply(&mut self, index: u64, item: T) -> Step<Self::Output> {
        match self.transform.call(index, item) {
            Ok(out) => Step::Emit(Ok(out)),
            Err(err) => Step::Fail(Err(err)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TryFilterMap<P, F, C, Id> {
    predicate: P,
    transform: F,
    ctx: C,
    site: Id,
}

impl<P, F, C, Id> TryFilterMap<P, F, C, Id> {
    pub fn new(predicate: P, transform: F, ctx: C, site: Id) -> Self {
        Self {
            predicate,
            transform,
            ctx,
            site,
        }
    }
}

impl<T, O, E, P, F, C, Id> Policy<T> for TryFilterMap<P, F, C, Id>
where
    P: Predicate<T, Result<bool, E>>,
    F: Transform<T, Output = Result<O, E>>,
    C: ExecCtx<Id>,
{
    type Output = Result<O, E>;

    #[inline]
    fn poll(&mut self) -> ControlFlow<()> {
        self.ctx.poll(&self.site)
    }

    fn apply(&mut self, index: u64, item: T) -> Step<Self::Output> {
        match self.predicate.test(index, &item) {
            Ok(true) => match self.transform.call(index, item) {
                Ok(out) => Step::Emit(Ok(out)),
                Err(err) => Step::Fail(Err(err)),
            },
            Ok(false) => Step::Skip,
            Err(err) => Step::Fail(Err(err)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TryTakeWhileMap<P, F> {
    predicate: P,
    transform: F,
}

impl<P, F> TryTakeWhileMap<P, F> {
    pub fn new(predicate: P, transform: F) -> Self {
        Self {
            predicate,
            transform,
        }
    }
}

impl<T, O, E, P, F> Policy<T> for TryTakeWhileMap<P, F>
where
    P: Predicate<T, Result<bool, E>>,
    F: Transform<T, Output = Result<O, E>>,
{
    type Output = Result<O, E>;

    fn apply(&mut self, index: u64, item: T) -> Step<Self::Output> {
        match self.predicate.test(index, &item) {
            Ok(true) => match self.transform.call(index, item) {
                Ok(out) => Step::Emit(Ok(out)),
                Err(err) => Step::Fail(Err(err)),
            },
            Ok(false) => Step::Halt,
            Err(err) => Step::Fail(Err(err)),
        }
    }
}
