//! Presence-checking entry points.
//!
//! Every entry point takes a tuple of `Option` sources. If any source
//! is `None` the result is `None`: absence propagates, it never turns into an
//! empty loop. Otherwise the result is a [`Lockstep`] that has not touched its
//! sources yet.
//!
//! `filter_map*` poll `ctx` with `site` before every advance attempt;
//! `take_while_map*` do not poll.

use crate::closure::{Indexed, Plain};
use crate::ctx::ExecCtx;
use crate::lockstep::Lockstep;
use crate::policy::{FilterMap, Map, TakeWhileMap, TryFilterMap, TryMap, TryTakeWhileMap};
use crate::sources::{MaybeSources, StepItem};

fn lockstep<M, P>(sources: M, policy: P) -> Option<Lockstep<M::Sources, P>>
where
    M: MaybeSources,
{
    Some(Lockstep::new(sources.present()?, policy))
}

/// Transforms every step tuple; stops when the shortest source runs out.
///
/// ```
/// let out: Vec<i32> = tandem::map((Some(vec![1, 2, 3, 4]), Some(vec![10, 20])), |(a, b)| a + b)
///     .expect("all sources present")
///     .collect();
/// assert_eq!(out, vec![11, 22]);
/// ```
pub fn map<M, F, R>(sources: M, transform: F) -> Option<Lockstep<M::Sources, Map<Plain<F>>>>
where
    M: MaybeSources,
    F: FnMut(StepItem<M>) -> R,
{
    lockstep(sources, Map::new(Plain(transform)))
}

/// Like [`map`], with the 0-based step index as the first closure argument.
pub fn map_indexed<M, F, R>(
    sources: M,
    transform: F,
) -> Option<Lockstep<M::Sources, Map<Indexed<F>>>>
where
    M: MaybeSources,
    F: FnMut(u64, StepItem<M>) -> R,
{
    lockstep(sources, Map::new(Indexed(transform)))
}

/// Transforms the step tuples `predicate` accepts and skips the others.
///
/// The index handed to indexed closures counts advances, not outputs.
pub fn filter_map<M, P, F, R, C, Id>(
    sources: M,
    predicate: P,
    transform: F,
    ctx: C,
    site: Id,
) -> Option<Lockstep<M::Sources, FilterMap<Plain<P>, Plain<F>, C, Id>>>
where
    M: MaybeSources,
    P: FnMut(&StepItem<M>) -> bool,
    F: FnMut(StepItem<M>) -> R,
    C: ExecCtx<Id>,
{
    lockstep(
        sources,
        FilterMap::new(Plain(predicate), Plain(transform), ctx, site),
    )
}

pub fn filter_map_indexed<M, P, F, R, C, Id>(
    sources: M,
    predicate: P,
    transform: F,
    ctx: C,
    site: Id,
) -> Option<Lockstep<M::Sources, FilterMap<Indexed<P>, Indexed<F>, C, Id>>>
where
    M: MaybeSources,
    P: FnMut(u64, &StepItem<M>) -> bool,
    F: FnMut(u64, StepItem<M>) -> R,
    C: ExecCtx<Id>,
{
    lockstep(
        sources,
        FilterMap::new(Indexed(predicate), Indexed(transform), ctx, site),
    )
}

/// Transforms step tuples until `predicate` first rejects one, then stops for
/// good, even if later tuples would pass.
pub fn take_while_map<M, P, F, R>(
    sources: M,
    predicate: P,
    transform: F,
) -> Option<Lockstep<M::Sources, TakeWhileMap<Plain<P>, Plain<F>>>>
where
    M: MaybeSources,
    P: FnMut(&StepItem<M>) -> bool,
    F: FnMut(StepItem<M>) -> R,
{
    lockstep(sources, TakeWhileMap::new(Plain(predicate), Plain(transform)))
}

pub fn take_while_map_indexed<M, P, F, R>(
    sources: M,
    predicate: P,
    transform: F,
) -> Option<Lockstep<M::Sources, TakeWhileMap<Indexed<P>, Indexed<F>>>>
where
    M: MaybeSources,
    P: FnMut(u64, &StepItem<M>) -> bool,
    F: FnMut(u64, StepItem<M>) -> R,
{
    lockstep(
        sources,
        TakeWhileMap::new(Indexed(predicate), Indexed(transform)),
    )
}

/// Fallible [`map`]. The first `Err` releases the cursors, is yielded, and ends
/// the loop.
pub fn try_map<M, F, O, E>(
    sources: M,
    transform: F,
) -> Option<Lockstep<M::Sources, TryMap<Plain<F>>>>
where
    M: MaybeSources,
    F: FnMut(StepItem<M>) -> Result<O, E>,
{
    lockstep(sources, TryMap::new(Plain(transform)))
}

pub fn try_map_indexed<M, F, O, E>(
    sources: M,
    transform: F,
) -> Option<Lockstep<M::Sources, TryMap<Indexed<F>>>>
where
    M: MaybeSources,
    F: FnMut(u64, StepItem<M>) -> Result<O, E>,
{
    lockstep(sources, TryMap::new(Indexed(transform)))
}

/// Fallible [`filter_map`]. An `Err` from either closure ends the loop after
/// being yielded once.
pub fn try_filter_map<M, P, F, O, E, C, Id>(
    sources: M,
    predicate: P,
    transform: F,
    ctx: C,
    site: Id,
) -> Option<Lockstep<M::Sources, TryFilterMap<Plain<P>, Plain<F>, C, Id>>>
where
    M: MaybeSources,
    P: FnMut(&StepItem<M>) -> Result<bool, E>,
    F: FnMut(StepItem<M>) -> Result<O, E>,
    C: ExecCtx<Id>,
{
    lockstep(
        sources,
        TryFilterMap::new(Plain(predicate), Plain(transform), ctx, site),
    )
}

pub fn try_filter_map_indexed<M, P, F, O, E, C, Id>(
    sources: M,
    predicate: P,
    transform: F,
    ctx: C,
    site: Id,
) -> Option<Lockstep<M::Sources, TryFilterMap<Indexed<P>, Indexed<F>, C, Id>>>
where
    M: MaybeSources,
    P: FnMut(u64, &StepItem<M>) -> Result<bool, E>,
    F: FnMut(u64, StepItem<M>) -> Result<O, E>,
    C: ExecCtx<Id>,
{
    lockstep(
        sources,
        TryFilterMap::new(Indexed(predicate), Indexed(transform), ctx, site),
    )
}

pub fn try_take_while_map<M, P, F, O, E>(
    sources: M,
    predicate: P,
    transform: F,
) -> Option<Lockstep<M::Sources, TryTakeWhileMap<Plain<P>, Plain<F>>>>
where
    M: MaybeSources,
    P: FnMut(&StepItem<M>) -> Result<bool, E>,
    F: FnMut(StepItem<M>) -> Result<O, E>,
{
    lockstep(
        sources,
        TryTakeWhileMap::new(Plain(predicate), Plain(transform)),
    )
}

pub fn try_take_while_map_indexed<M, P, F, O, E>(
    sources: M,
    predicate: P,
    transform: F,
) -> Option<Lockstep<M::Sources, TryTakeWhileMap<Indexed<P>, Indexed<F>>>>
where
    M: MaybeSources,
    P: FnMut(u64, &StepItem<M>) -> Result<bool, E>,
    F: FnMut(u64, StepItem<M>) -> Result<O, E>,
{
    lockstep(
        sources,
        TryTakeWhileMap::new(Indexed(predicate), Indexed(transform)),
    )
}
