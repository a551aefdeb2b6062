//! Lock-step loop combinators for expression runtimes.
//!
//! `forEach`, `forEach-if` and `while` loops over 1 to 16 parallel sequences
//! share one driver, [`Lockstep`]: it advances every cursor once per step,
//! stops at the shortest sequence, and hands each step tuple to a
//! [`Policy`](policy::Policy) that maps, filters, or stops.
//!
//! - [`map`], [`map_indexed`]: transform every step.
//! - [`filter_map`], [`filter_map_indexed`]: transform accepted steps, skip the
//!   rest, polling an [`ExecCtx`] before every step.
//! - [`take_while_map`], [`take_while_map_indexed`]: transform until the first
//!   rejected step.
//! - `try_*`: the same loops with closures returning `Result`.
//!
//! Sources are passed as a tuple of `Option`s. A `None` source makes the whole
//! result `None`; an empty source makes an empty loop.

pub mod closure;
pub mod ctx;
mod exec;
mod lockstep;
pub mod policy;
pub mod sources;

pub use ctx::{CancelFlag, ExecCtx, Fuel, Unbounded};
pub use exec::{
    filter_map, filter_map_indexed, map, map_indexed, take_while_map, take_while_map_indexed,
    try_filter_map, try_filter_map_indexed, try_map, try_map_indexed, try_take_while_map,
    try_take_while_map_indexed,
};
pub use lockstep::Lockstep;
pub use sources::{Cursors, MaybeSources, Sources, StepItem, MAX_ARITY};
