//! Runs a validated plan through the lock-step combinators.
//!
//! A plan's arity is only known once it is loaded, so each arity from 1 to 16
//! gets its own tuple instantiation; step tuples are flattened into a `[Value; N]`
//! before the body expressions see them.

use std::iter::Copied;
use std::slice;

use tandem::policy::Policy;
use tandem::{Fuel, Lockstep, MaybeSources, Sources, StepItem};
use tracing::{debug, warn};

use crate::error::EvalError;
use crate::expr::Value;
use crate::plan::{Body, Plan};
use crate::report::Report;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Poll budget for `filter_map`. Overrides the plan's `fuel`; `None` on
    /// both sides is unlimited.
    pub fuel: Option<u64>,
    /// Stop pulling after this many outputs. Overrides the plan's `limit`.
    pub limit: Option<u64>,
}

/// A step tuple of values, viewed as an argument list.
pub trait StepArgs {
    type Args: AsRef<[Value]>;

    fn to_args(&self) -> Self::Args;
}

macro_rules! step_args {
    (@value $i:tt) => { Value };
    ( $n:literal; $( $i:tt ),+ ) => {
        impl StepArgs for ($(step_args!(@value $i),)+) {
            type Args = [Value; $n];

            #[inline]
            fn to_args(&self) -> [Value; $n] {
                [$(self.$i),+]
            }
        }
    };
}

step_args!(1; 0);
step_args!(2; 0, 1);
step_args!(3; 0, 1, 2);
step_args!(4; 0, 1, 2, 3);
step_args!(5; 0, 1, 2, 3, 4);
step_args!(6; 0, 1, 2, 3, 4, 5);
step_args!(7; 0, 1, 2, 3, 4, 5, 6);
step_args!(8; 0, 1, 2, 3, 4, 5, 6, 7);
step_args!(9; 0, 1, 2, 3, 4, 5, 6, 7, 8);
step_args!(10; 0, 1, 2, 3, 4, 5, 6, 7, 8, 9);
step_args!(11; 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10);
step_args!(12; 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11);
step_args!(13; 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12);
step_args!(14; 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13);
step_args!(15; 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14);
step_args!(16; 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15);

struct Drained {
    items: Vec<Value>,
    steps: u64,
    error: Option<EvalError>,
}

fn drain<S, P>(mut lockstep: Lockstep<S, P>, limit: Option<u64>) -> Drained
where
    S: Sources,
    P: Policy<S::Item, Output = Result<Value, EvalError>>,
{
    let mut items = Vec::new();
    let mut error = None;
    while limit.map_or(true, |n| (items.len() as u64) < n) {
        match lockstep.next() {
            Some(Ok(v)) => items.push(v),
            Some(Err(err)) => {
                error = Some(err);
                break;
            }
            None => break,
        }
    }
    Drained {
        items,
        steps: lockstep.steps(),
        error,
    }
}

/// Runs the plan body over one concrete source tuple. `None` means a source was
/// absent.
fn drive<M>(plan: &Plan, sources: M, fuel: &Fuel, limit: Option<u64>) -> Option<Drained>
where
    M: MaybeSources,
    StepItem<M>: StepArgs,
{
    let site = plan.site.as_str();
    let ix = |i: u64| plan.indexed.then_some(i);

    match (&plan.body, plan.indexed) {
        (Body::Map { transform }, false) => {
            tandem::try_map(sources, |step| transform.eval(None, step.to_args().as_ref()))
                .map(|l| drain(l, limit))
        }
        (Body::Map { transform }, true) => tandem::try_map_indexed(sources, |i, step| {
            transform.eval(ix(i), step.to_args().as_ref())
        })
        .map(|l| drain(l, limit)),
        (
            Body::FilterMap {
                predicate,
                transform,
            },
            false,
        ) => tandem::try_filter_map(
            sources,
            |step| predicate.eval_bool(None, step.to_args().as_ref()),
            |step| transform.eval(None, step.to_args().as_ref()),
            fuel,
            site,
        )
        .map(|l| drain(l, limit)),
        (
            Body::FilterMap {
                predicate,
                transform,
            },
            true,
        ) => tandem::try_filter_map_indexed(
            sources,
            |i, step| predicate.eval_bool(ix(i), step.to_args().as_ref()),
            |i, step| transform.eval(ix(i), step.to_args().as_ref()),
            fuel,
            site,
        )
        .map(|l| drain(l, limit)),
        (
            Body::TakeWhileMap {
                predicate,
                transform,
            },
            false,
        ) => tandem::try_take_while_map(
            sources,
            |step| predicate.eval_bool(None, step.to_args().as_ref()),
            |step| transform.eval(None, step.to_args().as_ref()),
        )
        .map(|l| drain(l, limit)),
        (
            Body::TakeWhileMap {
                predicate,
                transform,
            },
            true,
        ) => tandem::try_take_while_map_indexed(
            sources,
            |i, step| predicate.eval_bool(ix(i), step.to_args().as_ref()),
            |i, step| transform.eval(ix(i), step.to_args().as_ref()),
        )
        .map(|l| drain(l, limit)),
    }
}

type Source<'a> = Option<Copied<slice::Iter<'a, Value>>>;

fn source(plan: &Plan, i: usize) -> Source<'_> {
    plan.sources[i].as_ref().map(|items| items.iter().copied())
}

macro_rules! drive_arity {
    ( $plan:expr, $fuel:expr, $limit:expr; $( $n:literal => ( $( $i:tt ),+ ) ),+ $(,)? ) => {
        match $plan.arity() {
            $( $n => Some(drive($plan, ($(source($plan, $i),)+), $fuel, $limit)), )+
            _ => None,
        }
    };
}

pub fn run_plan(plan: &Plan, opts: &RunOptions) -> Report {
    let limit = opts.limit.or(plan.limit);
    let fuel = opts.fuel.or(plan.fuel).map_or_else(Fuel::unlimited, Fuel::new);
    debug!(
        mode = plan.mode().as_str(),
        arity = plan.arity(),
        indexed = plan.indexed,
        ?limit,
        fuel = fuel.limit(),
        "run plan"
    );

    let driven = drive_arity!(plan, &fuel, limit;
        1 => (0),
        2 => (0, 1),
        3 => (0, 1, 2),
        4 => (0, 1, 2, 3),
        5 => (0, 1, 2, 3, 4),
        6 => (0, 1, 2, 3, 4, 5),
        7 => (0, 1, 2, 3, 4, 5, 6),
        8 => (0, 1, 2, 3, 4, 5, 6, 7),
        9 => (0, 1, 2, 3, 4, 5, 6, 7, 8),
        10 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9),
        11 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10),
        12 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11),
        13 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12),
        14 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13),
        15 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14),
        16 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15),
    );

    let mut report = Report::new(plan);
    let Some(drained) = driven else {
        warn!(arity = plan.arity(), "no lock-step loop for this arity");
        report.ok = false;
        report.error = Some(format!("unsupported arity {}", plan.arity()));
        return report;
    };
    if matches!(plan.body, Body::FilterMap { .. }) {
        report.polls = Some(fuel.polls());
        report.cancelled = fuel.is_exhausted();
    }
    let Some(drained) = drained else {
        debug!("source absent; loop not built");
        report.absent = true;
        return report;
    };

    report.items = Some(drained.items);
    report.steps = drained.steps;
    if let Some(err) = drained.error {
        warn!(steps = drained.steps, error = %err, "loop body failed");
        report.ok = false;
        report.error = Some(err.to_string());
    }
    debug!(
        steps = report.steps,
        polls = ?report.polls,
        cancelled = report.cancelled,
        "run done"
    );
    report
}
