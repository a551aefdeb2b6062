use std::iter::FusedIterator;
use std::mem;
use std::ops::ControlFlow;

use tracing::trace;

use crate::policy::{Policy, Step};
use crate::sources::{Cursors, Sources};

enum State<S: Sources> {
    Pending(S),
    Running(S::Cursors),
    Stopped,
}

/// Lazy lock-step producer.
///
/// Nothing is acquired until the first call to `next`. Cursors are dropped as
/// soon as the loop stops, whatever the reason, and also when the producer is
/// dropped mid-way. While a pull is in progress the cursors live on the stack
/// of `next`, so a panicking closure releases them on its way out.
///
/// Single pass: once `next` has returned `None` it keeps returning `None`.
#[must_use = "iterator adaptors are lazy"]
pub struct Lockstep<S: Sources, P> {
    state: State<S>,
    policy: P,
    steps: u64,
}

impl<S: Sources, P> Lockstep<S, P> {
    pub fn new(sources: S, policy: P) -> Self {
        Self {
            state: State::Pending(sources),
            policy,
            steps: 0,
        }
    }

    /// Number of successful advances so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_started(&self) -> bool {
        !matches!(self.state, State::Pending(_))
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.state, State::Stopped)
    }

    fn stopped(&self, reason: &'static str) {
        trace!(target: "tandem", steps = self.steps, reason, "lockstep stopped");
    }
}

impl<S, P> Iterator for Lockstep<S, P>
where
    S: Sources,
    P: Policy<S::Item>,
{
    type Item = P::Output;

    fn next(&mut self) -> Option<Self::Item> {
        let mut cursors = match mem::replace(&mut self.state, State::Stopped) {
            State::Pending(sources) => {
                trace!(target: "tandem", arity = sources.arity(), "lockstep acquire");
                sources.acquire()
            }
            State::Running(cursors) => cursors,
            State::Stopped => return None,
        };

        loop {
            if let ControlFlow::Break(()) = self.policy.poll() {
                drop(cursors);
                self.stopped("cancelled");
                return None;
            }
            let Some(item) = cursors.advance() else {
                drop(cursors);
                self.stopped("exhausted");
                return None;
            };
            let index = self.steps;
            self.steps += 1;

            match self.policy.apply(index, item) {
                Step::Emit(out) => {
                    self.state = State::Running(cursors);
                    return Some(out);
                }
                Step::Skip => {}
                Step::Halt => {
                    drop(cursors);
                    self.stopped("predicate");
                    return None;
                }
                Step::Fail(out) => {
                    drop(cursors);
                    self.stopped("failed");
                    return Some(out);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.state {
            State::Pending(_) => (0, None),
            State::Running(cursors) => {
                let (lo, hi) = cursors.size_hint();
                if P::EXACT {
                    (lo, hi)
                } else {
                    (0, hi)
                }
            }
            State::Stopped => (0, Some(0)),
        }
    }
}

impl<S, P> FusedIterator for Lockstep<S, P>
where
    S: Sources,
    P: Policy<S::Item>,
{
}
