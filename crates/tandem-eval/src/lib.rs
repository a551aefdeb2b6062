//! Plan-driven front end for the `tandem` lock-step loops.
//!
//! A plan names a loop mode, its sources, and JSON-expression bodies; running it
//! produces a [`Report`].

pub mod config;
pub mod error;
pub mod expr;
pub mod plan;
pub mod report;
pub mod run;

pub use error::{EvalError, PlanError};
pub use expr::{Expr, Value};
pub use plan::{Body, Mode, Plan};
pub use report::{PlanSummary, Report};
pub use run::{run_plan, RunOptions};
