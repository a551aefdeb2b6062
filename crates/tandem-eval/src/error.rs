use thiserror::Error;

/// Failures while evaluating a loop body for one step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("integer overflow in `{op}`")]
    Overflow { op: &'static str },

    #[error("division by zero in `{op}`")]
    DivByZero { op: &'static str },

    #[error("`{op}` expects {expected}, got {got}")]
    Type {
        op: &'static str,
        expected: &'static str,
        got: &'static str,
    },

    #[error("argument {arg} out of range for arity {arity}")]
    ArgOutOfRange { arg: usize, arity: usize },

    #[error("`index` used in a loop without a step index")]
    NoIndex,
}

/// Problems found while loading a plan file.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("parse plan JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("plan schema_version mismatch: expected {expected} got {got:?}")]
    SchemaVersion { expected: &'static str, got: String },

    #[error("plan needs between 1 and {max} sources, got {got}")]
    Arity { got: usize, max: usize },

    #[error("{ptr}: {msg}")]
    Source { ptr: String, msg: String },

    #[error("{ptr}: {msg}")]
    Expr { ptr: String, msg: String },

    #[error("mode {mode} requires a predicate")]
    MissingPredicate { mode: &'static str },

    #[error("mode {mode} does not take a predicate")]
    UnexpectedPredicate { mode: &'static str },
}
