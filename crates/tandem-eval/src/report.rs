use serde::Serialize;
use tandem_contracts::{TANDEM_PLAN_SCHEMA_VERSION, TANDEM_REPORT_SCHEMA_VERSION};

use crate::expr::Value;
use crate::plan::{Mode, Plan};

/// Outcome of `tandem run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub schema_version: &'static str,
    pub ok: bool,
    pub mode: Mode,
    pub indexed: bool,
    /// A source was `null`; the loop never existed.
    pub absent: bool,
    pub items: Option<Vec<Value>>,
    /// Successful advances of all sources together.
    pub steps: u64,
    /// Cancellation polls, reported for `filter_map` only.
    pub polls: Option<u64>,
    pub cancelled: bool,
    pub error: Option<String>,
}

impl Report {
    pub fn new(plan: &Plan) -> Self {
        Report {
            schema_version: TANDEM_REPORT_SCHEMA_VERSION,
            ok: true,
            mode: plan.mode(),
            indexed: plan.indexed,
            absent: false,
            items: None,
            steps: 0,
            polls: None,
            cancelled: false,
            error: None,
        }
    }
}

/// Output of `tandem check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub schema_version: &'static str,
    pub ok: bool,
    pub mode: Mode,
    pub indexed: bool,
    pub arity: usize,
    pub absent: bool,
    pub site: String,
}

impl PlanSummary {
    pub fn new(plan: &Plan) -> Self {
        PlanSummary {
            schema_version: TANDEM_PLAN_SCHEMA_VERSION,
            ok: true,
            mode: plan.mode(),
            indexed: plan.indexed,
            arity: plan.arity(),
            absent: plan.has_absent_source(),
            site: plan.site.clone(),
        }
    }
}
