//! Schema identifiers for the JSON documents `tandem` reads and writes.
//!
//! Plans carry `TANDEM_PLAN_SCHEMA_VERSION` and are rejected on mismatch;
//! reports and plan summaries echo the matching constant.

pub const TANDEM_PLAN_SCHEMA_VERSION: &str = "tandem.plan@0.1.0";
pub const TANDEM_REPORT_SCHEMA_VERSION: &str = "tandem.report@0.1.0";
