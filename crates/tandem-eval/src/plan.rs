use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use tandem::MAX_ARITY;
use tandem_contracts::TANDEM_PLAN_SCHEMA_VERSION;

use crate::error::PlanError;
use crate::expr::{Expr, Scope, Value};

pub const DEFAULT_SITE: &str = "loop";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Map,
    FilterMap,
    TakeWhileMap,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Map => "map",
            Mode::FilterMap => "filter_map",
            Mode::TakeWhileMap => "take_while_map",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlanFile {
    schema_version: String,
    mode: Mode,
    #[serde(default)]
    indexed: bool,
    #[serde(default)]
    site: Option<String>,
    sources: Vec<Option<Vec<Json>>>,
    #[serde(default)]
    predicate: Option<Json>,
    transform: Json,
    #[serde(default)]
    limit: Option<u64>,
    #[serde(default)]
    fuel: Option<u64>,
}

/// The loop body, shaped by mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Map { transform: Expr },
    FilterMap { predicate: Expr, transform: Expr },
    TakeWhileMap { predicate: Expr, transform: Expr },
}

impl Body {
    pub fn mode(&self) -> Mode {
        match self {
            Body::Map { .. } => Mode::Map,
            Body::FilterMap { .. } => Mode::FilterMap,
            Body::TakeWhileMap { .. } => Mode::TakeWhileMap,
        }
    }
}

/// A validated plan. Every expression only refers to arguments that exist and
/// uses `index` only when `indexed` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub body: Body,
    pub indexed: bool,
    pub site: String,
    pub sources: Vec<Option<Vec<Value>>>,
    pub limit: Option<u64>,
    pub fuel: Option<u64>,
}

impl Plan {
    pub fn mode(&self) -> Mode {
        self.body.mode()
    }

    pub fn arity(&self) -> usize {
        self.sources.len()
    }

    /// True when at least one source is `null`.
    pub fn has_absent_source(&self) -> bool {
        self.sources.iter().any(Option::is_none)
    }

    pub fn from_json_bytes(bytes: &[u8]) -> Result<Plan, PlanError> {
        let file: PlanFile = serde_json::from_slice(bytes)?;
        Plan::validate(file)
    }

    fn validate(file: PlanFile) -> Result<Plan, PlanError> {
        if file.schema_version != TANDEM_PLAN_SCHEMA_VERSION {
            return Err(PlanError::SchemaVersion {
                expected: TANDEM_PLAN_SCHEMA_VERSION,
                got: file.schema_version,
            });
        }

        let arity = file.sources.len();
        if !(1..=MAX_ARITY).contains(&arity) {
            return Err(PlanError::Arity {
                got: arity,
                max: MAX_ARITY,
            });
        }

        let mut sources = Vec::with_capacity(arity);
        for (i, src) in file.sources.iter().enumerate() {
            let Some(items) = src else {
                sources.push(None);
                continue;
            };
            let mut values = Vec::with_capacity(items.len());
            for (j, item) in items.iter().enumerate() {
                let v = Value::from_json(item).ok_or_else(|| PlanError::Source {
                    ptr: format!("/sources/{i}/{j}"),
                    msg: format!("expected an integer or boolean, got {item}"),
                })?;
                values.push(v);
            }
            sources.push(Some(values));
        }

        let scope = Scope {
            arity,
            indexed: file.indexed,
        };
        let transform = Expr::parse(&file.transform, "/transform", scope)?;
        let predicate = file
            .predicate
            .as_ref()
            .map(|p| Expr::parse(p, "/predicate", scope))
            .transpose()?;

        let body = match (file.mode, predicate) {
            (Mode::Map, None) => Body::Map { transform },
            (Mode::Map, Some(_)) => {
                return Err(PlanError::UnexpectedPredicate {
                    mode: Mode::Map.as_str(),
                })
            }
            (Mode::FilterMap, Some(predicate)) => Body::FilterMap {
                predicate,
                transform,
            },
            (Mode::TakeWhileMap, Some(predicate)) => Body::TakeWhileMap {
                predicate,
                transform,
            },
            (mode, None) => {
                return Err(PlanError::MissingPredicate {
                    mode: mode.as_str(),
                })
            }
        };

        Ok(Plan {
            body,
            indexed: file.indexed,
            site: file.site.unwrap_or_else(|| DEFAULT_SITE.to_string()),
            sources,
            limit: file.limit,
            fuel: file.fuel,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn load(v: Json) -> Result<Plan, PlanError> {
        Plan::from_json_bytes(&serde_json::to_vec(&v).unwrap())
    }

    #[test]
    fn filter_map_plan_loads() {
        let plan = load(json!({
            "schema_version": TANDEM_PLAN_SCHEMA_VERSION,
            "mode": "filter_map",
            "sources": [[1, 2, 3], null, [true, false]],
            "predicate": ["<", ["arg", 0], 3],
            "transform": ["arg", 0],
            "limit": 2
        }))
        .expect("valid plan");

        assert_eq!(plan.mode(), Mode::FilterMap);
        assert_eq!(plan.arity(), 3);
        assert!(plan.has_absent_source());
        assert!(!plan.indexed);
        assert_eq!(plan.site, DEFAULT_SITE);
        assert_eq!(plan.limit, Some(2));
        assert_eq!(plan.fuel, None);
        assert_eq!(
            plan.sources[2],
            Some(vec![Value::Bool(true), Value::Bool(false)])
        );
    }

    #[test]
    fn schema_version_is_pinned() {
        let err = load(json!({
            "schema_version": "tandem.plan@0.0.1",
            "mode": "map",
            "sources": [[1]],
            "transform": 1
        }))
        .unwrap_err();
        assert!(matches!(err, PlanError::SchemaVersion { .. }), "{err}");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = load(json!({
            "schema_version": TANDEM_PLAN_SCHEMA_VERSION,
            "mode": "map",
            "sources": [[1]],
            "transform": 1,
            "retries": 3
        }))
        .unwrap_err();
        assert!(matches!(err, PlanError::Json(_)), "{err}");
    }

    #[test]
    fn arity_must_fit_the_lockstep_range() {
        for n in [0usize, MAX_ARITY + 1] {
            let sources: Vec<Json> = (0..n).map(|_| json!([1])).collect();
            let err = load(json!({
                "schema_version": TANDEM_PLAN_SCHEMA_VERSION,
                "mode": "map",
                "sources": sources,
                "transform": 0
            }))
            .unwrap_err();
            assert!(matches!(err, PlanError::Arity { got, .. } if got == n), "{err}");
        }
    }

    #[test]
    fn predicate_presence_follows_the_mode() {
        let err = load(json!({
            "schema_version": TANDEM_PLAN_SCHEMA_VERSION,
            "mode": "take_while_map",
            "sources": [[1]],
            "transform": ["arg", 0]
        }))
        .unwrap_err();
        assert!(
            matches!(err, PlanError::MissingPredicate { mode: "take_while_map" }),
            "{err}"
        );

        let err = load(json!({
            "schema_version": TANDEM_PLAN_SCHEMA_VERSION,
            "mode": "map",
            "sources": [[1]],
            "predicate": true,
            "transform": ["arg", 0]
        }))
        .unwrap_err();
        assert!(matches!(err, PlanError::UnexpectedPredicate { .. }), "{err}");
    }

    #[test]
    fn source_elements_must_be_values() {
        let err = load(json!({
            "schema_version": TANDEM_PLAN_SCHEMA_VERSION,
            "mode": "map",
            "sources": [[1, 2], [3, "four"]],
            "transform": ["arg", 0]
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "/sources/1/1: expected an integer or boolean, got \"four\""
        );
    }

    #[test]
    fn index_needs_an_indexed_plan() {
        let base = json!({
            "schema_version": TANDEM_PLAN_SCHEMA_VERSION,
            "mode": "map",
            "sources": [[1]],
            "transform": ["index"]
        });
        assert!(matches!(load(base.clone()), Err(PlanError::Expr { .. })));

        let mut indexed = base;
        indexed["indexed"] = json!(true);
        indexed["site"] = json!("outer");
        let plan = load(indexed).expect("indexed plan");
        assert_eq!(plan.body, Body::Map { transform: Expr::Index });
        assert_eq!(plan.site, "outer");
    }
}
