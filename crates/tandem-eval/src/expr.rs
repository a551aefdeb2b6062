//! Loop-body expressions.
//!
//! Bodies are JSON s-expressions: integer and boolean literals, `["arg", k]`
//! for the k-th element of the step tuple, `["index"]` for the step index, and
//! operator forms such as `["+", a, b]`, `["<", a, b]`, `["not", a]`,
//! `["if", c, a, b]`.

use serde::Serialize;
use serde_json::Value as Json;

use crate::error::{EvalError, PlanError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Bool(bool),
}

impl Value {
    pub fn from_json(v: &Json) -> Option<Self> {
        match v {
            Json::Bool(b) => Some(Value::Bool(*b)),
            Json::Number(n) => n.as_i64().map(Value::Int),
            _ => None,
        }
    }

    pub fn kind(self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
        }
    }

    fn as_int(self, op: &'static str) -> Result<i64, EvalError> {
        match self {
            Value::Int(x) => Ok(x),
            other => Err(EvalError::Type {
                op,
                expected: "int",
                got: other.kind(),
            }),
        }
    }

    fn as_bool(self, op: &'static str) -> Result<bool, EvalError> {
        match self {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::Type {
                op,
                expected: "bool",
                got: other.kind(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::And => "and",
            BinOp::Or => "or",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "+" => Some(BinOp::Add),
            "-" => Some(BinOp::Sub),
            "*" => Some(BinOp::Mul),
            "/" => Some(BinOp::Div),
            "%" => Some(BinOp::Rem),
            "<" => Some(BinOp::Lt),
            "<=" => Some(BinOp::Le),
            ">" => Some(BinOp::Gt),
            ">=" => Some(BinOp::Ge),
            "==" => Some(BinOp::Eq),
            "!=" => Some(BinOp::Ne),
            "and" => Some(BinOp::And),
            "or" => Some(BinOp::Or),
            _ => None,
        }
    }

    // `and`/`or` short-circuit in `Expr::eval` and never get here.
    fn apply(self, x: Value, y: Value) -> Result<Value, EvalError> {
        let op = self.as_str();
        let ints = |x: Value, y: Value| Ok::<_, EvalError>((x.as_int(op)?, y.as_int(op)?));
        let out = match self {
            BinOp::Add => {
                let (a, b) = ints(x, y)?;
                Value::Int(a.checked_add(b).ok_or(EvalError::Overflow { op })?)
            }
            BinOp::Sub => {
                let (a, b) = ints(x, y)?;
                Value::Int(a.checked_sub(b).ok_or(EvalError::Overflow { op })?)
            }
            BinOp::Mul => {
                let (a, b) = ints(x, y)?;
                Value::Int(a.checked_mul(b).ok_or(EvalError::Overflow { op })?)
            }
            BinOp::Div | BinOp::Rem => {
                let (a, b) = ints(x, y)?;
                if b == 0 {
                    return Err(EvalError::DivByZero { op });
                }
                let r = if self == BinOp::Div {
                    a.checked_div(b)
                } else {
                    a.checked_rem(b)
                };
                Value::Int(r.ok_or(EvalError::Overflow { op })?)
            }
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                let (a, b) = ints(x, y)?;
                Value::Bool(match self {
                    BinOp::Lt => a < b,
                    BinOp::Le => a <= b,
                    BinOp::Gt => a > b,
                    _ => a >= b,
                })
            }
            BinOp::Eq | BinOp::Ne => {
                if x.kind() != y.kind() {
                    return Err(EvalError::Type {
                        op,
                        expected: x.kind(),
                        got: y.kind(),
                    });
                }
                Value::Bool((x == y) == (self == BinOp::Eq))
            }
            BinOp::And | BinOp::Or => {
                let a = x.as_bool(op)?;
                let b = y.as_bool(op)?;
                Value::Bool(if self == BinOp::And { a && b } else { a || b })
            }
        };
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Lit(Value),
    Arg(usize),
    Index,
    Not(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    If(Box<Expr>, Box<Expr>, Box<Expr>),
}

/// What a body may refer to.
#[derive(Debug, Clone, Copy)]
pub struct Scope {
    pub arity: usize,
    pub indexed: bool,
}

impl Expr {
    pub fn parse(v: &Json, ptr: &str, scope: Scope) -> Result<Expr, PlanError> {
        let bad = |msg: String| PlanError::Expr {
            ptr: ptr.to_string(),
            msg,
        };
        match v {
            Json::Bool(_) | Json::Number(_) => Value::from_json(v)
                .map(Expr::Lit)
                .ok_or_else(|| bad(format!("literal out of i64 range: {v}"))),
            Json::Array(items) => {
                let Some(head) = items.first().and_then(Json::as_str) else {
                    return Err(bad("expected [op, ...]".to_string()));
                };
                let args = &items[1..];
                let arg = |idx: usize| Expr::parse(&args[idx], &format!("{ptr}/{}", idx + 1), scope);
                let want = |n: usize| {
                    if args.len() == n {
                        Ok(())
                    } else {
                        Err(bad(format!("`{head}` takes {n} operand(s), got {}", args.len())))
                    }
                };
                match head {
                    "arg" => {
                        want(1)?;
                        let k = args[0]
                            .as_u64()
                            .and_then(|k| usize::try_from(k).ok())
                            .ok_or_else(|| bad("`arg` takes a non-negative integer".to_string()))?;
                        if k >= scope.arity {
                            return Err(bad(format!(
                                "`arg` {k} out of range for {} source(s)",
                                scope.arity
                            )));
                        }
                        Ok(Expr::Arg(k))
                    }
                    "index" => {
                        want(0)?;
                        if !scope.indexed {
                            return Err(bad("`index` requires \"indexed\": true".to_string()));
                        }
                        Ok(Expr::Index)
                    }
                    "not" => {
                        want(1)?;
                        Ok(Expr::Not(Box::new(arg(0)?)))
                    }
                    "if" => {
                        want(3)?;
                        Ok(Expr::If(
                            Box::new(arg(0)?),
                            Box::new(arg(1)?),
                            Box::new(arg(2)?),
                        ))
                    }
                    other => {
                        let op = BinOp::parse(other)
                            .ok_or_else(|| bad(format!("unknown operator {other:?}")))?;
                        want(2)?;
                        Ok(Expr::Binary(op, Box::new(arg(0)?), Box::new(arg(1)?)))
                    }
                }
            }
            other => Err(bad(format!("unsupported expression: {other}"))),
        }
    }

    pub fn eval(&self, index: Option<u64>, args: &[Value]) -> Result<Value, EvalError> {
        match self {
            Expr::Lit(v) => Ok(*v),
            Expr::Arg(k) => args.get(*k).copied().ok_or(EvalError::ArgOutOfRange {
                arg: *k,
                arity: args.len(),
            }),
            Expr::Index => {
                let i = index.ok_or(EvalError::NoIndex)?;
                i64::try_from(i)
                    .map(Value::Int)
                    .map_err(|_| EvalError::Overflow { op: "index" })
            }
            Expr::Not(a) => Ok(Value::Bool(!a.eval(index, args)?.as_bool("not")?)),
            Expr::If(c, a, b) => {
                if c.eval(index, args)?.as_bool("if")? {
                    a.eval(index, args)
                } else {
                    b.eval(index, args)
                }
            }
            Expr::Binary(BinOp::And, a, b) => {
                if !a.eval(index, args)?.as_bool("and")? {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(b.eval(index, args)?.as_bool("and")?))
            }
            Expr::Binary(BinOp::Or, a, b) => {
                if a.eval(index, args)?.as_bool("or")? {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(b.eval(index, args)?.as_bool("or")?))
            }
            Expr::Binary(op, a, b) => op.apply(a.eval(index, args)?, b.eval(index, args)?),
        }
    }

    pub fn eval_bool(&self, index: Option<u64>, args: &[Value]) -> Result<bool, EvalError> {
        self.eval(index, args)?.as_bool("predicate")
    }
}
