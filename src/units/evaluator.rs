// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Expression evaluator using pest

use super::table::{self, UnitCategory};
use ahash::AHashMap;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use pest_derive::Parser;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "units/expr.pest"]
struct ExprParser;

/// Errors raised while evaluating a value or unit expression
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("failed to parse expression '{expr}': {message}")]
    Syntax { expr: String, message: String },

    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("function '{name}' expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("invalid number literal '{0}'")]
    Number(String),
}

pub type EvalResult<T> = Result<T, EvalError>;

fn pratt() -> &'static PrattParser<Rule> {
    static PRATT: OnceLock<PrattParser<Rule>> = OnceLock::new();
    PRATT.get_or_init(|| {
        PrattParser::new()
            .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))
            .op(Op::infix(Rule::mul, Assoc::Left) | Op::infix(Rule::div, Assoc::Left))
            .op(Op::prefix(Rule::neg) | Op::prefix(Rule::pos))
            .op(Op::infix(Rule::pow, Assoc::Right))
    })
}

/// Resolves numeric literals, units and compound expressions to internal units.
///
/// Identifiers are looked up first among user definitions (the document's
/// `<define>` constants), then among units, then among the built-in constants
/// `pi`, `twopi`, `halfpi` and `inf`.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    definitions: AHashMap<String, f64>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a named constant usable in later expressions
    pub fn define_constant(&mut self, name: impl Into<String>, value: f64) {
        self.definitions.insert(name.into(), value);
    }

    /// Look up a user definition
    pub fn constant(&self, name: &str) -> Option<f64> {
        self.definitions.get(name).copied()
    }

    /// Drop all user definitions
    pub fn clear(&mut self) {
        self.definitions.clear();
    }

    /// Evaluate a full expression such as `2*cm` or `sqrt(2)*mm/ns`
    pub fn evaluate(&self, expr: &str) -> EvalResult<f64> {
        let mut pairs =
            ExprParser::parse(Rule::formula, expr).map_err(|e| EvalError::Syntax {
                expr: expr.to_string(),
                message: e.variant.message().into_owned(),
            })?;

        match pairs.next() {
            Some(pair) if pair.as_rule() == Rule::expr => self.eval_expr(pair.into_inner()),
            _ => Err(EvalError::Syntax {
                expr: expr.to_string(),
                message: "empty expression".to_string(),
            }),
        }
    }

    /// Evaluate `text` and scale it by the value of the simple unit `unit`
    pub fn resolve(&self, text: &str, unit: &str) -> EvalResult<f64> {
        Ok(self.evaluate(text)? * self.unit_value(unit)?)
    }

    /// Value of a simple unit in internal units
    pub fn unit_value(&self, unit: &str) -> EvalResult<f64> {
        table::lookup(unit.trim())
            .map(|u| u.value)
            .ok_or_else(|| EvalError::UnknownUnit(unit.to_string()))
    }

    /// Category of a simple unit, `None` when the unit is unknown
    pub fn unit_category(&self, unit: &str) -> Option<UnitCategory> {
        table::lookup(unit.trim()).map(|u| u.category)
    }

    /// Canonical decimal rendering that `evaluate` reads back exactly
    pub fn to_string(&self, value: f64) -> String {
        format_value(value)
    }

    fn eval_expr(&self, pairs: Pairs<Rule>) -> EvalResult<f64> {
        pratt()
            .map_primary(|primary| self.eval_primary(primary))
            .map_prefix(|op, rhs| {
                let rhs = rhs?;
                Ok(match op.as_rule() {
                    Rule::neg => -rhs,
                    _ => rhs,
                })
            })
            .map_infix(|lhs, op, rhs| {
                let (lhs, rhs) = (lhs?, rhs?);
                Ok(match op.as_rule() {
                    Rule::add => lhs + rhs,
                    Rule::sub => lhs - rhs,
                    Rule::mul => lhs * rhs,
                    Rule::div => lhs / rhs,
                    _ => lhs.powf(rhs),
                })
            })
            .parse(pairs)
    }

    fn eval_primary(&self, pair: Pair<Rule>) -> EvalResult<f64> {
        match pair.as_rule() {
            Rule::number => pair
                .as_str()
                .parse::<f64>()
                .map_err(|_| EvalError::Number(pair.as_str().to_string())),
            Rule::ident => self.identifier(pair.as_str()),
            Rule::expr => self.eval_expr(pair.into_inner()),
            Rule::call => {
                let mut inner = pair.into_inner();
                let name = inner.next().map(|p| p.as_str()).unwrap_or_default();
                let args = inner
                    .map(|arg| self.eval_expr(arg.into_inner()))
                    .collect::<EvalResult<Vec<f64>>>()?;
                call_function(name, &args)
            }
            _ => Err(EvalError::Syntax {
                expr: pair.as_str().to_string(),
                message: format!("unexpected {:?}", pair.as_rule()),
            }),
        }
    }

    fn identifier(&self, name: &str) -> EvalResult<f64> {
        if let Some(value) = self.definitions.get(name) {
            return Ok(*value);
        }
        if let Some(unit) = table::lookup(name) {
            return Ok(unit.value);
        }
        match name {
            "pi" => Ok(std::f64::consts::PI),
            "twopi" => Ok(2.0 * std::f64::consts::PI),
            "halfpi" => Ok(std::f64::consts::FRAC_PI_2),
            "inf" => Ok(f64::INFINITY),
            _ => Err(EvalError::UnknownIdentifier(name.to_string())),
        }
    }
}

fn call_function(name: &str, args: &[f64]) -> EvalResult<f64> {
    let unary = |f: fn(f64) -> f64| -> EvalResult<f64> {
        match args {
            [x] => Ok(f(*x)),
            _ => Err(EvalError::Arity {
                name: name.to_string(),
                expected: 1,
                got: args.len(),
            }),
        }
    };
    let binary = |f: fn(f64, f64) -> f64| -> EvalResult<f64> {
        match args {
            [x, y] => Ok(f(*x, *y)),
            _ => Err(EvalError::Arity {
                name: name.to_string(),
                expected: 2,
                got: args.len(),
            }),
        }
    };

    match name {
        "sin" => unary(f64::sin),
        "cos" => unary(f64::cos),
        "tan" => unary(f64::tan),
        "asin" => unary(f64::asin),
        "acos" => unary(f64::acos),
        "atan" => unary(f64::atan),
        "exp" => unary(f64::exp),
        "log" => unary(f64::ln),
        "log10" => unary(f64::log10),
        "sqrt" => unary(f64::sqrt),
        "abs" => unary(f64::abs),
        "atan2" => binary(f64::atan2),
        "pow" => binary(f64::powf),
        "min" => binary(f64::min),
        "max" => binary(f64::max),
        _ => Err(EvalError::UnknownFunction(name.to_string())),
    }
}

/// Shortest round-trip rendering; exponent form outside `[1e-4, 1e15)`
pub fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 {
        "0".to_string()
    } else if value.is_finite() && !(1.0e-4..1.0e15).contains(&magnitude) {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}
