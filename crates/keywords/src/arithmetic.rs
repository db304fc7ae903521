// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Sample keyword library: two-operand arithmetic
//!
//! Arguments arrive as captured text and are parsed here, so an instruction
//! such as `"Add one and two"` matches `add` but fails inside the handler.

use crate::error::BoxError;
use crate::register_keyword_library;
use crate::registry::{Keyword, KeywordLibrary};
use serde_json::{Number, Value};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ArithmeticError {
    #[error("not a number: {0:?}")]
    NotANumber(String),

    #[error("expected {expected} operands, got {got}")]
    Arity { expected: usize, got: usize },

    #[error("result is not finite: {0}")]
    NotFinite(f64),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Arithmetic;

impl Arithmetic {
    /// `Add ${first} and ${second}`: first + second
    pub fn add(&self, args: &[String]) -> Result<Value, BoxError> {
        let [first, second] = operands(args)?;
        Ok(number(first + second)?)
    }

    /// `Subtract ${first} from ${second}`: second - first
    pub fn subtract(&self, args: &[String]) -> Result<Value, BoxError> {
        let [first, second] = operands(args)?;
        Ok(number(second - first)?)
    }

    /// `Multiply ${first} and ${second}`: first * second
    pub fn multiply(&self, args: &[String]) -> Result<Value, BoxError> {
        let [first, second] = operands(args)?;
        Ok(number(first * second)?)
    }
}

impl KeywordLibrary for Arithmetic {
    fn keywords() -> Vec<Keyword<Self>> {
        vec![
            Keyword::new("add", "Add ${first} and ${second}", Self::add),
            Keyword::new("subtract", "Subtract ${first} from ${second}", Self::subtract),
            Keyword::new("multiply", "Multiply ${first} and ${second}", Self::multiply),
        ]
    }
}

register_keyword_library!(
    name: "arithmetic",
    description: "Add, subtract and multiply two numbers",
    library: Arithmetic::default
);

fn operands<const N: usize>(args: &[String]) -> Result<[f64; N], ArithmeticError> {
    if args.len() != N {
        return Err(ArithmeticError::Arity {
            expected: N,
            got: args.len(),
        });
    }
    let mut values = [0.0; N];
    for (value, arg) in values.iter_mut().zip(args) {
        *value = arg
            .trim()
            .parse()
            .map_err(|_| ArithmeticError::NotANumber(arg.clone()))?;
    }
    Ok(values)
}

fn number(value: f64) -> Result<Value, ArithmeticError> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or(ArithmeticError::NotFinite(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_operations() {
        let arithmetic = Arithmetic;
        assert_eq!(arithmetic.add(&args(&["1", "2"])).unwrap(), Value::from(3.0));
        assert_eq!(arithmetic.subtract(&args(&["1", "2"])).unwrap(), Value::from(1.0));
        assert_eq!(arithmetic.multiply(&args(&["3", "4"])).unwrap(), Value::from(12.0));
    }

    #[test]
    fn test_operands_accept_padding_and_decimals() {
        assert_eq!(operands::<2>(&args(&[" 1.5", "2 "])), Ok([1.5, 2.0]));
        assert_eq!(operands::<2>(&args(&["-3", "1e2"])), Ok([-3.0, 100.0]));
    }

    #[test]
    fn test_operands_reject_text() {
        assert_eq!(
            operands::<2>(&args(&["one", "2"])),
            Err(ArithmeticError::NotANumber("one".to_string()))
        );
        assert_eq!(
            operands::<2>(&args(&["1"])),
            Err(ArithmeticError::Arity { expected: 2, got: 1 })
        );
    }

    #[test]
    fn test_non_finite_result() {
        let err = Arithmetic
            .multiply(&args(&["1e308", "10"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "result is not finite: inf");

        // Infinite operands parse, but the result cannot be a JSON number
        let err = Arithmetic.add(&args(&["inf", "1"])).unwrap_err();
        assert_eq!(err.to_string(), "result is not finite: inf");
    }
}
