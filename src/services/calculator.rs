//! Interactive compound-input calculation.
//!
//! Holds the two raw sub-inputs of a compound quantity and re-evaluates
//! the derived value on every change. Only the derived number is ever
//! persisted; the calculator itself is throwaway per editing session.

use crate::types::{CompoundConfig, CompoundOperation, ValueFormat};

/// Result of evaluating the current pair of sub-inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalculationOutcome {
    /// One or both sub-inputs missing; nothing to show yet.
    Incomplete,
    /// Division by zero — a distinct error state, not a zero result.
    DivideByZero,
    Value(f64),
}

impl CalculationOutcome {
    pub fn value(&self) -> Option<f64> {
        match self {
            CalculationOutcome::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// Two-input calculator for one compound quantity type.
#[derive(Debug, Clone)]
pub struct CompoundCalculator {
    config: CompoundConfig,
    /// Treat an entered 0 as "not entered yet". Off by default.
    zero_counts_as_empty: bool,
    input1: Option<f64>,
    input2: Option<f64>,
}

impl CompoundCalculator {
    pub fn new(config: CompoundConfig) -> Self {
        Self {
            config,
            zero_counts_as_empty: false,
            input1: None,
            input2: None,
        }
    }

    pub fn zero_counts_as_empty(mut self, yes: bool) -> Self {
        self.zero_counts_as_empty = yes;
        self
    }

    pub fn config(&self) -> &CompoundConfig {
        &self.config
    }

    pub fn set_input1(&mut self, value: Option<f64>) {
        self.input1 = value;
    }

    pub fn set_input2(&mut self, value: Option<f64>) {
        self.input2 = value;
    }

    /// Evaluate the current inputs. Re-run after every sub-input change.
    pub fn outcome(&self) -> CalculationOutcome {
        let (input1, input2) = match (self.present(self.input1), self.present(self.input2)) {
            (Some(a), Some(b)) => (a, b),
            _ => return CalculationOutcome::Incomplete,
        };
        match self.config.operation.calculate(input1, input2) {
            Some(value) => CalculationOutcome::Value(value),
            None => CalculationOutcome::DivideByZero,
        }
    }

    /// Display format for the derived value: duration for time
    /// differences, decimal otherwise.
    pub fn result_format(&self) -> ValueFormat {
        self.config.operation.result_format()
    }

    fn present(&self, value: Option<f64>) -> Option<f64> {
        value.filter(|v| !self.zero_counts_as_empty || *v != 0.0)
    }
}
