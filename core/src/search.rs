//! Interval search for the largest value still meeting a condition.

use tracing::trace;

use crate::error::PlanError;
use crate::precision;
use crate::time;

/// The work evaluated by [`BinaryIntervalSearch`].
///
/// The condition is expected to be monotone: once it fails for a value, it
/// fails for every larger value.
pub trait SearchContext {
    /// First step used to find the upper bound of the interval.
    fn estimation_step(&self) -> f64;
    fn initial_value(&self) -> f64;
    fn max_value(&self) -> f64;
    /// Evaluates the candidate, the result is read by `meets_condition`.
    fn do_work(&mut self, value: f64);
    fn meets_condition(&self) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct BinaryIntervalSearch {
    precision: f64,
}

impl Default for BinaryIntervalSearch {
    fn default() -> Self {
        Self {
            precision: time::ONE_SECOND,
        }
    }
}

impl BinaryIntervalSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest value between initial and max value which meets the condition.
    ///
    /// Returns the initial value if even it doesn't meet the condition.
    pub fn search<C: SearchContext + ?Sized>(&self, context: &mut C) -> Result<f64, PlanError> {
        let initial = context.initial_value();
        let max = context.max_value();
        let mut step = context.estimation_step();

        if initial > max {
            return Err(PlanError::InvalidSearch(format!(
                "initial value {initial} is greater than max value {max}"
            )));
        }

        if step <= 0.0 {
            return Err(PlanError::InvalidSearch(format!(
                "estimation step {step} needs to be positive"
            )));
        }

        context.do_work(initial);
        if !context.meets_condition() {
            return Ok(initial);
        }

        let mut left = initial;
        let mut right;
        loop {
            right = (left + step).min(max);
            context.do_work(right);
            if !context.meets_condition() {
                break;
            }

            if right >= max {
                return Ok(max);
            }

            left = right;
            step *= 2.0;
        }

        trace!(left, right, "interval found");

        while right - left > self.precision {
            let middle = precision::floor_to_multiple(left + (right - left) / 2.0, self.precision);
            if middle <= left {
                break;
            }

            context.do_work(middle);
            if context.meets_condition() {
                left = middle;
            } else {
                right = middle;
            }
        }

        Ok(left)
    }
}
