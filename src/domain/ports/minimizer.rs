//! Minimizer port - the black-box optimizer choosing what to measure next.

use async_trait::async_trait;

use crate::domain::errors::MinimizerError;
use crate::domain::models::{MinimizeRequest, OptimizeResult};

/// Objective evaluated by a minimizer, one configuration at a time.
///
/// Evaluation never fails: implementations fold failures into a value.
#[async_trait]
pub trait Objective: Send {
    async fn evaluate(&mut self, configuration: &[i64]) -> f64;
}

/// A sample-efficient black-box minimizer.
///
/// Seed points in the request are already evaluated and must not be passed
/// to the objective again. `x_iters`/`func_vals` of the result list the
/// seeds first, then every evaluation in call order.
#[async_trait]
pub trait Minimizer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn minimize(
        &self,
        objective: &mut dyn Objective,
        request: MinimizeRequest,
    ) -> Result<OptimizeResult, MinimizerError>;
}
