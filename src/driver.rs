//! Evaluation driver
//!
//! Generates one synthetic monthly salary per iteration, evaluates the
//! model, logs the outcome and sleeps on a power-law-ish pause. Runs
//! forever; any evaluation error propagates out and ends the process.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::config::DriverConfig;
use crate::engine::{DecisionRuntime, EvalContext, EvalError};
use crate::model::Value;

/// Input name the driver binds each iteration
pub const MONTHLY_SALARY_INPUT: &str = "Monthly Salary";
/// Decision name reported in the per-iteration log line
pub const YEARLY_SALARY_OUTPUT: &str = "Yearly Salary";

/// One loop iteration's observable outcome
#[derive(Debug)]
pub struct Iteration {
    pub monthly_salary: i64,
    pub yearly_salary: Value,
    pub pause: Duration,
}

/// Uniform draw within the configured salary bounds
pub fn generate_salary<R: Rng>(rng: &mut R, config: &DriverConfig) -> i64 {
    rng.gen_range(config.salary_min..config.salary_max)
}

/// Inverse-transform draw: mostly short pauses with an occasional long tail
pub fn generate_pause<R: Rng>(rng: &mut R, config: &DriverConfig) -> Duration {
    let u: f64 = rng.gen();
    let ms = (config.pause_base_ms as f64 / (1.0 - u)) as u64;
    Duration::from_millis(ms.max(1))
}

/// The demo's evaluation loop
pub struct Driver {
    runtime: Arc<DecisionRuntime>,
    config: DriverConfig,
}

impl Driver {
    pub fn new(runtime: Arc<DecisionRuntime>, config: DriverConfig) -> Self {
        Self { runtime, config }
    }

    /// Generate one input, evaluate the model and log the result.
    /// Does not sleep; [`Driver::run`] owns the pacing.
    pub fn evaluate_once<R: Rng>(&self, rng: &mut R) -> Result<Iteration, EvalError> {
        let monthly_salary = generate_salary(rng, &self.config);
        let pause = generate_pause(rng, &self.config);

        let mut context = EvalContext::new();
        context.set(MONTHLY_SALARY_INPUT, monthly_salary);

        let result = self.runtime.evaluate_all(&context)?;
        let yearly_salary = result
            .get(YEARLY_SALARY_OUTPUT)
            .cloned()
            .unwrap_or(Value::Null);

        info!(
            monthly = monthly_salary,
            yearly = %yearly_salary,
            pause_ms = pause.as_millis() as u64,
            "Evaluated decision model"
        );

        Ok(Iteration {
            monthly_salary,
            yearly_salary,
            pause,
        })
    }

    /// Run the loop forever
    pub async fn run(&self) -> Result<(), EvalError> {
        let mut rng = StdRng::from_entropy();
        loop {
            let iteration = self.evaluate_once(&mut rng)?;
            tokio::time::sleep(iteration.pause).await;
        }
    }
}
