//! Shared stubs for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use jsc_tune::domain::models::{jsc_inlining_parameters, ParameterSpace};
use jsc_tune::{ExecutionError, MeasurementChannel};

pub fn jsc_space() -> ParameterSpace {
    ParameterSpace::new(jsc_inlining_parameters()).expect("built-in parameters are valid")
}

pub fn failure() -> ExecutionError {
    ExecutionError::TransientExecutionFailure {
        command: "cd JetStream2; jsc watch-cli.js".into(),
        attempts: 3,
        status: "139".into(),
        stdout: String::new(),
        stderr: "Segmentation fault".into(),
    }
}

/// Scores `100 + Σ|x - default|`. Configurations listed in `failing` fail
/// as many times as scripted, then succeed.
pub struct DistanceChannel {
    defaults: Vec<i64>,
    failures: Mutex<VecDeque<bool>>,
    calls: AtomicU32,
}

impl DistanceChannel {
    pub fn new(defaults: Vec<i64>) -> Self {
        Self {
            defaults,
            failures: Mutex::new(VecDeque::new()),
            calls: AtomicU32::new(0),
        }
    }

    /// Script the outcome of the next invocations: `true` fails.
    pub fn with_script(self, script: Vec<bool>) -> Self {
        *self.failures.lock().unwrap() = script.into();
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MeasurementChannel for DistanceChannel {
    fn name(&self) -> &str {
        "distance"
    }

    async fn measure(&self, configuration: &[i64]) -> Result<f64, ExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failures.lock().unwrap().pop_front().unwrap_or(false) {
            return Err(failure());
        }
        let distance: i64 = configuration
            .iter()
            .zip(&self.defaults)
            .map(|(x, d)| (x - d).abs())
            .sum();
        Ok(100.0 + distance as f64)
    }
}
