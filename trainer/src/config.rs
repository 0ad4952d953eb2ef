use std::path::{Path, PathBuf};

use ml_core::{Schema, UnknownPolicy};

/// Fraction of rows held out for evaluation unless told otherwise.
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Seed used for the holdout split unless told otherwise.
pub const DEFAULT_SEED: u64 = 42;

/// Everything a training run needs to know.
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    dataset: PathBuf,
    output: PathBuf,
    test_size: Option<f64>,
    seed: Option<u64>,
    policy: UnknownPolicy,
    schema: Schema,
}

impl TrainerConfig {
    /// Creates a new `TrainerConfig` with the default holdout, seed, policy
    /// and the student performance schema.
    ///
    /// # Args
    /// * `dataset` - The CSV file to train on.
    /// * `output` - Where the bundle is written.
    pub fn new(dataset: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            dataset: dataset.into(),
            output: output.into(),
            test_size: Some(DEFAULT_TEST_SIZE),
            seed: Some(DEFAULT_SEED),
            policy: UnknownPolicy::default(),
            schema: Schema::student_performance(),
        }
    }

    /// Sets the holdout fraction, `None` fits on every row.
    pub fn with_test_size(mut self, test_size: Option<f64>) -> Self {
        self.test_size = test_size;
        self
    }

    /// Sets the split seed, `None` seeds from the operating system.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_policy(mut self, policy: UnknownPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn dataset(&self) -> &Path {
        &self.dataset
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn test_size(&self) -> Option<f64> {
        self.test_size
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn policy(&self) -> UnknownPolicy {
        self.policy
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}
