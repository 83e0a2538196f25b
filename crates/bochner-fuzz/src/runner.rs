//! Trial execution engine.

use crate::config::FuzzConfig;
use crate::generator::{Generator, Vector};
use crate::recorder::{FuzzEventRecorder, FuzzRunRecord, RunMetadata, RunStats};
use crate::validator::{ValidationFailure, ValidationResult, Validator};
use bochner::{DominatedAdditive, Lebesgue, MeasureError, SetToFun};
use bochner_inspector::{EventSinkTracer, NullSink};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of a fuzz run.
#[derive(Debug, Default, Clone)]
pub struct FuzzResult {
    pub trials_run: u32,
    /// Trials that exercised the non-integrable fallback.
    pub fallback_trials: u32,
    pub validation_successes: u32,
    pub validation_failures: Vec<ValidationFailure>,
    /// Trials whose inputs could not be built.
    pub construction_errors: Vec<(u32, MeasureError)>,
    pub total_duration: Duration,
}

impl FuzzResult {
    /// Check if every law held and every input could be built.
    pub fn is_success(&self) -> bool {
        self.validation_failures.is_empty() && self.construction_errors.is_empty()
    }

    fn merge_trial(&mut self, trial: TrialResult) {
        self.trials_run += 1;
        match trial.outcome {
            Ok(validation) => {
                self.validation_successes += validation.successes;
                self.validation_failures.extend(validation.failures);
            }
            Err(err) => self.construction_errors.push((trial.trial, err)),
        }
        if trial.checked_fallback {
            self.fallback_trials += 1;
        }
    }
}

/// Result of one trial.
#[derive(Debug)]
pub struct TrialResult {
    pub trial: u32,
    pub outcome: Result<ValidationResult, MeasureError>,
    pub checked_fallback: bool,
}

/// Randomized law checker.
///
/// Every trial draws a fresh measure, set function and integrands from a
/// generator seeded by the run seed and the trial index, so results do not
/// depend on the number of threads.
pub struct FuzzRunner {
    config: FuzzConfig,
    seed: u64,
    recorder: Option<Arc<FuzzEventRecorder>>,
}

impl FuzzRunner {
    pub fn new(config: FuzzConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let recorder = config
            .record_events
            .then(|| Arc::new(FuzzEventRecorder::new()));
        Self {
            config,
            seed,
            recorder,
        }
    }

    /// Run every trial.
    pub fn run(&mut self) -> FuzzResult {
        let start = Instant::now();

        let trials = if self.config.threads > 1 {
            self.run_concurrent()
        } else {
            self.run_sequential()
        };

        let mut result = FuzzResult::default();
        for trial in trials {
            result.merge_trial(trial);
        }
        result.total_duration = start.elapsed();
        result
    }

    fn run_sequential(&self) -> Vec<TrialResult> {
        (0..self.config.trials)
            .map(|trial| self.run_trial(trial))
            .collect()
    }

    fn run_concurrent(&self) -> Vec<TrialResult> {
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()
        {
            Ok(pool) => pool,
            Err(_) => return self.run_sequential(),
        };
        // Indexed collection keeps trial order.
        pool.install(|| {
            (0..self.config.trials)
                .into_par_iter()
                .map(|trial| self.run_trial(trial))
                .collect()
        })
    }

    /// Run a single trial.
    pub fn run_trial(&self, trial: u32) -> TrialResult {
        let rng = SmallRng::seed_from_u64(self.trial_seed(trial));
        let mut gen = Generator::new(self.config.clone(), rng);
        let mut checked_fallback = false;
        let outcome = self.check_trial(trial, &mut gen, &mut checked_fallback);
        TrialResult {
            trial,
            outcome,
            checked_fallback,
        }
    }

    fn check_trial(
        &self,
        trial: u32,
        gen: &mut Generator<SmallRng>,
        checked_fallback: &mut bool,
    ) -> Result<ValidationResult, MeasureError> {
        let tolerance = self.config.tolerance;
        let mu = gen.measure()?;
        let set_fn = gen.set_function(&mu)?;
        let ext = SetToFun::with_tracer(set_fn, self.config.extension, self.tracer())?;
        let mut validator = Validator::new(trial, &ext, tolerance);

        let f = gen.integrable_function(&mu)?;
        let g = gen.integrable_function(&mu)?;
        let c = gen.scalar();
        validator.check_linearity(&f, &g, c);
        validator.check_consistency(&f);
        validator.check_boundedness(&f);
        validator.check_pointwise(&f, &Generator::<SmallRng>::as_point_function(&f));

        let x = gen.vector();
        let s = gen.finite_set(&mu);
        validator.check_indicator(&s, &x)?;
        let (s, t) = gen.disjoint_finite_pair(&mu);
        validator.check_additivity(&s, &t, &x);

        if let Some(h) = gen.non_integrable_function(&mu)? {
            validator.check_fallback(&h);
            *checked_fallback = true;
        }
        let mut result = validator.finish();

        if self.config.lipschitz_checks > 0 {
            result.merge(self.check_lipschitz(trial, gen)?);
        }
        Ok(result)
    }

    fn check_lipschitz(
        &self,
        trial: u32,
        gen: &mut Generator<SmallRng>,
    ) -> Result<ValidationResult, MeasureError> {
        let set_fn = DominatedAdditive::<_, Vector, Vector>::weighted_smul(Arc::new(Lebesgue));
        let ext = SetToFun::with_tracer(set_fn, self.config.extension, self.tracer())?;
        let mut validator = Validator::new(trial, &ext, self.config.tolerance);
        for _ in 0..self.config.lipschitz_checks {
            validator.check_lipschitz(&gen.lipschitz_case()?);
        }
        Ok(validator.finish())
    }

    fn trial_seed(&self, trial: u32) -> u64 {
        self.seed
            .wrapping_add(trial as u64)
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    /// Tracer for one extension: the recorder, or a null sink.
    fn tracer(&self) -> EventSinkTracer {
        match &self.recorder {
            Some(recorder) => EventSinkTracer::new(recorder.clone()),
            None => EventSinkTracer::new(Arc::new(NullSink)),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &FuzzConfig {
        &self.config
    }

    /// Get the seed actually used.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the recorder (if recording is enabled).
    pub fn recorder(&self) -> Option<&Arc<FuzzEventRecorder>> {
        self.recorder.as_ref()
    }

    /// Write the recorded events to `event_output_path`, if one is configured.
    pub fn export_events(&self) -> std::io::Result<()> {
        match (&self.recorder, &self.config.event_output_path) {
            (Some(recorder), Some(path)) => recorder.export_to_file(path),
            _ => Ok(()),
        }
    }

    /// Export run record.
    pub fn export_run_record(&self, result: &FuzzResult) -> FuzzRunRecord {
        let events = self
            .recorder
            .as_ref()
            .map(|r| r.events())
            .unwrap_or_default();
        let stats = RunStats::from_events(&events, result);

        FuzzRunRecord {
            config: self.config.to_serializable(),
            seed: self.seed,
            events,
            failures: result.validation_failures.clone(),
            stats,
            metadata: RunMetadata::new(result.total_duration.as_millis() as u64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AtomShape, SetFunctionKind};

    #[test]
    fn test_basic_run() {
        let config = FuzzConfig::minimal().with_trials(5).with_seed(42);

        let mut runner = FuzzRunner::new(config);
        let result = runner.run();

        assert!(result.is_success(), "Run should succeed: {:?}", result);
        assert_eq!(result.trials_run, 5);
        assert!(result.validation_successes > 0);
    }

    #[test]
    fn test_determinism() {
        let config = FuzzConfig::minimal()
            .with_point_count(8)
            .with_atom_shape(AtomShape::Grouped { max_atom_size: 3 })
            .with_trials(10)
            .with_seed(12345);

        let result1 = FuzzRunner::new(config.clone()).run();
        let result2 = FuzzRunner::new(config).run();

        assert_eq!(result1.validation_successes, result2.validation_successes);
        assert_eq!(result1.fallback_trials, result2.fallback_trials);
    }

    #[test]
    fn test_with_recording() {
        let config = FuzzConfig::minimal().with_recording(true).with_trials(3);

        let mut runner = FuzzRunner::new(config);
        let result = runner.run();
        assert!(result.is_success());

        let recorder = runner.recorder().expect("Recorder should be present");
        assert!(!recorder.is_empty(), "Should have recorded events");

        let record = runner.export_run_record(&result);
        assert!(record.stats.evaluations > 0);
        assert_eq!(record.stats.validation_failures, 0);
    }

    #[test]
    fn test_matrix_combinations() {
        let config = FuzzConfig::minimal()
            .with_point_count(6)
            .with_set_function(SetFunctionKind::Combination {
                terms: 3,
                max_entry: 2.0,
            })
            .with_trials(10)
            .with_seed(7);

        let result = FuzzRunner::new(config).run();
        assert!(result.is_success(), "Run should succeed: {:?}", result);
    }

    #[test]
    fn test_fallback_exercised() {
        let config = FuzzConfig::minimal()
            .with_point_count(6)
            .with_infinite_fraction(0.5)
            .with_trials(10);

        let result = FuzzRunner::new(config).run();
        assert!(result.is_success(), "Run should succeed: {:?}", result);
        assert!(result.fallback_trials > 0);
    }

    #[test]
    fn test_lipschitz_checks() {
        let config = FuzzConfig::minimal()
            .with_lipschitz_checks(2)
            .with_trials(3)
            .with_recording(true);

        let mut runner = FuzzRunner::new(config);
        let result = runner.run();
        assert!(result.is_success(), "Run should succeed: {:?}", result);

        let record = runner.export_run_record(&result);
        assert!(record.stats.approximate > 0 || record.stats.max_depth == 0);
    }

    #[test]
    fn test_concurrent_matches_sequential() {
        let config = FuzzConfig::minimal()
            .with_point_count(10)
            .with_trials(20)
            .with_seed(99);

        let sequential = FuzzRunner::new(config.clone()).run();
        let concurrent = FuzzRunner::new(config.with_threads(4)).run();

        assert!(concurrent.is_success(), "Run should succeed: {:?}", concurrent);
        assert_eq!(sequential.validation_successes, concurrent.validation_successes);
        assert_eq!(sequential.fallback_trials, concurrent.fallback_trials);
    }
}
