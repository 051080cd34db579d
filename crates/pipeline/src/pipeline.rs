//! Pipeline orchestrator.
//!
//! Runs normalize -> returns -> averages -> signals -> finalize in order.
//! The first failing stage ends the run and its error is returned as is.

use tracing::{debug, info, info_span};
use trend_core::{IndicatorTable, PipelineConfig, RawTable, Result};
use trend_features::{MovingAverageCalculator, ReturnCalculator, SignalClassifier};
use trend_ingestion::Normalizer;

use crate::finalizer::Finalizer;

/// A configured indicator pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    normalizer: Normalizer,
    returns: ReturnCalculator,
    averages: MovingAverageCalculator,
    signals: SignalClassifier,
    finalizer: Finalizer,
}

impl Pipeline {
    /// Validate the configuration and build the stages.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            normalizer: Normalizer::from_config(&config),
            returns: ReturnCalculator::new(),
            averages: MovingAverageCalculator::from_config(&config)?,
            signals: SignalClassifier::new(),
            finalizer: Finalizer::new(),
            config,
        })
    }

    /// Run every stage over `raw` and return the finalized table.
    pub fn run(&self, raw: &RawTable) -> Result<IndicatorTable> {
        let span = info_span!(
            "pipeline",
            input_rows = raw.row_count(),
            short_window = self.config.short_window,
            long_window = self.config.long_window,
        );
        let _enter = span.enter();

        let mut series = self.normalizer.normalize(raw)?;
        self.returns.apply(&mut series)?;
        self.averages.apply(&mut series)?;
        self.signals.apply(&mut series)?;
        debug!(rows = series.len(), "indicators derived");

        let table = self.finalizer.apply(series)?;
        info!(output_rows = table.len(), "pipeline complete");
        Ok(table)
    }
}

/// Build a pipeline for `config` and run it once.
pub fn run(raw: &RawTable, config: &PipelineConfig) -> Result<IndicatorTable> {
    Pipeline::new(config.clone())?.run(raw)
}
