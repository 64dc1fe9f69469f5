//! End-to-end batch pipeline.
//!
//! Stages run strictly in order: aggregate, filter, fit, build horizon,
//! predict, assemble. Settings are checked when the pipeline is built, so a
//! bad horizon or model setting fails before any data is touched.

mod assemble;

pub use assemble::ForecastAssembler;

use crate::config::JobSettings;
use crate::core::{Cadence, ForecastTable, FutureHorizonBuilder, Observation, TrainingSeries};
use crate::error::Result;
use crate::io::{read_observations, write_forecast};
use crate::models::{DecomposableForecastModel, FittedForecaster, FittedModel, Forecaster};
use crate::transform::{SeriesFilter, TemporalAggregator};
use tracing::info;

/// Typed, validated inputs to [`ForecastPipeline::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub cadence: Cadence,
    pub future_periods: i64,
    pub model: DecomposableForecastModel,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            cadence: Cadence::weekly(),
            future_periods: 26,
            model: DecomposableForecastModel::default(),
        }
    }
}

/// Everything produced by one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub series: TrainingSeries,
    pub model: FittedModel,
    pub table: ForecastTable,
}

#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    aggregator: TemporalAggregator,
    filter: SeriesFilter,
    horizon: FutureHorizonBuilder,
    model: DecomposableForecastModel,
    assembler: ForecastAssembler,
}

impl ForecastPipeline {
    pub fn new(settings: PipelineSettings) -> Result<Self> {
        let horizon = FutureHorizonBuilder::new(settings.cadence, settings.future_periods)?;
        settings.model.validate()?;

        Ok(Self {
            aggregator: TemporalAggregator::new(settings.cadence),
            filter: SeriesFilter::new(),
            horizon,
            model: settings.model,
            assembler: ForecastAssembler::new(),
        })
    }

    /// Run every stage over in-memory observations.
    pub fn run(&self, observations: &[Observation]) -> Result<PipelineOutput> {
        let points = self.aggregator.aggregate(observations)?;
        info!(
            cadence = %self.aggregator.cadence(),
            periods = points.len(),
            "aggregated observations"
        );

        let series = self.filter.apply(&points)?;
        info!(
            kept = series.len(),
            dropped = points.len() - series.len(),
            "filtered non-positive periods"
        );

        let model = self.model.fit(&series)?;

        let grid = self.horizon.build(&series)?;
        info!(
            history = grid.history_len(),
            future = grid.future().len(),
            "built prediction horizon"
        );

        let predictions = model.predict(&grid);
        let table = self.assembler.assemble(&predictions, &series);
        info!(rows = table.len(), "forecast assembled");

        Ok(PipelineOutput {
            series,
            model,
            table,
        })
    }
}

/// Read the input file, run the pipeline and write the result.
pub fn run_job(job: &JobSettings) -> Result<PipelineOutput> {
    let pipeline = ForecastPipeline::new(job.pipeline.clone())?;

    let observations = read_observations(&job.input, &job.timestamp_column, &job.value_column)?;
    let output = pipeline.run(&observations)?;

    info!(
        rows = output.table.len(),
        destination = %job.output.display(),
        "writing forecast"
    );
    write_forecast(&job.output, &output.table)?;

    Ok(output)
}
