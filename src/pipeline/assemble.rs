//! Join of predictions with observed values.

use crate::core::{ForecastTable, OutputRow, PredictionRow, TrainingSeries};

/// Joins predictions against the training series by exact timestamp.
///
/// No interpolation happens: a prediction whose timestamp is not in the
/// training series gets no actual value, which is the case for every future
/// period and for history removed by the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForecastAssembler;

impl ForecastAssembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(&self, predictions: &[PredictionRow], series: &TrainingSeries) -> ForecastTable {
        let rows: Vec<OutputRow> = predictions
            .iter()
            .map(|p| OutputRow::from_prediction(p, series.value_at(p.timestamp)))
            .collect();

        let table = ForecastTable::new(rows);
        tracing::debug!(
            rows = table.len(),
            observed = table.observed().count(),
            "assembled forecast table"
        );
        table
    }
}
