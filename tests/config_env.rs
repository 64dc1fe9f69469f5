//! Environment-variable layer of the run configuration.
//!
//! Kept in its own test binary so the variables it sets cannot leak into
//! other configuration tests running in parallel.

use std::env;

use trendcast::config::{ForecastConfig, Overrides, Uncertainty};

#[test]
fn environment_overrides_defaults_and_yields_to_cli() {
    env::set_var("TRENDCAST_FUTURE_PERIODS", "7");
    env::set_var("TRENDCAST_AGGREGATION_CADENCE", "W-MON");
    env::set_var("TRENDCAST_MODEL__SEED", "99");
    env::set_var("TRENDCAST_MODEL__UNCERTAINTY", "simulated");

    let config = ForecastConfig::load(None, &Overrides::default()).unwrap();
    assert_eq!(config.future_periods, 7);
    assert_eq!(config.aggregation_cadence, "W-MON");
    assert_eq!(config.model.seed, 99);
    assert_eq!(config.model.uncertainty, Uncertainty::Simulated);
    assert_eq!(config.model.yearly_order, 10);

    let overrides = Overrides {
        future_periods: Some(3),
        ..Overrides::default()
    };
    let config = ForecastConfig::load(None, &overrides).unwrap();
    assert_eq!(config.future_periods, 3);
    assert_eq!(config.model.seed, 99);

    for key in [
        "TRENDCAST_FUTURE_PERIODS",
        "TRENDCAST_AGGREGATION_CADENCE",
        "TRENDCAST_MODEL__SEED",
        "TRENDCAST_MODEL__UNCERTAINTY",
    ] {
        env::remove_var(key);
    }
}
