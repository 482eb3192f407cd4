use crate::models::{CodeTable, Observation, StormMonth, YearMonth};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

/// Collapses observations to one row per (storm name, calendar month).
///
/// Continuous fields are averaged; severity-ordered codes and fields that are
/// already constant per storm take the maximum.
pub struct MonthlyAggregator;

impl MonthlyAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate all groups; rows come back sorted by storm name, then month
    pub fn aggregate(&self, observations: &[Observation]) -> Vec<StormMonth> {
        let mut groups: BTreeMap<(&str, YearMonth), Vec<&Observation>> = BTreeMap::new();
        for obs in observations {
            groups
                .entry((obs.storm_name.as_str(), obs.month))
                .or_default()
                .push(obs);
        }

        let groups: Vec<_> = groups.into_iter().collect();
        let storm_months: Vec<StormMonth> = groups
            .into_par_iter()
            .map(|((storm_name, month), members)| {
                Self::aggregate_group(storm_name, month, &members)
            })
            .collect();

        debug!(
            "Aggregated {} observations into {} storm-months",
            observations.len(),
            storm_months.len()
        );
        storm_months
    }

    fn aggregate_group(storm_name: &str, month: YearMonth, members: &[&Observation]) -> StormMonth {
        StormMonth {
            storm_name: storm_name.to_string(),
            month,
            observation_count: members.len(),
            wind: mean(members.iter().map(|o| o.wind)),
            latitude: mean(members.iter().map(|o| Some(o.latitude))),
            longitude: mean(members.iter().map(|o| Some(o.longitude))),
            ts_diameter: mean(members.iter().map(|o| o.ts_diameter)),
            hu_diameter: mean(members.iter().map(|o| o.hu_diameter)),
            pressure: mean(members.iter().map(|o| o.pressure)),
            status: max_code(members.iter().map(|o| o.status)),
            category: max_code(members.iter().map(|o| o.category)),
            record_identifier: max_code(members.iter().map(|o| o.record_identifier)),
            exposure_time: max_value(members.iter().map(|o| o.exposure_time)),
            wind_max: max_value(members.iter().map(|o| o.wind_max)),
            wind_sd: max_value(members.iter().map(|o| o.wind_sd)),
        }
    }
}

impl Default for MonthlyAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Arithmetic mean of the present values
pub fn mean<I: Iterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

pub fn max_value<I: Iterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    values.flatten().reduce(f64::max)
}

/// Maximum by ordinal, mapped back to the code so its label travels with it
pub fn max_code<T: CodeTable, I: Iterator<Item = Option<T>>>(values: I) -> Option<T> {
    values
        .flatten()
        .map(|code| code.ordinal())
        .max()
        .and_then(T::from_ordinal)
}
