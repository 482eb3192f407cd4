use crate::models::{IntensityCategory, Observation};
use chrono::NaiveDateTime;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Storm-level figures broadcast back onto each observation of the storm
#[derive(Debug, Clone, PartialEq)]
pub struct StormSummary {
    pub storm_id: String,
    pub observation_count: usize,
    pub first_seen: NaiveDateTime,
    pub last_seen: NaiveDateTime,
    pub exposure_hours: f64,
    pub wind_max: Option<f64>,
    pub wind_sd: Option<f64>,
}

/// Derives intensity category, force diameters and per-storm wind/exposure metrics
pub struct MetricsCalculator;

impl MetricsCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Run both passes and return the enriched observations in their original order
    pub fn enrich(&self, mut observations: Vec<Observation>) -> Vec<Observation> {
        observations.par_iter_mut().for_each(Self::apply_observation_metrics);

        let summaries = self.summarize_storms(&observations);
        observations.par_iter_mut().for_each(|obs| {
            if let Some(summary) = summaries.get(&obs.storm_id) {
                obs.exposure_time = Some(summary.exposure_hours);
                obs.wind_max = summary.wind_max;
                obs.wind_sd = summary.wind_sd;
            }
        });

        debug!(
            "Enriched {} observations across {} storms",
            observations.len(),
            summaries.len()
        );
        observations
    }

    fn apply_observation_metrics(obs: &mut Observation) {
        obs.category = obs.wind.and_then(IntensityCategory::from_wind_mph);
        obs.ts_diameter = obs.wind_radii.kt34.diameter_miles();
        obs.hu_diameter = obs.wind_radii.kt64.diameter_miles();
    }

    /// Group by storm id and summarize each storm independently
    pub fn summarize_storms(&self, observations: &[Observation]) -> HashMap<String, StormSummary> {
        let mut groups: HashMap<&str, Vec<&Observation>> = HashMap::new();
        for obs in observations {
            groups.entry(obs.storm_id.as_str()).or_default().push(obs);
        }

        groups
            .into_par_iter()
            .filter_map(|(storm_id, members)| {
                Self::summarize(storm_id, &members).map(|s| (storm_id.to_string(), s))
            })
            .collect()
    }

    fn summarize(storm_id: &str, members: &[&Observation]) -> Option<StormSummary> {
        let first_seen = members.iter().map(|o| o.timestamp).min()?;
        let last_seen = members.iter().map(|o| o.timestamp).max()?;
        let exposure_hours = (last_seen - first_seen).num_minutes() as f64 / 60.0;

        let winds: Vec<f64> = members.iter().filter_map(|o| o.wind).collect();

        Some(StormSummary {
            storm_id: storm_id.to_string(),
            observation_count: members.len(),
            first_seen,
            last_seen,
            exposure_hours,
            wind_max: winds.iter().copied().reduce(f64::max),
            wind_sd: sample_std_dev(&winds),
        })
    }
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample standard deviation (n - 1); undefined for fewer than two values
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Some((sum_sq / (n - 1.0)).sqrt())
}
