use std::collections::HashMap;

use log::{debug, warn};

use super::column::Column;
use super::timeseries::{Datapoint, Series};
use super::timestamp;
use crate::feed::snapshot::Snapshot;

/// SeriesRegistry owns every series of one chart session.
///
/// Series are created on first sighting of their label and are never pruned;
/// only their point buffers are bounded. Iteration follows first-sighting order.
#[derive(Debug)]
pub struct SeriesRegistry {
    series: Vec<Series>,
    index: HashMap<String, usize>,
    max_points: usize,
}

impl SeriesRegistry {
    pub fn new(max_points: usize) -> Self {
        SeriesRegistry {
            series: Vec::new(),
            index: HashMap::new(),
            max_points: max_points.max(1),
        }
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    pub fn get(&self, label: &str) -> Option<&Series> {
        self.index.get(label).map(|&i| &self.series[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Series> + '_ {
        self.series.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.series.iter().map(Series::label).collect()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Appends a point to `label`, creating the series if needed.
    pub fn record(&mut self, label: &str, point: Datapoint) {
        let max_points = self.max_points;
        let idx = match self.index.get(label) {
            Some(&idx) => idx,
            None => {
                debug!("New series {:?}", label);
                self.series.push(Series::new(label, max_points));
                self.index.insert(label.to_string(), self.series.len() - 1);
                self.series.len() - 1
            }
        };
        self.series[idx].add(point);
    }

    /// Merges one column into the registry.
    ///
    /// Returns the labels whose buffers were touched, once each, in the order
    /// they first appear in the column. A point with a bad timestamp is logged
    /// and skipped; the rest of the column still applies.
    pub fn apply_column(&mut self, column: &Column) -> Vec<String> {
        let mut changed: Vec<String> = Vec::new();

        for entry in column.entries() {
            let timestamp = match timestamp::normalize(&entry.timestamp_text) {
                Ok(ts) => ts,
                Err(e) => {
                    warn!("Dropping point for {:?}: {}", entry.label, e);
                    continue;
                }
            };

            self.record(&entry.label, Datapoint::new(timestamp, entry.value));

            if !changed.iter().any(|l| l == &entry.label) {
                changed.push(entry.label.clone());
            }
        }

        changed
    }

    /// Loads a historical snapshot through the rolling buffers.
    pub fn seed(&mut self, snapshot: &Snapshot) {
        for series in snapshot.series() {
            for point in &series.data {
                self.record(&series.label, *point);
            }
        }
    }
}
