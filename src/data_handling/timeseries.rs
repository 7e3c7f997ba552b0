use serde::{Serialize, Serializer};

use super::timestamp::TimestampMs;
use crate::util::RollingBuffer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datapoint {
    pub timestamp: TimestampMs,
    pub value: f64,
}

impl Datapoint {
    pub fn new(timestamp: TimestampMs, value: f64) -> Self {
        Datapoint { timestamp, value }
    }
}

/// Serialized as the `[time, value]` pair the chart widget expects.
impl Serialize for Datapoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.timestamp, self.value).serialize(serializer)
    }
}

/// One chart line: a label and its capacity-bounded points, oldest first.
#[derive(Debug, Clone)]
pub struct Series {
    label: String,
    points: RollingBuffer<Datapoint>,
}

impl Series {
    pub fn new(label: impl Into<String>, max_points: usize) -> Self {
        Series {
            label: label.into(),
            points: RollingBuffer::new(max_points),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn add(&mut self, point: Datapoint) {
        self.points.append(point);
    }

    pub fn points(&self) -> impl Iterator<Item = &Datapoint> + '_ {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&Datapoint> {
        self.points.latest()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|dp| dp.value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datapoint_serializes_as_pair() {
        let json = serde_json::to_string(&Datapoint::new(1000, 2.5)).unwrap();
        assert_eq!(json, "[1000,2.5]");
    }

    #[test]
    fn test_series_bounded() {
        let mut series = Series::new("eth0", 2);
        series.add(Datapoint::new(1, 1.0));
        series.add(Datapoint::new(2, 2.0));
        series.add(Datapoint::new(3, 3.0));
        assert_eq!(series.label(), "eth0");
        assert_eq!(series.values(), vec![2.0, 3.0]);
        assert_eq!(series.latest(), Some(&Datapoint::new(3, 3.0)));
    }
}
