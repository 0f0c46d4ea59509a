use super::{stats, AnomalyReport, ChannelStats, Rule, Sensor, StatsError, TelemetryFrame, ThresholdConfig};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DetectionError {
    #[error("missing channel column: {0}")]
    MissingChannel(Sensor),
    #[error("insufficient data: need at least 2 readings, got {0}")]
    InsufficientData(usize),
}

/// Dual-criterion detector over a complete batch. Holds no state besides the
/// thresholds, so one engine can serve any number of frames.
#[derive(Debug, Clone, Copy)]
pub struct AnomalyEngine {
    cfg: ThresholdConfig,
}

impl AnomalyEngine {
    pub fn new(cfg: ThresholdConfig) -> Self { Self { cfg } }
    pub fn config(&self) -> &ThresholdConfig { &self.cfg }

    pub fn detect(&self, frame: &TelemetryFrame) -> Result<AnomalyReport, DetectionError> {
        let temperature = frame.channel(Sensor::Temperature).ok_or(DetectionError::MissingChannel(Sensor::Temperature))?;
        let pressure = frame.channel(Sensor::Pressure).ok_or(DetectionError::MissingChannel(Sensor::Pressure))?;
        if frame.len() < 2 { return Err(DetectionError::InsufficientData(frame.len())); }

        let temp_stats = channel_stats(temperature)?;
        let press_stats = channel_stats(pressure)?;
        let temp_points = Rule::for_sensor(Sensor::Temperature, &self.cfg).flagged(frame.index(), temperature, temp_stats.as_ref());
        let press_points = Rule::for_sensor(Sensor::Pressure, &self.cfg).flagged(frame.index(), pressure, press_stats.as_ref());
        Ok(AnomalyReport::from_channels(temp_points, press_points, [temp_stats, press_stats]))
    }
}

/// Degenerate channels yield `None`: their statistical test never fires.
fn channel_stats(values: &[f64]) -> Result<Option<ChannelStats>, DetectionError> {
    match stats::compute(values) {
        Ok(s) => Ok(Some(s)),
        Err(StatsError::DegenerateSeries) => Ok(None),
        Err(StatsError::InsufficientData(n)) => Err(DetectionError::InsufficientData(n)),
    }
}

pub fn detect(frame: &TelemetryFrame, cfg: &ThresholdConfig) -> Result<AnomalyReport, DetectionError> {
    AnomalyEngine::new(*cfg).detect(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{Anomaly, Reading};

    fn frame(rows: &[(f64, f64)]) -> TelemetryFrame {
        let readings: Vec<Reading> = rows.iter().enumerate()
            .map(|(i, &(temperature, pressure))| Reading { index: i as u64, temperature, pressure })
            .collect();
        TelemetryFrame::from_readings(&readings).unwrap()
    }

    #[test]
    fn reference_batch() {
        let cfg = ThresholdConfig::new(100.0, 0.5, 1.0).unwrap();
        let report = detect(&frame(&[(50.0, 1.0), (150.0, 1.0), (52.0, 0.1)]), &cfg).unwrap();
        assert_eq!(report.anomalies(), &[
            Anomaly { index: 1, sensor: Sensor::Temperature, value: 150.0 },
            Anomaly { index: 2, sensor: Sensor::Pressure, value: 0.1 },
        ]);
        assert_eq!(report.points(Sensor::Temperature), &[(1u64, 150.0)]);
        assert_eq!(report.points(Sensor::Pressure), &[(2u64, 0.1)]);
    }

    #[test]
    fn constant_channel_contributes_nothing() {
        // every temperature breaches the hard limit, but there is no spread
        let cfg = ThresholdConfig::new(-1000.0, 1000.0, 0.001).unwrap();
        let report = detect(&frame(&[(7.0, 1.0), (7.0, 1.0), (7.0, 1.0)]), &cfg).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.channel_stats(Sensor::Temperature), None);
    }

    #[test]
    fn constant_channel_does_not_mask_the_other() {
        let cfg = ThresholdConfig::new(100.0, 0.5, 1.0).unwrap();
        let report = detect(&frame(&[(7.0, 1.0), (7.0, 1.0), (7.0, 0.1)]), &cfg).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.anomalies()[0].sensor, Sensor::Pressure);
    }

    #[test]
    fn same_index_on_both_channels_keeps_temperature_first() {
        let cfg = ThresholdConfig::new(100.0, 0.5, 1.0).unwrap();
        let report = detect(&frame(&[(50.0, 1.0), (51.0, 1.0), (200.0, 0.05), (49.0, 1.1)]), &cfg).unwrap();
        let tags: Vec<(u64, Sensor)> = report.iter().map(|a| (a.index, a.sensor)).collect();
        assert_eq!(tags, vec![(2u64, Sensor::Temperature), (2u64, Sensor::Pressure)]);
    }

    #[test]
    fn missing_and_short_batches_are_typed_errors() {
        let cfg = ThresholdConfig::new(100.0, 0.5, 1.0).unwrap();
        let no_pressure = TelemetryFrame::new(vec![0, 1], Some(vec![1.0, 2.0]), None).unwrap();
        assert_eq!(detect(&no_pressure, &cfg), Err(DetectionError::MissingChannel(Sensor::Pressure)));
        let no_temp = TelemetryFrame::new(vec![0, 1], None, Some(vec![1.0, 2.0])).unwrap();
        assert_eq!(detect(&no_temp, &cfg), Err(DetectionError::MissingChannel(Sensor::Temperature)));
        assert_eq!(detect(&frame(&[(1.0, 1.0)]), &cfg), Err(DetectionError::InsufficientData(1)));
        assert_eq!(detect(&frame(&[]), &cfg), Err(DetectionError::InsufficientData(0)));
    }

    #[test]
    fn sample_divisor_decides_the_boundary() {
        // values 0,0,0,10: mean 2.5, sample std 5.0 -> z(10) = 1.5;
        // the population std (~4.33) would give ~1.73
        let cfg = ThresholdConfig::new(5.0, -100.0, 1.6).unwrap();
        let f = frame(&[(0.0, 1.0), (0.0, 2.0), (0.0, 3.0), (10.0, 4.0)]);
        assert!(detect(&f, &cfg).unwrap().is_empty());
        let cfg = ThresholdConfig::new(5.0, -100.0, 1.49).unwrap();
        assert_eq!(detect(&f, &cfg).unwrap().len(), 1);
    }
}
