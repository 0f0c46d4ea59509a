use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    #[error("insufficient data: need at least 2 values, got {0}")]
    InsufficientData(usize),
    #[error("degenerate series: standard deviation is zero")]
    DegenerateSeries,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl ChannelStats {
    pub fn z_score(&self, value: f64) -> f64 { (value - self.mean) / self.std_dev }
}

/// Mean and sample standard deviation (divisor N-1) of one channel.
///
/// A series whose values are all identical is degenerate even when float
/// rounding in the mean would leave a tiny nonzero spread.
pub fn compute(values: &[f64]) -> Result<ChannelStats, StatsError> {
    let n = values.len();
    if n < 2 { return Err(StatsError::InsufficientData(n)); }
    let first = values[0];
    if values.iter().all(|v| *v == first) { return Err(StatsError::DegenerateSeries); }
    let mean = values.iter().sum::<f64>() / n as f64;
    let sum_sq: f64 = values.iter().map(|v| { let d = v - mean; d * d }).sum();
    let std_dev = (sum_sq / (n - 1) as f64).sqrt();
    if std_dev == 0.0 { return Err(StatsError::DegenerateSeries); }
    Ok(ChannelStats { mean, std_dev })
}
