use crate::domain::entities::sample::{Sample, SeriesPoint};
use crate::domain::value_objects::smoothing_window::SmoothingWindow;

/// Trailing moving average.
///
/// `out[i]` is the mean of `values[max(0, i + 1 - window) ..= i]`; the first
/// points average over the shorter prefix that exists. Every window is summed
/// from scratch so the result never drifts from the direct mean.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn moving_average(values: &[f64], window: SmoothingWindow) -> Vec<f64> {
    let window = window.get();
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Smooth a series while keeping each point's timestamp.
#[must_use]
pub fn smooth_samples<S: SeriesPoint>(samples: &[S], window: SmoothingWindow) -> Vec<Sample> {
    let values: Vec<f64> = samples.iter().map(SeriesPoint::value).collect();
    samples
        .iter()
        .zip(moving_average(&values, window))
        .map(|(sample, value)| Sample::new(sample.timestamp(), value))
        .collect()
}
