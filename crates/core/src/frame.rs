//! Per-tick output of the field composer.

use serde::Serialize;

/// One tick's evaluated field, aligned 1:1 with the grid's points.
///
/// `values` holds dot sizes; `intensities` holds the normalized [0, 1] value
/// each size was mapped from (used for color tints). Both are fully rewritten
/// every tick; only the allocations carry over.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldFrame {
    time: f64,
    values: Vec<f64>,
    intensities: Vec<f64>,
}

impl FieldFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Animation time this frame was evaluated at.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Clears both buffers and stamps the new time.
    pub(crate) fn begin(&mut self, time: f64, capacity: usize) {
        self.time = time;
        self.values.clear();
        self.intensities.clear();
        self.values.reserve(capacity);
        self.intensities.reserve(capacity);
    }

    pub(crate) fn push(&mut self, intensity: f64, size: f64) {
        self.intensities.push(intensity);
        self.values.push(size);
    }

    /// Size buffer narrowed to `f32` for upload.
    pub fn to_f32(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.values.len());
        self.write_f32(&mut out);
        out
    }

    /// Overwrites `out` with the `f32` size buffer, reusing its allocation.
    pub fn write_f32(&self, out: &mut Vec<f32>) {
        out.clear();
        out.extend(self.values.iter().map(|&v| v as f32));
    }

    /// Summary statistics over the size buffer. `None` for an empty frame.
    pub fn stats(&self) -> Option<FrameStats> {
        let first = *self.values.first()?;
        let (min, max, sum) = self
            .values
            .iter()
            .fold((first, first, 0.0), |(lo, hi, sum), &v| {
                (lo.min(v), hi.max(v), sum + v)
            });
        Some(FrameStats {
            time: self.time,
            points: self.values.len(),
            min,
            max,
            mean: sum / self.values.len() as f64,
        })
    }
}

/// Min/max/mean of a frame's sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameStats {
    pub time: f64,
    pub points: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(values: &[f64]) -> FieldFrame {
        let mut frame = FieldFrame::new();
        frame.begin(1.5, values.len());
        for &v in values {
            frame.push(0.5, v);
        }
        frame
    }

    #[test]
    fn new_frame_is_empty() {
        let frame = FieldFrame::new();
        assert!(frame.is_empty());
        assert_eq!(frame.time(), 0.0);
        assert!(frame.stats().is_none());
    }

    #[test]
    fn begin_discards_previous_contents() {
        let mut frame = frame_with(&[1.0, 2.0, 3.0]);
        frame.begin(2.0, 1);
        frame.push(0.0, 4.0);
        assert_eq!(frame.values(), &[4.0]);
        assert_eq!(frame.intensities(), &[0.0]);
        assert_eq!(frame.time(), 2.0);
    }

    #[test]
    fn to_f32_narrows_each_value() {
        let frame = frame_with(&[1.0, 2.5]);
        assert_eq!(frame.to_f32(), vec![1.0_f32, 2.5]);
    }

    #[test]
    fn stats_report_min_max_mean() {
        let stats = frame_with(&[1.0, 3.0, 5.0]).stats().unwrap();
        assert_eq!(stats.points, 3);
        assert_eq!((stats.min, stats.max), (1.0, 5.0));
        assert!((stats.mean - 3.0).abs() < 1e-12);
        assert_eq!(stats.time, 1.5);
    }
}
