//! Physical-tool calibration from multi-contact distance samples.

use crate::config::{CalibrationConfig, ResolutionConfig};

/// Accumulates pixel-distance samples between two tracked contacts and
/// folds them into a single calibrated measurement.
///
/// While a physical tool rests on the surface, every multi-contact callback
/// contributes one candidate distance. At commit time the samples are
/// reduced with a trimmed mean: only samples within 1/20 of the maximum
/// sample's value from that maximum are kept, rejecting the low outliers
/// that partial contacts produce.
#[derive(Debug, Default)]
pub struct RealToolCalibration {
    samples: Vec<f64>,
    anchor: (f64, f64),
    config: CalibrationConfig,
}

impl RealToolCalibration {
    /// Creates an empty accumulator with the given reference configuration.
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            samples: Vec::new(),
            anchor: (0.0, 0.0),
            config,
        }
    }

    /// Adds one candidate distance sample in sensor pixels.
    pub fn record_sample(&mut self, distance: f64) {
        self.samples.push(distance);
    }

    /// Whether any samples have been collected since the last fold.
    pub fn has_samples(&self) -> bool {
        !self.samples.is_empty()
    }

    /// Remembers the most recent second-contact position.
    pub fn set_anchor(&mut self, x: f64, y: f64) {
        self.anchor = (x, y);
    }

    /// Most recent second-contact position.
    pub fn anchor(&self) -> (f64, f64) {
        self.anchor
    }

    /// Folds the collected samples into a trimmed mean and clears them.
    ///
    /// The acceptance band is `max / 20` below the maximum sample; everything
    /// farther out is discarded before averaging.
    ///
    /// # Returns
    /// `None` when no samples were collected.
    pub fn take_trimmed_mean(&mut self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }

        let mut biggest = 0.0f64;
        for &sample in &self.samples {
            if sample > biggest {
                biggest = sample;
            }
        }

        let tolerance = biggest / 20.0;
        let mut sum = 0.0;
        let mut kept = 0usize;
        for &sample in &self.samples {
            if (biggest - sample).abs() <= tolerance {
                sum += sample;
                kept += 1;
            }
        }

        log::debug!(
            "Real-tool calibration kept {kept}/{} sample(s), max {biggest:.1}",
            self.samples.len()
        );
        self.samples.clear();

        Some(sum / kept as f64)
    }

    /// Converts a pixel measurement to centimeters on the current screen.
    ///
    /// The reference pixel pitch is rescaled by the ratio of this screen's
    /// diagonal to the reference diagonal before dividing.
    pub fn to_centimeters(&self, pixels: f64, resolution: &ResolutionConfig) -> f64 {
        let this_hyp = resolution.logical_width.hypot(resolution.logical_height);
        let pixels_per_cm =
            (this_hyp * self.config.reference_pixels_per_cm) / self.config.reference_hypotenuse;
        pixels / pixels_per_cm
    }
}
