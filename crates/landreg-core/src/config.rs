// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Classifier configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LandregError, Result};

/// Weights of the four partial scores in the composite confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub aspect_ratio: f64,
    pub resolution: f64,
    pub classification: f64,
    pub quality: f64,
}

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.aspect_ratio + self.resolution + self.classification + self.quality
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            aspect_ratio: 0.30,
            resolution: 0.30,
            classification: 0.20,
            quality: 0.20,
        }
    }
}

/// Tunable thresholds for the document plausibility classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Minimum rounded confidence for an image to be accepted (inclusive).
    pub accept_threshold: f64,
    /// Pixel count at or above which resolution scores full marks.
    pub min_pixel_count: u64,
    /// Files smaller than this (in KB) get the "suspiciously small" warning.
    pub small_file_warning_kb: f64,
    pub weights: ScoreWeights,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            accept_threshold: 0.80,
            min_pixel_count: 1_000_000,
            small_file_warning_kb: 50.0,
            weights: ScoreWeights::default(),
        }
    }
}

impl ClassifierConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would break the [0, 1] confidence range.
    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        if [w.aspect_ratio, w.resolution, w.classification, w.quality]
            .iter()
            .any(|weight| !weight.is_finite() || *weight < 0.0)
        {
            return Err(LandregError::InvalidConfig(
                "score weights must be non-negative".into(),
            ));
        }
        if (w.total() - 1.0).abs() > 1e-6 {
            return Err(LandregError::InvalidConfig(format!(
                "score weights must sum to 1.0, got {}",
                w.total()
            )));
        }
        if !(0.0..=1.0).contains(&self.accept_threshold) {
            return Err(LandregError::InvalidConfig(format!(
                "accept_threshold must be within [0, 1], got {}",
                self.accept_threshold
            )));
        }
        if self.min_pixel_count == 0 {
            return Err(LandregError::InvalidConfig(
                "min_pixel_count must be positive".into(),
            ));
        }
        if !self.small_file_warning_kb.is_finite() || self.small_file_warning_kb < 0.0 {
            return Err(LandregError::InvalidConfig(
                "small_file_warning_kb must be non-negative".into(),
            ));
        }
        Ok(())
    }
}
