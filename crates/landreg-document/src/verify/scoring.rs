// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Partial scores of the document plausibility classifier. Every function
// here is pure arithmetic over image metadata and the declared document
// family; I/O happens in the verifier.

use landreg_core::{DocumentCategory, ImageClass, MatchFamilies, ScoreWeights};

pub const SMALL_FILE_WARNING: &str = "Image file size is suspiciously small";
pub const LOW_RESOLUTION_WARNING: &str = "Image resolution is lower than recommended";
pub const VERY_LOW_RESOLUTION_WARNING: &str =
    "Image resolution is too low for reliable document verification";
pub const MISMATCH_WARNING: &str = "Image does not appear to match the expected document type";

/// Aspect-ratio score used when a family has no fixed expectation.
const LAND_PHOTO_ASPECT_SCORE: f64 = 0.8;

// -- Quality tiers (KB) -------------------------------------------------------

const QUALITY_TINY_KB: f64 = 30.0;
const QUALITY_SMALL_KB: f64 = 100.0;
const QUALITY_LARGE_KB: f64 = 5000.0;

/// Score used when the size cannot be re-read for quality scoring.
pub const NEUTRAL_QUALITY_SCORE: f64 = 0.5;

/// The four partial scores feeding the composite confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialScores {
    pub aspect_ratio: f64,
    pub resolution: f64,
    pub classification: f64,
    pub quality: f64,
}

impl PartialScores {
    /// Weighted sum, clamped to [0, 1] and rounded to two decimals.
    pub fn composite(&self, weights: &ScoreWeights) -> f64 {
        let raw = weights.aspect_ratio * self.aspect_ratio
            + weights.resolution * self.resolution
            + weights.classification * self.classification
            + weights.quality * self.quality;
        round2(raw.clamp(0.0, 1.0))
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score how close `aspect_ratio` is to what the document family expects.
pub fn aspect_ratio_score(category: DocumentCategory, aspect_ratio: f64) -> f64 {
    match category {
        DocumentCategory::LandPhoto => LAND_PHOTO_ASPECT_SCORE,
        _ => match category.expected_aspect_ratio() {
            Some(expected) => distance_score((aspect_ratio - expected).abs()),
            None if aspect_ratio > 0.5 && aspect_ratio < 2.0 => 0.7,
            None => 0.3,
        },
    }
}

fn distance_score(distance: f64) -> f64 {
    if distance <= 0.1 {
        0.9
    } else if distance <= 0.3 {
        0.7
    } else if distance <= 0.5 {
        0.5
    } else if distance <= 1.0 {
        0.3
    } else {
        0.1
    }
}

/// Score the pixel count against `min_pixel_count`, with the warning the
/// tier carries, if any.
pub fn resolution_score(pixel_count: u64, min_pixel_count: u64) -> (f64, Option<&'static str>) {
    if pixel_count >= min_pixel_count {
        (0.9, None)
    } else if pixel_count.saturating_mul(2) >= min_pixel_count {
        (0.6, Some(LOW_RESOLUTION_WARNING))
    } else {
        (0.3, Some(VERY_LOW_RESOLUTION_WARNING))
    }
}

/// Bucket an image by its aspect ratio, using the bucket rule of the
/// declared family.
pub fn classify_image(category: DocumentCategory, aspect_ratio: f64) -> ImageClass {
    let r = aspect_ratio;
    let specific = match category {
        DocumentCategory::Formal if (0.6..=0.8).contains(&r) => Some(ImageClass::FormalDocument),
        DocumentCategory::IdProof if (1.4..=1.7).contains(&r) => Some(ImageClass::IdCard),
        DocumentCategory::Photo if (1.3..=1.5).contains(&r) || (0.9..=1.1).contains(&r) => {
            Some(ImageClass::Photo)
        }
        _ => None,
    };
    specific.unwrap_or(if r > 0.5 && r < 2.0 {
        ImageClass::PossibleDocument
    } else {
        ImageClass::Unknown
    })
}

/// Compare the declared type with the image bucket. Rules are tried in
/// order; the first hit wins.
pub fn classification_match_score(
    families: MatchFamilies,
    class: ImageClass,
) -> (f64, Option<&'static str>) {
    let matched = (families.photo && class == ImageClass::Photo)
        || (families.formal
            && matches!(
                class,
                ImageClass::FormalDocument | ImageClass::PossibleDocument
            ))
        || (families.id_proof && class == ImageClass::IdCard);

    if matched {
        (0.9, None)
    } else if class == ImageClass::PossibleDocument {
        (0.7, None)
    } else {
        (0.4, Some(MISMATCH_WARNING))
    }
}

/// Image quality proxy from file size alone.
pub fn quality_score(file_size_kb: f64) -> f64 {
    if file_size_kb < QUALITY_TINY_KB {
        0.1
    } else if file_size_kb < QUALITY_SMALL_KB {
        0.4
    } else if file_size_kb > QUALITY_LARGE_KB {
        0.95
    } else {
        0.85
    }
}

pub fn rejection_warning(expected: &str) -> String {
    format!(
        "This may not be a valid {expected} document. Please upload a clear, high-quality image of the entire document."
    )
}
