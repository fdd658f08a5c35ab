// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document verifier — runs the plausibility checks against one image and
// folds every failure into a zero-confidence result, so callers never have
// to handle an error from a verification.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use landreg_core::error::LandregError;
use landreg_core::human_errors::warning_for;
use landreg_core::{ClassifierConfig, DocumentType, VerificationMetadata, VerificationResult};
use tracing::{debug, info, instrument, warn};

use crate::image::probe::{FileImage, ImageSource, MemoryImage};
use crate::verify::scoring::{
    NEUTRAL_QUALITY_SCORE, PartialScores, SMALL_FILE_WARNING, aspect_ratio_score,
    classification_match_score, classify_image, quality_score, rejection_warning,
    resolution_score,
};

/// Scores how plausibly an image is a genuine instance of a declared
/// document type.
///
/// Stateless between calls: the same image and type always produce the same
/// result, and concurrent calls do not interact.
///
/// ```ignore
/// let verifier = DocumentVerifier::default();
/// let result = verifier.verify_path("deed.jpg", &DocumentType::TitleDeed);
/// if !result.is_document {
///     show_warnings(&result.warnings);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentVerifier {
    config: ClassifierConfig,
}

impl DocumentVerifier {
    /// Build a verifier with custom thresholds.
    pub fn new(config: ClassifierConfig) -> Result<Self, LandregError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Verify an image file on this device.
    pub fn verify_path(&self, path: impl AsRef<Path>, expected: &DocumentType) -> VerificationResult {
        self.verify(&FileImage::new(path.as_ref()), expected)
    }

    /// Verify an encoded image held in memory.
    pub fn verify_bytes(&self, data: &[u8], expected: &DocumentType) -> VerificationResult {
        self.verify(&MemoryImage::new(data), expected)
    }

    /// Verify an image file on Tokio's blocking pool.
    ///
    /// A failure of the blocking task itself is reported like any other
    /// verification failure.
    pub async fn verify_async(&self, path: PathBuf, expected: DocumentType) -> VerificationResult {
        let verifier = self.clone();
        tokio::task::spawn_blocking(move || verifier.verify_path(&path, &expected))
            .await
            .unwrap_or_else(fault_result)
    }

    /// Run every check against `source` and combine the partial scores.
    #[instrument(skip_all, fields(source = %source.describe(), document_type = %expected))]
    pub fn verify(&self, source: &dyn ImageSource, expected: &DocumentType) -> VerificationResult {
        let mut warnings = Vec::new();

        // Step 1: the image must exist.
        let file_size_kb = match source.byte_len() {
            Ok(bytes) => bytes as f64 / 1024.0,
            Err(err) => {
                warn!(error = %err, "Image unreadable");
                return VerificationResult::failure(warning_for(&err));
            }
        };
        if file_size_kb < self.config.small_file_warning_kb {
            warnings.push(SMALL_FILE_WARNING.to_owned());
        }

        // Step 2: the header must decode.
        let (width, height) = match source.dimensions() {
            Ok(dims) => dims,
            Err(err) => {
                warn!(error = %err, "Image dimensions unreadable");
                return VerificationResult::failure(warning_for(&err));
            }
        };
        let aspect_ratio = f64::from(width) / f64::from(height);
        let category = expected.category();

        let aspect_score = aspect_ratio_score(category, aspect_ratio);

        let pixel_count = u64::from(width) * u64::from(height);
        let (resolution, resolution_warning) =
            resolution_score(pixel_count, self.config.min_pixel_count);
        warnings.extend(resolution_warning.map(str::to_owned));

        let image_class = classify_image(category, aspect_ratio);
        let (classification, mismatch_warning) =
            classification_match_score(expected.match_families(), image_class);
        warnings.extend(mismatch_warning.map(str::to_owned));

        // Quality reads the size again; a failure here only degrades the score.
        let quality = match source.byte_len() {
            Ok(bytes) => quality_score(bytes as f64 / 1024.0),
            Err(err) => {
                warn!(error = %err, "Size re-read failed, using neutral quality score");
                NEUTRAL_QUALITY_SCORE
            }
        };

        let scores = PartialScores {
            aspect_ratio: aspect_score,
            resolution,
            classification,
            quality,
        };
        debug!(?category, %image_class, ?scores, "Partial scores computed");

        let confidence = scores.composite(&self.config.weights);
        let is_document = confidence >= self.config.accept_threshold;
        if !is_document {
            warnings.push(rejection_warning(expected.as_str()));
        }

        info!(confidence, is_document, warnings = warnings.len(), "Document verified");

        VerificationResult {
            is_document,
            confidence,
            warnings,
            metadata: Some(VerificationMetadata {
                resolution: format!("{width}x{height}"),
                aspect_ratio,
                file_size_kb,
                document_type: expected.clone(),
                image_classification: image_class,
            }),
        }
    }
}

/// Zero-confidence result for a fault outside the checks themselves.
fn fault_result(err: impl Display) -> VerificationResult {
    warn!(error = %err, "Verification task failed");
    VerificationResult::failure(warning_for(&LandregError::Internal(err.to_string())))
}

/// Verify the image at `path` against the identifier `expected_document_type`
/// using the default thresholds.
pub fn verify(path: impl AsRef<Path>, expected_document_type: &str) -> VerificationResult {
    DocumentVerifier::default().verify_path(path, &DocumentType::from(expected_document_type))
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::scoring::{LOW_RESOLUTION_WARNING, MISMATCH_WARNING, VERY_LOW_RESOLUTION_WARNING};
    use ::image::{DynamicImage, GrayImage, ImageFormat, Luma};
    use landreg_core::ImageClass;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted image source. `size_fails_after` makes every size read past
    /// that many calls fail.
    struct FakeImage {
        bytes: Option<u64>,
        dims: Option<(u32, u32)>,
        size_fails_after: Option<usize>,
        size_reads: AtomicUsize,
    }

    impl FakeImage {
        fn new(kb: u64, width: u32, height: u32) -> Self {
            Self {
                bytes: Some(kb * 1024),
                dims: Some((width, height)),
                size_fails_after: None,
                size_reads: AtomicUsize::new(0),
            }
        }
    }

    impl ImageSource for FakeImage {
        fn describe(&self) -> String {
            "fake".into()
        }

        fn byte_len(&self) -> Result<u64, LandregError> {
            let call = self.size_reads.fetch_add(1, Ordering::SeqCst);
            if self.size_fails_after.is_some_and(|limit| call >= limit) {
                return Err(LandregError::Io(std::io::Error::new(
                    std::io::ErrorKind::Interrupted,
                    "transient",
                )));
            }
            self.bytes
                .ok_or_else(|| LandregError::ResourceMissing("fake".into()))
        }

        fn dimensions(&self) -> Result<(u32, u32), LandregError> {
            self.dims
                .ok_or_else(|| LandregError::DimensionDecode("fake".into()))
        }
    }

    fn png_padded_to(width: u32, height: u32, target_len: usize) -> Vec<u8> {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([180u8])));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .expect("encode png");
        assert!(buffer.len() <= target_len, "png larger than padding target");
        buffer.resize(target_len, 0);
        buffer
    }

    #[test]
    fn well_formed_title_deed_is_accepted() {
        let verifier = DocumentVerifier::default();
        let result = verifier.verify(&FakeImage::new(600, 2000, 2828), &DocumentType::TitleDeed);

        assert_eq!(result.confidence, 0.89);
        assert!(result.is_document);
        assert!(result.warnings.is_empty());

        let meta = result.metadata.expect("metadata");
        assert_eq!(meta.resolution, "2000x2828");
        assert_eq!(meta.image_classification, ImageClass::FormalDocument);
        assert_eq!(meta.document_type, DocumentType::TitleDeed);
        assert_eq!(meta.file_size_kb, 600.0);
        assert!((meta.aspect_ratio - 0.7072).abs() < 1e-3);
    }

    #[test]
    fn confidence_of_exactly_point_eight_is_accepted() {
        // 700x990 sits in the lower resolution tier: 0.27 + 0.18 + 0.18 + 0.17.
        let verifier = DocumentVerifier::default();
        let result = verifier.verify(&FakeImage::new(600, 700, 990), &DocumentType::TitleDeed);

        assert_eq!(result.confidence, 0.80);
        assert!(result.is_document);
        assert_eq!(result.warnings, vec![LOW_RESOLUTION_WARNING.to_owned()]);
    }

    #[test]
    fn just_under_threshold_is_rejected_with_final_warning() {
        // Generic type: 0.21 + 0.27 + 0.14 + 0.17 = 0.79.
        let verifier = DocumentVerifier::default();
        let result = verifier.verify(&FakeImage::new(600, 1600, 2000), &DocumentType::SurveyMap);

        assert_eq!(result.confidence, 0.79);
        assert!(!result.is_document);
        assert_eq!(
            result.warnings,
            vec![
                "This may not be a valid surveyMap document. Please upload a clear, high-quality image of the entire document."
                    .to_owned()
            ]
        );
        assert_eq!(
            result.metadata.expect("metadata").image_classification,
            ImageClass::PossibleDocument
        );
    }

    #[test]
    fn tiny_file_scores_lowest_quality() {
        // 0.27 + 0.27 + 0.18 + 0.02.
        let verifier = DocumentVerifier::default();
        let result = verifier.verify(&FakeImage::new(20, 1586, 1000), &DocumentType::IdProof);

        assert_eq!(result.confidence, 0.74);
        assert!(!result.is_document);
        assert_eq!(result.warnings[0], SMALL_FILE_WARNING);
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(
            result.metadata.expect("metadata").image_classification,
            ImageClass::IdCard
        );
    }

    #[test]
    fn land_photo_aspect_contribution_ignores_shape() {
        let verifier = DocumentVerifier::default();
        let square = verifier.verify(&FakeImage::new(600, 2000, 2000), &DocumentType::LandPhoto);
        let wide = verifier.verify(&FakeImage::new(600, 3000, 1000), &DocumentType::LandPhoto);

        // 0.24 + 0.27 + 0.14 + 0.17: square reads as a possible document.
        assert_eq!(square.confidence, 0.82);
        assert!(square.is_document);
        assert!(square.warnings.is_empty());

        // 0.24 + 0.27 + 0.08 + 0.17: only the classification term moved.
        assert_eq!(wide.confidence, 0.76);
        assert_eq!(wide.warnings[0], MISMATCH_WARNING);
        assert_eq!(
            wide.metadata.expect("metadata").image_classification,
            ImageClass::Unknown
        );
    }

    #[test]
    fn selfie_classified_as_photo_does_not_match_declared_family() {
        // "selfie" is bucketed with photos but is not in the "photo" match family.
        let verifier = DocumentVerifier::default();
        let result = verifier.verify(&FakeImage::new(600, 1500, 1000), &DocumentType::Selfie);

        assert_eq!(result.confidence, 0.79);
        assert_eq!(
            result.metadata.as_ref().expect("metadata").image_classification,
            ImageClass::Photo
        );
        assert_eq!(result.warnings[0], MISMATCH_WARNING);
    }

    #[test]
    fn warnings_keep_check_order() {
        let verifier = DocumentVerifier::default();
        let result = verifier.verify(&FakeImage::new(20, 300, 700), &DocumentType::Photo);

        assert_eq!(result.confidence, 0.22);
        assert_eq!(
            result.warnings,
            vec![
                SMALL_FILE_WARNING.to_owned(),
                VERY_LOW_RESOLUTION_WARNING.to_owned(),
                MISMATCH_WARNING.to_owned(),
                rejection_warning("photo"),
            ]
        );
    }

    #[test]
    fn missing_resource_yields_single_warning_for_every_type() {
        let verifier = DocumentVerifier::default();
        let missing = FakeImage {
            bytes: None,
            ..FakeImage::new(0, 100, 100)
        };
        for ty in DocumentType::KNOWN {
            let result = verifier.verify(&missing, &ty);
            assert!(!result.is_document);
            assert_eq!(result.confidence, 0.0);
            assert_eq!(result.warnings, vec!["Image file does not exist".to_owned()]);
            assert!(result.metadata.is_none());
        }
    }

    #[test]
    fn undecodable_dimensions_stop_scoring() {
        let verifier = DocumentVerifier::default();
        let broken = FakeImage {
            dims: None,
            ..FakeImage::new(10, 1, 1)
        };
        let result = verifier.verify(&broken, &DocumentType::TitleDeed);

        assert_eq!(result.confidence, 0.0);
        assert_eq!(
            result.warnings,
            vec!["Failed to analyze image dimensions".to_owned()]
        );
        assert!(result.metadata.is_none());
    }

    #[test]
    fn failed_size_reread_uses_neutral_quality() {
        // 0.27 + 0.27 + 0.18 + 0.10.
        let verifier = DocumentVerifier::default();
        let flaky = FakeImage {
            size_fails_after: Some(1),
            ..FakeImage::new(600, 2000, 2828)
        };
        let result = verifier.verify(&flaky, &DocumentType::TitleDeed);

        assert_eq!(result.confidence, 0.82);
        assert!(result.is_document);
        assert_eq!(result.metadata.expect("metadata").file_size_kb, 600.0);
    }

    #[test]
    fn verification_is_idempotent() {
        let verifier = DocumentVerifier::default();
        let source = FakeImage::new(75, 1200, 900);
        let first = verifier.verify(&source, &DocumentType::MutationCert);
        let second = verifier.verify(&source, &DocumentType::MutationCert);
        assert_eq!(first, second);
    }

    #[test]
    fn custom_threshold_changes_decision_only() {
        let config = ClassifierConfig {
            accept_threshold: 0.75,
            ..ClassifierConfig::default()
        };
        let verifier = DocumentVerifier::new(config).expect("valid config");
        let result = verifier.verify(&FakeImage::new(600, 1600, 2000), &DocumentType::SurveyMap);
        assert_eq!(result.confidence, 0.79);
        assert!(result.is_document);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ClassifierConfig {
            min_pixel_count: 0,
            ..ClassifierConfig::default()
        };
        assert!(DocumentVerifier::new(config).is_err());
    }

    #[test]
    fn file_backed_id_card_round() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("id.png");
        std::fs::write(&path, png_padded_to(1586, 1000, 600 * 1024)).expect("write");

        let result = verify(&path, "idProof");
        assert_eq!(result.confidence, 0.89);
        assert!(result.is_document);
        let meta = result.metadata.expect("metadata");
        assert_eq!(meta.resolution, "1586x1000");
        assert_eq!(meta.image_classification, ImageClass::IdCard);
    }

    #[test]
    fn missing_file_through_free_function() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = verify(dir.path().join("never-uploaded.jpg"), "titleDeed");
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.warnings, vec!["Image file does not exist".to_owned()]);
    }

    #[test]
    fn garbage_file_fails_dimension_analysis() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scan.jpg");
        std::fs::write(&path, b"not really a jpeg").expect("write");

        let result = verify(&path, "encumbranceCert");
        assert_eq!(
            result.warnings,
            vec!["Failed to analyze image dimensions".to_owned()]
        );
    }

    #[test]
    fn in_memory_upload_is_verified() {
        let bytes = png_padded_to(1000, 1000, 200 * 1024);
        let verifier = DocumentVerifier::default();
        let result = verifier.verify_bytes(&bytes, &DocumentType::Photo);

        // 0.15 + 0.27 + 0.18 + 0.17: square photo with a 0.5 aspect distance.
        assert_eq!(result.confidence, 0.77);
        assert_eq!(
            result.metadata.expect("metadata").image_classification,
            ImageClass::Photo
        );
    }

    #[test]
    fn result_serializes_for_record_store() {
        let verifier = DocumentVerifier::default();
        let result = verifier.verify(&FakeImage::new(600, 2000, 2828), &DocumentType::TitleDeed);
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["isDocument"], true);
        assert_eq!(json["metadata"]["imageClassification"], "formal_document");
        assert_eq!(json["metadata"]["documentType"], "titleDeed");
    }

    #[test]
    fn path_below_regular_file_reads_as_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let plain = dir.path().join("plain.txt");
        std::fs::write(&plain, b"not a directory").expect("write");

        let result = verify(plain.join("deed.jpg"), "titleDeed");
        assert!(!result.is_document);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.warnings, vec!["Image file does not exist".to_owned()]);
        assert!(result.metadata.is_none());
    }

    fn assert_fault_result(result: &VerificationResult) {
        assert!(!result.is_document);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.warnings.len(), 1);
        assert!(
            result.warnings[0].starts_with("Document verification failed"),
            "unexpected warning: {}",
            result.warnings[0]
        );
        assert!(result.metadata.is_none());
    }

    #[test]
    fn fault_maps_to_zero_confidence_result() {
        let result = fault_result("worker gone");
        assert_fault_result(&result);
        assert_eq!(result.warnings[0], "Document verification failed: worker gone");
    }

    #[tokio::test]
    async fn panicked_blocking_task_maps_to_fault_result() {
        let join_err = tokio::task::spawn_blocking(|| -> VerificationResult {
            panic!("decoder crashed")
        })
        .await
        .expect_err("task should panic");

        assert_fault_result(&fault_result(join_err));
    }

    #[tokio::test]
    async fn async_verification_matches_blocking() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("deed.png");
        std::fs::write(&path, png_padded_to(707, 1000, 150 * 1024)).expect("write");

        let verifier = DocumentVerifier::default();
        let blocking = verifier.verify_path(&path, &DocumentType::TitleDeed);
        let non_blocking = verifier
            .verify_async(path.clone(), DocumentType::TitleDeed)
            .await;
        assert_eq!(blocking, non_blocking);
    }
}
