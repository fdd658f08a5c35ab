// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for land-registration document checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Document kinds a citizen can upload against a parcel, ownership, or
/// transfer request.
///
/// The wire form is the camelCase identifier used by the upload workflow
/// (`"titleDeed"`, `"idProof"`, ...). Identifiers outside the known set are
/// kept verbatim in [`DocumentType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentType {
    TitleDeed,
    SaleDeed,
    EncumbranceCert,
    MutationCert,
    LandUseCert,
    IdProof,
    Photo,
    Selfie,
    LandPhoto,
    LandmarkPhotos,
    SurveyMap,
    TaxReceipt,
    Other(String),
}

impl DocumentType {
    /// Every known identifier, in declaration order.
    pub const KNOWN: [DocumentType; 12] = [
        Self::TitleDeed,
        Self::SaleDeed,
        Self::EncumbranceCert,
        Self::MutationCert,
        Self::LandUseCert,
        Self::IdProof,
        Self::Photo,
        Self::Selfie,
        Self::LandPhoto,
        Self::LandmarkPhotos,
        Self::SurveyMap,
        Self::TaxReceipt,
    ];

    /// Identifier as sent by the upload workflow.
    pub fn as_str(&self) -> &str {
        match self {
            Self::TitleDeed => "titleDeed",
            Self::SaleDeed => "saleDeed",
            Self::EncumbranceCert => "encumbranceCert",
            Self::MutationCert => "mutationCert",
            Self::LandUseCert => "landUseCert",
            Self::IdProof => "idProof",
            Self::Photo => "photo",
            Self::Selfie => "selfie",
            Self::LandPhoto => "landPhoto",
            Self::LandmarkPhotos => "landmarkPhotos",
            Self::SurveyMap => "surveyMap",
            Self::TaxReceipt => "taxReceipt",
            Self::Other(id) => id,
        }
    }

    /// Parse an identifier. Never fails: unknown identifiers become `Other`.
    pub fn from_identifier(id: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|known| known.as_str() == id)
            .cloned()
            .unwrap_or_else(|| Self::Other(id.to_owned()))
    }

    /// Heuristic family used to pick the expected aspect ratio and the
    /// classification bucket rule.
    pub fn category(&self) -> DocumentCategory {
        match self {
            Self::TitleDeed
            | Self::SaleDeed
            | Self::EncumbranceCert
            | Self::MutationCert
            | Self::LandUseCert => DocumentCategory::Formal,
            Self::IdProof => DocumentCategory::IdProof,
            Self::Photo | Self::Selfie => DocumentCategory::Photo,
            Self::LandPhoto | Self::LandmarkPhotos => DocumentCategory::LandPhoto,
            Self::SurveyMap | Self::TaxReceipt => DocumentCategory::Generic,
            Self::Other(id) => DocumentCategory::from_identifier(id),
        }
    }

    /// Substring families of the identifier, consulted when comparing the
    /// declared type with the image classification.
    pub fn match_families(&self) -> MatchFamilies {
        MatchFamilies::of(self.as_str())
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_identifier(s))
    }
}

impl From<String> for DocumentType {
    fn from(id: String) -> Self {
        Self::from_identifier(&id)
    }
}

impl From<&str> for DocumentType {
    fn from(id: &str) -> Self {
        Self::from_identifier(id)
    }
}

impl From<DocumentType> for String {
    fn from(ty: DocumentType) -> Self {
        match ty {
            DocumentType::Other(id) => id,
            known => known.as_str().to_owned(),
        }
    }
}

/// Closed set of document families with their own aspect-ratio policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    /// Deeds and certificates, printed on portrait A4-like paper.
    Formal,
    /// Identity cards.
    IdProof,
    /// Portraits and selfies.
    Photo,
    /// Photographs of the parcel or its landmarks; any framing is fine.
    LandPhoto,
    /// Anything else.
    Generic,
}

impl DocumentCategory {
    /// Categorise an identifier that is not in the known set.
    ///
    /// Precedence: Formal > IdProof > Photo > LandPhoto > Generic.
    pub fn from_identifier(id: &str) -> Self {
        if id.contains("Deed") || id.contains("Cert") {
            Self::Formal
        } else if id.contains("idProof") {
            Self::IdProof
        } else if id.contains("photo") || id.contains("selfie") {
            Self::Photo
        } else if id.contains("landPhoto") || id.contains("landmarkPhoto") {
            Self::LandPhoto
        } else {
            Self::Generic
        }
    }

    /// Width/height ratio a genuine document of this family should have.
    /// `None` means the family has no fixed expectation.
    pub fn expected_aspect_ratio(&self) -> Option<f64> {
        match self {
            // 1 / sqrt(2): ISO 216 portrait.
            Self::Formal => Some(0.7071),
            // ISO/IEC 7810 ID-1 card.
            Self::IdProof => Some(1.586),
            Self::Photo => Some(1.5),
            Self::LandPhoto | Self::Generic => None,
        }
    }
}

/// Which declared-type families an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchFamilies {
    pub photo: bool,
    pub formal: bool,
    pub id_proof: bool,
}

impl MatchFamilies {
    pub fn of(id: &str) -> Self {
        Self {
            photo: id.contains("photo"),
            formal: id.contains("Deed") || id.contains("Cert"),
            id_proof: id.contains("idProof"),
        }
    }
}

/// Coarse bucket an image falls into judging by its dimensions alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageClass {
    FormalDocument,
    IdCard,
    Photo,
    PossibleDocument,
    Unknown,
}

impl ImageClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FormalDocument => "formal_document",
            Self::IdCard => "id_card",
            Self::Photo => "photo",
            Self::PossibleDocument => "possible_document",
            Self::Unknown => "unknown",
        }
    }

    /// How sure the dimension heuristic is about this bucket.
    pub fn confidence(&self) -> f64 {
        match self {
            Self::FormalDocument | Self::IdCard | Self::Photo => 0.95,
            Self::PossibleDocument => 0.8,
            Self::Unknown => 0.3,
        }
    }
}

impl std::fmt::Display for ImageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facts about the checked image, reported alongside the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMetadata {
    /// `"{width}x{height}"`.
    pub resolution: String,
    /// Width divided by height.
    pub aspect_ratio: f64,
    #[serde(rename = "fileSizeKB")]
    pub file_size_kb: f64,
    pub document_type: DocumentType,
    pub image_classification: ImageClass,
}

/// Outcome of one plausibility check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub is_document: bool,
    /// Weighted composite in [0, 1], rounded to two decimals.
    pub confidence: f64,
    /// Issues found, in the order the checks ran.
    pub warnings: Vec<String>,
    /// Absent when the image could not be read or decoded.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<VerificationMetadata>,
}

impl VerificationResult {
    /// Zero-confidence rejection carrying a single warning.
    pub fn failure(warning: impl Into<String>) -> Self {
        Self {
            is_document: false,
            confidence: 0.0,
            warnings: vec![warning.into()],
            metadata: None,
        }
    }
}

/// Where an upload stands from the user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadStatus {
    /// Image chosen, not yet checked.
    Pending,
    /// Check in flight.
    Verifying,
    /// Check accepted the image.
    Verified,
    /// Check rejected the image; the user may retry or override.
    Rejected,
    /// User chose to submit a rejected image anyway.
    Overridden,
}

impl UploadStatus {
    pub fn from_result(result: &VerificationResult) -> Self {
        if result.is_document {
            Self::Verified
        } else {
            Self::Rejected
        }
    }

    /// Whether the upload may be attached to a record.
    pub fn is_submittable(&self) -> bool {
        matches!(self, Self::Verified | Self::Overridden)
    }

    /// Explicit user override. Only a rejection can be overridden.
    pub fn override_rejection(self) -> Self {
        match self {
            Self::Rejected => Self::Overridden,
            other => other,
        }
    }
}

/// A verification outcome ready to be attached to a persisted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub id: Uuid,
    pub document_type: DocumentType,
    pub status: UploadStatus,
    pub result: VerificationResult,
    pub checked_at: DateTime<Utc>,
}

impl VerificationRecord {
    pub fn new(document_type: DocumentType, result: VerificationResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_type,
            status: UploadStatus::from_result(&result),
            result,
            checked_at: Utc::now(),
        }
    }

    /// Record the user's decision to submit despite a rejection.
    pub fn override_rejection(mut self) -> Self {
        self.status = self.status.override_rejection();
        self
    }
}
