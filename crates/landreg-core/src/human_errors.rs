// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable messages for citizens uploading land documents.
//
// Every technical failure is mapped to one plain sentence (carried as the
// single warning of a zero-confidence verification result) and a suggestion
// the upload screen can show underneath it.

use std::io::ErrorKind;

use crate::error::LandregError;

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanError {
    /// Plain summary. This is the text placed in `VerificationResult::warnings`.
    pub message: String,
    /// What the user should try next.
    pub suggestion: String,
    /// Whether picking the same image again could succeed.
    pub retriable: bool,
}

/// Convert a `LandregError` into a `HumanError`.
pub fn humanize_error(err: &LandregError) -> HumanError {
    match err {
        LandregError::ResourceMissing(_) => missing_image(),

        LandregError::DimensionDecode(_) => HumanError {
            message: "Failed to analyze image dimensions".into(),
            suggestion: "Upload a JPEG or PNG photo of the document.".into(),
            retriable: false,
        },

        LandregError::InvalidConfig(detail) => HumanError {
            message: format!("Document verification is misconfigured: {detail}"),
            suggestion: "Contact the registry office; this is not a problem with your document.".into(),
            retriable: false,
        },

        LandregError::Io(io) if io.kind() == ErrorKind::NotFound => missing_image(),

        LandregError::Io(io) => HumanError {
            message: format!("Image file could not be read: {io}"),
            suggestion: "Check that the file is still on this device and try again.".into(),
            retriable: true,
        },

        LandregError::Serialization(detail) => HumanError {
            message: format!("Document verification failed: {detail}"),
            suggestion: "Try again. If it keeps happening, contact the registry office.".into(),
            retriable: true,
        },

        LandregError::Internal(detail) => HumanError {
            message: format!("Document verification failed: {detail}"),
            suggestion: "Try again. If it keeps happening, contact the registry office.".into(),
            retriable: true,
        },
    }
}

/// The warning text carried by a zero-confidence result for `err`.
pub fn warning_for(err: &LandregError) -> String {
    humanize_error(err).message
}

fn missing_image() -> HumanError {
    HumanError {
        message: "Image file does not exist".into(),
        suggestion: "Pick the photo again from your gallery or camera.".into(),
        retriable: false,
    }
}
