// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// landreg-document — Document checks for land-registration uploads.
//
// Provides an image probe (byte size and pixel dimensions, read from a file
// or an in-memory upload buffer) and the document plausibility classifier
// that scores whether an image looks like the document type the user claims
// to be uploading.

pub mod image;
pub mod verify;

// Re-export the primary items so callers can use `landreg_document::DocumentVerifier` etc.
pub use crate::image::probe::{FileImage, ImageSource, MemoryImage};
pub use crate::verify::classifier::{DocumentVerifier, verify};
