// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document plausibility classifier — partial scores and the verifier that
// combines them into an accept/reject decision.

pub mod classifier;
pub mod scoring;

pub use classifier::DocumentVerifier;
