// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — byte size and pixel dimension probing.

pub mod probe;

pub use probe::{FileImage, ImageSource, MemoryImage};
