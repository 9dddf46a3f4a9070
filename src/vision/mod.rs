// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image payloads handed to the recognition pipeline
//!
//! Images stay encoded end to end; dehazing and recognition happen inside the
//! external vision service.

pub mod image_utils;

pub use image_utils::{detect_format, ImageError, ImagePayload, ImageRef, MAX_IMAGE_SIZE};
