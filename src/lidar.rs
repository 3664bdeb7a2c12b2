// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Common point cloud types and error handling.
//!
//! This module provides the sensor-agnostic types shared by the scan stream
//! and the preprocessing stages, plus the single error type used across the
//! crate.

use std::{fmt, path::PathBuf};

/// Point cloud output structure (sensor-agnostic)
///
/// This structure uses a structure-of-arrays (SoA) layout so per-channel
/// passes (range computation, filtering) stay cache-friendly. Once returned
/// from a stream or filter the caller owns the storage outright; nothing
/// aliases back into stream-internal buffers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
}

impl PointCloud {
    /// Create an empty point cloud with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            z: Vec::with_capacity(capacity),
        }
    }

    /// Create an empty point cloud
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a single point
    pub fn push(&mut self, x: f32, y: f32, z: f32) {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
    }

    /// Clear all points while retaining capacity
    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
        self.z.clear();
    }

    /// Get the current number of points
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Euclidean distance of point `i` from the sensor origin
    #[inline]
    pub fn norm(&self, i: usize) -> f32 {
        let (x, y, z) = (self.x[i], self.y[i], self.z[i]);
        (x * x + y * y + z * z).sqrt()
    }
}

/// One complete scan emitted by a [`ScanStream`](crate::stream::ScanStream).
///
/// Holds the spatial projection of the scan plus a parallel per-point
/// timestamp channel normalized to `[0, 1]` within the frame. The two
/// channels always have the same length and points are ordered by
/// acquisition time.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Position of this frame in the capture
    pub index: usize,
    /// Device-clock timestamp of the scan, in seconds
    pub device_timestamp: f64,
    /// Point positions
    pub points: PointCloud,
    /// Per-point timestamps normalized to `[0, 1]` within this frame
    pub timestamps: Vec<f64>,
}

impl Frame {
    /// Number of points in the frame
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the frame holds no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Common error type for capture ingestion
///
/// This enum consolidates the failure modes of the scan stream, the capture
/// container layer, and the preprocessing configuration into a single error
/// type for consistent handling.
#[derive(Debug)]
pub enum Error {
    /// I/O error (file operations)
    Io(std::io::Error),
    /// Capture path missing or not a regular file
    SourceNotFound(PathBuf),
    /// Scan decoder capability is not available in this environment
    DecoderUnavailable,
    /// Caller requested a frame index other than the single valid next index
    SequentialAccessViolation { expected: usize, requested: usize },
    /// All frames of the capture have already been yielded
    CaptureExhausted,
    /// Capture container could not be parsed
    InvalidCapture(String),
    /// Invalid packet data
    InvalidPacket(String),
    /// Range band configuration with min above max or a negative bound
    MalformedRangeBand { min: f32, max: f32 },
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::SourceNotFound(path) => {
                write!(f, "capture source not found: {}", path.display())
            }
            Error::DecoderUnavailable => write!(f, "scan decoder unavailable"),
            Error::SequentialAccessViolation {
                expected,
                requested,
            } => write!(
                f,
                "scan stream supports only sequential reads: expected index {}, but got {}",
                expected, requested
            ),
            Error::CaptureExhausted => write!(f, "capture exhausted"),
            Error::InvalidCapture(msg) => write!(f, "invalid capture: {}", msg),
            Error::InvalidPacket(msg) => write!(f, "invalid packet: {}", msg),
            Error::MalformedRangeBand { min, max } => {
                write!(f, "malformed range band: min {} max {}", min, max)
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
