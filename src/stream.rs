// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Sequential scan stream over a packet capture.
//!
//! [`ScanStream`] turns a capture file into an ordered sequence of
//! [`Frame`]s via two independent decode passes:
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────────┐
//! │ capture file │ ──► │ Counting pass     │ ──► │ frame count +    │
//! │ (pcap)       │     │ (full decode)     │     │ global stamps    │
//! └──────────────┘     └───────────────────┘     └──────────────────┘
//!        │
//!        ▼
//! ┌───────────────────┐     ┌──────────────────┐
//! │ Streaming pass    │ ──► │ frame_at(idx)    │
//! │ (second iterator) │     │ strictly ordered │
//! └───────────────────┘     └──────────────────┘
//! ```
//!
//! The counting pass runs eagerly at construction and decodes the entire
//! capture once, purely to learn the frame count and per-frame device
//! timestamps. For large captures this is an expensive startup cost,
//! proportional to the capture size; it is logged when it begins.
//!
//! Frames must then be consumed strictly in order. The stream holds the one
//! live cursor of the streaming pass, so out-of-order or concurrent access
//! is a correctness violation and is rejected with
//! [`Error::SequentialAccessViolation`]. The stream is exhausted after its
//! last frame; it is not restartable.

use crate::{
    decoder::{ScanDecoder, ScanIter},
    lidar::{Error, Frame, PointCloud},
};
use log::{info, trace};
use std::{path::Path, sync::Arc};

/// Sequential, index-checked scan stream over a capture file.
///
/// Construction performs the full counting pass; see the module docs for
/// the cost implications. Not safe for concurrent use: every
/// [`Self::frame_at`] call advances the underlying decode cursor.
pub struct ScanStream {
    /// Live cursor of the streaming decode pass
    scans: ScanIter,
    /// Frame count discovered by the counting pass
    n_frames: usize,
    /// Per-frame device timestamps from the counting pass, normalized to
    /// `[0, 1]` across the whole capture
    global_timestamps: Vec<f64>,
    /// Raw device timestamps recorded as frames are yielded
    device_timestamps: Vec<f64>,
    /// The single valid index for the next `frame_at` call
    next_idx: usize,
}

impl ScanStream {
    /// Open a capture and prepare it for sequential streaming.
    ///
    /// Verifies the capture path, runs the counting pass with the given
    /// decoder, then opens the independent streaming pass positioned at the
    /// first scan.
    ///
    /// # Errors
    ///
    /// - [`Error::SourceNotFound`] if `path` is not an existing regular file
    /// - [`Error::DecoderUnavailable`] if `decoder` is `None`
    /// - Any decode error surfaced by the counting pass
    pub fn new<P: AsRef<Path>>(
        path: P,
        decoder: Option<Arc<dyn ScanDecoder>>,
    ) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::SourceNotFound(path.to_path_buf()));
        }
        let decoder = decoder.ok_or(Error::DecoderUnavailable)?;

        info!("pre-reading {} to count scans", path.display());
        let mut stamps = Vec::new();
        for scan in decoder.scans(path)? {
            stamps.push(scan?.device_timestamp);
        }
        info!("capture {} contains {} scans", path.display(), stamps.len());

        let n_frames = stamps.len();
        let global_timestamps = normalize_span(&stamps);

        // Second, independent pass for on-demand emission. The counting
        // pass cursor is spent and never reused.
        let scans = decoder.scans(path)?;

        Ok(Self {
            scans,
            n_frames,
            global_timestamps,
            device_timestamps: Vec::with_capacity(n_frames),
            next_idx: 0,
        })
    }

    /// Pull the frame at `idx`, which must be the next unread index.
    ///
    /// On success the decode cursor advances and the frame's device
    /// timestamp is recorded. On [`Error::SequentialAccessViolation`] or
    /// [`Error::CaptureExhausted`] no state mutates, so re-requesting the
    /// correct index afterwards still works.
    ///
    /// A mid-stream decode error is different: the failing scan has already
    /// been consumed from the cursor when the error surfaces, and the next
    /// successful call yields the following scan under the failed scan's
    /// index. Frame indices then no longer line up with
    /// [`Self::global_frame_timestamps`], and [`Self::device_timestamps`]
    /// records nothing for the lost scan. Callers that need that alignment
    /// must treat decode errors as fatal and discard the stream.
    pub fn frame_at(&mut self, idx: usize) -> Result<Frame, Error> {
        if idx != self.next_idx {
            return Err(Error::SequentialAccessViolation {
                expected: self.next_idx,
                requested: idx,
            });
        }

        let scan = match self.scans.next() {
            Some(scan) => scan?,
            None => return Err(Error::CaptureExhausted),
        };
        self.next_idx += 1;

        // Device timestamp rather than capture-arrival time, as it is the
        // sensor's own clock.
        self.device_timestamps.push(scan.device_timestamp);
        trace!("scan {}: {} points", idx, scan.len());

        let timestamps = normalize_span(&scan.time);
        let points = PointCloud {
            x: scan.x,
            y: scan.y,
            z: scan.z,
        };

        Ok(Frame {
            index: idx,
            device_timestamp: scan.device_timestamp,
            points,
            timestamps,
        })
    }

    /// Total number of frames discovered by the counting pass.
    pub fn frame_count(&self) -> usize {
        self.n_frames
    }

    /// Per-frame device timestamps from the counting pass, normalized to
    /// `[0, 1]` across the capture.
    pub fn global_frame_timestamps(&self) -> &[f64] {
        &self.global_timestamps
    }

    /// Raw device timestamps of the frames yielded so far, in yield order.
    pub fn device_timestamps(&self) -> &[f64] {
        &self.device_timestamps
    }

    /// The single index the next [`Self::frame_at`] call will accept.
    pub fn next_index(&self) -> usize {
        self.next_idx
    }
}

impl std::fmt::Debug for ScanStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanStream")
            .field("n_frames", &self.n_frames)
            .field("global_timestamps", &self.global_timestamps)
            .field("device_timestamps", &self.device_timestamps)
            .field("next_idx", &self.next_idx)
            .finish_non_exhaustive()
    }
}

impl Iterator for ScanStream {
    type Item = Result<Frame, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.frame_at(self.next_idx) {
            Err(Error::CaptureExhausted) => None,
            frame => Some(frame),
        }
    }
}

/// Affinely map `values` so the first element lands on 0 and the last on 1.
///
/// A sequence with fewer than two elements, or with no span between its
/// first and last element, has no meaningful mapping; every element maps to
/// 0.0 in that case rather than propagating a division by zero.
fn normalize_span(values: &[f64]) -> Vec<f64> {
    let (Some(first), Some(last)) = (values.first(), values.last()) else {
        return Vec::new();
    };
    let span = last - first;
    if span <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - first) / span).collect()
}
