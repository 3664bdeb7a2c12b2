// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Scan decoder capability abstraction.
//!
//! Turning raw sensor packets into points is delegated to an external
//! decoder consumed as a black box. This module defines the [`ScanDecoder`]
//! trait the stream and the format probe program against, enabling:
//!
//! - **Offline replay**: driving the pipeline from recorded captures
//! - **Testing**: serving synthetic scans without a decoder backend
//!
//! Decoder availability is an environment concern, so call sites take
//! `Option<Arc<dyn ScanDecoder>>` and surface `None` as
//! [`Error::DecoderUnavailable`] (or a logged `false` from the advisory
//! format probe) rather than a generic failure.

use crate::lidar::Error;
use std::path::Path;

/// Raw output of one decode step: a full scan with per-point channels.
///
/// Channels are parallel and ordered by acquisition time. `time` carries the
/// raw per-point device timestamps; normalization to `[0, 1]` happens in the
/// stream, not here.
#[derive(Clone, Debug, Default)]
pub struct RawScan {
    /// Device-clock timestamp of the scan, in seconds
    pub device_timestamp: f64,
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
    /// Raw per-point timestamps, same length as the position channels
    pub time: Vec<f64>,
}

impl RawScan {
    /// Number of points in the scan
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Check if the scan holds no points
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Packet header summary used by the format probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacketHeader {
    /// Dual return mode marker byte
    pub return_mode: u8,
}

/// Forward-only decode pass over a capture, consumed exactly once.
pub type ScanIter = Box<dyn Iterator<Item = Result<RawScan, Error>> + Send>;

/// Trait for scan decoder implementations.
///
/// Implementations decode a packet capture into an ordered sequence of
/// scans. The decode pass is forward-only; callers that need more than one
/// traversal must request independent iterators via [`Self::scans`].
pub trait ScanDecoder: Send + Sync {
    /// Open a fresh decode pass over the capture at `path`.
    ///
    /// Each call returns an independent iterator positioned at the first
    /// scan. Iteration order is acquisition order.
    fn scans(&self, path: &Path) -> Result<ScanIter, Error>;

    /// Parse a single packet header without decoding points.
    ///
    /// Used only by the format probe as a cheap sanity check.
    fn parse_packet(&self, payload: &[u8]) -> Result<PacketHeader, Error>;

    /// Fixed UDP payload size of this sensor's data packets.
    fn packet_size(&self) -> usize;

    /// Valid dual return mode marker bytes for this sensor family.
    fn dual_return_modes(&self) -> &[u8];
}

/// Test decoder for unit testing and offline development.
///
/// Serves a pre-built list of scans regardless of the capture path, with a
/// configurable packet size and marker set for probe tests.
pub struct TestDecoder {
    scans: Vec<RawScan>,
    packet_size: usize,
    dual_return_modes: Vec<u8>,
}

impl TestDecoder {
    /// Default packet size served by the test decoder
    pub const PACKET_SIZE: usize = 1206;

    /// Default valid dual return mode markers
    pub const DUAL_RETURN_MODES: [u8; 3] = [0x37, 0x38, 0x39];

    /// Create a test decoder serving the given scans.
    pub fn new(scans: Vec<RawScan>) -> Self {
        Self {
            scans,
            packet_size: Self::PACKET_SIZE,
            dual_return_modes: Self::DUAL_RETURN_MODES.to_vec(),
        }
    }

    /// Create a test decoder with no scans.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Override the expected packet size.
    pub fn with_packet_size(mut self, packet_size: usize) -> Self {
        self.packet_size = packet_size;
        self
    }

    /// Override the valid dual return mode markers.
    pub fn with_dual_return_modes(mut self, modes: Vec<u8>) -> Self {
        self.dual_return_modes = modes;
        self
    }
}

impl ScanDecoder for TestDecoder {
    fn scans(&self, _path: &Path) -> Result<ScanIter, Error> {
        Ok(Box::new(self.scans.clone().into_iter().map(Ok)))
    }

    fn parse_packet(&self, payload: &[u8]) -> Result<PacketHeader, Error> {
        // Marker byte sits second from the end, mirroring the Velodyne
        // factory field layout.
        if payload.len() < 2 {
            return Err(Error::InvalidPacket(format!(
                "packet too small: {} bytes",
                payload.len()
            )));
        }
        Ok(PacketHeader {
            return_mode: payload[payload.len() - 2],
        })
    }

    fn packet_size(&self) -> usize {
        self.packet_size
    }

    fn dual_return_modes(&self) -> &[u8] {
        &self.dual_return_modes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(stamp: f64, n: usize) -> RawScan {
        RawScan {
            device_timestamp: stamp,
            x: vec![1.0; n],
            y: vec![0.0; n],
            z: vec![0.0; n],
            time: (0..n).map(|i| stamp + i as f64 * 1e-4).collect(),
        }
    }

    #[test]
    fn test_scans_are_independent_passes() {
        let decoder = TestDecoder::new(vec![scan(1.0, 4), scan(1.1, 4)]);
        let path = Path::new("unused.pcap");

        let first: Vec<_> = decoder.scans(path).unwrap().collect();
        let second: Vec<_> = decoder.scans(path).unwrap().collect();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn test_parse_packet_marker() {
        let decoder = TestDecoder::empty();
        let mut payload = vec![0u8; TestDecoder::PACKET_SIZE];
        payload[TestDecoder::PACKET_SIZE - 2] = 0x38;

        let header = decoder.parse_packet(&payload).unwrap();
        assert_eq!(header.return_mode, 0x38);
        assert!(decoder.dual_return_modes().contains(&header.return_mode));
    }

    #[test]
    fn test_parse_packet_too_small() {
        let decoder = TestDecoder::empty();
        assert!(decoder.parse_packet(&[0x37]).is_err());
    }
}
