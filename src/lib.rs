// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! LiDAR capture ingestion library
//!
//! This library is the ingestion front-end of a LiDAR odometry pipeline: it
//! turns a recorded packet capture into an ordered sequence of per-frame
//! point clouds and filters each cloud by sensor range before it reaches
//! the registration stage.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ capture file │ ──► │  ScanStream  │ ──► │  RangeFilter  │ ──► odometry
//! │ (pcap)       │     │ (two passes) │     │ (band / pass) │     (external)
//! └──────────────┘     └──────────────┘     └───────────────┘
//!        ▲
//!        │ ScanDecoder (external capability)
//! ```
//!
//! The decoding of raw sensor packets into points is delegated to an
//! external [`ScanDecoder`] capability; this crate handles sequencing,
//! timing normalization, format sniffing, and range filtering.
//!
//! # Modules
//!
//! - [`lidar`]: Common types and error handling
//! - [`decoder`]: Scan decoder capability abstraction
//! - [`stream`]: Sequential two-pass scan stream
//! - [`preprocess`]: Range-band point cloud filtering
//! - [`probe`]: Best-effort capture format sniffing
//! - [`pcap_source`]: PCAP/PCAPNG UDP payload extraction
//!
//! # Example
//!
//! ```ignore
//! use lidar_ingest::{RangeBand, RangeFilter, ScanStream};
//!
//! let mut stream = ScanStream::new("capture.pcap", Some(decoder))?;
//! let filter = RangeFilter::new(Some(RangeBand::new(5.0, 100.0)?));
//!
//! for idx in 0..stream.frame_count() {
//!     let frame = stream.frame_at(idx)?;
//!     let frame = filter.apply_frame(&frame);
//!     // Hand frame to the odometry core
//! }
//! ```

pub mod decoder;
pub mod lidar;
#[cfg(feature = "pcap")]
pub mod pcap_source;
pub mod preprocess;
#[cfg(feature = "pcap")]
pub mod probe;
pub mod stream;
#[cfg(all(test, feature = "pcap"))]
pub(crate) mod testutil;

// Re-exports for convenience
pub use decoder::{PacketHeader, RawScan, ScanDecoder, ScanIter, TestDecoder};
pub use lidar::{Error, Frame, PointCloud};
#[cfg(feature = "pcap")]
pub use pcap_source::PcapPackets;
pub use preprocess::{RangeBand, RangeFilter};
#[cfg(feature = "pcap")]
pub use probe::looks_like_capture;
pub use stream::ScanStream;
