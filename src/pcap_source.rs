// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! PCAP capture container access.
//!
//! This module provides [`PcapPackets`], a streaming iterator over the UDP
//! payloads of a PCAP/PCAPNG file. It is the capture-source layer under the
//! scan stream's format probe and is available to [`ScanDecoder`]
//! implementations that read packet captures.
//!
//! # Example
//!
//! ```ignore
//! use lidar_ingest::pcap_source::PcapPackets;
//!
//! // Stream UDP payloads, filtering by the sensor data port
//! let packets = PcapPackets::from_file("sensor_data.pcap", Some(2368))?;
//! for payload in packets.take(100) {
//!     let payload = payload?;
//!     // Inspect payload
//! }
//! ```
//!
//! [`ScanDecoder`]: crate::decoder::ScanDecoder

use crate::lidar::Error;
use pcap_parser::traits::PcapReaderIterator;
use std::{fs::File, io::Read, path::Path};

/// Read buffer capacity; must exceed the largest capture record.
const READER_CAPACITY: usize = 65536;

/// Streaming UDP payload iterator over PCAP/PCAPNG data.
///
/// Packets are parsed lazily as the iterator advances, so sampling the first
/// few packets of a large capture does not read the whole file. Supports
/// both legacy PCAP and PCAPNG formats.
pub struct PcapPackets {
    reader: Box<dyn PcapReaderIterator>,
    port: Option<u16>,
    /// Set while recovering from an incomplete read, to detect records
    /// larger than the reader buffer.
    refilled: bool,
}

impl PcapPackets {
    /// Open a PCAP file, optionally filtering by port.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to PCAP or PCAPNG file
    /// * `port` - Optional port filter (matches source OR destination)
    pub fn from_file<P: AsRef<Path>>(path: P, port: Option<u16>) -> Result<Self, Error> {
        let file = File::open(path.as_ref()).map_err(Error::Io)?;
        Self::from_reader(file, port)
    }

    /// Open PCAP data from any reader, optionally filtering by port.
    ///
    /// Useful for embedded test data or in-memory captures.
    pub fn from_reader<R: Read + 'static>(reader: R, port: Option<u16>) -> Result<Self, Error> {
        let reader = pcap_parser::create_reader(READER_CAPACITY, reader)
            .map_err(|e| Error::InvalidCapture(format!("failed to open capture: {:?}", e)))?;
        Ok(Self {
            reader,
            port,
            refilled: false,
        })
    }

    /// Advance to the next UDP payload matching the port filter.
    ///
    /// Returns `Ok(None)` at end of capture.
    pub fn next_payload(&mut self) -> Result<Option<Vec<u8>>, Error> {
        use pcap_parser::*;

        loop {
            match self.reader.next() {
                Ok((offset, block)) => {
                    self.refilled = false;
                    let payload = match block {
                        PcapBlockOwned::Legacy(ref packet) => {
                            Self::udp_payload(packet.data, self.port)
                        }
                        PcapBlockOwned::NG(Block::EnhancedPacket(ref epb)) => {
                            Self::udp_payload(epb.data, self.port)
                        }
                        PcapBlockOwned::NG(Block::SimplePacket(ref spb)) => {
                            Self::udp_payload(spb.data, self.port)
                        }
                        // Headers, interface descriptions and statistics
                        _ => None,
                    };
                    self.reader.consume(offset);
                    if let Some(payload) = payload {
                        return Ok(Some(payload));
                    }
                }
                Err(PcapError::Eof) => return Ok(None),
                Err(PcapError::Incomplete(_)) => {
                    if self.refilled {
                        return Err(Error::InvalidCapture(
                            "capture record exceeds reader buffer".to_string(),
                        ));
                    }
                    self.refilled = true;
                    self.reader
                        .refill()
                        .map_err(|e| Error::InvalidCapture(format!("refill failed: {:?}", e)))?;
                }
                Err(e) => {
                    return Err(Error::InvalidCapture(format!("parse error: {:?}", e)));
                }
            }
        }
    }

    /// Extract a UDP payload from a link-layer frame.
    ///
    /// Uses etherparse to handle Ethernet/IP/UDP headers.
    fn udp_payload(data: &[u8], port: Option<u16>) -> Option<Vec<u8>> {
        use etherparse::{SlicedPacket, TransportSlice};

        let packet = SlicedPacket::from_ethernet(data).ok()?;

        let udp = match packet.transport {
            Some(TransportSlice::Udp(udp)) => udp,
            _ => return None,
        };

        if let Some(filter_port) = port {
            if udp.source_port() != filter_port && udp.destination_port() != filter_port {
                return None;
            }
        }

        let payload = udp.payload();
        if payload.is_empty() {
            return None;
        }

        Some(payload.to_vec())
    }
}

impl Iterator for PcapPackets {
    type Item = Result<Vec<u8>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_payload().transpose()
    }
}
