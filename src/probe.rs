// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Best-effort capture format sniffing.
//!
//! Before committing to the expensive counting pass of a
//! [`ScanStream`](crate::stream::ScanStream), a pipeline driver can ask
//! whether a pcap file even looks like a capture the decoder understands.
//! The probe samples a handful of packets and checks their size and dual
//! return mode marker against the decoder's expectations.
//!
//! The probe is advisory: it never fails. A missing decoder, an unreadable
//! file, or a malformed capture all degrade to `false`.

use crate::{decoder::ScanDecoder, pcap_source::PcapPackets};
use log::warn;
use std::path::Path;

/// Check whether `path` looks like a capture the decoder can handle.
///
/// Samples up to `max_packets` UDP payloads from the capture and returns
/// `true` if any of them has the decoder's fixed packet size and carries a
/// valid dual return mode marker. Never triggers a full decode pass.
///
/// Returns `false` when the decoder capability is absent, the file cannot
/// be opened, or no sampled packet matches.
pub fn looks_like_capture<P: AsRef<Path>>(
    path: P,
    max_packets: usize,
    decoder: Option<&dyn ScanDecoder>,
) -> bool {
    let path = path.as_ref();
    let Some(decoder) = decoder else {
        warn!(
            "scan decoder unavailable, cannot probe capture format of {}",
            path.display()
        );
        return false;
    };

    let packets = match PcapPackets::from_file(path, None) {
        Ok(packets) => packets,
        Err(_) => return false,
    };

    for payload in packets.take(max_packets) {
        let Ok(payload) = payload else { return false };
        if payload.len() != decoder.packet_size() {
            continue;
        }
        // Valid return mode marker as a sanity check against size-only
        // collisions with unrelated traffic.
        if let Ok(header) = decoder.parse_packet(&payload) {
            if decoder.dual_return_modes().contains(&header.return_mode) {
                return true;
            }
        }
    }

    false
}
