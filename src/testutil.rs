// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Synthetic pcap builders shared by the capture-layer tests.

/// Minimal valid legacy PCAP header (little-endian)
const PCAP_HEADER: [u8; 24] = [
    0xd4, 0xc3, 0xb2, 0xa1, // Magic number (little-endian)
    0x02, 0x00, // Major version
    0x04, 0x00, // Minor version
    0x00, 0x00, 0x00, 0x00, // Timezone
    0x00, 0x00, 0x00, 0x00, // Timestamp accuracy
    0xff, 0xff, 0x00, 0x00, // Snap length
    0x01, 0x00, 0x00, 0x00, // Network type (Ethernet)
];

/// Create a minimal UDP packet with Ethernet + IP + UDP headers
pub(crate) fn make_udp_packet(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let udp_len = 8 + payload.len();
    let ip_len = 20 + udp_len;
    let total_len = 14 + ip_len; // Ethernet header is 14 bytes

    let mut packet = Vec::with_capacity(total_len);

    // Ethernet header (14 bytes)
    packet.extend_from_slice(&[0x00; 6]); // Dst MAC
    packet.extend_from_slice(&[0x00; 6]); // Src MAC
    packet.extend_from_slice(&[0x08, 0x00]); // EtherType: IPv4

    // IPv4 header (20 bytes, no options)
    packet.push(0x45); // Version + IHL
    packet.push(0x00); // DSCP + ECN
    packet.extend_from_slice(&(ip_len as u16).to_be_bytes()); // Total length
    packet.extend_from_slice(&[0x00, 0x00]); // Identification
    packet.extend_from_slice(&[0x00, 0x00]); // Flags + Fragment offset
    packet.push(0x40); // TTL
    packet.push(0x11); // Protocol: UDP
    packet.extend_from_slice(&[0x00, 0x00]); // Checksum (0 for test)
    packet.extend_from_slice(&[192, 168, 1, 1]); // Src IP
    packet.extend_from_slice(&[192, 168, 1, 2]); // Dst IP

    // UDP header (8 bytes)
    packet.extend_from_slice(&src_port.to_be_bytes());
    packet.extend_from_slice(&dst_port.to_be_bytes());
    packet.extend_from_slice(&(udp_len as u16).to_be_bytes());
    packet.extend_from_slice(&[0x00, 0x00]); // Checksum (0 for test)

    // Payload
    packet.extend_from_slice(payload);

    packet
}

/// Create a PCAP packet record
fn make_pcap_record(data: &[u8]) -> Vec<u8> {
    let len = data.len() as u32;
    let mut record = Vec::with_capacity(16 + data.len());

    // Packet record header (16 bytes)
    record.extend_from_slice(&[0x00; 4]); // Timestamp seconds
    record.extend_from_slice(&[0x00; 4]); // Timestamp microseconds
    record.extend_from_slice(&len.to_le_bytes()); // Captured length
    record.extend_from_slice(&len.to_le_bytes()); // Original length

    // Packet data
    record.extend_from_slice(data);

    record
}

/// Build a complete in-memory legacy PCAP from (source port, payload) pairs
pub(crate) fn make_pcap(payloads: &[(u16, &[u8])]) -> Vec<u8> {
    let mut pcap = PCAP_HEADER.to_vec();
    for (port, payload) in payloads {
        let packet = make_udp_packet(*port, 12345, payload);
        pcap.extend_from_slice(&make_pcap_record(&packet));
    }
    pcap
}
