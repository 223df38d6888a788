// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Common PDU header decoder.
//!
//! Endianness of `frag_length`, `auth_length` and `call_id` is resolved from
//! `packed_drep[0]` once all 16 header octets are in hand; there is a single
//! decode path for both the all-at-once and byte-at-a-time cases, which
//! sidesteps the fast/slow-path divergence the original C source has.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::types::CommonHeader;

/// Interpret 16 raw header octets, resolving endianness from octet 4.
fn build_header(raw: &[u8; CommonHeader::LEN]) -> CommonHeader {
    let little = raw[4] == 0x10;
    let (frag_length, auth_length, call_id) = if little {
        (
            LittleEndian::read_u16(&raw[8..10]),
            LittleEndian::read_u16(&raw[10..12]),
            LittleEndian::read_u32(&raw[12..16]),
        )
    } else {
        (
            BigEndian::read_u16(&raw[8..10]),
            BigEndian::read_u16(&raw[10..12]),
            BigEndian::read_u32(&raw[12..16]),
        )
    };

    CommonHeader {
        rpc_vers: raw[0],
        rpc_vers_minor: raw[1],
        raw_type: raw[2],
        pfc_flags: raw[3],
        packed_drep: [raw[4], raw[5], raw[6], raw[7]],
        frag_length,
        auth_length,
        call_id,
    }
}

/// Decode as much of the 16-octet header as `input` allows, resuming from
/// `scratch[..*cursor]` if a previous call left the header half-built.
/// Returns the number of bytes consumed from `input`.
pub(crate) fn step(
    scratch: &mut [u8; CommonHeader::LEN],
    cursor: &mut usize,
    header: &mut CommonHeader,
    input: &[u8],
) -> usize {
    if input.is_empty() {
        return 0;
    }

    // Fast path: header not yet started and the whole thing is here.
    if *cursor == 0 && input.len() >= CommonHeader::LEN {
        let raw: [u8; CommonHeader::LEN] = input[..CommonHeader::LEN]
            .try_into()
            .expect("slice length checked above");
        *header = build_header(&raw);
        *cursor = CommonHeader::LEN;
        return CommonHeader::LEN;
    }

    // Slow path: one byte at a time, honoring whatever cursor we resumed at.
    let mut consumed = 0;
    while *cursor < CommonHeader::LEN && consumed < input.len() {
        scratch[*cursor] = input[consumed];
        *cursor += 1;
        consumed += 1;
    }
    if *cursor == CommonHeader::LEN {
        *header = build_header(scratch);
    }
    consumed
}
