// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! BIND/ALTER_CONTEXT primary fields and context-item decoding.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::interface::InterfaceRecord;

/// Size of the fixed portion following the common header for BIND/ALTER_CONTEXT.
pub(crate) const PRIMARY_LEN: usize = 12;
/// Size of one BIND/ALTER_CONTEXT context item.
pub(crate) const ITEM_LEN: usize = 44;

#[inline]
fn read_u16(raw: &[u8], little: bool) -> u16 {
    if little {
        LittleEndian::read_u16(raw)
    } else {
        BigEndian::read_u16(raw)
    }
}

/// Decode the 12-byte BIND/ALTER_CONTEXT primary span
/// (`max_xmit_frag`, `max_recv_frag`, `assoc_group_id`, `num_ctx_items` + pad).
/// Returns bytes consumed from `input`; on completion (`*cursor ==
/// PRIMARY_LEN`) writes `num_ctx_items` into `out_num_ctx_items`.
pub(crate) fn step_primary(
    scratch: &mut [u8; PRIMARY_LEN],
    cursor: &mut usize,
    out_num_ctx_items: &mut u8,
    input: &[u8],
) -> usize {
    if input.is_empty() {
        return 0;
    }

    if *cursor == 0 && input.len() >= PRIMARY_LEN {
        *out_num_ctx_items = input[8];
        *cursor = PRIMARY_LEN;
        return PRIMARY_LEN;
    }

    let mut consumed = 0;
    while *cursor < PRIMARY_LEN && consumed < input.len() {
        scratch[*cursor] = input[consumed];
        *cursor += 1;
        consumed += 1;
    }
    if *cursor == PRIMARY_LEN {
        *out_num_ctx_items = scratch[8];
    }
    consumed
}

/// Decode one 44-byte BIND/ALTER_CONTEXT context item, reassembling the
/// wire-order UUID into canonical storage order: storage positions
/// `(3,2,1,0, 5,4, 7,6, 8..15)` hold source octets
/// `(0,1,2,3,4,5,6,7,8..15)`.
///
/// Returns `(consumed, Some(record))` once the 44th byte lands, `(consumed,
/// None)` otherwise.
pub(crate) fn step_item(
    scratch: &mut [u8; ITEM_LEN],
    cursor: &mut usize,
    little_endian: bool,
    input: &[u8],
) -> (usize, Option<InterfaceRecord>) {
    if input.is_empty() {
        return (0, None);
    }

    if *cursor == 0 && input.len() >= ITEM_LEN {
        let record = decode_item(&input[..ITEM_LEN], little_endian);
        *cursor = ITEM_LEN;
        return (ITEM_LEN, Some(record));
    }

    let mut consumed = 0;
    while *cursor < ITEM_LEN && consumed < input.len() {
        scratch[*cursor] = input[consumed];
        *cursor += 1;
        consumed += 1;
    }
    if *cursor == ITEM_LEN {
        (consumed, Some(decode_item(scratch, little_endian)))
    } else {
        (consumed, None)
    }
}

fn decode_item(raw: &[u8], little_endian: bool) -> InterfaceRecord {
    let ctx_id = read_u16(&raw[0..2], little_endian);
    // raw[2] = num_transact_items, raw[3] = reserved; both skipped.
    let mut uuid = [0u8; 16];
    uuid[3] = raw[4];
    uuid[2] = raw[5];
    uuid[1] = raw[6];
    uuid[0] = raw[7];
    uuid[5] = raw[8];
    uuid[4] = raw[9];
    uuid[7] = raw[10];
    uuid[6] = raw[11];
    uuid[8..16].copy_from_slice(&raw[12..20]);
    let version = read_u16(&raw[20..22], little_endian);
    let version_minor = read_u16(&raw[22..24], little_endian);
    // raw[24..44] = abstract/transfer syntax trailer, skipped.

    InterfaceRecord {
        ctx_id,
        uuid,
        version,
        version_minor,
        result: 0,
    }
}
