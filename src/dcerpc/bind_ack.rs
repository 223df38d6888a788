// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! BIND_ACK/ALTER_CONTEXT_RESP decoding: primary fields, the secondary
//! address, interior padding, the context-item count, and result items.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Size of the fixed portion following the common header, up to and
/// including `secondary_addr_len`.
pub(crate) const PRIMARY_LEN: usize = 10;
/// Size of the context-item count field (1 real octet + 3 reserved).
pub(crate) const CTX_COUNT_LEN: usize = 4;
/// Size of one BIND_ACK/ALTER_CONTEXT_RESP result item.
pub(crate) const ITEM_LEN: usize = 24;

#[inline]
fn read_u16(raw: &[u8], little: bool) -> u16 {
    if little {
        LittleEndian::read_u16(raw)
    } else {
        BigEndian::read_u16(raw)
    }
}

/// Decode the 10-byte BIND_ACK primary span. Returns bytes consumed; on
/// completion writes `secondary_addr_len` into `out_secondary_addr_len`.
pub(crate) fn step_primary(
    scratch: &mut [u8; PRIMARY_LEN],
    cursor: &mut usize,
    little_endian: bool,
    out_secondary_addr_len: &mut u16,
    input: &[u8],
) -> usize {
    if input.is_empty() {
        return 0;
    }

    if *cursor == 0 && input.len() >= PRIMARY_LEN {
        *out_secondary_addr_len = read_u16(&input[8..10], little_endian);
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
        *out_secondary_addr_len = read_u16(&scratch[8..10], little_endian);
    }
    consumed
}

/// Consume up to `*left` opaque secondary-address bytes from `input`.
/// Returns bytes consumed; decrements `*left` in place.
pub(crate) fn step_secondary_addr(left: &mut u16, input: &[u8]) -> usize {
    let take = (*left as usize).min(input.len());
    *left -= take as u16;
    take
}

/// Consume up to `*left` opaque padding bytes. Returns bytes consumed.
pub(crate) fn step_pad(left: &mut u8, input: &[u8]) -> usize {
    let take = (*left as usize).min(input.len());
    *left -= take as u8;
    take
}

/// Decode the 4-byte context-item count field. Returns bytes consumed; on
/// completion writes the count into `out_num_ctx_items`.
pub(crate) fn step_ctx_count(
    scratch: &mut [u8; CTX_COUNT_LEN],
    cursor: &mut usize,
    out_num_ctx_items: &mut u8,
    input: &[u8],
) -> usize {
    if input.is_empty() {
        return 0;
    }

    if *cursor == 0 && input.len() >= CTX_COUNT_LEN {
        *out_num_ctx_items = input[0];
        *cursor = CTX_COUNT_LEN;
        return CTX_COUNT_LEN;
    }

    let mut consumed = 0;
    while *cursor < CTX_COUNT_LEN && consumed < input.len() {
        scratch[*cursor] = input[consumed];
        *cursor += 1;
        consumed += 1;
    }
    if *cursor == CTX_COUNT_LEN {
        *out_num_ctx_items = scratch[0];
    }
    consumed
}

/// Decode one 24-byte BIND_ACK/ALTER_CONTEXT_RESP result item. Returns
/// `(consumed, Some(result))` once the 24th byte lands.
pub(crate) fn step_item(
    scratch: &mut [u8; ITEM_LEN],
    cursor: &mut usize,
    little_endian: bool,
    input: &[u8],
) -> (usize, Option<u16>) {
    if input.is_empty() {
        return (0, None);
    }

    if *cursor == 0 && input.len() >= ITEM_LEN {
        let result = read_u16(&input[0..2], little_endian);
        *cursor = ITEM_LEN;
        return (ITEM_LEN, Some(result));
    }

    let mut consumed = 0;
    while *cursor < ITEM_LEN && consumed < input.len() {
        scratch[*cursor] = input[consumed];
        *cursor += 1;
        consumed += 1;
    }
    if *cursor == ITEM_LEN {
        (consumed, Some(read_u16(&scratch[0..2], little_endian)))
    } else {
        (consumed, None)
    }
}
