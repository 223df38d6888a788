// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! REQUEST PDU decoding: the 8-byte primary span and the stub-data drain.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Size of the fixed portion following the common header for REQUEST.
pub(crate) const PRIMARY_LEN: usize = 8;

#[inline]
fn read_u16(raw: &[u8], little: bool) -> u16 {
    if little {
        LittleEndian::read_u16(raw)
    } else {
        BigEndian::read_u16(raw)
    }
}

/// Decode the 8-byte REQUEST primary span (allocation hint + context id are
/// skipped; only `opnum` is extracted). Returns bytes consumed; on
/// completion writes `opnum` into `out_opnum`.
pub(crate) fn step_primary(
    scratch: &mut [u8; PRIMARY_LEN],
    cursor: &mut usize,
    little_endian: bool,
    out_opnum: &mut u16,
    input: &[u8],
) -> usize {
    if input.is_empty() {
        return 0;
    }

    if *cursor == 0 && input.len() >= PRIMARY_LEN {
        *out_opnum = read_u16(&input[6..8], little_endian);
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
        *out_opnum = read_u16(&scratch[6..8], little_endian);
    }
    consumed
}

/// Drain up to `*left` opaque stub-data bytes from `input`, appending
/// whatever falls within `capture_budget` into `captured` for inspection.
/// Returns bytes consumed; decrements `*left` in place. The counter must be
/// seeded by the caller as `frag_length - bytes_processed` on entry to this
/// phase — the original never re-seeds it explicitly, a bug this crate
/// does not reproduce.
pub(crate) fn step_stub(
    left: &mut u16,
    captured: &mut bytes::BytesMut,
    capture_budget: usize,
    input: &[u8],
) -> usize {
    let take = (*left as usize).min(input.len());
    *left -= take as u16;
    let room = capture_budget.saturating_sub(captured.len());
    let to_capture = room.min(take);
    captured.extend_from_slice(&input[..to_capture]);
    take
}
