// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The per-flow interface advertisement list.
//!
//! The original Suricata source keeps this as an intrusive `TAILQ`, appended
//! to the head on every BIND/ALTER_CONTEXT item and walked linearly to patch
//! in results from BIND_ACK/ALTER_CONTEXT_RESP, matching each item against
//! the record whose `ctx_id` equals the item's ordinal. A `Vec` gives the
//! same three operations — append, ordered iteration, bulk release — without
//! the intrusive-list bookkeeping; the ordinal-to-`ctx_id` match still
//! requires a linear scan, since nothing guarantees bind order and `ctx_id`
//! coincide.

use serde::Serialize;

/// A single context item advertised in a BIND/ALTER_CONTEXT and
/// (eventually) accepted or rejected in the matching response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InterfaceRecord {
    /// Context id this record was advertised under.
    pub ctx_id: u16,
    /// Interface UUID, stored in canonical (rendered) order, not the
    /// byte-swizzled order it arrives in on the wire.
    pub uuid: [u8; 16],
    /// Major version of the interface.
    pub version: u16,
    /// Minor version of the interface.
    pub version_minor: u16,
    /// 0 = accepted, non-zero = rejected. Defaults to 0 until a matching
    /// BIND_ACK/ALTER_CONTEXT_RESP item patches it.
    pub result: u16,
}

impl InterfaceRecord {
    /// Render the UUID in canonical hyphenated hex form, matching the
    /// original's `printUUID` debug helper, generalized to a `String`
    /// instead of `printf`.
    pub fn uuid_string(&self) -> String {
        let u = &self.uuid;
        format!(
            "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            u[0], u[1], u[2], u[3], u[4], u[5], u[6], u[7], u[8], u[9], u[10], u[11], u[12], u[13], u[14], u[15],
        )
    }
}

/// Ordered, append-only (during BIND/ALTER) list of interface records for a
/// flow. Entries are mutated in place (only the `result` field) by
/// BIND_ACK/ALTER_CONTEXT_RESP — append order is ordinal order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InterfaceList {
    records: Vec<InterfaceRecord>,
}

impl InterfaceList {
    /// Append a newly completed context item. Returns `false` (no panic, no
    /// allocation) if the list could not grow to hold one more record —
    /// the caller turns that into `ParseError::InterfaceAllocationFailed`
    /// and abandons the current PDU.
    #[must_use]
    pub fn push(&mut self, record: InterfaceRecord) -> bool {
        if self.records.try_reserve(1).is_err() {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Patch the `result` field of the record whose `ctx_id` equals
    /// `ctx_id` — a linear scan, mirroring the original's `TAILQ_FOREACH`
    /// walk over the interface list matching `uuid_entry->ctxid` against
    /// the ordinal. No-op if no record advertised that context id (a
    /// malformed BIND_ACK referring to a context never bound).
    pub fn patch_by_ctx_id(&mut self, ctx_id: u16, result: u16) {
        if let Some(record) = self.records.iter_mut().find(|r| r.ctx_id == ctx_id) {
            record.result = result;
        }
    }

    /// Number of interface records currently held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` if no interface has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ordered iteration over the recorded interfaces.
    pub fn iter(&self) -> std::slice::Iter<'_, InterfaceRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a InterfaceList {
    type IntoIter = std::slice::Iter<'a, InterfaceRecord>;
    type Item = &'a InterfaceRecord;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ctx_id: u16) -> InterfaceRecord {
        InterfaceRecord {
            ctx_id,
            uuid: [0u8; 16],
            version: 1,
            version_minor: 0,
            result: 0,
        }
    }

    #[test]
    fn append_then_patch_by_ctx_id() {
        let mut list = InterfaceList::default();
        assert!(list.push(record(0)));
        assert!(list.push(record(1)));
        assert!(list.push(record(2)));
        assert_eq!(list.len(), 3);

        list.patch_by_ctx_id(1, 2);
        let results: Vec<u16> = list.iter().map(|r| r.result).collect();
        assert_eq!(results, vec![0, 2, 0]);
    }

    #[test]
    fn patch_unknown_ctx_id_is_noop() {
        let mut list = InterfaceList::default();
        assert!(list.push(record(0)));
        list.patch_by_ctx_id(5, 2);
        assert_eq!(list.iter().next().expect("one record").result, 0);
    }

    #[test]
    fn patch_matches_by_ctx_id_not_insertion_position() {
        // Context ids need not be assigned in ascending bind order; the
        // match is by ctx_id, not by position in the list.
        let mut list = InterfaceList::default();
        assert!(list.push(record(2)));
        assert!(list.push(record(0)));
        assert!(list.push(record(1)));

        list.patch_by_ctx_id(0, 7);
        let results: Vec<u16> = list.iter().map(|r| r.result).collect();
        assert_eq!(results, vec![0, 7, 0]);
    }

    #[test]
    fn uuid_string_renders_canonical_form() {
        let mut uuid = [0u8; 16];
        for (i, b) in uuid.iter_mut().enumerate() {
            *b = i as u8;
        }
        let rec = InterfaceRecord {
            ctx_id: 0,
            uuid,
            version: 1,
            version_minor: 0,
            result: 0,
        };
        assert_eq!(
            rec.uuid_string(),
            "00010203-0405-0607-0809-0a0b0c0d0e0f"
        );
    }
}
