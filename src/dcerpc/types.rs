// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! PDU type enumeration and the common header.

/// DCE/RPC PDU type, as carried in byte offset 2 of the common header.
///
/// Only the five kinds this parser decodes past the header get a named
/// variant; everything else is folded into `Other` and skipped once the
/// header is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PduType {
    /// `REQUEST = 0`
    Request,
    /// `BIND = 11`
    Bind,
    /// `BIND_ACK = 12`
    BindAck,
    /// `ALTER_CONTEXT = 14`
    AlterContext,
    /// `ALTER_CONTEXT_RESP = 15`
    AlterContextResp,
    /// Anything else; acknowledged, not decoded past the header.
    Other(u8),
}

impl PduType {
    /// Decode the raw `type` octet into a [`PduType`].
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Request,
            11 => Self::Bind,
            12 => Self::BindAck,
            14 => Self::AlterContext,
            15 => Self::AlterContextResp,
            other => Self::Other(other),
        }
    }

    /// `true` for BIND and ALTER_CONTEXT.
    pub fn is_bind_class(self) -> bool {
        matches!(self, Self::Bind | Self::AlterContext)
    }

    /// `true` for BIND_ACK and ALTER_CONTEXT_RESP.
    pub fn is_bind_ack_class(self) -> bool {
        matches!(self, Self::BindAck | Self::AlterContextResp)
    }

    /// `true` for REQUEST.
    pub fn is_request(self) -> bool {
        matches!(self, Self::Request)
    }
}

/// The fixed 16-octet common PDU header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommonHeader {
    /// Must be 5 on the wire; not enforced.
    pub rpc_vers: u8,
    /// 0 or 1 on the wire; not enforced.
    pub rpc_vers_minor: u8,
    /// Raw PDU type octet.
    pub raw_type: u8,
    /// `pfc_flags` octet, opaque to this parser beyond extraction.
    pub pfc_flags: u8,
    /// Packed data representation; only `packed_drep[0]` is interpreted.
    pub packed_drep: [u8; 4],
    /// Total PDU length in octets, including this header.
    pub frag_length: u16,
    /// Length of the (uninterpreted) auth trailer.
    pub auth_length: u16,
    /// Client-chosen call identifier; extracted, not interpreted.
    pub call_id: u32,
}

impl CommonHeader {
    /// Size of the common header on the wire.
    pub const LEN: usize = 16;

    /// `true` when `packed_drep[0] == 0x10`, i.e. the PDU body uses
    /// little-endian multi-octet integers.
    pub fn is_little_endian(&self) -> bool {
        self.packed_drep[0] == 0x10
    }

    /// Decode the `type` octet into a [`PduType`].
    pub fn pdu_type(&self) -> PduType {
        PduType::from_raw(self.raw_type)
    }
}
