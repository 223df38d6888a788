// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Per-flow state and the `ingest` dispatcher.
//!
//! One [`FlowState`] lives for the lifetime of a TCP flow. `ingest` is the
//! `parse()` entry point: it is handed whatever byte slice the (external)
//! TCP reassembly layer has for one direction and consumes as much of it as
//! the current phase allows, resuming exactly where the previous call left
//! off.

use tracing::{debug, trace};

use super::{
    bind, bind_ack,
    interface::InterfaceList,
    phase::{
        BindAckItemPhase, BindAckPrimaryPhase, BindItemPhase, BindPrimaryPhase, CtxCountPhase,
        HeaderPhase, IdlePhase, Phase, PhaseInfo, PadPhase, RequestPrimaryPhase, SecAddrPhase,
        StubPhase,
    },
    request,
    types::{CommonHeader, PduType},
};
use crate::{cfg::config::Config, error::ParseError, registration::Direction};

/// One TCP flow's worth of DCE/RPC parsing state.
#[derive(Debug, Clone)]
pub struct FlowState {
    /// Cumulative offset within the current PDU.
    pub bytes_processed: usize,
    /// Decoded common header; valid once `bytes_processed >= 16`.
    pub header: CommonHeader,
    /// Cursor within the context item currently being decoded.
    pub ctx_bytes_processed: usize,
    /// Total context items advertised by the current bind-class PDU.
    pub num_ctx_items: u8,
    /// Remaining context items to decode for the current PDU.
    pub num_ctx_items_left: u8,
    /// Secondary address length advertised by the current BIND_ACK.
    pub secondary_addr_len: u16,
    /// Remaining secondary-address bytes to drain.
    pub secondary_addr_len_left: u16,
    /// Pad byte count (0-3) computed after the secondary address.
    pub pad: u8,
    /// Remaining pad (or stub, which reuses this counter) bytes to drain.
    pub pad_left: u16,
    /// Operation number of the current REQUEST.
    pub opnum: u16,
    /// Interface advertisements accumulated for the lifetime of the flow.
    pub interfaces: InterfaceList,
    /// Stub bytes captured from the current REQUEST, bounded by
    /// `config.max_stub_capture_len` — available to upstream collaborators
    /// but not parsed here.
    pub stub_data: bytes::BytesMut,

    phase: Phase,
    span_cursor: usize,
    header_raw: [u8; CommonHeader::LEN],
    bind_primary_raw: [u8; bind::PRIMARY_LEN],
    bind_ack_primary_raw: [u8; bind_ack::PRIMARY_LEN],
    ctx_count_raw: [u8; bind_ack::CTX_COUNT_LEN],
    request_primary_raw: [u8; request::PRIMARY_LEN],
    bind_item_raw: [u8; bind::ITEM_LEN],
    bind_ack_item_raw: [u8; bind_ack::ITEM_LEN],

    config: Config,
}

impl FlowState {
    /// Allocate a zero-initialized flow state (`state_alloc()` in the
    /// original).
    pub fn new(config: Config) -> Self {
        Self {
            bytes_processed: 0,
            header: CommonHeader::default(),
            ctx_bytes_processed: 0,
            num_ctx_items: 0,
            num_ctx_items_left: 0,
            secondary_addr_len: 0,
            secondary_addr_len_left: 0,
            pad: 0,
            pad_left: 0,
            opnum: 0,
            interfaces: InterfaceList::default(),
            stub_data: bytes::BytesMut::new(),
            phase: Phase::default(),
            span_cursor: 0,
            header_raw: [0u8; CommonHeader::LEN],
            bind_primary_raw: [0u8; bind::PRIMARY_LEN],
            bind_ack_primary_raw: [0u8; bind_ack::PRIMARY_LEN],
            ctx_count_raw: [0u8; bind_ack::CTX_COUNT_LEN],
            request_primary_raw: [0u8; request::PRIMARY_LEN],
            bind_item_raw: [0u8; bind::ITEM_LEN],
            bind_ack_item_raw: [0u8; bind_ack::ITEM_LEN],
            config,
        }
    }

    /// `frag_length` clamped to at least the header size, so a malformed PDU
    /// advertising a too-small fragment cannot make the "bytes remaining in
    /// this PDU" arithmetic underflow.
    fn effective_frag_length(&self) -> usize {
        (self.header.frag_length as usize).max(CommonHeader::LEN)
    }

    /// Feed `input` (bytes belonging to `direction` of this flow) into the
    /// parser. Returns the number of bytes consumed — always `input.len()`
    /// for this parser, since every phase either makes progress or, lacking
    /// enough bytes, waits for the next call: the parser always signals done
    /// for this slice after consuming what it can.
    pub fn ingest(&mut self, direction: Direction, input: &[u8]) -> Result<usize, ParseError> {
        trace!(?direction, len = input.len(), "dcerpc: ingest");
        let mut parsed = 0usize;

        while parsed < input.len() {
            let remaining = &input[parsed..];

            if self.bytes_processed < CommonHeader::LEN {
                let consumed = super::header::step(
                    &mut self.header_raw,
                    &mut self.bytes_processed,
                    &mut self.header,
                    remaining,
                );
                if consumed == 0 {
                    break;
                }
                parsed += consumed;
                if self.bytes_processed == CommonHeader::LEN {
                    self.enter_post_header_phase();
                }
                self.maybe_reset_for_next_pdu();
                continue;
            }

            let made_progress = match self.phase {
                Phase::Header(_) => unreachable!("header completion always transitions phase"),
                Phase::BindPrimary(_) => self.step_bind_primary(remaining, &mut parsed),
                Phase::BindItem(_) => self.step_bind_item(remaining, &mut parsed),
                Phase::BindAckPrimary(_) => self.step_bind_ack_primary(remaining, &mut parsed),
                Phase::SecAddr(_) => self.step_secondary_addr(remaining, &mut parsed),
                Phase::Pad(_) => self.step_pad(remaining, &mut parsed),
                Phase::CtxCount(_) => self.step_ctx_count(remaining, &mut parsed),
                Phase::BindAckItem(_) => self.step_bind_ack_item(remaining, &mut parsed),
                Phase::RequestPrimary(_) => self.step_request_primary(remaining, &mut parsed),
                Phase::Stub(_) => self.step_stub(remaining, &mut parsed),
                Phase::Idle(_) => self.step_idle(remaining, &mut parsed),
            };

            self.maybe_reset_for_next_pdu();

            if !made_progress {
                break;
            }
        }

        Ok(parsed)
    }

    fn enter_post_header_phase(&mut self) {
        self.span_cursor = 0;
        self.phase = match self.header.pdu_type() {
            PduType::Bind | PduType::AlterContext => Phase::BindPrimary(BindPrimaryPhase),
            PduType::BindAck | PduType::AlterContextResp => {
                Phase::BindAckPrimary(BindAckPrimaryPhase)
            },
            PduType::Request => Phase::RequestPrimary(RequestPrimaryPhase),
            PduType::Other(code) => {
                debug!(pdu_type = code, "dcerpc: unsupported PDU type, skipping");
                Phase::Idle(IdlePhase)
            },
        };
        trace!(phase = self.phase.name(), frag_length = self.header.frag_length, "dcerpc: header decoded");
    }

    /// If the current PDU is fully consumed, reset per-PDU scratch state.
    /// The header and interface list persist.
    fn maybe_reset_for_next_pdu(&mut self) {
        if self.bytes_processed < self.effective_frag_length() {
            return;
        }
        self.bytes_processed = 0;
        self.ctx_bytes_processed = 0;
        self.num_ctx_items = 0;
        self.num_ctx_items_left = 0;
        self.secondary_addr_len = 0;
        self.secondary_addr_len_left = 0;
        self.pad = 0;
        self.pad_left = 0;
        self.opnum = 0;
        self.stub_data.clear();
        self.span_cursor = 0;
        self.phase = Phase::Header(HeaderPhase);
    }

    fn step_bind_primary(&mut self, input: &[u8], parsed: &mut usize) -> bool {
        let consumed = bind::step_primary(
            &mut self.bind_primary_raw,
            &mut self.span_cursor,
            &mut self.num_ctx_items,
            input,
        );
        if consumed == 0 {
            return false;
        }
        self.bytes_processed += consumed;
        *parsed += consumed;
        if self.span_cursor == bind::PRIMARY_LEN {
            self.num_ctx_items_left = self.num_ctx_items;
            self.ctx_bytes_processed = 0;
            self.span_cursor = 0;
            self.phase = if self.num_ctx_items_left > 0 {
                Phase::BindItem(BindItemPhase)
            } else {
                Phase::Idle(IdlePhase)
            };
        }
        true
    }

    fn step_bind_item(&mut self, input: &[u8], parsed: &mut usize) -> bool {
        if self.num_ctx_items_left == 0 {
            self.phase = Phase::Idle(IdlePhase);
            return true;
        }
        let little = self.header.is_little_endian();
        let (consumed, maybe_record) =
            bind::step_item(&mut self.bind_item_raw, &mut self.ctx_bytes_processed, little, input);

        if consumed == 0 && maybe_record.is_none() {
            return false;
        }

        match maybe_record {
            None => {
                self.bytes_processed += consumed;
                *parsed += consumed;
            },
            Some(record) => {
                let ctx_id = record.ctx_id;
                if self.interfaces.push(record) {
                    self.bytes_processed += consumed;
                    *parsed += consumed;
                    self.num_ctx_items_left -= 1;
                    self.ctx_bytes_processed = 0;
                    if self.num_ctx_items_left == 0 {
                        self.phase = Phase::Idle(IdlePhase);
                    }
                } else {
                    debug!(ctx_id, "dcerpc: interface allocation failed, abandoning BIND");
                    self.num_ctx_items_left = 0;
                    self.ctx_bytes_processed = 0;
                    self.phase = Phase::Idle(IdlePhase);
                    // consumed bytes for the failed item are not counted,
                    // matching the original's SCReturnUInt(0).
                }
            },
        }
        true
    }

    fn step_bind_ack_primary(&mut self, input: &[u8], parsed: &mut usize) -> bool {
        let little = self.header.is_little_endian();
        let consumed = bind_ack::step_primary(
            &mut self.bind_ack_primary_raw,
            &mut self.span_cursor,
            little,
            &mut self.secondary_addr_len,
            input,
        );
        if consumed == 0 {
            return false;
        }
        self.bytes_processed += consumed;
        *parsed += consumed;
        if self.span_cursor == bind_ack::PRIMARY_LEN {
            if self.secondary_addr_len as usize > self.config.max_secondary_addr_len {
                debug!(
                    len = self.secondary_addr_len,
                    limit = self.config.max_secondary_addr_len,
                    "dcerpc: secondary address length exceeds configured anomaly threshold"
                );
            }
            self.secondary_addr_len_left = self.secondary_addr_len;
            self.span_cursor = 0;
            self.phase = Phase::SecAddr(SecAddrPhase);
        }
        true
    }

    fn step_secondary_addr(&mut self, input: &[u8], parsed: &mut usize) -> bool {
        let consumed = bind_ack::step_secondary_addr(&mut self.secondary_addr_len_left, input);
        self.bytes_processed += consumed;
        *parsed += consumed;
        if self.secondary_addr_len_left == 0 {
            let pad = (self.bytes_processed % 4) as u8;
            self.pad = pad;
            self.pad_left = pad as u16;
            self.span_cursor = 0;
            self.phase = if pad == 0 {
                Phase::CtxCount(CtxCountPhase)
            } else {
                Phase::Pad(PadPhase)
            };
            true
        } else {
            consumed > 0
        }
    }

    fn step_pad(&mut self, input: &[u8], parsed: &mut usize) -> bool {
        let mut pad_left_u8 = self.pad_left as u8;
        let consumed = bind_ack::step_pad(&mut pad_left_u8, input);
        self.pad_left = pad_left_u8 as u16;
        self.bytes_processed += consumed;
        *parsed += consumed;
        if self.pad_left == 0 {
            self.span_cursor = 0;
            self.phase = Phase::CtxCount(CtxCountPhase);
            true
        } else {
            consumed > 0
        }
    }

    fn step_ctx_count(&mut self, input: &[u8], parsed: &mut usize) -> bool {
        let consumed = bind_ack::step_ctx_count(
            &mut self.ctx_count_raw,
            &mut self.span_cursor,
            &mut self.num_ctx_items,
            input,
        );
        if consumed == 0 {
            return false;
        }
        self.bytes_processed += consumed;
        *parsed += consumed;
        if self.span_cursor == bind_ack::CTX_COUNT_LEN {
            self.num_ctx_items_left = self.num_ctx_items;
            self.ctx_bytes_processed = 0;
            self.span_cursor = 0;
            self.phase = if self.num_ctx_items_left > 0 {
                Phase::BindAckItem(BindAckItemPhase)
            } else {
                Phase::Idle(IdlePhase)
            };
        }
        true
    }

    fn step_bind_ack_item(&mut self, input: &[u8], parsed: &mut usize) -> bool {
        if self.num_ctx_items_left == 0 {
            self.phase = Phase::Idle(IdlePhase);
            return true;
        }
        let little = self.header.is_little_endian();
        let (consumed, maybe_result) = bind_ack::step_item(
            &mut self.bind_ack_item_raw,
            &mut self.ctx_bytes_processed,
            little,
            input,
        );
        if consumed == 0 && maybe_result.is_none() {
            return false;
        }
        self.bytes_processed += consumed;
        *parsed += consumed;
        if let Some(result) = maybe_result {
            let ordinal = (self.num_ctx_items - self.num_ctx_items_left) as u16;
            self.interfaces.patch_by_ctx_id(ordinal, result);
            self.num_ctx_items_left -= 1;
            self.ctx_bytes_processed = 0;
            if self.num_ctx_items_left == 0 {
                self.phase = Phase::Idle(IdlePhase);
            }
        }
        true
    }

    fn step_request_primary(&mut self, input: &[u8], parsed: &mut usize) -> bool {
        let little = self.header.is_little_endian();
        let consumed = request::step_primary(
            &mut self.request_primary_raw,
            &mut self.span_cursor,
            little,
            &mut self.opnum,
            input,
        );
        if consumed == 0 {
            return false;
        }
        self.bytes_processed += consumed;
        *parsed += consumed;
        if self.span_cursor == request::PRIMARY_LEN {
            let frag_len = self.effective_frag_length();
            self.pad_left = frag_len.saturating_sub(self.bytes_processed) as u16;
            self.span_cursor = 0;
            self.phase = Phase::Stub(StubPhase);
        }
        true
    }

    fn step_stub(&mut self, input: &[u8], parsed: &mut usize) -> bool {
        let consumed = request::step_stub(
            &mut self.pad_left,
            &mut self.stub_data,
            self.config.max_stub_capture_len,
            input,
        );
        self.bytes_processed += consumed;
        *parsed += consumed;
        if self.pad_left == 0 {
            self.phase = Phase::Idle(IdlePhase);
            true
        } else {
            consumed > 0
        }
    }

    fn step_idle(&mut self, input: &[u8], parsed: &mut usize) -> bool {
        let frag_len = self.effective_frag_length();
        let remaining_in_pdu = frag_len.saturating_sub(self.bytes_processed);
        let take = remaining_in_pdu.min(input.len());
        self.bytes_processed += take;
        *parsed += take;
        take > 0 || remaining_in_pdu == 0
    }
}
