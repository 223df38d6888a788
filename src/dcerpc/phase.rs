// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The tagged state variant `FlowState` resumes across `ingest()` calls by
//! remembering which [`Phase`] it is in. Naming is dispatched through
//! `enum_dispatch`, mirroring an opcode-enum/trait pairing; the actual
//! byte-stepping logic lives in [`super::flow::FlowState::ingest`], since it
//! threads mutable flow state through nested loops (item iteration, pad
//! consumption) that do not fit a single self-consuming `step` call per
//! phase.

use enum_dispatch::enum_dispatch;

/// Gives each phase marker a stable name for tracing/diagnostics.
#[enum_dispatch]
pub(crate) trait PhaseInfo {
    fn name(&self) -> &'static str;
}

macro_rules! phase_marker {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub(crate) struct $name;

        impl PhaseInfo for $name {
            fn name(&self) -> &'static str {
                $label
            }
        }
    };
}

phase_marker!(HeaderPhase, "header");
phase_marker!(BindPrimaryPhase, "bind_primary");
phase_marker!(BindItemPhase, "bind_item");
phase_marker!(BindAckPrimaryPhase, "bind_ack_primary");
phase_marker!(SecAddrPhase, "secondary_address");
phase_marker!(PadPhase, "pad");
phase_marker!(CtxCountPhase, "ctx_count");
phase_marker!(BindAckItemPhase, "bind_ack_item");
phase_marker!(RequestPrimaryPhase, "request_primary");
phase_marker!(StubPhase, "stub");
phase_marker!(IdlePhase, "idle");

/// Tagged state variant advanced by `FlowState::ingest`. See module docs.
#[enum_dispatch(PhaseInfo)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Header(HeaderPhase),
    BindPrimary(BindPrimaryPhase),
    BindItem(BindItemPhase),
    BindAckPrimary(BindAckPrimaryPhase),
    SecAddr(SecAddrPhase),
    Pad(PadPhase),
    CtxCount(CtxCountPhase),
    BindAckItem(BindAckItemPhase),
    RequestPrimary(RequestPrimaryPhase),
    Stub(StubPhase),
    Idle(IdlePhase),
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Header(HeaderPhase)
    }
}
