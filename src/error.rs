// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Error taxonomy for the DCE/RPC parser.
//!
//! None of these variants is ever raised out of [`crate::dcerpc::flow::FlowState::ingest`]
//! for a per-PDU condition — those are absorbed internally (the PDU is
//! abandoned, not the flow). `ParseError` exists for the one condition that
//! *is* the caller's fault: handing the parser a context it has no business
//! calling into.

use thiserror::Error;

/// Errors surfaced by the public parsing API.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The reassembly layer supplied a null/absent flow context. Mirrors the
    /// original's `if (dcerpc_state == NULL) { SCReturnInt(-1); }` guard; in
    /// safe Rust this can only happen across an FFI boundary, since an owned
    /// `&mut FlowState` cannot itself be null.
    #[error("parser invoked without a valid flow context")]
    NullContext,

    /// A sub-decoder could not allocate the resources needed to record an
    /// interface advertisement. The PDU is abandoned but the flow remains
    /// valid for subsequent PDUs.
    #[error("failed to allocate interface record for context id {ctx_id}")]
    InterfaceAllocationFailed {
        /// The context id of the item that could not be recorded.
        ctx_id: u16,
    },
}

/// Convenience alias used throughout the parser modules.
pub type Result<T> = std::result::Result<T, ParseError>;
