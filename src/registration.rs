// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Stand-in for the reassembly-layer registration surface.
//!
//! The real `register()` call installs this parser under a protocol
//! identifier with a TCP reassembly/IDS engine that lives outside this
//! crate. That engine is an external collaborator we do not implement; this
//! module only names the identifier and direction pair a real registration
//! call would use, so that embedding code has one place to look it up.

/// Protocol identifier this parser would be registered under.
pub const PROTOCOL_NAME: &str = "dcerpc";

/// Directions the reassembly layer is expected to invoke the parser with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Client-to-server bytes (BIND, ALTER_CONTEXT, REQUEST).
    ToServer,
    /// Server-to-client bytes (BIND_ACK, ALTER_CONTEXT_RESP).
    ToClient,
}

/// Human-readable description of what a real registration call would wire
/// up. Exists so embedding code has something to log; it performs no
/// registration itself.
pub fn describe() -> String {
    format!(
        "{PROTOCOL_NAME}: bidirectional, resumable, no transaction \
         correlation, stub bodies exposed unparsed"
    )
}
