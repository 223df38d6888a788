// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! A resumable, byte-addressed parser for the DCE/RPC connection-oriented
//! protocol as carried over TCP.
//!
//! The entry point is [`dcerpc::flow::FlowState`]: one instance per TCP flow,
//! fed incrementally via [`dcerpc::flow::FlowState::ingest`] with whatever
//! byte slices a TCP reassembly layer happens to hand over. Any byte of any
//! field may arrive in any slice; the parser resumes exactly where the
//! previous call left off.

/// Command-line / config-file plumbing for the inspection binary.
pub mod cfg;
/// The DCE/RPC state machine itself.
pub mod dcerpc;
/// Crate-wide error type.
pub mod error;
/// Stand-in for the reassembly-layer registration surface.
pub mod registration;
