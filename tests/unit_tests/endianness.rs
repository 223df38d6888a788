// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Endianness parity: a little-endian PDU and its big-endian byte-swapped
//! twin must decode to identical extracted integer values.

use dcerpc_flow_parser::{cfg::config::Config, dcerpc::flow::FlowState, registration::Direction};
use proptest::prelude::*;

use crate::common::{bind_pdu_be, bind_pdu_le};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn bind_header_fields_match_across_endianness(n_items in 0u8..20) {
        let le = bind_pdu_le(n_items);
        let be = bind_pdu_be(n_items);

        let mut flow_le = FlowState::new(Config::default());
        flow_le.ingest(Direction::ToServer, &le).expect("le ingest");

        let mut flow_be = FlowState::new(Config::default());
        flow_be.ingest(Direction::ToServer, &be).expect("be ingest");

        prop_assert_eq!(flow_le.header.frag_length, flow_be.header.frag_length);
        prop_assert_eq!(flow_le.header.call_id, flow_be.header.call_id);
        prop_assert_eq!(flow_le.interfaces.len(), flow_be.interfaces.len());
        for (a, b) in flow_le.interfaces.iter().zip(flow_be.interfaces.iter()) {
            prop_assert_eq!(a.ctx_id, b.ctx_id);
            prop_assert_eq!(a.version, b.version);
            prop_assert_eq!(a.version_minor, b.version_minor);
        }
    }
}
