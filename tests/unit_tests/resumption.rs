// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Resumption equivalence: any split of a well-formed PDU byte stream into
//! an ordered sequence of slices must parse to the same flow state as a
//! single-slice ingest.

use dcerpc_flow_parser::{cfg::config::Config, dcerpc::flow::FlowState, registration::Direction};
use proptest::prelude::*;

use crate::common::{bind_ack_pdu_le, bind_pdu_le};

fn arbitrary_splits(len: usize) -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(1..=len.max(1), 1..=len.max(1)).prop_map(move |mut cuts| {
        cuts.sort_unstable();
        cuts.dedup();
        let mut bounds = vec![0usize];
        bounds.extend(cuts.into_iter().filter(|&c| c < len));
        bounds.push(len);
        bounds.dedup();
        bounds.windows(2).map(|w| w[1] - w[0]).collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn bind_resumption_equivalence(n_items in 0u8..30, splits in (0usize..1).prop_flat_map(|_| arbitrary_splits(2000))) {
        let pdu = bind_pdu_le(n_items);

        let mut bulk = FlowState::new(Config::default());
        bulk.ingest(Direction::ToServer, &pdu).expect("bulk ingest");

        let mut incremental = FlowState::new(Config::default());
        let mut offset = 0usize;
        for len in splits {
            if offset >= pdu.len() {
                break;
            }
            let end = (offset + len).min(pdu.len());
            incremental
                .ingest(Direction::ToServer, &pdu[offset..end])
                .expect("incremental ingest");
            offset = end;
        }
        if offset < pdu.len() {
            incremental
                .ingest(Direction::ToServer, &pdu[offset..])
                .expect("incremental ingest tail");
        }

        prop_assert_eq!(bulk.interfaces.len(), incremental.interfaces.len());
        for (a, b) in bulk.interfaces.iter().zip(incremental.interfaces.iter()) {
            prop_assert_eq!(a, b);
        }
    }

    #[test]
    fn bind_ack_resumption_equivalence(n_items in 0u8..20) {
        let bind = bind_pdu_le(n_items);
        let secondary = b"\\PIPE\\lsass\0";
        let ack = bind_ack_pdu_le(secondary, n_items, 7);

        let mut bulk = FlowState::new(Config::default());
        bulk.ingest(Direction::ToServer, &bind).expect("bulk bind");
        bulk.ingest(Direction::ToClient, &ack).expect("bulk ack");

        let mut incremental = FlowState::new(Config::default());
        incremental.ingest(Direction::ToServer, &bind).expect("incremental bind");
        for byte in &ack {
            incremental
                .ingest(Direction::ToClient, std::slice::from_ref(byte))
                .expect("incremental ack");
        }

        prop_assert_eq!(bulk.interfaces.len(), incremental.interfaces.len());
        for (a, b) in bulk.interfaces.iter().zip(incremental.interfaces.iter()) {
            prop_assert_eq!(a, b);
        }
    }
}
