//! Property-based tests for the structural guarantees of the circuit rewrites
//! and the commutation dependency graph.

use lsqecc_ir::{Angle, DependencyGraph, NoApproximation, PauliBlock, PauliCircuit, PauliOperator};
use proptest::prelude::*;

fn arb_symbol() -> impl Strategy<Value = PauliOperator> {
    prop_oneof![
        Just(PauliOperator::I),
        Just(PauliOperator::X),
        Just(PauliOperator::Y),
        Just(PauliOperator::Z),
    ]
}

/// A rotation from the basic set or a measurement, over `num_qubits` qubits.
fn arb_block(num_qubits: usize) -> impl Strategy<Value = PauliBlock> {
    (
        prop::collection::vec(arb_symbol(), num_qubits),
        0_u8..7,
        prop::bool::ANY,
    )
        .prop_map(|(ops, kind, negative)| {
            let sign = if negative { -1 } else { 1 };
            match kind {
                0 => PauliBlock::measurement_from_ops(ops, negative),
                1 | 2 => PauliBlock::rotation_from_ops(ops, Angle::new(sign, 4)),
                3 | 4 => PauliBlock::rotation_from_ops(ops, Angle::new(sign, 8)),
                _ => PauliBlock::rotation_from_ops(ops, Angle::new(sign, 2)),
            }
        })
}

/// Generate circuits with:
/// - 1-5 qubits
/// - 0-20 blocks
/// - a trailing measurement, so the Litinski transform always applies
fn arb_circuit() -> impl Strategy<Value = PauliCircuit> {
    (1_usize..=5).prop_flat_map(|n| {
        (
            prop::collection::vec(arb_block(n), 0..=20),
            prop::collection::vec(arb_symbol(), n),
        )
            .prop_map(move |(mut blocks, ops)| {
                blocks.push(PauliBlock::measurement_from_ops(ops, false));
                PauliCircuit::from_blocks(n, blocks).unwrap()
            })
    })
}

fn arb_block_pair() -> impl Strategy<Value = (PauliBlock, PauliBlock)> {
    (1_usize..=6).prop_flat_map(|n| (arb_block(n), arb_block(n)))
}

proptest! {
    #[test]
    fn prop_commutation_is_symmetric((a, b) in arb_block_pair()) {
        prop_assert_eq!(a.commutes_with(&b).unwrap(), b.commutes_with(&a).unwrap());
        prop_assert!(a.commutes_with(&a).unwrap());
    }

    #[test]
    fn prop_litinski_invariants(circuit in arb_circuit()) {
        let mut transformed = circuit.clone();
        transformed.litinski_transform().unwrap();

        prop_assert!(transformed.iter().all(|b| !b.is_quarter_rotation()));
        prop_assert_eq!(transformed.count_measurements(), circuit.count_measurements());

        let once = transformed.clone();
        transformed.litinski_transform().unwrap();
        prop_assert_eq!(transformed, once);
    }

    #[test]
    fn prop_y_free_invariants(circuit in arb_circuit()) {
        let y_free = circuit.y_free_equivalent();
        prop_assert!(y_free.iter().all(|b| !b.contains_y()));
        prop_assert_eq!(y_free.count_measurements(), circuit.count_measurements());
        prop_assert_eq!(y_free.y_free_equivalent(), y_free);
    }

    #[test]
    fn prop_basic_form_is_stable(circuit in arb_circuit()) {
        // circuits built from the basic set are already in basic form
        prop_assert_eq!(circuit.basic_form(&NoApproximation).unwrap(), circuit);
    }

    #[test]
    fn prop_dependency_graph_is_sound(circuit in arb_circuit()) {
        let graph = DependencyGraph::from_circuit_by_commutation(&circuit);
        prop_assert_eq!(graph.num_nodes(), circuit.len());
        prop_assert!(graph.validate().is_ok());

        let edges = graph.generate_edge_list();
        prop_assert_eq!(edges.len(), graph.num_edges());
        for &(parent, child) in &edges {
            let later = *graph.node(parent).unwrap();
            let earlier = *graph.node(child).unwrap();
            prop_assert!(later > earlier);
            prop_assert!(!circuit.are_commuting(later, earlier).unwrap());

            // no edge is implied by a longer path
            let implied = graph
                .children(parent)
                .into_iter()
                .filter(|&other| other != child)
                .any(|other| graph.has_path(other, child));
            prop_assert!(!implied, "redundant edge {} -> {}", later, earlier);
        }
    }

    #[test]
    fn prop_dependency_graph_is_complete(circuit in arb_circuit()) {
        let graph = DependencyGraph::from_circuit_by_commutation(&circuit);
        let node_of = |block: usize| {
            graph
                .graph()
                .node_indices()
                .find(|&index| graph.node(index) == Some(&block))
                .unwrap()
        };
        for earlier in 0..circuit.len() {
            for later in earlier + 1..circuit.len() {
                if !circuit.are_commuting(earlier, later).unwrap() {
                    prop_assert!(graph.has_path(node_of(later), node_of(earlier)));
                }
            }
        }
    }

    #[test]
    fn prop_circuit_json_round_trip(circuit in arb_circuit()) {
        let json = serde_json::to_string(&circuit).unwrap();
        let restored: PauliCircuit = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(&restored, &circuit);

        for block in circuit.iter() {
            let json = serde_json::to_string(block).unwrap();
            let restored: PauliBlock = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(&restored, block);
        }
    }
}
