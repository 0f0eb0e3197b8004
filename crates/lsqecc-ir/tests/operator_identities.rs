//! Dense-matrix checks that the circuit rewrites preserve the operators they
//! act on.
//!
//! Circuits here are small (at most four qubits), so every block is expanded
//! into a full `2^n x 2^n` matrix and compared numerically.

use lsqecc_ir::{Angle, BlockKind, NoApproximation, PauliBlock, PauliCircuit, PauliOperator};
use num_complex::Complex64;
use proptest::prelude::*;

const EPS: f64 = 1e-9;

// ============================================================================
// Dense matrix helpers
// ============================================================================

#[derive(Debug, Clone)]
struct Matrix {
    dim: usize,
    data: Vec<Complex64>,
}

impl Matrix {
    fn identity(dim: usize) -> Self {
        let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];
        for i in 0..dim {
            data[i * dim + i] = Complex64::new(1.0, 0.0);
        }
        Self { dim, data }
    }

    fn pauli(op: PauliOperator) -> Self {
        let z = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        let data = match op {
            PauliOperator::I => vec![one, z, z, one],
            PauliOperator::X => vec![z, one, one, z],
            PauliOperator::Y => vec![z, -i, i, z],
            PauliOperator::Z => vec![one, z, z, -one],
        };
        Self { dim: 2, data }
    }

    fn at(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.dim + col]
    }

    fn kron(&self, other: &Matrix) -> Matrix {
        let dim = self.dim * other.dim;
        let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];
        for r1 in 0..self.dim {
            for c1 in 0..self.dim {
                for r2 in 0..other.dim {
                    for c2 in 0..other.dim {
                        data[(r1 * other.dim + r2) * dim + c1 * other.dim + c2] =
                            self.at(r1, c1) * other.at(r2, c2);
                    }
                }
            }
        }
        Matrix { dim, data }
    }

    fn mul(&self, other: &Matrix) -> Matrix {
        let dim = self.dim;
        let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];
        for r in 0..dim {
            for c in 0..dim {
                data[r * dim + c] = (0..dim).map(|k| self.at(r, k) * other.at(k, c)).sum();
            }
        }
        Matrix { dim, data }
    }

    fn dagger(&self) -> Matrix {
        let dim = self.dim;
        let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];
        for r in 0..dim {
            for c in 0..dim {
                data[r * dim + c] = self.at(c, r).conj();
            }
        }
        Matrix { dim, data }
    }

    fn scale(&self, factor: Complex64) -> Matrix {
        Matrix {
            dim: self.dim,
            data: self.data.iter().map(|v| v * factor).collect(),
        }
    }

    fn add(&self, other: &Matrix) -> Matrix {
        Matrix {
            dim: self.dim,
            data: self.data.iter().zip(&other.data).map(|(a, b)| a + b).collect(),
        }
    }

    fn approx_eq(&self, other: &Matrix) -> bool {
        self.data
            .iter()
            .zip(&other.data)
            .all(|(a, b)| (a - b).norm() < EPS)
    }

    fn approx_eq_up_to_phase(&self, other: &Matrix) -> bool {
        let Some(pivot) = self.data.iter().position(|v| v.norm() > EPS) else {
            return other.data.iter().all(|v| v.norm() < EPS);
        };
        let phase = other.data[pivot] / self.data[pivot];
        (phase.norm() - 1.0).abs() < EPS && self.scale(phase).approx_eq(other)
    }
}

fn product_matrix(ops: &[PauliOperator]) -> Matrix {
    ops.iter()
        .fold(Matrix::identity(1), |acc, op| acc.kron(&Matrix::pauli(*op)))
}

/// exp(-i·aπ·P) for a rotation block.
fn rotation_unitary(block: &PauliBlock) -> Matrix {
    let BlockKind::Rotation(angle) = block.kind() else {
        panic!("not a rotation: {block}");
    };
    let theta = std::f64::consts::PI * angle.numer() as f64 / angle.denom() as f64;
    let p = product_matrix(block.ops());
    Matrix::identity(p.dim)
        .scale(Complex64::new(theta.cos(), 0.0))
        .add(&p.scale(Complex64::new(0.0, -theta.sin())))
}

/// Unitary of a list of rotations applied in order.
fn sequence_unitary(blocks: &[PauliBlock], num_qubits: usize) -> Matrix {
    blocks.iter().fold(Matrix::identity(1 << num_qubits), |acc, block| {
        rotation_unitary(block).mul(&acc)
    })
}

/// Signed observable of a measurement block.
fn observable(block: &PauliBlock) -> Matrix {
    let sign = if block.is_negative() { -1.0 } else { 1.0 };
    product_matrix(block.ops()).scale(Complex64::new(sign, 0.0))
}

/// Heisenberg-picture observable of a circuit ending in one measurement.
fn measured_observable(circuit: &PauliCircuit) -> Matrix {
    let (last, rotations) = circuit.blocks().split_last().unwrap();
    let u = sequence_unitary(rotations, circuit.num_qubits());
    u.dagger().mul(&observable(last)).mul(&u)
}

fn rot(ops: &str, numer: i64, denom: i64) -> PauliBlock {
    PauliBlock::parse_rotation(ops, Angle::new(numer, denom)).unwrap()
}

// ============================================================================
// Y-free normalization
// ============================================================================

#[test]
fn test_y_free_rotation_is_exact() {
    let cases = [
        ("Y", 1, 8),
        ("YZ", -1, 8),
        ("YY", 1, 8),
        ("YIY", 1, 2),
        ("YYY", -1, 4),
        ("XYZY", 1, 8),
        ("YYYY", 1, 8),
    ];
    for (ops, numer, denom) in cases {
        let block = rot(ops, numer, denom);
        let n = block.num_qubits();
        let rewritten = block.y_free_equivalent();
        assert!(rewritten.iter().all(|b| !b.contains_y()), "{ops}");
        assert!(
            sequence_unitary(&rewritten, n).approx_eq(&rotation_unitary(&block)),
            "y-free rewrite of {block} changed the unitary"
        );
    }
}

#[test]
fn test_y_free_correction_count() {
    for (ops, expected) in [("Y", 2), ("YY", 4), ("YYY", 2), ("YIYY", 2), ("YYIYY", 4), ("XZ", 0)] {
        let corrections = rot(ops, 1, 8).y_free_equivalent().len() - 1;
        assert_eq!(corrections, expected, "{ops}");
    }
}

#[test]
fn test_y_free_measurement_observable() {
    for (ops, negative) in [("YZ", false), ("YY", true), ("ZYX", true)] {
        let block = PauliBlock::parse_measurement(ops, negative).unwrap();
        let n = block.num_qubits();
        let rewritten = block.y_free_equivalent();
        let center = rewritten.iter().position(PauliBlock::is_measurement).unwrap();
        let after = sequence_unitary(&rewritten[center + 1..], n);
        let before = sequence_unitary(&rewritten[..center], n);
        // measuring M'' between V† and V measures V·M''·V†
        let effective = after.mul(&observable(&rewritten[center])).mul(&after.dagger());
        assert!(effective.approx_eq(&observable(&block)), "{ops}");
        assert!(after.mul(&before).approx_eq(&Matrix::identity(1 << n)));
    }
}

// ============================================================================
// Basic form
// ============================================================================

#[test]
fn test_basic_form_matches_up_to_global_phase() {
    for denom in [1, 2, 4, 8] {
        for numer in -17..=17 {
            let block = rot("XZ", numer, denom);
            let blocks = block.basic_form(&NoApproximation).unwrap();
            assert!(
                blocks.iter().all(|b| b.angle().unwrap().is_basic()),
                "{block}"
            );
            assert!(
                sequence_unitary(&blocks, 2).approx_eq_up_to_phase(&rotation_unitary(&block)),
                "basic form of {block} changed the unitary"
            );
        }
    }
}

// ============================================================================
// Litinski transform
// ============================================================================

#[test]
fn test_swap_step_is_exact() {
    let quarters = ["ZI", "XZ", "YY"];
    let others = ["XI", "ZZ", "IY", "XX"];
    for p in quarters {
        for q in others {
            for sign in [1, -1] {
                let circuit =
                    PauliCircuit::from_blocks(2, vec![rot(p, sign, 4), rot(q, 1, 8)]).unwrap();
                let mut swapped = circuit.clone();
                swapped.swap_adjacent_blocks(0).unwrap();
                assert!(
                    sequence_unitary(swapped.blocks(), 2)
                        .approx_eq(&sequence_unitary(circuit.blocks(), 2)),
                    "swap of {p}({sign}/4) past {q}"
                );
            }
        }
    }
}

fn arb_symbol() -> impl Strategy<Value = PauliOperator> {
    prop_oneof![
        Just(PauliOperator::I),
        Just(PauliOperator::X),
        Just(PauliOperator::Y),
        Just(PauliOperator::Z),
    ]
}

fn arb_rotation(num_qubits: usize) -> impl Strategy<Value = PauliBlock> {
    (
        prop::collection::vec(arb_symbol(), num_qubits),
        prop_oneof![Just(2_i64), Just(4), Just(8)],
        prop::bool::ANY,
    )
        .prop_map(|(ops, denom, negative)| {
            let numer = if negative { -1 } else { 1 };
            PauliBlock::rotation_from_ops(ops, Angle::new(numer, denom))
        })
}

fn arb_measured_circuit() -> impl Strategy<Value = PauliCircuit> {
    (1_usize..=3).prop_flat_map(|n| {
        (
            prop::collection::vec(arb_rotation(n), 0..=6),
            prop::collection::vec(arb_symbol(), n),
            prop::bool::ANY,
        )
            .prop_map(move |(mut blocks, ops, negative)| {
                blocks.push(PauliBlock::measurement_from_ops(ops, negative));
                PauliCircuit::from_blocks(n, blocks).unwrap()
            })
    })
}

proptest! {
    #[test]
    fn prop_litinski_preserves_measured_observable(circuit in arb_measured_circuit()) {
        let mut transformed = circuit.clone();
        transformed.litinski_transform().unwrap();
        prop_assert!(
            measured_observable(&transformed).approx_eq(&measured_observable(&circuit)),
            "observable changed:\n{}\n{}", circuit, transformed
        );
    }

    #[test]
    fn prop_y_free_preserves_measured_observable(circuit in arb_measured_circuit()) {
        let y_free = circuit.y_free_equivalent();
        // the trailing corrections after the measurement do not affect its statistics
        let end = y_free.iter().position(PauliBlock::is_measurement).unwrap();
        let truncated = PauliCircuit::from_blocks(
            circuit.num_qubits(),
            y_free.blocks()[..=end].to_vec(),
        ).unwrap();
        prop_assert!(measured_observable(&truncated).approx_eq(&measured_observable(&circuit)));
    }
}
