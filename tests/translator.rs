mod common;

use ark_bn254::{Bn254, Fq, Fr};
use ark_ff::{One, UniformRand};
use common::{init_tracing, rng};
use honk_relations::{
    accumulate_relation_evaluations, check_degree_bounds, compute_grand_product,
    decider::relations::TranslatorPermutationRelation,
    flavor::{TranslatorProverPolynomials, TranslatorRelationAcc},
    RelationAccumulators, RelationKind, RelationParameters, TranslatorCircuitBuilder,
    TranslatorFlavor,
};

const CIRCUIT_SIZE: usize = 1 << 15;
const MINI_CIRCUIT_SIZE: usize = CIRCUIT_SIZE / 32;
const OPS: [u64; 5] = [3, 4, 8, 1, 3];

fn first_rows(
    polys: &TranslatorProverPolynomials<Fr>,
    params: &RelationParameters<Fr>,
) -> TranslatorRelationAcc<Fr> {
    accumulate_relation_evaluations::<Bn254, TranslatorFlavor>(polys, 0..64, params, &Fr::one())
        .unwrap()
}

#[test]
fn built_trace_and_its_perturbations() {
    init_tracing();
    let mut rng = rng(31);
    let mut builder = TranslatorCircuitBuilder::<Bn254>::new(Fq::rand(&mut rng), Fq::rand(&mut rng));
    for (i, op) in OPS.into_iter().enumerate() {
        builder.queue_operation(
            op,
            Fq::rand(&mut rng),
            Fq::rand(&mut rng),
            u128::MAX >> i,
            (1u128 << 100) + i as u128,
        );
    }
    let mut polys = builder.build(CIRCUIT_SIZE).unwrap();
    let mut params = RelationParameters::<Fr>::get_random(&mut rng);
    params.set_translator_challenges(
        builder.evaluation_input_x(),
        builder.batching_challenge_v(),
        builder.accumulated_result(),
    );
    polys.witness.z_perm =
        compute_grand_product::<Bn254, TranslatorFlavor, TranslatorPermutationRelation>(
            &polys, &params,
        )
        .unwrap()
        .z;

    let acc = accumulate_relation_evaluations::<Bn254, TranslatorFlavor>(
        &polys,
        0..CIRCUIT_SIZE,
        &params,
        &Fr::one(),
    )
    .unwrap();
    assert_eq!(acc.evaluations().len(), 6);
    assert!(acc.is_zero());

    // an opcode outside {0, 1, 2, 3, 4, 8}
    let op = polys.witness.op[1];
    polys.witness.op[1] = Fr::from(5u64);
    assert!(!first_rows(&polys, &params).r_opcode.is_zero());
    polys.witness.op[1] = op;

    // a microlimb that no longer sums up to its limb
    let micro_limb = polys.witness.p_x_low_limbs_range_constraint[0][1];
    polys.witness.p_x_low_limbs_range_constraint[0][1] += Fr::one();
    assert!(!first_rows(&polys, &params).r_decomposition.is_zero());
    polys.witness.p_x_low_limbs_range_constraint[0][1] = micro_limb;

    // the claimed result differs from the computed accumulator
    let mut wrong = params.clone();
    wrong.set_translator_challenges(
        builder.evaluation_input_x(),
        builder.batching_challenge_v(),
        builder.accumulated_result() + Fq::one(),
    );
    let acc = first_rows(&polys, &wrong);
    assert!(!acc.r_accumulator_transfer.is_zero());
    assert!(acc.r_non_native_field.is_zero());

    polys.witness.z_perm[3] += Fr::one();
    let acc = first_rows(&polys, &params);
    assert!(!acc.r_permutation.is_zero());
    assert!(acc.r_gen_perm_sort.is_zero());
    polys.witness.z_perm[3] -= Fr::one();

    let last_op_row = 2 * OPS.len();
    for edge in [0, 2, last_op_row - 1, last_op_row, MINI_CIRCUIT_SIZE - 2, CIRCUIT_SIZE - 2] {
        let degrees = check_degree_bounds::<Bn254, TranslatorFlavor>(&polys, edge, &params).unwrap();
        assert_eq!(degrees[0].0, RelationKind::TranslatorDecomposition);
        assert_eq!(degrees.len(), 6);
    }
}
