use crate::{
    decider::{
        relations::{Relation, RelationKind, SubrelationAccumulator},
        types::RelationParameters,
    },
    field_convert::{NUM_LIMB_BITS, NUM_MICRO_LIMB_BITS},
    flavor::{TranslatorAllValues, NUM_LIMB_RANGE_CONSTRAINTS},
    honk_curve::HonkCurve,
};
use ark_ff::{PrimeField, Zero};
use num_bigint::BigUint;

/// Microlimbs summed into a binary limb, the sixth column is the tail.
const NUM_MICRO_LIMBS: usize = NUM_LIMB_RANGE_CONSTRAINTS - 1;
/// Number of range constrained binary limbs.
const NUM_RANGE_CONSTRAINED_LIMBS: usize = 12;

pub struct TranslatorDecompositionRelation {}

impl TranslatorDecompositionRelation {
    pub const NUM_SUBRELATIONS: usize = 31;
    pub const SUBRELATION_PARTIAL_LENGTHS: [usize; Self::NUM_SUBRELATIONS] = [3; 31];
}

pub type TranslatorDecompositionRelationAcc<F> =
    SubrelationAccumulator<F, { TranslatorDecompositionRelation::NUM_SUBRELATIONS }>;

/// Sum of `micro[j] * 2^(14 j)`.
fn recompose<F: PrimeField>(micro: &[F]) -> F {
    let shift = F::from(1u64 << NUM_MICRO_LIMB_BITS);
    micro
        .iter()
        .rev()
        .fold(F::zero(), |acc, limb| acc * shift + limb)
}

impl<P: HonkCurve> Relation<P> for TranslatorDecompositionRelation {
    const KIND: RelationKind = RelationKind::TranslatorDecomposition;
    const SKIPPABLE: bool = true;
    type Row = TranslatorAllValues<P::ScalarField>;
    type Acc = TranslatorDecompositionRelationAcc<P::ScalarField>;

    fn skip(input: &Self::Row) -> bool {
        input.precomputed.lagrange_odd_in_minicircuit.is_zero()
            && input.precomputed.lagrange_even_in_minicircuit.is_zero()
    }

    /**
     * @brief Expression for the decomposition of the translator limbs.
     * @details On every row of the minicircuit:
     *  - each of the twelve range constrained binary limbs equals the sum of its five 14-bit microlimbs;
     *  - the tail microlimb equals the top microlimb shifted by 2 bits, so the top microlimb has 12 bits and the
     *    binary limb fits in 68 bits;
     *  - the relation carry equals the sum of its six microlimbs (84 bits).
     * On the odd rows of the minicircuit the wide values of the op queue transcript equal two binary limbs:
     *  - x_lo_y_hi = P.x limbs 0 and 1, x_hi_z_1 = P.x limbs 2 and 3, y_lo_z_2 = P.y limbs 0 and 1;
     *  - on the next row x_lo_y_hi = P.y limbs 2 and 3, x_hi_z_1 = z_1, y_lo_z_2 = z_2.
     *
     * @param evals transformed to `evals + C(in(X)...)*scaling_factor`
     * @param in the values of the current and the next row.
     * @param parameters unused.
     * @param scaling_factor optional term to scale the evaluation before adding to evals.
     */
    fn accumulate(
        univariate_accumulator: &mut Self::Acc,
        input: &Self::Row,
        _relation_parameters: &RelationParameters<P::ScalarField>,
        scaling_factor: &P::ScalarField,
    ) {
        tracing::trace!("Accumulate TranslatorDecompositionRelation");

        let witness = &input.witness;
        let shifted = &input.shifted;
        let lagrange_odd_by_scaling = input.precomputed.lagrange_odd_in_minicircuit * scaling_factor;
        let minicircuit_by_scaling =
            input.precomputed.lagrange_even_in_minicircuit * scaling_factor + lagrange_odd_by_scaling;

        let limb_shift = P::ScalarField::from(BigUint::from(1u64) << NUM_LIMB_BITS);
        let tail_shift =
            P::ScalarField::from(1u64 << (NUM_MICRO_LIMB_BITS * NUM_MICRO_LIMBS - NUM_LIMB_BITS));

        for (i, (limb, micro)) in witness.limb_range_constraints().into_iter().enumerate() {
            // Contribution (1): binary limb from microlimbs
            let tmp = (recompose(&micro[..NUM_MICRO_LIMBS]) - limb) * minicircuit_by_scaling;
            univariate_accumulator[i] += tmp;

            // Contribution (2): tail of the top microlimb
            let tmp = (micro[NUM_MICRO_LIMBS - 1] * tail_shift - micro[NUM_MICRO_LIMBS])
                * minicircuit_by_scaling;
            univariate_accumulator[NUM_RANGE_CONSTRAINED_LIMBS + i] += tmp;
        }

        // Contribution (3): relation carry from microlimbs
        let tmp = (recompose(&witness.relation_wide_limbs_range_constraint)
            - witness.relation_wide_limbs)
            * minicircuit_by_scaling;
        univariate_accumulator[2 * NUM_RANGE_CONSTRAINED_LIMBS] += tmp;

        // Contribution (4): wide values of the transcript from binary limbs
        let wide_values = [
            (
                witness.x_lo_y_hi,
                witness.p_x_low_limbs,
                shifted.p_x_low_limbs,
            ),
            (
                witness.x_hi_z_1,
                witness.p_x_high_limbs,
                shifted.p_x_high_limbs,
            ),
            (
                witness.y_lo_z_2,
                witness.p_y_low_limbs,
                shifted.p_y_low_limbs,
            ),
            (
                shifted.x_lo_y_hi,
                witness.p_y_high_limbs,
                shifted.p_y_high_limbs,
            ),
            (shifted.x_hi_z_1, witness.z_low_limbs, witness.z_high_limbs),
            (shifted.y_lo_z_2, shifted.z_low_limbs, shifted.z_high_limbs),
        ];
        for (i, (wide, low, high)) in wide_values.into_iter().enumerate() {
            let tmp = (high * limb_shift + low - wide) * lagrange_odd_by_scaling;
            univariate_accumulator[2 * NUM_RANGE_CONSTRAINED_LIMBS + 1 + i] += tmp;
        }
    }
}
