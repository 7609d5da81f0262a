use crate::{
    decider::{
        relations::{Relation, RelationKind, SubrelationAccumulator},
        types::RelationParameters,
    },
    field_convert::NUM_BINARY_LIMBS,
    flavor::TranslatorAllValues,
    honk_curve::HonkCurve,
};
use ark_ff::Zero;

pub struct TranslatorAccumulatorTransferRelation {}

impl TranslatorAccumulatorTransferRelation {
    pub const NUM_SUBRELATIONS: usize = 12;
    pub const SUBRELATION_PARTIAL_LENGTHS: [usize; Self::NUM_SUBRELATIONS] = [3; 12];
}

pub type TranslatorAccumulatorTransferRelationAcc<F> =
    SubrelationAccumulator<F, { TranslatorAccumulatorTransferRelation::NUM_SUBRELATIONS }>;

impl<P: HonkCurve> Relation<P> for TranslatorAccumulatorTransferRelation {
    const KIND: RelationKind = RelationKind::TranslatorAccumulatorTransfer;
    const SKIPPABLE: bool = true;
    type Row = TranslatorAllValues<P::ScalarField>;
    type Acc = TranslatorAccumulatorTransferRelationAcc<P::ScalarField>;

    fn skip(input: &Self::Row) -> bool {
        let precomputed = &input.precomputed;
        (precomputed.lagrange_even_in_minicircuit
            + precomputed.lagrange_second
            + precomputed.lagrange_last_in_minicircuit)
            .is_zero()
    }

    /**
     * @brief Expression for the transfer of the accumulator between operations.
     * @details Every operation occupies an odd row holding the new accumulator and the even row after it
     * holding the previous one. For every binary limb i:
     *  1. (acc_i - acc_i_shift) * lagrange_even = 0, the previous accumulator of an operation is the current one
     *     of the next operation;
     *  2. acc_i * lagrange_last_in_minicircuit = 0, accumulation starts from zero;
     *  3. (acc_i - accumulated_result_i) * lagrange_second = 0, the final accumulator is the claimed result.
     */
    fn accumulate(
        univariate_accumulator: &mut Self::Acc,
        input: &Self::Row,
        relation_parameters: &RelationParameters<P::ScalarField>,
        scaling_factor: &P::ScalarField,
    ) {
        tracing::trace!("Accumulate TranslatorAccumulatorTransferRelation");

        let lagrange_even_by_scaling = input.precomputed.lagrange_even_in_minicircuit * scaling_factor;
        let lagrange_last_by_scaling = input.precomputed.lagrange_last_in_minicircuit * scaling_factor;
        let lagrange_second_by_scaling = input.precomputed.lagrange_second * scaling_factor;

        let accumulators = &input.witness.accumulators_binary_limbs;
        let accumulators_shift = &input.shifted.accumulators_binary_limbs;

        for i in 0..NUM_BINARY_LIMBS {
            // Contribution (1): transfer between operations
            let tmp = (accumulators[i] - accumulators_shift[i]) * lagrange_even_by_scaling;
            univariate_accumulator[i] += tmp;

            // Contribution (2): starting value
            let tmp = accumulators[i] * lagrange_last_by_scaling;
            univariate_accumulator[NUM_BINARY_LIMBS + i] += tmp;

            // Contribution (3): claimed result
            let tmp = (accumulators[i] - relation_parameters.accumulated_result[i])
                * lagrange_second_by_scaling;
            univariate_accumulator[2 * NUM_BINARY_LIMBS + i] += tmp;
        }
    }
}
