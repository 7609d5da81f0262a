use super::{Relation, RelationKind, SubrelationAccumulator};
use crate::{decider::types::RelationParameters, flavor::UltraAllValues, honk_curve::HonkCurve};
use ark_ff::{Field, PrimeField, Zero};

pub struct GenPermSortRelation {}

impl GenPermSortRelation {
    pub const NUM_SUBRELATIONS: usize = 4;
    pub const SUBRELATION_PARTIAL_LENGTHS: [usize; Self::NUM_SUBRELATIONS] = [6, 6, 6, 6];
}

pub type GenPermSortRelationAcc<F> =
    SubrelationAccumulator<F, { GenPermSortRelation::NUM_SUBRELATIONS }>;

/// D(D - 1)(D - 2)(D - 3), zero iff the step `delta` is in {0, 1, 2, 3}.
#[inline]
pub(crate) fn delta_range_identity<F: PrimeField>(delta: F) -> F {
    let minus_one = -F::one();
    let minus_two = -F::from(2u64);
    // (D - 1)^2 - 1 = D(D - 2) and (D - 2)^2 - 1 = (D - 1)(D - 3)
    let mut tmp = (delta + minus_one).square() + minus_one;
    tmp *= (delta + minus_two).square() + minus_one;
    tmp
}

impl<P: HonkCurve> Relation<P> for GenPermSortRelation {
    const KIND: RelationKind = RelationKind::GenPermSort;
    const SKIPPABLE: bool = true;
    type Row = UltraAllValues<P::ScalarField>;
    type Acc = GenPermSortRelationAcc<P::ScalarField>;

    fn skip(input: &Self::Row) -> bool {
        input.precomputed.q_sort.is_zero()
    }

    /**
     * @brief Expression for the generalized permutation sort gate.
     * @details The relation is defined as C(in(X)...) =
     *    q_sort * \sum{ i = [0, 3]} \alpha^i D_i(D_i - 1)(D_i - 2)(D_i - 3)
     *      where
     *      D_0 = w_2 - w_1
     *      D_1 = w_3 - w_2
     *      D_2 = w_4 - w_3
     *      D_3 = w_1_shift - w_4
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
        tracing::trace!("Accumulate GenPermSortRelation");

        let w_1 = &input.witness.w_l;
        let w_2 = &input.witness.w_r;
        let w_3 = &input.witness.w_o;
        let w_4 = &input.witness.w_4;
        let w_1_shift = &input.shifted.w_l;
        let q_sort_by_scaling = input.precomputed.q_sort * scaling_factor;

        // Compute wire differences
        let deltas = [
            w_2.to_owned() - w_1,
            w_3.to_owned() - w_2,
            w_4.to_owned() - w_3,
            w_1_shift.to_owned() - w_4,
        ];

        for (i, delta) in deltas.into_iter().enumerate() {
            univariate_accumulator[i] += delta_range_identity(delta) * q_sort_by_scaling;
        }
    }
}
