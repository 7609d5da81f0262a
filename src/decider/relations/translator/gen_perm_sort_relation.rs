use crate::{
    decider::{
        relations::{
            gen_perm_sort_relation::delta_range_identity, Relation, RelationKind,
            SubrelationAccumulator,
        },
        types::RelationParameters,
    },
    flavor::{TranslatorAllValues, MAX_MICRO_LIMB, NUM_ORDERED},
    honk_curve::HonkCurve,
};
use ark_ff::One;

pub struct TranslatorGenPermSortRelation {}

impl TranslatorGenPermSortRelation {
    pub const NUM_SUBRELATIONS: usize = 10;
    pub const SUBRELATION_PARTIAL_LENGTHS: [usize; Self::NUM_SUBRELATIONS] =
        [6, 6, 6, 6, 6, 3, 3, 3, 3, 3];
}

pub type TranslatorGenPermSortRelationAcc<F> =
    SubrelationAccumulator<F, { TranslatorGenPermSortRelation::NUM_SUBRELATIONS }>;

impl<P: HonkCurve> Relation<P> for TranslatorGenPermSortRelation {
    const KIND: RelationKind = RelationKind::TranslatorGenPermSort;
    const SKIPPABLE: bool = false;
    type Row = TranslatorAllValues<P::ScalarField>;
    type Acc = TranslatorGenPermSortRelationAcc<P::ScalarField>;

    fn skip(_input: &Self::Row) -> bool {
        false
    }

    /**
     * @brief Expression for the sorted range constraint columns.
     * @details For every ordered column o_j:
     *  1. D(D - 1)(D - 2)(D - 3) * (1 - lagrange_last) = 0 with D = o_j_shift - o_j, consecutive values rise by
     *     at most 3;
     *  2. (o_j - (2^14 - 1)) * lagrange_last = 0, the column ends at the largest microlimb.
     * Together with the step sequence inserted by the permutation every value lies in [0, 2^14).
     */
    fn accumulate(
        univariate_accumulator: &mut Self::Acc,
        input: &Self::Row,
        _relation_parameters: &RelationParameters<P::ScalarField>,
        scaling_factor: &P::ScalarField,
    ) {
        tracing::trace!("Accumulate TranslatorGenPermSortRelation");

        let lagrange_last = input.precomputed.lagrange_last;
        let not_last_by_scaling = (P::ScalarField::one() - lagrange_last) * scaling_factor;
        let lagrange_last_by_scaling = lagrange_last * scaling_factor;
        let maximum_sort_value = P::ScalarField::from(MAX_MICRO_LIMB);

        let ordered = &input.witness.ordered_range_constraints;
        let ordered_shift = &input.shifted.ordered_range_constraints;

        for j in 0..NUM_ORDERED {
            // Contribution (1)
            let delta = ordered_shift[j] - ordered[j];
            univariate_accumulator[j] += delta_range_identity(delta) * not_last_by_scaling;

            // Contribution (2)
            let tmp = (ordered[j] - maximum_sort_value) * lagrange_last_by_scaling;
            univariate_accumulator[NUM_ORDERED + j] += tmp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Bn254, Fr};
    use ark_ff::Zero;

    fn accumulate(row: &TranslatorAllValues<Fr>) -> TranslatorGenPermSortRelationAcc<Fr> {
        let mut acc = TranslatorGenPermSortRelationAcc::default();
        <TranslatorGenPermSortRelation as Relation<Bn254>>::accumulate(
            &mut acc,
            row,
            &RelationParameters::default(),
            &Fr::one(),
        );
        acc
    }

    #[test]
    fn ordered_columns_step_by_at_most_three() {
        let mut row = TranslatorAllValues::<Fr>::default();
        row.witness.ordered_range_constraints = [0u64, 10, 20, 30, 40].map(Fr::from);
        row.shifted.ordered_range_constraints = [0u64, 11, 22, 33, 43].map(Fr::from);
        assert!(accumulate(&row).is_zero());

        row.shifted.ordered_range_constraints[4] = Fr::from(44u64);
        let acc = accumulate(&row);
        assert_eq!(acc[4], Fr::from(24u64));
        assert!(acc[9].is_zero());
    }

    #[test]
    fn last_row_holds_the_maximum() {
        let mut row = TranslatorAllValues::<Fr>::default();
        row.precomputed.lagrange_last = Fr::one();
        row.witness.ordered_range_constraints = [MAX_MICRO_LIMB; NUM_ORDERED].map(Fr::from);
        // the shift past the end is zero, the step check is off on the last row
        assert!(accumulate(&row).is_zero());

        row.witness.ordered_range_constraints[1] = Fr::from(MAX_MICRO_LIMB - 1);
        let acc = accumulate(&row);
        assert_eq!(acc[NUM_ORDERED + 1], -Fr::one());
    }
}
