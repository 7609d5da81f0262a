use crate::{
    decider::{
        grand_product::GrandProductRelation,
        relations::{Relation, RelationKind, SubrelationAccumulator},
        types::RelationParameters,
    },
    flavor::TranslatorAllValues,
    honk_curve::HonkCurve,
};

pub struct TranslatorPermutationRelation {}

impl TranslatorPermutationRelation {
    pub const NUM_SUBRELATIONS: usize = 2;
    pub const SUBRELATION_PARTIAL_LENGTHS: [usize; Self::NUM_SUBRELATIONS] = [7, 3];
}

pub type TranslatorPermutationRelationAcc<F> =
    SubrelationAccumulator<F, { TranslatorPermutationRelation::NUM_SUBRELATIONS }>;

impl<P: HonkCurve> GrandProductRelation<P> for TranslatorPermutationRelation {
    fn compute_grand_product_numerator(
        input: &Self::Row,
        relation_parameters: &RelationParameters<P::ScalarField>,
    ) -> P::ScalarField {
        let gamma = &relation_parameters.gamma;
        let concatenated = &input.witness.concatenated_range_constraints;
        let extra = &input.precomputed.ordered_extra_range_constraints_numerator;

        concatenated
            .iter()
            .fold(extra.to_owned() + gamma, |acc, value| acc * (value.to_owned() + gamma))
    }

    fn compute_grand_product_denominator(
        input: &Self::Row,
        relation_parameters: &RelationParameters<P::ScalarField>,
    ) -> P::ScalarField {
        let gamma = &relation_parameters.gamma;
        let ordered = &input.witness.ordered_range_constraints;

        ordered
            .iter()
            .skip(1)
            .fold(ordered[0] + gamma, |acc, value| acc * (value.to_owned() + gamma))
    }
}

impl<P: HonkCurve> Relation<P> for TranslatorPermutationRelation {
    const KIND: RelationKind = RelationKind::TranslatorPermutation;
    const SKIPPABLE: bool = false;
    type Row = TranslatorAllValues<P::ScalarField>;
    type Acc = TranslatorPermutationRelationAcc<P::ScalarField>;

    fn skip(_input: &Self::Row) -> bool {
        false
    }

    /**
     * @brief Compute contribution of the range constraint permutation for a given edge
     *
     * @details The concatenated microlimb columns together with the step sequence are a permutation of the
     * ordered columns:
     *      (z_perm + lagrange_first) * ∏(concatenated_j + γ) * (extra + γ)
     *          - (z_perm_shift + lagrange_last) * ∏(ordered_j + γ) = 0
     *      lagrange_last * z_perm_shift = 0
     */
    fn accumulate(
        univariate_accumulator: &mut Self::Acc,
        input: &Self::Row,
        relation_parameters: &RelationParameters<P::ScalarField>,
        scaling_factor: &P::ScalarField,
    ) {
        tracing::trace!("Accumulate TranslatorPermutationRelation");

        let z_perm = &input.witness.z_perm;
        let z_perm_shift = &input.shifted.z_perm;
        let lagrange_first = &input.precomputed.lagrange_first;
        let lagrange_last = &input.precomputed.lagrange_last;

        // witness degree 6
        let tmp = ((z_perm.to_owned() + lagrange_first)
            * <Self as GrandProductRelation<P>>::compute_grand_product_numerator(
                input,
                relation_parameters,
            )
            - (z_perm_shift.to_owned() + lagrange_last)
                * <Self as GrandProductRelation<P>>::compute_grand_product_denominator(
                    input,
                    relation_parameters,
                ))
            * scaling_factor;
        univariate_accumulator[0] += tmp;

        ///////////////////////////////////////////////////////////////////////

        let tmp = lagrange_last.to_owned() * z_perm_shift * scaling_factor;
        univariate_accumulator[1] += tmp;
    }
}
