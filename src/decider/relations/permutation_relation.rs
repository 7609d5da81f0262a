use super::{Relation, RelationKind, SubrelationAccumulator};
use crate::{
    decider::{grand_product::GrandProductRelation, types::RelationParameters},
    flavor::UltraAllValues,
    honk_curve::HonkCurve,
};

pub struct UltraPermutationRelation {}

impl UltraPermutationRelation {
    pub const NUM_SUBRELATIONS: usize = 2;
    pub const SUBRELATION_PARTIAL_LENGTHS: [usize; Self::NUM_SUBRELATIONS] = [6, 3];
}

pub type UltraPermutationRelationAcc<F> =
    SubrelationAccumulator<F, { UltraPermutationRelation::NUM_SUBRELATIONS }>;

impl<P: HonkCurve> GrandProductRelation<P> for UltraPermutationRelation {
    fn compute_grand_product_numerator(
        input: &Self::Row,
        relation_parameters: &RelationParameters<P::ScalarField>,
    ) -> P::ScalarField {
        let w_1 = &input.witness.w_l;
        let w_2 = &input.witness.w_r;
        let w_3 = &input.witness.w_o;
        let w_4 = &input.witness.w_4;
        let id_1 = &input.precomputed.id_1;
        let id_2 = &input.precomputed.id_2;
        let id_3 = &input.precomputed.id_3;
        let id_4 = &input.precomputed.id_4;

        let beta = &relation_parameters.beta;
        let gamma = &relation_parameters.gamma;

        // witness degree 4; full degree 8
        (id_1.to_owned() * beta + w_1 + gamma)
            * (id_2.to_owned() * beta + w_2 + gamma)
            * (id_3.to_owned() * beta + w_3 + gamma)
            * (id_4.to_owned() * beta + w_4 + gamma)
    }

    fn compute_grand_product_denominator(
        input: &Self::Row,
        relation_parameters: &RelationParameters<P::ScalarField>,
    ) -> P::ScalarField {
        let w_1 = &input.witness.w_l;
        let w_2 = &input.witness.w_r;
        let w_3 = &input.witness.w_o;
        let w_4 = &input.witness.w_4;
        let sigma_1 = &input.precomputed.sigma_1;
        let sigma_2 = &input.precomputed.sigma_2;
        let sigma_3 = &input.precomputed.sigma_3;
        let sigma_4 = &input.precomputed.sigma_4;

        let beta = &relation_parameters.beta;
        let gamma = &relation_parameters.gamma;

        // witness degree 4; full degree 8
        (sigma_1.to_owned() * beta + w_1 + gamma)
            * (sigma_2.to_owned() * beta + w_2 + gamma)
            * (sigma_3.to_owned() * beta + w_3 + gamma)
            * (sigma_4.to_owned() * beta + w_4 + gamma)
    }
}

impl<P: HonkCurve> Relation<P> for UltraPermutationRelation {
    const KIND: RelationKind = RelationKind::UltraPermutation;
    const SKIPPABLE: bool = false;
    type Row = UltraAllValues<P::ScalarField>;
    type Acc = UltraPermutationRelationAcc<P::ScalarField>;

    fn skip(_input: &Self::Row) -> bool {
        false
    }

    /**
     * @brief Compute contribution of the permutation relation for a given edge (internal function)
     *
     * @details This the relation confirms faithful calculation of the grand
     * product polynomial Z_perm.
     *
     * @param evals transformed to `evals + C(in(X)...)*scaling_factor`
     * @param in an std::array containing the fully extended Univariate edges.
     * @param parameters contains beta, gamma, and public_input_delta, ....
     * @param scaling_factor optional term to scale the evaluation before adding to evals.
     */
    fn accumulate(
        univariate_accumulator: &mut Self::Acc,
        input: &Self::Row,
        relation_parameters: &RelationParameters<P::ScalarField>,
        scaling_factor: &P::ScalarField,
    ) {
        tracing::trace!("Accumulate UltraPermutationRelation");

        let public_input_delta = &relation_parameters.public_input_delta;
        let z_perm = &input.witness.z_perm;
        let z_perm_shift = &input.shifted.z_perm;
        let lagrange_first = &input.precomputed.lagrange_first;
        let lagrange_last = &input.precomputed.lagrange_last;

        // witness degree: deg 5 - deg 5 = deg 5
        // total degree: deg 9 - deg 10 = deg 10
        let tmp = (((z_perm.to_owned() + lagrange_first)
            * <Self as GrandProductRelation<P>>::compute_grand_product_numerator(
                input,
                relation_parameters,
            ))
            - ((lagrange_last.to_owned() * public_input_delta + z_perm_shift)
                * <Self as GrandProductRelation<P>>::compute_grand_product_denominator(
                    input,
                    relation_parameters,
                )))
            * scaling_factor;
        univariate_accumulator[0] += tmp;

        ///////////////////////////////////////////////////////////////////////

        let tmp = (lagrange_last.to_owned() * z_perm_shift) * scaling_factor;
        univariate_accumulator[1] += tmp;
    }
}
