use super::{Relation, RelationKind, SubrelationAccumulator};
use crate::{
    decider::{grand_product::GrandProductRelation, types::RelationParameters},
    flavor::UltraAllValues,
    honk_curve::HonkCurve,
};
use ark_ff::One;

pub struct LookupRelation {}

impl LookupRelation {
    pub const NUM_SUBRELATIONS: usize = 2;
    pub const SUBRELATION_PARTIAL_LENGTHS: [usize; Self::NUM_SUBRELATIONS] = [6, 3];
}

pub type LookupRelationAcc<F> = SubrelationAccumulator<F, { LookupRelation::NUM_SUBRELATIONS }>;

impl<P: HonkCurve> GrandProductRelation<P> for LookupRelation {
    /**
     * @brief Compute numerator term of the lookup relation:
     *
     * N_{index} = (1 + β) ⋅ ∏ (q_lookup*f_k + γ) ⋅ (t_k + βt_{k+1} + γ(1 + β))
     *
     * f_k = w_1 + q_2*w_1' + η(w_2 + q_m*w_2') + η₂(w_3 + q_c*w_3') + η₃q_index
     * t_k = t_1 + ηt_2 + η₂t_3 + η₃t_4
     */
    fn compute_grand_product_numerator(
        input: &Self::Row,
        relation_parameters: &RelationParameters<P::ScalarField>,
    ) -> P::ScalarField {
        let beta = &relation_parameters.beta;
        let gamma = &relation_parameters.gamma;
        let eta = &relation_parameters.eta;
        let eta_two = &relation_parameters.eta_two;
        let eta_three = &relation_parameters.eta_three;

        let one_plus_beta = P::ScalarField::one() + beta;
        let gamma_by_one_plus_beta = one_plus_beta * gamma;

        let w_1 = &input.witness.w_l;
        let w_2 = &input.witness.w_r;
        let w_3 = &input.witness.w_o;
        let w_1_shift = &input.shifted.w_l;
        let w_2_shift = &input.shifted.w_r;
        let w_3_shift = &input.shifted.w_o;

        let table_1 = &input.precomputed.table_1;
        let table_2 = &input.precomputed.table_2;
        let table_3 = &input.precomputed.table_3;
        let table_4 = &input.precomputed.table_4;
        let table_1_shift = &input.shifted.table_1;
        let table_2_shift = &input.shifted.table_2;
        let table_3_shift = &input.shifted.table_3;
        let table_4_shift = &input.shifted.table_4;

        let table_index = &input.precomputed.q_o;
        let column_1_step_size = &input.precomputed.q_r;
        let column_2_step_size = &input.precomputed.q_m;
        let column_3_step_size = &input.precomputed.q_c;
        let q_lookup = &input.precomputed.q_lookup;

        // (w_1 + q_2*w_1_shift) + η(w_2 + q_m*w_2_shift) + η₂(w_3 + q_c*w_3_shift) + η₃q_index.
        // deg 2 or 3
        let wire_accum = (column_1_step_size.to_owned() * w_1_shift + w_1)
            + (column_2_step_size.to_owned() * w_2_shift + w_2) * eta
            + (column_3_step_size.to_owned() * w_3_shift + w_3) * eta_two
            + table_index.to_owned() * eta_three;

        // t_1 + ηt_2 + η₂t_3 + η₃t_4
        // deg 1 or 2
        let table_accum = table_2.to_owned() * eta
            + table_3.to_owned() * eta_two
            + table_4.to_owned() * eta_three
            + table_1;

        // t_1_shift + ηt_2_shift + η₂t_3_shift + η₃t_4_shift
        // deg 4
        let table_accum_shift = table_2_shift.to_owned() * eta
            + table_3_shift.to_owned() * eta_two
            + table_4_shift.to_owned() * eta_three
            + table_1_shift;

        let mut tmp = q_lookup.to_owned() * wire_accum + gamma; // deg 3 or 4
        tmp *= table_accum_shift * beta + table_accum + gamma_by_one_plus_beta; // 1 or 3
        tmp * one_plus_beta // deg 0 or 1
    }

    /**
     * @brief Compute denominator term of the lookup relation:
     *
     * D_{index} = s_k + βs_{k+1} + γ(1 + β)
     */
    fn compute_grand_product_denominator(
        input: &Self::Row,
        relation_parameters: &RelationParameters<P::ScalarField>,
    ) -> P::ScalarField {
        let beta = &relation_parameters.beta;
        let gamma = &relation_parameters.gamma;

        let one_plus_beta = P::ScalarField::one() + beta;
        let gamma_by_one_plus_beta = one_plus_beta * gamma; // deg 0 or 2

        let sorted_accum = &input.witness.sorted_accum;
        let sorted_accum_shift = &input.shifted.sorted_accum;

        // s_k + βs_{k+1} + γ(1 + β)
        sorted_accum_shift.to_owned() * beta + sorted_accum + gamma_by_one_plus_beta // deg 1 or 2
    }
}

impl<P: HonkCurve> Relation<P> for LookupRelation {
    const KIND: RelationKind = RelationKind::Lookup;
    const SKIPPABLE: bool = false;
    type Row = UltraAllValues<P::ScalarField>;
    type Acc = LookupRelationAcc<P::ScalarField>;

    fn skip(_input: &Self::Row) -> bool {
        false
    }

    /**
     * @brief Compute contribution of the lookup grand prod relation for a given edge (internal function)
     *
     * @details This the relation confirms faithful calculation of the lookup grand
     * product polynomial Z_lookup. The contribution is
     *      z_lookup * (1 + β) * [q_lookup * f + γ] * (t_accum_k + βt_accum_{k+1} + γ(1 + β)) -
     *      z_lookup_shift * (s_accum_k + βs_accum_{k+1} + γ(1 + β))
     * where
     *      f = (w_1 + q_2*w_1_shift) + η(w_2 + q_m*w_2_shift) + η₂(w_3 + q_c*w_3_shift) + η₃q_index,
     *      t_accum = table_1 + ηtable_2 + η₂table_3 + η₃table_4, and
     *      s_accum = s_1 + ηs_2 + η₂s_3 + η₃s_4.
     * Note: Selectors q_2, q_m and q_c are repurposed as 'column step size' for lookup gates.
     *
     * @param evals transformed to `evals + C(in(X)...)*scaling_factor`
     * @param in the values of the current and the next row.
     * @param parameters contains beta, gamma, the etas and the lookup grand product delta.
     * @param scaling_factor optional term to scale the evaluation before adding to evals.
     */
    fn accumulate(
        univariate_accumulator: &mut Self::Acc,
        input: &Self::Row,
        relation_parameters: &RelationParameters<P::ScalarField>,
        scaling_factor: &P::ScalarField,
    ) {
        tracing::trace!("Accumulate LookupRelation");

        let grand_product_delta = &relation_parameters.lookup_grand_product_delta;

        let z_lookup = &input.witness.z_lookup;
        let z_lookup_shift = &input.shifted.z_lookup;

        let lagrange_first = &input.precomputed.lagrange_first;
        let lagrange_last = &input.precomputed.lagrange_last;

        let numerator =
            <Self as GrandProductRelation<P>>::compute_grand_product_numerator(input, relation_parameters);
        let denominator = <Self as GrandProductRelation<P>>::compute_grand_product_denominator(
            input,
            relation_parameters,
        );

        let tmp = ((z_lookup.to_owned() + lagrange_first) * numerator
            - (lagrange_last.to_owned() * grand_product_delta + z_lookup_shift) * denominator)
            * scaling_factor;
        univariate_accumulator[0] += tmp;

        ///////////////////////////////////////////////////////////////////////

        let tmp = lagrange_last.to_owned() * z_lookup_shift * scaling_factor;
        univariate_accumulator[1] += tmp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Bn254, Fr};
    use ark_ff::Zero;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn lookup_row() -> UltraAllValues<Fr> {
        let mut row = UltraAllValues::<Fr>::default();
        row.precomputed.q_lookup = Fr::one();
        row.precomputed.q_o = Fr::from(2u64);
        row.precomputed.q_r = Fr::from(1u64 << 6);
        row.witness.w_l = Fr::from(100u64);
        row.witness.w_r = Fr::from(7u64);
        row.witness.w_o = Fr::from(700u64);
        row.shifted.w_l = Fr::from(1u64);
        row.precomputed.table_1 = Fr::from(164u64);
        row.precomputed.table_2 = Fr::from(7u64);
        row.precomputed.table_3 = Fr::from(700u64);
        row.precomputed.table_4 = Fr::from(2u64);
        row.shifted.table_1 = Fr::from(165u64);
        row.witness.sorted_accum = Fr::from(3u64);
        row.shifted.sorted_accum = Fr::from(4u64);
        row
    }

    #[test]
    fn grand_product_step_between_rows() {
        let params = RelationParameters::<Fr>::get_random(&mut ChaCha12Rng::seed_from_u64(5));
        let mut row = lookup_row();

        let numerator =
            <LookupRelation as GrandProductRelation<Bn254>>::compute_grand_product_numerator(
                &row, &params,
            );
        let denominator =
            <LookupRelation as GrandProductRelation<Bn254>>::compute_grand_product_denominator(
                &row, &params,
            );
        // z_shift = z * N / D
        row.witness.z_lookup = denominator;
        row.shifted.z_lookup = numerator;

        let mut acc = LookupRelationAcc::default();
        <LookupRelation as Relation<Bn254>>::accumulate(&mut acc, &row, &params, &Fr::one());
        assert!(acc.is_zero());

        row.witness.w_o += Fr::one();
        let mut acc = LookupRelationAcc::default();
        <LookupRelation as Relation<Bn254>>::accumulate(&mut acc, &row, &params, &Fr::one());
        assert!(!acc[0].is_zero());
        assert!(acc[1].is_zero());
    }

    #[test]
    fn final_grand_product_value_is_pinned() {
        let params = RelationParameters::<Fr>::get_random(&mut ChaCha12Rng::seed_from_u64(6));
        let mut row = UltraAllValues::<Fr>::default();
        row.precomputed.lagrange_last = Fr::one();
        row.shifted.z_lookup = Fr::from(9u64);

        let mut acc = LookupRelationAcc::default();
        <LookupRelation as Relation<Bn254>>::accumulate(&mut acc, &row, &params, &Fr::from(2u64));
        assert_eq!(acc[1], Fr::from(18u64));
    }

    #[test]
    fn empty_lookup_row_numerator_and_denominator() {
        let params = RelationParameters::<Fr>::get_random(&mut ChaCha12Rng::seed_from_u64(7));
        let row = UltraAllValues::<Fr>::default();
        let gamma_by_one_plus_beta = params.gamma * (Fr::one() + params.beta);

        let numerator =
            <LookupRelation as GrandProductRelation<Bn254>>::compute_grand_product_numerator(
                &row, &params,
            );
        let denominator =
            <LookupRelation as GrandProductRelation<Bn254>>::compute_grand_product_denominator(
                &row, &params,
            );
        assert_eq!(numerator, params.gamma * gamma_by_one_plus_beta * (Fr::one() + params.beta));
        assert_eq!(denominator, gamma_by_one_plus_beta);
        assert!(!Fr::is_zero(&denominator));
    }
}
