use crate::{
    decider::{
        relations::{Relation, RelationKind, SubrelationAccumulator},
        types::RelationParameters,
    },
    field_convert::{negative_modulus_limbs, NUM_LIMB_BITS},
    flavor::TranslatorAllValues,
    honk_curve::HonkCurve,
};
use ark_ff::{One, Zero};
use num_bigint::BigUint;

pub struct TranslatorNonNativeFieldRelation {}

impl TranslatorNonNativeFieldRelation {
    pub const NUM_SUBRELATIONS: usize = 3;
    pub const SUBRELATION_PARTIAL_LENGTHS: [usize; Self::NUM_SUBRELATIONS] = [3, 3, 3];
}

pub type TranslatorNonNativeFieldRelationAcc<F> =
    SubrelationAccumulator<F, { TranslatorNonNativeFieldRelation::NUM_SUBRELATIONS }>;

impl<P: HonkCurve> Relation<P> for TranslatorNonNativeFieldRelation {
    const KIND: RelationKind = RelationKind::TranslatorNonNativeField;
    const SKIPPABLE: bool = true;
    type Row = TranslatorAllValues<P::ScalarField>;
    type Acc = TranslatorNonNativeFieldRelationAcc<P::ScalarField>;

    fn skip(input: &Self::Row) -> bool {
        input.precomputed.lagrange_odd_in_minicircuit.is_zero()
    }

    /**
     * @brief Expression for the computation of the accumulator over the base field.
     * @details Every operation computes
     *      current = previous * x + op + P.x * v + P.y * v^2 + z_1 * v^3 + z_2 * v^4 mod q
     * with q the base field modulus. With the quotient of the reduction this is the integer identity
     *      previous * x + op + P.x * v + P.y * v^2 + z_1 * v^3 + z_2 * v^4 - quotient * q - current = 0
     * which is checked modulo 2^272 and modulo the native modulus, with the product by -q replaced by the product
     * by 2^272 - q for the binary limbs:
     *  1. the lowest 136 bits vanish, leaving the carry relation_wide * 2^136;
     *  2. the next 136 bits plus that carry vanish, leaving the carry relation_wide_shift * 2^136;
     *  3. the identity holds natively.
     * The values of an operation are spread over its odd row and the even row after it, the even row holding the
     * previous accumulator.
     *
     * @param evals transformed to `evals + C(in(X)...)*scaling_factor`
     * @param in the values of the current and the next row.
     * @param parameters contains the limbs of the evaluation input x and of the batching challenge powers.
     * @param scaling_factor optional term to scale the evaluation before adding to evals.
     */
    fn accumulate(
        univariate_accumulator: &mut Self::Acc,
        input: &Self::Row,
        relation_parameters: &RelationParameters<P::ScalarField>,
        scaling_factor: &P::ScalarField,
    ) {
        tracing::trace!("Accumulate TranslatorNonNativeFieldRelation");

        let neg_modulus = negative_modulus_limbs::<P::BaseField, P::ScalarField>();
        let shift = P::ScalarField::from(BigUint::one() << NUM_LIMB_BITS);
        let shift_2 = shift * shift;
        let shift_3 = shift_2 * shift;

        let evaluation_input_x = &relation_parameters.evaluation_input_x;
        let [v, v_2, v_3, v_4] = &relation_parameters.batching_challenge_v;

        let witness = &input.witness;
        let shifted = &input.shifted;

        let op = witness.op;
        let p_x_0 = witness.p_x_low_limbs;
        let p_x_1 = shifted.p_x_low_limbs;
        let p_x_2 = witness.p_x_high_limbs;
        let p_x_3 = shifted.p_x_high_limbs;
        let p_y_0 = witness.p_y_low_limbs;
        let p_y_1 = shifted.p_y_low_limbs;
        let p_y_2 = witness.p_y_high_limbs;
        let p_y_3 = shifted.p_y_high_limbs;
        let z_1_lo = witness.z_low_limbs;
        let z_1_hi = witness.z_high_limbs;
        let z_2_lo = shifted.z_low_limbs;
        let z_2_hi = shifted.z_high_limbs;
        let quotient_0 = witness.quotient_low_binary_limbs;
        let quotient_1 = shifted.quotient_low_binary_limbs;
        let quotient_2 = witness.quotient_high_binary_limbs;
        let quotient_3 = shifted.quotient_high_binary_limbs;
        let [current_0, current_1, current_2, current_3] = witness.accumulators_binary_limbs;
        let [previous_0, previous_1, previous_2, previous_3] = shifted.accumulators_binary_limbs;
        let relation_wide_lo = witness.relation_wide_limbs;
        let relation_wide_hi = shifted.relation_wide_limbs;

        let lagrange_odd_by_scaling = input.precomputed.lagrange_odd_in_minicircuit * scaling_factor;

        // Contribution (1) Computing the mod 2²⁷² relation over the lower 136 bits
        // the index-0 limb
        let tmp_0 = previous_0 * evaluation_input_x[0]
            + op
            + p_x_0 * v[0]
            + p_y_0 * v_2[0]
            + z_1_lo * v_3[0]
            + z_2_lo * v_4[0]
            + quotient_0 * neg_modulus[0]
            - current_0;

        // the index-1 limb
        let tmp_1 = previous_1 * evaluation_input_x[0]
            + previous_0 * evaluation_input_x[1]
            + p_x_0 * v[1]
            + p_x_1 * v[0]
            + p_y_0 * v_2[1]
            + p_y_1 * v_2[0]
            + z_1_lo * v_3[1]
            + z_1_hi * v_3[0]
            + z_2_lo * v_4[1]
            + z_2_hi * v_4[0]
            + quotient_0 * neg_modulus[1]
            + quotient_1 * neg_modulus[0]
            - current_1;

        // Subtract the carry to bring the lower 136 bits to zero
        let tmp = (tmp_0 + tmp_1 * shift - relation_wide_lo * shift_2) * lagrange_odd_by_scaling;
        univariate_accumulator[0] += tmp;

        ///////////////////////////////////////////////////////////////////////

        // Contribution (2) Computing the mod 2²⁷² relation over the higher 136 bits
        // the index-2 limb, with the carry from the lower 136 bits
        let tmp_2 = relation_wide_lo
            + previous_2 * evaluation_input_x[0]
            + previous_1 * evaluation_input_x[1]
            + previous_0 * evaluation_input_x[2]
            + p_x_0 * v[2]
            + p_x_1 * v[1]
            + p_x_2 * v[0]
            + p_y_0 * v_2[2]
            + p_y_1 * v_2[1]
            + p_y_2 * v_2[0]
            + z_1_lo * v_3[2]
            + z_1_hi * v_3[1]
            + z_2_lo * v_4[2]
            + z_2_hi * v_4[1]
            + quotient_2 * neg_modulus[0]
            + quotient_1 * neg_modulus[1]
            + quotient_0 * neg_modulus[2]
            - current_2;

        // the index-3 limb
        let tmp_3 = previous_3 * evaluation_input_x[0]
            + previous_2 * evaluation_input_x[1]
            + previous_1 * evaluation_input_x[2]
            + previous_0 * evaluation_input_x[3]
            + p_x_0 * v[3]
            + p_x_1 * v[2]
            + p_x_2 * v[1]
            + p_x_3 * v[0]
            + p_y_0 * v_2[3]
            + p_y_1 * v_2[2]
            + p_y_2 * v_2[1]
            + p_y_3 * v_2[0]
            + z_1_lo * v_3[3]
            + z_1_hi * v_3[2]
            + z_2_lo * v_4[3]
            + z_2_hi * v_4[2]
            + quotient_3 * neg_modulus[0]
            + quotient_2 * neg_modulus[1]
            + quotient_1 * neg_modulus[2]
            + quotient_0 * neg_modulus[3]
            - current_3;

        let tmp = (tmp_2 + tmp_3 * shift - relation_wide_hi * shift_2) * lagrange_odd_by_scaling;
        univariate_accumulator[1] += tmp;

        ///////////////////////////////////////////////////////////////////////

        // Contribution (3) The relation over the native field
        let reconstruct = |l_0: P::ScalarField,
                           l_1: P::ScalarField,
                           l_2: P::ScalarField,
                           l_3: P::ScalarField| {
            l_0 + l_1 * shift + l_2 * shift_2 + l_3 * shift_3
        };
        let previous_native = reconstruct(previous_0, previous_1, previous_2, previous_3);
        let current_native = reconstruct(current_0, current_1, current_2, current_3);
        let p_x_native = reconstruct(p_x_0, p_x_1, p_x_2, p_x_3);
        let p_y_native = reconstruct(p_y_0, p_y_1, p_y_2, p_y_3);
        let z_1_native = z_1_lo + z_1_hi * shift;
        let z_2_native = z_2_lo + z_2_hi * shift;
        let quotient_native = reconstruct(quotient_0, quotient_1, quotient_2, quotient_3);

        let tmp = (previous_native * evaluation_input_x[4]
            + op
            + p_x_native * v[4]
            + p_y_native * v_2[4]
            + z_1_native * v_3[4]
            + z_2_native * v_4[4]
            + quotient_native * neg_modulus[4]
            - current_native)
            * lagrange_odd_by_scaling;
        univariate_accumulator[2] += tmp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        flavor::{ProverPolynomials, TranslatorProverPolynomials},
        translator_builder::TranslatorCircuitBuilder,
    };
    use ark_bn254::{Bn254, Fq, Fr};
    use ark_ff::UniformRand;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    /// The odd rows of a three operation transcript and the matching challenges.
    fn operation_rows(seed: u64) -> (Vec<TranslatorAllValues<Fr>>, RelationParameters<Fr>) {
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        let mut builder =
            TranslatorCircuitBuilder::<Bn254>::new(Fq::rand(&mut rng), Fq::rand(&mut rng));
        for op in [1u64, 2, 3] {
            builder.queue_operation(
                op,
                Fq::rand(&mut rng),
                Fq::rand(&mut rng),
                u128::MAX >> op,
                12345 * op as u128,
            );
        }

        let mut polys = TranslatorProverPolynomials::<Fr>::new(8);
        builder.fill_operations(&mut polys.witness);

        let mut params = RelationParameters::default();
        params.set_translator_challenges(
            builder.evaluation_input_x(),
            builder.batching_challenge_v(),
            builder.accumulated_result(),
        );

        let rows = [1, 3, 5]
            .map(|index| {
                let mut row = polys.row(index);
                row.precomputed.lagrange_odd_in_minicircuit = Fr::one();
                row
            })
            .to_vec();
        (rows, params)
    }

    fn accumulate(
        row: &TranslatorAllValues<Fr>,
        params: &RelationParameters<Fr>,
    ) -> TranslatorNonNativeFieldRelationAcc<Fr> {
        let mut acc = TranslatorNonNativeFieldRelationAcc::default();
        <TranslatorNonNativeFieldRelation as Relation<Bn254>>::accumulate(
            &mut acc,
            row,
            params,
            &Fr::one(),
        );
        acc
    }

    #[test]
    fn accumulator_steps_satisfy_the_relation() {
        let (rows, params) = operation_rows(31);
        for row in rows.iter() {
            assert!(accumulate(row, &params).is_zero());
        }
        assert!(rows[2].shifted.accumulators_binary_limbs.iter().all(|l| l.is_zero()));
    }

    #[test]
    fn wrong_accumulator_limb_breaks_low_and_native_checks() {
        let (mut rows, params) = operation_rows(32);
        rows[1].witness.accumulators_binary_limbs[0] += Fr::one();

        let acc = accumulate(&rows[1], &params);
        assert_eq!(acc[0], -Fr::one());
        assert!(acc[1].is_zero());
        assert_eq!(acc[2], -Fr::one());
    }

    #[test]
    fn wrong_quotient_is_caught() {
        let (mut rows, params) = operation_rows(33);
        rows[0].witness.quotient_low_binary_limbs += Fr::one();

        let neg_modulus = negative_modulus_limbs::<Fq, Fr>();
        let shift = Fr::from(BigUint::one() << NUM_LIMB_BITS);
        let acc = accumulate(&rows[0], &params);
        assert_eq!(acc[0], neg_modulus[0] + neg_modulus[1] * shift);
        assert_eq!(acc[2], neg_modulus[4]);
    }

    #[test]
    fn even_rows_are_skipped() {
        let (mut rows, _) = operation_rows(34);
        assert!(!<TranslatorNonNativeFieldRelation as Relation<Bn254>>::skip(&rows[0]));
        rows[0].precomputed.lagrange_odd_in_minicircuit = Fr::zero();
        assert!(<TranslatorNonNativeFieldRelation as Relation<Bn254>>::skip(&rows[0]));
    }
}
