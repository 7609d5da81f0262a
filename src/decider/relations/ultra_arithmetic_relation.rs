use super::{Relation, RelationKind, SubrelationAccumulator};
use crate::{decider::types::RelationParameters, flavor::UltraAllValues, honk_curve::HonkCurve};
use ark_ff::{Field, PrimeField, Zero};

pub struct UltraArithmeticRelation {}

impl UltraArithmeticRelation {
    pub const NUM_SUBRELATIONS: usize = 2;
    pub const SUBRELATION_PARTIAL_LENGTHS: [usize; Self::NUM_SUBRELATIONS] = [6, 5];
}

pub type UltraArithmeticRelationAcc<F> =
    SubrelationAccumulator<F, { UltraArithmeticRelation::NUM_SUBRELATIONS }>;

impl<P: HonkCurve> Relation<P> for UltraArithmeticRelation {
    const KIND: RelationKind = RelationKind::UltraArithmetic;
    const SKIPPABLE: bool = true;
    type Row = UltraAllValues<P::ScalarField>;
    type Acc = UltraArithmeticRelationAcc<P::ScalarField>;

    fn skip(input: &Self::Row) -> bool {
        input.precomputed.q_arith.is_zero()
    }

    /**
     * @brief Expression for the Ultra arithmetic gate.
     * @details This relation encapsulates several idenitities, toggled by the value of q_arith in [0, 1, 2, 3, ...].
     * The following description is reproduced from the Plonk analog 'plookup_arithmetic_widget':
     * The whole formula is:
     *
     * q_arith * ( ( (-1/2) * (q_arith - 3) * q_m * w_1 * w_2 + q_1 * w_1 + q_2 * w_2 + q_3 * w_3 + q_4 * w_4 + q_c ) +
     * (q_arith - 1)*( α * (q_arith - 2) * (w_1 + w_4 - w_1_omega + q_m) + w_4_omega) ) = 0
     *
     * This formula results in several cases depending on q_arith:
     * 1. q_arith == 0: Arithmetic gate is completely disabled
     *
     * 2. q_arith == 1: Everything in the minigate on the right is disabled. The equation is just a standard plonk
     *    equation with extra wires: q_m * w_1 * w_2 + q_1 * w_1 + q_2 * w_2 + q_3 * w_3 + q_4 * w_4 + q_c = 0
     *
     * 3. q_arith == 2: The (w_1 + w_4 - ...) term is disabled. THe equation is:
     *    (1/2) * q_m * w_1 * w_2 + q_1 * w_1 + q_2 * w_2 + q_3 * w_3 + q_4 * w_4 + q_c + w_4_omega = 0
     *    It allows defining w_4 at next index (w_4_omega) in terms of current wire values
     *
     * 4. q_arith == 3: The product of w_1 and w_2 is disabled, but a mini addition gate is enabled. α² allows us to
     *    split the equation into two:
     *
     * q_1 * w_1 + q_2 * w_2 + q_3 * w_3 + q_4 * w_4 + q_c + 2 * w_4_omega = 0
     *
     * w_1 + w_4 - w_1_omega + q_m = 0  (we are reusing q_m here)
     *
     * 5. q_arith > 3: The product of w_1 and w_2 is scaled by (q_arith - 3), while the w_4_omega term is scaled by
     *    (q_arith - 1). The equation can be split into two:
     *
     * (q_arith - 3)* q_m * w_1 * w_ 2 + q_1 * w_1 + q_2 * w_2 + q_3 * w_3 + q_4 * w_4 + q_c + (q_arith - 1) * w_4_omega = 0
     *
     * w_1 + w_4 - w_1_omega + q_m = 0
     *
     * The problem that q_m is used both in both equations can be dealt with by appropriately changing selector values
     * at the next gate. Then we can treat (q_arith - 1) as a simulated q_6 selector and scale q_m to handle (q_arith -
     * 3) at product.
     *
     * @param evals transformed to `evals + C(in(X)...)*scaling_factor`
     * @param in an std::array containing the fully extended Univariate edges.
     * @param parameters contains beta, gamma, and public_input_delta, ....
     * @param scaling_factor optional term to scale the evaluation before adding to evals.
     */
    fn accumulate(
        univariate_accumulator: &mut Self::Acc,
        input: &Self::Row,
        _relation_parameters: &RelationParameters<P::ScalarField>,
        scaling_factor: &P::ScalarField,
    ) {
        tracing::trace!("Accumulate UltraArithmeticRelation");

        let w_l = &input.witness.w_l;
        let w_r = &input.witness.w_r;
        let w_o = &input.witness.w_o;
        let w_4 = &input.witness.w_4;
        let w_4_shift = &input.shifted.w_4;
        let q_m = &input.precomputed.q_m;
        let q_l = &input.precomputed.q_l;
        let q_r = &input.precomputed.q_r;
        let q_o = &input.precomputed.q_o;
        let q_4 = &input.precomputed.q_4;
        let q_c = &input.precomputed.q_c;
        let q_arith = &input.precomputed.q_arith;
        let w_l_shift = &input.shifted.w_l;

        let one = P::ScalarField::ONE;
        let two = P::ScalarField::from(2u64);
        let three = P::ScalarField::from(3u64);
        // (p - 1) / 2 = -1/2
        let neg_half = P::ScalarField::from(P::ScalarField::MODULUS_MINUS_ONE_DIV_TWO);

        let mut tmp = (q_arith.to_owned() - three) * (q_m.to_owned() * w_r * w_l) * neg_half;
        tmp += (q_l.to_owned() * w_l)
            + (q_r.to_owned() * w_r)
            + (q_o.to_owned() * w_o)
            + (q_4.to_owned() * w_4)
            + q_c;
        tmp += (q_arith.to_owned() - one) * w_4_shift;
        tmp *= q_arith;
        tmp *= scaling_factor;
        univariate_accumulator[0] += tmp;

        ///////////////////////////////////////////////////////////////////////

        let mut tmp = w_l.to_owned() + w_4 - w_l_shift + q_m;
        tmp *= q_arith.to_owned() - two;
        tmp *= q_arith.to_owned() - one;
        tmp *= q_arith;
        tmp *= scaling_factor;
        univariate_accumulator[1] += tmp;
    }
}
