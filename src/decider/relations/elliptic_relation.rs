use super::{Relation, RelationKind, SubrelationAccumulator};
use crate::{decider::types::RelationParameters, flavor::UltraAllValues, honk_curve::HonkCurve};
use ark_ff::{Field, Zero};

pub struct EllipticRelation {}

impl EllipticRelation {
    pub const NUM_SUBRELATIONS: usize = 2;
    pub const SUBRELATION_PARTIAL_LENGTHS: [usize; Self::NUM_SUBRELATIONS] = [6, 6];
}

pub type EllipticRelationAcc<F> = SubrelationAccumulator<F, { EllipticRelation::NUM_SUBRELATIONS }>;

impl<P: HonkCurve> Relation<P> for EllipticRelation {
    const KIND: RelationKind = RelationKind::Elliptic;
    const SKIPPABLE: bool = true;
    type Row = UltraAllValues<P::ScalarField>;
    type Acc = EllipticRelationAcc<P::ScalarField>;

    fn skip(input: &Self::Row) -> bool {
        input.precomputed.q_elliptic.is_zero()
    }

    /**
     * @brief Expression for the elliptic curve gate of the embedded curve y^2 = x^3 + b.
     * @details The gate reads (x_1, y_1) from the current row and (x_2, y_2), (x_3, y_3) from the next one.
     * With q_is_double = 0 it checks (x_3, y_3) = (x_1, y_1) + q_sign * (x_2, y_2), with q_is_double = 1 it checks
     * (x_3, y_3) = 2 * (x_1, y_1). Both coordinate checks of an operation share one subrelation.
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
        tracing::trace!("Accumulate EllipticRelation");

        let x_1 = &input.witness.w_r;
        let y_1 = &input.witness.w_o;

        let x_2 = &input.shifted.w_l;
        let y_2 = &input.shifted.w_4;
        let x_3 = &input.shifted.w_r;
        let y_3 = &input.shifted.w_o;

        let q_sign = &input.precomputed.q_l;
        let q_elliptic = &input.precomputed.q_elliptic;
        let q_is_double = &input.precomputed.q_m;

        // Contribution (1) point addition, x-coordinate check
        // q_elliptic * (x3 + x2 + x1)(x2 - x1)(x2 - x1) - y2^2 - y1^2 + 2(y2y1)*q_sign = 0
        let x_diff = x_2.to_owned() - x_1;
        let y2_sqr = y_2.square();
        let y1_sqr = y_1.square();
        let y1y2 = y_1.to_owned() * y_2 * q_sign;
        let x_add_identity =
            (x_3.to_owned() + x_2 + x_1) * x_diff.square() - y2_sqr - y1_sqr + y1y2 + y1y2;

        let q_elliptic_by_scaling = q_elliptic.to_owned() * scaling_factor;
        let q_elliptic_q_double_scaling = q_elliptic_by_scaling * q_is_double;
        let q_elliptic_not_double_scaling = q_elliptic_by_scaling - q_elliptic_q_double_scaling;
        let mut tmp_1 = x_add_identity * q_elliptic_not_double_scaling;

        ///////////////////////////////////////////////////////////////////////
        // Contribution (2) point addition, y-coordinate check
        // q_elliptic * (q_sign * y1 + y3)(x2 - x1) + (x3 - x1)(y2 - q_sign * y1) = 0
        let y1_plus_y3 = y_1.to_owned() + y_3;
        let y_diff = y_2.to_owned() * q_sign - y_1;
        let y_add_identity = y1_plus_y3 * x_diff + (x_3.to_owned() - x_1) * y_diff;
        let mut tmp_2 = y_add_identity * q_elliptic_not_double_scaling;

        ///////////////////////////////////////////////////////////////////////
        // Contribution (3) point doubling, x-coordinate check
        // (x3 + x1 + x1) (4y1*y1) - 9 * x1 * x1 * x1 * x1 = 0
        // N.B. we're using the equivalence x1*x1*x1 === y1*y1 - curve_b to reduce degree by 1
        let curve_b = P::get_curve_b();
        let x1_mul_3 = x_1.to_owned() + x_1 + x_1;
        let x_pow_4_mul_3 = (y1_sqr - curve_b) * x1_mul_3;
        let mut y1_sqr_mul_4 = y1_sqr.double();
        y1_sqr_mul_4.double_in_place();
        let x1_pow_4_mul_9 = x_pow_4_mul_3 + x_pow_4_mul_3 + x_pow_4_mul_3;
        let x_double_identity = (x_3.to_owned() + x_1 + x_1) * y1_sqr_mul_4 - x1_pow_4_mul_9;
        tmp_1 += x_double_identity * q_elliptic_q_double_scaling;

        ///////////////////////////////////////////////////////////////////////
        // Contribution (4) point doubling, y-coordinate check
        // (y1 + y1) (2y1) - (3 * x1 * x1)(x1 - x3) = 0
        let x1_sqr_mul_3 = x1_mul_3 * x_1;
        let y_double_identity =
            x1_sqr_mul_3 * (x_1.to_owned() - x_3) - (y_1.to_owned() + y_1) * y1_plus_y3;
        tmp_2 += y_double_identity * q_elliptic_q_double_scaling;

        univariate_accumulator[0] += tmp_1;
        univariate_accumulator[1] += tmp_2;
    }
}
