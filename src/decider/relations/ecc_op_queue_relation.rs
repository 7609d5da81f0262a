use super::{Relation, RelationKind, SubrelationAccumulator};
use crate::{
    decider::types::RelationParameters, flavor::GoblinUltraAllValues, honk_curve::HonkCurve,
};

pub struct EccOpQueueRelation {}

impl EccOpQueueRelation {
    pub const NUM_SUBRELATIONS: usize = 8;
    pub const SUBRELATION_PARTIAL_LENGTHS: [usize; Self::NUM_SUBRELATIONS] = [3; 8];
}

pub type EccOpQueueRelationAcc<F> =
    SubrelationAccumulator<F, { EccOpQueueRelation::NUM_SUBRELATIONS }>;

impl<P: HonkCurve> Relation<P> for EccOpQueueRelation {
    const KIND: RelationKind = RelationKind::EccOpQueue;
    const SKIPPABLE: bool = false;
    type Row = GoblinUltraAllValues<P::ScalarField>;
    type Acc = EccOpQueueRelationAcc<P::ScalarField>;

    fn skip(_input: &Self::Row) -> bool {
        false
    }

    /**
     * @brief Expression for the transfer of the ECC op queue into the op wires.
     * @details Contributions are of the form
     *    (1) lagrange_ecc_op * (op_wire_i - w_i) = 0
     *    (2) (1 - lagrange_ecc_op) * op_wire_i = 0
     * for i = 1, ..., 4. The op wires agree with the wires on the ecc op rows and vanish everywhere else.
     *
     * @param evals transformed to `evals + C(in(X)...)*scaling_factor`
     * @param in the values of the current row.
     * @param parameters unused.
     * @param scaling_factor optional term to scale the evaluation before adding to evals.
     */
    fn accumulate(
        univariate_accumulator: &mut Self::Acc,
        input: &Self::Row,
        _relation_parameters: &RelationParameters<P::ScalarField>,
        scaling_factor: &P::ScalarField,
    ) {
        tracing::trace!("Accumulate EccOpQueueRelation");

        let witness = &input.ultra.witness;
        let ecc_op = &input.ecc_op;
        let wires = [&witness.w_l, &witness.w_r, &witness.w_o, &witness.w_4];
        let op_wires = [
            &ecc_op.ecc_op_wire_1,
            &ecc_op.ecc_op_wire_2,
            &ecc_op.ecc_op_wire_3,
            &ecc_op.ecc_op_wire_4,
        ];

        let lagrange_by_scaling = ecc_op.lagrange_ecc_op * scaling_factor;
        let complement_ecc_op_by_scaling = -lagrange_by_scaling + scaling_factor;

        for (i, (op_wire, wire)) in op_wires.iter().zip(wires.iter()).enumerate() {
            // Contribution (1)
            let tmp = (**op_wire - *wire) * lagrange_by_scaling;
            univariate_accumulator[i] += tmp;

            // Contribution (2)
            let tmp = **op_wire * complement_ecc_op_by_scaling;
            univariate_accumulator[i + 4] += tmp;
        }
    }
}
