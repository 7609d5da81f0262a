use crate::{
    decider::{
        relations::{Relation, RelationKind, SubrelationAccumulator},
        types::RelationParameters,
    },
    flavor::TranslatorAllValues,
    honk_curve::HonkCurve,
};

pub struct TranslatorOpcodeConstraintRelation {}

impl TranslatorOpcodeConstraintRelation {
    pub const NUM_SUBRELATIONS: usize = 1;
    pub const SUBRELATION_PARTIAL_LENGTHS: [usize; Self::NUM_SUBRELATIONS] = [7];
}

pub type TranslatorOpcodeConstraintRelationAcc<F> =
    SubrelationAccumulator<F, { TranslatorOpcodeConstraintRelation::NUM_SUBRELATIONS }>;

impl<P: HonkCurve> Relation<P> for TranslatorOpcodeConstraintRelation {
    const KIND: RelationKind = RelationKind::TranslatorOpcodeConstraint;
    const SKIPPABLE: bool = false;
    type Row = TranslatorAllValues<P::ScalarField>;
    type Acc = TranslatorOpcodeConstraintRelationAcc<P::ScalarField>;

    fn skip(_input: &Self::Row) -> bool {
        false
    }

    /**
     * @brief Expression for the opcode of the ECC op queue.
     * @details The only valid opcodes are 0 (no-op), 1, 2, 3, 4 and 8:
     *      op * (op - 1) * (op - 2) * (op - 3) * (op - 4) * (op - 8) = 0
     */
    fn accumulate(
        univariate_accumulator: &mut Self::Acc,
        input: &Self::Row,
        _relation_parameters: &RelationParameters<P::ScalarField>,
        scaling_factor: &P::ScalarField,
    ) {
        tracing::trace!("Accumulate TranslatorOpcodeConstraintRelation");

        let op = input.witness.op;
        let minus_one = -P::ScalarField::from(1u64);
        let minus_two = -P::ScalarField::from(2u64);
        let minus_three = -P::ScalarField::from(3u64);
        let minus_four = -P::ScalarField::from(4u64);
        let minus_eight = -P::ScalarField::from(8u64);

        // Contribution (1) (op(op-1)(op-2)(op-3)(op-4)(op-8))
        let mut tmp_1 = op * (op + minus_one);
        tmp_1 *= op + minus_two;
        tmp_1 *= op + minus_three;
        tmp_1 *= op + minus_four;
        tmp_1 *= op + minus_eight;
        tmp_1 *= scaling_factor;
        univariate_accumulator[0] += tmp_1;
    }
}
