use super::{named_columns, Flavor, ProverPolynomials, RelationAccumulators};
use crate::{
    decider::{
        relations::{
            translator::{
                TranslatorAccumulatorTransferRelationAcc, TranslatorDecompositionRelationAcc,
                TranslatorGenPermSortRelationAcc, TranslatorNonNativeFieldRelationAcc,
                TranslatorOpcodeConstraintRelationAcc, TranslatorPermutationRelationAcc,
            },
            RelationKind, TranslatorAccumulatorTransferRelation, TranslatorDecompositionRelation,
            TranslatorGenPermSortRelation, TranslatorNonNativeFieldRelation,
            TranslatorOpcodeConstraintRelation, TranslatorPermutationRelation,
        },
        sumcheck::sumcheck_round::accumulate_one_relation,
        types::RelationParameters,
    },
    error::RelationResult,
    field_convert::NUM_MICRO_LIMB_BITS,
    honk_curve::HonkCurve,
    types::{define_entities, take_columns, Entities},
};
use ark_ff::{PrimeField, Zero};
use std::collections::HashMap;

/// Number of microlimb columns in one decomposition of a binary limb, the last one is the tail.
pub const NUM_LIMB_RANGE_CONSTRAINTS: usize = 6;
/// Number of concatenated range constraint columns.
pub const NUM_CONCATENATED: usize = 4;
/// Number of ordered range constraint columns.
pub const NUM_ORDERED: usize = NUM_CONCATENATED + 1;
/// Distance between the values of the step sequence inserted into every ordered column.
pub const SORT_STEP: usize = 3;
/// Largest value a microlimb may take.
pub const MAX_MICRO_LIMB: u64 = (1 << NUM_MICRO_LIMB_BITS) - 1;

define_entities! {
    /// Lagrange selectors of the minicircuit and the step sequence of the range constraint
    /// permutation.
    pub struct TranslatorPrecomputedEntities<T> {
        lagrange_first,
        lagrange_last,
        lagrange_odd_in_minicircuit,
        lagrange_even_in_minicircuit,
        lagrange_second,
        lagrange_last_in_minicircuit,
        ordered_extra_range_constraints_numerator,
    }
}

define_entities! {
    /// The op queue transcript, the limbed accumulator computation and its range constraints.
    pub struct TranslatorWitnessEntities<T> {
        op,
        x_lo_y_hi,
        x_hi_z_1,
        y_lo_z_2,
        p_x_low_limbs,
        p_x_high_limbs,
        p_y_low_limbs,
        p_y_high_limbs,
        z_low_limbs,
        z_high_limbs,
        quotient_low_binary_limbs,
        quotient_high_binary_limbs,
        relation_wide_limbs,
        z_perm,
    }
    arrays {
        accumulators_binary_limbs: [4],
        p_x_low_limbs_range_constraint: [6],
        p_x_high_limbs_range_constraint: [6],
        p_y_low_limbs_range_constraint: [6],
        p_y_high_limbs_range_constraint: [6],
        z_low_limbs_range_constraint: [6],
        z_high_limbs_range_constraint: [6],
        accumulator_0_limbs_range_constraint: [6],
        accumulator_1_limbs_range_constraint: [6],
        accumulator_2_limbs_range_constraint: [6],
        accumulator_3_limbs_range_constraint: [6],
        quotient_low_limbs_range_constraint: [6],
        quotient_high_limbs_range_constraint: [6],
        relation_wide_limbs_range_constraint: [6],
        concatenated_range_constraints: [4],
        ordered_range_constraints: [5],
    }
}

impl<T> TranslatorWitnessEntities<T> {
    /// Every range constrained binary limb with its microlimb decomposition.
    pub fn limb_range_constraints(&self) -> [(&T, &[T; NUM_LIMB_RANGE_CONSTRAINTS]); 12] {
        [
            (&self.p_x_low_limbs, &self.p_x_low_limbs_range_constraint),
            (&self.p_x_high_limbs, &self.p_x_high_limbs_range_constraint),
            (&self.p_y_low_limbs, &self.p_y_low_limbs_range_constraint),
            (&self.p_y_high_limbs, &self.p_y_high_limbs_range_constraint),
            (&self.z_low_limbs, &self.z_low_limbs_range_constraint),
            (&self.z_high_limbs, &self.z_high_limbs_range_constraint),
            (
                &self.accumulators_binary_limbs[0],
                &self.accumulator_0_limbs_range_constraint,
            ),
            (
                &self.accumulators_binary_limbs[1],
                &self.accumulator_1_limbs_range_constraint,
            ),
            (
                &self.accumulators_binary_limbs[2],
                &self.accumulator_2_limbs_range_constraint,
            ),
            (
                &self.accumulators_binary_limbs[3],
                &self.accumulator_3_limbs_range_constraint,
            ),
            (
                &self.quotient_low_binary_limbs,
                &self.quotient_low_limbs_range_constraint,
            ),
            (
                &self.quotient_high_binary_limbs,
                &self.quotient_high_limbs_range_constraint,
            ),
        ]
    }

    pub fn limb_range_constraints_mut(
        &mut self,
    ) -> [(&mut T, &mut [T; NUM_LIMB_RANGE_CONSTRAINTS]); 12] {
        let [acc_0, acc_1, acc_2, acc_3] = &mut self.accumulators_binary_limbs;
        [
            (&mut self.p_x_low_limbs, &mut self.p_x_low_limbs_range_constraint),
            (&mut self.p_x_high_limbs, &mut self.p_x_high_limbs_range_constraint),
            (&mut self.p_y_low_limbs, &mut self.p_y_low_limbs_range_constraint),
            (&mut self.p_y_high_limbs, &mut self.p_y_high_limbs_range_constraint),
            (&mut self.z_low_limbs, &mut self.z_low_limbs_range_constraint),
            (&mut self.z_high_limbs, &mut self.z_high_limbs_range_constraint),
            (acc_0, &mut self.accumulator_0_limbs_range_constraint),
            (acc_1, &mut self.accumulator_1_limbs_range_constraint),
            (acc_2, &mut self.accumulator_2_limbs_range_constraint),
            (acc_3, &mut self.accumulator_3_limbs_range_constraint),
            (
                &mut self.quotient_low_binary_limbs,
                &mut self.quotient_low_limbs_range_constraint,
            ),
            (
                &mut self.quotient_high_binary_limbs,
                &mut self.quotient_high_limbs_range_constraint,
            ),
        ]
    }

    /// Every microlimb column, in the order they are concatenated.
    pub fn microlimbs(&self) -> Vec<&T> {
        self.limb_range_constraints()
            .into_iter()
            .flat_map(|(_, micro)| micro.iter())
            .chain(self.relation_wide_limbs_range_constraint.iter())
            .collect()
    }

    pub fn microlimbs_mut(&mut self) -> Vec<&mut T> {
        [
            &mut self.p_x_low_limbs_range_constraint,
            &mut self.p_x_high_limbs_range_constraint,
            &mut self.p_y_low_limbs_range_constraint,
            &mut self.p_y_high_limbs_range_constraint,
            &mut self.z_low_limbs_range_constraint,
            &mut self.z_high_limbs_range_constraint,
            &mut self.accumulator_0_limbs_range_constraint,
            &mut self.accumulator_1_limbs_range_constraint,
            &mut self.accumulator_2_limbs_range_constraint,
            &mut self.accumulator_3_limbs_range_constraint,
            &mut self.quotient_low_limbs_range_constraint,
            &mut self.quotient_high_limbs_range_constraint,
            &mut self.relation_wide_limbs_range_constraint,
        ]
        .into_iter()
        .flat_map(|micro| micro.iter_mut())
        .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TranslatorAllValues<F> {
    pub precomputed: TranslatorPrecomputedEntities<F>,
    pub witness: TranslatorWitnessEntities<F>,
    pub shifted: TranslatorWitnessEntities<F>,
}

impl<T> Entities<T> for TranslatorAllValues<T> {
    fn names() -> Vec<String> {
        TranslatorPrecomputedEntities::<T>::names()
            .into_iter()
            .chain(TranslatorWitnessEntities::<T>::names())
            .chain(
                TranslatorWitnessEntities::<T>::names()
                    .into_iter()
                    .map(|name| format!("{name}_shift")),
            )
            .collect()
    }

    fn iter(&self) -> std::vec::IntoIter<&T> {
        self.precomputed
            .iter()
            .chain(self.witness.iter())
            .chain(self.shifted.iter())
            .collect::<Vec<_>>()
            .into_iter()
    }

    fn iter_mut(&mut self) -> std::vec::IntoIter<&mut T> {
        self.precomputed
            .iter_mut()
            .chain(self.witness.iter_mut())
            .chain(self.shifted.iter_mut())
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl<T> AsRef<TranslatorAllValues<T>> for TranslatorAllValues<T> {
    fn as_ref(&self) -> &TranslatorAllValues<T> {
        self
    }
}

/// Every witness column of the translator is read shifted by at least one relation.
#[derive(Clone, Debug, Default)]
pub struct TranslatorProverPolynomials<F: PrimeField> {
    pub precomputed: TranslatorPrecomputedEntities<Vec<F>>,
    pub witness: TranslatorWitnessEntities<Vec<F>>,
}

impl<F: PrimeField> TranslatorProverPolynomials<F> {
    pub fn new(circuit_size: usize) -> Self {
        let mut polys = Self::default();
        for column in polys
            .precomputed
            .iter_mut()
            .chain(polys.witness.iter_mut())
        {
            *column = vec![F::zero(); circuit_size];
        }
        polys
    }

    pub fn from_columns(mut columns: HashMap<String, Vec<F>>) -> RelationResult<Self> {
        let mut polys = Self::default();
        take_columns(TranslatorFlavor::NAME, &mut polys.precomputed, &mut columns)?;
        take_columns(TranslatorFlavor::NAME, &mut polys.witness, &mut columns)?;
        polys.validate()?;
        Ok(polys)
    }
}

impl<F: PrimeField> ProverPolynomials<F> for TranslatorProverPolynomials<F> {
    type AllValues = TranslatorAllValues<F>;

    fn circuit_size(&self) -> usize {
        self.precomputed.lagrange_first.len()
    }

    fn columns(&self) -> Vec<(String, &[F])> {
        let mut columns = named_columns(&self.precomputed);
        columns.extend(named_columns(&self.witness));
        columns
    }

    fn to_be_shifted(&self) -> Vec<(String, &[F])> {
        named_columns(&self.witness)
    }

    fn fill_row(&self, row: &mut Self::AllValues, index: usize) {
        row.precomputed.copy_row(&self.precomputed, index);
        row.witness.copy_row(&self.witness, index);
        row.shifted.copy_shifted_row(&self.witness, index);
    }
}

#[derive(Clone, Debug, Default)]
pub struct TranslatorRelationAcc<F: PrimeField> {
    pub r_decomposition: TranslatorDecompositionRelationAcc<F>,
    pub r_opcode: TranslatorOpcodeConstraintRelationAcc<F>,
    pub r_accumulator_transfer: TranslatorAccumulatorTransferRelationAcc<F>,
    pub r_non_native_field: TranslatorNonNativeFieldRelationAcc<F>,
    pub r_gen_perm_sort: TranslatorGenPermSortRelationAcc<F>,
    pub r_permutation: TranslatorPermutationRelationAcc<F>,
}

impl<F: PrimeField> RelationAccumulators<F> for TranslatorRelationAcc<F> {
    fn evaluations(&self) -> Vec<(RelationKind, &[F])> {
        vec![
            (
                RelationKind::TranslatorDecomposition,
                self.r_decomposition.evaluations(),
            ),
            (
                RelationKind::TranslatorOpcodeConstraint,
                self.r_opcode.evaluations(),
            ),
            (
                RelationKind::TranslatorAccumulatorTransfer,
                self.r_accumulator_transfer.evaluations(),
            ),
            (
                RelationKind::TranslatorNonNativeField,
                self.r_non_native_field.evaluations(),
            ),
            (
                RelationKind::TranslatorGenPermSort,
                self.r_gen_perm_sort.evaluations(),
            ),
            (
                RelationKind::TranslatorPermutation,
                self.r_permutation.evaluations(),
            ),
        ]
    }

    fn evaluations_mut(&mut self) -> Vec<&mut [F]> {
        vec![
            self.r_decomposition.evaluations_mut(),
            self.r_opcode.evaluations_mut(),
            self.r_accumulator_transfer.evaluations_mut(),
            self.r_non_native_field.evaluations_mut(),
            self.r_gen_perm_sort.evaluations_mut(),
            self.r_permutation.evaluations_mut(),
        ]
    }
}

/// Translation of the ECC op queue into a non-native accumulator over the base field.
#[derive(Clone, Copy, Debug, Default)]
pub struct TranslatorFlavor;

impl TranslatorFlavor {
    pub const NAME: &'static str = "GoblinTranslator";
}

impl<P: HonkCurve> Flavor<P> for TranslatorFlavor {
    const NAME: &'static str = TranslatorFlavor::NAME;
    const RELATIONS: &'static [RelationKind] = &[
        RelationKind::TranslatorDecomposition,
        RelationKind::TranslatorOpcodeConstraint,
        RelationKind::TranslatorAccumulatorTransfer,
        RelationKind::TranslatorNonNativeField,
        RelationKind::TranslatorGenPermSort,
        RelationKind::TranslatorPermutation,
    ];

    type ProverPolynomials = TranslatorProverPolynomials<P::ScalarField>;
    type RelationAcc = TranslatorRelationAcc<P::ScalarField>;

    fn accumulate_relations(
        univariate_accumulators: &mut Self::RelationAcc,
        input: &TranslatorAllValues<P::ScalarField>,
        relation_parameters: &RelationParameters<P::ScalarField>,
        scaling_factor: &P::ScalarField,
    ) {
        tracing::trace!("Accumulate translator relations");

        accumulate_one_relation::<P, TranslatorDecompositionRelation>(
            &mut univariate_accumulators.r_decomposition,
            input,
            relation_parameters,
            scaling_factor,
        );
        accumulate_one_relation::<P, TranslatorOpcodeConstraintRelation>(
            &mut univariate_accumulators.r_opcode,
            input,
            relation_parameters,
            scaling_factor,
        );
        accumulate_one_relation::<P, TranslatorAccumulatorTransferRelation>(
            &mut univariate_accumulators.r_accumulator_transfer,
            input,
            relation_parameters,
            scaling_factor,
        );
        accumulate_one_relation::<P, TranslatorNonNativeFieldRelation>(
            &mut univariate_accumulators.r_non_native_field,
            input,
            relation_parameters,
            scaling_factor,
        );
        accumulate_one_relation::<P, TranslatorGenPermSortRelation>(
            &mut univariate_accumulators.r_gen_perm_sort,
            input,
            relation_parameters,
            scaling_factor,
        );
        accumulate_one_relation::<P, TranslatorPermutationRelation>(
            &mut univariate_accumulators.r_permutation,
            input,
            relation_parameters,
            scaling_factor,
        );
    }
}
