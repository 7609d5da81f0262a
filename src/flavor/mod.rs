mod goblin_ultra;
mod translator;
mod ultra;

pub use goblin_ultra::{
    EccOpEntities, GoblinUltraAllValues, GoblinUltraFlavor, GoblinUltraProverPolynomials,
    GoblinUltraRelationAcc,
};
pub use translator::{
    TranslatorAllValues, TranslatorFlavor, TranslatorPrecomputedEntities,
    TranslatorProverPolynomials, TranslatorRelationAcc, TranslatorWitnessEntities,
    MAX_MICRO_LIMB, NUM_CONCATENATED, NUM_LIMB_RANGE_CONSTRAINTS, NUM_ORDERED, SORT_STEP,
};
pub use ultra::{
    UltraAllEntities, UltraAllValues, UltraFlavor, UltraPrecomputedEntities,
    UltraProverPolynomials, UltraRelationAcc, UltraShiftedEntities, UltraWitnessEntities,
};

use crate::{
    decider::{relations::RelationKind, types::RelationParameters},
    error::{RelationError, RelationResult},
    honk_curve::HonkCurve,
    types::Entities,
};
use ark_ec::pairing::Pairing;
use ark_ff::{PrimeField, Zero};

/// A named set of relations over a fixed column layout.
pub trait Flavor<P: HonkCurve>: Sized {
    const NAME: &'static str;
    /// The relations of the flavor, in accumulator order.
    const RELATIONS: &'static [RelationKind];

    type ProverPolynomials: ProverPolynomials<P::ScalarField>;
    type RelationAcc: RelationAccumulators<P::ScalarField>;

    /// Adds the contribution of one row to every relation of the flavor.
    fn accumulate_relations(
        univariate_accumulators: &mut Self::RelationAcc,
        input: &AllValues<P, Self>,
        relation_parameters: &RelationParameters<P::ScalarField>,
        scaling_factor: &P::ScalarField,
    );
}

/// One row of the trace of flavor `Fl`: current values and shifts.
pub type AllValues<P, Fl> = <<Fl as Flavor<P>>::ProverPolynomials as ProverPolynomials<
    <P as Pairing>::ScalarField,
>>::AllValues;

/// Column storage of a trace.
pub trait ProverPolynomials<F: PrimeField>: Sync {
    type AllValues: Entities<F> + Default + Clone + Send + Sync;

    fn circuit_size(&self) -> usize;

    /// Every stored column by name.
    fn columns(&self) -> Vec<(String, &[F])>;

    /// The columns whose shifts appear in a row, in the order of the shifted entities.
    fn to_be_shifted(&self) -> Vec<(String, &[F])>;

    /// Writes row `index` and the shifts at `index` into `row`.
    fn fill_row(&self, row: &mut Self::AllValues, index: usize);

    fn row(&self, index: usize) -> Self::AllValues {
        let mut row = Self::AllValues::default();
        self.fill_row(&mut row, index);
        row
    }

    /// Checks the layout invariants every relation relies on.
    fn validate(&self) -> RelationResult<()> {
        let circuit_size = self.circuit_size();
        if !circuit_size.is_power_of_two() {
            return Err(RelationError::CircuitSizeNotPowerOfTwo(circuit_size));
        }
        for (column, values) in self.columns() {
            if values.len() != circuit_size {
                return Err(RelationError::ColumnLengthMismatch {
                    column,
                    expected: circuit_size,
                    actual: values.len(),
                });
            }
        }
        Ok(())
    }

    /// Every to-be-shifted column has to vanish at row 0 before a grand product is built over the trace.
    fn check_shifted_start(&self) -> RelationResult<()> {
        for (column, values) in self.to_be_shifted() {
            if values.first().is_some_and(|value| !value.is_zero()) {
                return Err(RelationError::NonZeroShiftedStart(column));
            }
        }
        Ok(())
    }
}

pub(crate) fn named_columns<F, E: Entities<Vec<F>>>(entities: &E) -> Vec<(String, &[F])> {
    E::names()
        .into_iter()
        .zip(entities.iter())
        .map(|(name, column)| (name, column.as_slice()))
        .collect()
}

/// The per-relation accumulators of one flavor.
pub trait RelationAccumulators<F: PrimeField>: Default + Clone + Send {
    /// Every relation's tally, in flavor order.
    fn evaluations(&self) -> Vec<(RelationKind, &[F])>;

    fn evaluations_mut(&mut self) -> Vec<&mut [F]>;

    fn add_assign(&mut self, other: &Self) {
        for (lhs, (_, rhs)) in self.evaluations_mut().into_iter().zip(other.evaluations()) {
            for (l, r) in lhs.iter_mut().zip(rhs.iter()) {
                *l += r;
            }
        }
    }

    fn is_zero(&self) -> bool {
        self.evaluations()
            .iter()
            .all(|(_, evals)| evals.iter().all(|e| e.is_zero()))
    }

    fn get(&self, kind: RelationKind) -> Option<&[F]> {
        self.evaluations()
            .into_iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, evals)| evals)
    }

    /// All subrelation values in one sequence, relation by relation.
    fn concatenated(&self) -> Vec<F> {
        self.evaluations()
            .into_iter()
            .flat_map(|(_, evals)| evals.iter().copied())
            .collect()
    }
}
