use super::{named_columns, Flavor, ProverPolynomials, RelationAccumulators};
use crate::{
    decider::{
        relations::{
            auxiliary_relation::AuxiliaryRelationAcc, elliptic_relation::EllipticRelationAcc,
            gen_perm_sort_relation::GenPermSortRelationAcc, lookup_relation::LookupRelationAcc,
            permutation_relation::UltraPermutationRelationAcc,
            ultra_arithmetic_relation::UltraArithmeticRelationAcc, AuxiliaryRelation,
            EllipticRelation, GenPermSortRelation, LookupRelation, RelationKind,
            UltraArithmeticRelation, UltraPermutationRelation,
        },
        sumcheck::sumcheck_round::accumulate_one_relation,
        types::RelationParameters,
    },
    error::RelationResult,
    honk_curve::HonkCurve,
    types::{define_entities, shifted_value, take_columns, Entities},
};
use ark_ff::PrimeField;
use std::collections::HashMap;

define_entities! {
    /// Selectors, copy constraint identities and permutations, lookup tables and Lagrange columns.
    pub struct UltraPrecomputedEntities<T> {
        q_m, q_c, q_l, q_r, q_o, q_4, q_arith, q_sort, q_elliptic, q_aux, q_lookup,
        sigma_1, sigma_2, sigma_3, sigma_4,
        id_1, id_2, id_3, id_4,
        table_1, table_2, table_3, table_4,
        lagrange_first, lagrange_last,
    }
}

define_entities! {
    pub struct UltraWitnessEntities<T> {
        w_l, w_r, w_o, w_4, sorted_accum, z_perm, z_lookup,
    }
}

define_entities! {
    /// Values of the to-be-shifted columns at the next row.
    pub struct UltraShiftedEntities<T> {
        table_1, table_2, table_3, table_4,
        w_l, w_r, w_o, w_4, sorted_accum, z_perm, z_lookup,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UltraAllEntities<T> {
    pub precomputed: UltraPrecomputedEntities<T>,
    pub witness: UltraWitnessEntities<T>,
    pub shifted: UltraShiftedEntities<T>,
}

pub type UltraAllValues<F> = UltraAllEntities<F>;

impl<T> Entities<T> for UltraAllEntities<T> {
    fn names() -> Vec<String> {
        UltraPrecomputedEntities::<T>::names()
            .into_iter()
            .chain(UltraWitnessEntities::<T>::names())
            .chain(
                UltraShiftedEntities::<T>::names()
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

impl<T> AsRef<UltraAllEntities<T>> for UltraAllEntities<T> {
    fn as_ref(&self) -> &UltraAllEntities<T> {
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct UltraProverPolynomials<F: PrimeField> {
    pub precomputed: UltraPrecomputedEntities<Vec<F>>,
    pub witness: UltraWitnessEntities<Vec<F>>,
}

impl<F: PrimeField> UltraProverPolynomials<F> {
    /// A trace of `circuit_size` all-zero rows.
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

    /// Assembles the trace from columns keyed by their entity names.
    pub fn from_columns(mut columns: HashMap<String, Vec<F>>) -> RelationResult<Self> {
        let mut polys = Self::default();
        take_columns(UltraFlavor::NAME, &mut polys.precomputed, &mut columns)?;
        take_columns(UltraFlavor::NAME, &mut polys.witness, &mut columns)?;
        polys.validate()?;
        Ok(polys)
    }

    pub(crate) fn fill_shifted(&self, shifted: &mut UltraShiftedEntities<F>, index: usize) {
        let precomputed = &self.precomputed;
        let witness = &self.witness;
        shifted.table_1 = shifted_value(&precomputed.table_1, index);
        shifted.table_2 = shifted_value(&precomputed.table_2, index);
        shifted.table_3 = shifted_value(&precomputed.table_3, index);
        shifted.table_4 = shifted_value(&precomputed.table_4, index);
        shifted.w_l = shifted_value(&witness.w_l, index);
        shifted.w_r = shifted_value(&witness.w_r, index);
        shifted.w_o = shifted_value(&witness.w_o, index);
        shifted.w_4 = shifted_value(&witness.w_4, index);
        shifted.sorted_accum = shifted_value(&witness.sorted_accum, index);
        shifted.z_perm = shifted_value(&witness.z_perm, index);
        shifted.z_lookup = shifted_value(&witness.z_lookup, index);
    }
}

impl<F: PrimeField> ProverPolynomials<F> for UltraProverPolynomials<F> {
    type AllValues = UltraAllValues<F>;

    fn circuit_size(&self) -> usize {
        self.precomputed.q_m.len()
    }

    fn columns(&self) -> Vec<(String, &[F])> {
        let mut columns = named_columns(&self.precomputed);
        columns.extend(named_columns(&self.witness));
        columns
    }

    fn to_be_shifted(&self) -> Vec<(String, &[F])> {
        let precomputed = &self.precomputed;
        let witness = &self.witness;
        [
            ("table_1", &precomputed.table_1),
            ("table_2", &precomputed.table_2),
            ("table_3", &precomputed.table_3),
            ("table_4", &precomputed.table_4),
            ("w_l", &witness.w_l),
            ("w_r", &witness.w_r),
            ("w_o", &witness.w_o),
            ("w_4", &witness.w_4),
            ("sorted_accum", &witness.sorted_accum),
            ("z_perm", &witness.z_perm),
            ("z_lookup", &witness.z_lookup),
        ]
        .into_iter()
        .map(|(name, column)| (name.to_string(), column.as_slice()))
        .collect()
    }

    fn fill_row(&self, row: &mut Self::AllValues, index: usize) {
        row.precomputed.copy_row(&self.precomputed, index);
        row.witness.copy_row(&self.witness, index);
        self.fill_shifted(&mut row.shifted, index);
    }
}

#[derive(Clone, Debug, Default)]
pub struct UltraRelationAcc<F: PrimeField> {
    pub r_arith: UltraArithmeticRelationAcc<F>,
    pub r_perm: UltraPermutationRelationAcc<F>,
    pub r_lookup: LookupRelationAcc<F>,
    pub r_sort: GenPermSortRelationAcc<F>,
    pub r_elliptic: EllipticRelationAcc<F>,
    pub r_aux: AuxiliaryRelationAcc<F>,
}

impl<F: PrimeField> RelationAccumulators<F> for UltraRelationAcc<F> {
    fn evaluations(&self) -> Vec<(RelationKind, &[F])> {
        vec![
            (RelationKind::UltraArithmetic, self.r_arith.evaluations()),
            (RelationKind::UltraPermutation, self.r_perm.evaluations()),
            (RelationKind::Lookup, self.r_lookup.evaluations()),
            (RelationKind::GenPermSort, self.r_sort.evaluations()),
            (RelationKind::Elliptic, self.r_elliptic.evaluations()),
            (RelationKind::Auxiliary, self.r_aux.evaluations()),
        ]
    }

    fn evaluations_mut(&mut self) -> Vec<&mut [F]> {
        vec![
            self.r_arith.evaluations_mut(),
            self.r_perm.evaluations_mut(),
            self.r_lookup.evaluations_mut(),
            self.r_sort.evaluations_mut(),
            self.r_elliptic.evaluations_mut(),
            self.r_aux.evaluations_mut(),
        ]
    }
}

/// Arithmetic, copy constraints, plookup, range, elliptic curve and memory gates.
#[derive(Clone, Copy, Debug, Default)]
pub struct UltraFlavor;

impl UltraFlavor {
    pub const NAME: &'static str = "Ultra";
}

impl<P: HonkCurve> Flavor<P> for UltraFlavor {
    const NAME: &'static str = UltraFlavor::NAME;
    const RELATIONS: &'static [RelationKind] = &[
        RelationKind::UltraArithmetic,
        RelationKind::UltraPermutation,
        RelationKind::Lookup,
        RelationKind::GenPermSort,
        RelationKind::Elliptic,
        RelationKind::Auxiliary,
    ];

    type ProverPolynomials = UltraProverPolynomials<P::ScalarField>;
    type RelationAcc = UltraRelationAcc<P::ScalarField>;

    fn accumulate_relations(
        univariate_accumulators: &mut Self::RelationAcc,
        input: &UltraAllValues<P::ScalarField>,
        relation_parameters: &RelationParameters<P::ScalarField>,
        scaling_factor: &P::ScalarField,
    ) {
        tracing::trace!("Accumulate relations");

        accumulate_one_relation::<P, UltraArithmeticRelation>(
            &mut univariate_accumulators.r_arith,
            input,
            relation_parameters,
            scaling_factor,
        );
        accumulate_one_relation::<P, UltraPermutationRelation>(
            &mut univariate_accumulators.r_perm,
            input,
            relation_parameters,
            scaling_factor,
        );
        accumulate_one_relation::<P, LookupRelation>(
            &mut univariate_accumulators.r_lookup,
            input,
            relation_parameters,
            scaling_factor,
        );
        accumulate_one_relation::<P, GenPermSortRelation>(
            &mut univariate_accumulators.r_sort,
            input,
            relation_parameters,
            scaling_factor,
        );
        accumulate_one_relation::<P, EllipticRelation>(
            &mut univariate_accumulators.r_elliptic,
            input,
            relation_parameters,
            scaling_factor,
        );
        accumulate_one_relation::<P, AuxiliaryRelation>(
            &mut univariate_accumulators.r_aux,
            input,
            relation_parameters,
            scaling_factor,
        );
    }
}
