use super::{
    named_columns, Flavor, ProverPolynomials, RelationAccumulators, UltraAllValues, UltraFlavor,
    UltraProverPolynomials, UltraRelationAcc,
};
use crate::{
    decider::{
        relations::{
            ecc_op_queue_relation::EccOpQueueRelationAcc, EccOpQueueRelation, RelationKind,
        },
        sumcheck::sumcheck_round::accumulate_one_relation,
        types::RelationParameters,
    },
    error::RelationResult,
    honk_curve::HonkCurve,
    types::{define_entities, take_columns, Entities},
};
use ark_ff::{PrimeField, Zero};
use std::collections::HashMap;

define_entities! {
    /// The ECC op queue wires and the selector of the rows they are copied into.
    pub struct EccOpEntities<T> {
        ecc_op_wire_1, ecc_op_wire_2, ecc_op_wire_3, ecc_op_wire_4, lagrange_ecc_op,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GoblinUltraAllValues<F> {
    pub ultra: UltraAllValues<F>,
    pub ecc_op: EccOpEntities<F>,
}

impl<T> Entities<T> for GoblinUltraAllValues<T> {
    fn names() -> Vec<String> {
        let mut names = UltraAllValues::<T>::names();
        names.extend(EccOpEntities::<T>::names());
        names
    }

    fn iter(&self) -> std::vec::IntoIter<&T> {
        self.ultra
            .iter()
            .chain(self.ecc_op.iter())
            .collect::<Vec<_>>()
            .into_iter()
    }

    fn iter_mut(&mut self) -> std::vec::IntoIter<&mut T> {
        self.ultra
            .iter_mut()
            .chain(self.ecc_op.iter_mut())
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl<T> AsRef<UltraAllValues<T>> for GoblinUltraAllValues<T> {
    fn as_ref(&self) -> &UltraAllValues<T> {
        &self.ultra
    }
}

#[derive(Clone, Debug, Default)]
pub struct GoblinUltraProverPolynomials<F: PrimeField> {
    pub ultra: UltraProverPolynomials<F>,
    pub ecc_op: EccOpEntities<Vec<F>>,
}

impl<F: PrimeField> GoblinUltraProverPolynomials<F> {
    pub fn new(circuit_size: usize) -> Self {
        let mut ecc_op = EccOpEntities::default();
        for column in ecc_op.iter_mut() {
            *column = vec![F::zero(); circuit_size];
        }
        Self {
            ultra: UltraProverPolynomials::new(circuit_size),
            ecc_op,
        }
    }

    pub fn from_columns(mut columns: HashMap<String, Vec<F>>) -> RelationResult<Self> {
        let mut polys = Self::default();
        take_columns(GoblinUltraFlavor::NAME, &mut polys.ultra.precomputed, &mut columns)?;
        take_columns(GoblinUltraFlavor::NAME, &mut polys.ultra.witness, &mut columns)?;
        take_columns(GoblinUltraFlavor::NAME, &mut polys.ecc_op, &mut columns)?;
        polys.validate()?;
        Ok(polys)
    }
}

impl<F: PrimeField> ProverPolynomials<F> for GoblinUltraProverPolynomials<F> {
    type AllValues = GoblinUltraAllValues<F>;

    fn circuit_size(&self) -> usize {
        self.ultra.circuit_size()
    }

    fn columns(&self) -> Vec<(String, &[F])> {
        let mut columns = self.ultra.columns();
        columns.extend(named_columns(&self.ecc_op));
        columns
    }

    fn to_be_shifted(&self) -> Vec<(String, &[F])> {
        self.ultra.to_be_shifted()
    }

    fn fill_row(&self, row: &mut Self::AllValues, index: usize) {
        self.ultra.fill_row(&mut row.ultra, index);
        row.ecc_op.copy_row(&self.ecc_op, index);
    }
}

#[derive(Clone, Debug, Default)]
pub struct GoblinUltraRelationAcc<F: PrimeField> {
    pub ultra: UltraRelationAcc<F>,
    pub r_ecc_op: EccOpQueueRelationAcc<F>,
}

impl<F: PrimeField> RelationAccumulators<F> for GoblinUltraRelationAcc<F> {
    fn evaluations(&self) -> Vec<(RelationKind, &[F])> {
        let mut evaluations = self.ultra.evaluations();
        evaluations.push((RelationKind::EccOpQueue, self.r_ecc_op.evaluations()));
        evaluations
    }

    fn evaluations_mut(&mut self) -> Vec<&mut [F]> {
        let mut evaluations = self.ultra.evaluations_mut();
        evaluations.push(self.r_ecc_op.evaluations_mut());
        evaluations
    }
}

/// The Ultra relations plus the transfer of ECC operations into the op queue wires.
#[derive(Clone, Copy, Debug, Default)]
pub struct GoblinUltraFlavor;

impl GoblinUltraFlavor {
    pub const NAME: &'static str = "GoblinUltra";
}

impl<P: HonkCurve> Flavor<P> for GoblinUltraFlavor {
    const NAME: &'static str = GoblinUltraFlavor::NAME;
    const RELATIONS: &'static [RelationKind] = &[
        RelationKind::UltraArithmetic,
        RelationKind::UltraPermutation,
        RelationKind::Lookup,
        RelationKind::GenPermSort,
        RelationKind::Elliptic,
        RelationKind::Auxiliary,
        RelationKind::EccOpQueue,
    ];

    type ProverPolynomials = GoblinUltraProverPolynomials<P::ScalarField>;
    type RelationAcc = GoblinUltraRelationAcc<P::ScalarField>;

    fn accumulate_relations(
        univariate_accumulators: &mut Self::RelationAcc,
        input: &GoblinUltraAllValues<P::ScalarField>,
        relation_parameters: &RelationParameters<P::ScalarField>,
        scaling_factor: &P::ScalarField,
    ) {
        <UltraFlavor as Flavor<P>>::accumulate_relations(
            &mut univariate_accumulators.ultra,
            &input.ultra,
            relation_parameters,
            scaling_factor,
        );
        accumulate_one_relation::<P, EccOpQueueRelation>(
            &mut univariate_accumulators.r_ecc_op,
            input,
            relation_parameters,
            scaling_factor,
        );
    }
}
