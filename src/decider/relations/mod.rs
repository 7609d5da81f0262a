pub mod auxiliary_relation;
pub mod ecc_op_queue_relation;
pub mod elliptic_relation;
pub mod gen_perm_sort_relation;
pub mod lookup_relation;
pub mod permutation_relation;
pub mod translator;
pub mod ultra_arithmetic_relation;

pub use auxiliary_relation::AuxiliaryRelation;
pub use ecc_op_queue_relation::EccOpQueueRelation;
pub use elliptic_relation::EllipticRelation;
pub use gen_perm_sort_relation::GenPermSortRelation;
pub use lookup_relation::LookupRelation;
pub use permutation_relation::UltraPermutationRelation;
pub use translator::{
    TranslatorAccumulatorTransferRelation, TranslatorDecompositionRelation,
    TranslatorGenPermSortRelation, TranslatorNonNativeFieldRelation,
    TranslatorOpcodeConstraintRelation, TranslatorPermutationRelation,
};
pub use ultra_arithmetic_relation::UltraArithmeticRelation;

use super::types::RelationParameters;
use crate::honk_curve::HonkCurve;
use ark_ff::{PrimeField, Zero};
use std::ops::{AddAssign, Index, IndexMut};

/// A family of subrelations evaluated on one row of the trace.
///
/// `accumulate` adds `scaling_factor` times the value of every subrelation into the matching
/// slot of the accumulator. All subrelations vanish on a row of a satisfying trace.
pub trait Relation<P: HonkCurve> {
    const KIND: RelationKind;
    const SKIPPABLE: bool;
    /// The row layout this relation reads.
    type Row;
    type Acc: Default;

    /// Whether every subrelation is known to vanish on this row.
    fn skip(input: &Self::Row) -> bool;

    fn accumulate(
        univariate_accumulator: &mut Self::Acc,
        input: &Self::Row,
        relation_parameters: &RelationParameters<P::ScalarField>,
        scaling_factor: &P::ScalarField,
    );
}

/// Per-relation tally with one slot per subrelation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubrelationAccumulator<F: PrimeField, const NUM: usize> {
    pub(crate) evaluations: [F; NUM],
}

impl<F: PrimeField, const NUM: usize> SubrelationAccumulator<F, NUM> {
    pub const NUM_SUBRELATIONS: usize = NUM;

    pub fn evaluations(&self) -> &[F] {
        &self.evaluations
    }

    pub(crate) fn evaluations_mut(&mut self) -> &mut [F] {
        &mut self.evaluations
    }

    pub fn is_zero(&self) -> bool {
        self.evaluations.iter().all(|e| e.is_zero())
    }
}

impl<F: PrimeField, const NUM: usize> Default for SubrelationAccumulator<F, NUM> {
    fn default() -> Self {
        Self {
            evaluations: [F::zero(); NUM],
        }
    }
}

impl<F: PrimeField, const NUM: usize> Index<usize> for SubrelationAccumulator<F, NUM> {
    type Output = F;

    fn index(&self, index: usize) -> &Self::Output {
        &self.evaluations[index]
    }
}

impl<F: PrimeField, const NUM: usize> IndexMut<usize> for SubrelationAccumulator<F, NUM> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.evaluations[index]
    }
}

impl<F: PrimeField, const NUM: usize> AddAssign<&Self> for SubrelationAccumulator<F, NUM> {
    fn add_assign(&mut self, rhs: &Self) {
        for (lhs, rhs) in self.evaluations.iter_mut().zip(rhs.evaluations.iter()) {
            *lhs += rhs;
        }
    }
}

/// The closed set of relations known to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelationKind {
    UltraArithmetic,
    UltraPermutation,
    Lookup,
    GenPermSort,
    Elliptic,
    Auxiliary,
    EccOpQueue,
    TranslatorDecomposition,
    TranslatorOpcodeConstraint,
    TranslatorAccumulatorTransfer,
    TranslatorNonNativeField,
    TranslatorGenPermSort,
    TranslatorPermutation,
}

impl RelationKind {
    pub fn name(&self) -> &'static str {
        match self {
            RelationKind::UltraArithmetic => "UltraArithmeticRelation",
            RelationKind::UltraPermutation => "UltraPermutationRelation",
            RelationKind::Lookup => "LookupRelation",
            RelationKind::GenPermSort => "GenPermSortRelation",
            RelationKind::Elliptic => "EllipticRelation",
            RelationKind::Auxiliary => "AuxiliaryRelation",
            RelationKind::EccOpQueue => "EccOpQueueRelation",
            RelationKind::TranslatorDecomposition => "GoblinTranslatorDecompositionRelation",
            RelationKind::TranslatorOpcodeConstraint => "GoblinTranslatorOpcodeConstraintRelation",
            RelationKind::TranslatorAccumulatorTransfer => {
                "GoblinTranslatorAccumulatorTransferRelation"
            }
            RelationKind::TranslatorNonNativeField => "GoblinTranslatorNonNativeFieldRelation",
            RelationKind::TranslatorGenPermSort => "GoblinTranslatorGenPermSortRelation",
            RelationKind::TranslatorPermutation => "GoblinTranslatorPermutationRelation",
        }
    }

    /// Degree bound plus one of every subrelation, in accumulator order.
    pub fn subrelation_partial_lengths(&self) -> &'static [usize] {
        match self {
            RelationKind::UltraArithmetic => &UltraArithmeticRelation::SUBRELATION_PARTIAL_LENGTHS,
            RelationKind::UltraPermutation => {
                &UltraPermutationRelation::SUBRELATION_PARTIAL_LENGTHS
            }
            RelationKind::Lookup => &LookupRelation::SUBRELATION_PARTIAL_LENGTHS,
            RelationKind::GenPermSort => &GenPermSortRelation::SUBRELATION_PARTIAL_LENGTHS,
            RelationKind::Elliptic => &EllipticRelation::SUBRELATION_PARTIAL_LENGTHS,
            RelationKind::Auxiliary => &AuxiliaryRelation::SUBRELATION_PARTIAL_LENGTHS,
            RelationKind::EccOpQueue => &EccOpQueueRelation::SUBRELATION_PARTIAL_LENGTHS,
            RelationKind::TranslatorDecomposition => {
                &TranslatorDecompositionRelation::SUBRELATION_PARTIAL_LENGTHS
            }
            RelationKind::TranslatorOpcodeConstraint => {
                &TranslatorOpcodeConstraintRelation::SUBRELATION_PARTIAL_LENGTHS
            }
            RelationKind::TranslatorAccumulatorTransfer => {
                &TranslatorAccumulatorTransferRelation::SUBRELATION_PARTIAL_LENGTHS
            }
            RelationKind::TranslatorNonNativeField => {
                &TranslatorNonNativeFieldRelation::SUBRELATION_PARTIAL_LENGTHS
            }
            RelationKind::TranslatorGenPermSort => {
                &TranslatorGenPermSortRelation::SUBRELATION_PARTIAL_LENGTHS
            }
            RelationKind::TranslatorPermutation => {
                &TranslatorPermutationRelation::SUBRELATION_PARTIAL_LENGTHS
            }
        }
    }

    pub fn num_subrelations(&self) -> usize {
        self.subrelation_partial_lengths().len()
    }

    /// Maximum total degree of every subrelation in the trace columns.
    pub fn degree_bounds(&self) -> Vec<usize> {
        self.subrelation_partial_lengths()
            .iter()
            .map(|len| len - 1)
            .collect()
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
