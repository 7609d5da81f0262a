//! Relations of the translator flavor, all read [`TranslatorAllValues`](crate::flavor::TranslatorAllValues).

pub mod accumulator_transfer_relation;
pub mod decomposition_relation;
pub mod gen_perm_sort_relation;
pub mod non_native_field_relation;
pub mod opcode_constraint_relation;
pub mod permutation_relation;

pub use accumulator_transfer_relation::{
    TranslatorAccumulatorTransferRelation, TranslatorAccumulatorTransferRelationAcc,
};
pub use decomposition_relation::{
    TranslatorDecompositionRelation, TranslatorDecompositionRelationAcc,
};
pub use gen_perm_sort_relation::{TranslatorGenPermSortRelation, TranslatorGenPermSortRelationAcc};
pub use non_native_field_relation::{
    TranslatorNonNativeFieldRelation, TranslatorNonNativeFieldRelationAcc,
};
pub use opcode_constraint_relation::{
    TranslatorOpcodeConstraintRelation, TranslatorOpcodeConstraintRelationAcc,
};
pub use permutation_relation::{TranslatorPermutationRelation, TranslatorPermutationRelationAcc};
