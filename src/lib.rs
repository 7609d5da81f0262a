pub mod decider;
pub mod error;
pub mod field_convert;
pub mod flavor;
pub mod honk_curve;
pub mod translator_builder;
mod types;

pub use decider::{
    grand_product::{
        compute_grand_product, compute_lookup_grand_product_delta, compute_public_input_delta,
        GrandProduct, GrandProductRelation,
    },
    relations::{Relation, RelationKind, SubrelationAccumulator},
    sumcheck::{
        accumulate_relation_evaluations, accumulate_relation_evaluations_with_gate_separators,
        accumulate_rows, check_degree_bounds, MAX_DEGREE_CHECK_LENGTH, MIN_ROWS_PER_THREAD,
    },
    types::{gate_separator_sum, GateSeparatorPolynomial, RelationParameters},
    univariate::Univariate,
};
pub use error::{RelationError, RelationResult};
pub use flavor::{
    AllValues, Flavor, GoblinUltraFlavor, ProverPolynomials, RelationAccumulators,
    TranslatorFlavor, UltraFlavor,
};
pub use honk_curve::HonkCurve;
pub use translator_builder::TranslatorCircuitBuilder;
pub use types::Entities;
