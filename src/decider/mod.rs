pub mod grand_product;
pub mod relations;
pub mod sumcheck;
pub mod types;
pub mod univariate;
