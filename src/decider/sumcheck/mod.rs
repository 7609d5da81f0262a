pub mod sumcheck_round;

pub use sumcheck_round::{
    accumulate_relation_evaluations, accumulate_relation_evaluations_with_gate_separators,
    accumulate_rows, check_degree_bounds, MAX_DEGREE_CHECK_LENGTH, MIN_ROWS_PER_THREAD,
};
