use crate::decider::relations::RelationKind;

pub type RelationResult<T> = std::result::Result<T, RelationError>;

/// The errors that may arise while assembling a trace or accumulating relations over it.
#[derive(Debug, thiserror::Error)]
pub enum RelationError {
    /// A column the flavor requires was not provided.
    #[error("{flavor} trace is missing column {column}")]
    MissingColumn { flavor: &'static str, column: String },
    /// A column does not span the whole circuit.
    #[error("column {column} has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("circuit size {0} is not a power of two")]
    CircuitSizeNotPowerOfTwo(usize),
    /// A column that is read through its shift must vanish at row 0.
    #[error("to-be-shifted column {0} is not zero at row 0")]
    NonZeroShiftedStart(String),
    #[error("row range {start}..{end} is not contained in a circuit of size {circuit_size}")]
    InvalidRowRange {
        start: usize,
        end: usize,
        circuit_size: usize,
    },
    #[error("gate separator covers {actual} rows, the circuit has {expected}")]
    GateSeparatorSizeMismatch { expected: usize, actual: usize },
    /// A grand product denominator vanished, the challenges are degenerate for this trace.
    #[error("grand product denominator vanishes at row {row}")]
    ZeroDenominator { row: usize },
    /// The translator minicircuit holds two rows per operation after a zero row.
    #[error("{operations} operations exceed the capacity {capacity} of a translator circuit of size {circuit_size}")]
    MiniCircuitOverflow {
        operations: usize,
        capacity: usize,
        circuit_size: usize,
    },
    #[error("translator circuit needs at least {required} rows, got {actual}")]
    CircuitTooSmall { required: usize, actual: usize },
    #[error("{relation:?} subrelation {subrelation} has degree {degree}, bound is {bound}")]
    DegreeOverflow {
        relation: RelationKind,
        subrelation: usize,
        degree: usize,
        bound: usize,
    },
}
