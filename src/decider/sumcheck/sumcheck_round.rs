use crate::{
    decider::{
        relations::{Relation, RelationKind},
        types::{GateSeparatorPolynomial, RelationParameters},
        univariate::Univariate,
    },
    error::{RelationError, RelationResult},
    flavor::{AllValues, Flavor, ProverPolynomials, RelationAccumulators},
    honk_curve::HonkCurve,
    types::Entities,
};
use ark_ff::{One, PrimeField};
use std::ops::Range;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Lower bound on the rows a single rayon task accumulates before its tally is reduced.
pub const MIN_ROWS_PER_THREAD: usize = 64;

/// Number of points an edge is extended to when checking relation degrees, larger than every relation length.
pub const MAX_DEGREE_CHECK_LENGTH: usize = 12;

pub(crate) fn accumulate_one_relation<P: HonkCurve, R: Relation<P>>(
    univariate_accumulator: &mut R::Acc,
    input: &R::Row,
    relation_parameters: &RelationParameters<P::ScalarField>,
    scaling_factor: &P::ScalarField,
) {
    if R::SKIPPABLE && R::skip(input) {
        return;
    }

    R::accumulate(
        univariate_accumulator,
        input,
        relation_parameters,
        scaling_factor,
    );
}

fn check_row_range(rows: &Range<usize>, circuit_size: usize) -> RelationResult<()> {
    if rows.start > rows.end || rows.end > circuit_size {
        return Err(RelationError::InvalidRowRange {
            start: rows.start,
            end: rows.end,
            circuit_size,
        });
    }
    Ok(())
}

/// The `len` rows starting at `start`, which all have to lie in the circuit.
fn rows_from(start: usize, len: usize, circuit_size: usize) -> RelationResult<Range<usize>> {
    let end = start
        .checked_add(len)
        .ok_or(RelationError::InvalidRowRange {
            start,
            end: usize::MAX,
            circuit_size,
        })?;
    let rows = start..end;
    check_row_range(&rows, circuit_size)?;
    Ok(rows)
}

/**
 * @brief Accumulates every relation of the flavor over the rows in `rows`, each row scaled by `scaling_factor`.
 * @details The polynomial set is validated before any row is read. The rows are split into chunks of at least
 * MIN_ROWS_PER_THREAD rows, every chunk is tallied into a private accumulator and the tallies are summed. Field
 * addition is commutative, so the result does not depend on the partition.
 */
pub fn accumulate_relation_evaluations<P: HonkCurve, Fl: Flavor<P>>(
    polys: &Fl::ProverPolynomials,
    rows: Range<usize>,
    relation_parameters: &RelationParameters<P::ScalarField>,
    scaling_factor: &P::ScalarField,
) -> RelationResult<Fl::RelationAcc> {
    tracing::debug!(
        "Accumulate {} relations over rows {}..{}",
        Fl::NAME,
        rows.start,
        rows.end
    );
    polys.validate()?;
    check_row_range(&rows, polys.circuit_size())?;

    Ok(accumulate_range::<P, Fl, _>(
        polys,
        rows,
        relation_parameters,
        |_| *scaling_factor,
    ))
}

/// Like [accumulate_relation_evaluations], but every row is scaled by its gate separator weight.
pub fn accumulate_relation_evaluations_with_gate_separators<P: HonkCurve, Fl: Flavor<P>>(
    polys: &Fl::ProverPolynomials,
    rows: Range<usize>,
    relation_parameters: &RelationParameters<P::ScalarField>,
    gate_separators: &GateSeparatorPolynomial<P::ScalarField>,
) -> RelationResult<Fl::RelationAcc> {
    tracing::debug!(
        "Accumulate {} relations over rows {}..{} with gate separators",
        Fl::NAME,
        rows.start,
        rows.end
    );
    polys.validate()?;
    let circuit_size = polys.circuit_size();
    if gate_separators.len() != circuit_size {
        return Err(RelationError::GateSeparatorSizeMismatch {
            expected: circuit_size,
            actual: gate_separators.len(),
        });
    }
    check_row_range(&rows, circuit_size)?;

    Ok(accumulate_range::<P, Fl, _>(
        polys,
        rows,
        relation_parameters,
        |row| *gate_separators.row_weight(row),
    ))
}

/// Sequentially accumulates the given rows in the given order.
pub fn accumulate_rows<P: HonkCurve, Fl: Flavor<P>>(
    polys: &Fl::ProverPolynomials,
    rows: impl IntoIterator<Item = usize>,
    relation_parameters: &RelationParameters<P::ScalarField>,
    scaling_factor: &P::ScalarField,
) -> RelationResult<Fl::RelationAcc> {
    polys.validate()?;
    let circuit_size = polys.circuit_size();

    let mut univariate_accumulators = Fl::RelationAcc::default();
    let mut row = AllValues::<P, Fl>::default();
    for index in rows {
        rows_from(index, 1, circuit_size)?;
        polys.fill_row(&mut row, index);
        Fl::accumulate_relations(
            &mut univariate_accumulators,
            &row,
            relation_parameters,
            scaling_factor,
        );
    }
    Ok(univariate_accumulators)
}

#[cfg(feature = "parallel")]
fn accumulate_range<P, Fl, S>(
    polys: &Fl::ProverPolynomials,
    rows: Range<usize>,
    relation_parameters: &RelationParameters<P::ScalarField>,
    scaling: S,
) -> Fl::RelationAcc
where
    P: HonkCurve,
    Fl: Flavor<P>,
    S: Fn(usize) -> P::ScalarField + Sync + Send,
{
    rows.into_par_iter()
        .with_min_len(MIN_ROWS_PER_THREAD)
        .fold(
            || (AllValues::<P, Fl>::default(), Fl::RelationAcc::default()),
            |(mut row, mut univariate_accumulators), index| {
                polys.fill_row(&mut row, index);
                Fl::accumulate_relations(
                    &mut univariate_accumulators,
                    &row,
                    relation_parameters,
                    &scaling(index),
                );
                (row, univariate_accumulators)
            },
        )
        .map(|(_, univariate_accumulators)| univariate_accumulators)
        .reduce(Fl::RelationAcc::default, |mut lhs, rhs| {
            lhs.add_assign(&rhs);
            lhs
        })
}

#[cfg(not(feature = "parallel"))]
fn accumulate_range<P, Fl, S>(
    polys: &Fl::ProverPolynomials,
    rows: Range<usize>,
    relation_parameters: &RelationParameters<P::ScalarField>,
    scaling: S,
) -> Fl::RelationAcc
where
    P: HonkCurve,
    Fl: Flavor<P>,
    S: Fn(usize) -> P::ScalarField + Sync + Send,
{
    let mut univariate_accumulators = Fl::RelationAcc::default();
    let mut row = AllValues::<P, Fl>::default();
    for index in rows {
        polys.fill_row(&mut row, index);
        Fl::accumulate_relations(
            &mut univariate_accumulators,
            &row,
            relation_parameters,
            &scaling(index),
        );
    }
    univariate_accumulators
}

/// Extends every entity of the edge `(current, next)` to the univariate through both values.
fn extend_edges<F: PrimeField, E: Entities<F>>(
    current: &E,
    next: &E,
) -> Vec<Univariate<F, MAX_DEGREE_CHECK_LENGTH>> {
    tracing::trace!("Extend edges");

    current
        .iter()
        .zip(next.iter())
        .map(|(src_0, src_1)| {
            let mut des = Univariate::default();
            des.extend_from(&[*src_0, *src_1]);
            des
        })
        .collect()
}

/**
 * @brief Measures the degree of every subrelation along the edge starting at `edge_index`.
 * @details Every column is replaced by the line through its values at `edge_index` and `edge_index + 1`, as sumcheck
 * does when it extends an edge. Each relation is then evaluated at MAX_DEGREE_CHECK_LENGTH points of that line and
 * the degree of the resulting univariate is read off by finite differences. A subrelation whose degree exceeds its
 * declared bound is reported as DegreeOverflow. The measured degrees are returned per relation in flavor order,
 * `None` marking a subrelation that vanishes on the whole line.
 */
pub fn check_degree_bounds<P: HonkCurve, Fl: Flavor<P>>(
    polys: &Fl::ProverPolynomials,
    edge_index: usize,
    relation_parameters: &RelationParameters<P::ScalarField>,
) -> RelationResult<Vec<(RelationKind, Vec<Option<usize>>)>> {
    tracing::debug!("Check {} degree bounds at edge {edge_index}", Fl::NAME);
    polys.validate()?;
    let edge = rows_from(edge_index, 2, polys.circuit_size())?;

    let current = polys.row(edge.start);
    let next = polys.row(edge.start + 1);
    let extended_edges = extend_edges(&current, &next);

    let point_accumulators = (0..MAX_DEGREE_CHECK_LENGTH)
        .map(|point| {
            let mut row = AllValues::<P, Fl>::default();
            for (des, src) in row.iter_mut().zip(extended_edges.iter()) {
                *des = src.evaluations[point];
            }
            let mut univariate_accumulators = Fl::RelationAcc::default();
            Fl::accumulate_relations(
                &mut univariate_accumulators,
                &row,
                relation_parameters,
                &P::ScalarField::one(),
            );
            univariate_accumulators
        })
        .collect::<Vec<_>>();
    let point_evaluations = point_accumulators
        .iter()
        .map(|acc| acc.evaluations())
        .collect::<Vec<_>>();

    let mut degrees = Vec::with_capacity(Fl::RELATIONS.len());
    for (relation_index, (kind, evaluations)) in point_evaluations[0].iter().enumerate() {
        let bounds = kind.degree_bounds();
        let mut relation_degrees = Vec::with_capacity(evaluations.len());
        for (subrelation, bound) in bounds.iter().enumerate() {
            let univariate = Univariate::<P::ScalarField, MAX_DEGREE_CHECK_LENGTH>::new(
                std::array::from_fn(|point| point_evaluations[point][relation_index].1[subrelation]),
            );
            let degree = univariate.degree();
            tracing::trace!("{kind} subrelation {subrelation} has degree {degree:?}");
            if let Some(degree) = degree.filter(|degree| degree > bound) {
                return Err(RelationError::DegreeOverflow {
                    relation: *kind,
                    subrelation,
                    degree,
                    bound: *bound,
                });
            }
            relation_degrees.push(degree);
        }
        degrees.push((*kind, relation_degrees));
    }
    Ok(degrees)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flavor::{UltraFlavor, UltraProverPolynomials};
    use ark_bn254::{Bn254, Fr};
    use ark_ff::{UniformRand, Zero};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    /// Two arithmetic gates `3 + 4 - 7 = 0` on rows 0 and 1, then padding.
    fn addition_trace() -> UltraProverPolynomials<Fr> {
        let mut polys = UltraProverPolynomials::new(4);
        for row in 0..2 {
            polys.precomputed.q_arith[row] = Fr::one();
            polys.precomputed.q_l[row] = Fr::one();
            polys.precomputed.q_r[row] = Fr::one();
            polys.precomputed.q_o[row] = -Fr::one();
            polys.witness.w_l[row] = Fr::from(3u64);
            polys.witness.w_r[row] = Fr::from(4u64);
            polys.witness.w_o[row] = Fr::from(7u64);
        }
        polys
    }

    #[test]
    fn arithmetic_gate_scenario() {
        let params = RelationParameters::<Fr>::default();
        let mut polys = addition_trace();

        let acc = accumulate_relation_evaluations::<Bn254, UltraFlavor>(
            &polys,
            0..4,
            &params,
            &Fr::one(),
        )
        .unwrap();
        assert!(acc.r_arith.is_zero());

        polys.witness.w_o[0] = Fr::from(8u64);
        let acc = accumulate_relation_evaluations::<Bn254, UltraFlavor>(
            &polys,
            0..1,
            &params,
            &Fr::one(),
        )
        .unwrap();
        assert_eq!(acc.r_arith[0], -Fr::one());
        assert!(acc.r_arith[1].is_zero());
    }

    #[test]
    fn row_range_is_checked() {
        let params = RelationParameters::<Fr>::default();
        let polys = addition_trace();

        let err = accumulate_relation_evaluations::<Bn254, UltraFlavor>(
            &polys,
            2..5,
            &params,
            &Fr::one(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RelationError::InvalidRowRange {
                start: 2,
                end: 5,
                circuit_size: 4
            }
        ));
        assert!(
            accumulate_rows::<Bn254, UltraFlavor>(&polys, [0, 4], &params, &Fr::one()).is_err()
        );
        let err = accumulate_rows::<Bn254, UltraFlavor>(&polys, [usize::MAX], &params, &Fr::one())
            .unwrap_err();
        assert!(matches!(
            err,
            RelationError::InvalidRowRange {
                start: usize::MAX,
                circuit_size: 4,
                ..
            }
        ));

        let empty = accumulate_relation_evaluations::<Bn254, UltraFlavor>(
            &polys,
            3..3,
            &params,
            &Fr::one(),
        )
        .unwrap();
        assert!(empty.is_zero());
    }

    #[test]
    fn gate_separator_weights_scale_rows() {
        let mut rng = ChaCha12Rng::seed_from_u64(11);
        let params = RelationParameters::<Fr>::default();
        let mut polys = addition_trace();
        polys.witness.w_o[1] = Fr::from(9u64);

        let betas = vec![Fr::rand(&mut rng), Fr::rand(&mut rng)];
        let separator = GateSeparatorPolynomial::new(betas);
        let acc = accumulate_relation_evaluations_with_gate_separators::<Bn254, UltraFlavor>(
            &polys,
            0..4,
            &params,
            &separator,
        )
        .unwrap();
        assert_eq!(acc.r_arith[0], -Fr::from(2u64) * separator.row_weight(1));

        let short = GateSeparatorPolynomial::new(vec![Fr::one()]);
        let err = accumulate_relation_evaluations_with_gate_separators::<Bn254, UltraFlavor>(
            &polys,
            0..4,
            &params,
            &short,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RelationError::GateSeparatorSizeMismatch {
                expected: 4,
                actual: 2
            }
        ));
    }

    #[test]
    fn degrees_stay_within_bounds_on_random_edges() {
        let mut rng = ChaCha12Rng::seed_from_u64(12);
        let params = RelationParameters::<Fr>::get_random(&mut rng);
        let mut polys = UltraProverPolynomials::<Fr>::new(8);
        for column in polys.precomputed.iter_mut().chain(polys.witness.iter_mut()) {
            for value in column.iter_mut().skip(1) {
                *value = Fr::rand(&mut rng);
            }
        }

        let degrees = check_degree_bounds::<Bn254, UltraFlavor>(&polys, 2, &params).unwrap();
        assert_eq!(degrees.len(), 6);
        let (kind, arith) = &degrees[0];
        assert_eq!(*kind, RelationKind::UltraArithmetic);
        assert!(arith.iter().all(|degree| degree.is_some()));

        assert!(check_degree_bounds::<Bn254, UltraFlavor>(&polys, 7, &params).is_err());
        for edge_index in [8, usize::MAX - 1, usize::MAX] {
            assert!(matches!(
                check_degree_bounds::<Bn254, UltraFlavor>(&polys, edge_index, &params),
                Err(RelationError::InvalidRowRange { start, circuit_size: 8, .. }) if start == edge_index
            ));
        }
    }
}
