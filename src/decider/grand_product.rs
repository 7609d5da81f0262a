use super::{relations::Relation, types::RelationParameters};
use crate::{
    error::{RelationError, RelationResult},
    flavor::{AllValues, Flavor, ProverPolynomials},
    honk_curve::HonkCurve,
};
use ark_ff::{batch_inversion, Field, One, PrimeField, Zero};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A relation enforcing a grand product `z` with `z_shift * D = z * N` between consecutive rows.
pub trait GrandProductRelation<P: HonkCurve>: Relation<P> {
    fn compute_grand_product_numerator(
        input: &Self::Row,
        relation_parameters: &RelationParameters<P::ScalarField>,
    ) -> P::ScalarField;

    fn compute_grand_product_denominator(
        input: &Self::Row,
        relation_parameters: &RelationParameters<P::ScalarField>,
    ) -> P::ScalarField;
}

/// A grand product column together with the product over every row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrandProduct<F> {
    /// `z[0] = 0` and `z[i + 1] = (z[i] + L_first[i]) * N_i / D_i`.
    pub z: Vec<F>,
    /// `∏ N_i / D_i` over all rows, the value the delta of the relation has to match.
    pub product: F,
}

/**
 * @brief Computes the grand product column of relation `R` over the trace `polys`.
 * @details The numerator and denominator only read columns other than the grand product itself, so they can be
 * evaluated for every row up front. The denominators are inverted in one batch. With lagrange_first selecting
 * row 0 the column is the running product shifted down by one row:
 *      z[i + 1] = ∏_{j <= i} N_j / D_j
 */
pub fn compute_grand_product<P, Fl, R>(
    polys: &Fl::ProverPolynomials,
    relation_parameters: &RelationParameters<P::ScalarField>,
) -> RelationResult<GrandProduct<P::ScalarField>>
where
    P: HonkCurve,
    Fl: Flavor<P>,
    R: GrandProductRelation<P>,
    AllValues<P, Fl>: AsRef<R::Row>,
{
    tracing::trace!("compute grand product of {}", R::KIND);
    polys.validate()?;
    polys.check_shifted_start()?;

    let circuit_size = polys.circuit_size();

    #[cfg(feature = "parallel")]
    let (numerators, mut denominators): (Vec<_>, Vec<_>) = (0..circuit_size)
        .into_par_iter()
        .map_init(AllValues::<P, Fl>::default, |row, index| {
            polys.fill_row(row, index);
            numerator_and_denominator::<P, R>(row.as_ref(), relation_parameters)
        })
        .unzip();

    #[cfg(not(feature = "parallel"))]
    let (numerators, mut denominators): (Vec<_>, Vec<_>) = {
        let mut row = AllValues::<P, Fl>::default();
        (0..circuit_size)
            .map(|index| {
                polys.fill_row(&mut row, index);
                numerator_and_denominator::<P, R>(row.as_ref(), relation_parameters)
            })
            .unzip()
    };

    if let Some(row) = denominators.iter().position(|d| d.is_zero()) {
        return Err(RelationError::ZeroDenominator { row });
    }
    batch_inversion(&mut denominators);

    let mut z = Vec::with_capacity(circuit_size);
    let mut product = P::ScalarField::one();
    for (numerator, denominator_inverse) in numerators.iter().zip(denominators.iter()) {
        z.push(product);
        product *= *numerator * denominator_inverse;
    }
    if let Some(first) = z.first_mut() {
        *first = P::ScalarField::zero();
    }

    tracing::debug!("grand product of {} over {circuit_size} rows", R::KIND);
    Ok(GrandProduct { z, product })
}

fn numerator_and_denominator<P: HonkCurve, R: GrandProductRelation<P>>(
    row: &R::Row,
    relation_parameters: &RelationParameters<P::ScalarField>,
) -> (P::ScalarField, P::ScalarField) {
    (
        R::compute_grand_product_numerator(row, relation_parameters),
        R::compute_grand_product_denominator(row, relation_parameters),
    )
}

/**
 * @brief Computes the delta the permutation grand product has to end at.
 * @details The public inputs sit in the second wire at rows `offset, offset + 1, ...`. Their copy constraint
 * identities are `circuit_size + row` while their sigmas point to the fictitious values `-(row + 1)`, which
 * leaves the factor
 *      ∏ (γ + x_i + β(n + offset + i)) / (γ + x_i - β(offset + 1 + i))
 * in the grand product. A vanishing denominator factor is reported with the row of its public input.
 */
pub fn compute_public_input_delta<F: PrimeField>(
    public_inputs: &[F],
    beta: F,
    gamma: F,
    circuit_size: usize,
    offset: usize,
) -> RelationResult<F> {
    tracing::trace!("computing public input delta");
    let mut numerator = F::ONE;
    let mut denominator = F::ONE;
    let mut numerator_acc = gamma + (beta * F::from(circuit_size as u64 + offset as u64));
    let mut denominator_acc = gamma - beta * F::from(1 + offset as u64);
    for (i, input) in public_inputs.iter().enumerate() {
        let denominator_factor = denominator_acc + input;
        if denominator_factor.is_zero() {
            return Err(RelationError::ZeroDenominator { row: offset + i });
        }
        numerator *= numerator_acc + input;
        denominator *= denominator_factor;
        numerator_acc += beta;
        denominator_acc -= beta;
    }
    let denominator_inverse = denominator
        .inverse()
        .ok_or(RelationError::ZeroDenominator { row: offset })?;
    Ok(numerator * denominator_inverse)
}

/// `(γ(1 + β))^n`, the lookup grand product delta of a domain of `domain_size` rows.
pub fn compute_lookup_grand_product_delta<F: Field>(beta: F, gamma: F, domain_size: usize) -> F {
    let gamma_by_one_plus_beta = gamma * (F::one() + beta);
    gamma_by_one_plus_beta.pow([domain_size as u64])
}
