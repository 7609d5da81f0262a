use crate::{
    error::{RelationError, RelationResult},
    field_convert::{limb_mask, NUM_BINARY_LIMBS, NUM_LIMB_BITS, NUM_MICRO_LIMB_BITS},
    flavor::{
        ProverPolynomials, TranslatorProverPolynomials, TranslatorWitnessEntities, MAX_MICRO_LIMB,
        NUM_CONCATENATED, NUM_LIMB_RANGE_CONSTRAINTS, NUM_ORDERED, SORT_STEP,
    },
    honk_curve::HonkCurve,
};
use ark_ff::{Field, One, PrimeField, Zero};
use itertools::izip;
use num_bigint::{BigInt, BigUint, Sign};

/// Ratio between the circuit size and the minicircuit size, the 78 microlimb columns of the minicircuit are
/// concatenated into four columns of 20.
const MINI_CIRCUIT_RATIO: usize = 32;
/// Number of microlimb columns concatenated into one column.
const MICRO_LIMB_COLUMNS_PER_CONCATENATION: usize = 20;
/// Range constrained binary limbs plus the relation carry.
const NUM_MICRO_LIMB_COLUMNS: usize = 13 * NUM_LIMB_RANGE_CONSTRAINTS;

/// One operation of the ECC op queue as the translator consumes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TranslatorOperation<Q> {
    pub op: u64,
    pub p_x: Q,
    pub p_y: Q,
    pub z_1: u128,
    pub z_2: u128,
}

/**
 * @brief Builds the GoblinTranslator trace of an ECC op queue.
 * @details The translator evaluates the op queue transcript as a batched polynomial over the base field:
 *      acc_k = acc_{k+1} * x + op_k + P_k.x * v + P_k.y * v^2 + z_1_k * v^3 + z_2_k * v^4 mod q
 * with acc_N = 0, and the result acc_0 is what the accumulator transfer relation compares with. Operation k
 * occupies the odd row 2k + 1 and the even row after it. The grand product column `z_perm` depends on the
 * challenges and is left to the caller.
 */
pub struct TranslatorCircuitBuilder<P: HonkCurve> {
    evaluation_input_x: P::BaseField,
    batching_challenge_v: P::BaseField,
    operations: Vec<TranslatorOperation<P::BaseField>>,
}

impl<P: HonkCurve> TranslatorCircuitBuilder<P> {
    pub fn new(evaluation_input_x: P::BaseField, batching_challenge_v: P::BaseField) -> Self {
        Self {
            evaluation_input_x,
            batching_challenge_v,
            operations: Vec::new(),
        }
    }

    pub fn queue_operation(
        &mut self,
        op: u64,
        p_x: P::BaseField,
        p_y: P::BaseField,
        z_1: u128,
        z_2: u128,
    ) {
        self.operations.push(TranslatorOperation {
            op,
            p_x,
            p_y,
            z_1,
            z_2,
        });
    }

    pub fn evaluation_input_x(&self) -> P::BaseField {
        self.evaluation_input_x
    }

    pub fn batching_challenge_v(&self) -> P::BaseField {
        self.batching_challenge_v
    }

    /// Number of operations a circuit of `circuit_size` rows holds.
    pub fn capacity(circuit_size: usize) -> usize {
        (circuit_size / MINI_CIRCUIT_RATIO).saturating_sub(1) / 2
    }

    /// The accumulator after the whole transcript.
    pub fn accumulated_result(&self) -> P::BaseField {
        let x = self.evaluation_input_x;
        let v = self.batching_challenge_v;
        let v_2 = v.square();
        let v_3 = v_2 * v;
        let v_4 = v_3 * v;

        self.operations
            .iter()
            .rev()
            .fold(P::BaseField::zero(), |acc, operation| {
                acc * x
                    + P::BaseField::from(operation.op)
                    + operation.p_x * v
                    + operation.p_y * v_2
                    + P::BaseField::from(operation.z_1) * v_3
                    + P::BaseField::from(operation.z_2) * v_4
            })
    }

    /**
     * @brief Assembles every column of the translator trace apart from `z_perm`.
     * @details The minicircuit takes the first `circuit_size / 32` rows. Its microlimb columns are concatenated into
     * four columns spanning the whole circuit. Together with the zero padding that keeps the sizes equal, the
     * concatenated values are sorted and split into five chunks, and every ordered column is one chunk merged with
     * the step sequence 0, 3, .., 2^14 - 1. The five copies of the step sequence go into the precomputed numerator
     * column so that the ordered columns are a permutation of the numerator side.
     */
    pub fn build(
        &self,
        circuit_size: usize,
    ) -> RelationResult<TranslatorProverPolynomials<P::ScalarField>> {
        tracing::debug!(
            "Build translator trace of {} operations over {circuit_size} rows",
            self.operations.len()
        );

        if !circuit_size.is_power_of_two() {
            return Err(RelationError::CircuitSizeNotPowerOfTwo(circuit_size));
        }
        let steps = sort_steps();
        let required = (steps.len() * NUM_ORDERED).next_power_of_two();
        if circuit_size < required {
            return Err(RelationError::CircuitTooSmall {
                required,
                actual: circuit_size,
            });
        }
        let capacity = Self::capacity(circuit_size);
        if self.operations.len() > capacity {
            return Err(RelationError::MiniCircuitOverflow {
                operations: self.operations.len(),
                capacity,
                circuit_size,
            });
        }
        let mini_circuit_size = circuit_size / MINI_CIRCUIT_RATIO;
        let last_mini_circuit_row = 2 * self.operations.len();

        let mut polys = TranslatorProverPolynomials::new(circuit_size);
        self.fill_operations(&mut polys.witness);

        let micro_limbs = fill_micro_limbs(&mut polys.witness, mini_circuit_size, last_mini_circuit_row);
        let concatenated = fill_concatenated(&mut polys.witness, &micro_limbs, mini_circuit_size);
        fill_ordered(&mut polys.witness, concatenated, &steps);

        let precomputed = &mut polys.precomputed;
        precomputed.lagrange_first[0] = P::ScalarField::one();
        precomputed.lagrange_last[circuit_size - 1] = P::ScalarField::one();
        for row in 1..=last_mini_circuit_row {
            if row % 2 == 1 {
                precomputed.lagrange_odd_in_minicircuit[row] = P::ScalarField::one();
            } else {
                precomputed.lagrange_even_in_minicircuit[row] = P::ScalarField::one();
            }
        }
        precomputed.lagrange_second[1] = P::ScalarField::one();
        precomputed.lagrange_last_in_minicircuit[last_mini_circuit_row] = P::ScalarField::one();
        for (dst, step) in precomputed
            .ordered_extra_range_constraints_numerator
            .iter_mut()
            .zip(steps.iter().cycle().take(steps.len() * NUM_ORDERED))
        {
            *dst = P::ScalarField::from(*step);
        }

        polys.validate()?;
        Ok(polys)
    }

    /// Writes the transcript, the limbed accumulators, quotients and carries of every operation.
    pub(crate) fn fill_operations(&self, witness: &mut TranslatorWitnessEntities<Vec<P::ScalarField>>) {
        let modulus: BigUint = P::BaseField::MODULUS.into();
        let negative_modulus =
            split_limbs(&((BigUint::one() << (NUM_LIMB_BITS * NUM_BINARY_LIMBS)) - &modulus));
        let evaluation_input_x: BigUint = self.evaluation_input_x.into();
        let x_limbs = split_limbs(&evaluation_input_x);

        let mut power = self.batching_challenge_v;
        let v_powers: [BigUint; 4] = std::array::from_fn(|_| {
            let value = power.into();
            power *= self.batching_challenge_v;
            value
        });
        let v_limbs = v_powers.clone().map(|v| split_limbs(&v));

        let mut previous = BigUint::zero();
        for (k, operation) in self.operations.iter().enumerate().rev() {
            let row = 2 * k + 1;
            let p_x: BigUint = operation.p_x.into();
            let p_y: BigUint = operation.p_y.into();
            let z_1 = BigUint::from(operation.z_1);
            let z_2 = BigUint::from(operation.z_2);

            let sum = &previous * &evaluation_input_x
                + operation.op
                + &p_x * &v_powers[0]
                + &p_y * &v_powers[1]
                + &z_1 * &v_powers[2]
                + &z_2 * &v_powers[3];
            let quotient = &sum / &modulus;
            let current = sum - &quotient * &modulus;

            let previous_limbs = split_limbs(&previous);
            let current_limbs = split_limbs(&current);
            let p_x_limbs = split_limbs(&p_x);
            let p_y_limbs = split_limbs(&p_y);
            let quotient_limbs = split_limbs(&quotient);
            let z_1_limbs = split_limbs(&z_1);
            let z_2_limbs = split_limbs(&z_2);

            let products: [(&[BigUint], &[BigUint]); 6] = [
                (&previous_limbs, &x_limbs),
                (&p_x_limbs, &v_limbs[0]),
                (&p_y_limbs, &v_limbs[1]),
                (&z_1_limbs[..2], &v_limbs[2]),
                (&z_2_limbs[..2], &v_limbs[3]),
                (&quotient_limbs, &negative_modulus),
            ];
            let low = products
                .iter()
                .fold(BigInt::from(operation.op), |acc, (a, b)| {
                    acc + BigInt::from(limb_products(a, b, 0))
                })
                - BigInt::from(&current_limbs[0] + (&current_limbs[1] << NUM_LIMB_BITS));
            let carry_low = low >> (2 * NUM_LIMB_BITS);
            let high = products
                .iter()
                .fold(carry_low.clone(), |acc, (a, b)| {
                    acc + BigInt::from(limb_products(a, b, 2))
                })
                - BigInt::from(&current_limbs[2] + (&current_limbs[3] << NUM_LIMB_BITS));
            let carry_high = high >> (2 * NUM_LIMB_BITS);

            let to_field = |value: &BigUint| P::ScalarField::from(value.clone());
            let wide_mask = (BigUint::one() << (2 * NUM_LIMB_BITS)) - BigUint::one();

            witness.op[row] = P::ScalarField::from(operation.op);
            witness.x_lo_y_hi[row] = to_field(&(&p_x & &wide_mask));
            witness.x_hi_z_1[row] = to_field(&(&p_x >> (2 * NUM_LIMB_BITS)));
            witness.y_lo_z_2[row] = to_field(&(&p_y & &wide_mask));
            witness.x_lo_y_hi[row + 1] = to_field(&(&p_y >> (2 * NUM_LIMB_BITS)));
            witness.x_hi_z_1[row + 1] = to_field(&z_1);
            witness.y_lo_z_2[row + 1] = to_field(&z_2);

            let pairs = [
                (&mut witness.p_x_low_limbs, &p_x_limbs[0], &p_x_limbs[1]),
                (&mut witness.p_x_high_limbs, &p_x_limbs[2], &p_x_limbs[3]),
                (&mut witness.p_y_low_limbs, &p_y_limbs[0], &p_y_limbs[1]),
                (&mut witness.p_y_high_limbs, &p_y_limbs[2], &p_y_limbs[3]),
                (&mut witness.z_low_limbs, &z_1_limbs[0], &z_2_limbs[0]),
                (&mut witness.z_high_limbs, &z_1_limbs[1], &z_2_limbs[1]),
                (
                    &mut witness.quotient_low_binary_limbs,
                    &quotient_limbs[0],
                    &quotient_limbs[1],
                ),
                (
                    &mut witness.quotient_high_binary_limbs,
                    &quotient_limbs[2],
                    &quotient_limbs[3],
                ),
            ];
            for (column, odd, even) in pairs {
                column[row] = to_field(odd);
                column[row + 1] = to_field(even);
            }
            witness.relation_wide_limbs[row] = bigint_to_field(&carry_low);
            witness.relation_wide_limbs[row + 1] = bigint_to_field(&carry_high);

            for (column, current, previous) in izip!(
                witness.accumulators_binary_limbs.iter_mut(),
                current_limbs.iter(),
                previous_limbs.iter()
            ) {
                column[row] = to_field(current);
                column[row + 1] = to_field(previous);
            }

            tracing::trace!("translator operation {k} at row {row}");
            previous = current;
        }
    }
}

/// The step sequence every ordered column contains, from 0 to the largest microlimb.
fn sort_steps() -> Vec<u64> {
    let mut steps = (0..=MAX_MICRO_LIMB)
        .step_by(SORT_STEP)
        .collect::<Vec<_>>();
    if steps.last() != Some(&MAX_MICRO_LIMB) {
        steps.push(MAX_MICRO_LIMB);
    }
    steps
}

fn split_limbs(value: &BigUint) -> [BigUint; NUM_BINARY_LIMBS] {
    let mask = limb_mask();
    std::array::from_fn(|i| (value >> (i * NUM_LIMB_BITS)) & &mask)
}

/// Sum of `a_i * b_j * 2^(68 (i + j - start))` over the limb pairs with `i + j` in `start..start + 2`.
fn limb_products(a: &[BigUint], b: &[BigUint], start: usize) -> BigUint {
    let mut sum = BigUint::zero();
    for (i, a_i) in a.iter().enumerate() {
        for (j, b_j) in b.iter().enumerate() {
            if (start..start + 2).contains(&(i + j)) {
                sum += (a_i * b_j) << (NUM_LIMB_BITS * (i + j - start));
            }
        }
    }
    sum
}

fn bigint_to_field<F: PrimeField>(value: &BigInt) -> F {
    let (sign, magnitude) = value.clone().into_parts();
    let value = F::from(magnitude);
    if sign == Sign::Minus {
        -value
    } else {
        value
    }
}

fn low_u64(value: &BigUint) -> u64 {
    value.to_u64_digits().first().copied().unwrap_or_default()
}

/// Microlimbs of a binary limb, the last one being the top microlimb shifted to the 14-bit boundary.
fn binary_limb_micro_limbs(value: &BigUint) -> [u64; NUM_LIMB_RANGE_CONSTRAINTS] {
    let mut micro = wide_limb_micro_limbs(value);
    let num_micro_limbs = NUM_LIMB_RANGE_CONSTRAINTS - 1;
    let tail_shift = NUM_MICRO_LIMB_BITS * num_micro_limbs - NUM_LIMB_BITS;
    micro[num_micro_limbs] = micro[num_micro_limbs - 1] << tail_shift;
    micro
}

fn wide_limb_micro_limbs(value: &BigUint) -> [u64; NUM_LIMB_RANGE_CONSTRAINTS] {
    std::array::from_fn(|i| low_u64(&(value >> (i * NUM_MICRO_LIMB_BITS))) & MAX_MICRO_LIMB)
}

/// Decomposes every range constrained value of the minicircuit, returns the microlimb columns in concatenation order.
fn fill_micro_limbs<F: PrimeField>(
    witness: &mut TranslatorWitnessEntities<Vec<F>>,
    mini_circuit_size: usize,
    last_mini_circuit_row: usize,
) -> Vec<Vec<u64>> {
    let mut micro_limbs = vec![vec![0u64; mini_circuit_size]; NUM_MICRO_LIMB_COLUMNS];
    for row in 1..=last_mini_circuit_row {
        let limbs = witness
            .limb_range_constraints()
            .map(|(limb, _)| -> BigUint { limb[row].into() });
        let wide: BigUint = witness.relation_wide_limbs[row].into();

        let decompositions = limbs
            .iter()
            .map(binary_limb_micro_limbs)
            .chain(std::iter::once(wide_limb_micro_limbs(&wide)));
        for (i, micro) in decompositions.enumerate() {
            for (j, value) in micro.into_iter().enumerate() {
                micro_limbs[i * NUM_LIMB_RANGE_CONSTRAINTS + j][row] = value;
            }
        }
    }

    for (column, values) in witness.microlimbs_mut().into_iter().zip(micro_limbs.iter()) {
        for (dst, src) in column.iter_mut().zip(values.iter()) {
            *dst = F::from(*src);
        }
    }
    micro_limbs
}

fn fill_concatenated<F: PrimeField>(
    witness: &mut TranslatorWitnessEntities<Vec<F>>,
    micro_limbs: &[Vec<u64>],
    mini_circuit_size: usize,
) -> Vec<Vec<u64>> {
    let circuit_size = witness.op.len();
    let mut concatenated = vec![vec![0u64; circuit_size]; NUM_CONCATENATED];
    for (group, columns) in micro_limbs
        .chunks(MICRO_LIMB_COLUMNS_PER_CONCATENATION)
        .enumerate()
    {
        for (position, column) in columns.iter().enumerate() {
            let offset = position * mini_circuit_size;
            concatenated[group][offset..offset + mini_circuit_size].copy_from_slice(column);
        }
    }

    for (dst, src) in witness
        .concatenated_range_constraints
        .iter_mut()
        .zip(concatenated.iter())
    {
        for (dst, src) in dst.iter_mut().zip(src.iter()) {
            *dst = F::from(*src);
        }
    }
    concatenated
}

fn fill_ordered<F: PrimeField>(
    witness: &mut TranslatorWitnessEntities<Vec<F>>,
    concatenated: Vec<Vec<u64>>,
    steps: &[u64],
) {
    let circuit_size = witness.op.len();
    let extra_zeros = circuit_size - steps.len() * NUM_ORDERED;
    let mut pool = concatenated.into_iter().flatten().collect::<Vec<_>>();
    pool.resize(pool.len() + extra_zeros, 0);
    pool.sort_unstable();

    let chunk_size = circuit_size - steps.len();
    for (dst, chunk) in witness
        .ordered_range_constraints
        .iter_mut()
        .zip(pool.chunks(chunk_size))
    {
        let mut ordered = chunk.to_vec();
        ordered.extend_from_slice(steps);
        ordered.sort_unstable();
        for (dst, src) in dst.iter_mut().zip(ordered.iter()) {
            *dst = F::from(*src);
        }
    }
}
