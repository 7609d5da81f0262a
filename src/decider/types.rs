use crate::field_convert::{ConvertField, NUM_BINARY_LIMBS, NUM_LIMBS_WITH_NATIVE};
use ark_ff::{Field, One, PrimeField, Zero};
use ark_std::{rand::Rng, UniformRand};

/// Number of powers of the batching challenge `v` the translator consumes.
pub const NUM_BATCHING_CHALLENGES: usize = 4;

/// Challenges and derived scalars shared by every relation of one proof.
///
/// The bundle is created once and only ever read afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationParameters<F: PrimeField> {
    pub eta: F,
    pub eta_two: F,
    pub eta_three: F,
    pub beta: F,
    pub gamma: F,
    pub public_input_delta: F,
    pub lookup_grand_product_delta: F,
    /// Claimed translator result in binary limbs.
    pub accumulated_result: [F; NUM_BINARY_LIMBS],
    /// Translator evaluation point in binary limbs followed by its native value.
    pub evaluation_input_x: [F; NUM_LIMBS_WITH_NATIVE],
    /// `v, v^2, v^3, v^4` over the emulated field, each split like `evaluation_input_x`.
    pub batching_challenge_v: [[F; NUM_LIMBS_WITH_NATIVE]; NUM_BATCHING_CHALLENGES],
}

impl<F: PrimeField> Default for RelationParameters<F> {
    fn default() -> Self {
        Self {
            eta: F::zero(),
            eta_two: F::zero(),
            eta_three: F::zero(),
            beta: F::zero(),
            gamma: F::zero(),
            public_input_delta: F::one(),
            lookup_grand_product_delta: F::one(),
            accumulated_result: [F::zero(); NUM_BINARY_LIMBS],
            evaluation_input_x: [F::zero(); NUM_LIMBS_WITH_NATIVE],
            batching_challenge_v: [[F::zero(); NUM_LIMBS_WITH_NATIVE]; NUM_BATCHING_CHALLENGES],
        }
    }
}

impl<F: PrimeField> RelationParameters<F> {
    /**
     * @brief Samples every challenge from `rng`.
     * @details beta and gamma are resampled until no grand product denominator built from them can be
     * identically zero, i.e. until beta, gamma and gamma * (1 + beta) are all non-zero.
     */
    pub fn get_random<R: Rng>(rng: &mut R) -> Self {
        let (beta, gamma) = loop {
            let beta = F::rand(rng);
            let gamma = F::rand(rng);
            if !beta.is_zero() && !(gamma * (beta + F::one())).is_zero() {
                break (beta, gamma);
            }
        };

        Self {
            eta: F::rand(rng),
            eta_two: F::rand(rng),
            eta_three: F::rand(rng),
            beta,
            gamma,
            public_input_delta: F::rand(rng),
            lookup_grand_product_delta: F::rand(rng),
            accumulated_result: std::array::from_fn(|_| F::rand(rng)),
            evaluation_input_x: std::array::from_fn(|_| F::rand(rng)),
            batching_challenge_v: std::array::from_fn(|_| std::array::from_fn(|_| F::rand(rng))),
        }
    }

    /// Derives the limbed translator challenges from values of the emulated field `Q`.
    pub fn set_translator_challenges<Q: PrimeField>(
        &mut self,
        evaluation_input_x: Q,
        batching_challenge_v: Q,
        accumulated_result: Q,
    ) {
        tracing::trace!("set translator challenges");

        self.evaluation_input_x = evaluation_input_x.to_limbs_with_native();
        let mut power = batching_challenge_v;
        for limbs in self.batching_challenge_v.iter_mut() {
            *limbs = power.to_limbs_with_native();
            power *= batching_challenge_v;
        }
        self.accumulated_result = accumulated_result.to_binary_limbs();
    }
}

/**
 * @brief The gate separator polynomial pow_β(X) = Π_i ((1 - X_i) + X_i β_i).
 * @details Its evaluation on the hypercube point with binary representation `row` is the product of the betas at
 * the set bits of `row`, which is the weight sumcheck applies to the relations of that row.
 */
pub struct GateSeparatorPolynomial<F: PrimeField> {
    betas: Vec<F>,
    beta_products: Vec<F>,
}

impl<F: PrimeField> GateSeparatorPolynomial<F> {
    pub fn new(betas: Vec<F>) -> Self {
        let pow_size = 1 << betas.len();
        let mut beta_products = Vec::with_capacity(pow_size);

        for i in 0..pow_size {
            let mut res = F::one();
            let mut j = i;
            let mut beta_idx = 0;
            while j > 0 {
                if j & 1 == 1 {
                    res *= betas[beta_idx];
                }
                j >>= 1;
                beta_idx += 1;
            }
            beta_products.push(res);
        }

        Self {
            betas,
            beta_products,
        }
    }

    pub fn betas(&self) -> &[F] {
        &self.betas
    }

    /// Number of rows the separator assigns a weight to.
    pub fn len(&self) -> usize {
        self.beta_products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beta_products.is_empty()
    }

    pub fn row_weight(&self, row: usize) -> &F {
        &self.beta_products[row]
    }

    /// Evaluates pow_β at an arbitrary point, the hypercube weights are the evaluations at binary points.
    pub fn evaluate(&self, point: &[F]) -> F {
        self.betas
            .iter()
            .zip(point.iter())
            .fold(F::one(), |acc, (beta, u)| {
                acc * (F::one() - u + *u * beta)
            })
    }
}

/// Sum of the hypercube weights, `Π_i (1 + β_i)`.
pub fn gate_separator_sum<F: Field>(betas: &[F]) -> F {
    betas.iter().fold(F::one(), |acc, beta| acc * (F::one() + beta))
}
