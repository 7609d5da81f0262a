use ark_ff::{One, PrimeField};
use num_bigint::BigUint;

/// Width of the binary limbs used to emulate a foreign field element.
pub const NUM_LIMB_BITS: usize = 68;
/// Width of the microlimbs each binary limb is range constrained through.
pub const NUM_MICRO_LIMB_BITS: usize = 14;
pub const NUM_BINARY_LIMBS: usize = 4;
/// Four binary limbs followed by the native reduction of the whole value.
pub const NUM_LIMBS_WITH_NATIVE: usize = NUM_BINARY_LIMBS + 1;

/// Splits an element of a foreign field into limbs over the field `Des`.
pub trait ConvertField<Des: PrimeField>: PrimeField {
    /// The four 68-bit limbs, least significant first.
    fn to_binary_limbs(&self) -> [Des; NUM_BINARY_LIMBS];

    /// The four binary limbs and the value reduced modulo the modulus of `Des`.
    fn to_limbs_with_native(&self) -> [Des; NUM_LIMBS_WITH_NATIVE] {
        let [l0, l1, l2, l3] = self.to_binary_limbs();
        let value: BigUint = (*self).into();
        [l0, l1, l2, l3, Des::from(value)]
    }
}

impl<Src: PrimeField, Des: PrimeField> ConvertField<Des> for Src {
    fn to_binary_limbs(&self) -> [Des; NUM_BINARY_LIMBS] {
        let value: BigUint = (*self).into();
        split_into_binary_limbs(&value)
    }
}

pub(crate) fn limb_mask() -> BigUint {
    (BigUint::one() << NUM_LIMB_BITS) - BigUint::one()
}

/**
 * @brief Slices a value below 2^272 into four 68-bit limbs.
 * @details Higher bits are dropped, so callers reducing modulo 2^272 may pass any value.
 */
pub fn split_into_binary_limbs<Des: PrimeField>(value: &BigUint) -> [Des; NUM_BINARY_LIMBS] {
    let mask = limb_mask();
    std::array::from_fn(|i| Des::from((value >> (i * NUM_LIMB_BITS)) & &mask))
}

/// Slices a value into `N` microlimbs of 14 bits, least significant first.
pub fn split_into_micro_limbs<Des: PrimeField, const N: usize>(value: &BigUint) -> [Des; N] {
    let mask = (BigUint::one() << NUM_MICRO_LIMB_BITS) - BigUint::one();
    std::array::from_fn(|i| Des::from((value >> (i * NUM_MICRO_LIMB_BITS)) & &mask))
}

/// Limbs of `2^272 - q` and `-q` over the native field, where `q` is the modulus of `Src`.
///
/// Adding `quotient * (2^272 - q)` is how the translator subtracts multiples of `q` while staying
/// in non-negative binary limbs.
pub fn negative_modulus_limbs<Src: PrimeField, Des: PrimeField>() -> [Des; NUM_LIMBS_WITH_NATIVE] {
    let modulus: BigUint = Src::MODULUS.into();
    let binary_basis = BigUint::one() << (NUM_LIMB_BITS * NUM_BINARY_LIMBS);
    let negative_modulus = binary_basis - &modulus;
    let [l0, l1, l2, l3] = split_into_binary_limbs(&negative_modulus);
    [l0, l1, l2, l3, -Des::from(modulus)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Fq, Fr};
    use ark_ff::{Field, UniformRand};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn limbs_recompose_to_native() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let shift = Fr::from(2u64).pow([NUM_LIMB_BITS as u64]);
        for _ in 0..8 {
            let value = Fq::rand(&mut rng);
            let limbs: [Fr; 5] = value.to_limbs_with_native();
            let recomposed = limbs[0]
                + limbs[1] * shift
                + limbs[2] * shift * shift
                + limbs[3] * shift * shift * shift;
            assert_eq!(recomposed, limbs[4]);
        }
    }

    #[test]
    fn negative_modulus_is_complement_of_modulus() {
        let limbs = negative_modulus_limbs::<Fq, Fr>();
        let shift = Fr::from(2u64).pow([NUM_LIMB_BITS as u64]);
        let recomposed =
            limbs[0] + limbs[1] * shift + limbs[2] * shift * shift + limbs[3] * shift * shift * shift;
        // 2^272 - q + q == 2^272
        let basis = Fr::from(2u64).pow([(NUM_LIMB_BITS * NUM_BINARY_LIMBS) as u64]);
        assert_eq!(recomposed - limbs[4], basis);
    }
}
