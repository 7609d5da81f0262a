use ark_ec::pairing::Pairing;
use ark_ff::PrimeField;
use num_bigint::BigUint;

/// A pairing-friendly curve whose scalar field carries the Honk relations.
///
/// The embedded curve used by the elliptic gate is defined over `ScalarField`, and the
/// translator emulates arithmetic over `BaseField`.
pub trait HonkCurve: Pairing {
    /// Coefficient `b` of the embedded curve `y^2 = x^3 + b`.
    fn get_curve_b() -> Self::ScalarField;

    /// Modulus of the field emulated by the translator, lifted into the scalar field.
    fn base_field_modulus_in_scalar_field() -> Self::ScalarField {
        let modulus: BigUint = Self::BaseField::MODULUS.into();
        Self::ScalarField::from(modulus)
    }
}

impl HonkCurve for ark_bn254::Bn254 {
    fn get_curve_b() -> Self::ScalarField {
        // Grumpkin: y^2 = x^3 - 17
        -ark_bn254::Fr::from(17u64)
    }
}
