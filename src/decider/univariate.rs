use ark_ff::PrimeField;

/// Evaluations of a univariate polynomial on `0, 1, .., SIZE - 1`.
#[derive(Clone, Debug)]
pub struct Univariate<F: PrimeField, const SIZE: usize> {
    pub(crate) evaluations: [F; SIZE],
}

impl<F: PrimeField, const SIZE: usize> Univariate<F, SIZE> {
    pub const SIZE: usize = SIZE;

    pub fn new(evaluations: [F; SIZE]) -> Self {
        Self { evaluations }
    }

    /**
     * @brief Given a linear univariate f represented by {f(0), f(1)}, compute the evaluations {f(0), ..., f(SIZE - 1)}.
     *
     * @details Extending f = v0(1-X) + v1X to a new value involves just one addition: setting Δ = v1-v0, the values
     * of f(X) are f(0)=v0, f(1)= v0 + Δ, v2 = f(1) + Δ, v3 = f(2) + Δ...
     */
    pub(crate) fn extend_from(&mut self, poly: &[F; 2]) {
        self.evaluations[0] = poly[0];
        if SIZE == 1 {
            return;
        }
        self.evaluations[1] = poly[1];
        let delta = poly[1] - poly[0];
        for i in 2..SIZE {
            self.evaluations[i] = self.evaluations[i - 1] + delta;
        }
    }

    /// Degree of the polynomial through the evaluations, `None` if it vanishes everywhere.
    ///
    /// The k-th forward differences of a degree d polynomial are zero for every k > d.
    pub fn degree(&self) -> Option<usize> {
        let mut differences = self.evaluations.to_vec();
        let mut degree = None;
        for k in 0..SIZE {
            if differences.iter().any(|d| !d.is_zero()) {
                degree = Some(k);
            }
            differences = differences.windows(2).map(|w| w[1] - w[0]).collect();
        }
        degree
    }
}

impl<F: PrimeField, const SIZE: usize> Default for Univariate<F, SIZE> {
    fn default() -> Self {
        Self {
            evaluations: [F::zero(); SIZE],
        }
    }
}
