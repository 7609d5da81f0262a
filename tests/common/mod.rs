#![allow(dead_code)]

use ark_bn254::{Bn254, Fr};
use ark_ff::{Field, One, Zero};
use honk_relations::{
    compute_grand_product, compute_lookup_grand_product_delta, compute_public_input_delta,
    decider::relations::{LookupRelation, UltraPermutationRelation},
    flavor::UltraProverPolynomials,
    RelationParameters, UltraFlavor,
};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

pub const CIRCUIT_SIZE: usize = 64;

/// Table index of the 2-bit XOR table.
pub const XOR_TABLE_INDEX: u64 = 1;

pub type Point = (Fr, Fr);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn rng(seed: u64) -> ChaCha12Rng {
    ChaCha12Rng::seed_from_u64(seed)
}

/// A point of the embedded curve y^2 = x^3 - 17.
pub fn grumpkin_generator() -> Point {
    let y = (-Fr::from(16u64)).sqrt().expect("-16 is a square");
    (Fr::one(), y)
}

pub fn grumpkin_add((x1, y1): Point, (x2, y2): Point) -> Point {
    let lambda = (y2 - y1) * (x2 - x1).inverse().expect("distinct x");
    let x3 = lambda.square() - x1 - x2;
    (x3, lambda * (x1 - x3) - y1)
}

pub fn grumpkin_double((x1, y1): Point) -> Point {
    let lambda = Fr::from(3u64) * x1.square() * y1.double().inverse().expect("y != 0");
    let x3 = lambda.square() - x1.double();
    (x3, lambda * (x1 - x3) - y1)
}

/// Lays out gates row by row after the zero row and wires up the copy constraints.
pub struct UltraTraceBuilder {
    pub polys: UltraProverPolynomials<Fr>,
    next_row: usize,
    public_inputs: Vec<Fr>,
    public_input_offset: usize,
    table: Vec<[Fr; 4]>,
    lookups: Vec<[Fr; 4]>,
}

impl UltraTraceBuilder {
    pub fn new(circuit_size: usize) -> Self {
        let mut polys = UltraProverPolynomials::new(circuit_size);
        for row in 0..circuit_size {
            for (j, (id, sigma)) in [
                (&mut polys.precomputed.id_1, &mut polys.precomputed.sigma_1),
                (&mut polys.precomputed.id_2, &mut polys.precomputed.sigma_2),
                (&mut polys.precomputed.id_3, &mut polys.precomputed.sigma_3),
                (&mut polys.precomputed.id_4, &mut polys.precomputed.sigma_4),
            ]
            .into_iter()
            .enumerate()
            {
                id[row] = Fr::from((j * circuit_size + row) as u64);
                sigma[row] = id[row];
            }
        }
        polys.precomputed.lagrange_first[0] = Fr::one();
        polys.precomputed.lagrange_last[circuit_size - 1] = Fr::one();

        Self {
            polys,
            next_row: 1,
            public_inputs: Vec::new(),
            public_input_offset: 1,
            table: Vec::new(),
            lookups: Vec::new(),
        }
    }

    fn circuit_size(&self) -> usize {
        self.polys.precomputed.q_m.len()
    }

    fn wire_mut(&mut self, column: usize) -> &mut Vec<Fr> {
        let witness = &mut self.polys.witness;
        match column {
            0 => &mut witness.w_l,
            1 => &mut witness.w_r,
            2 => &mut witness.w_o,
            _ => &mut witness.w_4,
        }
    }

    fn sigma_mut(&mut self, column: usize) -> &mut Vec<Fr> {
        let precomputed = &mut self.polys.precomputed;
        match column {
            0 => &mut precomputed.sigma_1,
            1 => &mut precomputed.sigma_2,
            2 => &mut precomputed.sigma_3,
            _ => &mut precomputed.sigma_4,
        }
    }

    pub fn next_row(&self) -> usize {
        self.next_row
    }

    pub fn add_row(&mut self, wires: [Fr; 4]) -> usize {
        let row = self.next_row;
        for (column, value) in wires.into_iter().enumerate() {
            self.wire_mut(column)[row] = value;
        }
        self.next_row += 1;
        row
    }

    /// Public inputs go into the second wire of rows starting at the current row.
    pub fn add_public_inputs(&mut self, values: &[Fr]) {
        self.public_input_offset = self.next_row;
        for value in values {
            let row = self.add_row([Fr::zero(), *value, Fr::zero(), Fr::zero()]);
            self.polys.precomputed.sigma_2[row] = -Fr::from(row as u64 + 1);
            self.public_inputs.push(*value);
        }
    }

    /// `q_m * w_l * w_r + q_l * w_l + q_r * w_r + q_o * w_o + q_c = 0`
    pub fn add_arithmetic_gate(&mut self, selectors: [Fr; 5], wires: [Fr; 3]) -> usize {
        let row = self.add_row([wires[0], wires[1], wires[2], Fr::zero()]);
        let precomputed = &mut self.polys.precomputed;
        let [q_m, q_l, q_r, q_o, q_c] = selectors;
        precomputed.q_arith[row] = Fr::one();
        precomputed.q_m[row] = q_m;
        precomputed.q_l[row] = q_l;
        precomputed.q_r[row] = q_r;
        precomputed.q_o[row] = q_o;
        precomputed.q_c[row] = q_c;
        row
    }

    /// Makes the cells `(column, row)` one copy cycle, they must hold the same value.
    pub fn copy_cycle(&mut self, cells: &[(usize, usize)]) {
        let circuit_size = self.circuit_size();
        for (i, (column, row)) in cells.iter().enumerate() {
            let (next_column, next_row) = cells[(i + 1) % cells.len()];
            self.sigma_mut(*column)[*row] = Fr::from((next_column * circuit_size + next_row) as u64);
        }
    }

    /// Consecutive values step by at most 3; the last value lands in w_l of a row without selectors.
    pub fn add_sort_gates(&mut self, values: &[u64]) {
        for chunk in values[..values.len() - 1].chunks(4) {
            let wires: [Fr; 4] = std::array::from_fn(|i| Fr::from(chunk[i]));
            let row = self.add_row(wires);
            self.polys.precomputed.q_sort[row] = Fr::one();
        }
        let last = values[values.len() - 1];
        self.add_row([Fr::from(last), Fr::zero(), Fr::zero(), Fr::zero()]);
    }

    /// `p_3 = p_1 + p_2` over two rows.
    pub fn add_elliptic_addition(&mut self, p_1: Point, p_2: Point) -> Point {
        let p_3 = grumpkin_add(p_1, p_2);
        let row = self.add_row([Fr::zero(), p_1.0, p_1.1, Fr::zero()]);
        self.add_row([p_2.0, p_3.0, p_3.1, p_2.1]);
        self.polys.precomputed.q_elliptic[row] = Fr::one();
        self.polys.precomputed.q_l[row] = Fr::one();
        p_3
    }

    pub fn add_elliptic_doubling(&mut self, p_1: Point) -> Point {
        let p_3 = grumpkin_double(p_1);
        let row = self.add_row([Fr::zero(), p_1.0, p_1.1, Fr::zero()]);
        self.add_row([Fr::zero(), p_3.0, p_3.1, Fr::zero()]);
        self.polys.precomputed.q_elliptic[row] = Fr::one();
        self.polys.precomputed.q_m[row] = Fr::one();
        p_3
    }

    /// ROM reads `(index, value_2, value_1)`, then the same records sorted by index.
    pub fn add_rom_gates(&mut self, params: &RelationParameters<Fr>, reads: &[(u64, u64, u64)]) {
        let record = |(index, value_2, value_1): (u64, u64, u64)| {
            [
                Fr::from(index),
                Fr::from(value_2),
                Fr::from(value_1),
                Fr::from(index) * params.eta
                    + Fr::from(value_2) * params.eta_two
                    + Fr::from(value_1) * params.eta_three,
            ]
        };

        for read in reads {
            let row = self.add_row(record(*read));
            let precomputed = &mut self.polys.precomputed;
            precomputed.q_aux[row] = Fr::one();
            precomputed.q_l[row] = Fr::one();
            precomputed.q_m[row] = Fr::one();
        }

        let mut sorted = reads.to_vec();
        sorted.sort();
        for read in sorted.iter() {
            let row = self.add_row(record(*read));
            let precomputed = &mut self.polys.precomputed;
            precomputed.q_aux[row] = Fr::one();
            precomputed.q_l[row] = Fr::one();
            precomputed.q_r[row] = Fr::one();
        }
        let last_index = sorted.last().map(|read| read.0).unwrap_or_default();
        self.add_row([Fr::from(last_index + 1), Fr::zero(), Fr::zero(), Fr::zero()]);
    }

    /// Appends `(a, b, a ^ b, XOR_TABLE_INDEX)` for all 2-bit `a` and `b` to the table columns, from row 1 on.
    pub fn add_xor_table(&mut self) {
        for a in 0..4u64 {
            for b in 0..4u64 {
                let entry = [a, b, a ^ b, XOR_TABLE_INDEX].map(Fr::from);
                let row = self.table.len() + 1;
                let precomputed = &mut self.polys.precomputed;
                for (column, value) in [
                    &mut precomputed.table_1,
                    &mut precomputed.table_2,
                    &mut precomputed.table_3,
                    &mut precomputed.table_4,
                ]
                .into_iter()
                .zip(entry)
                {
                    column[row] = value;
                }
                self.table.push(entry);
            }
        }
    }

    /**
     * Looks up `a ^ b` in 2-bit chunks, one row per chunk. Row `j` holds `(a, b, a ^ b) >> 2j` and every row but
     * the last steps by -4, so each row reads `wire - 4 * next wire`, the chunk itself.
     */
    pub fn add_xor_lookups(&mut self, a: u64, b: u64, num_chunks: usize) {
        let c = a ^ b;
        for chunk in 0..num_chunks {
            let shift = 2 * chunk;
            let row = self.add_row([a >> shift, b >> shift, c >> shift, 0].map(Fr::from));
            let step = if chunk + 1 < num_chunks {
                -Fr::from(4u64)
            } else {
                Fr::zero()
            };
            let precomputed = &mut self.polys.precomputed;
            precomputed.q_lookup[row] = Fr::one();
            precomputed.q_o[row] = Fr::from(XOR_TABLE_INDEX);
            precomputed.q_r[row] = step;
            precomputed.q_m[row] = step;
            precomputed.q_c[row] = step;
            self.lookups.push(
                [(a >> shift) & 3, (b >> shift) & 3, (c >> shift) & 3, XOR_TABLE_INDEX].map(Fr::from),
            );
        }
        assert!(a >> (2 * num_chunks) == 0 && b >> (2 * num_chunks) == 0);
    }

    /// The table followed by every lookup placed next to its table entry, compressed with the etas.
    fn sorted_accum(&self, params: &RelationParameters<Fr>) -> Vec<Fr> {
        let compress = |[t_1, t_2, t_3, t_4]: [Fr; 4]| {
            t_1 + t_2 * params.eta + t_3 * params.eta_two + t_4 * params.eta_three
        };
        let mut sorted_accum = vec![Fr::zero(); self.circuit_size()];
        let mut row = 1;
        for entry in &self.table {
            let copies = 1 + self.lookups.iter().filter(|key| *key == entry).count();
            for _ in 0..copies {
                sorted_accum[row] = compress(*entry);
                row += 1;
            }
        }
        assert_eq!(row, 1 + self.table.len() + self.lookups.len(), "lookup outside the table");
        sorted_accum
    }

    /// Sets the deltas in `params` and computes both grand product columns.
    pub fn finalize(mut self, params: &mut RelationParameters<Fr>) -> UltraProverPolynomials<Fr> {
        let circuit_size = self.circuit_size();
        params.public_input_delta = compute_public_input_delta(
            &self.public_inputs,
            params.beta,
            params.gamma,
            circuit_size,
            self.public_input_offset,
        )
        .expect("non-degenerate challenges");
        self.polys.witness.sorted_accum = self.sorted_accum(params);
        params.lookup_grand_product_delta =
            compute_lookup_grand_product_delta(params.beta, params.gamma, circuit_size);

        let z_perm =
            compute_grand_product::<Bn254, UltraFlavor, UltraPermutationRelation>(&self.polys, params)
                .expect("non-degenerate challenges");
        assert_eq!(z_perm.product, params.public_input_delta);
        self.polys.witness.z_perm = z_perm.z;

        let z_lookup = compute_grand_product::<Bn254, UltraFlavor, LookupRelation>(&self.polys, params)
            .expect("non-degenerate challenges");
        assert_eq!(z_lookup.product, params.lookup_grand_product_delta);
        self.polys.witness.z_lookup = z_lookup.z;

        self.polys
    }
}

/// Rows of every Ultra gate type, before the grand products are computed.
///
/// | rows   | gates                          |
/// |--------|--------------------------------|
/// | 1, 2   | public inputs                  |
/// | 3..=7  | arithmetic and copy cycles     |
/// | 8..=10 | sort                           |
/// | 11..=14| elliptic addition and doubling |
/// | 15..=21| ROM reads and sorted records   |
/// | 22..=25| XOR lookups                    |
pub fn ultra_gates(params: &RelationParameters<Fr>) -> UltraTraceBuilder {
    let one = Fr::one();
    let mut builder = UltraTraceBuilder::new(CIRCUIT_SIZE);

    builder.add_public_inputs(&[Fr::from(17u64), Fr::from(42u64)]);

    // 3 + 4 = 7, 7 * 6 = 42, 42 + 8 = 50, 50 - 50 = 0
    let add = [Fr::zero(), one, one, -one, Fr::zero()];
    let mul = [one, Fr::zero(), Fr::zero(), -one, Fr::zero()];
    let a = builder.add_arithmetic_gate(add, [3u64, 4, 7].map(Fr::from));
    let b = builder.add_arithmetic_gate(mul, [7u64, 6, 42].map(Fr::from));
    let c = builder.add_arithmetic_gate(add, [42u64, 8, 50].map(Fr::from));
    let d = builder.add_arithmetic_gate(
        [Fr::zero(), one, Fr::zero(), Fr::zero(), -Fr::from(50u64)],
        [50u64, 0, 0].map(Fr::from),
    );
    builder.copy_cycle(&[(2, a), (0, b)]);
    builder.copy_cycle(&[(2, b), (0, c)]);
    builder.copy_cycle(&[(2, c), (0, d), (1, d + 1)]);
    // the copied cell of the 3-cycle sits in a row without selectors
    builder.add_row([Fr::zero(), Fr::from(50u64), Fr::zero(), Fr::zero()]);

    builder.add_sort_gates(&[1, 2, 4, 5, 8, 8, 9, 11, 12]);

    let generator = grumpkin_generator();
    let sum = builder.add_elliptic_addition(generator, grumpkin_double(generator));
    builder.add_elliptic_doubling(sum);

    builder.add_rom_gates(params, &[(2, 20, 200), (1, 10, 100), (2, 20, 200)]);

    // 13 ^ 6 in two chunks, then single chunk lookups, (1, 2, 3) is read twice
    builder.add_xor_table();
    builder.add_xor_lookups(13, 6, 2);
    builder.add_xor_lookups(1, 2, 1);
    builder.add_xor_lookups(2, 2, 1);

    builder
}

/// A satisfying Ultra trace together with the challenges it was built for.
pub fn satisfied_ultra_trace(seed: u64) -> (UltraProverPolynomials<Fr>, RelationParameters<Fr>) {
    let mut params = RelationParameters::get_random(&mut rng(seed));
    let polys = ultra_gates(&params).finalize(&mut params);
    (polys, params)
}
