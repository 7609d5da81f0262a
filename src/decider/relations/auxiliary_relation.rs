use super::{Relation, RelationKind, SubrelationAccumulator};
use crate::{
    decider::types::RelationParameters,
    field_convert::{NUM_LIMB_BITS, NUM_MICRO_LIMB_BITS},
    flavor::UltraAllValues,
    honk_curve::HonkCurve,
};
use ark_ff::{Field, One, Zero};
use num_bigint::BigUint;

pub struct AuxiliaryRelation {}

impl AuxiliaryRelation {
    pub const NUM_SUBRELATIONS: usize = 6;
    pub const SUBRELATION_PARTIAL_LENGTHS: [usize; Self::NUM_SUBRELATIONS] = [6, 6, 6, 6, 6, 6];
}

pub type AuxiliaryRelationAcc<F> =
    SubrelationAccumulator<F, { AuxiliaryRelation::NUM_SUBRELATIONS }>;

impl<P: HonkCurve> Relation<P> for AuxiliaryRelation {
    const KIND: RelationKind = RelationKind::Auxiliary;
    const SKIPPABLE: bool = true;
    type Row = UltraAllValues<P::ScalarField>;
    type Acc = AuxiliaryRelationAcc<P::ScalarField>;

    fn skip(input: &Self::Row) -> bool {
        input.precomputed.q_aux.is_zero()
    }

    /**
     * @brief The memory and non-native field gates, all switched on by q_aux.
     * @details Which identity a row enforces is decided by the other selectors:
     *  - limb accumulation: q_3 with q_4 (first) or q_m (second);
     *  - non-native product: q_2 with q_3, q_4 or q_m (three partial products);
     *  - memory access (record check): q_1 with q_m, q_c holds the RAM access type;
     *  - RAM timestamp: q_1 with q_4;
     *  - ROM consistency on the sorted records: q_1 with q_2;
     *  - RAM consistency on the sorted records: q_arith alone.
     * Gates that read the next row use the shifts of the four wires.
     */
    fn accumulate(
        univariate_accumulator: &mut Self::Acc,
        input: &Self::Row,
        relation_parameters: &RelationParameters<P::ScalarField>,
        scaling_factor: &P::ScalarField,
    ) {
        tracing::trace!("Accumulate AuxiliaryRelation");

        let eta = &relation_parameters.eta;
        let eta_two = &relation_parameters.eta_two;
        let eta_three = &relation_parameters.eta_three;

        let w_1 = &input.witness.w_l;
        let w_2 = &input.witness.w_r;
        let w_3 = &input.witness.w_o;
        let w_4 = &input.witness.w_4;
        let w_1_shift = &input.shifted.w_l;
        let w_2_shift = &input.shifted.w_r;
        let w_3_shift = &input.shifted.w_o;
        let w_4_shift = &input.shifted.w_4;

        let q_1 = &input.precomputed.q_l;
        let q_2 = &input.precomputed.q_r;
        let q_3 = &input.precomputed.q_o;
        let q_4 = &input.precomputed.q_4;
        let q_m = &input.precomputed.q_m;
        let q_c = &input.precomputed.q_c;
        let q_arith = &input.precomputed.q_arith;
        let q_aux = &input.precomputed.q_aux;

        let limb_size = P::ScalarField::from(BigUint::one() << NUM_LIMB_BITS);
        let sublimb_shift = P::ScalarField::from(1u64 << NUM_MICRO_LIMB_BITS);
        let one = P::ScalarField::one();

        /*
         * Non native field arithmetic gate 2
         * deg 4
         *
         *             _                                                                               _
         *            /   _                   _                               _       14                \
         * q_2 . q_4 |   (w_1 . w_2) + (w_1 . w_2) + (w_1 . w_4 + w_2 . w_3 - w_3) . 2    - w_3 - w_4   |
         *            \_                                                                               _/
         *
         **/
        let mut limb_subproduct = w_1.to_owned() * w_2_shift + w_1_shift.to_owned() * w_2;
        let mut non_native_field_gate_2 = w_1.to_owned() * w_4 + w_2.to_owned() * w_3 - w_3_shift;
        non_native_field_gate_2 *= limb_size;
        non_native_field_gate_2 -= w_4_shift;
        non_native_field_gate_2 += &limb_subproduct;
        non_native_field_gate_2 *= q_4;

        limb_subproduct *= limb_size;
        limb_subproduct += w_1_shift.to_owned() * w_2_shift;
        let mut non_native_field_gate_1 = limb_subproduct;
        non_native_field_gate_1 -= w_3.to_owned() + w_4;
        non_native_field_gate_1 *= q_3;

        let mut non_native_field_gate_3 = limb_subproduct;
        non_native_field_gate_3 += w_4;
        non_native_field_gate_3 -= w_3_shift.to_owned() + w_4_shift;
        non_native_field_gate_3 *= q_m;

        let mut non_native_field_identity =
            non_native_field_gate_1 + non_native_field_gate_2 + non_native_field_gate_3;
        non_native_field_identity *= q_2;

        // ((((w2' * 2^14 + w1') * 2^14 + w3) * 2^14 + w2) * 2^14 + w1 - w4) * q4
        // deg 2
        let mut limb_accumulator_1 = w_2_shift.to_owned() * sublimb_shift;
        limb_accumulator_1 += w_1_shift;
        limb_accumulator_1 *= sublimb_shift;
        limb_accumulator_1 += w_3;
        limb_accumulator_1 *= sublimb_shift;
        limb_accumulator_1 += w_2;
        limb_accumulator_1 *= sublimb_shift;
        limb_accumulator_1 += w_1;
        limb_accumulator_1 -= w_4;
        limb_accumulator_1 *= q_4;

        // ((((w3' * 2^14 + w2') * 2^14 + w1') * 2^14 + w4) * 2^14 + w3 - w4') * qm
        // deg 2
        let mut limb_accumulator_2 = w_3_shift.to_owned() * sublimb_shift;
        limb_accumulator_2 += w_2_shift;
        limb_accumulator_2 *= sublimb_shift;
        limb_accumulator_2 += w_1_shift;
        limb_accumulator_2 *= sublimb_shift;
        limb_accumulator_2 += w_4;
        limb_accumulator_2 *= sublimb_shift;
        limb_accumulator_2 += w_3;
        limb_accumulator_2 -= w_4_shift;
        limb_accumulator_2 *= q_m;

        let mut limb_accumulator_identity = limb_accumulator_1 + limb_accumulator_2;
        limb_accumulator_identity *= q_3; //  deg 3

        /*
         * Memory records live in w_4 and are compressed with the eta challenges:
         *      ROM: index * eta + value_2 * eta_two + value_1 * eta_three
         *      RAM: access + index * eta + timestamp * eta_two + value * eta_three
         * with index, value_2 / timestamp, value_1 / value in w_1, w_2, w_3 and the access type in q_c.
         * The record check below is q_c + w_1 eta + w_2 eta_two + w_3 eta_three - w_4, deg 2.
         */
        let mut memory_record_check = w_3.to_owned() * eta_three;
        memory_record_check += w_2.to_owned() * eta_two;
        memory_record_check += w_1.to_owned() * eta;
        memory_record_check += q_c;
        let partial_record_check = memory_record_check; // used in RAM consistency check; deg 1 or 2
        memory_record_check -= w_4;

        // Sorted ROM records: the index steps by 0 or 1, equal indices carry equal records.
        let index_delta = w_1_shift.to_owned() - w_1;
        let record_delta = w_4_shift.to_owned() - w_4;

        let index_is_monotonically_increasing = index_delta.square() - index_delta; // deg 2

        let adjacent_values_match_if_adjacent_indices_match = (one - index_delta) * record_delta; // deg 2

        let q_aux_by_scaling = q_aux.to_owned() * scaling_factor;
        let q_one_by_two = q_1.to_owned() * q_2;
        let q_one_by_two_by_aux_by_scaling = q_one_by_two * q_aux_by_scaling;

        let tmp = adjacent_values_match_if_adjacent_indices_match * q_one_by_two_by_aux_by_scaling; // deg 5
        univariate_accumulator[1] += tmp;

        let tmp = index_is_monotonically_increasing * q_one_by_two_by_aux_by_scaling; // deg 5
        univariate_accumulator[2] += tmp;

        let rom_consistency_check_identity = memory_record_check * q_one_by_two; // deg 3 or 4

        /*
         * RAM Consistency Check
         *
         * For the sorted list of RAM records:
         * 1. index values are monotonically increasing
         * 2. if the next access reads the same index, it reads the value of the current record
         * 3. the access type of every record is a boolean
         */
        let access_type = w_4.to_owned() - partial_record_check; // will be 0 or 1 for honest Prover; deg 1 or 2
        let access_check = access_type.square() - access_type; // check value is 0 or 1; deg 2 or 4

        let mut next_gate_access_type = w_3_shift.to_owned() * eta_three;
        next_gate_access_type += w_2_shift.to_owned() * eta_two;
        next_gate_access_type += w_1_shift.to_owned() * eta;
        next_gate_access_type = w_4_shift.to_owned() - next_gate_access_type;

        let value_delta = w_3_shift.to_owned() - w_3;
        let adjacent_values_match_if_adjacent_indices_match_and_next_access_is_a_read_operation =
            (one - index_delta) * value_delta * (one - next_gate_access_type); // deg 3 or 4

        // We can't apply the RAM consistency check identity on the final entry in the sorted list (the wires in the
        // next gate would make the identity fail). We need to validate that its 'access type' bool is correct. Can't
        // do with an arithmetic gate because of the `eta` factors. We need to check that the *next* gate's access
        // type is correct, to cover this edge case
        // deg 2 or 4
        let next_gate_access_type_is_boolean =
            next_gate_access_type.square() - next_gate_access_type;

        let q_arith_by_aux_and_scaling = q_arith.to_owned() * q_aux_by_scaling;
        // Putting it all together...

        let tmp = adjacent_values_match_if_adjacent_indices_match_and_next_access_is_a_read_operation
            * q_arith_by_aux_and_scaling; // deg 5 or 6
        univariate_accumulator[3] += tmp;

        let tmp = index_is_monotonically_increasing * q_arith_by_aux_and_scaling; // deg 4
        univariate_accumulator[4] += tmp;

        let tmp = next_gate_access_type_is_boolean * q_arith_by_aux_and_scaling; // deg 4 or 6
        univariate_accumulator[5] += tmp;

        let ram_consistency_check_identity = access_check * q_arith; // deg 3 or 5

        // w_3 holds the timestamp step of a RAM access to the same index as the next row, zero otherwise
        let timestamp_delta = w_2_shift.to_owned() - w_2;
        let ram_timestamp_check_identity = (one - index_delta) * timestamp_delta - w_3; // deg 3

        let mut memory_identity = rom_consistency_check_identity; // deg 3 or 4
        memory_identity += ram_timestamp_check_identity * (q_4.to_owned() * q_1); // deg 4
        memory_identity += memory_record_check * (q_m.to_owned() * q_1); // deg 3 or 4
        memory_identity += ram_consistency_check_identity; // deg 3 or 5

        // (deg 3 or 5) + (deg 4) + (deg 3)
        let mut auxiliary_identity =
            memory_identity + non_native_field_identity + limb_accumulator_identity;
        auxiliary_identity *= q_aux_by_scaling; // deg 5 or 6
        univariate_accumulator[0] += auxiliary_identity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Bn254, Fr};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn accumulate(row: &UltraAllValues<Fr>, params: &RelationParameters<Fr>) -> AuxiliaryRelationAcc<Fr> {
        let mut acc = AuxiliaryRelationAcc::default();
        <AuxiliaryRelation as Relation<Bn254>>::accumulate(&mut acc, row, params, &Fr::one());
        acc
    }

    fn record(params: &RelationParameters<Fr>, index: u64, a: u64, b: u64) -> Fr {
        Fr::from(index) * params.eta
            + Fr::from(a) * params.eta_two
            + Fr::from(b) * params.eta_three
    }

    fn params() -> RelationParameters<Fr> {
        RelationParameters::get_random(&mut ChaCha12Rng::seed_from_u64(21))
    }

    #[test]
    fn rom_access_gate() {
        let params = params();
        let mut row = UltraAllValues::<Fr>::default();
        row.precomputed.q_aux = Fr::one();
        row.precomputed.q_l = Fr::one();
        row.precomputed.q_m = Fr::one();
        row.witness.w_l = Fr::from(4u64);
        row.witness.w_r = Fr::from(9u64);
        row.witness.w_o = Fr::from(81u64);
        row.witness.w_4 = record(&params, 4, 9, 81);
        assert!(accumulate(&row, &params).is_zero());

        row.witness.w_o = Fr::from(82u64);
        let acc = accumulate(&row, &params);
        assert_eq!(acc[0], params.eta_three);
    }

    #[test]
    fn rom_consistency_over_sorted_records() {
        let params = params();
        let mut row = UltraAllValues::<Fr>::default();
        row.precomputed.q_aux = Fr::one();
        row.precomputed.q_l = Fr::one();
        row.precomputed.q_r = Fr::one();
        row.witness.w_l = Fr::from(5u64);
        row.witness.w_r = Fr::from(10u64);
        row.witness.w_o = Fr::from(11u64);
        row.witness.w_4 = record(&params, 5, 10, 11);
        // same index, same record
        row.shifted.w_l = Fr::from(5u64);
        row.shifted.w_4 = row.witness.w_4;
        assert!(accumulate(&row, &params).is_zero());

        // next index, any record
        row.shifted.w_l = Fr::from(6u64);
        row.shifted.w_4 = Fr::from(12345u64);
        assert!(accumulate(&row, &params).is_zero());

        // same index but a different record
        row.shifted.w_l = Fr::from(5u64);
        let acc = accumulate(&row, &params);
        assert!(!acc[1].is_zero());
        assert!(acc[2].is_zero());

        // index jumps by two
        row.shifted.w_l = Fr::from(7u64);
        let acc = accumulate(&row, &params);
        assert_eq!(acc[2], Fr::from(2u64));
    }

    #[test]
    fn limb_accumulation_gate() {
        let params = params();
        let mut row = UltraAllValues::<Fr>::default();
        row.precomputed.q_aux = Fr::one();
        row.precomputed.q_o = Fr::one();
        row.precomputed.q_4 = Fr::one();

        let sublimbs = [1u64, 2, 3, 4, 5];
        row.witness.w_l = Fr::from(sublimbs[0]);
        row.witness.w_r = Fr::from(sublimbs[1]);
        row.witness.w_o = Fr::from(sublimbs[2]);
        row.shifted.w_l = Fr::from(sublimbs[3]);
        row.shifted.w_r = Fr::from(sublimbs[4]);
        row.witness.w_4 = sublimbs
            .iter()
            .rev()
            .fold(Fr::zero(), |acc, limb| acc * Fr::from(1u64 << 14) + Fr::from(*limb));
        assert!(accumulate(&row, &params).is_zero());

        row.witness.w_4 += Fr::one();
        assert_eq!(accumulate(&row, &params)[0], -Fr::one());
    }

    #[test]
    fn bigfield_product_gate() {
        let params = params();
        let mut row = UltraAllValues::<Fr>::default();
        row.precomputed.q_aux = Fr::one();
        row.precomputed.q_r = Fr::one();
        row.precomputed.q_o = Fr::one();

        // (a0 * b1 + a1 * b0) * 2^68 + a0' * b0'
        let limb_size = Fr::from(BigUint::one() << 68);
        row.witness.w_l = Fr::from(2u64);
        row.witness.w_r = Fr::from(3u64);
        row.shifted.w_l = Fr::from(5u64);
        row.shifted.w_r = Fr::from(7u64);
        row.witness.w_o = Fr::from(2u64 * 7 + 5 * 3) * limb_size;
        row.witness.w_4 = Fr::from(35u64);
        assert!(accumulate(&row, &params).is_zero());

        row.witness.w_4 = Fr::from(36u64);
        assert!(!accumulate(&row, &params).is_zero());
    }

    #[test]
    fn ram_consistency_over_sorted_records() {
        let params = params();
        let mut row = UltraAllValues::<Fr>::default();
        row.precomputed.q_aux = Fr::one();
        row.precomputed.q_arith = Fr::one();

        // a write followed by a read of the same cell
        row.witness.w_l = Fr::from(2u64);
        row.witness.w_r = Fr::from(1u64);
        row.witness.w_o = Fr::from(10u64);
        row.witness.w_4 = record(&params, 2, 1, 10) + Fr::one();
        row.shifted.w_l = Fr::from(2u64);
        row.shifted.w_r = Fr::from(2u64);
        row.shifted.w_o = Fr::from(10u64);
        row.shifted.w_4 = record(&params, 2, 2, 10);
        assert!(accumulate(&row, &params).is_zero());

        // the read returns another value
        row.shifted.w_o = Fr::from(11u64);
        row.shifted.w_4 = record(&params, 2, 2, 11);
        let acc = accumulate(&row, &params);
        assert!(!acc[3].is_zero());
        assert!(acc[4].is_zero());
        assert!(acc[5].is_zero());

        // the access type is not a boolean
        row.shifted.w_o = Fr::from(10u64);
        row.shifted.w_4 = record(&params, 2, 2, 10) + Fr::from(2u64);
        let acc = accumulate(&row, &params);
        assert_eq!(acc[5], Fr::from(2u64));
    }

    #[test]
    fn skipped_without_aux_selector() {
        let mut row = UltraAllValues::<Fr>::default();
        row.witness.w_l = Fr::from(1u64);
        assert!(<AuxiliaryRelation as Relation<Bn254>>::skip(&row));
        row.precomputed.q_aux = Fr::one();
        assert!(!<AuxiliaryRelation as Relation<Bn254>>::skip(&row));
    }
}
