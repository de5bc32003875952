//! Integration tests for the round-trip properties and named scenarios
//! (spec.md §8): ATS round-trip (property 5), manifest idempotence
//! (property 6), and scenarios S1 and S6. S2-S5 exercise properties
//! already covered unit-by-unit in the codec modules' own tests; here we
//! build complete, valid ATS instances end to end through the archive.

use num_bigint::{BigInt, BigUint};
use umb::ats::{AtomicPropositionAnnotation, ExplicitAts, ObservationAnnotation, RewardAnnotation};
use umb::binary::{UmbRead, UmbWrite};
use umb::datatypes::{CommonType, RationalValue, Scalar, StructAttribute, StructField, StructType};
use umb::index::transition_system::{AppliesTo, TimeType};
use umb::index::UmbIndex;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("umb-scenario-{}-{}.umb", std::process::id(), name))
}

/// S1 - Scalar round-trip: encode a mixed list of scalars and decode each.
#[test]
fn scenario_s1_scalar_roundtrip() {
    let mut buf: Vec<u8> = Vec::new();
    buf.write_fixed_int(CommonType::Int32, &BigInt::from(123_456)).unwrap();
    buf.write_fixed_int(CommonType::Uint64, &BigInt::from((1u64 << 60) + 123)).unwrap();
    buf.write_double(std::f64::consts::PI).unwrap();
    let neg_seven_13 = RationalValue { numerator: BigInt::from(-7), denominator: BigUint::from(13u8) };
    buf.write_rational_framed(&neg_seven_13).unwrap();
    let big_num = BigInt::from(2u8).pow(100);
    let big_rational = RationalValue { numerator: -big_num, denominator: BigUint::from(13u8) };
    buf.write_rational_framed(&big_rational).unwrap();
    buf.write_string_framed("test string").unwrap();

    let mut cursor = std::io::Cursor::new(buf);
    assert_eq!(cursor.read_fixed_int(CommonType::Int32).unwrap(), BigInt::from(123_456));
    assert_eq!(cursor.read_fixed_int(CommonType::Uint64).unwrap(), BigInt::from((1u64 << 60) + 123));
    assert_eq!(cursor.read_double().unwrap(), std::f64::consts::PI);
    assert_eq!(cursor.read_rational_framed().unwrap(), neg_seven_13);
    assert_eq!(cursor.read_rational_framed().unwrap(), big_rational);
    assert_eq!(cursor.read_string_framed().unwrap(), "test string");
}

fn grid_ats() -> ExplicitAts {
    // A 2-state grid sliver: state 0 is initial, one choice with two
    // branches (9/10 to state 1, 1/10 self-loop), state 1 is a goal with
    // no outgoing choices.
    let mut rewards = indexmap::IndexMap::new();
    rewards.insert(
        "step_cost".to_string(),
        RewardAnnotation::new("step_cost", CommonType::Int32, AppliesTo::Choices, vec![Scalar::Int32(1)]).unwrap(),
    );
    let mut aps = indexmap::IndexMap::new();
    aps.insert("goal".to_string(), AtomicPropositionAnnotation::new("goal", AppliesTo::States, vec![false, true]));

    ExplicitAts {
        time: TimeType::Discrete,
        num_players: 1,
        initial_states: vec![true, false],
        state_to_choice: vec![0, 1, 1],
        choice_to_branch: vec![0, 2],
        branch_to_target: vec![1, 0],
        branch_to_probability: Some(vec![
            Scalar::Rational(RationalValue { numerator: BigInt::from(9), denominator: BigUint::from(10u8) }),
            Scalar::Rational(RationalValue { numerator: BigInt::from(1), denominator: BigUint::from(10u8) }),
        ]),
        rewards,
        aps,
        ..Default::default()
    }
}

/// Property 5 - ATS round-trip through a real UMB archive on disk.
#[test]
fn property_5_ats_roundtrip_through_archive() {
    let ats = grid_ats();
    let path = temp_path("property5");
    umb::write_ats(&ats, &path).unwrap();
    let read_back = umb::read_ats(&path).unwrap();

    assert_eq!(read_back.initial_states, ats.initial_states);
    assert_eq!(read_back.state_to_choice, ats.state_to_choice);
    assert_eq!(read_back.choice_to_branch, ats.choice_to_branch);
    assert_eq!(read_back.branch_to_target, ats.branch_to_target);
    assert_eq!(read_back.branch_to_probability, ats.branch_to_probability);
    assert_eq!(read_back.rewards.get("step_cost").unwrap().values, ats.rewards.get("step_cost").unwrap().values);
    assert_eq!(read_back.aps.get("goal").unwrap().values, ats.aps.get("goal").unwrap().values);

    std::fs::remove_file(&path).ok();
}

/// Property 6 - manifest emission idempotence: parse(emit(m)) == m.
#[test]
fn property_6_manifest_emission_is_idempotent() {
    let ats = grid_ats();
    let umb_raw = umb::ats::ExplicitAtsConverter::to_explicit_umb(&ats).unwrap();
    let emitted = umb_raw.index.to_json().unwrap();
    let reparsed = UmbIndex::from_json(&emitted).unwrap();
    let reemitted = reparsed.to_json().unwrap();
    assert_eq!(emitted, reemitted);
}

/// S4 - multi-player game: verify branch-probability-type is emitted and a
/// CSR is produced because the probabilities are not all the same size.
#[test]
fn scenario_s4_multiplayer_rational_probabilities_use_csr() {
    let mut ats = grid_ats();
    ats.num_players = 3;
    ats.state_to_player = Some(vec![0, 1]);
    ats.branch_to_probability = Some(vec![
        Scalar::Rational(RationalValue { numerator: BigInt::from(9), denominator: BigUint::from(10u8) }),
        Scalar::Rational(RationalValue {
            numerator: BigInt::from(1),
            denominator: BigUint::from(1u64) << 72,
        }),
    ]);

    let umb_raw = umb::ats::ExplicitAtsConverter::to_explicit_umb(&ats).unwrap();
    assert!(umb_raw.index.transition_system.branch_probability_type.is_some());

    let (_, csr) = umb::binary::vectors::vector_to_bytes(
        ats.branch_to_probability.as_ref().unwrap(),
        CommonType::Rational,
        None,
    )
    .unwrap();
    assert!(csr.is_some(), "differently-sized rational terms must produce a chunk CSR");
}

/// S5 - urgent-stochastic CTMC: exit rates on a subset of states, and the
/// markovian-states bitvector truncated to #states.
#[test]
fn scenario_s5_urgent_stochastic_exit_rates() {
    let mut ats = grid_ats();
    ats.time = TimeType::UrgentStochastic;
    ats.markovian_states = Some(vec![true, false]);
    ats.exit_rates = Some(vec![Scalar::Rational(RationalValue {
        numerator: BigInt::from(5),
        denominator: BigUint::from(1u8),
    })]);

    assert_eq!(ats.markovian_states.as_ref().unwrap().len(), ats.num_states());
    assert!(ats.validate().is_ok());
}

/// Observations: a reward-free ATS carrying only an observation annotation
/// bounded by `num_observations`.
#[test]
fn observation_annotation_round_trips_through_validate() {
    let mut ats = grid_ats();
    ats.num_observations = 3;
    ats.observations.insert(
        "region".to_string(),
        ObservationAnnotation::new("region", AppliesTo::States, vec![0, 2], 3).unwrap(),
    );
    assert!(ats.validate().is_ok());
}

/// S3 - observations and state valuations round-trip through a real
/// archive: the manifest carries both schemas and `read_ats(write_ats(A))`
/// must reproduce both exactly.
#[test]
fn scenario_s3_observations_and_state_valuations_round_trip_through_archive() {
    let mut ats = grid_ats();
    ats.num_observations = 3;
    ats.observations_apply_to = Some(AppliesTo::States);
    ats.observations.insert(
        "region".to_string(),
        ObservationAnnotation::new("region", AppliesTo::States, vec![0, 2], 3).unwrap(),
    );
    let struct_ty = StructType::new(
        32,
        vec![StructField::Attribute(StructAttribute::new("x", CommonType::Int, Some(32)).unwrap())],
    )
    .unwrap();
    ats.state_valuation_struct = Some(struct_ty);
    ats.state_valuations = Some(vec![
        Scalar::Struct(vec![("x".to_string(), Scalar::Int(BigInt::from(10)))]),
        Scalar::Struct(vec![("x".to_string(), Scalar::Int(BigInt::from(20)))]),
    ]);

    let path = temp_path("scenario-s3");
    umb::write_ats(&ats, &path).unwrap();
    let read_back = umb::read_ats(&path).unwrap();

    assert_eq!(read_back.observations.get("region").unwrap().values, ats.observations.get("region").unwrap().values);
    assert_eq!(read_back.observations.get("region").unwrap().applies_to, AppliesTo::States);
    assert_eq!(read_back.state_valuation_struct, ats.state_valuation_struct);
    assert_eq!(read_back.state_valuations, ats.state_valuations);

    std::fs::remove_file(&path).ok();
}

/// S6 - manifest unknown key: the loader warns but round-trips the known
/// subset unchanged, and the unknown key is never re-emitted.
#[test]
fn scenario_s6_manifest_unknown_key() {
    let ats = grid_ats();
    let umb_raw = umb::ats::ExplicitAtsConverter::to_explicit_umb(&ats).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&umb_raw.index.to_json().unwrap()).unwrap();
    value.as_object_mut().unwrap().insert("foo".to_string(), serde_json::json!({"anything": true}));

    let with_foo = UmbIndex::from_json(&value.to_string()).unwrap();
    assert_eq!(with_foo.extra.get("foo").unwrap(), &serde_json::json!({"anything": true}));
    assert_eq!(with_foo.transition_system, umb_raw.index.transition_system);

    let reemitted = with_foo.to_json().unwrap();
    assert!(!reemitted.contains("\"foo\""));
}

#[test]
fn validate_rejects_a_reward_vector_with_the_wrong_length() {
    let mut ats = grid_ats();
    ats.rewards.get_mut("step_cost").unwrap().values.push(Scalar::Int32(2));
    assert!(ats.validate().is_err());
}
