//! round driver, range and opening queries, diagnostics

use tracing_subscriber::EnvFilter;
use wizard::{
    check_committed, check_round, check_round_in_circuit, compute_round_results, CheckConfig,
    CheckError, ChallengeSource, CircuitBuilder, CircuitRuntime, Column, ProtocolBuilder, Query,
    QueryResult, QueryResultInCircuit, Runtime, F,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn elems(values: &[u64]) -> Vec<F> {
    values.iter().map(|&v| F::from(v)).collect()
}

fn assigned(builder: &mut ProtocolBuilder, run: &mut Runtime, name: &str, round: usize, values: &[u64]) -> Column {
    let column = builder.declare_column(name, values.len(), round);
    run.assign(&column, elems(values)).unwrap();
    column
}

#[test]
fn test_range_native_and_circuit() {
    init_tracing();
    let mut builder = ProtocolBuilder::new();
    let mut run = Runtime::new();
    let bytes = assigned(&mut builder, &mut run, "bytes", 0, &[0, 17, 255]);
    let wide = assigned(&mut builder, &mut run, "wide", 0, &[3, 256, 1]);

    let ok = builder.new_range(&bytes, 256).unwrap();
    let bad = builder.new_range(&wide, 256).unwrap();

    assert_eq!(ok.check(&run), Ok(()));
    assert_eq!(
        bad.check(&run),
        Err(CheckError::OutOfRange {
            query: "range_1/1".into(),
            column: "wide".into(),
            row: 1,
            value: F::from(256u64),
            bound: 256,
        })
    );

    let mut circuit = CircuitBuilder::new();
    let circuit_run = CircuitRuntime::allocate(&mut circuit, &run);
    ok.check_in_circuit(&mut circuit, &circuit_run).unwrap();
    bad.check_in_circuit(&mut circuit, &circuit_run).unwrap();

    let circuit = circuit.build();
    assert_eq!(circuit.num_range_constraints(), 6);
    // the first three constraints cover `bytes`, the fifth is wide[1]
    assert_eq!(circuit.check(), Err(4));
}

#[test]
fn test_range_bound_edges() {
    let mut builder = ProtocolBuilder::new();
    let mut run = Runtime::new();
    let bits = assigned(&mut builder, &mut run, "bits", 0, &[0, 1, 1, 0]);
    let q = builder.new_range(&bits, 2).unwrap();
    assert_eq!(q.check(&run), Ok(()));

    let top = builder.declare_column("top", 1, 0);
    run.assign(&top, vec![F::from_value(u128::MAX)]).unwrap();
    let q = builder.new_range(&top, u128::MAX).unwrap();
    assert!(matches!(q.check(&run), Err(CheckError::OutOfRange { row: 0, .. })));
}

#[test]
fn test_local_opening_flow() {
    let mut builder = ProtocolBuilder::new();
    let mut run = Runtime::new();
    let acc = assigned(&mut builder, &mut run, "acc", 0, &[11, 12, 13]);

    let opening = builder.new_local_opening(&acc).unwrap();
    let empty = builder.declare_column("empty", 0, 0);
    assert!(builder.new_local_opening(&empty).is_err());

    assert_eq!(
        opening.check(&run),
        Err(CheckError::MissingParams {
            query: opening.canonical_name(),
            id: opening.id(),
        })
    );

    // the prover derives the opening and records it
    let results = compute_round_results(builder.registry(), 0, &run).unwrap();
    assert_eq!(results, vec![(opening.id(), QueryResult::Values(elems(&[11])))]);
    run.assign_query_params(opening.id(), results[0].1.values().to_vec());
    assert_eq!(opening.check(&run), Ok(()));

    let mut circuit = CircuitBuilder::new();
    let circuit_run = CircuitRuntime::allocate(&mut circuit, &run);
    check_round_in_circuit(builder.registry(), 0, &mut circuit, &circuit_run).unwrap();
    match opening.compute_result_in_circuit(&mut circuit, &circuit_run).unwrap() {
        QueryResultInCircuit::Values(vars) => assert_eq!(circuit.value(vars[0]), F::from(11u64)),
        QueryResultInCircuit::None => panic!("opening derives a value"),
    }
    assert!(circuit.build().check().is_ok());

    // a wrong claim is caught natively
    run.assign_query_params(opening.id(), elems(&[12]));
    assert!(matches!(opening.check(&run), Err(CheckError::ParamsMismatch { .. })));
}

#[test]
fn test_local_opening_rejects_wrong_claim_in_circuit() {
    let mut builder = ProtocolBuilder::new();
    let mut run = Runtime::new();
    let acc = assigned(&mut builder, &mut run, "acc", 0, &[5, 6]);
    let opening = builder.new_local_opening(&acc).unwrap();
    run.assign_query_params(opening.id(), elems(&[6]));

    let mut circuit = CircuitBuilder::new();
    let circuit_run = CircuitRuntime::allocate(&mut circuit, &run);
    opening.check_in_circuit(&mut circuit, &circuit_run).unwrap();
    assert_eq!(circuit.build().check(), Err(0));
}

/// round 0: a passing range; round 1: a failing range and a passing lookup
fn two_round_protocol() -> (ProtocolBuilder, Runtime) {
    let mut builder = ProtocolBuilder::new();
    let mut run = Runtime::with_challenges(ChallengeSource::Transcript { seed: [1u8; 32] });

    let small = assigned(&mut builder, &mut run, "small", 0, &[1, 2, 3]);
    let late = assigned(&mut builder, &mut run, "late", 1, &[1, 99]);
    let table = assigned(&mut builder, &mut run, "table", 1, &[1, 2, 3]);

    builder.new_range(&small, 4).unwrap();
    builder.new_range(&late, 4).unwrap();
    builder
        .new_inclusion(vec![small], vec![vec![table]], None, None)
        .unwrap();
    (builder, run)
}

#[test]
fn test_driver_refuses_uncommitted_rounds() {
    let (builder, mut run) = two_round_protocol();
    let config = CheckConfig::default();

    assert_eq!(
        check_round(builder.registry(), 1, &run, &config),
        Err(CheckError::RoundNotReached {
            round: 1,
            committed: 0
        })
    );

    // only round 0 is visible so far
    let report = check_committed(builder.registry(), &run, &config).unwrap();
    assert_eq!(report.checked, 1);

    run.commit_round(1);
    assert!(check_round(builder.registry(), 1, &run, &config).is_err());
}

#[test]
fn test_fail_fast_and_collect() {
    init_tracing();
    let (builder, mut run) = two_round_protocol();
    run.commit_round(1);

    let err = check_committed(builder.registry(), &run, &CheckConfig::default()).unwrap_err();
    assert!(matches!(err, CheckError::OutOfRange { row: 1, .. }));

    for config in [CheckConfig::default(), CheckConfig::sequential()] {
        let report = check_committed(builder.registry(), &run, &config.collect_all()).unwrap();
        assert_eq!(report.checked, 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, builder.registry().at_round(1)[0].id());
        assert!(!report.is_ok());
        assert!(report.into_result().is_err());
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let mut builder = ProtocolBuilder::new();
    let mut run = Runtime::new();
    for i in 0..32u64 {
        let column = assigned(&mut builder, &mut run, &format!("c{i}"), 0, &[i, i + 1]);
        builder.new_range(&column, 20).unwrap();
    }

    let parallel = check_round(builder.registry(), 0, &run, &CheckConfig::default().collect_all()).unwrap();
    let sequential = check_round(builder.registry(), 0, &run, &CheckConfig::sequential().collect_all()).unwrap();
    assert_eq!(parallel, sequential);

    // c19 holds 20, c20.. hold values >= 20
    let failing: Vec<u64> = parallel.failures.iter().map(|(id, _)| id.0).collect();
    assert_eq!(failing, (19..32).collect::<Vec<_>>());
}

#[test]
fn test_empty_registry() {
    let builder = ProtocolBuilder::new();
    let run = Runtime::new();
    let report = check_committed(builder.registry(), &run, &CheckConfig::default()).unwrap();
    assert_eq!(report.checked, 0);
    assert!(report.is_ok());
    assert_eq!(check_round(builder.registry(), 0, &run, &CheckConfig::default()).unwrap().checked, 0);
}

#[test]
fn test_names_differ_only_by_id() {
    let mut builder = ProtocolBuilder::new();
    let col = builder.declare_column("x", 2, 0);

    let a = builder.new_range(&col, 8).unwrap();
    let b = builder.new_range(&col, 8).unwrap();
    a.with_name("limb");
    b.with_name("limb");

    let a_name = (&*a as &dyn Query).to_string();
    let b_name = (&*b as &dyn Query).to_string();
    assert_eq!(a_name.rsplit_once('/').unwrap().0, b_name.rsplit_once('/').unwrap().0);
    assert_ne!(a_name, b_name);

    let unnamed: Vec<_> = (0..16).map(|_| builder.new_range(&col, 8).unwrap().id()).collect();
    let mut deduped = unnamed.clone();
    deduped.dedup();
    assert_eq!(unnamed, deduped);
    assert!(unnamed.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_transcript_challenges_make_checks_reproducible() {
    let (builder, mut run) = two_round_protocol();
    run.commit_round(1);
    let lookup = builder.registry().at_round(1)[1].clone();
    assert!(run.challenges().is_transcript_bound());
    assert_eq!(lookup.check(&run), lookup.check(&run));
    assert_eq!(lookup.check(&run), Ok(()));
}
