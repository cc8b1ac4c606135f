//! Call Log Fidelity Tests
//!
//! Tests for call recording and query invariants:
//! - Exactly one record per completed call, chronological order
//! - Positional queries are 1-indexed; out-of-range is an error
//! - called_with_exactly compares the full sequence, length and order
//! - Disabled recording fails queries explicitly

use serde_json::json;

use stubkit::matcher::ArgSpec;
use stubkit::query::QueryError;
use stubkit::stub::Stub;

// =============================================================================
// Helper Functions
// =============================================================================

/// Echo stub: f/1 returns its argument wrapped in an object.
fn echo_stub() -> Stub {
    Stub::builder()
        .clause("f", ArgSpec::any(1), |args| Ok(json!({"echo": args[0]})))
        .call_info(true)
        .build()
        .unwrap()
}

// =============================================================================
// Chronological fidelity
// =============================================================================

/// Test: after N invocations with distinct arguments, the log
/// reproduces each input in exact chronological order.
#[test]
fn test_log_reproduces_inputs_in_order() {
    let stub = echo_stub();

    for i in 1..=5 {
        stub.invoke("f", vec![json!(i)]).unwrap();
    }

    assert_eq!(stub.call_count("f").unwrap(), 5);
    assert_eq!(stub.first_call("f").unwrap().input, vec![json!(1)]);
    assert_eq!(stub.second_call("f").unwrap().input, vec![json!(2)]);
    assert_eq!(stub.third_call("f").unwrap().input, vec![json!(3)]);
    assert_eq!(stub.nth_call("f", 4).unwrap().input, vec![json!(4)]);
    assert_eq!(stub.last_call("f").unwrap().input, vec![json!(5)]);
}

/// Test: records carry the produced output and 1-based positions.
#[test]
fn test_records_carry_output_and_position() {
    let stub = echo_stub();

    stub.invoke("f", vec![json!("a")]).unwrap();
    stub.invoke("f", vec![json!("b")]).unwrap();

    let first = stub.first_call("f").unwrap();
    assert_eq!(first.seq, 1);
    assert_eq!(first.output, json!({"echo": "a"}));

    let last = stub.last_call("f").unwrap();
    assert_eq!(last.seq, 2);
    assert_eq!(last.output, json!({"echo": "b"}));
}

/// Test: counts can be restricted to an exact argument list.
#[test]
fn test_call_count_with_arguments() {
    let stub = echo_stub();

    stub.invoke("f", vec![json!(1)]).unwrap();
    stub.invoke("f", vec![json!(2)]).unwrap();
    stub.invoke("f", vec![json!(1)]).unwrap();

    assert_eq!(stub.call_count("f").unwrap(), 3);
    assert_eq!(stub.call_count_with("f", &[json!(1)]).unwrap(), 2);
    assert_eq!(stub.call_count_with("f", &[json!(3)]).unwrap(), 0);
    assert!(stub.called_with("f", &[json!(2)]).unwrap());
    assert!(!stub.called_with("f", &[json!(3)]).unwrap());
}

/// Test: called_once/twice/thrice track exact counts.
#[test]
fn test_exact_count_predicates() {
    let stub = echo_stub();

    stub.invoke("f", vec![json!(1)]).unwrap();
    assert!(stub.called_once("f").unwrap());
    assert!(!stub.called_twice("f").unwrap());

    stub.invoke("f", vec![json!(2)]).unwrap();
    assert!(stub.called_twice("f").unwrap());

    stub.invoke("f", vec![json!(3)]).unwrap();
    assert!(stub.called_thrice("f").unwrap());
    assert!(stub.called_times("f", 3).unwrap());
    assert!(!stub.called_times("f", 4).unwrap());
}

// =============================================================================
// Exact sequence equality
// =============================================================================

/// Test: called_with_exactly is true iff the given list equals the full
/// chronological input sequence, element for element.
#[test]
fn test_called_with_exactly_full_sequence() {
    let stub = echo_stub();

    stub.invoke("f", vec![json!(1)]).unwrap();
    stub.invoke("f", vec![json!(2)]).unwrap();

    assert!(stub
        .called_with_exactly("f", &[vec![json!(1)], vec![json!(2)]])
        .unwrap());

    // Prefix fails
    assert!(!stub.called_with_exactly("f", &[vec![json!(1)]]).unwrap());
    // Reorder fails
    assert!(!stub
        .called_with_exactly("f", &[vec![json!(2)], vec![json!(1)]])
        .unwrap());
    // Superset fails
    assert!(!stub
        .called_with_exactly("f", &[vec![json!(1)], vec![json!(2)], vec![json!(3)]])
        .unwrap());
}

/// Test: predicate search and output search scan the whole log.
#[test]
fn test_called_where_and_returned() {
    let stub = echo_stub();

    stub.invoke("f", vec![json!(10)]).unwrap();
    stub.invoke("f", vec![json!(20)]).unwrap();

    assert!(stub
        .called_where("f", |r| r.input[0] == json!(20))
        .unwrap());
    assert!(!stub
        .called_where("f", |r| r.input[0] == json!(30))
        .unwrap());
    assert!(stub.returned("f", &json!({"echo": 10})).unwrap());
    assert!(!stub.returned("f", &json!({"echo": 30})).unwrap());
}

// =============================================================================
// Query failure modes
// =============================================================================

/// Test: positional queries beyond the recorded count are errors,
/// never defaults.
#[test]
fn test_out_of_range_positions_are_errors() {
    let stub = echo_stub();

    stub.invoke("f", vec![json!(1)]).unwrap();

    let err = stub.nth_call("f", 2).unwrap_err();
    assert_eq!(
        err,
        QueryError::OutOfRange {
            name: "f".into(),
            index: 2,
            recorded: 1
        }
    );

    // An uncalled function has no last call
    let stub = echo_stub();
    assert!(matches!(
        stub.last_call("f").unwrap_err(),
        QueryError::OutOfRange { recorded: 0, .. }
    ));
}

/// Test: querying a stub built without call_info fails explicitly.
#[test]
fn test_disabled_recording_fails_queries() {
    let stub = Stub::builder()
        .clause("f", ArgSpec::any(1), |args| Ok(args[0].clone()))
        .build()
        .unwrap();

    // Dispatch still works without recording
    assert_eq!(stub.invoke("f", vec![json!(9)]).unwrap(), json!(9));

    assert_eq!(
        stub.call_count("f").unwrap_err(),
        QueryError::RecordingDisabled
    );
    assert_eq!(
        stub.called("f").unwrap_err(),
        QueryError::RecordingDisabled
    );
}

/// Test: querying a name never configured is a distinct error.
#[test]
fn test_unknown_name_queries_fail() {
    let stub = echo_stub();

    assert_eq!(
        stub.call_count("missing").unwrap_err(),
        QueryError::UnknownFunction {
            name: "missing".into()
        }
    );
}

// =============================================================================
// Introspection envelope
// =============================================================================

/// Test: the JSON entry point answers the same queries as the typed
/// methods.
#[test]
fn test_inspect_json_round_trip() {
    let stub = echo_stub();

    stub.invoke("f", vec![json!(1)]).unwrap();
    stub.invoke("f", vec![json!(2)]).unwrap();

    let answer = stub.inspect_json(r#"{"query": "call_count", "name": "f"}"#);
    assert_eq!(answer.data(), Some(&json!(2)));

    let answer = stub.inspect_json(r#"{"query": "called_with", "name": "f", "args": [2]}"#);
    assert_eq!(answer.data(), Some(&json!(true)));

    let answer = stub.inspect_json(r#"{"query": "first_call", "name": "f"}"#);
    let record = answer.data().unwrap();
    assert_eq!(record["input"], json!([1]));
    assert_eq!(record["seq"], json!(1));
}

/// Test: envelope failures carry stable error codes.
#[test]
fn test_inspect_json_error_codes() {
    let stub = echo_stub();

    let answer = stub.inspect_json(r#"{"query": "nth_call", "name": "f", "index": 1}"#);
    assert!(answer.to_json().contains("STUB_QUERY_OUT_OF_RANGE"));

    let answer = stub.inspect_json(r#"{"query": "explode", "name": "f"}"#);
    assert!(answer.to_json().contains("STUB_INVALID_QUERY"));
}
