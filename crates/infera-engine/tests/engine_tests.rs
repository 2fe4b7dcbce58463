//! End-to-end engine behavior against a mock indexing service.

use infera_engine::{
    Condition, EquationSource, InferenceEngine, Nullity, RawExpr, SourceEquation, Value,
    annotations,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory stand-in for the indexing service, with swappable contents
/// and a call counter for the single-build property.
struct MockSource {
    equations: Mutex<Vec<SourceEquation>>,
    calls: AtomicUsize,
}

impl MockSource {
    fn new(equations: Vec<SourceEquation>) -> Arc<MockSource> {
        Arc::new(MockSource {
            equations: Mutex::new(equations),
            calls: AtomicUsize::new(0),
        })
    }

    fn set(&self, equations: Vec<SourceEquation>) {
        *self.equations.lock().unwrap() = equations;
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EquationSource for MockSource {
    fn for_each_equation(&self, visitor: &mut dyn FnMut(SourceEquation)) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        for eq in self.equations.lock().unwrap().iter() {
            visitor(eq.clone());
        }
    }
}

fn const_eq(member: &str, arity: u16, condition: Condition, value: Value) -> SourceEquation {
    SourceEquation {
        member: member.to_string(),
        arity,
        condition,
        rhs: RawExpr::Const(value),
    }
}

fn engine_over(source: &Arc<MockSource>) -> InferenceEngine {
    InferenceEngine::new(vec![Arc::clone(source) as Arc<dyn EquationSource>])
}

// Route engine logs through RUST_LOG when a test is run by hand.
fn init_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[test]
fn param0_null_equation_yields_a_single_contract_fact() {
    let source = MockSource::new(vec![const_eq(
        "M",
        1,
        Condition::ParamIs(0, Nullity::Null),
        Value::NotNull,
    )]);
    let engine = engine_over(&source);

    let facts = engine.facts_for("M");
    assert_eq!(facts.len(), 1);
    assert_eq!(
        engine.materialize(facts[0]).unwrap().as_ref(),
        "@org.jetbrains.annotations.Contract(\"null -> !null\")"
    );

    assert!(engine.facts_for("Unrelated").is_empty());
}

#[test]
fn self_referential_join_resolves_to_the_informative_value() {
    let source = MockSource::new(vec![
        SourceEquation {
            member: "M".to_string(),
            arity: 0,
            condition: Condition::Always,
            rhs: RawExpr::Join(vec![
                RawExpr::Const(Value::NotNull),
                RawExpr::Ref {
                    member: "N".to_string(),
                    condition: Condition::Always,
                },
            ]),
        },
        SourceEquation {
            member: "N".to_string(),
            arity: 0,
            condition: Condition::Always,
            rhs: RawExpr::Ref {
                member: "M".to_string(),
                condition: Condition::Always,
            },
        },
    ]);
    let engine = engine_over(&source);

    for member in ["M", "N"] {
        let facts = engine.facts_for(member);
        assert_eq!(facts.len(), 1, "{member} facts: {facts:?}");
        assert_eq!(
            engine.resolve_atom(facts[0].name).unwrap().as_ref(),
            annotations::NOT_NULL
        );
    }
}

#[test]
fn invalidation_drops_facts_for_removed_equations() {
    let source = MockSource::new(vec![const_eq("M", 0, Condition::Always, Value::NotNull)]);
    let engine = engine_over(&source);

    assert_eq!(engine.facts_for("M").len(), 1);
    assert_eq!(source.calls(), 1);

    // Removing the equations alone changes nothing: the cache still serves
    // the built epoch.
    source.set(vec![]);
    assert_eq!(engine.facts_for("M").len(), 1);
    assert_eq!(source.calls(), 1);

    engine.invalidate();
    assert!(engine.facts_for("M").is_empty());
    assert_eq!(source.calls(), 2);
}

#[test]
fn epoch_advances_per_invalidation() {
    let engine = InferenceEngine::new(vec![]);
    assert_eq!(engine.epoch(), 0);
    engine.invalidate();
    engine.invalidate();
    assert_eq!(engine.epoch(), 2);
}

#[test]
fn contributions_from_multiple_sources_merge() {
    let null_clause = MockSource::new(vec![const_eq(
        "pkg.A.check(java.lang.Object, java.lang.Object)",
        2,
        Condition::ParamIs(0, Nullity::Null),
        Value::Fail,
    )]);
    let other_clause = MockSource::new(vec![const_eq(
        "pkg.A.check(java.lang.Object, java.lang.Object)",
        2,
        Condition::ParamIs(1, Nullity::Null),
        Value::Fail,
    )]);
    let engine = InferenceEngine::new(vec![
        null_clause as Arc<dyn EquationSource>,
        other_clause as Arc<dyn EquationSource>,
    ]);

    let facts = engine.facts_for("pkg.A.check(java.lang.Object, java.lang.Object)");
    assert_eq!(facts.len(), 1);
    assert_eq!(
        engine.materialize(facts[0]).unwrap().as_ref(),
        "@org.jetbrains.annotations.Contract(\"null, _ -> fail; _, null -> fail\")"
    );
}

#[test]
fn require_non_null_shape_yields_notnull_and_contract() {
    let member = "java.lang.Object java.util.Objects.requireNonNull(java.lang.Object)";
    let source = MockSource::new(vec![
        const_eq(member, 1, Condition::Always, Value::NotNull),
        const_eq(member, 1, Condition::ParamIs(0, Nullity::Null), Value::Fail),
        const_eq(member, 1, Condition::Purity, Value::Pure),
    ]);
    let engine = engine_over(&source);

    let facts = engine.facts_for(member);
    assert_eq!(facts.len(), 2);
    assert_eq!(
        engine.materialize(facts[0]).unwrap().as_ref(),
        "@org.jetbrains.annotations.NotNull"
    );
    assert_eq!(
        engine.materialize(facts[1]).unwrap().as_ref(),
        "@org.jetbrains.annotations.Contract(value = \"null -> fail\", pure = true)"
    );
}

#[test]
fn malformed_contributions_are_local_failures() {
    init_logs();
    let source = MockSource::new(vec![
        SourceEquation {
            member: "pkg.A.bad()".to_string(),
            arity: 0,
            condition: Condition::Always,
            rhs: RawExpr::Join(vec![]),
        },
        const_eq("pkg.A.good()", 0, Condition::Always, Value::NotNull),
    ]);
    let engine = engine_over(&source);

    assert!(engine.facts_for("pkg.A.bad()").is_empty());
    assert_eq!(engine.facts_for("pkg.A.good()").len(), 1);
}

#[test]
fn materialize_memoizes_per_fact() {
    let source = MockSource::new(vec![const_eq("M", 0, Condition::Always, Value::NotNull)]);
    let engine = engine_over(&source);

    let fact = engine.facts_for("M")[0];
    let first = engine.materialize(fact).unwrap();
    let second = engine.materialize(fact).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn materialize_of_an_unresolvable_fact_is_none() {
    let engine = InferenceEngine::new(vec![]);
    let bogus = infera_engine::Fact {
        name: infera_engine::Atom(0xFFFF_FF00),
        parameters: infera_engine::Atom::NONE,
    };
    assert!(engine.materialize(bogus).is_none());
}

#[test]
fn queries_never_error_on_an_empty_engine() {
    let engine = InferenceEngine::new(vec![]);
    assert!(engine.facts_for("anything").is_empty());
    assert!(engine.facts_for("").is_empty());
}
