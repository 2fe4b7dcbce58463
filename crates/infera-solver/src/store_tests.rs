use super::*;
use crate::key::Nullity;
use crate::lattice::Value;
use infera_common::ShardedInterner;

fn setup() -> (ShardedInterner, EquationStore) {
    (ShardedInterner::new(), EquationStore::new())
}

#[test]
fn accepted_equations_are_retrievable() {
    let (names, mut store) = setup();
    let m = names.intern("pkg.Cls.f()");
    let lhs = store.intern_key(Key::always(m));

    assert!(store.add_equation(Equation::new(lhs, Expr::Const(Value::NotNull))));
    assert_eq!(store.equations_for(lhs), &[Expr::Const(Value::NotNull)]);
    assert_eq!(store.len(), 1);
    assert_eq!(store.equation_count(), 1);
}

#[test]
fn contributions_for_one_key_accumulate() {
    let (names, mut store) = setup();
    let m = names.intern("pkg.Cls.f()");
    let lhs = store.intern_key(Key::always(m));

    assert!(store.add_equation(Equation::new(lhs, Expr::Const(Value::NotNull))));
    assert!(store.add_equation(Equation::new(lhs, Expr::Const(Value::Pure))));
    assert_eq!(store.equations_for(lhs).len(), 2);
    assert_eq!(store.len(), 1);
    assert_eq!(store.equation_count(), 2);
}

#[test]
fn malformed_equation_is_dropped_and_store_untouched() {
    let (names, mut store) = setup();
    let m = names.intern("pkg.Cls.f()");
    let lhs = store.intern_key(Key::always(m));

    assert!(!store.add_equation(Equation::new(lhs, Expr::Join(vec![]))));
    assert!(!store.add_equation(Equation::new(lhs, Expr::Const(Value::Bot))));
    assert!(store.is_empty());
    assert_eq!(store.equations_for(lhs), &[] as &[Expr]);
}

#[test]
fn condition_past_declared_arity_is_dropped() {
    let (names, mut store) = setup();
    let m = names.intern("pkg.Cls.f(int)");
    store.set_arity(m, 1);

    let in_range = store.intern_key(Key::param(m, 0, Nullity::Null));
    let out_of_range = store.intern_key(Key::param(m, 1, Nullity::Null));

    assert!(store.add_equation(Equation::new(in_range, Expr::Const(Value::Fail))));
    assert!(!store.add_equation(Equation::new(out_of_range, Expr::Const(Value::Fail))));
    assert_eq!(store.len(), 1);
}

#[test]
fn conflicting_arity_keeps_first_declaration() {
    let (names, mut store) = setup();
    let m = names.intern("pkg.Cls.f(int, int)");
    store.set_arity(m, 2);
    store.set_arity(m, 3);
    assert_eq!(store.arity(m), Some(2));
}

#[test]
fn keys_iterate_in_insertion_order() {
    let (names, mut store) = setup();
    let ids: Vec<KeyId> = ["a.A.f()", "a.A.g()", "a.A.h()"]
        .iter()
        .map(|n| store.intern_key(Key::always(names.intern(n))))
        .collect();

    for &id in ids.iter().rev() {
        store.add_equation(Equation::new(id, Expr::Const(Value::Pure)));
    }
    let order: Vec<KeyId> = store.keys().collect();
    let mut expected = ids;
    expected.reverse();
    assert_eq!(order, expected);
}
