use super::*;

#[test]
fn join_is_commutative() {
    for a in Value::ALL {
        for b in Value::ALL {
            assert_eq!(a.join(b), b.join(a), "join({a:?}, {b:?})");
        }
    }
}

#[test]
fn join_is_associative() {
    for a in Value::ALL {
        for b in Value::ALL {
            for c in Value::ALL {
                assert_eq!(
                    a.join(b).join(c),
                    a.join(b.join(c)),
                    "join({a:?}, {b:?}, {c:?})"
                );
            }
        }
    }
}

#[test]
fn join_is_idempotent() {
    for a in Value::ALL {
        assert_eq!(a.join(a), a);
    }
}

#[test]
fn bot_is_identity_and_top_absorbs() {
    for a in Value::ALL {
        assert_eq!(Value::Bot.join(a), a);
        assert_eq!(Value::Top.join(a), Value::Top);
    }
}

#[test]
fn join_is_an_upper_bound() {
    for a in Value::ALL {
        for b in Value::ALL {
            let j = a.join(b);
            assert!(a.le(j), "{a:?} <= join({a:?}, {b:?})");
            assert!(b.le(j), "{b:?} <= join({a:?}, {b:?})");
        }
    }
}

#[test]
fn join_is_monotone() {
    // a <= b implies join(a, c) <= join(b, c).
    for a in Value::ALL {
        for b in Value::ALL {
            if !a.le(b) {
                continue;
            }
            for c in Value::ALL {
                assert!(
                    a.join(c).le(b.join(c)),
                    "monotonicity broke at ({a:?}, {b:?}, {c:?})"
                );
            }
        }
    }
}

#[test]
fn distinct_informative_elements_join_to_top() {
    assert_eq!(Value::NotNull.join(Value::Null), Value::Top);
    assert_eq!(Value::True.join(Value::False), Value::Top);
    assert_eq!(Value::Fail.join(Value::Pure), Value::Top);
}

#[test]
fn negate_flips_booleans_only() {
    assert_eq!(Value::True.negate(), Value::False);
    assert_eq!(Value::False.negate(), Value::True);
    for v in [Value::Bot, Value::NotNull, Value::Null, Value::Fail, Value::Pure, Value::Top] {
        assert_eq!(v.negate(), v);
    }
}

#[test]
fn negate_is_monotone() {
    for a in Value::ALL {
        for b in Value::ALL {
            if a.le(b) {
                assert!(a.negate().le(b.negate()), "negate broke order at ({a:?}, {b:?})");
            }
        }
    }
}

#[test]
fn informative_excludes_sentinels() {
    assert!(!Value::Bot.is_informative());
    assert!(!Value::Top.is_informative());
    for v in [Value::NotNull, Value::Null, Value::True, Value::False, Value::Fail, Value::Pure] {
        assert!(v.is_informative());
    }
}
