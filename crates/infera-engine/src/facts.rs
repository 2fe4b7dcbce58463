//! Facts: informative solution values projected for consumption.
//!
//! A fact is one inferred annotation on one member, stored as two interned
//! strings: the qualified annotation class name and its parameter text.
//! Projection runs once per cache build, against exactly one solution
//! snapshot, so every reader of a table sees one coherent epoch.

use infera_common::{Atom, ShardedInterner};
use infera_solver::{Condition, Nullity, Solution, Value};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Qualified names of the annotation classes facts are projected into.
pub mod annotations {
    pub const NOT_NULL: &str = "org.jetbrains.annotations.NotNull";
    pub const NULLABLE: &str = "org.jetbrains.annotations.Nullable";
    pub const CONTRACT: &str = "org.jetbrains.annotations.Contract";
}

/// One inferred annotation: qualified class name plus parameter text.
///
/// Both halves are interned, so a fact is two u32s and equality is
/// structural. `parameters` is [`Atom::NONE`] for a parameterless
/// annotation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Fact {
    pub name: Atom,
    pub parameters: Atom,
}

/// The solved, per-epoch mapping from member name to inferred facts.
pub type FactTable = FxHashMap<Atom, Vec<Fact>>;

/// What one member's informative keys add up to, before rendering.
#[derive(Default)]
struct MemberFacts {
    always: Option<Value>,
    pure: bool,
    clauses: Vec<(u16, Nullity, Value)>,
}

/// Project a solution snapshot into per-member fact lists.
///
/// Only informative values survive; `Top` keys contribute nothing and a
/// member with no informative keys simply does not appear in the table
/// (queries for it return the empty list).
pub(crate) fn project(
    store: &infera_solver::EquationStore,
    solution: &Solution,
    names: &ShardedInterner,
) -> FactTable {
    let mut members: FxHashMap<Atom, MemberFacts> = FxHashMap::default();

    for id in store.keys() {
        let value = solution.get(id);
        if !value.is_informative() {
            continue;
        }
        let Some(key) = store.key(id) else {
            continue;
        };
        let entry = members.entry(key.member).or_default();
        match key.condition {
            Condition::Always => {
                if value == Value::Pure {
                    // Some indexers key purity unconditionally; fold it into
                    // the same flag the purity axis feeds.
                    entry.pure = true;
                } else {
                    entry.always = Some(value);
                }
            }
            Condition::Purity => {
                if value == Value::Pure {
                    entry.pure = true;
                } else {
                    tracing::debug!(
                        member = key.member.index(),
                        ?value,
                        "project: non-purity value on a purity key, skipping"
                    );
                }
            }
            Condition::ParamIs(index, nullity) => entry.clauses.push((index, nullity, value)),
        }
    }

    let mut table = FactTable::default();
    for (member, collected) in members {
        let facts = render_member(member, collected, store, names);
        if !facts.is_empty() {
            table.insert(member, facts);
        }
    }
    table
}

fn render_member(
    member: Atom,
    mut collected: MemberFacts,
    store: &infera_solver::EquationStore,
    names: &ShardedInterner,
) -> Vec<Fact> {
    let mut facts = Vec::new();
    let arity = store.arity(member);

    match collected.always {
        Some(Value::NotNull) => facts.push(Fact {
            name: names.intern(annotations::NOT_NULL),
            parameters: Atom::NONE,
        }),
        Some(Value::Null) => facts.push(Fact {
            name: names.intern(annotations::NULLABLE),
            parameters: Atom::NONE,
        }),
        _ => {}
    }

    let mut rows: Vec<String> = Vec::new();
    if let Some(value @ (Value::True | Value::False | Value::Fail)) = collected.always {
        // An unconditional forced result renders as an all-wildcard row;
        // nullity already rendered as @NotNull/@Nullable above.
        let effect = effect_text(value).unwrap_or_default();
        if let Some(arity) = arity {
            rows.push(contract_row(arity, None, effect));
        } else {
            tracing::warn!(
                member = member.index(),
                "project: unconditional contract dropped, member arity unknown"
            );
        }
    }

    collected.clauses.sort_by_key(|&(index, nullity, _)| (index, nullity));
    for (index, nullity, value) in collected.clauses {
        let Some(effect) = effect_text(value) else {
            tracing::debug!(
                member = member.index(),
                index,
                ?value,
                "project: value has no contract rendering, skipping clause"
            );
            continue;
        };
        match arity {
            Some(arity) if index < arity => {
                rows.push(contract_row(arity, Some((index, nullity)), effect));
            }
            _ => {
                tracing::warn!(
                    member = member.index(),
                    index,
                    "project: contract clause dropped, member arity unknown or exceeded"
                );
            }
        }
    }

    let contract_parameters = match (rows.is_empty(), collected.pure) {
        (true, false) => None,
        (true, true) => Some("pure = true".to_string()),
        (false, false) => Some(format!("\"{}\"", rows.join("; "))),
        (false, true) => Some(format!("value = \"{}\", pure = true", rows.join("; "))),
    };
    if let Some(parameters) = contract_parameters {
        facts.push(Fact {
            name: names.intern(annotations::CONTRACT),
            parameters: names.intern_owned(parameters),
        });
    }

    facts
}

/// One `args -> effect` row, with `_` for unconstrained parameters.
fn contract_row(arity: u16, constrained: Option<(u16, Nullity)>, effect: &str) -> String {
    if arity == 0 {
        return format!("-> {effect}");
    }
    let args: Vec<&str> = (0..arity)
        .map(|i| match constrained {
            Some((index, Nullity::Null)) if i == index => "null",
            Some((index, Nullity::NotNull)) if i == index => "!null",
            _ => "_",
        })
        .collect();
    format!("{} -> {effect}", args.join(", "))
}

fn effect_text(value: Value) -> Option<&'static str> {
    match value {
        Value::Fail => Some("fail"),
        Value::True => Some("true"),
        Value::False => Some("false"),
        Value::NotNull => Some("!null"),
        Value::Null => Some("null"),
        _ => None,
    }
}

/// Render a fact's external form, the way the downstream annotation
/// renderer expects it.
pub(crate) fn render_annotation(name: &str, parameters: &str) -> String {
    if parameters.is_empty() {
        format!("@{name}")
    } else {
        format!("@{name}({parameters})")
    }
}

#[cfg(test)]
#[path = "facts_tests.rs"]
mod tests;
