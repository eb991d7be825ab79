//! Type unification.
//!
//! `unify` merges the types observed for one value (all return
//! expressions of a function, all assignments to a name, all elements of a
//! literal) into a single annotation.

use smallvec::SmallVec;
use tracing::trace;

use crate::types::{TypeExpr, sort_members};

const TYPE_LIST_INLINE: usize = 8;
type TypeListBuffer = SmallVec<[TypeExpr; TYPE_LIST_INLINE]>;

/// Merge `types` into one expression.
///
/// - nested unions are flattened and `Any` members are dropped;
/// - nothing left gives `Any`, one distinct member gives that member;
/// - `float` absorbs `int`;
/// - anything else becomes a `Union` sorted by rendered text.
///
/// The result does not depend on how the input was grouped: unifying
/// partial results gives the same answer as unifying everything at once.
pub fn unify<I>(types: I) -> TypeExpr
where
    I: IntoIterator<Item = TypeExpr>,
{
    let mut flat: TypeListBuffer = SmallVec::new();
    for member in types {
        push_union_member(&mut flat, member);
    }
    normalize_union(flat)
}

/// Two-member fast path.
#[must_use]
pub fn unify2(left: TypeExpr, right: TypeExpr) -> TypeExpr {
    unify([left, right])
}

fn push_union_member(flat: &mut TypeListBuffer, member: TypeExpr) {
    match member {
        TypeExpr::Union { members } => flat.extend(members),
        other => flat.push(other),
    }
}

fn normalize_union(mut flat: TypeListBuffer) -> TypeExpr {
    flat.retain(|member| !member.is_any());
    absorb_int_into_float(&mut flat);

    let mut members = flat.into_vec();
    sort_members(&mut members);
    trace!(members = members.len(), "normalized union");
    match members.len() {
        0 => TypeExpr::any(),
        1 => members.swap_remove(0),
        _ => TypeExpr::Union { members },
    }
}

fn absorb_int_into_float(flat: &mut TypeListBuffer) {
    if flat.iter().any(|member| member.is_atomic("float")) {
        flat.retain(|member| !member.is_atomic("int"));
    }
}

#[cfg(test)]
#[path = "../tests/unify_tests.rs"]
mod unify_tests;
