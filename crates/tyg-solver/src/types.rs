//! Type expressions.

use std::fmt;

use serde::Serialize;

/// Names the fixers may introduce into annotations. All of them are
/// imported from the `typing` module.
pub const TYPING_VOCABULARY: &[&str] = &[
    "Any",
    "Callable",
    "Dict",
    "FrozenSet",
    "Generator",
    "Iterable",
    "Iterator",
    "List",
    "Mapping",
    "Optional",
    "Sequence",
    "Set",
    "Tuple",
    "Type",
    "TypeVar",
    "Union",
];

#[must_use]
pub fn is_typing_name(name: &str) -> bool {
    TYPING_VOCABULARY.binary_search(&name).is_ok()
}

/// Number of type arguments a generic accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    Variadic,
}

impl Arity {
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Fixed(expected) => expected == count,
            Self::Variadic => count > 0,
        }
    }
}

/// Arity of a known generic, `None` for names that take no parameters or
/// are not known.
#[must_use]
pub fn generic_arity(name: &str) -> Option<Arity> {
    match name {
        "List" | "Set" | "FrozenSet" | "Optional" | "Iterator" | "Iterable" | "Sequence"
        | "Type" => Some(Arity::Fixed(1)),
        "Dict" | "Mapping" => Some(Arity::Fixed(2)),
        "Generator" => Some(Arity::Fixed(3)),
        "Tuple" | "Callable" | "Union" => Some(Arity::Variadic),
        _ => None,
    }
}

/// A type as written in an annotation.
///
/// `Union` members are kept flat, free of duplicates and sorted by their
/// rendered text; build unions through [`TypeExpr::union_of`] or
/// [`crate::unify`] to keep that shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeExpr {
    Atomic { name: String },
    Generic { name: String, args: Vec<TypeExpr> },
    Union { members: Vec<TypeExpr> },
}

impl TypeExpr {
    pub fn atomic(name: impl Into<String>) -> Self {
        Self::Atomic { name: name.into() }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        Self::Generic {
            name: name.into(),
            args,
        }
    }

    #[must_use]
    pub fn any() -> Self {
        Self::atomic("Any")
    }

    #[must_use]
    pub fn none() -> Self {
        Self::atomic("None")
    }

    #[must_use]
    pub fn list(element: TypeExpr) -> Self {
        Self::generic("List", vec![element])
    }

    #[must_use]
    pub fn set(element: TypeExpr) -> Self {
        Self::generic("Set", vec![element])
    }

    #[must_use]
    pub fn dict(key: TypeExpr, value: TypeExpr) -> Self {
        Self::generic("Dict", vec![key, value])
    }

    #[must_use]
    pub fn optional(inner: TypeExpr) -> Self {
        Self::generic("Optional", vec![inner])
    }

    #[must_use]
    pub fn iterator(element: TypeExpr) -> Self {
        Self::generic("Iterator", vec![element])
    }

    /// `Tuple[a, b, ...]` for a fixed-size tuple.
    #[must_use]
    pub fn tuple(elements: Vec<TypeExpr>) -> Self {
        Self::generic("Tuple", elements)
    }

    /// `Tuple[Any, ...]`
    #[must_use]
    pub fn tuple_of_any() -> Self {
        Self::tuple(vec![Self::any(), Self::atomic("...")])
    }

    /// Union of `members` after flattening nested unions and removing
    /// duplicates. A single distinct member is returned as is.
    #[must_use]
    pub fn union_of(members: impl IntoIterator<Item = TypeExpr>) -> Self {
        let mut flat = Vec::new();
        for member in members {
            match member {
                Self::Union { members } => flat.extend(members),
                other => flat.push(other),
            }
        }
        sort_members(&mut flat);
        match flat.len() {
            0 => Self::any(),
            1 => flat.swap_remove(0),
            _ => Self::Union { members: flat },
        }
    }

    /// Head name: the atomic name, the generic's name, or `Union`.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Atomic { name } | Self::Generic { name, .. } => name,
            Self::Union { .. } => "Union",
        }
    }

    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Atomic { name } if name == "Any")
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::Atomic { name } if name == "None")
    }

    #[must_use]
    pub fn is_atomic(&self, expected: &str) -> bool {
        matches!(self, Self::Atomic { name } if name == expected)
    }

    /// Whether `Any` appears anywhere in the expression.
    #[must_use]
    pub fn contains_any(&self) -> bool {
        match self {
            Self::Atomic { .. } => self.is_any(),
            Self::Generic { args, .. } => args.iter().any(Self::contains_any),
            Self::Union { members } => members.iter().any(Self::contains_any),
        }
    }

    /// Every head name used in the expression, outermost first.
    #[must_use]
    pub fn referenced_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        names.push(self.name());
        match self {
            Self::Atomic { .. } => {}
            Self::Generic { args, .. } => args.iter().for_each(|arg| arg.collect_names(names)),
            Self::Union { members } => members.iter().for_each(|m| m.collect_names(names)),
        }
    }
}

/// Sort by rendered text and drop duplicates.
pub(crate) fn sort_members(members: &mut Vec<TypeExpr>) {
    members.sort_by_cached_key(ToString::to_string);
    members.dedup();
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, args) = match self {
            Self::Atomic { name } => return f.write_str(name),
            Self::Generic { name, args } => (name.as_str(), args),
            Self::Union { members } => ("Union", members),
        };
        f.write_str(name)?;
        if args.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod types_tests;
