//! Immutable label sets.
//!
//! A [`Labels`] value is the unit of identity for a metric's "label combination": the registry
//! facade interns one live cell per distinct [`Labels`] a metric is observed with.

use std::{borrow::Cow, fmt};

use crate::error::{Error, Result};

/// Returns `true` if `name` is a legal label (or metric) name component: starts with a letter or
/// underscore, followed by letters, digits, or underscores.
fn is_legal_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate_label_name(name: &str) -> Result<()> {
    if !is_legal_name(name) {
        return Err(Error::invalid_name(format!(
            "label name {name:?} must match [a-zA-Z_][a-zA-Z0-9_]*"
        )));
    }
    if name.starts_with("__") {
        return Err(Error::invalid_name(format!(
            "label name {name:?} uses the reserved `__` prefix"
        )));
    }
    Ok(())
}

fn validate_label_value(value: &str) -> Result<()> {
    if value.contains('\0') {
        return Err(Error::invalid_label("label value must not contain a NUL byte"));
    }
    Ok(())
}

/// An immutable, ordered set of `(name, value)` label pairs.
///
/// Labels are always stored and iterated in their canonical form: sorted by name, ascending.
/// Two label sets compare equal, and hash identically, iff they carry the same pairs regardless
/// of the order they were constructed in.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Labels {
    pairs: Vec<(Cow<'static, str>, String)>,
}

impl Labels {
    /// An empty label set.
    pub fn empty() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Builds a [`Labels`] from an iterator of `(name, value)` pairs.
    ///
    /// Rejects empty or malformed names, reserved `__`-prefixed names, NUL bytes in values, and
    /// duplicate names.
    pub fn from_pairs<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Result<Self>
    where
        N: Into<Cow<'static, str>>,
        V: Into<String>,
    {
        let mut collected: Vec<(Cow<'static, str>, String)> = Vec::new();
        for (name, value) in pairs {
            let name = name.into();
            let value = value.into();
            validate_label_name(&name)?;
            validate_label_value(&value)?;
            if collected.iter().any(|(n, _)| n == &name) {
                return Err(Error::invalid_label(format!("duplicate label name {name:?}")));
            }
            collected.push((name, value));
        }
        collected.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Self { pairs: collected })
    }

    /// Builds a [`Labels`] from a flat list of alternating name/value string slices.
    ///
    /// Returns [`Error::invalid_label`] if given an odd number of arguments.
    pub fn from_alternating(args: &[&str]) -> Result<Self> {
        if args.len() % 2 != 0 {
            return Err(Error::invalid_label(
                "alternating name/value arguments must have even length",
            ));
        }
        let pairs = args.chunks_exact(2).map(|pair| (pair[0].to_owned(), pair[1].to_owned()));
        Self::from_pairs(pairs.map(|(n, v)| (Cow::Owned(n), v)))
    }

    /// Returns `true` if this label set carries no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Looks up a label's value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// Returns `true` if a label with the given name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(n, _)| n == name)
    }

    /// Iterates the pairs in canonical (sorted-by-name) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_ref(), v.as_str()))
    }

    /// Merges two disjoint label sets, failing if they share a name.
    pub fn merge(&self, other: &Labels) -> Result<Labels> {
        let mut merged = self.pairs.clone();
        for (name, value) in &other.pairs {
            if merged.iter().any(|(n, _)| n == name) {
                return Err(Error::invalid_label(format!(
                    "label {name:?} present in both label sets being merged"
                )));
            }
            merged.push((name.clone(), value.clone()));
        }
        merged.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Labels { pairs: merged })
    }

    /// The combined UTF-8 length, in chars, of every name and value. Used to enforce the
    /// exemplar size bound.
    pub fn combined_char_len(&self) -> usize {
        self.pairs.iter().map(|(n, v)| n.chars().count() + v.chars().count()).sum()
    }
}

impl fmt::Display for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{name}={value:?}")?;
        }
        write!(f, "}}")
    }
}

impl<'a> IntoIterator for &'a Labels {
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (Cow<'static, str>, String)>,
        fn(&'a (Cow<'static, str>, String)) -> (&'a str, &'a str),
    >;
    type Item = (&'a str, &'a str);

    fn into_iter(self) -> Self::IntoIter {
        fn project(pair: &(Cow<'static, str>, String)) -> (&str, &str) {
            (pair.0.as_ref(), pair.1.as_str())
        }
        self.pairs.iter().map(project)
    }
}

/// Checks that none of a label set's names collide with a reserved name used internally by a
/// particular metric kind (`le` for histograms, `quantile` for summaries, `state` for state
/// sets). Called at registration time for const labels and at each new label combination for
/// dynamic ones.
pub fn reject_reserved_names(labels: &Labels, reserved: &[&str]) -> Result<()> {
    for (name, _) in labels.iter() {
        if reserved.contains(&name) {
            return Err(Error::invalid_label(format!(
                "label name {name:?} is reserved and may not be set by caller code"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct_and_canonical_order() {
        let labels = Labels::from_pairs([("status", "200"), ("method", "GET")]).unwrap();
        let pairs: Vec<_> = labels.iter().collect();
        assert_eq!(pairs, vec![("method", "GET"), ("status", "200")]);
    }

    #[test]
    fn test_equality_ignores_construction_order() {
        let a = Labels::from_pairs([("a", "1"), ("b", "2")]).unwrap();
        let b = Labels::from_pairs([("b", "2"), ("a", "1")]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_empty_and_reserved_prefix() {
        assert!(Labels::from_pairs([("", "x")]).is_err());
        assert!(Labels::from_pairs([("__reserved", "x")]).is_err());
        assert!(Labels::from_pairs([("1bad", "x")]).is_err());
    }

    #[test]
    fn test_rejects_duplicate_name() {
        assert!(Labels::from_pairs([("a", "1"), ("a", "2")]).is_err());
    }

    #[test]
    fn test_rejects_nul_byte_value() {
        assert!(Labels::from_pairs([("a", "x\0y")]).is_err());
    }

    #[test]
    fn test_merge_disjoint_and_overlap() {
        let a = Labels::from_pairs([("a", "1")]).unwrap();
        let b = Labels::from_pairs([("b", "2")]).unwrap();
        let merged = a.merge(&b).unwrap();
        assert_eq!(merged.len(), 2);

        let c = Labels::from_pairs([("a", "3")]).unwrap();
        assert!(a.merge(&c).is_err());
    }

    #[test]
    fn test_reject_reserved_names() {
        let labels = Labels::from_pairs([("le", "1")]).unwrap();
        assert!(reject_reserved_names(&labels, &["le", "quantile", "state"]).is_err());
    }
}
