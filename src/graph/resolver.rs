//! Resolution of short type names to known fully-qualified identities.
//!
//! Three tiers, tried in order:
//!
//! 1. `package.Name` exists among the known identities.
//! 2. Fuzzy: the lowercase short name is a substring of a lowercase known
//!    identity. This tier is lenient on purpose and will happily pick
//!    `acme.UserServiceImpl` for `Service`; it is kept as an explicit
//!    degradation step rather than tightened to exact matching, and the
//!    winner among several candidates is chosen by [`FuzzyTieBreak`].
//! 3. Unresolved: the short name itself is returned. Edges built from it
//!    dangle, and renderers are expected to cope.

use serde::{Deserialize, Serialize};

use super::types::qualify;
pub use crate::config::FuzzyTieBreak;

/// Which tier produced an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tier", content = "identity", rename_all = "snake_case")]
pub enum Resolution {
    SamePackage(String),
    Fuzzy(String),
    Unresolved(String),
}

impl Resolution {
    pub fn identity(&self) -> &str {
        match self {
            Resolution::SamePackage(id) | Resolution::Fuzzy(id) | Resolution::Unresolved(id) => id,
        }
    }

    pub fn into_identity(self) -> String {
        match self {
            Resolution::SamePackage(id) | Resolution::Fuzzy(id) | Resolution::Unresolved(id) => id,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Resolution::Unresolved(_))
    }
}

/// Resolver over a fixed, sorted set of known identities.
#[derive(Debug, Clone, Default)]
pub struct NameResolver {
    /// Sorted, deduplicated. Keeping the scan order fixed is what makes the
    /// fuzzy tier deterministic.
    known: Vec<String>,
    lowered: Vec<String>,
    tie_break: FuzzyTieBreak,
}

impl NameResolver {
    pub fn new<I, S>(identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut known: Vec<String> = identities.into_iter().map(Into::into).collect();
        known.sort_unstable();
        known.dedup();
        let lowered = known.iter().map(|id| id.to_lowercase()).collect();
        Self {
            known,
            lowered,
            tie_break: FuzzyTieBreak::default(),
        }
    }

    pub fn with_tie_break(mut self, tie_break: FuzzyTieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn known(&self) -> &[String] {
        &self.known
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.known.binary_search_by(|k| k.as_str().cmp(identity)).is_ok()
    }

    pub fn resolve(&self, short_name: &str, context_package: &str) -> Resolution {
        let candidate = qualify(context_package, short_name);
        if self.contains(&candidate) {
            return Resolution::SamePackage(candidate);
        }

        if !short_name.is_empty() {
            let needle = short_name.to_lowercase();
            let mut matches = self
                .known
                .iter()
                .zip(&self.lowered)
                .filter(|(_, lower)| lower.contains(&needle))
                .map(|(id, _)| id);

            let picked = match self.tie_break {
                FuzzyTieBreak::FirstLexical => matches.next(),
                // `known` is sorted, so min_by_key keeps the lexically first
                // among equal lengths.
                FuzzyTieBreak::ShortestName => matches.min_by_key(|id| id.len()),
            };
            if let Some(id) = picked {
                return Resolution::Fuzzy(id.clone());
            }
        }

        Resolution::Unresolved(short_name.to_string())
    }

    /// Shorthand for `resolve(..).into_identity()`.
    pub fn resolve_identity(&self, short_name: &str, context_package: &str) -> String {
        self.resolve(short_name, context_package).into_identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> NameResolver {
        NameResolver::new([
            "zeta.Foo",
            "pkg.Foo",
            "alpha.Foo",
            "pkg.Bar",
            "other.FooBarService",
        ])
    }

    #[test]
    fn test_same_package_wins_over_other_matches() {
        let r = resolver();
        assert_eq!(r.resolve("Foo", "pkg"), Resolution::SamePackage("pkg.Foo".into()));
        assert_eq!(r.resolve("Foo", "zeta").identity(), "zeta.Foo");
    }

    #[test]
    fn test_fuzzy_first_lexical_is_deterministic() {
        let r = resolver();
        // No `nothere.Foo`: first sorted identity containing "foo".
        assert_eq!(r.resolve("Foo", "nothere"), Resolution::Fuzzy("alpha.Foo".into()));
        // Insertion order does not matter.
        let shuffled = NameResolver::new(["pkg.Foo", "alpha.Foo", "zeta.Foo"]);
        assert_eq!(shuffled.resolve("Foo", "x").identity(), "alpha.Foo");
    }

    #[test]
    fn test_fuzzy_is_case_insensitive_substring() {
        let r = resolver();
        assert_eq!(
            r.resolve("barservice", "nothere"),
            Resolution::Fuzzy("other.FooBarService".into())
        );
    }

    #[test]
    fn test_fuzzy_shortest_name_tie_break() {
        let r = NameResolver::new(["aaa.LongServiceName", "b.Service", "c.Service"])
            .with_tie_break(FuzzyTieBreak::ShortestName);
        assert_eq!(r.resolve("Service", "x"), Resolution::Fuzzy("b.Service".into()));

        let lexical = NameResolver::new(["aaa.LongServiceName", "b.Service"]);
        assert_eq!(lexical.resolve("Service", "x").identity(), "aaa.LongServiceName");
    }

    #[test]
    fn test_unresolved_falls_back_to_short_name() {
        let r = resolver();
        let res = r.resolve("Serializable", "pkg");
        assert_eq!(res, Resolution::Unresolved("Serializable".into()));
        assert!(!res.is_resolved());
        assert_eq!(r.resolve_identity("Serializable", "pkg"), "Serializable");
    }

    #[test]
    fn test_empty_name_is_unresolved() {
        let r = resolver();
        assert_eq!(r.resolve("", "nothere"), Resolution::Unresolved(String::new()));
    }

    #[test]
    fn test_empty_resolver() {
        let r = NameResolver::default();
        assert!(r.known().is_empty());
        assert_eq!(r.resolve_identity("Foo", "pkg"), "Foo");
    }
}
