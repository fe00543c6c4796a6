//! Focused neighborhood expansion.
//!
//! Starting from a seed, each round scans every relationship once and pulls
//! in targets of members and sources pointing at members. The result is a
//! bounded-radius neighborhood rather than full reachability, which keeps
//! diagrams of large projects readable.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::extract::TypeCatalog;
use crate::graph::{DependencyGraph, NameResolver, RelationKind, DEFAULT_PACKAGE};

/// A relationship as seen by focus expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusRelation {
    pub kind: RelationKind,
    pub from: String,
    /// Target after resolution.
    pub to: String,
    /// Target as written in source, for suffix matching. `None` when the
    /// target is already a unit identity.
    pub raw_to: Option<String>,
}

/// Source of relationships for [`expand_focus`].
pub trait RelationIndex {
    /// All relationships, with targets resolved in the context of `seed`.
    fn focus_relations(&self, seed: &str) -> Vec<FocusRelation>;
}

impl RelationIndex for DependencyGraph {
    fn focus_relations(&self, _seed: &str) -> Vec<FocusRelation> {
        self.edges()
            .into_iter()
            .map(|(from, to, kind)| FocusRelation {
                kind,
                from: from.to_string(),
                to: to.to_string(),
                raw_to: None,
            })
            .collect()
    }
}

/// A [`TypeCatalog`] paired with the resolver used for its targets.
pub struct ResolvedCatalog<'a> {
    catalog: &'a TypeCatalog,
    resolver: &'a NameResolver,
}

impl<'a> ResolvedCatalog<'a> {
    pub fn new(catalog: &'a TypeCatalog, resolver: &'a NameResolver) -> Self {
        Self { catalog, resolver }
    }
}

impl RelationIndex for ResolvedCatalog<'_> {
    /// Every target is resolved against the seed's package, not the package
    /// of the declaring type.
    fn focus_relations(&self, seed: &str) -> Vec<FocusRelation> {
        let package = self.catalog.package_of(seed).unwrap_or(DEFAULT_PACKAGE);
        self.catalog
            .relationships()
            .iter()
            .map(|rel| FocusRelation {
                kind: rel.kind,
                from: rel.from.clone(),
                to: self.resolver.resolve_identity(&rel.to, package),
                raw_to: Some(rel.to.clone()),
            })
            .collect()
    }
}

impl RelationIndex for TypeCatalog {
    fn focus_relations(&self, seed: &str) -> Vec<FocusRelation> {
        let resolver = self.resolver();
        ResolvedCatalog::new(self, &resolver).focus_relations(seed)
    }
}

/// An edge kept in a focused subgraph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct FocusEdge {
    pub from: String,
    pub to: String,
    pub kind: RelationKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusedSubgraph {
    pub seed: String,
    pub members: BTreeSet<String>,
    /// Sorted; both endpoints are members.
    pub edges: Vec<FocusEdge>,
    /// Member count after each executed round.
    pub round_sizes: Vec<usize>,
    /// A round added nothing before the cap was reached.
    pub stabilized: bool,
}

impl FocusedSubgraph {
    pub fn contains(&self, identity: &str) -> bool {
        self.members.contains(identity)
    }
}

/// Grow a neighborhood around `seed` for at most `rounds` rounds.
///
/// Each round reads the member set as it stood when the round began. A
/// relationship adds its target when its source is a member, and adds its
/// source when its resolved target is a member or some member ends with the
/// raw target name, if the relationship carries one.
pub fn expand_focus<I>(index: &I, seed: &str, rounds: usize) -> FocusedSubgraph
where
    I: RelationIndex + ?Sized,
{
    let relations = index.focus_relations(seed);
    let mut members: BTreeSet<String> = BTreeSet::new();
    members.insert(seed.to_string());

    let mut round_sizes = Vec::new();
    let mut stabilized = false;

    for round in 1..=rounds {
        let snapshot = members.clone();
        let mut added: BTreeSet<String> = BTreeSet::new();

        for rel in &relations {
            if snapshot.contains(&rel.from) && !snapshot.contains(&rel.to) {
                added.insert(rel.to.clone());
            }
            let points_at_member = snapshot.contains(&rel.to)
                || rel
                    .raw_to
                    .as_deref()
                    .is_some_and(|raw| snapshot.iter().any(|m| m.ends_with(raw)));
            if points_at_member && !snapshot.contains(&rel.from) {
                added.insert(rel.from.clone());
            }
        }

        debug!(round, added = added.len(), "focus round");
        if added.is_empty() {
            stabilized = true;
            round_sizes.push(members.len());
            break;
        }
        members.extend(added);
        round_sizes.push(members.len());
    }

    let edges: BTreeSet<FocusEdge> = relations
        .into_iter()
        .filter(|rel| members.contains(&rel.from) && members.contains(&rel.to))
        .map(|rel| FocusEdge {
            from: rel.from,
            to: rel.to,
            kind: rel.kind,
        })
        .collect();

    info!(
        seed,
        members = members.len(),
        edges = edges.len(),
        stabilized,
        "focused subgraph built"
    );

    FocusedSubgraph {
        seed: seed.to_string(),
        members,
        edges: edges.into_iter().collect(),
        round_sizes,
        stabilized,
    }
}
