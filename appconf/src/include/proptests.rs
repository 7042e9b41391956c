//! Property-based tests for include resolution over generated include graphs.

use std::collections::BTreeSet;

use proptest::prelude::*;

use super::{IncludeResolver, INCLUDE_DIRECTIVE};
use crate::source::{DocumentId, MemorySource};
use crate::tree::ConfigTree;

/// A DAG of documents `d0.yaml .. dN.yaml`. Edges only point from lower to
/// higher numbers, so there are no cycles.
#[derive(Debug, Clone)]
struct Graph {
    leaves: Vec<usize>,
    edges: Vec<(usize, usize)>,
}

impl Graph {
    fn source(&self) -> MemorySource {
        let mut source = MemorySource::new();
        for (doc, &leaf_count) in self.leaves.iter().enumerate() {
            let mut text = String::new();
            for leaf in 0..leaf_count {
                text.push_str(&format!("k{doc}_{leaf}: v{doc}_{leaf}\n"));
            }
            for &(_, to) in self.edges.iter().filter(|(from, _)| *from == doc) {
                text.push_str(&format!("inc{to}:\n  $include: d{to}.yaml\n"));
            }
            source.insert(format!("d{doc}.yaml"), text);
        }
        source
    }

    fn reachable(&self) -> BTreeSet<usize> {
        let mut seen = BTreeSet::from([0]);
        let mut stack = vec![0];
        while let Some(doc) = stack.pop() {
            for &(_, to) in self.edges.iter().filter(|(from, _)| *from == doc) {
                if seen.insert(to) {
                    stack.push(to);
                }
            }
        }
        seen
    }
}

fn graph_strategy() -> impl Strategy<Value = Graph> {
    (2usize..=5)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(1usize..=3, n),
                prop::collection::vec(any::<bool>(), n * n),
            )
        })
        .prop_map(|(leaves, flags)| {
            let n = leaves.len();
            let edges = (0..n)
                .flat_map(|from| ((from + 1)..n).map(move |to| (from, to)))
                .filter(|&(from, to)| flags[from * n + to])
                .collect();
            Graph { leaves, edges }
        })
}

proptest! {
    /// Acyclic include graphs resolve, and every leaf is attributed to the
    /// document that authored it under its own key.
    #[test]
    fn dag_leaves_keep_provenance(graph in graph_strategy()) {
        let source = graph.source();
        let resolved = IncludeResolver::new(&source)
            .resolve(&DocumentId::new("d0.yaml"))
            .unwrap();

        let mut seen_docs = BTreeSet::new();
        for (path, node) in resolved.tree.descendants() {
            prop_assert!(path.segments().iter().all(|s| s != INCLUDE_DIRECTIVE));
            let entry = resolved.index.get(&path);
            prop_assert!(entry.is_some(), "no provenance for {}", path);

            if let Some(value) = node.as_str() {
                let (doc, leaf) = value[1..].split_once('_').unwrap();
                let entry = entry.unwrap();
                let document = format!("d{doc}.yaml");
                let key = format!("k{doc}_{leaf}");
                prop_assert_eq!(entry.document.as_str(), document.as_str());
                prop_assert_eq!(entry.key.to_string(), key.clone());
                prop_assert_eq!(path.last(), Some(key.as_str()));
                seen_docs.insert(doc.parse::<usize>().unwrap());
            }
        }

        prop_assert_eq!(seen_docs, graph.reachable());
    }

    /// Each `incN` site is a mapping holding the leaf keys of `dN.yaml`.
    #[test]
    fn spliced_mappings_match_included_documents(graph in graph_strategy()) {
        let source = graph.source();
        let resolved = IncludeResolver::new(&source)
            .resolve(&DocumentId::new("d0.yaml"))
            .unwrap();

        for (path, node) in resolved.tree.descendants() {
            let Some(name) = path.last().and_then(|last| last.strip_prefix("inc")) else {
                continue;
            };
            let doc: usize = name.parse().unwrap();
            let keys: BTreeSet<String> = node.child_keys().into_iter().collect();
            let leaf_keys: BTreeSet<String> =
                (0..graph.leaves[doc]).map(|leaf| format!("k{doc}_{leaf}")).collect();
            prop_assert!(leaf_keys.is_subset(&keys));
            prop_assert!(matches!(node, ConfigTree::Mapping(_)));
        }
    }
}
