//! The dependency orderer: builds the essential-slice graph for
//! a set of requested keys and produces a cycle-free topological order.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use slicepack_schema::SliceKey;
use tracing::debug;

use crate::error::Error;
use crate::model::Release;

fn require_slice_exists(release: &Release, key: &SliceKey) -> Result<(), Error> {
    match release.packages.get(key.package()) {
        None => Err(Error::Dependency(format!(
            "package {:?} not found (referenced as {key})",
            key.package()
        ))),
        Some(pkg) => {
            if pkg.slices.contains_key(key.slice()) {
                Ok(())
            } else {
                Err(Error::Dependency(format!(
                    "slice {:?} not found in package {:?} (referenced as {key})",
                    key.slice(),
                    key.package()
                )))
            }
        }
    }
}

fn node_for(
    graph: &mut DiGraph<SliceKey, ()>,
    node_of: &mut IndexMap<SliceKey, NodeIndex>,
    key: &SliceKey,
) -> NodeIndex {
    if let Some(&idx) = node_of.get(key) {
        idx
    } else {
        let idx = graph.add_node(key.clone());
        node_of.insert(key.clone(), idx);
        idx
    }
}

/// Order `keys` so that every slice's essential dependencies precede it.
///
/// This is used both release-wide (ordering every slice, as part of
/// `Release::validate`) and selection-scoped (ordering the caller's
/// requested subset).
///
/// # Errors
///
/// Returns `Error::Dependency` if an input key, or a key transitively
/// reached through an essential reference, names a non-existent package or
/// slice. Returns `Error::Cycle` if the essential graph restricted to the
/// reachable set contains a strongly-connected component of size > 1.
pub fn order(release: &Release, keys: &[SliceKey]) -> Result<Vec<SliceKey>, Error> {
    for key in keys {
        require_slice_exists(release, key)?;
    }

    let mut graph: DiGraph<SliceKey, ()> = DiGraph::new();
    let mut node_of: IndexMap<SliceKey, NodeIndex> = IndexMap::new();
    let mut worklist: VecDeque<SliceKey> = keys.iter().cloned().collect();
    let mut seen: HashSet<SliceKey> = HashSet::new();

    while let Some(key) = worklist.pop_front() {
        if !seen.insert(key.clone()) {
            continue;
        }
        require_slice_exists(release, &key)?;
        let slice = release.slice(&key).expect("just checked existence");
        let node = node_for(&mut graph, &mut node_of, &key);

        for dep in &slice.essential {
            let dep_node = node_for(&mut graph, &mut node_of, dep);
            graph.add_edge(dep_node, node, ());
            if !seen.contains(dep) {
                worklist.push_back(dep.clone());
            }
        }
    }

    for component in petgraph::algo::tarjan_scc(&graph) {
        if component.len() > 1 {
            let names: Vec<String> = component.iter().map(|&idx| graph[idx].to_string()).collect();
            return Err(Error::Cycle(names.join(", ")));
        }
    }

    // Kahn's algorithm over the (now proven acyclic) graph. The initial
    // queue and every tie are resolved by discovery order, not by name, so
    // the result is a function of input-key order and essential-list
    // order within each slice, rather than an
    // alphabetical sort.
    let mut in_degree: IndexMap<NodeIndex, usize> = IndexMap::new();
    for idx in node_of.values() {
        in_degree.insert(*idx, graph.edges_directed(*idx, Direction::Incoming).count());
    }

    let mut queue: VecDeque<NodeIndex> = node_of
        .values()
        .copied()
        .filter(|idx| in_degree[idx] == 0)
        .collect();

    let mut order = Vec::with_capacity(node_of.len());
    while let Some(idx) = queue.pop_front() {
        order.push(graph[idx].clone());
        for succ in graph.neighbors_directed(idx, Direction::Outgoing) {
            let degree = in_degree.get_mut(&succ).expect("node was registered");
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(succ);
            }
        }
    }

    debug!(count = order.len(), "ordered slices");
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Archive, Package, Slice};
    use indexmap::IndexMap;
    use std::path::PathBuf;

    fn slice(package: &str, name: &str, essential: &[(&str, &str)]) -> Slice {
        Slice {
            package: package.to_string(),
            name: name.to_string(),
            essential: essential
                .iter()
                .map(|(p, s)| SliceKey::new(*p, *s))
                .collect(),
            contents: IndexMap::new(),
            mutate_script: String::new(),
        }
    }

    fn release(packages: Vec<(&str, Vec<Slice>)>) -> Release {
        let mut pkgs = IndexMap::new();
        for (name, slices) in packages {
            let mut slice_map = IndexMap::new();
            for s in slices {
                slice_map.insert(s.name.clone(), s);
            }
            pkgs.insert(
                name.to_string(),
                Package {
                    name: name.to_string(),
                    path: PathBuf::from(format!("slices/{name}.yaml")),
                    archive: "main".to_string(),
                    slices: slice_map,
                },
            );
        }
        let mut archives = IndexMap::new();
        archives.insert(
            "main".to_string(),
            Archive {
                name: "main".to_string(),
                version: "22.04".to_string(),
                suites: vec!["jammy".to_string()],
                components: vec!["main".to_string()],
                public_keys: vec![],
            },
        );
        Release {
            root: PathBuf::from("/tmp"),
            public_keys: IndexMap::new(),
            archives,
            packages: pkgs,
            default_archive: "main".to_string(),
        }
    }

    #[test]
    fn simple_chain_orders_deps_first() {
        let rel = release(vec![(
            "p",
            vec![
                slice("p", "a", &[("p", "b")]),
                slice("p", "b", &[]),
            ],
        )]);
        let order = order(&rel, &[SliceKey::new("p", "a")]).unwrap();
        assert_eq!(
            order,
            vec![SliceKey::new("p", "b"), SliceKey::new("p", "a")]
        );
    }

    #[test]
    fn diamond_dependency() {
        let rel = release(vec![(
            "p",
            vec![
                slice("p", "a", &[("p", "b"), ("p", "c")]),
                slice("p", "b", &[("p", "d")]),
                slice("p", "c", &[("p", "d")]),
                slice("p", "d", &[]),
            ],
        )]);
        let order = order(&rel, &[SliceKey::new("p", "a")]).unwrap();
        let pos = |k: &SliceKey| order.iter().position(|x| x == k).unwrap();
        assert!(pos(&SliceKey::new("p", "d")) < pos(&SliceKey::new("p", "b")));
        assert!(pos(&SliceKey::new("p", "d")) < pos(&SliceKey::new("p", "c")));
        assert!(pos(&SliceKey::new("p", "b")) < pos(&SliceKey::new("p", "a")));
        assert!(pos(&SliceKey::new("p", "c")) < pos(&SliceKey::new("p", "a")));
    }

    #[test]
    fn cycle_is_rejected() {
        let rel = release(vec![(
            "p",
            vec![
                slice("p", "a", &[("p", "b")]),
                slice("p", "b", &[("p", "a")]),
            ],
        )]);
        let err = order(&rel, &[SliceKey::new("p", "a")]).unwrap_err();
        assert!(matches!(err, Error::Cycle(_)));
    }

    #[test]
    fn missing_package_is_distinguished_from_missing_slice() {
        let rel = release(vec![("p", vec![slice("p", "a", &[])])]);

        let err = order(&rel, &[SliceKey::new("missing", "a")]).unwrap_err();
        assert!(matches!(&err, Error::Dependency(m) if m.contains("package")));

        let err = order(&rel, &[SliceKey::new("p", "missing")]).unwrap_err();
        assert!(matches!(&err, Error::Dependency(m) if m.contains("slice")));
    }
}
