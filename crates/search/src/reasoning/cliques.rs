//! Maximal clique enumeration (Bron-Kerbosch with pivoting)

use std::collections::BTreeSet;

/// Every maximal clique of an undirected graph given as adjacency sets.
///
/// Isolated vertices are reported as singleton cliques.
pub fn maximal_cliques(adjacency: &[BTreeSet<usize>]) -> Vec<BTreeSet<usize>> {
    let mut cliques = Vec::new();
    if adjacency.is_empty() {
        return cliques;
    }
    let candidates: BTreeSet<usize> = (0..adjacency.len()).collect();
    expand(adjacency, &mut Vec::new(), candidates, BTreeSet::new(), &mut cliques);
    cliques
}

fn expand(
    adjacency: &[BTreeSet<usize>],
    clique: &mut Vec<usize>,
    mut candidates: BTreeSet<usize>,
    mut excluded: BTreeSet<usize>,
    out: &mut Vec<BTreeSet<usize>>,
) {
    if candidates.is_empty() {
        if excluded.is_empty() {
            out.push(clique.iter().copied().collect());
        }
        return;
    }

    // Pivot with the most neighbours among candidates to prune branches.
    let pivot = candidates
        .iter()
        .chain(excluded.iter())
        .copied()
        .max_by_key(|&u| adjacency[u].intersection(&candidates).count())
        .unwrap_or_default();

    let branch: Vec<usize> = candidates.difference(&adjacency[pivot]).copied().collect();
    for v in branch {
        let neighbours = &adjacency[v];
        clique.push(v);
        expand(
            adjacency,
            clique,
            candidates.intersection(neighbours).copied().collect(),
            excluded.intersection(neighbours).copied().collect(),
            out,
        );
        clique.pop();
        candidates.remove(&v);
        excluded.insert(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacency(n: usize, edges: &[(usize, usize)]) -> Vec<BTreeSet<usize>> {
        let mut adj = vec![BTreeSet::new(); n];
        for &(a, b) in edges {
            adj[a].insert(b);
            adj[b].insert(a);
        }
        adj
    }

    fn sorted(mut cliques: Vec<BTreeSet<usize>>) -> Vec<BTreeSet<usize>> {
        cliques.sort();
        cliques
    }

    #[test]
    fn test_triangle_with_tail() {
        // 0-1-2 triangle, 2-3 tail
        let adj = adjacency(4, &[(0, 1), (1, 2), (0, 2), (2, 3)]);
        assert_eq!(
            sorted(maximal_cliques(&adj)),
            vec![BTreeSet::from([0, 1, 2]), BTreeSet::from([2, 3])]
        );
    }

    #[test]
    fn test_isolated_vertex_is_a_clique() {
        let adj = adjacency(3, &[(0, 1)]);
        assert_eq!(
            sorted(maximal_cliques(&adj)),
            vec![BTreeSet::from([0, 1]), BTreeSet::from([2])]
        );
    }

    #[test]
    fn test_empty_graph() {
        assert!(maximal_cliques(&[]).is_empty());
    }

    #[test]
    fn test_complete_graph_single_clique() {
        let adj = adjacency(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        assert_eq!(maximal_cliques(&adj), vec![BTreeSet::from([0, 1, 2, 3])]);
    }
}
