//! Index-based cycle algorithms over a dense adjacency list.
//!
//! Node indices follow `EntityId` order, so "lowest index" means
//! "smallest id" and every cycle reported by [`simple_cycles`] already
//! starts at its smallest member.

const UNVISITED: usize = usize::MAX;

/// Strongly connected components of the subgraph induced by `active`.
///
/// Iterative Tarjan; no recursion, so deep ownership chains cannot
/// overflow the stack.
pub(crate) fn strongly_connected(adj: &[Vec<usize>], active: &[bool]) -> Vec<Vec<usize>> {
    let n = adj.len();
    let mut index = vec![UNVISITED; n];
    let mut low = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut next = 0usize;
    let mut components = Vec::new();

    for root in 0..n {
        if !active[root] || index[root] != UNVISITED {
            continue;
        }
        index[root] = next;
        low[root] = next;
        next += 1;
        stack.push(root);
        on_stack[root] = true;
        // (node, position of the next neighbour to explore)
        let mut call: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = call.last_mut() {
            let v = frame.0;
            if frame.1 < adj[v].len() {
                let w = adj[v][frame.1];
                frame.1 += 1;
                if !active[w] {
                    continue;
                }
                if index[w] == UNVISITED {
                    index[w] = next;
                    low[w] = next;
                    next += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    call.push((w, 0));
                } else if on_stack[w] {
                    low[v] = low[v].min(index[w]);
                }
                continue;
            }

            call.pop();
            if let Some(&(parent, _)) = call.last() {
                low[parent] = low[parent].min(low[v]);
            }
            if low[v] == index[v] {
                let mut component = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                components.push(component);
            }
        }
    }
    components
}

/// Nodes that lie on at least one cycle (members of an SCC of size ≥ 2).
///
/// Self-loops are never stored, so singleton components are acyclic.
pub(crate) fn cyclic_mask(adj: &[Vec<usize>]) -> Vec<bool> {
    let n = adj.len();
    let mut mask = vec![false; n];
    for component in strongly_connected(adj, &vec![true; n]) {
        if component.len() > 1 {
            for v in component {
                mask[v] = true;
            }
        }
    }
    mask
}

/// Every elementary cycle, as `[a, b, ..., a]` with `a` the lowest index.
///
/// Johnson's algorithm: for each start node `s` in increasing order, search
/// circuits through `s` inside its strongly connected component of the
/// subgraph induced by nodes `>= s`, then retire `s`.
pub(crate) fn simple_cycles(adj: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let n = adj.len();
    let cyclic = cyclic_mask(adj);
    let mut active = vec![true; n];
    let mut cycles = Vec::new();

    for s in 0..n {
        if !cyclic[s] {
            active[s] = false;
            continue;
        }
        let component = strongly_connected(adj, &active)
            .into_iter()
            .find(|c| c.contains(&s));
        if let Some(component) = component.filter(|c| c.len() > 1) {
            let mut in_component = vec![false; n];
            for v in component {
                in_component[v] = true;
            }
            circuits_from(s, adj, &in_component, &mut cycles);
        }
        active[s] = false;
    }
    cycles
}

fn circuits_from(s: usize, adj: &[Vec<usize>], in_component: &[bool], out: &mut Vec<Vec<usize>>) {
    let n = adj.len();
    let neighbours = |v: usize| -> Vec<usize> {
        adj[v].iter().copied().filter(|&w| in_component[w]).collect()
    };

    let mut blocked = vec![false; n];
    let mut closed = vec![false; n];
    let mut blockers: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut path = vec![s];
    blocked[s] = true;
    // (node, its neighbours in the component, next position)
    let mut stack: Vec<(usize, Vec<usize>, usize)> = vec![(s, neighbours(s), 0)];

    while let Some(frame) = stack.last_mut() {
        let v = frame.0;
        if frame.2 < frame.1.len() {
            let w = frame.1[frame.2];
            frame.2 += 1;
            if w == s {
                let mut cycle = path.clone();
                cycle.push(s);
                out.push(cycle);
                for &p in &path {
                    closed[p] = true;
                }
            } else if !blocked[w] {
                path.push(w);
                blocked[w] = true;
                closed[w] = false;
                stack.push((w, neighbours(w), 0));
            }
            continue;
        }

        if closed[v] {
            unblock(v, &mut blocked, &mut blockers);
        } else {
            for w in neighbours(v) {
                if !blockers[w].contains(&v) {
                    blockers[w].push(v);
                }
            }
        }
        stack.pop();
        path.pop();
    }
}

fn unblock(start: usize, blocked: &mut [bool], blockers: &mut [Vec<usize>]) {
    let mut pending = vec![start];
    while let Some(node) = pending.pop() {
        if blocked[node] {
            blocked[node] = false;
            pending.append(&mut blockers[node]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adj(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
        let mut adj = vec![Vec::new(); n];
        for &(a, b) in edges {
            adj[a].push(b);
        }
        for list in &mut adj {
            list.sort_unstable();
        }
        adj
    }

    fn sorted(mut cycles: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
        cycles.sort();
        cycles
    }

    #[test]
    fn test_dag_has_no_cycles() {
        let g = adj(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        assert!(simple_cycles(&g).is_empty());
        assert!(cyclic_mask(&g).iter().all(|c| !c));
    }

    #[test]
    fn test_triangle() {
        let g = adj(3, &[(0, 1), (1, 2), (2, 0)]);
        assert_eq!(simple_cycles(&g), vec![vec![0, 1, 2, 0]]);
    }

    #[test]
    fn test_two_cycle() {
        let g = adj(2, &[(0, 1), (1, 0)]);
        assert_eq!(simple_cycles(&g), vec![vec![0, 1, 0]]);
    }

    #[test]
    fn test_overlapping_cycles() {
        // 0 -> 1 -> 0 and 0 -> 1 -> 2 -> 0
        let g = adj(3, &[(0, 1), (1, 0), (1, 2), (2, 0)]);
        assert_eq!(
            sorted(simple_cycles(&g)),
            vec![vec![0, 1, 0], vec![0, 1, 2, 0]]
        );
    }

    #[test]
    fn test_complete_graph_on_three() {
        let mut edges = Vec::new();
        for a in 0..3 {
            for b in 0..3 {
                if a != b {
                    edges.push((a, b));
                }
            }
        }
        // three 2-cycles and two 3-cycles
        assert_eq!(simple_cycles(&adj(3, &edges)).len(), 5);
    }

    #[test]
    fn test_disjoint_cycles_and_tail() {
        let g = adj(6, &[(0, 1), (1, 0), (1, 2), (3, 4), (4, 5), (5, 3)]);
        assert_eq!(
            sorted(simple_cycles(&g)),
            vec![vec![0, 1, 0], vec![3, 4, 5, 3]]
        );
        assert_eq!(
            cyclic_mask(&g),
            vec![true, true, false, true, true, true]
        );
    }

    #[test]
    fn test_scc_deep_chain_does_not_recurse() {
        let n = 50_000;
        let edges: Vec<(usize, usize)> = (0..n - 1).map(|i| (i, i + 1)).collect();
        let g = adj(n, &edges);
        assert_eq!(strongly_connected(&g, &vec![true; n]).len(), n);
    }
}
