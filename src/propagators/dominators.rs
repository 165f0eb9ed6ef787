//! Immediate-dominator computation with the simple Lengauer-Tarjan algorithm
//! (path compression, no balanced link-eval), O(m log n).

/// The dominator tree of a rooted directed graph.
#[derive(Debug)]
pub(crate) struct Dominators {
    idom: Vec<usize>,
    root: usize,
}

impl Dominators {
    /// Whether every path from the root to `node` passes through `dominator`
    /// (strict: a node does not dominate itself here).
    pub(crate) fn is_dominated_by(&self, node: usize, dominator: usize) -> bool {
        if node == dominator {
            return false;
        }

        let mut current = node;
        while current != self.root {
            current = self.idom[current];
            if current == dominator {
                return true;
            }
        }
        false
    }
}

/// Compute the dominator tree of the graph given as successor adjacency,
/// rooted at `root`. Returns `None` when some node is unreachable from the
/// root.
pub(crate) fn immediate_dominators(successors: &[Vec<usize>], root: usize) -> Option<Dominators> {
    let num_nodes = successors.len();

    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); num_nodes];
    for (from, adjacent) in successors.iter().enumerate() {
        for &to in adjacent {
            predecessors[to].push(from);
        }
    }

    // Depth-first preorder numbering.
    let mut dfs_number = vec![usize::MAX; num_nodes];
    let mut parent = vec![usize::MAX; num_nodes];
    let mut preorder = Vec::with_capacity(num_nodes);
    let mut stack = vec![(root, usize::MAX)];
    while let Some((node, from)) = stack.pop() {
        if dfs_number[node] != usize::MAX {
            continue;
        }
        dfs_number[node] = preorder.len();
        parent[node] = from;
        preorder.push(node);

        for &successor in successors[node].iter().rev() {
            if dfs_number[successor] == usize::MAX {
                stack.push((successor, node));
            }
        }
    }

    if preorder.len() != num_nodes {
        return None;
    }

    // semi[v] is a dfs number; label/ancestor implement the link-eval forest.
    let mut semi = dfs_number.clone();
    let mut label: Vec<usize> = (0..num_nodes).collect();
    let mut ancestor = vec![usize::MAX; num_nodes];
    let mut bucket: Vec<Vec<usize>> = vec![Vec::new(); num_nodes];
    let mut idom = vec![usize::MAX; num_nodes];

    for &node in preorder.iter().skip(1).rev() {
        for &predecessor in predecessors[node].iter() {
            let candidate = eval(predecessor, &mut ancestor, &mut label, &semi);
            if semi[candidate] < semi[node] {
                semi[node] = semi[candidate];
            }
        }

        bucket[preorder[semi[node]]].push(node);

        let tree_parent = parent[node];
        ancestor[node] = tree_parent;

        for in_bucket in std::mem::take(&mut bucket[tree_parent]) {
            let candidate = eval(in_bucket, &mut ancestor, &mut label, &semi);
            idom[in_bucket] = if semi[candidate] < semi[in_bucket] {
                candidate
            } else {
                tree_parent
            };
        }
    }

    for &node in preorder.iter().skip(1) {
        if idom[node] != preorder[semi[node]] {
            idom[node] = idom[idom[node]];
        }
    }
    idom[root] = root;

    Some(Dominators { idom, root })
}

/// Return the node with minimal semi-dominator number on the forest path from
/// `node` to its forest root, compressing the path along the way.
fn eval(node: usize, ancestor: &mut [usize], label: &mut [usize], semi: &[usize]) -> usize {
    if ancestor[node] == usize::MAX {
        return node;
    }

    let mut chain = Vec::new();
    let mut current = node;
    while ancestor[current] != usize::MAX {
        chain.push(current);
        current = ancestor[current];
    }
    let forest_root = current;

    // Top-down so every label merged from is already final.
    for &on_path in chain.iter().rev() {
        let above = ancestor[on_path];
        if above != forest_root {
            if semi[label[above]] < semi[label[on_path]] {
                label[on_path] = label[above];
            }
            ancestor[on_path] = forest_root;
        }
    }

    label[node]
}
