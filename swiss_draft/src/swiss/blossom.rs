//! Maximum-weight matching on general graphs.
//!
//! Edmonds' blossom algorithm with the primal-dual refinements of Galil
//! ("Efficient algorithms for finding maximum matching in graphs", 1986),
//! running in O(n³). Edge endpoints are numbered `2k` and `2k + 1` for edge
//! `k`, so `p ^ 1` is the opposite endpoint of `p`. Blossoms live in the
//! index range `n..2n` next to the vertices.
//!
//! Weights are integers and are doubled on entry, which keeps every dual
//! variable and every slack division exact.

use std::collections::BTreeMap;

const NONE: usize = usize::MAX;

/// Undirected weighted edge between two vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedEdge {
    pub u: usize,
    pub v: usize,
    pub weight: i64,
}

impl WeightedEdge {
    pub fn new(u: usize, v: usize, weight: i64) -> Self {
        Self { u, v, weight }
    }
}

/// Compute a maximum-weight matching
///
/// # Arguments
///
/// * `vertex_count` - Vertices are numbered `0..vertex_count`
/// * `edges` - Candidate edges; self-loops and out-of-range endpoints are
///   ignored, parallel edges keep the heaviest weight
/// * `max_cardinality` - Only consider matchings of maximum cardinality,
///   and among those pick the heaviest
///
/// # Returns
///
/// * `Vec<Option<usize>>` - Mate of every vertex, `None` when unmatched
pub fn max_weight_matching(
    vertex_count: usize,
    edges: &[WeightedEdge],
    max_cardinality: bool,
) -> Vec<Option<usize>> {
    let edges = normalize(vertex_count, edges);
    if edges.is_empty() {
        return vec![None; vertex_count];
    }

    let mut solver = Solver::new(vertex_count, edges, max_cardinality);
    solver.solve();
    solver.mates()
}

/// Total weight of a matching returned by [`max_weight_matching`]
pub fn matching_weight(edges: &[WeightedEdge], mates: &[Option<usize>]) -> i64 {
    normalize(mates.len(), edges)
        .into_iter()
        .filter(|&(u, v, _)| mates[u] == Some(v))
        .map(|(_, _, w)| w / 2)
        .sum()
}

fn normalize(vertex_count: usize, edges: &[WeightedEdge]) -> Vec<(usize, usize, i64)> {
    let mut unique: BTreeMap<(usize, usize), i64> = BTreeMap::new();
    for edge in edges {
        if edge.u == edge.v || edge.u >= vertex_count || edge.v >= vertex_count {
            continue;
        }
        let key = (edge.u.min(edge.v), edge.u.max(edge.v));
        let weight = edge.weight.saturating_mul(2);
        unique
            .entry(key)
            .and_modify(|w| *w = (*w).max(weight))
            .or_insert(weight);
    }
    unique.into_iter().map(|((u, v), w)| (u, v, w)).collect()
}

struct Solver {
    n: usize,
    edges: Vec<(usize, usize, i64)>,
    max_cardinality: bool,
    /// Vertex at each edge endpoint
    endpoint: Vec<usize>,
    /// Remote endpoints of the edges incident to each vertex
    neighbend: Vec<Vec<usize>>,
    /// Remote endpoint of the matched edge, `NONE` if single
    mate: Vec<usize>,
    /// 0 = free, 1 = S, 2 = T; bit 4 marks blossoms during a scan
    label: Vec<u8>,
    label_end: Vec<usize>,
    in_blossom: Vec<usize>,
    blossom_parent: Vec<usize>,
    blossom_childs: Vec<Vec<usize>>,
    blossom_base: Vec<usize>,
    blossom_endps: Vec<Vec<usize>>,
    best_edge: Vec<usize>,
    blossom_best_edges: Vec<Option<Vec<usize>>>,
    unused_blossoms: Vec<usize>,
    dual: Vec<i64>,
    allow_edge: Vec<bool>,
    queue: Vec<usize>,
}

impl Solver {
    fn new(n: usize, edges: Vec<(usize, usize, i64)>, max_cardinality: bool) -> Self {
        let max_weight = edges.iter().map(|&(_, _, w)| w).max().unwrap_or(0).max(0);

        let mut endpoint = Vec::with_capacity(2 * edges.len());
        let mut neighbend = vec![Vec::new(); n];
        for (k, &(i, j, _)) in edges.iter().enumerate() {
            endpoint.push(i);
            endpoint.push(j);
            neighbend[i].push(2 * k + 1);
            neighbend[j].push(2 * k);
        }

        let mut dual = vec![max_weight; n];
        dual.extend(std::iter::repeat_n(0, n));

        let mut blossom_base: Vec<usize> = (0..n).collect();
        blossom_base.extend(std::iter::repeat_n(NONE, n));

        let edge_count = edges.len();
        Self {
            n,
            edges,
            max_cardinality,
            endpoint,
            neighbend,
            mate: vec![NONE; n],
            label: vec![0; 2 * n],
            label_end: vec![NONE; 2 * n],
            in_blossom: (0..n).collect(),
            blossom_parent: vec![NONE; 2 * n],
            blossom_childs: vec![Vec::new(); 2 * n],
            blossom_base,
            blossom_endps: vec![Vec::new(); 2 * n],
            best_edge: vec![NONE; 2 * n],
            blossom_best_edges: vec![None; 2 * n],
            unused_blossoms: (n..2 * n).collect(),
            dual,
            allow_edge: vec![false; edge_count],
            queue: Vec::new(),
        }
    }

    fn mates(&self) -> Vec<Option<usize>> {
        self.mate
            .iter()
            .map(|&p| (p != NONE).then(|| self.endpoint[p]))
            .collect()
    }

    fn slack(&self, k: usize) -> i64 {
        let (i, j, w) = self.edges[k];
        self.dual[i] + self.dual[j] - 2 * w
    }

    fn blossom_leaves(&self, b: usize) -> Vec<usize> {
        let mut leaves = Vec::new();
        self.collect_leaves(b, &mut leaves);
        leaves
    }

    fn collect_leaves(&self, b: usize, leaves: &mut Vec<usize>) {
        if b < self.n {
            leaves.push(b);
        } else {
            for &child in &self.blossom_childs[b] {
                self.collect_leaves(child, leaves);
            }
        }
    }

    /// Label the top-level blossom containing `w` and, for T labels, the
    /// blossom its base is matched to.
    fn assign_label(&mut self, w: usize, t: u8, p: usize) {
        let b = self.in_blossom[w];
        self.label[w] = t;
        self.label[b] = t;
        self.label_end[w] = p;
        self.label_end[b] = p;
        self.best_edge[w] = NONE;
        self.best_edge[b] = NONE;

        if t == 1 {
            let leaves = self.blossom_leaves(b);
            self.queue.extend(leaves);
        } else if t == 2 {
            let base = self.blossom_base[b];
            let matched = self.mate[base];
            let target = self.endpoint[matched];
            self.assign_label(target, 1, matched ^ 1);
        }
    }

    /// Trace back from `v` and `w` to find either a new blossom (returns its
    /// base) or an augmenting path (returns `NONE`).
    fn scan_blossom(&mut self, mut v: usize, mut w: usize) -> usize {
        let mut path = Vec::new();
        let mut base = NONE;

        while v != NONE || w != NONE {
            let mut b = self.in_blossom[v];
            if self.label[b] & 4 != 0 {
                base = self.blossom_base[b];
                break;
            }
            path.push(b);
            self.label[b] = 5;

            if self.label_end[b] == NONE {
                // Reached a single vertex
                v = NONE;
            } else {
                v = self.endpoint[self.label_end[b]];
                b = self.in_blossom[v];
                v = self.endpoint[self.label_end[b]];
            }

            if w != NONE {
                std::mem::swap(&mut v, &mut w);
            }
        }

        for b in path {
            self.label[b] = 1;
        }
        base
    }

    fn add_blossom(&mut self, base: usize, k: usize) {
        let (mut v, mut w, _) = self.edges[k];
        let bb = self.in_blossom[base];
        let mut bv = self.in_blossom[v];
        let mut bw = self.in_blossom[w];

        // At most n/2 non-trivial blossoms exist at once
        let Some(b) = self.unused_blossoms.pop() else {
            return;
        };

        self.blossom_base[b] = base;
        self.blossom_parent[b] = NONE;
        self.blossom_parent[bb] = b;

        let mut path = Vec::new();
        let mut endps = Vec::new();
        while bv != bb {
            self.blossom_parent[bv] = b;
            path.push(bv);
            endps.push(self.label_end[bv]);
            v = self.endpoint[self.label_end[bv]];
            bv = self.in_blossom[v];
        }
        path.push(bb);
        path.reverse();
        endps.reverse();
        endps.push(2 * k);
        while bw != bb {
            self.blossom_parent[bw] = b;
            path.push(bw);
            endps.push(self.label_end[bw] ^ 1);
            w = self.endpoint[self.label_end[bw]];
            bw = self.in_blossom[w];
        }

        self.label[b] = 1;
        self.label_end[b] = self.label_end[bb];
        self.dual[b] = 0;
        self.blossom_childs[b] = path.clone();
        self.blossom_endps[b] = endps;

        for leaf in self.blossom_leaves(b) {
            if self.label[self.in_blossom[leaf]] == 2 {
                // Former T-vertices become S-vertices
                self.queue.push(leaf);
            }
            self.in_blossom[leaf] = b;
        }

        let mut best_edge_to = vec![NONE; 2 * self.n];
        for &child in &path {
            let lists: Vec<Vec<usize>> = match self.blossom_best_edges[child].take() {
                Some(list) => vec![list],
                None => self
                    .blossom_leaves(child)
                    .into_iter()
                    .map(|leaf| self.neighbend[leaf].iter().map(|p| p / 2).collect())
                    .collect(),
            };
            for list in lists {
                for edge in list {
                    let (i, j, _) = self.edges[edge];
                    let j = if self.in_blossom[j] == b { i } else { j };
                    let bj = self.in_blossom[j];
                    if bj != b
                        && self.label[bj] == 1
                        && (best_edge_to[bj] == NONE
                            || self.slack(edge) < self.slack(best_edge_to[bj]))
                    {
                        best_edge_to[bj] = edge;
                    }
                }
            }
            self.best_edge[child] = NONE;
        }

        let list: Vec<usize> = best_edge_to.into_iter().filter(|&e| e != NONE).collect();
        let mut best = NONE;
        for &edge in &list {
            if best == NONE || self.slack(edge) < self.slack(best) {
                best = edge;
            }
        }
        self.blossom_best_edges[b] = Some(list);
        self.best_edge[b] = best;
    }

    fn expand_blossom(&mut self, b: usize, end_stage: bool) {
        let childs = self.blossom_childs[b].clone();
        for &s in &childs {
            self.blossom_parent[s] = NONE;
            if s < self.n {
                self.in_blossom[s] = s;
            } else if end_stage && self.dual[s] == 0 {
                self.expand_blossom(s, end_stage);
            } else {
                for leaf in self.blossom_leaves(s) {
                    self.in_blossom[leaf] = s;
                }
            }
        }

        if !end_stage && self.label[b] == 2 {
            // Relabel the sub-blossoms on the even path from the entry child
            // to the base, then the remaining ones that are reachable.
            let entry_child = self.in_blossom[self.endpoint[self.label_end[b] ^ 1]];
            let endps = self.blossom_endps[b].clone();
            let len = childs.len() as isize;
            let at = |idx: isize| idx.rem_euclid(len) as usize;

            let mut j = childs
                .iter()
                .position(|&c| c == entry_child)
                .unwrap_or(0) as isize;
            let (step, trick): (isize, usize) = if j & 1 == 1 {
                j -= len;
                (1, 0)
            } else {
                (-1, 1)
            };

            let mut p = self.label_end[b];
            while j != 0 {
                let vertex = self.endpoint[p ^ 1];
                self.label[vertex] = 0;
                let q = endps[at(j - trick as isize)];
                let other = self.endpoint[q ^ trick ^ 1];
                self.label[other] = 0;
                self.assign_label(vertex, 2, p);
                self.allow_edge[q / 2] = true;
                j += step;
                p = endps[at(j - trick as isize)] ^ trick;
                self.allow_edge[p / 2] = true;
                j += step;
            }

            let bv = childs[at(j)];
            let vertex = self.endpoint[p ^ 1];
            self.label[vertex] = 2;
            self.label[bv] = 2;
            self.label_end[vertex] = p;
            self.label_end[bv] = p;
            self.best_edge[bv] = NONE;
            j += step;

            while childs[at(j)] != entry_child {
                let bv = childs[at(j)];
                if self.label[bv] == 1 {
                    j += step;
                    continue;
                }
                let reached = self
                    .blossom_leaves(bv)
                    .into_iter()
                    .find(|&leaf| self.label[leaf] != 0);
                if let Some(leaf) = reached {
                    self.label[leaf] = 0;
                    let partner = self.endpoint[self.mate[self.blossom_base[bv]]];
                    self.label[partner] = 0;
                    let end = self.label_end[leaf];
                    self.assign_label(leaf, 2, end);
                }
                j += step;
            }
        }

        self.label[b] = 0;
        self.label_end[b] = NONE;
        self.blossom_childs[b].clear();
        self.blossom_endps[b].clear();
        self.blossom_base[b] = NONE;
        self.blossom_best_edges[b] = None;
        self.best_edge[b] = NONE;
        self.unused_blossoms.push(b);
    }

    /// Swap matched and unmatched edges along the even path from `v` to the
    /// base of blossom `b`, making `v` the new base.
    fn augment_blossom(&mut self, b: usize, v: usize) {
        let mut t = v;
        while self.blossom_parent[t] != b {
            t = self.blossom_parent[t];
        }
        if t >= self.n {
            self.augment_blossom(t, v);
        }

        let childs = self.blossom_childs[b].clone();
        let endps = self.blossom_endps[b].clone();
        let len = childs.len() as isize;
        let at = |idx: isize| idx.rem_euclid(len) as usize;

        let i = childs.iter().position(|&c| c == t).unwrap_or(0);
        let mut j = i as isize;
        let (step, trick): (isize, usize) = if i & 1 == 1 {
            j -= len;
            (1, 0)
        } else {
            (-1, 1)
        };

        while j != 0 {
            j += step;
            let child = childs[at(j)];
            let p = endps[at(j - trick as isize)] ^ trick;
            if child >= self.n {
                self.augment_blossom(child, self.endpoint[p]);
            }
            j += step;
            let child = childs[at(j)];
            if child >= self.n {
                self.augment_blossom(child, self.endpoint[p ^ 1]);
            }
            let (near, far) = (self.endpoint[p], self.endpoint[p ^ 1]);
            self.mate[near] = p ^ 1;
            self.mate[far] = p;
        }

        self.blossom_childs[b].rotate_left(i);
        self.blossom_endps[b].rotate_left(i);
        let first = self.blossom_childs[b][0];
        self.blossom_base[b] = self.blossom_base[first];
    }

    fn augment_matching(&mut self, k: usize) {
        let (v, w, _) = self.edges[k];
        for (mut s, mut p) in [(v, 2 * k + 1), (w, 2 * k)] {
            loop {
                let bs = self.in_blossom[s];
                if bs >= self.n {
                    self.augment_blossom(bs, s);
                }
                self.mate[s] = p;
                if self.label_end[bs] == NONE {
                    // Reached a single vertex
                    break;
                }
                let t = self.endpoint[self.label_end[bs]];
                let bt = self.in_blossom[t];
                s = self.endpoint[self.label_end[bt]];
                let j = self.endpoint[self.label_end[bt] ^ 1];
                if bt >= self.n {
                    self.augment_blossom(bt, j);
                }
                self.mate[j] = self.label_end[bt];
                p = self.label_end[bt] ^ 1;
            }
        }
    }

    fn solve(&mut self) {
        let n = self.n;

        // Each stage either augments the matching or proves it optimal
        for _ in 0..n {
            self.label.fill(0);
            self.best_edge.fill(NONE);
            for b in n..2 * n {
                self.blossom_best_edges[b] = None;
            }
            self.allow_edge.fill(false);
            self.queue.clear();

            for v in 0..n {
                if self.mate[v] == NONE && self.label[self.in_blossom[v]] == 0 {
                    self.assign_label(v, 1, NONE);
                }
            }

            let mut augmented = false;
            loop {
                while !augmented {
                    let Some(v) = self.queue.pop() else {
                        break;
                    };
                    let neighbours = self.neighbend[v].clone();
                    for p in neighbours {
                        let k = p / 2;
                        let w = self.endpoint[p];
                        if self.in_blossom[v] == self.in_blossom[w] {
                            continue;
                        }

                        let mut kslack = 0;
                        if !self.allow_edge[k] {
                            kslack = self.slack(k);
                            if kslack <= 0 {
                                self.allow_edge[k] = true;
                            }
                        }

                        if self.allow_edge[k] {
                            let bw_label = self.label[self.in_blossom[w]];
                            if bw_label == 0 {
                                self.assign_label(w, 2, p ^ 1);
                            } else if bw_label == 1 {
                                let base = self.scan_blossom(v, w);
                                if base != NONE {
                                    self.add_blossom(base, k);
                                } else {
                                    self.augment_matching(k);
                                    augmented = true;
                                    break;
                                }
                            } else if self.label[w] == 0 {
                                self.label[w] = 2;
                                self.label_end[w] = p ^ 1;
                            }
                        } else if self.label[self.in_blossom[w]] == 1 {
                            let b = self.in_blossom[v];
                            if self.best_edge[b] == NONE || kslack < self.slack(self.best_edge[b]) {
                                self.best_edge[b] = k;
                            }
                        } else if self.label[w] == 0
                            && (self.best_edge[w] == NONE
                                || kslack < self.slack(self.best_edge[w]))
                        {
                            self.best_edge[w] = k;
                        }
                    }
                }

                if augmented {
                    break;
                }

                // No augmenting path under the current duals; pick the
                // smallest dual adjustment that makes progress.
                let mut delta_type = 0u8;
                let mut delta = 0i64;
                let mut delta_edge = NONE;
                let mut delta_blossom = NONE;

                if !self.max_cardinality {
                    delta_type = 1;
                    delta = self.dual[..n].iter().copied().min().unwrap_or(0);
                }

                for v in 0..n {
                    if self.label[self.in_blossom[v]] == 0 && self.best_edge[v] != NONE {
                        let d = self.slack(self.best_edge[v]);
                        if delta_type == 0 || d < delta {
                            delta = d;
                            delta_type = 2;
                            delta_edge = self.best_edge[v];
                        }
                    }
                }

                for b in 0..2 * n {
                    if self.blossom_parent[b] == NONE
                        && self.label[b] == 1
                        && self.best_edge[b] != NONE
                    {
                        let d = self.slack(self.best_edge[b]) / 2;
                        if delta_type == 0 || d < delta {
                            delta = d;
                            delta_type = 3;
                            delta_edge = self.best_edge[b];
                        }
                    }
                }

                for b in n..2 * n {
                    if self.blossom_base[b] != NONE
                        && self.blossom_parent[b] == NONE
                        && self.label[b] == 2
                        && (delta_type == 0 || self.dual[b] < delta)
                    {
                        delta = self.dual[b];
                        delta_type = 4;
                        delta_blossom = b;
                    }
                }

                if delta_type == 0 {
                    // Maximum cardinality reached; finish with a final
                    // adjustment so the duals stay optimal.
                    delta_type = 1;
                    delta = self.dual[..n].iter().copied().min().unwrap_or(0).max(0);
                }

                for v in 0..n {
                    match self.label[self.in_blossom[v]] {
                        1 => self.dual[v] -= delta,
                        2 => self.dual[v] += delta,
                        _ => {}
                    }
                }
                for b in n..2 * n {
                    if self.blossom_base[b] != NONE && self.blossom_parent[b] == NONE {
                        match self.label[b] {
                            1 => self.dual[b] += delta,
                            2 => self.dual[b] -= delta,
                            _ => {}
                        }
                    }
                }

                match delta_type {
                    1 => break,
                    2 => {
                        self.allow_edge[delta_edge] = true;
                        let (i, j, _) = self.edges[delta_edge];
                        let i = if self.label[self.in_blossom[i]] == 0 { j } else { i };
                        self.queue.push(i);
                    }
                    3 => {
                        self.allow_edge[delta_edge] = true;
                        let (i, _, _) = self.edges[delta_edge];
                        self.queue.push(i);
                    }
                    _ => self.expand_blossom(delta_blossom, false),
                }
            }

            if !augmented {
                break;
            }

            for b in n..2 * n {
                if self.blossom_parent[b] == NONE
                    && self.blossom_base[b] != NONE
                    && self.label[b] == 1
                    && self.dual[b] == 0
                {
                    self.expand_blossom(b, true);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(edges: &[(usize, usize, i64)], max_cardinality: bool) -> Vec<Option<usize>> {
        let vertex_count = edges.iter().map(|&(u, v, _)| u.max(v) + 1).max().unwrap_or(0);
        let edges: Vec<WeightedEdge> = edges
            .iter()
            .map(|&(u, v, w)| WeightedEdge::new(u, v, w))
            .collect();
        max_weight_matching(vertex_count, &edges, max_cardinality)
    }

    fn mates(expected: &[i64]) -> Vec<Option<usize>> {
        expected
            .iter()
            .map(|&m| usize::try_from(m).ok())
            .collect()
    }

    #[test]
    fn test_empty_graph() {
        assert_eq!(max_weight_matching(3, &[], true), vec![None, None, None]);
    }

    #[test]
    fn test_single_edge() {
        assert_eq!(solve(&[(0, 1, 1)], false), mates(&[1, 0]));
    }

    #[test]
    fn test_prefers_heavier_edge() {
        assert_eq!(solve(&[(1, 2, 10), (2, 3, 11)], false), mates(&[-1, -1, 3, 2]));
    }

    #[test]
    fn test_max_cardinality_changes_choice() {
        let edges = [(1, 2, 5), (2, 3, 11), (3, 4, 5)];
        assert_eq!(solve(&edges, false), mates(&[-1, -1, 3, 2, -1]));
        assert_eq!(solve(&edges, true), mates(&[-1, 2, 1, 4, 3]));
    }

    #[test]
    fn test_negative_weights() {
        let edges = [(1, 2, 2), (1, 3, -2), (2, 3, 1), (2, 4, -1), (3, 4, -6)];
        assert_eq!(solve(&edges, false), mates(&[-1, 2, 1, -1, -1]));
        assert_eq!(solve(&edges, true), mates(&[-1, 3, 4, 1, 2]));
    }

    #[test]
    fn test_s_blossom() {
        let edges = [(1, 2, 8), (1, 3, 9), (2, 3, 10), (3, 4, 7)];
        assert_eq!(solve(&edges, false), mates(&[-1, 2, 1, 4, 3]));

        let edges = [
            (1, 2, 8),
            (1, 3, 9),
            (2, 3, 10),
            (3, 4, 7),
            (1, 6, 5),
            (4, 5, 6),
        ];
        assert_eq!(solve(&edges, false), mates(&[-1, 6, 3, 2, 5, 4, 1]));
    }

    #[test]
    fn test_t_blossom() {
        let edges = [(1, 2, 9), (1, 3, 8), (2, 3, 10), (1, 4, 5), (4, 5, 4), (1, 6, 3)];
        assert_eq!(solve(&edges, false), mates(&[-1, 6, 3, 2, 5, 4, 1]));
    }

    #[test]
    fn test_s_blossom_relabeled_as_t() {
        let edges = [
            (1, 2, 9),
            (1, 3, 9),
            (2, 3, 10),
            (2, 4, 8),
            (3, 5, 8),
            (4, 5, 10),
            (5, 6, 6),
        ];
        assert_eq!(solve(&edges, false), mates(&[-1, 3, 4, 1, 2, 6, 5]));
    }

    #[test]
    fn test_nested_s_blossom_used_for_augmentation() {
        let edges = [
            (1, 2, 8),
            (1, 3, 8),
            (2, 3, 10),
            (2, 4, 12),
            (3, 5, 12),
            (4, 5, 14),
            (4, 6, 12),
            (5, 7, 12),
            (6, 7, 14),
            (7, 8, 12),
        ];
        let result = solve(&edges, false);
        assert_eq!(result, mates(&[-1, 2, 1, 5, 6, 3, 4, 8, 7]));

        let weighted: Vec<WeightedEdge> = edges
            .iter()
            .map(|&(u, v, w)| WeightedEdge::new(u, v, w))
            .collect();
        assert_eq!(matching_weight(&weighted, &result), 8 + 12 + 12 + 12);
    }

    #[test]
    fn test_nested_blossom_expansion() {
        let edges = [
            (1, 2, 10),
            (1, 7, 10),
            (2, 3, 12),
            (3, 4, 20),
            (3, 5, 20),
            (4, 5, 25),
            (5, 6, 10),
            (6, 7, 10),
            (7, 8, 8),
        ];
        assert_eq!(
            solve(&edges, false),
            mates(&[-1, 2, 1, 4, 3, 6, 5, 8, 7])
        );
    }

    #[test]
    fn test_ignores_self_loops_and_out_of_range() {
        let edges = [
            WeightedEdge::new(0, 0, 50),
            WeightedEdge::new(0, 7, 50),
            WeightedEdge::new(0, 1, 1),
        ];
        assert_eq!(max_weight_matching(2, &edges, true), mates(&[1, 0]));
    }

    #[test]
    fn test_parallel_edges_keep_heaviest() {
        let edges = [
            WeightedEdge::new(0, 1, 1),
            WeightedEdge::new(1, 0, 9),
            WeightedEdge::new(1, 2, 5),
        ];
        let result = max_weight_matching(3, &edges, false);
        assert_eq!(result, mates(&[1, 0, -1]));
        assert_eq!(matching_weight(&edges, &result), 9);
    }

    #[test]
    fn test_complete_graph_is_perfect_with_max_cardinality() {
        let mut edges = Vec::new();
        for u in 0..10 {
            for v in (u + 1)..10 {
                edges.push(WeightedEdge::new(u, v, ((u * 7 + v * 3) % 9 + 1) as i64));
            }
        }
        let result = max_weight_matching(10, &edges, true);
        assert!(result.iter().all(Option::is_some));
        for (v, mate) in result.iter().enumerate() {
            let m = mate.expect("perfect matching");
            assert_eq!(result[m], Some(v));
        }
    }
}
