//! Message routing across the platform.
//!
//! The transfer delay between two nodes is the cheapest route over the
//! link graph, where each hop costs `latency + ceil(size / bandwidth)`.
//! Routers and sensors forward traffic like any other node.
//!
//! # Reference
//! Dijkstra (1959), "A Note on Two Problems in Connexion with Graphs"

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::models::{Link, NodeId, Platform};

/// Shortest-delay router with a per-run cache.
#[derive(Debug)]
pub struct Router<'a> {
    adjacency: HashMap<NodeId, Vec<&'a Link>>,
    cache: HashMap<(NodeId, NodeId, i64), Option<i64>>,
}

impl<'a> Router<'a> {
    /// Indexes the links of a platform.
    pub fn new(platform: &'a Platform) -> Self {
        let mut adjacency: HashMap<NodeId, Vec<&'a Link>> = HashMap::new();
        for link in &platform.links {
            adjacency.entry(link.a).or_default().push(link);
            if link.b != link.a {
                adjacency.entry(link.b).or_default().push(link);
            }
        }
        Self {
            adjacency,
            cache: HashMap::new(),
        }
    }

    /// Delay for `size` payload units from `from` to `to`. `None` = unreachable.
    pub fn delay(&mut self, from: NodeId, to: NodeId, size: i64) -> Option<i64> {
        if from == to {
            return Some(0);
        }
        if let Some(&cached) = self.cache.get(&(from, to, size)) {
            return cached;
        }
        let result = self.shortest(from, to, size);
        self.cache.insert((from, to, size), result);
        result
    }

    fn shortest(&self, from: NodeId, to: NodeId, size: i64) -> Option<i64> {
        let mut dist: HashMap<NodeId, i64> = HashMap::new();
        let mut heap = BinaryHeap::new();
        dist.insert(from, 0);
        heap.push(Reverse((0i64, from)));

        while let Some(Reverse((cost, node))) = heap.pop() {
            if node == to {
                return Some(cost);
            }
            if dist.get(&node).is_some_and(|&d| cost > d) {
                continue;
            }
            let Some(links) = self.adjacency.get(&node) else {
                continue;
            };
            for link in links {
                let Some(next) = link.other(node) else {
                    continue;
                };
                let next_cost = cost.saturating_add(link.transfer_delay(size));
                if dist.get(&next).map_or(true, |&d| next_cost < d) {
                    dist.insert(next, next_cost);
                    heap.push(Reverse((next_cost, next)));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;

    fn line_platform() -> Platform {
        // 0 --3-- 1(router) --2-- 2, plus a slow direct link 0 --10-- 2
        Platform::new(
            vec![Node::compute(0), Node::router(1), Node::compute(2), Node::compute(3)],
            vec![
                Link::new(0, 1, 3),
                Link::new(1, 2, 2).with_bandwidth(4),
                Link::new(0, 2, 10),
            ],
        )
    }

    #[test]
    fn test_same_node_is_free() {
        let p = line_platform();
        let mut r = Router::new(&p);
        assert_eq!(r.delay(2, 2, 1000), Some(0));
    }

    #[test]
    fn test_multi_hop_beats_direct() {
        let p = line_platform();
        let mut r = Router::new(&p);
        // via router: 3 + (2 + 0) = 5 < 10
        assert_eq!(r.delay(0, 2, 0), Some(5));
        assert_eq!(r.delay(2, 0, 0), Some(5));
    }

    #[test]
    fn test_bandwidth_changes_route() {
        let p = line_platform();
        let mut r = Router::new(&p);
        // via router: 3 + 2 + ceil(40/4) = 15 > direct 10
        assert_eq!(r.delay(0, 2, 40), Some(10));
    }

    #[test]
    fn test_unreachable() {
        let p = line_platform();
        let mut r = Router::new(&p);
        assert_eq!(r.delay(0, 3, 0), None);
        // cached answer is stable
        assert_eq!(r.delay(0, 3, 0), None);
    }
}
