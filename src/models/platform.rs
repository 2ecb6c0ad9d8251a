//! Platform model.
//!
//! Nodes are the processing resources (and message forwarders) of the
//! target hardware; links connect them with a latency and an optional
//! bandwidth. Only compute nodes execute jobs.

use serde::{Deserialize, Serialize};

/// Stable node identifier.
pub type NodeId = u64;

/// A node of the target platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique node identifier.
    pub id: NodeId,
    /// Node classification.
    #[serde(default, rename = "type", alias = "kind")]
    pub kind: NodeKind,
    /// Relative speed factor (1.0 = nominal, 2.0 = twice as fast).
    #[serde(default = "default_speed")]
    pub speed: f64,
}

/// Node classification.
///
/// Routers and sensors forward messages but never run jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Executes jobs.
    #[default]
    Compute,
    /// Forwards messages only.
    Router,
    /// Produces data; forwards messages only.
    Sensor,
}

fn default_speed() -> f64 {
    1.0
}

impl Node {
    /// Creates a compute node of nominal speed.
    pub fn compute(id: NodeId) -> Self {
        Self {
            id,
            kind: NodeKind::Compute,
            speed: 1.0,
        }
    }

    /// Creates a router node.
    pub fn router(id: NodeId) -> Self {
        Self {
            id,
            kind: NodeKind::Router,
            speed: 1.0,
        }
    }

    /// Sets the speed factor.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Whether this node executes jobs.
    #[inline]
    pub fn is_compute(&self) -> bool {
        self.kind == NodeKind::Compute
    }

    /// Execution time of a job with the given WCET on this node.
    ///
    /// `ceil(wcet / speed)`, never below one time unit.
    pub fn execution_time(&self, wcet: i64) -> i64 {
        if self.speed == 1.0 {
            return wcet.max(1);
        }
        ((wcet as f64 / self.speed).ceil() as i64).max(1)
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::compute(0)
    }
}

/// An undirected communication link between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Optional link identifier (informational).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// One endpoint.
    #[serde(alias = "start_node")]
    pub a: NodeId,
    /// The other endpoint.
    #[serde(alias = "end_node")]
    pub b: NodeId,
    /// Fixed per-hop delay.
    #[serde(default, alias = "link_delay")]
    pub latency: i64,
    /// Payload units per time unit. `None` = unlimited.
    #[serde(default)]
    pub bandwidth: Option<i64>,
}

impl Link {
    /// Creates a link with the given latency and unlimited bandwidth.
    pub fn new(a: NodeId, b: NodeId, latency: i64) -> Self {
        Self {
            id: None,
            a,
            b,
            latency,
            bandwidth: None,
        }
    }

    /// Sets the bandwidth.
    pub fn with_bandwidth(mut self, bandwidth: i64) -> Self {
        self.bandwidth = Some(bandwidth);
        self
    }

    /// Delay for sending `size` payload units across this link.
    ///
    /// `latency + ceil(size / bandwidth)`.
    pub fn transfer_delay(&self, size: i64) -> i64 {
        match self.bandwidth {
            Some(bw) if bw > 0 && size > 0 => self.latency + (size + bw - 1) / bw,
            _ => self.latency,
        }
    }

    /// The endpoint opposite `node`, if `node` is an endpoint.
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if self.a == node {
            Some(self.b)
        } else if self.b == node {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Nodes plus links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// All nodes, including routers and sensors.
    pub nodes: Vec<Node>,
    /// Communication links.
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Platform {
    /// Creates a platform.
    pub fn new(nodes: Vec<Node>, links: Vec<Link>) -> Self {
        Self { nodes, links }
    }

    /// Fully connected platform of `count` nominal compute nodes with uniform latency.
    pub fn fully_connected(count: u64, latency: i64) -> Self {
        let nodes = (0..count).map(Node::compute).collect();
        let mut links = Vec::new();
        for a in 0..count {
            for b in (a + 1)..count {
                links.push(Link::new(a, b, latency));
            }
        }
        Self { nodes, links }
    }

    /// Finds a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Compute nodes in ascending ID order.
    pub fn compute_nodes(&self) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self.nodes.iter().filter(|n| n.is_compute()).collect();
        nodes.sort_by_key(|n| n.id);
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_time_scaling() {
        let nominal = Node::compute(0);
        assert_eq!(nominal.execution_time(30), 30);

        let fast = Node::compute(1).with_speed(2.0);
        assert_eq!(fast.execution_time(30), 15);
        assert_eq!(fast.execution_time(31), 16); // rounded up

        let slow = Node::compute(2).with_speed(0.5);
        assert_eq!(slow.execution_time(30), 60);

        let very_fast = Node::compute(3).with_speed(100.0);
        assert_eq!(very_fast.execution_time(3), 1);
    }

    #[test]
    fn test_link_transfer_delay() {
        let link = Link::new(0, 1, 5);
        assert_eq!(link.transfer_delay(1000), 5);

        let link = link.with_bandwidth(10);
        assert_eq!(link.transfer_delay(0), 5);
        assert_eq!(link.transfer_delay(100), 15);
        assert_eq!(link.transfer_delay(101), 16);
    }

    #[test]
    fn test_link_other() {
        let link = Link::new(3, 4, 1);
        assert_eq!(link.other(3), Some(4));
        assert_eq!(link.other(4), Some(3));
        assert_eq!(link.other(5), None);
    }

    #[test]
    fn test_compute_nodes_sorted() {
        let platform = Platform::new(
            vec![Node::compute(2), Node::router(1), Node::compute(0)],
            vec![],
        );
        let ids: Vec<NodeId> = platform.compute_nodes().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert!(platform.node(1).is_some());
        assert!(platform.node(9).is_none());
    }

    #[test]
    fn test_fully_connected() {
        let p = Platform::fully_connected(3, 4);
        assert_eq!(p.nodes.len(), 3);
        assert_eq!(p.links.len(), 3);
        assert!(p.links.iter().all(|l| l.latency == 4));
    }

    #[test]
    fn test_platform_deserialize() {
        let json = r#"{
            "nodes": [
                {"id": 0, "type": "compute"},
                {"id": 1, "type": "router"},
                {"id": 2, "type": "compute", "speed": 2.0}
            ],
            "links": [
                {"id": 0, "start_node": 0, "end_node": 1, "link_delay": 3, "bandwidth": 8},
                {"id": 1, "start_node": 1, "end_node": 2, "link_delay": 2}
            ]
        }"#;
        let p: Platform = serde_json::from_str(json).unwrap();
        assert_eq!(p.nodes[1].kind, NodeKind::Router);
        assert_eq!(p.nodes[0].speed, 1.0);
        assert_eq!(p.links[0].latency, 3);
        assert_eq!(p.links[0].bandwidth, Some(8));
        assert_eq!(p.links[1].bandwidth, None);
    }
}
