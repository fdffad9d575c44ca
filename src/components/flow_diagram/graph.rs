use std::collections::HashSet;

use log::warn;

use super::error::DiagramError;
use super::types::{Anchor, Edge, Node, Position, is_valid_id, unique_edge_id};

/// A change to apply to the node set.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeChange {
	Position { id: String, position: Position },
	Remove { id: String },
}

/// A change to apply to the edge set.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeChange {
	Add(Edge),
	Remove { id: String },
}

/// The authoritative node/edge snapshot.
///
/// Edges refer to nodes by id only. Every public mutation keeps the snapshot
/// consistent: no edge ever names a node that is not present.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
}

impl Graph {
	/// Builds a graph, logging anything that had to be discarded.
	pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
		let mut graph = Graph::default();
		for rejected in graph.set_graph(nodes, edges) {
			warn!("discarded while building graph: {rejected}");
		}
		graph
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn edge(&self, id: &str) -> Option<&Edge> {
		self.edges.iter().find(|e| e.id == id)
	}

	/// Replaces the whole snapshot. Invalid items are dropped and returned.
	pub fn set_graph(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) -> Vec<DiagramError> {
		let mut rejected = Vec::new();
		let mut node_ids = HashSet::new();
		let mut kept_nodes = Vec::with_capacity(nodes.len());
		for node in nodes {
			if let Err(err) = check_node(&node.id, node.position) {
				rejected.push(err);
			} else if node_ids.insert(node.id.clone()) {
				kept_nodes.push(node);
			} else {
				rejected.push(DiagramError::DuplicateId(node.id));
			}
		}

		let mut kept_edges: Vec<Edge> = Vec::with_capacity(edges.len());
		for edge in edges {
			match check_edge(&edge, |id| node_ids.contains(id), &kept_edges) {
				Ok(()) => kept_edges.push(edge),
				Err(err) => rejected.push(err),
			}
		}

		self.nodes = kept_nodes;
		self.edges = kept_edges;
		rejected
	}

	/// Applies node changes all-or-nothing. Removing a node drops its edges.
	pub fn apply_node_delta(&mut self, changes: &[NodeChange]) -> Result<(), DiagramError> {
		let mut present: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
		for change in changes {
			match change {
				NodeChange::Position { id, .. } if !present.contains(id.as_str()) => {
					return Err(DiagramError::UnknownNode(id.clone()));
				}
				NodeChange::Position { id, position } => check_node(id, *position)?,
				NodeChange::Remove { id } if !present.remove(id.as_str()) => {
					return Err(DiagramError::UnknownNode(id.clone()));
				}
				NodeChange::Remove { .. } => {}
			}
		}

		for change in changes {
			match change {
				NodeChange::Position { id, position } => {
					if let Some(node) = self.nodes.iter_mut().find(|n| &n.id == id) {
						node.position = *position;
					}
				}
				NodeChange::Remove { id } => {
					self.nodes.retain(|n| &n.id != id);
					self.edges.retain(|e| !e.touches(id));
				}
			}
		}
		Ok(())
	}

	/// Applies edge changes all-or-nothing, against a working copy that is
	/// committed only when every change went through.
	pub fn apply_edge_delta(&mut self, changes: &[EdgeChange]) -> Result<(), DiagramError> {
		let mut edges = self.edges.clone();
		for change in changes {
			match change {
				EdgeChange::Add(edge) => {
					check_edge(edge, |id| self.node(id).is_some(), &edges)?;
					edges.push(edge.clone());
				}
				EdgeChange::Remove { id } => {
					let before = edges.len();
					edges.retain(|e| &e.id != id);
					if edges.len() == before {
						return Err(DiagramError::UnknownEdge(id.clone()));
					}
				}
			}
		}
		self.edges = edges;
		Ok(())
	}

	/// Connects two nodes. The edge is named `<source>-<target>` unless a
	/// different connection already owns that id.
	pub fn add_edge(
		&mut self,
		source: &str,
		target: &str,
		source_anchor: Anchor,
		target_anchor: Anchor,
	) -> Result<Edge, DiagramError> {
		let mut edge = Edge::new(source, target, source_anchor, target_anchor);
		edge.id = unique_edge_id(source, target, &self.edges);
		self.apply_edge_delta(&[EdgeChange::Add(edge.clone())])?;
		Ok(edge)
	}
}

fn check_node(id: &str, position: Position) -> Result<(), DiagramError> {
	if !is_valid_id(id) {
		return Err(DiagramError::InvalidId(id.to_string()));
	}
	if !(position.x.is_finite() && position.y.is_finite()) {
		return Err(DiagramError::NonFinitePosition(id.to_string()));
	}
	Ok(())
}

/// One edge per ordered (source, target) pair, whatever the ids; the text
/// format has no room for more.
fn check_edge(
	edge: &Edge,
	node_exists: impl Fn(&str) -> bool,
	existing: &[Edge],
) -> Result<(), DiagramError> {
	if !is_valid_id(&edge.id) {
		return Err(DiagramError::InvalidId(edge.id.clone()));
	}
	for endpoint in [&edge.source, &edge.target] {
		if !node_exists(endpoint.as_str()) {
			return Err(DiagramError::UnknownEndpoint {
				edge: edge.id.clone(),
				node: endpoint.clone(),
			});
		}
	}
	if edge.source == edge.target {
		return Err(DiagramError::SelfLoop(edge.id.clone()));
	}
	let taken = existing.iter().find(|e| {
		e.id == edge.id || (e.source == edge.source && e.target == edge.target)
	});
	if let Some(taken) = taken {
		return Err(DiagramError::DuplicateId(taken.id.clone()));
	}
	Ok(())
}
