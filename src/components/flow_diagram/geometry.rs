use super::graph::Graph;
use super::types::{Anchor, Edge, Node};

/// Radius of an anchor handle, in screen pixels.
pub const HANDLE_RADIUS: f64 = 7.0;
/// How close (screen pixels) a click must land to an edge to hit it.
pub const EDGE_HIT_TOLERANCE: f64 = 6.0;
/// Distance the bezier control points are pushed out of the node.
const CURVE_PULL: f64 = 80.0;
const CURVE_SAMPLES: usize = 24;

const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 2.0;

/// Maps layout units to screen pixels: `screen = layout * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Centres `graph` in a `width` x `height` viewport, leaving `padding`
	/// (fraction of the content size) around it.
	pub fn fit(graph: &Graph, width: f64, height: f64, padding: f64) -> Self {
		let Some((min_x, min_y, max_x, max_y)) = bounds(graph) else {
			return Self::default();
		};
		let (bw, bh) = ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0));
		let k = (width / (bw * (1.0 + padding)))
			.min(height / (bh * (1.0 + padding)))
			.clamp(MIN_ZOOM, MAX_ZOOM);
		let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		Self {
			x: width / 2.0 - cx * k,
			y: height / 2.0 - cy * k,
			k,
		}
	}
}

pub fn bounds(graph: &Graph) -> Option<(f64, f64, f64, f64)> {
	graph.nodes().iter().fold(None, |acc, node| {
		let (w, h) = node.size();
		let (x0, y0) = (node.position.x, node.position.y);
		let (x1, y1) = (x0 + w, y0 + h);
		Some(match acc {
			None => (x0, y0, x1, y1),
			Some((a, b, c, d)) => (a.min(x0), b.min(y0), c.max(x1), d.max(y1)),
		})
	})
}

/// Point on the node's outline where `anchor` sits.
pub fn anchor_point(node: &Node, anchor: Anchor) -> (f64, f64) {
	let (w, h) = node.size();
	let (x, y) = (node.position.x, node.position.y);
	match anchor {
		Anchor::Top => (x + w / 2.0, y),
		Anchor::Right => (x + w, y + h / 2.0),
		Anchor::Bottom => (x + w / 2.0, y + h),
		Anchor::Left => (x, y + h / 2.0),
	}
}

pub fn contains(node: &Node, gx: f64, gy: f64) -> bool {
	let (w, h) = node.size();
	let (x, y) = (node.position.x, node.position.y);
	gx >= x && gx <= x + w && gy >= y && gy <= y + h
}

/// Anchor of `node` nearest to a layout point.
pub fn nearest_anchor(node: &Node, gx: f64, gy: f64) -> Anchor {
	let dist = |a: Anchor| {
		let (ax, ay) = anchor_point(node, a);
		(ax - gx).powi(2) + (ay - gy).powi(2)
	};
	Anchor::ALL
		.into_iter()
		.min_by(|a, b| dist(*a).total_cmp(&dist(*b)))
		.unwrap_or(Anchor::Right)
}

/// Cubic bezier (start, control 1, control 2, end) for an edge, if both ends exist.
pub fn edge_curve(graph: &Graph, edge: &Edge) -> Option<[(f64, f64); 4]> {
	let source = graph.node(&edge.source)?;
	let target = graph.node(&edge.target)?;
	let start = anchor_point(source, edge.source_anchor);
	let end = anchor_point(target, edge.target_anchor);
	let (snx, sny) = edge.source_anchor.normal();
	let (tnx, tny) = edge.target_anchor.normal();
	Some([
		start,
		(start.0 + snx * CURVE_PULL, start.1 + sny * CURVE_PULL),
		(end.0 + tnx * CURVE_PULL, end.1 + tny * CURVE_PULL),
		end,
	])
}

pub fn bezier_point(curve: &[(f64, f64); 4], t: f64) -> (f64, f64) {
	let u = 1.0 - t;
	let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
	let [p0, p1, p2, p3] = curve;
	(
		a * p0.0 + b * p1.0 + c * p2.0 + d * p3.0,
		a * p0.1 + b * p1.1 + c * p2.1 + d * p3.1,
	)
}

/// Approximate distance from a point to the curve, by sampling it as a polyline.
pub fn distance_to_curve(curve: &[(f64, f64); 4], px: f64, py: f64) -> f64 {
	let mut prev = curve[0];
	let mut best = f64::INFINITY;
	for i in 1..=CURVE_SAMPLES {
		let next = bezier_point(curve, i as f64 / CURVE_SAMPLES as f64);
		best = best.min(distance_to_segment(prev, next, px, py));
		prev = next;
	}
	best
}

fn distance_to_segment(a: (f64, f64), b: (f64, f64), px: f64, py: f64) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let len2 = dx * dx + dy * dy;
	let t = if len2 < 1e-9 {
		0.0
	} else {
		(((px - a.0) * dx + (py - a.1) * dy) / len2).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
	((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flow_diagram::layout::{LayoutMode, layout};
	use crate::components::flow_diagram::types::{NodeKind, NodePayload, Position};

	fn feature_at(x: f64, y: f64) -> Node {
		Node::new("f", Position::new(x, y), NodePayload::empty(NodeKind::Feature))
	}

	#[test]
	fn anchors_sit_on_the_outline() {
		let node = feature_at(100.0, 50.0);
		assert_eq!(anchor_point(&node, Anchor::Top), (210.0, 50.0));
		assert_eq!(anchor_point(&node, Anchor::Right), (320.0, 80.0));
		assert_eq!(anchor_point(&node, Anchor::Bottom), (210.0, 110.0));
		assert_eq!(anchor_point(&node, Anchor::Left), (100.0, 80.0));
		assert_eq!(nearest_anchor(&node, 318.0, 70.0), Anchor::Right);
		assert_eq!(nearest_anchor(&node, 200.0, 40.0), Anchor::Top);
	}

	#[test]
	fn fit_centres_content_and_clamps_zoom() {
		let graph = layout(LayoutMode::Landscape);
		let t = ViewTransform::fit(&graph, 1600.0, 900.0, 0.3);
		let (min_x, min_y, max_x, max_y) = bounds(&graph).unwrap();
		let centre = ((min_x + max_x) / 2.0 * t.k + t.x, (min_y + max_y) / 2.0 * t.k + t.y);
		assert!((centre.0 - 800.0).abs() < 1e-6);
		assert!((centre.1 - 450.0).abs() < 1e-6);
		assert!(t.k <= 2.0 && t.k >= 0.1);

		let empty = ViewTransform::fit(&Graph::default(), 100.0, 100.0, 0.3);
		assert_eq!(empty, ViewTransform::default());
	}

	#[test]
	fn screen_to_graph_inverts_transform() {
		let t = ViewTransform {
			x: 10.0,
			y: 20.0,
			k: 2.0,
		};
		assert_eq!(t.screen_to_graph(210.0, 120.0), (100.0, 50.0));
	}

	#[test]
	fn curve_passes_through_its_endpoints() {
		let graph = layout(LayoutMode::Landscape);
		let edge = graph.edge("doctype-feature-1").unwrap();
		let curve = edge_curve(&graph, edge).unwrap();
		assert_eq!(bezier_point(&curve, 0.0), curve[0]);
		assert!(distance_to_curve(&curve, curve[3].0, curve[3].1) < 1e-9);
		let mid = bezier_point(&curve, 0.5);
		assert!(distance_to_curve(&curve, mid.0, mid.1) < 1.0);
		assert!(distance_to_curve(&curve, mid.0, mid.1 + 200.0) > 50.0);
	}
}
