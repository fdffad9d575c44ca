use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::geometry::{HANDLE_RADIUS, anchor_point, edge_curve};
use super::state::{DiagramState, Gesture};
use super::types::{Anchor, EdgeStyle, Node, NodePayload};

const BACKGROUND: &str = "#0a0a0a";
const GRID: &str = "#1f2937";
const ACCENT: &str = "#f97316";
const SELECTED: &str = "#fde68a";
const PANEL: &str = "rgba(0, 0, 0, 0.85)";
const PANEL_BORDER: &str = "rgba(249, 115, 22, 0.3)";
const MONO: &str = "ui-monospace, SFMono-Regular, Menlo, monospace";

pub fn render(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_grid(state, ctx);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_pending_connection(state, ctx);
	for node in state.graph.nodes() {
		draw_node(node, ctx);
	}
	if state.session.editing_active() {
		draw_handles(state, ctx);
	}
	ctx.restore();
}

/// Dotted background, 30 layout units apart.
fn draw_grid(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	let gap = 30.0 * state.transform.k;
	if gap < 4.0 {
		return;
	}
	ctx.set_fill_style_str(GRID);
	let mut x = state.transform.x.rem_euclid(gap);
	while x < state.width {
		let mut y = state.transform.y.rem_euclid(gap);
		while y < state.height {
			ctx.fill_rect(x, y, 1.0, 1.0);
			y += gap;
		}
		x += gap;
	}
}

/// Colour and layout-unit line width that render at a fixed screen width.
fn edge_stroke(style: EdgeStyle, k: f64) -> (&'static str, f64) {
	match style {
		EdgeStyle::Selected => (SELECTED, 3.5 / k),
		EdgeStyle::Default => (ACCENT, 2.0 / k),
	}
}

fn draw_edges(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (dash, gap, arrow_size) = (5.0 / k, 5.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);

	for edge in state.graph.edges() {
		let Some([p0, p1, p2, p3]) = edge_curve(&state.graph, edge) else {
			continue;
		};
		let (colour, width) = edge_stroke(state.edge_style(edge), k);

		ctx.set_stroke_style_str(colour);
		ctx.set_line_width(width);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);
		ctx.begin_path();
		ctx.move_to(p0.0, p0.1);
		ctx.bezier_curve_to(p1.0, p1.1, p2.0, p2.1, p3.0, p3.1);
		ctx.stroke();

		// arrow head points into the target along its anchor normal
		let _ = ctx.set_line_dash(&js_sys::Array::new());
		let (nx, ny) = edge.target_anchor.normal();
		let (back_x, back_y) = (p3.0 + nx * arrow_size, p3.1 + ny * arrow_size);
		let (px, py) = (-ny * arrow_size * 0.5, nx * arrow_size * 0.5);
		ctx.set_fill_style_str(colour);
		ctx.begin_path();
		ctx.move_to(p3.0, p3.1);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_pending_connection(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	let Gesture::Connect(connect) = state.gesture() else {
		return;
	};
	let Some(source) = state.graph.node(&connect.source) else {
		return;
	};
	let (sx, sy) = anchor_point(source, connect.source_anchor);
	ctx.set_stroke_style_str(SELECTED);
	ctx.set_line_width(1.5 / state.transform.k);
	ctx.begin_path();
	ctx.move_to(sx, sy);
	ctx.line_to(connect.cursor.0, connect.cursor.1);
	ctx.stroke();
}

fn draw_handles(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	let radius = HANDLE_RADIUS / state.transform.k * 0.6;
	ctx.set_fill_style_str(ACCENT);
	for node in state.graph.nodes() {
		for anchor in Anchor::ALL {
			let (x, y) = anchor_point(node, anchor);
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
			ctx.fill();
		}
	}
}

fn draw_node(node: &Node, ctx: &CanvasRenderingContext2d) {
	let (x, y) = (node.position.x, node.position.y);
	let (w, h) = node.size();

	match &node.payload {
		NodePayload::Tagline(tagline) => {
			ctx.set_text_align("center");
			ctx.set_text_baseline("top");
			ctx.set_font("bold 36px sans-serif");
			ctx.set_fill_style_str("#ffffff");
			let heading = format!("{} {}", tagline.title, tagline.subtitle);
			let _ = ctx.fill_text(&heading, x + w / 2.0, y);
			ctx.set_font("20px sans-serif");
			ctx.set_fill_style_str("#a1a1aa");
			let _ = ctx.fill_text(&tagline.description, x + w / 2.0, y + 56.0);
		}
		NodePayload::CodeBlock(code) => {
			panel(ctx, x, y, w, h, 12.0);
			for (i, colour) in ["#ef4444", "#eab308", "#22c55e"].iter().enumerate() {
				ctx.set_fill_style_str(colour);
				ctx.begin_path();
				let _ = ctx.arc(x + 30.0 + i as f64 * 16.0, y + 30.0, 6.0, 0.0, 2.0 * PI);
				ctx.fill();
			}
			ctx.set_text_align("left");
			ctx.set_text_baseline("middle");
			ctx.set_font(&format!("13px {MONO}"));
			ctx.set_fill_style_str("#fb923c");
			let _ = ctx.fill_text(&code.file_name, x + 90.0, y + 30.0);

			ctx.set_font(&format!("11px {MONO}"));
			ctx.set_fill_style_str("#fdba74");
			for (i, line) in code.source.lines().enumerate() {
				let ly = y + 62.0 + i as f64 * 15.4;
				if ly > y + h - 12.0 {
					break;
				}
				let _ = ctx.fill_text(line, x + 24.0, ly);
			}
		}
		NodePayload::Feature(feature) => {
			panel(ctx, x, y, w, h, 12.0);
			ctx.set_fill_style_str(&feature.accent);
			rounded_rect(ctx, x + 14.0, y + h / 2.0 - 16.0, 32.0, 32.0, 8.0);
			ctx.fill();
			ctx.set_text_align("center");
			ctx.set_text_baseline("middle");
			ctx.set_font("16px sans-serif");
			ctx.set_fill_style_str("#ffffff");
			let _ = ctx.fill_text(feature.icon.glyph(), x + 30.0, y + h / 2.0);
			ctx.set_text_align("left");
			ctx.set_font("14px sans-serif");
			let _ = ctx.fill_text(&feature.title, x + 58.0, y + h / 2.0);
		}
		NodePayload::Command(command) => {
			panel(ctx, x, y, w, h, 8.0);
			ctx.set_text_align("left");
			ctx.set_text_baseline("middle");
			ctx.set_font(&format!("14px {MONO}"));
			ctx.set_fill_style_str("#4ade80");
			let _ = ctx.fill_text("$", x + 16.0, y + h / 2.0);
			ctx.set_fill_style_str("#ffffff");
			let _ = ctx.fill_text(&command.command, x + 34.0, y + h / 2.0);
		}
	}
}

fn panel(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	rounded_rect(ctx, x, y, w, h, r);
	ctx.set_fill_style_str(PANEL);
	ctx.fill();
	ctx.set_stroke_style_str(PANEL_BORDER);
	ctx.set_line_width(1.0);
	ctx.stroke();
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	ctx.line_to(x + w - r, y);
	ctx.quadratic_curve_to(x + w, y, x + w, y + r);
	ctx.line_to(x + w, y + h - r);
	ctx.quadratic_curve_to(x + w, y + h, x + w - r, y + h);
	ctx.line_to(x + r, y + h);
	ctx.quadratic_curve_to(x, y + h, x, y + h - r);
	ctx.line_to(x, y + r);
	ctx.quadratic_curve_to(x, y, x + r, y);
	ctx.close_path();
}
