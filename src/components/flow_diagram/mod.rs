mod component;
pub mod dsl;
pub mod edit;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod layout;
mod render;
pub mod state;
pub mod types;

pub use component::FlowDiagramCanvas;
