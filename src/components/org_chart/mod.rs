mod component;
mod hierarchy;
mod input;
mod render;
mod selection;
mod state;
mod types;
mod viewport;

pub use component::OrgChartCanvas;
pub use types::{Employee, Point};
