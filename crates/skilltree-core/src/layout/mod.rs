//! Radial layout of a skill profile
//!
//! Produces a format-agnostic [`RadialLayout`]: positioned nodes on three
//! concentric rings plus the connectors between each node and its layout
//! parent. Rendering to SVG or any other format happens elsewhere.

mod radial;
mod types;

pub use radial::{CENTER_ID, RadialLayoutEngine, angle_step, arc_angles, category_angles, radial_layout};
pub use types::{Connection, LayoutConfig, LayoutNode, NodeKind, NodeRef, Point, RadialLayout, Size};
