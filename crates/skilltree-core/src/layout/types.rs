//! Layout geometry types

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::skills::DetectedSkill;
use crate::taxonomy::Category;

/// A point on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `self` in direction `angle` (radians, y grows down)
    pub fn polar(self, radius: f64, angle: f64) -> Self {
        Self {
            x: self.x + radius * angle.cos(),
            y: self.y + radius * angle.sin(),
        }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Width and height of a node's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

/// Which ring a node sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Center,
    Category,
    Skill,
}

/// What a layout node stands for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeRef {
    Center { label: String },
    Category { category: Category, label: String },
    Skill(DetectedSkill),
}

impl NodeRef {
    /// Text shown inside the node
    pub fn label(&self) -> &str {
        match self {
            Self::Center { label } | Self::Category { label, .. } => label,
            Self::Skill(skill) => &skill.name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Center { .. } => NodeKind::Center,
            Self::Category { .. } => NodeKind::Category,
            Self::Skill(_) => NodeKind::Skill,
        }
    }
}

/// A positioned node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    /// Stable identifier, e.g. `category:framework`
    pub id: String,
    pub node_ref: NodeRef,
    pub kind: NodeKind,
    /// Top-left corner of the bounding box
    pub position: Point,
    pub size: Size,
    pub center_point: Point,
    /// Polar angle around the canvas center; zero for the center node
    pub angle: f64,
}

impl LayoutNode {
    pub(crate) fn centered(id: String, node_ref: NodeRef, center_point: Point, size: Size, angle: f64) -> Self {
        Self {
            id,
            kind: node_ref.kind(),
            node_ref,
            position: Point::new(center_point.x - size.w / 2.0, center_point.y - size.h / 2.0),
            size,
            center_point,
            angle,
        }
    }

    pub fn label(&self) -> &str {
        self.node_ref.label()
    }

    /// y-coordinate of the bounding box's bottom edge
    pub fn bottom(&self) -> f64 {
        self.position.y + self.size.h
    }
}

/// A connector between a node and its layout parent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
    pub from_point: Point,
    pub to_point: Point,
}

/// Positioned node graph handed to a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialLayout {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<LayoutNode>,
    pub connections: Vec<Connection>,
}

impl RadialLayout {
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Connections arriving at `id`
    pub fn inbound(&self, id: &str) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| c.to == id)
    }
}

/// Geometric constants of the radial layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fixed canvas width; the center node sits at `width / 2`
    pub width: f64,
    pub center_y: f64,
    pub category_radius: f64,
    /// Distance between the category ring and the skill ring
    pub ring_spacing: f64,
    pub max_skills_per_category: usize,
    /// Fraction of the category step covered by a category's skill arc
    pub arc_fraction: f64,
    pub center_size: Size,
    pub category_size: Size,
    pub skill_size: Size,
    pub bottom_padding: f64,
    pub min_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            center_y: 340.0,
            category_radius: 160.0,
            ring_spacing: 120.0,
            max_skills_per_category: 3,
            arc_fraction: 0.7,
            center_size: Size::new(150.0, 56.0),
            category_size: Size::new(130.0, 40.0),
            skill_size: Size::new(120.0, 34.0),
            bottom_padding: 40.0,
            min_height: 480.0,
        }
    }
}

impl LayoutConfig {
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.center_y)
    }

    pub fn skill_radius(&self) -> f64 {
        self.category_radius + self.ring_spacing
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("layout.width", self.width),
            ("layout.category_radius", self.category_radius),
            ("layout.ring_spacing", self.ring_spacing),
            ("layout.min_height", self.min_height),
            ("layout.center_size.w", self.center_size.w),
            ("layout.center_size.h", self.center_size.h),
            ("layout.category_size.w", self.category_size.w),
            ("layout.category_size.h", self.category_size.h),
            ("layout.skill_size.w", self.skill_size.w),
            ("layout.skill_size.h", self.skill_size.h),
        ];
        for (key, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::ConfigError(format!("{} must be a positive number, got {}", key, value)));
            }
        }

        for (key, value) in [("layout.center_y", self.center_y), ("layout.bottom_padding", self.bottom_padding)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::ConfigError(format!("{} must not be negative, got {}", key, value)));
            }
        }

        if !(self.arc_fraction > 0.0 && self.arc_fraction <= 1.0) {
            return Err(Error::ConfigError(format!(
                "layout.arc_fraction must be in (0, 1], got {}",
                self.arc_fraction
            )));
        }

        if self.max_skills_per_category == 0 {
            return Err(Error::ConfigError("layout.max_skills_per_category must be at least 1".to_string()));
        }

        Ok(())
    }
}
