//! Diagram geometry in the unit square
//!
//! Four-set diagrams use a fixed table keyed by subset name: singletons sit at the
//! corners and each composite region sits between its constituents. Two- and three-set
//! diagrams use overlapping circles with one anchor per region. The origin is the
//! bottom-left corner and `y` grows upwards.

use crate::setlab::region::RegionMask;
use crate::setlab::sets::Label;
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Circular set outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

const FOUR_SET_TABLE: [(&str, Point); 15] = [
    ("A", Point::new(0.10, 0.90)),
    ("B", Point::new(0.90, 0.90)),
    ("C", Point::new(0.10, 0.10)),
    ("D", Point::new(0.90, 0.10)),
    ("AB", Point::new(0.50, 0.90)),
    ("CD", Point::new(0.50, 0.10)),
    ("AC", Point::new(0.10, 0.50)),
    ("BD", Point::new(0.90, 0.50)),
    ("AD", Point::new(0.36, 0.50)),
    ("BC", Point::new(0.64, 0.50)),
    ("ABC", Point::new(0.30, 0.70)),
    ("ABD", Point::new(0.70, 0.70)),
    ("ACD", Point::new(0.30, 0.30)),
    ("BCD", Point::new(0.70, 0.30)),
    ("ABCD", Point::new(0.50, 0.50)),
];

/// Region label positions for four sets, keyed by subset name
pub static FOUR_SET_LAYOUT: Lazy<HashMap<&'static str, Point>> =
    Lazy::new(|| FOUR_SET_TABLE.iter().copied().collect());

const TWO_SET_CIRCLES: [Circle; 2] = [
    Circle {
        center: Point::new(0.38, 0.50),
        radius: 0.25,
    },
    Circle {
        center: Point::new(0.62, 0.50),
        radius: 0.25,
    },
];

const TWO_SET_ANCHORS: [(&str, Point); 3] = [
    ("A", Point::new(0.25, 0.50)),
    ("B", Point::new(0.75, 0.50)),
    ("AB", Point::new(0.50, 0.50)),
];

const THREE_SET_CIRCLES: [Circle; 3] = [
    Circle {
        center: Point::new(0.38, 0.60),
        radius: 0.25,
    },
    Circle {
        center: Point::new(0.62, 0.60),
        radius: 0.25,
    },
    Circle {
        center: Point::new(0.50, 0.38),
        radius: 0.25,
    },
];

const THREE_SET_ANCHORS: [(&str, Point); 7] = [
    ("A", Point::new(0.28, 0.68)),
    ("B", Point::new(0.72, 0.68)),
    ("C", Point::new(0.50, 0.22)),
    ("AB", Point::new(0.50, 0.72)),
    ("AC", Point::new(0.38, 0.42)),
    ("BC", Point::new(0.62, 0.42)),
    ("ABC", Point::new(0.50, 0.55)),
];

/// Position of the region text for a mask, `None` for the outside region
pub fn region_anchor(labels: &[Label], mask: RegionMask) -> Option<Point> {
    let name = mask.name(labels);
    match labels.len() {
        2 => lookup(&TWO_SET_ANCHORS, &name),
        3 => lookup(&THREE_SET_ANCHORS, &name),
        4 => FOUR_SET_LAYOUT.get(name.as_str()).copied(),
        _ => None,
    }
}

fn lookup(table: &[(&str, Point)], name: &str) -> Option<Point> {
    table
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, point)| *point)
}

/// Set outlines; four-set diagrams have none
pub fn set_outlines(count: usize) -> &'static [Circle] {
    match count {
        2 => &TWO_SET_CIRCLES,
        3 => &THREE_SET_CIRCLES,
        _ => &[],
    }
}

/// Where to print a set's own label
pub fn set_label_anchor(count: usize, index: usize) -> Option<Point> {
    if count == 4 {
        // Corner labels sit just inside the border, above the singleton texts
        let corner = FOUR_SET_TABLE.get(index)?.1;
        return Some(Point::new(corner.x, if corner.y > 0.5 { 0.98 } else { 0.02 }));
    }
    let circle = set_outlines(count).get(index)?;
    let dx = circle.center.x - 0.5;
    let dy = circle.center.y - 0.5;
    let norm = (dx * dx + dy * dy).sqrt().max(f64::EPSILON);
    let reach = circle.radius + 0.05;
    Some(Point::new(
        (circle.center.x + dx / norm * reach).clamp(0.02, 0.98),
        (circle.center.y + dy / norm * reach).clamp(0.02, 0.98),
    ))
}
