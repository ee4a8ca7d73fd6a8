//! Snap alignment for dragged items.
//!
//! Each axis is solved independently. On an axis the moving box's three
//! reference lines (start, center, end) are compared against the same three
//! lines of every other visible item, in stored order, and the first pair
//! within tolerance wins. Sibling order is the tie-break: there is no search
//! for the closest candidate. When no sibling matches, the canvas center
//! line is tried last.

use crate::model::{CanvasConfig, Item, SnapLine};

/// Default snapping distance in canvas pixels.
pub const DEFAULT_SNAP_TOLERANCE: f64 = 5.0;

/// Snapped position and the guides to draw for it.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    pub x: f64,
    pub y: f64,
    pub guides: Vec<SnapLine>,
}

impl SnapResult {
    fn passthrough(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            guides: Vec::new(),
        }
    }

    pub fn is_snapped(&self) -> bool {
        !self.guides.is_empty()
    }
}

/// One axis of a box: where it starts and how long it is.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: f64,
    extent: f64,
}

impl Span {
    /// start, center, end
    fn lines(&self) -> [f64; 3] {
        [
            self.start,
            self.start + self.extent / 2.0,
            self.start + self.extent,
        ]
    }
}

/// Axis match: the new start coordinate and where its guide goes.
#[derive(Debug, Clone, Copy)]
struct AxisSnap {
    start: f64,
    guide: f64,
}

fn snap_axis(
    moving: Span,
    siblings: impl Iterator<Item = Span>,
    canvas_extent: f64,
    tolerance: f64,
) -> Option<AxisSnap> {
    let moving_lines = moving.lines();

    for sibling in siblings {
        let sibling_lines = sibling.lines();
        for moving_line in moving_lines {
            for sibling_line in sibling_lines {
                if (moving_line - sibling_line).abs() <= tolerance {
                    return Some(AxisSnap {
                        start: moving.start + (sibling_line - moving_line),
                        guide: sibling_line,
                    });
                }
            }
        }
    }

    let canvas_center = canvas_extent / 2.0;
    let moving_center = moving_lines[1];
    if (moving_center - canvas_center).abs() <= tolerance {
        return Some(AxisSnap {
            start: canvas_center - moving.extent / 2.0,
            guide: canvas_center,
        });
    }

    None
}

/// Computes where `moving_id` lands when dropped at (`proposed_x`, `proposed_y`).
///
/// Hidden items and the moving item itself never act as snap targets. An
/// unknown `moving_id` passes the proposed position through unchanged.
pub fn snap(
    moving_id: &str,
    proposed_x: f64,
    proposed_y: f64,
    items: &[Item],
    canvas: &CanvasConfig,
    tolerance: f64,
) -> SnapResult {
    let Some(moving) = items.iter().find(|item| item.id == moving_id) else {
        return SnapResult::passthrough(proposed_x, proposed_y);
    };

    let siblings = || {
        items
            .iter()
            .filter(move |item| item.visible && item.id != moving_id)
    };

    let mut result = SnapResult::passthrough(proposed_x, proposed_y);

    let horizontal = snap_axis(
        Span {
            start: proposed_x,
            extent: moving.style.width,
        },
        siblings().map(|item| Span {
            start: item.style.x,
            extent: item.style.width,
        }),
        canvas.width,
        tolerance,
    );
    if let Some(hit) = horizontal {
        result.x = hit.start;
        result.guides.push(SnapLine::vertical(hit.guide));
    }

    let vertical = snap_axis(
        Span {
            start: proposed_y,
            extent: moving.style.height,
        },
        siblings().map(|item| Span {
            start: item.style.y,
            extent: item.style.height,
        }),
        canvas.height,
        tolerance,
    );
    if let Some(hit) = vertical {
        result.y = hit.start;
        result.guides.push(SnapLine::horizontal(hit.guide));
    }

    result
}
