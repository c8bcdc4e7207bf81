// SPDX-License-Identifier: GPL-3.0-only

//! Click state shared between the pointer-event handler and the frame loop
//!
//! The viewer owns one [`ClickState`]; its input handler feeds pointer
//! events in and the measurement step reads the current position back out.

use crate::angle::PixelCoordinate;
use crate::constants::sampling::INITIAL_CLICK;

/// Pointer button that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Pointer event in image pixel coordinates (x = column, y = row)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down { x: u32, y: u32, button: PointerButton },
    Up { x: u32, y: u32, button: PointerButton },
    Moved { x: u32, y: u32 },
}

/// Last clicked pixel, always inside the current image bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickState {
    position: PixelCoordinate,
    width: u32,
    height: u32,
    clicks: u64,
}

impl ClickState {
    /// Start at the initial click position, clamped to a `width` x `height` image
    pub fn new(width: u32, height: u32) -> Self {
        let (row, col) = INITIAL_CLICK;
        Self {
            position: PixelCoordinate::new(row, col).clamped(width, height),
            width,
            height,
            clicks: 0,
        }
    }

    pub fn position(&self) -> PixelCoordinate {
        self.position
    }

    /// Number of primary clicks handled so far
    pub fn click_count(&self) -> u64 {
        self.clicks
    }

    /// Feed a pointer event; returns true when the position changed
    ///
    /// Only primary button presses move the click point.
    pub fn handle(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down {
                x,
                y,
                button: PointerButton::Primary,
            } => {
                self.clicks += 1;
                let next = PixelCoordinate::new(y, x).clamped(self.width, self.height);
                let changed = next != self.position;
                self.position = next;
                changed
            }
            _ => false,
        }
    }

    /// Adopt new image bounds (e.g. after a source change), re-clamping the position
    pub fn set_bounds(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.position = self.position.clamped(width, height);
    }
}
