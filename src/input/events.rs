//! Platform-neutral raw pointer events.
//!
//! Host integrations translate their native touch/stylus events into
//! [`RawEvent`] before handing them to the [`InputRouter`](super::InputRouter).

use serde::{Deserialize, Serialize};

/// Action classification reported by the platform for a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawAction {
    /// Contact started (pen or finger down)
    Down,
    /// Contact moved while down
    Move,
    /// Contact lifted
    Up,
    /// Gesture aborted by the platform
    Cancel,
    /// Pointer moved without contact
    HoverMove,
    /// Anything the platform reports that has no meaning here
    Other,
}

/// Kind of tool that produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolType {
    /// Active or passive stylus with a trustworthy pressure axis
    Stylus,
    /// Fingertip contact
    Finger,
    /// Mouse, eraser end or any tool the platform could not identify
    #[default]
    Unknown,
}

/// Auxiliary axes reported alongside the position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisValues {
    /// Tilt of the stylus away from the surface normal, in radians
    #[serde(default)]
    pub tilt: f32,
    /// Orientation of the stylus around the surface normal, in radians
    #[serde(default)]
    pub orientation: f32,
}

/// One raw pointer/motion event as delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Platform action classification
    pub action: RawAction,
    /// X coordinate in view pixels
    pub x: f32,
    /// Y coordinate in view pixels
    pub y: f32,
    /// Raw pressure as reported by the platform (unnormalized)
    #[serde(default)]
    pub pressure: f32,
    /// Tool that generated the event
    #[serde(default)]
    pub tool: ToolType,
    /// Auxiliary axis readings
    #[serde(default)]
    pub axes: AxisValues,
    /// Monotonic event time in milliseconds
    #[serde(default)]
    pub event_time: u64,
}

impl RawEvent {
    /// Creates an event with no auxiliary axes and a zero timestamp.
    pub fn new(action: RawAction, x: f32, y: f32, pressure: f32, tool: ToolType) -> Self {
        Self {
            action,
            x,
            y,
            pressure,
            tool,
            axes: AxisValues::default(),
            event_time: 0,
        }
    }

    /// Sets the event timestamp.
    pub fn at(mut self, event_time: u64) -> Self {
        self.event_time = event_time;
        self
    }

    /// Sets the tilt/orientation axes.
    pub fn with_axes(mut self, tilt: f32, orientation: f32) -> Self {
        self.axes = AxisValues { tilt, orientation };
        self
    }
}
