//! Difficulty parameters and their cycling rules
//!
//! Size, speed and shape each step through a fixed cycle when the matching
//! control is pressed. Targets copy the current values at spawn time, so a
//! change only affects targets spawned afterwards.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// RGB color, rendered as `#rrggbb` for the view layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const RED: Color = Color(0xff4444);
    pub const DARK_RED: Color = Color(0xcc2222);
    pub const GREEN: Color = Color(0x44ff44);
    pub const DARK_GREEN: Color = Color(0x22cc22);
    pub const BLUE: Color = Color(0x4444ff);
    pub const YELLOW: Color = Color(0xffff44);

    pub fn hex(&self) -> String {
        format!("#{:06x}", self.0 & 0xff_ffff)
    }
}

/// Target mesh shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TargetShape {
    #[default]
    Cylinder,
    Box,
    Sphere,
    Cone,
}

impl TargetShape {
    /// Cycle order
    pub const ALL: [TargetShape; 4] = [
        TargetShape::Cylinder,
        TargetShape::Box,
        TargetShape::Sphere,
        TargetShape::Cone,
    ];

    pub fn next(self) -> Self {
        match self {
            TargetShape::Cylinder => TargetShape::Box,
            TargetShape::Box => TargetShape::Sphere,
            TargetShape::Sphere => TargetShape::Cone,
            TargetShape::Cone => TargetShape::Cylinder,
        }
    }

    /// Fixed color paired with each shape
    pub fn color(self) -> Color {
        match self {
            TargetShape::Cylinder => Color::RED,
            TargetShape::Box => Color::GREEN,
            TargetShape::Sphere => Color::BLUE,
            TargetShape::Cone => Color::YELLOW,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetShape::Cylinder => "cylinder",
            TargetShape::Box => "box",
            TargetShape::Sphere => "sphere",
            TargetShape::Cone => "cone",
        }
    }

    /// Control panel label
    pub fn label(&self) -> &'static str {
        match self {
            TargetShape::Cylinder => "CYLINDER",
            TargetShape::Box => "BOX",
            TargetShape::Sphere => "SPHERE",
            TargetShape::Cone => "CONE",
        }
    }
}

/// Mesh dimensions for a target, derived from shape and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TargetGeometry {
    Cylinder { radius: f32, height: f32 },
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32 },
    Cone { radius_bottom: f32, radius_top: f32, height: f32 },
}

impl TargetGeometry {
    pub fn new(shape: TargetShape, size: f32) -> Self {
        match shape {
            TargetShape::Cylinder => TargetGeometry::Cylinder {
                radius: size,
                height: CYLINDER_HEIGHT,
            },
            TargetShape::Box => TargetGeometry::Box {
                width: size,
                height: size,
                depth: size,
            },
            TargetShape::Sphere => TargetGeometry::Sphere { radius: size * 0.8 },
            TargetShape::Cone => TargetGeometry::Cone {
                radius_bottom: size,
                radius_top: 0.0,
                height: size * 1.5,
            },
        }
    }
}

/// Snapshot of size/speed/shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Target scale (0.5 - 1.5)
    pub size: f32,
    /// Duration of each rise and fall leg (ms)
    pub speed_ms: u32,
    pub shape: TargetShape,
}

impl Default for DifficultyParams {
    fn default() -> Self {
        Self {
            size: DEFAULT_TARGET_SIZE,
            speed_ms: DEFAULT_TARGET_SPEED_MS,
            shape: TargetShape::Cylinder,
        }
    }
}

impl DifficultyParams {
    pub fn color(&self) -> Color {
        self.shape.color()
    }

    pub fn geometry(&self) -> TargetGeometry {
        TargetGeometry::new(self.shape, self.size)
    }
}

/// 0.5 → 0.75 → 1.0 → 1.25 → 1.5 → 0.5
pub fn next_size(size: f32) -> f32 {
    if size >= MAX_TARGET_SIZE {
        MIN_TARGET_SIZE
    } else {
        size + TARGET_SIZE_STEP
    }
}

/// 2000 → 1500 → 1000 → 2500 → 2000
pub fn next_speed(speed_ms: u32) -> u32 {
    if speed_ms > FASTEST_TARGET_SPEED_MS {
        speed_ms - TARGET_SPEED_STEP_MS
    } else {
        SLOWEST_TARGET_SPEED_MS
    }
}

pub fn size_control_color(size: f32) -> Color {
    if size > 1.0 { Color::DARK_RED } else { Color::RED }
}

pub fn speed_control_color(speed_ms: u32) -> Color {
    if speed_ms < DEFAULT_TARGET_SPEED_MS {
        Color::DARK_GREEN
    } else {
        Color::GREEN
    }
}

/// Control panel buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    Size,
    Speed,
    Shape,
}

/// Whether the control panel works outside a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlPolicy {
    /// Controls are ignored while no round is running
    #[default]
    ActiveOnly,
    /// Controls work at any time, including on the end screen
    Always,
}

impl ControlPolicy {
    pub fn allows(&self, round_active: bool) -> bool {
        match self {
            ControlPolicy::ActiveOnly => round_active,
            ControlPolicy::Always => true,
        }
    }
}

/// Result of a cycling operation, for updating the pressed control
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlFeedback {
    pub control: Control,
    pub color: Color,
    /// New button text, when the control shows its value
    pub label: Option<&'static str>,
}

/// Current difficulty plus the gate on changing it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DifficultyStore {
    params: DifficultyParams,
    policy: ControlPolicy,
}

impl DifficultyStore {
    pub fn new(policy: ControlPolicy) -> Self {
        Self {
            params: DifficultyParams::default(),
            policy,
        }
    }

    /// Values a target spawned now would get
    pub fn snapshot(&self) -> DifficultyParams {
        self.params
    }

    pub fn cycle_size(&mut self, round_active: bool) -> Option<ControlFeedback> {
        if !self.policy.allows(round_active) {
            return None;
        }
        self.params.size = next_size(self.params.size);
        log::info!("Target size changed to: {}", self.params.size);
        Some(ControlFeedback {
            control: Control::Size,
            color: size_control_color(self.params.size),
            label: None,
        })
    }

    pub fn cycle_speed(&mut self, round_active: bool) -> Option<ControlFeedback> {
        if !self.policy.allows(round_active) {
            return None;
        }
        self.params.speed_ms = next_speed(self.params.speed_ms);
        log::info!("Target speed changed to: {}ms", self.params.speed_ms);
        Some(ControlFeedback {
            control: Control::Speed,
            color: speed_control_color(self.params.speed_ms),
            label: None,
        })
    }

    pub fn cycle_shape(&mut self, round_active: bool) -> Option<ControlFeedback> {
        if !self.policy.allows(round_active) {
            return None;
        }
        self.params.shape = self.params.shape.next();
        log::info!("Target shape changed to: {}", self.params.shape.as_str());
        Some(ControlFeedback {
            control: Control::Shape,
            color: self.params.shape.color(),
            label: Some(self.params.shape.label()),
        })
    }
}
