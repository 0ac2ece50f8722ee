use serde::Serialize;
use std::ops::{Add, AddAssign, Sub};

/// 2D vector in logical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Opaque handle to the content a card renders.
///
/// The engine never inspects the token; the host maps it back to whatever
/// panel content it stands for (document lists, calendars, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentRef(u64);

impl ContentRef {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// One dashboard panel shown as a carousel card.
///
/// `id` is stable across sessions and is what the persisted order refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub content: ContentRef,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: ContentRef) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content,
        }
    }
}

/// Per-card geometry emitted every frame.
///
/// Consumed by an external renderer; the engine never paints anything.
/// Higher `z_order` renders on top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardGeometry {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub opacity: f32,
    pub z_order: u32,
    pub is_focused: bool,
    pub is_being_dragged: bool,
}
