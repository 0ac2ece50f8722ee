#![forbid(unsafe_code)]

//! Headless carousel navigation & reorder engine for a dashboard of
//! swipeable section cards.
//!
//! The crate owns state, geometry, and persistence only: velocity-based
//! paging between cards, a long-press drag-to-reorder mode with live slot
//! prediction, and a durable section order. Rendering, animation easing, and
//! card content are the host's problem; every frame the host pulls target
//! geometry from [`CarouselController::frame`] and paints it however it
//! likes.

pub mod constants;
pub mod controller;
pub mod geometry;
pub mod gesture;
pub mod persistence;
pub mod registry;
pub mod section;
pub mod types;

pub use controller::{CarouselAction, CarouselController, Feedback, Mode};
pub use geometry::LayoutMetrics;
pub use gesture::{DragSample, DragState, GestureInterpreter, PageOutcome};
pub use persistence::{JsonLayoutStore, MemoryLayoutStore, OrderPersistence, PersistedLayout};
pub use registry::SectionRegistry;
pub use section::{SectionKind, default_sections};
pub use types::{CardGeometry, ContentRef, Section, Vec2};
