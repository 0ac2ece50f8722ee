//! Engine-wide constants
//!
//! This module contains all magic numbers used by the carousel geometry and
//! gesture classification, providing a single source of truth for constant
//! values. Distances are logical pixels, velocities logical pixels per second.

/// Card layout constants for Browse and Reorder geometry
pub mod layout {
    /// Width of a Browse-mode card in logical pixels
    pub const CARD_WIDTH: f32 = 300.0;

    /// Horizontal gap between Browse-mode cards
    pub const CARD_GAP: f32 = 16.0;

    /// Scale applied to every non-focused Browse card
    pub const UNFOCUSED_SCALE: f32 = 0.85;

    /// Opacity applied to every non-focused Browse card
    pub const UNFOCUSED_OPACITY: f32 = 0.7;

    /// Scale applied to every card in the Reorder row
    pub const REORDER_SCALE: f32 = 0.6;

    /// Scale applied to the card being actively dragged in Reorder mode
    pub const REORDER_DRAGGED_SCALE: f32 = 0.65;

    /// Horizontal gap between slots in the Reorder row
    pub const REORDER_GAP: f32 = 8.0;
}

/// Gesture classification constants
pub mod gesture {
    /// Minimum horizontal translation for a release to page (pixels)
    pub const DISTANCE_THRESHOLD: f32 = 25.0;

    /// Minimum horizontal velocity for a release to page (pixels/second)
    pub const VELOCITY_THRESHOLD: f32 = 300.0;

    /// Minimum horizontal displacement before a drag counts as paging at all
    pub const MIN_PAGE_DRAG: f32 = 8.0;

    /// A drag is horizontal when |dx| exceeds this fraction of |dy|
    pub const HORIZONTAL_BIAS: f32 = 0.55;

    /// Hold duration before a press becomes a long-press (milliseconds)
    pub const LONG_PRESS_DURATION_MS: u64 = 500;

    /// Peak excursion allowed during a long-press before it is cancelled
    pub const LONG_PRESS_TOLERANCE: f32 = 6.0;

    /// Movement past this distance turns a Reorder press into a card drag
    pub const DRAG_SLOP: f32 = 4.0;

    /// Trailing sample window used for velocity estimation (milliseconds)
    pub const VELOCITY_WINDOW_MS: u64 = 100;
}

/// Persisted layout storage constants
pub mod storage {
    /// Directory under the user config dir holding the layout file
    pub const APP_DIR: &str = "section-carousel";

    /// Layout file name
    pub const FILENAME: &str = "layout.json";
}
