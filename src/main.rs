#![forbid(unsafe_code)]

//! carousel-sim: headless driver for the carousel engine.
//!
//! Feeds a scripted gesture sequence (swipe, long-press, reorder drag)
//! through the controller and prints the resulting per-frame geometry as
//! JSON lines, one array per labeled step. Useful for eyeballing geometry
//! changes without a renderer attached.

use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use section_carousel::{
    CarouselController, JsonLayoutStore, LayoutMetrics, MemoryLayoutStore, OrderPersistence, Vec2,
    default_sections,
};

#[derive(Parser, Debug)]
#[command(name = "carousel-sim", about = "Headless carousel engine driver")]
struct Args {
    /// Container width in logical pixels
    #[arg(long, default_value_t = 1024.0)]
    width: f32,

    /// Container height in logical pixels
    #[arg(long, default_value_t = 768.0)]
    height: f32,

    /// Persist the layout to the user config directory instead of memory
    #[arg(long)]
    persist: bool,
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn print_frame<S: OrderPersistence>(
    label: &str,
    controller: &CarouselController<S>,
) -> Result<()> {
    println!("{label}: {}", serde_json::to_string(&controller.frame())?);
    Ok(())
}

fn run<S: OrderPersistence>(mut controller: CarouselController<S>) -> Result<()> {
    let feedback = controller.subscribe();
    let center = Vec2::new(
        controller.metrics().container_width / 2.0,
        controller.metrics().container_height / 2.0,
    );

    print_frame("startup", &controller)?;

    // Swipe left: page to the next card.
    let focused = controller.selected_index();
    controller.pointer_down(center, Some(focused), ms(0));
    controller.pointer_moved(center - Vec2::new(40.0, 0.0), ms(80));
    controller.pointer_up(center - Vec2::new(80.0, 0.0), ms(160));
    print_frame("after-swipe", &controller)?;

    // Long-press the focused card to enter reorder mode.
    let focused = controller.selected_index();
    controller.pointer_down(center, Some(focused), ms(1000));
    controller.tick(ms(1600));
    controller.pointer_up(center, ms(1650));
    print_frame("reorder", &controller)?;

    // Drag the first card two slots to the right and drop it.
    let pitch = controller.metrics().slot_pitch();
    controller.pointer_down(center, Some(0), ms(2000));
    controller.pointer_moved(center + Vec2::new(6.0, 0.0), ms(2050));
    controller.pointer_moved(center + Vec2::new(2.0 * pitch, 0.0), ms(2400));
    print_frame("reorder-drag", &controller)?;
    controller.pointer_up(center + Vec2::new(2.0 * pitch, 0.0), ms(2450));
    print_frame("after-commit", &controller)?;

    // Tap the background to return to Browse.
    controller.pointer_down(Vec2::new(10.0, 10.0), None, ms(3000));
    controller.pointer_up(Vec2::new(10.0, 10.0), ms(3080));
    print_frame("back-to-browse", &controller)?;

    let order: Vec<String> = controller
        .sections()
        .iter()
        .map(|s| s.id.clone())
        .collect();
    info!(order = ?order, focused = controller.selected_index(), "Final session state");
    for event in feedback.try_iter() {
        info!(event = ?event, "Feedback fired during script");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let metrics = LayoutMetrics::new(args.width, args.height);

    if args.persist {
        let store = JsonLayoutStore::new();
        info!(path = %store.path().display(), "Persisting layout to disk");
        run(CarouselController::new(default_sections(), store, metrics))?;
    } else {
        run(CarouselController::new(
            default_sections(),
            MemoryLayoutStore::new(),
            metrics,
        ))?;
    }
    Ok(())
}
