//! Headless skirmish demo
//!
//! Two ship factions chase and ram each other inside a bounded world while
//! pickups heal whoever grabs them first. Everything spatial (collision
//! candidates, target selection, line of sight, camera culling) runs through
//! `sim_core`. Logs at info level by default; set `RUST_LOG=debug` for
//! per-tick detail.

mod app;
mod config;
mod world;

fn main() {
    sim_core::foundation::logging::init();

    let config = config::ScenarioConfig::load_or_default();
    if let Err(e) = config.validate() {
        eprintln!("Invalid scenario configuration: {}", e);
        std::process::exit(1);
    }

    let mut app = app::SkirmishApp::new(config);
    app.run();
}
