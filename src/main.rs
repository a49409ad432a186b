mod app;
mod catalog;
mod config;
mod mpris;
mod playback;
mod runtime;
mod ui;

fn main() -> anyhow::Result<()> {
    runtime::run()
}
