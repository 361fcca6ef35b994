//! Lazy tree demo entry point

use zoon::*;

mod app;
mod config;
mod demo_fs;
mod directory_tree;
mod logging;

pub fn main() {
    let config = match config::DemoConfig::load() {
        Ok(config) => config,
        Err(error) => {
            zoon::eprintln!("invalid tree.toml, using defaults: {error:#}");
            config::DemoConfig::default()
        }
    };
    logging::init(config.log_level());

    match app::LazyTreeApp::new(config) {
        Ok(app) => {
            let root_element = app.root();
            start_app("app", move || root_element);
        }
        Err(error) => log::error!("cannot build the tree: {error:#}"),
    }
}
