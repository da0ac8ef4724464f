/// Example: Open a scene file in the terminal editor
///
/// Usage: cargo run --example open_scene -- path/to/scene.csv

use std::env;
use std::fs;
use std::io;
use axograph_core::{Scene, Settings};
use axograph_terminal::TerminalApp;

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let settings = Settings::default();

    if args.len() < 2 {
        eprintln!("Usage: {} <scene.csv>", args[0]);
        eprintln!("\nNo scene provided, starting with a single point...");
        let mut app = TerminalApp::new(&settings)?;
        return app.run();
    }

    let path = &args[1];
    let text = fs::read_to_string(path)
        .map_err(|e| io::Error::new(io::ErrorKind::NotFound, format!("Failed to read scene: {}", e)))?;
    let scene = Scene::from_csv(&text)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Failed to parse scene: {}", e)))?;

    println!(
        "Loaded {} points and {} connections",
        scene.positions.len(),
        scene.connections.len()
    );

    let mut app = TerminalApp::new(&settings)?;
    app.state_mut().apply_scene(&scene);
    app.run()
}
