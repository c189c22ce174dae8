//! Octaflake — chaos-game octahedron fractal.
//!
//! Usage:
//! ```text
//! cargo run --release             # prompts for 1, 2 or 3
//! RUST_LOG=octaflake=debug cargo run --release
//! ```

use std::io::{self, BufRead, Write};

use octaflake::app::{self, Outcome};
use octaflake::render::SoftwareRenderer;
use octaflake::Config;

const MENU: &str = "
Select an option:
1 - Generate new fractal
2 - Load from file
3 - Generate GIF from file

Your choice: ";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Default: WARN for everything, INFO for octaflake.
    // Override with RUST_LOG env var (e.g. RUST_LOG=octaflake=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("octaflake=info".parse().unwrap_or_default());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::default();

    print!("{MENU}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    let mut sink = SoftwareRenderer::new(
        config.render,
        config.preview_pose(),
        config.preview_path(),
        config.animation_path(),
    )?;

    match app::run(&config, &input, &mut sink)? {
        Outcome::Generated { path, points } => {
            println!("\x1b[94mData saved to {} ({points} points)\x1b[0m", path.display());
        }
        Outcome::Displayed { points } => {
            println!(
                "\x1b[92mPreview of {points} points saved as '{}'\x1b[0m",
                config.preview_path().display()
            );
        }
        Outcome::Animated { frames } => {
            println!(
                "\x1b[92mGIF created and saved as '{}' ({frames} frames)\x1b[0m",
                config.animation_path().display()
            );
        }
        Outcome::MissingSnapshot(path) => {
            println!("No fractal data at '{}'. Generate one first (option 1).", path.display());
        }
        Outcome::InvalidChoice => println!("Invalid choice. Exiting."),
    }
    Ok(())
}
