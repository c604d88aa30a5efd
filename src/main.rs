//! Point d'entrée du shell ewk-shim.
//!
//! Usage :
//!   ewk-shim [--no-ime] [--input-type=TYPE] [--write-config]
//!
//! Exemples :
//!   cargo run                              → champ texte, IME de la plateforme
//!   cargo run -- --input-type=password     → champ mot de passe
//!   cargo run -- --no-ime                  → clavier matériel uniquement
//!   cargo run -- --write-config            → écrit la config effective et quitte
//!
//! Les logs se règlent avec `RUST_LOG` (ex. `RUST_LOG=ewk_shim=debug`).

use std::env;
use std::error::Error;

use ewk_shim::config::Config;
use ewk_shim::shell::App;
use winit::event_loop::EventLoop;

fn main() -> Result<(), Box<dyn Error>> {
    // ── 1. Logging / Tracing ───────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // ── 2. Configuration + flags CLI ───────────────────────────────────
    let args: Vec<String> = env::args().skip(1).collect();
    let ime_enabled = !args.iter().any(|arg| arg == "--no-ime");

    let mut config = Config::load();
    if let Some(input_type) = args
        .iter()
        .find_map(|arg| arg.strip_prefix("--input-type="))
    {
        config.general.focused_input_type = input_type.to_string();
    }

    if args.iter().any(|arg| arg == "--write-config") {
        let path = config.save()?;
        println!("{}", path.display());
        return Ok(());
    }

    // ── 3. Boucle d'événements Winit ───────────────────────────────────
    let event_loop = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config, ime_enabled);

    Ok(event_loop.run_app(&mut app)?)
}
