use std::path::Path;

use anyhow::Context;
use panorama::{AppConfig, PanoramaSession, SessionConfig, run_with_config};

const USAGE: &str = "usage: panorama <config.json | image>";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let arg = std::env::args().nth(1).context(USAGE)?;
    let path = Path::new(&arg);

    let config = if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        SessionConfig::from_file(path)?
    } else {
        SessionConfig::single(arg.clone())
    };

    let session = PanoramaSession::from_config(config)?;
    session_summary(&session);

    let title = path
        .file_stem()
        .map(|stem| format!("panorama - {}", stem.to_string_lossy()))
        .unwrap_or_else(|| "panorama".to_string());

    run_with_config(AppConfig::new().title(title), session)?;
    Ok(())
}

fn session_summary(session: &PanoramaSession) {
    let graph = session.graph();
    log::info!(
        "{} scene(s), starting at '{}'",
        graph.len(),
        session.current_scene().display_name()
    );
}
