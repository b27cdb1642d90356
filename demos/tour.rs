//! Two linked scenes built in code - demonstrates hotspot navigation.
//!
//! Usage: `cargo run --example tour -- hall.jpg garden.jpg`

use panorama::scene::{Hotspot, InitialView, Scene, SceneGraph, TransitionController};
use panorama::{AppConfig, PanoramaSession, run_with_config};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (Some(hall), Some(garden)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: tour <hall image> <garden image>");
    };

    let scenes = vec![
        Scene::new(hall).with_id("hall").with_hotspot(Hotspot {
            id: Some("to-garden".into()),
            yaw: 30.0,
            pitch: -5.0,
            label: Some("Garden".into()),
            target_scene_index: 1,
        }),
        Scene::new(garden)
            .with_id("garden")
            .with_initial_view(InitialView {
                yaw: Some(180.0),
                pitch: Some(0.0),
                fov: Some(80.0),
            })
            .with_hotspot(Hotspot {
                id: Some("to-hall".into()),
                yaw: 0.0,
                pitch: 0.0,
                label: Some("Back to the hall".into()),
                target_scene_index: 0,
            }),
    ];

    let mut session = PanoramaSession::new(
        SceneGraph::new(scenes, 0)?,
        TransitionController::default(),
    );
    session.on_scene_change(|index| log::info!("tour moved to scene {}", index));

    run_with_config(AppConfig::new().title("Tour").size(1600, 900), session)?;
    Ok(())
}
