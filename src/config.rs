//! Session configuration loaded from JSON.
//!
//! Two shapes are accepted:
//!
//! ```json
//! { "image": "pano.jpg", "fieldOfView": 90 }
//! ```
//!
//! ```json
//! {
//!   "scenes": [
//!     { "image": "hall.jpg", "hotspots": [{ "yaw": 40, "pitch": 0, "target": 1 }] },
//!     { "image": "garden.jpg", "initialView": { "yaw": -90 } }
//!   ],
//!   "initialSceneIndex": 0
//! }
//! ```
//!
//! A non-empty `scenes` list wins. Otherwise `image` is shown on its own, so a
//! file carrying both an empty `scenes` list and an `image` opens the image.
//! Relative image paths are resolved against the configuration file's directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PanoramaError, Result};
use crate::orientation::DEFAULT_FOV;
use crate::scene::{Scene, SceneGraph};

fn default_fov() -> f32 {
    DEFAULT_FOV
}

/// Every key either session shape may carry, before the mode is chosen.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSessionConfig {
    scenes: Option<Vec<Scene>>,
    #[serde(default)]
    initial_scene_index: i64,
    image: Option<String>,
    #[serde(default = "default_fov")]
    field_of_view: f32,
}

/// A viewer session: either one bare image or a graph of linked scenes.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(from = "RawSessionConfig")]
pub enum SessionConfig {
    Multi {
        scenes: Vec<Scene>,
        initial_scene_index: i64,
    },
    Single {
        image: String,
        field_of_view: f32,
    },
}

impl From<RawSessionConfig> for SessionConfig {
    fn from(raw: RawSessionConfig) -> Self {
        match (raw.scenes, raw.image) {
            (Some(scenes), _) if !scenes.is_empty() => SessionConfig::Multi {
                scenes,
                initial_scene_index: raw.initial_scene_index,
            },
            (_, Some(image)) => SessionConfig::Single {
                image,
                field_of_view: raw.field_of_view,
            },
            // Nothing to show; `into_scene_graph` reports it.
            (scenes, None) => SessionConfig::Multi {
                scenes: scenes.unwrap_or_default(),
                initial_scene_index: raw.initial_scene_index,
            },
        }
    }
}

impl SessionConfig {
    /// A single-image session showing `image` at the default field of view.
    pub fn single(image: impl Into<String>) -> Self {
        SessionConfig::Single {
            image: image.into(),
            field_of_view: DEFAULT_FOV,
        }
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a configuration file, resolving image paths relative to it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| PanoramaError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.with_base_dir(base))
    }

    /// Prefix every relative image path with `base`.
    pub fn with_base_dir(mut self, base: &Path) -> Self {
        let resolve = |image: &mut String| {
            let candidate = PathBuf::from(image.as_str());
            if candidate.is_relative() && !base.as_os_str().is_empty() {
                *image = base.join(candidate).to_string_lossy().into_owned();
            }
        };
        match &mut self {
            SessionConfig::Multi { scenes, .. } => {
                scenes.iter_mut().for_each(|scene| resolve(&mut scene.image));
            }
            SessionConfig::Single { image, .. } => resolve(image),
        }
        self
    }

    /// Build the scene graph this configuration describes.
    pub fn into_scene_graph(self) -> Result<SceneGraph> {
        match self {
            SessionConfig::Multi {
                scenes,
                initial_scene_index,
            } => SceneGraph::new(scenes, initial_scene_index),
            SessionConfig::Single {
                image,
                field_of_view,
            } => Ok(SceneGraph::single(image, field_of_view)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_image_with_default_fov() {
        let config = SessionConfig::from_json(r#"{ "image": "pano.jpg" }"#).unwrap();
        assert_eq!(config, SessionConfig::single("pano.jpg"));

        let graph = config.into_scene_graph().unwrap();
        assert!(!graph.is_navigable());
    }

    #[test]
    fn parses_multi_scene_with_target_alias() {
        let json = r#"{
            "scenes": [
                {
                    "id": "hall",
                    "image": "hall.jpg",
                    "initialView": { "yaw": 45, "fov": 60 },
                    "hotspots": [
                        { "yaw": 10, "pitch": -5, "label": "Garden", "targetSceneIndex": 1 },
                        { "yaw": 200, "pitch": 0, "target": 1 }
                    ]
                },
                { "image": "garden.jpg" }
            ],
            "initialSceneIndex": 1
        }"#;
        let graph = SessionConfig::from_json(json)
            .unwrap()
            .into_scene_graph()
            .unwrap();

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.current_index(), 1);
        let hall = graph.scene(0).unwrap();
        assert_eq!(hall.display_name(), "hall");
        assert_eq!(hall.initial_view.unwrap().yaw, Some(45.0));
        assert_eq!(hall.initial_view.unwrap().pitch, None);
        assert_eq!(hall.hotspots[0].label.as_deref(), Some("Garden"));
        assert_eq!(hall.hotspots[1].target_scene_index, 1);
    }

    #[test]
    fn empty_scene_list_is_a_config_error() {
        let config = SessionConfig::from_json(r#"{ "scenes": [] }"#).unwrap();
        assert!(matches!(
            config.into_scene_graph(),
            Err(PanoramaError::EmptySceneList)
        ));
    }

    #[test]
    fn empty_scene_list_falls_back_to_image() {
        let json = r#"{ "scenes": [], "image": "pano.jpg", "fieldOfView": 60 }"#;
        let config = SessionConfig::from_json(json).unwrap();
        assert_eq!(
            config,
            SessionConfig::Single {
                image: "pano.jpg".to_string(),
                field_of_view: 60.0,
            }
        );

        let graph = config.into_scene_graph().unwrap();
        assert_eq!(graph.current_scene().image, "pano.jpg");
        assert!(!graph.is_navigable());
    }

    #[test]
    fn scenes_take_precedence_over_image() {
        let json = r#"{ "scenes": [{ "image": "hall.jpg" }], "image": "pano.jpg" }"#;
        let graph = SessionConfig::from_json(json)
            .unwrap()
            .into_scene_graph()
            .unwrap();
        assert_eq!(graph.current_scene().image, "hall.jpg");
    }

    #[test]
    fn config_without_scenes_or_image_is_an_error() {
        let config = SessionConfig::from_json("{}").unwrap();
        assert!(matches!(
            config.into_scene_graph(),
            Err(PanoramaError::EmptySceneList)
        ));
    }

    #[test]
    fn bad_scene_field_keeps_its_message() {
        let json = r#"{ "scenes": [{ "image": "hall.jpg", "hotspots": [{ "yaw": "north", "pitch": 0, "target": 1 }] }] }"#;
        let err = SessionConfig::from_json(json).unwrap_err();
        assert!(matches!(err, PanoramaError::ConfigParse(_)));
        let message = err.to_string();
        assert!(message.contains("invalid type"), "{message}");
        assert!(!message.contains("did not match any variant"), "{message}");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            SessionConfig::from_json(r#"{ "scenes": "#),
            Err(PanoramaError::ConfigParse(_))
        ));
    }

    #[test]
    fn relative_images_resolve_against_base_dir() {
        let config = SessionConfig::single("pano.jpg").with_base_dir(Path::new("tours"));
        let SessionConfig::Single { image, .. } = config else {
            panic!("expected single-image config");
        };
        assert_eq!(PathBuf::from(image), Path::new("tours").join("pano.jpg"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SessionConfig::from_file("does/not/exist.json").unwrap_err();
        assert!(matches!(err, PanoramaError::ConfigRead { .. }));
    }
}
