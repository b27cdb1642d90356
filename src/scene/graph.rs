//! Scene data and the directed graph of scenes connected by hotspots.

use serde::Deserialize;

use crate::error::{PanoramaError, Result};
use crate::orientation::ViewAngles;

/// Optional starting orientation for a scene, in degrees.
///
/// Each field is independent: a missing field keeps whatever the camera was
/// doing when the scene became active.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
pub struct InitialView {
    #[serde(default)]
    pub yaw: Option<f32>,
    #[serde(default)]
    pub pitch: Option<f32>,
    #[serde(default)]
    pub fov: Option<f32>,
}

impl InitialView {
    /// Fill in missing fields from `current`.
    pub fn resolve(&self, current: ViewAngles) -> ViewAngles {
        ViewAngles {
            yaw: self.yaw.unwrap_or(current.yaw),
            pitch: self.pitch.unwrap_or(current.pitch),
            fov: self.fov.unwrap_or(current.fov),
        }
    }
}

/// An interactive marker on a scene's sphere that leads to another scene.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    /// Opaque label. Not required to be unique.
    #[serde(default)]
    pub id: Option<String>,
    /// Horizontal position on the sphere in degrees.
    pub yaw: f32,
    /// Vertical position on the sphere in degrees.
    pub pitch: f32,
    #[serde(default)]
    pub label: Option<String>,
    /// Index of the destination scene. Not bounds-checked until activation.
    #[serde(alias = "target")]
    pub target_scene_index: i64,
}

/// One panoramic scene.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(default)]
    pub id: Option<String>,
    /// Path to the equirectangular source image.
    pub image: String,
    #[serde(default)]
    pub initial_view: Option<InitialView>,
    #[serde(default)]
    pub hotspots: Vec<Hotspot>,
}

impl Scene {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            id: None,
            image: image.into(),
            initial_view: None,
            hotspots: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_initial_view(mut self, view: InitialView) -> Self {
        self.initial_view = Some(view);
        self
    }

    pub fn with_hotspot(mut self, hotspot: Hotspot) -> Self {
        self.hotspots.push(hotspot);
        self
    }

    /// Human-readable name for logs.
    pub fn display_name(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.image)
    }
}

/// A hotspot edge whose target lies outside the scene list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DanglingEdge {
    pub scene: usize,
    pub hotspot: usize,
    pub target: i64,
}

/// The ordered scene list plus the index of the scene on screen.
///
/// Edges are stored as plain indices on each hotspot, so cycles of
/// reachability never become cycles of ownership. The current index is
/// always in range.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    scenes: Vec<Scene>,
    current: usize,
    navigable: bool,
}

impl SceneGraph {
    /// Build a multi-scene graph. `initial_index` is clamped into range.
    ///
    /// Out-of-range hotspot targets are logged here and clamped when activated.
    pub fn new(scenes: Vec<Scene>, initial_index: i64) -> Result<Self> {
        if scenes.is_empty() {
            return Err(PanoramaError::EmptySceneList);
        }

        let mut graph = Self {
            scenes,
            current: 0,
            navigable: true,
        };
        graph.current = graph.clamp_index(initial_index);
        if graph.current as i64 != initial_index {
            log::warn!(
                "[scene] initial scene index {} out of range, using {}",
                initial_index,
                graph.current
            );
        }

        for edge in graph.dangling_edges() {
            log::warn!(
                "[scene] hotspot {} of scene '{}' targets scene {} (only {} scenes); it will be clamped",
                edge.hotspot,
                graph.scenes[edge.scene].display_name(),
                edge.target,
                graph.scenes.len()
            );
        }

        Ok(graph)
    }

    /// Build a single-image graph: one scene, no hotspots, no switching.
    pub fn single(image: impl Into<String>, fov: f32) -> Self {
        let scene = Scene::new(image).with_initial_view(InitialView {
            fov: Some(fov),
            ..Default::default()
        });
        Self {
            scenes: vec![scene],
            current: 0,
            navigable: false,
        }
    }

    fn clamp_index(&self, index: i64) -> usize {
        index.clamp(0, self.scenes.len() as i64 - 1) as usize
    }

    /// The scene that should be visible now.
    pub fn current_scene(&self) -> &Scene {
        &self.scenes[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Make `target` the current scene, clamping it into range first.
    ///
    /// Returns the index actually committed.
    pub fn activate(&mut self, target: i64) -> usize {
        self.current = self.clamp_index(target);
        self.current
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn scene(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// False in single-image mode, where hotspot activation does nothing.
    pub fn is_navigable(&self) -> bool {
        self.navigable
    }

    /// Clamped destination indices of the hotspots in scene `index`.
    pub fn targets_of(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.scenes
            .get(index)
            .into_iter()
            .flat_map(|scene| scene.hotspots.iter())
            .map(|hotspot| self.clamp_index(hotspot.target_scene_index))
    }

    /// All hotspot edges pointing outside the scene list.
    pub fn dangling_edges(&self) -> Vec<DanglingEdge> {
        let len = self.scenes.len() as i64;
        self.scenes
            .iter()
            .enumerate()
            .flat_map(|(scene_idx, scene)| {
                scene
                    .hotspots
                    .iter()
                    .enumerate()
                    .filter(move |(_, h)| h.target_scene_index < 0 || h.target_scene_index >= len)
                    .map(move |(hotspot_idx, h)| DanglingEdge {
                        scene: scene_idx,
                        hotspot: hotspot_idx,
                        target: h.target_scene_index,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotspot(target: i64) -> Hotspot {
        Hotspot {
            id: None,
            yaw: 0.0,
            pitch: 0.0,
            label: None,
            target_scene_index: target,
        }
    }

    fn three_scenes() -> Vec<Scene> {
        vec![
            Scene::new("a.jpg").with_hotspot(hotspot(1)).with_hotspot(hotspot(2)),
            Scene::new("b.jpg").with_hotspot(hotspot(0)),
            Scene::new("c.jpg").with_hotspot(hotspot(0)).with_hotspot(hotspot(0)),
        ]
    }

    #[test]
    fn empty_scene_list_is_rejected() {
        assert!(matches!(
            SceneGraph::new(Vec::new(), 0),
            Err(PanoramaError::EmptySceneList)
        ));
    }

    #[test]
    fn initial_index_is_clamped() {
        let graph = SceneGraph::new(three_scenes(), -4).unwrap();
        assert_eq!(graph.current_index(), 0);

        let graph = SceneGraph::new(three_scenes(), 99).unwrap();
        assert_eq!(graph.current_index(), 2);
        assert_eq!(graph.current_scene().image, "c.jpg");
    }

    #[test]
    fn activate_clamps() {
        let mut graph = SceneGraph::new(three_scenes(), 0).unwrap();
        assert_eq!(graph.activate(1), 1);
        assert_eq!(graph.activate(7), 2);
        assert_eq!(graph.activate(-1), 0);
    }

    #[test]
    fn adjacency_allows_cycles_and_parallel_edges() {
        let graph = SceneGraph::new(three_scenes(), 0).unwrap();
        assert_eq!(graph.targets_of(0).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(graph.targets_of(1).collect::<Vec<_>>(), vec![0]);
        assert_eq!(graph.targets_of(2).collect::<Vec<_>>(), vec![0, 0]);
        assert_eq!(graph.targets_of(9).count(), 0);
    }

    #[test]
    fn dangling_edges_are_reported() {
        let scenes = vec![
            Scene::new("a.jpg").with_hotspot(hotspot(5)),
            Scene::new("b.jpg").with_hotspot(hotspot(-1)).with_hotspot(hotspot(0)),
        ];
        let graph = SceneGraph::new(scenes, 0).unwrap();
        assert_eq!(
            graph.dangling_edges(),
            vec![
                DanglingEdge {
                    scene: 0,
                    hotspot: 0,
                    target: 5
                },
                DanglingEdge {
                    scene: 1,
                    hotspot: 0,
                    target: -1
                },
            ]
        );
        assert_eq!(graph.targets_of(0).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn single_image_graph_is_not_navigable() {
        let graph = SceneGraph::single("pano.jpg", 90.0);
        assert!(!graph.is_navigable());
        assert_eq!(graph.len(), 1);
        assert_eq!(
            graph.current_scene().initial_view.and_then(|v| v.fov),
            Some(90.0)
        );
    }

    #[test]
    fn initial_view_fills_missing_fields() {
        let view = InitialView {
            yaw: Some(-30.0),
            pitch: None,
            fov: None,
        };
        let resolved = view.resolve(ViewAngles {
            yaw: 10.0,
            pitch: 5.0,
            fov: 60.0,
        });
        assert_eq!(
            resolved,
            ViewAngles {
                yaw: -30.0,
                pitch: 5.0,
                fov: 60.0
            }
        );
    }
}
