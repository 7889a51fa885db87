//! Window-less renderer
//!
//! Keeps the play/pause state and frame statistics of a real backend without
//! touching any GPU API.

use super::{Canvas, Color, RenderError, Renderer};
use crate::core::RendererOptions;
use crate::scene::{ListSceneGraph, SceneGraph};

/// Renderer that only counts what it would have drawn
#[derive(Debug)]
pub struct HeadlessRenderer {
    canvas: Canvas,
    title: String,
    playing: bool,
    frames_rendered: u64,
    last_node_count: usize,
    last_background: Option<Color>,
}

impl HeadlessRenderer {
    /// Create a headless renderer from validated options
    pub fn new(options: &RendererOptions) -> Result<Self, RenderError> {
        options.validate().map_err(RenderError::InvalidOptions)?;
        log::debug!(
            "HeadlessRenderer: {}x{} '{}'",
            options.width, options.height, options.title
        );

        Ok(Self {
            canvas: Canvas::new(options.width, options.height),
            title: options.title.clone(),
            playing: false,
            frames_rendered: 0,
            last_node_count: 0,
            last_background: None,
        })
    }

    /// Title the window would have had
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Frames drawn so far
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Node count of the most recently drawn graph
    pub fn last_node_count(&self) -> usize {
        self.last_node_count
    }

    /// Background of the most recently drawn graph
    pub fn last_background(&self) -> Option<Color> {
        self.last_background
    }
}

impl Renderer for HeadlessRenderer {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn create_scene_graph(&mut self, background: Color) -> Box<dyn SceneGraph> {
        Box::new(ListSceneGraph::new(background))
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn render(&mut self, graph: &dyn SceneGraph) -> Result<(), RenderError> {
        self.frames_rendered += 1;
        self.last_node_count = graph.node_count();
        self.last_background = Some(graph.background());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use crate::foundation::collections::{GameObjectId, SlotMap};

    #[test]
    fn test_rejects_zero_sized_canvas() {
        let options = RendererOptions::default().with_size(0, 600);
        assert!(matches!(HeadlessRenderer::new(&options), Err(RenderError::InvalidOptions(_))));
    }

    #[test]
    fn test_play_pause_and_frame_stats() {
        let mut renderer = HeadlessRenderer::new(&RendererOptions::default()).unwrap();
        assert_eq!(renderer.canvas(), Canvas::new(800, 600));
        assert!(!renderer.is_playing());

        renderer.play();
        assert!(renderer.is_playing());

        let mut ids: SlotMap<GameObjectId, ()> = SlotMap::with_key();
        let mut graph = renderer.create_scene_graph(Color::new(0.0, 0.0, 0.0));
        graph.add(ids.insert(()), Transform::identity());
        renderer.render(graph.as_ref()).unwrap();

        assert_eq!(renderer.frames_rendered(), 1);
        assert_eq!(renderer.last_node_count(), 1);
        assert_eq!(renderer.last_background(), Some(Color::new(0.0, 0.0, 0.0)));

        renderer.pause();
        assert!(!renderer.is_playing());
    }
}
