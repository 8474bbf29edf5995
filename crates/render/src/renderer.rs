use std::fmt::Write;

use crate::RenderFrame;

/// Renderer-agnostic interface. All backends implement this trait.
///
/// A backend consumes a prepared frame and produces output. It may keep its
/// own state (GPU resources, counters) but never touches simulation state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    fn render(&mut self, frame: &RenderFrame) -> Self::Output;
}

/// Text renderer for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames_rendered: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, frame: &RenderFrame) -> String {
        self.frames_rendered += 1;

        let mut out = String::new();
        let c = &frame.camera;
        // Writing into a String cannot fail
        let _ = writeln!(out, "=== Frame {} (t={:.3}) ===", frame.frame, frame.elapsed);
        let _ = writeln!(out, "Items: {}", frame.items.len());
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) forward=({:.2}, {:.2}, {:.2}) fov={:.0}",
            c.eye.x, c.eye.y, c.eye.z, c.forward.x, c.forward.y, c.forward.z, c.fov_y_degrees
        );
        if let Some(light) = frame.light {
            let _ = writeln!(out, "Light: ({:.1}, {:.1}, {:.1})", light.x, light.y, light.z);
        }

        for item in &frame.items {
            let p = item.position();
            let _ = writeln!(
                out,
                "  [{}{}] {:?} mesh={:016x} pos=({:.2}, {:.2}, {:.2})",
                item.entity,
                item.name.as_deref().map(|n| format!(" {n}")).unwrap_or_default(),
                item.kind,
                item.mesh.0,
                p.x,
                p.y,
                p.z
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RenderItem;
    use framecore_common::{EntityId, EntityKind};
    use framecore_mesh::MeshHandle;
    use glam::{DMat4, DVec3};

    #[test]
    fn debug_renderer_empty_frame() {
        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&RenderFrame::default());

        assert!(output.contains("Frame 0"));
        assert!(output.contains("Items: 0"));
        assert!(!output.contains("Light"));
        assert_eq!(renderer.frames_rendered(), 1);
    }

    #[test]
    fn debug_renderer_lists_items() {
        let frame = RenderFrame {
            frame: 12,
            light: Some(DVec3::new(0.0, 10.0, -25.0)),
            items: vec![
                RenderItem {
                    entity: EntityId(0),
                    name: Some("player".into()),
                    kind: EntityKind::Player,
                    mesh: MeshHandle(0xabc),
                    world: DMat4::from_translation(DVec3::new(1.0, 2.0, 3.0)),
                },
                RenderItem {
                    entity: EntityId(1),
                    name: None,
                    kind: EntityKind::TriggerVolume,
                    mesh: MeshHandle(0xdef),
                    world: DMat4::IDENTITY,
                },
            ],
            ..RenderFrame::default()
        };

        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&frame);
        assert!(output.contains("Items: 2"));
        assert!(output.contains("[#0 player] Player"));
        assert!(output.contains("pos=(1.00, 2.00, 3.00)"));
        assert!(output.contains("[#1] TriggerVolume"));
        assert!(output.contains("Light: (0.0, 10.0, -25.0)"));
    }
}
