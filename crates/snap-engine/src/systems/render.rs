use crate::core::scene::Scene;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Build the render buffer from the scene, back-to-front.
/// Entities without a sprite are skipped; at most `max_instances` are written.
pub fn build_render_buffer(scene: &Scene, buffer: &mut RenderBuffer, max_instances: usize) {
    buffer.clear();

    let drawable = scene
        .draw_order()
        .into_iter()
        .filter_map(|entity| entity.sprite.as_ref().map(|sprite| (entity, sprite)));

    for (entity, sprite) in drawable.take(max_instances) {
        buffer.push(RenderInstance {
            x: entity.pos.x,
            y: entity.pos.y,
            rotation: entity.rotation,
            width: entity.size.x,
            height: entity.size.y,
            texture: sprite.texture.0 as f32,
            alpha: sprite.alpha,
            layer: entity.layer.as_u8() as f32,
        });
    }
}
