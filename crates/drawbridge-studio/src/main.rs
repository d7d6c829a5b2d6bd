//! Headless drawbridge demo: renders one frame of world geometry plus a small
//! GUI into an offscreen target and logs what was drawn.

use anyhow::{Context, Result};

use drawbridge_engine::coords::{ClipRect, Mat4, Quad, Triangle, Vec2, Vec3};
use drawbridge_engine::device::{Gpu, GpuInit, WgpuHost};
use drawbridge_engine::gui::{GuiBatch, GuiDrawContext, HoverState, WindowSize};
use drawbridge_engine::logging::{init_logging, LoggingConfig};
use drawbridge_engine::paint::PackedColor;
use drawbridge_engine::render::TextureId;
use drawbridge_engine::world::{LayerBuffers, PosTex, PosTexNorm, PoseStack, VertexSession, WorldDrawContext};
use drawbridge_engine::{Adapter, AdapterConfig};

const GUI_SCALE: f32 = 2.0;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = AdapterConfig::from_env().context("invalid adapter configuration")?;
    let mut adapter = Adapter::new(config);

    let gpu = pollster::block_on(Gpu::new(GpuInit::default()))?;
    let mut host = WgpuHost::new(&gpu);
    register_textures(&mut host)?;

    let mut buffers = LayerBuffers::new();
    draw_world(&mut adapter, &mut host, &mut buffers)?;

    let (width, height) = gpu.size();
    let window = WindowSize::new(
        (width as f32 / GUI_SCALE) as u32,
        (height as f32 / GUI_SCALE) as u32,
        GUI_SCALE,
    );
    let mut batch = GuiBatch::new(window);
    draw_gui(&mut batch);
    let gui = batch.flush();

    let aspect = width as f32 / height as f32;
    let view_proj = Mat4::orthographic(-2.0 * aspect, 2.0 * aspect, -2.0, 2.0, -10.0, 10.0);

    let mut frame = gpu.begin_frame();
    gpu.clear(&mut frame, wgpu::Color { r: 0.08, g: 0.09, b: 0.12, a: 1.0 });
    host.draw_world(&gpu, &mut frame, &buffers, &view_proj);
    host.draw_gui(&gpu, &mut frame, &gui, window);
    gpu.submit(frame);

    let stats = adapter.stats();
    log::info!(
        "frame done: {} world vertices, {} gui quads in {} draws; {} pipelines, {} layers cached",
        buffers.vertex_count(),
        gui.quad_count(),
        gui.draws.len(),
        stats.pipelines,
        stats.layers
    );

    // Unregistered textures are rejected by the host, not drawn.
    if let Err(err) = adapter.begin_quads(&mut host, &TextureId::new("missing/texture"), 1.0, true) {
        log::info!("expected failure: {err}");
    }
    Ok(())
}

fn register_textures(host: &mut WgpuHost) -> Result<()> {
    const GRAY: [u8; 4] = [0x80, 0x80, 0x80, 0xFF];
    const LIGHT: [u8; 4] = [0xC8, 0xC8, 0xC8, 0xFF];

    host.register_checker("block/stone", 16, GRAY, LIGHT)?;
    host.register_checker("block/glass", 16, [0xA0, 0xD0, 0xFF, 0x60], [0xFF, 0xFF, 0xFF, 0x90])?;
    for sprite in [
        "widget/button",
        "widget/button_disabled",
        "widget/button_highlighted",
        "widget/checkbox",
        "widget/checkbox_highlighted",
        "widget/checkbox_selected",
        "widget/checkbox_selected_highlighted",
    ] {
        host.register_checker(sprite, 8, GRAY, LIGHT)?;
    }
    Ok(())
}

fn draw_world(adapter: &mut Adapter, host: &mut WgpuHost, buffers: &mut LayerBuffers) -> Result<()> {
    let stone = TextureId::new("block/stone");
    let glass = TextureId::new("block/glass");

    let mut poses = PoseStack::new();
    poses.translate(-1.0, -0.5, 0.0);

    let face = Quad::new(
        PosTex::new(Vec3::new(0.0, 0.0, 0.0), Vec2::new(0.0, 1.0)),
        PosTex::new(Vec3::new(1.0, 0.0, 0.0), Vec2::new(1.0, 1.0)),
        PosTex::new(Vec3::new(1.0, 1.0, 0.0), Vec2::new(1.0, 0.0)),
        PosTex::new(Vec3::new(0.0, 1.0, 0.0), Vec2::new(0.0, 0.0)),
    );

    let mut quads = adapter.begin_quads(host, &stone, 1.0, true)?;
    quads.set_context(WorldDrawContext::new(&poses, buffers));
    quads.quad(&face);
    let written = quads.end();

    poses.push();
    poses.translate(1.25, 0.0, 0.5);
    let mut glass_quads = adapter.begin_quads(host, &glass, 0.6, false)?;
    glass_quads.set_context(WorldDrawContext::new(&poses, buffers));
    glass_quads.quad(&face);
    let written = written + glass_quads.end();
    poses.pop();

    let n = Vec3::new(0.0, 0.0, 1.0);
    let roof = Triangle::new(
        PosTexNorm::new(Vec3::new(0.0, 1.0, 0.0), Vec2::new(0.0, 1.0), n),
        PosTexNorm::new(Vec3::new(1.0, 1.0, 0.0), Vec2::new(1.0, 1.0), n),
        PosTexNorm::new(Vec3::new(0.5, 1.6, 0.0), Vec2::new(0.5, 0.0), n),
    );
    let mut tris = adapter.begin_triangles(host, &stone, 1.0, true, true)?;
    tris.set_context(WorldDrawContext::new(&poses, buffers));
    tris.triangle(&roof);
    let triangles = tris.end();

    log::debug!("world: {written} quads, {triangles} triangles");
    Ok(())
}

fn draw_gui(batch: &mut GuiBatch) {
    let mut ctx = GuiDrawContext::new(batch);

    ctx.fill(8, 8, 208, 120, PackedColor::from_argb(0xC0, 0x10, 0x10, 0x18));

    ctx.push_matrix();
    ctx.translate(16.0, 16.0);
    ctx.push_clip(ClipRect::new(0, 0, 184, 96));
    ctx.draw_button(0, 0, 80, 20, HoverState::Idle);
    ctx.draw_button(88, 0, 80, 20, HoverState::MouseOver);
    ctx.draw_button(0, 28, 80, 20, HoverState::Disabled);
    ctx.draw_checkbox(88, 28, 20, 20, false, true);
    ctx.draw_text_highlight(0, 56, 120, 66);
    // Partially outside the clip; the scissor trims it.
    ctx.draw_whole_image(&TextureId::new("block/stone"), 150, 60, 64, 64);
    ctx.pop_clip();
    ctx.pop_matrix();

    ctx.finish();
}
