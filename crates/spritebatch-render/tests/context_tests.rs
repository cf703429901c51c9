//! Graphics context tests against a real adapter.

use std::sync::Arc;

use glam::Vec2;
use spritebatch_render::{
    BlendMode, GraphicsContext, GraphicsContextDescriptor, GraphicsError, RenderDevice, SortMode,
    SpriteBatch, SpriteOptions,
};

fn offscreen_target(ctx: &GraphicsContext, width: u32, height: u32) -> wgpu::TextureView {
    let texture = ctx.device().create_texture(&wgpu::TextureDescriptor {
        label: Some("offscreen_target"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: ctx.target_format(),
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[test]
#[ignore] // Requires GPU - run with: cargo test --test context_tests -- --ignored
fn test_context_creation_sync() {
    match GraphicsContext::new_owned_sync() {
        Ok(ctx) => {
            assert_eq!(Arc::strong_count(&ctx), 1);
            assert_eq!(ctx.viewport_size(), (0, 0));
            assert_eq!(ctx.texture_count(), 0);
        }
        Err(e) => {
            println!("GPU not available: {:?}", e);
        }
    }
}

#[test]
#[ignore] // Requires GPU
fn test_target_sets_viewport() {
    if let Ok(ctx) = GraphicsContext::new_owned_sync() {
        ctx.set_target(offscreen_target(&ctx, 320, 240), 320, 240);
        assert_eq!(ctx.viewport_size(), (320, 240));

        assert!(ctx.take_target().is_some());
        assert_eq!(ctx.viewport_size(), (0, 0));
    }
}

#[test]
#[ignore] // Requires GPU
fn test_batch_draws_offscreen() {
    if let Ok(ctx) = GraphicsContext::new_owned_sync() {
        let texture = ctx
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("sprite"),
                size: wgpu::Extent3d {
                    width: 4,
                    height: 4,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            })
            .unwrap();
        ctx.write_texture(&texture, &[255; 4 * 4 * 4]);
        assert_eq!(ctx.texture_count(), 1);

        ctx.set_target(offscreen_target(&ctx, 64, 64), 64, 64);
        ctx.clear(wgpu::Color::BLACK);

        let mut batch = SpriteBatch::new(ctx.clone()).unwrap();
        batch.begin(SortMode::BackToFront, BlendMode::Alpha).unwrap();
        for depth in 0..3 {
            batch
                .draw(
                    &SpriteOptions::new(texture.id(), Vec2::splat(4.0))
                        .at(Vec2::splat(depth as f32 * 8.0))
                        .with_depth(depth),
                )
                .unwrap();
        }
        let stats = batch.end().unwrap();
        assert_eq!(stats.sprites, 3);
        assert_eq!(stats.draw_calls, 1);

        let _ = ctx.device().poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        });
    }
}

#[test]
fn test_graphics_error_display() {
    let err = GraphicsError::NoAdapter("no backends".to_string());
    assert!(err.to_string().contains("no backends"));

    let display = format!("{:?}", GraphicsError::DeviceRequest(String::new()));
    assert!(display.contains("DeviceRequest"));
}

#[test]
fn test_descriptor_samples_nearest_by_default() {
    let descriptor = GraphicsContextDescriptor::default();
    assert_eq!(descriptor.texture_filter, wgpu::FilterMode::Nearest);

    let smooth = GraphicsContextDescriptor::new().texture_filter(wgpu::FilterMode::Linear);
    assert_eq!(smooth.texture_filter, wgpu::FilterMode::Linear);
}
