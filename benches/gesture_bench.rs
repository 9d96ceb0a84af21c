//! Per-tick cost of the camera transforms and depth unprojection.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{Vec2, Vec3};
use viewkit::camera::transform;
use viewkit::camera::{Camera, TransformContext};
use viewkit::geometry::BoundingBox;
use viewkit::interaction::Anchors;
use viewkit::renderer::Frame;
use viewkit::viewport::{DepthBuffer, Viewport};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

fn frame() -> Frame {
    let camera = Camera::perspective(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y, 45.0);
    let frame = Frame::new(
        camera,
        Viewport::new(WIDTH as f32, HEIGHT as f32),
        BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
    );
    // Half the pixels hit geometry, the rest are background.
    let depths = (0..WIDTH * HEIGHT)
        .map(|i| if i % 2 == 0 { 600 } else { u16::MAX })
        .collect();
    match DepthBuffer::new(WIDTH, HEIGHT, camera, depths) {
        Ok(depth) => frame.with_depth_buffer(depth),
        Err(_) => frame,
    }
}

fn transform_benchmark(c: &mut Criterion) {
    let frame = frame();
    let ctx = TransformContext::new(frame.camera, &frame);

    c.bench_function("rotate_tick", |b| {
        b.iter(|| black_box(transform::rotate(&ctx, black_box(Vec2::new(3.0, -2.0)))))
    });

    c.bench_function("pan_to_point_tick", |b| {
        let mut anchors = Anchors::default();
        let _ = transform::pan_to_point(&ctx, &mut anchors, Vec2::new(640.0, 360.0));
        b.iter(|| {
            black_box(transform::pan_to_point(
                &ctx,
                &mut anchors,
                black_box(Vec2::new(700.0, 380.0)),
            ))
        })
    });

    c.bench_function("zoom_to_point_tick", |b| {
        let mut anchors = Anchors::default();
        b.iter(|| {
            black_box(transform::zoom_to_point(
                &ctx,
                &mut anchors,
                black_box(Vec2::new(640.0, 360.0)),
                1.5,
                true,
            ))
        })
    });
}

fn depth_benchmark(c: &mut Criterion) {
    let frame = frame();
    let viewport = frame.viewport;
    let Some(depth) = frame.depth_buffer() else {
        return;
    };
    c.bench_function("world_point_at", |b| {
        b.iter(|| black_box(depth.world_point_at(&viewport, black_box(Vec2::new(640.0, 360.0)))))
    });
}

criterion_group!(benches, transform_benchmark, depth_benchmark);
criterion_main!(benches);
