use criterion::{black_box, criterion_group, criterion_main, Criterion};
use softblit::{BlendMode, PixelBuffer, Point, Texture};

fn bench_background(c: &mut Criterion) {
    let background = Texture::checkerboard(640, 32, (90, 90, 110), (40, 40, 55));
    let mut screen = PixelBuffer::with_size(640, 480);

    c.bench_function("opaque_fullscreen_640x480", |b| {
        b.iter(|| {
            background
                .blit_onto(&mut screen, black_box(Point::ZERO), BlendMode::Opaque, Point::ZERO)
                .unwrap();
        })
    });
}

fn bench_transparent_sprite(c: &mut Criterion) {
    let glow = Texture::glow(64, (255, 220, 140));
    let mut screen = PixelBuffer::with_size(640, 480);
    screen.clear(30, 30, 30, 255);

    c.bench_function("transparent_128x128", |b| {
        b.iter(|| {
            glow.blit_onto(
                &mut screen,
                black_box(Point::new(256, 176)),
                BlendMode::Transparent,
                Point::ZERO,
            )
            .unwrap();
        })
    });
}

fn bench_clipped_frames(c: &mut Criterion) {
    let sheet = Texture::frame_strip(122, 122, 5, 5);
    let mut screen = PixelBuffer::with_size(640, 480);

    c.bench_function("spritesheet_frame_clipped_edges", |b| {
        b.iter(|| {
            for (i, point) in [Point::new(-61, -61), Point::new(579, 419), Point::new(300, -100)]
                .into_iter()
                .enumerate()
            {
                let frame = Point::new(i as i32, 4 - i as i32);
                sheet
                    .blit_onto(&mut screen, black_box(point), BlendMode::Transparent, frame)
                    .unwrap();
            }
        })
    });
}

criterion_group!(
    benches,
    bench_background,
    bench_transparent_sprite,
    bench_clipped_frames
);
criterion_main!(benches);
