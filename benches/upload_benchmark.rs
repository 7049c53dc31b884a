use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::rc::Rc;

use image::Rgba;
use texture_atlas::{
    ProceduralTextureSource, SoftwareContext, SolidColorTextureSource, Texture, TextureOptions,
    TextureSource,
};

fn tiled_texture(size: u32, tile: u32) -> Texture {
    let mut texture = Texture::new(size, size, TextureOptions::BILINEAR).expect("Power of two");
    let per_row = size / tile;
    for i in 0..per_row * per_row {
        let source: Rc<dyn TextureSource> = if i % 2 == 0 {
            Rc::new(SolidColorTextureSource::new(tile, tile, [i as u8, 0, 255, 255]))
        } else {
            Rc::new(ProceduralTextureSource::new("gradient", tile, tile, |x, y| {
                Rgba([x as u8, y as u8, 0, 255])
            }))
        };
        let x = ((i % per_row) * tile) as i32;
        let y = ((i / per_row) * tile) as i32;
        texture.add_source(source, x, y);
    }
    texture
}

fn bench_composite_load(c: &mut Criterion) {
    let gl = SoftwareContext::new();
    let mut texture = tiled_texture(512, 32);

    c.bench_function("texture/load_unload_512_tiles_32", |b| {
        b.iter(|| {
            texture.load(&gl).expect("Load failed");
            black_box(texture.hardware_id());
            texture.unload(&gl);
        })
    });
}

fn bench_placeholder_only(c: &mut Criterion) {
    let gl = SoftwareContext::new();
    let mut texture = Texture::new(1024, 1024, TextureOptions::DEFAULT).expect("Power of two");

    c.bench_function("texture/load_unload_empty_1024", |b| {
        b.iter(|| {
            texture.load(&gl).expect("Load failed");
            texture.unload(&gl);
            black_box(gl.texture_count());
        })
    });
}

criterion_group!(benches, bench_composite_load, bench_placeholder_only);
criterion_main!(benches);
