use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use geophoto_processor::metadata::jpeg::replace_exif_segment;
use geophoto_processor::metadata::ImageMetadataBlock;
use geophoto_processor::models::{Axis, GeoCoordinate};
use geophoto_processor::readers::ImageLocator;
use geophoto_processor::utils::{decimal_to_dms, dms_to_decimal};
use std::fs;
use tempfile::TempDir;

fn bare_jpeg() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    data.extend_from_slice(&[
        0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00, 0x01, 0x00,
        0x01, 0x00, 0x00,
    ]);
    data.extend_from_slice(&[0xFF, 0xDB, 0x00, 0x05, 0x00, 0x10, 0x20]);
    data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    // Stand-in for entropy coded image data
    data.extend(std::iter::repeat(0x5A).take(64 * 1024));
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

fn create_image_tree(folders: usize, per_folder: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    for folder in 0..folders {
        let path = dir.path().join(format!("Unit{}", folder));
        fs::create_dir(&path).unwrap();
        for i in 0..per_folder {
            fs::write(path.join(format!("IMG_{:04}.JPG", i)), b"x").unwrap();
        }
        fs::write(path.join("notes.txt"), b"x").unwrap();
    }
    dir
}

fn benchmark_coordinate_codec(c: &mut Criterion) {
    let values: Vec<f64> = (0..1000).map(|i| -180.0 + i as f64 * 0.36).collect();

    c.bench_function("dms_round_trip_1000", |b| {
        b.iter(|| {
            for value in &values {
                let dms = decimal_to_dms(black_box(*value), Axis::Longitude);
                black_box(dms_to_decimal(&dms).unwrap());
            }
        })
    });
}

fn benchmark_locator(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_index");

    for per_folder in [10, 100, 500].iter() {
        let tree = create_image_tree(10, *per_folder);
        let roots = vec![tree.path().to_path_buf()];
        let locator = ImageLocator::new(vec!["jpg".to_string(), "jpeg".to_string()]);

        group.bench_with_input(
            BenchmarkId::new("images", per_folder * 10),
            &roots,
            |b, roots| b.iter(|| locator.build_index(black_box(roots)).unwrap()),
        );
    }

    group.finish();
}

fn benchmark_exif_splice(c: &mut Criterion) {
    let jpeg = bare_jpeg();
    let mut block = ImageMetadataBlock::empty();
    block.set_gps(&GeoCoordinate::new(45.5, -73.6).unwrap());
    let tiff = block.encode().unwrap();

    c.bench_function("encode_gps_block", |b| b.iter(|| black_box(&block).encode().unwrap()));

    c.bench_function("replace_exif_segment_64k", |b| {
        b.iter(|| replace_exif_segment(black_box(&jpeg), black_box(&tiff)).unwrap())
    });
}

criterion_group!(
    benches,
    benchmark_coordinate_codec,
    benchmark_locator,
    benchmark_exif_splice
);
criterion_main!(benches);
