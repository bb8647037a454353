use criterion::{criterion_group, criterion_main, Criterion};
use polydata_core::{
    attribute::{Attribute, AttributeKind, DataType},
    geometry::{CellArray, PointArray},
};
use polydata_io::base::{ContentBuffer, MessageContent};
use polydata_io::polydata::PolyDataMessage;
use rand::{distributions::Uniform, thread_rng, Rng};

const NUM_POINTS: usize = 100_000;

fn get_dummy_message() -> PolyDataMessage {
    let mut rng = thread_rng();
    let coordinates = Uniform::new(-100.0_f32, 100.0);
    let indices = Uniform::new(0, NUM_POINTS as u32);

    let mut points = PointArray::with_capacity(NUM_POINTS);
    for _ in 0..NUM_POINTS {
        points.add_point(
            rng.sample(coordinates),
            rng.sample(coordinates),
            rng.sample(coordinates),
        );
    }

    let mut polygons = CellArray::new();
    for _ in 0..NUM_POINTS * 2 {
        polygons.add_cell(&[rng.sample(indices), rng.sample(indices), rng.sample(indices)]);
    }

    let mut normals = Attribute::with_type(
        "Normals",
        AttributeKind::PointNormal,
        DataType::Float32,
        3,
        NUM_POINTS,
    )
    .unwrap();
    let normal_values = (0..NUM_POINTS * 3)
        .map(|_| rng.sample(Uniform::new(-1.0_f32, 1.0)))
        .collect::<Vec<_>>();
    normals.set_data(&normal_values).unwrap();

    let mut colors = Attribute::with_type(
        "Colors",
        AttributeKind::CellRgba,
        DataType::UInt8,
        4,
        NUM_POINTS * 2,
    )
    .unwrap();
    let color_values = (0..NUM_POINTS * 8).map(|_| rng.gen()).collect::<Vec<u8>>();
    colors.set_data(&color_values).unwrap();

    let mut message = PolyDataMessage::new();
    message.set_points(points);
    message.set_polygons(polygons);
    message.add_attribute(normals);
    message.add_attribute(colors);
    message
}

fn bench(c: &mut Criterion) {
    let message = get_dummy_message();
    let mut packed = ContentBuffer::new();
    message.pack_content(&mut packed).unwrap();

    c.bench_function("polydata_content_size", |b| {
        b.iter(|| message.calculate_content_size().unwrap())
    });

    {
        let mut buffer = ContentBuffer::new();
        c.bench_function("polydata_pack", |b| {
            b.iter(|| message.pack_content(&mut buffer).unwrap())
        });
    }

    {
        let mut received = PolyDataMessage::new();
        c.bench_function("polydata_unpack", |b| {
            b.iter(|| received.unpack_content(&packed).unwrap())
        });
    }
}

criterion_group! {
    name = polydata;
    config = Criterion::default().sample_size(20);
    targets = bench
}
criterion_main!(polydata);
