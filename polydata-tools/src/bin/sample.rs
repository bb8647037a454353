use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{App, Arg};
use log::info;
use polydata_core::{
    attribute::{Attribute, AttributeKind, DataType},
    geometry::{CellArray, PointArray},
};
use polydata_io::{base::MessageContentExt, polydata::PolyDataMessage};

struct Args {
    pub output_file: PathBuf,
}

fn get_args() -> Result<Args> {
    let matches = App::new("polydata sample")
        .version("0.1")
        .about("Writes the raw POLYDATA content of a unit cube to a file")
        .arg(
            Arg::with_name("OUTPUT")
                .short("o")
                .takes_value(true)
                .value_name("OUTPUT")
                .help("Output file")
                .required(true),
        )
        .get_matches();

    let output_file = PathBuf::from(matches.value_of("OUTPUT").context("No output file given")?);
    Ok(Args { output_file })
}

/// Unit cube with per-point normals and distances and per-face colors
fn unit_cube() -> Result<PolyDataMessage> {
    let corners = (0..8_u32)
        .map(|idx| {
            [
                (idx & 1) as f32,
                ((idx >> 1) & 1) as f32,
                ((idx >> 2) & 1) as f32,
            ]
        })
        .collect::<Vec<_>>();

    let mut points = PointArray::with_capacity(corners.len());
    for [x, y, z] in corners.iter().copied() {
        points.add_point(x, y, z);
    }

    let faces: [[u32; 4]; 6] = [
        [0, 2, 3, 1],
        [4, 5, 7, 6],
        [0, 1, 5, 4],
        [2, 6, 7, 3],
        [0, 4, 6, 2],
        [1, 3, 7, 5],
    ];
    let mut polygons = CellArray::new();
    for face in &faces {
        polygons.add_cell(face);
    }

    let mut normals = Attribute::with_type(
        "Normals",
        AttributeKind::PointNormal,
        DataType::Float32,
        3,
        corners.len(),
    )?;
    let mut distances = Attribute::with_type(
        "DistanceToCenter",
        AttributeKind::PointScalar,
        DataType::Float64,
        1,
        corners.len(),
    )?;
    for (idx, corner) in corners.iter().enumerate() {
        let centered = corner.iter().map(|c| c - 0.5).collect::<Vec<f32>>();
        let length = centered.iter().map(|c| c * c).sum::<f32>().sqrt();
        let normal = centered.iter().map(|c| c / length).collect::<Vec<f32>>();
        normals.set_nth_data(idx, &normal)?;
        distances.set_nth_data(idx, &[length as f64])?;
    }

    let mut colors = Attribute::with_type(
        "FaceColors",
        AttributeKind::CellRgba,
        DataType::UInt8,
        4,
        faces.len(),
    )?;
    for idx in 0..faces.len() {
        let channel = |bit: usize| -> u8 {
            if (idx + 1) & (1 << bit) != 0 {
                255
            } else {
                64
            }
        };
        colors.set_nth_data(idx, &[channel(0), channel(1), channel(2), 255])?;
    }

    let mut message = PolyDataMessage::new();
    message.set_points(points);
    message.set_polygons(polygons);
    message.add_attribute(normals);
    message.add_attribute(distances);
    message.add_attribute(colors);
    Ok(message)
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = get_args()?;
    let bytes = unit_cube()?.pack_to_vec()?;
    std::fs::write(&args.output_file, &bytes).context(format!(
        "Could not write file {}",
        args.output_file.display()
    ))?;
    info!("Wrote {} bytes to {}", bytes.len(), args.output_file.display());
    Ok(())
}
