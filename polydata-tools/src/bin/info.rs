use std::{path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::{App, Arg};
use log::info;
use polydata_core::{attribute::Attribute, geometry::PointArray};
use polydata_io::{
    base::{ContentBuffer, MessageContent},
    polydata::{CellChannel, PolyDataMessage},
};

struct Args {
    pub input_file: PathBuf,
    pub detailed: bool,
}

fn get_args() -> Result<Args> {
    let matches = App::new("polydata info")
        .version("0.1")
        .about("Prints information about a file containing the raw content of a POLYDATA message")
        .arg(
            Arg::with_name("INPUT")
                .short("i")
                .takes_value(true)
                .value_name("INPUT")
                .help("Input POLYDATA content file")
                .required(true),
        )
        .arg(
            Arg::with_name("DETAILED")
                .short("d")
                .long("detailed")
                .help("Output a detailed analysis of the content, showing min and max values for all attributes"),
        )
        .get_matches();

    let input_file = PathBuf::from(matches.value_of("INPUT").context("No input file given")?);
    let detailed = matches.is_present("DETAILED");

    Ok(Args {
        input_file,
        detailed,
    })
}

fn print_points(points: &PointArray) {
    println!("Points:                   {}", points.count());
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        let (min, max) = iter.fold((*first, *first), |(min, max), point| {
            (min.inf(point), max.sup(point))
        });
        println!("\tX:                      {}  {}", min.x, max.x);
        println!("\tY:                      {}  {}", min.y, max.y);
        println!("\tZ:                      {}  {}", min.z, max.z);
    }
}

fn print_attribute(attribute: &Attribute) {
    println!(
        "\t{:<24} {} {} x {} ({} elements)",
        format!("'{}'", attribute.name()),
        attribute.kind(),
        attribute.data_type(),
        attribute.n_components(),
        attribute.size()
    );
}

fn print_attribute_ranges(attribute: &Attribute) {
    for component in 0..attribute.n_components() as usize {
        let range = (0..attribute.size())
            .filter_map(|element| attribute.get_value_as_f64(element, component))
            .fold(None, |range: Option<(f64, f64)>, value| match range {
                None => Some((value, value)),
                Some((min, max)) => Some((min.min(value), max.max(value))),
            });
        if let Some((min, max)) = range {
            println!("\t\t[{}]  {}  {}", component, min, max);
        }
    }
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = get_args()?;
    let t_start = Instant::now();

    let bytes = std::fs::read(&args.input_file).context(format!(
        "Could not read file {}",
        args.input_file.display()
    ))?;
    info!("Read {} bytes from {}", bytes.len(), args.input_file.display());

    let mut message = PolyDataMessage::new();
    message
        .unpack_content(&ContentBuffer::from(bytes))
        .context(format!(
            "File {} does not contain valid POLYDATA content",
            args.input_file.display()
        ))?;

    println!("polydata info report for {}", args.input_file.display());
    if let Some(points) = message.points() {
        print_points(points);
    }
    for channel in CellChannel::ALL.iter().copied() {
        if let Some(cells) = message.cells(channel) {
            println!(
                "{:<25} {} cells, {} bytes",
                format!("{}:", channel),
                cells.cell_count(),
                cells.total_size_bytes()
            );
        }
    }
    println!("Attributes:               {}", message.attribute_count());
    for attribute in message.attributes() {
        print_attribute(attribute);
        if args.detailed {
            print_attribute_ranges(attribute);
        }
    }
    println!(
        "Content size:             {} bytes",
        message.calculate_content_size()?
    );
    println!("Took {:.2}s", t_start.elapsed().as_secs_f64());
    Ok(())
}
