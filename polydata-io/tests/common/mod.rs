use polydata_core::{
    attribute::{Attribute, AttributeDomain, AttributeKind, DataType},
    geometry::{CellArray, Point, PointArray},
};
use polydata_io::polydata::{CellChannel, PolyDataMessage};
use rand::{distributions::Alphanumeric, prelude::Distribution, seq::SliceRandom, Rng};

/// Distribution of random attributes with a fixed number of elements. Names have random lengths, so that both even
/// and odd name section lengths are covered.
pub struct TestAttributeDistribution {
    pub size: usize,
}

fn random_values<T, R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<T>
where
    rand::distributions::Standard: Distribution<T>,
{
    (0..count).map(|_| rng.gen()).collect()
}

/// Fills `attribute` with random values of its data type
pub fn fill_random<R: Rng + ?Sized>(attribute: &mut Attribute, rng: &mut R) {
    let count = attribute.value_count();
    let result = match attribute.data_type() {
        DataType::Float32 => attribute.set_data(&random_values::<f32, _>(rng, count)),
        DataType::Float64 => attribute.set_data(&random_values::<f64, _>(rng, count)),
        DataType::Int8 => attribute.set_data(&random_values::<i8, _>(rng, count)),
        DataType::UInt8 => attribute.set_data(&random_values::<u8, _>(rng, count)),
        DataType::Int16 => attribute.set_data(&random_values::<i16, _>(rng, count)),
        DataType::UInt16 => attribute.set_data(&random_values::<u16, _>(rng, count)),
        DataType::Int32 => attribute.set_data(&random_values::<i32, _>(rng, count)),
        DataType::UInt32 => attribute.set_data(&random_values::<u32, _>(rng, count)),
    };
    result.expect("Random values must match the attribute type");
}

impl Distribution<Attribute> for TestAttributeDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Attribute {
        let kind = *AttributeKind::ALL.choose(rng).unwrap();
        let data_type = *DataType::ALL.choose(rng).unwrap();
        let n_components = rng.gen_range(1..=5);
        let name_length = rng.gen_range(0..12);
        let name: String = (0..name_length)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect();

        let mut attribute =
            Attribute::with_type(name, kind, data_type, n_components, self.size).unwrap();
        fill_random(&mut attribute, rng);
        attribute
    }
}

/// Distribution of random POLYDATA messages. Every geometry slot is present with a probability of one half.
pub struct TestPolyDataDistribution {
    pub max_points: usize,
    pub max_cells: usize,
    pub max_attributes: usize,
}

impl Default for TestPolyDataDistribution {
    fn default() -> Self {
        Self {
            max_points: 64,
            max_cells: 16,
            max_attributes: 4,
        }
    }
}

fn random_cells<R: Rng + ?Sized>(rng: &mut R, max_cells: usize, point_count: usize) -> CellArray {
    let max_index = point_count.max(1) as u32;
    let mut cells = CellArray::new();
    for _ in 0..rng.gen_range(0..=max_cells) {
        let cell = (0..rng.gen_range(1..=6))
            .map(|_| rng.gen_range(0..max_index))
            .collect::<Vec<u32>>();
        cells.add_cell(&cell);
    }
    cells
}

impl Distribution<PolyDataMessage> for TestPolyDataDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PolyDataMessage {
        let mut message = PolyDataMessage::new();
        let point_count = rng.gen_range(0..=self.max_points);
        if rng.gen_bool(0.5) {
            message.set_points(
                (0..point_count)
                    .map(|_| {
                        Point::new(
                            rng.gen_range(-100.0..100.0),
                            rng.gen_range(-100.0..100.0),
                            rng.gen_range(-100.0..100.0),
                        )
                    })
                    .collect::<PointArray>(),
            );
        }
        for channel in CellChannel::ALL.iter().copied() {
            if rng.gen_bool(0.5) {
                message.set_cells(channel, random_cells(rng, self.max_cells, point_count));
            }
        }
        for _ in 0..rng.gen_range(0..=self.max_attributes) {
            let distribution = TestAttributeDistribution {
                size: rng.gen_range(0..=point_count),
            };
            message.add_attribute(distribution.sample(rng));
        }
        message
    }
}

/// Asserts that `actual` is what `expected` becomes after packing and unpacking. Absent geometry slots come back as
/// empty ones.
pub fn assert_unpacked_equals(expected: &PolyDataMessage, actual: &PolyDataMessage) {
    assert_eq!(
        expected.points().cloned().unwrap_or_default(),
        *actual.points().expect("Unpacked messages always have points")
    );
    for channel in CellChannel::ALL.iter().copied() {
        assert_eq!(
            expected.cells(channel).cloned().unwrap_or_default(),
            *actual
                .cells(channel)
                .expect("Unpacked messages always have all cell channels"),
            "Cell channel {} differs",
            channel
        );
    }
    assert_eq!(expected.attributes(), actual.attributes());
}

/// Returns all attributes in the given domain
pub fn attributes_in_domain(
    message: &PolyDataMessage,
    domain: AttributeDomain,
) -> Vec<&Attribute> {
    message
        .attributes()
        .iter()
        .filter(|attribute| attribute.kind().domain() == domain)
        .collect()
}
