mod point_array;
pub use self::point_array::*;

mod cell_array;
pub use self::cell_array::*;
