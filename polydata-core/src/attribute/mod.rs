mod attribute_type;
pub use self::attribute_type::*;

mod attribute_data;
pub use self::attribute_data::*;

mod attribute;
pub use self::attribute::*;
