mod polydata_types;
pub use self::polydata_types::*;

mod codec_error;
pub use self::codec_error::*;

mod polydata_info;
pub use self::polydata_info::*;

mod raw_writer;
pub use self::raw_writer::*;

mod raw_reader;
pub use self::raw_reader::*;

mod polydata_message;
pub use self::polydata_message::*;

mod status_message;
pub use self::status_message::*;
