mod content;
pub use self::content::*;

mod message_factory;
pub use self::message_factory::*;
