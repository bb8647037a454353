mod arithmetic;
pub use self::arithmetic::*;
