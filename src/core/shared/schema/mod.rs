pub mod intake;
pub use self::intake::*;
