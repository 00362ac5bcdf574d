mod addresses;
mod contract;
mod encode;
mod error;

pub use addresses::*;
pub use contract::IMultiSend;
pub use encode::*;
pub use error::*;
