pub use self::{board::*, shape::*};

pub(crate) mod board;
pub(crate) mod shape;
