pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting active piece")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    #[display("no active piece to move")]
    NoActivePiece,
    #[display("piece colliding when moving active piece")]
    PieceCollision(PieceCollisionError),
}

impl From<PieceCollisionError> for MoveError {
    fn from(err: PieceCollisionError) -> Self {
        MoveError::PieceCollision(err)
    }
}
