use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{Shape, ShapeKind};

/// Seed for deterministic piece generation.
///
/// A 128-bit (16-byte) seed for the generator behind
/// [`PieceGenerator`]. The same seed produces the same sequence of pieces,
/// so a seed plus a command trace fully reproduces a game.
///
/// Written as 32 hexadecimal digits, both by [`fmt::Display`]/[`FromStr`] and
/// by serde.
///
/// # Example
///
/// ```
/// use blockfall_engine::PieceSeed;
///
/// let seed: PieceSeed = "000000000000000000000000000000ff".parse().unwrap();
/// assert_eq!(seed, PieceSeed::from(255_u128));
/// assert_eq!(seed.to_string(), "000000000000000000000000000000ff");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("invalid seed: expected 32 hex digits, got {len}")]
    InvalidLength { len: usize },
    #[display("invalid seed: {input:?} is not hexadecimal")]
    InvalidDigit { input: String },
}

impl From<u128> for PieceSeed {
    fn from(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError::InvalidLength { len: s.len() });
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParseSeedError::InvalidDigit {
            input: s.to_owned(),
        })?;
        Ok(Self::from(num))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Source of new pieces.
///
/// Each piece is an independent, uniform draw over the seven kinds. This is
/// the only randomness in the engine, and it is fully determined by the seed.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceGenerator, PieceSeed};
///
/// let seed = PieceSeed::from(7_u128);
/// let mut a = PieceGenerator::with_seed(seed);
/// let mut b = PieceGenerator::with_seed(seed);
/// for _ in 0..10 {
///     assert_eq!(a.next_shape(), b.next_shape());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    seed: PieceSeed,
    rng: Pcg32,
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    /// Creates a generator with a seed from the thread-local random source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            seed,
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// The seed this generator started from.
    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    /// Draws the next kind.
    pub fn next_kind(&mut self) -> ShapeKind {
        self.rng.random()
    }

    /// Draws the next kind and returns it in spawn orientation.
    pub fn next_shape(&mut self) -> Shape {
        self.next_kind().spawn_shape()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod piece_seed {
        use super::*;

        #[test]
        fn test_display_and_parse() {
            let seed = PieceSeed::from(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210_u128);
            let text = seed.to_string();
            assert_eq!(text, "0123456789abcdeffedcba9876543210");
            assert_eq!(text.parse::<PieceSeed>(), Ok(seed));
            assert_eq!("0123456789ABCDEFFEDCBA9876543210".parse(), Ok(seed));
        }

        #[test]
        fn test_parse_errors() {
            assert_eq!(
                "abc".parse::<PieceSeed>(),
                Err(ParseSeedError::InvalidLength { len: 3 })
            );
            assert!(matches!(
                "0123456789abcdefxxxxxxxxxxxxxxxx".parse::<PieceSeed>(),
                Err(ParseSeedError::InvalidDigit { .. })
            ));
        }

        #[test]
        fn test_serialization() {
            let seed = PieceSeed::from(42_u128);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0000000000000000000000000000002a\"");
            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, seed);

            assert!(serde_json::from_str::<PieceSeed>("\"2a\"").is_err());
        }
    }

    mod generator {
        use super::*;

        #[test]
        fn test_same_seed_same_sequence() {
            let seed = PieceSeed::from(12345_u128);
            let mut a = PieceGenerator::with_seed(seed);
            let mut b = PieceGenerator::with_seed(seed);
            let seq_a = (0..100).map(|_| a.next_kind()).collect::<Vec<_>>();
            let seq_b = (0..100).map(|_| b.next_kind()).collect::<Vec<_>>();
            assert_eq!(seq_a, seq_b);
        }

        #[test]
        fn test_different_seeds_differ() {
            let mut a = PieceGenerator::with_seed(PieceSeed::from(1_u128));
            let mut b = PieceGenerator::with_seed(PieceSeed::from(2_u128));
            let seq_a = (0..100).map(|_| a.next_kind()).collect::<Vec<_>>();
            let seq_b = (0..100).map(|_| b.next_kind()).collect::<Vec<_>>();
            assert_ne!(seq_a, seq_b);
        }

        #[test]
        fn test_all_kinds_are_drawn() {
            let mut generator = PieceGenerator::with_seed(PieceSeed::from(99_u128));
            let mut counts = [0_usize; ShapeKind::LEN];
            for _ in 0..7000 {
                counts[generator.next_kind() as usize] += 1;
            }
            // uniform: each kind should land near 1000
            for (kind, count) in ShapeKind::ALL.iter().zip(counts) {
                assert!((700..1300).contains(&count), "{kind:?} drawn {count} times");
            }
        }

        #[test]
        fn test_next_shape_is_spawn_orientation() {
            let mut a = PieceGenerator::with_seed(PieceSeed::from(5_u128));
            let mut b = PieceGenerator::with_seed(PieceSeed::from(5_u128));
            for _ in 0..20 {
                assert_eq!(a.next_shape(), b.next_kind().spawn_shape());
            }
        }
    }
}
