#![deny(missing_docs)]
#![doc = "Core types for the marr multi-arrangement similarity-estimation engine: pair matrices with explicit missing cells, structured errors, deterministic RNG and provenance descriptors."]

pub mod errors;
pub mod matrix;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, MarrError};
pub use matrix::PairMatrix;
pub use provenance::{SchemaVersion, SessionProvenance};
pub use rng::{derive_substream_seed, RngHandle};
