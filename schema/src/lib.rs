// pokesphere schema - shared type definitions
// This crate contains the core enums and records that are shared between the
// acquisition pipeline, the cache snapshot format and the quiz/pokedex views.

// Re-export the main types
pub use pokemon_types::*;
pub use region::*;
pub use species_data::*;

pub mod pokemon_types;
pub mod region;
pub mod species_data;
