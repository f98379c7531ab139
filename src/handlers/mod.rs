pub mod pantry;

pub use pantry::PantryHandler;
