pub mod manufacturer;

pub use manufacturer::Manufacturer;
