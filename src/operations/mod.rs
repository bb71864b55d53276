pub mod generate;
pub mod transform;
