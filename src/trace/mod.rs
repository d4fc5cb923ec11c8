pub mod extract;
pub mod sample;
