pub mod assembler;
pub mod sampler;
pub mod weather_types;
