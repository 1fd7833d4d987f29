pub mod assignment;
pub mod features;
pub mod generate;
pub mod id;
