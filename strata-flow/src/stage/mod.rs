pub mod component;
pub mod handle;
pub mod runner;
pub mod transform;
pub mod types;
