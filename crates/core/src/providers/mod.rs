pub mod registry;
pub mod traits;

// Analytics provider implementations
pub mod mock;
pub mod rest;
