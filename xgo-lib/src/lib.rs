pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
pub mod link;
pub mod remap;
pub mod rider;
pub mod types;

// Re-export the XgoRider struct for easy access
pub use rider::XgoRider;
