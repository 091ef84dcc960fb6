//! One module per harvest stage.
pub mod capture;
pub mod device;
pub mod display;
pub mod error;
pub mod files;
pub mod location;
pub mod outcome;
pub mod risk;
