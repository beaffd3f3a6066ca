//! loadglow — CPU load indicator on MSI keyboard backlights.

pub mod config;
pub mod device;
pub mod error;
pub mod led;
pub mod monitor;
pub mod protocol;
pub mod reconnect;
pub mod shutdown;
pub mod stat;
pub mod sweep;
pub mod timing;

pub use error::LoadglowError;
