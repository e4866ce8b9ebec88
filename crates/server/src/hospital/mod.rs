//! Hospital backend integration

pub mod client;
pub mod format;
pub mod tools;

pub use client::HospitalClient;
