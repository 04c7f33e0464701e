//! mule-eda-core: exploratory analysis and account-level feature
//! engineering for mule-account detection on transaction data.

pub mod comparator;
pub mod config;
pub mod error;
pub mod features;
pub mod labeler;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod rng;
pub mod sample;
pub mod stats;
pub mod timestamp;
pub mod types;
