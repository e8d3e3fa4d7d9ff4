//! Crop treatment recommendation and dosage calculation.
//!
//! [`logic::TreatmentEngine`] turns a detected disease, its severity, the farm
//! size and free-text location/weather into a [`models::TreatmentPlan`].

pub mod config;
pub mod db;
pub mod error;
pub mod logic;
pub mod models;
