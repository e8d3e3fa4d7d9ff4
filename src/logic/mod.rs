pub mod adjusters;
pub mod calculator;
pub mod catalog;
pub mod engine;
pub mod planner;
pub mod pricing;
pub mod rules;
pub mod selector;

pub use catalog::PesticideCatalog;
pub use engine::TreatmentEngine;
