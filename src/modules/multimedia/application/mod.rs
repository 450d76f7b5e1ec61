pub mod domain;
pub mod gallery;
pub mod media_use_cases;
pub mod orchestrator;
pub mod ports;
