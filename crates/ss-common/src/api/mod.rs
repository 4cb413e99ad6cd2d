pub mod batch_suitability;
pub mod best_worker;
pub mod performance;
pub mod service_info;
pub mod skill_gap;
