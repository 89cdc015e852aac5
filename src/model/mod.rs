pub mod constants;
pub mod normalize;
pub mod padel_model;
pub mod point_split;
pub mod recalculation;
pub mod reconciler;
pub mod scoring;
pub mod structures;
pub mod window_tracker;
