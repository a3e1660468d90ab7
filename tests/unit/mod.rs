//! Black-box integration suite for the matching engine.

mod depth_tests;
mod id_tests;
mod time_priority_tests;
mod volume_modification_tests;
