//! Integration test modules.

mod feedback_cycle_test;
mod generation_flow_test;
