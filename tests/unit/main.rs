//! Unit test modules.

mod catalog_test;
mod feedback_test;
mod generation_test;
mod signals_test;
