//! Monitoring session tests.

mod session_test;
