#![forbid(unsafe_code)]

//! Grading Runtime
//!
//! Wraps the grading kernel with CSV persistence, the submission
//! entry point, a terminal form, dataset summaries and configuration.
//!
//! No validation rules live here. They are delegated to the kernel.

pub mod csv_codec;
pub mod record_store;
pub mod grader;
pub mod form;
pub mod summary;
pub mod config;
pub mod logging;
