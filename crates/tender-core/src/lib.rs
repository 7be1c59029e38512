//! Core library for the tender criteria service.
//!
//! The interesting part lives in [`workflows::criteria`]: validation of the
//! criteria/conversions tree submitted with a tender and construction of the
//! permanent-identifier form that gets persisted. `config`, `error`, and
//! `telemetry` carry the service plumbing around it.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
