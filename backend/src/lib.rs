//! Greeting-card template service.
//!
//! Users upload a base image, place text elements on it, and later render a
//! personalized PNG by supplying a name, birthdate and quote. The rendering
//! core lives in [`compositor`]; everything else is the service around it.

pub mod compositor;
pub mod config;
pub mod error;
pub mod job_controller;
pub mod services;
pub mod storage;
pub mod store;
