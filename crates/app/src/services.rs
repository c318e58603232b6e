//! Application services: use-cases that orchestrate ports and state.

pub mod command_service;
