//! Optional modules - integrations with external services

pub mod integrations;
