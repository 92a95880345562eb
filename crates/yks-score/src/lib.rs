//! YKS net, composite score, and rank estimation, plus practice-exam net tracking.

pub mod config;
pub mod error;
pub mod persistence;
pub mod scoring;
pub mod telemetry;
pub mod tracking;
