pub mod adapters;
pub mod config;
pub mod error;
pub mod service;
pub mod web;
