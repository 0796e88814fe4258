// src/lib.rs
pub mod banner;
pub mod config;
pub mod controller;
pub mod errors;
pub mod models;
pub mod pacing;
pub mod page;
pub mod render;
pub mod service;
pub mod view;
