pub mod config;
pub mod controllers;
pub mod database;
pub mod http;
pub mod models;
pub mod repositories;
pub mod validation;
