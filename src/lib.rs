pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod firestore;
pub mod models;
pub mod planner;
pub mod remote;
pub mod schedule;
pub mod services;
pub mod state;
pub mod stores;
