//! Service layer: phish.in API client, cache wiring, and orchestration

pub mod history_service;
pub mod phishin_client;
pub mod show_store;
