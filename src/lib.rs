pub mod api;
pub mod app;
pub mod cascade;
pub mod config;
pub mod errors;
pub mod fake_feed;
pub mod http_client;
pub mod model;
pub mod msg;
pub mod panels;
pub mod poll;
pub mod runtime;
pub mod state;
pub mod theme;
pub mod ui;
