pub mod app;
pub mod celebration;
pub mod commands;
pub mod config;
pub mod dom;
pub mod lock_screen;
pub mod presentation;
pub mod quiz;
pub mod scene;
pub mod timeline;
pub mod view;

pub type AppResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync + 'static>>;
