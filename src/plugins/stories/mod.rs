pub mod feed;
pub mod handlers;
pub mod models;
mod plugin;
pub mod store;
pub mod views;

pub use plugin::StoriesPlugin;

#[cfg(test)]
mod tests;
