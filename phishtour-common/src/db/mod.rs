//! Database layer: pool initialization and show persistence

pub mod init;
pub mod shows;

pub use init::init_database;
pub use shows::{load_show, save_show, Show};
