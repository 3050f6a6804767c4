mod app;
pub mod components;
pub(crate) mod key_handler;
mod layout;
pub mod view;

pub use app::App;
pub use layout::{Layout, LayoutAreas};
