//! HTTP request handlers for API endpoints.

pub mod health;
pub mod links;
pub mod redirect;
pub mod shorten;

pub use health::{health_handler, reprobe_handler};
pub use links::delete_link_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
