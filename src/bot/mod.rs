pub mod action;
pub mod app;
pub mod event;
pub mod input;
pub mod menu;
pub mod screen;
pub mod session;

pub use action::Action;
pub use app::{App, Delivery, Outbound};
pub use event::{Author, Event, EventKind};
pub use screen::{Button, Screen};
pub use session::{ChatId, Session, SessionStore};
