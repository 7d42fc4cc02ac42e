pub mod handler;
pub mod keyboard;

pub use handler::{InputHandler, KeyAction};
pub use keyboard::{KeyboardController, SteeringInput};
