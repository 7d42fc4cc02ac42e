pub mod headless;
pub mod human;

pub use headless::{HeadlessMode, HeadlessOptions};
pub use human::HumanMode;
