pub use keymap::keymap;
pub use screen::SdlDisplay;

mod keymap;
mod screen;
