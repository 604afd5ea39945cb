pub mod help;
pub mod panel;
pub mod statusbar;
