pub mod core;
pub mod intake;
pub mod main_module;
pub mod security;
