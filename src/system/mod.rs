pub mod cpu;
pub mod lister;
pub mod platform;
pub mod process;
