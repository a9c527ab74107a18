pub mod resolve;
pub mod show;
