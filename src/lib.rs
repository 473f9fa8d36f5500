pub mod calculator;
pub mod camera;
pub mod classifier;
pub mod config;
pub mod debounce;
pub mod fingers;
pub mod font;
pub mod handoff;
pub mod hud;
pub mod inference;
pub mod output;
pub mod pipeline;
pub mod poses;
pub mod replay;
pub mod session;
pub mod types;
