//! A minimal 2D game loop over a software framebuffer: clipped rectangle
//! fills and sprite blits, one AABB overlap test, a hybrid sleep/spin frame limiter
//! and a sine tone streamed into a circular audio buffer.

pub mod asset;
pub mod audio;
pub mod clock;
pub mod collision;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod platform;
pub mod raster;
pub mod sound;
pub mod types;
pub mod window;
