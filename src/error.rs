// A tiny error type so we don't rely on anyhow/thiserror.
// Every variant states *where* things went wrong.
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    WindowInit(String),   // Creating the window failed
    WindowUpdate(String), // Presenting the framebuffer failed
    AudioInit(String),    // Opening/starting the output device failed
    AudioStream(String),  // The running output stream reported a failure
    AssetLoad(String),    // Reading/decoding a bitmap file failed
    AssetFormat(String),  // The bitmap decoded but is not 32 bits per pixel
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WindowInit(s) => write!(f, "Window init error: {s}"),
            Error::WindowUpdate(s) => write!(f, "Window update error: {s}"),
            Error::AudioInit(s) => write!(f, "Audio init error: {s}"),
            Error::AudioStream(s) => write!(f, "Audio stream error: {s}"),
            Error::AssetLoad(s) => write!(f, "Asset load error: {s}"),
            Error::AssetFormat(s) => write!(f, "Asset format error: {s}"),
        }
    }
}

impl std::error::Error for Error {}
