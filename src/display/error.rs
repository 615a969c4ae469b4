/*
 *  display/error.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error types for the plane and panel subsystem
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::fmt;
use std::error::Error;

/// Unified error type for plane IO and panel operations
#[derive(Debug)]
pub enum DisplayError {
    /// Panel initialization failed
    InitializationFailed(String),

    /// Panel refused or dropped a frame
    TransferFailed(String),

    /// Operation issued before init()
    NotInitialized,

    /// Packed buffer size mismatch
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Black and red planes disagree on dimensions
    PlaneSizeMismatch { black: (u32, u32), red: (u32, u32) },

    /// Image encode/decode failure
    Image(image::ImageError),

    /// Filesystem failure
    Io(std::io::Error),

    /// Generic error with message
    Other(String),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::InitializationFailed(msg) =>
                write!(f, "Panel initialization failed: {}", msg),
            DisplayError::TransferFailed(msg) =>
                write!(f, "Panel transfer failed: {}", msg),
            DisplayError::NotInitialized =>
                write!(f, "Panel used before initialization"),
            DisplayError::BufferSizeMismatch { expected, actual } =>
                write!(f, "Buffer size mismatch: expected {} bytes, got {}", expected, actual),
            DisplayError::PlaneSizeMismatch { black, red } =>
                write!(f, "Plane size mismatch: black {}x{}, red {}x{}", black.0, black.1, red.0, red.1),
            DisplayError::Image(err) =>
                write!(f, "Image error: {}", err),
            DisplayError::Io(err) =>
                write!(f, "I/O error: {}", err),
            DisplayError::Other(msg) =>
                write!(f, "{}", msg),
        }
    }
}

impl Error for DisplayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DisplayError::Image(err) => Some(err),
            DisplayError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<image::ImageError> for DisplayError {
    fn from(err: image::ImageError) -> Self {
        DisplayError::Image(err)
    }
}

impl From<std::io::Error> for DisplayError {
    fn from(err: std::io::Error) -> Self {
        DisplayError::Io(err)
    }
}
