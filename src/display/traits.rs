/*
 *  display/traits.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Panel driver abstraction for two-plane e-paper displays
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

use crate::display::error::DisplayError;

/// Panel geometry and behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelCapabilities {
    /// Native landscape width in pixels
    pub width: u32,

    /// Native landscape height in pixels
    pub height: u32,

    /// Whether the panel has an accent (red) plane
    pub tri_color: bool,

    /// Whether the panel has a low power sleep mode
    pub supports_sleep: bool,
}

impl PanelCapabilities {
    /// Bytes of one packed plane, rows padded to whole bytes
    pub fn plane_bytes(&self) -> usize {
        crate::display::planes::packed_len(self.width, self.height)
    }
}

/// Minimal hardware abstraction every panel driver implements
///
/// Buffers are packed row-major, MSB first, a set bit is background.
pub trait PanelDriver: Send {
    fn capabilities(&self) -> &PanelCapabilities;

    /// Returns the native dimensions as (width, height)
    fn dimensions(&self) -> (u32, u32) {
        let caps = self.capabilities();
        (caps.width, caps.height)
    }

    /// Wake and configure the panel
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Full refresh with a black and a red plane
    fn display(&mut self, black: &[u8], red: &[u8]) -> Result<(), DisplayError>;

    /// Blank both planes
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Enter low power mode; panels without one ignore this
    fn sleep(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }
}

/// Check a packed buffer against the panel size
pub fn check_buffer(caps: &PanelCapabilities, buffer: &[u8]) -> Result<(), DisplayError> {
    let expected = caps.plane_bytes();
    if buffer.len() != expected {
        return Err(DisplayError::BufferSizeMismatch { expected, actual: buffer.len() });
    }
    Ok(())
}
