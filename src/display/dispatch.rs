/*
 *  display/dispatch.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Orient, resize, pack and send a frame to the panel
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

use std::time::Duration;

use log::{info, warn};

use crate::display::error::DisplayError;
use crate::display::planes::{to_packed_bytes, Planes};
use crate::display::traits::PanelDriver;

/// How a frame is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Rotate both planes 180 degrees (panel mounted upside down)
    pub rotate_180: bool,

    /// Put the panel to sleep after the refresh
    pub sleep_after: bool,

    /// Time the waveform needs to finish before sleeping
    pub settle: Duration,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self { rotate_180: false, sleep_after: true, settle: Duration::from_secs(2) }
    }
}

/// Planes packed for the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedFrame {
    pub width: u32,
    pub height: u32,
    pub black: Vec<u8>,
    pub red: Vec<u8>,
}

/// Rotate and resize to `native`, then pack both planes
pub fn prepare(planes: &Planes, native: (u32, u32), rotate_180: bool) -> PackedFrame {
    let mut frame = if rotate_180 { planes.rotated_180() } else { planes.clone() };
    let size = frame.dimensions();
    if size != native {
        warn!(
            "Resizing planes from {}x{} to {}x{}",
            size.0, size.1, native.0, native.1
        );
        frame = frame.resized(native.0, native.1);
    }
    PackedFrame {
        width: native.0,
        height: native.1,
        black: to_packed_bytes(&frame.black),
        red: to_packed_bytes(&frame.red),
    }
}

/// Full refresh of `driver` with `planes`
pub fn dispatch(
    driver: &mut dyn PanelDriver,
    planes: &Planes,
    opts: &DispatchOptions,
) -> Result<PackedFrame, DisplayError> {
    info!("Init display...");
    driver.init()?;

    let frame = prepare(planes, driver.dimensions(), opts.rotate_180);
    info!("Updating panel... (full refresh)");
    driver.display(&frame.black, &frame.red)?;

    if !opts.settle.is_zero() {
        std::thread::sleep(opts.settle);
    }
    if opts.sleep_after {
        info!("Sleep display...");
        driver.sleep()?;
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::color::INK;
    use crate::display::planes::packed_len;

    #[test]
    fn test_prepare_packs_native_size() {
        let planes = Planes::new(250, 122);
        let frame = prepare(&planes, (250, 122), false);
        assert_eq!(frame.black.len(), packed_len(250, 122));
        assert!(frame.black.iter().all(|&b| b == 0xFF));
        assert_eq!(frame.red, frame.black);
    }

    #[test]
    fn test_prepare_rotates() {
        let mut planes = Planes::new(16, 2);
        planes.black.set_pixel(0, 0, INK);
        let frame = prepare(&planes, (16, 2), true);
        // ink moves to the last pixel of the last row
        assert_eq!(frame.black, vec![0xFF, 0xFF, 0xFF, 0xFE]);
    }

    #[test]
    fn test_prepare_resizes_to_native() {
        let mut planes = Planes::new(8, 1);
        planes.red.set_pixel(0, 0, INK);
        let frame = prepare(&planes, (16, 2), false);
        assert_eq!((frame.width, frame.height), (16, 2));
        assert_eq!(frame.red, vec![0x3F, 0xFF, 0x3F, 0xFF]);
    }
}
