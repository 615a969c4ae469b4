/*
 *  display/drivers/rawfile.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Panel driver that writes packed plane buffers to files
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

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::display::error::DisplayError;
use crate::display::traits::{check_buffer, PanelCapabilities, PanelDriver};

/// Writes `<prefix>_black.bin` and `<prefix>_red.bin`
///
/// Useful for feeding an external flasher or inspecting exactly what a
/// panel would receive.
#[derive(Debug)]
pub struct RawFileDriver {
    capabilities: PanelCapabilities,
    dir: PathBuf,
    prefix: String,
    initialized: bool,
}

impl RawFileDriver {
    pub fn new(width: u32, height: u32, dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            capabilities: PanelCapabilities {
                width,
                height,
                tri_color: true,
                supports_sleep: false,
            },
            dir: dir.into(),
            prefix: prefix.into(),
            initialized: false,
        }
    }

    pub fn black_path(&self) -> PathBuf {
        self.dir.join(format!("{}_black.bin", self.prefix))
    }

    pub fn red_path(&self) -> PathBuf {
        self.dir.join(format!("{}_red.bin", self.prefix))
    }

    fn write(path: &Path, bytes: &[u8]) -> Result<(), DisplayError> {
        fs::write(path, bytes).map_err(|e| {
            DisplayError::TransferFailed(format!("{}: {}", path.display(), e))
        })?;
        debug!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

impl PanelDriver for RawFileDriver {
    fn capabilities(&self) -> &PanelCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            DisplayError::InitializationFailed(format!("{}: {}", self.dir.display(), e))
        })?;
        self.initialized = true;
        Ok(())
    }

    fn display(&mut self, black: &[u8], red: &[u8]) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        check_buffer(&self.capabilities, black)?;
        check_buffer(&self.capabilities, red)?;
        Self::write(&self.black_path(), black)?;
        Self::write(&self.red_path(), red)?;
        info!(
            "Frame written to {} and {}",
            self.black_path().display(),
            self.red_path().display()
        );
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        let blank = vec![0xFF; self.capabilities.plane_bytes()];
        self.display(&blank, &blank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_both_planes() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = RawFileDriver::new(16, 2, dir.path().join("out"), "dash");
        driver.init().unwrap();
        driver.display(&[0x00, 0xFF, 0xFF, 0xFF], &[0xFF, 0xFF, 0xFF, 0x0F]).unwrap();
        assert_eq!(fs::read(driver.black_path()).unwrap(), vec![0x00, 0xFF, 0xFF, 0xFF]);
        assert_eq!(fs::read(driver.red_path()).unwrap(), vec![0xFF, 0xFF, 0xFF, 0x0F]);
        assert!(driver.black_path().ends_with("dash_black.bin"));
    }

    #[test]
    fn test_requires_init() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = RawFileDriver::new(8, 1, dir.path(), "x");
        assert!(matches!(driver.clear(), Err(DisplayError::NotInitialized)));
    }
}
