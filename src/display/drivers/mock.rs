/*
 *  display/drivers/mock.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock panel driver for testing
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

use std::sync::{Arc, Mutex, MutexGuard};

use crate::display::error::DisplayError;
use crate::display::planes::{from_packed_bytes, Planes};
use crate::display::traits::{check_buffer, PanelCapabilities, PanelDriver};

/// Mock panel driver
///
/// Simulates a panel without hardware. Every call is recorded in shared
/// state so tests can inspect what was sent after handing the driver off.
#[derive(Debug, Clone)]
pub struct MockDriver {
    capabilities: PanelCapabilities,
    state: Arc<Mutex<MockDriverState>>,
}

/// Internal state for the mock driver (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockDriverState {
    /// Number of times init() was called
    pub init_count: usize,

    /// Number of full refreshes
    pub display_count: usize,

    /// Number of times clear() was called
    pub clear_count: usize,

    /// Number of times sleep() was called
    pub sleep_count: usize,

    /// Whether the panel is initialized and awake
    pub is_initialized: bool,

    /// Last packed buffers received
    pub last_black: Option<Vec<u8>>,
    pub last_red: Option<Vec<u8>>,

    /// Simulate failures (for error testing)
    pub simulate_init_failure: bool,
    pub simulate_display_failure: bool,
}

impl MockDriver {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            capabilities: PanelCapabilities {
                width,
                height,
                tri_color: true,
                supports_sleep: true,
            },
            state: Arc::new(Mutex::new(MockDriverState::default())),
        }
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockDriverState>> {
        Arc::clone(&self.state)
    }

    /// Last frame received, unpacked back into planes
    pub fn last_planes(&self) -> Result<Option<Planes>, DisplayError> {
        let state = self.lock()?;
        let (Some(black), Some(red)) = (&state.last_black, &state.last_red) else {
            return Ok(None);
        };
        let (w, h) = (self.capabilities.width, self.capabilities.height);
        Ok(Some(Planes {
            black: from_packed_bytes(black, w, h)?,
            red: from_packed_bytes(red, w, h)?,
        }))
    }

    fn lock(&self) -> Result<MutexGuard<'_, MockDriverState>, DisplayError> {
        self.state
            .lock()
            .map_err(|_| DisplayError::Other("mock driver state poisoned".to_string()))
    }
}

impl PanelDriver for MockDriver {
    fn capabilities(&self) -> &PanelCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        let mut state = self.lock()?;
        if state.simulate_init_failure {
            return Err(DisplayError::InitializationFailed("Simulated init failure".to_string()));
        }
        state.init_count += 1;
        state.is_initialized = true;
        Ok(())
    }

    fn display(&mut self, black: &[u8], red: &[u8]) -> Result<(), DisplayError> {
        check_buffer(&self.capabilities, black)?;
        check_buffer(&self.capabilities, red)?;
        let mut state = self.lock()?;
        if !state.is_initialized {
            return Err(DisplayError::NotInitialized);
        }
        if state.simulate_display_failure {
            return Err(DisplayError::TransferFailed("Simulated display failure".to_string()));
        }
        state.display_count += 1;
        state.last_black = Some(black.to_vec());
        state.last_red = Some(red.to_vec());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        let blank = vec![0xFF; self.capabilities.plane_bytes()];
        {
            let mut state = self.lock()?;
            state.clear_count += 1;
        }
        self.display(&blank, &blank)
    }

    fn sleep(&mut self) -> Result<(), DisplayError> {
        let mut state = self.lock()?;
        state.sleep_count += 1;
        state.is_initialized = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_driver_creation() {
        let driver = MockDriver::new(250, 122);
        assert_eq!(driver.dimensions(), (250, 122));
        assert_eq!(driver.capabilities().plane_bytes(), 32 * 122);
        assert!(driver.last_planes().unwrap().is_none());
    }

    #[test]
    fn test_display_requires_init() {
        let mut driver = MockDriver::new(16, 2);
        let buf = vec![0xFF; 4];
        assert!(matches!(driver.display(&buf, &buf), Err(DisplayError::NotInitialized)));
        driver.init().unwrap();
        driver.display(&buf, &buf).unwrap();
        assert_eq!(driver.state().lock().unwrap().display_count, 1);
    }

    #[test]
    fn test_buffer_size_mismatch() {
        let mut driver = MockDriver::new(16, 2);
        driver.init().unwrap();
        assert!(matches!(
            driver.display(&[0xFF; 3], &[0xFF; 4]),
            Err(DisplayError::BufferSizeMismatch { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_sleep_needs_reinit() {
        let mut driver = MockDriver::new(8, 1);
        driver.init().unwrap();
        driver.sleep().unwrap();
        assert!(driver.display(&[0xFF], &[0xFF]).is_err());
        let state = driver.state();
        assert_eq!(state.lock().unwrap().sleep_count, 1);
    }

    #[test]
    fn test_mock_driver_simulated_failure() {
        let mut driver = MockDriver::new(8, 1);
        driver.state().lock().unwrap().simulate_init_failure = true;
        assert!(driver.init().is_err());
        driver.state().lock().unwrap().simulate_init_failure = false;
        driver.init().unwrap();
        driver.state().lock().unwrap().simulate_display_failure = true;
        assert!(matches!(driver.display(&[0xFF], &[0xFF]), Err(DisplayError::TransferFailed(_))));
    }

    #[test]
    fn test_clear_sends_blank_frame() {
        let mut driver = MockDriver::new(8, 1);
        driver.init().unwrap();
        driver.clear().unwrap();
        let state = driver.state();
        let state = state.lock().unwrap();
        assert_eq!(state.clear_count, 1);
        assert_eq!(state.last_red.as_deref(), Some(&[0xFF][..]));
    }
}
