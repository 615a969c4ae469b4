/*
 *  display/factory.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Build a panel driver from configuration
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

use std::path::PathBuf;

use log::info;

use crate::config::{Config, DriverKind};
use crate::display::drivers::{MockDriver, RawFileDriver};
use crate::display::traits::PanelDriver;

/// Type alias for boxed panel driver trait objects
pub type BoxedDriver = Box<dyn PanelDriver>;

/// Factory for creating panel drivers from configuration
pub struct PanelDriverFactory;

impl PanelDriverFactory {
    /// Create the configured driver at the panel's native size
    pub fn create_from_config(config: &Config) -> BoxedDriver {
        let (width, height) = config.native_size();
        Self::create(config.driver(), width, height, config.output_dir(), &config.output_prefix())
    }

    pub fn create(
        kind: DriverKind,
        width: u32,
        height: u32,
        dir: PathBuf,
        prefix: &str,
    ) -> BoxedDriver {
        info!("Creating {:?} panel driver {}x{}", kind, width, height);
        match kind {
            DriverKind::RawFile => Box::new(RawFileDriver::new(width, height, dir, prefix)),
            DriverKind::Mock => Box::new(MockDriver::new(width, height)),
        }
    }
}
