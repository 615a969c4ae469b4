/*
 *  lib.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Weather dashboard renderer for two-color e-paper panels
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

pub mod config;
pub mod constants;
pub mod deutils;
pub mod display;
pub mod iconprep;
pub mod iconstore;
#[cfg(feature = "svg-icons")]
pub mod svgimage;
pub mod vframebuf;
pub mod weather;

pub use display::{Dashboard, Planes, RenderContext, Renderer};
pub use iconprep::{normalize_icon, IconAsset, NormalizeOptions};
pub use iconstore::{DirIconStore, IconStore, MemoryIconStore};
pub use weather::{WeatherError, WeatherSummary};
