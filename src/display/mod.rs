/*
 *  display/mod.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Planes, layout engine and panel dispatch
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod factory;
pub mod color;

// Two-plane canvas and its preview
pub mod planes;
pub mod compositor;

// Layout engine
pub mod layout;
pub mod fonts;
pub mod fit;
pub mod components;
pub mod renderer;

// Panel drivers and frame dispatch
pub mod drivers;
pub mod dispatch;

// Re-exports for convenience
pub use traits::{PanelDriver, PanelCapabilities};
pub use error::DisplayError;
pub use factory::{PanelDriverFactory, BoxedDriver};
pub use color::{Ink, INK, BACKGROUND};
pub use planes::{Plane, Planes};
pub use compositor::composite_preview;
pub use layout::{LayoutConfig, SizeRange};
pub use fonts::{FontCache, Typeface};
pub use renderer::{Dashboard, LayoutReport, OutputPaths, RenderContext, Renderer};
pub use dispatch::{dispatch, prepare, DispatchOptions, PackedFrame};
