/*
 *  iconstore.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Keyed lookup of prepared condition icons
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

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use log::{debug, warn};

use crate::iconprep::{IconAsset, IconError};

/// Read-only lookup from icon key to asset
///
/// Absence is not an error; the renderer simply leaves the slot empty.
pub trait IconStore {
    fn icon(&self, key: &str) -> Option<Arc<IconAsset>>;
}

/// Keys are short ids such as "10d"; anything path-like is refused
fn valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '@')
}

/// Icons stored as `<dir>/<key>.png`
///
/// Decoded assets are memoised, so repeated renders share one copy.
#[derive(Debug)]
pub struct DirIconStore {
    dir: PathBuf,
    loaded: RwLock<HashMap<String, Arc<IconAsset>>>,
}

impl DirIconStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), loaded: RwLock::new(HashMap::new()) }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Option<PathBuf> {
        valid_key(key).then(|| self.dir.join(format!("{key}.png")))
    }

    pub fn ensure_dir(&self) -> Result<(), IconError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|source| IconError::Io { path: self.dir.clone(), source })
    }

    /// Write an asset, replacing any memoised copy
    pub fn put(&self, key: &str, icon: &IconAsset) -> Result<PathBuf, IconError> {
        let path = self.path_for(key).ok_or_else(|| IconError::InvalidKey(key.to_string()))?;
        icon.save_png(&path)?;
        if let Ok(mut loaded) = self.loaded.write() {
            loaded.insert(key.to_string(), Arc::new(icon.clone()));
        }
        Ok(path)
    }
}

impl IconStore for DirIconStore {
    fn icon(&self, key: &str) -> Option<Arc<IconAsset>> {
        if let Some(hit) = self.loaded.read().ok().and_then(|m| m.get(key).cloned()) {
            return Some(hit);
        }
        let Some(path) = self.path_for(key) else {
            warn!("ignoring invalid icon key {:?}", key);
            return None;
        };
        if !path.is_file() {
            debug!("no icon at {}", path.display());
            return None;
        }
        match IconAsset::load_png(&path) {
            Ok(icon) => {
                let icon = Arc::new(icon);
                if let Ok(mut loaded) = self.loaded.write() {
                    loaded.insert(key.to_string(), Arc::clone(&icon));
                }
                Some(icon)
            }
            Err(e) => {
                warn!("icon {} unreadable: {}", path.display(), e);
                None
            }
        }
    }
}

/// In-memory store for tests and embedding
#[derive(Debug, Default, Clone)]
pub struct MemoryIconStore {
    icons: HashMap<String, Arc<IconAsset>>,
}

impl MemoryIconStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, icon: IconAsset) {
        self.icons.insert(key.into(), Arc::new(icon));
    }

    pub fn with(mut self, key: impl Into<String>, icon: IconAsset) -> Self {
        self.insert(key, icon);
        self
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

impl IconStore for MemoryIconStore {
    fn icon(&self, key: &str) -> Option<Arc<IconAsset>> {
        self.icons.get(key).cloned()
    }
}

/// Store without any icons
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIcons;

impl IconStore for NoIcons {
    fn icon(&self, _key: &str) -> Option<Arc<IconAsset>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn dot() -> IconAsset {
        IconAsset::from_image(GrayImage::from_fn(8, 8, |x, y| Luma([if x == y { 0 } else { 255 }])))
    }

    #[test]
    fn test_dir_store_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirIconStore::new(dir.path().join("icons"));
        store.ensure_dir().unwrap();
        let path = store.put("10d", &dot()).unwrap();
        assert!(path.ends_with("10d.png"));

        // a fresh store reads from disk
        let fresh = DirIconStore::new(dir.path().join("icons"));
        let icon = fresh.icon("10d").expect("icon on disk");
        assert_eq!(*icon, dot());
        let again = fresh.icon("10d").unwrap();
        assert!(Arc::ptr_eq(&icon, &again));
    }

    #[test]
    fn test_transparent_glyph_loads_as_paper() {
        let dir = tempfile::tempdir().unwrap();
        // transparent black everywhere except an opaque 2x2 block
        let raw = image::RgbaImage::from_fn(6, 6, |x, y| {
            let a = if (2..4).contains(&x) && (2..4).contains(&y) { 255 } else { 0 };
            image::Rgba([0, 0, 0, a])
        });
        raw.save(dir.path().join("50d.png")).unwrap();

        let icon = DirIconStore::new(dir.path()).icon("50d").expect("50d loads");
        assert_eq!(icon.ink_bounds(), Some((2, 2, 4, 4)));
        assert!(!icon.is_ink(0, 0));
    }

    #[test]
    fn test_missing_and_corrupt_are_absent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("11n.png"), b"garbage").unwrap();
        let store = DirIconStore::new(dir.path());
        assert!(store.icon("01d").is_none());
        assert!(store.icon("11n").is_none());
    }

    #[test]
    fn test_path_like_keys_refused() {
        let store = DirIconStore::new("/tmp");
        assert!(store.icon("../etc/passwd").is_none());
        assert!(store.icon("a/b").is_none());
        assert!(store.icon("").is_none());
        assert!(matches!(store.put("..", &dot()), Err(IconError::InvalidKey(_))));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryIconStore::new().with("01d", dot());
        assert_eq!(store.len(), 1);
        assert!(store.icon("01d").is_some());
        assert!(store.icon("01n").is_none());
        assert!(NoIcons.icon("01d").is_none());
    }
}
