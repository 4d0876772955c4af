#![warn(missing_docs)]
//! Directory based material database with a table cache.
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use log::debug;

use super::OpticalConstantTable;
use crate::error::{EllResult, EllipsError};

/// File extension of material tables.
pub const MATERIAL_FILE_EXTENSION: &str = "nk";

/// A collection of `.nk` material files in one directory.
///
/// Tables are parsed on first use and cached by their identifier (the file name). A cached table
/// stays valid until it is explicitly removed with [`MaterialLibrary::invalidate`] or
/// [`MaterialLibrary::clear`], e.g. after the file was changed on disk.
#[derive(Debug)]
pub struct MaterialLibrary {
    directory: PathBuf,
    cache: Mutex<HashMap<String, Arc<OpticalConstantTable>>>,
}
impl MaterialLibrary {
    /// Creates a new [`MaterialLibrary`] for the given directory.
    #[must_use]
    pub fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            cache: Mutex::new(HashMap::new()),
        }
    }
    /// Returns the directory of this [`MaterialLibrary`].
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }
    /// Returns the table of the material with the given identifier (file name).
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::DataFormat`] if the file does not exist, cannot
    /// be read or is malformed.
    pub fn get(&self, material: &str) -> EllResult<Arc<OpticalConstantTable>> {
        if let Some(table) = self.lock()?.get(material) {
            return Ok(table.clone());
        }
        let path = self.directory.join(material);
        if !path.is_file() {
            return Err(EllipsError::DataFormat(format!(
                "material file '{material}' not found in {}",
                self.directory.display()
            )));
        }
        let table = Arc::new(OpticalConstantTable::from_nk_file(&path)?);
        debug!("loaded material table {table}");
        self.lock()?.insert(material.to_owned(), table.clone());
        Ok(table)
    }
    /// Remove the given material from the cache. Returns `true` if it was cached.
    ///
    /// # Errors
    ///
    /// This function will return an error if the cache lock is poisoned.
    pub fn invalidate(&self, material: &str) -> EllResult<bool> {
        Ok(self.lock()?.remove(material).is_some())
    }
    /// Remove all materials from the cache.
    ///
    /// # Errors
    ///
    /// This function will return an error if the cache lock is poisoned.
    pub fn clear(&self) -> EllResult<()> {
        self.lock()?.clear();
        Ok(())
    }
    /// Check if the given material is currently cached.
    #[must_use]
    pub fn is_cached(&self, material: &str) -> bool {
        self.lock().is_ok_and(|c| c.contains_key(material))
    }
    /// Returns the sorted identifiers of all material files in the directory.
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::DataFormat`] if the directory cannot be read.
    pub fn list_materials(&self) -> EllResult<Vec<String>> {
        let entries = fs::read_dir(&self.directory).map_err(|e| {
            EllipsError::DataFormat(format!(
                "cannot read material directory {} : {e}",
                self.directory.display()
            ))
        })?;
        let mut materials: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.is_file() && p.extension().is_some_and(|e| e == MATERIAL_FILE_EXTENSION)
            })
            .filter_map(|p| p.file_name().map(|f| f.to_string_lossy().to_string()))
            .collect();
        materials.sort();
        Ok(materials)
    }
    fn lock(
        &self,
    ) -> EllResult<std::sync::MutexGuard<'_, HashMap<String, Arc<OpticalConstantTable>>>> {
        self.cache
            .lock()
            .map_err(|_| EllipsError::Other("material cache lock poisoned".into()))
    }
}
