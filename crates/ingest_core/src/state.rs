use std::path::{Path, PathBuf};

use crate::view_model::FormViewModel;
use crate::Notification;

pub const FORM_TITLE: &str = "Product Ingest with Single File";

/// A product type as offered by the directory service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductType {
    pub name: String,
}

impl ProductType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Ingestion layout mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductStructure {
    #[default]
    Flat,
}

impl ProductStructure {
    /// Structures shown in the selector.
    pub const OFFERED: [ProductStructure; 1] = [ProductStructure::Flat];

    pub fn as_str(self) -> &'static str {
        match self {
            ProductStructure::Flat => "Flat",
        }
    }
}

/// A file picked by the user. Nothing about it is checked until upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, file_name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Percentage of an upload, `round(loaded * 100 / total)` clamped to 0..=100.
///
/// A zero `total` has no meaningful ratio and maps to 0.
pub fn upload_percent(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (loaded as f64 * 100.0 / total as f64).round();
    percent.clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    selected_file: Option<SelectedFile>,
    product_id: String,
    product_type: String,
    product_structure: String,
    is_ingested: bool,
    is_submitting: bool,
    upload_percent: u8,
    available_product_types: Vec<ProductType>,
    last_notification: Option<Notification>,
    dirty: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            selected_file: None,
            product_id: String::new(),
            product_type: String::new(),
            product_structure: ProductStructure::default().as_str().to_string(),
            is_ingested: false,
            is_submitting: false,
            upload_percent: 0,
            available_product_types: Vec::new(),
            last_notification: None,
            dirty: false,
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> FormViewModel {
        FormViewModel {
            title: FORM_TITLE,
            product_type_options: self
                .available_product_types
                .iter()
                .map(|product_type| product_type.name.clone())
                .collect(),
            product_type: self.product_type.clone(),
            product_structure_options: ProductStructure::OFFERED
                .iter()
                .map(|structure| structure.as_str().to_string())
                .collect(),
            product_structure: self.product_structure.clone(),
            selected_file_name: self
                .selected_file
                .as_ref()
                .map(|file| file.file_name.clone()),
            show_progress: self.is_submitting,
            upload_percent: self.upload_percent,
            is_ingested: self.is_ingested,
            product_id: self.product_id.clone(),
            last_notification: self.last_notification.clone(),
            dirty: self.dirty,
        }
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn product_type(&self) -> &str {
        &self.product_type
    }

    pub fn product_structure(&self) -> &str {
        &self.product_structure
    }

    pub fn is_ingested(&self) -> bool {
        self.is_ingested
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn upload_percent(&self) -> u8 {
        self.upload_percent
    }

    pub fn available_product_types(&self) -> &[ProductType] {
        &self.available_product_types
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.last_notification.as_ref()
    }

    /// Returns whether anything visible changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_product_types(&mut self, product_types: Vec<ProductType>) {
        if let Some(first) = product_types.first() {
            self.product_type = first.name.clone();
        }
        self.available_product_types = product_types;
        self.mark_dirty();
    }

    pub(crate) fn select_files(&mut self, files: Vec<SelectedFile>) {
        self.selected_file = files.into_iter().next();
        self.mark_dirty();
    }

    pub(crate) fn set_product_type(&mut self, product_type: String) {
        self.product_type = product_type;
        self.mark_dirty();
    }

    pub(crate) fn set_product_structure(&mut self, product_structure: String) {
        self.product_structure = product_structure;
        self.mark_dirty();
    }

    pub(crate) fn begin_submit(&mut self) {
        self.is_submitting = true;
        self.is_ingested = false;
        self.mark_dirty();
    }

    /// Returns false when no upload is in flight and the event was dropped.
    pub(crate) fn apply_progress(&mut self, loaded: u64, total: u64) -> bool {
        if !self.is_submitting {
            return false;
        }
        let percent = upload_percent(loaded, total);
        if percent != self.upload_percent {
            self.upload_percent = percent;
            self.mark_dirty();
        }
        true
    }

    pub(crate) fn complete_ingest(&mut self, product_id: String) -> Notification {
        let notification = Notification::ingested(&product_id);
        self.product_id = product_id;
        self.is_submitting = false;
        self.is_ingested = true;
        self.selected_file = None;
        self.upload_percent = 0;
        self.last_notification = Some(notification.clone());
        self.mark_dirty();
        notification
    }

    pub(crate) fn fail_ingest(&mut self, error: &str) -> Notification {
        let notification = Notification::ingest_failed(error);
        self.is_ingested = false;
        self.upload_percent = 0;
        self.is_submitting = false;
        self.last_notification = Some(notification.clone());
        self.mark_dirty();
        notification
    }

    pub(crate) fn dismiss_notification(&mut self) {
        if self.last_notification.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn ingest_request(&self) -> (Option<SelectedFile>, String, String) {
        (
            self.selected_file.clone(),
            self.product_type.clone(),
            self.product_structure.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(upload_percent(1, 200), 1);
        assert_eq!(upload_percent(1, 3), 33);
        assert_eq!(upload_percent(2, 3), 67);
        assert_eq!(upload_percent(100, 100), 100);
    }

    #[test]
    fn percent_handles_degenerate_totals() {
        assert_eq!(upload_percent(0, 0), 0);
        assert_eq!(upload_percent(10, 0), 0);
        assert_eq!(upload_percent(150, 100), 100);
    }

    #[test]
    fn selected_file_name_comes_from_last_component() {
        let file = SelectedFile::from_path("/data/incoming/report.txt");
        assert_eq!(file.file_name, "report.txt");
        assert_eq!(file.path(), Path::new("/data/incoming/report.txt"));
    }
}
