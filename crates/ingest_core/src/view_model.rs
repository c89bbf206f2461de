use crate::Notification;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormViewModel {
    pub title: &'static str,
    pub product_type_options: Vec<String>,
    pub product_type: String,
    pub product_structure_options: Vec<String>,
    pub product_structure: String,
    pub selected_file_name: Option<String>,
    /// Progress bar is only shown while an upload is in flight.
    pub show_progress: bool,
    pub upload_percent: u8,
    pub is_ingested: bool,
    pub product_id: String,
    pub last_notification: Option<Notification>,
    pub dirty: bool,
}
