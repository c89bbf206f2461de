//! Product ingest core: pure form state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, Notification, NotificationKind};
pub use msg::Msg;
pub use state::{
    upload_percent, FormState, ProductStructure, ProductType, SelectedFile, FORM_TITLE,
};
pub use update::update;
pub use view_model::FormViewModel;
