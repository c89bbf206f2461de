use ingest_core::{FormViewModel, Notification, NotificationKind};

use super::progress::{render_bar, BAR_WIDTH};

pub fn render(view: &FormViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("=== {} ===", view.title));
    lines.push(format!(
        "Product Type      : {:<20} options: {}",
        display_or_dash(&view.product_type),
        format_options(&view.product_type_options)
    ));
    lines.push(format!(
        "Product Structure : {:<20} options: {}",
        display_or_dash(&view.product_structure),
        format_options(&view.product_structure_options)
    ));
    lines.push(format!(
        "File              : {}",
        view.selected_file_name.as_deref().unwrap_or("(none)")
    ));
    if view.show_progress {
        lines.push(progress_line(view));
    }
    if view.is_ingested {
        lines.push(format!("Last ingested     : {}", view.product_id));
    }

    lines
}

pub fn progress_line(view: &FormViewModel) -> String {
    format!("Uploading         : {}", render_bar(view.upload_percent, BAR_WIDTH))
}

/// Boxed alert the user has to acknowledge.
pub fn render_alert(notification: &Notification) -> Vec<String> {
    let heading = match notification.kind {
        NotificationKind::Success => "Ingest complete",
        NotificationKind::Failure => "Ingest failed",
    };
    let width = heading.len().max(notification.message.len());
    let border = format!("+{}+", "-".repeat(width + 2));
    vec![
        border.clone(),
        format!("| {:<width$} |", heading, width = width),
        format!("| {:<width$} |", notification.message, width = width),
        border,
        "Press Enter to dismiss.".to_string(),
    ]
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn format_options(options: &[String]) -> String {
    if options.is_empty() {
        "(none)".to_string()
    } else {
        options.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingest_core::{update, FormState, Msg, ProductType, SelectedFile};
    use pretty_assertions::assert_eq;

    fn loaded_form() -> FormState {
        let (state, _) = update(
            FormState::new(),
            Msg::ProductTypesLoaded(vec![ProductType::new("GenericFile"), ProductType::new("Met")]),
        );
        let (state, _) = update(
            state,
            Msg::FileSelected(vec![SelectedFile::from_path("/data/granule.nc")]),
        );
        state
    }

    #[test]
    fn idle_form_lists_controls_without_progress() {
        let lines = render(&loaded_form().view());

        assert_eq!(lines[0], "=== Product Ingest with Single File ===");
        assert!(lines[1].starts_with("Product Type      : GenericFile"));
        assert!(lines[1].ends_with("options: GenericFile, Met"));
        assert!(lines[2].ends_with("options: Flat"));
        assert_eq!(lines[3], "File              : granule.nc");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn submitting_form_shows_progress_bar() {
        let (state, _) = update(loaded_form(), Msg::IngestClicked);
        let (state, _) = update(
            state,
            Msg::UploadProgress {
                loaded: 50,
                total: 100,
            },
        );

        let lines = render(&state.view());
        assert_eq!(lines.len(), 5);
        assert!(lines[4].ends_with("[###############---------------]  50%"));
    }

    #[test]
    fn empty_selectors_render_placeholders() {
        let lines = render(&FormState::new().view());
        assert!(lines[1].starts_with("Product Type      : -"));
        assert!(lines[1].ends_with("options: (none)"));
        assert_eq!(lines[3], "File              : (none)");
    }

    #[test]
    fn alert_boxes_message() {
        let lines = render_alert(&Notification::ingested("urn:1234"));
        assert_eq!(lines[0], lines[3]);
        assert!(lines[2].contains("Successfully Ingested Product ID :urn:1234"));
        assert_eq!(lines[1].len(), lines[2].len());
        assert_eq!(lines[4], "Press Enter to dismiss.");
    }
}
