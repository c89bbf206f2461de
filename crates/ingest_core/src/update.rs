use ingest_logging::{ingest_debug, ingest_error, ingest_info, ingest_trace};

use crate::{Effect, FormState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: FormState, msg: Msg) -> (FormState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted => vec![Effect::FetchProductTypes],
        Msg::ProductTypesLoaded(product_types) => {
            ingest_info!("Loaded {} product type(s)", product_types.len());
            state.set_product_types(product_types);
            Vec::new()
        }
        Msg::ProductTypesFailed(error) => {
            // The selector stays empty; the form remains usable.
            ingest_error!("Failed to load product types: {}", error);
            Vec::new()
        }
        Msg::FileSelected(files) => {
            state.select_files(files);
            Vec::new()
        }
        Msg::ProductTypeChanged(product_type) => {
            ingest_debug!("Product type changed to {}", product_type);
            state.set_product_type(product_type);
            Vec::new()
        }
        Msg::ProductStructureChanged(product_structure) => {
            ingest_debug!("Product structure changed to {}", product_structure);
            state.set_product_structure(product_structure);
            Vec::new()
        }
        Msg::IngestClicked => {
            // No precondition: a missing file or an in-flight upload does not block a submit.
            state.begin_submit();
            let (file, product_type, product_structure) = state.ingest_request();
            vec![Effect::Ingest {
                file,
                product_type,
                product_structure,
            }]
        }
        Msg::UploadProgress { loaded, total } => {
            if !state.apply_progress(loaded, total) {
                ingest_trace!("Dropped upload progress {}/{} outside a submit", loaded, total);
            }
            Vec::new()
        }
        Msg::IngestSucceeded { product_id } => {
            ingest_info!("Ingested product {}", product_id);
            vec![Effect::Notify(state.complete_ingest(product_id))]
        }
        Msg::IngestFailed { error } => {
            ingest_error!("Product ingestion failed: {}", error);
            vec![Effect::Notify(state.fail_ingest(&error))]
        }
        Msg::NotificationDismissed => {
            state.dismiss_notification();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
