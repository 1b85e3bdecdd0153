use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::Selection;

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub selection: Selection,
    /// Chosen datasets after falling back to the latest one
    pub datasets: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectionUpdate {
    pub selection: Option<Selection>,
    pub datasets: Option<Vec<String>>,
}

pub async fn get_selection(State(state): State<AppState>) -> Json<SelectionResponse> {
    let store = state.selection.read().await;

    Json(SelectionResponse {
        selection: store.selection(),
        datasets: store.selected_datasets(&state.corpus),
    })
}

pub async fn put_selection(
    State(state): State<AppState>,
    Json(update): Json<SelectionUpdate>,
) -> Result<Json<SelectionResponse>, ApiError> {
    let store = state.selection.write().await;

    if let Some(selection) = &update.selection {
        store.set_selection(selection)?;
    }
    if let Some(datasets) = &update.datasets {
        store.set_selected_datasets(datasets)?;
    }

    Ok(Json(SelectionResponse {
        selection: store.selection(),
        datasets: store.selected_datasets(&state.corpus),
    }))
}
