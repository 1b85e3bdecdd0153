use axum::extract::{Path, State};
use axum::Json;
use chrono::DateTime;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::summarize_rank_distribution;
use crate::models::{DatasetMetadata, RankDistributionSummary};

#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    /// Full encoded name, used as the dataset key
    pub key: String,
    pub info: DatasetMetadata,
    pub timestamp: i64,
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DatasetsResponse {
    pub latest: Option<String>,
    pub datasets: Vec<DatasetSummary>,
}

/// Every dataset, newest first.
pub async fn list_datasets(State(state): State<AppState>) -> Json<DatasetsResponse> {
    let corpus = &state.corpus;

    let datasets = corpus
        .names_by_recency()
        .into_iter()
        .filter_map(|name| {
            let record = corpus.get(name)?;
            let mut info = DatasetMetadata::parse(name);
            info.ignored = record.ignored;
            Some(DatasetSummary {
                key: name.to_string(),
                info,
                timestamp: record.timestamp,
                created_at: DateTime::from_timestamp(record.timestamp, 0).map(|t| t.to_rfc3339()),
            })
        })
        .collect();

    Json(DatasetsResponse {
        latest: corpus.latest_name().map(str::to_string),
        datasets,
    })
}

/// Player counts per rank with mean rank and peak count.
pub async fn rank_distribution(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<RankDistributionSummary>, ApiError> {
    let record = state
        .corpus
        .get(&name)
        .ok_or_else(|| ApiError::NotFound(format!("dataset {}", name)))?;

    Ok(Json(summarize_rank_distribution(&record.rank_distribution)))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::{get_json, state, GOR_SET, LOG_SET};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_list_datasets_newest_first() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(state(tmp.path()));

        let (status, json) = get_json(app, "/api/datasets").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["latest"], LOG_SET);
        let datasets = json["datasets"].as_array().unwrap();
        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[0]["key"], LOG_SET);
        assert_eq!(datasets[0]["info"]["rating_system"], "log");
        assert_eq!(datasets[0]["info"]["log_args"]["c"], 31.25);
        assert_eq!(datasets[0]["info"]["ignored"], 4);
        assert_eq!(datasets[1]["key"], GOR_SET);
        assert_eq!(datasets[1]["created_at"], "1970-01-01T00:16:40+00:00");
    }

    #[tokio::test]
    async fn test_rank_distribution() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(state(tmp.path()));

        let uri = format!("/api/datasets/{}/rank-distribution", LOG_SET);
        let (status, json) = get_json(app, &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["max_count"], 3);
        assert_eq!(json["total_players"], 4);
        assert_eq!(json["mean_rank"], 7.5);
        assert_eq!(json["players"].as_array().unwrap().len(), 40);
    }

    #[tokio::test]
    async fn test_rank_distribution_empty_is_null_mean() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(state(tmp.path()));

        let uri = format!("/api/datasets/{}/rank-distribution", GOR_SET);
        let (status, json) = get_json(app, &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["mean_rank"].is_null());
        assert_eq!(json["max_count"], 0);
    }

    #[tokio::test]
    async fn test_rank_distribution_unknown_dataset() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(state(tmp.path()));

        let (status, json) = get_json(app, "/api/datasets/nope/rank-distribution").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }
}
