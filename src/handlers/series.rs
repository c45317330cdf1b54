use actix_web::{web, HttpResponse};
use tracing::warn;

use series_odds::compute_series;
use series_odds::error::AppError;
use series_odds::models::{SeriesRequest, SeriesResponse};

/// Price all markets for a series
pub async fn price_series(req: web::Json<SeriesRequest>) -> Result<HttpResponse, AppError> {
    let report = compute_series(&req).map_err(|e| {
        warn!("Rejected series request: {}", e);
        AppError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(SeriesResponse::from(&report)))
}
