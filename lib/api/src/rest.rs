//! REST transport over the query surface.
//!
//! Thin handlers: decode the request, delegate to [`SourcingOps`], map
//! the typed error onto a status code. No analytics logic lives here.

use crate::ops::SourcingOps;
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use partx_core::Error;
use partx_similarity::CandidateScope;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

#[derive(Deserialize)]
struct RecommendQuery {
    category: String,
    #[serde(default)]
    min_rating: f64,
    #[serde(default = "default_max_lead_time")]
    max_lead_time: f64,
}

fn default_max_lead_time() -> f64 {
    30.0
}

#[derive(Deserialize)]
struct RetoolingRequest {
    current_region: String,
    target_region: String,
    part_family: String,
}

#[derive(Deserialize)]
struct SimilarQuery {
    #[serde(default = "default_k")]
    k: usize,
    #[serde(default)]
    min_score: f64,
    /// Optional candidate restrictions.
    category: Option<String>,
    business_unit: Option<String>,
}

impl SimilarQuery {
    fn scope(&self) -> Option<CandidateScope> {
        if self.category.is_none() && self.business_unit.is_none() {
            return None;
        }
        Some(CandidateScope {
            category: self.category.clone(),
            business_unit: self.business_unit.clone(),
        })
    }
}

fn default_k() -> usize {
    10
}

fn error_response(err: &Error) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    if err.is_not_found() {
        return HttpResponse::NotFound().json(body);
    }
    match err {
        Error::Validation(_) | Error::InvalidDimension { .. } => {
            HttpResponse::BadRequest().json(body)
        }
        Error::ComputationTimeout { .. } => HttpResponse::GatewayTimeout().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(ops: Arc<SourcingOps>, port: u16) -> std::io::Result<()> {
        info!(port, "starting REST API");
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(ops.clone()))
                .route("/health", web::get().to(health))
                .route("/suppliers/{id}/risk", web::get().to(assess_risk))
                .route("/suppliers/recommend", web::get().to(recommend))
                .route("/retooling/estimate", web::post().to(retooling_estimate))
                .route("/scenarios/{id}", web::get().to(get_scenario))
                .route("/parts/{id}/similar", web::get().to(find_similar))
                .route("/dedup/run", web::post().to(run_dedup))
                .route("/spend/maverick", web::get().to(maverick_spend))
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

async fn health(ops: web::Data<Arc<SourcingOps>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "parts": ops.catalog().part_count(),
        "suppliers": ops.catalog().supplier_count(),
        "catalog_version": ops.catalog().version(),
    })))
}

async fn assess_risk(
    ops: web::Data<Arc<SourcingOps>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let supplier_id = path.into_inner();
    match ops.assess_supplier_risk(&supplier_id) {
        Ok(assessment) => Ok(HttpResponse::Ok().json(assessment)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn recommend(
    ops: web::Data<Arc<SourcingOps>>,
    query: web::Query<RecommendQuery>,
) -> ActixResult<HttpResponse> {
    match ops.recommend_supplier(&query.category, query.min_rating, query.max_lead_time) {
        Ok(ranked) => Ok(HttpResponse::Ok().json(serde_json::json!({ "result": ranked }))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn retooling_estimate(
    ops: web::Data<Arc<SourcingOps>>,
    req: web::Json<RetoolingRequest>,
) -> ActixResult<HttpResponse> {
    match ops.calculate_retooling_cost(&req.current_region, &req.target_region, &req.part_family) {
        Ok(cost) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "estimated_cost": cost,
            "current_region": req.current_region,
            "target_region": req.target_region,
            "part_family": req.part_family,
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn get_scenario(
    ops: web::Data<Arc<SourcingOps>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let scenario_id = path.into_inner();
    match ops.get_consolidation_scenario(&scenario_id) {
        Ok(evaluation) => Ok(HttpResponse::Ok().json(evaluation)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn find_similar(
    ops: web::Data<Arc<SourcingOps>>,
    path: web::Path<String>,
    query: web::Query<SimilarQuery>,
) -> ActixResult<HttpResponse> {
    let part_id = path.into_inner();
    match ops.find_similar_parts(&part_id, query.k, query.min_score, query.scope()) {
        Ok(matches) => Ok(HttpResponse::Ok().json(serde_json::json!({ "result": matches }))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn run_dedup(ops: web::Data<Arc<SourcingOps>>) -> ActixResult<HttpResponse> {
    // Heavy computation off the actix worker thread; the single-flight
    // cache already serializes concurrent runs per snapshot.
    let ops = Arc::clone(ops.get_ref());
    let summary = web::block(move || ops.run_dedup_summary()).await?;
    match summary {
        Ok(summary) => Ok(HttpResponse::Ok().json(summary)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn maverick_spend(ops: web::Data<Arc<SourcingOps>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ops.maverick_spend()))
}
