use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use log::info;
use serde::Deserialize;
use std::fmt::Display;
use std::sync::{Mutex, MutexGuard};

use crate::bracket::types::{GameKind, Player, Schedule};
use crate::bracket::{
    balance_report, generate_fixed_table_bracket, generate_manual_bracket, generate_random_bracket,
    rankings, recommend, record_score, rng_from_seed, RandomBracketOptions,
};
use crate::config::EngineConfig;

// In-memory storage for the latest bracket
pub struct AppState {
    pub schedule: Mutex<Option<Schedule>>,
    pub config: EngineConfig,
}

impl AppState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            schedule: Mutex::new(None),
            config,
        }
    }

    fn schedule(&self) -> Result<MutexGuard<'_, Option<Schedule>>> {
        self.schedule
            .lock()
            .map_err(|_| actix_web::error::ErrorInternalServerError("schedule lock poisoned"))
    }
}

#[derive(Deserialize)]
pub struct RandomRequest {
    players: Vec<Player>,
    #[serde(flatten)]
    options: RandomBracketOptions,
    seed: Option<u64>,
}

#[derive(Deserialize)]
pub struct FixedRequest {
    players: Vec<Player>,
    court_count: u32,
    #[serde(default)]
    use_skill_ranking: bool,
    seed: Option<u64>,
}

#[derive(Deserialize)]
pub struct ManualRequest {
    players: Vec<Player>,
    court_count: u32,
    round_count: u32,
    kinds: Vec<GameKind>,
    seed: Option<u64>,
}

#[derive(Deserialize)]
pub struct ScoreRequest {
    game_id: String,
    score_a: u32,
    score_b: u32,
}

#[derive(Deserialize)]
pub struct RecommendRequest {
    males: usize,
    females: usize,
    court_count: u32,
    round_count: u32,
}

fn bad_request(error: impl Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({"success": false, "error": error.to_string()}))
}

fn no_schedule() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({"success": false, "error": "No bracket generated yet"}))
}

/// Replaces the stored bracket and returns it
fn store(state: &AppState, schedule: Schedule) -> Result<HttpResponse> {
    let response = HttpResponse::Ok().json(serde_json::json!({"success": true, "schedule": &schedule}));
    *state.schedule()? = Some(schedule);
    Ok(response)
}

async fn create_random(req: web::Json<RandomRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let req = req.into_inner();
    let mut rng = rng_from_seed(req.seed);
    match generate_random_bracket(&req.players, &req.options, &state.config, &mut rng) {
        Ok(schedule) => store(&state, schedule),
        Err(e) => Ok(bad_request(e)),
    }
}

async fn create_fixed(req: web::Json<FixedRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let req = req.into_inner();
    let mut rng = rng_from_seed(req.seed);
    match generate_fixed_table_bracket(&req.players, req.court_count, req.use_skill_ranking, &mut rng) {
        Ok(schedule) => store(&state, schedule),
        Err(e) => Ok(bad_request(e)),
    }
}

async fn create_manual(req: web::Json<ManualRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let req = req.into_inner();
    let mut rng = rng_from_seed(req.seed);
    match generate_manual_bracket(
        &req.players,
        req.court_count,
        req.round_count,
        &req.kinds,
        &state.config,
        &mut rng,
    ) {
        Ok(schedule) => store(&state, schedule),
        Err(e) => Ok(bad_request(e)),
    }
}

async fn get_bracket(state: web::Data<AppState>) -> Result<HttpResponse> {
    let schedule = state.schedule()?;
    match schedule.as_ref() {
        Some(schedule) => Ok(HttpResponse::Ok().json(schedule)),
        None => Ok(no_schedule()),
    }
}

async fn post_score(req: web::Json<ScoreRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut guard = state.schedule()?;
    let Some(schedule) = guard.as_mut() else {
        return Ok(no_schedule());
    };
    match record_score(schedule, &req.game_id, req.score_a, req.score_b) {
        Ok(game) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "game": game}))),
        Err(e) => Ok(bad_request(e)),
    }
}

async fn get_rankings(state: web::Data<AppState>) -> Result<HttpResponse> {
    let schedule = state.schedule()?;
    match schedule.as_ref() {
        Some(schedule) => Ok(HttpResponse::Ok().json(rankings(schedule))),
        None => Ok(no_schedule()),
    }
}

async fn get_balance(state: web::Data<AppState>) -> Result<HttpResponse> {
    let schedule = state.schedule()?;
    match schedule.as_ref() {
        Some(schedule) => Ok(HttpResponse::Ok().json(balance_report(schedule))),
        None => Ok(no_schedule()),
    }
}

async fn post_recommendations(req: web::Json<RecommendRequest>) -> Result<HttpResponse> {
    match recommend(req.males, req.females, req.court_count, req.round_count) {
        Ok(recs) => Ok(HttpResponse::Ok().json(recs)),
        Err(e) => Ok(bad_request(e)),
    }
}

/// Registers the JSON API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/bracket", web::get().to(get_bracket))
        .route("/api/bracket/random", web::post().to(create_random))
        .route("/api/bracket/fixed", web::post().to(create_fixed))
        .route("/api/bracket/manual", web::post().to(create_manual))
        .route("/api/bracket/score", web::post().to(post_score))
        .route("/api/rankings", web::get().to(get_rankings))
        .route("/api/balance", web::get().to(get_balance))
        .route("/api/recommendations", web::post().to(post_recommendations));
}

pub async fn start_server(port: u16, config: EngineConfig) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(config));
    info!("listening on 0.0.0.0:{}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
