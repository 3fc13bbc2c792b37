use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::post};
use base64::Engine as _;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lifegrid::{Engine, EngineError, EngineOptions, GridConfig, PublishMode};

type Shared = Arc<Mutex<Option<Engine>>>;

#[derive(Deserialize)]
struct CreateRequest {
    #[serde(flatten)]
    grid: GridConfig,
    #[serde(default)]
    options: EngineOptions,
}

#[derive(Deserialize)]
struct StepRequest {
    generations: Option<u64>,
}

#[derive(Serialize)]
struct FrameResponse {
    generation: u64,
    population: usize,
    width: usize,
    height: usize,
    data_url: String,
    timings: Vec<TimingEntry>,
}

#[derive(Serialize)]
struct TimingEntry {
    name: String,
    ms: f64,
}

struct ApiError(StatusCode, String);

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        let status = match e {
            EngineError::InvalidConfig(_) | EngineError::PreconditionViolation(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_server_error() {
            error!(status = %self.0, "{}", self.1);
        }
        (self.0, self.1).into_response()
    }
}

fn encode_png(rgba: &[u8], w: usize, h: usize) -> Result<String, ApiError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(rgba, w as u32, h as u32, image::ExtendedColorType::Rgba8)
        .map_err(|e| ApiError(StatusCode::INTERNAL_SERVER_ERROR, format!("PNG encode failed: {e}")))?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    Ok(format!("data:image/png;base64,{}", b64))
}

fn frame(engine: &Engine, timings: Vec<TimingEntry>) -> Result<FrameResponse, ApiError> {
    let buffer = engine.shared_pixel_buffer()?;
    let (w, h) = (buffer.width(), buffer.height());
    let data_url = buffer.read(|rgba| encode_png(rgba, w, h))??;
    Ok(FrameResponse {
        generation: engine.generation(),
        population: engine.population(),
        width: w,
        height: h,
        data_url,
        timings,
    })
}

fn lock(state: &Shared) -> Result<std::sync::MutexGuard<'_, Option<Engine>>, ApiError> {
    state
        .lock()
        .map_err(|_| ApiError(StatusCode::INTERNAL_SERVER_ERROR, "engine lock poisoned".into()))
}

async fn run_blocking<T: Send + 'static>(
    f: impl FnOnce() -> Result<T, ApiError> + Send + 'static,
) -> Result<T, ApiError> {
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
}

async fn create_handler(
    State(state): State<Shared>,
    Json(req): Json<CreateRequest>,
) -> Result<Json<FrameResponse>, ApiError> {
    let response = run_blocking(move || {
        // this host always reads frames from the shared buffer
        let options = EngineOptions {
            publish_mode: PublishMode::SharedBuffer,
            ..req.options
        };
        let engine = Engine::create(req.grid, options)?;
        let response = frame(&engine, Vec::new())?;
        *lock(&state)? = Some(engine);
        Ok(response)
    })
    .await?;
    Ok(Json(response))
}

async fn step_handler(
    State(state): State<Shared>,
    Json(req): Json<StepRequest>,
) -> Result<Json<FrameResponse>, ApiError> {
    let generations = req.generations.unwrap_or(1);
    let response = run_blocking(move || {
        let mut guard = lock(&state)?;
        let engine = guard
            .as_mut()
            .ok_or_else(|| ApiError(StatusCode::CONFLICT, "no engine; POST /api/create first".into()))?;

        let mut totals = [("compute", 0.0), ("swap", 0.0), ("publish", 0.0)];
        for _ in 0..generations {
            for t in engine.step_timed()? {
                if let Some(slot) = totals.iter_mut().find(|(name, _)| *name == t.name) {
                    slot.1 += t.ms;
                }
            }
        }
        let timings = totals
            .iter()
            .map(|(name, ms)| TimingEntry {
                name: name.to_string(),
                ms: *ms,
            })
            .collect();
        frame(engine, timings)
    })
    .await?;
    Ok(Json(response))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let state: Shared = Arc::new(Mutex::new(None));
    let app = Router::new()
        .route("/api/create", post(create_handler))
        .route("/api/step", post(step_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("lifegrid server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
