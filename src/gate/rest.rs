//! REST routes for machines
//!
//! Every lookup that may miss goes through [`Maybe::fold`], which decides
//! between `404 Not Found` and `200 OK` in one place per handler.

use super::error::{ApiError, ApiResult};
use crate::contracts::{CreateMachineCommand, Machine, SomeData, UpdateMachineCommand};
use crate::domain::MachineService;
use crate::maybe::{Maybe, lift};
use crate::provider::AnotherDatasource;
use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub machines: Arc<dyn MachineService>,
    pub datasource: Arc<dyn AnotherDatasource>,
}

impl AppState {
    pub fn new(machines: Arc<dyn MachineService>, datasource: Arc<dyn AnotherDatasource>) -> Self {
        Self {
            machines,
            datasource,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/machines", get(list_machines).post(create_machine))
        .route(
            "/machines/:id",
            get(get_machine).put(update_machine).patch(update_machine),
        )
        .route("/somedata", get(get_some_data));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve the API until Ctrl-C
pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("Shutting down");
        })
        .await
        .context("HTTP server failed")
}

fn parse_id(id: &str) -> ApiResult<Uuid> {
    lift(Uuid::parse_str(id).ok())
        .fold(|| Err(ApiError::BadRequest(format!("'{}' is not a valid id", id))), Ok)
}

fn found_or_404(machine: Maybe<Machine>, id: String) -> Response {
    machine.fold(
        || (StatusCode::NOT_FOUND, Json(id)).into_response(),
        |machine| (StatusCode::OK, Json(machine)).into_response(),
    )
}

async fn list_machines(State(state): State<AppState>) -> ApiResult<Json<Vec<Machine>>> {
    Ok(Json(state.machines.get_machines().await?))
}

async fn get_machine(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    let parsed = parse_id(&id)?;
    let machine = state.machines.get_machine(parsed).await?;
    Ok(found_or_404(machine, id))
}

async fn create_machine(
    State(state): State<AppState>,
    Json(create): Json<CreateMachineCommand>,
) -> ApiResult<Response> {
    let machine = state.machines.add_machine(create).await?;
    log::info!("Created machine {}", machine.id);

    let location = format!("/api/machines/{}", machine.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(machine)).into_response())
}

async fn update_machine(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<UpdateMachineCommand>,
) -> ApiResult<Response> {
    if update.id != id {
        return Err(ApiError::BadRequest(format!(
            "Route id '{}' does not match body id '{}'",
            id, update.id
        )));
    }
    parse_id(&id)?;

    let machine = state.machines.update_machine(update).await?;
    Ok(found_or_404(machine, id))
}

async fn get_some_data(State(state): State<AppState>) -> ApiResult<Json<SomeData>> {
    Ok(Json(state.datasource.get_some_data().await?))
}
