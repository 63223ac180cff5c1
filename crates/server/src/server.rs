use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{bazar, deposits, expenses, meals, members, mess, months, reports, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

/// Resolve the Basic credentials to a `users` row and store it in the
/// request extensions.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|err| {
            tracing::error!("failed to look up user: {err}");
            StatusCode::UNAUTHORIZED
        })?;

    let Some(user) = user else {
        tracing::warn!(username = auth_header.username(), "rejected credentials");
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/messes", get(mess::list).post(mess::mess_new))
        .route(
            "/messes/{mess_id}",
            get(mess::get).patch(mess::rename).delete(mess::delete),
        )
        .route(
            "/messes/{mess_id}/months",
            get(months::list).post(months::month_new),
        )
        .route(
            "/messes/{mess_id}/months/{month_id}",
            axum::routing::delete(months::delete),
        )
        .route(
            "/messes/{mess_id}/members",
            get(members::list).post(members::member_new),
        )
        .route(
            "/messes/{mess_id}/members/{member_id}",
            patch(members::rename).delete(members::delete),
        )
        .route(
            "/messes/{mess_id}/months/{month_id}/meals",
            get(meals::list).post(meals::meal_day_new),
        )
        .route(
            "/messes/{mess_id}/meals/{meal_day_id}",
            put(meals::update).delete(meals::delete),
        )
        .route(
            "/messes/{mess_id}/months/{month_id}/bazar",
            get(bazar::list).post(bazar::bazar_new),
        )
        .route(
            "/messes/{mess_id}/bazar/{bazar_id}",
            put(bazar::update).delete(bazar::delete),
        )
        .route(
            "/messes/{mess_id}/months/{month_id}/deposits",
            get(deposits::list).post(deposits::deposit_new),
        )
        .route(
            "/messes/{mess_id}/deposits/{deposit_id}",
            put(deposits::update).delete(deposits::delete),
        )
        .route(
            "/messes/{mess_id}/months/{month_id}/expenses",
            get(expenses::list).post(expenses::expense_new),
        )
        .route(
            "/messes/{mess_id}/expenses/{expense_id}",
            put(expenses::update).delete(expenses::delete),
        )
        .route(
            "/messes/{mess_id}/months/{month_id}/meal-rate",
            get(reports::meal_rate),
        )
        .route(
            "/messes/{mess_id}/months/{month_id}/report",
            get(reports::monthly_report),
        )
        .route(
            "/messes/{mess_id}/months/{month_id}/dashboard",
            get(reports::dashboard),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

/// Build the API router around an engine and the database holding `users`.
pub fn app(engine: Engine, db: DatabaseConnection) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
        db,
    })
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine, db)).await
}
