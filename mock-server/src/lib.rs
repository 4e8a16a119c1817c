//! In-memory implementation of the workout-tracker API, used by the core
//! crate's integration tests and as a local development server.
//!
//! Behavior mirrors the production backend: form-encoded login issuing a
//! bearer token, a `detail` JSON envelope on every error, per-account data,
//! default exercises seeded at registration, server-side FK nulling when a
//! category is deleted, and `exercise_name` / `volume` computed at record
//! creation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

const DEFAULT_EXERCISES: [&str; 6] = [
    "Bench Press",
    "Squat",
    "Deadlift",
    "Pull-up",
    "Shoulder Press",
    "Barbell Row",
];

#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip)]
    password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(skip)]
    user_id: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    #[serde(skip)]
    user_id: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct Record {
    pub id: i64,
    pub date: String,
    pub exercise_id: i64,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: u32,
    pub sets: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub volume: f64,
    #[serde(skip)]
    user_id: i64,
}

#[derive(Deserialize)]
pub struct RegisterUser {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateCategory {
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateExercise {
    pub name: String,
    #[serde(default)]
    pub category_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateExercise {
    #[serde(default)]
    pub category_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateRecord {
    pub date: String,
    pub exercise_id: i64,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub reps: u32,
    #[serde(default = "default_sets")]
    pub sets: u32,
    #[serde(default)]
    pub memo: Option<String>,
}

fn default_sets() -> u32 {
    1
}

#[derive(Default)]
pub struct AppState {
    next_id: i64,
    users: Vec<User>,
    tokens: HashMap<String, i64>,
    categories: Vec<Category>,
    exercises: Vec<Exercise>,
    records: Vec<Record>,
}

impl AppState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<AppState>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(AppState::default()));
    Router::new()
        .route("/", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{id}", delete(delete_category))
        .route("/exercises", get(list_exercises).post(create_exercise))
        .route("/exercises/{id}", put(update_exercise).delete(delete_exercise))
        .route("/records", get(list_records).post(create_record))
        .route("/records/{id}", delete(delete_record))
        .route("/stats", get(stats))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// `{"detail": …}` error envelope, as the production backend sends.
fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<i64, Response> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match token.and_then(|t| state.tokens.get(t)) {
        Some(user_id) => Ok(*user_id),
        None => Err(detail(
            StatusCode::UNAUTHORIZED,
            "Invalid authentication credentials",
        )),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "message": "Workout Tracker API is running" }))
}

// --- auth ---

async fn register(State(db): State<Db>, Json(input): Json<RegisterUser>) -> Response {
    let mut state = db.write().await;
    if state.users.iter().any(|u| u.email == input.email) {
        return detail(StatusCode::BAD_REQUEST, "Email is already registered");
    }

    let id = state.next_id();
    let user = User {
        id,
        email: input.email,
        password: input.password,
    };
    state.users.push(user.clone());

    // Every new account starts with a default exercise list.
    for name in DEFAULT_EXERCISES {
        let exercise_id = state.next_id();
        state.exercises.push(Exercise {
            id: exercise_id,
            name: name.to_string(),
            category_id: None,
            user_id: id,
        });
    }

    Json(user).into_response()
}

async fn login(State(db): State<Db>, Form(input): Form<LoginForm>) -> Response {
    let mut state = db.write().await;
    let user = state
        .users
        .iter()
        .find(|u| u.email == input.username && u.password == input.password);
    let Some(user) = user else {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect email or password");
    };

    let user_id = user.id;
    let token = Uuid::new_v4().to_string();
    state.tokens.insert(token.clone(), user_id);

    Json(json!({ "access_token": token, "token_type": "bearer" })).into_response()
}

async fn me(State(db): State<Db>, headers: HeaderMap) -> Response {
    let state = db.read().await;
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.users.iter().find(|u| u.id == user_id) {
        Some(user) => Json(user.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "User not found"),
    }
}

// --- categories ---

async fn list_categories(State(db): State<Db>, headers: HeaderMap) -> Response {
    let state = db.read().await;
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let categories: Vec<&Category> = state
        .categories
        .iter()
        .filter(|c| c.user_id == user_id)
        .collect();
    Json(categories).into_response()
}

async fn create_category(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateCategory>,
) -> Response {
    let mut state = db.write().await;
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let category = Category {
        id: state.next_id(),
        name: input.name,
        user_id,
    };
    state.categories.push(category.clone());
    Json(category).into_response()
}

async fn delete_category(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let mut state = db.write().await;
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let found = state
        .categories
        .iter()
        .any(|c| c.id == id && c.user_id == user_id);
    if !found {
        return detail(StatusCode::NOT_FOUND, "Category not found");
    }

    // The backend detaches exercises itself before deleting the category.
    for exercise in &mut state.exercises {
        if exercise.category_id == Some(id) {
            exercise.category_id = None;
        }
    }
    state.categories.retain(|c| c.id != id);

    Json(json!({ "message": "Deleted" })).into_response()
}

// --- exercises ---

async fn list_exercises(State(db): State<Db>, headers: HeaderMap) -> Response {
    let state = db.read().await;
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let exercises: Vec<&Exercise> = state
        .exercises
        .iter()
        .filter(|e| e.user_id == user_id)
        .collect();
    Json(exercises).into_response()
}

async fn create_exercise(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateExercise>,
) -> Response {
    let mut state = db.write().await;
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let exercise = Exercise {
        id: state.next_id(),
        name: input.name,
        category_id: input.category_id,
        user_id,
    };
    state.exercises.push(exercise.clone());
    Json(exercise).into_response()
}

async fn update_exercise(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(input): Json<UpdateExercise>,
) -> Response {
    let mut state = db.write().await;
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let exercise = state
        .exercises
        .iter_mut()
        .find(|e| e.id == id && e.user_id == user_id);
    match exercise {
        Some(exercise) => {
            exercise.category_id = input.category_id;
            Json(exercise.clone()).into_response()
        }
        None => detail(StatusCode::NOT_FOUND, "Exercise not found"),
    }
}

async fn delete_exercise(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let mut state = db.write().await;
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let found = state
        .exercises
        .iter()
        .any(|e| e.id == id && e.user_id == user_id);
    if !found {
        return detail(StatusCode::NOT_FOUND, "Exercise not found");
    }
    state.exercises.retain(|e| e.id != id);
    Json(json!({ "message": "Deleted" })).into_response()
}

// --- records ---

async fn list_records(State(db): State<Db>, headers: HeaderMap) -> Response {
    let state = db.read().await;
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let records: Vec<&Record> = state
        .records
        .iter()
        .filter(|r| r.user_id == user_id)
        .collect();
    Json(records).into_response()
}

async fn create_record(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateRecord>,
) -> Response {
    let mut state = db.write().await;
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let exercise_name = state
        .exercises
        .iter()
        .find(|e| e.id == input.exercise_id && e.user_id == user_id)
        .map(|e| e.name.clone());
    let Some(exercise_name) = exercise_name else {
        return detail(StatusCode::NOT_FOUND, "Exercise not found");
    };

    let volume = input.weight * f64::from(input.reps) * f64::from(input.sets);
    let record = Record {
        id: state.next_id(),
        date: input.date,
        exercise_id: input.exercise_id,
        exercise_name,
        weight: input.weight,
        reps: input.reps,
        sets: input.sets,
        memo: input.memo,
        volume,
        user_id,
    };
    state.records.push(record.clone());
    Json(record).into_response()
}

async fn delete_record(State(db): State<Db>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let mut state = db.write().await;
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let found = state
        .records
        .iter()
        .any(|r| r.id == id && r.user_id == user_id);
    if !found {
        return detail(StatusCode::NOT_FOUND, "Record not found");
    }
    state.records.retain(|r| r.id != id);
    Json(json!({ "message": "Deleted" })).into_response()
}

// --- stats ---

async fn stats(State(db): State<Db>, headers: HeaderMap) -> Response {
    let state = db.read().await;
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let records: Vec<&Record> = state
        .records
        .iter()
        .filter(|r| r.user_id == user_id)
        .collect();

    let dates: HashSet<&str> = records.iter().map(|r| r.date.as_str()).collect();
    let total_volume = records.iter().map(|r| r.volume).sum::<f64>() as i64;
    let max_weight = records.iter().map(|r| r.weight).fold(0.0_f64, f64::max);

    Json(json!({
        "total_workouts": dates.len(),
        "total_volume": total_volume,
        "max_weight": max_weight,
    }))
    .into_response()
}
