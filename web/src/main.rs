//! Ultimate Tic-Tac-Toe Web Server
//!
//! Minimal HTTP server for playing against the MCTS bot.
//! Endpoints:
//! - GET  /health        - Health check
//! - GET  /metrics       - Prometheus metrics
//! - GET  /game/state    - Get current game state
//! - POST /game/new      - Start a new game
//! - POST /move          - Make a move (player move + bot response)
//! - POST /move/random   - Play a random move for the side to move
//! - POST /move/best     - Play the MCTS move for the side to move

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use engine_config::load_config;
use games_uttt::Symbol;
use mcts::MctsConfig;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod game;
mod handlers;
mod metrics;
mod types;

use game::GameSession;
use handlers::{best_move, get_game_state, health, make_move, metrics_handler, new_game, random_move};

/// Shared application state
pub struct AppState {
    /// Current game session
    pub session: Mutex<GameSession>,
    /// Search settings for every bot move
    pub mcts_config: MctsConfig,
    /// CORS allowed origins (empty = any)
    pub allowed_origins: Vec<String>,
    /// Seed of the first session; later sessions offset it
    base_seed: u64,
    games_started: AtomicU64,
}

impl AppState {
    pub fn new(mcts_config: MctsConfig, allowed_origins: Vec<String>, base_seed: u64) -> Self {
        let session = GameSession::new(Symbol::X, base_seed, mcts_config.clone());
        Self {
            session: Mutex::new(session),
            mcts_config,
            allowed_origins,
            base_seed,
            games_started: AtomicU64::new(1),
        }
    }

    /// Seed for the next game session.
    pub fn next_seed(&self) -> u64 {
        self.base_seed
            .wrapping_add(self.games_started.fetch_add(1, Ordering::Relaxed))
    }
}

/// Build the CORS layer. An empty origin list allows any origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Create the application router with the given state.
/// This is separated out for testing purposes.
pub fn create_app(state: Arc<AppState>) -> Router {
    metrics::init_metrics();
    let cors = cors_layer(&state.allowed_origins);

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .route("/game/state", get(get_game_state))
        .route("/game/new", post(new_game))
        .route("/move", post(make_move))
        .route("/move/random", post(random_move))
        .route("/move/best", post(best_move))
        .layer(cors)
        .with_state(state)
}

/// Translate the `[mcts]` config section into search settings.
fn search_config(config: &engine_config::MctsConfig) -> MctsConfig {
    let search = MctsConfig::default()
        .with_time_budget(config.time_budget())
        .with_exploration(config.exploration);
    match config.iteration_cap() {
        Some(cap) => search.with_max_iterations(cap),
        None => search,
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// Create application state for testing (fast, seeded bot)
#[cfg(test)]
pub fn create_test_state() -> Arc<AppState> {
    Arc::new(AppState::new(
        MctsConfig::for_testing().with_max_iterations(30),
        Vec::new(),
        42,
    ))
}

/// Creates a future that completes when a shutdown signal is received.
/// Handles Ctrl+C on all platforms.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping server...");
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},web={}", log_level, log_level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from config.toml with env var overrides
    let config = load_config();
    init_tracing(&config.common.log_level);

    let mcts_config = search_config(&config.mcts);
    let seed = config.mcts.fixed_seed().unwrap_or_else(clock_seed);
    info!(
        time_budget_ms = config.mcts.time_budget_ms,
        exploration = config.mcts.exploration,
        max_iterations = config.mcts.max_iterations,
        seed,
        "Bot configuration"
    );
    if config.web.allowed_origins.is_empty() {
        warn!("No allowed_origins configured, accepting requests from any origin");
    }

    let state = Arc::new(AppState::new(
        mcts_config,
        config.web.allowed_origins.clone(),
        seed,
    ));
    let app = create_app(state);

    let addr = config.web.bind_addr();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GameStateResponse, HealthResponse, MoveResponse, RandomMoveResponse};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use games_uttt::{Cell, Move, SubBoardCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Helper to make a GET request and return response body as string
    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body_str = String::from_utf8(body.to_vec()).unwrap();
        (status, body_str)
    }

    /// Helper to make a POST request with JSON body and return response
    async fn post_json(app: Router, uri: &str, json: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(json.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body_str = String::from_utf8(body.to_vec()).unwrap();
        (status, body_str)
    }

    fn move_json(mv: Move) -> String {
        format!(
            r#"{{"sub_row": {}, "sub_col": {}, "cell_row": {}, "cell_col": {}}}"#,
            mv.sub_row, mv.sub_col, mv.cell_row, mv.cell_col
        )
    }

    fn occupied(response: &GameStateResponse) -> usize {
        response.board.occupied()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_app(create_test_state());

        let (status, body) = get(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        let response: HealthResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(response.status, "ok");
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let app = create_app(create_test_state());

        let (status, body) = get(app, "/metrics").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("uttt_games_created_total"));
    }

    #[tokio::test]
    async fn test_game_state_returns_initial_board() {
        let app = create_app(create_test_state());

        let (status, body) = get(app, "/game/state").await;

        assert_eq!(status, StatusCode::OK);
        let response: GameStateResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(occupied(&response), 0, "Initial board should be empty");
        assert_eq!(response.turn, Symbol::X, "X should go first");
        assert_eq!(response.human, Symbol::X);
        assert_eq!(response.next_zone.len(), 9);
        assert_eq!(response.winner, None);
        assert!(!response.game_over);
        assert_eq!(response.legal_moves.len(), 81);
        assert_eq!(response.message, "Your turn (X)");
    }

    #[tokio::test]
    async fn test_board_serializes_as_nested_arrays() {
        let app = create_app(create_test_state());

        let (_, body) = get(app, "/game/state").await;

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        let board = json["board"].as_array().unwrap();
        assert_eq!(board.len(), 9);
        assert_eq!(board[0].as_array().unwrap().len(), 9);
        assert_eq!(board[0][0], "");
    }

    #[tokio::test]
    async fn test_new_game_player_first() {
        let app = create_app(create_test_state());

        let (status, body) = post_json(app, "/game/new", r#"{"first": "player"}"#).await;

        assert_eq!(status, StatusCode::OK);
        let response: GameStateResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(occupied(&response), 0);
        assert_eq!(response.turn, Symbol::X);
        assert_eq!(response.human, Symbol::X);
    }

    #[tokio::test]
    async fn test_new_game_bot_first() {
        let app = create_app(create_test_state());

        let (status, body) = post_json(app, "/game/new", r#"{"first": "bot"}"#).await;

        assert_eq!(status, StatusCode::OK);
        let response: GameStateResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(occupied(&response), 1, "Bot should have made exactly one move");
        // Bot opened as X, so the human plays O and it is O's turn
        assert_eq!(response.human, Symbol::O);
        assert_eq!(response.turn, Symbol::O);
        assert_eq!(response.next_zone.len(), 1);
    }

    #[tokio::test]
    async fn test_new_game_default_player_first() {
        let app = create_app(create_test_state());

        let (status, body) = post_json(app, "/game/new", r#"{}"#).await;

        assert_eq!(status, StatusCode::OK);
        let response: GameStateResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(occupied(&response), 0);
        assert_eq!(response.human, Symbol::X);
    }

    #[tokio::test]
    async fn test_move_valid() {
        let app = create_app(create_test_state());

        let (status, body) = post_json(app, "/move", &move_json(Move::new(1, 1, 0, 2))).await;

        assert_eq!(status, StatusCode::OK);
        let response: MoveResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(response.state.board.get(1, 1, 0, 2), Cell::X);

        // Bot was sent to sub-board (0,2)
        let bot_move = response.bot_move.expect("Bot should make a move");
        assert_eq!(bot_move.sub_board(), SubBoardCode::new(0, 2));
        assert_eq!(response.state.board.cell(&bot_move), Some(Cell::O));
        assert_eq!(response.iterations, Some(30));
        assert!(response.score.is_some());
        assert_eq!(response.state.turn, Symbol::X);
    }

    #[tokio::test]
    async fn test_move_outside_zone() {
        let state = create_test_state();

        {
            let app = create_app(Arc::clone(&state));
            let (status, _) = post_json(app, "/move", &move_json(Move::new(0, 0, 2, 2))).await;
            assert_eq!(status, StatusCode::OK);
        }

        // X is confined to wherever the bot sent it; find a sub-board outside it
        let response: GameStateResponse = {
            let app = create_app(Arc::clone(&state));
            let (_, body) = get(app, "/game/state").await;
            serde_json::from_str(&body).unwrap()
        };
        let outside = SubBoardCode::ALL
            .into_iter()
            .find(|code| !response.next_zone.contains(*code))
            .unwrap();

        let app = create_app(Arc::clone(&state));
        let mv = Move::new(outside.row(), outside.col(), 1, 1);
        let (status, body) = post_json(app, "/move", &move_json(mv)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Illegal move"), "{}", body);
    }

    #[tokio::test]
    async fn test_move_out_of_bounds() {
        let app = create_app(create_test_state());

        let (status, body) = post_json(app, "/move", &move_json(Move::new(0, 0, 3, 0))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Illegal move"));
    }

    #[tokio::test]
    async fn test_move_missing_fields() {
        let app = create_app(create_test_state());

        let (status, _) = post_json(app, "/move", r#"{"sub_row": 0}"#).await;

        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_move_not_your_turn() {
        let state = create_test_state();

        // Random move for X (the human) hands the turn to the bot
        {
            let app = create_app(Arc::clone(&state));
            let (status, _) = post_json(app, "/move/random", "").await;
            assert_eq!(status, StatusCode::OK);
        }

        let app = create_app(Arc::clone(&state));
        let (status, body) = post_json(app, "/move", &move_json(Move::new(0, 0, 0, 0))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Not your turn"));
    }

    #[tokio::test]
    async fn test_random_move() {
        let app = create_app(create_test_state());

        let (status, body) = post_json(app, "/move/random", "").await;

        assert_eq!(status, StatusCode::OK);
        let response: RandomMoveResponse = serde_json::from_str(&body).unwrap();
        let played = response.played.expect("Random move should be played");
        assert_eq!(response.state.board.cell(&played), Some(Cell::X));
        assert_eq!(response.state.turn, Symbol::O);
        assert_eq!(occupied(&response.state), 1);
    }

    #[tokio::test]
    async fn test_best_move() {
        let app = create_app(create_test_state());

        let (status, body) = post_json(app, "/move/best", "").await;

        assert_eq!(status, StatusCode::OK);
        let response: MoveResponse = serde_json::from_str(&body).unwrap();
        let mv = response.bot_move.expect("Search should find a move");
        assert_eq!(response.state.board.cell(&mv), Some(Cell::X));
        assert_eq!(response.iterations, Some(30));
        assert_eq!(response.state.turn, Symbol::O);
    }

    #[tokio::test]
    async fn test_random_moves_until_game_over() {
        let state = create_test_state();
        let mut game_over = false;

        for _ in 0..81 {
            let app = create_app(Arc::clone(&state));
            let (status, body) = post_json(app, "/move/random", "").await;
            assert_eq!(status, StatusCode::OK);
            let response: RandomMoveResponse = serde_json::from_str(&body).unwrap();
            if response.state.game_over {
                assert!(response.state.legal_moves.is_empty());
                assert!(response.state.next_zone.is_empty());
                game_over = true;
                break;
            }
        }
        assert!(game_over, "Random game should finish within 81 moves");

        // Decided game: random move reports it without playing
        {
            let app = create_app(Arc::clone(&state));
            let (status, body) = post_json(app, "/move/random", "").await;
            assert_eq!(status, StatusCode::OK);
            let response: RandomMoveResponse = serde_json::from_str(&body).unwrap();
            assert!(response.played.is_none());
            assert!(response.state.game_over);
        }

        // Best move on a decided game plays nothing
        {
            let app = create_app(Arc::clone(&state));
            let (status, body) = post_json(app, "/move/best", "").await;
            assert_eq!(status, StatusCode::OK);
            let response: MoveResponse = serde_json::from_str(&body).unwrap();
            assert!(response.bot_move.is_none());
            assert_eq!(response.iterations, Some(0));
        }

        // Human moves are rejected
        let app = create_app(Arc::clone(&state));
        let (status, body) = post_json(app, "/move", &move_json(Move::new(0, 0, 0, 0))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Game is already over"));
    }

    #[tokio::test]
    async fn test_new_game_resets_state() {
        let state = create_test_state();

        {
            let app = create_app(Arc::clone(&state));
            post_json(app, "/move", &move_json(Move::new(1, 1, 1, 1))).await;
        }

        let (_, body) = {
            let app = create_app(Arc::clone(&state));
            get(app, "/game/state").await
        };
        let mid_game: GameStateResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(occupied(&mid_game), 2, "Player and bot should have moved");

        {
            let app = create_app(Arc::clone(&state));
            post_json(app, "/game/new", r#"{"first": "player"}"#).await;
        }

        let (_, body) = {
            let app = create_app(Arc::clone(&state));
            get(app, "/game/state").await
        };
        let new_game: GameStateResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(occupied(&new_game), 0, "Board should be reset");
        assert_eq!(new_game.turn, Symbol::X);
        assert_eq!(new_game.legal_moves.len(), 81);
    }

    #[test]
    fn test_search_config_from_central_config() {
        let mut config = engine_config::MctsConfig::default();
        let search = search_config(&config);
        assert_eq!(search, MctsConfig::default());

        config.max_iterations = 500;
        config.time_budget_ms = 100;
        let search = search_config(&config);
        assert_eq!(search.max_iterations, Some(500));
        assert_eq!(search.time_budget, std::time::Duration::from_millis(100));
    }

    #[test]
    fn test_session_seeds_differ() {
        let state = create_test_state();
        let a = state.next_seed();
        let b = state.next_seed();
        assert_ne!(a, b);
    }
}
