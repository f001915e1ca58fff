//! HTTP API server and the built-in single-page UI.
//!
//! One request type: POST /agent/run with a task string. The response is
//! always a complete outcome object; failure information lives in its
//! `success`/`error` fields, never in a bare transport error.

use crate::agent::{AgentOutcome, AgentRunner};
use crate::cli::Output;
use crate::config::Settings;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    runner: AgentRunner,
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let state = Arc::new(AppState {
        runner: AgentRunner::new(&settings),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/agent/run", post(run_agent))
        .route("/agent/tools", get(list_tools))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Steg API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("UI", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("Run task", "POST /agent/run");
    Output::kv("List tools", "GET  /agent/tools");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct RunRequest {
    task: String,
}

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    description: String,
}

#[derive(Serialize)]
struct ToolListResponse {
    tools: Vec<ToolInfo>,
}

// === Handlers ===

async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn run_agent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RunRequest>,
) -> impl IntoResponse {
    let task = req.task.trim();
    if task.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(AgentOutcome::rejected("task must not be empty")),
        )
            .into_response();
    }

    let outcome = state.runner.run(task).await;
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(outcome)).into_response()
}

async fn list_tools(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let tools = state
        .runner
        .registry()
        .catalog()
        .into_iter()
        .map(|(name, description)| ToolInfo { name, description })
        .collect();

    Json(ToolListResponse { tools })
}

/// The single-page UI. History lives only in the page's own memory; nothing
/// is persisted server-side.
const INDEX_HTML: &str = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Steg</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; color: #222; }
  h1 { font-size: 1.4rem; }
  textarea { width: 100%; min-height: 4rem; font: inherit; padding: .5rem; box-sizing: border-box; }
  button { font: inherit; padding: .4rem 1.2rem; margin-top: .5rem; cursor: pointer; }
  .run { border: 1px solid #ddd; border-radius: 6px; padding: .8rem 1rem; margin-top: 1rem; }
  .run h2 { font-size: 1rem; margin: 0 0 .5rem; }
  .step { margin: .4rem 0; padding-left: .8rem; border-left: 3px solid #8bc34a; white-space: pre-wrap; }
  .step.failed { border-left-color: #e57373; }
  .muted { color: #777; font-size: .85rem; }
  .error { color: #b71c1c; }
</style>
</head>
<body>
<h1>Steg &mdash; plan &amp; execute</h1>
<textarea id="task" placeholder="Describe a task, e.g. 'Research the latest agent patterns and estimate rollout effort'"></textarea>
<br>
<button id="go">Run</button>
<div id="history"></div>
<script>
const history = [];

async function runTask() {
  const task = document.getElementById('task').value;
  const button = document.getElementById('go');
  button.disabled = true;
  try {
    const res = await fetch('/agent/run', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ task }),
    });
    history.unshift({ task, outcome: await res.json() });
    render();
  } catch (err) {
    history.unshift({ task, outcome: { success: false, error: String(err), plan: [], steps: [], final: '' } });
    render();
  } finally {
    button.disabled = false;
  }
}

function render() {
  const root = document.getElementById('history');
  root.replaceChildren(...history.map(({ task, outcome }) => {
    const div = document.createElement('div');
    div.className = 'run';
    const title = document.createElement('h2');
    title.textContent = task;
    div.appendChild(title);
    if (outcome.error) {
      const err = document.createElement('p');
      err.className = outcome.success ? 'muted' : 'error';
      err.textContent = outcome.error;
      div.appendChild(err);
    }
    (outcome.steps || []).forEach((step, i) => {
      const s = document.createElement('div');
      s.className = 'step' + (step.success ? '' : ' failed');
      const plan = (outcome.plan || [])[i];
      s.textContent = (plan ? plan.title + ' [' + plan.tool + ']\n' : '') + (step.output || step.error || '');
      div.appendChild(s);
    });
    if (outcome.final) {
      const fin = document.createElement('p');
      fin.textContent = outcome.final;
      div.appendChild(fin);
    }
    if (outcome.meta) {
      const meta = document.createElement('p');
      meta.className = 'muted';
      meta.textContent = outcome.meta.durationMs + ' ms';
      div.appendChild(meta);
    }
    return div;
  }));
}

document.getElementById('go').addEventListener('click', runTask);
</script>
</body>
</html>
"##;
