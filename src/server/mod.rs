use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::bot::leaderboard;
use crate::commands;
use crate::db::Ledger;
use crate::ocr::TextExtractor;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Ledger,
    pub ocr: Arc<dyn TextExtractor>,
    pub http: reqwest::Client,
    pub started_at: DateTime<Utc>,
}

/// One chat line, optionally with an attached image (URL or local path).
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
    #[serde(default)]
    pub attachment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Serialize)]
struct ServerStatus {
    status: &'static str,
    uptime_secs: i64,
    players: usize,
    ocr_engine: String,
}

/// Build the Axum router for the chat endpoint and dashboard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/status", get(status_handler))
        .route("/api/leaderboard", get(leaderboard_handler))
        .route("/api/players", get(players_handler))
        .route("/api/shamer", get(shamer_handler))
        .route("/api/worst", get(worst_handler))
        .route("/api/chat", post(chat_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Serve the dashboard HTML page.
async fn index_handler() -> impl IntoResponse {
    Html(DASHBOARD_HTML)
}

/// GET /api/status
async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let players = state
        .ledger
        .list_players()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .len();
    Ok(Json(ServerStatus {
        status: "ok",
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
        players,
        ocr_engine: state.ocr.name().to_string(),
    }))
}

/// GET /api/leaderboard
async fn leaderboard_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .ledger
        .list_players()
        .map(|players| Json(leaderboard::rank(players)))
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// GET /api/players
async fn players_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .ledger
        .list_players()
        .map(|p| Json(p))
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// GET /api/shamer (most-updated player, null until someone has entries)
async fn shamer_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .ledger
        .list_players()
        .map(|players| Json(leaderboard::find_most_updated(&players).cloned()))
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// GET /api/worst (lowest total score, null while the board is empty)
async fn worst_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .ledger
        .list_players()
        .map(|players| Json(leaderboard::find_worst(&players).cloned()))
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// POST /api/chat
async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    let reply = commands::handle_chat(
        &state.ledger,
        state.ocr.as_ref(),
        &state.http,
        &request.text,
        request.attachment.as_deref(),
    )
    .await;
    Json(ChatReply { reply })
}

/// Embedded single-file dashboard (HTML + CSS + JS)
const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Shameboard</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #6c63ff;
    --green: #00c896;
    --red: #ff4f6a;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  .status-dot { width: 10px; height: 10px; border-radius: 50%; background: var(--green); display: inline-block; animation: pulse 1.5s infinite; }
  @keyframes pulse { 0%,100% { opacity: 1; } 50% { opacity: .3; } }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; }
  .stats-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(180px, 1fr)); gap: 1rem; }
  .stat-card { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1.2rem; }
  .stat-card .label { color: var(--muted); font-size: .8rem; text-transform: uppercase; letter-spacing: .06em; margin-bottom: .4rem; }
  .stat-card .value { font-size: 1.7rem; font-weight: 700; }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; overflow: hidden; }
  .panel-header { padding: .9rem 1.2rem; border-bottom: 1px solid var(--border); font-weight: 600; display: flex; justify-content: space-between; align-items: center; }
  table { width: 100%; border-collapse: collapse; }
  th { padding: .7rem 1rem; text-align: left; font-size: .75rem; text-transform: uppercase; color: var(--muted); border-bottom: 1px solid var(--border); }
  td { padding: .65rem 1rem; font-size: .88rem; border-bottom: 1px solid #1e2130; }
  tr:last-child td { border-bottom: none; }
  .pill { display: inline-block; padding: .15rem .55rem; border-radius: 20px; font-size: .75rem; font-weight: 600; }
  .pill.top { background: rgba(255,79,106,.15); color: var(--red); }
  .empty { color: var(--muted); text-align: center; padding: 2rem; font-size: .9rem; }
  .refresh-btn { background: none; border: 1px solid var(--border); color: var(--muted); padding: .3rem .8rem; border-radius: 6px; cursor: pointer; font-size: .8rem; }
  .refresh-btn:hover { border-color: var(--accent); color: var(--accent); }
  .two-col { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
  @media (max-width: 768px) { .two-col { grid-template-columns: 1fr; } }
  #chat-log { padding: 1rem 1.2rem; min-height: 120px; max-height: 320px; overflow-y: auto; font-size: .88rem; white-space: pre-wrap; }
  #chat-log .you { color: var(--accent); }
  #chat-log .bot { color: var(--text); margin-bottom: .6rem; }
  .chat-form { display: flex; gap: .6rem; padding: .9rem 1.2rem; border-top: 1px solid var(--border); }
  .chat-form input { background: var(--bg); border: 1px solid var(--border); border-radius: 6px; color: var(--text); padding: .5rem .7rem; font-size: .88rem; }
  .chat-form input:focus { outline: none; border-color: var(--accent); }
  #chat-text { flex: 2; }
  #chat-attachment { flex: 1; }
  .chat-form button { background: var(--accent); border: none; border-radius: 6px; color: #fff; padding: .5rem 1rem; cursor: pointer; font-weight: 600; }
</style>
</head>
<body>
<header>
  <span class="status-dot"></span>
  <h1>🏆 Shameboard</h1>
  <span style="margin-left:auto;color:var(--muted);font-size:.8rem;" id="last-updated"></span>
</header>

<main>
  <div class="stats-grid">
    <div class="stat-card"><div class="label">Players</div><div class="value" id="s-players">–</div></div>
    <div class="stat-card"><div class="label">Shamer of the Week</div><div class="value" id="s-shamer">–</div></div>
    <div class="stat-card"><div class="label">Lowest Score</div><div class="value" id="s-worst">–</div></div>
    <div class="stat-card"><div class="label">Uptime</div><div class="value" id="s-uptime">–</div></div>
  </div>

  <div class="two-col">
    <div class="panel">
      <div class="panel-header">Leaderboard <button class="refresh-btn" onclick="loadAll()">↻ Refresh</button></div>
      <table>
        <thead><tr><th>Rank</th><th>Player</th><th>Score</th><th>Times Added</th></tr></thead>
        <tbody id="leaderboard-tbody"><tr><td colspan="4" class="empty">Loading…</td></tr></tbody>
      </table>
    </div>

    <div class="panel">
      <div class="panel-header">Chat</div>
      <div id="chat-log"></div>
      <form class="chat-form" onsubmit="sendChat(event)">
        <input id="chat-text" placeholder="!add Alice, !leaderboard, !add_score …" autocomplete="off">
        <input id="chat-attachment" placeholder="image URL (for !add_score)" autocomplete="off">
        <button type="submit">Send</button>
      </form>
    </div>
  </div>
</main>

<script>
const uptime = s => {
  if (s < 60) return Math.round(s) + 's';
  if (s < 3600) return Math.round(s/60) + 'm';
  return (s/3600).toFixed(1) + 'h';
};

async function loadStatus() {
  const r = await fetch('/api/status');
  if (!r.ok) return;
  const s = await r.json();
  document.getElementById('s-players').textContent = s.players;
  document.getElementById('s-uptime').textContent = uptime(s.uptime_secs);
}

async function loadLeaderboard() {
  const r = await fetch('/api/leaderboard');
  if (!r.ok) return;
  const entries = await r.json();
  const tbody = document.getElementById('leaderboard-tbody');
  if (!entries.length) { tbody.innerHTML = '<tr><td colspan="4" class="empty">No players yet</td></tr>'; return; }
  tbody.innerHTML = entries.map(e => `<tr>
    <td>${e.rank === 1 ? '<span class="pill top">1</span>' : e.rank}</td>
    <td>${e.name}</td>
    <td>${e.score}</td>
    <td>${e.times_added}</td>
  </tr>`).join('');
}

async function loadShamer() {
  const r = await fetch('/api/shamer');
  if (!r.ok) return;
  const shamer = await r.json();
  document.getElementById('s-shamer').textContent = shamer ? shamer.name : '–';
}

async function loadWorst() {
  const r = await fetch('/api/worst');
  if (!r.ok) return;
  const worst = await r.json();
  document.getElementById('s-worst').textContent = worst ? `${worst.name} (${worst.score})` : '–';
}

async function sendChat(ev) {
  ev.preventDefault();
  const textEl = document.getElementById('chat-text');
  const attachEl = document.getElementById('chat-attachment');
  const text = textEl.value.trim();
  if (!text) return;
  const body = { text };
  if (attachEl.value.trim()) body.attachment = attachEl.value.trim();
  appendChat('you', text);
  textEl.value = '';
  const r = await fetch('/api/chat', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body),
  });
  if (!r.ok) { appendChat('bot', 'Request failed.'); return; }
  const reply = await r.json();
  appendChat('bot', reply.reply);
  loadAll();
}

function appendChat(who, text) {
  const log = document.getElementById('chat-log');
  const line = document.createElement('div');
  line.className = who;
  line.textContent = (who === 'you' ? '> ' : '') + text;
  log.appendChild(line);
  log.scrollTop = log.scrollHeight;
}

async function loadAll() {
  await Promise.all([loadStatus(), loadLeaderboard(), loadShamer(), loadWorst()]);
  document.getElementById('last-updated').textContent = 'Updated ' + new Date().toLocaleTimeString();
}

// Auto-refresh every 5 seconds
loadAll();
setInterval(loadAll, 5000);
</script>
</body>
</html>"#;
