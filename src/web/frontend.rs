//! Embedded HTML/CSS/JS frontend for the jarvis web dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies. All state lives
//! on the server; the page re-renders from every `{view, notifications}`
//! response.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>JARVIS Dashboard</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --purple: #bc8cff;
  --cyan: #39d2c0;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app { max-width: 1200px; margin: 0 auto; padding: 24px; }

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 24px; font-weight: 600; display: flex; gap: 10px; }
header h1 .logo { color: var(--accent); font-family: var(--mono); font-weight: 700; }
header .subtitle { color: var(--text-muted); font-size: 13px; }

.health-badges { display: flex; gap: 8px; }
.badge {
  display: inline-flex;
  align-items: center;
  gap: 4px;
  padding: 4px 10px;
  border-radius: 12px;
  font-size: 12px;
  font-weight: 500;
  background: var(--surface);
  border: 1px solid var(--border);
}
.badge.ok { border-color: var(--green); color: var(--green); }
.badge.warn { border-color: var(--yellow); color: var(--yellow); }
.badge.err { border-color: var(--red); color: var(--red); }

nav {
  display: flex;
  gap: 4px;
  margin-bottom: 24px;
  background: var(--surface);
  border-radius: var(--radius);
  padding: 4px;
  border: 1px solid var(--border);
}
nav button {
  flex: 1;
  padding: 8px 16px;
  border: none;
  border-radius: 6px;
  background: transparent;
  color: var(--text-muted);
  font-size: 13px;
  font-weight: 500;
  cursor: pointer;
}
nav button:hover { color: var(--text); background: rgba(255,255,255,0.04); }
nav button.active { background: var(--accent); color: #fff; }

.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}
.card h2 { font-size: 16px; font-weight: 600; margin-bottom: 16px; }
.card h3 { font-size: 14px; font-weight: 600; margin: 12px 0 8px; color: var(--text-muted); }

.stats-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
  gap: 16px;
  margin-bottom: 24px;
}
.stat-card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  text-align: center;
}
.stat-card .value { font-size: 28px; font-weight: 700; font-family: var(--mono); color: var(--accent); }
.stat-card .value.green { color: var(--green); }
.stat-card .value.purple { color: var(--purple); }
.stat-card .value.cyan { color: var(--cyan); }
.stat-card .label {
  font-size: 12px;
  color: var(--text-muted);
  margin-top: 6px;
  text-transform: uppercase;
  letter-spacing: 0.5px;
}

.models-layout { display: grid; grid-template-columns: 280px 1fr; gap: 16px; }
.model-item {
  padding: 10px 12px;
  border-radius: 6px;
  cursor: pointer;
  border: 1px solid transparent;
}
.model-item:hover { background: rgba(255,255,255,0.04); }
.model-item.active { border-color: var(--accent); background: rgba(88,166,255,0.08); }
.model-item .task { font-size: 11px; color: var(--text-muted); text-transform: uppercase; }

.form-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 12px; }
.form-grid label { display: block; font-size: 12px; color: var(--text-muted); margin-bottom: 4px; }
.form-grid input, .form-grid select, .voice-text input {
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: 6px;
  color: var(--text);
  padding: 6px 10px;
  font-size: 13px;
  font-family: var(--mono);
  width: 100%;
}
.form-grid input:focus, .form-grid select:focus { outline: none; border-color: var(--accent); }

.result-value { font-size: 28px; font-weight: 700; font-family: var(--mono); color: var(--green); }
.meter { height: 8px; background: var(--border); border-radius: 4px; overflow: hidden; margin: 6px 0; }
.meter .fill { height: 100%; background: var(--accent); transition: width 0.4s; }

.emotion-row { display: grid; grid-template-columns: 120px 1fr 60px; gap: 8px; align-items: center; }
.emotion-row.dominant { font-weight: 600; color: var(--cyan); }

.btn {
  display: inline-flex;
  align-items: center;
  gap: 6px;
  padding: 8px 16px;
  border: 1px solid var(--border);
  border-radius: 6px;
  background: var(--surface);
  color: var(--text);
  font-size: 13px;
  cursor: pointer;
}
.btn:hover { border-color: var(--accent); color: var(--accent); }
.btn.primary { background: var(--accent); color: #fff; border-color: var(--accent); }
.btn.danger { border-color: var(--red); color: var(--red); }
.btn.recording { background: var(--red); color: #fff; border-color: var(--red); }
.btn:disabled { opacity: 0.5; cursor: default; }
.btn-group { display: flex; gap: 8px; margin-top: 16px; flex-wrap: wrap; }

video { width: 100%; max-width: 480px; border-radius: var(--radius); background: #000; }
.voice-text { display: flex; gap: 8px; margin-top: 16px; }

.toasts { position: fixed; bottom: 24px; right: 24px; display: flex; flex-direction: column; gap: 8px; z-index: 1000; }
.toast {
  padding: 12px 20px;
  border-radius: var(--radius);
  color: #fff;
  font-weight: 500;
  font-size: 13px;
  background: var(--accent);
}
.toast.success { background: var(--green); }
.toast.error { background: var(--red); }
.toast.warning { background: var(--yellow); }

.panel { display: none; }
.panel.active { display: block; }
.empty { text-align: center; padding: 40px 20px; color: var(--text-muted); }
.muted { color: var(--text-muted); }

@media (max-width: 768px) {
  .models-layout { grid-template-columns: 1fr; }
  nav { flex-wrap: wrap; }
}
</style>
</head>
<body>
<div class="app">

  <header>
    <div>
      <h1><span class="logo">JARVIS</span> Dashboard</h1>
      <div class="subtitle">Machine-learning predictions, voice commands and emotion analysis</div>
    </div>
    <div class="health-badges" id="health-badges"></div>
  </header>

  <nav id="nav">
    <button class="active" data-tab="dashboard">Dashboard</button>
    <button data-tab="models">Models</button>
    <button data-tab="voice">Voice</button>
    <button data-tab="face">Face</button>
  </nav>

  <!-- Dashboard -->
  <div class="panel active" id="panel-dashboard">
    <div class="stats-grid">
      <div class="stat-card"><div class="value" id="stat-api">—</div><div class="label">API</div></div>
      <div class="stat-card"><div class="value green" id="stat-models">—</div><div class="label">Models Loaded</div></div>
      <div class="stat-card"><div class="value purple" id="stat-voice">—</div><div class="label">Voice Service</div></div>
      <div class="stat-card"><div class="value cyan" id="stat-face">—</div><div class="label">Face Service</div></div>
    </div>
    <div class="btn-group"><button class="btn" id="btn-refresh">Refresh status</button></div>
  </div>

  <!-- Models -->
  <div class="panel" id="panel-models">
    <div class="models-layout">
      <div class="card"><h2>Models</h2><div id="model-list"></div></div>
      <div>
        <div class="card" id="model-info"></div>
        <div class="card">
          <h2>Input</h2>
          <div class="form-grid" id="model-form"></div>
          <div class="btn-group"><button class="btn primary" id="btn-predict">Predict</button></div>
        </div>
        <div class="card" id="prediction" style="display:none"></div>
      </div>
    </div>
  </div>

  <!-- Voice -->
  <div class="panel" id="panel-voice">
    <div class="card">
      <h2>Voice Command</h2>
      <p class="muted" id="voice-status">Press the button and say a command.</p>
      <div class="btn-group"><button class="btn primary" id="btn-record">Start recording</button></div>
      <div class="voice-text">
        <input type="text" id="voice-text" placeholder="...or type a command">
        <button class="btn" id="btn-voice-text">Send</button>
      </div>
    </div>
    <div class="card" id="voice-result" style="display:none"></div>
  </div>

  <!-- Face -->
  <div class="panel" id="panel-face">
    <div class="card">
      <h2>Emotion Analysis</h2>
      <video id="camera" autoplay playsinline muted style="display:none"></video>
      <canvas id="snapshot" style="display:none"></canvas>
      <div class="btn-group">
        <button class="btn primary" id="btn-camera">Start camera</button>
        <button class="btn" id="btn-capture" disabled>Capture photo</button>
        <button class="btn danger" id="btn-camera-stop" disabled>Stop camera</button>
        <label class="btn">Upload image<input type="file" id="image-file" accept="image/*" hidden></label>
      </div>
    </div>
    <div class="card" id="emotion-result" style="display:none"></div>
  </div>

</div>

<div class="toasts" id="toasts"></div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
let view = null;
let recorder = null;
let micStream = null;
let chunks = [];
let cameraStream = null;

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(method, path, body, contentType) {
  const opts = { method, headers: {} };
  if (body instanceof Blob) {
    opts.headers['Content-Type'] = contentType || body.type || 'application/octet-stream';
    opts.body = body;
  } else if (body) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const res = await fetch(path, opts);
  const data = await res.json();
  if (data.error) {
    toast('error', data.error);
    return null;
  }
  (data.notifications || []).forEach(n => toast(n.level, n.message));
  view = data.view;
  render();
  return data;
}

function toast(level, msg) {
  const el = document.createElement('div');
  el.className = 'toast ' + level;
  el.textContent = msg;
  document.getElementById('toasts').appendChild(el);
  setTimeout(() => el.remove(), 4000);
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------
document.getElementById('nav').addEventListener('click', e => {
  if (e.target.tagName !== 'BUTTON') return;
  const tab = e.target.dataset.tab;
  if (!tab) return;
  if (tab !== 'face') stopCamera();
  if (tab !== 'voice' && recorder) stopRecording();
  api('POST', '/api/tab/' + tab);
});

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------
function render() {
  if (!view) return;
  document.querySelectorAll('nav button').forEach(b =>
    b.classList.toggle('active', b.dataset.tab === view.tab));
  document.querySelectorAll('.panel').forEach(p =>
    p.classList.toggle('active', p.id === 'panel-' + view.tab));
  renderStatus();
  renderModels();
  renderVoice();
  renderEmotion();
}

function renderStatus() {
  const s = view.status;
  const online = s.api.state === 'connected';
  setText('stat-api', online ? 'Online' : s.api.state === 'unknown' ? '—' : 'Offline');
  setText('stat-models', online ? s.api.model_count : '—');
  setText('stat-voice', serviceLabel(s.voice));
  setText('stat-face', serviceLabel(s.face));
  document.getElementById('health-badges').innerHTML = [
    badge(online ? 'API ' + s.api.version : 'API', online ? 'ok' : s.api.state === 'unknown' ? 'warn' : 'err'),
    badge('Voice', s.voice === 'available' ? 'ok' : 'warn'),
    badge('Face', s.face === 'available' ? 'ok' : 'warn'),
  ].join('');
}

function serviceLabel(s) {
  return s === 'available' ? '✓ Available' : s === 'not_configured' ? '✗ Not configured' : '?';
}

function renderModels() {
  const c = view.catalog;
  const list = document.getElementById('model-list');
  if (c.notice) {
    list.innerHTML = `<div class="empty">${c.notice.kind === 'empty' ? 'No models available' : esc(c.notice.message)}</div>`;
  } else {
    list.innerHTML = c.entries.map(e => `
      <div class="model-item${e.active ? ' active' : ''}" data-key="${esc(e.key)}">
        <div>${esc(e.name)}</div><div class="task">${esc(e.task)}</div>
      </div>`).join('');
  }

  const info = document.getElementById('model-info');
  const form = document.getElementById('model-form');
  const m = view.model;
  if (!m) {
    info.innerHTML = '<div class="empty">Select a model</div>';
    form.innerHTML = '';
  } else {
    const cmds = m.info.voice_commands.length
      ? `<h3>Voice commands</h3><ul>${m.info.voice_commands.map(v => `<li class="muted">"${esc(v)}"</li>`).join('')}</ul>`
      : '';
    info.innerHTML = `<h2>${esc(m.info.name)}</h2>
      <p>${esc(m.info.description)}</p>
      <p class="muted">Task: ${esc(m.info.task)} · Target: ${esc(m.info.target)} · Key: ${esc(m.info.key)}</p>${cmds}`;
    form.innerHTML = m.form.kind === 'unavailable'
      ? '<p class="muted">Form not available for this model</p>'
      : m.form.fields.map(renderField).join('');
  }

  const p = view.prediction;
  const out = document.getElementById('prediction');
  out.style.display = p ? 'block' : 'none';
  if (p) {
    const conf = p.confidence
      ? `<h3>Confidence</h3><div class="meter"><div class="fill" style="width:${p.confidence.width}%"></div></div><span>${esc(p.confidence.label)}</span>`
      : '';
    out.innerHTML = `<h2>Result</h2><div class="muted">${esc(p.label)}</div>
      <div class="result-value">${esc(p.value)}</div>${conf}
      <p class="muted">Model: ${esc(p.dataset)} · Task: ${esc(p.task_type)}</p>`;
  }
}

function renderField(f) {
  const c = f.control;
  let input;
  if (c.type === 'select') {
    input = `<select name="${esc(f.name)}">${c.options.map(o =>
      `<option${o === c.value ? ' selected' : ''}>${esc(o)}</option>`).join('')}</select>`;
  } else if (c.type === 'number') {
    input = `<input type="number" name="${esc(f.name)}" value="${esc(c.value)}" step="${esc(c.step)}" required>`;
  } else {
    input = `<input type="text" name="${esc(f.name)}" value="${esc(c.value)}" required>`;
  }
  return `<div><label>${esc(f.label)}</label>${input}</div>`;
}

function renderVoice() {
  const v = view.voice;
  const status = { idle: 'Press the button and say a command.', recording: 'Recording... press again to stop.', processing: 'Processing audio...' };
  setText('voice-status', status[v.phase] || '');
  const btn = document.getElementById('btn-record');
  btn.textContent = recorder ? 'Stop recording' : 'Start recording';
  btn.classList.toggle('recording', !!recorder);
  const out = document.getElementById('voice-result');
  out.style.display = v.transcript ? 'block' : 'none';
  if (v.transcript) {
    out.innerHTML = `<h2>Transcript</h2><p>"${esc(v.transcript)}"</p>` +
      (v.detected_model ? `<h3>Detected model</h3><p class="result-value">${esc(v.detected_model)}</p>` : '');
  }
}

function renderEmotion() {
  const r = view.emotion;
  const out = document.getElementById('emotion-result');
  out.style.display = r ? 'block' : 'none';
  if (!r) return;
  const msg = r.message ? `<p class="muted">${esc(r.message)}</p>` : '';
  out.innerHTML = `<h2><i class="fas ${esc(r.icon_class)}"></i> ${esc(r.dominant)}</h2>
    <p>Confidence: <strong>${esc(r.confidence)}</strong> · Faces detected: ${r.num_faces}</p>${msg}
    <h3>All emotions</h3>` + r.bars.map(b => `
    <div class="emotion-row${b.emotion === r.dominant ? ' dominant' : ''}">
      <span>${esc(b.emotion)}</span>
      <div class="meter"><div class="fill" style="width:${b.width}%"></div></div>
      <span>${esc(b.label)}</span>
    </div>`).join('');
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------
document.getElementById('model-list').addEventListener('click', e => {
  const item = e.target.closest('.model-item');
  if (item) api('POST', '/api/models/' + encodeURIComponent(item.dataset.key) + '/select');
});

document.getElementById('btn-predict').addEventListener('click', () => {
  const values = {};
  document.querySelectorAll('#model-form [name]').forEach(el => values[el.name] = el.value);
  api('POST', '/api/predict', { values });
});

document.getElementById('btn-refresh').addEventListener('click', () => api('POST', '/api/status'));

// ---------------------------------------------------------------------------
// Voice
// ---------------------------------------------------------------------------
document.getElementById('btn-record').addEventListener('click', () => {
  if (recorder) stopRecording(); else startRecording();
});

async function startRecording() {
  try {
    micStream = await navigator.mediaDevices.getUserMedia({
      audio: { echoCancellation: true, noiseSuppression: true, autoGainControl: true, sampleRate: 48000 },
    });
  } catch (e) {
    toast('error', 'Could not access the microphone');
    return;
  }
  chunks = [];
  recorder = new MediaRecorder(micStream);
  recorder.ondataavailable = e => { if (e.data.size > 0) chunks.push(e.data); };
  recorder.onstop = async () => {
    const type = recorder.mimeType || 'audio/webm';
    recorder = null;
    const blob = new Blob(chunks, { type });
    view.voice.phase = 'processing';
    renderVoice();
    await api('POST', '/api/voice', blob, type);
  };
  recorder.start(100);
  view.voice.phase = 'recording';
  renderVoice();
}

function stopRecording() {
  if (micStream) micStream.getTracks().forEach(t => t.stop());
  micStream = null;
  if (recorder && recorder.state !== 'inactive') recorder.stop();
}

document.getElementById('btn-voice-text').addEventListener('click', () => {
  const text = document.getElementById('voice-text').value.trim();
  if (text) api('POST', '/api/voice/text', { text });
});

// ---------------------------------------------------------------------------
// Face
// ---------------------------------------------------------------------------
document.getElementById('btn-camera').addEventListener('click', async () => {
  if (cameraStream) return;
  try {
    cameraStream = await navigator.mediaDevices.getUserMedia({ video: true });
  } catch (e) {
    toast('error', 'Could not access the camera');
    return;
  }
  const video = document.getElementById('camera');
  video.srcObject = cameraStream;
  video.style.display = 'block';
  setCameraButtons(true);
});

document.getElementById('btn-camera-stop').addEventListener('click', stopCamera);

document.getElementById('btn-capture').addEventListener('click', () => {
  const video = document.getElementById('camera');
  const canvas = document.getElementById('snapshot');
  canvas.width = video.videoWidth;
  canvas.height = video.videoHeight;
  canvas.getContext('2d').drawImage(video, 0, 0);
  canvas.toBlob(blob => {
    if (blob) api('POST', '/api/emotion', blob, 'image/jpeg');
  }, 'image/jpeg', 0.9);
});

document.getElementById('image-file').addEventListener('change', e => {
  const file = e.target.files[0];
  if (file) api('POST', '/api/emotion', file);
  e.target.value = '';
});

function stopCamera() {
  if (cameraStream) cameraStream.getTracks().forEach(t => t.stop());
  cameraStream = null;
  const video = document.getElementById('camera');
  video.srcObject = null;
  video.style.display = 'none';
  setCameraButtons(false);
}

function setCameraButtons(active) {
  document.getElementById('btn-camera').disabled = active;
  document.getElementById('btn-capture').disabled = !active;
  document.getElementById('btn-camera-stop').disabled = !active;
}

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------
function badge(label, cls) {
  const dot = cls === 'ok' ? '●' : cls === 'warn' ? '○' : '✕';
  return `<span class="badge ${cls}">${dot} ${esc(label)}</span>`;
}

function setText(id, val) {
  document.getElementById(id).textContent = val;
}

function esc(s) {
  if (s === undefined || s === null) return '';
  return String(s).replace(/&/g,'&amp;').replace(/</g,'&lt;').replace(/>/g,'&gt;').replace(/"/g,'&quot;');
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------
window.addEventListener('beforeunload', () => { stopCamera(); stopRecording(); });
api('POST', '/api/startup');
</script>
</body>
</html>"##;
