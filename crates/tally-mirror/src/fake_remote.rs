//! In-process stand-in for a remote collection server, served over real HTTP
//! on an ephemeral localhost port.

use std::{
  net::SocketAddr,
  sync::{Arc, Mutex},
};

use axum::{
  Json, Router,
  extract::{Path, State},
  http::StatusCode,
  routing::{delete, get},
};
use chrono::Utc;
use reqwest::Url;
use serde_json::Value;
use tally_core::record::RecordKind;
use tokio::net::TcpListener;

use crate::wire::{NewRemoteRecord, RemoteRecord};

#[derive(Default)]
struct Inner {
  records:      Vec<RemoteRecord>,
  /// Stored as given; listed after `records`.
  raw:          Vec<Value>,
  next_id:      u64,
  fail_deletes: bool,
  fail_creates: bool,
  create_calls: usize,
}

type Shared = Arc<Mutex<Inner>>;

pub struct FakeRemote {
  pub endpoint: Url,
  addr:         SocketAddr,
  inner:        Shared,
}

impl FakeRemote {
  pub async fn start() -> Self {
    let inner: Shared = Arc::default();
    let app = Router::new()
      .route("/records", get(list).post(create))
      .route("/records/{id}", delete(remove))
      .with_state(inner.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    Self {
      endpoint: Url::parse(&format!("http://{addr}/records")).unwrap(),
      addr,
      inner,
    }
  }

  /// Absolute URL for `path` on this server.
  pub fn url(&self, path: &str) -> String { format!("http://{}{path}", self.addr) }

  pub fn seed(&self, title: &str, amount: f64, kind: RecordKind) -> RemoteRecord {
    let body = NewRemoteRecord {
      title: title.into(),
      amount,
      kind,
      created_at: Utc::now(),
    };
    insert(&mut self.inner.lock().unwrap(), body)
  }

  /// Store `value` verbatim. Its `id` must be a JSON string or number.
  pub fn seed_raw(&self, value: Value) { self.inner.lock().unwrap().raw.push(value); }

  pub fn records(&self) -> Vec<RemoteRecord> { self.inner.lock().unwrap().records.clone() }

  pub fn raw_records(&self) -> Vec<Value> { self.inner.lock().unwrap().raw.clone() }

  pub fn fail_deletes(&self) { self.inner.lock().unwrap().fail_deletes = true; }

  pub fn fail_creates(&self) { self.inner.lock().unwrap().fail_creates = true; }

  pub fn create_calls(&self) -> usize { self.inner.lock().unwrap().create_calls }
}

fn insert(inner: &mut Inner, body: NewRemoteRecord) -> RemoteRecord {
  inner.next_id += 1;
  let record = RemoteRecord {
    id:         inner.next_id.to_string(),
    title:      body.title,
    amount:     body.amount,
    kind:       body.kind,
    created_at: body.created_at,
  };
  inner.records.push(record.clone());
  record
}

async fn list(State(inner): State<Shared>) -> Json<Vec<Value>> {
  let inner = inner.lock().unwrap();
  let mut all: Vec<Value> = inner
    .records
    .iter()
    .map(|r| serde_json::to_value(r).unwrap())
    .collect();
  all.extend(inner.raw.iter().cloned());
  Json(all)
}

fn raw_id(value: &Value) -> Option<String> {
  match value.get("id")? {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

async fn create(
  State(inner): State<Shared>,
  Json(body): Json<NewRemoteRecord>,
) -> Result<(StatusCode, Json<RemoteRecord>), StatusCode> {
  let mut inner = inner.lock().unwrap();
  inner.create_calls += 1;
  if inner.fail_creates {
    return Err(StatusCode::INTERNAL_SERVER_ERROR);
  }
  Ok((StatusCode::CREATED, Json(insert(&mut inner, body))))
}

async fn remove(State(inner): State<Shared>, Path(id): Path<String>) -> StatusCode {
  let mut inner = inner.lock().unwrap();
  if inner.fail_deletes {
    return StatusCode::INTERNAL_SERVER_ERROR;
  }
  let before = inner.records.len() + inner.raw.len();
  inner.records.retain(|r| r.id != id);
  inner.raw.retain(|v| raw_id(v).as_deref() != Some(id.as_str()));
  if inner.records.len() + inner.raw.len() == before {
    StatusCode::NOT_FOUND
  } else {
    StatusCode::OK
  }
}
