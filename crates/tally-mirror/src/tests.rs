//! Client, endpoint and sync tests against an in-process fake remote and an
//! in-memory store.

use chrono::{DateTime, Utc};
use serde_json::json;
use tally_core::{
  record::{RecordInput, RecordKind},
  store::{RecordStore, SettingsStore},
};
use tally_store_sqlite::SqliteStore;

use crate::{
  Error, MirrorClient, SyncError,
  endpoint::{DEFAULT_ENDPOINT, ENDPOINT_KEY, configured_endpoint, set_endpoint},
  fake_remote::FakeRemote,
  sync_to_remote,
  wire::NewRemoteRecord,
};

async fn store() -> SqliteStore {
  let s = SqliteStore::open_in_memory().await.unwrap();
  s.init().await.unwrap();
  s
}

fn input(title: &str, amount: f64, kind: RecordKind) -> RecordInput {
  RecordInput::new(title, amount, kind).unwrap()
}

fn client(remote: &FakeRemote) -> MirrorClient {
  MirrorClient::new(remote.endpoint.clone()).unwrap()
}

// ─── Client ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_all_returns_remote_records() {
  let remote = FakeRemote::start().await;
  let c = client(&remote);
  assert!(c.fetch_all().await.unwrap().is_empty());

  remote.seed("Salary", 15000000.0, RecordKind::Income);
  remote.seed("Lunch", 50000.0, RecordKind::Expense);

  let records = c.fetch_all().await.unwrap();
  assert_eq!(records.len(), 2);
  assert_eq!(records[0].title, "Salary");
  assert_eq!(records[1].kind, RecordKind::Expense);
}

#[tokio::test]
async fn create_returns_server_assigned_id() {
  let remote = FakeRemote::start().await;
  let c = client(&remote);

  let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339("2025-11-01T08:30:00.250Z")
    .unwrap()
    .with_timezone(&Utc);
  let created = c
    .create(&NewRemoteRecord {
      title: "Lunch".into(),
      amount: 50000.0,
      kind: RecordKind::Expense,
      created_at,
    })
    .await
    .unwrap();

  assert!(!created.id.is_empty());
  assert_eq!(created.created_at, created_at);
  assert_eq!(remote.records(), vec![created]);
}

#[tokio::test]
async fn delete_removes_one_record() {
  let remote = FakeRemote::start().await;
  let keep = remote.seed("Keep", 1.0, RecordKind::Income);
  let gone = remote.seed("Gone", 2.0, RecordKind::Expense);

  client(&remote).delete(&gone.id).await.unwrap();

  assert_eq!(remote.records(), vec![keep]);
}

#[tokio::test]
async fn non_success_status_is_a_remote_error() {
  let remote = FakeRemote::start().await;
  let err = client(&remote).delete("404").await.unwrap_err();

  assert!(err.is_remote());
  assert!(matches!(err, Error::Status { status, .. } if status == reqwest::StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn transport_failure_is_a_remote_error() {
  // Bind then drop to obtain a local port with nothing listening.
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);

  let endpoint = reqwest::Url::parse(&format!("http://{addr}/records")).unwrap();
  let err = MirrorClient::new(endpoint).unwrap().fetch_all().await.unwrap_err();
  assert!(matches!(err, Error::Transport { .. }), "{err}");
}

#[tokio::test]
async fn test_connection_reports_reachability() {
  let remote = FakeRemote::start().await;
  let c = client(&remote);

  assert!(c.test_connection(remote.endpoint.as_str()).await);
  assert!(!c.test_connection(&remote.url("/nowhere")).await);
  assert!(!c.test_connection("not a url").await);
  assert!(!c.test_connection("http://127.0.0.1:1/records").await);
}

// ─── Endpoint configuration ──────────────────────────────────────────────────

#[tokio::test]
async fn endpoint_defaults_until_set() {
  let s = store().await;
  assert_eq!(configured_endpoint(&s).await.unwrap().as_str(), DEFAULT_ENDPOINT);

  let url = set_endpoint(&s, " https://mirror.example.com/api/records ").await.unwrap();
  assert_eq!(url.as_str(), "https://mirror.example.com/api/records");
  assert_eq!(configured_endpoint(&s).await.unwrap(), url);
}

#[tokio::test]
async fn invalid_endpoint_is_rejected_and_not_persisted() {
  let s = store().await;
  set_endpoint(&s, "https://mirror.example.com/records").await.unwrap();

  let err = set_endpoint(&s, "mirror.example.com/records").await.unwrap_err();
  assert!(matches!(err, Error::InvalidEndpoint { .. }));

  assert_eq!(
    configured_endpoint(&s).await.unwrap().as_str(),
    "https://mirror.example.com/records"
  );
}

#[tokio::test]
async fn unparsable_stored_endpoint_falls_back_to_default() {
  let s = store().await;
  s.set_setting(ENDPOINT_KEY, "::garbage::").await.unwrap();
  assert_eq!(configured_endpoint(&s).await.unwrap().as_str(), DEFAULT_ENDPOINT);
}

// ─── Sync ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sync_replaces_remote_with_local_active_records() {
  let s = store().await;
  s.add(input("Salary", 15000000.0, RecordKind::Income)).await.unwrap();
  s.add(input("Lunch", 50000.0, RecordKind::Expense)).await.unwrap();

  let remote = FakeRemote::start().await;
  let originals: Vec<_> = ["Old A", "Old B", "Old C"]
    .into_iter()
    .map(|t| remote.seed(t, 1.0, RecordKind::Expense))
    .collect();

  let report = sync_to_remote(&s, &client(&remote)).await.unwrap();
  assert_eq!(report.deleted, 3);
  assert_eq!(report.uploaded, 2);

  let after = remote.records();
  assert_eq!(after.len(), 2);
  assert!(after.iter().all(|r| originals.iter().all(|o| o.id != r.id)));

  let mut got: Vec<_> = after
    .iter()
    .map(|r| (r.title.clone(), r.amount, r.kind))
    .collect();
  got.sort_by(|a, b| a.0.cmp(&b.0));
  assert_eq!(
    got,
    vec![
      ("Lunch".to_string(), 50000.0, RecordKind::Expense),
      ("Salary".to_string(), 15000000.0, RecordKind::Income),
    ]
  );
}

#[tokio::test]
async fn sync_wipes_remote_records_it_cannot_fully_decode() {
  let s = store().await;
  s.add(input("Lunch", 50000.0, RecordKind::Expense)).await.unwrap();

  let remote = FakeRemote::start().await;
  remote.seed_raw(json!({
    "id": "900",
    "title": "Legacy",
    "amount": "5000",
    "type": "expense",
    "createdAt": "2025-11-01T08:30:00.000Z"
  }));
  remote.seed_raw(json!({ "id": 901, "type": "transfer" }));

  // The strict listing still refuses these shapes.
  assert!(matches!(client(&remote).fetch_all().await, Err(Error::Decode { .. })));

  let report = sync_to_remote(&s, &client(&remote)).await.unwrap();

  assert_eq!(report, crate::SyncReport { deleted: 2, uploaded: 1 });
  assert!(remote.raw_records().is_empty());
  let titles: Vec<_> = remote.records().into_iter().map(|r| r.title).collect();
  assert_eq!(titles, vec!["Lunch"]);
}

#[tokio::test]
async fn sync_never_uploads_trashed_records() {
  let s = store().await;
  s.add(input("Visible", 10.0, RecordKind::Income)).await.unwrap();
  let hidden = s.add(input("Hidden", 20.0, RecordKind::Expense)).await.unwrap();
  s.soft_delete(hidden.id).await.unwrap();

  let remote = FakeRemote::start().await;
  let report = sync_to_remote(&s, &client(&remote)).await.unwrap();

  assert_eq!(report.uploaded, 1);
  let titles: Vec<_> = remote.records().into_iter().map(|r| r.title).collect();
  assert_eq!(titles, vec!["Visible"]);
}

#[tokio::test]
async fn sync_of_empty_store_empties_remote() {
  let s = store().await;
  let remote = FakeRemote::start().await;
  remote.seed("Old", 1.0, RecordKind::Income);

  let report = sync_to_remote(&s, &client(&remote)).await.unwrap();

  assert_eq!(report, crate::SyncReport { deleted: 1, uploaded: 0 });
  assert!(remote.records().is_empty());
}

#[tokio::test]
async fn failed_delete_phase_stops_before_uploads() {
  let s = store().await;
  s.add(input("Salary", 100.0, RecordKind::Income)).await.unwrap();

  let remote = FakeRemote::start().await;
  remote.seed("Old", 1.0, RecordKind::Income);
  remote.fail_deletes();

  let err = sync_to_remote(&s, &client(&remote)).await.unwrap_err();

  assert!(matches!(err, SyncError::Delete { .. }), "{err}");
  assert!(!err.hint().is_empty());
  assert_eq!(remote.create_calls(), 0);
  assert_eq!(remote.records().len(), 1);
}

#[tokio::test]
async fn failed_upload_is_reported_without_rollback() {
  let s = store().await;
  s.add(input("Salary", 100.0, RecordKind::Income)).await.unwrap();

  let remote = FakeRemote::start().await;
  remote.seed("Old", 1.0, RecordKind::Income);
  remote.fail_creates();

  let err = sync_to_remote(&s, &client(&remote)).await.unwrap_err();

  assert!(matches!(err, SyncError::Upload { .. }), "{err}");
  // Deletes already applied stay applied.
  assert!(remote.records().is_empty());
}

#[tokio::test]
async fn unreachable_remote_fails_at_fetch() {
  let s = store().await;
  let endpoint = reqwest::Url::parse("http://127.0.0.1:1/records").unwrap();
  let err = sync_to_remote(&s, &MirrorClient::new(endpoint).unwrap())
    .await
    .unwrap_err();
  assert!(matches!(err, SyncError::Fetch(_)), "{err}");
}
