#![allow(clippy::unwrap_used)]
// Integration tests for `Session` and `BatchConfig` using wiremock.

use std::sync::Mutex;

use secrecy::SecretString;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tlnet_api::auth::compute_response;
use tlnet_api::{
    AuthOutcome, BatchConfig, CacheState, ConfigInvalidator, Error, Scope, Session, SessionConfig,
    UploadSource,
};

const LOGIN_PAGE: &str = r#"<html><body>
<div id="login_title">TLNET Supervisor</div>
<form method="post" action="/delta/login">
<input type="hidden" name="Challenge" value="ABCDEFGH">
<input type="hidden" name="Response" value="">
</form></body></html>"#;

const HOME_PAGE: &str = "<html><body><div id=\"status\">UPS Status</div></body></html>";

const SYSTEM_DOC: &str = "[System]\r\nIP=10.0.0.5\r\nSSH Port=22\r\nSysLog Server1=10.0.0.9\r\n";

// ── Helpers ─────────────────────────────────────────────────────────

fn config_for(server: &MockServer) -> SessionConfig {
    SessionConfig {
        port: Some(server.address().port()),
        use_tls: false,
        ..SessionConfig::new("127.0.0.1")
    }
}

async fn setup() -> (MockServer, Session) {
    let server = MockServer::start().await;
    let session = Session::with_client(config_for(&server), reqwest::Client::new());
    (server, session)
}

fn secret(value: &str) -> SecretString {
    value.to_owned().into()
}

async fn mount_challenge(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/home.asp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(server)
        .await;
}

async fn mount_download(server: &MockServer, field: &str, body: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/delta/adm_batch"))
        .and(body_string_contains(format!("{field}=Download")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}

#[derive(Default)]
struct RecordingInvalidator {
    scopes: Mutex<Vec<Scope>>,
}

impl ConfigInvalidator for RecordingInvalidator {
    fn invalidate(&self, scope: Scope) {
        self.scopes.lock().unwrap().push(scope);
    }
}

// ── Login handshake ─────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success_posts_md5_response() {
    let server = MockServer::start().await;
    mount_challenge(&server).await;

    let expected = compute_response("admin", "s3cret", "ABCDEFGH");
    Mock::given(method("POST"))
        .and(path("/delta/login"))
        .and(body_string_contains("Username=admin"))
        .and(body_string_contains("Challenge=ABCDEFGH"))
        .and(body_string_contains(format!("Response={expected}")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/home.asp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HOME_PAGE))
        .mount(&server)
        .await;

    let session = Session::new(config_for(&server));
    let outcome = session.authenticate(&secret("s3cret")).await.unwrap();

    assert_eq!(outcome, AuthOutcome::Authenticated);
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_login_rejected_leaves_session_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/home.asp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/delta/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let session = Session::connect(config_for(&server), &secret("wrong"))
        .await
        .unwrap();

    assert!(!session.is_authenticated());
    let result = session.config_map(Scope::System, false).await;
    assert!(
        matches!(result, Err(Error::NotAuthenticated { .. })),
        "expected NotAuthenticated, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_without_challenge_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/home.asp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HOME_PAGE))
        .mount(&server)
        .await;

    let session = Session::new(config_for(&server));
    let result = session.authenticate(&secret("pw")).await;
    assert!(matches!(result, Err(Error::Challenge { .. })));
}

#[tokio::test]
async fn test_login_server_error_is_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/home.asp"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let session = Session::new(config_for(&server));
    let err = session.authenticate(&secret("pw")).await.unwrap_err();
    assert!(matches!(err, Error::Status { status: 503, .. }));
    assert!(err.is_transient());
}

// ── Host changes ────────────────────────────────────────────────────

#[tokio::test]
async fn test_change_host_prompts_without_password() {
    let server = MockServer::start().await;
    mount_challenge(&server).await;
    Mock::given(method("POST"))
        .and(path("/delta/login"))
        .and(body_string_contains("password=prompted"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/home.asp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HOME_PAGE))
        .mount(&server)
        .await;

    let session = Session::new(SessionConfig {
        host: None,
        ..config_for(&server)
    });
    let prompted = Mutex::new(Vec::new());
    let prompt = |host: &str| -> Result<SecretString, Error> {
        prompted.lock().unwrap().push(host.to_owned());
        Ok(secret("prompted"))
    };

    let outcome = session
        .change_host("127.0.0.1", None, &prompt)
        .await
        .unwrap();

    assert!(outcome.is_authenticated());
    assert_eq!(prompted.lock().unwrap().as_slice(), ["127.0.0.1"]);
    assert_eq!(session.host().as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn test_change_host_prefers_explicit_password_and_clears_caches() {
    let server = MockServer::start().await;
    mount_download(&server, "DL_SYSTEM", SYSTEM_DOC, 1).await;
    mount_challenge(&server).await;
    Mock::given(method("POST"))
        .and(path("/delta/login"))
        .and(body_string_contains("password=explicit"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/home.asp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HOME_PAGE))
        .mount(&server)
        .await;

    let session = Session::with_client(config_for(&server), reqwest::Client::new());
    session.system_config().await.unwrap();
    assert!(session.cache_state(Scope::System).is_fresh());

    let never = |_: &str| -> Result<SecretString, Error> { panic!("prompt must not be used") };
    session
        .change_host("127.0.0.1", Some(&secret("explicit")), &never)
        .await
        .unwrap();

    assert!(matches!(session.cache_state(Scope::System), CacheState::Stale));
}

#[tokio::test]
async fn test_change_host_reuses_retained_password() {
    let server = MockServer::start().await;
    mount_challenge(&server).await;
    Mock::given(method("POST"))
        .and(path("/delta/login"))
        .and(body_string_contains("password=kept"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/home.asp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HOME_PAGE))
        .mount(&server)
        .await;

    let session = Session::new(SessionConfig {
        retain_password: true,
        ..config_for(&server)
    });
    let first = session.authenticate(&secret("kept")).await.unwrap();
    assert_eq!(first, AuthOutcome::Authenticated);

    // The second handshake needs a fresh challenge page.
    mount_challenge(&server).await;
    let never = |_: &str| -> Result<SecretString, Error> { panic!("prompt must not be used") };
    let second = session
        .change_host("127.0.0.1", None, &never)
        .await
        .unwrap();

    assert_eq!(second, AuthOutcome::Authenticated);
    assert!(session.is_authenticated());
}

// ── Configuration caching ───────────────────────────────────────────

#[tokio::test]
async fn test_config_is_fetched_once_while_fresh() {
    let (server, session) = setup().await;
    mount_download(&server, "DL_SYSTEM", SYSTEM_DOC, 1).await;

    let first = session.config_map(Scope::System, false).await.unwrap();
    let second = session.config_map(Scope::System, false).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.get("SSH Port"), Some("22"));
    assert!(session.cache_state(Scope::System).is_fresh());
    assert!(!session.cache_state(Scope::Snmp).is_fresh());
}

#[tokio::test]
async fn test_invalidate_and_force_refetch() {
    let (server, session) = setup().await;
    mount_download(&server, "DL_SYSTEM", SYSTEM_DOC, 3).await;

    session.system_config().await.unwrap();
    session.invalidate(Scope::System);
    assert!(!session.cache_state(Scope::System).is_fresh());
    session.system_config().await.unwrap();
    session.config_map(Scope::System, true).await.unwrap();
}

#[tokio::test]
async fn test_scopes_are_cached_independently() {
    let (server, session) = setup().await;
    mount_download(&server, "DL_SYSTEM", SYSTEM_DOC, 1).await;
    mount_download(&server, "DL_SNMP", "Community=public\n", 2).await;

    session.system_config().await.unwrap();
    let snmp = session.snmp_config().await.unwrap();
    assert_eq!(snmp.get("Community"), Some("public"));

    session.invalidate(Scope::Snmp);
    session.system_config().await.unwrap();
    session.snmp_config().await.unwrap();
}

#[tokio::test]
async fn test_failed_refresh_leaves_cache_stale() {
    let (server, session) = setup().await;
    Mock::given(method("POST"))
        .and(path("/delta/adm_batch"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = session.system_config().await;
    assert!(matches!(result, Err(Error::Status { status: 500, .. })));
    assert!(!session.cache_state(Scope::System).is_fresh());
}

// ── Batch transfer ──────────────────────────────────────────────────

#[tokio::test]
async fn test_download_to_file_writes_document() {
    let (server, session) = setup().await;
    mount_download(&server, "DL_SNMP", "Community=public\r\n", 1).await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("snmp.ini");
    let written = BatchConfig::new(&session)
        .download_to_file(Scope::Snmp, Some(&target))
        .await
        .unwrap();

    assert_eq!(written, target);
    assert_eq!(
        std::fs::read_to_string(&target).unwrap(),
        "Community=public\r\n"
    );
}

#[tokio::test]
async fn test_upload_missing_file_sends_nothing() {
    let (server, session) = setup().await;
    Mock::given(method("POST"))
        .and(path("/delta/adm_batch"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.ini");
    let result = BatchConfig::new(&session)
        .upload(Scope::System, missing.as_path())
        .await;

    match result {
        Err(err @ Error::ResourceNotFound { .. }) => assert!(err.is_recoverable()),
        other => panic!("expected ResourceNotFound, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_upload_posts_multipart_and_invalidates_scope() {
    let (server, session) = setup().await;
    Mock::given(method("POST"))
        .and(path("/delta/adm_batch"))
        .and(body_string_contains("name=\"UL_SNMP\""))
        .and(body_string_contains("name=\"UL_F_SNMP\"; filename=\"snmp.ini\""))
        .and(body_string_contains("Community=private"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("snmp.ini");
    std::fs::write(&file, "Community=private\r\n").unwrap();

    let recorder = RecordingInvalidator::default();
    let receipt = BatchConfig::with_invalidator(&session, &recorder)
        .upload(Scope::Snmp, UploadSource::File(file))
        .await
        .unwrap();

    assert_eq!(receipt.scope, Scope::Snmp);
    assert_eq!(receipt.bytes, 19);
    assert_eq!(receipt.offline_for, tlnet_api::APPLY_DOWNTIME);
    assert_eq!(recorder.scopes.lock().unwrap().as_slice(), [Scope::Snmp]);
}

#[tokio::test]
async fn test_upload_invalidates_session_cache() {
    let (server, session) = setup().await;
    mount_download(&server, "DL_SYSTEM", SYSTEM_DOC, 1).await;
    Mock::given(method("POST"))
        .and(path("/delta/adm_batch"))
        .and(body_string_contains("UL_SYSTEM"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    session.system_config().await.unwrap();
    BatchConfig::new(&session)
        .upload(
            Scope::System,
            UploadSource::Bytes {
                file_name: "system_config.ini".into(),
                data: SYSTEM_DOC.as_bytes().to_vec(),
            },
        )
        .await
        .unwrap();

    assert!(!session.cache_state(Scope::System).is_fresh());
}
