use optimizer_console::api::{
    AlertRequest, AnalyzeRequest, CostSimulationRequest, Metric, SERVICE_UNAVAILABLE_MESSAGE,
};
use optimizer_console::config::{save_settings, Settings, StatePaths};
use optimizer_console::console::{ActionResult, ConsoleError, ConsoleSession};
use optimizer_console::workflow::{OperationOutcome, SelectOutcome, Stage};
use serde_json::json;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::{tempdir, TempDir};

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: String,
    path: String,
    auth_header: Option<String>,
    content_type: Option<String>,
    body: String,
}

struct MockApiServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl MockApiServer {
    fn start<F>(expected_requests: usize, responder: F) -> Self
    where
        F: Fn(&str, &str) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let requests_for_thread = Arc::clone(&requests);

        let handle = thread::spawn(move || {
            for _ in 0..expected_requests {
                let (mut stream, _) = listener.accept().expect("accept");
                let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

                let mut request_line = String::new();
                reader
                    .read_line(&mut request_line)
                    .expect("read request line");
                let mut parts = request_line.split_whitespace();
                let method = parts.next().unwrap_or("GET").to_string();
                let path = parts.next().unwrap_or("/").to_string();

                let mut auth_header = None;
                let mut content_type = None;
                let mut content_length = 0usize;
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).expect("read header");
                    if line == "\r\n" || line.is_empty() {
                        break;
                    }
                    let Some((name, value)) = line.split_once(':') else {
                        continue;
                    };
                    let value = value.trim().to_string();
                    match name.trim().to_ascii_lowercase().as_str() {
                        "authorization" => auth_header = Some(value),
                        "content-type" => content_type = Some(value),
                        "content-length" => content_length = value.parse().unwrap_or(0),
                        _ => {}
                    }
                }

                let mut body = vec![0_u8; content_length];
                if content_length > 0 {
                    reader.read_exact(&mut body).expect("read body");
                }

                let (status, response_body) = responder(&method, &path);
                requests_for_thread
                    .lock()
                    .expect("lock requests")
                    .push(RecordedRequest {
                        method,
                        path,
                        auth_header,
                        content_type,
                        body: String::from_utf8_lossy(&body).to_string(),
                    });

                let response = if status == 204 {
                    "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n".to_string()
                } else {
                    format!(
                        "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        response_body.len(),
                        response_body
                    )
                };
                stream
                    .write_all(response.as_bytes())
                    .expect("write response");
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
            handle: Some(handle),
        }
    }

    fn finish(mut self) -> Vec<RecordedRequest> {
        if let Some(handle) = self.handle.take() {
            handle.join().expect("join mock server");
        }
        self.requests.lock().expect("lock requests").clone()
    }
}

fn state_root_for(base_url: &str) -> (TempDir, StatePaths) {
    let temp = tempdir().expect("tempdir");
    let paths = StatePaths::new(temp.path().join(".optconsole"));
    let settings = Settings {
        api_base_url: base_url.to_string(),
        ..Settings::default()
    };
    save_settings(&paths, &settings).expect("save settings");
    (temp, paths)
}

fn summary_body() -> String {
    json!({"status": "SUCCESS", "data": {"totalSavings": 120.5}}).to_string()
}

fn metric_body() -> String {
    json!({"status": "SUCCESS", "data": {
        "id": "m-1", "resourceId": "ec2-123", "cpu": 12.4, "memory": 30.2, "disk": 40.1
    }})
    .to_string()
}

fn cost_body() -> String {
    json!({
        "currentMonthlyCost": 33.87, "projectedMonthlyCost": 16.94,
        "monthlySavings": 16.93, "savingsPercentage": 49.99
    })
    .to_string()
}

fn whatif_body() -> String {
    let entry = |instance: &str, savings: f64| {
        json!({
            "recommendedInstanceType": instance,
            "result": {
                "currentMonthlyCost": 33.87,
                "projectedMonthlyCost": 33.87 - savings,
                "monthlySavings": savings,
                "savingsPercentage": savings / 33.87 * 100.0
            }
        })
    };
    json!({"status": "SUCCESS", "data": [
        entry("t2.medium", 0.0),
        entry("m5.xlarge", -106.37),
        entry("t2.micro", 25.41),
        entry("m5.large", -36.21),
        entry("t2.small", 16.93)
    ]})
    .to_string()
}

fn respond(path: &str) -> (u16, String) {
    match path {
        "/api/cost/history/summary" => (200, summary_body()),
        "/api/metrics/collect" => (200, metric_body()),
        "/api/cost/simulate" => (200, cost_body()),
        "/api/cost/whatif" => (200, whatif_body()),
        _ => (404, json!({"message": "RESOURCE_NOT_FOUND"}).to_string()),
    }
}

#[test]
fn console_session_login_then_collect_metric_unlocks_recommendations() {
    let server = MockApiServer::start(2, |_, path| respond(path));
    let (_temp, paths) = state_root_for(&server.base_url);

    let mut session = ConsoleSession::open(paths.clone()).expect("open session");
    assert_eq!(session.controller().watermark(), -1);

    session.login("admin:admin123").expect("login");
    assert_eq!(session.controller().active(), Stage::Dashboard);
    assert_eq!(session.controller().watermark(), 0);

    let stored = session
        .collect_metric(&Metric::new("ec2-123", 12.4, 30.2, 40.1))
        .expect("collect metric");
    assert_eq!(stored.resource_id, "ec2-123");
    assert_eq!(session.controller().active(), Stage::Recommendations);
    assert_eq!(
        session.controller().watermark(),
        Stage::Recommendations.index() as i64
    );
    assert!(matches!(
        session.runner().last_result(),
        Some(ActionResult::Metric(_))
    ));

    let requests = server.finish();
    assert_eq!(requests[0].path, "/api/cost/history/summary");
    assert_eq!(
        requests[0].auth_header.as_deref(),
        Some("Basic YWRtaW46YWRtaW4xMjM=")
    );
    assert_eq!(requests[1].method, "POST");
    assert_eq!(requests[1].path, "/api/metrics/collect");
}

#[test]
fn console_session_simulate_cost_advances_to_alerts() {
    let server = MockApiServer::start(3, |_, path| respond(path));
    let (_temp, paths) = state_root_for(&server.base_url);
    let mut session = ConsoleSession::open(paths).expect("open session");
    session.login("admin:admin123").expect("login");

    let result = session
        .simulate_cost(&CostSimulationRequest {
            current_instance_type: "t2.medium".to_string(),
            recommended_instance_type: "t2.small".to_string(),
            action: "DOWNSCALE".to_string(),
        })
        .expect("simulate");
    assert_eq!(result.monthly_savings, 16.93);
    assert_eq!(session.controller().active(), Stage::Alerts);
    assert_eq!(session.controller().watermark(), Stage::Alerts.index() as i64);

    let entries = session
        .compare_what_if("t2.medium", &[], "DOWNSCALE")
        .expect("what-if");
    let savings = entries
        .iter()
        .map(|e| e.result.monthly_savings)
        .collect::<Vec<_>>();
    assert_eq!(savings, vec![25.41, 16.93, 0.0, -36.21, -106.37]);
    assert_eq!(entries[0].recommended_instance_type, "t2.micro");
    assert_eq!(session.controller().active(), Stage::Alerts);

    let requests = server.finish();
    let body: serde_json::Value = serde_json::from_str(&requests[2].body).expect("body");
    assert_eq!(
        body,
        json!({
            "currentInstanceType": "t2.medium",
            "candidates": ["t2.micro", "t2.small", "t2.medium", "m5.large", "m5.xlarge"],
            "action": "DOWNSCALE"
        })
    );
}

#[test]
fn console_session_rejected_login_clears_credential() {
    let server = MockApiServer::start(1, |_, _| (401, String::new()));
    let (_temp, paths) = state_root_for(&server.base_url);
    let mut session = ConsoleSession::open(paths.clone()).expect("open session");

    let err = session.login("admin:wrong").expect_err("rejected");
    assert!(matches!(err, ConsoleError::InvalidCredentials));
    assert_eq!(err.to_string(), "Invalid username or password");
    assert_eq!(
        session.runner().error().as_deref(),
        Some("Invalid username or password")
    );
    assert!(!session.is_authenticated());
    assert!(!paths.credential_path().exists());
    assert_eq!(session.controller().watermark(), -1);
    server.finish();
}

#[test]
fn console_session_login_accepts_empty_summary_answer() {
    let server = MockApiServer::start(1, |_, _| (204, String::new()));
    let (_temp, paths) = state_root_for(&server.base_url);
    let mut session = ConsoleSession::open(paths.clone()).expect("open session");

    session.login("admin:admin123").expect("empty answer signs in");
    assert!(session.is_authenticated());
    assert!(paths.credential_path().exists());
    assert_eq!(session.controller().watermark(), 0);
    assert_eq!(
        session.runner().last_result(),
        Some(ActionResult::SignedIn(None))
    );
    server.finish();
}

#[test]
fn console_session_login_against_unreachable_service_reports_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base_url = format!("http://{}", listener.local_addr().expect("addr"));
    drop(listener);
    let (_temp, paths) = state_root_for(&base_url);
    let mut session = ConsoleSession::open(paths).expect("open session");

    let err = session.login("admin:admin123").expect_err("unreachable");
    assert_eq!(err.to_string(), SERVICE_UNAVAILABLE_MESSAGE);
    assert!(!session.is_authenticated());
}

#[test]
fn console_session_failed_action_keeps_navigation_and_retains_error() {
    let server = MockApiServer::start(3, |_, path| respond(path));
    let (_temp, paths) = state_root_for(&server.base_url);
    let mut session = ConsoleSession::open(paths).expect("open session");
    session.login("admin:admin123").expect("login");
    session.continue_to_metrics().expect("continue");
    let before = session.controller().state();

    let err = session.load_metrics("ec2-missing").expect_err("404");
    assert_eq!(err.to_string(), "Resource not found");
    assert_eq!(session.controller().state(), before);
    assert_eq!(
        session.runner().outcome(),
        OperationOutcome::Failure("Resource not found".to_string())
    );

    session
        .collect_metric(&Metric::new("", 1.0, 2.0, 3.0))
        .expect("collect with default resource");
    assert_eq!(session.runner().error(), None);

    let requests = server.finish();
    assert_eq!(requests[1].path, "/api/metrics/ec2-missing");
    let body: serde_json::Value = serde_json::from_str(&requests[2].body).expect("body");
    assert_eq!(body["resourceId"], "ec2-123");
}

#[test]
fn console_session_state_survives_reopen_until_logout() {
    let server = MockApiServer::start(1, |_, path| respond(path));
    let (_temp, paths) = state_root_for(&server.base_url);
    {
        let mut session = ConsoleSession::open(paths.clone()).expect("open session");
        session.login("admin:admin123").expect("login");
        session.continue_to_metrics().expect("continue");
    }
    server.finish();

    let mut session = ConsoleSession::open(paths.clone()).expect("reopen");
    assert!(session.is_authenticated());
    assert_eq!(session.controller().active(), Stage::Metrics);
    assert_eq!(session.controller().watermark(), 1);
    assert_eq!(
        session.select(Stage::Cost).expect("select"),
        SelectOutcome::Ignored {
            requested: Stage::Cost,
            active: Stage::Metrics
        }
    );

    session.logout().expect("logout");
    assert!(!paths.credential_path().exists());

    let session = ConsoleSession::open(paths).expect("reopen after logout");
    assert!(!session.is_authenticated());
    assert_eq!(session.controller().watermark(), -1);
}

#[test]
fn console_session_stored_credential_without_state_starts_at_dashboard() {
    let temp = tempdir().expect("tempdir");
    let paths = StatePaths::new(temp.path());
    fs::create_dir_all(paths.credential_path().parent().expect("parent")).expect("mkdir");
    fs::write(paths.credential_path(), "admin:admin123\n").expect("write credential");

    let session = ConsoleSession::open(paths).expect("open");
    assert!(session.is_authenticated());
    assert_eq!(session.controller().watermark(), 0);
    assert_eq!(
        session.auth().header().as_deref(),
        Some("Basic YWRtaW46YWRtaW4xMjM=")
    );
}

#[test]
fn console_session_dashboard_tolerates_partial_failures() {
    let server = MockApiServer::start(4, |_, path| match path {
        "/api/metrics/resources" => (200, json!(["ec2-123", "ec2-456"]).to_string()),
        "/api/optimize/latest" => (500, "boom".to_string()),
        _ => (200, summary_body()),
    });
    let (_temp, paths) = state_root_for(&server.base_url);
    let mut session = ConsoleSession::open(paths).expect("open session");
    session.login("admin:admin123").expect("login");

    let snapshot = session.load_dashboard().expect("dashboard");
    assert_eq!(snapshot.resources.len(), 2);
    assert_eq!(snapshot.latest_recommendation, None);
    assert_eq!(snapshot.savings.map(|s| s.total_savings), Some(120.5));
    server.finish();
}

#[test]
fn console_session_backward_navigation_keeps_previous_result() {
    let server = MockApiServer::start(3, |_, path| match path {
        "/api/optimize/ec2-123" => (
            200,
            json!([{"id": 1, "resourceId": "ec2-123", "recommendationType": "DOWNSCALE",
                    "description": "CPU below 20%", "status": "PENDING", "confidence": 0.9}])
            .to_string(),
        ),
        "/api/optimize/analyze" => (204, String::new()),
        _ => respond(path),
    });
    let (_temp, paths) = state_root_for(&server.base_url);
    let mut session = ConsoleSession::open(paths).expect("open session");
    session.login("admin:admin123").expect("login");

    let recs = session.load_recommendations("").expect("recommendations");
    assert_eq!(recs[0].recommendation_type, "DOWNSCALE");
    assert_eq!(session.controller().active(), Stage::Cost);

    session.select(Stage::Dashboard).expect("back to dashboard");
    assert!(matches!(
        session.runner().last_result(),
        Some(ActionResult::Recommendations(ref list)) if list.len() == 1
    ));

    let analyzed = session
        .analyze_usage(&AnalyzeRequest::new("ec2-123", Some(10.0), None, Some(f64::NAN)))
        .expect("analyze");
    assert_eq!(analyzed, None);
    assert_eq!(session.controller().active(), Stage::Cost);

    let requests = server.finish();
    let body: serde_json::Value = serde_json::from_str(&requests[2].body).expect("body");
    assert_eq!(body, json!({"resourceId": "ec2-123", "avgCpu": 10.0}));
}

#[test]
fn console_session_alert_has_no_next_stage() {
    let server = MockApiServer::start(2, |_, path| match path {
        "/api/alerts/send" => (
            200,
            json!({"status": "SUCCESS", "data": "Alert sent successfully"}).to_string(),
        ),
        _ => respond(path),
    });
    let (_temp, paths) = state_root_for(&server.base_url);
    let mut session = ConsoleSession::open(paths.clone()).expect("open session");
    session.login("admin:admin123").expect("login");

    let ack = session
        .send_alert(&AlertRequest {
            recipient: "test@example.com".to_string(),
            message: "hello".to_string(),
            severity: "LOW".to_string(),
        })
        .expect("alert");
    assert_eq!(ack, "Alert sent successfully");
    assert_eq!(session.controller().active(), Stage::Dashboard);
    assert_eq!(session.controller().watermark(), 0);
    server.finish();

    let log = fs::read_to_string(paths.root.join("logs/console.log")).expect("log");
    assert!(log.contains("POST /api/alerts/send status=200"));
    assert!(!log.contains("admin123"));
}

#[test]
fn console_session_actions_require_sign_in() {
    let (_temp, paths) = state_root_for("http://127.0.0.1:9");
    let mut session = ConsoleSession::open(paths).expect("open session");
    assert!(matches!(
        session.simulate_cost(&CostSimulationRequest {
            current_instance_type: "t2.medium".to_string(),
            recommended_instance_type: "t2.small".to_string(),
            action: "DOWNSCALE".to_string(),
        }),
        Err(ConsoleError::NotAuthenticated)
    ));
    assert!(matches!(
        session.continue_to_metrics(),
        Err(ConsoleError::NotAuthenticated)
    ));
}
