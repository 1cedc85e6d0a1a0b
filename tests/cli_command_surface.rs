use optimizer_console::app::command_handlers::run_cli_in;
use optimizer_console::config::{save_settings, Settings, StatePaths};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::{Command, Output};
use std::thread;
use tempfile::tempdir;

fn run(home: &Path, args: &[&str]) -> Output {
    run_with_env(home, args, &[])
}

fn run_with_env(home: &Path, args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_optconsole"));
    cmd.args(args)
        .env("HOME", home)
        .env("OPTCONSOLE_HOME", home.join(".optconsole"))
        .env_remove("OPTCONSOLE_API_BASE");
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().expect("run optconsole")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_ok(output: &Output) {
    assert!(
        output.status.success(),
        "stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
}

fn assert_err_contains(output: &Output, needle: &str) {
    assert!(
        !output.status.success(),
        "expected failure, stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
    let text = format!("{}{}", stdout(output), stderr(output));
    assert!(
        text.contains(needle),
        "expected error to contain `{needle}`, got:\n{text}"
    );
}

fn kv_lines(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn args(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|v| v.to_string()).collect()
}

/// Serves canned responses keyed by request path, one connection per request.
fn serve(
    expected_requests: usize,
    routes: Vec<(&'static str, u16, String)>,
) -> (String, thread::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
    let addr = listener.local_addr().expect("local addr");
    let handle = thread::spawn(move || {
        for _ in 0..expected_requests {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("read request line");
            let path = request_line
                .split_whitespace()
                .nth(1)
                .unwrap_or("/")
                .to_string();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).expect("read header");
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.trim().eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap_or(0);
                    }
                }
            }
            let mut body = vec![0_u8; content_length];
            reader.read_exact(&mut body).expect("read body");

            let (status, response_body) = routes
                .iter()
                .find(|(route, _, _)| *route == path)
                .map(|(_, status, body)| (*status, body.clone()))
                .unwrap_or((404, r#"{"message":"NOT_FOUND"}"#.to_string()));
            let response = format!(
                "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                response_body.len(),
                response_body
            );
            stream.write_all(response.as_bytes()).expect("write response");
        }
    });
    (format!("http://{addr}"), handle)
}

#[test]
fn cli_without_arguments_prints_help() {
    let temp = tempdir().expect("tempdir");
    let output = run(temp.path(), &[]);
    assert_ok(&output);
    let text = stdout(&output);
    assert!(text.starts_with("Commands:"));
    for verb in ["login", "logout", "status", "stage", "metrics collect", "cost whatif"] {
        assert!(text.contains(verb), "help is missing `{verb}`");
    }
}

#[test]
fn cli_unknown_command_fails() {
    let temp = tempdir().expect("tempdir");
    let output = run(temp.path(), &["deploy"]);
    assert_err_contains(&output, "unknown command `deploy`");
}

#[test]
fn cli_status_when_signed_out_reports_locked_stages() {
    let temp = tempdir().expect("tempdir");
    let output = run(temp.path(), &["status"]);
    assert_ok(&output);
    let kv = kv_lines(&stdout(&output));
    assert_eq!(kv.get("authenticated").map(String::as_str), Some("false"));
    assert_eq!(kv.get("user").map(String::as_str), Some("none"));
    assert_eq!(kv.get("watermark").map(String::as_str), Some("-1"));
    assert_eq!(kv.get("stage.dashboard").map(String::as_str), Some("locked"));
    assert_eq!(kv.get("stage.alerts").map(String::as_str), Some("locked"));
}

#[test]
fn cli_actions_require_sign_in() {
    let temp = tempdir().expect("tempdir");
    let output = run(
        temp.path(),
        &["cost", "simulate", "t2.medium", "t2.small", "DOWNSCALE"],
    );
    assert_err_contains(&output, "not signed in");
}

#[test]
fn cli_rejects_malformed_login_and_stage_names() {
    let temp = tempdir().expect("tempdir");
    assert_err_contains(&run(temp.path(), &["login", "admin"]), "username:password");
    assert_err_contains(&run(temp.path(), &["stage", "billing"]), "stage must be one of");
    assert_err_contains(
        &run(temp.path(), &["metrics", "collect", "ec2-1", "x", "1", "1"]),
        "`cpu` must be a number",
    );
}

#[test]
fn cli_config_init_then_show_honors_env_override() {
    let temp = tempdir().expect("tempdir");
    let init = run(temp.path(), &["config", "init"]);
    assert_ok(&init);
    let kv = kv_lines(&stdout(&init));
    assert_eq!(kv.get("config").map(String::as_str), Some("written"));
    assert!(temp.path().join(".optconsole/config.yaml").exists());

    assert_err_contains(&run(temp.path(), &["config", "init"]), "config already exists");

    let show = run(temp.path(), &["config", "show"]);
    assert_ok(&show);
    assert!(stdout(&show).contains("api_base_url: http://localhost:8080"));

    let overridden = run_with_env(
        temp.path(),
        &["config", "show"],
        &[("OPTCONSOLE_API_BASE", "http://optimizer.internal:9000")],
    );
    assert_ok(&overridden);
    assert!(stdout(&overridden).contains("api_base_url: http://optimizer.internal:9000"));
}

#[test]
fn cli_invalid_config_fails_every_session_command() {
    let temp = tempdir().expect("tempdir");
    let root = temp.path().join(".optconsole");
    fs::create_dir_all(&root).expect("create root");
    fs::write(root.join("config.yaml"), "api_base_url: ftp://nowhere\n").expect("write config");
    assert_err_contains(&run(temp.path(), &["status"]), "api_base_url");
}

#[test]
fn cli_walks_the_workflow_across_invocations() {
    let summary = r#"{"status":"SUCCESS","data":{"totalSavings":42.0}}"#.to_string();
    let metric = r#"{"status":"SUCCESS","data":{"resourceId":"ec2-123","cpu":12.4,"memory":30.2,"disk":40.1}}"#.to_string();
    let (base_url, server) = serve(
        2,
        vec![
            ("/api/cost/history/summary", 200, summary),
            ("/api/metrics/collect", 200, metric),
        ],
    );
    let temp = tempdir().expect("tempdir");
    let paths = StatePaths::new(temp.path().join(".optconsole"));
    save_settings(
        &paths,
        &Settings {
            api_base_url: base_url,
            ..Settings::default()
        },
    )
    .expect("save settings");

    let login = run_cli_in(&paths, &args(&["login", "admin:admin123"])).expect("login");
    let kv = kv_lines(&login);
    assert_eq!(kv.get("login").map(String::as_str), Some("ok"));
    assert_eq!(kv.get("user").map(String::as_str), Some("admin"));
    assert_eq!(kv.get("stage.dashboard").map(String::as_str), Some("active"));
    assert_eq!(kv.get("stage.metrics").map(String::as_str), Some("locked"));

    let ignored = run_cli_in(&paths, &args(&["stage", "cost"])).expect("stage");
    assert!(ignored.starts_with("ignored=cost (locked)"));

    let collected = run_cli_in(
        &paths,
        &args(&["metrics", "collect", "ec2-123", "12.4", "30.2", "40.1"]),
    )
    .expect("collect");
    let kv = kv_lines(&collected);
    assert_eq!(kv.get("active_stage").map(String::as_str), Some("recommendations"));
    assert_eq!(kv.get("watermark").map(String::as_str), Some("2"));
    server.join().expect("join mock server");

    let back = run_cli_in(&paths, &args(&["stage", "metrics"])).expect("stage back");
    assert!(back.starts_with("selected=metrics"));
    let kv = kv_lines(&back);
    assert_eq!(kv.get("stage.recommendations").map(String::as_str), Some("unlocked"));

    let status = run_cli_in(&paths, &args(&["status"])).expect("status");
    let kv = kv_lines(&status);
    assert_eq!(kv.get("authenticated").map(String::as_str), Some("true"));
    assert_eq!(kv.get("active_stage").map(String::as_str), Some("metrics"));

    let logout = run_cli_in(&paths, &args(&["logout"])).expect("logout");
    assert_eq!(kv_lines(&logout).get("watermark").map(String::as_str), Some("-1"));
    assert!(!paths.credential_path().exists());
    assert!(!paths.workflow_state_path().exists());
}
