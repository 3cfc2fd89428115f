use std::fs;
use std::net::TcpListener;
use std::thread;

use pitchside::{CellValue, DType, ExploreError, Explorer};
use tempfile::TempDir;
use tiny_http::{Header, Response, Server, StatusCode};

const SEASON_CSV: &str = "\
Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR,Referee
11/08/2023,Burnley,Man City,0,3,A,C Pawson
12/08/2023,Arsenal,Nott'm Forest,2,1,H,
12/08/2023,Bournemouth,West Ham,1,1,D,P Bankes
12/08/2023,Brighton,Luton,4,,H,D Coote
";

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Serve one request with the given status and body, returning the URL.
fn serve_once(status: u16, body: &'static str) -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let header = Header::from_bytes("Content-Type", "application/json").unwrap();
            let response = Response::from_string(body)
                .with_status_code(StatusCode(status))
                .with_header(header);
            let _ = request.respond(response);
        }
    });
    format!("http://{addr}/matches")
}

#[test]
fn csv_rows_and_header_match_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "season.csv", SEASON_CSV);

    let mut explorer = Explorer::new();
    let ds = explorer.load_from_csv(&path).unwrap();

    assert_eq!(ds.len(), 4);
    assert_eq!(
        ds.column_names(),
        vec!["Date", "HomeTeam", "AwayTeam", "FTHG", "FTAG", "FTR", "Referee"]
    );
    assert_eq!(ds.column("FTHG").unwrap().dtype, DType::Integer);
    assert_eq!(ds.get(3, "FTAG"), Some(&CellValue::Null));
    assert_eq!(ds.get(1, "Referee"), Some(&CellValue::Null));
    assert!(explorer.status_message.is_none());
}

#[test]
fn missing_file_leaves_dataset_unset() {
    let dir = TempDir::new().unwrap();
    let mut explorer = Explorer::new();

    let err = explorer
        .load_from_csv(dir.path().join("nope.csv"))
        .unwrap_err();
    assert!(matches!(err, ExploreError::Load { .. }));
    assert!(explorer.dataset().is_none());
    assert!(explorer.status_message.is_some());
}

#[test]
fn failed_load_keeps_previous_dataset() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "season.csv", SEASON_CSV);
    let bad = write(&dir, "broken.json", "{ not json");

    let mut explorer = Explorer::new();
    explorer.load_from_csv(&good).unwrap();
    assert!(explorer.load_from_json(&bad).is_err());

    assert_eq!(explorer.dataset().map(|d| d.len()), Some(4));
}

#[test]
fn json_records_load() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "season.json",
        r#"[
            {"HomeTeam": "A", "AwayTeam": "B", "FTHG": 2, "FTAG": 1},
            {"HomeTeam": "C", "AwayTeam": "D", "FTHG": null, "FTAG": 0}
        ]"#,
    );

    let mut explorer = Explorer::new();
    let ds = explorer.load_from_json(&path).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.column_names(), vec!["HomeTeam", "AwayTeam", "FTHG", "FTAG"]);
    assert_eq!(ds.column("FTHG").unwrap().missing_count(), 1);
}

#[test]
fn api_json_body_loads() {
    let url = serve_once(
        200,
        r#"[{"HomeTeam": "A", "FTHG": 3}, {"HomeTeam": "B", "FTHG": 0}]"#,
    );

    let mut explorer = Explorer::new();
    let ds = explorer.load_from_api(&url).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.get(0, "FTHG"), Some(&CellValue::Integer(3)));
}

#[test]
fn api_error_status_is_reported_and_state_kept() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "season.csv", SEASON_CSV);
    let url = serve_once(404, r#"{"error": "not found"}"#);

    let mut explorer = Explorer::new();
    explorer.load_from_csv(&good).unwrap();
    let err = explorer.load_from_api(&url).unwrap_err();

    assert!(matches!(err, ExploreError::HttpStatus(404)));
    assert_eq!(explorer.dataset().map(|d| d.len()), Some(4));
    assert!(explorer
        .status_message
        .as_deref()
        .is_some_and(|m| m.contains("404")));
}

#[test]
fn unreachable_api_is_a_load_error() {
    // Bind then drop to get a port nothing listens on.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let mut explorer = Explorer::new();
    let err = explorer
        .load_from_api(&format!("http://127.0.0.1:{port}/"))
        .unwrap_err();
    assert!(matches!(err, ExploreError::Load { .. }));
    assert!(explorer.dataset().is_none());
}
