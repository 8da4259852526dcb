//! Minimal HTTP/1.1 backend that answers canned JSON per route.

use std::{
    collections::HashMap,
    io::{BufRead, BufReader, Read, Write},
    net::{TcpListener, TcpStream},
    sync::{Arc, Mutex},
    thread,
    time::{Duration, Instant},
};

#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    /// Path without the query string.
    pub path: String,
    pub query: String,
    /// Value of the `Accept` header, empty when absent.
    pub accept: String,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Clone)]
struct Reply {
    status: u16,
    content_type: &'static str,
    body: String,
}

type Routes = Arc<Mutex<HashMap<(String, String), Reply>>>;

pub struct StubBackend {
    base_url: String,
    routes: Routes,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubBackend {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub backend");
        let addr = listener.local_addr().expect("stub address");
        let routes: Routes = Arc::default();
        let requests: Arc<Mutex<Vec<Recorded>>> = Arc::default();
        let (thread_routes, thread_requests) = (routes.clone(), requests.clone());
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let routes = thread_routes.clone();
                let requests = thread_requests.clone();
                thread::spawn(move || serve(stream, &routes, &requests));
            }
        });
        Self {
            base_url: format!("http://{addr}"),
            routes,
            requests,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Answer `method path` with `status` and a JSON body.
    pub fn route(&self, method: &str, path: &str, status: u16, body: serde_json::Value) {
        self.insert(method, path, status, "application/json", body.to_string());
    }

    /// Answer `method path` with a plain-text body.
    pub fn route_text(&self, method: &str, path: &str, body: &str) {
        self.insert(method, path, 200, "text/plain", body.to_string());
    }

    fn insert(&self, method: &str, path: &str, status: u16, content_type: &'static str, body: String) {
        self.routes.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            Reply {
                status,
                content_type,
                body,
            },
        );
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == method && request.path == path)
            .collect()
    }

    /// Block until a request for `method path` arrived, or panic after a while.
    pub fn wait_for(&self, method: &str, path: &str) -> Recorded {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(request) = self.requests_to(method, path).into_iter().next() {
                return request;
            }
            assert!(Instant::now() < deadline, "no {method} {path} request arrived");
            thread::sleep(Duration::from_millis(10));
        }
    }
}

fn serve(stream: TcpStream, routes: &Routes, requests: &Mutex<Vec<Recorded>>) {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();
    let mut content_length = 0usize;
    let mut accept = String::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.trim().parse().unwrap_or(0);
        } else if name.eq_ignore_ascii_case("accept") {
            accept = value.trim().to_string();
        }
    }
    let mut body = vec![0u8; content_length];
    if reader.read_exact(&mut body).is_err() {
        return;
    }
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path.to_string(), query.to_string()),
        None => (target.clone(), String::new()),
    };
    let reply = routes
        .lock()
        .unwrap()
        .get(&(method.clone(), path.clone()))
        .cloned()
        .unwrap_or(Reply {
            status: 404,
            content_type: "application/json",
            body: r#"{"error":"not found"}"#.to_string(),
        });
    requests.lock().unwrap().push(Recorded {
        method,
        path,
        query,
        accept,
        body: String::from_utf8_lossy(&body).into_owned(),
    });
    let response = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reply.content_type,
        reply.body.len(),
        reply.body
    );
    let mut stream = reader.into_inner();
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// Poll `controller` until its workers are idle.
pub fn settle(controller: &mut agrodesk::egui_app::controller::AppController) {
    let deadline = Instant::now() + Duration::from_secs(20);
    while controller.is_busy() && Instant::now() < deadline {
        controller.poll_background_jobs();
        thread::sleep(Duration::from_millis(10));
    }
    assert!(!controller.is_busy(), "jobs did not finish in time");
}
