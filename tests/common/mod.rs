#![allow(dead_code)]

use std::{
    io::{BufRead, BufReader, Read, Write},
    net::{TcpListener, TcpStream},
    sync::{Arc, Mutex, MutexGuard},
    thread::{self, JoinHandle},
};

use user_admin::{
    core::services::{ServiceResult, UserApi},
    domain::{Record, RecordId},
    errors::NetworkError,
};

/// Which operations the fake backend should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    List,
    Create,
    Update,
    Delete,
}

/// How the fake backend picks the id it returns from `create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateIds {
    Sequential,
    Fixed(RecordId),
    Missing,
}

pub struct FakeState {
    pub records: Vec<Record>,
    pub failing: Vec<Op>,
    pub calls: Vec<String>,
    pub create_ids: CreateIds,
    next_id: u64,
}

/// In-memory [`UserApi`] whose state stays inspectable after boxing.
#[derive(Clone)]
pub struct FakeUserApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeUserApi {
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                records,
                failing: Vec::new(),
                calls: Vec::new(),
                create_ids: CreateIds::Sequential,
                next_id: 100,
            })),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake state poisoned")
    }

    pub fn fail(&self, op: Op) {
        self.state().failing.push(op);
    }

    pub fn recover(&self) {
        self.state().failing.clear();
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    fn begin(&self, op: Op, call: String) -> ServiceResult<MutexGuard<'_, FakeState>> {
        let mut state = self.state();
        state.calls.push(call);
        if state.failing.contains(&op) {
            return Err(NetworkError::Status {
                method: "TEST",
                url: "http://fake/users".into(),
                status: 500,
            });
        }
        Ok(state)
    }
}

impl UserApi for FakeUserApi {
    fn list(&self) -> ServiceResult<Vec<Record>> {
        let state = self.begin(Op::List, "list".into())?;
        Ok(state.records.clone())
    }

    fn create(&self, record: &Record) -> ServiceResult<Record> {
        let mut state = self.begin(Op::Create, "create".into())?;
        let id = match state.create_ids.clone() {
            CreateIds::Sequential => {
                state.next_id += 1;
                Some(RecordId::Number(state.next_id))
            }
            CreateIds::Fixed(id) => Some(id),
            CreateIds::Missing => None,
        };
        let created = Record {
            id,
            fields: record.fields.clone(),
        };
        state.records.push(created.clone());
        Ok(created)
    }

    fn update(&self, id: &RecordId, patch: &Record) -> ServiceResult<Record> {
        let mut state = self.begin(Op::Update, format!("update {id}"))?;
        let mut updated = Record {
            id: Some(id.clone()),
            fields: patch.fields.clone(),
        };
        if let Some(existing) = state
            .records
            .iter_mut()
            .find(|record| record.id.as_ref() == Some(id))
        {
            existing.merge(patch);
            updated = existing.clone();
        }
        Ok(updated)
    }

    fn delete(&self, id: &RecordId) -> ServiceResult<()> {
        let mut state = self.begin(Op::Delete, format!("delete {id}"))?;
        state.records.retain(|record| record.id.as_ref() != Some(id));
        Ok(())
    }
}

pub fn user(id: u64, name: &str, email: &str) -> Record {
    Record::new()
        .with_id(RecordId::Number(id))
        .with_field("name", name)
        .with_field("email", email)
        .with_field("phone", "")
}

pub fn sample_users() -> Vec<Record> {
    vec![
        user(1, "Ada Lovelace", "ada@example.com"),
        user(2, "Alan Turing", "alan@example.com"),
        user(3, "Grace Hopper", "grace@example.com"),
    ]
}

/// A request captured by [`CannedServer`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// Loopback HTTP listener that answers each connection with the next canned
/// response, then stops accepting once the list is exhausted.
pub struct CannedServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: Option<JoinHandle<()>>,
}

impl CannedServer {
    pub fn start(responses: Vec<(u16, &str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let responses: Vec<(u16, String)> = responses
            .into_iter()
            .map(|(status, body)| (status, body.to_string()))
            .collect();

        let handle = thread::spawn(move || {
            for (status, body) in responses {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                if let Some(request) = answer(stream, status, &body) {
                    recorded.lock().expect("request log poisoned").push(request);
                }
            }
        });

        Self {
            base_url,
            requests,
            handle: Some(handle),
        }
    }

    /// Waits for every canned response to be served, then returns the log.
    pub fn finish(mut self) -> Vec<RecordedRequest> {
        if let Some(handle) = self.handle.take() {
            handle.join().expect("server thread panicked");
        }
        self.requests.lock().expect("request log poisoned").clone()
    }
}

fn answer(stream: TcpStream, status: u16, body: &str) -> Option<RecordedRequest> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut content_length = 0usize;
    let mut content_type = None;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.parse().unwrap_or(0),
                "content-type" => content_type = Some(value.to_string()),
                _ => {}
            }
        }
    }

    let mut raw_body = vec![0u8; content_length];
    reader.read_exact(&mut raw_body).ok()?;

    let mut stream = stream;
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).ok()?;
    stream.flush().ok()?;

    Some(RecordedRequest {
        method,
        path,
        content_type,
        body: String::from_utf8_lossy(&raw_body).into_owned(),
    })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
