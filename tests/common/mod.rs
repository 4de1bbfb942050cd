// Shared fixtures for the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use folio_admin::cache::CacheInvalidator;
use folio_admin::form::FormContext;
use folio_admin::gateway::ApiGateway;
use folio_admin::notify::NotificationLog;
use folio_admin::records::Project;
use folio_admin::upload::{ImageUploader, UploadError, UploadRequest};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::MockServer;

/// Records every invalidated admin path
#[derive(Debug, Default)]
pub struct RecordingInvalidator {
    paths: Mutex<Vec<String>>,
}

impl RecordingInvalidator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl CacheInvalidator for RecordingInvalidator {
    fn invalidate(&self, admin_path: &str) {
        self.paths.lock().unwrap().push(admin_path.to_string());
    }
}

enum Answer {
    Fixed(Result<String, String>),
    /// `https://cdn/<destination>/<filename>`
    Echo,
    Panic,
}

/// Uploader answering with a fixed or echoed URL, failing or panicking, after an optional delay
pub struct FakeUploader {
    answer: Answer,
    delay: Duration,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<UploadRequest>>,
}

impl FakeUploader {
    fn answering(answer: Answer) -> Self {
        Self {
            answer,
            delay: Duration::ZERO,
            delays: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding(url: &str) -> Self {
        Self::answering(Answer::Fixed(Ok(url.to_string())))
    }

    pub fn failing(reason: &str) -> Self {
        Self::answering(Answer::Fixed(Err(reason.to_string())))
    }

    pub fn echoing() -> Self {
        Self::answering(Answer::Echo)
    }

    pub fn panicking() -> Self {
        Self::answering(Answer::Panic)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Delay only uploads of `filename`
    pub fn with_delay_for(mut self, filename: &str, delay: Duration) -> Self {
        self.delays.insert(filename.to_string(), delay);
        self
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| (r.destination.clone(), r.filename.clone()))
            .collect()
    }
}

#[async_trait]
impl ImageUploader for FakeUploader {
    async fn upload(&self, request: UploadRequest) -> Result<String, UploadError> {
        let delay = self.delays.get(&request.filename).copied().unwrap_or(self.delay);
        let echoed = format!("https://cdn/{}/{}", request.destination, request.filename);
        self.requests.lock().unwrap().push(request);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match &self.answer {
            Answer::Fixed(result) => result.clone().map_err(|reason| UploadError::Rejected {
                status: 500,
                body: reason,
            }),
            Answer::Echo => Ok(echoed),
            Answer::Panic => panic!("storage client crashed"),
        }
    }
}

/// Everything a form test needs, backed by a mock REST API
pub struct Harness {
    pub server: MockServer,
    pub invalidator: Arc<RecordingInvalidator>,
    pub notifications: Arc<NotificationLog>,
    pub uploader: Arc<FakeUploader>,
    pub ctx: FormContext,
}

impl Harness {
    pub async fn start(uploader: FakeUploader) -> Self {
        let server = MockServer::start().await;
        let invalidator = Arc::new(RecordingInvalidator::default());
        let notifications = Arc::new(NotificationLog::new());
        let uploader = Arc::new(uploader);
        let gateway = ApiGateway::new(
            &format!("{}/api", server.uri()),
            Duration::from_secs(5),
            invalidator.clone(),
        )
        .unwrap();
        let ctx = FormContext {
            gateway,
            uploader: uploader.clone(),
            notifier: notifications.clone(),
        };
        Self {
            server,
            invalidator,
            notifications,
            uploader,
            ctx,
        }
    }

    /// JSON bodies of every request the mock API received
    pub async fn request_bodies(&self) -> Vec<(String, String, Value)> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|r| {
                let body = serde_json::from_slice(&r.body).unwrap_or(Value::Null);
                (r.method.to_string(), r.url.path().to_string(), body)
            })
            .collect()
    }
}

pub fn project_json() -> Value {
    json!({
        "_id": "42",
        "company": "Globex",
        "projectName": "Citio",
        "time": "1 Year",
        "area": "Online Rezervasyon ve Satın Alma",
        "tags": ["web", "e-commerce"],
        "description": "Online rezervasyon ve satın alma",
        "goals": ["Kolay rezervasyon"],
        "scope": "Kullanıcı hesapları",
        "requirements": ["Next.js", "SCSS"],
        "tasks": ["Temel altyapı"],
        "image": "https://x/old.png"
    })
}

pub fn project() -> Project {
    serde_json::from_value(project_json()).unwrap()
}
