//! Shared test fixtures: fake device collaborators and a hint/OCR stub server

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::{Json, Router, routing::post};
use tokio::sync::Mutex;

use lens_gateway::{
    Camera, CapturedPhoto, DeviceHandle, Display, Error, Result, Speaker,
};

/// Camera double that counts capture attempts and can be told to fail
#[derive(Default)]
pub struct FakeCamera {
    attempts: AtomicUsize,
    fail: AtomicBool,
}

impl FakeCamera {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Camera for FakeCamera {
    async fn request_photo(&self) -> Result<CapturedPhoto> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;

        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Capture("shutter jammed".to_string()));
        }

        let mut photo = CapturedPhoto::new(vec![0xFF, 0xD8, 0xFF], "image/jpeg", "photo.jpg");
        photo.request_id = format!("req-{attempt}");
        Ok(photo)
    }
}

/// Speaker double that records everything spoken
#[derive(Default)]
pub struct FakeSpeaker {
    spoken: Mutex<Vec<String>>,
}

impl FakeSpeaker {
    pub async fn spoken(&self) -> Vec<String> {
        self.spoken.lock().await.clone()
    }
}

#[async_trait]
impl Speaker for FakeSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        self.spoken.lock().await.push(text.to_string());
        Ok(())
    }
}

/// Display double that records shown text walls
#[derive(Default)]
pub struct FakeDisplay {
    shown: Mutex<Vec<String>>,
}

impl FakeDisplay {
    pub async fn shown(&self) -> Vec<String> {
        self.shown.lock().await.clone()
    }
}

#[async_trait]
impl Display for FakeDisplay {
    async fn show_text_wall(&self, text: &str, _duration: Duration) -> Result<()> {
        self.shown.lock().await.push(text.to_string());
        Ok(())
    }
}

/// Build a device handle wired to fresh fakes
pub fn fake_device() -> (
    DeviceHandle,
    Arc<FakeCamera>,
    Arc<FakeSpeaker>,
    Arc<FakeDisplay>,
) {
    let camera = Arc::new(FakeCamera::default());
    let speaker = Arc::new(FakeSpeaker::default());
    let display = Arc::new(FakeDisplay::default());

    let device = DeviceHandle {
        camera: Arc::clone(&camera) as Arc<dyn Camera>,
        speaker: Arc::clone(&speaker) as Arc<dyn Speaker>,
        display: Arc::clone(&display) as Arc<dyn Display>,
    };

    (device, camera, speaker, display)
}

/// Behavior of the hint stub endpoint
#[derive(Clone, Copy)]
pub enum HintStubMode {
    /// 200 with a `hint` field
    Hint,
    /// 200 with an empty JSON object
    EmptyBody,
    /// 500
    Fail,
}

/// Hit counter plus base URL of a spawned backend stub
pub struct BackendStub {
    pub base_url: String,
    pub hint_hits: Arc<AtomicUsize>,
    pub analyze_hits: Arc<AtomicUsize>,
}

/// Spawn an in-process hint/OCR backend on an ephemeral port
pub async fn spawn_backend_stub(mode: HintStubMode) -> BackendStub {
    let hint_hits = Arc::new(AtomicUsize::new(0));
    let analyze_hits = Arc::new(AtomicUsize::new(0));

    let hint_counter = Arc::clone(&hint_hits);
    let analyze_counter = Arc::clone(&analyze_hits);

    let app = Router::new()
        .route(
            "/give-hint",
            post(move |Json(_body): Json<serde_json::Value>| {
                let counter = Arc::clone(&hint_counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    match mode {
                        HintStubMode::Hint => (
                            axum::http::StatusCode::OK,
                            Json(serde_json::json!({"hint": "**Check** the `edges` first 💡"})),
                        ),
                        HintStubMode::EmptyBody => {
                            (axum::http::StatusCode::OK, Json(serde_json::json!({})))
                        }
                        HintStubMode::Fail => (
                            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                            Json(serde_json::json!({"error": "model overloaded"})),
                        ),
                    }
                }
            }),
        )
        .route(
            "/analyze-photo",
            post(move |Json(body): Json<serde_json::Value>| {
                let counter = Arc::clone(&analyze_counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let len = body["image_base64"].as_str().map_or(0, str::len);
                    Json(serde_json::json!({"full_text": format!("decoded {len} chars")}))
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    BackendStub {
        base_url: format!("http://{addr}"),
        hint_hits,
        analyze_hits,
    }
}
