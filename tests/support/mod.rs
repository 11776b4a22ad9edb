#![allow(dead_code)]

use course_registrar::{App, RegistrarConfig};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<course_registrar::Result<()>>,
}

impl TestServer {
    pub async fn start(config_toml: &str) -> Self {
        let config = RegistrarConfig::from_toml_str(config_toml).unwrap();
        let app = App::from_config(&config).await.unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(app.serve(listener, async move {
            let _ = rx.await;
        }));

        Self {
            addr,
            client: reqwest::Client::new(),
            shutdown: Some(tx),
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn as_user(
        &self,
        method: reqwest::Method,
        path: &str,
        user: u64,
        role: &str,
    ) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("x-user-id", user.to_string())
            .header("x-user-role", role)
    }

    pub async fn enroll(&self, student: u64, course: u64) -> reqwest::Response {
        self.as_user(reqwest::Method::POST, "/enrollments", student, "student")
            .json(&serde_json::json!({ "courseId": course }))
            .send()
            .await
            .unwrap()
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap().unwrap();
    }
}
