use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use actix_web::{http::StatusCode, rt::time::sleep, web, App, HttpResponse, HttpServer};

/// A stand-in jobs API and how many requests it has answered.
pub struct StubApi {
    pub base: String,
    pub hits: Arc<AtomicUsize>,
}

impl StubApi {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a stand-in jobs API on an ephemeral port answering `GET /api/jobs`
/// with `status` and `body` after `delay`.
pub async fn serve_jobs_after(delay: Duration, status: u16, body: &'static str) -> StubApi {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let server = HttpServer::new(move || {
        let counter = counter.clone();
        App::new().route(
            "/api/jobs",
            web::get().to(move || {
                let counter = counter.clone();
                async move {
                    sleep(delay).await;
                    counter.fetch_add(1, Ordering::SeqCst);
                    HttpResponse::build(StatusCode::from_u16(status).unwrap())
                        .content_type("application/json")
                        .body(body)
                }
            }),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    StubApi {
        base: format!("http://{}/api/", addr),
        hits,
    }
}

/// Same as [`serve_jobs_after`] with no delay. Returns the API base URL.
pub async fn serve_jobs(status: u16, body: &'static str) -> String {
    serve_jobs_after(Duration::ZERO, status, body).await.base
}
