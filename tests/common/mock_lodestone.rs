#![allow(dead_code)]

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::{collections::HashMap, net::SocketAddr, time::Duration};
use tokio::{net::TcpListener, task::JoinHandle};

use super::fixtures::{self, CharacterPage, CHARACTER_ID, CHARACTER_NAME, FC_ID, WORLD};

/// Company whose second roster page answers 429.
pub const THROTTLED_FC_ID: &str = "1429";
/// Company whose second roster page hangs past the client timeout.
pub const SLOW_FC_ID: &str = "1504";

/// Local stand-in for the Lodestone site, serving fixture pages under
/// `/lodestone/`, so integration tests never leave the machine.
pub struct MockLodestone {
    pub base_url: String,
    _task: JoinHandle<()>,
}

impl MockLodestone {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock server");
        let addr: SocketAddr = listener
            .local_addr()
            .expect("failed to get mock server addr");
        let base_url = format!("http://{}", addr);

        let app = Router::new()
            .route("/lodestone/topics/", get(topics))
            .route("/lodestone/character/", get(search))
            .route("/lodestone/character/:id/", get(character))
            .route(
                "/lodestone/character/:id/achievement/kind/13/",
                get(achievements),
            )
            .route("/lodestone/freecompany/:id/", get(company))
            .route("/lodestone/freecompany/:id/member/", get(members));

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("mock server failed");
        });

        Self {
            base_url,
            _task: task,
        }
    }

    /// Base URL a scraper config should point at.
    pub fn lodestone_url(&self) -> String {
        format!("{}/lodestone", self.base_url)
    }
}

async fn topics() -> Response {
    Html(fixtures::topics_page()).into_response()
}

async fn search(Query(q): Query<HashMap<String, String>>) -> Response {
    let name = q.get("q").map(String::as_str).unwrap_or("");
    let world = q.get("worldname").map(String::as_str).unwrap_or("");
    let hits: Vec<(&str, &str)> =
        if world == WORLD && name.eq_ignore_ascii_case(CHARACTER_NAME) {
            vec![("99", "Alys Doenut"), (CHARACTER_ID, CHARACTER_NAME)]
        } else {
            Vec::new()
        };
    Html(fixtures::search_page(&hits)).into_response()
}

async fn character(Path(id): Path<String>) -> Response {
    if id == CHARACTER_ID {
        Html(fixtures::classic_character(&CharacterPage {
            introduction: "VERIFY-7731".to_string(),
            ..CharacterPage::default()
        }))
        .into_response()
    } else {
        (StatusCode::NOT_FOUND, "not found").into_response()
    }
}

async fn achievements(
    Path(id): Path<String>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    if id != CHARACTER_ID {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    }
    let body = match q.get("page").map(String::as_str) {
        None | Some("1") => fixtures::achievement_page(&[1, 2, 3], 2),
        Some("2") => fixtures::achievement_page(&[4, 5], 2),
        _ => return (StatusCode::NOT_FOUND, "not found").into_response(),
    };
    Html(body).into_response()
}

fn known_company(id: &str) -> bool {
    id == FC_ID || id == THROTTLED_FC_ID || id == SLOW_FC_ID
}

async fn company(Path(id): Path<String>) -> Response {
    if known_company(&id) {
        Html(fixtures::fc_profile_page()).into_response()
    } else {
        Html(fixtures::removed_page()).into_response()
    }
}

async fn members(Path(id): Path<String>, Query(q): Query<HashMap<String, String>>) -> Response {
    if !known_company(&id) {
        return Html(fixtures::removed_page()).into_response();
    }
    let page: usize = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    if page > 1 {
        match id.as_str() {
            THROTTLED_FC_ID => {
                return (StatusCode::TOO_MANY_REQUESTS, "slow down").into_response();
            }
            SLOW_FC_ID => tokio::time::sleep(Duration::from_secs(2)).await,
            _ => {}
        }
    }
    let count = if page == 2 { 12 } else { 50 };
    Html(fixtures::fc_member_page(page, 2, count)).into_response()
}
