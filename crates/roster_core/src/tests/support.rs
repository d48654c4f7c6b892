use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
    time::Duration,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use shared::{
    domain::{Activity, ActivityDetails, Roster},
    error::ErrorBody,
    protocol::{MessageBody, MutationKind},
};
use tokio::{net::TcpListener, sync::Mutex};

use crate::config::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedMutation {
    pub kind: MutationKind,
    pub activity: String,
    pub email: String,
}

#[derive(Default)]
struct MockState {
    roster: Roster,
    roster_failure: Option<StatusCode>,
    raw_roster_body: Option<String>,
    roster_delays: VecDeque<Duration>,
    roster_gets: usize,
    cache_control: Vec<Option<String>>,
    scripted_reply: Option<(StatusCode, String)>,
    mutations: Vec<RecordedMutation>,
}

#[derive(Clone, Default)]
pub(crate) struct MockRosterService {
    state: Arc<Mutex<MockState>>,
}

pub(crate) fn activity(name: &str, participants: &[&str]) -> Activity {
    Activity::new(
        name,
        ActivityDetails {
            description: Some(format!("{name} description")),
            schedule: Some("Fridays, 3:30 PM - 5:00 PM".into()),
            participants: participants.iter().map(|p| p.to_string()).collect(),
        },
    )
}

pub(crate) fn school_roster() -> Roster {
    Roster::from_activities([
        activity(
            "Chess Club",
            &["michael@mergington.edu", "daniel@mergington.edu"],
        ),
        activity("Programming Class", &["emma@mergington.edu"]),
        activity("Gym Class", &[]),
    ])
    .expect("roster")
}

impl MockRosterService {
    pub(crate) fn with_roster(roster: Roster) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                roster,
                ..MockState::default()
            })),
        }
    }

    pub(crate) async fn set_roster(&self, roster: Roster) {
        self.state.lock().await.roster = roster;
    }

    pub(crate) async fn fail_roster_with(&self, status: Option<StatusCode>) {
        self.state.lock().await.roster_failure = status;
    }

    pub(crate) async fn serve_raw_roster(&self, body: impl Into<String>) {
        self.state.lock().await.raw_roster_body = Some(body.into());
    }

    pub(crate) async fn delay_next_roster_get(&self, delay: Duration) {
        self.state.lock().await.roster_delays.push_back(delay);
    }

    pub(crate) async fn script_mutation_reply(&self, status: StatusCode, body: impl Into<String>) {
        self.state.lock().await.scripted_reply = Some((status, body.into()));
    }

    pub(crate) async fn roster_gets(&self) -> usize {
        self.state.lock().await.roster_gets
    }

    pub(crate) async fn cache_control_headers(&self) -> Vec<Option<String>> {
        self.state.lock().await.cache_control.clone()
    }

    pub(crate) async fn mutations(&self) -> Vec<RecordedMutation> {
        self.state.lock().await.mutations.clone()
    }

    pub(crate) async fn participants(&self, activity: &str) -> Vec<String> {
        self.state
            .lock()
            .await
            .roster
            .get(activity)
            .map(|a| a.participants().to_vec())
            .unwrap_or_default()
    }

    pub(crate) async fn spawn(&self) -> String {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let app = Router::new()
            .route("/activities", get(list_activities))
            .route("/activities/:activity/signup", post(signup))
            .route("/activities/:activity/unregister", delete(unregister))
            .with_state(self.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    pub(crate) async fn spawn_settings(&self) -> Settings {
        Settings {
            base_url: self.spawn().await,
            ..Settings::default()
        }
    }
}

/// Base url of a port nobody listens on.
pub(crate) async fn unreachable_settings() -> Settings {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    Settings {
        base_url: format!("http://{addr}"),
        ..Settings::default()
    }
}

fn json_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn list_activities(State(service): State<MockRosterService>, headers: HeaderMap) -> Response {
    let (delay, failure, body) = {
        let mut state = service.state.lock().await;
        state.roster_gets += 1;
        state.cache_control.push(
            headers
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned),
        );
        let body = match &state.raw_roster_body {
            Some(raw) => raw.clone(),
            None => serde_json::to_string(&state.roster).expect("roster json"),
        };
        (state.roster_delays.pop_front(), state.roster_failure, body)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    match failure {
        Some(status) => json_response(status, r#"{"detail":"unavailable"}"#.into()),
        None => json_response(StatusCode::OK, body),
    }
}

async fn signup(
    State(service): State<MockRosterService>,
    Path(activity): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    apply_mutation(service, MutationKind::Signup, activity, query).await
}

async fn unregister(
    State(service): State<MockRosterService>,
    Path(activity): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    apply_mutation(service, MutationKind::Unregister, activity, query).await
}

async fn apply_mutation(
    service: MockRosterService,
    kind: MutationKind,
    activity: String,
    query: HashMap<String, String>,
) -> Response {
    let email = query.get("email").cloned().unwrap_or_default();
    let mut state = service.state.lock().await;
    state.mutations.push(RecordedMutation {
        kind,
        activity: activity.clone(),
        email: email.clone(),
    });

    if let Some((status, body)) = state.scripted_reply.clone() {
        return json_response(status, body);
    }

    let reject = |status: StatusCode, detail: &str| {
        json_response(
            status,
            serde_json::to_string(&ErrorBody::new(detail)).expect("json"),
        )
    };

    let Some(current) = state.roster.get(&activity).cloned() else {
        return reject(StatusCode::NOT_FOUND, "Activity not found");
    };

    let mut details = current.details.clone();
    let enrolled = details.participants.iter().any(|p| p == &email);
    let message = match kind {
        MutationKind::Signup if enrolled => {
            return reject(StatusCode::BAD_REQUEST, "Student is already signed up");
        }
        MutationKind::Signup => {
            details.participants.push(email.clone());
            format!("Signed up {email} for {activity}")
        }
        MutationKind::Unregister if !enrolled => {
            return reject(StatusCode::BAD_REQUEST, "Student is not signed up");
        }
        MutationKind::Unregister => {
            details.participants.retain(|p| p != &email);
            format!("Unregistered {email} from {activity}")
        }
    };

    let updated = Roster::from_activities(state.roster.iter().map(|a| {
        if a.name == activity {
            Activity::new(activity.clone(), details.clone())
        } else {
            a.clone()
        }
    }))
    .expect("roster names stay unique");
    state.roster = updated;

    json_response(
        StatusCode::OK,
        serde_json::to_string(&MessageBody::new(message)).expect("json"),
    )
}
