use async_trait::async_trait;
use reqwest::{
    header::{CACHE_CONTROL, PRAGMA},
    Client, StatusCode,
};
use shared::{
    domain::Roster,
    error::ErrorBody,
    protocol::{MessageBody, MutationKind, ACTIVITIES_SEGMENT, EMAIL_QUERY_KEY},
};
use tracing::debug;
use url::Url;

use crate::{
    config::{normalize_base_url, Settings},
    error::RosterError,
};

/// What the service said about a signup or unregister request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationReply {
    Accepted {
        message: Option<String>,
    },
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },
}

#[async_trait]
pub trait RosterApi: Send + Sync {
    async fn fetch_roster(&self) -> Result<Roster, RosterError>;
    async fn mutate(
        &self,
        kind: MutationKind,
        activity: &str,
        email: &str,
    ) -> Result<MutationReply, RosterError>;
}

pub struct HttpRosterApi {
    http: Client,
    base_url: Url,
}

impl HttpRosterApi {
    pub fn new(settings: &Settings) -> Result<Self, RosterError> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(RosterError::Network)?;
        Ok(Self {
            http,
            base_url: normalize_base_url(&settings.base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn roster_url(&self) -> Result<Url, RosterError> {
        self.endpoint(&[ACTIVITIES_SEGMENT])
    }

    /// `/activities/{activity}/{signup|unregister}?email={email}`, with the
    /// activity pushed as a single percent-encoded path segment.
    pub fn mutation_url(
        &self,
        kind: MutationKind,
        activity: &str,
        email: &str,
    ) -> Result<Url, RosterError> {
        // Dot segments are resolved away by the url parser, encoded or not.
        if matches!(activity, "." | "..") {
            return Err(RosterError::ActivityName(activity.to_string()));
        }
        let mut url = self.endpoint(&[ACTIVITIES_SEGMENT, activity, kind.path_segment()])?;
        url.query_pairs_mut().append_pair(EMAIL_QUERY_KEY, email);
        // Form encoding writes spaces as '+'; a literal '+' is already %2B.
        let query = url.query().map(|query| query.replace('+', "%20"));
        url.set_query(query.as_deref());
        Ok(url)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RosterError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                RosterError::Config(format!("base url '{}' cannot carry paths", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl RosterApi for HttpRosterApi {
    async fn fetch_roster(&self) -> Result<Roster, RosterError> {
        let res = self
            .http
            .get(self.roster_url()?)
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(RosterError::Network)?;

        let status = res.status();
        if !status.is_success() {
            return Err(RosterError::Status { status });
        }

        let bytes = res.bytes().await.map_err(RosterError::Network)?;
        let roster = serde_json::from_slice::<Roster>(&bytes)?;
        debug!(activities = roster.len(), "fetched roster");
        Ok(roster)
    }

    async fn mutate(
        &self,
        kind: MutationKind,
        activity: &str,
        email: &str,
    ) -> Result<MutationReply, RosterError> {
        let url = self.mutation_url(kind, activity, email)?;
        let request = match kind {
            MutationKind::Signup => self.http.post(url),
            MutationKind::Unregister => self.http.delete(url),
        };

        let res = request.send().await.map_err(RosterError::Network)?;
        let status = res.status();
        let bytes = res.bytes().await.map_err(RosterError::Network)?;

        if status.is_success() {
            Ok(MutationReply::Accepted {
                message: MessageBody::from_slice_lenient(&bytes)
                    .message()
                    .map(str::to_owned),
            })
        } else {
            Ok(MutationReply::Rejected {
                status,
                detail: ErrorBody::from_slice_lenient(&bytes)
                    .detail()
                    .map(str::to_owned),
            })
        }
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
