use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    dao::backend::{BackendResult, CreateDuel, DuelStore, QuestionSource},
    dto::{
        duel::{Duel, DuelId, DuelStatus, Question},
        invite::{Invite, InviteId, InviteStatus, ProfileId, Topic},
        profile::PlayerProfile,
    },
};

use super::{
    config::RestConfig,
    error::{RestError, RestResult},
    models::{
        CREATE_DUEL_PROCEDURE, CreateDuelParams, DUEL_TABLE, DuelApiRow, GenerateQuizRequest,
        GenerateQuizResponse, INVITE_TABLE, InviteDetailRow, PROFILE_TABLE, ProfileRow,
        QUIZ_FUNCTION, StatusPatch,
    },
};

/// Backend adapter over the managed platform's row API.
///
/// Row reads and writes go through the PostgREST-style `/rest/v1` surface;
/// question generation calls a serverless function. Cloning is cheap, all
/// shared fields sit behind `Arc`.
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: Arc<str>,
    functions_url: Arc<str>,
    api_key: Arc<str>,
}

impl RestStore {
    /// Build the adapter from its configuration.
    pub fn connect(config: RestConfig) -> RestResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| RestError::ClientBuilder { source })?;

        let base = config.base_url.trim_end_matches('/').to_string();
        let functions_url = config
            .functions_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("{base}/functions/v1"));

        Ok(Self {
            client,
            base_url: Arc::from(base),
            functions_url: Arc::from(functions_url),
            api_key: Arc::from(config.api_key),
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", self.api_key.as_ref())
            .bearer_auth(self.api_key.as_ref())
    }

    fn rest_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.base_url, path);
        self.authorized(self.client.request(method, url))
    }

    async fn get_rows<T>(&self, path: &str) -> RestResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .rest_request(Method::GET, path)
            .send()
            .await
            .map_err(|source| RestError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RestError::RequestStatus {
                path: path.to_string(),
                status,
            });
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|source| RestError::DecodeResponse {
                path: path.to_string(),
                source,
            })
    }

    async fn first_row<T>(&self, path: &str) -> RestResult<T>
    where
        T: DeserializeOwned,
    {
        self.get_rows(path)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RestError::RowMissing {
                path: path.to_string(),
            })
    }

    async fn patch_rows<B>(&self, path: &str, body: &B) -> RestResult<()>
    where
        B: ?Sized + Serialize,
    {
        let response = self
            .rest_request(Method::PATCH, path)
            .json(body)
            .send()
            .await
            .map_err(|source| RestError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RestError::RequestStatus {
                path: path.to_string(),
                status,
            })
        }
    }

    async fn rpc<T, B>(&self, procedure: &str, body: &B) -> RestResult<T>
    where
        T: DeserializeOwned,
        B: ?Sized + Serialize,
    {
        let path = format!("rpc/{procedure}");
        let response = self
            .rest_request(Method::POST, &path)
            .json(body)
            .send()
            .await
            .map_err(|source| RestError::RequestSend {
                path: path.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RestError::RequestStatus { path, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| RestError::DecodeResponse { path, source })
    }

    async fn call_function<T, B>(&self, name: &str, body: &B) -> RestResult<T>
    where
        T: DeserializeOwned,
        B: ?Sized + Serialize,
    {
        let url = format!("{}/{}", self.functions_url, name);
        let response = self
            .authorized(self.client.post(&url))
            .json(body)
            .send()
            .await
            .map_err(|source| RestError::RequestSend {
                path: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RestError::RequestStatus { path: url, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| RestError::DecodeResponse { path: url, source })
    }
}

impl DuelStore for RestStore {
    fn resolve_profile(&self, auth_id: &str) -> BoxFuture<'static, BackendResult<PlayerProfile>> {
        let store = self.clone();
        let auth_id = auth_id.to_string();
        Box::pin(async move {
            let path = format!("{PROFILE_TABLE}?auth_id=eq.{auth_id}&limit=1");
            let row: ProfileRow = store.first_row(&path).await?;
            Ok(row.into())
        })
    }

    fn fetch_invite(&self, id: InviteId) -> BoxFuture<'static, BackendResult<Invite>> {
        let store = self.clone();
        Box::pin(async move {
            let path = format!(
                "{INVITE_TABLE}?id=eq.{id}&select=*,challenger:{PROFILE_TABLE}(nickname,level,xp,avatar)"
            );
            let row: InviteDetailRow = store.first_row(&path).await?;
            Ok(row.into())
        })
    }

    fn set_invite_status(
        &self,
        id: InviteId,
        status: InviteStatus,
    ) -> BoxFuture<'static, BackendResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let path = format!("{INVITE_TABLE}?id=eq.{id}");
            store.patch_rows(&path, &StatusPatch { status }).await?;
            Ok(())
        })
    }

    fn create_duel(&self, request: CreateDuel) -> BoxFuture<'static, BackendResult<DuelId>> {
        let store = self.clone();
        Box::pin(async move {
            let params = CreateDuelParams {
                challenger_id: request.challenger_id,
                challenged_id: request.challenged_id,
                topic: request.topic,
                questions: request.questions,
            };
            let id: DuelId = store.rpc(CREATE_DUEL_PROCEDURE, &params).await?;
            Ok(id)
        })
    }

    fn find_duel_between(
        &self,
        a: ProfileId,
        b: ProfileId,
        status: DuelStatus,
    ) -> BoxFuture<'static, BackendResult<Option<Duel>>> {
        let store = self.clone();
        Box::pin(async move {
            let path = format!(
                "{DUEL_TABLE}?or=(and(challenger_id.eq.{a},challenged_id.eq.{b}),and(challenger_id.eq.{b},challenged_id.eq.{a}))&status=eq.{}&order=created_at.desc&limit=1",
                status.as_str()
            );
            let rows: Vec<DuelApiRow> = store.get_rows(&path).await?;
            Ok(rows.into_iter().next().map(Into::into))
        })
    }
}

impl QuestionSource for RestStore {
    fn generate(
        &self,
        topic: Topic,
        count: usize,
    ) -> BoxFuture<'static, BackendResult<Vec<Question>>> {
        let store = self.clone();
        Box::pin(async move {
            let response: GenerateQuizResponse = store
                .call_function(QUIZ_FUNCTION, &GenerateQuizRequest { topic, count })
                .await?;
            Ok(response.questions)
        })
    }
}
