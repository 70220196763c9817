use serde::de::DeserializeOwned;

use super::queries::{self, GraphQLRequest};
use super::transport::{HttpTransport, Transport};
use super::types::*;
use crate::config::Credential;
use crate::error::{ApiError, ConfigError};

#[derive(Clone)]
pub struct LeetCodeClient<T = HttpTransport> {
    transport: T,
}

impl LeetCodeClient<HttpTransport> {
    pub fn new(credential: &Credential) -> Result<Self, ConfigError> {
        Ok(Self::with_transport(HttpTransport::new(credential)?))
    }
}

impl<T: Transport> LeetCodeClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub async fn fetch_favorite_page(
        &self,
        favorite_slug: &str,
        skip: usize,
        limit: usize,
    ) -> Result<FavoriteQuestionList, ApiError> {
        let request = queries::favorite_question_list(favorite_slug, skip, limit);
        let data: FavoriteListData = self.call(&request).await?;
        data.favorite_question_list
            .ok_or_else(|| missing(request.operation_name, Vec::new()))
    }

    pub async fn fetch_problem_page(
        &self,
        skip: usize,
        limit: usize,
    ) -> Result<ProblemPage, ApiError> {
        let request = queries::problemset_question_list(skip, limit);
        let data: ProblemListData = self.call(&request).await?;
        let list = data
            .problemset_question_list
            .ok_or_else(|| missing(request.operation_name, Vec::new()))?;

        Ok(ProblemPage {
            questions: list.questions.into_iter().map(Question::from).collect(),
            total: list.total,
        })
    }

    pub async fn fetch_question_detail(&self, title_slug: &str) -> Result<QuestionDetail, ApiError> {
        let request = queries::question_data(title_slug);
        let data: QuestionDetailData = self.call(&request).await?;
        data.question
            .ok_or_else(|| missing(request.operation_name, Vec::new()))
    }

    async fn call<V, D>(&self, request: &GraphQLRequest<V>) -> Result<D, ApiError>
    where
        V: serde::Serialize + Sync,
        D: DeserializeOwned,
    {
        let body = self.transport.execute(request).await?;
        let resp: GraphQLResponse<D> = serde_json::from_slice(&body)?;
        match resp.data {
            Some(data) => Ok(data),
            None => Err(missing(request.operation_name, resp.errors)),
        }
    }
}

fn missing(operation: &'static str, errors: Vec<GraphQLError>) -> ApiError {
    let message = errors
        .into_iter()
        .next()
        .map(|e| e.message)
        .unwrap_or_else(|| "empty data".to_string());
    ApiError::MissingData { operation, message }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use serde::Serialize;

    use super::*;

    /// Replays queued responses and records each request body as JSON.
    #[derive(Default)]
    pub struct FakeTransport {
        responses: RefCell<VecDeque<Result<Vec<u8>, ApiError>>>,
        pub requests: RefCell<Vec<serde_json::Value>>,
    }

    impl FakeTransport {
        pub fn push_json(&self, value: serde_json::Value) {
            self.responses
                .borrow_mut()
                .push_back(Ok(serde_json::to_vec(&value).unwrap()));
        }

        pub fn push_raw(&self, body: &str) {
            self.responses
                .borrow_mut()
                .push_back(Ok(body.as_bytes().to_vec()));
        }

        pub fn push_err(&self, err: ApiError) {
            self.responses.borrow_mut().push_back(Err(err));
        }

        pub fn skips(&self) -> Vec<u64> {
            self.requests
                .borrow()
                .iter()
                .map(|r| r["variables"]["skip"].as_u64().unwrap())
                .collect()
        }
    }

    impl Transport for FakeTransport {
        async fn execute<V: Serialize + Sync>(
            &self,
            request: &GraphQLRequest<V>,
        ) -> Result<Vec<u8>, ApiError> {
            self.requests
                .borrow_mut()
                .push(serde_json::to_value(request).unwrap());
            self.responses
                .borrow_mut()
                .pop_front()
                .expect("no response queued")
        }
    }

    impl Transport for &FakeTransport {
        async fn execute<V: Serialize + Sync>(
            &self,
            request: &GraphQLRequest<V>,
        ) -> Result<Vec<u8>, ApiError> {
            (**self).execute(request).await
        }
    }

    pub fn question_json(slug: &str, difficulty: &str, status: Option<&str>) -> serde_json::Value {
        serde_json::json!({
            "difficulty": difficulty,
            "id": 1,
            "paidOnly": false,
            "questionFrontendId": "1",
            "status": status,
            "title": slug,
            "titleSlug": slug,
            "translatedTitle": null,
            "isInMyFavorites": false,
            "frequency": 42.5,
            "acRate": 50.0,
            "topicTags": [{ "name": "Array", "nameTranslated": "", "slug": "array" }]
        })
    }

    pub fn favorite_page(slugs: &[String], total: usize, has_more: bool) -> serde_json::Value {
        let questions: Vec<_> = slugs
            .iter()
            .map(|s| question_json(s, "MEDIUM", Some("TO_DO")))
            .collect();
        serde_json::json!({
            "data": {
                "favoriteQuestionList": {
                    "questions": questions,
                    "totalLength": total,
                    "hasMore": has_more
                }
            }
        })
    }
}
