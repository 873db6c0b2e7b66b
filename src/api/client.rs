use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;
use uuid::Uuid;

use super::payloads::{ExamCreate, ExamResultCreate, ExamResultUpdate};
use crate::error::EngineError;
use crate::model::{Exam, ExamResult, Subject};

/// The slice of the backend REST surface the engine depends on.
///
/// The scoring and session code runs against this trait so tests can
/// substitute an in-memory backend; [`HttpExamApi`] is the production
/// implementation.
#[async_trait]
pub trait ExamApi: Send + Sync {
    async fn get_subject(&self, id: Uuid) -> Result<Subject, EngineError>;
    async fn create_exam(&self, payload: &ExamCreate) -> Result<Exam, EngineError>;
    async fn get_exam_template(&self, id: Uuid) -> Result<Exam, EngineError>;
    /// `POST /exam-templates/{id}/use?group_id=…`: server-side copy of a
    /// template into a concrete, group-bound exam.
    async fn use_template(&self, template_id: Uuid, group_id: Uuid) -> Result<Exam, EngineError>;
    async fn list_results(&self, exam_id: Uuid) -> Result<Vec<ExamResult>, EngineError>;
    async fn create_result(
        &self,
        exam_id: Uuid,
        payload: &ExamResultCreate,
    ) -> Result<ExamResult, EngineError>;
    async fn update_result(
        &self,
        exam_id: Uuid,
        result_id: Uuid,
        payload: &ExamResultUpdate,
    ) -> Result<ExamResult, EngineError>;
    async fn delete_result(&self, exam_id: Uuid, result_id: Uuid) -> Result<(), EngineError>;
}

/// Authenticated reqwest client for the tutoring-center backend.
pub struct HttpExamApi {
    base_url: String,
    token: String,
    http: Client,
}

impl HttpExamApi {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
    }

    /// Check the status and decode the body, mapping 404 onto the row the
    /// request was about.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: Response,
        kind: &'static str,
        id: Uuid,
    ) -> Result<T, EngineError> {
        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::from_status(status, kind, id));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ExamApi for HttpExamApi {
    async fn get_subject(&self, id: Uuid) -> Result<Subject, EngineError> {
        let response = self
            .authed(self.http.get(self.url(&format!("/subjects/{}", id))))
            .send()
            .await?;
        Self::decode(response, "subject", id).await
    }

    async fn create_exam(&self, payload: &ExamCreate) -> Result<Exam, EngineError> {
        debug!(title = %payload.title, is_template = ?payload.is_template, "creating exam");
        let response = self
            .authed(self.http.post(self.url("/exams")))
            .json(payload)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Http(status));
        }
        Ok(response.json().await?)
    }

    async fn get_exam_template(&self, id: Uuid) -> Result<Exam, EngineError> {
        let response = self
            .authed(self.http.get(self.url(&format!("/exam-templates/{}", id))))
            .send()
            .await?;
        Self::decode(response, "exam template", id).await
    }

    async fn use_template(&self, template_id: Uuid, group_id: Uuid) -> Result<Exam, EngineError> {
        debug!(%template_id, %group_id, "instantiating exam template");
        let response = self
            .authed(
                self.http
                    .post(self.url(&format!("/exam-templates/{}/use", template_id)))
                    .query(&[("group_id", group_id)]),
            )
            .send()
            .await?;
        Self::decode(response, "exam template", template_id).await
    }

    async fn list_results(&self, exam_id: Uuid) -> Result<Vec<ExamResult>, EngineError> {
        let response = self
            .authed(self.http.get(self.url(&format!("/exams/{}/results", exam_id))))
            .send()
            .await?;
        Self::decode(response, "exam", exam_id).await
    }

    async fn create_result(
        &self,
        exam_id: Uuid,
        payload: &ExamResultCreate,
    ) -> Result<ExamResult, EngineError> {
        debug!(%exam_id, student_id = %payload.student_id, "creating exam result");
        let response = self
            .authed(self.http.post(self.url(&format!("/exams/{}/results", exam_id))))
            .json(payload)
            .send()
            .await?;
        Self::decode(response, "exam", exam_id).await
    }

    async fn update_result(
        &self,
        exam_id: Uuid,
        result_id: Uuid,
        payload: &ExamResultUpdate,
    ) -> Result<ExamResult, EngineError> {
        debug!(%exam_id, %result_id, "updating exam result");
        let response = self
            .authed(
                self.http
                    .patch(self.url(&format!("/exams/{}/results/{}", exam_id, result_id))),
            )
            .json(payload)
            .send()
            .await?;
        Self::decode(response, "exam result", result_id).await
    }

    async fn delete_result(&self, exam_id: Uuid, result_id: Uuid) -> Result<(), EngineError> {
        debug!(%exam_id, %result_id, "deleting exam result");
        let response = self
            .authed(
                self.http
                    .delete(self.url(&format!("/exams/{}/results/{}", exam_id, result_id))),
            )
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::from_status(status, "exam result", result_id));
        }
        Ok(())
    }
}
