use super::{ConsoleClient, RequestOptions};
use crate::error::ClientError;
use shared::models::{CreateIssueRequest, CreateIssueResponse};

impl ConsoleClient {
    /// Files a feedback issue.
    ///
    /// # Errors
    /// See [`ClientError`].
    pub async fn create_issue(
        &self,
        request: &CreateIssueRequest,
    ) -> Result<CreateIssueResponse, ClientError> {
        self.post("issue/create", request, RequestOptions::default())
            .await
    }
}
