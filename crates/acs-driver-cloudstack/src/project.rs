//! Project creation

use crate::api::Project;
use crate::client::{CloudStackClient, Params};
use crate::error::{CloudStackError, Result};

impl CloudStackClient {
    /// Create a project and wait for the job to finish
    pub async fn create_project(&self, name: &str, display_text: &str) -> Result<Project> {
        let mut params = Params::new();
        params.insert("name".into(), name.to_string());
        params.insert("displaytext".into(), display_text.to_string());

        let result = self.request_async("createProject", params).await?;
        let project = result.get("project").cloned().ok_or_else(|| {
            CloudStackError::UnexpectedResponse(
                "createProject job result has no project".to_string(),
            )
        })?;

        let project: Project = serde_json::from_value(project)?;
        tracing::info!("Created project {} ({})", project.name, project.id);
        Ok(project)
    }
}
