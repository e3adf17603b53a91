//! Saving finished jobs as templates and replaying them.

use mediaq_core::asset::Asset;
use mediaq_core::job::{Job, JobDraft};
use mediaq_core::template::{JobTemplate, TemplateError};

use crate::service::{MediaService, ServiceError};

/// Errors from saving a job as a template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateEngineError {
    /// The job's shape cannot be templated (not finished).
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Registering the template with the service failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Derive a template from a finished job and register it with the
/// service.
///
/// The template captures each task's processor, preset, options, and the
/// output *storage account name* — not the output asset id — so replays
/// target the same account.
pub async fn save_as_template(
    service: &dyn MediaService,
    job: &Job,
    name: &str,
) -> Result<JobTemplate, TemplateEngineError> {
    let mut template = JobTemplate::from_job(job, name)?;
    let resource = service.save_template(&job.id, name).await?;
    template.id = Some(resource.id.clone());

    tracing::info!(
        job_id = %job.id,
        template_id = %resource.id,
        template_name = %name,
        "Job saved as template",
    );
    Ok(template)
}

/// Instantiate an unsubmitted draft from a template, binding `inputs`
/// positionally to the template's input slots.
///
/// Purely local: the caller submits the returned draft when ready. A
/// slot-count mismatch fails with [`TemplateError::AssetCountMismatch`].
pub fn create_job_from_template(
    name: &str,
    template: &JobTemplate,
    inputs: &[Asset],
) -> Result<JobDraft, TemplateError> {
    template.instantiate(name, inputs)
}
