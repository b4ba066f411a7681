use crate::{
    clients::GenerationClient,
    error::{Result, ThumbnailError},
    logger,
    models::{
        GeneratedImage, GenerationOutcome, GenerationParameters, GenerationRequest,
        ReferenceImage, MISSING_REFERENCES,
    },
    prompt::PromptBuilder,
    session::SessionState,
};
use futures::future::join_all;
use std::sync::Arc;
use uuid::Uuid;

/// Single message shown for a failed run, whichever variation(s) failed.
pub const GENERATION_FAILED: &str =
    "Failed to generate thumbnail(s). Please check the logs for details.";

/// Fans one generate action out to a [`GenerationClient`] and joins the results.
#[derive(Clone)]
pub struct GenerationOrchestrator {
    client: Arc<dyn GenerationClient>,
    prompts: PromptBuilder,
}

impl GenerationOrchestrator {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            client,
            prompts: PromptBuilder::new(),
        }
    }

    pub fn client(&self) -> &Arc<dyn GenerationClient> {
        &self.client
    }

    /// Checks run before anything is dispatched.
    pub fn validate(params: &GenerationParameters, references: &[ReferenceImage]) -> Result<()> {
        params.validate_title()?;
        if references.is_empty() {
            return Err(ThumbnailError::Validation(MISSING_REFERENCES.into()));
        }
        params.validate_variation_count()
    }

    /// One request per variation, every one carrying the full reference list.
    pub fn requests(
        &self,
        params: &GenerationParameters,
        references: Arc<[ReferenceImage]>,
    ) -> Vec<GenerationRequest> {
        self.prompts
            .build_all(params)
            .into_iter()
            .enumerate()
            .map(|(index, prompt)| GenerationRequest::new(prompt, references.clone(), index))
            .collect()
    }

    /// Validation problems are returned as errors and never reach the client.
    /// Once dispatched, the run settles to either `Success` with every image in
    /// variation order, or a single `Failure`.
    pub async fn generate(
        &self,
        params: &GenerationParameters,
        references: Arc<[ReferenceImage]>,
    ) -> Result<GenerationOutcome> {
        Self::validate(params, &references)?;

        let run_id = Uuid::new_v4();
        let _timer = logger::timer(&format!("generation run {}", run_id));
        let requests = self.requests(params, references);
        log::info!(
            "Run {}: dispatching {} variation(s) to {} with {} reference image(s)",
            run_id,
            requests.len(),
            self.client.name(),
            requests[0].references.len()
        );

        let outcome = match self.dispatch(&requests).await {
            Ok(images) => {
                log::info!("Run {}: {} thumbnail(s) generated", run_id, images.len());
                GenerationOutcome::Success(images)
            }
            Err(failed) => {
                log::error!(
                    "Run {}: {} of {} variation(s) failed",
                    run_id,
                    failed,
                    requests.len()
                );
                GenerationOutcome::Failure(GENERATION_FAILED.to_string())
            }
        };
        Ok(outcome)
    }

    /// Waits for every request to settle. Returns the failure count if any failed.
    async fn dispatch(
        &self,
        requests: &[GenerationRequest],
    ) -> std::result::Result<Vec<GeneratedImage>, usize> {
        let settled = join_all(requests.iter().map(|request| async move {
            log::debug!(
                "Variation {} prompt: {}",
                request.variation_index + 1,
                request.prompt
            );
            self.client.generate(request).await
        }))
        .await;

        let mut images = Vec::with_capacity(settled.len());
        let mut failed = 0;
        for (index, result) in settled.into_iter().enumerate() {
            match result {
                Ok(image) => images.push(image),
                Err(e) => {
                    failed += 1;
                    log::error!("Variation {} failed: {}", index + 1, e);
                }
            }
        }

        if failed > 0 {
            Err(failed)
        } else {
            Ok(images)
        }
    }

    /// Runs a generate action against a session and publishes each state change.
    ///
    /// Validation failures replace the outcome with their message before returning
    /// the error. Otherwise the outcome goes to `Loading` (dropping any previous
    /// images) and then to the settled result.
    pub async fn run(
        &self,
        session: &SessionState,
        params: &GenerationParameters,
    ) -> Result<GenerationOutcome> {
        let references = session.snapshot();
        if let Err(e) = Self::validate(params, &references) {
            log::warn!("Generation rejected: {}", e);
            session.publish(GenerationOutcome::Failure(e.user_message()));
            return Err(e);
        }

        session.publish(GenerationOutcome::Loading);
        let outcome = self.generate(params, references).await?;
        session.publish(outcome.clone());
        Ok(outcome)
    }
}
