// src/controller.rs
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use uuid::Uuid;

use crate::errors::{PipelineError, Result, GENERATION_FAILED};
use crate::models::{PipelineRequest, PipelineResponse};
use crate::pacing::{Pacer, PacingSchedule};
use crate::page::{Page, Step};
use crate::render::{render_content, render_review, ContentRole};
use crate::service::GenerationService;
use crate::view::View;

pub const MSG_INPUT: &str = "Processing input...";
pub const MSG_GENERATOR: &str = "Generator Agent creating content...";
pub const MSG_REVIEWER: &str = "Reviewer Agent evaluating content...";
pub const MSG_REFINE: &str = "Applying refinements...";

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub grade: u8,
    pub topic: String,
    pub started_at: String,
    pub request_latency_ms: u64,
    pub total_latency_ms: u64,
    pub review_status: String,
    pub refined: bool,
}

#[derive(Debug)]
pub enum RunOutcome {
    /// A run was already in flight; nothing happened.
    Ignored,
    Completed(RunReport),
    /// The error has already been shown through `View::alert`.
    Failed(PipelineError),
}

struct Surface<V> {
    page: Page,
    view: V,
}

/// Drives one generate → review → refine run at a time and keeps the page in
/// step with it.
pub struct PipelineController<S, V, P> {
    service: S,
    pacer: P,
    schedule: PacingSchedule,
    surface: Mutex<Surface<V>>,
    in_flight: AtomicBool,
}

impl<S, V, P> PipelineController<S, V, P>
where
    S: GenerationService,
    V: View,
    P: Pacer,
{
    pub fn new(service: S, mut view: V, pacer: P, schedule: PacingSchedule) -> Self {
        let page = Page::new();
        view.render(&page);
        Self {
            service,
            pacer,
            schedule,
            surface: Mutex::new(Surface { page, view }),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Snapshot of the current page.
    pub fn page(&self) -> Page {
        self.surface.lock().unwrap_or_else(PoisonError::into_inner).page.clone()
    }

    pub fn into_view(self) -> V {
        self.surface.into_inner().unwrap_or_else(PoisonError::into_inner).view
    }

    /// Handles one press of the generate trigger with raw form input.
    ///
    /// Returns `Ignored` without touching the page if a run is in flight.
    /// Every failure is alerted before returning, and the loading overlay is
    /// hidden on every path that started a run.
    pub async fn trigger(&self, grade: &str, topic: &str) -> RunOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("Pipeline already running, trigger ignored");
            return RunOutcome::Ignored;
        }

        let request = match PipelineRequest::from_input(grade, topic) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Rejected pipeline input: {}", e);
                self.alert(&e.user_message());
                self.in_flight.store(false, Ordering::Release);
                return RunOutcome::Failed(e);
            }
        };

        let run_id = Uuid::new_v4().to_string();
        let outcome = match self.drive(&run_id, &request).await {
            Ok(report) => {
                log::info!(
                    "[{}] Pipeline completed in {}ms (review {}, refined: {})",
                    run_id,
                    report.total_latency_ms,
                    report.review_status,
                    report.refined
                );
                RunOutcome::Completed(report)
            }
            Err(e) => {
                log::error!("[{}] Pipeline failed: {}", run_id, e);
                self.alert(&e.user_message());
                RunOutcome::Failed(e)
            }
        };

        self.update(|page| page.set_loading(false));
        self.in_flight.store(false, Ordering::Release);
        outcome
    }

    async fn drive(&self, run_id: &str, request: &PipelineRequest) -> Result<RunReport> {
        let started_at = chrono::Utc::now().to_rfc3339();
        let start = Instant::now();

        log::info!("[{}] Starting pipeline: grade {}, topic {:?}", run_id, request.grade, request.topic);

        self.update(|page| {
            page.set_loading(true);
            page.reset();
            page.set_step_active(Step::Input);
            page.set_loading_message(MSG_INPUT);
        });

        self.pacer.pause(self.schedule.before_request()).await;
        self.update(|page| {
            page.set_step_active(Step::Generator);
            page.set_loading_message(MSG_GENERATOR);
        });

        let (response, request_latency_ms) = self.service.generate(request).await?;
        if let Some(rejection) = rejection(&response) {
            return Err(rejection);
        }

        self.pacer.pause(self.schedule.after_response()).await;
        self.show_generator(&response);

        self.update(|page| {
            page.set_step_active(Step::Reviewer);
            page.set_loading_message(MSG_REVIEWER);
        });
        self.pacer.pause(self.schedule.review()).await;
        let review_status = self.show_reviewer(&response);

        let refined = response.has_refined();
        if refined {
            self.update(|page| page.set_loading_message(MSG_REFINE));
            self.pacer.pause(self.schedule.refine()).await;
            self.show_refined(&response);
        }

        self.finish();

        Ok(RunReport {
            run_id: run_id.to_string(),
            grade: request.grade,
            topic: request.topic.clone(),
            started_at,
            request_latency_ms,
            total_latency_ms: start.elapsed().as_millis() as u64,
            review_status,
            refined,
        })
    }

    /// Presents a response that was obtained earlier, without pacing or a
    /// network call.
    pub fn present(&self, response: &PipelineResponse) -> Result<()> {
        self.update(|page| page.reset());

        if let Some(rejection) = rejection(response) {
            self.alert(&rejection.user_message());
            return Err(rejection);
        }

        self.show_generator(response);
        self.show_reviewer(response);
        if response.has_refined() {
            self.show_refined(response);
        }
        self.finish();
        Ok(())
    }

    fn show_generator(&self, response: &PipelineResponse) {
        let content = render_content(&response.generator, ContentRole::Primary);
        self.update(|page| {
            if response.product_name.is_some() {
                page.product_name = response.product_name.clone();
            }
            page.set_step_complete(Step::Input);
            page.set_step_complete(Step::Generator);
            page.show_generator(content);
        });
    }

    /// Returns the badge label shown for the review.
    fn show_reviewer(&self, response: &PipelineResponse) -> String {
        let review = render_review(&response.reviewer);
        let label = review.badge.label.clone();
        self.update(|page| {
            page.set_step_complete(Step::Reviewer);
            page.show_reviewer(review);
        });
        label
    }

    fn show_refined(&self, response: &PipelineResponse) {
        let content = render_content(&response.refined, ContentRole::Refined);
        self.update(|page| page.show_refined(content));
    }

    fn finish(&self) {
        self.update(|page| {
            page.set_step_complete(Step::RefineComplete);
            page.set_step_active(Step::RefineComplete);
        });
    }

    fn update(&self, f: impl FnOnce(&mut Page)) {
        let mut surface = self.surface.lock().unwrap_or_else(PoisonError::into_inner);
        let Surface { page, view } = &mut *surface;
        f(page);
        view.render(page);
    }

    fn alert(&self, message: &str) {
        self.surface
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .view
            .alert(message);
    }
}

fn rejection(response: &PipelineResponse) -> Option<PipelineError> {
    if response.success {
        return None;
    }
    let message = response
        .error
        .as_deref()
        .filter(|e| !e.is_empty())
        .unwrap_or(GENERATION_FAILED);
    Some(PipelineError::ServiceRejected(message.to_string()))
}
