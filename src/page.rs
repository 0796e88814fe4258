// src/page.rs
//! In-memory model of the pipeline page: loading overlay, the four progress
//! steps, and the three output cards.

use serde::Serialize;

use crate::render::{ContentView, ReviewView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Step {
    Input,
    Generator,
    Reviewer,
    RefineComplete,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Input, Step::Generator, Step::Reviewer, Step::RefineComplete];

    fn index(self) -> usize {
        match self {
            Step::Input => 0,
            Step::Generator => 1,
            Step::Reviewer => 2,
            Step::RefineComplete => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::Input => "Input",
            Step::Generator => "Generator",
            Step::Reviewer => "Reviewer",
            Step::RefineComplete => "Refine & Complete",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StepState {
    pub active: bool,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub loading: bool,
    pub loading_message: String,
    pub empty_state_visible: bool,
    pub product_name: Option<String>,
    steps: [StepState; 4],
    /// `None` means the card is hidden.
    pub generator: Option<ContentView>,
    pub reviewer: Option<ReviewView>,
    pub refined: Option<ContentView>,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            loading: false,
            loading_message: String::new(),
            empty_state_visible: true,
            product_name: None,
            steps: [StepState::default(); 4],
            generator: None,
            reviewer: None,
            refined: None,
        }
    }
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// The generate trigger is disabled while the overlay is shown.
    pub fn trigger_enabled(&self) -> bool {
        !self.loading
    }

    pub fn step(&self, step: Step) -> StepState {
        self.steps[step.index()]
    }

    pub fn active_step(&self) -> Option<Step> {
        Step::ALL.into_iter().find(|s| self.step(*s).active)
    }

    pub fn set_loading(&mut self, visible: bool) {
        self.loading = visible;
    }

    pub fn set_loading_message(&mut self, message: &str) {
        self.loading_message = message.to_string();
    }

    /// Makes `step` the only active step.
    pub fn set_step_active(&mut self, step: Step) {
        for state in self.steps.iter_mut() {
            state.active = false;
        }
        self.steps[step.index()].active = true;
    }

    pub fn set_step_complete(&mut self, step: Step) {
        let state = &mut self.steps[step.index()];
        state.active = false;
        state.complete = true;
    }

    pub fn show_generator(&mut self, content: ContentView) {
        self.empty_state_visible = false;
        self.generator = Some(content);
    }

    pub fn show_reviewer(&mut self, review: ReviewView) {
        self.reviewer = Some(review);
    }

    pub fn show_refined(&mut self, content: ContentView) {
        self.refined = Some(content);
    }

    pub fn has_output(&self) -> bool {
        self.generator.is_some() || self.reviewer.is_some() || self.refined.is_some()
    }

    /// Hides every card, clears step states and restores the empty state.
    /// The loading overlay is left as it is.
    pub fn reset(&mut self) {
        self.generator = None;
        self.reviewer = None;
        self.refined = None;
        self.steps = [StepState::default(); 4];
        self.empty_state_visible = true;
        self.loading_message.clear();
    }
}
