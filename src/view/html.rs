// src/view/html.rs
//! Renders the page model as a standalone HTML document.
//!
//! All text coming from the service is escaped before it is placed in markup,
//! including the reviewer's free-form text and the badge style class.

use std::path::Path;

use crate::errors::Result;
use crate::page::{Page, Step};
use crate::render::{
    ContentView, McqList, McqView, ReviewBody, ReviewView, ISSUES_HEADING, REVIEW_COMPLETED, REVIEW_PASSED,
};
use crate::view::View;

const DEFAULT_TITLE: &str = "EduAgent AI";

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Keeps the latest rendering of the page and the last alert.
#[derive(Debug, Default)]
pub struct HtmlView {
    document: String,
    last_alert: Option<String>,
    page: Page,
}

impl HtmlView {
    pub fn new() -> Self {
        let mut view = Self::default();
        view.refresh();
        view
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.document)?;
        log::info!("Wrote HTML page to {}", path.display());
        Ok(())
    }

    fn refresh(&mut self) {
        self.document = render_document(&self.page, self.last_alert.as_deref());
    }
}

impl View for HtmlView {
    fn render(&mut self, page: &Page) {
        self.page = page.clone();
        self.refresh();
    }

    fn alert(&mut self, message: &str) {
        self.last_alert = Some(message.to_string());
        self.refresh();
    }
}

pub fn render_document(page: &Page, alert: Option<&str>) -> String {
    let title = escape_html(page.product_name.as_deref().unwrap_or(DEFAULT_TITLE));
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n</head>\n<body>\n", title));
    html.push_str(&format!("<h1>{}</h1>\n", title));

    html.push_str(&format!(
        "<div id=\"loadingOverlay\" class=\"loading-overlay{}\"><p id=\"loadingStep\">{}</p></div>\n",
        if page.loading { " visible" } else { "" },
        escape_html(&page.loading_message)
    ));

    if let Some(message) = alert {
        html.push_str(&format!("<div class=\"error-banner\" role=\"alert\">{}</div>\n", escape_html(message)));
    }

    html.push_str("<ol class=\"pipeline\">\n");
    for (i, step) in Step::ALL.iter().enumerate() {
        let state = page.step(*step);
        let mut class = String::from("pipeline-step");
        if state.active {
            class.push_str(" active");
        }
        if state.complete {
            class.push_str(" complete");
        }
        html.push_str(&format!("<li id=\"step{}\" class=\"{}\">{}</li>\n", i + 1, class, escape_html(step.label())));
    }
    html.push_str("</ol>\n");

    if page.empty_state_visible {
        html.push_str("<div id=\"emptyState\" class=\"empty-state\">Enter a grade and topic to generate content.</div>\n");
    }

    if let Some(content) = &page.generator {
        html.push_str(&content_card("generatorCard", "Generated Content", content));
    }
    if let Some(review) = &page.reviewer {
        html.push_str(&review_card(review));
    }
    if let Some(content) = &page.refined {
        html.push_str(&content_card("refinedCard", "Refined Content", content));
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn content_card(id: &str, title: &str, content: &ContentView) -> String {
    let mut html = format!(
        "<section id=\"{}\" class=\"output-card visible\">\n<h2>{}</h2>\n<p class=\"explanation-text\">{}</p>\n<div class=\"mcq-container\">\n",
        id,
        title,
        escape_html(&content.explanation)
    );

    match &content.mcqs {
        McqList::Items(items) => {
            for mcq in items {
                html.push_str(&mcq_item(mcq));
            }
        }
        McqList::Placeholder(notice) => {
            html.push_str(&format!(
                "<div class=\"feedback-item\"><span>{}</span></div>\n",
                escape_html(notice)
            ));
        }
    }

    html.push_str("</div>\n</section>\n");
    html
}

fn mcq_item(mcq: &McqView) -> String {
    let options: String = mcq
        .options
        .iter()
        .map(|opt| {
            format!(
                "<div class=\"mcq-option{}\">{}</div>",
                if opt.correct { " correct" } else { "" },
                escape_html(&opt.text)
            )
        })
        .collect();

    format!(
        "<div class=\"mcq-item\"><div class=\"mcq-question\">{}</div><div class=\"mcq-options\">{}</div></div>\n",
        escape_html(&mcq.heading()),
        options
    )
}

fn review_card(review: &ReviewView) -> String {
    let body = match &review.body {
        ReviewBody::Text(text) => format!("<p class=\"explanation-text\">{}</p>", escape_html(text)),
        ReviewBody::Passed => format!(
            "<div class=\"explanation-text\"><span>\u{2705}</span><span>{}</span></div>",
            REVIEW_PASSED
        ),
        ReviewBody::Issues(items) => {
            let entries: String = items
                .iter()
                .map(|item| {
                    format!(
                        "<div class=\"feedback-item\"><span class=\"feedback-icon\">\u{26a0}\u{fe0f}</span><span>{}</span></div>",
                        escape_html(item)
                    )
                })
                .collect();
            format!(
                "<h3 class=\"section-title\">{}</h3><div class=\"feedback-list\">{}</div>",
                ISSUES_HEADING, entries
            )
        }
        ReviewBody::Completed => format!("<p class=\"explanation-text\">{}</p>", REVIEW_COMPLETED),
    };

    format!(
        "<section id=\"reviewerCard\" class=\"output-card visible\">\n<h2>Review</h2>\n<span id=\"reviewStatus\" class=\"status-badge {}\">{}</span>\n<div id=\"reviewerContent\">{}</div>\n</section>\n",
        escape_html(&review.badge.style),
        escape_html(&review.badge.label),
        body
    )
}
