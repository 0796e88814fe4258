// src/view/terminal.rs

use std::io::Write;

use crate::page::{Page, Step};
use crate::render::{ContentView, McqList, ReviewBody, ReviewView, ISSUES_HEADING, REVIEW_COMPLETED, REVIEW_PASSED};
use crate::view::View;

/// Prints what changed on the page since the previous render.
pub struct TerminalView<W: Write> {
    out: W,
    previous: Page,
}

impl TerminalView<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            previous: Page::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            log::warn!("Failed to write to terminal: {}", e);
        }
    }

    fn print_content(&mut self, title: &str, content: &ContentView) {
        let separator = "=".repeat(60);
        self.line(&format!("\n{}\n{}\n{}", separator, title, separator));
        self.line(&content.explanation);
        self.line("");

        match &content.mcqs {
            McqList::Items(items) => {
                for mcq in items {
                    self.line(&mcq.heading());
                    for opt in &mcq.options {
                        let marker = if opt.correct { "\u{2714}" } else { " " };
                        self.line(&format!("  {} {}", marker, opt.text));
                    }
                    self.line("");
                }
            }
            McqList::Placeholder(notice) => self.line(&format!("\u{2139}\u{fe0f}  {}", notice)),
        }
    }

    fn print_review(&mut self, review: &ReviewView) {
        let separator = "=".repeat(60);
        self.line(&format!("\n{}\nReview [{}]\n{}", separator, review.badge.label, separator));
        match &review.body {
            ReviewBody::Text(text) => self.line(text),
            ReviewBody::Passed => self.line(&format!("\u{2705} {}", REVIEW_PASSED)),
            ReviewBody::Issues(items) => {
                self.line(ISSUES_HEADING);
                for item in items {
                    self.line(&format!("  \u{26a0}\u{fe0f}  {}", item));
                }
            }
            ReviewBody::Completed => self.line(REVIEW_COMPLETED),
        }
    }
}

impl<W: Write> View for TerminalView<W> {
    fn render(&mut self, page: &Page) {
        if page.loading_message != self.previous.loading_message && !page.loading_message.is_empty() {
            self.line(&format!("\u{23f3} {}", page.loading_message));
        }

        for step in Step::ALL {
            if page.step(step).complete && !self.previous.step(step).complete {
                self.line(&format!("\u{2705} {} step complete", step.label()));
            }
        }

        if self.previous.generator.is_none() {
            if let Some(content) = &page.generator {
                self.print_content("Generated Content", content);
            }
        }
        if self.previous.reviewer.is_none() {
            if let Some(review) = &page.reviewer {
                self.print_review(review);
            }
        }
        if self.previous.refined.is_none() {
            if let Some(content) = &page.refined {
                self.print_content("Refined Content", content);
            }
        }

        self.previous = page.clone();
    }

    fn alert(&mut self, message: &str) {
        self.line(&format!("\u{274c} {}", message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render_content, render_review, ContentRole};
    use serde_json::json;

    fn output(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn test_prints_only_changes() {
        let mut view = TerminalView::new(Vec::new());
        let mut page = Page::new();

        page.set_loading_message("Processing input...");
        view.render(&page);
        view.render(&page);

        page.set_step_complete(Step::Input);
        page.show_generator(render_content(
            &json!({"explanation": "E", "mcqs": [{"question": "Q", "options": ["1", "2"], "answer": "A"}]}),
            ContentRole::Primary,
        ));
        view.render(&page);
        view.render(&page);

        let text = output(view);
        assert_eq!(text.matches("Processing input...").count(), 1);
        assert_eq!(text.matches("Generated Content").count(), 1);
        assert!(text.contains("Input step complete"));
        assert!(text.contains("Q1. Q"));
        assert!(text.contains("\u{2714} A) 1"));
        assert!(text.contains("  B) 2"));
    }

    #[test]
    fn test_review_and_alert() {
        let mut view = TerminalView::new(Vec::new());
        let mut page = Page::new();
        page.show_reviewer(render_review(&json!({"status": "fail", "feedback": ["too long"]})));
        view.render(&page);
        view.alert("quota exceeded");

        let text = output(view);
        assert!(text.contains("Review [FAIL]"));
        assert!(text.contains(ISSUES_HEADING));
        assert!(text.contains("too long"));
        assert!(text.contains("\u{274c} quota exceeded"));
    }
}
