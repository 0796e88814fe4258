// src/view/mod.rs
//! Surfaces the page model is drawn on.

use crate::page::Page;

pub mod html;
pub mod terminal;

pub use html::{escape_html, HtmlView};
pub use terminal::TerminalView;

/// A place the pipeline page is presented.
///
/// `render` is called with the complete page after every change. `alert` is
/// the blocking notification for errors; it must not fail.
pub trait View {
    fn render(&mut self, page: &Page);

    fn alert(&mut self, message: &str);
}

impl<V: View + ?Sized> View for Box<V> {
    fn render(&mut self, page: &Page) {
        (**self).render(page)
    }

    fn alert(&mut self, message: &str) {
        (**self).alert(message)
    }
}

/// Presents the same page on two views.
impl<A: View, B: View> View for (A, B) {
    fn render(&mut self, page: &Page) {
        self.0.render(page);
        self.1.render(page);
    }

    fn alert(&mut self, message: &str) {
        self.0.alert(message);
        self.1.alert(message);
    }
}
