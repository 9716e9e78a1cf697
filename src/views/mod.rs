//! # Views Module
//!
//! The collaborators a controller renders through: a [`Renderer`] that turns
//! a template and a data payload into a body, and a [`MimeTypes`] table that
//! maps the declared output kind to a `content-type`.

mod mime;
mod render;

pub use mime::MimeTypes;
pub use render::{MiniJinjaRenderer, Renderer};

use std::sync::Arc;

/// Renderer and MIME table shared by every controller of an application.
#[derive(Clone)]
pub struct Views {
    renderer: Arc<dyn Renderer>,
    mime: Arc<MimeTypes>,
}

impl Default for Views {
    fn default() -> Self {
        Self::new(MiniJinjaRenderer::new(), MimeTypes::default())
    }
}

impl Views {
    #[must_use]
    pub fn new(renderer: impl Renderer, mime: MimeTypes) -> Self {
        Self {
            renderer: Arc::new(renderer),
            mime: Arc::new(mime),
        }
    }

    #[must_use]
    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    #[must_use]
    pub fn mime(&self) -> &MimeTypes {
        &self.mime
    }
}
