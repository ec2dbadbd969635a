use std::ops::{Deref, DerefMut};

use super::backend::RenderBackend;
use super::renderer::Renderer;
use crate::error::Result;
use crate::pipeline::{OverwriteToken, PipelineOverwrite};

/// Borrow of a [`Renderer`] that undoes its own overwrite pushes on drop,
/// on every exit path. Everything else on the renderer stays reachable
/// through `Deref`.
pub struct OverwriteScope<'r, B: RenderBackend> {
    renderer: &'r mut Renderer<B>,
    token: OverwriteToken,
}

impl<'r, B: RenderBackend> OverwriteScope<'r, B> {
    pub(super) fn new(renderer: &'r mut Renderer<B>) -> Self {
        Self {
            renderer,
            token: OverwriteToken::new(),
        }
    }

    pub fn push(&mut self, overwrite: PipelineOverwrite) -> Result<()> {
        self.renderer.push_overwrite_with(overwrite, &mut self.token)
    }

    /// Pops the most recent push made through this scope, if any.
    pub fn pop(&mut self) -> Result<()> {
        self.renderer.pop_overwrite_with(&mut self.token)
    }

    pub fn pushes(&self) -> usize {
        self.token.pushes()
    }
}

impl<B: RenderBackend> Deref for OverwriteScope<'_, B> {
    type Target = Renderer<B>;

    fn deref(&self) -> &Renderer<B> {
        self.renderer
    }
}

impl<B: RenderBackend> DerefMut for OverwriteScope<'_, B> {
    fn deref_mut(&mut self) -> &mut Renderer<B> {
        self.renderer
    }
}

impl<B: RenderBackend> Drop for OverwriteScope<'_, B> {
    fn drop(&mut self) {
        if let Err(err) = self.renderer.release_overwrites(&mut self.token) {
            log::error!("Failed to unwind renderer overwrite scope: {}", err);
        }
    }
}
