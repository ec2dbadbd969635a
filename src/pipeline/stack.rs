// pipeline/stack.rs
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};

use super::overwrite::PipelineOverwrite;
use super::settings::PipelineSettings;
use crate::error::{RenderError, Result};

static NEXT_STACK_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StackId(u64);

/// Ordered list of active overwrites plus their cached fold.
#[derive(Debug)]
pub struct OverwriteStack {
    id: StackId,
    entries: Vec<PipelineOverwrite>,
    fold: PipelineOverwrite,
}

/// Counts the pushes a caller is responsible for.
///
/// A token binds to the first stack it pushes onto; using it with any other
/// stack fails with [`RenderError::TokenBoundToOtherStack`].
#[derive(Debug, Default)]
pub struct OverwriteToken {
    stack: Option<StackId>,
    pushes: usize,
}

impl OverwriteToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pushes(&self) -> usize {
        self.pushes
    }

    pub fn is_bound(&self) -> bool {
        self.stack.is_some()
    }

    fn bind(&mut self, stack: StackId) -> Result<()> {
        match self.stack {
            Some(bound) if bound != stack => Err(RenderError::TokenBoundToOtherStack),
            _ => {
                self.stack = Some(stack);
                Ok(())
            }
        }
    }
}

impl OverwriteStack {
    pub fn new() -> Self {
        Self {
            id: StackId(NEXT_STACK_ID.fetch_add(1, Ordering::Relaxed)),
            entries: Vec::new(),
            fold: PipelineOverwrite::IDENTITY,
        }
    }

    pub fn id(&self) -> StackId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PipelineOverwrite] {
        &self.entries
    }

    /// Cumulative overwrite of every entry, in push order.
    pub fn fold(&self) -> &PipelineOverwrite {
        &self.fold
    }

    pub fn apply(&self, settings: &PipelineSettings) -> PipelineSettings {
        self.fold.apply(settings)
    }

    pub fn push(
        &mut self,
        overwrite: PipelineOverwrite,
        token: Option<&mut OverwriteToken>,
    ) -> Result<()> {
        if let Some(token) = token {
            token.bind(self.id)?;
            token.pushes += 1;
        }
        self.entries.push(overwrite);
        self.refold();
        Ok(())
    }

    /// Removes the most recent entry.
    ///
    /// With a token, popping after the token's pushes are exhausted is a no-op.
    /// An empty stack fails without touching the token's count.
    pub fn pop(&mut self, token: Option<&mut OverwriteToken>) -> Result<()> {
        if let Some(token) = &token {
            if let Some(bound) = token.stack {
                if bound != self.id {
                    return Err(RenderError::TokenBoundToOtherStack);
                }
            }
            if token.pushes == 0 {
                return Ok(());
            }
        }
        if self.entries.pop().is_none() {
            return Err(RenderError::OverwriteUnderflow);
        }
        if let Some(token) = token {
            token.bind(self.id)?;
            token.pushes -= 1;
        }
        self.refold();
        Ok(())
    }

    /// Pops every entry `token` is still responsible for.
    ///
    /// If the stack was cleared underneath the token, the pushes it can no
    /// longer find are forgotten and [`RenderError::OverwriteUnderflow`] is
    /// returned.
    pub fn release(&mut self, token: &mut OverwriteToken) -> Result<()> {
        while token.pushes > 0 {
            if let Err(err) = self.pop(Some(&mut *token)) {
                if err == RenderError::OverwriteUnderflow {
                    token.pushes = 0;
                }
                return Err(err);
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.fold = PipelineOverwrite::IDENTITY;
    }

    /// RAII guard that pops its own pushes when dropped.
    pub fn scope(&mut self) -> StackScope<'_> {
        StackScope {
            stack: self,
            token: OverwriteToken::new(),
        }
    }

    fn refold(&mut self) {
        self.fold = self
            .entries
            .iter()
            .fold(PipelineOverwrite::IDENTITY, |acc, next| acc.then(next));
    }
}

impl Default for OverwriteStack {
    fn default() -> Self {
        Self::new()
    }
}

pub struct StackScope<'a> {
    stack: &'a mut OverwriteStack,
    token: OverwriteToken,
}

impl StackScope<'_> {
    pub fn push(&mut self, overwrite: PipelineOverwrite) -> Result<()> {
        self.stack.push(overwrite, Some(&mut self.token))
    }

    pub fn pop(&mut self) -> Result<()> {
        self.stack.pop(Some(&mut self.token))
    }

    pub fn pushes(&self) -> usize {
        self.token.pushes
    }
}

impl Deref for StackScope<'_> {
    type Target = OverwriteStack;

    fn deref(&self) -> &OverwriteStack {
        self.stack
    }
}

impl DerefMut for StackScope<'_> {
    fn deref_mut(&mut self) -> &mut OverwriteStack {
        self.stack
    }
}

impl Drop for StackScope<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.stack.release(&mut self.token) {
            log::error!("Failed to unwind overwrite scope: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::DrawMode;

    #[test]
    fn fold_matches_sequential_apply() {
        let base = PipelineSettings::default().with_fog(true);
        let a = PipelineOverwrite::disable_lighting();
        let b = PipelineOverwrite::force_draw_mode(DrawMode::Wireframe);

        let mut stack = OverwriteStack::new();
        stack.push(a, None).unwrap();
        stack.push(b, None).unwrap();
        assert_eq!(stack.apply(&base), b.apply(&a.apply(&base)));
    }

    #[test]
    fn pop_is_lifo_and_refolds() {
        let mut stack = OverwriteStack::new();
        stack.push(PipelineOverwrite::disable_fog(), None).unwrap();
        stack
            .push(PipelineOverwrite::disable_lighting(), None)
            .unwrap();
        stack.pop(None).unwrap();
        assert_eq!(stack.entries(), &[PipelineOverwrite::disable_fog()]);
        assert_eq!(*stack.fold(), PipelineOverwrite::disable_fog());
        stack.pop(None).unwrap();
        assert_eq!(*stack.fold(), PipelineOverwrite::IDENTITY);
        assert_eq!(stack.pop(None), Err(RenderError::OverwriteUnderflow));
    }

    #[test]
    fn apply_does_not_mutate_stack() {
        let mut stack = OverwriteStack::new();
        stack
            .push(PipelineOverwrite::add_polygon_offset(1.0), None)
            .unwrap();
        let before = *stack.fold();
        let base = PipelineSettings::default();
        let once = stack.apply(&base);
        let twice = stack.apply(&base);
        assert_eq!(once, twice);
        assert_eq!(*stack.fold(), before);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn token_pops_are_idempotent_once_exhausted() {
        let mut stack = OverwriteStack::new();
        stack.push(PipelineOverwrite::disable_fog(), None).unwrap();

        let mut token = OverwriteToken::new();
        stack
            .push(PipelineOverwrite::disable_lighting(), Some(&mut token))
            .unwrap();
        assert_eq!(token.pushes(), 1);

        stack.pop(Some(&mut token)).unwrap();
        stack.pop(Some(&mut token)).unwrap();
        stack.release(&mut token).unwrap();
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn token_cannot_move_between_stacks() {
        let mut first = OverwriteStack::new();
        let mut second = OverwriteStack::new();
        let mut token = OverwriteToken::new();
        first
            .push(PipelineOverwrite::disable_fog(), Some(&mut token))
            .unwrap();
        assert_eq!(
            second.push(PipelineOverwrite::disable_fog(), Some(&mut token)),
            Err(RenderError::TokenBoundToOtherStack)
        );
        assert!(second.is_empty());
        assert_eq!(token.pushes(), 1);
    }

    #[test]
    fn scope_unwinds_on_drop() {
        let mut stack = OverwriteStack::new();
        stack.push(PipelineOverwrite::disable_fog(), None).unwrap();
        let before = *stack.fold();

        {
            let mut scope = stack.scope();
            scope.push(PipelineOverwrite::disable_lighting()).unwrap();
            scope.push(PipelineOverwrite::add_polygon_offset(3.0)).unwrap();
            scope
                .push(PipelineOverwrite::force_draw_mode(DrawMode::Point))
                .unwrap();
            scope.pop().unwrap();
            assert_eq!(scope.pushes(), 2);
            assert_eq!(scope.len(), 3);
        }

        assert_eq!(stack.len(), 1);
        assert_eq!(*stack.fold(), before);
    }

    #[test]
    fn scope_unwinds_on_early_return() {
        fn bail(stack: &mut OverwriteStack) -> Result<()> {
            let mut scope = stack.scope();
            scope.push(PipelineOverwrite::disable_lighting())?;
            Err(RenderError::Backend("bail".into()))
        }

        let mut stack = OverwriteStack::new();
        assert!(bail(&mut stack).is_err());
        assert!(stack.is_empty());
        assert_eq!(*stack.fold(), PipelineOverwrite::IDENTITY);
    }

    #[test]
    fn underflow_leaves_token_count_intact() {
        let mut stack = OverwriteStack::new();
        let mut token = OverwriteToken::new();
        stack
            .push(PipelineOverwrite::disable_fog(), Some(&mut token))
            .unwrap();
        stack
            .push(PipelineOverwrite::disable_lighting(), Some(&mut token))
            .unwrap();
        stack.clear();

        assert_eq!(
            stack.pop(Some(&mut token)),
            Err(RenderError::OverwriteUnderflow)
        );
        assert_eq!(token.pushes(), 2);

        assert_eq!(stack.release(&mut token), Err(RenderError::OverwriteUnderflow));
        assert_eq!(token.pushes(), 0);
    }

    #[test]
    fn scope_reports_pop_failures() {
        let mut stack = OverwriteStack::new();
        let mut scope = stack.scope();
        scope.push(PipelineOverwrite::disable_fog()).unwrap();
        scope.clear();
        assert_eq!(scope.pop(), Err(RenderError::OverwriteUnderflow));
        assert_eq!(scope.pushes(), 1);
    }
}
