use tracing::debug;

use crate::scope::ScreenScope;

struct Entry<S> {
    screen: S,
    scope: ScreenScope,
}

/// Linear screen stack. Each mounted screen owns a [`ScreenScope`] that is
/// torn down when the screen is popped.
pub struct NavStack<S> {
    entries: Vec<Entry<S>>,
}

impl<S: std::fmt::Debug> NavStack<S> {
    pub fn new(root: S) -> Self {
        Self {
            entries: vec![Entry {
                screen: root,
                scope: ScreenScope::new(),
            }],
        }
    }

    /// Mounts `screen` and returns its scope.
    pub fn push(&mut self, screen: S) -> ScreenScope {
        debug!("navigate -> {:?}", screen);
        let scope = ScreenScope::new();
        self.entries.push(Entry {
            screen,
            scope: scope.clone(),
        });
        scope
    }

    /// Pops the current screen, tearing down its scope. The root is never
    /// popped.
    pub fn pop(&mut self) -> Option<S> {
        if self.entries.len() <= 1 {
            return None;
        }
        let entry = self.entries.pop()?;
        entry.scope.teardown();
        debug!("back <- {:?}", entry.screen);
        Some(entry.screen)
    }

    pub fn current(&self) -> &S {
        &self.top().screen
    }

    pub fn scope(&self) -> &ScreenScope {
        &self.top().scope
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Tears down every screen and starts over from `root`.
    pub fn reset(&mut self, root: S) {
        for entry in self.entries.drain(..) {
            entry.scope.teardown();
        }
        self.entries.push(Entry {
            screen: root,
            scope: ScreenScope::new(),
        });
    }

    fn top(&self) -> &Entry<S> {
        // the root entry is never removed outside of reset
        &self.entries[self.entries.len() - 1]
    }
}

impl<S> Drop for NavStack<S> {
    fn drop(&mut self) {
        for entry in &self.entries {
            entry.scope.teardown();
        }
    }
}
