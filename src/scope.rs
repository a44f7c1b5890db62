use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Lifetime of one mounted screen. `run` yields `None` once torn down.
#[derive(Debug, Clone, Default)]
pub struct ScreenScope {
    token: CancellationToken,
}

impl ScreenScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    pub fn teardown(&self) {
        self.token.cancel();
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub async fn run<F>(&self, fut: F) -> Option<F::Output>
    where
        F: Future,
    {
        if self.token.is_cancelled() {
            return None;
        }

        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            output = fut => self.is_active().then_some(output),
        }
    }
}
