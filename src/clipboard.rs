use log::{debug, warn};

use crate::env::ClipboardBackend;
use crate::error::ClipboardError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyMethod {
    /// Temporary text field selected and copied inside the gesture.
    LegacyCommand,
    AsyncClipboard,
}

/// Copy chain: legacy in-gesture copy first, then the async clipboard API.
pub struct ClipboardWriter<'a, C: ClipboardBackend + ?Sized> {
    backend: &'a C,
}

impl<'a, C: ClipboardBackend + ?Sized> ClipboardWriter<'a, C> {
    pub fn new(backend: &'a C) -> Self {
        Self { backend }
    }

    /// First link of the chain. Call before any `.await` so it still runs in
    /// the user gesture's call stack.
    pub fn copy_in_gesture(&self, text: &str) -> Result<CopyMethod, ClipboardError> {
        self.backend
            .copy_in_gesture(text)
            .map(|()| CopyMethod::LegacyCommand)
            .inspect_err(|err| debug!("legacy copy failed: {err}"))
    }

    /// Second link of the chain, used once the legacy attempt has failed.
    pub async fn copy_async(&self, text: &str) -> Result<CopyMethod, ClipboardError> {
        self.backend
            .write_text(text)
            .await
            .map(|()| CopyMethod::AsyncClipboard)
            .inspect_err(|err| warn!("clipboard write failed: {err}"))
    }

    /// Runs the whole chain, stopping at the first mechanism that succeeds.
    #[cfg(test)]
    pub async fn write(&self, text: &str) -> Result<CopyMethod, ClipboardError> {
        match self.copy_in_gesture(text) {
            Ok(method) => Ok(method),
            Err(_) => self.copy_async(text).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockEnv;
    use futures::executor::block_on;

    #[test]
    fn legacy_success_skips_async_api() {
        let env = MockEnv::new("/");
        let method = block_on(ClipboardWriter::new(&env).write("hello")).unwrap();

        assert_eq!(method, CopyMethod::LegacyCommand);
        assert_eq!(env.clipboard(), Some("hello".to_string()));
        assert_eq!(env.async_clipboard_calls(), 0);
    }

    #[test]
    fn legacy_failure_falls_back_to_async_api() {
        let env = MockEnv::new("/").with_legacy_copy(Err(ClipboardError::CommandRejected));
        let method = block_on(ClipboardWriter::new(&env).write("hello")).unwrap();

        assert_eq!(method, CopyMethod::AsyncClipboard);
        assert_eq!(env.clipboard(), Some("hello".to_string()));
        assert_eq!(env.async_clipboard_calls(), 1);
    }

    #[test]
    fn failure_surfaces_when_every_mechanism_fails() {
        let env = MockEnv::new("/")
            .with_legacy_copy(Err(ClipboardError::Dom("no body".to_string())))
            .with_async_clipboard(Err(ClipboardError::Unavailable));

        assert_eq!(
            block_on(ClipboardWriter::new(&env).write("hello")),
            Err(ClipboardError::Unavailable)
        );
        assert_eq!(env.clipboard(), None);
    }
}
