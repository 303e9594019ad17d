use arboard::Clipboard;
use async_trait::async_trait;
use mindmap_genius_core::contract::{ClipboardWriter, CollaboratorError};

/// The desktop clipboard, through `arboard`. A fresh handle is opened per copy on a blocking
/// thread, since some platforms tie the handle to the thread that created it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[async_trait]
impl ClipboardWriter for SystemClipboard {
    async fn copy_text(&self, text: &str) -> Result<(), CollaboratorError> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), CollaboratorError> {
            let mut clipboard = Clipboard::new()?;
            clipboard.set_text(text)?;
            Ok(())
        })
        .await?
    }
}
