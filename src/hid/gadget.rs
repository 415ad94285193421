//! Linux USB gadget HID output (`/dev/hidgN`)
//!
//! Expects a configfs gadget with a keyboard function taking 8-byte reports
//! and a mouse function taking 6-byte reports (16-bit relative X/Y).

use super::{HidReport, HidSink};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Writes reports to the keyboard and mouse gadget device nodes
pub struct GadgetSink {
    keyboard: File,
    mouse: File,
    keyboard_path: PathBuf,
    mouse_path: PathBuf,
}

impl GadgetSink {
    /// Open both gadget device nodes for writing
    pub async fn open(keyboard_path: &Path, mouse_path: &Path) -> Result<Self> {
        let keyboard = open_node(keyboard_path).await?;
        let mouse = open_node(mouse_path).await?;
        Ok(Self {
            keyboard,
            mouse,
            keyboard_path: keyboard_path.to_path_buf(),
            mouse_path: mouse_path.to_path_buf(),
        })
    }
}

async fn open_node(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .open(path)
        .await
        .with_context(|| format!("Failed to open HID gadget {}", path.display()))
}

#[async_trait]
impl HidSink for GadgetSink {
    async fn send(&mut self, report: HidReport) {
        let result = match report {
            HidReport::Keyboard(kb) => write_report(&mut self.keyboard, &kb.to_bytes()).await,
            HidReport::Mouse(m) => write_report(&mut self.mouse, &m.to_bytes()).await,
        };

        if let Err(e) = result {
            let path = match report {
                HidReport::Keyboard(_) => &self.keyboard_path,
                HidReport::Mouse(_) => &self.mouse_path,
            };
            warn!("[HID] Report write to {} failed: {}", path.display(), e);
        }
    }

    fn name(&self) -> &'static str {
        "gadget"
    }
}

async fn write_report(node: &mut File, bytes: &[u8]) -> std::io::Result<()> {
    node.write_all(bytes).await?;
    node.flush().await
}
