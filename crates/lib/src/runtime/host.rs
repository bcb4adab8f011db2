//! The bridge process a built application talks to.
//!
//! The shell writes one JSON [`Request`] per line to the bridge's stdin and
//! reads one JSON [`Outbound`] message per line from its stdout.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use super::menu::{MenuState, RecordedMenu, WindowMenu, apply_menu};
use super::persistence::{DataFileMode, DataFilePrompt, LaunchMode, PersistenceError, PersistenceService};
use super::protocol::{MenuItem, Outbound, Request};
use crate::consts::{APP_NAME, MANIFEST_FILENAME};
use crate::manifest::{ConfigError, load_project_manifest};

#[derive(Debug, Error)]
pub enum HostError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Persistence(#[from] PersistenceError),

  #[error("failed to read requests: {0}")]
  Input(#[source] io::Error),

  #[error("failed to send message: {0}")]
  Output(#[source] io::Error),

  #[error("failed to encode message: {0}")]
  Encode(#[from] serde_json::Error),
}

impl HostError {
  /// A cancelled data file prompt ends the app without an error.
  pub fn exit_code(&self) -> i32 {
    match self {
      HostError::Persistence(PersistenceError::PromptCancelled) => 0,
      _ => 1,
    }
  }
}

/// What the bridge needs to know about the app it serves.
#[derive(Debug, Clone)]
pub struct HostOptions {
  /// Build directory holding the staged `elm.json`.
  pub app_dir: PathBuf,
  /// Data file given on the command line.
  pub data_file: Option<PathBuf>,
  pub launch: LaunchMode,
  pub cwd: PathBuf,
}

/// Handle requests in arrival order until the request channel closes.
///
/// `load-user-data` is answered on `replies`; writes and menu changes are
/// not acknowledged.
pub async fn serve<W: WindowMenu + ?Sized>(
  service: &PersistenceService,
  window: &mut W,
  mut requests: UnboundedReceiver<Request>,
  replies: UnboundedSender<Outbound>,
) -> Result<(), PersistenceError> {
  while let Some(request) = requests.recv().await {
    match request {
      Request::LoadUserData => {
        let content = service.load().await?;
        if replies.send(Outbound::UserDataLoaded(content)).is_err() {
          debug!("reply channel closed");
          break;
        }
      }
      Request::WriteUserData(content) => service.write(content).await,
      Request::SetMenu(descriptor) => apply_menu(window, &descriptor),
      Request::DataFilePicked(_) => debug!("ignoring data file choice, file already resolved"),
    }
  }
  Ok(())
}

/// Window menu mirrored to the shell: every change is sent as `menu-changed`.
struct ShellWindow {
  menu: RecordedMenu,
  events: UnboundedSender<Outbound>,
}

impl ShellWindow {
  fn publish(&self) {
    let state: MenuState = self.menu.state().clone();
    let _ = self.events.send(Outbound::MenuChanged(state));
  }
}

impl WindowMenu for ShellWindow {
  fn remove_menu(&mut self) {
    self.menu.remove_menu();
    self.publish();
  }

  fn restore_default_menu(&mut self) {
    self.menu.restore_default_menu();
    self.publish();
  }

  fn set_menu(&mut self, items: &[MenuItem]) {
    self.menu.set_menu(items);
    self.publish();
  }
}

/// Prompt answered by the shell's file picker.
struct ShellPrompt {
  events: UnboundedSender<Outbound>,
  picks: UnboundedReceiver<Option<String>>,
}

impl DataFilePrompt for ShellPrompt {
  async fn pick_data_file(&mut self) -> Result<Option<PathBuf>, PersistenceError> {
    self
      .events
      .send(Outbound::PickDataFile)
      .map_err(|_| PersistenceError::Prompt("shell is gone".to_string()))?;
    // Input ending before an answer counts as a cancel.
    Ok(self.picks.recv().await.flatten().map(PathBuf::from))
  }
}

/// Run the bridge for the app in `options.app_dir` until `input` ends.
pub async fn run_host<R, W>(options: &HostOptions, input: R, output: W) -> Result<(), HostError>
where
  R: AsyncBufRead + Unpin,
  W: AsyncWrite + Unpin,
{
  let manifest = load_project_manifest(&options.app_dir.join(MANIFEST_FILENAME))?;
  let settings = manifest.app_settings();
  let app_id = settings.app_id.clone().unwrap_or_else(|| APP_NAME.to_string());
  let mode = DataFileMode::from_settings(&app_id, &settings, options.cwd.clone());
  info!(app_id = %app_id, launch = ?options.launch, "starting bridge");

  let (request_tx, request_rx) = mpsc::unbounded_channel();
  let (pick_tx, pick_rx) = mpsc::unbounded_channel();
  let (out_tx, out_rx) = mpsc::unbounded_channel();

  let bridge = async move {
    let mut prompt = ShellPrompt {
      events: out_tx.clone(),
      picks: pick_rx,
    };
    let hint = options.data_file.as_deref();
    let service = PersistenceService::open(hint, &mode, options.launch, &mut prompt).await?;
    let mut window = ShellWindow {
      menu: RecordedMenu::new(),
      events: out_tx.clone(),
    };
    serve(&service, &mut window, request_rx, out_tx).await?;
    Ok::<(), HostError>(())
  };

  let session = async {
    let (bridge, writer) = tokio::join!(bridge, write_messages(output, out_rx));
    bridge?;
    writer
  };
  let reader = read_requests(input, request_tx, pick_tx);

  let mut session = std::pin::pin!(session);
  let mut reader = std::pin::pin!(reader);
  tokio::select! {
    result = &mut session => result,
    read = &mut reader => {
      read?;
      session.await
    }
  }
}

/// Split incoming lines into ordinary requests and file picker answers.
async fn read_requests<R: AsyncBufRead + Unpin>(
  input: R,
  requests: UnboundedSender<Request>,
  picks: UnboundedSender<Option<String>>,
) -> Result<(), HostError> {
  let mut lines = input.lines();
  while let Some(line) = lines.next_line().await.map_err(HostError::Input)? {
    if line.trim().is_empty() {
      continue;
    }
    let request: Request = match serde_json::from_str(&line) {
      Ok(r) => r,
      Err(e) => {
        warn!(error = %e, "ignoring malformed request");
        continue;
      }
    };
    let delivered = match request {
      Request::DataFilePicked(choice) => picks.send(choice).is_ok(),
      other => requests.send(other).is_ok(),
    };
    if !delivered {
      break;
    }
  }
  debug!("request stream ended");
  Ok(())
}

async fn write_messages<W: AsyncWrite + Unpin>(
  mut output: W,
  mut messages: UnboundedReceiver<Outbound>,
) -> Result<(), HostError> {
  while let Some(message) = messages.recv().await {
    let mut line = serde_json::to_string(&message)?;
    line.push('\n');
    output.write_all(line.as_bytes()).await.map_err(HostError::Output)?;
    output.flush().await.map_err(HostError::Output)?;
  }
  Ok(())
}
