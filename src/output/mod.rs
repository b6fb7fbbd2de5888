//! The stderr output channel.
//!
//! One [`OutputChannel`] is built at program start and passed by reference to
//! everything that talks to the user. It owns the only spinner, and every
//! write stops that spinner first so frames never collide with printed lines.

mod progress;
mod render;
mod styling;
mod timing;


use std::fmt::{Display, Write as _};
use std::future::IntoFuture;
use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use console::{Style, Term};
use log::trace;
use tokio::time::Instant;

use crate::config::{Config, DocsConfig};
use crate::error::{Diagnostic, Result as OutchanResult};

pub use progress::{IndicatifDriver, SpinnerDriver, SpinnerHandle};
pub use render::{render_box, render_link, visible_width, BorderStyle, BoxOptions, Padding};
pub use styling::muted_style;
pub use timing::{format_elapsed, Label};

use styling::{bold, bold_yellow, cyan, grey, red, yellow};

/// Where the channel writes. Defaults to the stderr terminal.
pub type Sink = Box<dyn Write + Send>;

const DEFAULT_ACTION: &str = "Learn More";

/// Optional pointer to further reading, attached to warnings and errors.
///
/// A slug takes precedence over a raw link and is expanded through the
/// configured documentation template. Without either no action line is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hint {
    pub slug: Option<String>,
    pub link: Option<String>,
    pub action: Option<String>,
}

impl Hint {
    pub fn from_slug(slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            ..Self::default()
        }
    }

    pub fn from_link(link: impl Into<String>) -> Self {
        Self {
            link: Some(link.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Label shown in front of the link, `Learn More` unless overridden.
    pub fn action_label(&self) -> &str {
        self.action
            .as_deref()
            .filter(|action| !action.is_empty())
            .unwrap_or(DEFAULT_ACTION)
    }

    /// Resolves the URL to show, if any.
    pub fn url(&self, docs: &DocsConfig) -> Option<String> {
        let slug = self.slug.as_deref().filter(|slug| !slug.is_empty());
        let link = self.link.as_deref().filter(|link| !link.is_empty());
        slug.map(|slug| docs.url_for(slug))
            .or_else(|| link.map(str::to_string))
    }
}

enum SpinnerState {
    Idle,
    Spinning(Box<dyn SpinnerHandle>),
}

struct Spinner {
    state: SpinnerState,
    /// Last message handed to `set_spinner`, kept for debug traces.
    message: Option<String>,
}

impl Spinner {
    /// Moves to `Idle`. Returns the message to trace when in debug mode.
    fn stop(&mut self, debug: bool) -> Option<String> {
        let traced = if debug {
            self.message.take().filter(|message| !message.is_empty())
        } else {
            None
        };

        if let SpinnerState::Spinning(handle) =
            std::mem::replace(&mut self.state, SpinnerState::Idle)
        {
            handle.stop();
            self.message = None;
        }

        traced
    }
}

/// Status, warning and error output on stderr with a single in-place spinner.
pub struct OutputChannel {
    debug: bool,
    hyperlinks: bool,
    docs: DocsConfig,
    spinner_delay: Duration,
    driver: Box<dyn SpinnerDriver>,
    spinner: Mutex<Spinner>,
    sink: Mutex<Sink>,
}

impl OutputChannel {
    /// Creates the channel writing to the stderr terminal.
    ///
    /// Hyperlinks are only emitted when stderr is a terminal.
    ///
    /// # Errors
    ///
    /// Returns error if the documentation URL template has no `{slug}`.
    pub fn new(config: &Config) -> OutchanResult<Self> {
        let term = Term::stderr();
        let hyperlinks = config.hyperlinks && term.is_term();
        let mut channel = Self::with_parts(
            config,
            Box::new(term),
            Box::new(IndicatifDriver::new(config.spinner.tick())),
        )?;
        channel.hyperlinks = hyperlinks;
        Ok(channel)
    }

    /// Creates the channel on top of a custom sink and spinner driver.
    ///
    /// # Errors
    ///
    /// Returns error if the documentation URL template has no `{slug}`.
    pub fn with_parts(
        config: &Config,
        sink: Sink,
        driver: Box<dyn SpinnerDriver>,
    ) -> OutchanResult<Self> {
        config.docs.validate()?;
        Ok(Self {
            debug: config.debug,
            hyperlinks: config.hyperlinks,
            docs: config.docs.clone(),
            spinner_delay: config.spinner.delay(),
            driver,
            spinner: Mutex::new(Spinner {
                state: SpinnerState::Idle,
                message: None,
            }),
            sink: Mutex::new(sink),
        })
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.debug
    }

    /// Whether an animated spinner is currently owned by the channel.
    pub fn is_spinning(&self) -> bool {
        matches!(self.lock_spinner().state, SpinnerState::Spinning(_))
    }

    /// Writes `text` verbatim after stopping the spinner.
    pub fn print(&self, text: impl Display) {
        self.stop_spinner();
        self.emit(&text.to_string());
    }

    pub fn log(&self, text: impl Display) {
        self.log_with(text, &muted_style());
    }

    /// Writes `"> {text}"` with the marker in `style`.
    pub fn log_with(&self, text: impl Display, style: &Style) {
        self.print(format!("{} {text}\n", style.apply_to(">")));
    }

    pub fn dim(&self, text: impl Display) {
        self.dim_with(text, &muted_style());
    }

    /// Writes `"> {text}"` entirely in `style`.
    pub fn dim_with(&self, text: impl Display, style: &Style) {
        self.print(format!("{}\n", style.apply_to(format!("> {text}"))));
    }

    pub fn note(&self, text: impl Display) {
        self.log(format!("{} {text}", yellow("NOTE:")));
    }

    pub fn warn(&self, text: impl Display, hint: &Hint) {
        self.warn_boxed(text, hint, &BoxOptions::default());
    }

    /// Writes a bordered warning, with an action line when `hint` resolves.
    pub fn warn_boxed(&self, text: impl Display, hint: &Hint, options: &BoxOptions) {
        let mut content = format!("{}{text}", bold_yellow("WARN! "));
        if let Some(url) = hint.url(&self.docs) {
            let _ = write!(
                content,
                "\n\n{}: {}",
                bold(hint.action_label()),
                render_link(&url, self.hyperlinks)
            );
        }
        self.print(format!("{}\n", render_box(&content, options)));
    }

    pub fn error(&self, text: impl Display, hint: &Hint) {
        let mut output = format!("{} {text}\n", red("Error!"));
        if let Some(url) = hint.url(&self.docs) {
            let _ = writeln!(
                output,
                "{}: {}",
                bold(hint.action_label()),
                render_link(&url, self.hyperlinks)
            );
        }
        self.print(output);
    }

    /// Reports an error-like value through [`error`](Self::error).
    pub fn pretty_error(&self, err: &dyn Diagnostic) {
        let hint = Hint {
            slug: None,
            link: err.link().map(str::to_string),
            action: err.action().map(str::to_string),
        };
        self.error(err.message(), &hint);
    }

    pub fn ready(&self, text: impl Display) {
        self.print(format!("{} {text}\n", cyan("> Ready!")));
    }

    pub fn success(&self, text: impl Display) {
        self.print(format!("{} {text}\n", cyan("> Success!")));
    }

    /// Writes a timestamped trace line. Does nothing outside debug mode.
    pub fn debug(&self, text: impl Display) {
        if !self.debug {
            return;
        }
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.log(format!("{} {} {text}", bold("[debug]"), grey(format!("[{timestamp}]"))));
    }

    /// Shows `message` in the spinner, using the configured delay.
    pub fn set_spinner(&self, message: &str) {
        self.set_spinner_with_delay(message, self.spinner_delay);
    }

    /// Shows `message` in the spinner.
    ///
    /// An active spinner only gets its text replaced. In debug mode no spinner
    /// is ever started; the call is traced instead.
    pub fn set_spinner_with_delay(&self, message: &str, delay: Duration) {
        if self.debug {
            self.debug(format!(
                "Spinner invoked ({message}) with a {}ms delay",
                delay.as_millis()
            ));
            self.lock_spinner().message = Some(message.to_string());
            return;
        }

        let mut spinner = self.lock_spinner();
        spinner.message = Some(message.to_string());
        if let SpinnerState::Spinning(handle) = &mut spinner.state {
            handle.set_text(message);
        } else {
            spinner.state = SpinnerState::Spinning(self.driver.start(message, delay));
        }
    }

    /// Stops and releases the spinner. Does nothing when none is active.
    pub fn stop_spinner(&self) {
        let stopped = self.lock_spinner().stop(self.debug);
        if let Some(message) = stopped {
            self.debug(format!("Spinner stopped ({message})"));
        }
    }

    /// Awaits `task`, tracing its label and duration in debug mode.
    ///
    /// The task's error is returned untouched and suppresses the end trace.
    pub async fn time<T, E, F>(&self, label: impl Into<Label<T>>, task: F) -> Result<T, E>
    where
        F: IntoFuture<Output = Result<T, E>>,
    {
        if !self.debug {
            return task.await;
        }

        let label = label.into();
        self.debug(label.resolve(None));

        let start = Instant::now();
        let result = task.await?;
        let elapsed = format_elapsed(start.elapsed());

        self.debug(format!(
            "{} {}",
            label.resolve(Some(&result)),
            grey(format!("[{elapsed}]"))
        ));
        Ok(result)
    }

    fn emit(&self, text: &str) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = sink.write_all(text.as_bytes()).and_then(|()| sink.flush()) {
            trace!("Failed to write output: {err}");
        }
    }

    fn lock_spinner(&self) -> MutexGuard<'_, Spinner> {
        self.spinner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for OutputChannel {
    fn drop(&mut self) {
        let spinner = self
            .spinner
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        spinner.stop(false);
    }
}
