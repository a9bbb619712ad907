//! Interactive selection loop
//!
//! A session owns the container snapshot taken at startup and moves between
//! the listing, the per-container action menu, and the favorites and
//! history views until the user quits or input ends. Input is read line by
//! line from any `BufRead`, output goes to any `Write`, so the whole loop
//! runs against scripted input in tests.

use crate::action::{parse_menu_choice, Action, ActionOutcome, MenuChoice};
use crate::entry::EntryPoint;
use crate::favorites::{AddOutcome, FavoritesStore};
use crate::history::{HistoryStore, HISTORY_LIMIT};
use crate::matcher::{resolve, MatchResult};
use crate::table::{format_uptime, TableRenderer};
use crate::theme::Palette;
use crate::{Container, ContainerAttrs, ContainerRow, CoreError, Result};
use dockpick_config::Config;
use dockpick_provider::{format_bytes, ContainerDetails, LogOptions, ProviderError, RuntimeGateway};
use std::io::{BufRead, Write};

/// Shells tried in order when opening an interactive shell
pub const SHELL_CANDIDATES: [&str; 4] = ["bash", "sh", "zsh", "ash"];

/// Used when probing for a shell is impossible
pub const FALLBACK_SHELL: &str = "bash";

const LEGEND: &str = "[# or name] select  [d] details  [f] favorites  [h] history  [q] quit";
const LISTING_PROMPT: &str = "Select container: ";
const MENU_PROMPT: &str = "Choose action: ";

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Listing,
    /// `direct` menus were opened from the command line rather than the listing
    ActionMenu { container: Container, direct: bool },
    FavoritesView,
    HistoryView,
    Terminal,
}

/// One interactive run over a fixed container snapshot
pub struct Session<'a, R, W> {
    gateway: &'a dyn RuntimeGateway,
    favorites: FavoritesStore,
    history: HistoryStore,
    renderer: TableRenderer,
    palette: Palette,
    log_lines: u32,
    /// Everything running at startup
    snapshot: Vec<Container>,
    /// Rows offered by the listing; a subset after an ambiguous argument
    pool: Vec<Container>,
    detailed: bool,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write + Send> Session<'a, R, W> {
    pub fn new(
        gateway: &'a dyn RuntimeGateway,
        config: &Config,
        snapshot: Vec<Container>,
        input: R,
        output: W,
    ) -> Result<Self> {
        Ok(Self {
            gateway,
            favorites: FavoritesStore::new(config)?,
            history: HistoryStore::new(config)?,
            renderer: TableRenderer::new(config),
            palette: Palette::from_config(config),
            log_lines: config.log_lines,
            pool: snapshot.clone(),
            snapshot,
            detailed: false,
            input,
            output,
        })
    }

    /// Run until the user quits; returns the process exit status
    pub async fn run(&mut self, entry: EntryPoint) -> Result<i32> {
        let mut state = match entry {
            EntryPoint::Empty => {
                writeln!(self.output, "{}", self.palette.muted("No running containers."))?;
                return Ok(0);
            }
            EntryPoint::NotFound(token) => {
                self.report(&CoreError::ContainerNotFound(token))?;
                writeln!(self.output, "Available containers:")?;
                let rows: Vec<ContainerRow> = self
                    .snapshot
                    .iter()
                    .map(|c| ContainerRow::simple(&c.name))
                    .collect();
                write!(self.output, "{}", self.renderer.render(&rows, false, &[]))?;
                return Ok(1);
            }
            EntryPoint::Confirm(container) => {
                let question = format!("Only {} is running. Open it? [Y/n] ", container);
                if !self.confirm(&question)? {
                    tracing::debug!("Declined single-container shortcut");
                    return Ok(0);
                }
                State::ActionMenu {
                    container,
                    direct: true,
                }
            }
            EntryPoint::Menu(container) => State::ActionMenu {
                container,
                direct: true,
            },
            EntryPoint::Listing(pool) => {
                self.pool = pool;
                State::Listing
            }
        };

        loop {
            tracing::debug!("Session state: {:?}", state);
            state = match state {
                State::Listing => self.listing().await?,
                State::ActionMenu { container, direct } => {
                    match self.action_menu(&container).await? {
                        None => State::Terminal,
                        Some(ActionOutcome::Completed) if direct => State::Terminal,
                        Some(_) => State::Listing,
                    }
                }
                State::FavoritesView => self.favorites_view()?,
                State::HistoryView => self.history_view()?,
                State::Terminal => return Ok(0),
            };
        }
    }

    async fn listing(&mut self) -> Result<State> {
        self.show_table().await?;
        writeln!(self.output, "{}", self.palette.muted(LEGEND))?;

        let Some(line) = self.prompt(LISTING_PROMPT)? else {
            return Ok(State::Terminal);
        };
        let token = line.trim();

        match token {
            "" => return Ok(State::Listing),
            "q" | "quit" | "exit" => return Ok(State::Terminal),
            "d" => {
                self.detailed = !self.detailed;
                return Ok(State::Listing);
            }
            "f" => return Ok(State::FavoritesView),
            "h" => return Ok(State::HistoryView),
            _ => {}
        }

        let index = token.parse::<usize>().ok();
        if let Some(container) = index
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.pool.get(i))
        {
            return Ok(State::ActionMenu {
                container: container.clone(),
                direct: false,
            });
        }

        // Out-of-range numbers may still name a container such as `app-8080`
        match resolve(token, &self.pool) {
            MatchResult::Unique(container) => Ok(State::ActionMenu {
                container,
                direct: false,
            }),
            MatchResult::None => {
                let err = match index {
                    Some(n) => CoreError::InvalidListingInput(format!(
                        "{} is not between 1 and {}",
                        n,
                        self.pool.len()
                    )),
                    None => CoreError::ContainerNotFound(token.to_string()),
                };
                self.warn_user(&err)?;
                Ok(State::Listing)
            }
            MatchResult::Ambiguous(candidates) => {
                let err = CoreError::AmbiguousTarget {
                    token: token.to_string(),
                    candidates: candidates.into_iter().map(|c| c.name).collect(),
                };
                self.warn_user(&err)?;
                writeln!(self.output, "Enter a more specific name.")?;
                Ok(State::Listing)
            }
        }
    }

    async fn show_table(&mut self) -> Result<()> {
        let rows = self.rows().await;
        let favorites = self.favorites.list().unwrap_or_else(|e| {
            tracing::warn!("Could not read favorites: {}", e);
            Vec::new()
        });
        let table = self.renderer.render(&rows, self.detailed, &favorites);
        write!(self.output, "{}", table)?;
        Ok(())
    }

    async fn rows(&self) -> Vec<ContainerRow> {
        if !self.detailed {
            return self
                .pool
                .iter()
                .map(|c| ContainerRow::simple(&c.name))
                .collect();
        }

        let mut rows = Vec::with_capacity(self.pool.len());
        for container in &self.pool {
            match self.gateway.inspect(&container.name).await {
                Ok(details) => rows.push(ContainerRow::detailed(
                    &container.name,
                    ContainerAttrs::from(&details),
                )),
                Err(e) => {
                    tracing::debug!("Inspect of {} failed: {}", container, e);
                    rows.push(ContainerRow::simple(&container.name));
                }
            }
        }
        rows
    }

    /// `None` when input ends
    async fn action_menu(&mut self, container: &Container) -> Result<Option<ActionOutcome>> {
        loop {
            writeln!(self.output)?;
            writeln!(
                self.output,
                "{}",
                self.palette.header(&format!("Container: {}", container))
            )?;
            for action in Action::ALL {
                writeln!(self.output, "  {}) {}", action.number(), action.label())?;
            }
            writeln!(self.output, "  b) Back")?;

            let Some(line) = self.prompt(MENU_PROMPT)? else {
                return Ok(None);
            };
            match parse_menu_choice(&line) {
                Some(MenuChoice::Back) => return Ok(Some(ActionOutcome::ReturnToMenu)),
                Some(MenuChoice::Run(action)) => {
                    self.dispatch(container, action).await?;
                    return Ok(Some(ActionOutcome::Completed));
                }
                None => self.warn_user(&CoreError::InvalidMenuChoice(line.trim().to_string()))?,
            }
        }
    }

    async fn dispatch(&mut self, container: &Container, action: Action) -> Result<()> {
        let name = container.name.as_str();
        tracing::debug!("Dispatching {} for {}", action, name);

        if let Err(e) = self.history.record(name, action) {
            tracing::warn!("Could not record history: {}", e);
        }

        let gateway = self.gateway;
        let outcome: Result<()> = match action {
            Action::ExecShell => {
                let shell = self.select_shell(name).await;
                writeln!(self.output, "Opening {} in {}", shell, name)?;
                self.output.flush()?;
                match gateway.exec_interactive(name, shell).await {
                    Ok(0) => Ok(()),
                    Ok(status) => {
                        writeln!(
                            self.output,
                            "{}",
                            self.palette
                                .muted(&format!("Shell exited with status {}", status))
                        )?;
                        Ok(())
                    }
                    Err(e) => Err(action_failed(action, name, e)),
                }
            }
            Action::FollowLogs => {
                let options = LogOptions {
                    tail: self.log_lines,
                    follow: true,
                    timestamps: false,
                };
                gateway
                    .stream_logs(name, &options, &mut self.output)
                    .await
                    .map_err(|e| action_failed(action, name, e))
            }
            Action::LiveStats => gateway
                .stream_stats(name, &mut self.output)
                .await
                .map_err(|e| action_failed(action, name, e)),
            Action::ShowInfo => match gateway.inspect(name).await {
                Ok(details) => {
                    let now = chrono::Utc::now().timestamp();
                    write!(self.output, "{}", render_info(&details, now))?;
                    Ok(())
                }
                Err(e) => Err(action_failed(action, name, e)),
            },
            Action::ShowPorts => match gateway.port_mappings(name).await {
                Ok(mappings) if mappings.trim().is_empty() => {
                    writeln!(self.output, "No published ports for {}", name)?;
                    Ok(())
                }
                Ok(mappings) => {
                    writeln!(self.output, "{}", mappings.trim_end())?;
                    Ok(())
                }
                Err(e) => Err(action_failed(action, name, e)),
            },
            Action::Restart => {
                writeln!(self.output, "Restarting {}...", name)?;
                self.output.flush()?;
                match gateway.restart(name).await {
                    Ok(()) => {
                        writeln!(
                            self.output,
                            "{}",
                            self.palette.success(&format!("Restarted {}", name))
                        )?;
                        Ok(())
                    }
                    Err(e) => Err(action_failed(action, name, e)),
                }
            }
            Action::ToggleFavorite => self.toggle_favorite(name),
            Action::StaticLogs => {
                writeln!(
                    self.output,
                    "{}",
                    self.palette
                        .muted(&format!("Last {} log lines of {}:", self.log_lines, name))
                )?;
                let options = LogOptions {
                    tail: self.log_lines,
                    follow: false,
                    timestamps: true,
                };
                gateway
                    .stream_logs(name, &options, &mut self.output)
                    .await
                    .map_err(|e| action_failed(action, name, e))
            }
        };

        if let Err(e) = outcome {
            tracing::debug!("{} on {} failed: {}", action, name, e);
            self.report(&e)?;
        }
        if !action.is_attached() {
            self.acknowledge()?;
        }
        Ok(())
    }

    async fn select_shell(&self, name: &str) -> &'static str {
        for shell in SHELL_CANDIDATES {
            match self.gateway.probe_shell(name, shell).await {
                Ok(true) => return shell,
                Ok(false) => {}
                Err(e) => {
                    tracing::debug!("Shell probe in {} failed: {}", name, e);
                    return FALLBACK_SHELL;
                }
            }
        }
        FALLBACK_SHELL
    }

    fn toggle_favorite(&mut self, name: &str) -> Result<()> {
        if self.favorites.is_favorite(name)? {
            self.favorites.remove(name)?;
            writeln!(
                self.output,
                "{}",
                self.palette.success(&format!("Removed {} from favorites", name))
            )?;
            return Ok(());
        }

        let message = match self.favorites.add(name)? {
            AddOutcome::Added => self.palette.success(&format!("Added {} to favorites", name)),
            AddOutcome::AlreadyPresent => self
                .palette
                .warning(&format!("{} is already a favorite", name)),
        };
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    fn favorites_view(&mut self) -> Result<State> {
        let favorites = match self.favorites.list() {
            Ok(favorites) => favorites,
            Err(e) => {
                self.report(&e)?;
                return Ok(State::Listing);
            }
        };

        if favorites.is_empty() {
            writeln!(
                self.output,
                "{}",
                self.palette
                    .muted("No favorites yet. Use action 7 in a container menu to add one.")
            )?;
            self.acknowledge()?;
            return Ok(State::Listing);
        }

        writeln!(self.output, "{}", self.palette.header("Favorites"))?;
        for (i, name) in favorites.iter().enumerate() {
            let marker = if self.snapshot.iter().any(|c| c.name == *name) {
                self.palette.success("running")
            } else {
                self.palette.muted("not running")
            };
            writeln!(self.output, "  {:>2}) {} [{}]", i + 1, name, marker)?;
        }

        let Some(line) = self.prompt("Open favorite # (Enter to go back): ")? else {
            return Ok(State::Terminal);
        };
        let Ok(index) = line.trim().parse::<usize>() else {
            return Ok(State::Listing);
        };

        match self.favorites.get(index)? {
            Some(name) => match self.snapshot.iter().find(|c| c.name == name) {
                Some(container) => Ok(State::ActionMenu {
                    container: container.clone(),
                    direct: false,
                }),
                None => {
                    writeln!(
                        self.output,
                        "{}",
                        self.palette.warning(&format!("{} is not running", name))
                    )?;
                    Ok(State::Listing)
                }
            },
            None => {
                let err = CoreError::InvalidListingInput(format!(
                    "{} is not between 1 and {}",
                    index,
                    favorites.len()
                ));
                self.warn_user(&err)?;
                Ok(State::Listing)
            }
        }
    }

    fn history_view(&mut self) -> Result<State> {
        let entries = match self.history.list(HISTORY_LIMIT) {
            Ok(entries) => entries,
            Err(e) => {
                self.report(&e)?;
                return Ok(State::Listing);
            }
        };

        if entries.is_empty() {
            writeln!(self.output, "{}", self.palette.muted("No history yet."))?;
        } else {
            writeln!(self.output, "{}", self.palette.header("Recent actions"))?;
            for entry in &entries {
                writeln!(
                    self.output,
                    "  {}  {:<8}  {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    entry.action,
                    entry.container
                )?;
            }
        }

        self.acknowledge()?;
        Ok(State::Listing)
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(match self.prompt(question)? {
            Some(answer) => matches!(answer.trim().to_lowercase().as_str(), "" | "y" | "yes"),
            None => false,
        })
    }

    fn acknowledge(&mut self) -> Result<()> {
        let text = self.palette.muted("Press Enter to continue...");
        self.prompt(&text)?;
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(|c| c == '\r' || c == '\n').to_string()))
    }

    fn warn_user(&mut self, err: &CoreError) -> Result<()> {
        writeln!(self.output, "{}", self.palette.warning(&err.to_string()))?;
        Ok(())
    }

    fn report(&mut self, err: &CoreError) -> Result<()> {
        writeln!(self.output, "{}", self.palette.error(&format!("Error: {}", err)))?;
        Ok(())
    }
}

fn action_failed(action: Action, container: &str, err: ProviderError) -> CoreError {
    if err.is_unavailable() {
        return CoreError::from(err);
    }
    CoreError::ActionFailed {
        action: action.to_string(),
        container: container.to_string(),
        reason: err.to_string(),
    }
}

fn field(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {:<15}{}", format!("{}:", label), value)
}

/// Text of the info view; `now` is the current unix time
pub fn render_info(details: &ContainerDetails, now: i64) -> String {
    const NA: &str = "N/A";

    let started = details
        .started_at
        .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string());
    let exposed = if details.exposed_ports.is_empty() {
        NA.to_string()
    } else {
        details.exposed_ports.join(", ")
    };

    let mut lines = vec![
        format!("Container: {}", details.name),
        field("Image", details.image.as_deref().unwrap_or(NA)),
        field("Status", details.status.as_deref().unwrap_or(NA)),
        field("IP address", details.ip_address.as_deref().unwrap_or(NA)),
        field("Started", started.as_deref().unwrap_or(NA)),
        field("Uptime", format_uptime(details.started_at.map(|s| now - s))),
        field("Ports", details.port_summary()),
        field("Exposed ports", exposed),
        field(
            "Memory limit",
            details
                .memory_limit
                .map(|m| format_bytes(m.max(0) as u64))
                .unwrap_or_else(|| NA.to_string()),
        ),
        field(
            "CPU limit",
            details
                .cpu_limit
                .map(|n| format!("{:.2} CPUs", n as f64 / 1e9))
                .unwrap_or_else(|| NA.to_string()),
        ),
    ];

    if details.networks.is_empty() {
        lines.push(field("Networks", NA));
    } else {
        lines.push("  Networks:".to_string());
        for (network, info) in &details.networks {
            lines.push(format!(
                "    {}: ip {}, gateway {}",
                network,
                info.ip_address.as_deref().unwrap_or(NA),
                info.gateway.as_deref().unwrap_or(NA)
            ));
        }
    }

    if details.env.is_empty() {
        lines.push(field("Environment", NA));
    } else {
        lines.push("  Environment:".to_string());
        lines.extend(details.env.iter().map(|var| format!("    {}", var)));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
