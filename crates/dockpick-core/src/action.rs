//! Actions offered for a selected container

/// An action from the per-container menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ExecShell,
    FollowLogs,
    LiveStats,
    ShowInfo,
    ShowPorts,
    Restart,
    ToggleFavorite,
    StaticLogs,
}

impl Action {
    /// Every action in menu order
    pub const ALL: [Action; 8] = [
        Action::ExecShell,
        Action::FollowLogs,
        Action::LiveStats,
        Action::ShowInfo,
        Action::ShowPorts,
        Action::Restart,
        Action::ToggleFavorite,
        Action::StaticLogs,
    ];

    /// 1-based menu number
    pub fn number(self) -> usize {
        match self {
            Action::ExecShell => 1,
            Action::FollowLogs => 2,
            Action::LiveStats => 3,
            Action::ShowInfo => 4,
            Action::ShowPorts => 5,
            Action::Restart => 6,
            Action::ToggleFavorite => 7,
            Action::StaticLogs => 8,
        }
    }

    /// Name written to the history file
    pub fn as_str(self) -> &'static str {
        match self {
            Action::ExecShell => "exec",
            Action::FollowLogs => "logs",
            Action::LiveStats => "stats",
            Action::ShowInfo => "info",
            Action::ShowPorts => "ports",
            Action::Restart => "restart",
            Action::ToggleFavorite => "favorite",
            Action::StaticLogs => "tail",
        }
    }

    /// Menu label
    pub fn label(self) -> &'static str {
        match self {
            Action::ExecShell => "Shell into container",
            Action::FollowLogs => "Follow logs (Ctrl-C to stop)",
            Action::LiveStats => "Live stats (Ctrl-C to stop)",
            Action::ShowInfo => "Show info",
            Action::ShowPorts => "Show ports",
            Action::Restart => "Restart",
            Action::ToggleFavorite => "Toggle favorite",
            Action::StaticLogs => "Show recent logs",
        }
    }

    /// Attached actions hand the terminal to the runtime and return to the
    /// listing as soon as the session ends, without an acknowledgement.
    pub fn is_attached(self) -> bool {
        matches!(
            self,
            Action::ExecShell | Action::FollowLogs | Action::LiveStats
        )
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    /// Parse a history-file action name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("Unknown action: {}", s))
    }
}

/// What the user typed at the action menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Run(Action),
    Back,
}

/// Map a menu token and all its aliases to a choice
pub fn parse_menu_choice(input: &str) -> Option<MenuChoice> {
    let token = input.trim().to_lowercase();
    let action = match token.as_str() {
        "b" | "back" | "0" => return Some(MenuChoice::Back),
        "1" | "exec" | "shell" | "sh" | "e" => Action::ExecShell,
        "2" | "logs" | "follow" | "l" => Action::FollowLogs,
        "3" | "stats" | "s" => Action::LiveStats,
        "4" | "info" | "inspect" | "i" => Action::ShowInfo,
        "5" | "ports" | "p" => Action::ShowPorts,
        "6" | "restart" | "r" => Action::Restart,
        "7" | "fav" | "favorite" | "star" | "*" => Action::ToggleFavorite,
        "8" | "tail" | "static-logs" | "t" => Action::StaticLogs,
        _ => return None,
    };
    Some(MenuChoice::Run(action))
}

/// Result of the action dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// An action ran (successfully or not)
    Completed,
    /// The user backed out without running anything
    ReturnToMenu,
}
