//! User configuration — keybindings, animation tuning, and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/speedcode/config.toml` (default `~/.config/speedcode/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    PrevItem,
    NextItem,
    Open,
    Close,
    TogglePlay,
    SwitchScreen,
    Help,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help popup).
    pub const ALL: &[Action] = &[
        Action::MoveUp,
        Action::MoveDown,
        Action::PrevItem,
        Action::NextItem,
        Action::Open,
        Action::Close,
        Action::TogglePlay,
        Action::SwitchScreen,
        Action::Help,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::MoveUp => "Up / Scroll Up",
            Action::MoveDown => "Down / Scroll Down",
            Action::PrevItem => "Previous In Row",
            Action::NextItem => "Next In Row",
            Action::Open => "Open Card",
            Action::Close => "Close Card",
            Action::TogglePlay => "Play / Pause Preview",
            Action::SwitchScreen => "Switch Screen",
            Action::Help => "Help",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::PrevItem => "prev_item",
            Action::NextItem => "next_item",
            Action::Open => "open",
            Action::Close => "close",
            Action::TogglePlay => "toggle_play",
            Action::SwitchScreen => "switch_screen",
            Action::Help => "help",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code
            && (self.modifiers & MODIFIER_MASK) == (event.modifiers & MODIFIER_MASK)
    }

    /// User-friendly display string (e.g. `"Alt+↑"`, `"Ctrl+c"`, `"q"`).
    pub fn display(&self) -> String {
        self.render(true)
    }

    /// Config-file form (e.g. `"Alt+Up"`, `"Ctrl+c"`, `"q"`).
    fn to_config_string(&self) -> String {
        self.render(false)
    }

    fn render(&self, pretty: bool) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        let key: String = match (self.code, pretty) {
            (KeyCode::Char(' '), _) => "Space".into(),
            (KeyCode::Char(c), _) => c.to_string(),
            (KeyCode::Up, true) => "↑".into(),
            (KeyCode::Down, true) => "↓".into(),
            (KeyCode::Left, true) => "←".into(),
            (KeyCode::Right, true) => "→".into(),
            (KeyCode::Up, false) => "Up".into(),
            (KeyCode::Down, false) => "Down".into(),
            (KeyCode::Left, false) => "Left".into(),
            (KeyCode::Right, false) => "Right".into(),
            (KeyCode::Enter, _) => "Enter".into(),
            (KeyCode::Esc, _) => "Esc".into(),
            (KeyCode::Tab, _) => "Tab".into(),
            (KeyCode::BackTab, _) => "BackTab".into(),
            (KeyCode::Backspace, _) => "Backspace".into(),
            (KeyCode::PageUp, _) => "PageUp".into(),
            (KeyCode::PageDown, _) => "PageDown".into(),
            (KeyCode::Home, _) => "Home".into(),
            (KeyCode::End, _) => "End".into(),
            (KeyCode::F(n), _) => format!("F{n}"),
            (other, _) => format!("{other:?}"),
        };
        s.push_str(&key);
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let (key_part, mods) = parts.split_last()?;

        for part in mods {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "backspace" => KeyCode::Backspace,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "space" => KeyCode::Char(' '),
            k if k.starts_with('f') && k.len() > 1 => KeyCode::F(k[1..].parse().ok()?),
            _ => {
                // Single characters keep their case ("G" differs from "g").
                let mut chars = key_part.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                KeyCode::Char(c)
            }
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

pub const DEFAULT_FADE_DISTANCE: f64 = 12.0;
pub const DEFAULT_MORPH_SPEED: f64 = 0.35;
pub const DEFAULT_SCROLL_SPEED: f64 = 0.4;

/// Application configuration — keybindings and animation tuning.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Rows of scrolling over which the browse header fades out.
    pub fade_distance: f64,
    /// Per-tick easing factor for the card morph.
    pub morph_speed: f64,
    /// Per-tick easing factor for animated scrolling.
    pub scroll_speed: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            fade_distance: DEFAULT_FADE_DISTANCE,
            morph_speed: DEFAULT_MORPH_SPEED,
            scroll_speed: DEFAULT_SCROLL_SPEED,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(MoveUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(MoveDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(PrevItem, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(NextItem, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(Open, vec![KeyBind::new(Enter, n), KeyBind::new(Char(' '), n)]);
        m.insert(Close, vec![KeyBind::new(Esc, n), KeyBind::new(Backspace, n)]);
        m.insert(TogglePlay, vec![KeyBind::new(Char('p'), n)]);
        m.insert(SwitchScreen, vec![KeyBind::new(Tab, n)]);
        m.insert(Help, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When several bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<(Action, u32)> = None;
        for (&action, binds) in &self.bindings {
            for bind in binds.iter().filter(|b| b.matches(event)) {
                let mc = bind.modifiers.bits().count_ones();
                if best.map_or(true, |(_, best_mc)| mc > best_mc) {
                    best = Some((action, mc));
                }
            }
        }
        best.map(|(action, _)| action)
    }

    /// Format the binding list for a given action (e.g. `"↑/k"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for the status bar).
    pub fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents),
            Err(err) => {
                tracing::warn!("config unreadable at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    /// Parse config text.  Unknown keys and malformed values are skipped
    /// and leave the default in place.
    pub fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "fade_distance" => {
                    match value.parse::<f64>() {
                        Ok(v) if v.is_finite() => config.fade_distance = v.clamp(1.0, 200.0),
                        _ => tracing::warn!("ignoring fade_distance = {value}"),
                    }
                    continue;
                }
                "morph_speed" => {
                    match value.parse::<f64>() {
                        Ok(v) if v.is_finite() => config.morph_speed = v.clamp(0.05, 0.95),
                        _ => tracing::warn!("ignoring morph_speed = {value}"),
                    }
                    continue;
                }
                "scroll_speed" => {
                    match value.parse::<f64>() {
                        Ok(v) if v.is_finite() => config.scroll_speed = v.clamp(0.05, 0.95),
                        _ => tracing::warn!("ignoring scroll_speed = {value}"),
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    pub fn serialise(&self) -> String {
        let mut lines = vec![
            "# speedcode configuration".to_string(),
            String::new(),
            "# Animation".to_string(),
            format!("fade_distance = {}", self.fade_distance),
            format!("morph_speed = {}", self.morph_speed),
            format!("scroll_speed = {}", self.scroll_speed),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, PageUp, PageDown, Home, End, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/speedcode/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("speedcode").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn defaults_cover_every_action() {
        let config = AppConfig::default();
        for &action in Action::ALL {
            assert_ne!(config.display_bindings(action), "unbound", "{action:?}");
        }
        assert_eq!(config.match_key(key(KeyCode::Enter)), Some(Action::Open));
        assert_eq!(config.match_key(key(KeyCode::Esc)), Some(Action::Close));
    }

    #[test]
    fn parses_tuning_and_bindings() {
        let text = "\
# comment
[animation]
fade_distance = 30
morph_speed = 2.0
scroll_speed = nope
open = o, Ctrl+Right
quit = \"Q\"
unknown = x
";
        let config = AppConfig::parse(text);
        assert_eq!(config.fade_distance, 30.0);
        assert_eq!(config.morph_speed, 0.95);
        assert_eq!(config.scroll_speed, DEFAULT_SCROLL_SPEED);
        assert_eq!(config.match_key(key(KeyCode::Char('o'))), Some(Action::Open));
        assert_eq!(
            config.match_key(KeyEvent::new(KeyCode::Right, KeyModifiers::CONTROL)),
            Some(Action::Open)
        );
        assert_eq!(config.match_key(key(KeyCode::Char('Q'))), Some(Action::Quit));
        assert_eq!(config.match_key(key(KeyCode::Char('q'))), None);
    }

    #[test]
    fn serialised_config_parses_back() {
        let mut config = AppConfig::default();
        config.fade_distance = 40.0;
        config
            .bindings
            .insert(Action::TogglePlay, vec![KeyBind::new(KeyCode::F(5), KeyModifiers::ALT)]);
        let again = AppConfig::parse(&config.serialise());
        assert_eq!(again.fade_distance, 40.0);
        assert_eq!(again.bindings, config.bindings);
    }

    #[test]
    fn rejects_unknown_modifiers() {
        assert!(KeyBind::parse("Hyper+x").is_none());
        assert!(KeyBind::parse("xyz").is_none());
        assert_eq!(
            KeyBind::parse("Alt+Up"),
            Some(KeyBind::new(KeyCode::Up, KeyModifiers::ALT))
        );
    }
}
