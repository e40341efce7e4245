//! Main TUI application state machine.
//!
//! Handles:
//! - Page routing through the session
//! - Input event handling
//! - Service integration

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::dataset::CsvFeatureSource;
use crate::adapters::model::JsonModelRepository;
use crate::adapters::sqlite::SqliteCredentialStore;
use crate::application::{AuthError, AuthService, PredictionService, RegisterOutcome};
use crate::config::AppConfig;
use crate::domain::{NavAction, Page, Session};

use super::ui::{
    auth::{render_login, render_sign_up, AuthFormState, StatusMessage},
    prediction::{render_prediction, PredictionFormState, PredictionOutcome},
    render_disclaimer, render_warnings,
};

type Auth = AuthService<SqliteCredentialStore>;
type Predictions = PredictionService<CsvFeatureSource, JsonModelRepository>;

const MSG_INVALID_LOGIN: &str = "Invalid username or password";
const MSG_USERNAME_TAKEN: &str = "Username already exists. Choose a different one.";
const MSG_ACCOUNT_CREATED: &str = "Account created successfully! Go to Login.";

/// Main application state
pub struct App {
    /// Current page and signed-in user
    session: Session,

    /// Whether the app should quit
    should_quit: bool,

    /// Account service
    auth: Auth,

    /// Prediction service
    prediction: Predictions,

    /// Startup problems shown as a degraded-mode notice
    warnings: Vec<String>,

    /// Login form state
    login_state: AuthFormState,

    /// Sign-up form state
    sign_up_state: AuthFormState,

    /// Prediction form state
    prediction_state: PredictionFormState,
}

impl App {
    /// Create a new application instance from `CARESCOPE_*` settings.
    ///
    /// This is a convenience method that constructs all adapters internally.
    /// For more control, use `with_dependencies()`.
    ///
    /// # Errors
    /// Returns error if the database cannot be opened or a configured
    /// registry file is invalid.
    pub fn new() -> Result<Self> {
        let config = AppConfig::from_env();

        let store = Arc::new(SqliteCredentialStore::new(&config.db_path)?);
        let resources = config.load_resources()?;

        let auth = AuthService::new(store.clone());
        tracing::info!(
            "Credential store at {:?} ({} accounts)",
            store.path(),
            auth.account_count()?
        );

        let registry = resources.registry;
        let prediction = PredictionService::new(
            registry.clone(),
            Arc::new(CsvFeatureSource::new(registry.clone())),
            Arc::new(JsonModelRepository::new(registry)),
            resources.metadata,
        );

        Ok(Self::with_dependencies(auth, prediction, resources.warnings))
    }

    /// Create application with injected dependencies (Composition Root pattern).
    #[must_use]
    pub fn with_dependencies(auth: Auth, prediction: Predictions, warnings: Vec<String>) -> Self {
        Self {
            session: Session::new(),
            should_quit: false,
            auth,
            prediction,
            warnings,
            login_state: AuthFormState::default(),
            sign_up_state: AuthFormState::default(),
            prediction_state: PredictionFormState::default(),
        }
    }

    /// Current page
    #[must_use]
    pub fn page(&self) -> Page {
        self.session.page()
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Main loop
        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let warning_height = if self.warnings.is_empty() {
                    0
                } else {
                    u16::try_from(self.warnings.len() + 2).unwrap_or(u16::MAX)
                };

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(warning_height),
                        Constraint::Min(0),
                        Constraint::Length(2),
                    ])
                    .split(f.area());

                if !self.warnings.is_empty() {
                    render_warnings(f, chunks[0], &self.warnings);
                }

                let content_area = chunks[1];
                match self.session.page() {
                    Page::Login => render_login(f, content_area, &self.login_state),
                    Page::SignUp => render_sign_up(f, content_area, &self.sign_up_state),
                    Page::DiseasePrediction => render_prediction(
                        f,
                        content_area,
                        &self.prediction_state,
                        self.session.user(),
                    ),
                }

                render_disclaimer(f, chunks[2]);
            })?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);

        // Global quit handling
        if ctrl && key == KeyCode::Char('q') {
            self.should_quit = true;
            return;
        }

        match self.session.page() {
            Page::Login => self.handle_login_key(key, ctrl),
            Page::SignUp => self.handle_sign_up_key(key, ctrl),
            Page::DiseasePrediction => self.handle_prediction_key(key, ctrl),
        }
    }

    fn handle_login_key(&mut self, key: KeyCode, ctrl: bool) {
        match key {
            KeyCode::Char('n') if ctrl => {
                self.login_state.clear_sensitive();
                self.login_state.message = None;
                self.sign_up_state = AuthFormState::default();
                self.session.apply(NavAction::RequestSignUp);
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login_state.toggle_focus();
            }
            KeyCode::Enter => self.submit_login(),
            KeyCode::Backspace => self.login_state.delete_char(),
            KeyCode::Char(c) if !ctrl => self.login_state.input_char(c),
            _ => {}
        }
    }

    fn handle_sign_up_key(&mut self, key: KeyCode, ctrl: bool) {
        match key {
            KeyCode::Esc => {
                self.sign_up_state.clear_sensitive();
                self.session.apply(NavAction::BackToLogin);
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.sign_up_state.toggle_focus();
            }
            KeyCode::Enter => self.submit_sign_up(),
            KeyCode::Backspace => self.sign_up_state.delete_char(),
            KeyCode::Char(c) if !ctrl => self.sign_up_state.input_char(c),
            _ => {}
        }
    }

    fn handle_prediction_key(&mut self, key: KeyCode, ctrl: bool) {
        match key {
            KeyCode::Char('l') if ctrl => self.logout(),
            KeyCode::Down | KeyCode::Tab => self.prediction_state.next_field(),
            KeyCode::Up | KeyCode::BackTab => self.prediction_state.prev_field(),
            KeyCode::Left | KeyCode::Right => {
                let forward = key == KeyCode::Right;
                if self.prediction_state.selector_focused() {
                    if self.prediction_state.cycle_disease(forward) {
                        self.reload_fields();
                    }
                } else {
                    self.prediction_state.step_field(forward);
                }
            }
            KeyCode::Enter => self.submit_prediction(),
            KeyCode::Backspace => self.prediction_state.delete_char(),
            KeyCode::Delete => self.prediction_state.clear_field(),
            KeyCode::Char(c) if !ctrl => self.prediction_state.input_char(c),
            _ => {}
        }
    }

    fn submit_login(&mut self) {
        let state = &mut self.login_state;
        if self.auth.login(&state.username, &state.password) {
            let username = state.username.clone();
            state.clear_sensitive();
            state.message = None;

            self.session.sign_in(&username);
            self.enter_prediction_page();
        } else {
            state.clear_password();
            state.message = Some(StatusMessage::Error(MSG_INVALID_LOGIN.to_string()));
        }
    }

    fn submit_sign_up(&mut self) {
        let state = &mut self.sign_up_state;
        let message = match self.auth.try_register(&state.username, &state.password) {
            Ok(RegisterOutcome::Created) => {
                state.clear_sensitive();
                state.message = None;
                self.session.apply(NavAction::Registered);
                self.login_state.message =
                    Some(StatusMessage::Success(MSG_ACCOUNT_CREATED.to_string()));
                return;
            }
            Ok(RegisterOutcome::UsernameTaken) => MSG_USERNAME_TAKEN.to_string(),
            Err(AuthError::InvalidUsername(reason)) => reason,
            Err(e) => {
                tracing::warn!("Registration failed: {}", e);
                "Registration failed. Please try again.".to_string()
            }
        };

        state.clear_password();
        state.message = Some(StatusMessage::Error(message));
    }

    fn enter_prediction_page(&mut self) {
        self.prediction_state = PredictionFormState::new(self.prediction.diseases());
        self.reload_fields();
    }

    fn reload_fields(&mut self) {
        let Some(disease) = self.prediction_state.selected_disease().map(str::to_string) else {
            return;
        };
        let fields = self.prediction.form_fields(&disease);
        self.prediction_state.set_fields(fields);
    }

    fn submit_prediction(&mut self) {
        let Some(disease) = self.prediction_state.selected_disease().map(str::to_string) else {
            return;
        };

        let outcome = match self.prediction_state.collect_values() {
            Ok(values) => match self.prediction.predict(&disease, &values) {
                Ok(verdict) => PredictionOutcome::Verdict(verdict),
                Err(e) => {
                    tracing::warn!("Prediction for {} failed: {}", disease, e);
                    PredictionOutcome::Error(e.user_message())
                }
            },
            Err(message) => PredictionOutcome::Error(message),
        };
        self.prediction_state.outcome = Some(outcome);
    }

    fn logout(&mut self) {
        self.prediction_state.clear_sensitive();
        self.login_state = AuthFormState::default();
        self.session.apply(NavAction::Logout);
        tracing::info!("Logged out");
    }
}
