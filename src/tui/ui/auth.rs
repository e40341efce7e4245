//! Login and sign-up forms.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::Page;
use crate::tui::styles::MedicalTheme;

/// Focused input of an auth form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthField {
    #[default]
    Username,
    Password,
}

/// Feedback shown under an auth form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Success(String),
    Error(String),
}

/// State of the login or sign-up form
#[derive(Default)]
pub struct AuthFormState {
    pub username: String,
    pub password: String,
    pub focus: AuthField,
    pub message: Option<StatusMessage>,
}

impl AuthFormState {
    /// Switch focus between username and password
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            AuthField::Username => AuthField::Password,
            AuthField::Password => AuthField::Username,
        };
    }

    /// Add a character to the focused input
    pub fn input_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        match self.focus {
            AuthField::Username => self.username.push(c),
            AuthField::Password => self.password.push(c),
        }
        self.message = None;
    }

    /// Delete the last character of the focused input
    pub fn delete_char(&mut self) {
        match self.focus {
            AuthField::Username => self.username.pop(),
            AuthField::Password => self.password.pop(),
        };
    }

    /// Wipe the password buffer.
    pub fn clear_password(&mut self) {
        self.password.zeroize();
    }

    /// Wipe both inputs and reset focus; any message is kept.
    pub fn clear_sensitive(&mut self) {
        self.username.zeroize();
        self.password.zeroize();
        self.focus = AuthField::Username;
    }
}

/// Render the login page
pub fn render_login(f: &mut Frame, area: Rect, state: &AuthFormState) {
    let hints = [
        ("[Enter] ", "Login "),
        ("[Tab] ", "Switch field "),
        ("[Ctrl+N] ", "Create an Account "),
        ("[Ctrl+Q] ", "Quit"),
    ];
    render_auth_form(f, area, state, Page::Login.title(), &hints);
}

/// Render the sign-up page
pub fn render_sign_up(f: &mut Frame, area: Rect, state: &AuthFormState) {
    let hints = [
        ("[Enter] ", "Sign Up "),
        ("[Tab] ", "Switch field "),
        ("[Esc] ", "Back to Login "),
        ("[Ctrl+Q] ", "Quit"),
    ];
    render_auth_form(f, area, state, Page::SignUp.title(), &hints);
}

fn render_auth_form(
    f: &mut Frame,
    area: Rect,
    state: &AuthFormState,
    title: &str,
    hints: &[(&'static str, &'static str)],
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Username
            Constraint::Length(3), // Password
            Constraint::Length(2), // Message
            Constraint::Min(0),
            Constraint::Length(3), // Footer
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled(title.to_string(), MedicalTheme::title()),
        Span::styled(" │ Disease Prediction", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(header, chunks[0]);

    let masked = "•".repeat(state.password.chars().count());
    render_input(
        f,
        chunks[1],
        "Username",
        &state.username,
        state.focus == AuthField::Username,
    );
    render_input(
        f,
        chunks[2],
        "Password",
        &masked,
        state.focus == AuthField::Password,
    );

    if let Some(message) = &state.message {
        let line = match message {
            StatusMessage::Success(text) => Line::from(vec![
                Span::styled(" ✓ ", MedicalTheme::success()),
                Span::styled(text.clone(), MedicalTheme::success()),
            ]),
            StatusMessage::Error(text) => Line::from(vec![
                Span::styled(" ! ", MedicalTheme::danger()),
                Span::styled(text.clone(), MedicalTheme::danger()),
            ]),
        };
        f.render_widget(Paragraph::new(line), chunks[3]);
    }

    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(*key, MedicalTheme::key_hint()),
                Span::styled(*desc, MedicalTheme::key_desc()),
            ]
        })
        .collect();
    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(footer, chunks[5]);
}

fn render_input(f: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let (border_style, title_style) = if focused {
        (MedicalTheme::border_focused(), MedicalTheme::focused())
    } else {
        (MedicalTheme::border(), MedicalTheme::text_secondary())
    };

    let block = Block::default()
        .title(Span::styled(format!(" {label} "), title_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    let content = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(value.to_string(), MedicalTheme::text()),
        if focused {
            Span::styled("▌", MedicalTheme::cursor())
        } else {
            Span::raw("")
        },
    ]))
    .block(block);

    f.render_widget(content, area);
}
