//! Page routing for an interactive session.

/// Page currently shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Login,
    SignUp,
    DiseasePrediction,
}

/// Navigation triggered by a form action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    /// "Create an Account" on the login page
    RequestSignUp,
    /// Registration succeeded
    Registered,
    /// "Back to Login" on the sign-up page
    BackToLogin,
    /// Credentials verified
    LoggedIn,
    /// "Logout" on the prediction page
    Logout,
}

impl Page {
    /// Next page after `action`.
    ///
    /// Actions that do not apply to the current page leave it unchanged.
    #[must_use]
    pub fn navigate(self, action: NavAction) -> Self {
        match (self, action) {
            (Self::Login, NavAction::RequestSignUp) => Self::SignUp,
            (Self::Login, NavAction::LoggedIn) => Self::DiseasePrediction,
            (Self::SignUp, NavAction::Registered | NavAction::BackToLogin) => Self::Login,
            (Self::DiseasePrediction, NavAction::Logout) => Self::Login,
            (page, _) => page,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::SignUp => "Sign Up",
            Self::DiseasePrediction => "Disease Prediction Page",
        }
    }
}

/// Process-local session state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    page: Page,
    user: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    /// Signed-in username, if any.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Apply a navigation action and return the new page.
    pub fn apply(&mut self, action: NavAction) -> Page {
        self.page = self.page.navigate(action);
        if self.page != Page::DiseasePrediction {
            self.user = None;
        }
        self.page
    }

    /// Record a successful login and move to the prediction page.
    pub fn sign_in(&mut self, username: &str) -> Page {
        let page = self.apply(NavAction::LoggedIn);
        if page == Page::DiseasePrediction {
            self.user = Some(username.to_string());
        }
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_page_is_login() {
        assert_eq!(Session::new().page(), Page::Login);
    }

    #[test]
    fn test_valid_transitions() {
        assert_eq!(Page::Login.navigate(NavAction::RequestSignUp), Page::SignUp);
        assert_eq!(Page::SignUp.navigate(NavAction::Registered), Page::Login);
        assert_eq!(Page::SignUp.navigate(NavAction::BackToLogin), Page::Login);
        assert_eq!(Page::Login.navigate(NavAction::LoggedIn), Page::DiseasePrediction);
        assert_eq!(Page::DiseasePrediction.navigate(NavAction::Logout), Page::Login);
    }

    #[test]
    fn test_inapplicable_actions_keep_page() {
        assert_eq!(Page::Login.navigate(NavAction::Logout), Page::Login);
        assert_eq!(Page::SignUp.navigate(NavAction::LoggedIn), Page::SignUp);
        assert_eq!(
            Page::DiseasePrediction.navigate(NavAction::RequestSignUp),
            Page::DiseasePrediction
        );
        assert_eq!(
            Page::DiseasePrediction.navigate(NavAction::BackToLogin),
            Page::DiseasePrediction
        );
    }

    #[test]
    fn test_session_tracks_user() {
        let mut session = Session::new();
        assert_eq!(session.sign_in("alice"), Page::DiseasePrediction);
        assert_eq!(session.user(), Some("alice"));

        assert_eq!(session.apply(NavAction::Logout), Page::Login);
        assert!(session.user().is_none());
    }

    #[test]
    fn test_sign_in_from_sign_up_is_ignored() {
        let mut session = Session::new();
        session.apply(NavAction::RequestSignUp);
        assert_eq!(session.sign_in("alice"), Page::SignUp);
        assert!(session.user().is_none());
    }
}
