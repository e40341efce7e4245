//! Disease prediction page: disease selector, feature inputs and verdict.

use std::collections::HashMap;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{FieldSpec, InputSpec, Page, Sex, Verdict};
use crate::tui::styles::MedicalTheme;

/// One feature input on the form
#[derive(Debug, Clone)]
pub struct FormField {
    pub spec: FieldSpec,
    pub value: String,
    pub sex: Sex,
}

impl FormField {
    fn new(spec: FieldSpec) -> Self {
        let value = match spec.input {
            InputSpec::Sex => String::new(),
            InputSpec::Numeric(_) => spec.input.format(spec.input.default_value()),
        };
        Self {
            spec,
            value,
            sex: Sex::default(),
        }
    }

    /// Bounds-checked model value of this input.
    fn model_value(&self) -> Result<f64, String> {
        let bounds = match self.spec.input {
            InputSpec::Sex => return Ok(self.sex.encode()),
            InputSpec::Numeric(bounds) => bounds,
        };

        let value: f64 = self
            .value
            .trim()
            .parse()
            .map_err(|_| format!("{}: Invalid number", self.spec.name))?;

        if !value.is_finite() || value < bounds.min || value > bounds.max {
            return Err(format!(
                "{}: Value must be between {} and {}",
                self.spec.name, bounds.min, bounds.max
            ));
        }
        Ok(value)
    }

    /// Step the value up or down, clamped to the bounds.
    fn step(&mut self, up: bool) {
        match self.spec.input {
            InputSpec::Sex => self.sex = self.sex.toggle(),
            InputSpec::Numeric(bounds) => {
                let current = self
                    .value
                    .trim()
                    .parse::<f64>()
                    .unwrap_or_else(|_| bounds.default.value());
                let delta = if up {
                    self.spec.input.step()
                } else {
                    -self.spec.input.step()
                };
                let next = (current + delta).clamp(bounds.min, bounds.max);
                self.value = self.spec.input.format(next);
            }
        }
    }

    fn display(&self) -> String {
        match self.spec.input {
            InputSpec::Sex => format!("◀ {} ▶", self.sex),
            InputSpec::Numeric(_) => self.value.clone(),
        }
    }

    fn hint(&self) -> String {
        match self.spec.input {
            InputSpec::Sex => "Male/Female".to_string(),
            InputSpec::Numeric(bounds) => format!("{}–{}", bounds.min, bounds.max),
        }
    }
}

/// Result of the last prediction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionOutcome {
    Verdict(Verdict),
    Error(String),
}

/// Prediction page state
///
/// Focus 0 is the disease selector; focus `i + 1` is `fields[i]`.
#[derive(Debug, Clone, Default)]
pub struct PredictionFormState {
    pub diseases: Vec<String>,
    pub disease_index: usize,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub outcome: Option<PredictionOutcome>,
}

impl PredictionFormState {
    #[must_use]
    pub fn new(diseases: Vec<String>) -> Self {
        Self {
            diseases,
            ..Self::default()
        }
    }

    /// Currently selected disease
    #[must_use]
    pub fn selected_disease(&self) -> Option<&str> {
        self.diseases.get(self.disease_index).map(String::as_str)
    }

    /// Replace the inputs with `specs`, each at its default value.
    pub fn set_fields(&mut self, specs: Vec<FieldSpec>) {
        self.fields = specs.into_iter().map(FormField::new).collect();
        self.focus = 0;
        self.outcome = None;
    }

    /// Select the next or previous disease; `true` if the selection changed.
    pub fn cycle_disease(&mut self, forward: bool) -> bool {
        let n = self.diseases.len();
        if n < 2 {
            return false;
        }
        self.disease_index = if forward {
            (self.disease_index + 1) % n
        } else {
            (self.disease_index + n - 1) % n
        };
        true
    }

    /// Whether the disease selector has focus
    #[must_use]
    pub fn selector_focused(&self) -> bool {
        self.focus == 0
    }

    /// Move to the next input
    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % (self.fields.len() + 1);
    }

    /// Move to the previous input
    pub fn prev_field(&mut self) {
        if self.focus == 0 {
            self.focus = self.fields.len();
        } else {
            self.focus -= 1;
        }
    }

    fn focused_field(&mut self) -> Option<&mut FormField> {
        self.focus
            .checked_sub(1)
            .and_then(|i| self.fields.get_mut(i))
    }

    /// Step the focused input up or down (toggles the sex selector)
    pub fn step_field(&mut self, up: bool) {
        if let Some(field) = self.focused_field() {
            field.step(up);
            self.outcome = None;
        }
    }

    /// Add a character to the focused numeric input
    pub fn input_char(&mut self, c: char) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let accepted = match field.spec.input {
            InputSpec::Sex => false,
            InputSpec::Numeric(_) => {
                c.is_ascii_digit() || c == '-' || (c == '.' && field.spec.input.is_fractional())
            }
        };
        if accepted {
            field.value.push(c);
            self.outcome = None;
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        if let Some(field) = self.focused_field() {
            field.value.pop();
            self.outcome = None;
        }
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        if let Some(field) = self.focused_field() {
            field.value.clear();
            self.outcome = None;
        }
    }

    /// Validate every input and collect the model values by feature name.
    ///
    /// # Errors
    /// Returns a message naming the first invalid or out-of-range input.
    pub fn collect_values(&self) -> Result<HashMap<String, f64>, String> {
        self.fields
            .iter()
            .map(|field| Ok((field.spec.name.clone(), field.model_value()?)))
            .collect()
    }

    /// Wipe all field buffers and forget the last result.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            field.value.zeroize();
        }
        self.fields.clear();
        self.outcome = None;
        self.focus = 0;
    }
}

/// Render the disease prediction page
pub fn render_prediction(f: &mut Frame, area: Rect, state: &PredictionFormState, user: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Disease selector
            Constraint::Min(0),    // Fields
            Constraint::Length(3), // Result
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], user);
    render_selector(f, chunks[1], state);
    render_fields(f, chunks[2], state);
    render_outcome(f, chunks[3], state);
    render_footer(f, chunks[4]);
}

fn render_header(f: &mut Frame, area: Rect, user: Option<&str>) {
    let mut spans = vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled(Page::DiseasePrediction.title(), MedicalTheme::title()),
    ];
    if let Some(user) = user {
        spans.push(Span::styled(
            format!(" │ Signed in as {user}"),
            MedicalTheme::text_secondary(),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(header, area);
}

fn render_selector(f: &mut Frame, area: Rect, state: &PredictionFormState) {
    let focused = state.selector_focused();
    let (border_style, title_style) = focus_styles(focused);

    let name = state.selected_disease().unwrap_or("No diseases configured");
    let block = Block::default()
        .title(Span::styled(" Select Disease ", title_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    let content = Paragraph::new(Line::from(vec![
        Span::styled(" ◀ ", MedicalTheme::key_hint()),
        Span::styled(name.to_string(), MedicalTheme::subtitle()),
        Span::styled(" ▶", MedicalTheme::key_hint()),
    ]))
    .block(block);
    f.render_widget(content, area);
}

fn render_fields(f: &mut Frame, area: Rect, state: &PredictionFormState) {
    if state.fields.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            " No input features available for this disease.",
            MedicalTheme::text_muted(),
        )));
        f.render_widget(empty, area);
        return;
    }

    let column_count = if state.fields.len() > 8 { 3 } else { 2 };
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, column_count); column_count as usize])
        .margin(1)
        .split(area);

    let per_column = state.fields.len().div_ceil(column_count as usize);
    for (c, chunk) in state.fields.chunks(per_column).enumerate() {
        render_field_column(f, columns[c], chunk, c * per_column, state.focus);
    }
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    focus: usize,
) {
    let field_height = 3;
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i + 1 == focus;
        let (border_style, title_style) = focus_styles(is_selected);

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.spec.name), title_style))
            .title_bottom(Span::styled(
                format!(" {} ", field.hint()),
                MedicalTheme::text_muted(),
            ))
            .borders(Borders::ALL)
            .border_style(border_style);

        let content = Paragraph::new(Line::from(vec![
            Span::raw(" "),
            Span::styled(field.display(), MedicalTheme::text()),
            if is_selected {
                Span::styled("▌", MedicalTheme::cursor())
            } else {
                Span::raw("")
            },
        ]))
        .block(block);

        f.render_widget(content, chunks[i]);
    }
}

fn render_outcome(f: &mut Frame, area: Rect, state: &PredictionFormState) {
    let line = match &state.outcome {
        Some(PredictionOutcome::Verdict(verdict)) => {
            let style = if verdict.has_disease() {
                MedicalTheme::danger()
            } else {
                MedicalTheme::success()
            };
            Line::from(vec![
                Span::styled(" ● ", style),
                Span::styled(verdict.to_string(), style),
            ])
        }
        Some(PredictionOutcome::Error(message)) => Line::from(vec![
            Span::styled(" ! ", MedicalTheme::danger()),
            Span::styled(message.clone(), MedicalTheme::danger()),
        ]),
        None => Line::from(Span::styled(
            " Press Enter to predict.",
            MedicalTheme::text_muted(),
        )),
    };

    let block = Block::default()
        .title(Span::styled(" Result ", MedicalTheme::text_secondary()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let content = Line::from(vec![
        Span::styled("[↑↓/Tab] ", MedicalTheme::key_hint()),
        Span::styled("Navigate ", MedicalTheme::key_desc()),
        Span::styled("[←→] ", MedicalTheme::key_hint()),
        Span::styled("Change ", MedicalTheme::key_desc()),
        Span::styled("[Enter] ", MedicalTheme::key_hint()),
        Span::styled("Predict Disease ", MedicalTheme::key_desc()),
        Span::styled("[Ctrl+L] ", MedicalTheme::key_hint()),
        Span::styled("Logout ", MedicalTheme::key_desc()),
        Span::styled("[Ctrl+Q] ", MedicalTheme::key_hint()),
        Span::styled("Quit", MedicalTheme::key_desc()),
    ]);

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(footer, area);
}

fn focus_styles(focused: bool) -> (ratatui::style::Style, ratatui::style::Style) {
    if focused {
        (MedicalTheme::border_focused(), MedicalTheme::focused())
    } else {
        (MedicalTheme::border(), MedicalTheme::text_secondary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureBounds, FeatureMetadata, Label, NumericDefault};

    fn state() -> PredictionFormState {
        let metadata = FeatureMetadata::builtin();
        let specs = ["Pregnancies", "sex", "BMI"]
            .iter()
            .map(|name| FieldSpec {
                name: (*name).to_string(),
                input: metadata.input_spec("Diabetes", name),
            })
            .collect();

        let mut state = PredictionFormState::new(vec!["Diabetes".into(), "Thyroid".into()]);
        state.set_fields(specs);
        state
    }

    #[test]
    fn test_defaults_are_formatted_by_precision() {
        let state = state();
        assert_eq!(state.fields[0].value, "1");
        assert_eq!(state.fields[2].value, "25.00");

        let values = state.collect_values().expect("Defaults should be valid");
        assert_eq!(values.get("Pregnancies"), Some(&1.0));
        assert_eq!(values.get("sex"), Some(&1.0));
        assert_eq!(values.get("BMI"), Some(&25.0));
    }

    #[test]
    fn test_focus_wraps_through_selector() {
        let mut state = state();
        assert!(state.selector_focused());

        state.prev_field();
        assert_eq!(state.focus, 3);
        state.next_field();
        assert!(state.selector_focused());
    }

    #[test]
    fn test_sex_selector_toggles() {
        let mut state = state();
        state.focus = 2;
        state.step_field(true);
        assert_eq!(state.fields[1].sex, Sex::Female);

        let values = state.collect_values().expect("Should be valid");
        assert_eq!(values.get("sex"), Some(&0.0));

        // Typing never reaches the selector.
        state.input_char('1');
        assert!(state.fields[1].value.is_empty());
    }

    #[test]
    fn test_step_is_clamped() {
        let mut state = state();
        state.focus = 1;
        state.fields[0].value = "20".into();
        state.step_field(true);
        assert_eq!(state.fields[0].value, "20");

        state.focus = 3;
        state.step_field(false);
        assert_eq!(state.fields[2].value, "24.90");
    }

    #[test]
    fn test_integer_fields_reject_decimal_point() {
        let mut state = state();
        state.focus = 1;
        state.clear_field();
        state.input_char('3');
        state.input_char('.');
        state.input_char('x');
        assert_eq!(state.fields[0].value, "3");

        state.focus = 3;
        state.clear_field();
        for c in "31.5".chars() {
            state.input_char(c);
        }
        assert_eq!(state.fields[2].value, "31.5");
    }

    #[test]
    fn test_out_of_range_value_is_rejected() {
        let mut state = state();
        state.fields[0].value = "21".into();
        let err = state.collect_values().expect_err("Should reject");
        assert_eq!(err, "Pregnancies: Value must be between 0 and 20");

        state.fields[0].value = String::new();
        let err = state.collect_values().expect_err("Should reject");
        assert_eq!(err, "Pregnancies: Invalid number");
    }

    #[test]
    fn test_fractional_bounds_keep_their_digits() {
        let mut state = PredictionFormState::new(vec!["Other".into()]);
        state.set_fields(vec![FieldSpec {
            name: "x".into(),
            input: InputSpec::Numeric(FeatureBounds {
                min: 0.5,
                max: 10.0,
                default: NumericDefault::Integer(1),
            }),
        }]);
        assert_eq!(state.fields[0].hint(), "0.5–10");

        state.fields[0].value = "0".into();
        let err = state.collect_values().expect_err("Should reject");
        assert_eq!(err, "x: Value must be between 0.5 and 10");
    }

    #[test]
    fn test_editing_forgets_previous_result() {
        let verdict = || {
            Some(PredictionOutcome::Verdict(Verdict::new(
                "Diabetes",
                Label::Positive,
            )))
        };
        let mut state = state();
        state.focus = 1;

        state.outcome = verdict();
        state.delete_char();
        assert!(state.outcome.is_none());

        state.outcome = verdict();
        state.clear_field();
        assert!(state.outcome.is_none());

        state.outcome = verdict();
        state.step_field(true);
        assert!(state.outcome.is_none());
    }

    #[test]
    fn test_fallback_bounds_apply() {
        let mut state = PredictionFormState::new(vec!["Other".into()]);
        state.set_fields(vec![FieldSpec {
            name: "x".into(),
            input: InputSpec::Numeric(FeatureBounds::default()),
        }]);
        assert_eq!(state.fields[0].value, "0");

        state.fields[0].value = "101".into();
        assert!(state.collect_values().is_err());
    }

    #[test]
    fn test_cycle_disease_wraps() {
        let mut state = state();
        assert_eq!(state.selected_disease(), Some("Diabetes"));
        assert!(state.cycle_disease(false));
        assert_eq!(state.selected_disease(), Some("Thyroid"));
        assert!(state.cycle_disease(true));
        assert_eq!(state.selected_disease(), Some("Diabetes"));

        let mut single = PredictionFormState::new(vec!["Diabetes".into()]);
        assert!(!single.cycle_disease(true));
    }

    #[test]
    fn test_clear_sensitive_resets() {
        let mut state = state();
        state.outcome = Some(PredictionOutcome::Verdict(Verdict::new(
            "Diabetes",
            Label::Positive,
        )));
        state.clear_sensitive();

        assert!(state.fields.is_empty());
        assert!(state.outcome.is_none());
        assert_eq!(state.focus, 0);
    }
}
