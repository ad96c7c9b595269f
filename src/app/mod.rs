pub mod command;
pub mod key_bindings;
pub mod submit;

use std::time::Instant;

use tracing::debug;

use crate::core::config::FormConfig;
use crate::core::form::{FieldName, FormState};
use crate::core::gather::FlatForm;
use crate::terminal::{KeyCode, KeyEvent};
use crate::ui::spinner::Spinner;
use crate::ui::view::{FormView, MAX_VISIBLE_SUGGESTIONS, ViewContext, render_form};
use crate::validators::filter_countries;
use command::Command;
use key_bindings::KeyBindings;
use submit::{LogSink, Submission, SubmissionSink};

/// Interactive form: routes keys to fields and drives the submit lifecycle.
pub struct App {
    config: FormConfig,
    form: FormState,
    focus: FieldName,
    selected_suggestion: usize,
    submission: Submission,
    last_submitted: Option<FlatForm>,
    sink: Box<dyn SubmissionSink>,
    key_bindings: KeyBindings,
    spinner: Spinner,
    should_exit: bool,
}

impl App {
    pub fn new(config: FormConfig) -> Self {
        Self {
            config,
            form: FormState::empty(),
            focus: FieldName::Username,
            selected_suggestion: 0,
            submission: Submission::default(),
            last_submitted: None,
            sink: Box::new(LogSink),
            key_bindings: KeyBindings::new(),
            spinner: Spinner::new(),
            should_exit: false,
        }
    }

    pub fn with_sink(mut self, sink: impl SubmissionSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn focus(&self) -> FieldName {
        self.focus
    }

    pub fn is_busy(&self) -> bool {
        self.submission.is_busy()
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn last_submitted(&self) -> Option<&FlatForm> {
        self.last_submitted.as_ref()
    }

    pub fn selected_suggestion(&self) -> usize {
        self.selected_suggestion
    }

    /// Countries matching the typed text, shown while the country is dirty
    /// and not yet valid.
    pub fn suggestions(&self) -> Vec<&str> {
        let country = &self.form.country;
        if country.is_pristine || country.is_valid {
            return Vec::new();
        }
        filter_countries(
            &self.config.countries,
            country.value.as_text().unwrap_or_default(),
        )
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.handle_key_at(key, Instant::now());
    }

    pub fn handle_key_at(&mut self, key: KeyEvent, now: Instant) {
        if let Some(command) = self.key_bindings.resolve(key) {
            if command == Command::Exit {
                self.should_exit = true;
            } else if !self.is_busy() {
                self.run_command(command, now);
            }
            return;
        }

        if !self.is_busy() {
            self.handle_field_key(key, now);
        }
    }

    pub fn submit_at(&mut self, now: Instant) -> bool {
        let payload = self.form.flatten();
        if !self
            .submission
            .start(payload, now, self.config.submit_delay())
        {
            return false;
        }
        debug!(delay_ms = self.config.submit_delay_ms, "submit started");
        self.spinner.reset();
        true
    }

    pub fn reset(&mut self) {
        self.form = FormState::empty();
        self.focus = FieldName::Username;
        self.selected_suggestion = 0;
    }

    /// Advances the submit lifecycle. Returns true when a redraw is needed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        if !self.is_busy() {
            return false;
        }

        match self.submission.poll(now) {
            Some(payload) => {
                self.sink.submit(&payload);
                self.last_submitted = Some(payload);
                self.reset();
            }
            None => self.spinner.tick(),
        }
        true
    }

    pub fn view(&self) -> FormView {
        let suggestions = self.suggestions();
        render_form(&ViewContext {
            form: &self.form,
            focus: self.focus,
            suggestions: &suggestions,
            selected_suggestion: self.selected_suggestion,
            busy: self.is_busy().then_some(&self.spinner),
            last_submitted: self.last_submitted.as_ref(),
        })
    }

    fn run_command(&mut self, command: Command, now: Instant) {
        match command {
            Command::Exit => self.should_exit = true,
            Command::Submit => {
                self.submit_at(now);
            }
            Command::Reset => self.reset(),
            Command::NextFocus => self.move_focus(1),
            Command::PrevFocus => self.move_focus(-1),
        }
    }

    fn handle_field_key(&mut self, key: KeyEvent, now: Instant) {
        let suggestion_count = self.suggestions().len().min(MAX_VISIBLE_SUGGESTIONS);
        let in_suggestions = self.focus == FieldName::Country && suggestion_count > 0;

        match key.code {
            KeyCode::Up if in_suggestions => self.move_suggestion(-1, suggestion_count),
            KeyCode::Down if in_suggestions => self.move_suggestion(1, suggestion_count),
            KeyCode::Enter if in_suggestions => self.pick_suggestion(),
            KeyCode::Up => self.move_focus(-1),
            KeyCode::Down => self.move_focus(1),
            KeyCode::Enter if self.focus == FieldName::TaxIdentifier => {
                self.submit_at(now);
            }
            KeyCode::Enter => self.move_focus(1),
            KeyCode::Backspace => self.delete_char(),
            _ => {
                if let Some(ch) = key.typed_char() {
                    self.type_char(ch);
                }
            }
        }
    }

    fn type_char(&mut self, ch: char) {
        match self.focus {
            FieldName::TaxIdentifier => {
                self.form = self.form.press_tax_key(&self.config, ch);
            }
            name => {
                let mut text = self.form.field(name).value.to_plain();
                text.push(ch);
                self.edit_text(name, text.as_str());
            }
        }
    }

    fn delete_char(&mut self) {
        match self.focus {
            FieldName::TaxIdentifier => {
                self.form = self.form.delete_tax_char(&self.config);
            }
            name => {
                let mut text = self.form.field(name).value.to_plain();
                if text.pop().is_some() {
                    self.edit_text(name, text.as_str());
                }
            }
        }
    }

    fn edit_text(&mut self, name: FieldName, text: &str) {
        self.form = self.form.edit_text(&self.config, name, text);
        if name == FieldName::Country {
            self.selected_suggestion = 0;
        }
    }

    fn move_suggestion(&mut self, direction: isize, count: usize) {
        let len = count as isize;
        let current = self.selected_suggestion.min(count - 1) as isize;
        self.selected_suggestion = ((current + direction + len) % len) as usize;
    }

    fn pick_suggestion(&mut self) {
        let picked = self
            .suggestions()
            .get(self.selected_suggestion)
            .map(|country| country.to_string());
        if let Some(country) = picked {
            self.form = self.form.select_country(country.as_str());
            self.selected_suggestion = 0;
        }
    }

    fn move_focus(&mut self, direction: isize) {
        let len = FieldName::ALL.len() as isize;
        let current = FieldName::ALL
            .iter()
            .position(|name| *name == self.focus)
            .unwrap_or(0) as isize;
        let next = ((current + direction + len) % len) as usize;
        self.focus = FieldName::ALL[next];
    }
}
