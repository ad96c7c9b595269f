use crate::core::form::{FieldName, FormState};
use crate::core::gather::FlatForm;
use crate::ui::span::{Span, SpanLine, line_width};
use crate::ui::spinner::Spinner;
use crate::ui::style::{Color, Style};
use crate::validators::TaxIdPolicy;

pub const MAX_VISIBLE_SUGGESTIONS: usize = 5;

const HELP: &str = "Tab next · Ctrl+S submit · Ctrl+R reset · Esc quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPos {
    pub col: u16,
    pub row: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormView {
    pub lines: Vec<SpanLine>,
    pub cursor: Option<CursorPos>,
}

pub struct ViewContext<'a> {
    pub form: &'a FormState,
    pub focus: FieldName,
    pub suggestions: &'a [&'a str],
    pub selected_suggestion: usize,
    pub busy: Option<&'a Spinner>,
    pub last_submitted: Option<&'a FlatForm>,
}

pub fn render_form(ctx: &ViewContext<'_>) -> FormView {
    let mut view = FormView::default();

    for (name, field) in ctx.form.fields() {
        let focused = name == ctx.focus;
        let mut line = vec![
            Span::new(if focused { "> " } else { "  " }),
            Span::styled(field_label(ctx.form, name), Style::new().bold()),
        ];

        let typed = match name {
            FieldName::TaxIdentifier => {
                let sequence = ctx.form.tax_sequence();
                let typed: String = sequence.iter().collect();
                let masked = ctx.form.tax_policy().masked_display(sequence);
                let placeholder: String = masked.chars().skip(sequence.len()).collect();
                line.push(Span::new(typed.clone()));
                if !placeholder.is_empty() {
                    line.push(Span::styled(placeholder, Style::new().color(Color::DarkGrey)));
                }
                typed
            }
            FieldName::Username | FieldName::Country => {
                let text = field.value.to_plain();
                line.push(Span::new(text.clone()));
                text
            }
        };

        if focused && ctx.busy.is_none() {
            let prefix_width = line_width(&line[..2]);
            let typed_width = Span::new(typed).width();
            view.cursor = Some(CursorPos {
                col: (prefix_width + typed_width) as u16,
                row: view.lines.len() as u16,
            });
        }
        view.lines.push(line);

        if let Some(error) = field.visible_error() {
            view.lines.push(vec![Span::styled(
                format!("    ✗ {error}"),
                Style::new().color(Color::Red),
            )]);
        }

        if name == FieldName::Country {
            push_suggestions(&mut view, ctx);
        }
    }

    view.lines.push(Vec::new());

    if ctx.form.has_visible_errors() {
        view.lines.push(vec![Span::styled(
            "  ! Please check the form!",
            Style::new().color(Color::Yellow).bold(),
        )]);
    }

    if let Some(spinner) = ctx.busy {
        view.lines.push(vec![
            Span::new("  "),
            spinner.span(),
            Span::new(" Submitting…"),
        ]);
    } else if let Some(data) = ctx.last_submitted {
        let payload = serde_json::to_string(data).unwrap_or_default();
        view.lines.push(vec![Span::styled(
            format!("  ✓ Submitted {payload}"),
            Style::new().color(Color::Green).dim(),
        )]);
    }

    view.lines.push(vec![Span::styled(
        format!("  {HELP}"),
        Style::new().color(Color::DarkGrey),
    )]);

    view
}

fn field_label(form: &FormState, name: FieldName) -> String {
    if name == FieldName::TaxIdentifier {
        let policy = form.tax_policy();
        if policy != TaxIdPolicy::Any {
            return format!("{} ({}): ", name.label(), policy.name());
        }
    }
    format!("{}: ", name.label())
}

fn push_suggestions(view: &mut FormView, ctx: &ViewContext<'_>) {
    if ctx.suggestions.is_empty() {
        return;
    }
    for (row, country) in ctx
        .suggestions
        .iter()
        .take(MAX_VISIBLE_SUGGESTIONS)
        .enumerate()
    {
        let selected = row == ctx.selected_suggestion;
        let marker = if selected { "      > " } else { "        " };
        let style = if selected {
            Style::new().color(Color::Cyan).bold()
        } else {
            Style::default()
        };
        view.lines
            .push(vec![Span::new(marker), Span::styled(*country, style)]);
    }
}

#[cfg(test)]
mod tests {
    use super::{CursorPos, ViewContext, render_form};
    use crate::core::config::FormConfig;
    use crate::core::form::{FieldName, FormState};
    use crate::ui::span::line_text;
    use crate::ui::spinner::Spinner;

    fn texts(form: &FormState, focus: FieldName, suggestions: &[&str]) -> Vec<String> {
        let view = render_form(&ViewContext {
            form,
            focus,
            suggestions,
            selected_suggestion: 0,
            busy: None,
            last_submitted: None,
        });
        view.lines.iter().map(|line| line_text(line)).collect()
    }

    #[test]
    fn pristine_form_shows_no_errors() {
        let lines = texts(&FormState::empty(), FieldName::Username, &[]);
        assert_eq!(lines[0], "> Username: ");
        assert_eq!(lines[1], "  Country: ");
        assert_eq!(lines[2], "  Tax identifier: ");
        assert!(!lines.iter().any(|line| line.contains('✗')));
    }

    #[test]
    fn dirty_invalid_field_shows_error_and_alert() {
        let config = FormConfig::default();
        let form = FormState::empty().edit_text(&config, FieldName::Username, "a1");
        let lines = texts(&form, FieldName::Username, &[]);
        assert_eq!(lines[1], "    ✗ use only chars");
        assert!(lines.iter().any(|line| line.contains("Please check the form!")));
    }

    #[test]
    fn suggestions_follow_country_line() {
        let config = FormConfig::default();
        let form = FormState::empty().edit_text(&config, FieldName::Country, "an");
        let lines = texts(&form, FieldName::Country, &["France", "Germany"]);
        assert_eq!(lines[1], "> Country: an");
        assert_eq!(lines[2], "    ✗ select a country from the list");
        assert_eq!(lines[3], "      > France");
        assert_eq!(lines[4], "        Germany");
    }

    #[test]
    fn tax_field_shows_mask_and_cursor_after_typed_part() {
        let config = FormConfig::default();
        let form = FormState::empty()
            .select_country("USA")
            .press_tax_key(&config, '1')
            .press_tax_key(&config, '2');
        let view = render_form(&ViewContext {
            form: &form,
            focus: FieldName::TaxIdentifier,
            suggestions: &[],
            selected_suggestion: 0,
            busy: None,
            last_submitted: None,
        });
        let tax_line = line_text(&view.lines[2]);
        assert_eq!(tax_line, "> Tax identifier (USA): 12__-___-______");
        assert_eq!(
            view.cursor,
            Some(CursorPos {
                col: "> Tax identifier (USA): 12".len() as u16,
                row: 2,
            })
        );
    }

    #[test]
    fn busy_view_hides_cursor() {
        let spinner = Spinner::new();
        let form = FormState::empty();
        let view = render_form(&ViewContext {
            form: &form,
            focus: FieldName::Username,
            suggestions: &[],
            selected_suggestion: 0,
            busy: Some(&spinner),
            last_submitted: None,
        });
        assert_eq!(view.cursor, None);
        assert!(
            view.lines
                .iter()
                .any(|line| line_text(line).contains("Submitting"))
        );
    }
}
