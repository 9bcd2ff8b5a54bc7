use crate::ui::StyleTokens;
use gtk4::CssProvider;

const PAGE_BACKGROUND: &str = "#f2f2f2";
const TEXT_COLOR: &str = "#1a1a1a";
const ACCENT_COLOR: &str = "#1a994d";
const ACCENT_TEXT_COLOR: &str = "#ffffff";
const CARD_BACKGROUND: &str = "#ffffff";
const BORDER_COLOR: &str = "rgba(0, 0, 0, 0.08)";
const DANGER_COLOR: &str = "#c0392b";

pub(super) fn install_runtime_css(tokens: StyleTokens) {
    let css = format!(
        "
window.catalogue-root {{
  background: {page_background};
  color: {text_color};
}}
.splash-title {{
  font-size: {splash_title_size}px;
  font-weight: bold;
  color: {text_color};
}}
button.splash-button {{
  background: {accent_color};
  color: {accent_text_color};
  font-size: {splash_button_size}px;
  border-radius: {control_radius}px;
}}
.catalogue-header {{
  padding: {spacing_8}px {spacing_12}px;
}}
button.article-card {{
  background: {card_background};
  border: {border_width}px solid {border_color};
  border-radius: {card_radius}px;
  padding: {spacing_8}px;
  box-shadow: 0 1px 3px rgba(0, 0, 0, 0.10);
}}
.article-title {{
  font-weight: bold;
}}
.article-price {{
  color: {accent_color};
}}
.article-placeholder {{
  color: alpha({text_color}, 0.35);
}}
button.primary-button {{
  background: {accent_color};
  color: {accent_text_color};
  border-radius: {control_radius}px;
}}
button.danger-button {{
  color: {danger_color};
}}
.form-error {{
  color: {danger_color};
}}
.empty-state {{
  color: alpha({text_color}, 0.55);
}}
.toast-badge {{
  background: alpha({text_color}, 0.85);
  color: {card_background};
  border-radius: {control_radius}px;
  padding: {spacing_4}px {spacing_12}px;
}}
",
        page_background = PAGE_BACKGROUND,
        text_color = TEXT_COLOR,
        accent_color = ACCENT_COLOR,
        accent_text_color = ACCENT_TEXT_COLOR,
        card_background = CARD_BACKGROUND,
        border_color = BORDER_COLOR,
        danger_color = DANGER_COLOR,
        splash_title_size = tokens.splash_title_size,
        splash_button_size = tokens.splash_button_size,
        control_radius = tokens.control_radius,
        card_radius = tokens.card_radius,
        border_width = tokens.border_width,
        spacing_4 = tokens.spacing_4,
        spacing_8 = tokens.spacing_8,
        spacing_12 = tokens.spacing_12,
    );

    let provider = CssProvider::new();
    provider.load_from_data(&css);
    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
