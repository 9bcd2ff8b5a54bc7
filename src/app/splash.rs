use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gtk4::prelude::*;
use gtk4::{Align, Box as GtkBox, Label, Orientation};

use crate::shell::SplashState;
use crate::ui::{text_button, StyleTokens};

/// Title and "VOIR LES OFFRES" button; `on_open` runs once, shortly after the press.
pub(super) fn build_splash_page<F>(style_tokens: StyleTokens, on_open: F) -> GtkBox
where
    F: Fn() + 'static,
{
    let splash = Rc::new(RefCell::new(SplashState::default()));

    let root = GtkBox::new(Orientation::Vertical, style_tokens.spacing_20);
    root.set_margin_top(style_tokens.splash_padding);
    root.set_margin_bottom(style_tokens.splash_padding);
    root.set_margin_start(style_tokens.splash_padding);
    root.set_margin_end(style_tokens.splash_padding);

    let title_label = Label::new(Some(splash.borrow().title()));
    title_label.add_css_class("splash-title");
    title_label.set_justify(gtk4::Justification::Center);
    title_label.set_halign(Align::Center);
    title_label.set_valign(Align::Center);
    title_label.set_vexpand(true);

    let open_button = text_button(splash.borrow().button_label(), &["splash-button"]);
    open_button.set_hexpand(true);
    open_button.set_size_request(-1, style_tokens.window_default_height / 5);

    root.append(&title_label);
    root.append(&open_button);

    let on_open = Rc::new(on_open);
    let splash_delay = Duration::from_millis(u64::from(style_tokens.splash_delay_ms));
    open_button.connect_clicked(move |button| {
        if !splash.borrow_mut().press() {
            return;
        }
        title_label.set_text(splash.borrow().title());
        button.set_sensitive(false);
        tracing::debug!("splash pressed; opening catalogue");

        let on_open = on_open.clone();
        gtk4::glib::timeout_add_local_once(splash_delay, move || (on_open.as_ref())());
    });

    root
}
