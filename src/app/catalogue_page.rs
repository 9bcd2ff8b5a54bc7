use gtk4::prelude::*;
use gtk4::{
    Align, Box as GtkBox, Button, FlowBox, Label, Orientation, Overlay, PolicyType,
    ScrolledWindow, SearchEntry, SelectionMode,
};

use super::toast::ToastRuntime;
use crate::shell::{CardView, CatalogueView};
use crate::ui::{icon_button, photo_widget, StyleTokens};

#[derive(Clone)]
pub(super) struct CataloguePage {
    pub(super) root: Overlay,
    pub(super) search_entry: SearchEntry,
    pub(super) add_button: Button,
    pub(super) toast: ToastRuntime,
    grid: FlowBox,
    empty_label: Label,
    style_tokens: StyleTokens,
}

impl CataloguePage {
    /// Rebuilds the grid; `on_card` receives the id of a clicked card.
    pub(super) fn render<F>(&self, view: &CatalogueView, on_card: F)
    where
        F: Fn(&str) + Clone + 'static,
    {
        while let Some(child) = self.grid.first_child() {
            self.grid.remove(&child);
        }

        for card in &view.cards {
            let button = build_card(card, self.style_tokens);
            let card_id = card.id.clone();
            let on_card = on_card.clone();
            button.connect_clicked(move |_| on_card(&card_id));
            self.grid.insert(&button, -1);
        }

        self.empty_label.set_text(view.empty_message());
        self.empty_label.set_visible(view.is_empty());
        self.grid.set_visible(!view.is_empty());
        tracing::debug!(cards = view.cards.len(), query = %view.query, "rendered catalogue");
    }
}

pub(super) fn build_catalogue_page(style_tokens: StyleTokens) -> CataloguePage {
    let content = GtkBox::new(Orientation::Vertical, style_tokens.spacing_8);

    // ── Header: search + add ──
    let search_entry = SearchEntry::new();
    search_entry.set_property("placeholder-text", "Rechercher un article");
    search_entry.set_hexpand(true);

    let add_button = icon_button(
        "list-add-symbolic",
        "Ajouter un article",
        i32::from(style_tokens.control_size),
        &["primary-button"],
    );

    let header = GtkBox::new(Orientation::Horizontal, style_tokens.spacing_8);
    header.add_css_class("catalogue-header");
    header.append(&search_entry);
    header.append(&add_button);

    // ── Two-column card grid ──
    let grid = FlowBox::new();
    grid.set_selection_mode(SelectionMode::None);
    grid.set_homogeneous(true);
    grid.set_min_children_per_line(style_tokens.grid_columns);
    grid.set_max_children_per_line(style_tokens.grid_columns);
    grid.set_row_spacing(style_tokens.spacing_12 as u32);
    grid.set_column_spacing(style_tokens.spacing_12 as u32);
    grid.set_valign(Align::Start);
    grid.set_margin_start(style_tokens.spacing_12);
    grid.set_margin_end(style_tokens.spacing_12);
    grid.set_margin_bottom(style_tokens.spacing_12);

    let empty_label = Label::new(None);
    empty_label.add_css_class("empty-state");
    empty_label.set_vexpand(true);
    empty_label.set_valign(Align::Center);

    let grid_box = GtkBox::new(Orientation::Vertical, 0);
    grid_box.append(&grid);
    grid_box.append(&empty_label);

    let scroller = ScrolledWindow::new();
    scroller.set_policy(PolicyType::Never, PolicyType::Automatic);
    scroller.set_vexpand(true);
    scroller.set_child(Some(&grid_box));

    content.append(&header);
    content.append(&scroller);

    let toast_label = Label::new(Some(""));
    toast_label.add_css_class("toast-badge");
    toast_label.set_halign(Align::Center);
    toast_label.set_valign(Align::End);
    toast_label.set_margin_bottom(style_tokens.spacing_24);
    toast_label.set_wrap(true);
    toast_label.set_visible(false);

    let root = Overlay::new();
    root.set_child(Some(&content));
    root.add_overlay(&toast_label);

    CataloguePage {
        root,
        search_entry,
        add_button,
        toast: ToastRuntime::new(&toast_label),
        grid,
        empty_label,
        style_tokens,
    }
}

fn build_card(card: &CardView, style_tokens: StyleTokens) -> Button {
    let title = Label::new(Some(card.title.as_str()));
    title.add_css_class("article-title");
    title.set_wrap(true);
    title.set_justify(gtk4::Justification::Center);

    let price = Label::new(Some(card.price_label.as_str()));
    price.add_css_class("article-price");

    let body = GtkBox::new(Orientation::Vertical, style_tokens.spacing_4);
    body.append(&photo_widget(&card.image, style_tokens.card_image_size));
    body.append(&title);
    body.append(&price);

    let button = Button::new();
    button.add_css_class("article-card");
    button.set_child(Some(&body));
    button.set_tooltip_text(Some("Modifier"));
    button
}
