use std::path::Path;

use gtk4::prelude::*;
use gtk4::{Button, Image, Picture, Widget};

use crate::shell::CardImage;

const PLACEHOLDER_ICON_NAME: &str = "image-x-generic-symbolic";

pub fn icon_button(
    icon_name: &str,
    tooltip: &str,
    control_size: i32,
    extra_classes: &[&str],
) -> Button {
    let button = Button::from_icon_name(icon_name);
    button.set_focus_on_click(false);
    button.set_tooltip_text(Some(tooltip));
    button.add_css_class("flat");
    button.add_css_class("icon-button");
    for css_class in extra_classes {
        button.add_css_class(css_class);
    }
    button.set_size_request(control_size, control_size);
    button
}

pub fn text_button(label: &str, extra_classes: &[&str]) -> Button {
    let button = Button::with_label(label);
    button.set_focus_on_click(false);
    for css_class in extra_classes {
        button.add_css_class(css_class);
    }
    button
}

/// Thumbnail for a card or form: the photo when present, a placeholder icon otherwise.
pub fn photo_widget(image: &CardImage, size: i32) -> Widget {
    match image {
        CardImage::Photo(path) => photo_picture(path, size).upcast(),
        CardImage::Placeholder => placeholder_image(size).upcast(),
    }
}

fn photo_picture(path: &Path, size: i32) -> Picture {
    let picture = Picture::for_filename(path);
    picture.set_can_shrink(true);
    picture.set_size_request(size, size);
    picture.add_css_class("article-photo");
    picture
}

fn placeholder_image(size: i32) -> Image {
    let image = Image::from_icon_name(PLACEHOLDER_ICON_NAME);
    image.set_pixel_size(size / 2);
    image.set_size_request(size, size);
    image.add_css_class("article-placeholder");
    image
}
