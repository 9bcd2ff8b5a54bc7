/// Compile-time layout tokens; not read from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleTokens {
    pub spacing_4: i32,
    pub spacing_8: i32,
    pub spacing_12: i32,
    pub spacing_16: i32,
    pub spacing_20: i32,
    pub spacing_24: i32,
    pub splash_padding: i32,
    pub card_radius: u16,
    pub control_radius: u16,
    pub control_size: u16,
    pub border_width: u16,
    pub grid_columns: u32,
    pub card_image_size: i32,
    pub form_photo_size: i32,
    pub camera_preview_width: i32,
    pub camera_preview_height: i32,
    pub window_default_width: i32,
    pub window_default_height: i32,
    pub form_width: i32,
    pub splash_title_size: u16,
    pub splash_button_size: u16,
    pub splash_delay_ms: u32,
    pub camera_poll_ms: u32,
    pub toast_duration_ms: u32,
}

pub const LAYOUT_TOKENS: StyleTokens = StyleTokens {
    spacing_4: 4,
    spacing_8: 8,
    spacing_12: 12,
    spacing_16: 16,
    spacing_20: 20,
    spacing_24: 24,
    splash_padding: 30,
    card_radius: 14,
    control_radius: 12,
    control_size: 40,
    border_width: 1,
    grid_columns: 2,
    card_image_size: 140,
    form_photo_size: 180,
    camera_preview_width: 480,
    camera_preview_height: 360,
    window_default_width: 420,
    window_default_height: 720,
    form_width: 360,
    splash_title_size: 32,
    splash_button_size: 20,
    splash_delay_ms: 600,
    camera_poll_ms: 200,
    toast_duration_ms: 2_500,
};

#[cfg(test)]
mod tests {
    use super::LAYOUT_TOKENS;

    #[test]
    fn layout_tokens_keep_two_column_grid() {
        assert_eq!(LAYOUT_TOKENS.grid_columns, 2);
    }

    #[test]
    fn layout_tokens_match_splash_screen_metrics() {
        let tokens = LAYOUT_TOKENS;
        assert_eq!(tokens.splash_padding, 30);
        assert_eq!(tokens.spacing_20, 20);
        assert_eq!(tokens.splash_title_size, 32);
        assert_eq!(tokens.splash_button_size, 20);
    }

    #[test]
    fn camera_preview_keeps_four_by_three_ratio() {
        let tokens = LAYOUT_TOKENS;
        assert_eq!(
            tokens.camera_preview_width * 3,
            tokens.camera_preview_height * 4
        );
    }
}
