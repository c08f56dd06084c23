use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    pub card_background: Color32,
    pub overlay_background: Color32,
    pub title_size: f32,
    pub subtitle_size: f32,
    pub body_size: f32,
    pub card_size: f32,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::from_rgb(0xFC, 0xFC, 0xF9),
            foreground: Color32::from_rgb(0x13, 0x34, 0x3B),
            heading_color: Color32::from_rgb(0x21, 0x80, 0x8D),
            accent: Color32::from_rgb(0x21, 0x80, 0x8D),
            card_background: Color32::WHITE,
            overlay_background: Color32::from_rgba_unmultiplied(0xFF, 0xFF, 0xFF, 0xFA),
            title_size: 64.0,
            subtitle_size: 36.0,
            body_size: 28.0,
            card_size: 24.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x1F, 0x21, 0x21),
            foreground: Color32::from_rgb(0xF5, 0xF5, 0xF5),
            heading_color: Color32::from_rgb(0x32, 0xB8, 0xC6),
            accent: Color32::from_rgb(0x32, 0xB8, 0xC6),
            card_background: Color32::from_rgb(0x26, 0x28, 0x28),
            overlay_background: Color32::from_rgba_unmultiplied(0x26, 0x28, 0x28, 0xFA),
            title_size: 64.0,
            subtitle_size: 36.0,
            body_size: 28.0,
            card_size: 24.0,
        }
    }

    pub fn all_names() -> &'static [&'static str] {
        &["light", "dark"]
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        let alpha = (opacity.clamp(0.0, 1.0) * color.a() as f32) as u8;
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
    }
}
