use super::*;
use std::borrow::Cow;

/// A root UI node that fills the window and centers its content.
pub fn ui_root(name: impl Into<Cow<'static, str>>) -> impl Bundle {
    (
        Name::new(name),
        Node {
            width: Percent(100.0),
            height: Percent(100.0),
            position_type: PositionType::Absolute,
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            row_gap: Vh(2.0),
            ..default()
        },
        // Don't block picking events for other UI roots.
        Pickable::IGNORE,
    )
}

pub fn label(text: impl Into<String>) -> impl Bundle {
    text_bundle(text, size::FONT_SIZE, colors::NEUTRAL300)
}

/// A big centered line, for banners.
pub fn header(text: impl Into<String>) -> impl Bundle {
    text_bundle(text, size::BANNER_FONT_SIZE, Color::WHITE)
}

pub fn text_bundle(text: impl Into<String>, font_size: f32, color: Color) -> impl Bundle {
    (
        Label,
        Name::new("Label"),
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(color),
        TextLayout::new_with_justify(Justify::Center),
        Pickable::IGNORE,
    )
}
