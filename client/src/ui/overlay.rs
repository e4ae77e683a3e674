//! Centered messages: transient notices, the mouse-capture hint, the pause
//! banner and the game-over panel.
use super::*;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Gameplay), spawn_overlay)
        .add_systems(
            Update,
            (tick_notice, tick_hint, tick_banner)
                .in_set(AppSystems::ChangeUi)
                .run_if(resource_exists::<GameSession>),
        );
}

#[derive(Component)]
struct NoticeText;

#[derive(Component)]
struct CaptureHint;

#[derive(Component)]
struct Banner;

#[derive(Component)]
struct BannerTitle;

#[derive(Component)]
struct BannerDetail;

fn spawn_overlay(mut commands: Commands) {
    commands.spawn((
        Name::new("Notice"),
        DespawnOnExit(Screen::Gameplay),
        GlobalZIndex(95),
        Pickable::IGNORE,
        Node {
            position_type: PositionType::Absolute,
            width: Percent(100.0),
            top: Vh(20.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
        children![(NoticeText, text_bundle("", 24.0, Color::WHITE))],
    ));

    commands.spawn((
        Name::new("Capture hint"),
        DespawnOnExit(Screen::Gameplay),
        GlobalZIndex(95),
        Pickable::IGNORE,
        Node {
            position_type: PositionType::Absolute,
            width: Percent(100.0),
            bottom: Vh(25.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
        children![(CaptureHint, label("Click to play"))],
    ));

    commands.spawn((
        ui_root("Banner"),
        Banner,
        DespawnOnExit(Screen::Gameplay),
        GlobalZIndex(100),
        BackgroundColor(colors::NEUTRAL950.with_alpha(0.6)),
        Visibility::Hidden,
        children![
            (BannerTitle, header("")),
            (BannerDetail, label("")),
        ],
    ));
}

fn tick_notice(session: Res<GameSession>, mut text: Single<&mut Text, With<NoticeText>>) {
    let notice = session.notices().latest().unwrap_or_default();
    if text.0 != notice {
        text.0 = notice.to_string();
    }
}

fn tick_hint(
    session: Res<GameSession>,
    input: Res<PlayerInput>,
    mut hint: Single<&mut Visibility, With<CaptureHint>>,
) {
    let show = !input.pointer_locked() && session.phase() == Phase::Playing;
    hint.set_if_neq(if show {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    });
}

fn tick_banner(
    session: Res<GameSession>,
    mut banner: Single<&mut Visibility, With<Banner>>,
    mut title: Single<&mut Text, (With<BannerTitle>, Without<BannerDetail>)>,
    mut detail: Single<&mut Text, (With<BannerDetail>, Without<BannerTitle>)>,
) {
    let (visible, heading, body) = match session.phase() {
        Phase::Playing => (false, String::new(), String::new()),
        Phase::Paused => (true, "Paused".to_string(), "Press P to resume".to_string()),
        Phase::GameOver => (
            true,
            "Game Over".to_string(),
            format!("Final score: {}", session.score()),
        ),
    };

    banner.set_if_neq(if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    });
    if title.0 != heading {
        title.0 = heading;
    }
    if detail.0 != body {
        detail.0 = body;
    }
}
