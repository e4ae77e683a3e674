use super::*;
use colors::{NEUTRAL300, NEUTRAL700, NEUTRAL920};
use size::{HEALTH_BAR_HEIGHT, HEALTH_BAR_WIDTH, HUD_MARGIN};

// ── Components ──────────────────────────────────────────────────────

#[derive(Component)]
struct HudScore;

#[derive(Component)]
struct HudHealthFill;

#[derive(Component)]
struct HudHealthText;

#[derive(Component)]
struct HudAmmo;

// ── Plugin ──────────────────────────────────────────────────────────

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Gameplay), spawn_hud).add_systems(
        Update,
        (tick_score, tick_health, tick_ammo)
            .in_set(AppSystems::ChangeUi)
            .run_if(resource_exists::<GameSession>),
    );
}

// ── Spawn ───────────────────────────────────────────────────────────

fn scoped() -> impl Bundle {
    (DespawnOnExit(Screen::Gameplay), GlobalZIndex(90), Pickable::IGNORE)
}

fn spawn_hud(mut commands: Commands) {
    // Score
    commands.spawn((
        Name::new("Score"),
        scoped(),
        Node {
            position_type: PositionType::Absolute,
            left: Px(HUD_MARGIN),
            top: Px(HUD_MARGIN),
            ..default()
        },
        children![(
            HudScore,
            text_bundle("Score: 0", size::SCORE_FONT_SIZE, Color::WHITE)
        )],
    ));

    // Crosshair
    commands.spawn((
        ui_root("Crosshair"),
        DespawnOnExit(Screen::Gameplay),
        GlobalZIndex(80),
        children![(
            Node {
                width: Px(size::CROSSHAIR),
                height: Px(size::CROSSHAIR),
                ..default()
            },
            BorderRadius::MAX,
            BackgroundColor(Color::WHITE.with_alpha(0.8)),
        )],
    ));

    // Ammo
    commands.spawn((
        Name::new("Ammo"),
        scoped(),
        Node {
            position_type: PositionType::Absolute,
            right: Px(HUD_MARGIN),
            bottom: Px(HUD_MARGIN),
            ..default()
        },
        children![(
            HudAmmo,
            text_bundle("No rifle", size::SCORE_FONT_SIZE, Color::WHITE)
        )],
    ));

    // Health
    commands
        .spawn((
            Name::new("Health"),
            scoped(),
            Node {
                position_type: PositionType::Absolute,
                left: Px(HUD_MARGIN),
                bottom: Px(HUD_MARGIN),
                flex_direction: FlexDirection::Column,
                ..default()
            },
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        width: Px(HEALTH_BAR_WIDTH),
                        height: Px(HEALTH_BAR_HEIGHT),
                        border: UiRect::all(Px(1.0)),
                        ..default()
                    },
                    BackgroundColor(NEUTRAL920.with_alpha(0.8)),
                    BorderColor::all(NEUTRAL700.with_alpha(0.5)),
                ))
                .with_children(|bar| {
                    bar.spawn((
                        HudHealthFill,
                        Node {
                            width: Percent(100.0),
                            height: Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(colors::health(HealthBand::Green)),
                    ));
                });

            parent
                .spawn(Node {
                    width: Px(HEALTH_BAR_WIDTH),
                    flex_direction: FlexDirection::Row,
                    justify_content: JustifyContent::SpaceBetween,
                    margin: UiRect::top(Px(4.0)),
                    padding: UiRect::horizontal(Px(2.0)),
                    ..default()
                })
                .with_children(|row| {
                    row.spawn(text_bundle("HP", 14.0, NEUTRAL300));
                    row.spawn((HudHealthText, text_bundle("100 / 100", 14.0, Color::WHITE)));
                });
        });
}

// ── Tick systems ────────────────────────────────────────────────────

fn tick_score(session: Res<GameSession>, mut text: Single<&mut Text, With<HudScore>>) {
    let score = format!("Score: {}", session.score());
    if text.0 != score {
        text.0 = score;
    }
}

fn tick_health(
    session: Res<GameSession>,
    mut fills: Query<(&mut Node, &mut BackgroundColor), With<HudHealthFill>>,
    mut texts: Query<&mut Text, With<HudHealthText>>,
) {
    let health = session.health();

    if let Ok((mut fill, mut color)) = fills.single_mut() {
        fill.width = Percent(health.fraction() * 100.0);
        color.0 = colors::health(health.band());
    }
    if let Ok(mut text) = texts.single_mut() {
        text.0 = format!("{:.0} / {:.0}", health.current, health.max);
    }
}

fn tick_ammo(session: Res<GameSession>, mut text: Single<&mut Text, With<HudAmmo>>) {
    let rifle = session.rifle();
    let magazine = session.tuning().rifle.magazine;
    let ammo = match (rifle.equipped, rifle.reload_progress(&session.tuning().rifle)) {
        (false, _) => "No rifle".to_string(),
        (true, Some(progress)) => format!("Reloading {:.0}%", progress * 100.0),
        (true, None) => format!("Ammo: {}/{magazine}", rifle.ammo),
    };
    if text.0 != ammo {
        text.0 = ammo;
    }
}
