//! Floating bar above a wounded enemy, coloured by health band.
use super::*;
use rifleman_shared::health::HealthBand;

const BAR_SIZE: Vec3 = Vec3::new(2.0, 0.2, 0.02);
const BAR_HEIGHT: f32 = 4.0;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Gameplay), setup_bar_mesh)
        .add_observer(attach_bar)
        .add_systems(
            Update,
            update_bars
                .in_set(AppSystems::Mirror)
                .after(sync_enemies)
                .run_if(resource_exists::<GameSession>),
        );
}

markers!(HealthBarFill);

#[derive(Resource)]
struct BarMesh(Handle<Mesh>);

fn setup_bar_mesh(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    commands.insert_resource(BarMesh(meshes.add(Cuboid::from_size(BAR_SIZE))));
}

fn band_color(band: HealthBand) -> Color {
    match band {
        HealthBand::Green => Color::srgb(0.0, 1.0, 0.0),
        HealthBand::Yellow => Color::srgb(1.0, 1.0, 0.0),
        HealthBand::Red => Color::srgb(1.0, 0.0, 0.0),
    }
}

fn attach_bar(
    on: On<Add, EnemyModel>,
    mesh: Res<BarMesh>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut commands: Commands,
) {
    let material = materials.add(StandardMaterial {
        base_color: band_color(HealthBand::Green),
        unlit: true,
        ..default()
    });

    commands.entity(on.entity).with_child((
        Name::new("Health bar"),
        HealthBarFill,
        Mesh3d(mesh.0.clone()),
        MeshMaterial3d(material),
        Transform::from_xyz(0.0, BAR_HEIGHT, 0.0),
        Visibility::Hidden,
    ));
}

fn update_bars(
    session: Res<GameSession>,
    enemies: Query<(&EnemyModel, &Children)>,
    mut bars: Query<
        (
            &mut Transform,
            &mut Visibility,
            &MeshMaterial3d<StandardMaterial>,
        ),
        With<HealthBarFill>,
    >,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (model, children) in &enemies {
        let bar = find(&session, model).and_then(|enemy| enemy.health_bar());

        for child in children.iter() {
            let Ok((mut transform, mut visibility, material)) = bars.get_mut(child) else {
                continue;
            };
            let Some(bar) = bar else {
                *visibility = Visibility::Hidden;
                continue;
            };

            *visibility = Visibility::Inherited;
            // keep a sliver visible so a nearly dead enemy still shows a bar
            transform.scale.x = bar.fraction.max(0.01);
            if let Some(material) = materials.get_mut(&material.0) {
                material.base_color = band_color(bar.band);
            }
        }
    }
}
