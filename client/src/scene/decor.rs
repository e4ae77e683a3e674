use super::*;

const BARK: Color = Color::srgb(0.545, 0.353, 0.169);
const LEAVES: Color = Color::srgb(0.133, 0.545, 0.133);
const CRATE: Color = Color::srgb(0.824, 0.706, 0.549);
const ROCK: Color = Color::srgb(0.533, 0.533, 0.533);

markers!(Decor);

pub(super) fn spawn(
    config: Res<Config>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let scene = &config.scene;
    let spread = scene.decor_spread;
    let mut rng = rand::rng();
    let mut matte = |color: Color| {
        materials.add(StandardMaterial {
            base_color: color,
            perceptual_roughness: 0.95,
            ..default()
        })
    };

    let trunk = meshes.add(ConicalFrustum {
        radius_top: 0.2,
        radius_bottom: 0.3,
        height: 2.0,
    });
    let crown = meshes.add(Sphere::new(1.0));
    let crate_box = meshes.add(Cuboid::new(1.0, 1.0, 1.0));
    // few segments for a faceted look
    let rock = meshes.add(Sphere::new(0.7).mesh().uv(5, 4));
    let (bark, leaves, wood, stone) = (matte(BARK), matte(LEAVES), matte(CRATE), matte(ROCK));

    let mut decor = |name: &'static str, mesh: &Handle<Mesh>, material: &Handle<StandardMaterial>, at: Vec3| {
        commands.spawn((
            Decor,
            Name::new(name),
            DespawnOnExit(Screen::Gameplay),
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(at),
        ));
    };

    for _ in 0..scene.trees {
        let base = scatter(&mut rng, spread, 1.0);
        decor("Tree trunk", &trunk, &bark, base);
        decor("Tree crown", &crown, &leaves, base.with_y(2.2));
    }
    for _ in 0..scene.crates {
        decor("Crate", &crate_box, &wood, scatter(&mut rng, spread, 0.5));
    }
    for _ in 0..scene.rocks {
        decor("Rock", &rock, &stone, scatter(&mut rng, spread, 0.4));
    }
}
