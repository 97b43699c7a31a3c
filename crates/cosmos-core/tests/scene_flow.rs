// End-to-end runs of `Scene` the way a host drives it.

use cosmos_core::{FieldEvent, Phase, Preset, Scene, SceneEvent, Viewport};
use glam::{Vec2, Vec3};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::Duration;

const FRAME: Duration = Duration::from_micros(16_667);

fn viewport() -> Viewport {
    Viewport::new(1280.0, 720.0, 2.0).unwrap()
}

fn scene(preset: Preset, seed: u64) -> Scene {
    Scene::new(preset.config(), viewport(), StdRng::seed_from_u64(seed)).unwrap()
}

fn load_all(scene: &mut Scene, seed: u64, events: &mut Vec<SceneEvent>) {
    let mut order: Vec<usize> = (0..scene.total_images()).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));
    for i in order {
        scene.on_image_loaded(i, 6000, 4000, events);
    }
}

fn run_until_settled(scene: &mut Scene, events: &mut Vec<SceneEvent>) {
    for _ in 0..3000 {
        scene.tick(FRAME, events);
        if scene.animation_complete() {
            return;
        }
    }
    panic!("scene never settled");
}

/// Screen position of a sprite's center in NDC.
fn ndc_of(scene: &Scene, sprite: usize) -> Vec2 {
    let p = scene.sprites()[sprite].position();
    let clip = scene.camera().view_projection() * p.extend(1.0);
    Vec2::new(clip.x / clip.w, clip.y / clip.w)
}

fn on_screen(scene: &Scene) -> Option<usize> {
    (0..scene.sprites().len()).find(|&i| {
        let n = ndc_of(scene, i);
        n.x.abs() < 0.9 && n.y.abs() < 0.9
    })
}

#[test]
fn thirty_five_images_load_release_and_settle() {
    let mut s = scene(Preset::Cinematic, 5);
    let mut events = Vec::new();
    let mut order: Vec<usize> = (0..35).collect();
    order.shuffle(&mut StdRng::seed_from_u64(77));

    for (n, i) in order.iter().enumerate() {
        s.on_image_loaded(*i, 6000, 4000, &mut events);
        s.tick(FRAME, &mut events);
        if n < 34 {
            assert!(s.sprites().iter().all(|sp| sp.phase() == Phase::Waiting));
            assert!(s.sprites().iter().all(|sp| sp.position() == Vec3::ZERO));
        }
    }
    assert_eq!(s.loaded(), 35);
    assert_eq!(s.progress_percent(), 100);

    // the tick right after the last load released everything
    let loading = events
        .iter()
        .position(|e| *e == SceneEvent::Field(FieldEvent::LoadingComplete))
        .unwrap();
    let released = events
        .iter()
        .position(|e| *e == SceneEvent::Field(FieldEvent::BurstReleased))
        .unwrap();
    assert!(released > loading);
    assert!(s.sprites().iter().all(|sp| sp.phase() == Phase::Burst));

    let mut seen: Vec<usize> = s.sprites().iter().map(|sp| sp.image_index).collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..35).collect::<Vec<_>>());

    run_until_settled(&mut s, &mut events);
    assert!(s.sprites().iter().all(|sp| sp.phase() == Phase::Drift));
    let done = events
        .iter()
        .filter(|e| **e == SceneEvent::Field(FieldEvent::AnimationComplete))
        .count();
    assert_eq!(done, 1);
}

#[test]
fn failed_image_keeps_progress_below_complete() {
    let mut s = scene(Preset::Cinematic, 2);
    let mut events = Vec::new();
    for i in 0..34 {
        s.on_image_loaded(i, 400, 300, &mut events);
    }
    s.on_image_failed(34);
    for _ in 0..120 {
        s.tick(FRAME, &mut events);
    }
    assert!(!s.loading_complete());
    assert_eq!(s.progress_percent(), 97);
    assert!(s.sprites().iter().all(|sp| sp.phase() == Phase::Waiting));
}

#[test]
fn resize_twice_matches_resize_once() {
    let mut a = scene(Preset::Gallery, 3);
    let mut b = scene(Preset::Gallery, 3);
    let vp = Viewport::new(390.0, 844.0, 3.0).unwrap();
    a.resize(vp);
    b.resize(vp);
    b.resize(vp);
    assert_eq!(a.camera(), b.camera());
    assert_eq!(a.viewport(), b.viewport());
    assert!((a.camera().aspect - 390.0 / 844.0).abs() < 1e-6);
    assert_eq!(vp.physical_size(), (1170, 2532));
}

#[test]
fn click_pulse_opens_exactly_one_image() {
    let mut s = scene(Preset::Cinematic, 11);
    let mut events = Vec::new();
    load_all(&mut s, 11, &mut events);
    run_until_settled(&mut s, &mut events);

    let target = on_screen(&s).expect("a sprite in view");
    s.on_pointer_move(ndc_of(&s, target));
    let clicked = s.on_click().expect("pointer is over a sprite");
    let image_index = s.sprites()[clicked].image_index;

    events.clear();
    let mut peak: f32 = 0.0;
    for _ in 0..40 {
        s.tick(FRAME, &mut events);
        let sp = &s.sprites()[clicked];
        peak = peak.max(sp.transform.scale / sp.base_scale);
    }
    let opened: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            SceneEvent::OpenImage { image_index } => Some(*image_index),
            _ => None,
        })
        .collect();
    assert_eq!(opened, vec![image_index]);
    assert!(peak > 1.15, "pulse peak {peak}");
}

#[test]
fn pointer_moves_the_cinematic_camera() {
    let mut s = scene(Preset::Cinematic, 1);
    let mut events = Vec::new();
    let start = s.camera().eye;
    s.on_pointer_move(Vec2::new(0.8, 0.6));
    for _ in 0..30 {
        s.tick(FRAME, &mut events);
    }
    assert!(s.camera().eye.x > start.x);
    assert!(s.camera().eye.y > start.y);
    assert_eq!(s.camera().target, Vec3::ZERO);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn at_most_one_sprite_is_highlighted(
        seed in any::<u64>(),
        path in prop::collection::vec((-1.0f32..1.0, -1.0f32..1.0), 1..60),
    ) {
        let mut s = scene(Preset::Gallery, seed);
        let mut events = Vec::new();
        load_all(&mut s, seed, &mut events);
        for _ in 0..120 {
            s.tick(FRAME, &mut events);
        }
        for (x, y) in path {
            s.on_pointer_move(Vec2::new(x, y));
            s.tick(FRAME, &mut events);
            let lit: Vec<usize> = s
                .sprites()
                .iter()
                .enumerate()
                .filter(|(_, sp)| sp.material != sp.base_material)
                .map(|(i, _)| i)
                .collect();
            prop_assert!(lit.len() <= 1, "lit sprites {:?}", lit);
            prop_assert_eq!(lit.first().copied(), s.hovered());
        }
    }
}
