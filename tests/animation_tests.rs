//! Animation System Tests
//!
//! Tests for:
//! - Track sampling at and between keyframes
//! - Clip loading against a shared bone registry
//! - Animator time wrapping
//! - End-to-end skinning matrices for small hierarchies
//! - Sharing one loaded clip between threads

use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};
use marrow::prelude::*;

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-4;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

fn mat4_approx(a: &Mat4, b: &Mat4) -> bool {
    a.abs_diff_eq(*b, EPSILON)
}

fn static_track(name: &str, translation: Vec3) -> JointTrack {
    JointTrack::new(
        name,
        vec![Keyframe::new(0.0, translation)],
        vec![Keyframe::new(0.0, Quat::IDENTITY)],
        vec![Keyframe::new(0.0, Vec3::ONE)],
    )
    .unwrap()
}

/// Root with no track and one child sliding from x=0 to x=1 over one tick.
struct SlidingChild {
    clip: Arc<AnimationAsset>,
    child_offset: Mat4,
    root_offset: Mat4,
}

fn sliding_child() -> SlidingChild {
    let root_offset = Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0));
    let child_offset = Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0));

    let mut registry = BoneRegistry::new();
    registry.register("root", root_offset);
    registry.register("child", child_offset);

    let mut builder = HierarchyBuilder::new();
    let root = builder.root("root", Vqs::IDENTITY);
    builder.child(root, "child", Vqs::IDENTITY);

    let track = JointTrack::new(
        "child",
        vec![
            Keyframe::new(0.0, Vec3::ZERO),
            Keyframe::new(1.0, Vec3::new(1.0, 0.0, 0.0)),
        ],
        vec![Keyframe::new(0.0, Quat::IDENTITY)],
        vec![Keyframe::new(0.0, Vec3::ONE)],
    )
    .unwrap();

    let clip = AnimationAsset::load(
        ClipDesc {
            name: "slide".to_string(),
            duration: 1.0,
            ticks_per_second: 1.0,
            tracks: vec![track],
        },
        builder.build().unwrap(),
        &mut registry,
    )
    .unwrap();

    SlidingChild {
        clip: Arc::new(clip),
        child_offset,
        root_offset,
    }
}

// ============================================================================
// Track sampling
// ============================================================================

#[test]
fn single_keyframe_track_is_constant() {
    let value = Vec3::new(3.0, -1.0, 0.5);
    let track = static_track("hips", value);

    for time in [-10.0, 0.0, 0.3, 1.0, 1000.0] {
        let pose = track.local_transform_at(time);
        assert_eq!(pose.translation, value, "time {time}");
        assert_eq!(pose.rotation, Quat::IDENTITY);
        assert_eq!(pose.scale, Vec3::ONE);
    }
}

#[test]
fn two_keyframe_track_is_exact_at_start_and_between_before_end() {
    let start = Vec3::new(0.0, 2.0, 0.0);
    let end = Vec3::new(4.0, 2.0, -8.0);
    let track = JointTrack::new(
        "arm",
        vec![Keyframe::new(1.0, start), Keyframe::new(3.0, end)],
        vec![Keyframe::new(0.0, Quat::IDENTITY)],
        vec![Keyframe::new(0.0, Vec3::ONE)],
    )
    .unwrap();

    assert_eq!(track.local_transform_at(1.0).translation, start);

    let near_end = track.local_transform_at(3.0 - 1e-3).translation;
    assert!(near_end.x > start.x && near_end.x < end.x);
    assert!(near_end.z < start.z && near_end.z > end.z);
    assert!(vec3_approx(
        track.local_transform_at(2.0).translation,
        (start + end) * 0.5
    ));
}

#[test]
fn rotation_channel_slerps_between_keys() {
    let track = JointTrack::new(
        "neck",
        vec![Keyframe::new(0.0, Vec3::ZERO)],
        vec![
            Keyframe::new(0.0, Quat::IDENTITY),
            Keyframe::new(4.0, Quat::from_rotation_y(1.0)),
        ],
        vec![Keyframe::new(0.0, Vec3::ONE)],
    )
    .unwrap();

    let rotation = track.local_transform_at(1.0).rotation;
    assert!((rotation.length() - 1.0).abs() < EPSILON);
    assert!((rotation.dot(Quat::from_rotation_y(0.25)).abs() - 1.0).abs() < EPSILON);
}

#[test]
fn invalid_keyframes_are_rejected_with_joint_name() {
    let err = JointTrack::new(
        "spine",
        vec![
            Keyframe::new(0.0, Vec3::ZERO),
            Keyframe::new(0.0, Vec3::ONE),
        ],
        vec![Keyframe::new(0.0, Quat::IDENTITY)],
        vec![Keyframe::new(0.0, Vec3::ONE)],
    )
    .unwrap_err();

    assert!(matches!(err, AnimationError::InvalidChannel { ref joint, .. } if joint == "spine"));
    assert!(err.to_string().contains("spine"));
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn skin_bones_keep_their_indices() {
    init_logger();

    let mut registry = BoneRegistry::new();
    registry.register("root", Mat4::IDENTITY);

    let mut builder = HierarchyBuilder::new();
    let root = builder.root("root", Vqs::IDENTITY);
    builder.child(root, "tail", Vqs::IDENTITY);

    let clip = AnimationAsset::load(
        ClipDesc {
            name: "wag".to_string(),
            duration: 10.0,
            ticks_per_second: 30.0,
            tracks: vec![static_track("tail", Vec3::ZERO)],
        },
        builder.build().unwrap(),
        &mut registry,
    )
    .unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(clip.bone_info_for("root").unwrap().bone_index, 0);
    assert_eq!(clip.bone_info_for("tail").unwrap().bone_index, 1);
    assert_eq!(clip.track_for("tail").unwrap().bone_index(), Some(1));
    assert_eq!(clip.bone_count(), 2);
}

#[test]
fn clips_sharing_a_registry_agree_on_indices() {
    let mut registry = BoneRegistry::new();

    let hierarchy = || {
        let mut builder = HierarchyBuilder::new();
        let root = builder.root("root", Vqs::IDENTITY);
        builder.child(root, "a", Vqs::IDENTITY);
        builder.child(root, "b", Vqs::IDENTITY);
        builder.build().unwrap()
    };

    let first = AnimationAsset::load(
        ClipDesc {
            name: "first".to_string(),
            duration: 1.0,
            ticks_per_second: 1.0,
            tracks: vec![static_track("b", Vec3::ZERO)],
        },
        hierarchy(),
        &mut registry,
    )
    .unwrap();
    let second = AnimationAsset::load(
        ClipDesc {
            name: "second".to_string(),
            duration: 1.0,
            ticks_per_second: 1.0,
            tracks: vec![static_track("a", Vec3::ZERO), static_track("b", Vec3::ZERO)],
        },
        hierarchy(),
        &mut registry,
    )
    .unwrap();

    let b_first = first.bone_info_for("b").unwrap().bone_index;
    let b_second = second.bone_info_for("b").unwrap().bone_index;
    assert_eq!(b_first, b_second);
    assert_eq!(second.bone_info_for("a").unwrap().bone_index, 1);

    // The first clip's snapshot predates "a".
    assert!(first.bone_info_for("a").is_none());
}

#[test]
fn hierarchy_from_matrices_keeps_bind_pose() {
    let joints = [
        JointDesc::from_matrix("pelvis", &Mat4::from_translation(Vec3::Y), None),
        JointDesc::from_matrix(
            "thigh",
            &Mat4::from_rotation_translation(Quat::from_rotation_x(0.5), Vec3::new(0.2, 0.0, 0.0)),
            Some(0),
        ),
    ];
    let hierarchy = JointHierarchy::from_links(&joints).unwrap();

    let thigh = hierarchy.find("thigh").unwrap();
    let local = hierarchy.node(thigh).unwrap().static_local_transform();
    assert!(vec3_approx(local.translation, Vec3::new(0.2, 0.0, 0.0)));
    assert!((local.rotation.dot(Quat::from_rotation_x(0.5)).abs() - 1.0).abs() < EPSILON);
    assert_eq!(hierarchy.root().name(), "pelvis");
}

// ============================================================================
// Animator playback
// ============================================================================

#[test]
fn animator_time_stays_within_duration() {
    init_logger();
    let fixture = sliding_child();
    let mut animator = Animator::with_clip(AnimatorSettings::default(), fixture.clip.clone());
    let duration = fixture.clip.duration();

    for step in [0.1, 0.37, 0.9, 1.0, 2.5, 0.016, 7.25, -0.3] {
        animator.advance(step);
        let time = animator.current_time();
        assert!(
            (0.0..duration).contains(&time),
            "time {time} escaped [0, {duration}) after step {step}"
        );
    }
}

#[test]
fn advancing_by_exact_duration_wraps_to_zero() {
    let fixture = sliding_child();
    let mut animator = Animator::with_clip(AnimatorSettings::default(), fixture.clip);
    animator.advance(1.0);
    assert!(animator.current_time().abs() < EPSILON);
}

#[test]
fn end_to_end_child_translation() {
    init_logger();
    let fixture = sliding_child();
    let mut animator = Animator::with_clip(AnimatorSettings::default(), fixture.clip.clone());

    animator.advance(0.5);
    assert!((animator.current_time() - 0.5).abs() < EPSILON);

    let child = fixture.clip.hierarchy().find("child").unwrap();
    let global = animator.global_transform(child).unwrap();
    assert!(vec3_approx(global.translation, Vec3::new(0.5, 0.0, 0.0)));

    let child_bone = fixture.clip.bone_info_for("child").unwrap().bone_index as usize;
    let expected = global.to_matrix() * fixture.child_offset;
    assert!(mat4_approx(&animator.output_matrices()[child_bone], &expected));
    // Offset is applied after the pose, not before.
    assert!(vec3_approx(
        animator.output_matrices()[child_bone].w_axis.truncate(),
        Vec3::new(0.5, -1.0, 0.0)
    ));

    let root_bone = fixture.clip.bone_info_for("root").unwrap().bone_index as usize;
    assert!(mat4_approx(&animator.output_matrices()[root_bone], &fixture.root_offset));

    // Untouched slots stay identity.
    let unused = &animator.output_matrices()[2..];
    assert!(unused.iter().all(|m| *m == Mat4::IDENTITY));
}

#[test]
fn untracked_joint_follows_animated_parent() {
    let forearm_local = Vqs::new(
        Vec3::new(0.0, 2.0, 0.0),
        Quat::from_rotation_z(0.4),
        Vec3::ONE,
    );
    let forearm_offset = Mat4::from_translation(Vec3::new(0.0, -2.0, 0.0));

    let mut registry = BoneRegistry::new();
    registry.register("forearm", forearm_offset);

    let mut builder = HierarchyBuilder::new();
    let root = builder.root("root", Vqs::IDENTITY);
    let upper = builder.child(root, "upper_arm", Vqs::IDENTITY);
    builder.child(upper, "forearm", forearm_local);

    let track = JointTrack::new(
        "upper_arm",
        vec![
            Keyframe::new(0.0, Vec3::ZERO),
            Keyframe::new(2.0, Vec3::new(0.0, 0.0, 4.0)),
        ],
        vec![
            Keyframe::new(0.0, Quat::IDENTITY),
            Keyframe::new(2.0, Quat::from_rotation_x(1.0)),
        ],
        vec![Keyframe::new(0.0, Vec3::splat(2.0))],
    )
    .unwrap();
    let expected_upper = track.local_transform_at(1.0);

    let clip = AnimationAsset::load(
        ClipDesc {
            name: "raise".to_string(),
            duration: 2.0,
            ticks_per_second: 1.0,
            tracks: vec![track],
        },
        builder.build().unwrap(),
        &mut registry,
    )
    .unwrap();
    let clip = Arc::new(clip);

    let mut animator = Animator::with_clip(AnimatorSettings::default(), clip.clone());
    animator.advance(1.0);

    let expected = expected_upper.to_matrix() * forearm_local.to_matrix() * forearm_offset;
    let bone = clip.bone_info_for("forearm").unwrap().bone_index as usize;
    assert!(mat4_approx(&animator.output_matrices()[bone], &expected));
}

#[test]
fn pose_bounds_cover_joint_origins() {
    let fixture = sliding_child();
    let mut animator = Animator::with_clip(AnimatorSettings::default(), fixture.clip);
    animator.advance(0.75);

    let bounds = animator.pose_bounds().unwrap();
    assert!(vec3_approx(bounds.min, Vec3::ZERO));
    assert!(vec3_approx(bounds.max, Vec3::new(0.75, 0.0, 0.0)));
}

// ============================================================================
// Sharing
// ============================================================================

#[test]
fn one_clip_drives_animators_on_many_threads() {
    let fixture = sliding_child();
    let clip = fixture.clip;
    let child_bone = clip.bone_info_for("child").unwrap().bone_index as usize;

    let results: Vec<Mat4> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let clip = Arc::clone(&clip);
                scope.spawn(move || {
                    let mut animator = Animator::with_clip(AnimatorSettings::default(), clip);
                    for _ in 0..10 {
                        animator.advance(0.025);
                    }
                    animator.output_matrices()[child_bone]
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for matrix in &results {
        assert!(mat4_approx(matrix, &results[0]));
    }
    assert!((results[0].w_axis.x - 0.25).abs() < EPSILON);
}

#[test]
fn settings_load_from_json() -> anyhow::Result<()> {
    let settings: AnimatorSettings = serde_json::from_str(r#"{ "max_bones": 4 }"#)?;
    let mut animator = Animator::with_clip(settings, sliding_child().clip);
    animator.advance(0.5);
    assert_eq!(animator.output_matrices().len(), 4);
    Ok(())
}
