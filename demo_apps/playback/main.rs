//! Headless Playback
//!
//! Builds a small procedural arm (root -> shoulder -> elbow -> wrist), animates the
//! shoulder and elbow, and logs the skinning matrices for a few simulated frames.
//!
//! Run: `RUST_LOG=debug cargo run -p playback [settings.json]`
//!
//! The optional argument is an [`AnimatorSettings`] JSON file, e.g.
//! `{ "max_bones": 16 }`.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use anyhow::Context;
use log::info;
use marrow::prelude::*;

// ============================================================================
// Scene
// ============================================================================

const SEGMENT_LENGTH: f32 = 1.5;
const FRAME_DT: f32 = 1.0 / 60.0;
const FRAMES: usize = 90;

fn build_arm(registry: &mut BoneRegistry) -> anyhow::Result<JointHierarchy> {
    let mut builder = HierarchyBuilder::new();
    let root = builder.root("root", Vqs::IDENTITY);
    let shoulder = builder.child(root, "shoulder", Vqs::from_translation(Vec3::Y));
    let segment = Vqs::from_translation(Vec3::new(SEGMENT_LENGTH, 0.0, 0.0));
    let elbow = builder.child(shoulder, "elbow", segment);
    builder.child(elbow, "wrist", segment);

    let hierarchy = builder.build()?;

    // Skin: each bone's inverse bind offset undoes its bind-pose model transform.
    let mut bind_globals = vec![Vqs::IDENTITY; hierarchy.len()];
    for (i, node) in hierarchy.nodes().iter().enumerate() {
        let parent = node
            .parent()
            .map_or(Vqs::IDENTITY, |p| bind_globals[p.index()]);
        bind_globals[i] = parent.compose(node.static_local_transform());
        if node.name() != "root" {
            registry.register(node.name(), bind_globals[i].to_matrix().inverse());
        }
    }

    Ok(hierarchy)
}

fn build_wave() -> anyhow::Result<ClipDesc> {
    let swing = Quat::from_rotation_z;

    let shoulder = JointTrack::new(
        "shoulder",
        vec![Keyframe::new(0.0, Vec3::Y)],
        vec![
            Keyframe::new(0.0, swing(0.0)),
            Keyframe::new(12.0, swing(FRAC_PI_2)),
            Keyframe::new(24.0, swing(0.0)),
        ],
        vec![Keyframe::new(0.0, Vec3::ONE)],
    )?;
    let elbow = JointTrack::new(
        "elbow",
        vec![Keyframe::new(0.0, Vec3::new(SEGMENT_LENGTH, 0.0, 0.0))],
        vec![
            Keyframe::new(0.0, swing(0.0)),
            Keyframe::new(6.0, swing(-0.8)),
            Keyframe::new(18.0, swing(0.8)),
        ],
        vec![Keyframe::new(0.0, Vec3::ONE)],
    )?;

    Ok(ClipDesc {
        name: "wave".to_string(),
        duration: 24.0,
        ticks_per_second: 0.0,
        tracks: vec![shoulder, elbow],
    })
}

fn load_settings() -> anyhow::Result<AnimatorSettings> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(AnimatorSettings::default());
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading settings from {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing settings in {path}"))
}

// ============================================================================
// Main
// ============================================================================

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = load_settings()?;
    let mut registry = BoneRegistry::new();
    let hierarchy = build_arm(&mut registry)?;
    let clip = AnimationAsset::load(build_wave()?, hierarchy, &mut registry)?;
    let clip = Arc::new(clip);

    info!(
        "Loaded '{}': {} joints, {} bones, {:.2}s",
        clip.name(),
        clip.hierarchy().len(),
        clip.bone_count(),
        clip.duration_seconds()
    );

    let mut animator = Animator::with_clip(settings, Arc::clone(&clip));
    let wrist = clip.hierarchy().find("wrist").context("wrist joint")?;

    for frame in 0..FRAMES {
        animator.advance(FRAME_DT);
        if frame % 15 != 0 {
            continue;
        }

        let tip = animator
            .global_transform(wrist)
            .map_or(Vec3::ZERO, |t| t.translation);
        info!(
            "frame {frame:>3}  tick {:>6.2}  wrist at ({:+.3}, {:+.3}, {:+.3})",
            animator.current_time(),
            tip.x,
            tip.y,
            tip.z
        );
        if let Some(bounds) = animator.pose_bounds() {
            log::debug!("  bounds {} .. {}", bounds.min, bounds.max);
        }
        for (name, info) in ["shoulder", "elbow", "wrist"]
            .iter()
            .filter_map(|name| clip.bone_info_for(name).map(|info| (name, info)))
        {
            let m = animator.output_matrices()[info.bone_index as usize];
            log::debug!("  {name:<8} {:?}", m.to_cols_array());
        }
    }

    info!(
        "Upload size: {} bytes for {} matrices",
        animator.output_bytes().len(),
        animator.output_matrices().len()
    );
    Ok(())
}
