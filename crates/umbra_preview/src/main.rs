//! Umbra Preview
//!
//! Renders a small demo scene through the planar shadow feature without a
//! GPU and logs what each frame submitted.

mod config;

use std::process::ExitCode;
use std::sync::Arc;

use glam::Vec3;
use umbra_planar::{PlanarShadowFeature, PlanarShadowSettings, DEBUG_IMAGE_PATH};
use umbra_render::prelude::*;
use umbra_render::RenderQueue;
use umbra_shader::builtin;

use crate::config::PreviewConfig;

/// Demo objects as (name, layer, queue, position)
const DEMO_OBJECTS: &[(&str, u8, i32, [f32; 3])] = &[
    ("Ground", 1, RenderQueue::GEOMETRY, [0.0, 0.0, 0.0]),
    ("Crate", 0, RenderQueue::GEOMETRY, [2.0, 0.5, 1.0]),
    ("Barrel", 0, RenderQueue::GEOMETRY, [-1.5, 0.6, 3.0]),
    ("Fence", 0, RenderQueue::ALPHA_TEST, [0.0, 1.0, 6.0]),
    ("Player", 8, RenderQueue::GEOMETRY, [0.0, 1.0, 2.0]),
    ("Window", 0, RenderQueue::TRANSPARENT, [3.0, 1.5, 4.0]),
];

fn demo_scene(camera: &CameraData) -> CullingResults {
    DEMO_OBJECTS
        .iter()
        .map(|&(name, layer, queue, position)| {
            let distance = Vec3::from(position).distance(camera.position);
            VisibleRenderer::new(name, layer, queue, distance).with_tag(ShaderTagId::UNIVERSAL_FORWARD)
        })
        .collect()
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PreviewConfig::load();
    log::info!("Preview config: {:?}", config);

    let settings = match &config.settings_path {
        Some(path) => match PlanarShadowSettings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => PlanarShadowSettings::default(),
    };

    let shaders = if config.missing_shader {
        Arc::new(ShaderLibrary::new())
    } else {
        match ShaderLibrary::with_builtins() {
            Ok(library) => Arc::new(library),
            Err(e) => {
                log::error!("Built-in shaders failed to compile: {}", e);
                return ExitCode::FAILURE;
            }
        }
    };

    let mut renderer = Renderer::new(shaders.clone());
    renderer.add_feature(PlanarShadowFeature::new("Planar Shadows", settings));

    let mut ui = SceneUi::new();
    ui.add_raw_image(DEBUG_IMAGE_PATH);

    let camera = CameraData::new("Main Camera", CameraType::Game).with_position(Vec3::new(0.0, 3.0, -6.0));
    let mut total_draws = 0;

    for frame in 0..config.frames {
        if config.missing_shader && frame == config.frames / 2 {
            log::info!("Registering built-in shaders at frame {}", frame);
            if let Err(e) = builtin::register_all(&shaders) {
                log::error!("Built-in shaders failed to compile: {}", e);
                return ExitCode::FAILURE;
            }
        }

        let report = renderer.render_frame(camera.clone(), demo_scene(&camera), &mut ui);
        total_draws += report.draw_count;
        log_report(&report);
    }

    let preview = CameraData::new("Preview Camera", CameraType::Preview);
    let report = renderer.render_frame(preview.clone(), demo_scene(&preview), &mut ui);
    total_draws += report.draw_count;
    log_report(&report);

    let pool = renderer.texture_pool();
    log::info!(
        "Rendered {} frames, {} draws, {} textures live, {} idle",
        renderer.frame(),
        total_draws,
        pool.live_count(),
        pool.idle_count()
    );
    if let Some(texture) = ui.raw_image(DEBUG_IMAGE_PATH).and_then(|i| i.texture.as_ref()) {
        log::info!(
            "{} shows {:?} ({}x{})",
            DEBUG_IMAGE_PATH,
            texture.id(),
            texture.width(),
            texture.height()
        );
    }

    ExitCode::SUCCESS
}

fn log_report(report: &FrameReport) {
    match serde_json::to_string(report) {
        Ok(json) => log::info!("{}", json),
        Err(e) => log::warn!("Failed to serialize frame report: {}", e),
    }

    for draw in report.draws() {
        log::debug!(
            "  {:?} -> {:?}: {} (material {:?})",
            draw.pass,
            draw.target,
            draw.renderers.join(", "),
            draw.override_material.as_ref().map(|m| m.name.as_str())
        );
    }
}
