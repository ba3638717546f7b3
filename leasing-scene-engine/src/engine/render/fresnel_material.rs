use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::render::mesh::MeshVertexBufferLayoutRef;
use bevy::render::render_resource::{RenderPipelineDescriptor, SpecializedMeshPipelineError};
use bevy::{
    prelude::*,
    reflect::TypePath,
    render::render_resource::{AsBindGroup, ShaderRef},
};
use constants::render_settings::{HIGHLIGHT_DEPTH_BIAS, HIGHLIGHT_SETTINGS, HighlightSettings};

/// Translucent Fresnel edge-glow material shared by every overlay mesh.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct FresnelHighlightMaterial {
    #[uniform(0)]
    pub settings: HighlightSettings,
}

impl Default for FresnelHighlightMaterial {
    fn default() -> Self {
        Self {
            settings: HIGHLIGHT_SETTINGS,
        }
    }
}

impl Material for FresnelHighlightMaterial {
    fn fragment_shader() -> ShaderRef {
        "./shaders/fresnel_highlight.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn depth_bias(&self) -> f32 {
        HIGHLIGHT_DEPTH_BIAS
    }

    // Overlays read depth but never write it, and show back faces so the
    // silhouette stays closed from any angle.
    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        _layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
            depth_stencil.depth_write_enabled = false;
        }
        descriptor.primitive.cull_mode = None;
        Ok(())
    }
}
