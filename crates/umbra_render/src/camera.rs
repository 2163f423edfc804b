//! Per-camera frame data

use glam::Vec3;

use crate::resource::RenderTextureDesc;

/// What a camera renders for
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CameraType {
    /// In-game camera
    #[default]
    Game,
    /// Editor scene view
    SceneView,
    /// Asset preview thumbnails and inspectors
    Preview,
    /// Reflection probe capture
    Reflection,
}

/// The camera currently being rendered
#[derive(Clone, Debug)]
pub struct CameraData {
    pub name: String,
    pub camera_type: CameraType,
    pub position: Vec3,
    /// Descriptor of the camera's color target
    pub target_desc: RenderTextureDesc,
}

impl CameraData {
    pub fn new(name: impl Into<String>, camera_type: CameraType) -> Self {
        Self {
            name: name.into(),
            camera_type,
            position: Vec3::ZERO,
            target_desc: RenderTextureDesc::new(1920, 1080, 24, Default::default()),
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_target_desc(mut self, desc: RenderTextureDesc) -> Self {
        self.target_desc = desc;
        self
    }

    /// Check if this camera renders an asset preview
    pub fn is_preview_camera(&self) -> bool {
        self.camera_type == CameraType::Preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_camera() {
        assert!(CameraData::new("thumb", CameraType::Preview).is_preview_camera());
        assert!(!CameraData::new("main", CameraType::Game).is_preview_camera());
        assert!(!CameraData::new("scene", CameraType::SceneView).is_preview_camera());
    }
}
