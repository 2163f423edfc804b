//! Temporary render texture pool
//!
//! Passes borrow transient targets for one frame. Released textures stay in
//! the pool and are handed out again for an identical descriptor; textures
//! idle for longer than `max_idle_frames` are destroyed at frame end.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::resource::{RenderTexture, RenderTextureDesc, RenderTextureId};

/// Frames a released texture may stay idle before it is destroyed
pub const DEFAULT_MAX_IDLE_FRAMES: u64 = 15;

/// Errors from the texture pool
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Render texture {0:?} is not live in this pool")]
    NotLive(RenderTextureId),
}

/// Pool counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Textures handed out
    pub requests: u64,
    /// Textures created
    pub created: u64,
    /// Requests served by an idle texture
    pub reused: u64,
    /// Textures returned
    pub released: u64,
    /// Idle textures destroyed
    pub destroyed: u64,
    /// Largest number of simultaneously live textures
    pub peak_live: usize,
}

#[derive(Debug)]
struct IdleTexture {
    texture: RenderTexture,
    released_frame: u64,
}

/// Pool of temporary render textures
#[derive(Debug)]
pub struct TemporaryTexturePool {
    next_id: u64,
    live: HashMap<RenderTextureId, RenderTexture>,
    idle: Vec<IdleTexture>,
    frame: u64,
    max_idle_frames: u64,
    stats: PoolStats,
}

impl TemporaryTexturePool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::with_max_idle_frames(DEFAULT_MAX_IDLE_FRAMES)
    }

    /// Create a pool with a custom idle limit
    pub fn with_max_idle_frames(max_idle_frames: u64) -> Self {
        Self {
            next_id: 1,
            live: HashMap::new(),
            idle: Vec::new(),
            frame: 0,
            max_idle_frames,
            stats: PoolStats::default(),
        }
    }

    /// Borrow a texture matching `desc`
    pub fn get_temporary(&mut self, desc: RenderTextureDesc) -> RenderTexture {
        self.stats.requests += 1;

        let texture = match self.idle.iter().position(|t| *t.texture.desc() == desc) {
            Some(index) => {
                self.stats.reused += 1;
                self.idle.swap_remove(index).texture
            }
            None => {
                let id = RenderTextureId(self.next_id);
                self.next_id += 1;
                self.stats.created += 1;
                log::debug!(
                    "Created temporary texture {:?} ({}x{}, {:?}, depth {})",
                    id,
                    desc.width,
                    desc.height,
                    desc.format,
                    desc.depth_bits
                );
                RenderTexture::new(id, desc)
            }
        };

        self.live.insert(texture.id(), texture.clone());
        self.stats.peak_live = self.stats.peak_live.max(self.live.len());
        texture
    }

    /// Return a borrowed texture
    pub fn release_temporary(&mut self, texture: &RenderTexture) -> Result<(), PoolError> {
        let texture = self
            .live
            .remove(&texture.id())
            .ok_or(PoolError::NotLive(texture.id()))?;

        self.stats.released += 1;
        self.idle.push(IdleTexture {
            texture,
            released_frame: self.frame,
        });
        Ok(())
    }

    /// Advance the frame counter and destroy stale idle textures
    pub fn end_frame(&mut self) {
        self.frame += 1;

        let frame = self.frame;
        let max_idle = self.max_idle_frames;
        let before = self.idle.len();
        self.idle
            .retain(|t| frame.saturating_sub(t.released_frame) <= max_idle);

        let destroyed = before - self.idle.len();
        if destroyed > 0 {
            self.stats.destroyed += destroyed as u64;
            log::debug!("Destroyed {} idle temporary textures", destroyed);
        }
    }

    /// Check if a texture is currently borrowed
    pub fn is_live(&self, id: RenderTextureId) -> bool {
        self.live.contains_key(&id)
    }

    /// Number of borrowed textures
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Number of idle textures kept for reuse
    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    /// Memory held by borrowed textures
    pub fn live_memory_bytes(&self) -> u64 {
        self.live.values().map(|t| t.desc().memory_bytes()).sum()
    }

    /// Current frame index
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Pool counters
    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}

impl Default for TemporaryTexturePool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::RenderTextureFormat;

    fn desc(size: u32) -> RenderTextureDesc {
        RenderTextureDesc::new(size, size, 24, RenderTextureFormat::Argb32)
    }

    #[test]
    fn test_get_and_release() {
        let mut pool = TemporaryTexturePool::new();
        let tex = pool.get_temporary(desc(512));

        assert_eq!(tex.width(), 512);
        assert!(pool.is_live(tex.id()));
        assert_eq!(pool.live_count(), 1);

        pool.release_temporary(&tex).unwrap();
        assert!(!pool.is_live(tex.id()));
        assert_eq!(pool.idle_count(), 1);
    }

    #[test]
    fn test_double_release_rejected() {
        let mut pool = TemporaryTexturePool::new();
        let tex = pool.get_temporary(desc(64));

        pool.release_temporary(&tex).unwrap();
        assert_eq!(
            pool.release_temporary(&tex),
            Err(PoolError::NotLive(tex.id()))
        );
        assert_eq!(pool.stats().released, 1);
    }

    #[test]
    fn test_reuse_matching_desc() {
        let mut pool = TemporaryTexturePool::new();
        let first = pool.get_temporary(desc(256));
        pool.release_temporary(&first).unwrap();
        pool.end_frame();

        let second = pool.get_temporary(desc(256));
        assert_eq!(first.id(), second.id());
        assert_eq!(pool.stats().created, 1);
        assert_eq!(pool.stats().reused, 1);

        // Different size never reuses
        let third = pool.get_temporary(desc(128));
        assert_ne!(third.id(), second.id());
        assert_eq!(pool.stats().created, 2);
    }

    #[test]
    fn test_live_textures_not_shared() {
        let mut pool = TemporaryTexturePool::new();
        let a = pool.get_temporary(desc(32));
        let b = pool.get_temporary(desc(32));
        assert_ne!(a.id(), b.id());
        assert_eq!(pool.stats().peak_live, 2);
    }

    #[test]
    fn test_idle_eviction() {
        let mut pool = TemporaryTexturePool::with_max_idle_frames(2);
        let tex = pool.get_temporary(desc(16));
        pool.release_temporary(&tex).unwrap();

        pool.end_frame();
        pool.end_frame();
        assert_eq!(pool.idle_count(), 1);

        pool.end_frame();
        assert_eq!(pool.idle_count(), 0);
        assert_eq!(pool.stats().destroyed, 1);
    }

    #[test]
    fn test_live_memory() {
        let mut pool = TemporaryTexturePool::new();
        let _tex = pool.get_temporary(desc(4));
        assert_eq!(pool.live_memory_bytes(), 4 * 4 * 8);
    }
}
