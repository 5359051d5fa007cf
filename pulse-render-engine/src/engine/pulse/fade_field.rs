//! Per-vertex fade values and the colours derived from them.

use crate::engine::assets::point_cloud_assets::Vertex;

use super::cluster_index::{ClusterIndex, ClusterKey};

/// Remainders below this are rounding left over from summing frame steps.
const SETTLED: f32 = 1e-5;

/// Per-vertex fade towards white.
///
/// Values live in [0, 1]. A trigger sets a value to 1; afterwards it only
/// decreases, linearly, reaching 0 after one fade window.
#[derive(Debug, Clone)]
pub struct FadeField {
    fade: Vec<f32>,
    original: Vec<[f32; 3]>,
    colors: Vec<[f32; 4]>,
    window_secs: f32,
}

impl FadeField {
    pub fn new(vertices: &[Vertex], window_secs: f32) -> Self {
        let original: Vec<[f32; 3]> = vertices.iter().map(|v| v.color).collect();
        let colors = original.iter().map(|&[r, g, b]| [r, g, b, 1.0]).collect();
        Self {
            fade: vec![0.0; vertices.len()],
            original,
            colors,
            window_secs: window_secs.max(f32::EPSILON),
        }
    }

    pub fn len(&self) -> usize {
        self.fade.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fade.is_empty()
    }

    pub fn value(&self, index: usize) -> Option<f32> {
        self.fade.get(index).copied()
    }

    pub fn values(&self) -> &[f32] {
        &self.fade
    }

    pub fn window_secs(&self) -> f32 {
        self.window_secs
    }

    /// Lowers every positive value by `delta_secs / window`, stopping at 0.
    pub fn decay(&mut self, delta_secs: f32) {
        if !(delta_secs > 0.0) {
            return;
        }
        let step = delta_secs / self.window_secs;
        for value in self.fade.iter_mut().filter(|v| **v > 0.0) {
            let next = *value - step;
            *value = if next < SETTLED { 0.0 } else { next };
        }
    }

    /// Sets every member of the cluster to full fade. Returns how many
    /// vertices were touched; unknown or empty clusters touch none.
    pub fn trigger(&mut self, clusters: &ClusterIndex, key: &ClusterKey) -> usize {
        let mut touched = 0;
        for &index in clusters.members(key) {
            if let Some(value) = self.fade.get_mut(index) {
                *value = 1.0;
                touched += 1;
            }
        }
        touched
    }

    /// `original * (1 - fade) + white * fade`, per channel.
    pub fn color_for(&self, index: usize) -> Option<[f32; 3]> {
        let fade = *self.fade.get(index)?;
        let original = self.original.get(index)?;
        Some(original.map(|channel| channel * (1.0 - fade) + fade))
    }

    /// Recomputes the RGBA buffer handed to the renderer.
    pub fn refresh_colors(&mut self) {
        for (index, slot) in self.colors.iter_mut().enumerate() {
            let fade = self.fade[index];
            let [r, g, b] = self.original[index].map(|c| c * (1.0 - fade) + fade);
            *slot = [r, g, b, 1.0];
        }
    }

    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::*;

    fn field() -> (FadeField, ClusterIndex) {
        let vertices = vec![
            Vertex::new(Vec3::ZERO, [0.2, 0.4, 0.0], Some([1.0, 0.0, 0.0])),
            Vertex::new(Vec3::X, [0.0, 0.0, 0.0], Some([1.0, 0.0, 0.0])),
            Vertex::new(Vec3::Y, [0.5, 0.5, 0.5], Some([2.0, 0.0, 0.0])),
            Vertex::new(Vec3::Z, [0.1, 0.1, 0.1], None),
        ];
        (FadeField::new(&vertices, 1.0), ClusterIndex::build(&vertices))
    }

    #[test]
    fn trigger_sets_members_only() {
        let (mut fade, clusters) = field();
        assert_eq!(fade.trigger(&clusters, &ClusterKey::new(1, 0, 0)), 2);
        assert_eq!(fade.values(), &[1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn unknown_cluster_is_a_no_op() {
        let (mut fade, clusters) = field();
        assert_eq!(fade.trigger(&clusters, &ClusterKey::new(7, 7, 7)), 0);
        assert!(fade.values().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn decays_to_zero_within_one_window() {
        let (mut fade, clusters) = field();
        fade.trigger(&clusters, &ClusterKey::new(1, 0, 0));

        for _ in 0..4 {
            fade.decay(0.25);
            assert!(fade.values().iter().all(|v| (0.0..=1.0).contains(v)));
        }
        assert_eq!(fade.value(0), Some(0.0));

        fade.decay(5.0);
        assert_eq!(fade.value(1), Some(0.0));
    }

    #[test]
    fn frame_sized_steps_clear_exactly_at_the_window() {
        for step_ms in [7u64, 10, 16, 30] {
            let (mut fade, clusters) = field();
            fade.trigger(&clusters, &ClusterKey::new(1, 0, 0));

            let mut last = std::time::Duration::ZERO;
            let mut now_ms = 0;
            while now_ms < 1000 {
                now_ms = (now_ms + step_ms).min(1000);
                let now = std::time::Duration::from_millis(now_ms);
                fade.decay((now - last).as_secs_f32());
                last = now;
            }
            assert_eq!(fade.value(0), Some(0.0), "step {}ms", step_ms);
            assert_eq!(fade.value(1), Some(0.0), "step {}ms", step_ms);
        }
    }

    #[test]
    fn small_fades_survive_until_their_time() {
        let (mut fade, clusters) = field();
        fade.trigger(&clusters, &ClusterKey::new(1, 0, 0));
        for _ in 0..99 {
            fade.decay(0.01);
        }
        let remaining = fade.value(0).unwrap_or_default();
        assert!(remaining > 0.005 && remaining < 0.015);
    }

    #[test]
    fn decay_is_linear() {
        let (mut fade, clusters) = field();
        fade.trigger(&clusters, &ClusterKey::new(2, 0, 0));
        fade.decay(0.3);
        assert!((fade.value(2).unwrap() - 0.7).abs() < 1e-6);
        fade.decay(-1.0);
        assert!((fade.value(2).unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn retrigger_resets_to_full() {
        let (mut fade, clusters) = field();
        let key = ClusterKey::new(1, 0, 0);
        fade.trigger(&clusters, &key);
        fade.decay(0.6);
        fade.trigger(&clusters, &key);
        assert_eq!(fade.value(0), Some(1.0));
    }

    #[test]
    fn colour_moves_towards_white() {
        let (mut fade, clusters) = field();
        assert_eq!(fade.color_for(0), Some([0.2, 0.4, 0.0]));

        fade.trigger(&clusters, &ClusterKey::new(1, 0, 0));
        assert_eq!(fade.color_for(0), Some([1.0, 1.0, 1.0]));

        fade.decay(0.5);
        let [r, g, b] = fade.color_for(0).unwrap();
        assert!((r - 0.6).abs() < 1e-6);
        assert!((g - 0.7).abs() < 1e-6);
        assert!((b - 0.5).abs() < 1e-6);

        fade.refresh_colors();
        assert!((fade.colors()[0][0] - 0.6).abs() < 1e-6);
        assert_eq!(fade.colors()[0][3], 1.0);
        assert_eq!(fade.color_for(99), None);
    }
}
