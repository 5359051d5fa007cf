//! The pulse field resource shared by the scheduler and the renderer.

use bevy::prelude::*;
use rand::Rng;

use crate::engine::assets::point_cloud_assets::Vertex;

use super::cluster_index::{ClusterIndex, ClusterKey};
use super::config::ConnectionConfig;
use super::connection::TemplateSet;
use super::fade_field::FadeField;
use super::grid_model::GridPair;

/// Everything derived from the vertex feed: clusters and templates, which
/// never change, plus the fade values, which change every tick.
#[derive(Resource, Debug, Clone)]
pub struct PulseField {
    clusters: ClusterIndex,
    templates: TemplateSet,
    fade: FadeField,
}

impl PulseField {
    /// Must only run once the feed has completed and the grids exist.
    pub fn build(
        vertices: &[Vertex],
        grids: &GridPair,
        connections: &ConnectionConfig,
        fade_window_secs: f32,
        rng: &mut impl Rng,
    ) -> Self {
        let clusters = ClusterIndex::build(vertices);
        let templates = TemplateSet::build(grids, &clusters, connections, rng);
        Self {
            fade: FadeField::new(vertices, fade_window_secs),
            clusters,
            templates,
        }
    }

    pub fn new(clusters: ClusterIndex, templates: TemplateSet, fade: FadeField) -> Self {
        Self {
            clusters,
            templates,
            fade,
        }
    }

    pub fn clusters(&self) -> &ClusterIndex {
        &self.clusters
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    pub fn fade(&self) -> &FadeField {
        &self.fade
    }

    pub fn fade_mut(&mut self) -> &mut FadeField {
        &mut self.fade
    }

    pub fn trigger(&mut self, key: &ClusterKey) -> usize {
        self.fade.trigger(&self.clusters, key)
    }
}
