use loam_world::VegetationInstance;

use crate::StreamingController;

/// Flattened vegetation of all active chunks, rebuilt when the active set changes.
#[derive(Clone, Debug, Default)]
pub struct VegetationLayer {
    instances: Vec<VegetationInstance>,
    seen_revision: Option<u64>,
}

impl VegetationLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-collects instances if the controller's active set moved since the last sync.
    /// Returns whether a rebuild happened.
    pub fn sync(&mut self, controller: &StreamingController) -> bool {
        let rev = controller.active_revision();
        if self.seen_revision == Some(rev) {
            return false;
        }
        let mut chunks: Vec<_> = controller.active_chunks().collect();
        chunks.sort_by_key(|c| c.coord());
        self.instances.clear();
        for chunk in chunks {
            self.instances.extend_from_slice(chunk.vegetation());
        }
        self.seen_revision = Some(rev);
        log::debug!("vegetation rebuilt: {} instances", self.instances.len());
        true
    }

    #[inline]
    pub fn instances(&self) -> &[VegetationInstance] {
        &self.instances
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
