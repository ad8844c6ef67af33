use super::index::ReferenceIndex;
use crate::domain::blueprint::{lookup::ZoneLookup, resolver::BlueprintResolver};

/// Both static datasets, loaded together and immutable afterwards.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub index: ReferenceIndex,
    pub resolver: BlueprintResolver,
}

impl ReferenceData {
    pub fn new(index: ReferenceIndex, resolver: BlueprintResolver) -> Self {
        Self { index, resolver }
    }

    pub fn lookup(&self) -> &dyn ZoneLookup {
        &self.resolver
    }
}
